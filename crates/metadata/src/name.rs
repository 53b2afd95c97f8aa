use font_types::NameId;
use write_fonts::tables::name::{Name, NameRecord};

/// Windows English (United States).
pub const LANG_US: u16 = 0x0409;
/// Windows Japanese.
pub const LANG_JP: u16 = 0x0411;

const PLATFORM_WINDOWS: u16 = 3;
const ENCODING_UNICODE_BMP: u16 = 1;

pub const NAME_ID_COPYRIGHT: u16 = 0;
pub const NAME_ID_FAMILY: u16 = 1;
pub const NAME_ID_SUBFAMILY: u16 = 2;
pub const NAME_ID_UNIQUE_ID: u16 = 3;
pub const NAME_ID_FULL_NAME: u16 = 4;
pub const NAME_ID_VERSION: u16 = 5;
pub const NAME_ID_POSTSCRIPT: u16 = 6;
pub const NAME_ID_LICENSE_URL: u16 = 14;

/// One Windows Unicode name record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    pub language: u16,
    pub name_id: u16,
    pub text: String,
}

impl NameEntry {
    pub fn new(language: u16, name_id: u16, text: impl Into<String>) -> Self {
        Self { language, name_id, text: text.into() }
    }

    fn to_record(&self) -> NameRecord {
        NameRecord::new(
            PLATFORM_WINDOWS,
            ENCODING_UNICODE_BMP,
            self.language,
            NameId::new(self.name_id),
            self.text.clone().into(),
        )
    }
}

/// Name records appended by the caller, in order.
///
/// Duplicate (language, name id) pairs are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    entries: Vec<NameEntry>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record per language id.
    pub fn append(&mut self, languages: &[u16], name_id: u16, text: &str) {
        self.entries.extend(languages.iter().map(|&lang| NameEntry::new(lang, name_id, text)));
    }

    pub fn entries(&self) -> &[NameEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn has(&self, language: u16, name_id: u16) -> bool {
        self.entries.iter().any(|e| e.language == language && e.name_id == name_id)
    }

    /// Build the `name` table, adding each default only where no appended
    /// record already covers its (language, name id) pair.
    pub fn to_table(&self, defaults: &[NameEntry]) -> Name {
        let mut records: Vec<NameRecord> = self.entries.iter().map(NameEntry::to_record).collect();
        records.extend(
            defaults.iter().filter(|d| !self.has(d.language, d.name_id)).map(NameEntry::to_record),
        );

        // Stable, so appended duplicates keep their order
        records.sort_by(|a, b| {
            (a.platform_id, a.encoding_id, a.language_id, a.name_id).cmp(&(
                b.platform_id,
                b.encoding_id,
                b.language_id,
                b.name_id,
            ))
        });

        Name::new(records)
    }
}
