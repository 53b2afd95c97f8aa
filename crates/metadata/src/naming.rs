use crate::{
    FontVersion, LANG_US, NAME_ID_FAMILY, NAME_ID_FULL_NAME, NAME_ID_POSTSCRIPT,
    NAME_ID_SUBFAMILY, NAME_ID_UNIQUE_ID, NAME_ID_VERSION, NameEntry,
};

/// Family, style and weight names of a built font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontNaming {
    pub family: String,
    pub style: String,
    pub weight: String,
}

impl FontNaming {
    pub fn new(
        family: impl Into<String>,
        style: impl Into<String>,
        weight: impl Into<String>,
    ) -> Self {
        Self { family: family.into(), style: style.into(), weight: weight.into() }
    }

    /// "{family}-{style}" with spaces removed.
    pub fn postscript_name(&self) -> String {
        format!("{}-{}", self.family, self.style).replace(' ', "")
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.family, self.style)
    }

    /// Records emitted unless the caller supplied the same pair.
    pub fn default_records(&self, version: &FontVersion) -> Vec<NameEntry> {
        let postscript = self.postscript_name();
        vec![
            NameEntry::new(LANG_US, NAME_ID_FAMILY, &self.family),
            NameEntry::new(LANG_US, NAME_ID_SUBFAMILY, &self.style),
            NameEntry::new(
                LANG_US,
                NAME_ID_UNIQUE_ID,
                format!("{};NONE;{postscript}", version.tag()),
            ),
            NameEntry::new(LANG_US, NAME_ID_FULL_NAME, self.full_name()),
            NameEntry::new(LANG_US, NAME_ID_VERSION, version.version_string()),
            NameEntry::new(LANG_US, NAME_ID_POSTSCRIPT, postscript),
        ]
    }
}
