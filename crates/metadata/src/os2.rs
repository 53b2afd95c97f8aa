//! A typed overlay of OS/2 and hhea values.
//!
//! Keys use the familiar `os2_*` / `hhea_*` spelling. Keys starting with
//! `x_` are carried through untouched for tools that understand them; any
//! other unrecognized key is rejected when the table is built. Extension
//! values still take one of the [`Os2Value`] shapes, so floats and objects
//! are rejected.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use font_types::{FWord, Tag};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use write_fonts::tables::{
    hhea::Hhea,
    os2::{Os2, SelectionFlags},
};

use crate::{MetadataError, Result};

const EXTENSION_PREFIX: &str = "x_";
const MAX_OS2_VERSION: i64 = 5;

/// The shape a key's value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Bool,
    Text,
    Tuple,
}

impl ValueKind {
    fn describe(self) -> &'static str {
        match self {
            ValueKind::Int => "an integer",
            ValueKind::Bool => "a boolean",
            ValueKind::Text => "a string",
            ValueKind::Tuple => "a list of integers",
        }
    }
}

macro_rules! os2_keys {
    ($($variant:ident => $name:literal : $kind:ident),* $(,)?) => {
        /// A recognized metadata key.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum Os2Key {
            $($variant,)*
            /// An `x_`-prefixed key, carried but not applied.
            Extension(String),
        }

        impl Os2Key {
            pub const KNOWN: &'static [&'static str] = &[$($name),*];

            pub fn as_str(&self) -> &str {
                match self {
                    $(Os2Key::$variant => $name,)*
                    Os2Key::Extension(name) => name,
                }
            }

            /// The value shape this key accepts; extensions accept any [`ValueKind`].
            pub fn kind(&self) -> Option<ValueKind> {
                match self {
                    $(Os2Key::$variant => Some(ValueKind::$kind),)*
                    Os2Key::Extension(_) => None,
                }
            }
        }

        impl FromStr for Os2Key {
            type Err = MetadataError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($name => Ok(Os2Key::$variant),)*
                    _ if s.starts_with(EXTENSION_PREFIX) => Ok(Os2Key::Extension(s.to_string())),
                    _ => Err(MetadataError::UnknownKey(s.to_string())),
                }
            }
        }
    };
}

os2_keys! {
    Version => "os2_version": Int,
    Weight => "os2_weight": Int,
    Width => "os2_width": Int,
    FsType => "os2_fstype": Int,
    FamilyClass => "os2_family_class": Int,
    Panose => "os2_panose": Tuple,
    Vendor => "os2_vendor": Text,
    TypoAscent => "os2_typoascent": Int,
    TypoDescent => "os2_typodescent": Int,
    TypoLineGap => "os2_typolinegap": Int,
    WinAscent => "os2_winascent": Int,
    WinDescent => "os2_windescent": Int,
    TypoAscentAdd => "os2_typoascent_add": Bool,
    TypoDescentAdd => "os2_typodescent_add": Bool,
    WinAscentAdd => "os2_winascent_add": Bool,
    WinDescentAdd => "os2_windescent_add": Bool,
    UseTypoMetrics => "os2_use_typo_metrics": Bool,
    CapHeight => "os2_capheight": Int,
    XHeight => "os2_xheight": Int,
    StrikeYPos => "os2_strikeypos": Int,
    StrikeYSize => "os2_strikeysize": Int,
    SubXSize => "os2_subxsize": Int,
    SubYSize => "os2_subysize": Int,
    SubXOff => "os2_subxoff": Int,
    SubYOff => "os2_subyoff": Int,
    SupXSize => "os2_supxsize": Int,
    SupYSize => "os2_supysize": Int,
    SupXOff => "os2_supxoff": Int,
    SupYOff => "os2_supyoff": Int,
    HheaAscent => "hhea_ascent": Int,
    HheaDescent => "hhea_descent": Int,
    HheaLineGap => "hhea_linegap": Int,
    HheaAscentAdd => "hhea_ascent_add": Bool,
    HheaDescentAdd => "hhea_descent_add": Bool,
}

impl Display for Os2Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw metadata value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Os2Value {
    Bool(bool),
    Int(i64),
    Text(String),
    Tuple(Vec<i64>),
}

impl Os2Value {
    fn kind(&self) -> ValueKind {
        match self {
            Os2Value::Bool(_) => ValueKind::Bool,
            Os2Value::Int(_) => ValueKind::Int,
            Os2Value::Text(_) => ValueKind::Text,
            Os2Value::Tuple(_) => ValueKind::Tuple,
        }
    }
}

impl From<i64> for Os2Value {
    fn from(v: i64) -> Self {
        Os2Value::Int(v)
    }
}

impl From<i32> for Os2Value {
    fn from(v: i32) -> Self {
        Os2Value::Int(v.into())
    }
}

impl From<bool> for Os2Value {
    fn from(v: bool) -> Self {
        Os2Value::Bool(v)
    }
}

/// A validated, insertion-ordered OS/2 and hhea overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<String, Os2Value>", into = "IndexMap<String, Os2Value>")]
pub struct Os2Table {
    entries: IndexMap<Os2Key, Os2Value>,
}

impl TryFrom<IndexMap<String, Os2Value>> for Os2Table {
    type Error = MetadataError;

    fn try_from(raw: IndexMap<String, Os2Value>) -> Result<Self> {
        let mut table = Os2Table::default();
        for (key, value) in raw {
            table.insert(key.parse()?, value)?;
        }
        Ok(table)
    }
}

impl From<Os2Table> for IndexMap<String, Os2Value> {
    fn from(table: Os2Table) -> Self {
        table.entries.into_iter().map(|(k, v)| (k.as_str().to_string(), v)).collect()
    }
}

impl Os2Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value after checking its shape.
    pub fn insert(&mut self, key: Os2Key, value: impl Into<Os2Value>) -> Result<()> {
        let value = value.into();
        if let Some(kind) = key.kind()
            && kind != value.kind()
        {
            return Err(MetadataError::InvalidValue {
                key: key.to_string(),
                expected: kind.describe(),
            });
        }
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &Os2Key) -> Option<&Os2Value> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &Os2Key) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Os2Key, &Os2Value)> {
        self.entries.iter()
    }

    /// The `x_`-prefixed entries.
    pub fn extensions(&self) -> impl Iterator<Item = (&str, &Os2Value)> {
        self.entries.iter().filter_map(|(k, v)| match k {
            Os2Key::Extension(name) => Some((name.as_str(), v)),
            _ => None,
        })
    }

    /// Typo, win and hhea ascent/descent derived from final font metrics.
    ///
    /// Typo and hhea descents are negative, the win descent is positive.
    pub fn default_vertical_metrics(ascent: i32, descent: i32) -> Self {
        let entries = [
            (Os2Key::TypoAscent, ascent),
            (Os2Key::WinAscent, ascent),
            (Os2Key::HheaAscent, ascent),
            (Os2Key::TypoDescent, -descent),
            (Os2Key::WinDescent, descent),
            (Os2Key::HheaDescent, -descent),
        ];
        Self { entries: entries.into_iter().map(|(k, v)| (k, Os2Value::from(v))).collect() }
    }

    /// Copy every entry of `other` whose key is not already present.
    pub fn fill_absent(&mut self, other: &Os2Table) {
        for (key, value) in &other.entries {
            if !self.entries.contains_key(key) {
                self.entries.insert(key.clone(), value.clone());
            }
        }
    }

    /// Add default vertical metrics for keys the caller has not set.
    ///
    /// A key whose `*_add` flag is set is left absent, so it resolves to the
    /// bare font metric rather than twice it.
    pub fn apply_default_vertical_metrics(&mut self, ascent: i32, descent: i32) {
        let mut defaults = Self::default_vertical_metrics(ascent, descent);
        defaults.entries.retain(|key, _| offset_flag(key).is_none_or(|add| !self.flag(add)));
        self.fill_absent(&defaults);
    }

    fn int(&self, key: Os2Key) -> Option<i64> {
        match self.entries.get(&key) {
            Some(Os2Value::Int(v)) => Some(*v),
            _ => None,
        }
    }

    fn flag(&self, key: Os2Key) -> bool {
        matches!(self.entries.get(&key), Some(Os2Value::Bool(true)))
    }

    /// The OS/2 version explicitly requested, if any.
    pub fn requested_version(&self) -> Result<Option<u16>> {
        match self.int(Os2Key::Version) {
            Some(v @ 0..=MAX_OS2_VERSION) => Ok(Some(v as u16)),
            Some(_) => Err(MetadataError::InvalidValue {
                key: Os2Key::Version.to_string(),
                expected: "an OS/2 version between 0 and 5",
            }),
            None => Ok(None),
        }
    }

    /// Resolve a metric that may be an offset from a font metric.
    ///
    /// With the `add` flag set, a missing value is a zero offset.
    fn metric(&self, key: Os2Key, add: Os2Key, base: i32) -> Option<i64> {
        if self.flag(add) {
            Some(base as i64 + self.int(key).unwrap_or(0))
        } else {
            self.int(key)
        }
    }

    /// Write every recognized OS/2 entry into `os2`.
    ///
    /// `ascent` and `descent` are the font's positive vertical metrics, used
    /// as the base for `*_add` offsets.
    pub fn apply_os2(&self, os2: &mut Os2, ascent: i32, descent: i32) -> Result<()> {
        macro_rules! set {
            ($field:expr, $key:expr) => {
                if let Some(v) = self.int($key) {
                    $field = narrow(&$key, v)?;
                }
            };
        }

        set!(os2.us_weight_class, Os2Key::Weight);
        set!(os2.us_width_class, Os2Key::Width);
        set!(os2.fs_type, Os2Key::FsType);
        set!(os2.s_family_class, Os2Key::FamilyClass);
        set!(os2.s_typo_line_gap, Os2Key::TypoLineGap);
        set!(os2.y_strikeout_position, Os2Key::StrikeYPos);
        set!(os2.y_strikeout_size, Os2Key::StrikeYSize);
        set!(os2.y_subscript_x_size, Os2Key::SubXSize);
        set!(os2.y_subscript_y_size, Os2Key::SubYSize);
        set!(os2.y_subscript_x_offset, Os2Key::SubXOff);
        set!(os2.y_subscript_y_offset, Os2Key::SubYOff);
        set!(os2.y_superscript_x_size, Os2Key::SupXSize);
        set!(os2.y_superscript_y_size, Os2Key::SupYSize);
        set!(os2.y_superscript_x_offset, Os2Key::SupXOff);
        set!(os2.y_superscript_y_offset, Os2Key::SupYOff);

        if let Some(v) = self.metric(Os2Key::TypoAscent, Os2Key::TypoAscentAdd, ascent) {
            os2.s_typo_ascender = narrow(&Os2Key::TypoAscent, v)?;
        }
        if let Some(v) = self.metric(Os2Key::TypoDescent, Os2Key::TypoDescentAdd, -descent) {
            os2.s_typo_descender = narrow(&Os2Key::TypoDescent, v)?;
        }
        if let Some(v) = self.metric(Os2Key::WinAscent, Os2Key::WinAscentAdd, ascent) {
            os2.us_win_ascent = narrow(&Os2Key::WinAscent, v)?;
        }
        if let Some(v) = self.metric(Os2Key::WinDescent, Os2Key::WinDescentAdd, descent) {
            os2.us_win_descent = narrow(&Os2Key::WinDescent, v)?;
        }

        if let Some(v) = self.int(Os2Key::CapHeight) {
            os2.s_cap_height = Some(narrow(&Os2Key::CapHeight, v)?);
        }
        if let Some(v) = self.int(Os2Key::XHeight) {
            os2.sx_height = Some(narrow(&Os2Key::XHeight, v)?);
        }

        if let Some(Os2Value::Tuple(values)) = self.entries.get(&Os2Key::Panose) {
            os2.panose_10 = panose(values)?;
        }
        if let Some(Os2Value::Text(vendor)) = self.entries.get(&Os2Key::Vendor) {
            os2.ach_vend_id = vendor_tag(vendor)?;
        }
        if self.contains(&Os2Key::UseTypoMetrics) {
            if self.flag(Os2Key::UseTypoMetrics) {
                os2.fs_selection.insert(SelectionFlags::USE_TYPO_METRICS);
            } else {
                os2.fs_selection.remove(SelectionFlags::USE_TYPO_METRICS);
            }
        }

        for (name, _) in self.extensions() {
            debug!("OS/2 extension key '{name}' carried, not applied");
        }
        Ok(())
    }

    /// Write the `hhea_*` entries into `hhea`.
    pub fn apply_hhea(&self, hhea: &mut Hhea, ascent: i32, descent: i32) -> Result<()> {
        if let Some(v) = self.metric(Os2Key::HheaAscent, Os2Key::HheaAscentAdd, ascent) {
            hhea.ascender = FWord::new(narrow(&Os2Key::HheaAscent, v)?);
        }
        if let Some(v) = self.metric(Os2Key::HheaDescent, Os2Key::HheaDescentAdd, -descent) {
            hhea.descender = FWord::new(narrow(&Os2Key::HheaDescent, v)?);
        }
        if let Some(v) = self.int(Os2Key::HheaLineGap) {
            hhea.line_gap = FWord::new(narrow(&Os2Key::HheaLineGap, v)?);
        }
        Ok(())
    }
}

fn offset_flag(key: &Os2Key) -> Option<Os2Key> {
    match key {
        Os2Key::TypoAscent => Some(Os2Key::TypoAscentAdd),
        Os2Key::TypoDescent => Some(Os2Key::TypoDescentAdd),
        Os2Key::WinAscent => Some(Os2Key::WinAscentAdd),
        Os2Key::WinDescent => Some(Os2Key::WinDescentAdd),
        Os2Key::HheaAscent => Some(Os2Key::HheaAscentAdd),
        Os2Key::HheaDescent => Some(Os2Key::HheaDescentAdd),
        _ => None,
    }
}

fn narrow<T: TryFrom<i64>>(key: &Os2Key, value: i64) -> Result<T> {
    T::try_from(value).map_err(|_| MetadataError::InvalidValue {
        key: key.to_string(),
        expected: "a value in range for its field",
    })
}

fn panose(values: &[i64]) -> Result<[u8; 10]> {
    let invalid = || MetadataError::InvalidValue {
        key: Os2Key::Panose.to_string(),
        expected: "ten integers in 0..=255",
    };
    let bytes = values.iter().map(|v| u8::try_from(*v).map_err(|_| invalid())).collect::<Result<Vec<u8>>>()?;
    bytes.try_into().map_err(|_| invalid())
}

fn vendor_tag(vendor: &str) -> Result<Tag> {
    if vendor.len() > 4 || !vendor.is_ascii() {
        return Err(MetadataError::InvalidValue {
            key: Os2Key::Vendor.to_string(),
            expected: "up to four ASCII characters",
        });
    }
    let mut bytes = *b"    ";
    bytes[..vendor.len()].copy_from_slice(vendor.as_bytes());
    Ok(Tag::new(&bytes))
}
