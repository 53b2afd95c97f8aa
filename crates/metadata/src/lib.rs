//! Font metadata assembly: OS/2 and hhea overlays, name records, naming
//! and versioning.

mod error;
mod meta;
mod name;
mod naming;
mod os2;
mod version;

pub use error::{MetadataError, Result};
pub use meta::FontMeta;
pub use name::{
    LANG_JP, LANG_US, NAME_ID_COPYRIGHT, NAME_ID_FAMILY, NAME_ID_FULL_NAME, NAME_ID_LICENSE_URL,
    NAME_ID_POSTSCRIPT, NAME_ID_SUBFAMILY, NAME_ID_UNIQUE_ID, NAME_ID_VERSION, NameEntry, NameTable,
};
pub use naming::FontNaming;
pub use os2::{Os2Key, Os2Table, Os2Value, ValueKind};
pub use version::FontVersion;
