use font_types::Fixed;

use crate::{MetadataError, Result};

const DEFAULT_VERSION: &str = "1.000";

/// Font version information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontVersion {
    pub major: u16,
    /// Minor digits as written, e.g. "000" or "25".
    pub minor: String,
}

impl FontVersion {
    /// Parse `MAJOR.MINOR` (optionally prefixed with `v`), or use 1.000.
    pub fn parse(value: Option<&str>) -> Result<Self> {
        let raw = value.unwrap_or(DEFAULT_VERSION);
        let invalid = || MetadataError::InvalidVersion(raw.to_string());
        let v = raw.strip_prefix('v').unwrap_or(raw);

        let (major, minor) = v.split_once('.').ok_or_else(invalid)?;
        if minor.is_empty() || !minor.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let major = major.parse::<u16>().map_err(|_| invalid())?;
        Ok(Self { major, minor: minor.to_string() })
    }

    /// The version tag without prefix, e.g. "1.000".
    pub fn tag(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    /// Get the version string (e.g., "Version 1.000").
    pub fn version_string(&self) -> String {
        format!("Version {}", self.tag())
    }

    /// `head.fontRevision` as major.minor fixed.
    pub fn revision(&self) -> Fixed {
        let digits = self.minor.len().min(9) as i32;
        let minor = self.minor[..digits as usize].parse::<f64>().unwrap_or(0.0);
        Fixed::from_f64(self.major as f64 + minor / 10f64.powi(digits))
    }
}

impl Default for FontVersion {
    fn default() -> Self {
        Self { major: 1, minor: "000".to_string() }
    }
}
