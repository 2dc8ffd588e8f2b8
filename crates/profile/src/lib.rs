//! Printer profile definitions and validation for labelgen.
//!
//! A profile tells the generator which print resolution to target and tells
//! the design checker how large a label the printer can physically produce.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest print resolution a profile may declare.
pub const MIN_DPI: u32 = 100;
/// Highest print resolution a profile may declare.
pub const MAX_DPI: u32 = 600;

/// Errors that can occur when loading or validating a printer profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// JSON deserialization failed.
    #[error("invalid profile JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A required field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },
}

/// A printer profile describing one label printer (or class of printers).
///
/// # Example
/// ```
/// let profile = labelgen_profile::Profile {
///     id: "zebra-zd421-203".into(),
///     schema_version: "1.0.0".into(),
///     dpi: 203,
///     page: Some(labelgen_profile::Page {
///         width_dots: Some(832),
///         height_dots: Some(7992),
///     }),
/// };
/// assert_eq!(profile.max_width_dots(), Some(832));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Unique profile identifier (e.g., `"zebra-zd421-203"`).
    pub id: String,
    /// Profile schema version for forward compatibility (e.g., `"1.0.0"`).
    pub schema_version: String,
    /// Print resolution in dots per inch (typically 152, 203, 300, or 600).
    pub dpi: u32,
    /// Printable area limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
}

/// Printable area limits for a printer profile.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Page {
    /// Printhead width in dots.
    pub width_dots: Option<u32>,
    /// Maximum label length in dots.
    pub height_dots: Option<u32>,
}

impl Profile {
    /// Printhead width in dots, if the profile declares one.
    pub fn max_width_dots(&self) -> Option<u32> {
        self.page.as_ref().and_then(|p| p.width_dots)
    }

    /// Maximum label length in dots, if the profile declares one.
    pub fn max_height_dots(&self) -> Option<u32> {
        self.page.as_ref().and_then(|p| p.height_dots)
    }
}

/// Load and validate a [`Profile`] from a JSON string.
///
/// Checks after deserialization:
/// - `id` and `schema_version` must be non-empty
/// - `dpi` must be in range 100–600
/// - `page.width_dots` and `page.height_dots` must be > 0 (if present)
pub fn load_profile_from_str(s: &str) -> Result<Profile, ProfileError> {
    let profile: Profile = serde_json::from_str(s)?;
    validate(&profile)?;
    Ok(profile)
}

/// Validate an already-constructed profile.
pub fn validate(profile: &Profile) -> Result<(), ProfileError> {
    if profile.id.trim().is_empty() {
        return Err(invalid("id", "must not be empty"));
    }
    if profile.schema_version.trim().is_empty() {
        return Err(invalid("schema_version", "must not be empty"));
    }

    if profile.dpi < MIN_DPI {
        return Err(invalid(
            "dpi",
            format!("{} is below minimum supported DPI ({MIN_DPI})", profile.dpi),
        ));
    }
    if profile.dpi > MAX_DPI {
        return Err(invalid(
            "dpi",
            format!("{} exceeds maximum supported DPI ({MAX_DPI})", profile.dpi),
        ));
    }

    if let Some(ref page) = profile.page {
        if page.width_dots == Some(0) {
            return Err(invalid("page.width_dots", "must be > 0"));
        }
        if page.height_dots == Some(0) {
            return Err(invalid("page.height_dots", "must be > 0"));
        }
    }

    Ok(())
}

fn invalid(field: &str, reason: impl Into<String>) -> ProfileError {
    ProfileError::InvalidField {
        field: field.into(),
        reason: reason.into(),
    }
}
