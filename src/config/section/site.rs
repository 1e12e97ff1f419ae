//! `[site]` section configuration.
//!
//! Describes the build output being published.
//!
//! # Example
//!
//! ```toml
//! [site]
//! version = "1.4.0"    # Used as the subdirectory name by versioned publish types
//! dest = "public"      # Destination directory produced by the site build
//! ```

use crate::config::FieldPath;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Built site settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Current site version (e.g. "1.4.0").
    pub version: String,

    /// Destination directory of the site build, relative to the project root.
    pub dest: PathBuf,
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            version: String::new(),
            dest: PathBuf::from("public"),
        }
    }
}

pub struct SiteFields {
    pub version: FieldPath,
    pub dest: FieldPath,
}

impl SiteSectionConfig {
    pub const FIELDS: SiteFields = SiteFields {
        version: FieldPath::new("site.version"),
        dest: FieldPath::new("site.dest"),
    };
}
