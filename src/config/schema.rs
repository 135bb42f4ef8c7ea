use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::ReferenceTable;

/// Contents of `~/.config/pft-calc/config.yaml`. Every field is optional.
///
/// Example YAML:
/// ```yaml
/// storage_dir: /home/me/.pft
/// reference:
///   push_ups:
///     male:
///       "21": { min: 36, max: 80 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory for saved sessions and settings (default: platform data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,

    /// Replaces the built-in reference table entirely when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceTable>,
}

impl Config {
    /// The table to score against
    pub fn reference_table(&self) -> ReferenceTable {
        self.reference.clone().unwrap_or_default()
    }

    pub fn storage_path(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(crate::store::get_store_path)
    }
}
