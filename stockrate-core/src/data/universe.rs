//! Universe configuration — named groups of security codes.
//!
//! The universe is stored as a TOML file mapping a group name (an index
//! classification such as "TOPIX Core30") to exchange security codes. A group
//! is turned into a symbol list by appending the exchange suffix and written
//! as a headerless single-column CSV that the loader reads back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const CORE30_GROUP: &str = "TOPIX Core30";

/// Suffix Yahoo Finance uses for Tokyo Stock Exchange listings.
pub const TOKYO_SUFFIX: &str = ".T";

/// The complete universe configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Universe {
    pub groups: BTreeMap<String, Vec<String>>,
}

impl Universe {
    /// Load a universe from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read universe file: {e}"))?;
        Self::from_toml(&content)
    }

    /// Parse a universe from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("parse universe TOML: {e}"))
    }

    /// Serialize the universe to TOML.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("serialize universe: {e}"))
    }

    /// Security codes for one group.
    pub fn group_codes(&self, group: &str) -> Option<&[String]> {
        self.groups.get(group).map(|v| v.as_slice())
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.keys().map(|s| s.as_str()).collect()
    }

    /// The TOPIX Core30 constituents.
    pub fn default_core30() -> Self {
        let codes = [
            "2914", "3382", "4063", "4502", "4568", "6098", "6367", "6501", "6758", "6861",
            "6902", "6954", "6981", "7011", "7203", "7267", "7741", "7974", "8001", "8031",
            "8035", "8058", "8306", "8316", "8411", "8766", "9432", "9433", "9983", "9984",
        ];
        let mut groups = BTreeMap::new();
        groups.insert(
            CORE30_GROUP.to_string(),
            codes.into_iter().map(String::from).collect(),
        );
        Self { groups }
    }
}

/// Append the exchange suffix to each code (`7203` + `.T` → `7203.T`).
pub fn to_symbols(codes: &[String], suffix: &str) -> Vec<String> {
    codes
        .iter()
        .map(|code| code.trim())
        .filter(|code| !code.is_empty())
        .map(|code| format!("{code}{suffix}"))
        .collect()
}

/// Write symbols as a headerless single-column CSV, creating the parent directory.
pub fn write_symbol_list(path: &Path, symbols: &[String]) -> Result<(), csv::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    for symbol in symbols {
        wtr.write_record([symbol])?;
    }
    wtr.flush()?;
    Ok(())
}
