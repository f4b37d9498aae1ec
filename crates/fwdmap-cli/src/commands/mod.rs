//! CLI subcommands.

pub mod batch;
pub mod forwarders;
pub mod identify;
pub mod map;
pub mod run;

use std::fs;
use std::path::Path;

use fwdmap_core::{defaults, ForwarderPattern, MappingRule};

/// Load forwarder patterns from a JSON file, or fall back to the built-ins.
pub(crate) fn load_patterns(path: Option<&Path>) -> anyhow::Result<Vec<ForwarderPattern>> {
    match path {
        Some(p) => {
            let json = fs::read_to_string(p)?;
            Ok(ForwarderPattern::parse_many(&json)?)
        }
        None => Ok(defaults::default_forwarder_patterns()),
    }
}

/// Load mapping rules from a JSON file, or fall back to the universal set.
pub(crate) fn load_rules(path: Option<&Path>) -> anyhow::Result<Vec<MappingRule>> {
    match path {
        Some(p) => {
            let json = fs::read_to_string(p)?;
            Ok(MappingRule::parse_many(&json)?)
        }
        None => Ok(defaults::default_mapping_rules()),
    }
}

/// Load the optional structured field bag.
pub(crate) fn load_structured(path: Option<&Path>) -> anyhow::Result<Option<serde_json::Value>> {
    match path {
        Some(p) => {
            let json = fs::read_to_string(p)?;
            Ok(Some(serde_json::from_str(&json)?))
        }
        None => Ok(None),
    }
}
