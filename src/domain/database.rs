use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::DomainError;

/// Regions in which a hardware may run.
///
/// Database files use two layouts for the same field: a plain list of
/// region ids, or a map from region id to the software allowed there.
/// Anything else is kept as-is and permits nothing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RegionShape {
    List(Vec<Value>),
    Mapping(Map<String, Value>),
    Unsupported(Value),
}

impl Default for RegionShape {
    fn default() -> Self {
        RegionShape::Mapping(Map::new())
    }
}

impl RegionShape {
    /// Whether `software` may run on this hardware in `region`.
    ///
    /// Values compare as JSON, so the number `42` and the string `"42"` differ.
    /// The list layout carries no per-region software, so only the region is checked.
    pub fn permits(&self, software: &Value, region: &Value) -> bool {
        match self {
            RegionShape::List(regions) => regions.contains(region),
            RegionShape::Mapping(regions) => region
                .as_str()
                .and_then(|id| regions.get(id))
                .and_then(Value::as_array)
                .is_some_and(|allowed| allowed.contains(software)),
            RegionShape::Unsupported(_) => false,
        }
    }

    /// Region ids in stored order.
    pub fn region_ids(&self) -> Vec<String> {
        match self {
            RegionShape::List(regions) => regions.iter().map(text).collect(),
            RegionShape::Mapping(regions) => regions.keys().cloned().collect(),
            RegionShape::Unsupported(_) => Vec::new(),
        }
    }
}

/// Capabilities of a single hardware.
///
/// Only the region field drives local checks; the rest is descriptive and
/// kept as raw JSON whatever its type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HardwareRecord {
    #[serde(rename = "Softwares")]
    pub software: Value,
    #[serde(rename = "Regioes")]
    pub regions: RegionShape,
    #[serde(rename = "Androids_disponiveis")]
    pub os_versions: Value,
    #[serde(rename = "Android_mais_recente")]
    pub latest_os: Value,
    #[serde(rename = "Tecnologias_suportadas")]
    pub technologies: Value,
}

impl HardwareRecord {
    /// A record that is not a JSON object becomes an empty one.
    fn from_value(id: &str, value: &Value) -> Self {
        HardwareRecord::deserialize(value).unwrap_or_else(|e| {
            warn!(hardware = id, error = %e, "Unreadable hardware record, treating it as empty");
            HardwareRecord::default()
        })
    }
}

/// Reference database of hardware capabilities, keyed by hardware id.
///
/// The document is kept as loaded next to the parsed records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapabilityDatabase {
    raw: Map<String, Value>,
    records: BTreeMap<String, HardwareRecord>,
}

impl CapabilityDatabase {
    /// Parse a database document. Only a top-level object is required;
    /// odd records load anyway and fail their own relation checks.
    pub fn from_json_str(content: &str) -> Result<Self, DomainError> {
        let raw: Map<String, Value> =
            serde_json::from_str(content).map_err(|e| DomainError::DatabaseLoad(e.to_string()))?;

        let records = raw
            .iter()
            .map(|(id, value)| (id.clone(), HardwareRecord::from_value(id, value)))
            .collect();

        Ok(Self { raw, records })
    }

    pub fn hardware(&self, id: &str) -> Option<&HardwareRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Local hardware/software/region compatibility check.
    ///
    /// Unknown hardware never matches.
    pub fn relation_holds(&self, hardware: &str, software: &Value, region: &Value) -> bool {
        self.hardware(hardware)
            .is_some_and(|record| record.regions.permits(software, region))
    }

    /// Reduced text block describing one hardware, for prompts.
    pub fn excerpt(&self, hardware: &str) -> Option<String> {
        let record = self.hardware(hardware)?;
        let technologies = match &record.technologies {
            Value::Null => "{}".to_string(),
            other => serde_json::to_string_pretty(other).unwrap_or_default(),
        };

        Some(format!(
            "Hardware: {}\nSoftwares: {}\nRegions: {}\nAvailable OS versions: {}\nLatest OS version: {}\nSupported technologies: {}",
            hardware,
            listing(&record.software),
            record.regions.region_ids().join(", "),
            listing(&record.os_versions),
            listing(&record.latest_os),
            technologies,
        ))
    }

    /// The document as loaded, indented.
    pub fn to_pretty_json(&self) -> Result<String, DomainError> {
        Ok(serde_json::to_string_pretty(&self.raw)?)
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Comma-separated rendering of a scalar or list.
fn listing(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(text).collect::<Vec<_>>().join(", "),
        other => text(other),
    }
}
