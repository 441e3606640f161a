use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::domain::DomainError;

/// Keys every input document must carry, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    Hardware,
    Software,
    Region,
    OsVersion,
    WiFi,
    Nfc,
    Bluetooth,
    Sim,
    Network,
}

impl RequiredField {
    /// All required fields in declaration order.
    pub const ALL: [RequiredField; 9] = [
        RequiredField::Hardware,
        RequiredField::Software,
        RequiredField::Region,
        RequiredField::OsVersion,
        RequiredField::WiFi,
        RequiredField::Nfc,
        RequiredField::Bluetooth,
        RequiredField::Sim,
        RequiredField::Network,
    ];

    /// The JSON key used for this field in input documents.
    pub fn key(&self) -> &'static str {
        match self {
            RequiredField::Hardware => "Hardware",
            RequiredField::Software => "Software",
            RequiredField::Region => "Regiao_Execucao",
            RequiredField::OsVersion => "Versao_Android",
            RequiredField::WiFi => "WiFi",
            RequiredField::Nfc => "NFC",
            RequiredField::Bluetooth => "Bluetooth",
            RequiredField::Sim => "SIM",
            RequiredField::Network => "Rede",
        }
    }
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Check that every required field is present.
///
/// Reports only the first missing field, in declaration order.
pub fn validate_structure(document: &Map<String, Value>) -> Result<(), DomainError> {
    match RequiredField::ALL
        .iter()
        .find(|field| !document.contains_key(field.key()))
    {
        Some(field) => Err(DomainError::MissingField(*field)),
        None => Ok(()),
    }
}

/// A structurally valid input document.
#[derive(Debug, Clone, PartialEq)]
pub struct InputDocument {
    fields: Map<String, Value>,
    hardware: String,
    software: String,
    region: String,
}

impl InputDocument {
    /// Parse and structurally validate an input document.
    pub fn parse(content: &str) -> Result<Self, DomainError> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| DomainError::InputLoad(e.to_string()))?;
        match value {
            Value::Object(fields) => Self::from_map(fields),
            other => Err(DomainError::InputLoad(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Validate an already parsed JSON object.
    pub fn from_map(fields: Map<String, Value>) -> Result<Self, DomainError> {
        validate_structure(&fields)?;

        let hardware = identifier(&fields[RequiredField::Hardware.key()]);
        let software = identifier(&fields[RequiredField::Software.key()]);
        let region = identifier(&fields[RequiredField::Region.key()]);

        Ok(Self {
            fields,
            hardware,
            software,
            region,
        })
    }

    pub fn hardware(&self) -> &str {
        &self.hardware
    }

    pub fn software(&self) -> &str {
        &self.software
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// The raw JSON value of a required field.
    ///
    /// Relation checks compare these, so `42` and `"42"` stay distinct.
    pub fn value(&self, field: RequiredField) -> &Value {
        // present: checked by validate_structure on construction
        self.fields.get(field.key()).unwrap_or(&Value::Null)
    }

    /// Compact JSON with sorted top-level keys.
    pub fn canonical_json(&self) -> String {
        let sorted: BTreeMap<&String, &Value> = self.fields.iter().collect();
        serde_json::to_string(&sorted).unwrap_or_default()
    }

    /// Indented JSON for prompts and display.
    pub fn to_pretty_json(&self) -> Result<String, DomainError> {
        Ok(serde_json::to_string_pretty(&self.fields)?)
    }
}

/// Display text of an identifier: strings as-is, anything else as JSON.
fn identifier(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete() -> Map<String, Value> {
        match json!({
            "Hardware": "HW1",
            "Software": "S1",
            "Regiao_Execucao": "EU",
            "Versao_Android": "14",
            "WiFi": "2.4GHz",
            "NFC": true,
            "Bluetooth": "5.0",
            "SIM": "Dual",
            "Rede": "5G"
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_complete_document_passes() {
        assert!(validate_structure(&complete()).is_ok());
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        for field in RequiredField::ALL {
            let mut doc = complete();
            doc.remove(field.key());
            match validate_structure(&doc) {
                Err(DomainError::MissingField(missing)) => assert_eq!(missing, field),
                other => panic!("expected missing {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_only_first_missing_field_reported() {
        let mut doc = complete();
        doc.remove("SIM");
        doc.remove("Software");
        assert!(matches!(
            validate_structure(&doc),
            Err(DomainError::MissingField(RequiredField::Software))
        ));
    }

    #[test]
    fn test_parse_extracts_identifiers() {
        let doc = InputDocument::parse(&Value::Object(complete()).to_string()).unwrap();
        assert_eq!(doc.hardware(), "HW1");
        assert_eq!(doc.software(), "S1");
        assert_eq!(doc.region(), "EU");
    }

    #[test]
    fn test_non_string_identifier_uses_json_text() {
        let mut doc = complete();
        doc.insert("Software".to_string(), json!(42));
        let doc = InputDocument::from_map(doc).unwrap();
        assert_eq!(doc.software(), "42");
        assert_eq!(doc.value(RequiredField::Software), &json!(42));
        assert_eq!(doc.value(RequiredField::Region), &json!("EU"));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(matches!(
            InputDocument::parse("[1, 2]"),
            Err(DomainError::InputLoad(_))
        ));
        assert!(matches!(
            InputDocument::parse("{not json"),
            Err(DomainError::InputLoad(_))
        ));
    }

    #[test]
    fn test_canonical_json_is_key_sorted() {
        let a = InputDocument::parse(&Value::Object(complete()).to_string()).unwrap();
        let json = a.canonical_json();
        assert!(json.find("\"Bluetooth\"").unwrap() < json.find("\"WiFi\"").unwrap());
    }
}
