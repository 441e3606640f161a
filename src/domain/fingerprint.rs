use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::input::{InputDocument, RequiredField};

/// Separates fingerprint components so "AB"+"C" and "A"+"BC" differ.
const SEPARATOR: char = '\u{1f}';

/// Which parts of a request identify it for caching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintRule {
    /// Hardware, software and region only, each as JSON so `42` and `"42"` differ.
    #[default]
    Relation,
    /// Hardware plus the whole input document.
    FullInput,
}

/// SHA-256 digest identifying a validation request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(input: &InputDocument, rule: FingerprintRule) -> Self {
        let material = match rule {
            FingerprintRule::Relation => format!(
                "{}{SEPARATOR}{}{SEPARATOR}{}",
                input.value(RequiredField::Hardware),
                input.value(RequiredField::Software),
                input.value(RequiredField::Region)
            ),
            FingerprintRule::FullInput => {
                format!("{}{SEPARATOR}{}", input.value(RequiredField::Hardware), input.canonical_json())
            }
        };
        Self::digest(material.as_bytes())
    }

    fn digest(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
