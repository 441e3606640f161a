use std::time::Duration;

use crate::domain::feedback::FeedbackKind;

/// A single request to the remote analysis model.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

const VALIDATION_SYSTEM: &str = r#"You are a technical validator. MANDATORY output format:

RESULTS:
- HARDWARE: PASS/FAIL [input value]
- SOFTWARE: PASS/FAIL [input value]
- SOFTWARE_REGION_RELATION: PASS/FAIL [Software/Region]
  -> If 'Regioes' is a mapping: FAIL if the software is not listed for the region
  -> If 'Regioes' is a list: FAIL if the region does not exist
- OS_VERSION: PASS/FAIL [input value]
- WIFI: PASS/FAIL [input value]
- NFC: PASS/FAIL [input value]
- BLUETOOTH: PASS/FAIL [input value]
- SIM: PASS/FAIL [input value]
- NETWORK: PASS/FAIL [input value]

STRICT RULES:
1. For SOFTWARE_REGION_RELATION:
   - Case 1: if 'Regioes' is a mapping {region: [software]}, the software must be listed under the input region.
   - Case 2: if 'Regioes' is a list [regions], the input region must be in the list.
2. For technologies (WiFi, NFC, Bluetooth, SIM, Network): compare the quoted values exactly.
   Example: input 2.4GHz against a database option 2.4GHZ is a PASS.
3. Always show the expected database value on FAIL.
4. For Bluetooth:
   - If the database value ends with '+' (e.g. "5.0+"), equal or higher versions PASS.
   - Otherwise compare exactly."#;

const VALIDATION_INSTRUCTIONS: &str = "INSTRUCTIONS:
1. Check every input field against the database
2. Be strict in comparisons
3. Show the real database values on FAIL";

const CHAT_SYSTEM: &str = "You are a technical specialist. Answer the question using the data provided. \
Be concise and technical. Use bullet points when helpful.";

/// Greeting shown when a chat session opens.
pub const CHAT_GREETING: &str = "Hello! I am a technical assistant backed by the capability database.
You can ask about:
- Hardware/software compatibility
- Technical specifications
- Configuration analysis

Example: 'Is Hardware_A compatible with Android 14?'";

/// Field-by-field PASS/FAIL analysis of an input against a hardware excerpt.
pub fn validation_request(excerpt: &str, input_json: &str, timeout: Duration) -> AnalysisRequest {
    AnalysisRequest {
        system: VALIDATION_SYSTEM.to_string(),
        user: format!(
            "Data for analysis:\n\nDATABASE:\n{excerpt}\n\nINPUT:\n{input_json}\n\n{VALIDATION_INSTRUCTIONS}"
        ),
        temperature: 0.0,
        max_tokens: 800,
        timeout,
    }
}

/// User feedback on a previous report.
pub fn feedback_request(
    kind: FeedbackKind,
    original_result: &str,
    feedback: &str,
    timeout: Duration,
) -> AnalysisRequest {
    let label = kind.label();
    AnalysisRequest {
        system: format!(
            "You are receiving feedback about a technical validation ({label}). \
             Analyse it carefully and answer concisely."
        ),
        user: format!(
            "FEEDBACK TYPE: {label}\n\nORIGINAL RESULT:\n{original_result}\n\n\
             USER FEEDBACK:\n{feedback}\n\nPlease answer concisely and helpfully."
        ),
        temperature: 0.3,
        max_tokens: 300,
        timeout,
    }
}

/// Free-form question over the whole database.
pub fn chat_request(database_json: &str, question: &str, timeout: Duration) -> AnalysisRequest {
    AnalysisRequest {
        system: CHAT_SYSTEM.to_string(),
        user: format!(
            "Technical database (JSON):\n{database_json}\n\n\
             User question:\n{question}\n\n\
             Instructions:\n1. Analyse the technical data\n2. Answer precisely\n3. Highlight relevant values"
        ),
        temperature: 0.3,
        max_tokens: 1000,
        timeout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_request_embeds_data() {
        let req = validation_request("Hardware: HW1", "{\"Hardware\": \"HW1\"}", Duration::from_secs(60));
        assert!(req.user.contains("DATABASE:\nHardware: HW1"));
        assert!(req.user.contains("INPUT:\n{\"Hardware\": \"HW1\"}"));
        assert_eq!(req.temperature, 0.0);
        assert_eq!(req.max_tokens, 800);
        assert_eq!(req.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_feedback_request_uses_kind_label() {
        let req = feedback_request(
            FeedbackKind::Question,
            "RESULTS: ...",
            "why FAIL?",
            Duration::from_secs(30),
        );
        assert!(req.system.contains("Question about the result"));
        assert!(req.user.contains("USER FEEDBACK:\nwhy FAIL?"));
        assert_eq!(req.max_tokens, 300);
    }

    #[test]
    fn test_chat_request_parameters() {
        let req = chat_request("{}", "Which hardware supports NFC?", Duration::from_secs(30));
        assert!(req.user.contains("Which hardware supports NFC?"));
        assert_eq!(req.max_tokens, 1000);
        assert!((req.temperature - 0.3).abs() < f32::EPSILON);
    }
}
