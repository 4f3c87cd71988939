use serde::{Deserialize, Serialize};

/// Structured output of the AI vision collaborator.
///
/// `is_academic_certificate`, `student_name` and `certificate_id` are the
/// only fields the collaborator must supply; deserialization fails without
/// them and the analyzer surfaces that as an extraction failure. The rest
/// are best-effort OCR and may be absent or empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDocument {
    pub is_academic_certificate: bool,
    /// Full name as printed. May be empty when OCR found nothing.
    pub student_name: String,
    /// Clean alphanumeric USN / register number, without labels.
    pub certificate_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub tampering_detected: bool,
    /// Severity 0-100. Scores below the decision threshold are suppressed
    /// from the final verdict.
    #[serde(default)]
    pub tampering_score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forensic_notes: Option<String>,
}
