use crate::domain::{CertificateRecord, RecordStatus};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Request to verify a result-sheet photo
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// Base64-encoded image content
    pub content: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub mime_type: String,
}

/// Payload for creating one registry record. Server fills in whatever the
/// admin form left out.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecordRequest {
    pub certificate_id: String,
    pub student_name: String,
    #[serde(default)]
    pub degree_name: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub status: Option<RecordStatus>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub total_marks: Option<String>,
    #[serde(default)]
    pub result_status: Option<String>,
}

impl NewRecordRequest {
    pub fn into_record(self) -> CertificateRecord {
        let year = self
            .graduation_year
            .unwrap_or_else(|| chrono::Utc::now().year());

        let mut record = CertificateRecord::new(
            &self.certificate_id,
            &self.student_name,
            self.degree_name.as_deref().unwrap_or("University Result"),
            self.institution.as_deref().unwrap_or("University"),
            year,
            self.issue_date.as_deref().unwrap_or(""),
        );
        if let Some(status) = self.status {
            record.status = status;
        }
        record.semester = self.semester;
        record.total_marks = self.total_marks;
        record.result_status = self.result_status;
        record
    }
}

/// Response for a bulk CSV import
#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub imported: usize,
}

/// Error body for every failure route
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
