use serde::{Deserialize, Serialize};

/// Registry lifecycle state. Not consulted by the matching algorithm:
/// a revoked record still matches (see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Active,
    Revoked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    pub id: String,
    /// Issuing authority's identifier (USN / register number / roll number).
    pub certificate_id: String,
    pub student_name: String,
    pub degree_name: String,
    pub institution: String,
    pub graduation_year: i32,
    pub issue_date: String,
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_marks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_status: Option<String>,
}

impl CertificateRecord {
    pub fn new(
        certificate_id: &str,
        student_name: &str,
        degree_name: &str,
        institution: &str,
        graduation_year: i32,
        issue_date: &str,
    ) -> Self {
        let id = uuid::Uuid::new_v4().to_string();

        Self {
            id,
            certificate_id: certificate_id.to_string(),
            student_name: student_name.to_string(),
            degree_name: degree_name.to_string(),
            institution: institution.to_string(),
            graduation_year,
            issue_date: issue_date.to_string(),
            status: RecordStatus::Active,
            semester: None,
            total_marks: None,
            result_status: None,
        }
    }

    /// A record with a blank identifier or name can never satisfy the
    /// matching predicate. Such records are stored, just unmatchable.
    pub fn is_matchable(&self) -> bool {
        !self.certificate_id.trim().is_empty() && !self.student_name.trim().is_empty()
    }
}
