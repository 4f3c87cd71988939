use crate::domain::{normalize, CertificateRecord, ExtractedDocument};
use crate::infrastructure::database::RecordRepository;
use crate::infrastructure::gemini::{DocumentAnalyzer, ExtractionError};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Tampering signals below this severity are suppressed from the final
/// verdict even when the raw flag is set. The threshold is inclusive.
pub const TAMPERING_SCORE_THRESHOLD: f32 = 30.0;

const CONFIDENCE_GENUINE: u8 = 100;
const CONFIDENCE_MATCHED_TAMPERED: u8 = 45;
const CONFIDENCE_NO_MATCH: u8 = 0;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Document analysis failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Registry error: {0}")]
    Registry(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub is_genuine: bool,
    pub confidence_score: u8,
    pub detected_data: ExtractedDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_record: Option<CertificateRecord>,
    pub tampering_detected: bool,
    pub analysis_notes: String,
}

impl VerificationResult {
    /// Verdict for documents the collaborator did not recognize as an
    /// academic credential. The registry is never consulted for these.
    pub fn non_academic(detected: ExtractedDocument) -> Self {
        Self {
            is_genuine: false,
            confidence_score: 0,
            detected_data: detected,
            matched_record: None,
            tampering_detected: false,
            analysis_notes: "This document does not appear to be an academic certificate \
                             or result sheet. It was identified as an unrelated document \
                             (e.g., ID card, personal document)."
                .to_string(),
        }
    }
}

/// Linear scan over the registry in list order (newest first); the first
/// record satisfying both predicates wins, silently, even when normalized
/// identifiers collide.
///
/// The identifier must match exactly after normalization and must be
/// non-empty: absent OCR data never matches every record. The name check is
/// deliberately lenient, substring containment in either direction, so OCR
/// truncation ("Mohammed" vs "Mohammed Ali") still matches; an empty
/// extracted name therefore matches any record, by design.
pub fn find_match<'a>(
    records: &'a [CertificateRecord],
    extracted_id: &str,
    extracted_name: &str,
) -> Option<&'a CertificateRecord> {
    let id_norm = normalize(Some(extracted_id));
    let name_norm = normalize(Some(extracted_name));

    records.iter().find(|record| {
        let db_id_norm = normalize(Some(&record.certificate_id));
        let db_name_norm = normalize(Some(&record.student_name));

        let id_match = db_id_norm == id_norm && !id_norm.is_empty();
        let name_match = db_name_norm.contains(&name_norm) || name_norm.contains(&db_name_norm);

        id_match && name_match
    })
}

/// Combine the extraction signals and the lookup outcome into a verdict.
pub fn decide(
    extracted: ExtractedDocument,
    matched: Option<CertificateRecord>,
) -> VerificationResult {
    if !extracted.is_academic_certificate {
        return VerificationResult::non_academic(extracted);
    }

    let tampering_flag =
        extracted.tampering_detected && extracted.tampering_score >= TAMPERING_SCORE_THRESHOLD;

    let is_genuine = matched.is_some() && !tampering_flag;

    let confidence_score = if is_genuine {
        CONFIDENCE_GENUINE
    } else if matched.is_some() {
        CONFIDENCE_MATCHED_TAMPERED
    } else {
        CONFIDENCE_NO_MATCH
    };

    let analysis_notes = match extracted.forensic_notes.as_deref() {
        Some(notes) if !notes.is_empty() => notes.to_string(),
        _ if matched.is_some() => "Record found in registry.".to_string(),
        _ => "No matching record found in university database.".to_string(),
    };

    VerificationResult {
        is_genuine,
        confidence_score,
        matched_record: matched,
        tampering_detected: tampering_flag,
        analysis_notes,
        detected_data: extracted,
    }
}

pub struct VerifyUseCase {
    repository: Arc<Mutex<Box<dyn RecordRepository>>>,
    analyzer: Arc<dyn DocumentAnalyzer>,
}

impl VerifyUseCase {
    pub fn new(
        repository: Arc<Mutex<Box<dyn RecordRepository>>>,
        analyzer: Arc<dyn DocumentAnalyzer>,
    ) -> Self {
        Self {
            repository,
            analyzer,
        }
    }

    /// One sequential verification pipeline: analyze the image, then match
    /// the extracted fields against a registry snapshot, then decide.
    /// Extraction failure means no verdict at all; callers surface it as a
    /// retryable error, distinct from a "no match" verdict.
    pub async fn execute(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<VerificationResult, VerifyError> {
        let extracted = self.analyzer.analyze(image, mime_type).await?;

        if !extracted.is_academic_certificate {
            tracing::info!("Document rejected: not an academic credential");
            return Ok(VerificationResult::non_academic(extracted));
        }

        // Snapshot the registry; the lock never spans the analyze await.
        let records = {
            let repo = self
                .repository
                .lock()
                .map_err(|_| VerifyError::Registry("registry lock poisoned".to_string()))?;
            repo.list().map_err(|e| VerifyError::Registry(e.to_string()))?
        };

        let matched =
            find_match(&records, &extracted.certificate_id, &extracted.student_name).cloned();

        tracing::info!(
            certificate_id = %extracted.certificate_id,
            matched = matched.is_some(),
            "Verification decision"
        );

        Ok(decide(extracted, matched))
    }
}
