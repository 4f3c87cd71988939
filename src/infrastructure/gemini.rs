use crate::domain::ExtractedDocument;
use async_trait::async_trait;
use base64::Engine;
use serde_json::{json, Value};
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT_SECS: u64 = 30;

const FORENSIC_PROMPT: &str = "Act as a forensic document expert. Analyze this document to determine if it is an academic result sheet, degree certificate, or marks card.

1. Document Type Verification:
   - Determine if the document is an academic credential. If it is an ID card (like Aadhaar, PAN, etc.), personal letter, or unrelated document, set isAcademicCertificate to false.

2. OCR Extraction (STRICT RULES):
   - studentName: Full name as printed.
   - certificateId: The unique identifier (USN, Register Number, or Roll No). CRITICAL: Return ONLY the alphanumeric code. Do NOT include labels like \"USN:\", \"Reg No:\", or spaces. Example: \"4MW22CS183\".
   - institution: The university or college name.
   - graduationYear: The 4-digit year of examination or issue.

3. Forensic Check:
   - Evaluate text alignment, font consistency, and potential image manipulation around the student name and USN.

4. Return as a JSON object.";

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Extraction service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Extraction service returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("Extraction service returned an empty response")]
    EmptyResponse,

    #[error("Extraction service returned an unusable payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// The AI vision collaborator. Verification depends only on this trait;
/// integration tests substitute a canned implementation.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<ExtractedDocument, ExtractionError>;
}

pub struct GeminiAnalyzer {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiAnalyzer {
    pub fn new(
        api_key: String,
        model: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client,
        })
    }

    fn request_body(&self, image: &[u8], mime_type: &str) -> Value {
        let data = base64::engine::general_purpose::STANDARD.encode(image);

        json!({
            "contents": {
                "parts": [
                    { "inline_data": { "mime_type": mime_type, "data": data } },
                    { "text": FORENSIC_PROMPT }
                ]
            },
            "generationConfig": {
                "response_mime_type": "application/json",
                "response_schema": {
                    "type": "OBJECT",
                    "properties": {
                        "isAcademicCertificate": { "type": "BOOLEAN" },
                        "studentName": { "type": "STRING" },
                        "degreeName": { "type": "STRING" },
                        "institution": { "type": "STRING" },
                        "graduationYear": { "type": "NUMBER" },
                        "certificateId": { "type": "STRING" },
                        "tamperingDetected": { "type": "BOOLEAN" },
                        "tamperingScore": { "type": "NUMBER" },
                        "forensicNotes": { "type": "STRING" }
                    },
                    "required": ["isAcademicCertificate", "studentName", "certificateId"]
                }
            }
        })
    }
}

#[async_trait]
impl DocumentAnalyzer for GeminiAnalyzer {
    async fn analyze(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<ExtractedDocument, ExtractionError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        tracing::debug!(model = %self.model, image_bytes = image.len(), "Calling Gemini API");

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(image, mime_type))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(status = %status, "Gemini API returned an error status");
            return Err(ExtractionError::Status(status));
        }

        let body: Value = response.json().await?;

        // The model's JSON answer arrives as text inside the first candidate.
        let text = body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or(ExtractionError::EmptyResponse)?;

        let extracted: ExtractedDocument = serde_json::from_str(text)?;
        Ok(extracted)
    }
}
