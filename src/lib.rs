pub mod application;
pub mod domain;
pub mod handlers;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{decide, find_match, RegistryUseCase, VerificationResult, VerifyUseCase};
pub use domain::{normalize, CertificateRecord, ExtractedDocument, RecordStatus};
pub use infrastructure::database::{RecordRepository, SqliteRepository};
pub use infrastructure::gemini::{DocumentAnalyzer, ExtractionError, GeminiAnalyzer};
