pub mod extraction;
pub mod normalize;
pub mod record;

pub use extraction::ExtractedDocument;
pub use normalize::normalize;
pub use record::{CertificateRecord, RecordStatus};
