mod import;
mod registry;
mod types;
mod verify;

pub use import::{import_csv, ImportError};
pub use registry::{RegistryError, RegistryUseCase};
pub use types::{ErrorResponse, ImportResponse, NewRecordRequest, VerifyRequest};
pub use verify::{
    decide, find_match, VerificationResult, VerifyError, VerifyUseCase, TAMPERING_SCORE_THRESHOLD,
};
