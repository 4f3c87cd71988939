use crate::domain::CertificateRecord;
use crate::infrastructure::database::{DatabaseError, RecordRepository};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Record not found")]
    NotFound,

    #[error("Registry error: {0}")]
    Storage(String),
}

/// Create / list / delete over the record repository. Creation is
/// deliberately permissive: a record with a blank identifier or name is
/// accepted and stored, it just never matches during verification.
pub struct RegistryUseCase {
    repository: Arc<Mutex<Box<dyn RecordRepository>>>,
}

impl RegistryUseCase {
    pub fn new(repository: Arc<Mutex<Box<dyn RecordRepository>>>) -> Self {
        Self { repository }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Box<dyn RecordRepository>>, RegistryError> {
        self.repository
            .lock()
            .map_err(|_| RegistryError::Storage("registry lock poisoned".to_string()))
    }

    pub fn list(&self) -> Result<Vec<CertificateRecord>, RegistryError> {
        self.lock()?
            .list()
            .map_err(|e| RegistryError::Storage(e.to_string()))
    }

    pub fn add(&self, record: CertificateRecord) -> Result<CertificateRecord, RegistryError> {
        if !record.is_matchable() {
            tracing::warn!(id = %record.id, "Record has a blank identifier or name and will never match");
        }

        self.lock()?
            .save(&record)
            .map_err(|e| RegistryError::Storage(e.to_string()))?;

        tracing::info!(id = %record.id, certificate_id = %record.certificate_id, "Record added");
        Ok(record)
    }

    /// Store a batch of imported records; returns how many were saved.
    pub fn add_all(&self, records: Vec<CertificateRecord>) -> Result<usize, RegistryError> {
        let repo = self.lock()?;
        let mut saved = 0;
        for record in &records {
            repo.save(record)
                .map_err(|e| RegistryError::Storage(e.to_string()))?;
            saved += 1;
        }

        tracing::info!(count = saved, "Bulk import stored");
        Ok(saved)
    }

    pub fn remove(&self, id: &str) -> Result<(), RegistryError> {
        self.lock()?.delete(id).map_err(|e| {
            if e.downcast_ref::<DatabaseError>()
                .map(|d| matches!(d, DatabaseError::NotFound))
                .unwrap_or(false)
            {
                RegistryError::NotFound
            } else {
                RegistryError::Storage(e.to_string())
            }
        })
    }

    pub fn count(&self) -> Result<usize, RegistryError> {
        self.lock()?
            .count()
            .map_err(|e| RegistryError::Storage(e.to_string()))
    }
}
