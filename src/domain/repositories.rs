//! Collaborator trait definitions
//!
//! These traits define the contract for the records-editor backend and the
//! UI side effects. Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use crate::models::{Callout, CreatedJob, JobStatus, Record};

/// Records-editor backend
#[async_trait]
pub trait RecordsEditorApi: Send + Sync {
    /// Fetch the editable record for an instance/authority/holdings id
    async fn fetch_record(&self, external_id: &str) -> Result<Record, DomainError>;

    /// Save an edited record (PUT)
    async fn update_record(&self, record: &Record) -> Result<(), DomainError>;

    /// Create a record from a duplicate (POST); returns the job to poll
    async fn create_record(&self, record: &Record) -> Result<CreatedJob, DomainError>;

    /// Status of a creation job
    async fn record_status(&self, qm_record_id: &str) -> Result<JobStatus, DomainError>;
}

/// Fire-and-forget sink for user-visible messages
pub trait Notifier: Send + Sync {
    fn notify(&self, callout: Callout);
}

/// Requests a redirect; how it happens is up to the host
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str, search: Option<&str>);
}
