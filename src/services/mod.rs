//! Services Layer
//!
//! This module contains the editor's submit flows and the job status poller.
//! Services talk to the backend only through the domain traits.

pub mod editor_service;
pub mod status_poller;

// Re-export for convenience
pub use editor_service::{EditorService, SubmitOutcome, save_error_message};
pub use status_poller::{PollHandle, PollOutcome, PollSettings, StatusPoller};
