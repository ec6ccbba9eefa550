//! Editor Service - the submit flows behind the quickMARC form
//!
//! Every path ends in exactly one outcome and at least one callout; nothing
//! is returned as an error past this layer except from `load`.

use std::sync::Arc;

use super::status_poller::{DEFAULT_VIEW_PATH, PollHandle, PollSettings, StatusPoller};
use crate::domain::{DomainError, Navigator, Notifier, RecordsEditorApi};
use crate::models::callout::{
    SAVE_ERROR_GENERIC, SAVE_ERROR_ILLEGAL_FIXED_LENGTH, SAVE_NEW_ON_SAVE, SAVE_SUCCESS_PROCESSING,
};
use crate::models::{Callout, MarcForm, MarcType, Record, Row};
use crate::modules::quick_marc::{
    FixedFieldError, ValidationError, autopopulate_indicators, autopopulate_subfields,
    clean_bytes_fields, dehydrate, hydrate, remove_fields_for_duplicate, validate_record,
};

/// Version sent with a duplicate: it starts a new record
const DUPLICATE_RECORD_VERSION: &str = "1";
const AUTHORITY_VIEW_PATH: &str = "/marc-authorities/authorities";

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Edit accepted; the backend processes it asynchronously
    Saved,
    /// Duplicate accepted; `poll` tracks the creation job
    Creating { qm_record_id: String, poll: PollHandle },
    /// Local validation failed; nothing was sent and the form is kept
    Invalid(ValidationError),
    /// The form could not be turned into a record (fixed-field width, missing leader)
    Malformed(String),
    /// The backend refused the save
    Rejected(DomainError),
}

/// Message shown when a save is refused
pub fn save_error_message(error: &DomainError) -> &'static str {
    if error.is_illegal_fixed_length() {
        SAVE_ERROR_ILLEGAL_FIXED_LENGTH
    } else {
        SAVE_ERROR_GENERIC
    }
}

fn view_path(marc_type: MarcType) -> &'static str {
    match marc_type {
        MarcType::Authority => AUTHORITY_VIEW_PATH,
        MarcType::Bibliographic | MarcType::Holdings => DEFAULT_VIEW_PATH,
    }
}

#[derive(Clone)]
pub struct EditorService {
    api: Arc<dyn RecordsEditorApi>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    poll_settings: PollSettings,
}

impl EditorService {
    pub fn new(
        api: Arc<dyn RecordsEditorApi>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        poll_settings: PollSettings,
    ) -> Self {
        Self {
            api,
            notifier,
            navigator,
            poll_settings,
        }
    }

    /// Fetch a record and turn it into form rows. The fetched record is kept
    /// as the reference for validation and autopopulation.
    pub async fn load(&self, external_id: &str) -> Result<(Record, MarcForm), DomainError> {
        let record = self.api.fetch_record(external_id).await?;
        let form = dehydrate(&record);
        tracing::info!("Loaded record {} with {} rows", external_id, form.rows.len());
        Ok((record, form))
    }

    /// Indicators, subfields, then packing of the byte fields
    fn prepare(
        &self,
        rows: &[Row],
        initial: &Record,
        marc_type: MarcType,
    ) -> Result<Vec<Row>, FixedFieldError> {
        let rows = autopopulate_indicators(rows);
        let rows = autopopulate_subfields(&rows, Some(initial), marc_type);
        clean_bytes_fields(&rows, marc_type)
    }

    fn malformed(&self, error: impl std::fmt::Display, message_id: &str) -> SubmitOutcome {
        tracing::error!("Refusing to submit malformed record: {}", error);
        self.notifier.notify(Callout::error(message_id));
        SubmitOutcome::Malformed(error.to_string())
    }

    fn invalid(&self, error: ValidationError) -> SubmitOutcome {
        tracing::info!("Record failed validation: {}", error);
        self.notifier.notify(Callout::error(error.message_id()));
        SubmitOutcome::Invalid(error)
    }

    fn rejected(&self, error: DomainError) -> SubmitOutcome {
        tracing::warn!("Save rejected: {}", error);
        self.notifier.notify(Callout::error(save_error_message(&error)));
        SubmitOutcome::Rejected(error)
    }

    /// Save changes to an existing record (PUT)
    pub async fn submit_edit(
        &self,
        form: &MarcForm,
        initial: &Record,
        marc_type: MarcType,
        related_record_version: Option<String>,
    ) -> SubmitOutcome {
        if let Some(error) = validate_record(&form.rows, Some(initial), marc_type) {
            return self.invalid(error);
        }

        let rows = match self.prepare(&form.rows, initial, marc_type) {
            Ok(rows) => rows,
            Err(e) => return self.malformed(e, SAVE_ERROR_ILLEGAL_FIXED_LENGTH),
        };

        let mut record = match hydrate(&MarcForm {
            meta: form.meta.clone(),
            rows,
        }) {
            Ok(record) => record,
            Err(e) => return self.malformed(e, SAVE_ERROR_GENERIC),
        };
        record.meta.related_record_version = related_record_version;

        match self.api.update_record(&record).await {
            Ok(()) => {
                tracing::info!("Record {:?} saved", record.meta.external_id);
                self.notifier.notify(Callout::info(SAVE_SUCCESS_PROCESSING));
                SubmitOutcome::Saved
            }
            Err(e) => self.rejected(e),
        }
    }

    /// Create a new record from an edited copy (POST), then poll the job
    pub async fn submit_duplicate(
        &self,
        form: &MarcForm,
        initial: &Record,
        marc_type: MarcType,
        search: Option<&str>,
    ) -> SubmitOutcome {
        let rows = remove_fields_for_duplicate(&form.rows);

        let rows = match self.prepare(&rows, initial, marc_type) {
            Ok(rows) => rows,
            Err(e) => return self.malformed(e, SAVE_ERROR_ILLEGAL_FIXED_LENGTH),
        };

        if let Some(error) = validate_record(&rows, Some(initial), marc_type) {
            return self.invalid(error);
        }

        self.notifier.notify(Callout::info(SAVE_NEW_ON_SAVE));

        let mut record = match hydrate(&MarcForm {
            meta: form.meta.clone(),
            rows,
        }) {
            Ok(record) => record,
            Err(e) => return self.malformed(e, SAVE_ERROR_GENERIC),
        };
        record.meta.related_record_version = Some(DUPLICATE_RECORD_VERSION.to_string());

        let job = match self.api.create_record(&record).await {
            Ok(job) => job,
            Err(e) => return self.rejected(e),
        };

        tracing::info!("Duplicate accepted as job {}", job.qm_record_id);
        let view_path = view_path(marc_type);
        self.navigator.navigate(&format!("{}/id", view_path), search);

        let poll = StatusPoller::new(
            self.api.clone(),
            self.notifier.clone(),
            self.navigator.clone(),
            self.poll_settings,
            job.qm_record_id.clone(),
        )
        .view_path(view_path)
        .search(search.map(String::from))
        .spawn();

        SubmitOutcome::Creating {
            qm_record_id: job.qm_record_id,
            poll,
        }
    }
}
