//! One-line summary of a loaded record: state, last update and who made it

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::record::RecordState;
use crate::models::{MarcType, Record};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordInfo {
    pub status: &'static str,
    pub updated_at: Option<DateTime<Utc>>,
    /// "Last, First" of the last editor, or "System"
    pub source: String,
    /// Authority records: tag of the 1XX heading
    pub heading_tag: Option<String>,
}

fn status_label(state: RecordState) -> &'static str {
    match state {
        RecordState::New => "New",
        RecordState::InProgress => "In progress",
        RecordState::Actual => "Current",
        RecordState::Error => "Error",
    }
}

impl RecordInfo {
    pub fn from_record(record: &Record, marc_type: MarcType) -> Self {
        let update_info = record.meta.update_info.as_ref();

        let status = update_info
            .and_then(|info| info.record_state)
            .map(status_label)
            .unwrap_or(status_label(RecordState::Actual));

        let updated_at = update_info
            .and_then(|info| info.update_date.as_deref())
            .and_then(|date| match DateTime::parse_from_rfc3339(date) {
                Ok(parsed) => Some(parsed.with_timezone(&Utc)),
                Err(e) => {
                    tracing::debug!("Ignoring unparsable update date '{}': {}", date, e);
                    None
                }
            });

        let source = update_info
            .and_then(|info| info.updated_by.as_ref())
            .and_then(|user| match (&user.last_name, &user.first_name) {
                (Some(last), Some(first)) => Some(format!("{}, {}", last, first)),
                (Some(last), None) => Some(last.clone()),
                _ => user.username.clone(),
            })
            .unwrap_or_else(|| "System".to_string());

        let heading_tag = match marc_type {
            MarcType::Authority => record
                .fields
                .iter()
                .find(|f| f.tag.starts_with('1') && f.tag.len() == 3)
                .map(|f| f.tag.clone()),
            _ => None,
        };

        Self {
            status,
            updated_at,
            source,
            heading_tag,
        }
    }

    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(tag) = &self.heading_tag {
            parts.push(format!("Heading {}", tag));
        }
        parts.push(format!("Status: {}", self.status));
        if let Some(updated_at) = self.updated_at {
            parts.push(format!(
                "Last updated: {}",
                updated_at.format("%Y-%m-%d %H:%M UTC")
            ));
        }
        parts.push(format!("Source: {}", self.source));
        parts.join(" • ")
    }
}
