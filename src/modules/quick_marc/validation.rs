//! Structural checks run before a record is sent to the backend

use std::fmt;

use super::rows::TITLE_TAG;
use crate::models::{MarcType, Record, Row};

pub const LEADER_LENGTH: usize = 24;

/// Position of the leader `Type` byte
const LEADER_TYPE_POSITION: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    TitleEmpty,
    TitleMultiple,
    LeaderLength,
    LeaderForbiddenBytes,
    TagLength,
}

impl ValidationError {
    /// Translation key shown to the cataloger
    pub fn message_id(&self) -> &'static str {
        match self {
            ValidationError::TitleEmpty => "ui-quick-marc.record.error.title.empty",
            ValidationError::TitleMultiple => "ui-quick-marc.record.error.title.multiple",
            ValidationError::LeaderLength => "ui-quick-marc.record.error.leader.length",
            ValidationError::LeaderForbiddenBytes => {
                "ui-quick-marc.record.error.leader.forbiddenBytes"
            }
            ValidationError::TagLength => "ui-quick-marc.record.error.tag.length",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message_id())
    }
}

impl std::error::Error for ValidationError {}

/// Exactly one 245 must be present
pub fn validate(rows: &[Row]) -> Option<ValidationError> {
    match rows.iter().filter(|row| row.tag == TITLE_TAG).count() {
        0 => Some(ValidationError::TitleEmpty),
        1 => None,
        _ => Some(ValidationError::TitleMultiple),
    }
}

/// Title rule first, then leader and tag shape. `initial` is the record the
/// form was loaded from; its leader type must not change.
pub fn validate_record(
    rows: &[Row],
    initial: Option<&Record>,
    marc_type: MarcType,
) -> Option<ValidationError> {
    if let Some(error) = validate(rows) {
        return Some(error);
    }

    let leader = rows
        .iter()
        .find(|row| row.is_leader())
        .and_then(|row| row.content.as_text())
        .unwrap_or_default();

    if leader.chars().count() != LEADER_LENGTH {
        return Some(ValidationError::LeaderLength);
    }

    if let Some(initial) = initial
        && initial.leader.chars().count() == LEADER_LENGTH
        && leader.chars().nth(LEADER_TYPE_POSITION)
            != initial.leader.chars().nth(LEADER_TYPE_POSITION)
    {
        tracing::debug!(
            "Leader type changed on {} record: '{}' -> '{}'",
            marc_type,
            initial.leader,
            leader
        );
        return Some(ValidationError::LeaderForbiddenBytes);
    }

    let bad_tag = rows
        .iter()
        .filter(|row| !row.is_leader())
        .any(|row| row.tag.len() != 3 || !row.tag.chars().all(|c| c.is_ascii_alphanumeric()));

    if bad_tag {
        return Some(ValidationError::TagLength);
    }

    None
}
