use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutKind {
    Info,
    Success,
    Error,
}

/// A user-facing notification, identified by its translation key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Callout {
    pub kind: CalloutKind,
    pub message_id: String,
}

impl Callout {
    pub fn info(message_id: impl Into<String>) -> Self {
        Self {
            kind: CalloutKind::Info,
            message_id: message_id.into(),
        }
    }

    pub fn success(message_id: impl Into<String>) -> Self {
        Self {
            kind: CalloutKind::Success,
            message_id: message_id.into(),
        }
    }

    pub fn error(message_id: impl Into<String>) -> Self {
        Self {
            kind: CalloutKind::Error,
            message_id: message_id.into(),
        }
    }
}

// Translation keys surfaced by the save and status flows
pub const SAVE_SUCCESS_PROCESSING: &str = "ui-quick-marc.record.save.success.processing";
pub const SAVE_ERROR_GENERIC: &str = "ui-quick-marc.record.save.error.generic";
pub const SAVE_ERROR_ILLEGAL_FIXED_LENGTH: &str =
    "ui-quick-marc.record.save.error.illegalFixedLength";
pub const SAVE_NEW_ON_SAVE: &str = "ui-quick-marc.record.saveNew.onSave";
pub const SAVE_NEW_SUCCESS: &str = "ui-quick-marc.record.saveNew.success";
pub const SAVE_NEW_ERROR: &str = "ui-quick-marc.record.saveNew.error";
pub const SAVE_NEW_DELAY: &str = "ui-quick-marc.record.saveNew.delay";
