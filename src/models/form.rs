//! Editor-side representation of a record: one row per displayed line

use serde::{Deserialize, Serialize};

use super::record::{Content, RecordMeta};

/// Reserved tag (and id) of the synthetic leader row
pub const LEADER_TAG: &str = "LDR";

/// Placeholder the editor uses for a blank indicator or fixed-field byte
pub const BLANK: &str = "\\";

/// One editable line of the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub tag: String,
    #[serde(default)]
    pub content: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicators: Option<Vec<String>>,
}

impl Row {
    pub fn is_leader(&self) -> bool {
        self.tag == LEADER_TAG
    }

    /// Control fields are `00X` tags; they never carry indicators.
    pub fn is_control_field(&self) -> bool {
        self.is_leader() || (self.tag.len() == 3 && self.tag.starts_with("00"))
    }
}

/// Row list plus the record attributes the form does not edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarcForm {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub rows: Vec<Row>,
}

impl MarcForm {
    pub fn leader(&self) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.is_leader())
            .and_then(|r| r.content.as_text())
    }
}
