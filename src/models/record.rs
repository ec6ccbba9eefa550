//! Wire format of a quickMARC record as exchanged with the records-editor API

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Kind of MARC record being edited. Selects the fixed-field layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarcType {
    Bibliographic,
    Authority,
    Holdings,
}

impl MarcType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarcType::Bibliographic => "bibliographic",
            MarcType::Authority => "authority",
            MarcType::Holdings => "holdings",
        }
    }
}

impl fmt::Display for MarcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarcType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bib" | "bibliographic" => Ok(MarcType::Bibliographic),
            "authority" => Ok(MarcType::Authority),
            "holdings" => Ok(MarcType::Holdings),
            other => Err(format!("unknown MARC type '{}'", other)),
        }
    }
}

/// Value of one fixed-field subfield: a single value or one entry per byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubfieldValue {
    Single(String),
    Bytes(Vec<String>),
}

impl SubfieldValue {
    /// True when nothing has been entered for this subfield
    pub fn is_blank(&self) -> bool {
        match self {
            SubfieldValue::Single(s) => s.is_empty(),
            SubfieldValue::Bytes(bytes) => bytes.iter().all(|b| b.is_empty()),
        }
    }
}

/// Field content. Control fields rendered through the byte editor carry a
/// structured mapping of subfield name to value; everything else is text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Fixed(BTreeMap<String, SubfieldValue>),
}

impl Content {
    pub fn text(value: impl Into<String>) -> Self {
        Content::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(s) => Some(s),
            Content::Fixed(_) => None,
        }
    }

    pub fn as_fixed(&self) -> Option<&BTreeMap<String, SubfieldValue>> {
        match self {
            Content::Text(_) => None,
            Content::Fixed(map) => Some(map),
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Content::Fixed(_))
    }
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

/// One tagged field of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub tag: String,
    #[serde(default)]
    pub content: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicators: Option<Vec<String>>,
}

impl Field {
    pub fn new(tag: impl Into<String>, content: Content) -> Self {
        Self {
            id: None,
            tag: tag.into(),
            content,
            indicators: None,
        }
    }

    pub fn with_indicators(mut self, first: &str, second: &str) -> Self {
        self.indicators = Some(vec![first.to_string(), second.to_string()]);
        self
    }
}

/// Processing state of an existing record, shown in the record info line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordState {
    New,
    InProgress,
    Actual,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedBy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_state: Option<RecordState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UpdatedBy>,
}

/// Record-level attributes other than the leader and fields. Carried through
/// the editor untouched so a save sends back what was fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_record_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_record_dto_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marc_format: Option<MarcType>,
    #[serde(default)]
    pub suppress_discovery: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_record_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_info: Option<UpdateInfo>,
}

/// A MARC record in the shape the save API expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub leader: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(leader: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            meta: RecordMeta::default(),
            leader: leader.into(),
            fields,
        }
    }

    /// First field carrying `tag`
    pub fn field(&self, tag: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag == tag)
    }
}
