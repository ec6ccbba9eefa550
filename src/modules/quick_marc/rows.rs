//! Conversion between the wire record and the editor's row list, plus the
//! add/delete row actions.

use thiserror::Error;
use uuid::Uuid;

use crate::models::{BLANK, Content, Field, LEADER_TAG, MarcForm, Record, Row};

/// Control number; the backend owns it
pub const CONTROL_NUMBER_TAG: &str = "001";
pub const LATEST_TRANSACTION_TAG: &str = "005";
pub const TITLE_TAG: &str = "245";
/// System-managed terminal field
pub const TERMINAL_TAG: &str = "999";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    #[error("row index {index} is out of bounds ({len} rows)")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("cannot add a row after the {tag} row")]
    AddException { tag: String },
    #[error("the {tag} row cannot be deleted")]
    DeleteException { tag: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("form has no leader row")]
    MissingLeader,
    #[error("field {tag} still has structured content")]
    UnpackedContent { tag: String },
}

/// `999 ff` and friends: a 999 whose indicators are all set marks the
/// system-managed end of the record.
pub fn is_terminal(row: &Row) -> bool {
    row.tag == TERMINAL_TAG
        && row
            .indicators
            .as_ref()
            .is_some_and(|ind| !ind.is_empty() && ind.iter().all(|i| !i.is_empty() && i != BLANK))
}

pub fn is_read_only(row: &Row) -> bool {
    row.is_leader() || row.tag == CONTROL_NUMBER_TAG || is_terminal(row)
}

/// Rows after which no new row may be inserted. Currently the read-only rows.
pub fn has_add_exception(row: &Row) -> bool {
    is_read_only(row)
}

pub fn has_delete_exception(row: &Row) -> bool {
    is_read_only(row)
}

/// Record -> form. The leader becomes the first row; every field keeps its id
/// or gets a fresh one.
pub fn dehydrate(record: &Record) -> MarcForm {
    let leader_row = Row {
        id: LEADER_TAG.to_string(),
        tag: LEADER_TAG.to_string(),
        content: Content::text(record.leader.clone()),
        indicators: None,
    };

    let rows = std::iter::once(leader_row)
        .chain(record.fields.iter().map(|field| Row {
            id: field
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            tag: field.tag.clone(),
            content: field.content.clone(),
            indicators: field.indicators.clone(),
        }))
        .collect();

    MarcForm {
        meta: record.meta.clone(),
        rows,
    }
}

/// Form -> record. Every row must already carry text content.
pub fn hydrate(form: &MarcForm) -> Result<Record, TransformError> {
    let leader = form.leader().ok_or(TransformError::MissingLeader)?;

    let fields = form
        .rows
        .iter()
        .filter(|row| !row.is_leader())
        .map(|row| {
            if row.content.is_fixed() {
                return Err(TransformError::UnpackedContent {
                    tag: row.tag.clone(),
                });
            }
            Ok(Field {
                id: Some(row.id.clone()),
                tag: row.tag.clone(),
                content: row.content.clone(),
                indicators: row.indicators.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Record {
        meta: form.meta.clone(),
        leader: leader.to_string(),
        fields,
    })
}

pub fn blank_row() -> Row {
    Row {
        id: Uuid::new_v4().to_string(),
        tag: String::new(),
        content: Content::text("$a "),
        indicators: Some(vec![BLANK.to_string(), BLANK.to_string()]),
    }
}

/// Insert a blank row right after `index`
pub fn add_row(rows: &[Row], index: usize) -> Result<Vec<Row>, RowError> {
    let anchor = rows.get(index).ok_or(RowError::IndexOutOfBounds {
        index,
        len: rows.len(),
    })?;

    if has_add_exception(anchor) {
        return Err(RowError::AddException {
            tag: anchor.tag.clone(),
        });
    }

    let mut updated = rows.to_vec();
    updated.insert(index + 1, blank_row());
    Ok(updated)
}

pub fn delete_row(rows: &[Row], index: usize) -> Result<Vec<Row>, RowError> {
    let target = rows.get(index).ok_or(RowError::IndexOutOfBounds {
        index,
        len: rows.len(),
    })?;

    if has_delete_exception(target) {
        return Err(RowError::DeleteException {
            tag: target.tag.clone(),
        });
    }

    let mut updated = rows.to_vec();
    updated.remove(index);
    Ok(updated)
}

/// Strip the fields the backend regenerates when a record is duplicated
pub fn remove_fields_for_duplicate(rows: &[Row]) -> Vec<Row> {
    rows.iter()
        .filter(|row| {
            row.tag != CONTROL_NUMBER_TAG && row.tag != LATEST_TRANSACTION_TAG && !is_terminal(row)
        })
        .cloned()
        .collect()
}
