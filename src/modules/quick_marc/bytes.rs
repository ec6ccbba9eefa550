//! Turns byte-editor content back into the packed control-field string

use std::collections::BTreeMap;

use super::fixed_fields::{FixedFieldConfig, FixedFieldError, SubfieldType, config_for};
use crate::models::{BLANK, Content, MarcType, Row, SubfieldValue};

fn or_blank(value: &str) -> &str {
    if value.is_empty() { BLANK } else { value }
}

fn blank_bytes(width: usize) -> Vec<String> {
    vec![BLANK.to_string(); width]
}

/// Concatenate the subfields in layout order. Byte positions left empty are
/// written as `\`; text subfields are written as entered. The result must
/// exactly fill the field.
pub fn pack_fixed_field(
    content: &BTreeMap<String, SubfieldValue>,
    config: &FixedFieldConfig,
) -> Result<String, FixedFieldError> {
    let mut packed = String::with_capacity(config.width);

    for spec in &config.subfields {
        let value = content.get(&spec.name);
        match spec.kind {
            SubfieldType::Byte => match value {
                Some(SubfieldValue::Single(s)) => packed.push_str(or_blank(s)),
                Some(SubfieldValue::Bytes(bytes)) => {
                    packed.push_str(or_blank(&bytes.concat()));
                }
                None => packed.push_str(BLANK),
            },
            SubfieldType::Bytes => {
                let bytes: Vec<String> = match value {
                    Some(SubfieldValue::Bytes(bytes)) => bytes.clone(),
                    Some(SubfieldValue::Single(s)) => s.chars().map(String::from).collect(),
                    None => Vec::new(),
                };
                for i in 0..spec.bytes.max(bytes.len()) {
                    packed.push_str(or_blank(bytes.get(i).map(String::as_str).unwrap_or("")));
                }
            }
            SubfieldType::String | SubfieldType::Select => match value {
                Some(SubfieldValue::Single(s)) => packed.push_str(s),
                Some(SubfieldValue::Bytes(bytes)) => packed.push_str(&bytes.concat()),
                None => {}
            },
        }
    }

    let actual = packed.chars().count();
    if actual != config.width {
        return Err(FixedFieldError::WidthMismatch {
            tag: config.tag.to_string(),
            expected: config.width,
            actual,
        });
    }

    Ok(packed)
}

/// Bring edited values to their configured widths: blank bytes become `\`,
/// byte arrays are padded or cut to size, short text is right-padded with
/// `\`. Over-long text is left alone so packing reports it.
pub fn normalize_fixed_content(
    content: &BTreeMap<String, SubfieldValue>,
    config: &FixedFieldConfig,
) -> BTreeMap<String, SubfieldValue> {
    let mut normalized = content.clone();

    for spec in &config.subfields {
        let value = match (spec.kind, content.get(&spec.name)) {
            (SubfieldType::Byte, Some(SubfieldValue::Single(s))) => {
                SubfieldValue::Single(or_blank(s).to_string())
            }
            (SubfieldType::Byte, Some(SubfieldValue::Bytes(bytes))) => {
                SubfieldValue::Single(or_blank(&bytes.concat()).to_string())
            }
            (SubfieldType::Byte, None) => SubfieldValue::Single(BLANK.to_string()),
            (SubfieldType::Bytes, value) => {
                let mut bytes: Vec<String> = match value {
                    Some(SubfieldValue::Bytes(bytes)) => bytes
                        .iter()
                        .map(|b| or_blank(b).to_string())
                        .collect(),
                    Some(SubfieldValue::Single(s)) => s.chars().map(String::from).collect(),
                    None => blank_bytes(spec.bytes),
                };
                bytes.resize(spec.bytes, BLANK.to_string());
                SubfieldValue::Bytes(bytes)
            }
            (SubfieldType::String | SubfieldType::Select, value) => {
                let mut text = match value {
                    Some(SubfieldValue::Single(s)) => s.clone(),
                    Some(SubfieldValue::Bytes(bytes)) => bytes.concat(),
                    None => String::new(),
                };
                let missing = spec.bytes.saturating_sub(text.chars().count());
                text.push_str(&BLANK.repeat(missing));
                SubfieldValue::Single(text)
            }
        };
        normalized.insert(spec.name.clone(), value);
    }

    normalized
}

/// Pack every structured row so the form carries text content only
pub fn clean_bytes_fields(rows: &[Row], marc_type: MarcType) -> Result<Vec<Row>, FixedFieldError> {
    let leader = rows
        .iter()
        .find(|row| row.is_leader())
        .and_then(|row| row.content.as_text())
        .unwrap_or_default()
        .to_string();

    rows.iter()
        .map(|row| match &row.content {
            Content::Text(_) => Ok(row.clone()),
            Content::Fixed(content) => {
                let config = config_for(&row.tag, marc_type, &leader, content)?;
                let normalized = normalize_fixed_content(content, config);
                let packed = pack_fixed_field(&normalized, config)?;
                tracing::debug!("Packed {} ({}): '{}'", row.tag, config.label, packed);
                Ok(Row {
                    content: Content::Text(packed),
                    ..row.clone()
                })
            }
        })
        .collect()
}
