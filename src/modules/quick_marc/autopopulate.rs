//! Fills in values the cataloger did not enter before a record is saved

use std::collections::{BTreeMap, HashMap};

use super::fixed_fields::{FixedFieldConfig, SubfieldType, config_for};
use crate::models::{BLANK, Content, Field, MarcType, Record, Row, SubfieldValue};

const INDICATOR_COUNT: usize = 2;
const DEFAULT_SUBFIELD: &str = "$a ";

/// Give every data field exactly two indicators, blank (`\`) where unset
pub fn autopopulate_indicators(rows: &[Row]) -> Vec<Row> {
    rows.iter()
        .map(|row| {
            if row.is_control_field() {
                return row.clone();
            }

            let current = row.indicators.clone().unwrap_or_default();
            let indicators = (0..INDICATOR_COUNT)
                .map(|i| match current.get(i) {
                    Some(value) if !value.trim().is_empty() => value.clone(),
                    _ => BLANK.to_string(),
                })
                .collect();

            Row {
                indicators: Some(indicators),
                ..row.clone()
            }
        })
        .collect()
}

fn starts_with_subfield(content: &str) -> bool {
    let mut chars = content.trim_start().chars();
    chars.next() == Some('$') && chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
}

fn placeholder(kind: SubfieldType, width: usize) -> SubfieldValue {
    match kind {
        SubfieldType::Bytes => SubfieldValue::Bytes(vec![BLANK.to_string(); width]),
        _ => SubfieldValue::Single(BLANK.repeat(width)),
    }
}

/// Subfield values of the same field in the record the form was loaded from
fn original_subfields(field: &Field, config: &FixedFieldConfig) -> BTreeMap<String, SubfieldValue> {
    match &field.content {
        Content::Fixed(map) => map.clone(),
        Content::Text(text) => config.unpack(text),
    }
}

/// The field a row was dehydrated from. Rows keep their field's id; fields
/// that had none are matched by their position among same-tag fields.
fn original_field<'a>(record: &'a Record, row: &Row, occurrence: usize) -> Option<&'a Field> {
    record
        .fields
        .iter()
        .find(|field| field.id.as_deref() == Some(row.id.as_str()))
        .or_else(|| {
            record
                .fields
                .iter()
                .filter(|field| field.tag == row.tag && field.id.is_none())
                .nth(occurrence)
        })
}

fn fill_fixed_field(
    row: &Row,
    content: &BTreeMap<String, SubfieldValue>,
    source: Option<&Field>,
    marc_type: MarcType,
    leader: &str,
) -> Row {
    let config = match config_for(&row.tag, marc_type, leader, content) {
        Ok(config) => config,
        Err(e) => {
            // Packing reports this again and stops the save
            tracing::warn!("No layout to autopopulate {}: {}", row.tag, e);
            return row.clone();
        }
    };

    let fallback = source
        .map(|field| original_subfields(field, config))
        .unwrap_or_default();

    let mut filled = content.clone();
    for spec in &config.subfields {
        if filled.contains_key(&spec.name) {
            continue;
        }
        let value = fallback
            .get(&spec.name)
            .filter(|value| !value.is_blank())
            .cloned()
            .unwrap_or_else(|| placeholder(spec.kind, spec.bytes));
        filled.insert(spec.name.clone(), value);
    }

    Row {
        content: Content::Fixed(filled),
        ..row.clone()
    }
}

/// Complete structured control fields from their layout, preferring values
/// from `original`; prefix free-text data fields lacking a subfield code with `$a`.
pub fn autopopulate_subfields(
    rows: &[Row],
    original: Option<&Record>,
    marc_type: MarcType,
) -> Vec<Row> {
    let leader = rows
        .iter()
        .find(|row| row.is_leader())
        .and_then(|row| row.content.as_text())
        .unwrap_or_default();

    let mut occurrences: HashMap<&str, usize> = HashMap::new();

    rows.iter()
        .map(|row| match &row.content {
            Content::Fixed(content) => {
                let occurrence = occurrences.entry(row.tag.as_str()).or_default();
                let source = original.and_then(|record| original_field(record, row, *occurrence));
                *occurrence += 1;
                fill_fixed_field(row, content, source, marc_type, leader)
            }
            Content::Text(text) if !row.is_control_field() => {
                if text.trim().is_empty() || starts_with_subfield(text) {
                    row.clone()
                } else {
                    Row {
                        content: Content::Text(format!("{}{}", DEFAULT_SUBFIELD, text.trim_start())),
                        ..row.clone()
                    }
                }
            }
            Content::Text(_) => row.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LEADER_TAG;

    const LEADER: &str = "02949cam a2200517Kii4500";

    fn row(tag: &str, content: Content, indicators: Option<Vec<&str>>) -> Row {
        Row {
            id: tag.to_string(),
            tag: tag.to_string(),
            content,
            indicators: indicators.map(|v| v.into_iter().map(String::from).collect()),
        }
    }

    fn leader_row() -> Row {
        row(LEADER_TAG, Content::text(LEADER), None)
    }

    #[test]
    fn test_indicators_filled_for_data_fields_only() {
        let rows = vec![
            leader_row(),
            row("001", Content::text("in001"), None),
            row("245", Content::text("$a T"), Some(vec!["1", ""])),
            row("650", Content::text("$a S"), None),
            row("500", Content::text("$a N"), Some(vec!["0", "1"])),
        ];

        let filled = autopopulate_indicators(&rows);

        assert_eq!(filled[0].indicators, None);
        assert_eq!(filled[1].indicators, None);
        assert_eq!(
            filled[2].indicators,
            Some(vec!["1".to_string(), "\\".to_string()])
        );
        assert_eq!(
            filled[3].indicators,
            Some(vec!["\\".to_string(), "\\".to_string()])
        );
        assert_eq!(filled[4], rows[4]);
    }

    #[test]
    fn test_subfield_prefix_added_to_bare_content() {
        let rows = vec![
            leader_row(),
            row("001", Content::text("in001"), None),
            row("245", Content::text("Ezekiel"), None),
            row("650", Content::text("$a Bible"), None),
            row("500", Content::text(""), None),
        ];

        let filled = autopopulate_subfields(&rows, None, MarcType::Bibliographic);

        assert_eq!(filled[1].content, Content::text("in001"));
        assert_eq!(filled[2].content, Content::text("$a Ezekiel"));
        assert_eq!(filled[3].content, Content::text("$a Bible"));
        assert_eq!(filled[4].content, Content::text(""));
    }

    #[test]
    fn test_missing_fixed_subfields_come_from_original() {
        let original = Record::new(
            LEADER,
            vec![Field::new(
                "008",
                Content::text("130325s2009    miu     ob    001 0 eng d"),
            )],
        );
        let mut edited = BTreeMap::new();
        edited.insert("Lang".to_string(), SubfieldValue::Single("fre".into()));
        let rows = vec![leader_row(), row("008", Content::Fixed(edited), None)];

        let filled = autopopulate_subfields(&rows, Some(&original), MarcType::Bibliographic);

        let content = filled[1].content.as_fixed().unwrap();
        assert_eq!(content["Lang"], SubfieldValue::Single("fre".into()));
        assert_eq!(content["Date1"], SubfieldValue::Single("2009".into()));
        assert_eq!(content["Entered"], SubfieldValue::Single("130325".into()));
    }

    #[test]
    fn test_missing_fixed_subfields_without_original_get_placeholders() {
        let rows = vec![leader_row(), row("008", Content::Fixed(BTreeMap::new()), None)];

        let filled = autopopulate_subfields(&rows, None, MarcType::Bibliographic);

        let content = filled[1].content.as_fixed().unwrap();
        assert_eq!(content["Lang"], SubfieldValue::Single("\\\\\\".into()));
        assert_eq!(
            content["Ills"],
            SubfieldValue::Bytes(vec!["\\".to_string(); 4])
        );
    }

    fn phys_description(pairs: &[(&str, &str)]) -> Content {
        Content::Fixed(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), SubfieldValue::Single(v.to_string())))
                .collect(),
        )
    }

    #[test]
    fn test_repeated_fixed_field_uses_its_own_original() {
        let mut first = Field::new(
            "007",
            phys_description(&[
                ("Category", "f"),
                ("SMD", "b"),
                ("Class of braille writing", "ab"),
                ("Level of contraction", "a"),
                ("Braille music format", "xyz"),
                ("Special physical characteristics", "n"),
            ]),
        );
        first.id = Some("phys-1".to_string());
        let mut second = Field::new("007", phys_description(&[("Category", "f"), ("SMD", "b")]));
        second.id = Some("phys-2".to_string());
        let original = Record::new(LEADER, vec![first, second]);

        let mut edited = row("007", phys_description(&[("Category", "f"), ("SMD", "b")]), None);
        edited.id = "phys-2".to_string();
        let rows = vec![leader_row(), edited];

        let filled = autopopulate_subfields(&rows, Some(&original), MarcType::Bibliographic);

        let content = filled[1].content.as_fixed().unwrap();
        assert_eq!(
            content["Class of braille writing"],
            SubfieldValue::Single("\\\\".into())
        );
        assert_eq!(
            content["Braille music format"],
            SubfieldValue::Single("\\\\\\".into())
        );
    }

    #[test]
    fn test_fields_without_ids_match_by_position() {
        let original = Record::new(
            LEADER,
            vec![
                Field::new(
                    "007",
                    phys_description(&[("Category", "f"), ("Level of contraction", "a")]),
                ),
                Field::new(
                    "007",
                    phys_description(&[("Category", "f"), ("Level of contraction", "m")]),
                ),
            ],
        );
        let rows = vec![
            leader_row(),
            row("007", phys_description(&[("Category", "f")]), None),
            row("007", phys_description(&[("Category", "f")]), None),
        ];

        let filled = autopopulate_subfields(&rows, Some(&original), MarcType::Bibliographic);

        assert_eq!(
            filled[1].content.as_fixed().unwrap()["Level of contraction"],
            SubfieldValue::Single("a".into())
        );
        assert_eq!(
            filled[2].content.as_fixed().unwrap()["Level of contraction"],
            SubfieldValue::Single("m".into())
        );
    }
}
