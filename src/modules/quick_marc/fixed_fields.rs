//! Positional layouts of the fixed-length control fields (007, 008)
//!
//! Each layout lists its subfields in byte order. The sum of the subfield
//! widths is the content length of the field for that record type.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{MarcType, SubfieldValue};

pub const FIXED_FIELD_TAG: &str = "008";
pub const PHYS_DESCRIPTION_TAG: &str = "007";

/// Subfield holding the 007 category of material
pub const CATEGORY_SUBFIELD: &str = "Category";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixedFieldError {
    #[error("field {tag}: unsupported type '{type_code}'")]
    UnsupportedType { tag: String, type_code: String },
    #[error("field {tag} has no fixed-field layout")]
    NoLayout { tag: String },
    #[error("layout {label}: subfields span {actual} bytes, field is {expected}")]
    ConfigWidth {
        label: String,
        expected: usize,
        actual: usize,
    },
    #[error("field {tag}: packed content is {actual} bytes, expected {expected}")]
    WidthMismatch {
        tag: String,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubfieldType {
    Byte,
    String,
    Bytes,
    Select,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubfieldSpec {
    pub name: String,
    pub kind: SubfieldType,
    pub bytes: usize,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

impl SubfieldSpec {
    fn new(name: &str, kind: SubfieldType, bytes: usize) -> Self {
        Self {
            name: name.to_string(),
            kind,
            bytes,
            disabled: false,
            options: Vec::new(),
        }
    }

    pub fn byte(name: &str) -> Self {
        Self::new(name, SubfieldType::Byte, 1)
    }

    pub fn string(name: &str, bytes: usize) -> Self {
        Self::new(name, SubfieldType::String, bytes)
    }

    pub fn bytes(name: &str, bytes: usize) -> Self {
        Self::new(name, SubfieldType::Bytes, bytes)
    }

    pub fn select(name: &str, options: Vec<SelectOption>) -> Self {
        Self {
            options,
            ..Self::new(name, SubfieldType::Select, 1)
        }
    }

    /// Positions with no defined meaning; always emitted blank
    pub fn undefined(position: usize, bytes: usize) -> Self {
        let kind = if bytes == 1 {
            SubfieldType::Byte
        } else {
            SubfieldType::Bytes
        };
        Self::new(&format!("Undefined{}", position), kind, bytes).disabled()
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixedFieldConfig {
    pub tag: &'static str,
    pub label: &'static str,
    pub width: usize,
    pub subfields: Vec<SubfieldSpec>,
}

impl FixedFieldConfig {
    pub fn validate(&self) -> Result<(), FixedFieldError> {
        let actual: usize = self.subfields.iter().map(|s| s.bytes).sum();
        if actual != self.width {
            return Err(FixedFieldError::ConfigWidth {
                label: self.label.to_string(),
                expected: self.width,
                actual,
            });
        }
        Ok(())
    }

    /// Split a packed content string back into named subfields. Characters
    /// past the end of `content` come back empty.
    pub fn unpack(&self, content: &str) -> BTreeMap<String, SubfieldValue> {
        let chars: Vec<char> = content.chars().collect();
        let mut offset = 0;
        let mut map = BTreeMap::new();

        for spec in &self.subfields {
            let end = (offset + spec.bytes).min(chars.len());
            let start = offset.min(end);
            let slice = &chars[start..end];
            let value = match spec.kind {
                SubfieldType::Bytes => {
                    SubfieldValue::Bytes(slice.iter().map(|c| c.to_string()).collect())
                }
                _ => SubfieldValue::Single(slice.iter().collect()),
            };
            map.insert(spec.name.clone(), value);
            offset += spec.bytes;
        }

        map
    }
}

/// 008 layouts for bibliographic records, chosen from leader/06 and leader/07
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BibliographicLayout {
    Books,
    ContinuingResources,
    Maps,
    Music,
    VisualMaterials,
    ComputerFiles,
    MixedMaterials,
}

impl BibliographicLayout {
    pub fn from_leader(leader: &str) -> Result<Self, FixedFieldError> {
        let mut chars = leader.chars().skip(6);
        let record_type = chars.next().unwrap_or(' ');
        let bib_level = chars.next().unwrap_or(' ');

        let layout = match record_type {
            'a' | 't' if matches!(bib_level, 'b' | 'i' | 's') => {
                BibliographicLayout::ContinuingResources
            }
            'a' | 't' => BibliographicLayout::Books,
            'c' | 'd' | 'i' | 'j' => BibliographicLayout::Music,
            'e' | 'f' => BibliographicLayout::Maps,
            'g' | 'k' | 'o' | 'r' => BibliographicLayout::VisualMaterials,
            'm' => BibliographicLayout::ComputerFiles,
            'p' => BibliographicLayout::MixedMaterials,
            other => {
                return Err(FixedFieldError::UnsupportedType {
                    tag: FIXED_FIELD_TAG.to_string(),
                    type_code: other.to_string(),
                });
            }
        };
        Ok(layout)
    }

    pub fn config(&self) -> &'static FixedFieldConfig {
        match self {
            BibliographicLayout::Books => &*BOOKS,
            BibliographicLayout::ContinuingResources => &*CONTINUING_RESOURCES,
            BibliographicLayout::Maps => &*MAPS,
            BibliographicLayout::Music => &*MUSIC,
            BibliographicLayout::VisualMaterials => &*VISUAL_MATERIALS,
            BibliographicLayout::ComputerFiles => &*COMPUTER_FILES,
            BibliographicLayout::MixedMaterials => &*MIXED_MATERIALS,
        }
    }
}

/// Bibliographic 008: positions 00-17 and 35-39 are shared, 18-34 depend on the material
fn bibliographic_008(label: &'static str, material: Vec<SubfieldSpec>) -> FixedFieldConfig {
    let mut subfields = vec![
        SubfieldSpec::string("Entered", 6).disabled(),
        SubfieldSpec::byte("DtSt"),
        SubfieldSpec::string("Date1", 4),
        SubfieldSpec::string("Date2", 4),
        SubfieldSpec::string("Ctry", 3),
    ];
    subfields.extend(material);
    subfields.extend([
        SubfieldSpec::string("Lang", 3),
        SubfieldSpec::byte("MRec"),
        SubfieldSpec::byte("Srce"),
    ]);

    FixedFieldConfig {
        tag: FIXED_FIELD_TAG,
        label,
        width: 40,
        subfields,
    }
}

static BOOKS: Lazy<FixedFieldConfig> = Lazy::new(|| {
    bibliographic_008(
        "Books",
        vec![
            SubfieldSpec::bytes("Ills", 4),
            SubfieldSpec::byte("Audn"),
            SubfieldSpec::byte("Form"),
            SubfieldSpec::bytes("Cont", 4),
            SubfieldSpec::byte("GPub"),
            SubfieldSpec::byte("Conf"),
            SubfieldSpec::byte("Fest"),
            SubfieldSpec::byte("Indx"),
            SubfieldSpec::undefined(32, 1),
            SubfieldSpec::byte("LitF"),
            SubfieldSpec::byte("Biog"),
        ],
    )
});

static CONTINUING_RESOURCES: Lazy<FixedFieldConfig> = Lazy::new(|| {
    bibliographic_008(
        "Continuing resources",
        vec![
            SubfieldSpec::byte("Freq"),
            SubfieldSpec::byte("Regl"),
            SubfieldSpec::undefined(20, 1),
            SubfieldSpec::byte("SrTp"),
            SubfieldSpec::byte("Orig"),
            SubfieldSpec::byte("Form"),
            SubfieldSpec::byte("EntW"),
            SubfieldSpec::bytes("Cont", 3),
            SubfieldSpec::byte("GPub"),
            SubfieldSpec::byte("Conf"),
            SubfieldSpec::undefined(30, 3),
            SubfieldSpec::byte("Alph"),
            SubfieldSpec::byte("S/L"),
        ],
    )
});

static MAPS: Lazy<FixedFieldConfig> = Lazy::new(|| {
    bibliographic_008(
        "Maps",
        vec![
            SubfieldSpec::bytes("Relf", 4),
            SubfieldSpec::string("Proj", 2),
            SubfieldSpec::undefined(24, 1),
            SubfieldSpec::byte("CrTp"),
            SubfieldSpec::undefined(26, 2),
            SubfieldSpec::byte("GPub"),
            SubfieldSpec::byte("Form"),
            SubfieldSpec::undefined(30, 1),
            SubfieldSpec::byte("Indx"),
            SubfieldSpec::undefined(32, 1),
            SubfieldSpec::bytes("SpFm", 2),
        ],
    )
});

static MUSIC: Lazy<FixedFieldConfig> = Lazy::new(|| {
    bibliographic_008(
        "Music",
        vec![
            SubfieldSpec::string("Comp", 2),
            SubfieldSpec::byte("FMus"),
            SubfieldSpec::byte("Part"),
            SubfieldSpec::byte("Audn"),
            SubfieldSpec::byte("Form"),
            SubfieldSpec::bytes("AccM", 6),
            SubfieldSpec::bytes("LTxt", 2),
            SubfieldSpec::undefined(32, 1),
            SubfieldSpec::byte("TrAr"),
            SubfieldSpec::undefined(34, 1),
        ],
    )
});

static VISUAL_MATERIALS: Lazy<FixedFieldConfig> = Lazy::new(|| {
    bibliographic_008(
        "Visual materials",
        vec![
            SubfieldSpec::string("Time", 3),
            SubfieldSpec::undefined(21, 1),
            SubfieldSpec::byte("Audn"),
            SubfieldSpec::undefined(23, 5),
            SubfieldSpec::byte("GPub"),
            SubfieldSpec::byte("Form"),
            SubfieldSpec::undefined(30, 3),
            SubfieldSpec::byte("TMat"),
            SubfieldSpec::byte("Tech"),
        ],
    )
});

static COMPUTER_FILES: Lazy<FixedFieldConfig> = Lazy::new(|| {
    bibliographic_008(
        "Computer files",
        vec![
            SubfieldSpec::undefined(18, 4),
            SubfieldSpec::byte("Audn"),
            SubfieldSpec::byte("Form"),
            SubfieldSpec::undefined(24, 2),
            SubfieldSpec::byte("File"),
            SubfieldSpec::undefined(27, 1),
            SubfieldSpec::byte("GPub"),
            SubfieldSpec::undefined(29, 6),
        ],
    )
});

static MIXED_MATERIALS: Lazy<FixedFieldConfig> = Lazy::new(|| {
    bibliographic_008(
        "Mixed materials",
        vec![
            SubfieldSpec::undefined(18, 5),
            SubfieldSpec::byte("Form"),
            SubfieldSpec::undefined(24, 11),
        ],
    )
});

static AUTHORITY: Lazy<FixedFieldConfig> = Lazy::new(|| FixedFieldConfig {
    tag: FIXED_FIELD_TAG,
    label: "Authority",
    width: 40,
    subfields: vec![
        SubfieldSpec::string("Entered", 6).disabled(),
        SubfieldSpec::byte("Geo Subd"),
        SubfieldSpec::byte("Roman"),
        SubfieldSpec::byte("Lang"),
        SubfieldSpec::byte("Kind rec"),
        SubfieldSpec::byte("Cat Rules"),
        SubfieldSpec::byte("SH Sys"),
        SubfieldSpec::byte("Series"),
        SubfieldSpec::byte("Numb Series"),
        SubfieldSpec::byte("Main use"),
        SubfieldSpec::byte("Subj use"),
        SubfieldSpec::byte("Series use"),
        SubfieldSpec::byte("Type Subd"),
        SubfieldSpec::undefined(18, 10),
        SubfieldSpec::byte("Govt Ag"),
        SubfieldSpec::byte("RefEval"),
        SubfieldSpec::undefined(30, 1),
        SubfieldSpec::byte("RecUpd"),
        SubfieldSpec::byte("Pers Name"),
        SubfieldSpec::byte("Level Est"),
        SubfieldSpec::undefined(34, 4),
        SubfieldSpec::byte("Mod Rec"),
        SubfieldSpec::byte("Source"),
    ],
});

static HOLDINGS: Lazy<FixedFieldConfig> = Lazy::new(|| FixedFieldConfig {
    tag: FIXED_FIELD_TAG,
    label: "Holdings",
    width: 32,
    subfields: vec![
        SubfieldSpec::string("Entered", 6).disabled(),
        SubfieldSpec::byte("AcqStatus"),
        SubfieldSpec::byte("AcqMethod"),
        SubfieldSpec::string("AcqEndDate", 4),
        SubfieldSpec::byte("Gen ret"),
        SubfieldSpec::bytes("Spec ret", 3),
        SubfieldSpec::byte("Compl"),
        SubfieldSpec::string("Copies", 3),
        SubfieldSpec::byte("Lend"),
        SubfieldSpec::byte("Repro"),
        SubfieldSpec::string("Lang", 3),
        SubfieldSpec::byte("Sep/comp"),
        SubfieldSpec::string("Rept date", 6),
    ],
});

fn category_options() -> Vec<SelectOption> {
    [
        ("a", "Map"),
        ("c", "Electronic resource"),
        ("d", "Globe"),
        ("f", "Tactile material"),
        ("g", "Projected graphic"),
        ("h", "Microform"),
        ("k", "Nonprojected graphic"),
        ("m", "Motion picture"),
        ("o", "Kit"),
        ("q", "Notated music"),
        ("r", "Remote-sensing image"),
        ("s", "Sound recording"),
        ("t", "Text"),
        ("v", "Videorecording"),
        ("z", "Unspecified"),
    ]
    .into_iter()
    .map(|(value, label)| SelectOption { value, label })
    .collect()
}

/// Leading subfields shared by every 007 layout
fn standard_phys_description() -> Vec<SubfieldSpec> {
    vec![
        SubfieldSpec::select(CATEGORY_SUBFIELD, category_options()),
        SubfieldSpec::byte("SMD"),
    ]
}

static TACTILE_PHYS_DESCRIPTION: Lazy<FixedFieldConfig> = Lazy::new(|| {
    let mut subfields = standard_phys_description();
    subfields.extend([
        SubfieldSpec::string("Class of braille writing", 2),
        SubfieldSpec::byte("Level of contraction"),
        SubfieldSpec::string("Braille music format", 3),
        SubfieldSpec::byte("Special physical characteristics"),
    ]);
    FixedFieldConfig {
        tag: PHYS_DESCRIPTION_TAG,
        label: "Tactile material",
        width: 9,
        subfields,
    }
});

static UNSPECIFIED_PHYS_DESCRIPTION: Lazy<FixedFieldConfig> = Lazy::new(|| FixedFieldConfig {
    tag: PHYS_DESCRIPTION_TAG,
    label: "Unspecified",
    width: 2,
    subfields: standard_phys_description(),
});

/// Every layout, for invariant checks and listing
pub fn all_configs() -> Vec<&'static FixedFieldConfig> {
    vec![
        &*BOOKS,
        &*CONTINUING_RESOURCES,
        &*MAPS,
        &*MUSIC,
        &*VISUAL_MATERIALS,
        &*COMPUTER_FILES,
        &*MIXED_MATERIALS,
        &*AUTHORITY,
        &*HOLDINGS,
        &*TACTILE_PHYS_DESCRIPTION,
        &*UNSPECIFIED_PHYS_DESCRIPTION,
    ]
}

fn phys_description_config(
    content: &BTreeMap<String, SubfieldValue>,
) -> Result<&'static FixedFieldConfig, FixedFieldError> {
    let category = match content.get(CATEGORY_SUBFIELD) {
        Some(SubfieldValue::Single(value)) => value.as_str(),
        _ => "",
    };

    match category {
        "f" => Ok(&*TACTILE_PHYS_DESCRIPTION),
        "z" => Ok(&*UNSPECIFIED_PHYS_DESCRIPTION),
        other => Err(FixedFieldError::UnsupportedType {
            tag: PHYS_DESCRIPTION_TAG.to_string(),
            type_code: other.to_string(),
        }),
    }
}

/// Layout governing a structured control field
pub fn config_for(
    tag: &str,
    marc_type: MarcType,
    leader: &str,
    content: &BTreeMap<String, SubfieldValue>,
) -> Result<&'static FixedFieldConfig, FixedFieldError> {
    match (tag, marc_type) {
        (FIXED_FIELD_TAG, MarcType::Bibliographic) => {
            Ok(BibliographicLayout::from_leader(leader)?.config())
        }
        (FIXED_FIELD_TAG, MarcType::Authority) => Ok(&*AUTHORITY),
        (FIXED_FIELD_TAG, MarcType::Holdings) => Ok(&*HOLDINGS),
        (PHYS_DESCRIPTION_TAG, MarcType::Bibliographic | MarcType::Holdings) => {
            phys_description_config(content)
        }
        _ => Err(FixedFieldError::NoLayout {
            tag: tag.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_layout_fills_its_field() {
        for config in all_configs() {
            assert_eq!(config.validate(), Ok(()), "layout {}", config.label);
        }
    }

    #[test]
    fn test_subfield_names_are_unique_per_layout() {
        for config in all_configs() {
            let mut names: Vec<&str> = config.subfields.iter().map(|s| s.name.as_str()).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), config.subfields.len(), "layout {}", config.label);
        }
    }

    #[test]
    fn test_validate_reports_width_mismatch() {
        let config = FixedFieldConfig {
            tag: FIXED_FIELD_TAG,
            label: "Broken",
            width: 5,
            subfields: vec![SubfieldSpec::byte("A"), SubfieldSpec::string("B", 2)],
        };

        assert_eq!(
            config.validate(),
            Err(FixedFieldError::ConfigWidth {
                label: "Broken".into(),
                expected: 5,
                actual: 3
            })
        );
    }

    #[test]
    fn test_bibliographic_layout_from_leader() {
        let layout = |leader: &str| BibliographicLayout::from_leader(leader).unwrap();

        assert_eq!(layout("02949cam a2200517Kii4500"), BibliographicLayout::Books);
        assert_eq!(
            layout("02949cas a2200517Kii4500"),
            BibliographicLayout::ContinuingResources
        );
        assert_eq!(layout("02949cem a2200517Kii4500"), BibliographicLayout::Maps);
        assert_eq!(layout("02949cjm a2200517Kii4500"), BibliographicLayout::Music);
        assert_eq!(
            layout("02949cgm a2200517Kii4500"),
            BibliographicLayout::VisualMaterials
        );
        assert_eq!(
            layout("02949cmm a2200517Kii4500"),
            BibliographicLayout::ComputerFiles
        );
        assert_eq!(
            layout("02949cpc a2200517Kii4500"),
            BibliographicLayout::MixedMaterials
        );
        assert!(matches!(
            BibliographicLayout::from_leader("02949cxm a2200517Kii4500"),
            Err(FixedFieldError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_config_for_selects_by_record_type() {
        let empty = BTreeMap::new();
        let leader = "00000nam a2200000 a 4500";

        assert_eq!(
            config_for("008", MarcType::Authority, leader, &empty)
                .unwrap()
                .label,
            "Authority"
        );
        assert_eq!(
            config_for("008", MarcType::Holdings, leader, &empty)
                .unwrap()
                .width,
            32
        );
        assert!(matches!(
            config_for("006", MarcType::Bibliographic, leader, &empty),
            Err(FixedFieldError::NoLayout { .. })
        ));

        let mut tactile = BTreeMap::new();
        tactile.insert(
            CATEGORY_SUBFIELD.to_string(),
            SubfieldValue::Single("f".into()),
        );
        assert_eq!(
            config_for("007", MarcType::Bibliographic, leader, &tactile)
                .unwrap()
                .label,
            "Tactile material"
        );
    }

    #[test]
    fn test_unpack_splits_by_position() {
        let fixed = "130325s2009    miu     ob    001 0 eng d";
        assert_eq!(fixed.len(), 40);

        let map = BOOKS.unpack(fixed);

        assert_eq!(map["Entered"], SubfieldValue::Single("130325".into()));
        assert_eq!(map["Date1"], SubfieldValue::Single("2009".into()));
        assert_eq!(map["Ctry"], SubfieldValue::Single("miu".into()));
        assert_eq!(map["Form"], SubfieldValue::Single("o".into()));
        assert_eq!(map["Lang"], SubfieldValue::Single("eng".into()));
        assert_eq!(map["Srce"], SubfieldValue::Single("d".into()));
        assert!(matches!(&map["Ills"], SubfieldValue::Bytes(b) if b.len() == 4));
    }
}
