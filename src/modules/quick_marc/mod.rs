// quickMARC editing pipeline
// Pure functions over the form's rows: no I/O, no shared state

pub mod autopopulate;
pub mod bytes;
pub mod fixed_fields;
pub mod record_info;
pub mod rows;
pub mod validation;

pub use autopopulate::{autopopulate_indicators, autopopulate_subfields};
pub use bytes::{clean_bytes_fields, normalize_fixed_content, pack_fixed_field};
pub use fixed_fields::{FixedFieldConfig, FixedFieldError, SubfieldSpec, SubfieldType, config_for};
pub use record_info::RecordInfo;
pub use rows::{
    RowError, TransformError, add_row, dehydrate, delete_row, has_add_exception,
    has_delete_exception, hydrate, is_read_only, remove_fields_for_duplicate,
};
pub use validation::{ValidationError, validate, validate_record};
