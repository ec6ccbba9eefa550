pub mod callout;
pub mod form;
pub mod job;
pub mod record;

pub use callout::{Callout, CalloutKind};
pub use form::{BLANK, LEADER_TAG, MarcForm, Row};
pub use job::{CreatedJob, JobState, JobStatus};
pub use record::{Content, Field, MarcType, Record, RecordMeta, SubfieldValue};
