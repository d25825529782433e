//! Question records and the pure logic around them: shaping form submissions into
//! rows and partitioning stored rows into display buckets.

pub mod categorizer;
pub mod kind;
pub mod record;
pub mod shaper;

pub use categorizer::{Bucket, Buckets, categorize};
pub use kind::QuestionKind;
pub use record::{COLUMN_COUNT, HEADERS, QuestionRecord, QuestionRow, StoredRow};
pub use shaper::{FormFields, parse_form, shape};
