//! Line rendering collaborators: metadata fields, clocks, and icons.

pub mod clock;
pub mod fields;
pub mod icons;

pub use clock::{format_elapsed, timestamp, Clock, SystemClock};
pub use fields::{format_fields, needs_quotes, Fields, Value};
pub use icons::{LineKind, Stream};
