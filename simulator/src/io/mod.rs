//! Output collaborators receiving simulated events.

pub mod event_writer;
pub mod sink;
pub mod summary;

pub use event_writer::CsvEventWriter;
pub use sink::{EventSink, NullSink, VecSink};
pub use summary::{read_summary_json, summary_path_for, write_summary_json};
