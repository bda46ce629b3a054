mod readers;
mod util;

pub use readers::{open_alignment_reader, read_alignment, read_sequence_records};
pub use util::{backup_path, backup_timestamp, handle_error_and_exit, Result};
