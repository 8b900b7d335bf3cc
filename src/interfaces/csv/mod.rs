//! CSV script input and summary output for the `tontine` binary.

pub mod command_reader;
pub mod summary_writer;
