//! Convert JEOL Delta generic-ASCII exports (`.hdr` + `.asc`) to NMRPipe data.

pub use asc2pipe;
pub use nmrpipe_core;

pub use asc2pipe::{convert, read_list_values, AscError, AscOptions, AscResult, PipeResult};
