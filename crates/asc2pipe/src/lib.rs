//! JEOL Delta generic-ASCII → NMRPipe converter.
//!
//! Reads a `.hdr` header and its `.asc` column data, and produces axis
//! metadata plus a real or complex sample array in NMRPipe's layout.

pub mod array;
pub mod axis;
pub mod convert;
pub mod error;
pub mod header;
pub mod layout;
pub mod list;
pub mod reader;
pub mod units;

pub use array::{NmrArray, NmrData, Shape};
pub use axis::{AxisDescriptor, Domain, Encoding, Metadata};
pub use convert::*;
pub use error::{AscError, Result};
pub use header::{Header, HeaderValue};
pub use list::read_list_values;
