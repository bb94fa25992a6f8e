//! NMRPipe core types: FDATA header, enums, and parameter access.
//!
//! This crate models the part of the NMRPipe header a 1D/2D converter fills
//! in; writing files is left to the caller.

pub mod enums;
pub mod fdata;
pub mod params;

pub use enums::*;
pub use fdata::*;
pub use params::*;
