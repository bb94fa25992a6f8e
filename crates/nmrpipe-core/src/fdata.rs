//! The NMRPipe FDATA header, a 512-float block in front of every data file.
//!
//! Only the locations needed to describe 1D and 2D data are named here.
//! Per-axis values go through the generalized ND parameter codes, which are
//! remapped to F2/F1 slots according to the dimension order.

use crate::enums::*;
use byteorder::{ByteOrder, NativeEndian};
use std::fmt;
use thiserror::Error;

/// Floats in a header.
pub const FDATA_SIZE: usize = 512;
pub const FDATA_BYTES: usize = FDATA_SIZE * 4;
/// Stored in FDFLTFORMAT to mark IEEE floats.
pub const FD_IEEE_CONS: u32 = 0xEEEEEEEE;
/// Stored in FDFLTORDER; reads back as 2.345 only in the writer's byte order.
pub const FD_ORDER_CONS: f32 = 2.345;

// ─── Whole-file slots ───────────────────────────────────────────────────────

pub const FDFLTFORMAT: usize = 1;
pub const FDFLTORDER: usize = 2;

pub const FDSIZE: usize = 99;
pub const FDREALSIZE: usize = 97;
pub const FDSPECNUM: usize = 219;
pub const FDQUADFLAG: usize = 106;
pub const FD2DPHASE: usize = 256;
pub const FDDIMCOUNT: usize = 9;
pub const FDDIMORDER: usize = 24;
pub const FDDIMORDER1: usize = 24;
pub const FDDIMORDER2: usize = 25;
pub const FDDIMORDER3: usize = 26;
pub const FDDIMORDER4: usize = 27;
pub const FD2DVIRGIN: usize = 399;

// ─── Creation stamp ─────────────────────────────────────────────────────────

pub const FDMONTH: usize = 294;
pub const FDDAY: usize = 295;
pub const FDYEAR: usize = 296;
pub const FDHOURS: usize = 283;
pub const FDMINS: usize = 284;
pub const FDSECS: usize = 285;

// ─── F2: direct axis (X) ────────────────────────────────────────────────────

pub const FDF2LABEL: usize = 16;
pub const FDF2APOD: usize = 95;
pub const FDF2SW: usize = 100;
pub const FDF2OBS: usize = 119;
pub const FDF2ORIG: usize = 101;
pub const FDF2QUADFLAG: usize = 56;
pub const FDF2FTFLAG: usize = 220;
pub const FDF2AQSIGN: usize = 64;
pub const FDF2CAR: usize = 66;
pub const FDF2CENTER: usize = 79;
pub const FDF2FTSIZE: usize = 96;
pub const FDF2TDSIZE: usize = 386;

// ─── F1: indirect axis (Y) ──────────────────────────────────────────────────

pub const FDF1LABEL: usize = 18;
pub const FDF1APOD: usize = 428;
pub const FDF1SW: usize = 229;
pub const FDF1OBS: usize = 218;
pub const FDF1ORIG: usize = 249;
pub const FDF1QUADFLAG: usize = 55;
pub const FDF1FTFLAG: usize = 222;
pub const FDF1AQSIGN: usize = 475;
pub const FDF1CAR: usize = 67;
pub const FDF1CENTER: usize = 80;
pub const FDF1FTSIZE: usize = 98;
pub const FDF1TDSIZE: usize = 387;

/// Bytes available for an axis label.
pub const SIZE_NDLABEL: usize = 8;

// ─── Per-axis parameter codes ───────────────────────────────────────────────

pub const NDPARM: i32 = 1000;

pub const NDSIZE: i32 = 1 + NDPARM;
pub const NDAPOD: i32 = 2 + NDPARM;
pub const NDSW: i32 = 3 + NDPARM;
pub const NDORIG: i32 = 4 + NDPARM;
pub const NDOBS: i32 = 5 + NDPARM;
pub const NDFTFLAG: i32 = 6 + NDPARM;
pub const NDQUADFLAG: i32 = 7 + NDPARM;
pub const NDLABEL: i32 = 8 + NDPARM;
pub const NDCAR: i32 = 9 + NDPARM;
pub const NDCENTER: i32 = 10 + NDPARM;
pub const NDAQSIGN: i32 = 11 + NDPARM;
pub const NDFTSIZE: i32 = 12 + NDPARM;
pub const NDTDSIZE: i32 = 13 + NDPARM;
pub const MAX_NDPARM: i32 = 13;

/// Maps ND parameter codes to FDATA locations, `[F2, F1]` per row.
const ND_LOC_TABLE: [[usize; 2]; MAX_NDPARM as usize] = [
    [FDSIZE, FDSPECNUM],
    [FDF2APOD, FDF1APOD],
    [FDF2SW, FDF1SW],
    [FDF2ORIG, FDF1ORIG],
    [FDF2OBS, FDF1OBS],
    [FDF2FTFLAG, FDF1FTFLAG],
    [FDF2QUADFLAG, FDF1QUADFLAG],
    [FDF2LABEL, FDF1LABEL],
    [FDF2CAR, FDF1CAR],
    [FDF2CENTER, FDF1CENTER],
    [FDF2AQSIGN, FDF1AQSIGN],
    [FDF2FTSIZE, FDF1FTSIZE],
    [FDF2TDSIZE, FDF1TDSIZE],
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FdataError {
    #[error("buffer too small for FDATA header: {0} bytes")]
    TooSmall(usize),
    #[error("invalid FDATA header: byte order check failed")]
    BadByteOrder,
}

// ─── Header ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Fdata {
    pub data: [f32; FDATA_SIZE],
}

impl Default for Fdata {
    fn default() -> Self {
        Self::new()
    }
}

impl Fdata {
    /// All-zero header; see [`Fdata::with_defaults`] for a usable one.
    pub fn new() -> Self {
        Self {
            data: [0.0f32; FDATA_SIZE],
        }
    }

    /// Header for a fresh 1D real data set, dimension order 2 1 3 4.
    pub fn with_defaults() -> Self {
        let mut fdata = Self::new();
        fdata.init_default();
        fdata
    }

    /// Reset to the state returned by [`Fdata::with_defaults`].
    pub fn init_default(&mut self) {
        self.data.fill(0.0);
        self.data[FDFLTFORMAT] = FD_IEEE_CONS as f32;
        self.data[FDFLTORDER] = FD_ORDER_CONS;
        self.data[FDDIMORDER1] = 2.0;
        self.data[FDDIMORDER2] = 1.0;
        self.data[FDDIMORDER3] = 3.0;
        self.data[FDDIMORDER4] = 4.0;
        self.data[FD2DVIRGIN] = 1.0;
        self.data[FDDIMCOUNT] = 1.0;
        self.data[FDF2QUADFLAG] = QuadFlag::Real as i32 as f32;
        self.data[FDF1QUADFLAG] = QuadFlag::Real as i32 as f32;
    }

    /// Resolve an ND parameter code and 1-based axis code (1=X, 2=Y) to a location.
    ///
    /// Plain locations below `NDPARM` pass through unchanged.
    fn get_loc(&self, parm: i32, dim_code: i32) -> Option<usize> {
        if parm <= NDPARM {
            let loc = usize::try_from(parm).ok()?;
            return (loc < FDATA_SIZE).then_some(loc);
        }

        let nd_idx = (parm - NDPARM - 1) as usize;
        if nd_idx >= ND_LOC_TABLE.len() || !(1..=2).contains(&dim_code) {
            return None;
        }

        let phys_dim = self.data[FDDIMORDER + (dim_code as usize - 1)] as i32;
        let col = match phys_dim {
            2 => 0,
            1 => 1,
            _ => return None,
        };

        Some(ND_LOC_TABLE[nd_idx][col])
    }

    /// Get a parameter value by code and axis.
    pub fn get_parm(&self, parm: i32, dim_code: i32) -> f32 {
        self.get_loc(parm, dim_code)
            .map(|loc| self.data[loc])
            .unwrap_or(0.0)
    }

    /// [`Fdata::get_parm`] truncated to an integer.
    pub fn get_parm_i(&self, parm: i32, dim_code: i32) -> i32 {
        self.get_parm(parm, dim_code) as i32
    }

    /// Set a parameter value by code and axis; unknown codes are ignored.
    pub fn set_parm(&mut self, parm: i32, val: f32, dim_code: i32) {
        if let Some(loc) = self.get_loc(parm, dim_code) {
            self.data[loc] = val;
        }
    }

    pub fn dim_count(&self) -> i32 {
        self.data[FDDIMCOUNT] as i32
    }

    pub fn set_dim_count(&mut self, n: i32) {
        self.data[FDDIMCOUNT] = n as f32;
    }

    // ─── Labels ─────────────────────────────────────────────────────────

    /// Pack a string into FDATA slots, 4 bytes per float, zero padded.
    pub fn txt2flt(text: &str, dest: &mut [f32], max_bytes: usize) {
        let mut bytes = vec![0u8; dest.len() * 4];
        let n = text.len().min(max_bytes).min(bytes.len());
        bytes[..n].copy_from_slice(&text.as_bytes()[..n]);

        for (slot, chunk) in dest.iter_mut().zip(bytes.chunks_exact(4)) {
            *slot = f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
    }

    /// Unpack a zero-terminated string from FDATA slots.
    pub fn flt2txt(src: &[f32], max_bytes: usize) -> String {
        let bytes: Vec<u8> = src
            .iter()
            .flat_map(|f| f.to_ne_bytes())
            .take(max_bytes)
            .take_while(|&b| b != 0)
            .collect();
        String::from_utf8_lossy(&bytes).to_string()
    }

    /// Set a label string for an axis.
    pub fn set_parm_str(&mut self, parm: i32, text: &str, dim_code: i32) {
        if let Some(loc) = self.get_loc(parm, dim_code) {
            let end = (loc + (SIZE_NDLABEL + 3) / 4).min(FDATA_SIZE);
            Self::txt2flt(text, &mut self.data[loc..end], SIZE_NDLABEL);
        }
    }

    /// Get a label string for an axis.
    pub fn get_parm_str(&self, parm: i32, dim_code: i32) -> String {
        match self.get_loc(parm, dim_code) {
            Some(loc) => {
                let end = (loc + (SIZE_NDLABEL + 3) / 4).min(FDATA_SIZE);
                Self::flt2txt(&self.data[loc..end], SIZE_NDLABEL)
            }
            None => String::new(),
        }
    }

    // ─── Header I/O ─────────────────────────────────────────────────────

    /// Header bytes in native order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; FDATA_BYTES];
        NativeEndian::write_f32_into(&self.data, &mut buf);
        buf
    }

    /// Deserialize from bytes, detecting byte order from `FDFLTORDER`.
    pub fn from_bytes(buf: &[u8]) -> Result<(Self, HdrStatus), FdataError> {
        if buf.len() < FDATA_BYTES {
            return Err(FdataError::TooSmall(buf.len()));
        }

        let mut fdata = Self::new();
        NativeEndian::read_f32_into(&buf[..FDATA_BYTES], &mut fdata.data);
        if fdata.test_header() == HdrStatus::Ok {
            return Ok((fdata, HdrStatus::Ok));
        }

        for (slot, chunk) in fdata.data.iter_mut().zip(buf.chunks_exact(4)) {
            *slot = f32::from_ne_bytes([chunk[3], chunk[2], chunk[1], chunk[0]]);
        }
        if fdata.test_header() == HdrStatus::Ok {
            return Ok((fdata, HdrStatus::Swapped));
        }

        Err(FdataError::BadByteOrder)
    }

    /// Whether FDFLTORDER reads back as [`FD_ORDER_CONS`].
    pub fn test_header(&self) -> HdrStatus {
        if (self.data[FDFLTORDER] - FD_ORDER_CONS).abs() < 0.001 {
            HdrStatus::Ok
        } else {
            HdrStatus::Bad
        }
    }
}

impl fmt::Debug for Fdata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Fdata");
        dbg.field("dims", &self.dim_count());
        let dims = self.dim_count().clamp(1, 2) as usize;
        for (name, dim) in [("x", 1), ("y", 2)].into_iter().take(dims) {
            dbg.field(
                name,
                &(
                    self.get_parm_str(NDLABEL, dim),
                    self.get_parm_i(NDSIZE, dim),
                    self.get_parm(NDOBS, dim),
                ),
            );
        }
        dbg.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_order_x_before_y() {
        let fd = Fdata::with_defaults();
        assert_eq!(fd.dim_count(), 1);
        assert_eq!(fd.data[FDDIMORDER1] as i32, 2);
        assert_eq!(fd.data[FDDIMORDER2] as i32, 1);
    }

    #[test]
    fn test_nd_parm_maps_to_f2_and_f1() {
        let mut fd = Fdata::with_defaults();
        fd.set_parm(NDSW, 8000.0, 1);
        fd.set_parm(NDSW, 2000.0, 2);
        assert_eq!(fd.data[FDF2SW], 8000.0);
        assert_eq!(fd.data[FDF1SW], 2000.0);
        fd.set_parm(NDSIZE, 512.0, 2);
        assert_eq!(fd.data[FDSPECNUM], 512.0);
    }

    #[test]
    fn test_unknown_axis_is_ignored() {
        let mut fd = Fdata::with_defaults();
        fd.set_parm(NDSW, 1.0, 3);
        assert_eq!(fd.get_parm(NDSW, 3), 0.0);
    }

    #[test]
    fn test_label() {
        let mut fd = Fdata::with_defaults();
        fd.set_parm_str(NDLABEL, "13C", 2);
        assert_eq!(fd.get_parm_str(NDLABEL, 2), "13C");
        fd.set_parm_str(NDLABEL, "a-much-too-long-label", 1);
        assert_eq!(fd.get_parm_str(NDLABEL, 1), "a-much-t");
    }

    #[test]
    fn test_from_bytes_detects_order() {
        let mut fd = Fdata::with_defaults();
        fd.set_parm(NDOBS, 400.13, 1);

        let bytes = fd.to_bytes();
        let (back, status) = Fdata::from_bytes(&bytes).unwrap();
        assert_eq!(status, HdrStatus::Ok);
        assert!((back.get_parm(NDOBS, 1) - 400.13).abs() < 1e-4);

        let swapped: Vec<u8> = bytes
            .chunks_exact(4)
            .flat_map(|c| [c[3], c[2], c[1], c[0]])
            .collect();
        let (back, status) = Fdata::from_bytes(&swapped).unwrap();
        assert_eq!(status, HdrStatus::Swapped);
        assert!((back.get_parm(NDOBS, 1) - 400.13).abs() < 1e-4);
    }

    #[test]
    fn test_from_bytes_rejects_short_buffer() {
        assert_eq!(
            Fdata::from_bytes(&[0u8; 16]).unwrap_err(),
            FdataError::TooSmall(16)
        );
    }
}
