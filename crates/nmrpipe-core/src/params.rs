//! High-level parameter helpers for FDATA headers.
//!
//! These wrap `Fdata::get_parm()` / `Fdata::set_parm()` with the compound
//! operations a converter needs: per-axis spectral blocks, origin
//! computation, and date stamping.

use crate::enums::*;
use crate::fdata::*;

/// Axis codes (1-based).
pub const CUR_XDIM: i32 = 1;
pub const CUR_YDIM: i32 = 2;

/// Spectral description of one axis, as written into the header.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpectral<'a> {
    /// Points stored along the axis (complex pairs counted once on X).
    pub size: i32,
    /// Sweep width in Hz.
    pub sw: f64,
    /// Observe frequency in MHz.
    pub obs: f64,
    /// Carrier position in PPM.
    pub car_ppm: f64,
    pub label: &'a str,
    pub is_complex: bool,
    pub is_freq: bool,
}

impl Fdata {
    // ─── Convenience getters ────────────────────────────────────────────

    pub fn get_size(&self, dim: i32) -> i32 {
        self.get_parm_i(NDSIZE, dim)
    }

    pub fn set_size(&mut self, dim: i32, size: i32) {
        self.set_parm(NDSIZE, size as f32, dim);
    }

    /// Spectral width in Hz.
    pub fn get_sw(&self, dim: i32) -> f64 {
        self.get_parm(NDSW, dim) as f64
    }

    /// Observe frequency in MHz.
    pub fn get_obs(&self, dim: i32) -> f64 {
        self.get_parm(NDOBS, dim) as f64
    }

    /// Spectral origin in Hz.
    pub fn get_orig(&self, dim: i32) -> f64 {
        self.get_parm(NDORIG, dim) as f64
    }

    /// Carrier position in PPM.
    pub fn get_car(&self, dim: i32) -> f64 {
        self.get_parm(NDCAR, dim) as f64
    }

    pub fn is_freq(&self, dim: i32) -> bool {
        self.get_parm_i(NDFTFLAG, dim) != 0
    }

    pub fn is_complex(&self, dim: i32) -> bool {
        QuadFlag::from_i32(self.get_parm_i(NDQUADFLAG, dim))
            .map(QuadFlag::is_complex)
            .unwrap_or(false)
    }

    // ─── Axis setup ─────────────────────────────────────────────────────

    /// Set up an axis's spectral parameters in one call.
    ///
    /// The time-domain or frequency-domain size slot is chosen from
    /// `is_freq`; APOD follows TDSIZE and CENTER sits at `size/2 + 1`.
    pub fn set_axis_spectral(&mut self, dim: i32, axis: &AxisSpectral<'_>) {
        self.set_parm(NDSW, axis.sw as f32, dim);
        self.set_parm(NDOBS, axis.obs as f32, dim);
        self.set_parm(NDCAR, axis.car_ppm as f32, dim);
        self.set_parm_str(NDLABEL, axis.label, dim);
        self.set_parm(
            NDQUADFLAG,
            QuadFlag::from_complex(axis.is_complex) as i32 as f32,
            dim,
        );

        if axis.is_freq {
            self.set_parm(NDFTSIZE, axis.size as f32, dim);
            self.set_parm(NDFTFLAG, 1.0, dim);
        } else {
            self.set_parm(NDTDSIZE, axis.size as f32, dim);
            self.set_parm(NDFTFLAG, 0.0, dim);
        }

        let td_size = self.get_parm(NDTDSIZE, dim);
        self.set_parm(NDAPOD, td_size, dim);
        self.set_parm(NDCENTER, (axis.size / 2 + 1) as f32, dim);

        self.compute_orig(dim, axis.size);
    }

    /// Compute and set the spectral origin (Hz of the last point).
    ///
    ///   orig = car * obs - sw * (size - center) / size
    pub fn compute_orig(&mut self, dim: i32, size: i32) {
        let sw = self.get_sw(dim);
        let obs = self.get_obs(dim);
        let car = self.get_car(dim);
        let center = self.get_parm(NDCENTER, dim) as f64;
        let size = size as f64;

        if size > 0.0 {
            let orig = car * obs - sw * (size - center) / size;
            self.set_parm(NDORIG, orig as f32, dim);
        }
    }

    pub fn set_aqsign(&mut self, dim: i32, aqsign: AqSign) {
        self.set_parm(NDAQSIGN, aqsign as i32 as f32, dim);
    }

    pub fn set_phase2d(&mut self, phase: Phase2D) {
        self.data[FD2DPHASE] = phase as i32 as f32;
    }

    pub fn get_phase2d(&self) -> Phase2D {
        Phase2D::from_i32(self.data[FD2DPHASE] as i32).unwrap_or(Phase2D::Magnitude)
    }

    pub fn set_quad_flag(&mut self, flag: QuadFlag) {
        self.data[FDQUADFLAG] = flag as i32 as f32;
    }

    // ─── Date/Time ──────────────────────────────────────────────────────

    pub fn set_date(&mut self, year: i32, month: i32, day: i32) {
        self.data[FDYEAR] = year as f32;
        self.data[FDMONTH] = month as f32;
        self.data[FDDAY] = day as f32;
    }

    pub fn set_time(&mut self, hours: i32, mins: i32, secs: i32) {
        self.data[FDHOURS] = hours as f32;
        self.data[FDMINS] = mins as f32;
        self.data[FDSECS] = secs as f32;
    }
}
