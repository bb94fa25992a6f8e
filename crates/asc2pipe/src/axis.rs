//! Per-axis metadata and the output metadata structure.

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use nmrpipe_core::enums::{AqSign, Phase2D, QuadFlag};
use nmrpipe_core::fdata::Fdata;
use nmrpipe_core::params::{AxisSpectral, CUR_XDIM, CUR_YDIM};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Time,
    Frequency,
}

/// How complex points are stored along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Direct axis: real/imaginary pairs.
    Complex,
    /// Indirect axis: States (hypercomplex) rows.
    States,
}

impl Encoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Complex => "complex",
            Encoding::States => "states",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDescriptor {
    /// Observe frequency in MHz.
    pub obs: f64,
    /// Carrier, `obs * offset` (Hz for an offset in ppm).
    pub car: f64,
    /// Sweep width in Hz.
    pub sw: f64,
    pub label: Option<String>,
    pub complex: bool,
    pub domain: Domain,
    /// Points along the axis; an indirect complex axis counts rows, so it is
    /// twice the number of complex points until the layout step runs.
    pub size: usize,
    pub encoding: Encoding,
}

impl AxisDescriptor {
    pub fn is_freq(&self) -> bool {
        self.domain == Domain::Frequency
    }

    pub fn is_time(&self) -> bool {
        self.domain == Domain::Time
    }

    /// Carrier position in ppm, as NMRPipe stores it.
    pub fn car_ppm(&self) -> f64 {
        if self.obs != 0.0 {
            self.car / self.obs
        } else {
            0.0
        }
    }

    /// Points per header slot: complex indirect rows count once per pair.
    fn pipe_size(&self, indirect: bool) -> usize {
        if self.complex && indirect {
            self.size / 2
        } else {
            self.size
        }
    }

    fn spectral(&self, indirect: bool) -> AxisSpectral<'_> {
        AxisSpectral {
            size: header_int(self.pipe_size(indirect)),
            sw: self.sw,
            obs: self.obs,
            car_ppm: self.car_ppm(),
            label: self.label.as_deref().unwrap_or(""),
            is_complex: self.complex,
            is_freq: self.is_freq(),
        }
    }
}

/// A point count as an NMRPipe integer slot.
///
/// `convert` rejects counts above [`crate::MAX_AXIS_POINTS`]; larger sizes on
/// hand-built descriptors clamp to `i32::MAX` rather than wrap.
fn header_int(points: usize) -> i32 {
    i32::try_from(points).unwrap_or(i32::MAX)
}

/// Conversion metadata: the direct axis and, for 2D data, the indirect axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub direct: AxisDescriptor,
    pub indirect: Option<AxisDescriptor>,
}

impl Metadata {
    pub fn ndim(&self) -> usize {
        if self.indirect.is_some() {
            2
        } else {
            1
        }
    }

    /// Axis by 0-based index, outermost first (`0` is the indirect axis of 2D data).
    pub fn axis(&self, idx: usize) -> Option<&AxisDescriptor> {
        match (&self.indirect, idx) {
            (Some(y), 0) => Some(y),
            (Some(_), 1) | (None, 0) => Some(&self.direct),
            _ => None,
        }
    }

    /// Axes outermost first.
    pub fn axes(&self) -> impl Iterator<Item = &AxisDescriptor> {
        self.indirect.iter().chain(std::iter::once(&self.direct))
    }

    /// NMRPipe header for this data, stamped with the current local time.
    pub fn to_fdata(&self) -> Fdata {
        self.to_fdata_at(Local::now().naive_local())
    }

    /// NMRPipe header for this data, stamped with `stamp`.
    pub fn to_fdata_at(&self, stamp: NaiveDateTime) -> Fdata {
        let mut fdata = Fdata::with_defaults();
        fdata.set_dim_count(self.ndim() as i32);
        fdata.set_phase2d(Phase2D::States);

        let x = &self.direct;
        fdata.set_axis_spectral(CUR_XDIM, &x.spectral(false));
        fdata.data[nmrpipe_core::FDSIZE] = header_int(x.size) as f32;
        fdata.data[nmrpipe_core::FDREALSIZE] = header_int(x.size) as f32;

        if let Some(y) = &self.indirect {
            fdata.set_axis_spectral(CUR_YDIM, &y.spectral(true));
            // FDSPECNUM counts stored rows, real and imaginary alike
            fdata.set_size(CUR_YDIM, header_int(y.size));
            fdata.set_aqsign(CUR_YDIM, AqSign::None);
        }

        let all_real = self.axes().all(|a| !a.complex);
        fdata.set_quad_flag(QuadFlag::from_complex(!all_real));

        fdata.set_date(stamp.year(), stamp.month() as i32, stamp.day() as i32);
        fdata.set_time(
            stamp.hour() as i32,
            stamp.minute() as i32,
            stamp.second() as i32,
        );

        fdata
    }
}
