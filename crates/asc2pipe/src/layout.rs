//! Indirect-axis rearrangements needed before data matches NMRPipe's layout.
//!
//! The export stores the two States components of a complex indirect axis as
//! two consecutive blocks of rows. In the time domain NMRPipe wants them as
//! alternating rows; in the frequency domain it wants only the first block.

use crate::array::{NmrArray, NmrData, Sample, Shape};
use crate::axis::AxisDescriptor;
use crate::error::{AscError, Result};

/// Transform selected by the indirect axis descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndirectLayout {
    /// Complex, time domain: blocks become alternating rows.
    Interleave,
    /// Complex, frequency domain: the sine-modulated block is dropped.
    DropSineModulation,
    /// Real indirect axis: nothing to do.
    Unchanged,
}

impl IndirectLayout {
    pub fn for_axis(axis: &AxisDescriptor) -> IndirectLayout {
        match (axis.complex, axis.is_time()) {
            (true, true) => IndirectLayout::Interleave,
            (true, false) => IndirectLayout::DropSineModulation,
            (false, _) => IndirectLayout::Unchanged,
        }
    }
}

/// Apply the layout transform chosen by `y` to 2D `data`, updating `y`.
///
/// Dropping the sine-modulated block halves `y.size` and marks the axis real.
pub fn apply_indirect_layout(data: NmrData, y: &mut AxisDescriptor) -> Result<NmrData> {
    let layout = IndirectLayout::for_axis(y);
    log::debug!("indirect layout: {:?}", layout);

    match layout {
        IndirectLayout::Interleave => Ok(match data {
            NmrData::Real(a) => NmrData::Real(interleave_states(&a)?),
            NmrData::Complex(a) => NmrData::Complex(interleave_states(&a)?),
        }),
        IndirectLayout::DropSineModulation => {
            y.size /= 2;
            y.complex = false;
            Ok(match data {
                NmrData::Real(a) => NmrData::Real(drop_sine_modulation(a)),
                NmrData::Complex(a) => NmrData::Complex(drop_sine_modulation(a)),
            })
        }
        IndirectLayout::Unchanged => Ok(data),
    }
}

/// Redistribute rows `[0, N/2)` to even rows and `[N/2, N)` to odd rows.
///
/// Even rows take the conjugate of their source, odd rows the negated
/// conjugate. The row count must be even.
pub fn interleave_states<T: Sample>(data: &NmrArray<T>) -> Result<NmrArray<T>> {
    let (rows, cols) = two_d(data.shape());
    if rows % 2 != 0 {
        return Err(AscError::Layout { rows });
    }

    let half = rows / 2;
    let src = data.as_slice();
    let mut out = NmrArray::zeros(data.shape());
    let dst = out.as_mut_slice();

    for i in 0..half {
        let cos_row = &src[i * cols..(i + 1) * cols];
        let sin_row = &src[(half + i) * cols..(half + i + 1) * cols];

        let even = &mut dst[2 * i * cols..(2 * i + 1) * cols];
        for (d, &s) in even.iter_mut().zip(cos_row) {
            *d = s.conj();
        }

        let odd = &mut dst[(2 * i + 1) * cols..(2 * i + 2) * cols];
        for (d, &s) in odd.iter_mut().zip(sin_row) {
            *d = -s.conj();
        }
    }

    Ok(out)
}

/// Keep rows `[0, N/2)`.
pub fn drop_sine_modulation<T: Sample>(data: NmrArray<T>) -> NmrArray<T> {
    let (rows, _) = two_d(data.shape());
    data.truncate_rows(rows / 2)
}

/// 1D data is treated as a single row.
fn two_d(shape: Shape) -> (usize, usize) {
    match shape {
        Shape::OneD(n) => (1, n),
        Shape::TwoD { rows, cols } => (rows, cols),
    }
}
