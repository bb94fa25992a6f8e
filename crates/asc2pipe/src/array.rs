//! Row-major 1D/2D sample buffers, real (`f32`) or complex (`Complex32`).

use num_complex::Complex32;
use std::fmt;
use std::ops::Neg;

/// Array dimensions; 2D is `(indirect rows, direct columns)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    OneD(usize),
    TwoD { rows: usize, cols: usize },
}

impl Shape {
    pub fn len(&self) -> usize {
        match *self {
            Shape::OneD(n) => n,
            Shape::TwoD { rows, cols } => rows * cols,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ndim(&self) -> usize {
        match self {
            Shape::OneD(_) => 1,
            Shape::TwoD { .. } => 2,
        }
    }

    /// Length of one row (the direct axis).
    pub fn row_len(&self) -> usize {
        match *self {
            Shape::OneD(n) => n,
            Shape::TwoD { cols, .. } => cols,
        }
    }

    pub fn row_count(&self) -> usize {
        match *self {
            Shape::OneD(_) => 1,
            Shape::TwoD { rows, .. } => rows,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::OneD(n) => write!(f, "({n},)"),
            Shape::TwoD { rows, cols } => write!(f, "({rows}, {cols})"),
        }
    }
}

/// Element types an [`NmrArray`] can hold.
pub trait Sample: Copy + Default + PartialEq + fmt::Debug + Neg<Output = Self> {
    /// Complex conjugate; identity for real samples.
    fn conj(self) -> Self;
}

impl Sample for f32 {
    fn conj(self) -> Self {
        self
    }
}

impl Sample for Complex32 {
    fn conj(self) -> Self {
        Complex32::conj(&self)
    }
}

/// Owned sample buffer with a fixed shape.
#[derive(Debug, Clone, PartialEq)]
pub struct NmrArray<T> {
    shape: Shape,
    data: Vec<T>,
}

impl<T: Sample> NmrArray<T> {
    pub fn zeros(shape: Shape) -> Self {
        Self {
            shape,
            data: vec![T::default(); shape.len()],
        }
    }

    /// Wrap a buffer; `None` when its length does not fit the shape.
    pub fn from_vec(shape: Shape, data: Vec<T>) -> Option<Self> {
        (data.len() == shape.len()).then_some(Self { shape, data })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Keep the first `keep` rows of a 2D array.
    pub fn truncate_rows(mut self, keep: usize) -> Self {
        if let Shape::TwoD { rows, cols } = self.shape {
            let keep = keep.min(rows);
            self.data.truncate(keep * cols);
            self.shape = Shape::TwoD { rows: keep, cols };
        }
        self
    }

    pub fn row(&self, idx: usize) -> Option<&[T]> {
        let width = self.shape.row_len();
        (idx < self.shape.row_count()).then(|| &self.data[idx * width..(idx + 1) * width])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact panics on a zero width; an empty row yields nothing anyway
        self.data.chunks_exact(self.shape.row_len().max(1))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if col >= self.shape.row_len() {
            return None;
        }
        self.row(row).map(|r| r[col])
    }
}

/// A converted data set.
#[derive(Debug, Clone, PartialEq)]
pub enum NmrData {
    Real(NmrArray<f32>),
    Complex(NmrArray<Complex32>),
}

impl NmrData {
    pub fn shape(&self) -> Shape {
        match self {
            NmrData::Real(a) => a.shape(),
            NmrData::Complex(a) => a.shape(),
        }
    }

    pub fn len(&self) -> usize {
        self.shape().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, NmrData::Complex(_))
    }

    pub fn as_real(&self) -> Option<&NmrArray<f32>> {
        match self {
            NmrData::Real(a) => Some(a),
            NmrData::Complex(_) => None,
        }
    }

    pub fn as_complex(&self) -> Option<&NmrArray<Complex32>> {
        match self {
            NmrData::Complex(a) => Some(a),
            NmrData::Real(_) => None,
        }
    }

    /// Lay the samples out as NMRPipe float data: one plane holding every
    /// row, each complex row written as its real parts then its imaginary parts.
    pub fn to_pipe_planes(&self) -> Vec<Vec<f32>> {
        let plane = match self {
            NmrData::Real(a) => a.as_slice().to_vec(),
            NmrData::Complex(a) => {
                let mut out = Vec::with_capacity(a.len() * 2);
                for row in a.rows() {
                    out.extend(row.iter().map(|c| c.re));
                    out.extend(row.iter().map(|c| c.im));
                }
                out
            }
        };
        vec![plane]
    }
}
