//! `.asc` column reader.
//!
//! The first line is a column caption and is skipped. Every following line
//! must have exactly the column count of the requested [`ArrayKind`]. Samples
//! are placed by a running cursor in row-major order; the index columns in the
//! file are not used for addressing.

use crate::array::{NmrArray, NmrData, Sample, Shape};
use crate::error::{AscError, Result};
use num_complex::Complex32;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Column layout of an `.asc` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    /// `index value`
    Real1D,
    /// `index real imag`
    Complex1D,
    /// `row col value`
    Real2D,
    /// `row col real imag`
    Complex2D,
}

impl ArrayKind {
    pub fn select(ndim: usize, complex: bool) -> ArrayKind {
        match (ndim, complex) {
            (1, false) => ArrayKind::Real1D,
            (1, true) => ArrayKind::Complex1D,
            (_, false) => ArrayKind::Real2D,
            (_, true) => ArrayKind::Complex2D,
        }
    }

    pub fn columns(self) -> usize {
        match self {
            ArrayKind::Real1D => 2,
            ArrayKind::Complex1D | ArrayKind::Real2D => 3,
            ArrayKind::Complex2D => 4,
        }
    }

    /// Number of leading index columns.
    fn index_columns(self) -> usize {
        match self {
            ArrayKind::Real1D | ArrayKind::Complex1D => 1,
            ArrayKind::Real2D | ArrayKind::Complex2D => 2,
        }
    }

    pub fn is_complex(self) -> bool {
        matches!(self, ArrayKind::Complex1D | ArrayKind::Complex2D)
    }
}

/// Reader settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Fail on short files and on 2D rows whose row coordinate drifts.
    pub strict_layout: bool,
}

/// Read an `.asc` file into an array of `shape`.
pub fn read_array(path: &Path, shape: Shape, kind: ArrayKind, opts: ReadOptions) -> Result<NmrData> {
    log::debug!("{}: reading {:?} {}", path.display(), kind, shape);

    let file = File::open(path).map_err(|e| AscError::file_access(path, e))?;
    let reader = BufReader::new(file);

    if kind.is_complex() {
        read_into(reader, path, shape, kind, opts, |v| Complex32::new(v[0], v[1]))
            .map(NmrData::Complex)
    } else {
        read_into(reader, path, shape, kind, opts, |v| v[0]).map(NmrData::Real)
    }
}

/// Tracks the row coordinate column of 2D files in strict mode.
#[derive(Clone, Copy)]
struct RowCheck {
    row: usize,
    coord: f64,
}

fn read_into<R, T, F>(
    reader: R,
    path: &Path,
    shape: Shape,
    kind: ArrayKind,
    opts: ReadOptions,
    make: F,
) -> Result<NmrArray<T>>
where
    R: BufRead,
    T: Sample,
    F: Fn(&[f32]) -> T,
{
    let mut array = NmrArray::zeros(shape);
    let width = shape.row_len();
    let capacity = shape.len();
    let expected = kind.columns();
    let skip = kind.index_columns();

    let mut cursor = 0usize;
    let mut row_check: Option<RowCheck> = None;
    let mut values = [0.0f32; 2];

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| AscError::file_access(path, e))?;
        if idx == 0 {
            continue;
        }
        let line_no = idx + 1;

        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() != expected {
            return Err(AscError::InvalidFormat {
                path: path.to_path_buf(),
                line: line_no,
                expected,
                found: cols.len(),
            });
        }

        if cursor >= capacity {
            return Err(AscError::ShapeOverflow {
                path: path.to_path_buf(),
                line: line_no,
                capacity,
            });
        }

        for (slot, token) in values.iter_mut().zip(&cols[skip..]) {
            *slot = parse_number(token, path, line_no)? as f32;
        }

        if opts.strict_layout && shape.ndim() == 2 {
            let coord = parse_number(cols[0], path, line_no)?;
            let row = cursor / width.max(1);
            match row_check {
                Some(RowCheck { row: r, coord: c }) if r == row => {
                    if c != coord {
                        return Err(AscError::IndexMismatch {
                            path: path.to_path_buf(),
                            line: line_no,
                            row,
                            expected: c,
                            found: coord,
                        });
                    }
                }
                _ => row_check = Some(RowCheck { row, coord }),
            }
        }

        array.as_mut_slice()[cursor] = make(&values[..]);
        cursor += 1;
    }

    if cursor < capacity {
        if opts.strict_layout {
            return Err(AscError::Truncated {
                path: path.to_path_buf(),
                expected: capacity,
                found: cursor,
            });
        }
        log::warn!(
            "{}: {} of {} samples present, the rest stay zero",
            path.display(),
            cursor,
            capacity
        );
    }

    Ok(array)
}

fn parse_number(token: &str, path: &Path, line: usize) -> Result<f64> {
    token.parse().map_err(|_| AscError::InvalidNumber {
        path: path.to_path_buf(),
        line,
        token: token.to_string(),
    })
}
