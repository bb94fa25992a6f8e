//! Top-level JEOL generic-ASCII → NMRPipe conversion.
//!
//! Validates the `.asc` name, reads the sibling `.hdr`, builds the axis
//! descriptors, reads the samples, and applies the indirect-axis layout.

use crate::array::{NmrData, Shape};
use crate::axis::{AxisDescriptor, Domain, Encoding, Metadata};
use crate::error::{AscError, Result};
use crate::header::{Header, HeaderValue};
use crate::layout::apply_indirect_layout;
use crate::reader::{read_array, ArrayKind, ReadOptions};
use crate::units::{self, PPM};
use byteorder::{ByteOrder, NativeEndian};
use nmrpipe_core::fdata::Fdata;
use num_complex::Complex32;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Data file extension.
pub const ASC_EXT: &str = "asc";
/// Header file extension.
pub const HDR_EXT: &str = "hdr";

/// Largest point count an axis may declare; NMRPipe stores sizes as `i32`.
pub const MAX_AXIS_POINTS: usize = i32::MAX as usize;

/// Options for `.asc` → NMRPipe conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AscOptions {
    /// Reject short data files and 2D rows whose row coordinate drifts
    /// instead of placing samples purely by line order.
    pub strict_layout: bool,
}

/// Result of a conversion: metadata plus samples.
#[derive(Debug, Clone)]
pub struct AscResult {
    pub metadata: Metadata,
    pub data: NmrData,
}

/// NMRPipe header plus float planes, ready for an NMRPipe writer.
#[derive(Debug)]
pub struct PipeResult {
    pub fdata: Fdata,
    pub planes: Vec<Vec<f32>>,
}

impl PipeResult {
    /// Write an NMRPipe data file: the 2048-byte header, then every plane,
    /// all native endian.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.fdata.to_bytes())?;
        for plane in &self.planes {
            let mut buf = vec![0u8; plane.len() * 4];
            NativeEndian::write_f32_into(plane, &mut buf);
            writer.write_all(&buf)?;
        }
        Ok(())
    }
}

impl AscResult {
    pub fn to_pipe(&self) -> PipeResult {
        PipeResult {
            fdata: self.metadata.to_fdata(),
            planes: self.data.to_pipe_planes(),
        }
    }
}

/// Header path for an `.asc` data path, e.g. `run.asc` → `run.hdr`.
///
/// Fails before any file access when the name does not end in `.asc`.
pub fn header_path_for(asc_path: &Path) -> Result<PathBuf> {
    let has_stem = asc_path
        .file_stem()
        .map(|s| !s.is_empty())
        .unwrap_or(false);
    let is_asc = asc_path.extension().map(|e| e == ASC_EXT).unwrap_or(false);

    if !(has_stem && is_asc) {
        return Err(AscError::Naming {
            path: asc_path.to_path_buf(),
        });
    }

    Ok(asc_path.with_extension(HDR_EXT))
}

/// Convert a `.asc` file and its `.hdr` sibling.
pub fn convert(asc_path: &Path, opts: &AscOptions) -> Result<AscResult> {
    let hdr_path = header_path_for(asc_path)?;
    let header = Header::parse(&hdr_path)?;

    let dims = header.int("dimensions")?;
    if !(1..=2).contains(&dims) {
        return Err(AscError::Unsupported { dims });
    }

    let direct = axis_descriptor(&header, "x", Encoding::Complex)?;
    if direct.label.is_none() {
        return Err(AscError::missing("x_domain"));
    }
    let mut indirect = if dims == 2 {
        Some(indirect_descriptor(&header)?)
    } else {
        None
    };

    let shape = checked_shape(&direct, indirect.as_ref())?;
    let kind = ArrayKind::select(dims as usize, direct.complex);
    let read_opts = ReadOptions {
        strict_layout: opts.strict_layout,
    };

    let mut data = read_array(asc_path, shape, kind, read_opts)?;

    if let Some(y) = indirect.as_mut() {
        data = apply_indirect_layout(data, y)?;
    }

    let metadata = Metadata { direct, indirect };
    log::info!(
        "{}: {}D {} data, shape {}",
        asc_path.display(),
        metadata.ndim(),
        if data.is_complex() { "complex" } else { "real" },
        data.shape()
    );

    Ok(AscResult { metadata, data })
}

/// Indirect axis: rows are doubled for a complex axis, and an absent
/// label forces the observe frequency to 1.0.
fn indirect_descriptor(header: &Header) -> Result<AxisDescriptor> {
    let mut y = axis_descriptor(header, "y", Encoding::States)?;
    if y.complex {
        let points = y.size;
        y.size = points
            .checked_mul(2)
            .filter(|&rows| rows <= MAX_AXIS_POINTS)
            .ok_or_else(|| {
                AscError::invalid("y_curr_points", format!("{points} complex points overflow"))
            })?;
    }
    if y.label.is_none() {
        y.obs = 1.0;
    }
    Ok(y)
}

fn axis_descriptor(header: &Header, axis: &str, encoding: Encoding) -> Result<AxisDescriptor> {
    let field = |name: &str| format!("{axis}_{name}");

    let freq_field = field("freq");
    let (freq, freq_unit) = header.quantity(&freq_field)?;
    let (freq_hz, _) = units::normalize(freq, freq_unit);
    let obs = freq_hz / 1.0e6;

    let car = obs * header.float(&field("offset"))?;

    let sweep_field = field("sweep");
    let (sweep, sweep_unit) = header.quantity(&sweep_field)?;
    let (sw, _) = units::normalize(sweep, sweep_unit);

    let label = match header.get(&field("domain")) {
        Some(HeaderValue::Str(s)) => Some(s.clone()),
        Some(_) => return Err(AscError::invalid(&field("domain"), "expected a string")),
        None => None,
    };

    let complex = header.text(&field("format"))? == "COMPLEX";

    let domain = match header.get(&field("start")) {
        Some(v) if is_ppm(v) => Domain::Frequency,
        _ => Domain::Time,
    };

    let points_field = field("curr_points");
    let points = header.int(&points_field)?;
    let size = usize::try_from(points)
        .map_err(|_| AscError::invalid(&points_field, format!("negative point count {points}")))?;
    if size > MAX_AXIS_POINTS {
        return Err(AscError::invalid(
            &points_field,
            format!("{points} points exceed {MAX_AXIS_POINTS}"),
        ));
    }

    Ok(AxisDescriptor {
        obs,
        car,
        sw,
        label,
        complex,
        domain,
        size,
        encoding,
    })
}

/// Array shape for the declared axes; the sample buffer must be addressable.
fn checked_shape(x: &AxisDescriptor, y: Option<&AxisDescriptor>) -> Result<Shape> {
    let Some(y) = y else {
        return Ok(Shape::OneD(x.size));
    };

    let sample_bytes = if x.complex {
        std::mem::size_of::<Complex32>()
    } else {
        std::mem::size_of::<f32>()
    };
    let fits = y
        .size
        .checked_mul(x.size)
        .and_then(|n| n.checked_mul(sample_bytes))
        .is_some_and(|bytes| bytes <= isize::MAX as usize);
    if !fits {
        return Err(AscError::invalid(
            "y_curr_points",
            format!("{} rows of {} points do not fit in memory", y.size, x.size),
        ));
    }

    Ok(Shape::TwoD {
        rows: y.size,
        cols: x.size,
    })
}

/// A start value in ppm (`12.5[ppm]`) or the literal `"ppm"` marks a frequency axis.
fn is_ppm(value: &HeaderValue) -> bool {
    value.unit() == Some(PPM) || value.as_str() == Some(PPM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HDR_1D: &str = "\
dimensions 1
x_format \"COMPLEX\"
x_curr_points 4
x_freq 400.0[MHz]
x_offset 4.7
x_sweep 5000.0[Hz]
x_domain \"1H\"
x_start \"ppm\"
";

    fn pair(dir: &Path, hdr: &str, asc: &str) -> PathBuf {
        fs::write(dir.join("run.hdr"), hdr).unwrap();
        let asc_path = dir.join("run.asc");
        fs::write(&asc_path, asc).unwrap();
        asc_path
    }

    #[test]
    fn test_header_path_for() {
        assert_eq!(
            header_path_for(Path::new("/data/run.asc")).unwrap(),
            PathBuf::from("/data/run.hdr")
        );
        for bad in ["/data/run.txt", "/data/run", "/data/.asc", "/data/run.asc.bak"] {
            assert!(matches!(
                header_path_for(Path::new(bad)),
                Err(AscError::Naming { .. })
            ));
        }
    }

    #[test]
    fn test_naming_error_before_io() {
        let err = convert(Path::new("/nonexistent/run.dat"), &AscOptions::default()).unwrap_err();
        assert!(matches!(err, AscError::Naming { .. }));
    }

    #[test]
    fn test_end_to_end_1d_complex() {
        let dir = tempdir().unwrap();
        let asc = pair(
            dir.path(),
            HDR_1D,
            "x re im\n0 1.0 -1.0\n1 2.0 -2.0\n2 3.0 -3.0\n3 4.0 -4.0\n",
        );

        let result = convert(&asc, &AscOptions::default()).unwrap();
        let x = &result.metadata.direct;
        assert_eq!(result.metadata.ndim(), 1);
        assert!((x.obs - 400.0).abs() < 1e-9);
        assert!((x.car - 1880.0).abs() < 1e-9);
        assert!((x.sw - 5000.0).abs() < 1e-9);
        assert!(x.is_freq());
        assert!(!x.is_time());
        assert_eq!(x.label.as_deref(), Some("1H"));
        assert_eq!(x.encoding, Encoding::Complex);

        let arr = result.data.as_complex().unwrap();
        assert_eq!(arr.len(), 4);
        assert_eq!(arr.as_slice()[2].re, 3.0);
        assert_eq!(arr.as_slice()[2].im, -3.0);
    }

    #[test]
    fn test_dimension_3_is_unsupported_before_data_read() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("run.hdr"), "dimensions 3\n").unwrap();
        // no .asc on disk: the dimension check must fail first
        let err = convert(&dir.path().join("run.asc"), &AscOptions::default()).unwrap_err();
        assert!(matches!(err, AscError::Unsupported { dims: 3 }));
    }

    #[test]
    fn test_dimension_0_is_unsupported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("run.hdr"), "dimensions 0\n").unwrap();
        let err = convert(&dir.path().join("run.asc"), &AscOptions::default()).unwrap_err();
        assert!(matches!(err, AscError::Unsupported { dims: 0 }));
    }

    #[test]
    fn test_negative_point_count() {
        let dir = tempdir().unwrap();
        let hdr = HDR_1D.replace("x_curr_points 4", "x_curr_points -4");
        let asc = pair(dir.path(), &hdr, "x re im\n");
        let err = convert(&asc, &AscOptions::default()).unwrap_err();
        assert!(matches!(err, AscError::InvalidField { field, .. } if field == "x_curr_points"));
    }

    fn hdr_2d(x_points: u64, y_points: u64, y_format: &str) -> String {
        format!(
            "{}dimensions 2\nx_curr_points {x_points}\ny_format \"{y_format}\"\n\
             y_curr_points {y_points}\ny_freq 100.0[MHz]\ny_offset 77.0\n\
             y_sweep 20.0[kHz]\ny_domain \"13C\"\n",
            HDR_1D
        )
    }

    fn size_error_field(hdr: &str) -> String {
        let dir = tempdir().unwrap();
        // no .asc on disk: sizes must be rejected before any data is read
        fs::write(dir.path().join("run.hdr"), hdr).unwrap();
        match convert(&dir.path().join("run.asc"), &AscOptions::default()) {
            Err(AscError::InvalidField { field, .. }) => field,
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn test_huge_point_counts_are_rejected() {
        assert_eq!(
            size_error_field(&hdr_2d(4_294_967_296, 4_294_967_296, "COMPLEX")),
            "x_curr_points"
        );
        assert_eq!(
            size_error_field(&hdr_2d(4, 4_294_967_296, "REAL")),
            "y_curr_points"
        );
    }

    #[test]
    fn test_complex_rows_overflow_is_rejected() {
        assert_eq!(
            size_error_field(&hdr_2d(4, 1_500_000_000, "COMPLEX")),
            "y_curr_points"
        );
    }

    #[test]
    fn test_unaddressable_buffer_is_rejected() {
        assert_eq!(
            size_error_field(&hdr_2d(2_000_000_000, 2_000_000_000, "REAL")),
            "y_curr_points"
        );
    }

    #[test]
    fn test_missing_start_means_time_domain() {
        let dir = tempdir().unwrap();
        let hdr = HDR_1D.replace("x_start \"ppm\"\n", "");
        let asc = pair(dir.path(), &hdr, "x re im\n0 1 1\n1 2 2\n2 3 3\n3 4 4\n");
        let result = convert(&asc, &AscOptions::default()).unwrap();
        assert!(result.metadata.direct.is_time());
        assert!(!result.metadata.direct.is_freq());
    }

    #[test]
    fn test_missing_header_file() {
        let dir = tempdir().unwrap();
        let err = convert(&dir.path().join("run.asc"), &AscOptions::default()).unwrap_err();
        assert!(matches!(err, AscError::FileAccess { .. }));
    }

    #[test]
    fn test_missing_direct_field() {
        let dir = tempdir().unwrap();
        let hdr = HDR_1D.replace("x_sweep 5000.0[Hz]\n", "");
        let asc = pair(dir.path(), &hdr, "x re im\n");
        let err = convert(&asc, &AscOptions::default()).unwrap_err();
        assert!(matches!(err, AscError::MissingField { field } if field == "x_sweep"));
    }

    #[test]
    fn test_time_domain_when_start_is_seconds() {
        let dir = tempdir().unwrap();
        let hdr = HDR_1D
            .replace("x_start \"ppm\"", "x_start 0[s]")
            .replace("x_format \"COMPLEX\"", "x_format \"REAL\"");
        let asc = pair(dir.path(), &hdr, "x v\n0 1\n1 2\n2 3\n3 4\n");
        let result = convert(&asc, &AscOptions::default()).unwrap();
        assert!(result.metadata.direct.is_time());
        assert!(!result.data.is_complex());
        assert_eq!(result.data.len(), 4);
    }

    #[test]
    fn test_indirect_without_label_gets_unit_obs() {
        let dir = tempdir().unwrap();
        let hdr = "\
dimensions 2
x_format \"REAL\"
x_curr_points 2
x_freq 400.0[MHz]
x_offset 4.7[ppm]
x_sweep 5.0[kHz]
x_domain \"1H\"
x_start 10.0[ppm]
y_format \"REAL\"
y_curr_points 2
y_freq 100.0[MHz]
y_offset 77.0[ppm]
y_sweep 20.0[kHz]
y_start 200.0[ppm]
";
        let asc = pair(dir.path(), hdr, "y x v\n0 0 1\n0 1 2\n1 0 3\n1 1 4\n");
        let result = convert(&asc, &AscOptions::default()).unwrap();
        let y = result.metadata.indirect.as_ref().unwrap();
        assert_eq!(y.label, None);
        assert_eq!(y.obs, 1.0);
        assert!((y.car - 7700.0).abs() < 1e-6);
        assert!((y.sw - 20000.0).abs() < 1e-9);
        assert_eq!(y.encoding, Encoding::States);
        assert_eq!(result.data.shape(), Shape::TwoD { rows: 2, cols: 2 });
    }

    #[test]
    fn test_to_pipe() {
        let dir = tempdir().unwrap();
        let asc = pair(dir.path(), HDR_1D, "x re im\n0 1 5\n1 2 6\n2 3 7\n3 4 8\n");
        let pipe = convert(&asc, &AscOptions::default()).unwrap().to_pipe();
        assert_eq!(pipe.fdata.dim_count(), 1);
        assert_eq!(pipe.planes[0], [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);

        let mut out = Vec::new();
        pipe.write_to(&mut out).unwrap();
        assert_eq!(out.len(), nmrpipe_core::FDATA_BYTES + 8 * 4);
        let (fdata, _) = Fdata::from_bytes(&out).unwrap();
        assert_eq!(fdata.dim_count(), 1);
        assert_eq!(NativeEndian::read_f32(&out[nmrpipe_core::FDATA_BYTES + 4..]), 2.0);
    }
}
