//! `<dim>_list` blocks embedded in a `.hdr` file.
//!
//! A block is a `<dim>_list N` line followed by N entry lines. Only the first
//! token of each entry line is read.

use crate::convert::header_path_for;
use crate::error::{AscError, Result};
use crate::header::HeaderValue;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read the `<dim>_list` block from the header next to `asc_path`.
///
/// Entries are typed like header values and SI-normalized. A header without
/// the block yields an empty list.
pub fn read_list_values(asc_path: &Path, dim: &str) -> Result<Vec<HeaderValue>> {
    let hdr_path = header_path_for(asc_path)?;
    let file = File::open(&hdr_path).map_err(|e| AscError::file_access(&hdr_path, e))?;
    let values = list_values_from_reader(BufReader::new(file), dim).map_err(|e| match e {
        ListError::Io(source) => AscError::file_access(&hdr_path, source),
        ListError::Count(reason) => AscError::invalid(&format!("{dim}_list"), reason),
    })?;
    log::debug!(
        "{}: {} entries in {}_list",
        hdr_path.display(),
        values.len(),
        dim
    );
    Ok(values)
}

#[derive(Debug)]
pub(crate) enum ListError {
    Io(std::io::Error),
    Count(String),
}

pub(crate) fn list_values_from_reader<R: BufRead>(
    reader: R,
    dim: &str,
) -> std::result::Result<Vec<HeaderValue>, ListError> {
    let marker = format!("{dim}_list");
    let mut lines = reader.lines();

    let count = loop {
        let Some(line) = lines.next() else {
            log::trace!("no {} block", marker);
            return Ok(Vec::new());
        };
        let line = line.map_err(ListError::Io)?;
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some(marker.as_str()) {
            continue;
        }
        let raw = tokens
            .next()
            .ok_or_else(|| ListError::Count("missing entry count".into()))?;
        break raw
            .parse::<usize>()
            .map_err(|_| ListError::Count(format!("bad entry count `{raw}`")))?;
    };

    let mut values = Vec::with_capacity(count);
    for line in lines.take(count) {
        let line = line.map_err(ListError::Io)?;
        // blank lines still use up an entry slot
        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        match HeaderValue::parse(token) {
            Some(value) => values.push(value.normalized()),
            None => log::trace!("{}: entry {:?} not typed", marker, token),
        }
    }

    Ok(values)
}
