//! `.hdr` parsing: one `<field> <value...>` record per line.
//!
//! The value tokens of a line are concatenated without a separator before
//! typing, so `"a b"` is read as `"ab"`. Lines with fewer than two tokens and
//! values no rule accepts are skipped.

use crate::error::{AscError, Result};
use crate::units;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// A typed header value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HeaderValue {
    Bool(bool),
    Str(String),
    Int(i64),
    Float(f64),
    /// A number with a bracketed unit, e.g. `400.13[MHz]`.
    Quantity { value: f64, unit: String },
}

impl HeaderValue {
    /// Type a raw value string with the first matching rule in [`VALUE_RULES`].
    pub fn parse(raw: &str) -> Option<HeaderValue> {
        VALUE_RULES.iter().find_map(|rule| (rule.convert)(raw))
    }

    pub fn unit(&self) -> Option<&str> {
        match self {
            HeaderValue::Quantity { unit, .. } => Some(unit),
            _ => None,
        }
    }

    /// Numeric magnitude of integer, float and quantity values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HeaderValue::Int(i) => Some(*i as f64),
            HeaderValue::Float(f) => Some(*f),
            HeaderValue::Quantity { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HeaderValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HeaderValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Quantity with its SI prefix removed; other values are returned as-is.
    pub fn normalized(self) -> HeaderValue {
        match self {
            HeaderValue::Quantity { value, unit } => {
                let (value, unit) = units::normalize(value, Some(&unit));
                HeaderValue::Quantity {
                    value,
                    unit: unit.unwrap_or_default(),
                }
            }
            other => other,
        }
    }
}

// ─── Value typing rules ─────────────────────────────────────────────────────

/// A named conversion from a raw value string.
pub struct ValueRule {
    pub name: &'static str,
    pub convert: fn(&str) -> Option<HeaderValue>,
}

/// Typing rules in priority order; the first that accepts a value wins.
///
/// Quoted forms come before bare numbers, and the bracketed-unit form comes
/// before the bare float.
pub const VALUE_RULES: [ValueRule; 5] = [
    ValueRule {
        name: "bool",
        convert: parse_bool,
    },
    ValueRule {
        name: "string",
        convert: parse_quoted,
    },
    ValueRule {
        name: "quantity",
        convert: parse_quantity,
    },
    ValueRule {
        name: "int",
        convert: parse_int,
    },
    ValueRule {
        name: "float",
        convert: parse_float,
    },
];

fn parse_bool(raw: &str) -> Option<HeaderValue> {
    if raw.starts_with("\"TRUE\"") {
        Some(HeaderValue::Bool(true))
    } else if raw.starts_with("\"FALSE\"") {
        Some(HeaderValue::Bool(false))
    } else {
        None
    }
}

/// Text between the leading quote and the last quote.
fn parse_quoted(raw: &str) -> Option<HeaderValue> {
    let rest = raw.strip_prefix('"')?;
    let end = rest.rfind('"')?;
    Some(HeaderValue::Str(rest[..end].to_string()))
}

fn parse_quantity(raw: &str) -> Option<HeaderValue> {
    let open = raw.find('[')?;
    let unit = raw[open + 1..].strip_suffix(']')?;
    let number = &raw[..open];
    if unit.is_empty() || !is_decimal(number) {
        return None;
    }
    Some(HeaderValue::Quantity {
        value: number.parse().ok()?,
        unit: unit.to_string(),
    })
}

fn parse_int(raw: &str) -> Option<HeaderValue> {
    if !is_integer(raw) {
        return None;
    }
    raw.parse().ok().map(HeaderValue::Int)
}

fn parse_float(raw: &str) -> Option<HeaderValue> {
    if !is_decimal(raw) || !raw.contains('.') {
        return None;
    }
    raw.parse().ok().map(HeaderValue::Float)
}

fn strip_sign(s: &str) -> &str {
    s.strip_prefix(['+', '-']).unwrap_or(s)
}

/// `[+-]digits`
fn is_integer(s: &str) -> bool {
    let digits = strip_sign(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `[+-]digits[.digits*]`
fn is_decimal(s: &str) -> bool {
    let body = strip_sign(s);
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, f),
        None => (body, ""),
    };
    !int_part.is_empty()
        && int_part.bytes().all(|b| b.is_ascii_digit())
        && frac_part.bytes().all(|b| b.is_ascii_digit())
}

// ─── Header map ─────────────────────────────────────────────────────────────

/// Split a header line into its field name and concatenated raw value.
pub fn split_record(line: &str) -> Option<(&str, String)> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?;
    let value: String = tokens.collect();
    if value.is_empty() {
        return None;
    }
    Some((name, value))
}

/// Parsed `.hdr` fields in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    fields: IndexMap<String, HeaderValue>,
}

impl Header {
    /// Read and type every record of a header file.
    pub fn parse(path: &Path) -> Result<Header> {
        let file = File::open(path).map_err(|e| AscError::file_access(path, e))?;
        let header =
            Self::from_reader(BufReader::new(file)).map_err(|e| AscError::file_access(path, e))?;
        log::debug!("{}: {} header fields", path.display(), header.len());
        Ok(header)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Header> {
        let mut header = Header::default();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let Some((name, raw)) = split_record(&line) else {
                log::trace!("line {}: skipped, fewer than two tokens", idx + 1);
                continue;
            };

            match HeaderValue::parse(&raw) {
                Some(value) => header.insert(name, value),
                None => log::trace!("line {}: `{}` value {:?} not typed", idx + 1, name, raw),
            }
        }

        Ok(header)
    }

    /// Insert or overwrite a field, keeping its original position.
    pub fn insert(&mut self, name: &str, value: HeaderValue) {
        self.fields.insert(name.to_string(), value);
    }

    pub fn get(&self, field: &str) -> Option<&HeaderValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn require(&self, field: &str) -> Result<&HeaderValue> {
        self.get(field).ok_or_else(|| AscError::missing(field))
    }

    pub fn int(&self, field: &str) -> Result<i64> {
        let value = self.require(field)?;
        value
            .as_i64()
            .ok_or_else(|| AscError::invalid(field, format!("expected an integer, got {value:?}")))
    }

    /// Raw magnitude of a numeric field (no unit scaling).
    pub fn float(&self, field: &str) -> Result<f64> {
        let value = self.require(field)?;
        value
            .as_f64()
            .ok_or_else(|| AscError::invalid(field, format!("expected a number, got {value:?}")))
    }

    /// Magnitude and unit of a numeric field.
    pub fn quantity(&self, field: &str) -> Result<(f64, Option<&str>)> {
        let value = self.require(field)?;
        let magnitude = value
            .as_f64()
            .ok_or_else(|| AscError::invalid(field, format!("expected a number, got {value:?}")))?;
        Ok((magnitude, value.unit()))
    }

    pub fn text(&self, field: &str) -> Result<&str> {
        let value = self.require(field)?;
        value
            .as_str()
            .ok_or_else(|| AscError::invalid(field, format!("expected a string, got {value:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header(text: &str) -> Header {
        Header::from_reader(Cursor::new(text)).unwrap()
    }

    #[test]
    fn test_quoted_string() {
        let h = header("x_format \"COMPLEX\"\n");
        assert_eq!(h.get("x_format"), Some(&HeaderValue::Str("COMPLEX".into())));
        assert_eq!(h.get("x_format").unwrap().unit(), None);
    }

    #[test]
    fn test_quantity() {
        let h = header("x_freq 400.13[MHz]\n");
        assert_eq!(
            h.get("x_freq"),
            Some(&HeaderValue::Quantity {
                value: 400.13,
                unit: "MHz".into()
            })
        );
        assert_eq!(h.quantity("x_freq").unwrap(), (400.13, Some("MHz")));
    }

    #[test]
    fn test_booleans() {
        let h = header("flag \"TRUE\"\nother \"FALSE\"\n");
        assert_eq!(h.get("flag"), Some(&HeaderValue::Bool(true)));
        assert_eq!(h.get("other").and_then(HeaderValue::as_bool), Some(false));
    }

    #[test]
    fn test_bare_numbers() {
        let h = header("dimensions 2\nx_offset 4.7\nneg -12\ntrailing 5.\n");
        assert_eq!(h.int("dimensions").unwrap(), 2);
        assert_eq!(h.get("x_offset"), Some(&HeaderValue::Float(4.7)));
        assert_eq!(h.get("neg"), Some(&HeaderValue::Int(-12)));
        assert_eq!(h.get("trailing"), Some(&HeaderValue::Float(5.0)));
    }

    #[test]
    fn test_rule_order_is_load_bearing() {
        // quotes keep digits from being read as an integer
        assert_eq!(
            HeaderValue::parse("\"123\""),
            Some(HeaderValue::Str("123".into()))
        );
        // the unit suffix survives because quantity runs before float
        assert_eq!(
            HeaderValue::parse("1.5[ms]"),
            Some(HeaderValue::Quantity {
                value: 1.5,
                unit: "ms".into()
            })
        );
        let names: Vec<_> = VALUE_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, ["bool", "string", "quantity", "int", "float"]);
    }

    #[test]
    fn test_quoted_value_loses_inner_spaces() {
        let h = header("title \"my sample run\"\n");
        assert_eq!(h.text("title").unwrap(), "mysamplerun");
    }

    #[test]
    fn test_skips_short_and_untyped_lines() {
        let h = header("\nlonely\nx_list 3\ncomment hello\nbad 1.2.3\n");
        assert_eq!(h.len(), 1);
        assert!(h.contains("x_list"));
        assert!(!h.contains("comment"));
        assert!(!h.contains("bad"));
    }

    #[test]
    fn test_last_assignment_wins() {
        let h = header("a 1\nb 2\na 3\n");
        assert_eq!(h.int("a").unwrap(), 3);
        let order: Vec<_> = h.iter().map(|(k, _)| k).collect();
        assert_eq!(order, ["a", "b"]);
    }

    #[test]
    fn test_typed_accessor_errors() {
        let h = header("x_domain \"1H\"\n");
        assert!(matches!(
            h.int("dimensions"),
            Err(AscError::MissingField { field }) if field == "dimensions"
        ));
        assert!(matches!(
            h.float("x_domain"),
            Err(AscError::InvalidField { field, .. }) if field == "x_domain"
        ));
    }

    #[test]
    fn test_quantity_requires_number_and_unit() {
        assert_eq!(HeaderValue::parse("abc[Hz]"), None);
        assert_eq!(HeaderValue::parse("1.0[]"), None);
        assert_eq!(HeaderValue::parse("1.0[Hz"), None);
    }

    #[test]
    fn test_normalized_quantity() {
        let v = HeaderValue::parse("5[kHz]").unwrap().normalized();
        assert_eq!(
            v,
            HeaderValue::Quantity {
                value: 5000.0,
                unit: "Hz".into()
            }
        );
        assert_eq!(HeaderValue::Int(3).normalized(), HeaderValue::Int(3));
    }

    #[test]
    fn test_missing_file() {
        let err = Header::parse(Path::new("/nonexistent/sample.hdr")).unwrap_err();
        assert!(matches!(err, AscError::FileAccess { .. }));
    }
}
