//! SI-prefix removal for header quantities, e.g. `(100.0, "kHz") -> (100000.0, "Hz")`.

/// Unit that looks prefixed (`p` + `pm`) but is dimensionless.
pub const PPM: &str = "ppm";

/// Recognized magnitude prefixes and their factors.
///
/// `G` and `T` map to 1e12 and 1e15, one step above SI.
pub const SI_PREFIXES: [(char, f64); 8] = [
    ('p', 1.0e-12),
    ('n', 1.0e-9),
    ('u', 1.0e-6),
    ('m', 1.0e-3),
    ('k', 1.0e+3),
    ('M', 1.0e+6),
    ('G', 1.0e+12),
    ('T', 1.0e+15),
];

/// Factor for a prefix letter, if it is one.
pub fn prefix_factor(prefix: char) -> Option<f64> {
    SI_PREFIXES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|&(_, factor)| factor)
}

/// Strip a recognized SI prefix from `unit`, rescaling `value` to the base unit.
///
/// A unit is prefixed when its first character is in [`SI_PREFIXES`] and at
/// least one character follows. `ppm` and unprefixed units pass through.
pub fn normalize(value: f64, unit: Option<&str>) -> (f64, Option<String>) {
    let Some(unit) = unit else {
        return (value, None);
    };

    if unit == PPM {
        return (value, Some(unit.to_string()));
    }

    let mut chars = unit.chars();
    if let Some(factor) = chars.next().and_then(prefix_factor) {
        let base = chars.as_str();
        if !base.is_empty() {
            return (value * factor, Some(base.to_string()));
        }
    }

    (value, Some(unit.to_string()))
}
