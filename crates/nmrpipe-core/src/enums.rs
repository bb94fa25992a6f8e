//! Integer codes stored in FDATA slots, as Rust enums.

/// Axis data type (FDQUADFLAG, NDQUADFLAG).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum QuadFlag {
    Complex = 0,
    Real = 1,
}

impl QuadFlag {
    pub fn from_i32(v: i32) -> Option<Self> {
        [Self::Complex, Self::Real].into_iter().find(|q| *q as i32 == v)
    }

    pub fn from_complex(is_complex: bool) -> Self {
        if is_complex {
            Self::Complex
        } else {
            Self::Real
        }
    }

    pub fn is_complex(self) -> bool {
        self == Self::Complex
    }
}

/// How the indirect axis of a 2D plane was acquired (FD2DPHASE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Phase2D {
    Magnitude = 0,
    Tppi = 1,
    States = 2,
    Image = 3,
}

impl Phase2D {
    pub fn from_i32(v: i32) -> Option<Self> {
        [Self::Magnitude, Self::Tppi, Self::States, Self::Image]
            .into_iter()
            .find(|p| *p as i32 == v)
    }
}

/// Sign alternation the transform must undo (NDAQSIGN).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum AqSign {
    None = 0,
    Sequential = 1,
    States = 2,
}

/// Byte order found when reading a header back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HdrStatus {
    Ok,
    Swapped,
    Bad,
}
