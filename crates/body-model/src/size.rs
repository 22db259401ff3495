//! Garment size labels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered garment size, smallest first.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SizeLabel {
    XS,
    S,
    M,
    L,
    XL,
    XXL,
    XXXL,
    /// The measurement fell outside every chart interval.
    Unknown,
}

impl SizeLabel {
    /// Every real size in ascending order.
    pub const SIZED: [SizeLabel; 7] = [
        Self::XS,
        Self::S,
        Self::M,
        Self::L,
        Self::XL,
        Self::XXL,
        Self::XXXL,
    ];

    /// Numeric code 1..=7, `None` for `Unknown`.
    pub fn code(self) -> Option<u8> {
        Self::SIZED
            .iter()
            .position(|s| *s == self)
            .map(|i| i as u8 + 1)
    }

    /// Inverse of [`code`](Self::code); out-of-range codes give `Unknown`.
    pub fn from_code(code: u8) -> Self {
        match code {
            1..=7 => Self::SIZED[code as usize - 1],
            _ => Self::Unknown,
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::XS => "XS",
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::XL => "XL",
            Self::XXL => "XXL",
            Self::XXXL => "XXXL",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Per-dimension sizes plus the overall recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeCategories {
    pub shoulders: SizeLabel,
    pub torso: SizeLabel,
    pub legs: SizeLabel,
    pub overall: SizeLabel,
}
