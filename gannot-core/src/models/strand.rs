use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::AnnotationError;

/// Orientation of a genomic feature.
///
/// Annotation rows kept in an [`IntervalTable`](crate::models::IntervalTable)
/// are always `Plus` or `Minus`; `Unstranded` only shows up on raw records
/// and on hand-built rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strand {
    #[cfg_attr(feature = "serde", serde(rename = "+"))]
    Plus,
    #[cfg_attr(feature = "serde", serde(rename = "-"))]
    Minus,
    #[cfg_attr(feature = "serde", serde(rename = "."))]
    Unstranded,
}

impl Strand {
    /// Anything other than `+` or `-` maps to `Unstranded`.
    pub fn from_char(c: char) -> Self {
        match c {
            '+' => Strand::Plus,
            '-' => Strand::Minus,
            _ => Strand::Unstranded,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
            Strand::Unstranded => '.',
        }
    }

    pub fn is_stranded(&self) -> bool {
        !matches!(self, Strand::Unstranded)
    }
}

impl FromStr for Strand {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Plus),
            "-" => Ok(Strand::Minus),
            "." | "*" => Ok(Strand::Unstranded),
            other => Err(AnnotationError::InvalidStrand(other.to_string())),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
