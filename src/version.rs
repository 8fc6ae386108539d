//! PDF document versions.

use serde::Serialize;
use std::fmt;

/// PDF version, totally ordered by release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PdfVersion {
    /// PDF 1.0
    V1_0,
    /// PDF 1.1
    V1_1,
    /// PDF 1.2
    V1_2,
    /// PDF 1.3
    V1_3,
    /// PDF 1.4
    V1_4,
    /// PDF 1.5
    V1_5,
    /// PDF 1.6
    V1_6,
    /// PDF 1.7
    V1_7,
    /// PDF 2.0
    V2_0,
}

impl PdfVersion {
    /// All versions in ascending order.
    pub const ALL: [PdfVersion; 9] = [
        PdfVersion::V1_0,
        PdfVersion::V1_1,
        PdfVersion::V1_2,
        PdfVersion::V1_3,
        PdfVersion::V1_4,
        PdfVersion::V1_5,
        PdfVersion::V1_6,
        PdfVersion::V1_7,
        PdfVersion::V2_0,
    ];

    /// Build a version from the numbers in the `%PDF-M.m` header.
    pub fn from_header(major: u8, minor: u8) -> Option<Self> {
        match (major, minor) {
            (1, 0) => Some(PdfVersion::V1_0),
            (1, 1) => Some(PdfVersion::V1_1),
            (1, 2) => Some(PdfVersion::V1_2),
            (1, 3) => Some(PdfVersion::V1_3),
            (1, 4) => Some(PdfVersion::V1_4),
            (1, 5) => Some(PdfVersion::V1_5),
            (1, 6) => Some(PdfVersion::V1_6),
            (1, 7) => Some(PdfVersion::V1_7),
            (2, 0) => Some(PdfVersion::V2_0),
            _ => None,
        }
    }

    /// (major, minor) pair.
    pub fn numbers(&self) -> (u8, u8) {
        match self {
            PdfVersion::V1_0 => (1, 0),
            PdfVersion::V1_1 => (1, 1),
            PdfVersion::V1_2 => (1, 2),
            PdfVersion::V1_3 => (1, 3),
            PdfVersion::V1_4 => (1, 4),
            PdfVersion::V1_5 => (1, 5),
            PdfVersion::V1_6 => (1, 6),
            PdfVersion::V1_7 => (1, 7),
            PdfVersion::V2_0 => (2, 0),
        }
    }
}

impl fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (major, minor) = self.numbers();
        write!(f, "{}.{}", major, minor)
    }
}

impl std::str::FromStr for PdfVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (major, minor) = s
            .split_once('.')
            .ok_or_else(|| format!("invalid PDF version: {}", s))?;
        let major: u8 = major
            .parse()
            .map_err(|_| format!("invalid PDF version: {}", s))?;
        let minor: u8 = minor
            .parse()
            .map_err(|_| format!("invalid PDF version: {}", s))?;
        PdfVersion::from_header(major, minor).ok_or_else(|| format!("unsupported PDF version: {}", s))
    }
}
