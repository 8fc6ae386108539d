//! Value-domain predicates shared by the dictionary validators.
//!
//! PDF Spec: ISO 32000-1:2008, Sections 7.9.4 (dates), 7.11 (file
//! specifications), 12.4.4 (transitions) and 14.11 (prepress).

use crate::config::ValidationMode;
use crate::version::PdfVersion;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // D:YYYYMMDDHHmmSSOHH'mm' with every field after the year optional.
    static ref DATE_PATTERN: Regex = Regex::new(
        r"^(D:)?(\d{4})(\d{2})?(\d{2})?(\d{2})?(\d{2})?(\d{2})?(?:([Zz+\-])(?:(\d{2})'?(?:(\d{2})'?)?)?)?$"
    )
    .expect("date pattern is valid");

    // RFC 1738 scheme followed by a non-empty, whitespace-free remainder.
    static ref URL_PATTERN: Regex =
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:\S+$").expect("URL pattern is valid");
}

/// Page rotation: a multiple of 90 in `[0, 270]`.
pub fn is_valid_rotation(rotate: i64) -> bool {
    matches!(rotate, 0 | 90 | 180 | 270)
}

const TRANSITION_STYLES: &[&str] = &["Split", "Blinds", "Box", "Wipe", "Dissolve", "Glitter", "R"];
const TRANSITION_STYLES_V15: &[&str] = &["Fly", "Push", "Cover", "Uncover", "Fade"];

/// Transition style (`S`) allowed in a document of `version`.
pub fn is_transition_style(style: &str, version: PdfVersion) -> bool {
    TRANSITION_STYLES.contains(&style)
        || (version >= PdfVersion::V1_5 && TRANSITION_STYLES_V15.contains(&style))
}

/// Transition dimension (`Dm`).
pub fn is_transition_dimension(dm: &str) -> bool {
    matches!(dm, "H" | "V")
}

/// Transition direction of motion (`M`).
pub fn is_transition_motion(m: &str) -> bool {
    matches!(m, "I" | "O")
}

/// Numeric transition direction (`Di`). The name `None` is checked separately.
pub fn is_transition_direction(di: i64) -> bool {
    matches!(di, 0 | 90 | 180 | 270 | 315)
}

/// Page tab order (`Tabs`). `W` is accepted for widget order.
pub fn is_tab_order(tabs: &str) -> bool {
    matches!(tabs, "R" | "C" | "S" | "W")
}

/// Guideline style (`S`) of a box style dictionary.
pub fn is_guideline_style(style: &str) -> bool {
    matches!(style, "S" | "D")
}

/// Keys allowed in `EF` and `RF` dictionaries.
pub fn is_embedded_file_key(key: &str) -> bool {
    matches!(key, "F" | "UF" | "DOS" | "Mac" | "Unix")
}

/// Bits per colour component of an image XObject.
pub fn is_bits_per_component(bpc: i64) -> bool {
    matches!(bpc, 1 | 2 | 4 | 8 | 16)
}

/// File specification string: non-empty, no NUL characters.
pub fn is_file_spec_string(s: &str) -> bool {
    !s.is_empty() && !s.contains('\0')
}

/// Uniform resource locator (`FS /URL`).
pub fn is_url_string(s: &str) -> bool {
    URL_PATTERN.is_match(s)
}

/// Parse a PDF date string.
///
/// The `D:` prefix is mandatory in strict mode. Omitted fields default to the
/// start of their range and a missing offset means UTC.
///
/// # Example
///
/// ```
/// use pdf_preflight::config::ValidationMode;
/// use pdf_preflight::validation::predicates::parse_date;
///
/// assert!(parse_date("D:20240229", ValidationMode::Strict).is_some());
/// assert!(parse_date("20240229", ValidationMode::Strict).is_none());
/// assert!(parse_date("20240229", ValidationMode::Relaxed).is_some());
/// ```
pub fn parse_date(s: &str, mode: ValidationMode) -> Option<DateTime<FixedOffset>> {
    let caps = DATE_PATTERN.captures(s.trim_end_matches('\0'))?;
    if caps.get(1).is_none() && !mode.is_relaxed() {
        return None;
    }

    let field = |i: usize, default: u32| -> Option<u32> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(default),
        }
    };

    let year: i32 = caps.get(2)?.as_str().parse().ok()?;
    let month = field(3, 1)?;
    let day = field(4, 1)?;
    let hour = field(5, 0)?;
    let minute = field(6, 0)?;
    let second = field(7, 0)?;

    let offset_seconds = match caps.get(8).map(|m| m.as_str()) {
        None | Some("Z") | Some("z") => 0,
        Some(sign) => {
            // A UT offset sign must carry at least the hour digits.
            let oh: u32 = caps.get(9)?.as_str().parse().ok()?;
            let om = field(10, 0)?;
            if oh > 23 || om > 59 {
                return None;
            }
            let total = (oh * 3600 + om * 60) as i32;
            if sign == "-" {
                -total
            } else {
                total
            }
        },
    };

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    let offset = FixedOffset::east_opt(offset_seconds)?;
    offset.from_local_datetime(&naive).single()
}
