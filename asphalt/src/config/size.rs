//! Human-readable size strings for the cache quota (e.g. "256MB").

use thiserror::Error;

/// Error parsing a size string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid size '{input}' - expected format like '256MB', '1GB', or '512KB'")]
pub struct SizeParseError {
    input: String,
}

const KB: usize = 1024;
const MB: usize = 1024 * KB;
const GB: usize = 1024 * MB;

/// Recognized suffixes, longest first so `MB` wins over `B`.
const SUFFIXES: [(&str, usize); 10] = [
    ("GIB", GB),
    ("MIB", MB),
    ("KIB", KB),
    ("GB", GB),
    ("MB", MB),
    ("KB", KB),
    ("G", GB),
    ("M", MB),
    ("K", KB),
    ("B", 1),
];

/// Parse a size string into bytes.
///
/// Binary multiples, case-insensitive, whitespace between number and
/// suffix allowed. A bare number is bytes.
///
/// ```
/// use asphalt::config::parse_size;
///
/// assert_eq!(parse_size("256MB").unwrap(), 256 * 1024 * 1024);
/// assert_eq!(parse_size("1 gib").unwrap(), 1024 * 1024 * 1024);
/// assert_eq!(parse_size("4096").unwrap(), 4096);
/// ```
pub fn parse_size(s: &str) -> Result<usize, SizeParseError> {
    let err = || SizeParseError {
        input: s.to_string(),
    };

    let upper = s.trim().to_uppercase();
    let (number, multiplier) = SUFFIXES
        .iter()
        .find_map(|(suffix, mult)| upper.strip_suffix(suffix).map(|n| (n, *mult)))
        .unwrap_or((upper.as_str(), 1));

    let number = number.trim();
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(err());
    }

    number
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(err)
}

/// Format bytes with the largest suffix that divides evenly.
///
/// ```
/// use asphalt::config::format_size;
///
/// assert_eq!(format_size(256 * 1024 * 1024), "256MB");
/// assert_eq!(format_size(1000), "1000");
/// ```
pub fn format_size(bytes: usize) -> String {
    for (suffix, unit) in [("GB", GB), ("MB", MB), ("KB", KB)] {
        if bytes >= unit && bytes % unit == 0 {
            return format!("{}{}", bytes / unit, suffix);
        }
    }
    bytes.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_size("512").unwrap(), 512);
        assert_eq!(parse_size("512B").unwrap(), 512);
        assert_eq!(parse_size("64k").unwrap(), 64 * KB);
        assert_eq!(parse_size("256MB").unwrap(), 256 * MB);
        assert_eq!(parse_size("256 MiB").unwrap(), 256 * MB);
        assert_eq!(parse_size("2G").unwrap(), 2 * GB);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_size("").is_err());
        assert!(parse_size("MB").is_err());
        assert!(parse_size("-1MB").is_err());
        assert!(parse_size("1.5GB").is_err());
        assert!(parse_size("2TB").is_err());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(256 * MB), "256MB");
        assert_eq!(format_size(GB), "1GB");
        assert_eq!(format_size(1536 * KB), "1536KB");
        assert_eq!(format_size(0), "0");
    }

    #[test]
    fn test_format_parses_back() {
        for bytes in [KB, 300 * MB, 3 * GB, 1234] {
            assert_eq!(parse_size(&format_size(bytes)).unwrap(), bytes);
        }
    }
}
