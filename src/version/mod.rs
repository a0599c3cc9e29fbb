//! Version handling
//!
//! Versions are [`semver::Version`] values. Descriptor files may use short
//! forms (`"2"`, `"2.3"`); [`parse_lenient`] pads the missing segments and
//! treats the empty string as `0.0.0`.

pub mod range;

pub use range::VersionRange;
pub use semver::Version;

use crate::error::{Result, version_parse_failed};

/// Parse a version string, padding missing minor/patch segments with zero.
///
/// An empty string parses as `0.0.0`. Surrounding whitespace is ignored.
pub fn parse_lenient(input: &str) -> Result<Version> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Version::new(0, 0, 0));
    }

    let mut segments = [0u64; 3];
    let mut count = 0;
    for segment in trimmed.split('.') {
        if count == 3 {
            return Err(version_parse_failed(input, "more than three segments"));
        }
        segments[count] = segment
            .parse::<u64>()
            .map_err(|_| version_parse_failed(input, format!("segment '{segment}' is not numeric")))?;
        count += 1;
    }

    Ok(Version::new(segments[0], segments[1], segments[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_version() {
        assert_eq!(parse_lenient("1.2.3").unwrap(), Version::new(1, 2, 3));
    }

    #[test]
    fn test_parse_short_forms() {
        assert_eq!(parse_lenient("2").unwrap(), Version::new(2, 0, 0));
        assert_eq!(parse_lenient("2.3").unwrap(), Version::new(2, 3, 0));
    }

    #[test]
    fn test_parse_empty_defaults_to_zero() {
        assert_eq!(parse_lenient("").unwrap(), Version::new(0, 0, 0));
        assert_eq!(parse_lenient("   ").unwrap(), Version::new(0, 0, 0));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(parse_lenient("a.b.c").is_err());
        assert!(parse_lenient("1.x").is_err());
    }

    #[test]
    fn test_parse_rejects_too_many_segments() {
        assert!(parse_lenient("1.2.3.4").is_err());
    }
}
