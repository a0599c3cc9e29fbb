//! Version range arithmetic
//!
//! A range is an interval over versions with independently inclusive or
//! exclusive bounds: `[1.0.0,2.0.0]`, `(1.0.0,2.0.0)`, mixed forms, or a bare
//! version meaning "at least this, unbounded above". Ranges are immutable
//! once parsed.

use std::fmt;

use semver::Version;

use crate::error::{Result, StowageError, range_parse_failed};
use crate::version::parse_lenient;

/// An interval over versions with inclusive/exclusive bounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRange {
    min: Version,
    max: Option<Version>,
    min_exclusive: bool,
    max_exclusive: bool,
}

impl VersionRange {
    /// Parse a range string: `[min,max]`, `(min,max)`, mixed bounds, or a
    /// bare version (≥ min, unbounded). Surrounding quotes and whitespace are
    /// tolerated.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim().trim_matches('"').trim();

        if trimmed.starts_with('[') || trimmed.starts_with('(') {
            let min_exclusive = trimmed.starts_with('(');
            let max_exclusive = match trimmed.chars().last() {
                Some(']') => false,
                Some(')') => true,
                _ => {
                    return Err(range_parse_failed(input, "missing closing bracket"));
                }
            };

            let interior = &trimmed[1..trimmed.len() - 1];
            let mut bounds = interior.split(',');
            let (low, high) = match (bounds.next(), bounds.next(), bounds.next()) {
                (Some(low), Some(high), None) => (low, high),
                _ => {
                    return Err(range_parse_failed(input, "expected exactly two bounds"));
                }
            };

            let min = parse_lenient(low)?;
            let max = parse_lenient(high)?;
            if min > max {
                return Err(range_parse_failed(input, "minimum is above maximum"));
            }
            if min == max && (min_exclusive || max_exclusive) {
                return Err(range_parse_failed(input, "range excludes its only version"));
            }

            Ok(Self {
                min,
                max: Some(max),
                min_exclusive,
                max_exclusive,
            })
        } else {
            Ok(Self::at_least(parse_lenient(trimmed)?))
        }
    }

    /// Parse a range that must pin exactly one version.
    ///
    /// A bare version is read as the point range `[v,v]`; a bracketed range
    /// must have equal inclusive bounds.
    pub fn parse_exact(input: &str) -> Result<Self> {
        let trimmed = input.trim().trim_matches('"').trim();

        if trimmed.starts_with('[') || trimmed.starts_with('(') {
            let range = Self::parse(trimmed)?;
            if !range.is_exact() {
                return Err(StowageError::NotExactVersion {
                    input: input.to_string(),
                });
            }
            Ok(range)
        } else {
            Ok(Self::exact(parse_lenient(trimmed)?))
        }
    }

    /// The point range `[version,version]`.
    pub fn exact(version: Version) -> Self {
        Self {
            min: version.clone(),
            max: Some(version),
            min_exclusive: false,
            max_exclusive: false,
        }
    }

    /// The unbounded range `version` and above.
    pub fn at_least(version: Version) -> Self {
        Self {
            min: version,
            max: None,
            min_exclusive: false,
            max_exclusive: false,
        }
    }

    pub fn minimum(&self) -> &Version {
        &self.min
    }

    pub fn maximum(&self) -> Option<&Version> {
        self.max.as_ref()
    }

    pub fn is_minimum_exclusive(&self) -> bool {
        self.min_exclusive
    }

    pub fn is_maximum_exclusive(&self) -> bool {
        self.max_exclusive
    }

    /// True when the range admits exactly one version.
    pub fn is_exact(&self) -> bool {
        self.max.as_ref() == Some(&self.min) && !self.min_exclusive && !self.max_exclusive
    }

    /// True iff `version` lies within the bounds, respecting exclusivity.
    pub fn matches(&self, version: &Version) -> bool {
        let above_min = if self.min_exclusive {
            *version > self.min
        } else {
            *version >= self.min
        };
        if !above_min {
            return false;
        }
        match &self.max {
            None => true,
            Some(max) => {
                if self.max_exclusive {
                    version < max
                } else {
                    version <= max
                }
            }
        }
    }

    /// The tightest range contained in both, or `None` when the intersection
    /// is empty. Commutative.
    pub fn intersect(&self, other: &VersionRange) -> Option<VersionRange> {
        let (min, min_exclusive) = match self.min.cmp(&other.min) {
            std::cmp::Ordering::Greater => (self.min.clone(), self.min_exclusive),
            std::cmp::Ordering::Less => (other.min.clone(), other.min_exclusive),
            std::cmp::Ordering::Equal => {
                (self.min.clone(), self.min_exclusive || other.min_exclusive)
            }
        };

        let (max, max_exclusive) = match (&self.max, &other.max) {
            (None, None) => (None, false),
            (Some(max), None) => (Some(max.clone()), self.max_exclusive),
            (None, Some(max)) => (Some(max.clone()), other.max_exclusive),
            (Some(a), Some(b)) => match a.cmp(b) {
                std::cmp::Ordering::Less => (Some(a.clone()), self.max_exclusive),
                std::cmp::Ordering::Greater => (Some(b.clone()), other.max_exclusive),
                std::cmp::Ordering::Equal => {
                    (Some(a.clone()), self.max_exclusive || other.max_exclusive)
                }
            },
        };

        if let Some(max) = &max {
            if min > *max {
                return None;
            }
            if min == *max && (min_exclusive || max_exclusive) {
                return None;
            }
        }

        Some(VersionRange {
            min,
            max,
            min_exclusive,
            max_exclusive,
        })
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.max {
            None => write!(f, "{}", self.min),
            Some(max) => write!(
                f,
                "{}{},{}{}",
                if self.min_exclusive { '(' } else { '[' },
                self.min,
                max,
                if self.max_exclusive { ')' } else { ']' },
            ),
        }
    }
}
