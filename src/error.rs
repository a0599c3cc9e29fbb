//! Error types and handling for stowage
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Resolution failures carry structured payloads ([`UnsatisfiedRequirement`],
//! [`Violation`]) rather than pre-joined strings, so callers can render or
//! aggregate them however they need.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::version::range::VersionRange;

/// The kind of requirement that could not be satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequirementKind {
    Package,
    Bundle,
    Service,
    Other,
}

impl RequirementKind {
    fn noun(self) -> &'static str {
        match self {
            Self::Package => "package",
            Self::Bundle => "bundle",
            Self::Service => "service",
            Self::Other => "requirement",
        }
    }
}

/// A refined unsatisfied requirement from a failed resolution pass.
///
/// `requirers` holds the identities (`name_version`) of the resources that
/// declared the requirement, sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsatisfiedRequirement {
    pub kind: RequirementKind,
    pub name: String,
    pub range: Option<VersionRange>,
    pub requirers: Vec<String>,
}

impl fmt::Display for UnsatisfiedRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unable to resolve {} {}", self.kind.noun(), self.name)?;

        if let Some(range) = &self.range {
            if range.is_exact() {
                write!(f, " version {}", range.minimum())?;
            } else {
                let low = if range.is_minimum_exclusive() {
                    "exclusive"
                } else {
                    "inclusive"
                };
                write!(f, " version {} ({low})", range.minimum())?;
                if let Some(max) = range.maximum() {
                    let up = if range.is_maximum_exclusive() {
                        "exclusive"
                    } else {
                        "inclusive"
                    };
                    write!(f, " to {max} ({up})")?;
                }
            }
        }

        match self.requirers.len() {
            0 => Ok(()),
            1 => write!(f, " required by bundle {}", self.requirers[0]),
            _ => write!(f, " required by bundles [{}]", self.requirers.join(", ")),
        }
    }
}

/// A traced shared-to-isolated dependency: a shared bundle importing a package
/// that only isolated application content exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Identity (`name_version`) of the shared bundle with the dependency.
    pub shared_bundle: String,
    /// The imported package name.
    pub package: String,
    /// Identities of the isolated bundles exporting the package, sorted.
    pub exporters: Vec<String>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.exporters.len() == 1 {
            write!(
                f,
                "Shared bundle {} has a dependency for package {} which is exported from application bundle {}",
                self.shared_bundle, self.package, self.exporters[0]
            )
        } else {
            write!(
                f,
                "Shared bundle {} has a dependency for package {} which is exported from application bundles [{}]",
                self.shared_bundle,
                self.package,
                self.exporters.join(", ")
            )
        }
    }
}

fn render_unsatisfied(items: &[UnsatisfiedRequirement]) -> String {
    items
        .iter()
        .map(|item| format!("\n  {item}"))
        .collect::<String>()
}

fn render_violations(items: &[Violation]) -> String {
    items
        .iter()
        .map(|item| format!("\n  {item}"))
        .collect::<String>()
}

/// Main error type for stowage operations
#[derive(Error, Diagnostic, Debug)]
pub enum StowageError {
    // Version and range parsing errors
    #[error("Invalid version '{input}': {reason}")]
    #[diagnostic(
        code(stowage::version::parse_failed),
        help("Versions are up to three dotted numeric segments, e.g. 1, 1.2 or 1.2.3")
    )]
    VersionParseFailed { input: String, reason: String },

    #[error("Invalid version range '{input}': {reason}")]
    #[diagnostic(
        code(stowage::version::range_parse_failed),
        help("Ranges look like [1.0.0,2.0.0), (1.0.0,2.0.0] or a bare minimum version")
    )]
    RangeParseFailed { input: String, reason: String },

    #[error("Version range '{input}' does not pin an exact version")]
    #[diagnostic(
        code(stowage::version::not_exact),
        help("An exact range has equal inclusive bounds, e.g. [1.0.0,1.0.0]")
    )]
    NotExactVersion { input: String },

    // Resolution errors
    #[error(
        "Unable to resolve application '{application}':{}",
        render_unsatisfied(.unsatisfied)
    )]
    #[diagnostic(
        code(stowage::resolve::failed),
        help("Check that every required bundle, package and service is present in the repository index or the application archive")
    )]
    ResolutionFailed {
        application: String,
        unsatisfied: Vec<UnsatisfiedRequirement>,
    },

    #[error("Resolution for application '{application}' produced no deployable content")]
    #[diagnostic(
        code(stowage::resolve::empty_deployment),
        help("A deployment must provision at least one bundle; check the content entries against the repository index")
    )]
    EmptyDeployment { application: String },

    #[error(
        "Suspected circular dependencies in application '{application}':{}",
        render_violations(.violations)
    )]
    #[diagnostic(
        code(stowage::resolve::circular),
        help("No shared bundle may depend on a package exported only by isolated application content; move the exporter to use-bundles or widen the shared bundle's import")
    )]
    CircularDependencies {
        application: String,
        violations: Vec<Violation>,
    },

    #[error(
        "Incompatible version requirements in application '{application}' for package(s): {}",
        .packages.join(", ")
    )]
    #[diagnostic(
        code(stowage::resolve::incompatible_requirements),
        help("Two content bundles import the same package with version ranges that do not intersect")
    )]
    IncompatibleRequirements {
        application: String,
        packages: Vec<String>,
    },

    // Descriptor and configuration errors
    #[error("Failed to read descriptor file: {path}")]
    #[diagnostic(code(stowage::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse descriptor file: {path}: {reason}")]
    #[diagnostic(code(stowage::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Unsupported descriptor format: {path}")]
    #[diagnostic(
        code(stowage::config::unsupported_format),
        help("Descriptors are read from .yaml, .yml or .json files")
    )]
    UnsupportedFormat { path: String },

    #[error("Invalid descriptor: {message}")]
    #[diagnostic(code(stowage::config::invalid))]
    InvalidDescriptor { message: String },

    // File system errors
    #[error("Failed to write file: {path}")]
    #[diagnostic(code(stowage::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(stowage::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for StowageError {
    fn from(err: std::io::Error) -> Self {
        StowageError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, StowageError>;

// Convenience constructors

pub fn version_parse_failed(input: impl Into<String>, reason: impl Into<String>) -> StowageError {
    StowageError::VersionParseFailed {
        input: input.into(),
        reason: reason.into(),
    }
}

pub fn range_parse_failed(input: impl Into<String>, reason: impl Into<String>) -> StowageError {
    StowageError::RangeParseFailed {
        input: input.into(),
        reason: reason.into(),
    }
}

pub fn config_read_failed(path: impl Into<String>, reason: impl Into<String>) -> StowageError {
    StowageError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

pub fn config_parse_failed(path: impl Into<String>, reason: impl Into<String>) -> StowageError {
    StowageError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

pub fn invalid_descriptor(message: impl Into<String>) -> StowageError {
    StowageError::InvalidDescriptor {
        message: message.into(),
    }
}

pub fn file_write_failed(path: impl Into<String>, reason: impl Into<String>) -> StowageError {
    StowageError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
