//! Deployment resolution
//!
//! This module handles:
//! - The [`ResolverBackend`] seam and the in-memory [`RepositoryResolver`]
//! - The synthetic service-stub placeholder
//! - Partitioning resolved resources into isolated and shared buckets
//! - The three-pass closure build with circular-dependency validation
//! - Refinement of unsatisfied requirements into root-cause reports

pub mod backend;
pub mod closure;
pub mod partition;
pub mod placeholder;
pub mod refine;
pub mod repository;


pub use backend::{PostResolveTransform, ResolverBackend, TransformUnavailable};
pub use closure::{ClosureBuilder, DeploymentRequest};
pub use partition::DeployedBundleSet;
pub use repository::RepositoryResolver;
