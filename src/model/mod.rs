//! Resource model
//!
//! The vocabulary of resolution: resources expose capabilities (exported
//! packages and services) and declare requirements (imported packages and
//! services, required bundles). [`ContentRequirement`] is the bundle-level
//! requirement an application descriptor states; [`ResourceDescriptor`] is a
//! named, versioned unit in the candidate pool.

pub mod capability;
pub mod content;
pub mod merge;
pub mod requirement;
pub mod resource;

pub use capability::{PackageCapability, ServiceCapability};
pub use content::ContentRequirement;
pub use merge::merge_package_requirements;
pub use requirement::{BundleRequirement, PackageRequirement, ServiceRequirement};
pub use resource::ResourceDescriptor;
