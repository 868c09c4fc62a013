#![forbid(unsafe_code)]

//! Region conditioning: build region descriptors, resolve them against a
//! canvas, and merge their masked conditioning into one set.
//!
//! # Role in regcond
//! This crate is the compositing layer between user-specified region
//! geometry and whatever consumes masked guidance downstream. Embeddings are
//! opaque (`E`); the crate only ever writes the `mask` and
//! `set_area_to_bounds` attributes, and only on copies.
//!
//! # Primary responsibilities
//! - **Builders**: [`PercentageRegion`] and [`PixelRegion`] produce
//!   [`RegionDescriptor`]s without validation or clamping.
//! - **Resolver**: [`merge_regions`] resolves, paints, and concatenates.
//! - **Node layer**: [`node`] registers the graph nodes and validates their
//!   inputs; [`slots`] models the merge node's growing region inputs.
//! - **Change detection**: [`fingerprint`] and [`cache`] let a graph skip
//!   merges whose inputs did not change.

pub mod cache;
pub mod conditioning;
pub mod error;
pub mod fingerprint;
pub mod merge;
pub mod node;
pub mod region;
pub mod slots;

pub use cache::{MergeCache, MergeCacheStats};
pub use conditioning::{
    AttributeValue, Attributes, ConditioningEntry, ConditioningSet, MASK_KEY,
    SET_AREA_TO_BOUNDS_KEY,
};
pub use error::{Result, ValidationError};
pub use fingerprint::{Fingerprint, merge_fingerprint};
pub use merge::{ResolvedRegion, merge_regions, resolve_region};
pub use node::{NodeInputs, NodeKind};
pub use region::{PercentageRegion, PixelRegion, RegionDescriptor, RegionGeometry};
pub use slots::RegionSlots;

pub use regcond_core::geometry::{Canvas, Rect};
pub use regcond_mask::Mask;
