#![forbid(unsafe_code)]

//! Core: canvas geometry and logging plumbing.
//!
//! # Role in regcond
//! `regcond-core` owns the coordinate model every other crate shares. A
//! [`Canvas`](geometry::Canvas) is the raster frame a merge resolves against,
//! and a [`Rect`](geometry::Rect) is a logical pixel rectangle that may lie
//! partly (or entirely) outside that frame.
//!
//! # How it fits in the system
//! `regcond-mask` paints rectangles into masks and clips them with
//! [`Rect::intersection_opt`](geometry::Rect::intersection_opt). `regcond`
//! resolves region descriptors into rectangles and never touches raster
//! storage itself.

pub mod geometry;
pub mod logging;

pub use geometry::{Canvas, Rect};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
