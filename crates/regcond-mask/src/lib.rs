#![deny(unsafe_code)]

//! Mask kernel: dense weight grids and clipped rectangle painting.
//!
//! Every region in a merge gets its own freshly allocated [`Mask`]. Painting
//! is the only write path and always clips to the mask bounds, so callers may
//! hand it rectangles that extend past the canvas.

pub mod mask;

pub use mask::{Mask, MaskStats};
