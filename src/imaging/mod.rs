//! Image processing: the resize capability the build delegates pixels to.
//!
//! | Operation | Magick backend | Rust backend |
//! |---|---|---|
//! | **Identify** | `image::image_dimensions` | `image::image_dimensions` |
//! | **Resize** | `convert -auto-orient -resize WxH>` | decode, orient, Lanczos3, encode |
//!
//! The module is split into:
//! - **Calculations**: pure bounding-box math (unit testable)
//! - **Parameters**: data structures describing a resize
//! - **Backend**: [`ImageBackend`] trait + [`MagickBackend`] + [`RustBackend`]

pub mod backend;
mod calculations;
pub mod magick_backend;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::fit_within;
pub use magick_backend::MagickBackend;
pub use params::{Bound, ResizeParams};
pub use rust_backend::RustBackend;
