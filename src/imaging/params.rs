//! Parameter types for image operations.
//!
//! These structs describe *what* to produce, not *how*. The
//! [`resize`](crate::resize) engine builds them and hands them to an
//! [`ImageBackend`](super::ImageBackend), which does the pixel work. Keeping
//! them plain data lets tests assert on exactly what a backend was asked to do.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A bounding box: the output fits inside `width` × `height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Bound {
    pub width: u32,
    pub height: u32,
}

impl Bound {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// ImageMagick geometry that shrinks to fit and never enlarges.
    pub fn geometry(self) -> String {
        format!("{}x{}>", self.width, self.height)
    }
}

impl From<[u32; 2]> for Bound {
    fn from([width, height]: [u32; 2]) -> Self {
        Self { width, height }
    }
}

impl From<Bound> for [u32; 2] {
    fn from(bound: Bound) -> Self {
        [bound.width, bound.height]
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Bounding-box resize: preserve aspect ratio, never upscale, auto-orient.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub bound: Bound,
}
