//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the "external resize capability": given a
//! source and a target path, produce a bounded, upright copy. Two
//! implementations exist:
//!
//! | Backend | How |
//! |---|---|
//! | [`MagickBackend`](super::MagickBackend) | runs ImageMagick `convert` as a subprocess (default) |
//! | [`RustBackend`](super::RustBackend) | decodes/encodes in-process with the `image` crate |
//!
//! Both identify dimensions by reading the image header only.

use super::params::ResizeParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Resize tool {0:?} could not be started: {1}")]
    ToolMissing(String, std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<Dimensions> for (u32, u32) {
    fn from(d: Dimensions) -> Self {
        (d.width, d.height)
    }
}

/// Trait for image processing backends.
///
/// `Sync` so one backend can serve several resize workers.
pub trait ImageBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Resize `params.source` into `params.output` within `params.bound`,
    /// auto-oriented and never enlarged. The output directory exists.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;
}

/// Read pixel dimensions from the image header.
pub(crate) fn read_dimensions(path: &Path) -> Result<Dimensions, BackendError> {
    let (width, height) = image::image_dimensions(path).map_err(|e| match e {
        image::ImageError::IoError(io) => BackendError::Io(io),
        other => BackendError::ProcessingFailed(format!(
            "Failed to identify {}: {}",
            path.display(),
            other
        )),
    })?;
    Ok(Dimensions { width, height })
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::Bound;
    use std::sync::Mutex;

    /// Mock backend that records operations without decoding anything.
    ///
    /// `resize` writes an empty output file so existence checks behave as in
    /// a real build; `identify` reports the configured dimensions for any
    /// file that exists. Uses Mutex (not RefCell) so it is Sync.
    pub struct MockBackend {
        pub dimensions: Dimensions,
        pub fail_on: Option<String>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Resize {
            source: String,
            output: String,
            bound: Bound,
        },
    }

    impl Default for MockBackend {
        fn default() -> Self {
            Self::with_dimensions(Dimensions {
                width: 1,
                height: 1,
            })
        }
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dimensions: Dimensions) -> Self {
            Self {
                dimensions,
                fail_on: None,
                operations: Mutex::new(Vec::new()),
            }
        }

        /// Fail every resize whose source file name equals `name`.
        pub fn failing_on(name: &str) -> Self {
            Self {
                fail_on: Some(name.to_string()),
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn resize_count(&self) -> usize {
            self.get_operations()
                .iter()
                .filter(|op| matches!(op, RecordedOp::Resize { .. }))
                .count()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));

            if !path.exists() {
                return Err(BackendError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{} not found", path.display()),
                )));
            }
            Ok(self.dimensions)
        }

        fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Resize {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                bound: params.bound,
            });

            let source_name = params.source.file_name().map(|n| n.to_string_lossy());
            if self.fail_on.as_deref().is_some_and(|f| source_name.as_deref() == Some(f)) {
                return Err(BackendError::ProcessingFailed("mock failure".into()));
            }
            std::fs::write(&params.output, b"")?;
            Ok(())
        }
    }

    #[test]
    fn mock_records_resize_and_creates_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let output = tmp.path().join("out.jpg");
        let backend = MockBackend::new();

        backend
            .resize(&ResizeParams {
                source: "/source.jpg".into(),
                output: output.clone(),
                bound: Bound::new(300, 200),
            })
            .unwrap();

        assert!(output.exists());
        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Resize { bound, .. } if *bound == Bound::new(300, 200)
        ));
    }

    #[test]
    fn mock_identify_requires_existing_file() {
        let backend = MockBackend::new();
        assert!(backend.identify(Path::new("/nonexistent/a.jpg")).is_err());
    }

    #[test]
    fn read_dimensions_of_missing_file_is_io_error() {
        let result = read_dimensions(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }
}
