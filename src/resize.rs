//! Incremental resize engine.
//!
//! Every photo gets two variants, each bounded and never enlarged:
//!
//! ```text
//! output/{album}/thumb/{photo}    300x200   (default)
//! output/{album}/large/{photo}    1500x1000 (default)
//! ```
//!
//! ## Caching
//!
//! The files on disk are the cache and their existence is the only cache key.
//! Content hashes and modification times are never consulted: a variant that
//! exists is kept as is, a variant that is missing is produced. Deleting one
//! variant by hand regenerates exactly that variant on the next build.
//!
//! ## Recorded metadata
//!
//! After a variant is produced, or found on disk, its real pixel size is read
//! back from the file and stored in the photo's [`ResizedImage`] slot. The
//! URL is always `"{variant}/{photo}"`.

use crate::imaging::{BackendError, Bound, ImageBackend, ResizeParams};
use crate::model::{Photo, ResizedImage, Variant};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_THUMB_BOUND: Bound = Bound::new(300, 200);
pub const DEFAULT_LARGE_BOUND: Bound = Bound::new(1500, 1000);

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("Source image not found for {photo} in album {album}: {path}")]
    SourceNotFound {
        album: String,
        photo: String,
        path: PathBuf,
    },
    #[error("Cannot create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to resize {photo} ({variant}) in album {album}: {source}")]
    Resize {
        album: String,
        photo: String,
        variant: Variant,
        #[source]
        source: BackendError,
    },
    #[error("Failed to read {path}: {source}")]
    Identify {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
}

/// Bounding boxes for the two variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub thumb: Bound,
    pub large: Bound,
}

impl Bounds {
    pub fn get(&self, variant: Variant) -> Bound {
        match variant {
            Variant::Thumb => self.thumb,
            Variant::Large => self.large,
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            thumb: DEFAULT_THUMB_BOUND,
            large: DEFAULT_LARGE_BOUND,
        }
    }
}

/// Whether a variant was produced in this call or already on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantStatus {
    Cached,
    Resized,
}

/// Expected output path of a variant: `{album_output}/{variant}/{photo}`.
pub fn variant_path(album_output: &Path, variant: Variant, photo_name: &str) -> PathBuf {
    album_output.join(variant.name()).join(photo_name)
}

pub struct ResizeEngine<'a, B: ImageBackend> {
    backend: &'a B,
    bounds: Bounds,
}

impl<'a, B: ImageBackend> ResizeEngine<'a, B> {
    pub fn new(backend: &'a B, bounds: Bounds) -> Self {
        Self { backend, bounds }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// True iff at least one variant file is missing.
    pub fn needs_resize(&self, photo: &Photo, album_output: &Path) -> bool {
        Variant::ALL
            .iter()
            .any(|&v| !variant_path(album_output, v, &photo.name).exists())
    }

    /// Produce one variant if its file is missing, then record its metadata.
    pub fn resize(
        &self,
        album: &str,
        photo: &mut Photo,
        variant: Variant,
        album_output: &Path,
    ) -> Result<VariantStatus, ResizeError> {
        let target = variant_path(album_output, variant, &photo.name);
        let status = if target.exists() {
            VariantStatus::Cached
        } else {
            if !photo.source_path.is_file() {
                return Err(ResizeError::SourceNotFound {
                    album: album.to_string(),
                    photo: photo.name.clone(),
                    path: photo.source_path.clone(),
                });
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|source| ResizeError::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            self.backend
                .resize(&ResizeParams {
                    source: photo.source_path.clone(),
                    output: target.clone(),
                    bound: self.bounds.get(variant),
                })
                .map_err(|source| ResizeError::Resize {
                    album: album.to_string(),
                    photo: photo.name.clone(),
                    variant,
                    source,
                })?;
            VariantStatus::Resized
        };

        self.record(photo, variant, album_output)?;
        Ok(status)
    }

    /// Resize both variants, large first.
    pub fn resize_photo(
        &self,
        album: &str,
        photo: &mut Photo,
        album_output: &Path,
    ) -> Result<(), ResizeError> {
        self.resize(album, photo, Variant::Large, album_output)?;
        self.resize(album, photo, Variant::Thumb, album_output)?;
        Ok(())
    }

    /// Fill a variant slot from the file already on disk.
    pub fn record(
        &self,
        photo: &mut Photo,
        variant: Variant,
        album_output: &Path,
    ) -> Result<(), ResizeError> {
        let path = variant_path(album_output, variant, &photo.name);
        let dims = self
            .backend
            .identify(&path)
            .map_err(|source| ResizeError::Identify {
                path: path.clone(),
                source,
            })?;
        photo.set_variant(variant, ResizedImage::new(variant, &photo.name, dims.into()));
        Ok(())
    }

    /// Fill whichever variant slots are still empty.
    pub fn record_missing(&self, photo: &mut Photo, album_output: &Path) -> Result<(), ResizeError> {
        for variant in Variant::ALL {
            if photo.variant(variant).is_none() {
                self.record(photo, variant, album_output)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use tempfile::TempDir;

    fn photo_in(dir: &Path, name: &str) -> Photo {
        let source = dir.join(name);
        fs::write(&source, b"").unwrap();
        Photo::new(name, "", "", source)
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn needs_resize_when_nothing_exists() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let engine = ResizeEngine::new(&backend, Bounds::default());
        let photo = photo_in(tmp.path(), "a.jpg");
        assert!(engine.needs_resize(&photo, &tmp.path().join("out")));
    }

    #[test]
    fn needs_resize_when_one_variant_missing() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let backend = MockBackend::new();
        let engine = ResizeEngine::new(&backend, Bounds::default());
        let photo = photo_in(tmp.path(), "a.jpg");

        touch(&variant_path(&out, Variant::Thumb, "a.jpg"));
        assert!(engine.needs_resize(&photo, &out));

        touch(&variant_path(&out, Variant::Large, "a.jpg"));
        assert!(!engine.needs_resize(&photo, &out));
    }

    #[test]
    fn needs_resize_ignores_source_changes() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let backend = MockBackend::new();
        let engine = ResizeEngine::new(&backend, Bounds::default());
        let photo = photo_in(tmp.path(), "a.jpg");
        touch(&variant_path(&out, Variant::Thumb, "a.jpg"));
        touch(&variant_path(&out, Variant::Large, "a.jpg"));

        fs::write(&photo.source_path, b"edited").unwrap();
        assert!(!engine.needs_resize(&photo, &out));
    }

    #[test]
    fn resize_creates_variant_and_records_size() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let backend = MockBackend::with_dimensions(Dimensions {
            width: 300,
            height: 180,
        });
        let engine = ResizeEngine::new(&backend, Bounds::default());
        let mut photo = photo_in(tmp.path(), "a.jpg");

        let status = engine.resize("album", &mut photo, Variant::Thumb, &out).unwrap();

        assert_eq!(status, VariantStatus::Resized);
        assert!(out.join("thumb/a.jpg").exists());
        let thumb = photo.thumb.as_ref().unwrap();
        assert_eq!(thumb.url, "thumb/a.jpg");
        assert_eq!(thumb.size, (300, 180));
        assert!(photo.large.is_none());

        let ops = backend.get_operations();
        assert!(matches!(
            &ops[0],
            RecordedOp::Resize { bound, output, .. }
                if *bound == DEFAULT_THUMB_BOUND && output.ends_with("thumb/a.jpg")
        ));
    }

    #[test]
    fn resize_uses_configured_bounds() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let backend = MockBackend::new();
        let bounds = Bounds {
            thumb: Bound::new(64, 64),
            large: Bound::new(640, 480),
        };
        let engine = ResizeEngine::new(&backend, bounds);
        let mut photo = photo_in(tmp.path(), "a.jpg");

        engine.resize_photo("album", &mut photo, &out).unwrap();

        let bounds_used: Vec<Bound> = backend
            .get_operations()
            .iter()
            .filter_map(|op| match op {
                RecordedOp::Resize { bound, .. } => Some(*bound),
                _ => None,
            })
            .collect();
        assert_eq!(bounds_used, vec![Bound::new(640, 480), Bound::new(64, 64)]);
    }

    #[test]
    fn existing_variant_is_not_resized_again() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let backend = MockBackend::new();
        let engine = ResizeEngine::new(&backend, Bounds::default());
        let mut photo = photo_in(tmp.path(), "a.jpg");
        touch(&variant_path(&out, Variant::Large, "a.jpg"));

        let status = engine.resize("album", &mut photo, Variant::Large, &out).unwrap();

        assert_eq!(status, VariantStatus::Cached);
        assert_eq!(backend.resize_count(), 0);
        assert_eq!(photo.large.as_ref().unwrap().url, "large/a.jpg");
    }

    #[test]
    fn resize_photo_only_fills_missing_variant() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let backend = MockBackend::new();
        let engine = ResizeEngine::new(&backend, Bounds::default());
        let mut photo = photo_in(tmp.path(), "a.jpg");
        touch(&variant_path(&out, Variant::Large, "a.jpg"));

        engine.resize_photo("album", &mut photo, &out).unwrap();

        assert_eq!(backend.resize_count(), 1);
        assert!(photo.thumb.is_some() && photo.large.is_some());
    }

    #[test]
    fn missing_source_is_reported_with_album() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let engine = ResizeEngine::new(&backend, Bounds::default());
        let mut photo = Photo::new("gone.jpg", "", "", tmp.path().join("gone.jpg"));

        let err = engine
            .resize("holidays", &mut photo, Variant::Thumb, &tmp.path().join("out"))
            .unwrap_err();

        assert!(matches!(
            &err,
            ResizeError::SourceNotFound { album, photo, .. } if album == "holidays" && photo == "gone.jpg"
        ));
        assert_eq!(backend.resize_count(), 0);
    }

    #[test]
    fn backend_failure_names_photo_and_album() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::failing_on("bad.jpg");
        let engine = ResizeEngine::new(&backend, Bounds::default());
        let mut photo = photo_in(tmp.path(), "bad.jpg");

        let err = engine
            .resize_photo("holidays", &mut photo, &tmp.path().join("out"))
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("bad.jpg"));
        assert!(message.contains("holidays"));
        assert!(photo.large.is_none());
    }

    #[test]
    fn record_missing_reads_back_existing_files() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out");
        let backend = MockBackend::with_dimensions(Dimensions {
            width: 12,
            height: 8,
        });
        let engine = ResizeEngine::new(&backend, Bounds::default());
        let mut photo = photo_in(tmp.path(), "a.jpg");
        touch(&variant_path(&out, Variant::Thumb, "a.jpg"));
        touch(&variant_path(&out, Variant::Large, "a.jpg"));

        engine.record_missing(&mut photo, &out).unwrap();

        assert_eq!(photo.thumb.as_ref().unwrap().size, (12, 8));
        assert_eq!(photo.large.as_ref().unwrap().url, "large/a.jpg");
        assert_eq!(backend.resize_count(), 0);
    }

    #[test]
    fn record_of_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let engine = ResizeEngine::new(&backend, Bounds::default());
        let mut photo = photo_in(tmp.path(), "a.jpg");

        let result = engine.record(&mut photo, Variant::Thumb, &tmp.path().join("out"));
        assert!(matches!(result, Err(ResizeError::Identify { .. })));
    }
}
