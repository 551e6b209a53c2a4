//! Build orchestration.
//!
//! One call to [`generate`] takes a gallery that was read from disk to a
//! complete output directory:
//!
//! ```text
//! copy assets ─► render index.html ─► for each album (newest first):
//!                                        find photos needing resize
//!                                        resize them (large, then thumb)
//!                                        record sizes of cached variants
//!                                        render {album}/index.html
//! ```
//!
//! Progress goes to an [`Observer`]. Every hook has an empty default body,
//! and [`NoopObserver`] uses all of them, for headless builds and tests.
//!
//! ## Failure
//!
//! The first error aborts the build. Output written so far stays on disk;
//! since resized variants are cached by existence, re-running picks up where
//! the failed run stopped.
//!
//! ## Parallel resizing
//!
//! With `jobs > 1` the photos of one album that need resizing are spread
//! over the rayon pool. A photo, with both of its variants, belongs to a
//! single worker, so no two workers ever write the same file. Albums are
//! still handled one after another: album events keep their order, photo
//! events within an album do not.

use crate::assets::{AssetError, AssetSource, copy_assets};
use crate::imaging::ImageBackend;
use crate::model::{Album, Gallery, Photo};
use crate::render::{Page, RenderError, Renderer};
use crate::resize::{Bounds, ResizeEngine, ResizeError};
use chrono::Datelike;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const INDEX_PAGE: &str = "index.html";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Cannot create output directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Assets(#[from] AssetError),
    #[error(transparent)]
    Resize(#[from] ResizeError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Progress hooks called by [`generate`].
///
/// `Sync` because the photo hooks are called from resize workers.
pub trait Observer: Sync {
    /// `to_process` counts only the photos that need resizing.
    fn album_started(&self, _album: &Album, _to_process: usize) {}
    fn photo_resizing(&self, _photo: &Photo) {}
    /// Both variants of `photo` are written. Not called when the resize fails.
    fn photo_resized(&self, _photo: &Photo) {}
    fn album_finished(&self, _album: &Album) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub bounds: Bounds,
    /// Resize workers. 1 keeps everything on the calling thread.
    pub jobs: usize,
    pub assets: AssetSource,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            jobs: 1,
            assets: AssetSource::Bundled,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub albums: usize,
    pub photos: usize,
    /// Photos that had at least one variant produced in this run.
    pub resized: usize,
}

impl GenerateSummary {
    pub fn cached(&self) -> usize {
        self.photos - self.resized
    }
}

pub fn generate<B: ImageBackend, R: Renderer>(
    gallery: &mut Gallery,
    output: &Path,
    backend: &B,
    renderer: &R,
    observer: &dyn Observer,
    options: &GenerateOptions,
) -> Result<GenerateSummary, GenerateError> {
    fs::create_dir_all(output).map_err(|source| GenerateError::Io {
        path: output.to_path_buf(),
        source,
    })?;

    copy_assets(&options.assets, output)?;

    let current_year = chrono::Local::now().year();
    renderer.render(
        &Page::GalleryIndex {
            gallery,
            current_year,
        },
        &output.join(INDEX_PAGE),
    )?;

    let engine = ResizeEngine::new(backend, options.bounds);
    let mut summary = GenerateSummary {
        albums: gallery.albums.len(),
        photos: gallery.photo_count(),
        resized: 0,
    };

    for index in 0..gallery.albums.len() {
        let album_output = output.join(&gallery.albums[index].name);

        let album = &mut gallery.albums[index];
        summary.resized += process_album(&engine, album, &album_output, observer, options.jobs)?;

        let album = &gallery.albums[index];
        renderer.render(
            &Page::AlbumIndex {
                album,
                gallery,
                current_year,
            },
            &album_output.join(INDEX_PAGE),
        )?;
        observer.album_finished(album);
    }

    Ok(summary)
}

/// Resize what is missing and fill every photo's variant metadata.
/// Returns the number of photos that were resized.
fn process_album<B: ImageBackend>(
    engine: &ResizeEngine<'_, B>,
    album: &mut Album,
    album_output: &Path,
    observer: &dyn Observer,
    jobs: usize,
) -> Result<usize, ResizeError> {
    let needed: Vec<bool> = album
        .photos
        .iter()
        .map(|photo| engine.needs_resize(photo, album_output))
        .collect();
    let count = needed.iter().filter(|&&n| n).count();
    observer.album_started(album, count);

    let name = album.name.as_str();
    let pending: Vec<&mut Photo> = album
        .photos
        .iter_mut()
        .zip(&needed)
        .filter_map(|(photo, &needs)| needs.then_some(photo))
        .collect();

    let resize_one = |photo: &mut Photo| -> Result<(), ResizeError> {
        observer.photo_resizing(photo);
        engine.resize_photo(name, photo, album_output)?;
        observer.photo_resized(photo);
        Ok(())
    };
    if jobs > 1 {
        pending.into_par_iter().try_for_each(resize_one)?;
    } else {
        pending.into_iter().try_for_each(resize_one)?;
    }

    for photo in album.photos.iter_mut() {
        engine.record_missing(photo, album_output)?;
    }
    Ok(count)
}
