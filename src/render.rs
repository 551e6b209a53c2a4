//! HTML page rendering.
//!
//! Two pages are produced per build:
//!
//! | Page | Template | Output |
//! |---|---|---|
//! | [`Page::GalleryIndex`] | `gallery.html` | `{output}/index.html` |
//! | [`Page::AlbumIndex`] | `album.html` | `{output}/{album}/index.html` |
//!
//! The orchestrator only talks to the [`Renderer`] trait, so tests can swap
//! in a renderer that records page contexts instead of writing HTML.
//! [`HtmlRenderer`] uses [maud](https://maud.lambda.xyz/): markup is checked
//! at compile time and every interpolated value is escaped.

use crate::model::{Album, Gallery, Photo};
use chrono::NaiveDate;
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Album dates on both pages, e.g. `15. May`.
pub const DATE_FORMAT: &str = "%d. %B";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A page and everything its template may read.
#[derive(Debug, Clone, Copy)]
pub enum Page<'a> {
    GalleryIndex {
        gallery: &'a Gallery,
        current_year: i32,
    },
    AlbumIndex {
        album: &'a Album,
        gallery: &'a Gallery,
        current_year: i32,
    },
}

impl Page<'_> {
    pub fn template_name(&self) -> &'static str {
        match self {
            Page::GalleryIndex { .. } => "gallery.html",
            Page::AlbumIndex { .. } => "album.html",
        }
    }
}

pub trait Renderer {
    /// Render `page` into the file at `path`, creating parent directories.
    fn render(&self, page: &Page<'_>, path: &Path) -> Result<(), RenderError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, page: &Page<'_>, path: &Path) -> Result<(), RenderError> {
        let markup = match *page {
            Page::GalleryIndex {
                gallery,
                current_year,
            } => render_gallery_index(gallery, current_year),
            Page::AlbumIndex {
                album,
                gallery,
                current_year,
            } => render_album_index(album, gallery, current_year),
        };

        let io_err = |source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, markup.into_string()).map_err(io_err)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// ============================================================================
// HTML Components
// ============================================================================

/// Document shell. `root` is the relative path back to the output root,
/// used to reach the shared assets.
fn base_document(title: &str, root: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href={ (root) "assets/kaleidoscope.css" };
            }
            body {
                (content)
                script src={ (root) "assets/kaleidoscope.js" } defer {}
            }
        }
    }
}

fn site_footer(gallery: &Gallery, current_year: i32) -> Markup {
    html! {
        footer.site-footer {
            @if let Some(author) = &gallery.author {
                "© " (current_year) " " (author)
            }
        }
    }
}

fn photo_thumbnail(photo: &Photo) -> Markup {
    html! {
        @if let (Some(large), Some(thumb)) = (&photo.large, &photo.thumb) {
            a.thumbnail href=(large.url)
                data-width=(large.width()) data-height=(large.height())
                title=(photo.long_caption) {
                img src=(thumb.url) width=(thumb.width()) height=(thumb.height())
                    alt=(photo.short_caption) loading="lazy";
                @if !photo.short_caption.is_empty() {
                    div.thumbnail__caption { (photo.short_caption) }
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Album cards grouped under year headings, newest first.
pub fn render_gallery_index(gallery: &Gallery, current_year: i32) -> Markup {
    let content = html! {
        header.site-header {
            h1 { (gallery.title) }
        }
        main.gallery-page {
            @for group in gallery.albums_by_year() {
                section.year {
                    h2 { (group.year) }
                    div.albums {
                        @for album in group.albums {
                            a.album-card href={ (album.name) "/" } {
                                @if let Some(cover) = album.cover_url() {
                                    img src=(cover) alt=(album.title) loading="lazy";
                                }
                                span.album-title { (album.title) }
                                " "
                                span.album-date { (format_date(album.date)) }
                            }
                        }
                    }
                }
            }
        }
        (site_footer(gallery, current_year))
    };

    base_document(&gallery.title, "", content)
}

/// Thumbnail grid; each thumbnail links to its large variant.
pub fn render_album_index(album: &Album, gallery: &Gallery, current_year: i32) -> Markup {
    let content = html! {
        header.site-header {
            nav {
                a href="../" { (gallery.title) }
            }
            h1 { (album.title) }
            p.album-date { (format_date(album.date)) }
        }
        main.album {
            @for photo in &album.photos {
                (photo_thumbnail(photo))
            }
        }
        (site_footer(gallery, current_year))
    };

    let title = format!("{} - {}", album.title, gallery.title);
    base_document(&title, "../", content)
}
