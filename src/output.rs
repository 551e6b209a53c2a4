//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Hello World
//!     Author: Me
//!
//! 2017
//! 001 Testing Album (4 photos)
//!     Source: testing-album/
//!     Date: 2017-05-15
//!     001 (Photo1.jpg)
//!     002 Caption
//!         Source: Photo2.jpg
//! ```
//!
//! ## Build
//!
//! Progress is drawn by [`ProgressReporter`], one bar per album sized to the
//! photos that actually need resizing. The build ends with a summary:
//!
//! ```text
//! Built 2 albums, 8 photos (3 resized, 5 cached)
//! Output: gallery/output
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::generate::{GenerateSummary, Observer};
use crate::model::{Album, Gallery, Photo};
use crate::reader::DATE_FORMAT;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Album header: positional index, title and photo count.
fn album_header(index: usize, album: &Album) -> String {
    format!(
        "{} {} ({})",
        format_index(index),
        album.title,
        plural(album.photos.len(), "photo")
    )
}

/// Captioned photos show the caption, uncaptioned show the file name in
/// parens since the file name is then their only identity.
fn photo_line(index: usize, photo: &Photo) -> String {
    if photo.short_caption.is_empty() {
        format!("{} ({})", format_index(index), photo.name)
    } else {
        format!("{} {}", format_index(index), photo.short_caption)
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(gallery: &Gallery) -> Vec<String> {
    let mut lines = vec![gallery.title.clone()];
    if let Some(author) = &gallery.author {
        lines.push(format!("{}Author: {}", indent(1), author));
    }

    if gallery.albums.is_empty() {
        lines.push(String::new());
        lines.push("No albums found".to_string());
        return lines;
    }

    let mut position = 0;
    for group in gallery.albums_by_year() {
        lines.push(String::new());
        lines.push(group.year.to_string());
        for album in group.albums {
            position += 1;
            lines.push(album_header(position, album));
            lines.push(format!("{}Source: {}/", indent(1), album.name));
            lines.push(format!("{}Date: {}", indent(1), album.date.format(DATE_FORMAT)));
            for (i, photo) in album.photos.iter().enumerate() {
                lines.push(format!("{}{}", indent(1), photo_line(i + 1, photo)));
                if !photo.short_caption.is_empty() {
                    lines.push(format!("{}Source: {}", indent(2), photo.name));
                }
            }
        }
    }
    lines
}

pub fn print_check_output(gallery: &Gallery) {
    for line in format_check_output(gallery) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_summary(summary: &GenerateSummary, output: &Path) -> Vec<String> {
    vec![
        format!(
            "Built {}, {} ({} resized, {} cached)",
            plural(summary.albums, "album"),
            plural(summary.photos, "photo"),
            summary.resized,
            summary.cached()
        ),
        format!("Output: {}", output.display()),
    ]
}

pub fn print_summary(summary: &GenerateSummary, output: &Path) {
    for line in format_summary(summary, output) {
        println!("{}", line);
    }
}

/// Line printed after a scaffold command wrote a file.
pub fn format_generated(path: &Path) -> String {
    format!("{} generated", path.display())
}

const BAR_TEMPLATE: &str = "{prefix:.bold} [{bar:30}] {pos}/{len} {wide_msg}";

/// Build observer drawing one progress bar per album.
#[derive(Default)]
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&self) -> Option<ProgressBar> {
        self.bar.lock().ok().and_then(|bar| bar.clone())
    }
}

impl Observer for ProgressReporter {
    fn album_started(&self, album: &Album, to_process: usize) {
        let bar = ProgressBar::new(to_process as u64);
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        bar.set_prefix(album.title.clone());
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn photo_resizing(&self, photo: &Photo) {
        if let Some(bar) = self.current() {
            bar.set_message(photo.name.clone());
        }
    }

    fn photo_resized(&self, _photo: &Photo) {
        if let Some(bar) = self.current() {
            bar.inc(1);
        }
    }

    fn album_finished(&self, _album: &Album) {
        let finished = self.bar.lock().ok().and_then(|mut slot| slot.take());
        if let Some(bar) = finished {
            let message = if bar.length() == Some(0) {
                "up to date"
            } else {
                "done"
            };
            bar.finish_with_message(message);
        }
    }
}
