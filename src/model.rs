//! In-memory gallery model: gallery → albums → photos → resized variants.
//!
//! The model is built once by the [`reader`](crate::reader), then filled in
//! place by the [`resize`](crate::resize) engine (the `thumb` and `large`
//! slots of each [`Photo`]), and finally consumed read-only by the renderer.
//!
//! Albums are kept sorted newest first. [`Gallery::albums_by_year`] groups
//! consecutive albums sharing a year, so it is a partition of
//! [`Gallery::albums`] in the same order.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// The two resized variants produced for every photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Thumb,
    Large,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Thumb, Variant::Large];

    /// Directory name under the album output, also the URL prefix.
    pub fn name(self) -> &'static str {
        match self {
            Variant::Thumb => "thumb",
            Variant::Large => "large",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A generated raster variant of a photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResizedImage {
    /// Relative to the album output directory: `"{variant}/{photo}"`.
    pub url: String,
    /// Actual pixel dimensions of the produced file.
    pub size: (u32, u32),
}

impl ResizedImage {
    pub fn new(variant: Variant, photo_name: &str, size: (u32, u32)) -> Self {
        Self {
            url: format!("{}/{}", variant.name(), photo_name),
            size,
        }
    }

    pub fn width(&self) -> u32 {
        self.size.0
    }

    pub fn height(&self) -> u32 {
        self.size.1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Photo {
    /// Source file name; also the output file name of both variants.
    pub name: String,
    pub short_caption: String,
    pub long_caption: String,
    pub source_path: PathBuf,
    pub large: Option<ResizedImage>,
    pub thumb: Option<ResizedImage>,
}

impl Photo {
    pub fn new(
        name: impl Into<String>,
        short_caption: impl Into<String>,
        long_caption: impl Into<String>,
        source_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            short_caption: short_caption.into(),
            long_caption: long_caption.into(),
            source_path: source_path.into(),
            large: None,
            thumb: None,
        }
    }

    pub fn variant(&self, variant: Variant) -> Option<&ResizedImage> {
        match variant {
            Variant::Thumb => self.thumb.as_ref(),
            Variant::Large => self.large.as_ref(),
        }
    }

    pub fn set_variant(&mut self, variant: Variant, image: ResizedImage) {
        match variant {
            Variant::Thumb => self.thumb = Some(image),
            Variant::Large => self.large = Some(image),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Album {
    /// Source directory name; also the output subdirectory.
    pub name: String,
    pub title: String,
    pub date: NaiveDate,
    /// In `[photos]` section order.
    pub photos: Vec<Photo>,
}

impl Album {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        date: NaiveDate,
        photos: Vec<Photo>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            date,
            photos,
        }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Thumbnail URL of the first photo, relative to the gallery root.
    pub fn cover_url(&self) -> Option<String> {
        self.photos
            .first()
            .map(|p| format!("{}/{}/{}", self.name, Variant::Thumb.name(), p.name))
    }
}

/// Albums sharing a year, as a run within the sorted album list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearGroup<'a> {
    pub year: i32,
    pub albums: &'a [Album],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gallery {
    pub title: String,
    pub author: Option<String>,
    /// Newest first.
    pub albums: Vec<Album>,
}

impl Gallery {
    /// Build a gallery, sorting albums by date descending. The sort is
    /// stable, so albums sharing a date keep the order they were given in.
    pub fn new(title: impl Into<String>, author: Option<String>, mut albums: Vec<Album>) -> Self {
        albums.sort_by(|a, b| b.date.cmp(&a.date));
        Self {
            title: title.into(),
            author,
            albums,
        }
    }

    /// Group consecutive albums by year.
    ///
    /// This relies on the album sort: it groups runs, it does not collect
    /// every album of a year into one group.
    pub fn albums_by_year(&self) -> Vec<YearGroup<'_>> {
        self.albums
            .chunk_by(|a, b| a.year() == b.year())
            .map(|albums| YearGroup {
                year: albums[0].year(),
                albums,
            })
            .collect()
    }

    pub fn photo_count(&self) -> usize {
        self.albums.iter().map(|a| a.photos.len()).sum()
    }
}
