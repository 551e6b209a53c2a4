//! Reading a gallery source tree into the [`model`](crate::model).
//!
//! ## Source layout
//!
//! ```text
//! gallery/
//! ├── gallery.ini              # [gallery] title, author (optional file)
//! ├── 2017-lisbon/
//! │   ├── album.ini            # [album] title, date; [photos] file = caption
//! │   ├── DSC_0001.JPG
//! │   └── DSC_0002.JPG
//! └── scans/                   # no album.ini: not an album, skipped
//! ```
//!
//! ## Defaults
//!
//! | Field | Source | Fallback |
//! |---|---|---|
//! | gallery title | `[gallery] title` | `"Photo Gallery"` |
//! | gallery author | `[gallery] author` | none |
//! | album title | `[album] title` | directory name |
//! | album date | `[album] date` (`YYYY-MM-DD`) | directory creation date |
//!
//! ## Captions
//!
//! A caption is split at its first `|`: the text before it is the short
//! caption shown under the thumbnail, the whole text without the `|` is the
//! long caption shown in the viewer. See [`split_caption`].

use crate::ini::{Ini, IniError};
use crate::model::{Album, Gallery, Photo};
use chrono::{DateTime, Local, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const GALLERY_CONFIG: &str = "gallery.ini";
pub const ALBUM_CONFIG: &str = "album.ini";
pub const DEFAULT_GALLERY_TITLE: &str = "Photo Gallery";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed {path}: {source}")]
    Ini {
        path: PathBuf,
        #[source]
        source: IniError,
    },
    #[error("{path} has no [{section}] section")]
    MissingSection { path: PathBuf, section: &'static str },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ReadError + '_ {
    move |source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Gallery-level metadata as written in `gallery.ini`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryConfig {
    pub title: Option<String>,
    pub author: Option<String>,
}

impl GalleryConfig {
    pub fn parse(text: &str) -> Result<Self, IniError> {
        let ini = Ini::parse(text)?;
        Ok(Self {
            title: non_empty(ini.get("gallery", "title")),
            author: non_empty(ini.get("gallery", "author")),
        })
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_GALLERY_TITLE)
    }
}

/// One `[photos]` entry: file name and raw caption (empty when absent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoEntry {
    pub filename: String,
    pub caption: String,
}

/// Album metadata as written in `album.ini`, before defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumConfig {
    pub title: Option<String>,
    /// Raw `date` value; parsed by [`AlbumConfig::date`].
    pub date: Option<String>,
    pub photos: Vec<PhotoEntry>,
}

/// Why an `album.ini` document could not be read.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AlbumConfigError {
    #[error(transparent)]
    Ini(#[from] IniError),
    #[error("no [photos] section")]
    MissingPhotos,
}

impl AlbumConfig {
    pub fn parse(text: &str) -> Result<Self, AlbumConfigError> {
        let ini = Ini::parse(text)?;
        let photos = ini
            .section("photos")
            .ok_or(AlbumConfigError::MissingPhotos)?
            .entries()
            .map(|(filename, caption)| PhotoEntry {
                filename: filename.to_string(),
                caption: caption.unwrap_or_default().to_string(),
            })
            .collect();
        Ok(Self {
            title: non_empty(ini.get("album", "title")),
            date: non_empty(ini.get("album", "date")),
            photos,
        })
    }

    /// The configured date, if present and valid `YYYY-MM-DD`.
    pub fn date(&self) -> Result<Option<NaiveDate>, chrono::ParseError> {
        self.date
            .as_deref()
            .map(|d| NaiveDate::parse_from_str(d, DATE_FORMAT))
            .transpose()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(String::from)
}

/// Split a raw caption at the first `|` into `(short, long)`.
///
/// ```
/// # use kaleidoscope::reader::split_caption;
/// assert_eq!(
///     split_caption("Long caption| with hidden part"),
///     ("Long caption".to_string(), "Long caption with hidden part".to_string())
/// );
/// assert_eq!(split_caption("Caption"), ("Caption".to_string(), "Caption".to_string()));
/// ```
pub fn split_caption(raw: &str) -> (String, String) {
    match raw.split_once('|') {
        Some((short, rest)) => (short.to_string(), format!("{short}{rest}")),
        None => (raw.to_string(), raw.to_string()),
    }
}

/// A directory is an album iff it contains `album.ini`.
///
/// Errors other than "not found" (permissions, I/O) are reported rather than
/// read as "not an album".
pub fn is_album(path: &Path) -> Result<bool, ReadError> {
    let config_path = path.join(ALBUM_CONFIG);
    config_path.try_exists().map_err(io_error(&config_path))
}

/// Read the gallery at `path`: its metadata and every album directory
/// directly below it.
///
/// A missing `gallery.ini` gives the defaults; an unparseable one is reported
/// on stderr and also gives the defaults. Album errors are fatal.
pub fn read_gallery(path: &Path) -> Result<Gallery, ReadError> {
    let config = read_gallery_config(path)?;

    let mut children: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(path).map_err(io_error(path))? {
        let child = entry.map_err(io_error(path))?.path();
        if child.is_dir() && is_album(&child)? {
            children.push(child);
        }
    }
    // Name order first so albums sharing a date sort deterministically.
    children.sort();

    let albums = children
        .iter()
        .map(|child| read_album(child))
        .collect::<Result<Vec<_>, _>>()?;

    let title = config.title().to_string();
    Ok(Gallery::new(title, config.author, albums))
}

fn read_gallery_config(path: &Path) -> Result<GalleryConfig, ReadError> {
    let config_path = path.join(GALLERY_CONFIG);
    if !config_path.exists() {
        return Ok(GalleryConfig::default());
    }
    let text = fs::read_to_string(&config_path).map_err(io_error(&config_path))?;
    Ok(GalleryConfig::parse(&text).unwrap_or_else(|err| {
        eprintln!(
            "warning: ignoring malformed {}: {}",
            config_path.display(),
            err
        );
        GalleryConfig::default()
    }))
}

/// Read one album directory.
///
/// Title and date fall back to the directory name and creation date. A
/// malformed document or a missing `[photos]` section is an error.
pub fn read_album(path: &Path) -> Result<Album, ReadError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let config_path = path.join(ALBUM_CONFIG);
    let text = fs::read_to_string(&config_path).map_err(io_error(&config_path))?;

    let config = AlbumConfig::parse(&text).map_err(|err| match err {
        AlbumConfigError::Ini(source) => ReadError::Ini {
            path: config_path.clone(),
            source,
        },
        AlbumConfigError::MissingPhotos => ReadError::MissingSection {
            path: config_path.clone(),
            section: "photos",
        },
    })?;

    let date = match config.date() {
        Ok(Some(date)) => date,
        Ok(None) => directory_date(path)?,
        Err(err) => {
            eprintln!(
                "warning: {}: invalid date {:?} ({}), using directory date",
                config_path.display(),
                config.date.as_deref().unwrap_or_default(),
                err
            );
            directory_date(path)?
        }
    };

    let photos = config
        .photos
        .iter()
        .map(|entry| {
            let (short, long) = split_caption(&entry.caption);
            Photo::new(&entry.filename, short, long, path.join(&entry.filename))
        })
        .collect();

    let title = config.title.unwrap_or_else(|| name.clone());
    Ok(Album::new(name, title, date, photos))
}

/// Local calendar date of a directory's creation time, or its modification
/// time on filesystems that do not record creation.
pub fn directory_date(path: &Path) -> Result<NaiveDate, ReadError> {
    let meta = fs::metadata(path).map_err(io_error(path))?;
    let time = meta
        .created()
        .or_else(|_| meta.modified())
        .map_err(io_error(path))?;
    Ok(DateTime::<Local>::from(time).date_naive())
}
