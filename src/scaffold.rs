//! Starter configuration files for `init-gallery` and `init-album`.
//!
//! Both write through [`Ini`], so whatever is generated reads back with the
//! same parser the build uses. Existing files are kept unless `force` is set.

use crate::ini::Ini;
use crate::reader::{
    ALBUM_CONFIG, DATE_FORMAT, DEFAULT_GALLERY_TITLE, GALLERY_CONFIG, ReadError, directory_date,
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffixes picked up by `init-album`, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

pub const DEFAULT_AUTHOR: &str = "Anonymous";

#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("{0} already exists (use --force to overwrite)")]
    AlreadyExists(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Read(#[from] ReadError),
}

fn write_new(path: PathBuf, ini: &Ini, force: bool) -> Result<PathBuf, ScaffoldError> {
    if path.exists() && !force {
        return Err(ScaffoldError::AlreadyExists(path));
    }
    match fs::write(&path, ini.to_string()) {
        Ok(()) => Ok(path),
        Err(source) => Err(ScaffoldError::Io { path, source }),
    }
}

/// Write `gallery.ini` with the default title and author.
pub fn generate_gallery_ini(gallery_path: &Path, force: bool) -> Result<PathBuf, ScaffoldError> {
    let mut ini = Ini::new();
    let section = ini.section_mut("gallery");
    section.set("title", Some(DEFAULT_GALLERY_TITLE.to_string()));
    section.set("author", Some(DEFAULT_AUTHOR.to_string()));

    write_new(gallery_path.join(GALLERY_CONFIG), &ini, force)
}

/// Write `album.ini` listing every image in `album_path`, sorted by name.
///
/// The title is the directory name with only its first letter capitalized,
/// the date is the directory's creation date. Captions are left empty.
pub fn generate_album_ini(album_path: &Path, force: bool) -> Result<PathBuf, ScaffoldError> {
    if !album_path.is_dir() {
        return Err(ScaffoldError::NotADirectory(album_path.to_path_buf()));
    }
    let config_path = album_path.join(ALBUM_CONFIG);
    if config_path.exists() && !force {
        return Err(ScaffoldError::AlreadyExists(config_path));
    }

    let photos = list_images(album_path)?;
    let date = directory_date(album_path)?;
    let name = album_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut ini = Ini::new();
    let album = ini.section_mut("album");
    album.set("title", Some(capitalize(&name)));
    album.set("date", Some(date.format(DATE_FORMAT).to_string()));
    let section = ini.section_mut("photos");
    for photo in photos {
        section.set(&photo, None);
    }

    write_new(config_path, &ini, force)
}

fn list_images(dir: &Path) -> Result<Vec<String>, ScaffoldError> {
    let io_err = |source| ScaffoldError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut photos = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file()
            && is_image(&path)
            && let Some(name) = path.file_name()
        {
            photos.push(name.to_string_lossy().into_owned());
        }
    }
    photos.sort();
    Ok(photos)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// First character uppercased, the rest lowercased: `testing-Album` → `Testing-album`.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{AlbumConfig, GalleryConfig, read_album};
    use crate::test_helpers::testing_gallery;
    use chrono::Local;
    use tempfile::TempDir;

    #[test]
    fn gallery_ini_has_title_and_author() {
        let tmp = TempDir::new().unwrap();
        let path = generate_gallery_ini(tmp.path(), false).unwrap();

        let config = GalleryConfig::parse(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(config.title(), "Photo Gallery");
        assert_eq!(config.author.as_deref(), Some("Anonymous"));
    }

    #[test]
    fn gallery_ini_is_not_overwritten_without_force() {
        let gallery = testing_gallery();
        let path = gallery.path().join("gallery.ini");
        let before = fs::read_to_string(&path).unwrap();

        let result = generate_gallery_ini(gallery.path(), false);
        assert!(matches!(result, Err(ScaffoldError::AlreadyExists(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);

        generate_gallery_ini(gallery.path(), true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("Anonymous"));
    }

    #[test]
    fn album_ini_lists_all_images_case_preserved() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("blank");
        fs::create_dir(&dir).unwrap();
        for name in ["blank-1.jpg", "blank-2.JPG", "blank-3.jpeg", "blank-4.JPEG"] {
            fs::write(dir.join(name), b"").unwrap();
        }
        fs::write(dir.join("notes.txt"), b"").unwrap();

        let path = generate_album_ini(&dir, false).unwrap();
        let config = AlbumConfig::parse(&fs::read_to_string(path).unwrap()).unwrap();

        let names: Vec<&str> = config.photos.iter().map(|p| p.filename.as_str()).collect();
        assert_eq!(names, vec!["blank-1.jpg", "blank-2.JPG", "blank-3.jpeg", "blank-4.JPEG"]);
        assert_eq!(config.date().unwrap(), Some(Local::now().date_naive()));
        assert_eq!(config.title.as_deref(), Some("Blank"));
    }

    #[test]
    fn album_ini_for_testing_album_reads_back() {
        let gallery = testing_gallery();
        let dir = gallery.path().join("testing-album");
        fs::remove_file(dir.join("album.ini")).unwrap();

        generate_album_ini(&dir, false).unwrap();
        let album = read_album(&dir).unwrap();

        assert_eq!(album.title, "Testing-album");
        let names: Vec<&str> = album.photos.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Photo1.jpg", "Photo2.jpg", "Photo3.jpg", "Photo4.jpg"]);
        assert!(album.photos.iter().all(|p| p.short_caption.is_empty()));
    }

    #[test]
    fn album_ini_is_not_overwritten_without_force() {
        let gallery = testing_gallery();
        let dir = gallery.path().join("testing-album");

        let result = generate_album_ini(&dir, false);
        assert!(matches!(result, Err(ScaffoldError::AlreadyExists(_))));
        assert_eq!(read_album(&dir).unwrap().title, "Testing Album");

        generate_album_ini(&dir, true).unwrap();
        assert_eq!(read_album(&dir).unwrap().title, "Testing-album");
    }

    #[test]
    fn album_ini_requires_directory() {
        let tmp = TempDir::new().unwrap();
        let result = generate_album_ini(&tmp.path().join("missing"), false);
        assert!(matches!(result, Err(ScaffoldError::NotADirectory(_))));
    }

    #[test]
    fn capitalize_lowercases_rest() {
        assert_eq!(capitalize("testing-Album"), "Testing-album");
        assert_eq!(capitalize("ÉTÉ"), "Été");
        assert_eq!(capitalize(""), "");
    }
}
