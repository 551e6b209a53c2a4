//! Shared test fixtures.
//!
//! [`testing_gallery`] builds the reference gallery in a temp directory:
//!
//! ```text
//! gallery.ini                  title = Hello World, author = Me
//! testing-album/
//!     album.ini                title, date 2017-05-15, four captioned photos
//!     Photo1.jpg .. Photo4.jpg
//! incomplete-album/
//!     album.ini                [photos] only
//!     Photo1.jpg .. Photo4.jpg
//! ```
//!
//! Photos are real (tiny) JPEGs so both the mock and the pixel backends can
//! run against the same tree.

use image::{Rgb, RgbImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const GALLERY_INI: &str = "[gallery]\ntitle = Hello World\nauthor = Me\n";

pub const TESTING_ALBUM_INI: &str = "\
[album]
title = Testing Album
date = 2017-05-15

[photos]
Photo1.jpg
Photo2.jpg = Caption
Photo3.jpg = Long caption
Photo4.jpg = Long caption| with hidden part
";

pub const INCOMPLETE_ALBUM_INI: &str = "\
[photos]
Photo1.jpg
Photo2.jpg
Photo3.jpg
Photo4.jpg
";

/// Photo names and pixel sizes: landscape, portrait, small, square.
pub const PHOTOS: [(&str, u32, u32); 4] = [
    ("Photo1.jpg", 640, 480),
    ("Photo2.jpg", 300, 600),
    ("Photo3.jpg", 120, 80),
    ("Photo4.jpg", 500, 500),
];

/// Write a gradient JPEG of the given size.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    img.save(path).unwrap();
}

fn write_album(root: &Path, name: &str, ini: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("album.ini"), ini).unwrap();
    for (photo, width, height) in PHOTOS {
        create_test_jpeg(&dir.join(photo), width, height);
    }
}

/// Build the reference gallery and return its temp directory.
pub fn testing_gallery() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("gallery.ini"), GALLERY_INI).unwrap();
    write_album(tmp.path(), "testing-album", TESTING_ALBUM_INI);
    write_album(tmp.path(), "incomplete-album", INCOMPLETE_ALBUM_INI);
    tmp
}
