//! # Kaleidoscope
//!
//! A static photo gallery generator. A gallery is a directory of album
//! directories; small INI files describe the gallery (title, author) and each
//! album (title, date, ordered photo list with captions). Kaleidoscope reads
//! that tree, resizes every photo into a thumbnail and a large variant, and
//! writes a plain HTML site.
//!
//! # Architecture: Read, Resize, Render
//!
//! ```text
//! 1. Read      gallery/   →  Gallery model      (INI files → albums → photos)
//! 2. Resize    model      →  output/*/thumb|large  (existing files are kept)
//! 3. Render    model      →  output/**/index.html + output/assets/
//! ```
//!
//! Steps 2 and 3 are driven together by [`generate::generate`], album by
//! album, reporting progress to an [`generate::Observer`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`ini`] | INI parser: ordered sections, case-insensitive keys, file names kept verbatim |
//! | [`reader`] | Reads `gallery.ini` / `album.ini` into the model, resolving defaults |
//! | [`model`] | `Gallery`, `Album`, `Photo`, `ResizedImage`, grouping by year |
//! | [`imaging`] | Resize backends: ImageMagick subprocess or pure Rust |
//! | [`resize`] | Incremental resize engine, existence of the output file is the cache |
//! | [`generate`] | Build orchestration and the progress observer |
//! | [`render`] | HTML pages with Maud |
//! | [`assets`] | Stylesheet and viewer script copied to `output/assets/` |
//! | [`scaffold`] | Starter `gallery.ini` / `album.ini` files |
//! | [`config`] | Optional `kaleidoscope.toml` build settings |
//! | [`output`] | CLI output formatting and progress bars |
//!
//! # Design Decisions
//!
//! ## Content-Blind Caching
//!
//! A variant is regenerated only when its file is missing. Sources are never
//! hashed and modification times are never compared, so a rebuild over an
//! unchanged tree does no image work at all. To force a variant, delete it.
//!
//! ## INI Order Is Photo Order
//!
//! The `[photos]` section of `album.ini` is the album: its keys pick which
//! files are shown and in what order. The parser keeps keys in file order and
//! never lowercases file names.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Malformed markup is a build error, every interpolation is
//! escaped, and there is no template directory to ship.

pub mod assets;
pub mod config;
pub mod generate;
pub mod imaging;
pub mod ini;
pub mod model;
pub mod output;
pub mod reader;
pub mod render;
pub mod resize;
pub mod scaffold;

#[cfg(test)]
pub(crate) mod test_helpers;
