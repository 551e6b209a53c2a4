//! Static asset bundle copied into `{output}/assets/`.
//!
//! The default bundle is compiled into the binary:
//! - `static/kaleidoscope.css`: page and lightbox styles
//! - `static/kaleidoscope.js`: full-screen viewer for album pages
//!
//! A gallery can replace it with its own directory via `assets_dir` in
//! `kaleidoscope.toml`. Either way the previous `assets/` directory is
//! removed first, so files dropped from the bundle do not linger.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub const ASSETS_DIR: &str = "assets";

const BUNDLE: &[(&str, &str)] = &[
    ("kaleidoscope.css", include_str!("../static/kaleidoscope.css")),
    ("kaleidoscope.js", include_str!("../static/kaleidoscope.js")),
];

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Asset bundle not found: {0}")]
    BundleMissing(PathBuf),
    #[error("Failed to copy assets to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to walk {0}: {1}")]
    Walk(PathBuf, #[source] walkdir::Error),
}

/// Where the assets come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AssetSource {
    #[default]
    Bundled,
    Directory(PathBuf),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> AssetError + '_ {
    move |source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Replace `{output}/assets` with a fresh copy of `source`.
///
/// Returns the assets directory.
pub fn copy_assets(source: &AssetSource, output: &Path) -> Result<PathBuf, AssetError> {
    let target = output.join(ASSETS_DIR);

    // Checked before anything is deleted.
    if let AssetSource::Directory(dir) = source
        && !dir.is_dir()
    {
        return Err(AssetError::BundleMissing(dir.clone()));
    }

    if target.exists() {
        fs::remove_dir_all(&target).map_err(io_err(&target))?;
    }
    fs::create_dir_all(&target).map_err(io_err(&target))?;

    match source {
        AssetSource::Bundled => write_bundle(&target)?,
        AssetSource::Directory(dir) => copy_tree(dir, &target)?,
    }
    Ok(target)
}

fn write_bundle(target: &Path) -> Result<(), AssetError> {
    for (name, content) in BUNDLE {
        let path = target.join(name);
        fs::write(&path, content).map_err(io_err(&path))?;
    }
    Ok(())
}

fn copy_tree(src: &Path, dst: &Path) -> Result<(), AssetError> {
    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| AssetError::Walk(src.to_path_buf(), e))?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let dest = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(io_err(&dest))?;
        } else {
            fs::copy(entry.path(), &dest).map_err(io_err(&dest))?;
        }
    }
    Ok(())
}
