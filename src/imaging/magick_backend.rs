//! ImageMagick subprocess backend.
//!
//! Each resize is one blocking invocation:
//!
//! ```text
//! convert <source> -auto-orient -resize 1500x1000> <output>
//! ```
//!
//! `-auto-orient` runs first so the bounding box applies to the upright
//! image. The `>` geometry flag only ever shrinks. The output format follows
//! the output file extension, which is the source's own name.
//!
//! A tool that cannot be started, or that exits non-zero, fails the resize
//! with its stderr attached.

use super::backend::{BackendError, Dimensions, ImageBackend, read_dimensions};
use super::params::ResizeParams;
use std::path::Path;
use std::process::Command;

pub const DEFAULT_COMMAND: &str = "convert";

pub struct MagickBackend {
    command: String,
}

impl MagickBackend {
    pub fn new() -> Self {
        Self::with_command(DEFAULT_COMMAND)
    }

    /// Use a different executable, e.g. `magick` on ImageMagick 7 installs.
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn build_command(&self, params: &ResizeParams) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg(&params.source)
            .arg("-auto-orient")
            .arg("-resize")
            .arg(params.bound.geometry())
            .arg(&params.output);
        cmd
    }
}

impl Default for MagickBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for MagickBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        read_dimensions(path)
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let output = self
            .build_command(params)
            .output()
            .map_err(|e| BackendError::ToolMissing(self.command.clone(), e))?;

        if !output.status.success() {
            return Err(BackendError::ProcessingFailed(format!(
                "{} exited with {} for {}: {}",
                self.command,
                output.status,
                params.source.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Bound;
    use crate::test_helpers::create_test_jpeg;

    fn params(source: &Path, output: &Path, bound: Bound) -> ResizeParams {
        ResizeParams {
            source: source.to_path_buf(),
            output: output.to_path_buf(),
            bound,
        }
    }

    #[test]
    fn command_line_orients_before_resizing() {
        let backend = MagickBackend::new();
        let cmd = backend.build_command(&params(
            Path::new("/src/a.jpg"),
            Path::new("/out/thumb/a.jpg"),
            Bound::new(300, 200),
        ));

        assert_eq!(cmd.get_program(), "convert");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy()).collect();
        assert_eq!(
            args,
            vec!["/src/a.jpg", "-auto-orient", "-resize", "300x200>", "/out/thumb/a.jpg"]
        );
    }

    #[test]
    fn missing_tool_is_reported() {
        let backend = MagickBackend::with_command("kaleidoscope-no-such-tool");
        let result = backend.resize(&params(
            Path::new("/src/a.jpg"),
            Path::new("/out/a.jpg"),
            Bound::new(300, 200),
        ));
        assert!(matches!(result, Err(BackendError::ToolMissing(cmd, _)) if cmd == "kaleidoscope-no-such-tool"));
    }

    #[test]
    fn nonzero_exit_is_failure() {
        // `false` ignores its arguments and exits 1.
        let backend = MagickBackend::with_command("false");
        let result = backend.resize(&params(
            Path::new("/src/a.jpg"),
            Path::new("/out/a.jpg"),
            Bound::new(300, 200),
        ));
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }

    #[test]
    #[ignore] // Requires ImageMagick
    fn resize_shrinks_to_bound() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        let output = tmp.path().join("out.jpg");
        create_test_jpeg(&source, 800, 600);

        let backend = MagickBackend::new();
        backend
            .resize(&params(&source, &output, Bound::new(300, 200)))
            .unwrap();

        let dims = backend.identify(&output).unwrap();
        assert_eq!((dims.width, dims.height), (267, 200));
    }

    #[test]
    #[ignore] // Requires ImageMagick
    fn resize_never_enlarges() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("source.jpg");
        let output = tmp.path().join("out.jpg");
        create_test_jpeg(&source, 40, 30);

        let backend = MagickBackend::new();
        backend
            .resize(&params(&source, &output, Bound::new(1500, 1000)))
            .unwrap();

        let dims = backend.identify(&output).unwrap();
        assert_eq!((dims.width, dims.height), (40, 30));
    }
}
