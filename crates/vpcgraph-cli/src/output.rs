//! Output file handling.

use std::fs;
use std::path::Path;

use tracing::info;

use vpcgraph_error::{Error, ErrorKind, Result};
use vpcgraph_render::RenderFormat;

/// Explicit format, else the one implied by the output extension, else HTML.
pub fn resolve_format(explicit: Option<RenderFormat>, output: &Path) -> RenderFormat {
    explicit
        .or_else(|| RenderFormat::from_path(output))
        .unwrap_or_default()
}

/// Write `bytes` to `path`, creating missing parent directories.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| write_error(parent, err))?;
    }
    fs::write(path, bytes).map_err(|err| write_error(path, err))?;
    info!(path = %path.display(), bytes = bytes.len(), "output written");
    Ok(())
}

fn write_error(path: &Path, err: std::io::Error) -> Error {
    Error::new(ErrorKind::IoFailed, "failed to write output")
        .with_operation("output::write_output")
        .with_context("path", path.display().to_string())
        .set_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_resolution_order() {
        assert_eq!(
            resolve_format(Some(RenderFormat::Html), Path::new("a.dot")),
            RenderFormat::Html
        );
        assert_eq!(resolve_format(None, Path::new("a.dot")), RenderFormat::Dot);
        assert_eq!(resolve_format(None, Path::new("graph")), RenderFormat::Html);
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.html");
        write_output(&path, b"<html></html>").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"<html></html>");
    }
}
