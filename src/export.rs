//! Writing the three artifacts of a run.
//!
//! Each artifact is written to a `.tmp` sibling first. Once all three are on
//! disk they are committed together: existing files are moved to `.bak`, the
//! staged files renamed into place, and on any failure the previous files are
//! restored. A failed run never leaves a mixed set of old and new files.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use log::info;

use crate::error::{Error, Result};
use crate::pipeline::RenderedAtlas;
use crate::raster::Surface;

/// Output locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub fill: PathBuf,
    pub outline: PathBuf,
    pub widths: PathBuf,
}

/// Write both atlases as PNG and the width table as raw bytes.
pub fn write_all(atlas: &RenderedAtlas, paths: &ArtifactPaths) -> Result<()> {
    let staged = [
        (with_suffix(&paths.fill, ".tmp"), paths.fill.as_path()),
        (with_suffix(&paths.outline, ".tmp"), paths.outline.as_path()),
        (with_suffix(&paths.widths, ".tmp"), paths.widths.as_path()),
    ];

    let written = write_png(&atlas.fill, &staged[0].0)
        .and_then(|()| write_png(&atlas.outline, &staged[1].0))
        .and_then(|()| {
            std::fs::write(&staged[2].0, atlas.widths.as_bytes())
                .map_err(|e| Error::io(&staged[2].0, e))
        })
        .and_then(|()| commit(&staged));
    if let Err(e) = written {
        discard(&staged);
        return Err(e);
    }

    for (_, path) in &staged {
        info!("export: wrote {}", path.display());
    }
    Ok(())
}

fn write_png(surface: &Surface, path: &Path) -> Result<()> {
    surface
        .image()
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| Error::Encode {
            path: path.to_owned(),
            source,
        })
}

/// A destination that now holds the new artifact, and where its previous
/// file was moved, if there was one.
struct Committed<'a> {
    path: &'a Path,
    backup: Option<PathBuf>,
}

/// Rename every staged file into place, or none of them.
fn commit<'a>(staged: &[(PathBuf, &'a Path)]) -> Result<()> {
    let mut done: Vec<Committed<'a>> = Vec::with_capacity(staged.len());
    for (tmp, path) in staged {
        let path = *path;
        let backup = if path.is_file() {
            let backup = with_suffix(path, ".bak");
            if let Err(e) = std::fs::rename(path, &backup) {
                roll_back(&done);
                return Err(Error::io(path, e));
            }
            Some(backup)
        } else {
            None
        };
        if let Err(e) = std::fs::rename(tmp, path) {
            if let Some(backup) = &backup {
                let _ = std::fs::rename(backup, path);
            }
            roll_back(&done);
            return Err(Error::io(path, e));
        }
        done.push(Committed { path, backup });
    }

    for committed in &done {
        if let Some(backup) = &committed.backup {
            let _ = std::fs::remove_file(backup);
        }
    }
    Ok(())
}

/// Undo committed renames, newest first.
fn roll_back(done: &[Committed<'_>]) {
    for committed in done.iter().rev() {
        let _ = match &committed.backup {
            Some(backup) => std::fs::rename(backup, committed.path),
            None => std::fs::remove_file(committed.path),
        };
    }
}

/// Best-effort removal of staged files after a failure.
fn discard(staged: &[(PathBuf, &Path)]) {
    for (tmp, _) in staged {
        let _ = std::fs::remove_file(tmp);
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
