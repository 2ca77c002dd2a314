//! Platform-specific font discovery: finding font files on disk.
//!
//! Resolution order for a [`FontSource`]: an explicit path, then DirectWrite
//! on Windows, then a scan of the platform font directories (by file name,
//! then by the family name stored in each font). Pure discovery; no shaping
//! or rasterizing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, trace};
use swash::{FontDataRef, StringId};

use crate::config::FontSource;
use crate::error::{Error, Result};

/// A font file and the face to use inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedFont {
    pub path: PathBuf,
    pub index: u32,
}

/// Resolve `source` to a font file.
pub fn locate(source: &FontSource) -> Result<LocatedFont> {
    if let Some(path) = &source.path {
        if !path.is_file() {
            return Err(Error::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "font file not found"),
            ));
        }
        return Ok(LocatedFont {
            path: path.clone(),
            index: source.index,
        });
    }

    #[cfg(target_os = "windows")]
    if let Some(path) = resolve_font_dwrite(&source.family) {
        debug!("font: {} resolved via DirectWrite", source.family);
        return Ok(LocatedFont {
            path,
            index: source.index,
        });
    }

    FontIndex::system()
        .find(&source.family, source.index)
        .ok_or_else(|| Error::FontNotFound {
            family: source.family.clone(),
        })
}

/// Resolve a regular-weight face via DirectWrite by family name.
#[cfg(target_os = "windows")]
fn resolve_font_dwrite(family_name: &str) -> Option<PathBuf> {
    let collection = dwrote::FontCollection::system();
    let descriptor = dwrote::FontDescriptor {
        family_name: family_name.to_string(),
        weight: dwrote::FontWeight::Regular,
        stretch: dwrote::FontStretch::Normal,
        style: dwrote::FontStyle::Normal,
    };
    let font = collection
        .font_from_descriptor(&descriptor)
        .ok()
        .flatten()?;
    let face = font.create_font_face();
    let files = face.files().ok()?;
    let file = files.first()?;
    file.font_file_path().ok()
}

#[cfg(target_os = "windows")]
fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(windir) = std::env::var_os("WINDIR") {
        dirs.push(PathBuf::from(windir).join("Fonts"));
    }
    if let Some(local) = std::env::var_os("LOCALAPPDATA") {
        dirs.push(PathBuf::from(local).join(r"Microsoft\Windows\Fonts"));
    }
    dirs
}

#[cfg(target_os = "macos")]
fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(home) = std::env::var_os("HOME") {
        dirs.push(PathBuf::from(home).join("Library/Fonts"));
    }
    dirs.push(PathBuf::from("/Library/Fonts"));
    dirs.push(PathBuf::from("/System/Library/Fonts"));
    dirs
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(home) = std::env::var_os("HOME") {
        dirs.push(PathBuf::from(&home).join(".local/share/fonts"));
        dirs.push(PathBuf::from(&home).join(".fonts"));
    }
    dirs.push(PathBuf::from("/usr/share/fonts"));
    dirs.push(PathBuf::from("/usr/local/share/fonts"));
    dirs
}

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc", "otc"];

/// Filename → full path index over a set of font directories.
#[derive(Debug, Default)]
pub struct FontIndex {
    files: HashMap<String, PathBuf>,
}

impl FontIndex {
    /// Scan the platform font directories once.
    pub fn system() -> Self {
        Self::scan(&font_dirs())
    }

    pub fn scan(dirs: &[PathBuf]) -> Self {
        let mut index = Self::default();
        for dir in dirs {
            index.index_dir(dir);
        }
        trace!("font: indexed {} font files", index.files.len());
        index
    }

    fn index_dir(&mut self, dir: &Path) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                self.index_dir(&path);
            } else if is_font_file(&path) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    self.files.entry(name.to_lowercase()).or_insert(path);
                }
            } else {
                // Not a font.
            }
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Find `family`: first by conventional file names, then by reading the
    /// family name out of every indexed font.
    pub fn find(&self, family: &str, index: u32) -> Option<LocatedFont> {
        let by_name = filename_candidates(family)
            .into_iter()
            .find_map(|name| self.files.get(&name));
        if let Some(path) = by_name {
            debug!("font: {family} matched by file name {}", path.display());
            return Some(LocatedFont {
                path: path.clone(),
                index,
            });
        }

        let mut paths: Vec<&PathBuf> = self.files.values().collect();
        paths.sort();
        paths.into_iter().find_map(|path| {
            let face = face_with_family(path, family)?;
            debug!(
                "font: {family} matched by family name in {} (face {face})",
                path.display()
            );
            Some(LocatedFont {
                path: path.clone(),
                index: face,
            })
        })
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| FONT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Lowercased file names a family is commonly shipped under.
fn filename_candidates(family: &str) -> Vec<String> {
    let compact: String = family
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if compact.is_empty() {
        return Vec::new();
    }
    let stems = [compact.clone(), format!("{compact}-regular")];
    stems
        .iter()
        .flat_map(|stem| FONT_EXTENSIONS.iter().map(move |ext| format!("{stem}.{ext}")))
        .collect()
}

/// Index of the face in `path` whose family name equals `family`.
fn face_with_family(path: &Path, family: &str) -> Option<u32> {
    let data = std::fs::read(path).ok()?;
    let fonts = FontDataRef::new(&data)?;
    fonts.fonts().enumerate().find_map(|(i, font)| {
        let name: String = font
            .localized_strings()
            .find_by_id(StringId::Family, None)?
            .chars()
            .collect();
        if name.eq_ignore_ascii_case(family) {
            u32::try_from(i).ok()
        } else {
            None
        }
    })
}
