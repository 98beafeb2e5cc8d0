//! Opening wave banks from disk
//!
//! Split banks are opened through their body file (.wbd, .wb2) and the
//! header companion is looked up next to it. Fused banks (.sed) are a
//! single file.

use std::path::{Path, PathBuf};

use super::error::FormatError;
use super::ContainerHandle;
use crate::sound::streamfile::FileStreamFile;

/// Open handles for one bank
#[derive(Debug)]
pub struct WaveBankFiles {
    header: FileStreamFile,
    /// `None` when the header file also holds the body
    body: Option<FileStreamFile>,
}

impl WaveBankFiles {
    /// Header and body readers for `parse_wavebank`
    pub fn container(&self) -> ContainerHandle<'_> {
        match &self.body {
            Some(body) => ContainerHandle::new(&self.header, body),
            None => ContainerHandle::fused(&self.header),
        }
    }

    pub fn is_fused(&self) -> bool {
        self.body.is_none()
    }
}

/// Companion header extension for a body extension, or `None` for fused banks
fn companion_extension(ext: &str) -> Result<Option<&'static str>, FormatError> {
    match ext.to_ascii_lowercase().as_str() {
        "wbd" => Ok(Some("wbh")),
        "wb2" => Ok(Some("wh2")),
        "sed" => Ok(None),
        _ => Err(FormatError::UnknownExtension(ext.to_string())),
    }
}

/// Sibling path with the companion extension, keeping the body's letter case
fn companion_path(path: &Path, body_ext: &str, companion_ext: &str) -> PathBuf {
    let upper = body_ext.chars().all(|c| !c.is_ascii_lowercase());
    if upper {
        path.with_extension(companion_ext.to_ascii_uppercase())
    } else {
        path.with_extension(companion_ext)
    }
}

/// Open a bank by its body (or fused) file
pub fn open_wavebank(path: &Path) -> Result<WaveBankFiles, FormatError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    match companion_extension(ext)? {
        None => {
            log::debug!("Opening fused bank {}", path.display());
            Ok(WaveBankFiles {
                header: FileStreamFile::open(path)?,
                body: None,
            })
        }
        Some(companion) => {
            let header_path = companion_path(path, ext, companion);
            open_split(&header_path, path)
        }
    }
}

/// Open a split bank with an explicit header file
pub fn open_split(header_path: &Path, body_path: &Path) -> Result<WaveBankFiles, FormatError> {
    log::debug!(
        "Opening bank {} with header {}",
        body_path.display(),
        header_path.display()
    );
    let body = FileStreamFile::open(body_path)?;
    let header = FileStreamFile::open(header_path)?;
    Ok(WaveBankFiles {
        header,
        body: Some(body),
    })
}
