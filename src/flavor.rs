//! Workbook flavors and file-extension handling.
//!
//! Two extensions are recognized on open: `.xls` (plain binary) and `.xlsx`
//! (XML-packaged). The streaming-append flavor is write-only and persists
//! with the `.xlsx` extension.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RowbookError};

/// The kind of workbook an engine allocates or opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WorkbookFlavor {
    /// Plain binary workbook (`.xls`).
    Plain,
    /// XML-packaged workbook (`.xlsx`).
    #[default]
    Packaged,
    /// Streaming-append workbook. Write-only; persists as `.xlsx`.
    StreamingPackaged,
}

impl WorkbookFlavor {
    /// The extension a workbook of this flavor persists with.
    #[must_use]
    pub const fn persisted_extension(self) -> &'static str {
        match self {
            Self::Plain => "xls",
            Self::Packaged | Self::StreamingPackaged => "xlsx",
        }
    }

    /// Recognize a flavor from a path's extension.
    ///
    /// # Errors
    /// Returns [`RowbookError::UnsupportedFormat`] for anything other than
    /// `.xls` or `.xlsx`.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(OsStr::to_str) {
            Some("xls") => Ok(Self::Plain),
            Some("xlsx") => Ok(Self::Packaged),
            _ => Err(RowbookError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }

    /// Replace the path's extension with this flavor's persisted extension.
    #[must_use]
    pub fn corrected_path(self, path: &Path) -> PathBuf {
        let mut corrected = path.to_path_buf();
        corrected.set_extension(self.persisted_extension());
        corrected
    }
}
