use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::contract::ARCHIVE_ENTRY_NAME;

/// Owner read/write, group and other read.
pub const ARCHIVE_ENTRY_MODE: u32 = 0o644;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("failed to read source file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write code archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to write code archive entry: {0}")]
    Write(#[from] std::io::Error),
}

/// In-memory deployment package. Never written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeArchive {
    bytes: Vec<u8>,
}

impl CodeArchive {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        format!("{:x}", hasher.finalize())
    }
}

pub fn build_archive(file_name: &Path) -> Result<CodeArchive, ArchiveError> {
    let source = fs::read(file_name).map_err(|source| ArchiveError::Read {
        path: file_name.to_path_buf(),
        source,
    })?;
    archive_from_bytes(&source)
}

pub fn archive_from_bytes(source: &[u8]) -> Result<CodeArchive, ArchiveError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(ARCHIVE_ENTRY_MODE);
    zip.start_file(ARCHIVE_ENTRY_NAME, options)?;
    zip.write_all(source)?;
    let cursor = zip.finish()?;

    Ok(CodeArchive {
        bytes: cursor.into_inner(),
    })
}
