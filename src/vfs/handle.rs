//! File handles and metadata returned by the virtual filesystems

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::exceptions::{BundleError, Result};
use crate::registry::Entry;

/// Open file contract shared by every backend
pub trait VfsFile: Read + Seek + Send + fmt::Debug {
    /// Metadata for the open file
    fn stat(&self) -> Result<FileInfo>;

    /// Listing children is not supported by any backend
    fn read_dir(&mut self) -> Result<Vec<FileInfo>> {
        Err(BundleError::Unsupported(
            "directory listing is not available".to_string(),
        ))
    }

    /// Release the handle; nothing to flush for read-only files
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// File type and permission bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMode(u32);

impl FileMode {
    /// Regular file, no permission bits
    pub const REGULAR: FileMode = FileMode(0);
    /// Directory, no permission bits
    pub const DIR: FileMode = FileMode(1 << 31);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn is_dir(self) -> bool {
        self.0 & Self::DIR.0 != 0
    }

    pub fn permissions(self) -> u32 {
        self.0 & 0o777
    }
}

/// Result of [`VfsFile::stat`]
#[derive(Debug, Clone)]
pub struct FileInfo {
    name: String,
    size: u64,
    mode: FileMode,
    modtime: SystemTime,
    is_dir: bool,
    sys: Option<Arc<Entry>>,
}

impl FileInfo {
    fn from_entry(entry: &Arc<Entry>) -> Self {
        FileInfo {
            name: entry.name().to_string(),
            size: entry.size(),
            mode: mode_for(entry.is_dir()),
            modtime: entry.modtime(),
            is_dir: entry.is_dir(),
            sys: Some(Arc::clone(entry)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn mode(&self) -> FileMode {
        self.mode
    }

    pub fn modtime(&self) -> SystemTime {
        self.modtime
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Registry entry behind this metadata; `None` for files read from disk
    pub fn sys(&self) -> Option<&Entry> {
        self.sys.as_deref()
    }
}

fn mode_for(is_dir: bool) -> FileMode {
    if is_dir {
        FileMode::DIR
    } else {
        FileMode::REGULAR
    }
}

/// Handle over decoded embedded bytes
#[derive(Debug)]
pub struct EmbeddedFile {
    cursor: Cursor<Arc<[u8]>>,
    entry: Arc<Entry>,
}

impl EmbeddedFile {
    pub(crate) fn new(data: Arc<[u8]>, entry: Arc<Entry>) -> Self {
        EmbeddedFile {
            cursor: Cursor::new(data),
            entry,
        }
    }

    pub(crate) fn directory(entry: Arc<Entry>) -> Self {
        Self::new(Arc::from(Vec::new()), entry)
    }

    /// Entire decoded contents, independent of the cursor position
    pub fn bytes(&self) -> &[u8] {
        self.cursor.get_ref()
    }
}

impl Read for EmbeddedFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Seek for EmbeddedFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl VfsFile for EmbeddedFile {
    fn stat(&self) -> Result<FileInfo> {
        Ok(FileInfo::from_entry(&self.entry))
    }
}

/// Handle over the original file on disk
#[derive(Debug)]
pub struct LocalFile {
    file: File,
    entry: Arc<Entry>,
}

impl LocalFile {
    pub(crate) fn new(file: File, entry: Arc<Entry>) -> Self {
        LocalFile { file, entry }
    }
}

impl Read for LocalFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for LocalFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

impl VfsFile for LocalFile {
    fn stat(&self) -> Result<FileInfo> {
        let metadata = self
            .file
            .metadata()
            .map_err(|e| BundleError::io(self.entry.local(), e))?;
        Ok(FileInfo {
            name: self.entry.name().to_string(),
            size: metadata.len(),
            mode: mode_for(metadata.is_dir()),
            modtime: metadata.modified().unwrap_or(UNIX_EPOCH),
            is_dir: metadata.is_dir(),
            sys: None,
        })
    }
}
