//! Bounded loading of input files.
//!
//! The file is size-checked against [`IoConfig`] and memory-mapped; the
//! mapping itself backs the immutable [`RawImage`] that the ELF reader borrows from.

pub mod error;

use crate::config::IoConfig;
use crate::io::error::{IoError, Result};
use bytes::Bytes;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The entire contents of an input file, read-only after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    path: Option<PathBuf>,
    bytes: Bytes,
}

impl RawImage {
    /// Wrap bytes that did not come from a file.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            path: None,
            bytes: bytes.into(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Loads files into [`RawImage`]s under a size limit.
#[derive(Debug, Clone, Default)]
pub struct ImageReader {
    limits: IoConfig,
}

impl ImageReader {
    pub fn new(limits: IoConfig) -> Self {
        Self { limits }
    }

    /// Read the whole file at `path`.
    ///
    /// Fails with `IoError::FileTooLarge` before mapping anything when the
    /// file exceeds `max_file_size`.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<RawImage> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();

        debug!(
            path = %path.display(),
            size = file_size,
            limits.max_file_size = self.limits.max_file_size,
            "Loading input file"
        );

        if file_size > self.limits.max_file_size {
            warn!(
                path = %path.display(),
                size = file_size,
                limit = self.limits.max_file_size,
                "File is too large"
            );
            return Err(IoError::FileTooLarge {
                limit: self.limits.max_file_size,
                found: file_size,
            });
        }

        // memmap cannot map empty files
        let bytes = if file_size == 0 {
            Bytes::new()
        } else {
            // Safety: read-only map of a regular file. The map is owned by the
            // returned `Bytes` and unmapped when the last clone is dropped.
            let map = unsafe { Mmap::map(&file)? };
            Bytes::from_owner(map)
        };

        Ok(RawImage {
            path: Some(path.to_path_buf()),
            bytes,
        })
    }
}
