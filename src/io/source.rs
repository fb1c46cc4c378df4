// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Byte sources for record decoding.
//!
//! A [`ByteSource`] is either a memory-mapped file or an in-memory buffer.
//! Decoding behaves identically over both: every consumer sees a plain
//! `&[u8]`, the mapped file is owned by the source and all borrows are tied
//! to its lifetime.

use std::fs::File;
use std::ops::Deref;
use std::path::Path;

use crate::core::{ConvertError, Result};

/// A decodable byte source.
#[derive(Debug)]
pub enum ByteSource {
    /// Memory-mapped file (owned mapping plus the path for diagnostics)
    Mapped {
        /// The memory-mapped file (owned)
        mmap: memmap2::Mmap,
        /// File path for diagnostics
        path: String,
    },
    /// In-memory byte buffer
    Buffer(Vec<u8>),
}

impl ByteSource {
    /// Memory-map a file.
    ///
    /// # Errors
    ///
    /// [`ConvertError::FileNotFound`] if the path does not exist; an I/O
    /// error if the file cannot be opened or mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        if !path_ref.exists() {
            return Err(ConvertError::file_not_found(path_ref));
        }
        let path_str = path_ref.to_string_lossy().to_string();

        let file = File::open(path_ref)
            .map_err(|e| ConvertError::io("ByteSource", format!("open '{path_str}': {e}")))?;

        // The mapping is owned by the source; references never outlive it.
        let mmap = unsafe { memmap2::Mmap::map(&file) }
            .map_err(|e| ConvertError::io("ByteSource", format!("mmap '{path_str}': {e}")))?;

        Ok(ByteSource::Mapped {
            mmap,
            path: path_str,
        })
    }

    /// Wrap an in-memory buffer.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        ByteSource::Buffer(bytes.into())
    }

    /// The raw bytes of this source.
    pub fn data(&self) -> &[u8] {
        match self {
            ByteSource::Mapped { mmap, .. } => mmap,
            ByteSource::Buffer(bytes) => bytes,
        }
    }

    /// Length of the source in bytes.
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Whether the source is empty.
    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    /// Source description for diagnostics.
    pub fn describe(&self) -> &str {
        match self {
            ByteSource::Mapped { path, .. } => path,
            ByteSource::Buffer(_) => "<buffer>",
        }
    }
}

impl Deref for ByteSource {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.data()
    }
}

impl From<Vec<u8>> for ByteSource {
    fn from(bytes: Vec<u8>) -> Self {
        ByteSource::Buffer(bytes)
    }
}
