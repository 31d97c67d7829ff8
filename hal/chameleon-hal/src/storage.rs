//! Named-blob storage abstractions
//!
//! Provides the filesystem-shaped store the node persists its
//! configuration (and the web UI assets) in. On ESP32 this is a LittleFS
//! partition; on the host it is an in-memory map.

/// Maximum length of a blob name, including the leading `/`
pub const MAX_NAME_LEN: usize = 32;

/// How a blob is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OpenMode {
    /// Read an existing blob from the start
    Read,
    /// Create or truncate a blob for writing
    Write,
}

/// Errors from blob storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Blob does not exist
    NotFound,
    /// Operation not permitted by the handle's open mode
    WrongMode,
    /// Blob name exceeds [`MAX_NAME_LEN`]
    NameTooLong,
    /// Storage is full
    Full,
    /// Underlying medium reported an error
    Io,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StorageError::NotFound => f.write_str("blob not found"),
            StorageError::WrongMode => f.write_str("operation not allowed in this open mode"),
            StorageError::NameTooLong => f.write_str("blob name too long"),
            StorageError::Full => f.write_str("storage full"),
            StorageError::Io => f.write_str("storage I/O error"),
        }
    }
}

/// Named-blob store
///
/// Byte-addressable named blobs with open/read/write/close/remove/list.
/// Implementations decide when written data becomes durable, but it must
/// be visible to a subsequent `open` once the handle has been closed.
pub trait BlobStore {
    /// Open file handle
    type Handle;

    /// Open a blob by name
    ///
    /// Returns `None` when opening for [`OpenMode::Read`] and the blob is
    /// absent, or when the store cannot create it for [`OpenMode::Write`].
    fn open(&mut self, name: &str, mode: OpenMode) -> Option<Self::Handle>;

    /// Read from the handle's current position
    ///
    /// Returns the number of bytes read; `0` means end of blob.
    fn read(&mut self, handle: &mut Self::Handle, buf: &mut [u8])
        -> Result<usize, StorageError>;

    /// Append data at the handle's current position
    fn write(&mut self, handle: &mut Self::Handle, data: &[u8]) -> Result<usize, StorageError>;

    /// Close the handle, committing any written data
    fn close(&mut self, handle: Self::Handle);

    /// Remove a blob, returning whether it existed
    fn remove(&mut self, name: &str) -> bool;

    /// Visit every blob as `(name, size in bytes)`, in name order
    fn list(&mut self, visit: &mut dyn FnMut(&str, usize));

    /// Check if a blob exists
    fn exists(&mut self, name: &str) -> bool {
        match self.open(name, OpenMode::Read) {
            Some(handle) => {
                self.close(handle);
                true
            }
            None => false,
        }
    }
}
