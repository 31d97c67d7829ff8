//! Blob store helpers and an in-memory store
//!
//! [`MemoryStore`] backs host builds and tests. On hardware the board
//! layer supplies a flash-backed [`BlobStore`].

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use chameleon_hal::storage::{BlobStore, OpenMode, MAX_NAME_LEN};
use chameleon_hal::StorageError;

const CHUNK_SIZE: usize = 128;

/// Read a whole blob
///
/// Returns `Ok(None)` if the blob does not exist.
pub fn read_blob<S: BlobStore>(
    store: &mut S,
    name: &str,
) -> Result<Option<Vec<u8>>, StorageError> {
    let Some(mut handle) = store.open(name, OpenMode::Read) else {
        return Ok(None);
    };

    let mut data = Vec::new();
    let mut chunk = [0u8; CHUNK_SIZE];
    let result = loop {
        match store.read(&mut handle, &mut chunk) {
            Ok(0) => break Ok(()),
            Ok(n) => data.extend_from_slice(&chunk[..n]),
            Err(e) => break Err(e),
        }
    };
    store.close(handle);

    result.map(|()| Some(data))
}

/// Create or replace a blob with `data`
///
/// A write that fails part way removes the blob rather than leave a
/// truncated copy behind.
pub fn write_blob<S: BlobStore>(
    store: &mut S,
    name: &str,
    data: &[u8],
) -> Result<(), StorageError> {
    if name.len() > MAX_NAME_LEN {
        return Err(StorageError::NameTooLong);
    }
    let mut handle = store.open(name, OpenMode::Write).ok_or(StorageError::Io)?;

    let mut written = 0;
    let result = loop {
        if written == data.len() {
            break Ok(());
        }
        match store.write(&mut handle, &data[written..]) {
            Ok(0) => break Err(StorageError::Full),
            Ok(n) => written += n,
            Err(e) => break Err(e),
        }
    };
    store.close(handle);

    if result.is_err() {
        store.remove(name);
    }
    result
}

/// Open handle into a [`MemoryStore`]
#[derive(Debug)]
pub struct MemoryHandle {
    name: String,
    mode: OpenMode,
    position: usize,
    pending: Vec<u8>,
}

/// Heap-backed blob store
///
/// Written data is buffered in the handle and committed on close.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    blobs: BTreeMap<String, Vec<u8>>,
    capacity: Option<usize>,
}

impl MemoryStore {
    /// Create an empty store with no size limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store holding at most `bytes` of blob data
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            blobs: BTreeMap::new(),
            capacity: Some(bytes),
        }
    }

    /// Insert a blob directly
    pub fn insert(&mut self, name: &str, data: &[u8]) {
        self.blobs.insert(String::from(name), Vec::from(data));
    }

    /// Borrow a blob's contents
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.blobs.get(name).map(Vec::as_slice)
    }

    fn used_excluding(&self, name: &str) -> usize {
        self.blobs
            .iter()
            .filter(|(k, _)| k.as_str() != name)
            .map(|(_, v)| v.len())
            .sum()
    }
}

impl BlobStore for MemoryStore {
    type Handle = MemoryHandle;

    fn open(&mut self, name: &str, mode: OpenMode) -> Option<MemoryHandle> {
        if name.len() > MAX_NAME_LEN {
            return None;
        }
        if mode == OpenMode::Read && !self.blobs.contains_key(name) {
            return None;
        }
        Some(MemoryHandle {
            name: String::from(name),
            mode,
            position: 0,
            pending: Vec::new(),
        })
    }

    fn read(&mut self, handle: &mut MemoryHandle, buf: &mut [u8]) -> Result<usize, StorageError> {
        if handle.mode != OpenMode::Read {
            return Err(StorageError::WrongMode);
        }
        let data = self.blobs.get(&handle.name).ok_or(StorageError::NotFound)?;
        let remaining = data.get(handle.position..).unwrap_or(&[]);
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        handle.position += n;
        Ok(n)
    }

    fn write(&mut self, handle: &mut MemoryHandle, data: &[u8]) -> Result<usize, StorageError> {
        if handle.mode != OpenMode::Write {
            return Err(StorageError::WrongMode);
        }
        let n = match self.capacity {
            Some(capacity) => {
                let used = self.used_excluding(&handle.name) + handle.pending.len();
                data.len().min(capacity.saturating_sub(used))
            }
            None => data.len(),
        };
        handle.pending.extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn close(&mut self, handle: MemoryHandle) {
        if handle.mode == OpenMode::Write {
            self.blobs.insert(handle.name, handle.pending);
        }
    }

    fn remove(&mut self, name: &str) -> bool {
        self.blobs.remove(name).is_some()
    }

    fn list(&mut self, visit: &mut dyn FnMut(&str, usize)) {
        for (name, data) in &self.blobs {
            visit(name.as_str(), data.len());
        }
    }
}
