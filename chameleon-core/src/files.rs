//! File-manager endpoints
//!
//! Request handlers behind the web UI's file manager and hardware test
//! page. The HTTP layer maps routes onto these and sends back the JSON.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use chameleon_hal::storage::BlobStore;
use chameleon_hal::StorageError;
use log::info;
use serde::Serialize;

use crate::storage::write_blob;

#[derive(Serialize)]
struct FileEntry {
    name: String,
    size: usize,
}

/// Result of the ADC test hook, `{"value": n}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcProbe {
    /// Raw ADC count
    pub value: u16,
}

impl AdcProbe {
    /// Encode as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

/// List every blob as `[{"name":"/config.json","size":123},...]`
pub fn listing_json<S: BlobStore>(store: &mut S) -> String {
    let mut entries = Vec::new();
    store.list(&mut |name, size| {
        entries.push(FileEntry {
            name: String::from(name),
            size,
        })
    });
    serde_json::to_string(&entries).unwrap_or_else(|_| String::from("[]"))
}

/// Delete a blob, returning whether it existed
pub fn delete<S: BlobStore>(store: &mut S, name: &str) -> bool {
    store.remove(name)
}

/// Store an uploaded file
///
/// Browsers send bare file names; blobs always live under `/`.
pub fn upload<S: BlobStore>(
    store: &mut S,
    filename: &str,
    data: &[u8],
) -> Result<(), StorageError> {
    let path = normalize_path(filename);
    info!("Upload: {} ({} bytes)", path.as_str(), data.len());
    write_blob(store, &path, data)
}

/// Prefix `name` with `/` unless it already has one
pub fn normalize_path(name: &str) -> String {
    if name.starts_with('/') {
        String::from(name)
    } else {
        format!("/{}", name)
    }
}
