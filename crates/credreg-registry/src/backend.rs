//! # Box Store — Keyed Byte Storage Substrate
//!
//! The registry keeps each record as an opaque, fixed-size byte box under
//! its credential identifier. [`BoxStore`] is the seam between the registry
//! logic and whatever holds those boxes; [`MemoryBoxStore`] is the
//! in-process implementation.
//!
//! ## Guarantees an implementation must give
//!
//! - `create` is insert-if-absent: of two concurrent creates on one key,
//!   exactly one succeeds. The box becomes visible fully written.
//! - A box's size is fixed at creation. `replace` writes inside it and
//!   never grows or shrinks it.
//! - A reader never observes a box mid-write.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

/// Failure reported by a [`BoxStore`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoxError {
    /// `create` on a key that already holds a box.
    #[error("box already exists")]
    Exists,

    /// The key holds no box.
    #[error("box not found")]
    Missing,

    /// Contents handed to `create` do not match the declared size.
    #[error("declared box size {declared} does not match contents length {actual}")]
    SizeMismatch {
        /// Size the caller allocated.
        declared: usize,
        /// Length of the contents supplied.
        actual: usize,
    },

    /// A `replace` would write past the end of the box.
    #[error("write of {len} bytes at offset {offset} exceeds box size {size}")]
    OutOfBounds {
        /// Start of the write.
        offset: usize,
        /// Length of the write.
        len: usize,
        /// Size of the box.
        size: usize,
    },
}

/// Keyed storage of fixed-size byte boxes.
pub trait BoxStore: Send + Sync {
    /// Allocate a box of exactly `size` bytes under `key`, filled with
    /// `contents`. Fails if the key exists or the sizes disagree.
    fn create(&self, key: &[u8], size: usize, contents: &[u8]) -> Result<(), BoxError>;

    /// Overwrite `bytes.len()` bytes of the box at `offset`, returning the
    /// bytes that were there before.
    fn replace(&self, key: &[u8], offset: usize, bytes: &[u8]) -> Result<Vec<u8>, BoxError>;

    /// Copy out the whole box.
    fn read(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Size of the box, if present.
    fn size(&self, key: &[u8]) -> Option<usize>;

    /// Whether `key` holds a box.
    fn contains(&self, key: &[u8]) -> bool {
        self.size(key).is_some()
    }

    /// Number of boxes held.
    fn len(&self) -> usize;

    /// Whether the store holds no boxes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Thread-safe, cloneable in-memory box store.
///
/// One `parking_lot::RwLock` guards the whole map: every write is
/// serialized against every other operation, so creates are atomic and
/// reads never tear.
#[derive(Debug, Default)]
pub struct MemoryBoxStore {
    boxes: Arc<RwLock<HashMap<Vec<u8>, Box<[u8]>>>>,
}

impl Clone for MemoryBoxStore {
    fn clone(&self) -> Self {
        Self {
            boxes: Arc::clone(&self.boxes),
        }
    }
}

impl MemoryBoxStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BoxStore for MemoryBoxStore {
    fn create(&self, key: &[u8], size: usize, contents: &[u8]) -> Result<(), BoxError> {
        if contents.len() != size {
            return Err(BoxError::SizeMismatch {
                declared: size,
                actual: contents.len(),
            });
        }
        let mut guard = self.boxes.write();
        if guard.contains_key(key) {
            return Err(BoxError::Exists);
        }
        guard.insert(key.to_vec(), contents.into());
        Ok(())
    }

    fn replace(&self, key: &[u8], offset: usize, bytes: &[u8]) -> Result<Vec<u8>, BoxError> {
        let mut guard = self.boxes.write();
        let slot = guard.get_mut(key).ok_or(BoxError::Missing)?;
        let size = slot.len();
        let end = offset
            .checked_add(bytes.len())
            .filter(|end| *end <= size)
            .ok_or(BoxError::OutOfBounds {
                offset,
                len: bytes.len(),
                size,
            })?;
        let previous = slot[offset..end].to_vec();
        slot[offset..end].copy_from_slice(bytes);
        Ok(previous)
    }

    fn read(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.boxes.read().get(key).map(|b| b.to_vec())
    }

    fn size(&self, key: &[u8]) -> Option<usize> {
        self.boxes.read().get(key).map(|b| b.len())
    }

    fn len(&self) -> usize {
        self.boxes.read().len()
    }
}
