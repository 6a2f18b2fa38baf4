//! Inode number allocation.

use std::sync::atomic::{AtomicU64, Ordering};
use vnix_core::{VfsError, VfsErrorKind, VfsResult};

const ROOT_INO: u64 = 1;

/// Monotonic inode counter with an optional total-node quota. Numbers are
/// never reused, so a freed node's identity stays dead.
pub(crate) struct InoAlloc {
    next: AtomicU64,
    max_inodes: Option<u64>,
}

impl InoAlloc {
    pub(crate) fn new(max_inodes: Option<u64>) -> Self {
        Self {
            next: AtomicU64::new(ROOT_INO + 1),
            max_inodes,
        }
    }

    pub(crate) fn root_ino(&self) -> u64 {
        ROOT_INO
    }

    pub(crate) fn allocate(&self) -> VfsResult<u64> {
        let ino = self.next.fetch_add(1, Ordering::Relaxed);
        if let Some(max) = self.max_inodes {
            if ino > max {
                return Err(VfsError::new(VfsErrorKind::NoSpace, "mem.alloc.ino"));
            }
        }
        Ok(ino)
    }
}
