//! Directory entry types.

use crate::VfsFileType;

/// One directory entry as produced by a node's `readdir` capability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VfsDirEntry {
    pub ino: u64,
    pub file_type: VfsFileType,
    pub name: String,
}

/// A directory entry together with the cursor position of its successor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadDirEntry {
    pub entry: VfsDirEntry,
    /// Opaque position to resume iteration from; only meaningful to the
    /// backend that produced it.
    pub next_pos: u64,
}
