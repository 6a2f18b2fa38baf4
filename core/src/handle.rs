//! Open-file state shared between descriptors.

use crate::dir::VfsDirEntry;
use crate::flags::OpenFlags;
use crate::{VfsError, VfsErrorKind, VfsResult, Vnode};
use parking_lot::Mutex;
use std::io::SeekFrom;
use std::sync::atomic::{AtomicU64, Ordering};

/// One opened instance of a vnode: the node reference, the cursor, and the
/// access mode recorded at open time.
///
/// `OpenFile` is shared as `Arc<OpenFile>`; `dup`/`dup2` clone the handle so
/// several descriptors move one cursor. The vnode reference it owns is
/// released when the last handle drops. The cursor is advanced only by the
/// byte count an operation actually transferred, never by an error result.
pub struct OpenFile {
    node: Vnode,
    flags: OpenFlags,
    pos: AtomicU64,
    io_lock: Mutex<()>,
}

impl OpenFile {
    pub fn new(node: Vnode, flags: OpenFlags) -> Self {
        Self {
            node,
            flags,
            pos: AtomicU64::new(0),
            io_lock: Mutex::new(()),
        }
    }

    pub fn node(&self) -> &Vnode {
        &self.node
    }

    pub fn flags(&self) -> OpenFlags {
        self.flags
    }

    pub fn can_read(&self) -> bool {
        self.flags.readable()
    }

    pub fn can_write(&self) -> bool {
        self.flags.writable()
    }

    /// Current cursor position.
    pub fn tell(&self) -> u64 {
        self.pos.load(Ordering::Acquire)
    }

    pub fn read(&self, buf: &mut [u8]) -> VfsResult<usize> {
        if self.node.file_type().is_dir() {
            return Err(VfsError::new(VfsErrorKind::IsDir, "open_file.read"));
        }

        let _guard = self.io_lock.lock();
        let offset = self.pos.load(Ordering::Acquire);
        let read = self.node.read_at(offset, buf)?;
        self.pos
            .store(offset.saturating_add(read as u64), Ordering::Release);
        Ok(read)
    }

    pub fn write(&self, buf: &[u8]) -> VfsResult<usize> {
        let _guard = self.io_lock.lock();
        // Append mode repositions to end-of-file before each write.
        let offset = if self.flags.contains(OpenFlags::APPEND) {
            self.node.len()
        } else {
            self.pos.load(Ordering::Acquire)
        };
        let written = self.node.write_at(offset, buf)?;
        self.pos
            .store(offset.saturating_add(written as u64), Ordering::Release);
        Ok(written)
    }

    /// Reposition the cursor. Any whence/offset combination that would land
    /// below zero fails with `InvalidInput` and leaves the cursor unchanged.
    pub fn seek(&self, pos: SeekFrom) -> VfsResult<u64> {
        let _guard = self.io_lock.lock();
        let current = self.pos.load(Ordering::Acquire);
        let new = match pos {
            SeekFrom::Start(offset) => offset,
            SeekFrom::Current(delta) => apply_delta(current, delta, "open_file.seek.cur")?,
            SeekFrom::End(delta) => apply_delta(self.node.len(), delta, "open_file.seek.end")?,
        };
        self.pos.store(new, Ordering::Release);
        Ok(new)
    }

    /// Yield the next directory entry, advancing the cursor to the position
    /// the backend reports. The cursor unit is backend-defined here, not a
    /// byte count.
    pub fn readdir_next(&self) -> VfsResult<Option<VfsDirEntry>> {
        let _guard = self.io_lock.lock();
        let offset = self.pos.load(Ordering::Acquire);
        match self.node.readdir(offset)? {
            Some(next) => {
                self.pos.store(next.next_pos, Ordering::Release);
                Ok(Some(next.entry))
            }
            None => Ok(None),
        }
    }
}

fn apply_delta(basis: u64, delta: i64, context: &'static str) -> VfsResult<u64> {
    if delta >= 0 {
        Ok(basis.saturating_add(delta as u64))
    } else {
        basis
            .checked_sub(delta.unsigned_abs())
            .ok_or_else(|| VfsError::new(VfsErrorKind::InvalidInput, context))
    }
}
