//! Per-process descriptor table.

use crate::handle::OpenFile;
use crate::{VfsError, VfsErrorKind, VfsResult};
use std::sync::Arc;

/// Small integer handle naming an open file within one process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Fd(pub i32);

impl Fd {
    pub fn raw(self) -> i32 {
        self.0
    }
}

impl From<i32> for Fd {
    fn from(raw: i32) -> Self {
        Fd(raw)
    }
}

/// Fixed-capacity mapping from descriptors to open files.
///
/// A slot holds either nothing or exactly one `Arc<OpenFile>` reference, so
/// the table owns one reference per occupied slot and releases it when the
/// slot is cleared. Valid descriptors are `0 <= fd < capacity`; every entry
/// point applies that one convention.
pub struct FdTable {
    slots: Box<[Option<Arc<OpenFile>>]>,
}

impl FdTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn open_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    fn index(&self, fd: Fd) -> VfsResult<usize> {
        let raw = fd.raw();
        if raw < 0 || raw as usize >= self.slots.len() {
            return Err(VfsError::new(
                VfsErrorKind::BadDescriptor,
                "fd_table.range",
            ));
        }
        Ok(raw as usize)
    }

    /// Shared reference to the open file behind `fd`.
    pub fn get(&self, fd: Fd) -> VfsResult<Arc<OpenFile>> {
        let index = self.index(fd)?;
        self.slots[index]
            .clone()
            .ok_or_else(|| VfsError::new(VfsErrorKind::BadDescriptor, "fd_table.unused"))
    }

    /// Place `file` in the lowest free slot.
    pub fn insert_lowest(&mut self, file: Arc<OpenFile>) -> VfsResult<Fd> {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(file);
                return Ok(Fd(index as i32));
            }
        }
        Err(VfsError::new(
            VfsErrorKind::TooManyOpenFiles,
            "fd_table.full",
        ))
    }

    /// Clear the slot, returning the reference it held.
    pub fn remove(&mut self, fd: Fd) -> VfsResult<Arc<OpenFile>> {
        let index = self.index(fd)?;
        self.slots[index]
            .take()
            .ok_or_else(|| VfsError::new(VfsErrorKind::BadDescriptor, "fd_table.unused"))
    }

    /// Make `fd` reference `file`, returning the reference previously in the
    /// slot (if any) so the caller controls when it is released.
    pub fn replace(&mut self, fd: Fd, file: Arc<OpenFile>) -> VfsResult<Option<Arc<OpenFile>>> {
        let index = self.index(fd)?;
        Ok(self.slots[index].replace(file))
    }
}
