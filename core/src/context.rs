//! Per-process state: configuration, working directory, descriptor table.

use crate::fd_table::{Fd, FdTable};
use crate::handle::OpenFile;
use crate::{VfsResult, Vnode};
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::sync::Arc;

/// Namespace limits and table sizing.
#[derive(Clone, Debug)]
pub struct VfsConfig {
    /// Maximum length of a whole path, in bytes.
    pub max_path_len: usize,
    /// Maximum length of a single component, in bytes.
    pub max_name_len: usize,
    /// Capacity of each process's descriptor table.
    pub max_open_files: usize,
}

impl Default for VfsConfig {
    fn default() -> Self {
        Self {
            max_path_len: 4096,
            max_name_len: 255,
            max_open_files: 32,
        }
    }
}

/// The process-side state the syscall layer reads and mutates: one working
/// directory reference and one descriptor table.
///
/// Any number of threads may drive one context concurrently; both fields sit
/// behind their own locks. Teardown is `Drop`: releasing the context releases
/// the cwd reference and every occupied table slot.
pub struct VfsContext {
    cwd: RwLock<Vnode>,
    files: Mutex<FdTable>,
}

impl VfsContext {
    pub fn new(cwd: Vnode, config: &VfsConfig) -> Self {
        Self {
            cwd: RwLock::new(cwd),
            files: Mutex::new(FdTable::with_capacity(config.max_open_files)),
        }
    }

    /// Owned reference to the current working directory.
    pub fn cwd(&self) -> Vnode {
        self.cwd.read().clone()
    }

    /// Swap the working directory; the old reference drops here.
    pub(crate) fn set_cwd(&self, new: Vnode) {
        *self.cwd.write() = new;
    }

    /// Owned reference to the open file behind `fd`.
    pub fn file(&self, fd: Fd) -> VfsResult<Arc<OpenFile>> {
        self.files.lock().get(fd)
    }

    /// Number of occupied descriptor slots.
    pub fn open_count(&self) -> usize {
        self.files.lock().open_count()
    }

    pub(crate) fn files(&self) -> MutexGuard<'_, FdTable> {
        self.files.lock()
    }
}
