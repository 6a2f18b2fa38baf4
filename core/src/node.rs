//! Vnode interfaces.
//!
//! [`FsNode`] is the backend-facing capability table: one implementation per
//! concrete file-system node kind. The VFS layer never stores backend state
//! of its own; it holds nodes only through the shared [`Vnode`] handle.
//!
//! # Reference protocol
//!
//! A `Vnode` is `Arc<dyn FsNode>`: cloning the handle acquires a reference,
//! dropping it releases one, and the backend node is reclaimed when the last
//! holder drops. Every function in this crate that returns a `Vnode` returns
//! an owned reference; borrowed access is expressed as `&Vnode`. Ownership
//! transfer is therefore visible in signatures, not in comments.

use crate::dir::ReadDirEntry;
use crate::{VfsError, VfsErrorKind, VfsResult};
use std::any::Any;
use std::sync::Arc;

/// Shared handle to one file-system node.
pub type Vnode = Arc<dyn FsNode>;

/// Node type classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VfsFileType {
    RegularFile,
    Directory,
    CharDevice,
    BlockDevice,
}

impl VfsFileType {
    #[inline]
    pub fn is_dir(self) -> bool {
        matches!(self, VfsFileType::Directory)
    }

    #[inline]
    pub fn is_device(self) -> bool {
        matches!(self, VfsFileType::CharDevice | VfsFileType::BlockDevice)
    }
}

/// Identifier of the device a special file represents.
///
/// Packs an 8-bit minor number below the major number, so raw values
/// round-trip through the syscall surface unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct DeviceId(pub u32);

impl DeviceId {
    pub fn new(major: u32, minor: u32) -> Self {
        Self((major << 8) | (minor & 0xff))
    }

    pub fn major(self) -> u32 {
        self.0 >> 8
    }

    pub fn minor(self) -> u32 {
        self.0 & 0xff
    }
}

/// Node metadata as reported by the `stat` capability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VfsStat {
    pub ino: u64,
    pub file_type: VfsFileType,
    pub size: u64,
    pub nlink: u32,
    /// Device identity for special files, `None` otherwise.
    pub rdev: Option<DeviceId>,
}

pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T> AsAny for T
where
    T: Any,
{
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Capability table of one file-system node.
///
/// `ino`, `file_type`, `len` and `stat` are mandatory. Every other operation
/// is optional: the default body reports [`VfsErrorKind::NotSupported`], which
/// is how a backend declares "this node kind does not do that". The VFS layer
/// relies on that typed answer instead of probing for null entries.
pub trait FsNode: AsAny + Send + Sync + core::fmt::Debug + 'static {
    /// Backend-stable identity of this node.
    fn ino(&self) -> u64;

    fn file_type(&self) -> VfsFileType;

    /// Length in bytes for regular files; backends may report 0 for others.
    fn len(&self) -> u64;

    fn stat(&self) -> VfsResult<VfsStat>;

    /// Resolve one child name in this directory.
    ///
    /// The walker has already handled `"."` and the empty name; backends see
    /// `".."` and ordinary names only. Returns an owned reference on success.
    fn lookup(&self, _name: &str) -> VfsResult<Vnode> {
        Err(VfsError::new(VfsErrorKind::NotSupported, "fs_node.lookup"))
    }

    /// Create a regular file entry. Called with the namespace create lock held.
    fn create(&self, _name: &str) -> VfsResult<Vnode> {
        Err(VfsError::new(VfsErrorKind::NotSupported, "fs_node.create"))
    }

    /// Create a device special file entry.
    fn mknod(&self, _name: &str, _kind: VfsFileType, _dev: DeviceId) -> VfsResult<Vnode> {
        Err(VfsError::new(VfsErrorKind::NotSupported, "fs_node.mknod"))
    }

    fn mkdir(&self, _name: &str) -> VfsResult<Vnode> {
        Err(VfsError::new(VfsErrorKind::NotSupported, "fs_node.mkdir"))
    }

    /// Remove an empty child directory.
    fn rmdir(&self, _name: &str) -> VfsResult<()> {
        Err(VfsError::new(VfsErrorKind::NotSupported, "fs_node.rmdir"))
    }

    /// Remove a non-directory entry.
    fn unlink(&self, _name: &str) -> VfsResult<()> {
        Err(VfsError::new(VfsErrorKind::NotSupported, "fs_node.unlink"))
    }

    /// Enter `existing` into this directory under `name` (hard link).
    fn link(&self, _existing: &Vnode, _name: &str) -> VfsResult<()> {
        Err(VfsError::new(VfsErrorKind::NotSupported, "fs_node.link"))
    }

    /// Yield the directory entry at the opaque position `pos`, or `None` at
    /// the end of the directory. The returned `next_pos` is backend-defined
    /// and must only be fed back into this method.
    fn readdir(&self, _pos: u64) -> VfsResult<Option<ReadDirEntry>> {
        Err(VfsError::new(VfsErrorKind::NotSupported, "fs_node.readdir"))
    }

    fn read_at(&self, _offset: u64, _buf: &mut [u8]) -> VfsResult<usize> {
        Err(VfsError::new(VfsErrorKind::NotSupported, "fs_node.read"))
    }

    fn write_at(&self, _offset: u64, _buf: &[u8]) -> VfsResult<usize> {
        Err(VfsError::new(VfsErrorKind::NotSupported, "fs_node.write"))
    }
}
