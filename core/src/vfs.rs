//! Syscall-level operations.
//!
//! Each method validates its inputs, drives the walker and the descriptor
//! table, checks the type constraints its operation demands, and delegates
//! the actual mutation to the relevant node's capability. References picked
//! up along the way are owned `Vnode`/`Arc<OpenFile>` values, so every exit
//! path (error returns included) releases them on drop.

use crate::context::{VfsConfig, VfsContext};
use crate::dir::VfsDirEntry;
use crate::fd_table::Fd;
use crate::flags::OpenFlags;
use crate::handle::OpenFile;
use crate::path_walker::{PathWalker, WalkBase};
use crate::{DeviceId, VfsError, VfsErrorKind, VfsFileType, VfsResult, VfsStat, Vnode};
use std::io::SeekFrom;
use std::sync::Arc;

pub struct Vfs {
    walker: PathWalker,
    config: Arc<VfsConfig>,
}

impl Vfs {
    /// Build a VFS over the given root directory with default limits.
    pub fn new(root: Vnode) -> Self {
        Self::with_config(root, VfsConfig::default())
    }

    pub fn with_config(root: Vnode, config: VfsConfig) -> Self {
        let config = Arc::new(config);
        Self {
            walker: PathWalker::new(root, config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &Arc<VfsConfig> {
        &self.config
    }

    pub fn root(&self) -> &Vnode {
        self.walker.root()
    }

    pub fn walker(&self) -> &PathWalker {
        &self.walker
    }

    /// Fresh process context rooted at this VFS's root directory.
    pub fn new_context(&self) -> VfsContext {
        VfsContext::new(self.root().clone(), &self.config)
    }

    /// Open `path`, returning the lowest free descriptor.
    pub fn open(&self, ctx: &VfsContext, path: &str, flags: OpenFlags) -> VfsResult<Fd> {
        if !flags.intersects(OpenFlags::READ | OpenFlags::WRITE) {
            return Err(VfsError::new(VfsErrorKind::InvalidInput, "vfs.open.access"));
        }

        let create = flags.contains(OpenFlags::CREATE);
        let exclusive = create && flags.contains(OpenFlags::EXCL);
        let node = self
            .walker
            .resolve_or_create(ctx, WalkBase::Cwd, path, create, exclusive)?;

        if node.file_type().is_dir() && flags.writable() {
            return Err(VfsError::new(VfsErrorKind::IsDir, "vfs.open.dir_write"));
        }

        let file = Arc::new(OpenFile::new(node, flags));
        let fd = ctx.files().insert_lowest(file)?;
        tracing::trace!(path, fd = fd.raw(), "open");
        Ok(fd)
    }

    /// Read from the descriptor's cursor, advancing it by the bytes read.
    pub fn read(&self, ctx: &VfsContext, fd: Fd, buf: &mut [u8]) -> VfsResult<usize> {
        let file = ctx.file(fd)?;
        if !file.can_read() {
            return Err(VfsError::new(VfsErrorKind::BadDescriptor, "vfs.read.mode"));
        }
        file.read(buf)
    }

    /// Write at the descriptor's cursor (end-of-file first in append mode).
    pub fn write(&self, ctx: &VfsContext, fd: Fd, buf: &[u8]) -> VfsResult<usize> {
        let file = ctx.file(fd)?;
        if !file.can_write() {
            return Err(VfsError::new(VfsErrorKind::BadDescriptor, "vfs.write.mode"));
        }
        file.write(buf)
    }

    /// Release the descriptor: exactly one net release of the open file.
    pub fn close(&self, ctx: &VfsContext, fd: Fd) -> VfsResult<()> {
        let file = ctx.files().remove(fd)?;
        tracing::trace!(fd = fd.raw(), "close");
        drop(file);
        Ok(())
    }

    /// Duplicate `fd` into the lowest free slot.
    pub fn dup(&self, ctx: &VfsContext, fd: Fd) -> VfsResult<Fd> {
        let mut files = ctx.files();
        let file = files.get(fd)?;
        // insert_lowest drops the extra reference if the table is full.
        files.insert_lowest(file)
    }

    /// Duplicate `old` onto `new`, closing `new` first if it is occupied.
    /// `dup2(fd, fd)` is a no-op returning `fd`.
    pub fn dup2(&self, ctx: &VfsContext, old: Fd, new: Fd) -> VfsResult<Fd> {
        let mut files = ctx.files();
        let file = files.get(old)?;
        if old == new {
            return Ok(new);
        }
        let closed = files.replace(new, file)?;
        drop(files);
        drop(closed);
        Ok(new)
    }

    /// Reposition the descriptor's cursor.
    pub fn lseek(&self, ctx: &VfsContext, fd: Fd, pos: SeekFrom) -> VfsResult<u64> {
        let file = ctx.file(fd)?;
        file.seek(pos)
    }

    /// Yield the next directory entry of `fd`, or `None` at end of directory.
    pub fn getdent(&self, ctx: &VfsContext, fd: Fd) -> VfsResult<Option<VfsDirEntry>> {
        let file = ctx.file(fd)?;
        if !file.node().file_type().is_dir() {
            return Err(VfsError::new(VfsErrorKind::NotDir, "vfs.getdent.not_dir"));
        }
        file.readdir_next()
    }

    /// Create a device special file. Only the two device kinds are accepted.
    pub fn mknod(
        &self,
        ctx: &VfsContext,
        path: &str,
        kind: VfsFileType,
        dev: DeviceId,
    ) -> VfsResult<()> {
        if !kind.is_device() {
            return Err(VfsError::new(VfsErrorKind::InvalidInput, "vfs.mknod.kind"));
        }
        let parent = self.walker.resolve_parent(ctx, WalkBase::Cwd, path)?;
        match self.walker.lookup_child(&parent.dir, parent.name) {
            Ok(_existing) => Err(VfsError::new(
                VfsErrorKind::AlreadyExists,
                "vfs.mknod.exists",
            )),
            Err(err) if err.kind() == VfsErrorKind::NotFound => {
                tracing::debug!(path, ?kind, dev = dev.0, "mknod");
                parent.dir.mknod(parent.name, kind, dev).map(drop)
            }
            Err(err) => Err(err),
        }
    }

    pub fn mkdir(&self, ctx: &VfsContext, path: &str) -> VfsResult<()> {
        let parent = self.walker.resolve_parent(ctx, WalkBase::Cwd, path)?;
        match self.walker.lookup_child(&parent.dir, parent.name) {
            Ok(_existing) => Err(VfsError::new(
                VfsErrorKind::AlreadyExists,
                "vfs.mkdir.exists",
            )),
            Err(err) if err.kind() == VfsErrorKind::NotFound => {
                tracing::debug!(path, "mkdir");
                parent.dir.mkdir(parent.name).map(drop)
            }
            Err(err) => Err(err),
        }
    }

    /// Remove an empty directory. `"."` and `".."` are rejected as the final
    /// component with distinct errors; emptiness is the backend's check.
    pub fn rmdir(&self, ctx: &VfsContext, path: &str) -> VfsResult<()> {
        let parent = self.walker.resolve_parent(ctx, WalkBase::Cwd, path)?;
        match parent.name {
            "." => {
                return Err(VfsError::new(VfsErrorKind::InvalidInput, "vfs.rmdir.dot"));
            }
            ".." => {
                return Err(VfsError::new(
                    VfsErrorKind::DirNotEmpty,
                    "vfs.rmdir.dotdot",
                ));
            }
            _ => {}
        }
        tracing::debug!(path, "rmdir");
        parent.dir.rmdir(parent.name)
    }

    /// Remove a non-directory entry; directories fail with `NotPermitted`.
    pub fn unlink(&self, ctx: &VfsContext, path: &str) -> VfsResult<()> {
        let parent = self.walker.resolve_parent(ctx, WalkBase::Cwd, path)?;
        let node = self.walker.lookup_child(&parent.dir, parent.name)?;
        if node.file_type().is_dir() {
            return Err(VfsError::new(
                VfsErrorKind::NotPermitted,
                "vfs.unlink.is_dir",
            ));
        }
        tracing::debug!(path, "unlink");
        parent.dir.unlink(parent.name)
    }

    /// Enter the node at `from` under the (absent) name `to`.
    pub fn link(&self, ctx: &VfsContext, from: &str, to: &str) -> VfsResult<()> {
        let source = self.walker.resolve(ctx, WalkBase::Cwd, from)?;
        let parent = self.walker.resolve_parent(ctx, WalkBase::Cwd, to)?;
        match self.walker.lookup_child(&parent.dir, parent.name) {
            Ok(_existing) => Err(VfsError::new(
                VfsErrorKind::AlreadyExists,
                "vfs.link.exists",
            )),
            Err(err) if err.kind() == VfsErrorKind::NotFound => {
                tracing::debug!(from, to, "link");
                parent.dir.link(&source, parent.name)
            }
            Err(err) => Err(err),
        }
    }

    /// Rename by linking `new` to the node behind `old`, then removing `old`.
    ///
    /// If the link step fails, `old` is untouched. The two steps are not
    /// atomic: an interruption between them leaves both names linked. That
    /// matches the documented semantics of this operation, not an oversight.
    pub fn rename(&self, ctx: &VfsContext, old: &str, new: &str) -> VfsResult<()> {
        self.link(ctx, old, new)?;
        let node = self.walker.resolve(ctx, WalkBase::Cwd, old)?;
        if node.file_type().is_dir() {
            self.rmdir(ctx, old)
        } else {
            self.unlink(ctx, old)
        }
    }

    /// Make `path` the context's working directory.
    pub fn chdir(&self, ctx: &VfsContext, path: &str) -> VfsResult<()> {
        let node = self.walker.resolve(ctx, WalkBase::Cwd, path)?;
        if !node.file_type().is_dir() {
            return Err(VfsError::new(VfsErrorKind::NotDir, "vfs.chdir.not_dir"));
        }
        tracing::debug!(path, "chdir");
        ctx.set_cwd(node);
        Ok(())
    }

    /// Resolve `path` and report the node's metadata.
    pub fn stat(&self, ctx: &VfsContext, path: &str) -> VfsResult<VfsStat> {
        let node = self.walker.resolve(ctx, WalkBase::Cwd, path)?;
        node.stat()
    }
}
