//! In-memory node implementation.

use crate::alloc::InoAlloc;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Weak};
use vnix_core::dir::{ReadDirEntry, VfsDirEntry};
use vnix_core::{
    AsAny, DeviceId, FsNode, VfsError, VfsErrorKind, VfsFileType, VfsResult, VfsStat, Vnode,
};

pub(crate) fn as_vnode(node: Arc<MemNode>) -> Vnode {
    node
}

/// One node of the in-memory tree.
pub struct MemNode {
    ino: u64,
    nlink: AtomicU32,
    /// Needed so `link` can hand out an owning reference to an existing node
    /// it only sees by shared borrow.
    self_ref: Weak<MemNode>,
    alloc: Arc<InoAlloc>,
    kind: MemNodeKind,
}

enum MemNodeKind {
    Dir(Mutex<MemDir>),
    File(Mutex<Vec<u8>>),
    Device { kind: VfsFileType, dev: DeviceId },
}

struct MemDir {
    parent: Weak<MemNode>,
    entries: BTreeMap<String, Arc<MemNode>>,
}

impl MemNode {
    fn with_kind(ino: u64, nlink: u32, alloc: Arc<InoAlloc>, kind: MemNodeKind) -> Arc<MemNode> {
        Arc::new_cyclic(|self_ref| MemNode {
            ino,
            nlink: AtomicU32::new(nlink),
            self_ref: self_ref.clone(),
            alloc,
            kind,
        })
    }

    /// The root directory. Its `".."` resolves to itself.
    pub(crate) fn root(alloc: Arc<InoAlloc>) -> Arc<MemNode> {
        let ino = alloc.root_ino();
        Self::with_kind(
            ino,
            2,
            alloc,
            MemNodeKind::Dir(Mutex::new(MemDir {
                parent: Weak::new(),
                entries: BTreeMap::new(),
            })),
        )
    }

    fn new_dir(alloc: Arc<InoAlloc>, parent: Weak<MemNode>) -> VfsResult<Arc<MemNode>> {
        let ino = alloc.allocate()?;
        Ok(Self::with_kind(
            ino,
            2,
            alloc,
            MemNodeKind::Dir(Mutex::new(MemDir {
                parent,
                entries: BTreeMap::new(),
            })),
        ))
    }

    fn new_file(alloc: Arc<InoAlloc>) -> VfsResult<Arc<MemNode>> {
        let ino = alloc.allocate()?;
        Ok(Self::with_kind(
            ino,
            1,
            alloc,
            MemNodeKind::File(Mutex::new(Vec::new())),
        ))
    }

    fn new_device(
        alloc: Arc<InoAlloc>,
        kind: VfsFileType,
        dev: DeviceId,
    ) -> VfsResult<Arc<MemNode>> {
        let ino = alloc.allocate()?;
        Ok(Self::with_kind(ino, 1, alloc, MemNodeKind::Device { kind, dev }))
    }

    fn dir(&self) -> VfsResult<&Mutex<MemDir>> {
        match &self.kind {
            MemNodeKind::Dir(dir) => Ok(dir),
            _ => Err(VfsError::new(VfsErrorKind::NotDir, "mem.node.not_dir")),
        }
    }

    fn self_node(&self) -> VfsResult<Arc<MemNode>> {
        self.self_ref
            .upgrade()
            .ok_or_else(|| VfsError::new(VfsErrorKind::Internal, "mem.node.self"))
    }
}

impl std::fmt::Debug for MemNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemNode")
            .field("ino", &self.ino)
            .field("file_type", &self.file_type())
            .finish()
    }
}

impl FsNode for MemNode {
    fn ino(&self) -> u64 {
        self.ino
    }

    fn file_type(&self) -> VfsFileType {
        match &self.kind {
            MemNodeKind::Dir(_) => VfsFileType::Directory,
            MemNodeKind::File(_) => VfsFileType::RegularFile,
            MemNodeKind::Device { kind, .. } => *kind,
        }
    }

    fn len(&self) -> u64 {
        match &self.kind {
            MemNodeKind::File(data) => data.lock().len() as u64,
            _ => 0,
        }
    }

    fn stat(&self) -> VfsResult<VfsStat> {
        let rdev = match &self.kind {
            MemNodeKind::Device { dev, .. } => Some(*dev),
            _ => None,
        };
        Ok(VfsStat {
            ino: self.ino,
            file_type: self.file_type(),
            size: self.len(),
            nlink: self.nlink.load(Ordering::Relaxed),
            rdev,
        })
    }

    fn lookup(&self, name: &str) -> VfsResult<Vnode> {
        let dir = self.dir()?;
        if name == ".." {
            let parent = dir.lock().parent.upgrade();
            return match parent {
                Some(parent) => Ok(as_vnode(parent)),
                None => Ok(as_vnode(self.self_node()?)),
            };
        }
        dir.lock()
            .entries
            .get(name)
            .cloned()
            .map(as_vnode)
            .ok_or_else(|| VfsError::new(VfsErrorKind::NotFound, "mem.lookup"))
    }

    fn create(&self, name: &str) -> VfsResult<Vnode> {
        let dir = self.dir()?;
        let mut guard = dir.lock();
        if guard.entries.contains_key(name) {
            return Err(VfsError::new(VfsErrorKind::AlreadyExists, "mem.create.exists"));
        }
        let node = MemNode::new_file(self.alloc.clone())?;
        guard.entries.insert(name.to_owned(), node.clone());
        Ok(as_vnode(node))
    }

    fn mknod(&self, name: &str, kind: VfsFileType, dev: DeviceId) -> VfsResult<Vnode> {
        if !kind.is_device() {
            return Err(VfsError::new(VfsErrorKind::InvalidInput, "mem.mknod.kind"));
        }
        let dir = self.dir()?;
        let mut guard = dir.lock();
        if guard.entries.contains_key(name) {
            return Err(VfsError::new(VfsErrorKind::AlreadyExists, "mem.mknod.exists"));
        }
        let node = MemNode::new_device(self.alloc.clone(), kind, dev)?;
        guard.entries.insert(name.to_owned(), node.clone());
        Ok(as_vnode(node))
    }

    fn mkdir(&self, name: &str) -> VfsResult<Vnode> {
        let dir = self.dir()?;
        let mut guard = dir.lock();
        if guard.entries.contains_key(name) {
            return Err(VfsError::new(VfsErrorKind::AlreadyExists, "mem.mkdir.exists"));
        }
        let node = MemNode::new_dir(self.alloc.clone(), self.self_ref.clone())?;
        guard.entries.insert(name.to_owned(), node.clone());
        // The child's ".." entry counts as a link to this directory.
        self.nlink.fetch_add(1, Ordering::Relaxed);
        Ok(as_vnode(node))
    }

    fn rmdir(&self, name: &str) -> VfsResult<()> {
        let dir = self.dir()?;
        let mut guard = dir.lock();
        {
            let child = guard
                .entries
                .get(name)
                .ok_or_else(|| VfsError::new(VfsErrorKind::NotFound, "mem.rmdir"))?;
            let child_dir = match &child.kind {
                MemNodeKind::Dir(child_dir) => child_dir,
                _ => return Err(VfsError::new(VfsErrorKind::NotDir, "mem.rmdir.not_dir")),
            };
            if !child_dir.lock().entries.is_empty() {
                return Err(VfsError::new(
                    VfsErrorKind::DirNotEmpty,
                    "mem.rmdir.not_empty",
                ));
            }
        }
        if let Some(removed) = guard.entries.remove(name) {
            removed.nlink.store(0, Ordering::Relaxed);
            self.nlink.fetch_sub(1, Ordering::Relaxed);
        }
        Ok(())
    }

    fn unlink(&self, name: &str) -> VfsResult<()> {
        let dir = self.dir()?;
        let mut guard = dir.lock();
        let is_dir = match guard.entries.get(name) {
            None => return Err(VfsError::new(VfsErrorKind::NotFound, "mem.unlink")),
            Some(child) => matches!(&child.kind, MemNodeKind::Dir(_)),
        };
        if is_dir {
            return Err(VfsError::new(
                VfsErrorKind::NotPermitted,
                "mem.unlink.is_dir",
            ));
        }
        if let Some(removed) = guard.entries.remove(name) {
            removed.nlink.fetch_sub(1, Ordering::Relaxed);
        }
        Ok(())
    }

    fn link(&self, existing: &Vnode, name: &str) -> VfsResult<()> {
        let source = existing
            .as_ref()
            .as_any()
            .downcast_ref::<MemNode>()
            .ok_or_else(|| VfsError::new(VfsErrorKind::NotSupported, "mem.link.foreign"))?;
        if source.file_type().is_dir() {
            return Err(VfsError::new(VfsErrorKind::NotPermitted, "mem.link.is_dir"));
        }
        let source = source.self_node()?;
        let dir = self.dir()?;
        let mut guard = dir.lock();
        if guard.entries.contains_key(name) {
            return Err(VfsError::new(VfsErrorKind::AlreadyExists, "mem.link.exists"));
        }
        source.nlink.fetch_add(1, Ordering::Relaxed);
        guard.entries.insert(name.to_owned(), source);
        Ok(())
    }

    fn readdir(&self, pos: u64) -> VfsResult<Option<ReadDirEntry>> {
        let dir = self.dir()?;
        let guard = dir.lock();
        let index = pos as usize;
        if index >= 2 + guard.entries.len() {
            return Ok(None);
        }
        let entry = match index {
            0 => VfsDirEntry {
                ino: self.ino,
                file_type: VfsFileType::Directory,
                name: ".".to_owned(),
            },
            1 => {
                let parent_ino = guard
                    .parent
                    .upgrade()
                    .map(|parent| parent.ino)
                    .unwrap_or(self.ino);
                VfsDirEntry {
                    ino: parent_ino,
                    file_type: VfsFileType::Directory,
                    name: "..".to_owned(),
                }
            }
            n => {
                let (name, node) = guard
                    .entries
                    .iter()
                    .nth(n - 2)
                    .ok_or_else(|| VfsError::new(VfsErrorKind::Internal, "mem.readdir"))?;
                VfsDirEntry {
                    ino: node.ino,
                    file_type: node.file_type(),
                    name: name.clone(),
                }
            }
        };
        Ok(Some(ReadDirEntry {
            entry,
            next_pos: pos + 1,
        }))
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<usize> {
        let data = match &self.kind {
            MemNodeKind::File(data) => data,
            _ => return Err(VfsError::new(VfsErrorKind::NotSupported, "mem.read")),
        };
        let guard = data.lock();
        let start = match usize::try_from(offset) {
            Ok(start) if start < guard.len() => start,
            // Reading at or past end-of-file is a short read of zero bytes.
            _ => return Ok(0),
        };
        let count = buf.len().min(guard.len() - start);
        buf[..count].copy_from_slice(&guard[start..start + count]);
        Ok(count)
    }

    fn write_at(&self, offset: u64, buf: &[u8]) -> VfsResult<usize> {
        let data = match &self.kind {
            MemNodeKind::File(data) => data,
            _ => return Err(VfsError::new(VfsErrorKind::NotSupported, "mem.write")),
        };
        if buf.is_empty() {
            return Ok(0);
        }
        let start = usize::try_from(offset)
            .map_err(|_| VfsError::new(VfsErrorKind::InvalidInput, "mem.write.offset"))?;
        let end = start
            .checked_add(buf.len())
            .ok_or_else(|| VfsError::new(VfsErrorKind::InvalidInput, "mem.write.offset"))?;
        let mut guard = data.lock();
        if guard.len() < end {
            // Sparse writes zero-fill the gap.
            guard.resize(end, 0);
        }
        guard[start..end].copy_from_slice(buf);
        Ok(buf.len())
    }
}
