use crate::alloc::InoAlloc;
use crate::config::MemFsConfig;
use crate::node::{as_vnode, MemNode};
use std::sync::Arc;
use vnix_core::Vnode;

/// An in-memory file system: directories, regular files, and device special
/// files, rooted at a single directory whose `".."` is itself.
pub struct MemFs {
    root: Arc<MemNode>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::with_config(MemFsConfig::default())
    }

    pub fn with_config(config: MemFsConfig) -> Self {
        let alloc = Arc::new(InoAlloc::new(config.max_inodes));
        Self {
            root: MemNode::root(alloc),
        }
    }

    /// Owned reference to the root directory.
    pub fn root(&self) -> Vnode {
        as_vnode(self.root.clone())
    }
}

impl Default for MemFs {
    fn default() -> Self {
        Self::new()
    }
}
