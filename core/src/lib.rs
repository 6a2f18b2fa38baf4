//! Namespace resolution and file-descriptor dispatch for the vnix VFS.
//!
//! This crate turns textual paths and descriptor-based operations into calls
//! on [`FsNode`], the polymorphic per-node capability table a concrete file
//! system supplies. It owns the path walk, the reference discipline around
//! node and open-file handles, the per-process descriptor table, and the
//! syscall-level error taxonomy, and nothing else. Storage, caching, and the
//! semantics of the nodes themselves belong to the backend.
//!
//! Mount-point traversal and symbolic links are deliberately out of scope.

pub mod context;
pub mod dir;
pub mod error;
pub mod fd_table;
pub mod flags;
pub mod handle;
pub mod node;
pub mod path_walker;
pub mod vfs;

pub use context::{VfsConfig, VfsContext};
pub use dir::{ReadDirEntry, VfsDirEntry};
pub use error::{VfsError, VfsErrorKind, VfsResult};
pub use fd_table::{Fd, FdTable};
pub use flags::OpenFlags;
pub use handle::OpenFile;
pub use node::{AsAny, DeviceId, FsNode, VfsFileType, VfsStat, Vnode};
pub use path_walker::{PathWalker, ResolvedParent, WalkBase, SEPARATOR};
pub use vfs::Vfs;
