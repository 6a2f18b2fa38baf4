//! VFS error taxonomy.
//!
//! Every fallible operation in this crate returns [`VfsResult`]. Errors carry
//! a machine-matchable [`VfsErrorKind`] plus a static context tag naming the
//! operation that failed (`"path.resolve.not_dir"` style). Callers branch on
//! the kind; the tag exists for logs and diagnostics only.

use thiserror::Error;

/// Classified failure conditions surfaced by the VFS layer.
///
/// The concrete file system behind a vnode may only report kinds from this
/// enum; anything it cannot express maps to [`VfsErrorKind::Io`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum VfsErrorKind {
    /// Descriptor is out of range, unoccupied, or opened with the wrong mode.
    BadDescriptor,
    /// Read attempted on a directory, or a directory opened for writing.
    IsDir,
    /// A path component (or the final target) had to be a directory and is not.
    NotDir,
    /// A path component or the final target does not exist.
    NotFound,
    /// A component exceeds the name limit, or the path exceeds the path limit.
    NameTooLong,
    /// Create-style target already present.
    AlreadyExists,
    /// Bad mode, bad whence, empty path, or `"."` misused.
    InvalidInput,
    /// `".."` misused on removal, or the directory still has entries.
    DirNotEmpty,
    /// Structurally disallowed operation, e.g. unlinking a directory.
    NotPermitted,
    /// The descriptor table has no free slot.
    TooManyOpenFiles,
    /// The target's capability table does not provide the operation.
    NotSupported,
    /// The underlying file system ran out of resources.
    NoSpace,
    /// Unclassified failure reported by the underlying file system.
    Io,
    /// Invariant violation inside the VFS layer itself.
    Internal,
}

/// Error type for all VFS operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{context}: {kind:?}")]
pub struct VfsError {
    kind: VfsErrorKind,
    context: &'static str,
}

impl VfsError {
    pub fn new(kind: VfsErrorKind, context: &'static str) -> Self {
        Self { kind, context }
    }

    pub fn kind(&self) -> VfsErrorKind {
        self.kind
    }

    /// Static tag naming the operation that produced this error.
    pub fn context(&self) -> &'static str {
        self.context
    }
}

pub type VfsResult<T> = Result<T, VfsError>;
