//! VFS → errno translation.
//!
//! This is the single source of truth for mapping `vnix-core` error kinds to
//! errno values. Callers must not duplicate this mapping elsewhere.

use vnix_core::{VfsError, VfsErrorKind};

pub const EPERM: i32 = 1;
pub const ENOENT: i32 = 2;
pub const EIO: i32 = 5;
pub const EBADF: i32 = 9;
pub const EEXIST: i32 = 17;
pub const ENOTDIR: i32 = 20;
pub const EISDIR: i32 = 21;
pub const EINVAL: i32 = 22;
pub const EMFILE: i32 = 24;
pub const ENOSPC: i32 = 28;
pub const ENAMETOOLONG: i32 = 36;
pub const ENOTEMPTY: i32 = 39;
pub const ENOTSUP: i32 = 95;

/// Convert a VFS error to a positive errno value.
pub fn vfs_error_to_errno(err: &VfsError) -> i32 {
    vfs_error_kind_to_errno(err.kind())
}

/// Convert a VFS error kind to a positive errno value.
pub fn vfs_error_kind_to_errno(kind: VfsErrorKind) -> i32 {
    match kind {
        VfsErrorKind::BadDescriptor => EBADF,
        VfsErrorKind::IsDir => EISDIR,
        VfsErrorKind::NotDir => ENOTDIR,
        VfsErrorKind::NotFound => ENOENT,
        VfsErrorKind::NameTooLong => ENAMETOOLONG,
        VfsErrorKind::AlreadyExists => EEXIST,
        VfsErrorKind::InvalidInput => EINVAL,
        VfsErrorKind::DirNotEmpty => ENOTEMPTY,
        VfsErrorKind::NotPermitted => EPERM,
        VfsErrorKind::TooManyOpenFiles => EMFILE,
        VfsErrorKind::NotSupported => ENOTSUP,
        VfsErrorKind::NoSpace => ENOSPC,
        VfsErrorKind::Io => EIO,
        VfsErrorKind::Internal => EIO,
        _ => EIO,
    }
}

/// Stable string name for a VFS error kind (logging/telemetry only).
pub fn vfs_error_kind_str(kind: VfsErrorKind) -> &'static str {
    match kind {
        VfsErrorKind::BadDescriptor => "bad_descriptor",
        VfsErrorKind::IsDir => "is_dir",
        VfsErrorKind::NotDir => "not_dir",
        VfsErrorKind::NotFound => "not_found",
        VfsErrorKind::NameTooLong => "name_too_long",
        VfsErrorKind::AlreadyExists => "already_exists",
        VfsErrorKind::InvalidInput => "invalid_input",
        VfsErrorKind::DirNotEmpty => "dir_not_empty",
        VfsErrorKind::NotPermitted => "not_permitted",
        VfsErrorKind::TooManyOpenFiles => "too_many_open_files",
        VfsErrorKind::NotSupported => "not_supported",
        VfsErrorKind::NoSpace => "no_space",
        VfsErrorKind::Io => "io",
        VfsErrorKind::Internal => "internal",
        _ => "unknown",
    }
}
