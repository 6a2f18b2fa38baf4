//! Unix-flavored integer surface over the vnix VFS.
//!
//! `vnix-core` speaks `VfsResult`; the collaborators driving it speak small
//! integers. This crate is the boundary: errno translation, raw flag and mode
//! decoding, the fixed-size [`Dirent`] record, and `sys_*` shims returning a
//! non-negative result or a negative errno.

mod dirent;
mod errno;
mod flags;
mod sys;

#[cfg(test)]
mod tests;

pub use dirent::{Dirent, DIRENT_NAME_CAP, DIRENT_SIZE};
pub use errno::{
    vfs_error_kind_str, vfs_error_kind_to_errno, vfs_error_to_errno, EBADF, EEXIST, EINVAL, EIO,
    EISDIR, EMFILE, ENAMETOOLONG, ENOENT, ENOSPC, ENOTDIR, ENOTEMPTY, ENOTSUP, EPERM,
};
pub use flags::{
    file_type_from_mode, mode_from_file_type, open_flags_from_raw, O_APPEND, O_CREAT, O_EXCL,
    O_RDONLY, O_RDWR, O_WRONLY, S_IFBLK, S_IFCHR, S_IFDIR, S_IFMT, S_IFREG,
};
pub use sys::{
    sys_chdir, sys_close, sys_dup, sys_dup2, sys_getdent, sys_link, sys_lseek, sys_mkdir,
    sys_mknod, sys_open, sys_read, sys_rename, sys_rmdir, sys_stat, sys_unlink, sys_write, Stat,
    SEEK_CUR, SEEK_END, SEEK_SET,
};
