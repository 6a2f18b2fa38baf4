//! The integer syscall surface.
//!
//! Thin shims over [`Vfs`]: each wrapper translates raw flag/mode/whence
//! integers, invokes the corresponding core operation, and folds the result
//! into a single `isize`: a non-negative count/descriptor/position on
//! success, a negative errno on failure. Nothing here adds semantics; the
//! core layer owns validation and the reference discipline.

use crate::dirent::{Dirent, DIRENT_SIZE};
use crate::errno::{vfs_error_to_errno, EINVAL};
use crate::flags::{file_type_from_mode, mode_from_file_type, open_flags_from_raw};
use std::io::SeekFrom;
use vnix_core::{DeviceId, Fd, Vfs, VfsContext, VfsError, VfsStat};

pub const SEEK_SET: i32 = 0;
pub const SEEK_CUR: i32 = 1;
pub const SEEK_END: i32 = 2;

/// File status record as delivered to callers of `sys_stat`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stat {
    pub st_ino: u64,
    pub st_mode: u32,
    pub st_nlink: u32,
    pub st_size: u64,
    pub st_rdev: u32,
}

impl Stat {
    fn fill(&mut self, stat: &VfsStat) {
        self.st_ino = stat.ino;
        self.st_mode = mode_from_file_type(stat.file_type);
        self.st_nlink = stat.nlink;
        self.st_size = stat.size;
        self.st_rdev = stat.rdev.map(|dev| dev.0).unwrap_or(0);
    }
}

fn fail(err: VfsError) -> isize {
    -(vfs_error_to_errno(&err) as isize)
}

pub fn sys_open(vfs: &Vfs, ctx: &VfsContext, path: &str, flags: u32) -> isize {
    let Some(flags) = open_flags_from_raw(flags) else {
        return -(EINVAL as isize);
    };
    match vfs.open(ctx, path, flags) {
        Ok(fd) => fd.raw() as isize,
        Err(err) => fail(err),
    }
}

pub fn sys_read(vfs: &Vfs, ctx: &VfsContext, fd: i32, buf: &mut [u8]) -> isize {
    match vfs.read(ctx, Fd(fd), buf) {
        Ok(read) => read as isize,
        Err(err) => fail(err),
    }
}

pub fn sys_write(vfs: &Vfs, ctx: &VfsContext, fd: i32, buf: &[u8]) -> isize {
    match vfs.write(ctx, Fd(fd), buf) {
        Ok(written) => written as isize,
        Err(err) => fail(err),
    }
}

pub fn sys_close(vfs: &Vfs, ctx: &VfsContext, fd: i32) -> isize {
    match vfs.close(ctx, Fd(fd)) {
        Ok(()) => 0,
        Err(err) => fail(err),
    }
}

pub fn sys_dup(vfs: &Vfs, ctx: &VfsContext, fd: i32) -> isize {
    match vfs.dup(ctx, Fd(fd)) {
        Ok(new) => new.raw() as isize,
        Err(err) => fail(err),
    }
}

pub fn sys_dup2(vfs: &Vfs, ctx: &VfsContext, old: i32, new: i32) -> isize {
    match vfs.dup2(ctx, Fd(old), Fd(new)) {
        Ok(new) => new.raw() as isize,
        Err(err) => fail(err),
    }
}

pub fn sys_mknod(vfs: &Vfs, ctx: &VfsContext, path: &str, mode: u32, devid: u32) -> isize {
    let Some(kind) = file_type_from_mode(mode) else {
        return -(EINVAL as isize);
    };
    match vfs.mknod(ctx, path, kind, DeviceId(devid)) {
        Ok(()) => 0,
        Err(err) => fail(err),
    }
}

pub fn sys_mkdir(vfs: &Vfs, ctx: &VfsContext, path: &str) -> isize {
    match vfs.mkdir(ctx, path) {
        Ok(()) => 0,
        Err(err) => fail(err),
    }
}

pub fn sys_rmdir(vfs: &Vfs, ctx: &VfsContext, path: &str) -> isize {
    match vfs.rmdir(ctx, path) {
        Ok(()) => 0,
        Err(err) => fail(err),
    }
}

pub fn sys_unlink(vfs: &Vfs, ctx: &VfsContext, path: &str) -> isize {
    match vfs.unlink(ctx, path) {
        Ok(()) => 0,
        Err(err) => fail(err),
    }
}

pub fn sys_link(vfs: &Vfs, ctx: &VfsContext, from: &str, to: &str) -> isize {
    match vfs.link(ctx, from, to) {
        Ok(()) => 0,
        Err(err) => fail(err),
    }
}

pub fn sys_rename(vfs: &Vfs, ctx: &VfsContext, old: &str, new: &str) -> isize {
    match vfs.rename(ctx, old, new) {
        Ok(()) => 0,
        Err(err) => fail(err),
    }
}

pub fn sys_chdir(vfs: &Vfs, ctx: &VfsContext, path: &str) -> isize {
    match vfs.chdir(ctx, path) {
        Ok(()) => 0,
        Err(err) => fail(err),
    }
}

/// Fill one directory entry record. Returns [`DIRENT_SIZE`] when an entry was
/// delivered, `0` at end of directory, negative errno otherwise.
pub fn sys_getdent(vfs: &Vfs, ctx: &VfsContext, fd: i32, dirp: &mut Dirent) -> isize {
    let entry = match vfs.getdent(ctx, Fd(fd)) {
        Ok(Some(entry)) => entry,
        Ok(None) => return 0,
        Err(err) => return fail(err),
    };
    let off = match ctx.file(Fd(fd)) {
        Ok(file) => file.tell(),
        Err(err) => return fail(err),
    };
    dirp.fill(&entry, off);
    DIRENT_SIZE as isize
}

pub fn sys_lseek(vfs: &Vfs, ctx: &VfsContext, fd: i32, offset: i64, whence: i32) -> isize {
    let pos = match whence {
        SEEK_SET => {
            if offset < 0 {
                return -(EINVAL as isize);
            }
            SeekFrom::Start(offset as u64)
        }
        SEEK_CUR => SeekFrom::Current(offset),
        SEEK_END => SeekFrom::End(offset),
        _ => return -(EINVAL as isize),
    };
    match vfs.lseek(ctx, Fd(fd), pos) {
        Ok(new) => new as isize,
        Err(err) => fail(err),
    }
}

pub fn sys_stat(vfs: &Vfs, ctx: &VfsContext, path: &str, buf: &mut Stat) -> isize {
    match vfs.stat(ctx, path) {
        Ok(stat) => {
            buf.fill(&stat);
            0
        }
        Err(err) => fail(err),
    }
}
