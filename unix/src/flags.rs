//! Raw open-flag and mode-bit translation.
//!
//! This module is the only place that should translate raw `O_*`/`S_IF*`
//! integers into `vnix-core` types. Callers must not duplicate this logic.

use vnix_core::{OpenFlags, VfsFileType};

pub const O_RDONLY: u32 = 0;
pub const O_WRONLY: u32 = 1;
pub const O_RDWR: u32 = 2;
pub const O_CREAT: u32 = 0x40;
pub const O_EXCL: u32 = 0x80;
pub const O_APPEND: u32 = 0x400;

const O_ACCMODE: u32 = 0x3;

/// File type mask and values for the `mode` argument of mknod/stat.
pub const S_IFMT: u32 = 0o170000;
pub const S_IFCHR: u32 = 0o020000;
pub const S_IFDIR: u32 = 0o040000;
pub const S_IFBLK: u32 = 0o060000;
pub const S_IFREG: u32 = 0o100000;

/// Translate raw open flags. `None` means the access bits are not one of the
/// three recognized modes.
pub fn open_flags_from_raw(raw: u32) -> Option<OpenFlags> {
    let mut flags = match raw & O_ACCMODE {
        O_RDONLY => OpenFlags::READ,
        O_WRONLY => OpenFlags::WRITE,
        O_RDWR => OpenFlags::READ | OpenFlags::WRITE,
        _ => return None,
    };
    if raw & O_CREAT != 0 {
        flags |= OpenFlags::CREATE;
    }
    if raw & O_EXCL != 0 {
        flags |= OpenFlags::EXCL;
    }
    if raw & O_APPEND != 0 {
        flags |= OpenFlags::APPEND;
    }
    Some(flags)
}

/// Translate the type bits of a raw mode. `None` for unrecognized bit
/// patterns; passing a recognized non-device type through still lets the
/// core layer reject it where the operation demands a device.
pub fn file_type_from_mode(mode: u32) -> Option<VfsFileType> {
    match mode & S_IFMT {
        S_IFREG => Some(VfsFileType::RegularFile),
        S_IFDIR => Some(VfsFileType::Directory),
        S_IFCHR => Some(VfsFileType::CharDevice),
        S_IFBLK => Some(VfsFileType::BlockDevice),
        _ => None,
    }
}

pub fn mode_from_file_type(file_type: VfsFileType) -> u32 {
    match file_type {
        VfsFileType::RegularFile => S_IFREG,
        VfsFileType::Directory => S_IFDIR,
        VfsFileType::CharDevice => S_IFCHR,
        VfsFileType::BlockDevice => S_IFBLK,
    }
}
