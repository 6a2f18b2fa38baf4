//! Fixed-size directory entry record for the getdent surface.

use vnix_core::VfsDirEntry;

/// Capacity of the name field, including the NUL terminator.
pub const DIRENT_NAME_CAP: usize = 256;

/// One directory entry as delivered to callers of `sys_getdent`. The record
/// size is fixed; names longer than the field are truncated with a NUL kept.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct Dirent {
    pub ino: u64,
    /// Cursor position after this entry.
    pub off: u64,
    pub name: [u8; DIRENT_NAME_CAP],
}

pub const DIRENT_SIZE: usize = core::mem::size_of::<Dirent>();

impl Dirent {
    pub fn zeroed() -> Self {
        Self {
            ino: 0,
            off: 0,
            name: [0; DIRENT_NAME_CAP],
        }
    }

    pub(crate) fn fill(&mut self, entry: &VfsDirEntry, off: u64) {
        self.ino = entry.ino;
        self.off = off;
        self.name = [0; DIRENT_NAME_CAP];
        let bytes = entry.name.as_bytes();
        let count = bytes.len().min(DIRENT_NAME_CAP - 1);
        self.name[..count].copy_from_slice(&bytes[..count]);
    }

    /// The entry name up to the NUL terminator.
    pub fn name_str(&self) -> &str {
        let end = self
            .name
            .iter()
            .position(|byte| *byte == 0)
            .unwrap_or(self.name.len());
        core::str::from_utf8(&self.name[..end]).unwrap_or_default()
    }
}

impl Default for Dirent {
    fn default() -> Self {
        Self::zeroed()
    }
}
