//! Open flags.

use bitflags::bitflags;

bitflags! {
    /// Access mode and open-time behavior of an open file.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        /// Writes reposition the cursor to end-of-file first.
        const APPEND = 1 << 2;
        /// Create the final component if absent.
        const CREATE = 1 << 3;
        /// With `CREATE`: fail if the final component already exists.
        const EXCL = 1 << 4;
    }
}

impl OpenFlags {
    pub fn readable(self) -> bool {
        self.contains(OpenFlags::READ)
    }

    pub fn writable(self) -> bool {
        self.contains(OpenFlags::WRITE)
    }
}
