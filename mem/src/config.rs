#[derive(Clone, Debug, Default)]
pub struct MemFsConfig {
    /// Optional cap on the total node count in this FS instance, the root
    /// included. `None` means unbounded.
    pub max_inodes: Option<u64>,
}
