use crate::dirent::{Dirent, DIRENT_SIZE};
use crate::errno::{EBADF, EEXIST, EINVAL, ENOENT};
use crate::sys::*;
use crate::{O_CREAT, O_RDONLY, O_RDWR, O_WRONLY, S_IFCHR, S_IFREG};
use vnix_core::Vfs;
use vnix_mem::MemFs;

fn setup() -> (Vfs, vnix_core::VfsContext) {
    let fs = MemFs::new();
    let vfs = Vfs::new(fs.root());
    let ctx = vfs.new_context();
    (vfs, ctx)
}

#[test]
fn open_write_read_roundtrip() {
    let (vfs, ctx) = setup();
    let fd = sys_open(&vfs, &ctx, "note", O_RDWR | O_CREAT);
    assert!(fd >= 0);

    assert_eq!(sys_write(&vfs, &ctx, fd as i32, b"payload"), 7);
    assert_eq!(sys_lseek(&vfs, &ctx, fd as i32, 0, SEEK_SET), 0);

    let mut buf = [0u8; 16];
    assert_eq!(sys_read(&vfs, &ctx, fd as i32, &mut buf), 7);
    assert_eq!(&buf[..7], b"payload");
    assert_eq!(sys_close(&vfs, &ctx, fd as i32), 0);
}

#[test]
fn open_with_bad_access_bits_is_einval() {
    let (vfs, ctx) = setup();
    assert_eq!(sys_open(&vfs, &ctx, "x", 3), -(EINVAL as isize));
}

#[test]
fn missing_path_is_enoent() {
    let (vfs, ctx) = setup();
    assert_eq!(sys_open(&vfs, &ctx, "ghost", O_RDONLY), -(ENOENT as isize));
    let mut stat = Stat::default();
    assert_eq!(sys_stat(&vfs, &ctx, "ghost", &mut stat), -(ENOENT as isize));
}

#[test]
fn bad_descriptors_are_ebadf() {
    let (vfs, ctx) = setup();
    let mut buf = [0u8; 4];
    assert_eq!(sys_read(&vfs, &ctx, 7, &mut buf), -(EBADF as isize));
    assert_eq!(sys_write(&vfs, &ctx, -1, b"x"), -(EBADF as isize));
    assert_eq!(sys_close(&vfs, &ctx, 1000), -(EBADF as isize));
    assert_eq!(sys_dup(&vfs, &ctx, 7), -(EBADF as isize));
}

#[test]
fn lseek_rejects_bad_whence_and_negative_set() {
    let (vfs, ctx) = setup();
    let fd = sys_open(&vfs, &ctx, "f", O_RDWR | O_CREAT) as i32;
    assert_eq!(sys_lseek(&vfs, &ctx, fd, 0, 42), -(EINVAL as isize));
    assert_eq!(sys_lseek(&vfs, &ctx, fd, -1, SEEK_SET), -(EINVAL as isize));
    assert_eq!(sys_lseek(&vfs, &ctx, fd, -1, SEEK_CUR), -(EINVAL as isize));
}

#[test]
fn mknod_rejects_non_device_modes() {
    let (vfs, ctx) = setup();
    assert_eq!(
        sys_mknod(&vfs, &ctx, "plain", S_IFREG, 0),
        -(EINVAL as isize)
    );
    // Unknown type bits never reach the core layer.
    assert_eq!(sys_mknod(&vfs, &ctx, "junk", 0o7777, 0), -(EINVAL as isize));
    assert_eq!(sys_mknod(&vfs, &ctx, "tty", S_IFCHR, 5), 0);
    assert_eq!(sys_mknod(&vfs, &ctx, "tty", S_IFCHR, 5), -(EEXIST as isize));
}

#[test]
fn getdent_returns_record_size_then_zero() {
    let (vfs, ctx) = setup();
    assert_eq!(sys_mkdir(&vfs, &ctx, "d"), 0);
    assert!(sys_open(&vfs, &ctx, "d/child", O_WRONLY | O_CREAT) >= 0);

    let fd = sys_open(&vfs, &ctx, "d", O_RDONLY) as i32;
    let mut seen = Vec::new();
    let mut dirent = Dirent::zeroed();
    loop {
        let ret = sys_getdent(&vfs, &ctx, fd, &mut dirent);
        if ret == 0 {
            break;
        }
        assert_eq!(ret, DIRENT_SIZE as isize);
        seen.push(dirent.name_str().to_owned());
    }
    assert_eq!(seen, vec![".", "..", "child"]);
}

#[test]
fn stat_reports_mode_and_rdev() {
    let (vfs, ctx) = setup();
    assert_eq!(sys_mknod(&vfs, &ctx, "dev", S_IFCHR, 0x205), 0);
    let mut stat = Stat::default();
    assert_eq!(sys_stat(&vfs, &ctx, "dev", &mut stat), 0);
    assert_eq!(stat.st_mode, S_IFCHR);
    assert_eq!(stat.st_rdev, 0x205);

    assert_eq!(sys_stat(&vfs, &ctx, "/", &mut stat), 0);
    assert_eq!(stat.st_mode, crate::S_IFDIR);
}
