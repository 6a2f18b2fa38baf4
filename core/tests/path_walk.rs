use std::sync::Arc;
use vnix_core::{FsNode, Vfs, VfsContext, VfsErrorKind, VfsFileType, WalkBase};
use vnix_mem::MemFs;

fn setup() -> (Vfs, VfsContext) {
    let fs = MemFs::new();
    let vfs = Vfs::new(fs.root());
    let ctx = vfs.new_context();
    (vfs, ctx)
}

/// Root, a directory tree `/a/b`, and a regular file `/f`.
fn setup_tree() -> (Vfs, VfsContext) {
    let (vfs, ctx) = setup();
    vfs.mkdir(&ctx, "/a").expect("mkdir /a");
    vfs.mkdir(&ctx, "/a/b").expect("mkdir /a/b");
    vfs.mknod(
        &ctx,
        "/a/null",
        VfsFileType::CharDevice,
        vnix_core::DeviceId(1),
    )
    .expect("mknod");
    vfs.open(
        &ctx,
        "/f",
        vnix_core::OpenFlags::WRITE | vnix_core::OpenFlags::CREATE,
    )
    .map(|fd| vfs.close(&ctx, fd))
    .expect("create /f")
    .expect("close");
    (vfs, ctx)
}

#[test]
fn empty_path_is_invalid() {
    let (vfs, ctx) = setup();
    let err = vfs.stat(&ctx, "").unwrap_err();
    assert_eq!(err.kind(), VfsErrorKind::InvalidInput);
}

#[test]
fn absolute_paths_start_at_the_root() {
    let (vfs, ctx) = setup_tree();
    vfs.chdir(&ctx, "/a/b").expect("chdir");
    // Still absolute even though the cwd moved.
    let stat = vfs.stat(&ctx, "/a").expect("stat /a");
    assert_eq!(stat.file_type, VfsFileType::Directory);
}

#[test]
fn relative_paths_start_at_the_cwd() {
    let (vfs, ctx) = setup_tree();
    vfs.chdir(&ctx, "/a").expect("chdir");
    let stat = vfs.stat(&ctx, "b").expect("stat b");
    assert_eq!(stat.file_type, VfsFileType::Directory);
    assert_eq!(
        vfs.stat(&ctx, "f").unwrap_err().kind(),
        VfsErrorKind::NotFound
    );
}

#[test]
fn explicit_base_overrides_the_cwd() {
    let (vfs, ctx) = setup_tree();
    let a = vfs
        .walker()
        .resolve(&ctx, WalkBase::Cwd, "/a")
        .expect("resolve /a");
    let b = vfs
        .walker()
        .resolve(&ctx, WalkBase::Dir(&a), "b")
        .expect("resolve b from /a");
    assert_eq!(b.file_type(), VfsFileType::Directory);
}

#[test]
fn parent_resolution_returns_dir_and_final_name() {
    let (vfs, ctx) = setup_tree();
    let a = vfs
        .walker()
        .resolve(&ctx, WalkBase::Cwd, "/a")
        .expect("resolve /a");
    let parent = vfs
        .walker()
        .resolve_parent(&ctx, WalkBase::Cwd, "/a/b")
        .expect("resolve_parent");
    assert_eq!(parent.name, "b");
    assert_eq!(parent.dir.ino(), a.ino());
}

#[test]
fn trailing_separator_resolves_to_the_directory_itself() {
    let (vfs, ctx) = setup_tree();
    let plain = vfs.stat(&ctx, "/a/b").expect("stat /a/b");
    let trailing = vfs.stat(&ctx, "/a/b/").expect("stat /a/b/");
    assert_eq!(plain.ino, trailing.ino);

    let root = vfs.stat(&ctx, "/").expect("stat /");
    assert_eq!(root.ino, vfs.root().ino());
}

#[test]
fn dot_and_repeated_separators_are_inert() {
    let (vfs, ctx) = setup_tree();
    let expected = vfs.stat(&ctx, "/a/b").expect("stat").ino;
    assert_eq!(vfs.stat(&ctx, "/a/./b").expect("stat").ino, expected);
    assert_eq!(vfs.stat(&ctx, "/a//b").expect("stat").ino, expected);
    assert_eq!(vfs.stat(&ctx, "./a/b").expect("stat").ino, expected);
}

#[test]
fn dotdot_walks_upward_through_the_backend() {
    let (vfs, ctx) = setup_tree();
    let a = vfs.stat(&ctx, "/a").expect("stat").ino;
    assert_eq!(vfs.stat(&ctx, "/a/b/..").expect("stat").ino, a);
    // The root is its own parent.
    assert_eq!(
        vfs.stat(&ctx, "/..").expect("stat").ino,
        vfs.root().ino()
    );

    vfs.chdir(&ctx, "/a/b").expect("chdir");
    assert_eq!(vfs.stat(&ctx, "..").expect("stat").ino, a);
}

#[test]
fn file_used_as_directory_fails_mid_walk() {
    let (vfs, ctx) = setup_tree();
    assert_eq!(
        vfs.stat(&ctx, "/f/x").unwrap_err().kind(),
        VfsErrorKind::NotDir
    );
    assert_eq!(
        vfs.stat(&ctx, "/f/x/y").unwrap_err().kind(),
        VfsErrorKind::NotDir
    );
    // A trailing separator demands a directory as well.
    assert_eq!(
        vfs.stat(&ctx, "/f/").unwrap_err().kind(),
        VfsErrorKind::NotDir
    );
}

#[test]
fn missing_component_fails_not_found() {
    let (vfs, ctx) = setup_tree();
    assert_eq!(
        vfs.stat(&ctx, "/ghost/b").unwrap_err().kind(),
        VfsErrorKind::NotFound
    );
    assert_eq!(
        vfs.stat(&ctx, "/a/ghost").unwrap_err().kind(),
        VfsErrorKind::NotFound
    );
}

#[test]
fn component_and_path_length_limits() {
    let (vfs, ctx) = setup_tree();
    let long_name = "n".repeat(vfs.config().max_name_len + 1);
    assert_eq!(
        vfs.stat(&ctx, &format!("/a/{long_name}")).unwrap_err().kind(),
        VfsErrorKind::NameTooLong
    );
    assert_eq!(
        vfs.stat(&ctx, &format!("/{long_name}/b")).unwrap_err().kind(),
        VfsErrorKind::NameTooLong
    );

    let long_path = format!("/a/{}", "b/".repeat(vfs.config().max_path_len / 2));
    assert_eq!(
        vfs.stat(&ctx, &long_path).unwrap_err().kind(),
        VfsErrorKind::NameTooLong
    );
}

#[test]
fn lookup_returns_a_new_reference_or_none() {
    let (vfs, _ctx) = setup_tree();
    let root = vfs.root().clone();
    let a1 = vfs.walker().lookup_child(&root, "a").expect("lookup");
    let count = Arc::strong_count(&a1);

    let a2 = vfs.walker().lookup_child(&root, "a").expect("lookup");
    assert_eq!(a2.ino(), a1.ino());
    assert_eq!(Arc::strong_count(&a1), count + 1);
    drop(a2);
    assert_eq!(Arc::strong_count(&a1), count);

    let err = vfs.walker().lookup_child(&root, "ghost").unwrap_err();
    assert_eq!(err.kind(), VfsErrorKind::NotFound);
    assert_eq!(Arc::strong_count(&a1), count);
}

#[test]
fn lookup_of_dot_and_empty_returns_the_directory() {
    let (vfs, ctx) = setup_tree();
    let a = vfs
        .walker()
        .resolve(&ctx, WalkBase::Cwd, "/a")
        .expect("resolve");
    let before = Arc::strong_count(&a);

    let same = vfs.walker().lookup_child(&a, ".").expect("lookup .");
    assert_eq!(same.ino(), a.ino());
    assert_eq!(Arc::strong_count(&a), before + 1);
    drop(same);

    let same = vfs.walker().lookup_child(&a, "").expect("lookup empty");
    assert_eq!(same.ino(), a.ino());
}

#[test]
fn lookup_on_a_non_directory_fails() {
    let (vfs, ctx) = setup_tree();
    let f = vfs
        .walker()
        .resolve(&ctx, WalkBase::Cwd, "/f")
        .expect("resolve /f");
    assert_eq!(
        vfs.walker().lookup_child(&f, "x").unwrap_err().kind(),
        VfsErrorKind::NotDir
    );
}

#[test]
fn resolve_or_create_creates_exactly_once() {
    let (vfs, ctx) = setup_tree();
    let created = vfs
        .walker()
        .resolve_or_create(&ctx, WalkBase::Cwd, "/a/new", true, false)
        .expect("create");
    let again = vfs
        .walker()
        .resolve_or_create(&ctx, WalkBase::Cwd, "/a/new", true, false)
        .expect("resolve existing");
    assert_eq!(created.ino(), again.ino());

    let err = vfs
        .walker()
        .resolve_or_create(&ctx, WalkBase::Cwd, "/a/new", true, true)
        .unwrap_err();
    assert_eq!(err.kind(), VfsErrorKind::AlreadyExists);
}

#[test]
fn concurrent_create_observes_one_winner() {
    let (vfs, ctx) = setup_tree();
    let mut inos = Vec::new();
    std::thread::scope(|scope| {
        let mut joins = Vec::new();
        for _ in 0..8 {
            let vfs = &vfs;
            let ctx = &ctx;
            joins.push(scope.spawn(move || {
                vfs.walker()
                    .resolve_or_create(ctx, WalkBase::Cwd, "/a/race", true, false)
                    .map(|node| node.ino())
            }));
        }
        for join in joins {
            inos.push(join.join().expect("thread").expect("resolve_or_create"));
        }
    });
    let first = inos[0];
    assert!(inos.iter().all(|ino| *ino == first));
}
