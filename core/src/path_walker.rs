//! Path traversal and resolution.
//!
//! The walker turns a textual path into a reference to the containing
//! directory plus the final component name, or into the final node itself.
//! Reference ownership moves strictly forward: each loop iteration adopts the
//! looked-up child and drops the previous directory handle, and every error
//! return drops whatever the walk still holds.

use crate::context::VfsContext;
use crate::{VfsError, VfsErrorKind, VfsResult, Vnode};
use parking_lot::Mutex;
use std::sync::Arc;

/// Path component separator.
pub const SEPARATOR: char = '/';

/// Where a relative path starts resolving from.
#[derive(Clone, Copy)]
pub enum WalkBase<'a> {
    /// The calling context's current working directory.
    Cwd,
    /// An explicit base directory.
    Dir(&'a Vnode),
}

/// Result of resolving a path down to its containing directory.
///
/// `name` is the final component of the input path and may be empty when the
/// path ends in a separator; looking it up in `dir` yields `dir` itself.
pub struct ResolvedParent<'p> {
    pub dir: Vnode,
    pub name: &'p str,
}

pub struct PathWalker {
    root: Vnode,
    config: Arc<crate::VfsConfig>,
    /// Serializes lookup-then-create in [`PathWalker::resolve_or_create`] so
    /// two concurrent creators of the same name cannot both observe absence.
    create_lock: Mutex<()>,
}

impl PathWalker {
    pub fn new(root: Vnode, config: Arc<crate::VfsConfig>) -> Self {
        Self {
            root,
            config,
            create_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Vnode {
        &self.root
    }

    /// Resolve one component against `dir`.
    ///
    /// `"."` and the empty name resolve to `dir` itself without consulting
    /// the backend; everything else (including `".."`) goes through `dir`'s
    /// lookup capability. On success the returned reference is owned by the
    /// caller; on failure `dir` is untouched.
    pub fn lookup_child(&self, dir: &Vnode, name: &str) -> VfsResult<Vnode> {
        if !dir.file_type().is_dir() {
            return Err(VfsError::new(VfsErrorKind::NotDir, "path.lookup.not_dir"));
        }
        if name.len() > self.config.max_name_len {
            return Err(VfsError::new(
                VfsErrorKind::NameTooLong,
                "path.lookup.name_too_long",
            ));
        }
        if name.is_empty() || name == "." {
            return Ok(dir.clone());
        }
        dir.lookup(name)
    }

    /// Walk every component of `path` except the last, returning the
    /// containing directory and the unresolved final name.
    pub fn resolve_parent<'p>(
        &self,
        ctx: &VfsContext,
        base: WalkBase<'_>,
        path: &'p str,
    ) -> VfsResult<ResolvedParent<'p>> {
        if path.len() > self.config.max_path_len {
            return Err(VfsError::new(
                VfsErrorKind::NameTooLong,
                "path.resolve.path_too_long",
            ));
        }
        if path.is_empty() {
            return Err(VfsError::new(VfsErrorKind::InvalidInput, "path.resolve.empty"));
        }

        let (mut dir, rest) = match path.strip_prefix(SEPARATOR) {
            Some(stripped) => (self.root.clone(), stripped),
            None => match base {
                WalkBase::Dir(dir) => (dir.clone(), path),
                WalkBase::Cwd => (ctx.cwd(), path),
            },
        };

        let (prefix, name) = match rest.rsplit_once(SEPARATOR) {
            Some(split) => split,
            None => ("", rest),
        };

        if !prefix.is_empty() {
            for component in prefix.split(SEPARATOR) {
                dir = self.lookup_child(&dir, component)?;
            }
        }

        if name.len() > self.config.max_name_len {
            return Err(VfsError::new(
                VfsErrorKind::NameTooLong,
                "path.resolve.name_too_long",
            ));
        }
        if !dir.file_type().is_dir() {
            return Err(VfsError::new(
                VfsErrorKind::NotDir,
                "path.resolve.parent_not_dir",
            ));
        }

        Ok(ResolvedParent { dir, name })
    }

    /// Resolve `path` all the way to its final node.
    pub fn resolve(&self, ctx: &VfsContext, base: WalkBase<'_>, path: &str) -> VfsResult<Vnode> {
        let parent = self.resolve_parent(ctx, base, path)?;
        self.lookup_child(&parent.dir, parent.name)
    }

    /// Resolve `path`, optionally creating the final component.
    ///
    /// The final lookup and the create fallback run under the namespace
    /// create lock, so concurrent resolutions of the same name serialize on
    /// the decision between "found" and "must create". The lock is dropped on
    /// every exit path by the guard.
    pub fn resolve_or_create(
        &self,
        ctx: &VfsContext,
        base: WalkBase<'_>,
        path: &str,
        create: bool,
        exclusive: bool,
    ) -> VfsResult<Vnode> {
        let parent = self.resolve_parent(ctx, base, path)?;

        let _create_guard = self.create_lock.lock();
        match self.lookup_child(&parent.dir, parent.name) {
            Ok(_existing) if exclusive => Err(VfsError::new(
                VfsErrorKind::AlreadyExists,
                "path.resolve.exclusive",
            )),
            Ok(node) => Ok(node),
            Err(err) if create && err.kind() == VfsErrorKind::NotFound => {
                tracing::trace!(name = parent.name, "create absent final component");
                parent.dir.create(parent.name)
            }
            Err(err) => Err(err),
        }
    }
}
