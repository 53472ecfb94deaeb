// Thu Jan 16 2026 - Alex

use crate::memory::Address;
use crate::view::TypedView;
use std::collections::HashSet;

/// Field names the climb follows. Defaults match the Linux dentry cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClimbFields {
    pub parent: String,
    pub mount_parent: String,
    pub mount_point: String,
    pub mount_root: String,
}

impl Default for ClimbFields {
    fn default() -> Self {
        Self {
            parent: "d_parent".to_string(),
            mount_parent: "mnt_parent".to_string(),
            mount_point: "mnt_mountpoint".to_string(),
            mount_root: "mnt_root".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimbEnd {
    /// Reached the requested root entry and mount.
    Target,
    /// Reached a root whose mount is its own parent.
    GlobalRoot,
    /// Reached an entry that is its own parent with no mount to cross.
    StructuralRoot,
    Cycle,
    Limit,
    Unreadable,
}

/// One visited entry.
#[derive(Debug, Clone, Copy)]
pub struct ClimbStep<'a> {
    pub entry: TypedView<'a>,
    pub mount: Option<TypedView<'a>>,
    /// The step was reached by crossing from a mount root to its mount point.
    pub crossed_mount: bool,
    /// The entry is its own parent.
    pub is_root: bool,
}

/// Climbs from an entry towards the root of its tree, hopping to the mount
/// point whenever the root of the current mount is reached.
pub struct ParentClimb<'a> {
    entry: Option<TypedView<'a>>,
    mount: Option<TypedView<'a>>,
    target: Option<(Address, Address)>,
    fields: ClimbFields,
    visited: HashSet<(u64, u64)>,
    limit: usize,
    crossed: bool,
    end: Option<ClimbEnd>,
}

impl<'a> ParentClimb<'a> {
    pub fn new(entry: TypedView<'a>, mount: Option<TypedView<'a>>) -> Self {
        Self {
            entry: Some(entry),
            mount,
            target: None,
            fields: ClimbFields::default(),
            visited: HashSet::new(),
            limit: usize::MAX,
            crossed: false,
            end: None,
        }
    }

    /// Stop before yielding `root` when the current mount is `root_mount`.
    pub fn with_target(mut self, root: Address, root_mount: Address) -> Self {
        self.target = Some((root, root_mount));
        self
    }

    pub fn with_fields(mut self, fields: ClimbFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn end_reason(&self) -> Option<ClimbEnd> {
        self.end
    }

    fn finish(&mut self, reason: ClimbEnd) {
        if matches!(reason, ClimbEnd::Cycle | ClimbEnd::Limit) {
            log::debug!("parent climb stopped after {} steps: {:?}", self.visited.len(), reason);
        }
        self.end = Some(reason);
        self.entry = None;
    }

    /// Moves to the mount point of the current mount.
    fn cross_mount(&mut self, mount: TypedView<'a>) {
        match mount.read_uint(&self.fields.mount_parent) {
            Some(parent) if parent == mount.offset().as_u64() => {
                self.finish(ClimbEnd::GlobalRoot);
            }
            Some(parent) if parent != 0 => {
                self.entry = Some(mount.deref(&self.fields.mount_point));
                self.mount = Some(mount.at(Address::new(parent)));
                self.crossed = true;
            }
            _ => {
                self.finish(ClimbEnd::StructuralRoot);
            }
        }
    }
}

impl<'a> Iterator for ParentClimb<'a> {
    type Item = ClimbStep<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entry?;
        let mount_addr = self.mount.map(|m| m.offset().as_u64()).unwrap_or(0);

        if let Some((root, root_mount)) = self.target {
            if entry.offset() == root && mount_addr == root_mount.as_u64() {
                self.finish(ClimbEnd::Target);
                return None;
            }
        }
        if !entry.is_valid() {
            self.finish(ClimbEnd::Unreadable);
            return None;
        }
        if self.visited.len() >= self.limit {
            self.finish(ClimbEnd::Limit);
            return None;
        }
        if !self.visited.insert((entry.offset().as_u64(), mount_addr)) {
            self.finish(ClimbEnd::Cycle);
            return None;
        }

        let parent = entry.read_uint(&self.fields.parent);
        let is_root = parent == Some(entry.offset().as_u64());
        let step = ClimbStep {
            entry,
            mount: self.mount,
            crossed_mount: std::mem::take(&mut self.crossed),
            is_root,
        };

        let at_mount_root = self
            .mount
            .and_then(|m| m.read_uint(&self.fields.mount_root))
            .map_or(false, |root| root == entry.offset().as_u64());

        if at_mount_root || is_root {
            match self.mount {
                Some(mount) => self.cross_mount(mount),
                None => self.finish(ClimbEnd::StructuralRoot),
            }
        } else {
            match parent {
                Some(p) if p != 0 => self.entry = Some(entry.at(Address::new(p))),
                _ => self.finish(ClimbEnd::Unreadable),
            }
        }
        Some(step)
    }
}
