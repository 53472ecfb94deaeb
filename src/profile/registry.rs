// Tue Jan 15 2026 - Alex

use crate::profile::builtin;
use crate::profile::{LayoutPatch, LayoutTable, Profile, ProfileError, ProfileMetadata, SymbolTable};
use std::collections::HashMap;

/// Holds every known layout patch and resolves them into per-profile layout
/// tables.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    patches: Vec<LayoutPatch>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in patches.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for patch in builtin::patches() {
            registry.register(patch);
        }
        registry
    }

    /// Adds a patch. Registering a name twice replaces the earlier patch.
    pub fn register(&mut self, patch: LayoutPatch) {
        if let Some(existing) = self.patches.iter_mut().find(|p| p.name == patch.name) {
            log::debug!("replacing layout patch {}", patch.name);
            *existing = patch;
        } else {
            self.patches.push(patch);
        }
    }

    pub fn register_json(&mut self, json: &str) -> Result<usize, ProfileError> {
        let patches = LayoutPatch::load_document(json)?;
        let count = patches.len();
        for patch in patches {
            self.register(patch);
        }
        Ok(count)
    }

    pub fn patches(&self) -> &[LayoutPatch] {
        &self.patches
    }

    /// Patches applicable to `meta`, in application order.
    pub fn applicable(&self, meta: &ProfileMetadata) -> Result<Vec<&LayoutPatch>, ProfileError> {
        let matched: Vec<&LayoutPatch> = self.patches.iter().filter(|p| p.applies_to(meta)).collect();
        if matched.is_empty() {
            return Err(ProfileError::UnsupportedProfile {
                os: meta.os,
                major: meta.major,
                minor: meta.minor,
                architecture: meta.architecture,
            });
        }
        order_by_precedence(matched)
    }

    pub fn select(&self, meta: &ProfileMetadata) -> Result<LayoutTable, ProfileError> {
        let mut table = LayoutTable::new();
        for patch in self.applicable(meta)? {
            log::trace!("applying layout patch {} to {}", patch.name, meta);
            table.merge(&patch.types);
        }
        Ok(table)
    }

    /// Resolves the layout table for `meta` and freezes it, together with the
    /// symbol table, into a [`Profile`].
    pub fn build(&self, meta: ProfileMetadata, symbols: SymbolTable) -> Result<Profile, ProfileError> {
        let applied: Vec<String> = self
            .applicable(&meta)?
            .iter()
            .map(|p| p.name.clone())
            .collect();
        let layouts = self.select(&meta)?;
        log::debug!(
            "built profile {} from {} patches ({} types)",
            meta,
            applied.len(),
            layouts.len()
        );
        Ok(Profile::new(meta, symbols, layouts, applied))
    }
}

/// Stable topological sort: among patches free to go next, the one
/// registered first wins. Constraints naming patches that did not match are
/// ignored.
fn order_by_precedence(matched: Vec<&LayoutPatch>) -> Result<Vec<&LayoutPatch>, ProfileError> {
    let index: HashMap<&str, usize> = matched
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name.as_str(), i))
        .collect();

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); matched.len()];
    let mut indegree = vec![0usize; matched.len()];

    for (i, patch) in matched.iter().enumerate() {
        for later in patch.before.iter().filter_map(|n| index.get(n.as_str())) {
            successors[i].push(*later);
            indegree[*later] += 1;
        }
        for earlier in patch.after.iter().filter_map(|n| index.get(n.as_str())) {
            successors[*earlier].push(i);
            indegree[i] += 1;
        }
    }

    let mut done = vec![false; matched.len()];
    let mut ordered = Vec::with_capacity(matched.len());

    while ordered.len() < matched.len() {
        let Some(next) = (0..matched.len()).find(|&i| !done[i] && indegree[i] == 0) else {
            let stuck = (0..matched.len())
                .filter(|&i| !done[i])
                .map(|i| matched[i].name.clone())
                .collect();
            return Err(ProfileError::PrecedenceCycle(stuck));
        };
        done[next] = true;
        for &succ in &successors[next] {
            indegree[succ] -= 1;
        }
        ordered.push(matched[next]);
    }

    Ok(ordered)
}
