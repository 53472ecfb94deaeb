// Thu Jan 16 2026 - Alex

use crate::memory::{Address, ByteSource};
use crate::profile::Profile;
use crate::view::TypedView;
use std::collections::HashSet;

/// Why a chain walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainEnd {
    Null,
    Sentinel,
    Cycle,
    Limit,
    Unreadable,
}

/// Lazy walk over a singly linked chain of structures.
///
/// Two shapes are covered. A direct chain stores the address of the next
/// node (`rt_next`). An embedded list stores the address of the link member
/// inside the next node (`list_head`), so each link is adjusted back to the
/// start of its container. The walk ends on a null link, on the sentinel
/// link that closes a ring, on a node seen before, or at the node cap.
pub struct ChainWalk<'a> {
    profile: &'a Profile,
    source: &'a dyn ByteSource,
    type_name: String,
    next_path: String,
    link_offset: u64,
    link: Option<Address>,
    sentinel: Option<Address>,
    visited: HashSet<u64>,
    limit: usize,
    end: Option<ChainEnd>,
}

impl<'a> ChainWalk<'a> {
    /// Walks nodes of `type_name` starting at `head`, following `next_path`.
    pub fn new(
        profile: &'a Profile,
        source: &'a dyn ByteSource,
        type_name: &str,
        head: Address,
        next_path: &str,
    ) -> Self {
        Self {
            profile,
            source,
            type_name: type_name.to_string(),
            next_path: next_path.to_string(),
            link_offset: 0,
            link: Some(head),
            sentinel: None,
            visited: HashSet::new(),
            limit: usize::MAX,
            end: None,
        }
    }

    /// Walks the containers of an embedded `list_head` ring. `anchor` is the
    /// address of the list head that owns the ring (for example
    /// `&init_task.tasks`); it is not itself yielded.
    pub fn list_entries(
        profile: &'a Profile,
        source: &'a dyn ByteSource,
        type_name: &str,
        member: &str,
        anchor: Address,
    ) -> Self {
        let next_path = format!("{}.next", member);
        let link_offset = profile.member(type_name, member).map(|(offset, _)| offset);
        let first = profile.view("list_head", anchor, source).read_uint("next");

        let mut walk = Self::new(profile, source, type_name, Address::zero(), &next_path);
        walk.sentinel = Some(anchor);
        match (link_offset, first) {
            (Some(offset), Some(first)) => {
                walk.link_offset = offset;
                walk.link = Some(Address::new(first));
            }
            _ => {
                log::debug!("list {}.{} at {} unreadable", type_name, member, anchor);
                walk.link = None;
                walk.end = Some(ChainEnd::Unreadable);
            }
        }
        walk
    }

    /// Stop when a link equals `sentinel` (closed ring).
    pub fn with_sentinel(mut self, sentinel: Address) -> Self {
        self.sentinel = Some(sentinel);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn end_reason(&self) -> Option<ChainEnd> {
        self.end
    }

    pub fn visited(&self) -> usize {
        self.visited.len()
    }

    fn finish(&mut self, reason: ChainEnd) -> Option<TypedView<'a>> {
        if reason == ChainEnd::Cycle || reason == ChainEnd::Limit {
            log::debug!(
                "{} chain stopped after {} nodes: {:?}",
                self.type_name,
                self.visited.len(),
                reason
            );
        }
        self.end = Some(reason);
        self.link = None;
        None
    }
}

impl<'a> Iterator for ChainWalk<'a> {
    type Item = TypedView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.link?;
        if link.is_null() {
            return self.finish(ChainEnd::Null);
        }
        if Some(link) == self.sentinel {
            return self.finish(ChainEnd::Sentinel);
        }
        let Some(node) = link.checked_sub(self.link_offset) else {
            return self.finish(ChainEnd::Unreadable);
        };
        if self.visited.len() >= self.limit {
            return self.finish(ChainEnd::Limit);
        }
        if !self.visited.insert(node.as_u64()) {
            return self.finish(ChainEnd::Cycle);
        }

        let view = self.profile.view(&self.type_name, node, self.source);
        if !view.is_valid() {
            return self.finish(ChainEnd::Unreadable);
        }
        self.link = match view.read_uint(&self.next_path) {
            Some(next) => Some(Address::new(next)),
            None => {
                self.end = Some(ChainEnd::Unreadable);
                None
            }
        };
        Some(view)
    }
}
