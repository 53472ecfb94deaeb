// Thu Jan 16 2026 - Alex

use crate::memory::{Address, ByteSource};
use crate::profile::{FieldType, Profile};
use crate::view::{LazyArray, TypedView};
use crate::walk::ChainWalk;
use std::collections::HashSet;

/// One root array of buckets. Each bucket either is a head pointer or is a
/// structure holding the head pointer at `head_path`.
struct BucketTable<'a> {
    buckets: LazyArray<'a>,
    head_path: Option<String>,
}

impl<'a> BucketTable<'a> {
    fn head(&self, index: u64) -> Option<Address> {
        match (&self.head_path, self.buckets.element_type()) {
            (Some(path), FieldType::Struct(_)) => self.buckets.view_at(index)?.read_uint(path).map(Address::new),
            _ => self.buckets.uint_at(index).map(Address::new),
        }
    }
}

/// Walks every chain hanging off one or more bucket arrays. A node reachable
/// from several roots is yielded once, keyed by its physical location.
pub struct BucketWalk<'a> {
    profile: &'a Profile,
    source: &'a dyn ByteSource,
    node_type: String,
    next_path: String,
    tables: Vec<BucketTable<'a>>,
    table: usize,
    bucket: u64,
    chain: Option<ChainWalk<'a>>,
    emitted: HashSet<u64>,
    limit: usize,
}

impl<'a> BucketWalk<'a> {
    pub fn new(profile: &'a Profile, source: &'a dyn ByteSource, node_type: &str, next_path: &str) -> Self {
        Self {
            profile,
            source,
            node_type: node_type.to_string(),
            next_path: next_path.to_string(),
            tables: Vec::new(),
            table: 0,
            bucket: 0,
            chain: None,
            emitted: HashSet::new(),
            limit: usize::MAX,
        }
    }

    /// Adds a root array. `head_path` names the head pointer inside a
    /// structure bucket; pass `None` when buckets are bare pointers.
    pub fn table(mut self, buckets: LazyArray<'a>, head_path: Option<&str>) -> Self {
        self.tables.push(BucketTable {
            buckets,
            head_path: head_path.map(str::to_string),
        });
        self
    }

    /// Caps each chain at `limit` nodes.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn emitted(&self) -> usize {
        self.emitted.len()
    }

    fn next_chain(&mut self) -> Option<ChainWalk<'a>> {
        while let Some(table) = self.tables.get(self.table) {
            if self.bucket >= table.buckets.len() {
                self.table += 1;
                self.bucket = 0;
                continue;
            }
            let index = self.bucket;
            self.bucket += 1;
            match table.head(index) {
                Some(head) if !head.is_null() => {
                    return Some(
                        ChainWalk::new(self.profile, self.source, &self.node_type, head, &self.next_path)
                            .with_limit(self.limit),
                    );
                }
                Some(_) => {}
                None => log::trace!("bucket {} of table {} unreadable", index, self.table),
            }
        }
        None
    }
}

fn identity(view: &TypedView<'_>) -> u64 {
    view.physical_offset().unwrap_or_else(|| view.offset()).as_u64()
}

impl<'a> Iterator for BucketWalk<'a> {
    type Item = TypedView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.chain.is_none() {
                self.chain = Some(self.next_chain()?);
            }
            let chain = self.chain.as_mut()?;
            match chain.next() {
                Some(node) => {
                    if self.emitted.insert(identity(&node)) {
                        return Some(node);
                    }
                }
                None => self.chain = None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::TranslatedSource;
    use crate::profile::{ScalarKind, SymbolTable};
    use crate::testing::{linux_profile, ImageBuilder};
    use std::sync::Arc;

    fn buckets<'a>(profile: &'a Profile, source: &'a dyn ByteSource, base: Address, count: u64) -> LazyArray<'a> {
        LazyArray::new(profile, source, FieldType::struct_named("rt_hash_bucket"), base, count).unwrap()
    }

    #[test]
    fn test_walks_all_buckets() {
        let profile = linux_profile(SymbolTable::new());
        let mut image = ImageBuilder::new();
        let table = image.alloc(8 * 4);
        let a = image.alloc(0x30);
        let b = image.alloc(0x30);
        let c = image.alloc(0x30);
        image.write_ptr(table, a);
        image.write_ptr(a + 0x8, b);
        image.write_ptr(table + 0x18, c);
        let source = image.source();

        let walk = BucketWalk::new(&profile, &source, "rtable", "dst.rt_next")
            .table(buckets(&profile, &source, table, 4), Some("chain"));
        let seen: Vec<Address> = walk.map(|v| v.offset()).collect();
        assert_eq!(seen, vec![a, b, c]);
    }

    #[test]
    fn test_pointer_buckets_across_tables() {
        let profile = linux_profile(SymbolTable::new());
        let mut image = ImageBuilder::new();
        let first = image.alloc(8 * 2);
        let second = image.alloc(8 * 2);
        let a = image.alloc(0x30);
        let b = image.alloc(0x30);
        image.write_ptr(first + 0x8, a);
        image.write_ptr(second, b);
        let source = image.source();

        let ptr = FieldType::pointer_to_struct("rtable");
        let walk = BucketWalk::new(&profile, &source, "rtable", "dst.rt_next")
            .table(LazyArray::new(&profile, &source, ptr.clone(), first, 2).unwrap(), None)
            .table(LazyArray::new(&profile, &source, ptr, second, 2).unwrap(), None);
        assert_eq!(walk.map(|v| v.offset()).collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn test_shared_nodes_emitted_once() {
        let profile = linux_profile(SymbolTable::new());
        let mut image = ImageBuilder::new();
        let table = image.alloc(8 * 2);
        let a = image.alloc(0x30);
        let b = image.alloc(0x30);
        let shared = image.alloc(0x30);
        image.write_ptr(table, a);
        image.write_ptr(table + 0x8, b);
        image.write_ptr(a + 0x8, shared);
        image.write_ptr(b + 0x8, shared);
        let source = image.source();

        let mut walk = BucketWalk::new(&profile, &source, "rtable", "dst.rt_next")
            .table(buckets(&profile, &source, table, 2), Some("chain"));
        let seen: Vec<Address> = walk.by_ref().map(|v| v.offset()).collect();
        assert_eq!(seen, vec![a, shared, b]);
        assert_eq!(walk.emitted(), 3);
    }

    #[test]
    fn test_aliased_virtual_addresses_dedupe_by_physical() {
        let profile = linux_profile(SymbolTable::new());
        let mut physical = vec![0u8; 0x3000];
        // Bucket table in page 0, one node in page 1.
        physical[0..8].copy_from_slice(&0x1000_1000u64.to_le_bytes());
        physical[8..16].copy_from_slice(&0x2000_1000u64.to_le_bytes());
        let physical: Arc<dyn ByteSource> = Arc::new(crate::memory::BufferSource::new(physical));

        let mut source = TranslatedSource::new(physical, 0x1000);
        source.map_page(Address::new(0x1000_0000), Address::new(0));
        source.map_page(Address::new(0x1000_1000), Address::new(0x1000));
        source.map_page(Address::new(0x2000_1000), Address::new(0x1000));

        let table = LazyArray::new(
            &profile,
            &source,
            FieldType::scalar(ScalarKind::U64),
            Address::new(0x1000_0000),
            2,
        )
        .unwrap();
        let walk = BucketWalk::new(&profile, &source, "rtable", "dst.rt_next").table(table, None);
        assert_eq!(walk.count(), 1);
    }
}
