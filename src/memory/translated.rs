// Wed Jan 15 2026 - Alex

use crate::memory::{Address, ByteSource, MemoryError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A virtual address space laid over a physical source using an explicit
/// page map. The map is filled in by whatever walked the page tables.
pub struct TranslatedSource {
    physical: Arc<dyn ByteSource>,
    pages: BTreeMap<u64, u64>,
    page_size: u64,
    name: String,
}

impl TranslatedSource {
    pub fn new(physical: Arc<dyn ByteSource>, page_size: u64) -> Self {
        let page_size = if page_size.is_power_of_two() { page_size } else { 0x1000 };
        Self {
            physical,
            pages: BTreeMap::new(),
            page_size,
            name: "virtual".to_string(),
        }
    }

    pub fn map_page(&mut self, virtual_page: Address, physical_page: Address) {
        let mask = !(self.page_size - 1);
        self.pages
            .insert(virtual_page.as_u64() & mask, physical_page.as_u64() & mask);
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn physical(&self) -> &Arc<dyn ByteSource> {
        &self.physical
    }

    pub fn mapped_pages(&self) -> usize {
        self.pages.len()
    }
}

impl ByteSource for TranslatedSource {
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        // len may come from image data; grow as pages actually translate
        let mut out = Vec::with_capacity(len.min(self.page_size as usize));
        let mut cursor = addr;

        while out.len() < len {
            let phys = self
                .translate(cursor)
                .ok_or(MemoryError::Unmapped(cursor.as_u64()))?;
            let in_page = self.page_size - (cursor.as_u64() & (self.page_size - 1));
            let take = (in_page as usize).min(len - out.len());
            out.extend(self.physical.read_bytes(phys, take)?);
            cursor = cursor
                .checked_add(take as u64)
                .ok_or(MemoryError::OutOfBounds(cursor.as_u64()))?;
        }

        Ok(out)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn translate(&self, addr: Address) -> Option<Address> {
        let mask = self.page_size - 1;
        self.pages
            .get(&(addr.as_u64() & !mask))
            .map(|page| Address::new(page | (addr.as_u64() & mask)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::BufferSource;

    #[test]
    fn test_read_spanning_two_pages() {
        let mut phys = vec![0u8; 0x3000];
        phys[0x2ffe] = 0xaa;
        phys[0x2fff] = 0xbb;
        phys[0x1000] = 0xcc;
        let physical: Arc<dyn ByteSource> = Arc::new(BufferSource::new(phys));

        let mut virt = TranslatedSource::new(physical, 0x1000);
        virt.map_page(Address::new(0xffff_0000), Address::new(0x2000));
        virt.map_page(Address::new(0xffff_1000), Address::new(0x1000));

        assert_eq!(
            virt.read_bytes(Address::new(0xffff_0ffe), 3).unwrap(),
            vec![0xaa, 0xbb, 0xcc]
        );
        assert_eq!(virt.translate(Address::new(0xffff_1010)), Some(Address::new(0x1010)));
    }

    #[test]
    fn test_unmapped_page_is_unavailable() {
        let physical: Arc<dyn ByteSource> = Arc::new(BufferSource::new(vec![0; 0x1000]));
        let virt = TranslatedSource::new(physical, 0x1000);
        assert!(matches!(
            virt.read_bytes(Address::new(0x5000), 4),
            Err(MemoryError::Unmapped(0x5000))
        ));
        assert_eq!(virt.translate(Address::new(0x5000)), None);
    }

    #[test]
    fn test_huge_read_stops_at_first_hole() {
        let physical: Arc<dyn ByteSource> = Arc::new(BufferSource::new(vec![0x11; 0x2000]));
        let mut virt = TranslatedSource::new(physical, 0x1000);
        virt.map_page(Address::new(0x4000), Address::new(0x1000));

        assert!(matches!(
            virt.read_bytes(Address::new(0x5000), usize::MAX / 2),
            Err(MemoryError::Unmapped(0x5000))
        ));
        assert!(matches!(
            virt.read_bytes(Address::new(0x4000), usize::MAX / 2),
            Err(MemoryError::Unmapped(0x5000))
        ));
    }
}
