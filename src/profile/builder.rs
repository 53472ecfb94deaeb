// Tue Jan 13 2026 - Alex

use crate::profile::{FieldDef, FieldType, StructLayout};

pub struct StructBuilder {
    layout: StructLayout,
}

impl StructBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            layout: StructLayout::new(name),
        }
    }

    pub fn size(mut self, size: u64) -> Self {
        self.layout.set_size(size);
        self
    }

    pub fn field(mut self, name: &str, offset: u64, ty: FieldType) -> Self {
        self.layout.add_field(FieldDef::new(name, offset, ty));
        self
    }

    pub fn build(self) -> StructLayout {
        self.layout
    }
}
