// Wed Jan 15 2026 - Alex

//! Synthetic images and profiles for unit tests.

use crate::memory::{Address, BufferSource};
use crate::profile::{
    Architecture, ConditionSet, FieldType, LayoutPatch, OsFamily, Profile, ProfileMetadata, ProfileRegistry,
    ScalarKind, StructBuilder, SymbolTable, Version,
};

pub const IMAGE_BASE: u64 = 0xffff_8800_0000_0000;

/// Bump-allocating little-endian memory image.
pub struct ImageBuilder {
    base: u64,
    data: Vec<u8>,
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self::with_base(IMAGE_BASE)
    }

    pub fn with_base(base: u64) -> Self {
        // Leave the first slot unused so no object sits at the base address.
        Self { base, data: vec![0; 0x10] }
    }

    pub fn alloc(&mut self, size: u64) -> Address {
        let aligned = (self.data.len() + 0xf) & !0xf;
        self.data.resize(aligned + size as usize, 0);
        Address::new(self.base + aligned as u64)
    }

    fn index(&self, addr: Address) -> usize {
        (addr.as_u64() - self.base) as usize
    }

    pub fn write_bytes(&mut self, addr: Address, bytes: &[u8]) {
        let start = self.index(addr);
        if start + bytes.len() > self.data.len() {
            self.data.resize(start + bytes.len(), 0);
        }
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
    }

    pub fn write_u16(&mut self, addr: Address, value: u16) {
        self.write_bytes(addr, &value.to_le_bytes());
    }

    pub fn write_u32(&mut self, addr: Address, value: u32) {
        self.write_bytes(addr, &value.to_le_bytes());
    }

    pub fn write_u64(&mut self, addr: Address, value: u64) {
        self.write_bytes(addr, &value.to_le_bytes());
    }

    pub fn write_ptr(&mut self, addr: Address, target: Address) {
        self.write_u64(addr, target.as_u64());
    }

    /// Allocates and writes a NUL-terminated string.
    pub fn cstr(&mut self, s: &str) -> Address {
        let addr = self.alloc(s.len() as u64 + 1);
        self.write_bytes(addr, s.as_bytes());
        addr
    }

    pub fn source(&self) -> BufferSource {
        BufferSource::with_base(self.data.clone(), Address::new(self.base)).named("synthetic")
    }
}

fn ptr(name: &str) -> FieldType {
    FieldType::pointer_to_struct(name)
}

fn scalar(kind: ScalarKind) -> FieldType {
    FieldType::scalar(kind)
}

/// x86-64 kernel types with compact made-up offsets.
pub fn test_kernel_patch() -> LayoutPatch {
    LayoutPatch::new("TestKernel", ConditionSet::any().os(OsFamily::Linux).architecture(Architecture::X64))
        .after("LinuxBase64")
        .with_type(
            StructBuilder::new("qstr")
                .size(0x10)
                .field("hash", 0x0, scalar(ScalarKind::U32))
                .field("len", 0x4, scalar(ScalarKind::U32))
                .field("name", 0x8, FieldType::pointer_to(scalar(ScalarKind::U8)))
                .build(),
        )
        .with_type(
            StructBuilder::new("inode")
                .size(0x10)
                .field("i_ino", 0x0, scalar(ScalarKind::ULong))
                .build(),
        )
        .with_type(
            StructBuilder::new("dentry")
                .size(0x30)
                .field("d_parent", 0x0, ptr("dentry"))
                .field("d_name", 0x8, FieldType::struct_named("qstr"))
                .field("d_inode", 0x18, ptr("inode"))
                .build(),
        )
        .with_type(
            StructBuilder::new("vfsmount")
                .size(0x20)
                .field("mnt_parent", 0x0, ptr("vfsmount"))
                .field("mnt_mountpoint", 0x8, ptr("dentry"))
                .field("mnt_root", 0x10, ptr("dentry"))
                .build(),
        )
        .with_type(
            StructBuilder::new("path")
                .size(0x10)
                .field("mnt", 0x0, ptr("vfsmount"))
                .field("dentry", 0x8, ptr("dentry"))
                .build(),
        )
        .with_type(
            StructBuilder::new("fs_struct")
                .size(0x30)
                .field("root", 0x8, FieldType::struct_named("path"))
                .field("pwd", 0x18, FieldType::struct_named("path"))
                .build(),
        )
        .with_type(
            StructBuilder::new("file")
                .size(0x30)
                .field("f_path", 0x10, FieldType::struct_named("path"))
                .build(),
        )
        .with_type(
            StructBuilder::new("task_struct")
                .size(0x80)
                .field("tasks", 0x10, FieldType::struct_named("list_head"))
                .field("pid", 0x20, scalar(ScalarKind::I32))
                .field("uid", 0x24, scalar(ScalarKind::U32))
                .field("comm", 0x28, FieldType::char_array(16))
                .field("utime", 0x38, scalar(ScalarKind::ULong))
                .field("stime", 0x40, scalar(ScalarKind::ULong))
                .field("start_time", 0x48, FieldType::struct_named("timespec"))
                .field("fs", 0x58, ptr("fs_struct"))
                .build(),
        )
        .with_type(
            StructBuilder::new("timekeeper")
                .size(0x40)
                .field("wall_to_monotonic", 0x10, FieldType::struct_named("timespec"))
                .field("total_sleep_time", 0x20, FieldType::struct_named("timespec"))
                .build(),
        )
        .with_type(
            StructBuilder::new("net_device")
                .size(0x20)
                .field("name", 0x0, FieldType::char_array(16))
                .build(),
        )
        .with_type(
            StructBuilder::new("dst_entry")
                .size(0x20)
                .field("dev", 0x0, ptr("net_device"))
                .field("rt_next", 0x8, ptr("rtable"))
                .build(),
        )
        .with_type(
            StructBuilder::new("file_operations")
                .size(0x18)
                .field("open", 0x0, FieldType::pointer_to(FieldType::Void))
                .field("read", 0x8, FieldType::pointer_to(FieldType::Void))
                .field("write", 0x10, FieldType::pointer_to(FieldType::Void))
                .build(),
        )
        .with_type(
            StructBuilder::new("rt_hash_bucket")
                .size(0x8)
                .field("chain", 0x0, ptr("rtable"))
                .build(),
        )
}

/// `rtable` with `dst` embedded directly (2.6.36 and later).
pub fn rtable_direct_patch() -> LayoutPatch {
    LayoutPatch::new(
        "TestRtableDirect",
        ConditionSet::any().os(OsFamily::Linux).since(Version::new(2, 6, 36)),
    )
    .with_type(
        StructBuilder::new("rtable")
            .size(0x30)
            .field("dst", 0x0, FieldType::struct_named("dst_entry"))
            .field("rt_dst", 0x20, scalar(ScalarKind::U32))
            .field("rt_gateway", 0x24, scalar(ScalarKind::U32))
            .build(),
    )
}

/// `rtable` with `dst` wrapped in the `u` union (before 2.6.36).
pub fn rtable_union_patch() -> LayoutPatch {
    LayoutPatch::new(
        "TestRtableUnion",
        ConditionSet::any().os(OsFamily::Linux).until(Version::new(2, 6, 36)),
    )
    .with_type(
        StructBuilder::new("rtable_u")
            .size(0x20)
            .field("dst", 0x0, FieldType::struct_named("dst_entry"))
            .build(),
    )
    .with_type(
        StructBuilder::new("rtable")
            .size(0x30)
            .field("u", 0x0, FieldType::struct_named("rtable_u"))
            .field("rt_dst", 0x20, scalar(ScalarKind::U32))
            .field("rt_gateway", 0x24, scalar(ScalarKind::U32))
            .build(),
    )
}

pub fn linux_registry() -> ProfileRegistry {
    let mut registry = ProfileRegistry::with_builtin();
    registry.register(test_kernel_patch());
    registry.register(rtable_direct_patch());
    registry.register(rtable_union_patch());
    registry
}

pub fn linux_profile(symbols: SymbolTable) -> Profile {
    linux_profile_version(3, 2, 0, symbols)
}

pub fn linux_profile_version(major: u32, minor: u32, revision: u32, symbols: SymbolTable) -> Profile {
    linux_registry()
        .build(ProfileMetadata::linux(major, minor, revision, Architecture::X64), symbols)
        .unwrap()
}
