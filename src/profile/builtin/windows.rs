// Wed Jan 15 2026 - Alex

use crate::profile::{
    Architecture, ConditionSet, FieldType, LayoutPatch, OsFamily, ScalarKind, StructBuilder, StructLayout,
};

pub const OBJECT_CLASSES: &str = "WindowsObjectClasses";

pub const SHIM_RECORDS: &str = "ShimRecords";
pub const CACHE_ENTRY: &str = "AppCompatCacheEntry";

pub fn patches() -> Vec<LayoutPatch> {
    vec![
        object_classes(),
        shim_patch("ShimCacheTypesXPx86", 5, 1, Architecture::X86, records_xp(), entry_xp_x86()),
        shim_patch("ShimCacheTypes2003x86", 5, 2, Architecture::X86, records_2003_vista(), entry_2003_x86()),
        shim_patch("ShimCacheTypesVistax86", 6, 0, Architecture::X86, records_2003_vista(), entry_vista_x86()),
        shim_patch("ShimCacheTypesWin7x86", 6, 1, Architecture::X86, records_win7(), entry_win7_x86()),
        shim_patch("ShimCacheTypes2003x64", 5, 2, Architecture::X64, records_2003_vista(), entry_2003_x64()),
        shim_patch("ShimCacheTypesVistax64", 6, 0, Architecture::X64, records_2003_vista(), entry_vista_x64()),
        shim_patch("ShimCacheTypesWin7x64", 6, 1, Architecture::X64, records_win7(), entry_win7_x64()),
    ]
}

fn object_classes() -> LayoutPatch {
    LayoutPatch::new(OBJECT_CLASSES, ConditionSet::any().os(OsFamily::Windows)).with_type(
        StructBuilder::new("_LARGE_INTEGER")
            .size(8)
            .field("LowPart", 0, FieldType::scalar(ScalarKind::U32))
            .field("HighPart", 4, FieldType::scalar(ScalarKind::I32))
            .field("QuadPart", 0, FieldType::scalar(ScalarKind::I64))
            .build(),
    )
}

fn shim_patch(
    name: &str,
    major: u32,
    minor: u32,
    architecture: Architecture,
    records: StructLayout,
    entry: StructLayout,
) -> LayoutPatch {
    let conditions = ConditionSet::any()
        .os(OsFamily::Windows)
        .version(major, minor)
        .architecture(architecture);
    LayoutPatch::new(name, conditions)
        .before(OBJECT_CLASSES)
        .with_type(records)
        .with_type(entry)
}

fn entries_at(offset: u64) -> (u64, FieldType) {
    (
        offset,
        FieldType::counted_array(FieldType::struct_named(CACHE_ENTRY), "NumRecords"),
    )
}

fn records(count_kind: ScalarKind, count_offset: u64, entries: (u64, FieldType)) -> StructLayout {
    StructBuilder::new(SHIM_RECORDS)
        .field("Magic", 0, FieldType::scalar(ScalarKind::U32))
        .field("NumRecords", count_offset, FieldType::scalar(count_kind))
        .field("Entries", entries.0, entries.1)
        .build()
}

// Magic 0xDEADBEEF
fn records_xp() -> StructLayout {
    records(ScalarKind::I16, 0x8, entries_at(0x190))
}

// Magic 0xBADC0FFE
fn records_2003_vista() -> StructLayout {
    records(ScalarKind::I32, 0x4, entries_at(0x8))
}

fn records_win7() -> StructLayout {
    records(ScalarKind::I32, 0x4, entries_at(0x80))
}

fn filetime() -> FieldType {
    FieldType::scalar(ScalarKind::U64)
}

fn u16_() -> FieldType {
    FieldType::scalar(ScalarKind::U16)
}

fn u32_() -> FieldType {
    FieldType::scalar(ScalarKind::U32)
}

fn u64_() -> FieldType {
    FieldType::scalar(ScalarKind::U64)
}

fn entry_xp_x86() -> StructLayout {
    StructBuilder::new(CACHE_ENTRY)
        .size(0x228)
        .field("Path", 0x0, FieldType::char_array(0x208))
        .field("LastModified", 0x210, filetime())
        .field("FileSize", 0x218, FieldType::scalar(ScalarKind::I64))
        .field("LastUpdate", 0x220, filetime())
        .build()
}

fn entry_2003_x86() -> StructLayout {
    StructBuilder::new(CACHE_ENTRY)
        .size(0x18)
        .field("Length", 0x0, u16_())
        .field("MaximumLength", 0x2, u16_())
        .field("PathOffset", 0x4, u32_())
        .field("LastModified", 0x8, filetime())
        .field("FileSize", 0x10, FieldType::struct_named("_LARGE_INTEGER"))
        .build()
}

fn entry_vista_x86() -> StructLayout {
    StructBuilder::new(CACHE_ENTRY)
        .size(0x18)
        .field("Length", 0x0, u16_())
        .field("MaximumLength", 0x2, u16_())
        .field("PathOffset", 0x4, u32_())
        .field("LastModified", 0x8, filetime())
        .field("InsertFlags", 0x10, u32_())
        .field("Flags", 0x14, u32_())
        .build()
}

fn entry_win7_x86() -> StructLayout {
    StructBuilder::new(CACHE_ENTRY)
        .size(0x20)
        .field("Length", 0x0, u16_())
        .field("MaximumLength", 0x2, u16_())
        .field("PathOffset", 0x4, u32_())
        .field("LastModified", 0x8, filetime())
        .field("InsertFlags", 0x10, u32_())
        .field("ShimFlags", 0x14, u32_())
        .field("BlobSize", 0x18, u32_())
        .field("BlobOffset", 0x1c, u32_())
        .build()
}

fn entry_2003_x64() -> StructLayout {
    StructBuilder::new(CACHE_ENTRY)
        .size(0x20)
        .field("Length", 0x0, u16_())
        .field("MaximumLength", 0x2, u16_())
        .field("PathOffset", 0x8, u64_())
        .field("LastModified", 0x10, filetime())
        .field("FileSize", 0x18, FieldType::struct_named("_LARGE_INTEGER"))
        .build()
}

fn entry_vista_x64() -> StructLayout {
    StructBuilder::new(CACHE_ENTRY)
        .size(0x20)
        .field("Length", 0x0, u16_())
        .field("MaximumLength", 0x2, u16_())
        .field("PathOffset", 0x8, u32_())
        .field("LastModified", 0x10, filetime())
        .field("InsertFlags", 0x18, u32_())
        .field("Flags", 0x1c, u32_())
        .build()
}

fn entry_win7_x64() -> StructLayout {
    StructBuilder::new(CACHE_ENTRY)
        .size(0x30)
        .field("Length", 0x0, u16_())
        .field("MaximumLength", 0x2, u16_())
        .field("PathOffset", 0x8, u64_())
        .field("LastModified", 0x10, filetime())
        .field("InsertFlags", 0x18, u32_())
        .field("ShimFlags", 0x1c, u32_())
        .field("BlobSize", 0x20, u64_())
        .field("BlobOffset", 0x28, u64_())
        .build()
}
