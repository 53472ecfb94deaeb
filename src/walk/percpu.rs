// Thu Jan 16 2026 - Alex

use crate::memory::{Address, ByteSource};
use crate::profile::{FieldType, Profile, ScalarKind, KERNEL_MODULE};
use crate::view::{LazyArray, TypedView};
use std::collections::BTreeSet;
use std::fmt;

/// Active CPU indices decoded from a cpumask word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuBitmap {
    active: BTreeSet<u32>,
}

impl CpuBitmap {
    /// Bit `i` set means CPU `i` is active. Only the low `width` bits count.
    pub fn decode(value: u64, width: u32) -> Self {
        let active = (0..width.min(64)).filter(|bit| value & (1u64 << bit) != 0).collect();
        Self { active }
    }

    pub fn from_indices<I: IntoIterator<Item = u32>>(indices: I) -> Self {
        Self {
            active: indices.into_iter().collect(),
        }
    }

    pub fn active(&self) -> &BTreeSet<u32> {
        &self.active
    }

    pub fn contains(&self, cpu: u32) -> bool {
        self.active.contains(&cpu)
    }

    pub fn max(&self) -> Option<u32> {
        self.active.iter().next_back().copied()
    }

    /// Number of slots up to and including the highest active CPU.
    pub fn span(&self) -> u32 {
        self.max().map(|m| m + 1).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl fmt::Display for CpuBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list: Vec<String> = self.active.iter().map(u32::to_string).collect();
        write!(f, "[{}]", list.join(","))
    }
}

/// One CPU's copy of a per-CPU variable.
#[derive(Debug, Clone)]
pub struct PerCpuSlot<'a> {
    pub cpu: u32,
    pub active: bool,
    pub offset: u64,
    pub view: TypedView<'a>,
}

/// Walks a per-CPU variable for every index up to the highest active CPU.
///
/// Inactive indices below the maximum are still read and yielded with
/// `active == false`; callers decide whether to use them.
pub struct PerCpuWalk<'a> {
    profile: &'a Profile,
    source: &'a dyn ByteSource,
    bitmap: CpuBitmap,
    offsets: LazyArray<'a>,
    variable: Address,
    type_name: String,
    next: u64,
}

impl<'a> PerCpuWalk<'a> {
    /// `offsets` is the base of `__per_cpu_offset`; `variable` is the
    /// address of the per-CPU symbol before relocation.
    pub fn new(
        profile: &'a Profile,
        source: &'a dyn ByteSource,
        bitmap: CpuBitmap,
        offsets: Address,
        variable: Address,
        type_name: &str,
    ) -> Option<Self> {
        let offsets = LazyArray::new(
            profile,
            source,
            FieldType::scalar(ScalarKind::ULong),
            offsets,
            u64::from(bitmap.span()),
        )?;
        Some(Self {
            profile,
            source,
            bitmap,
            offsets,
            variable,
            type_name: type_name.to_string(),
            next: 0,
        })
    }

    /// Resolves `__per_cpu_offset` and the variable from the profile's symbols.
    pub fn from_symbols(
        profile: &'a Profile,
        source: &'a dyn ByteSource,
        bitmap: CpuBitmap,
        variable: &str,
        type_name: &str,
    ) -> Option<Self> {
        let offsets = profile.symbols().kernel("__per_cpu_offset")?;
        let variable = profile.symbols().per_cpu(variable, KERNEL_MODULE)?;
        Self::new(profile, source, bitmap, offsets, variable, type_name)
    }

    pub fn bitmap(&self) -> &CpuBitmap {
        &self.bitmap
    }
}

impl<'a> Iterator for PerCpuWalk<'a> {
    type Item = PerCpuSlot<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.offsets.len() {
            let cpu = self.next;
            self.next += 1;
            let Some(offset) = self.offsets.uint_at(cpu) else {
                log::debug!("__per_cpu_offset[{}] unreadable", cpu);
                continue;
            };
            let cpu = cpu as u32;
            let view = self.profile.view(&self.type_name, self.variable + offset, self.source);
            return Some(PerCpuSlot {
                cpu,
                active: self.bitmap.contains(cpu),
                offset,
                view,
            });
        }
        None
    }
}
