// Fri Jan 17 2026 - Alex

use crate::config::AnalysisConfig;
use crate::memory::ByteSource;
use crate::profile::{FieldType, OsFamily, Profile, ScalarKind};
use crate::recon::ReconError;
use crate::walk::{CpuBitmap, PerCpuWalk};

const MASK_SYMBOLS: [&str; 2] = ["cpu_online_bits", "cpu_present_map"];

/// CPUs marked online, from `cpu_online_bits` or else `cpu_present_map`.
pub fn online_cpus(profile: &Profile, source: &dyn ByteSource, config: &AnalysisConfig) -> Result<CpuBitmap, ReconError> {
    profile.require_os(OsFamily::Linux)?;
    let width = config
        .cpu_bitmap_bits
        .unwrap_or((profile.pointer_size() * 8) as u32);
    let word = FieldType::scalar(ScalarKind::ULong);

    // The first symbol present decides; a present but unreadable mask is not
    // retried with the next one.
    let symbol = MASK_SYMBOLS
        .iter()
        .find(|name| profile.symbols().kernel(name).is_some())
        .ok_or(ReconError::CpuMaskUnavailable)?;
    let value = profile
        .symbol_value(symbol, &word, source)
        .as_uint()
        .ok_or(ReconError::CpuMaskUnavailable)?;

    let bitmap = CpuBitmap::decode(value, width);
    log::debug!("{} = {:#x}, cpus {}", symbol, value, bitmap);
    Ok(bitmap)
}

/// Every CPU's copy of the per-CPU variable `variable` of type `type_name`.
pub fn per_cpu_var<'a>(
    profile: &'a Profile,
    source: &'a dyn ByteSource,
    config: &AnalysisConfig,
    variable: &str,
    type_name: &str,
) -> Result<PerCpuWalk<'a>, ReconError> {
    let bitmap = online_cpus(profile, source, config)?;
    if profile.symbols().kernel("__per_cpu_offset").is_none() {
        return Err(ReconError::MissingSymbol("__per_cpu_offset".to_string()));
    }
    PerCpuWalk::from_symbols(profile, source, bitmap, variable, type_name)
        .ok_or_else(|| ReconError::MissingSymbol(variable.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SymbolTable;
    use crate::testing::{linux_profile, ImageBuilder};

    #[test]
    fn test_online_bits_preferred() {
        let mut image = ImageBuilder::new();
        let online = image.alloc(8);
        let present = image.alloc(8);
        image.write_u64(online, 0b101);
        image.write_u64(present, 0b1111);
        let profile = linux_profile(
            SymbolTable::new()
                .with_kernel_symbol("cpu_online_bits", online.as_u64())
                .with_kernel_symbol("cpu_present_map", present.as_u64()),
        );
        let source = image.source();

        let cpus = online_cpus(&profile, &source, &AnalysisConfig::default()).unwrap();
        assert_eq!(cpus, CpuBitmap::from_indices([0, 2]));
    }

    #[test]
    fn test_present_map_fallback_and_width() {
        let mut image = ImageBuilder::new();
        let present = image.alloc(8);
        image.write_u64(present, 0x301);
        let profile = linux_profile(SymbolTable::new().with_kernel_symbol("cpu_present_map", present.as_u64()));
        let source = image.source();

        let full = online_cpus(&profile, &source, &AnalysisConfig::default()).unwrap();
        assert_eq!(full, CpuBitmap::from_indices([0, 8, 9]));
        let narrow = online_cpus(&profile, &source, &AnalysisConfig::default().with_cpu_bitmap_bits(8)).unwrap();
        assert_eq!(narrow, CpuBitmap::from_indices([0]));
    }

    #[test]
    fn test_no_mask_symbol() {
        let profile = linux_profile(SymbolTable::new());
        let image = ImageBuilder::new();
        let source = image.source();
        assert!(matches!(
            online_cpus(&profile, &source, &AnalysisConfig::default()),
            Err(ReconError::CpuMaskUnavailable)
        ));
    }

    #[test]
    fn test_per_cpu_var_reads_through_gaps() {
        let mut image = ImageBuilder::new();
        let online = image.alloc(8);
        let offsets = image.alloc(8 * 3);
        let variable = image.alloc(0x80);
        image.write_u64(online, 0b101);
        for cpu in 0..3u64 {
            image.write_u64(offsets + cpu * 8, 0x1000 * cpu);
        }
        let profile = linux_profile(
            SymbolTable::new()
                .with_kernel_symbol("cpu_online_bits", online.as_u64())
                .with_kernel_symbol("__per_cpu_offset", offsets.as_u64())
                .with_kernel_symbol("runqueues", variable.as_u64()),
        );
        let source = image.source();

        let slots: Vec<(u32, bool, u64)> = per_cpu_var(&profile, &source, &AnalysisConfig::default(), "runqueues", "task_struct")
            .unwrap()
            .map(|s| (s.cpu, s.active, s.offset))
            .collect();
        assert_eq!(slots, vec![(0, true, 0), (1, false, 0x1000), (2, true, 0x2000)]);
    }
}
