// Fri Jan 17 2026 - Alex

use crate::config::AnalysisConfig;
use crate::memory::ByteSource;
use crate::profile::{OsFamily, Profile};
use crate::recon::ReconError;
use crate::view::TypedView;
use chrono::{Local, TimeZone};
use std::fmt;

pub const NSEC_PER_SEC: i64 = 1_000_000_000;

const START_TIME_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timespec {
    pub tv_sec: i64,
    pub tv_nsec: i64,
}

impl Timespec {
    pub fn new(tv_sec: i64, tv_nsec: i64) -> Self {
        Self { tv_sec, tv_nsec }
    }

    pub fn from_nanos(nanos: i64) -> Self {
        Self::new(nanos / NSEC_PER_SEC, nanos % NSEC_PER_SEC)
    }

    /// Reads a `timespec` view.
    pub fn read(view: &TypedView<'_>) -> Option<Self> {
        Some(Self::new(view.read_int("tv_sec")?, view.read_int("tv_nsec")?))
    }

    /// Carries or borrows so that `tv_nsec` lies in `[0, NSEC_PER_SEC)`.
    pub fn normalized(self) -> Self {
        let Self { mut tv_sec, mut tv_nsec } = self;
        tv_sec = tv_sec.wrapping_add(tv_nsec.div_euclid(NSEC_PER_SEC));
        tv_nsec = tv_nsec.rem_euclid(NSEC_PER_SEC);
        Self { tv_sec, tv_nsec }
    }
}

/// Where the wall-to-monotonic offset and the sleep time were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    /// `wall_to_monotonic` and `total_sleep_time` globals.
    Globals,
    /// `wall_to_monotonic` only; sleep time from `init_task` CPU ticks.
    InitTaskTicks,
    /// The aggregate `timekeeper` structure.
    Timekeeper,
}

impl fmt::Display for TimeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeSource::Globals => "globals",
            TimeSource::InitTaskTicks => "init_task ticks",
            TimeSource::Timekeeper => "timekeeper",
        };
        f.write_str(name)
    }
}

fn sh_div(nom: u64, den: u64, lsh: u32) -> Option<u64> {
    let whole = nom.checked_div(den)?.checked_shl(lsh)?;
    let rest = (nom % den).checked_shl(lsh)?.checked_add(den / 2)? / den;
    whole.checked_add(rest)
}

/// Timer ticks per second scaled by 2^8, as the PIT actually delivers them.
/// `None` when `hz` is zero or too large for `clock_tick_rate`.
pub fn acthz(clock_tick_rate: u64, hz: u64) -> Option<u64> {
    let latch = clock_tick_rate.checked_add(hz / 2)?.checked_div(hz)?;
    sh_div(clock_tick_rate, latch, 8)
}

/// Nanoseconds per timer tick.
pub fn tick_nsec(hz: u64, clock_tick_rate: u64) -> Option<u64> {
    sh_div(1_000_000 * 1000, acthz(clock_tick_rate, hz)?, 8)
}

fn timespec_at(profile: &Profile, source: &dyn ByteSource, symbol: &str) -> Result<Timespec, ReconError> {
    profile
        .symbol_view(symbol, "timespec", source)
        .and_then(|view| Timespec::read(&view))
        .ok_or(ReconError::BootTimeUnavailable)
}

/// The wall-to-monotonic offset and the accumulated sleep time.
pub fn time_vars(
    profile: &Profile,
    source: &dyn ByteSource,
    config: &AnalysisConfig,
) -> Result<(TimeSource, Timespec, Timespec), ReconError> {
    profile.require_os(OsFamily::Linux)?;
    let symbols = profile.symbols();
    let has_wall = symbols.kernel("wall_to_monotonic").is_some();
    let has_sleep = symbols.kernel("total_sleep_time").is_some();

    if has_wall && has_sleep {
        let wall = timespec_at(profile, source, "wall_to_monotonic")?;
        let sleep = timespec_at(profile, source, "total_sleep_time")?;
        return Ok((TimeSource::Globals, wall, sleep));
    }

    if has_wall {
        let wall = timespec_at(profile, source, "wall_to_monotonic")?;
        let init_task = profile
            .symbol_view("init_task", "task_struct", source)
            .ok_or_else(|| ReconError::MissingSymbol("init_task".to_string()))?;
        let ticks = init_task
            .read_uint("utime")
            .zip(init_task.read_uint("stime"))
            .map(|(u, s)| u.wrapping_add(s))
            .ok_or(ReconError::BootTimeUnavailable)?;
        let tick = tick_nsec(config.hz, config.clock_tick_rate).ok_or(ReconError::BootTimeUnavailable)?;
        let nanos = ticks.wrapping_mul(tick);
        let sleep = Timespec::new((nanos / NSEC_PER_SEC as u64) as i64, (nanos % NSEC_PER_SEC as u64) as i64);
        return Ok((TimeSource::InitTaskTicks, wall, sleep));
    }

    let timekeeper = profile
        .symbol_view("timekeeper", "timekeeper", source)
        .ok_or_else(|| ReconError::MissingSymbol("timekeeper".to_string()))?;
    let wall = Timespec::read(&timekeeper.member("wall_to_monotonic")).ok_or(ReconError::BootTimeUnavailable)?;
    let sleep = Timespec::read(&timekeeper.member("total_sleep_time")).ok_or(ReconError::BootTimeUnavailable)?;
    Ok((TimeSource::Timekeeper, wall, sleep))
}

/// Boot instant from the two offsets. Both are stored as "now back to boot",
/// so their sum is negated before normalising.
pub fn combine(wall: Timespec, sleep: Timespec) -> Timespec {
    let secs = wall.tv_sec.wrapping_add(sleep.tv_sec);
    let nsecs = wall.tv_nsec.wrapping_add(sleep.tv_nsec);
    Timespec::new(secs.wrapping_neg(), nsecs.wrapping_neg()).normalized()
}

/// Seconds since the epoch at which the kernel booted. Sub-second precision
/// is dropped.
pub fn boot_time(profile: &Profile, source: &dyn ByteSource, config: &AnalysisConfig) -> Result<i64, ReconError> {
    let (time_source, wall, sleep) = time_vars(profile, source, config)?;
    let boot = combine(wall, sleep);
    log::debug!("boot time from {}: {}", time_source, boot.tv_sec);
    Ok(boot.tv_sec)
}

/// Formats epoch seconds in `tz`; out-of-range values give an empty string.
pub fn format_epoch<Tz>(secs: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match tz.timestamp_opt(secs, 0).single() {
        Some(time) => time.format(START_TIME_FORMAT).to_string(),
        None => String::new(),
    }
}

/// Start instant of `task` in epoch seconds.
pub fn task_start_epoch(task: &TypedView<'_>, boot_epoch: i64) -> Option<i64> {
    let start = Timespec::read(&task.member("start_time"))?;
    boot_epoch.checked_add(start.tv_sec)
}

/// Local calendar start time of `task`, or an empty string.
pub fn task_start_time(task: &TypedView<'_>, boot_epoch: i64) -> String {
    task_start_epoch(task, boot_epoch)
        .map(|secs| format_epoch(secs, &Local))
        .unwrap_or_default()
}
