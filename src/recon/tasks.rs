// Fri Jan 17 2026 - Alex

use crate::config::AnalysisConfig;
use crate::memory::{Address, ByteSource};
use crate::profile::{OsFamily, Profile};
use crate::recon::boottime::{boot_time, task_start_time};
use crate::recon::ReconError;
use crate::utils::ScopedTimer;
use crate::view::TypedView;
use crate::walk::ChainWalk;
use serde::Serialize;

/// Summary of one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskInfo {
    pub offset: Address,
    pub name: String,
    pub pid: Option<i64>,
    pub uid: Option<u64>,
    /// Empty when the boot time or the task start time is unreadable.
    pub start_time: String,
}

impl TaskInfo {
    pub fn from_view(task: &TypedView<'_>, boot_epoch: Option<i64>) -> Self {
        Self {
            offset: task.offset(),
            name: task.read_string("comm", 16).unwrap_or_default(),
            pid: task.read_int("pid"),
            uid: task.read_uint("uid"),
            start_time: boot_epoch
                .map(|boot| task_start_time(task, boot))
                .unwrap_or_default(),
        }
    }
}

/// Tasks on the `init_task.tasks` ring, optionally limited to some PIDs.
pub struct TaskList<'a> {
    walk: ChainWalk<'a>,
    pids: Option<Vec<i64>>,
}

impl<'a> TaskList<'a> {
    pub fn new(profile: &'a Profile, source: &'a dyn ByteSource, config: &AnalysisConfig) -> Result<Self, ReconError> {
        profile.require_os(OsFamily::Linux)?;
        let init_task = profile
            .symbols()
            .kernel("init_task")
            .ok_or_else(|| ReconError::MissingSymbol("init_task".to_string()))?;
        let (tasks_offset, _) = profile
            .member("task_struct", "tasks")
            .ok_or_else(|| ReconError::MissingSymbol("task_struct.tasks".to_string()))?;

        let walk = ChainWalk::list_entries(profile, source, "task_struct", "tasks", init_task + tasks_offset)
            .with_limit(config.max_chain_nodes);
        Ok(Self {
            walk,
            pids: config.pid_filter.clone(),
        })
    }

    fn wanted(&self, task: &TypedView<'_>) -> bool {
        match &self.pids {
            Some(pids) => task.read_int("pid").map_or(false, |pid| pids.contains(&pid)),
            None => true,
        }
    }
}

impl<'a> Iterator for TaskList<'a> {
    type Item = TypedView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let task = self.walk.next()?;
            if self.wanted(&task) {
                return Some(task);
            }
        }
    }
}

/// Collects [`TaskInfo`] for every listed task. A missing boot time only
/// blanks the start times.
pub fn task_infos(
    profile: &Profile,
    source: &dyn ByteSource,
    config: &AnalysisConfig,
) -> Result<Vec<TaskInfo>, ReconError> {
    let _timer = ScopedTimer::new("task list");
    let boot = match boot_time(profile, source, config) {
        Ok(boot) => Some(boot),
        Err(e) => {
            log::warn!("task start times unavailable: {}", e);
            None
        }
    };
    Ok(TaskList::new(profile, source, config)?
        .map(|task| TaskInfo::from_view(&task, boot))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Architecture, ProfileError, ProfileMetadata, ProfileRegistry, SymbolTable};
    use crate::testing::{linux_profile, ImageBuilder};

    fn ring(image: &mut ImageBuilder, names: &[(&str, u32)]) -> Address {
        let tasks: Vec<Address> = names.iter().map(|_| image.alloc(0x80)).collect();
        for (i, (name, pid)) in names.iter().enumerate() {
            let next = tasks[(i + 1) % tasks.len()] + 0x10;
            image.write_ptr(tasks[i] + 0x10, next);
            image.write_u32(tasks[i] + 0x20, *pid);
            image.write_u32(tasks[i] + 0x24, 1000 + *pid);
            image.write_bytes(tasks[i] + 0x28, name.as_bytes());
        }
        tasks[0]
    }

    #[test]
    fn test_lists_tasks_after_init_task() {
        let mut image = ImageBuilder::new();
        let init = ring(&mut image, &[("swapper", 0), ("init", 1), ("sshd", 812)]);
        let profile = linux_profile(SymbolTable::new().with_kernel_symbol("init_task", init.as_u64()));
        let source = image.source();

        let infos = task_infos(&profile, &source, &AnalysisConfig::default()).unwrap();
        let names: Vec<(&str, Option<i64>)> = infos.iter().map(|t| (t.name.as_str(), t.pid)).collect();
        assert_eq!(names, vec![("init", Some(1)), ("sshd", Some(812))]);
        assert_eq!(infos[1].uid, Some(1812));
        // no time symbols in this image
        assert!(infos.iter().all(|t| t.start_time.is_empty()));
    }

    #[test]
    fn test_pid_filter() {
        let mut image = ImageBuilder::new();
        let init = ring(&mut image, &[("swapper", 0), ("init", 1), ("bash", 2), ("vim", 3)]);
        let profile = linux_profile(SymbolTable::new().with_kernel_symbol("init_task", init.as_u64()));
        let source = image.source();

        let config = AnalysisConfig::default().with_pid_filter(vec![3, 1]);
        let pids: Vec<i64> = TaskList::new(&profile, &source, &config)
            .unwrap()
            .filter_map(|t| t.read_int("pid"))
            .collect();
        assert_eq!(pids, vec![1, 3]);
    }

    #[test]
    fn test_requires_linux_and_init_task() {
        let image = ImageBuilder::new();
        let source = image.source();

        let profile = linux_profile(SymbolTable::new());
        assert!(matches!(
            TaskList::new(&profile, &source, &AnalysisConfig::default()),
            Err(ReconError::MissingSymbol(_))
        ));

        let windows = ProfileRegistry::with_builtin()
            .build(ProfileMetadata::windows(6, 1, Architecture::X64), SymbolTable::new())
            .unwrap();
        assert!(matches!(
            TaskList::new(&windows, &source, &AnalysisConfig::default()),
            Err(ReconError::Profile(ProfileError::WrongOs { .. }))
        ));
    }
}
