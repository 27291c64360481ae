//! Task triggers: build actions bound to IDE lifecycle phases
//! (`taskTriggersConfig`).

use idex_core::{MapConvertible, SettingsMap, TaskRef};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Lifecycle phase at which registered tasks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    BeforeSync,
    AfterSync,
    BeforeBuild,
    AfterBuild,
    BeforeRebuild,
    AfterRebuild,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::BeforeSync,
        Phase::AfterSync,
        Phase::BeforeBuild,
        Phase::AfterBuild,
        Phase::BeforeRebuild,
        Phase::AfterRebuild,
    ];

    /// Key used for this phase in the exported document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::BeforeSync => "beforeSync",
            Phase::AfterSync => "afterSync",
            Phase::BeforeBuild => "beforeBuild",
            Phase::AfterBuild => "afterBuild",
            Phase::BeforeRebuild => "beforeRebuild",
            Phase::AfterRebuild => "afterRebuild",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown lifecycle phase '{}'. Valid values: beforeSync, afterSync, beforeBuild, afterBuild, beforeRebuild, afterRebuild",
                    s
                )
            })
    }
}

/// Append-only table of tasks per lifecycle phase.
///
/// Registration order within a phase is preserved across calls. Tasks are
/// not checked for existence; the consumer resolves them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskTriggers {
    triggers: BTreeMap<Phase, Vec<TaskRef>>,
}

impl TaskTriggers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<I>(&mut self, phase: Phase, tasks: I) -> &mut Self
    where
        I: IntoIterator<Item = TaskRef>,
    {
        let registered = self.triggers.entry(phase).or_default();
        registered.extend(tasks);
        self
    }

    pub fn before_sync<I: IntoIterator<Item = TaskRef>>(&mut self, tasks: I) -> &mut Self {
        self.add(Phase::BeforeSync, tasks)
    }

    pub fn after_sync<I: IntoIterator<Item = TaskRef>>(&mut self, tasks: I) -> &mut Self {
        self.add(Phase::AfterSync, tasks)
    }

    pub fn before_build<I: IntoIterator<Item = TaskRef>>(&mut self, tasks: I) -> &mut Self {
        self.add(Phase::BeforeBuild, tasks)
    }

    pub fn after_build<I: IntoIterator<Item = TaskRef>>(&mut self, tasks: I) -> &mut Self {
        self.add(Phase::AfterBuild, tasks)
    }

    pub fn before_rebuild<I: IntoIterator<Item = TaskRef>>(&mut self, tasks: I) -> &mut Self {
        self.add(Phase::BeforeRebuild, tasks)
    }

    pub fn after_rebuild<I: IntoIterator<Item = TaskRef>>(&mut self, tasks: I) -> &mut Self {
        self.add(Phase::AfterRebuild, tasks)
    }

    pub fn tasks(&self, phase: Phase) -> &[TaskRef] {
        self.triggers.get(&phase).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.values().all(Vec::is_empty)
    }
}

impl MapConvertible for TaskTriggers {
    fn to_map(&self) -> SettingsMap {
        let mut map = SettingsMap::new();
        for (phase, tasks) in &self.triggers {
            if tasks.is_empty() {
                continue;
            }
            let entries = tasks
                .iter()
                .map(|task| json!({ "taskPath": task.path(), "projectPath": task.owner_path() }))
                .collect();
            map.insert(phase.as_str().to_string(), Value::Array(entries));
        }
        map
    }
}
