//! Tasks handed out by the tasks master.

/// Whether a task asks for monster kills or item deliveries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TaskKind {
    Monsters,
    Items,
}

impl TaskKind {
    /// Code of the tasks master handing out this kind of task.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monsters => "monsters",
            Self::Items => "items",
        }
    }
}

/// A character's current task.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskProgress {
    pub code: String,
    pub kind: TaskKind,
    pub progress: u32,
    pub total: u32,
}

impl TaskProgress {
    pub fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.progress)
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= self.total
    }
}
