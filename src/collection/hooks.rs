//! Hook stages for a [`Collection`](super::Collection)

use super::Collection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// When a hook runs relative to handle addition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Once, before any handle is added
    Before,
    /// Before each `add`
    Pre,
    /// After each `add`
    Post,
    /// Once, after the final `add` of a run
    After,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Before => "before",
            Phase::Pre => "pre",
            Phase::Post => "post",
            Phase::After => "after",
        };
        f.write_str(name)
    }
}

/// A user hook with mutable access to the collection
pub type HookFn = Box<dyn FnMut(&mut Collection) -> anyhow::Result<()> + Send>;

/// One stage of a phase
pub enum Hook {
    /// Categorize and sequence every held handle
    Sequence,
    /// Recompute the collection's statistics, when enabled
    Statistics,
    /// Invoke the per-handle calls of the handles appended by the last `add`
    HandleCalls,
    Custom(HookFn),
}

impl Hook {
    pub fn custom<F>(f: F) -> Self
    where
        F: FnMut(&mut Collection) -> anyhow::Result<()> + Send + 'static,
    {
        Hook::Custom(Box::new(f))
    }

    fn name(&self) -> &'static str {
        match self {
            Hook::Sequence => "sequence",
            Hook::Statistics => "statistics",
            Hook::HandleCalls => "handle_calls",
            Hook::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registered hooks, one ordered list per phase
#[derive(Debug, Default)]
pub struct Hooks {
    before: Vec<Hook>,
    pre: Vec<Hook>,
    post: Vec<Hook>,
    after: Vec<Hook>,
}

impl Hooks {
    pub(crate) fn phase_mut(&mut self, phase: Phase) -> &mut Vec<Hook> {
        match phase {
            Phase::Before => &mut self.before,
            Phase::Pre => &mut self.pre,
            Phase::Post => &mut self.post,
            Phase::After => &mut self.after,
        }
    }

    pub fn phase(&self, phase: Phase) -> &[Hook] {
        match phase {
            Phase::Before => &self.before,
            Phase::Pre => &self.pre,
            Phase::Post => &self.post,
            Phase::After => &self.after,
        }
    }

    pub fn add(&mut self, phase: Phase, hook: Hook) {
        self.phase_mut(phase).push(hook);
    }
}
