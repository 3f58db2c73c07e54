//! Handle Collection
//!
//! Owns the handles of one allocation run, keeps their sequences current and
//! drives the four hook phases. Hooks run synchronously in registration order;
//! the first failure stops the phase and is returned as
//! [`AllocError::Hook`].

mod hooks;

pub use hooks::{Hook, HookFn, Hooks, Phase};

use crate::error::{AllocError, Result};
use crate::handle::{Handle, HandleCall};
use crate::statistics::{StatMap, Statistics};
use crate::tag::Sequence;
use std::collections::HashMap;
use std::ops::Range;
use tracing::{debug, trace};

pub struct Collection {
    handles: Vec<Handle>,
    hooks: Hooks,
    statistics: Option<Statistics>,
    calls: Vec<HandleCall>,
    last_added: Range<usize>,
    running: Vec<Phase>,
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

impl Collection {
    /// An empty collection with the default Post sequencing stage.
    pub fn new() -> Self {
        let mut hooks = Hooks::default();
        hooks.add(Phase::Post, Hook::Sequence);
        Self {
            handles: Vec::new(),
            hooks,
            statistics: None,
            calls: Vec::new(),
            last_added: 0..0,
            running: Vec::new(),
        }
    }

    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    /// Mutable access for attaching payloads or ignore flags; the list
    /// itself only grows through [`Collection::add`].
    pub fn handles_mut(&mut self) -> &mut [Handle] {
        &mut self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn add_hook(&mut self, phase: Phase, hook: Hook) {
        self.hooks.add(phase, hook);
    }

    /// Attach `statistics` and recompute it after every `add` and once more
    /// in the After phase.
    pub fn enable_statistics(&mut self, statistics: Statistics) {
        self.statistics = Some(statistics);
        self.hooks.add(Phase::Post, Hook::Statistics);
        self.hooks.add(Phase::After, Hook::Statistics);
    }

    pub fn statistics(&self) -> Option<&Statistics> {
        self.statistics.as_ref()
    }

    pub fn report(&self) -> Option<&StatMap> {
        self.statistics.as_ref().map(Statistics::report)
    }

    /// Attach `calls` to every held handle and to every handle added later;
    /// each `add` then invokes the calls of the handles it appended.
    pub fn set_handle_calls(&mut self, calls: Vec<HandleCall>) {
        if calls.is_empty() {
            return;
        }
        for handle in &mut self.handles {
            handle.set_calls(calls.iter().cloned());
        }
        // one stage runs every attached call
        if self.calls.is_empty() {
            self.hooks.add(Phase::Post, Hook::HandleCalls);
        }
        self.calls.extend(calls);
    }

    /// Run Pre hooks, append `handles`, run Post hooks.
    ///
    /// Handles are appended before the Post phase runs and stay in the
    /// collection when a Post hook fails: there is no rollback.
    ///
    /// A Pre or Post hook cannot call `add`; the nested call is rejected
    /// with [`AllocError::Hook`]. Before and After hooks may add.
    pub fn add<I>(&mut self, handles: I) -> Result<()>
    where
        I: IntoIterator<Item = Handle>,
    {
        if let Some(&phase) = self
            .running
            .iter()
            .find(|p| matches!(p, Phase::Pre | Phase::Post))
        {
            return Err(AllocError::hook(
                phase,
                anyhow::anyhow!("add called while {} hooks are running", phase),
            ));
        }
        self.run_phase(Phase::Pre)?;
        let start = self.handles.len();
        for mut handle in handles {
            if !self.calls.is_empty() {
                handle.set_calls(self.calls.iter().cloned());
            }
            self.handles.push(handle);
        }
        self.last_added = start..self.handles.len();
        debug!(
            added = self.last_added.len(),
            held = self.handles.len(),
            "Added handles"
        );
        self.run_phase(Phase::Post)
    }

    /// Run every hook registered for `phase`, in registration order.
    pub fn run_phase(&mut self, phase: Phase) -> Result<()> {
        let mut hooks = std::mem::take(self.hooks.phase_mut(phase));
        let mut outcome = Ok(());
        self.running.push(phase);
        for hook in hooks.iter_mut() {
            trace!(%phase, hook = ?hook, "Running hook");
            if let Err(e) = self.run_hook(hook) {
                outcome = Err(AllocError::hook(phase, e));
                break;
            }
        }
        self.running.pop();
        // hooks registered while the phase ran go after the existing ones
        let registered = std::mem::replace(self.hooks.phase_mut(phase), hooks);
        self.hooks.phase_mut(phase).extend(registered);
        outcome
    }

    fn run_hook(&mut self, hook: &mut Hook) -> anyhow::Result<()> {
        match hook {
            Hook::Sequence => {
                self.sequence();
                Ok(())
            }
            Hook::Statistics => match &mut self.statistics {
                Some(statistics) => statistics.tally(&self.handles),
                None => Ok(()),
            },
            Hook::HandleCalls => {
                for handle in &self.handles[self.last_added.clone()] {
                    if !handle.ignored() {
                        handle.call()?;
                    }
                }
                Ok(())
            }
            Hook::Custom(f) => f(self),
        }
    }

    /// Distinct unit tag values, in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for handle in &self.handles {
            let value = handle.unit().value.as_str();
            if !seen.contains(&value) {
                seen.push(value);
            }
        }
        seen
    }

    /// Handles whose unit tag equals `value`, in collection order.
    pub fn category(&self, value: &str) -> Vec<&Handle> {
        self.handles
            .iter()
            .filter(|h| h.unit().value == value)
            .collect()
    }

    /// Number every handle 1..N within its category, keeping list order.
    pub fn sequence(&mut self) {
        let mut sizes: HashMap<String, usize> = HashMap::new();
        for handle in &self.handles {
            *sizes.entry(handle.unit().value.clone()).or_insert(0) += 1;
        }
        let mut positions: HashMap<String, usize> = HashMap::new();
        for handle in &mut self.handles {
            let value = handle.unit().value.clone();
            let count = sizes.get(&value).copied().unwrap_or(0);
            let position = positions.entry(value).or_insert(0);
            *position += 1;
            handle.set_sequence(Sequence::new(*position, count));
        }
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("handles", &self.handles.len())
            .field("hooks", &self.hooks)
            .field("statistics", &self.statistics)
            .finish()
    }
}
