//! Deferred work tied to a run
//!
//! Callbacks scheduled during one run must not leak into the next. Every
//! task records the run generation it was scheduled under; run-scoped tasks
//! whose generation no longer matches are dropped unseen when they come due.

/// Work the frame loop performs later
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deferred {
    /// Forget the touch that began at `started_ms` if it never reported `touchend`
    ReleaseTouch { started_ms: f64 },
    /// Start fading the screen flash overlay
    FadeFlash,
    /// Remove the screen flash overlay
    ClearFlash,
    /// Hide the on-screen controls hint
    HideMobileGuide,
}

/// Lifetime of a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Cancelled by a restart
    Run,
    /// Survives restarts
    Session,
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due_ms: f64,
    generation: u32,
    scope: Scope,
    task: Deferred,
}

/// Small time-ordered task queue, polled once per frame
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, generation: u32, scope: Scope, task: Deferred) {
        self.pending.push(Scheduled {
            due_ms: now_ms + delay_ms,
            generation,
            scope,
            task,
        });
    }

    /// Remove and return every due task that still belongs to `generation`,
    /// in due order
    pub fn drain_due(&mut self, now_ms: f64, generation: u32) -> Vec<Deferred> {
        let (mut due, rest): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|s| s.due_ms <= now_ms);
        self.pending = rest;

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms));
        due.into_iter()
            .filter(|s| {
                let live = s.scope == Scope::Session || s.generation == generation;
                if !live {
                    log::debug!("Dropping stale {:?} from run {}", s.task, s.generation);
                }
                live
            })
            .map(|s| s.task)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_due_early() {
        let mut timers = Scheduler::new();
        timers.schedule(0.0, 100.0, 0, Scope::Run, Deferred::FadeFlash);
        assert!(timers.drain_due(99.0, 0).is_empty());
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.drain_due(100.0, 0), vec![Deferred::FadeFlash]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_due_order() {
        let mut timers = Scheduler::new();
        timers.schedule(0.0, 300.0, 0, Scope::Run, Deferred::ClearFlash);
        timers.schedule(0.0, 100.0, 0, Scope::Run, Deferred::FadeFlash);
        assert_eq!(
            timers.drain_due(500.0, 0),
            vec![Deferred::FadeFlash, Deferred::ClearFlash]
        );
    }

    #[test]
    fn test_stale_run_tasks_are_dropped() {
        let mut timers = Scheduler::new();
        timers.schedule(0.0, 100.0, 1, Scope::Run, Deferred::ClearFlash);
        timers.schedule(0.0, 5000.0, 1, Scope::Session, Deferred::HideMobileGuide);

        // A restart bumped the generation to 2
        assert!(timers.drain_due(200.0, 2).is_empty());
        assert_eq!(timers.drain_due(5000.0, 2), vec![Deferred::HideMobileGuide]);
    }
}
