//! Cancellable delayed tasks on the host's clock
//!
//! The host drives time: it calls [`Scheduler::poll`] with its own timestamp
//! (the frame callback's clock in the browser, a simulated clock in tests).
//! At most one timer per [`Task`] is alive; scheduling a task again replaces
//! the old timer, whose handle then stops being pending.

/// Work that can be deferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Leave `RoundOver` and lay out the next round
    StartNextRound,
}

/// Identifies one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Timer {
    handle: TimerHandle,
    due_ms: f64,
    task: Task,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    next_id: u64,
    /// Sorted by due time
    pending: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` once the clock reaches `due_ms`, replacing any timer
    /// already pending for the same task
    pub fn schedule(&mut self, task: Task, due_ms: f64) -> TimerHandle {
        let replaced = self.cancel_task(task);
        if replaced > 0 {
            log::debug!("Replaced pending {:?} timer", task);
        }

        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        let at = self.pending.partition_point(|t| t.due_ms <= due_ms);
        self.pending.insert(at, Timer { handle, due_ms, task });
        handle
    }

    /// Drop one timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.handle != handle);
        self.pending.len() != before
    }

    /// Drop every timer for `task`
    pub fn cancel_task(&mut self, task: Task) -> usize {
        let before = self.pending.len();
        self.pending.retain(|t| t.task != task);
        before - self.pending.len()
    }

    /// Drop everything (teardown)
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|t| t.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest due time, if anything is pending
    pub fn next_due(&self) -> Option<f64> {
        self.pending.first().map(|t| t.due_ms)
    }

    /// Remove and return every task due at `now_ms`, earliest first
    pub fn poll(&mut self, now_ms: f64) -> Vec<Task> {
        let due = self.pending.partition_point(|t| t.due_ms <= now_ms);
        self.pending.drain(..due).map(|t| t.task).collect()
    }
}
