use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::ops::reminders::due_reminders;
use crate::store::{StoreError, TaskStore};

/// How often the reminder check runs
pub const CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// The notification-display collaborator. Permission state is managed by
/// the caller, not here.
pub trait Notifier {
    fn show(&self, title: &str, body: &str);
}

/// A tick from the reminder interval thread
#[derive(Debug)]
pub struct Tick;

/// Periodic tick source for the reminder check.
///
/// A background thread emits a `Tick` on a channel every `interval`; the
/// single control thread polls between events and runs the reminder pass
/// itself. The store is never touched from the background thread.
pub struct ReminderTicker {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    rx: Receiver<Tick>,
}

impl ReminderTicker {
    /// Start ticking every `interval`
    pub fn start(interval: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            // Sleep in short steps so stop() takes effect promptly
            let step = Duration::from_millis(25).min(interval);
            let mut elapsed = Duration::ZERO;
            while !stop_flag.load(Ordering::Relaxed) {
                thread::sleep(step);
                elapsed += step;
                if elapsed >= interval {
                    elapsed = Duration::ZERO;
                    if tx.send(Tick).is_err() {
                        break;
                    }
                }
            }
        });

        ReminderTicker {
            handle: Some(handle),
            stop,
            rx,
        }
    }

    /// Non-blocking poll for pending ticks. Returns how many intervals
    /// elapsed since the last poll (may be zero).
    pub fn poll(&self) -> usize {
        let mut ticks = 0;
        while self.rx.try_recv().is_ok() {
            ticks += 1;
        }
        ticks
    }

    /// Stop the interval thread. Called automatically on drop.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ReminderTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One reminder check: evaluate crossed thresholds at the store's current
/// time, show a notification for each, and flag it so it never refires.
/// Does nothing while notifications are disabled. Returns how many
/// reminders fired.
pub fn reminder_pass(
    store: &mut TaskStore,
    notifier: &dyn Notifier,
) -> Result<usize, StoreError> {
    if !store.settings().notifications_enabled {
        return Ok(0);
    }

    let due = due_reminders(store.tasks(), store.now());
    for reminder in &due {
        tracing::debug!(task = %reminder.task_id, "reminder fired");
        notifier.show(&reminder.title, reminder.kind.message());
        store.mark_reminded(&reminder.task_id, reminder.kind)?;
    }
    Ok(due.len())
}
