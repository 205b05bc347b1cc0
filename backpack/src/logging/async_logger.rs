//! Asynchronous logger (C7): wraps a [`Logger`] with a bounded queue and a
//! background drain worker, so producers are wait-free on the fast path.

use crate::logging::logger::{Log, Logger};
use crate::logging::{Level, Message, Record};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, SyncSender};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Behavior when the bounded queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// The call returns immediately; the record is counted as dropped.
    /// Default per spec §9.
    DropNewest,
    /// The call blocks until space is available.
    BlockUntilSpace,
}

/// Default bounded queue capacity (spec §4.7).
pub const DEFAULT_CAPACITY: usize = 4096;

/// Wraps a [`Logger`] with one drain worker thread. Timestamps are
/// captured on the producer side at enqueue time, so queue dwell time
/// never distorts the recorded instant.
pub struct AsyncLogger {
    inner: Arc<Logger>,
    sender: Mutex<Option<SyncSender<Record>>>,
    dropped: Arc<AtomicU64>,
    policy: OverflowPolicy,
    closed: AtomicBool,
    done: Arc<(Mutex<bool>, Condvar)>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl AsyncLogger {
    #[must_use]
    pub fn new(inner: Arc<Logger>, capacity: usize, policy: OverflowPolicy) -> Self {
        let (tx, rx) = mpsc::sync_channel::<Record>(capacity);
        let dropped = Arc::new(AtomicU64::new(0));
        let done = Arc::new((Mutex::new(false), Condvar::new()));

        let worker_inner = Arc::clone(&inner);
        let worker_dropped = Arc::clone(&dropped);
        let worker_done = Arc::clone(&done);
        let handle = thread::Builder::new()
            .name("backpack-async-logger".into())
            .spawn(move || drain(&rx, &worker_inner, &worker_dropped, &worker_done))
            .expect("spawning async logger drain thread");

        Self {
            inner,
            sender: Mutex::new(Some(tx)),
            dropped,
            policy,
            closed: AtomicBool::new(false),
            done,
            worker: Mutex::new(Some(handle)),
        }
    }

    #[must_use]
    pub fn with_default_capacity(inner: Arc<Logger>) -> Self {
        Self::new(inner, DEFAULT_CAPACITY, OverflowPolicy::DropNewest)
    }

    /// Records dropped so far due to a full queue under `DropNewest`.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Idempotent: the second and subsequent calls return immediately.
    /// Accepts no new records once called, then waits up to
    /// `drain_timeout` for the worker to flush the queue. If the deadline
    /// elapses first, the worker keeps draining in the background but
    /// this call returns without joining it — std::thread offers no way
    /// to preempt a thread mid-write, so records already past the
    /// deadline are not forcibly discarded, only no longer waited on.
    pub fn close(&self, drain_timeout: Duration) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.sender.lock().unwrap_or_else(|e| e.into_inner()).take();

        let (lock, cvar) = &*self.done;
        let guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        let (guard, _timed_out) = cvar
            .wait_timeout_while(guard, drain_timeout, |done| !*done)
            .unwrap_or_else(|e| e.into_inner());
        let drained = *guard;
        drop(guard);

        if drained && let Some(handle) = self.worker.lock().unwrap_or_else(|e| e.into_inner()).take() {
            let _ = handle.join();
        }
    }
}

impl Log for AsyncLogger {
    fn log(&self, level: Level, message: Message, trace_id: Option<&str>) {
        if !level.allows(self.inner.level()) || self.closed.load(Ordering::SeqCst) {
            return;
        }
        let message = self.inner.mask(message);
        let mut record = Record::new(level, message);
        if let Some(id) = trace_id {
            record = record.with_trace_id(id.to_string());
        }
        if let Some(version) = self.inner.gofr_version() {
            record = record.with_gofr_version(version.to_string());
        }

        let Some(sender) = self.sender.lock().unwrap_or_else(|e| e.into_inner()).clone() else {
            return;
        };
        match self.policy {
            OverflowPolicy::DropNewest => {
                if sender.try_send(record).is_err() {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                }
            }
            OverflowPolicy::BlockUntilSpace => {
                let _ = sender.send(record);
            }
        }
    }

    fn current_level(&self) -> Level {
        self.inner.level()
    }

    fn change_level(&self, level: Level) {
        self.inner.change_level(level);
    }

    /// Closes the queue and waits for the drain worker to write everything
    /// already enqueued, including a record logged via `fatal` moments ago
    /// (§9: termination must not race the write). Safe to call more than
    /// once — `close` is idempotent.
    fn flush(&self) {
        self.close(Duration::from_secs(5));
    }
}

impl Drop for AsyncLogger {
    fn drop(&mut self) {
        self.close(Duration::from_secs(5));
    }
}

fn drain(
    rx: &mpsc::Receiver<Record>,
    inner: &Logger,
    dropped: &AtomicU64,
    done: &(Mutex<bool>, Condvar),
) {
    let mut last_seen = 0u64;
    while let Ok(record) = rx.recv() {
        let dropped_now = dropped.load(Ordering::Relaxed);
        if dropped_now > last_seen {
            let delta = dropped_now - last_seen;
            last_seen = dropped_now;
            let summary = Record::new(
                Level::Warn,
                format!("async logger dropped {delta} record(s): queue was full"),
            );
            inner.write_record(&summary);
        }

        let is_fatal = record.level == Level::Fatal;
        inner.write_record(&record);
        if is_fatal {
            std::process::exit(1);
        }
    }

    let (lock, cvar) = done;
    *lock.lock().unwrap_or_else(|e| e.into_inner()) = true;
    cvar.notify_all();
}
