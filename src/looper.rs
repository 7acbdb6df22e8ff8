//! Single-threaded main loop.
//!
//! The [`Looper`] is the host's message queue. Any thread can post a task
//! through a [`LooperHandle`]; tasks only ever run inside
//! [`Looper::dispatch`] on the thread that owns the looper. Device-open
//! callbacks are bound to it so they land on the main thread.

use crossbeam::channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, trace};
use std::marker::PhantomData;
use std::rc::Rc;
use std::time::Duration;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Owner side of the main loop. Not `Send`: it stays on the thread that
/// created it.
pub struct Looper {
    rx: Receiver<Task>,
    _main_thread: PhantomData<Rc<()>>,
}

/// Cloneable, thread-safe posting side of a [`Looper`].
#[derive(Clone)]
pub struct LooperHandle {
    tx: Sender<Task>,
}

impl Looper {
    pub fn new() -> (Looper, LooperHandle) {
        let (tx, rx) = unbounded();
        (
            Looper {
                rx,
                _main_thread: PhantomData,
            },
            LooperHandle { tx },
        )
    }

    /// Runs every task queued so far and returns how many ran.
    pub fn dispatch(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        if ran > 0 {
            trace!("Looper dispatched {} task(s)", ran);
        }
        ran
    }

    /// Waits up to `timeout` for a task, then drains the queue.
    pub fn dispatch_timeout(&self, timeout: Duration) -> usize {
        match self.rx.recv_timeout(timeout) {
            Ok(task) => {
                task();
                1 + self.dispatch()
            }
            Err(RecvTimeoutError::Timeout) => 0,
            Err(RecvTimeoutError::Disconnected) => {
                debug!("All looper handles dropped");
                0
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl LooperHandle {
    /// Queues `task` for the looper thread. Returns `false` if the looper
    /// is gone.
    pub fn post<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx.send(Box::new(task)).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_tasks_run_only_on_dispatch() {
        let (looper, handle) = Looper::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let c = counter.clone();
        assert!(handle.post(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert_eq!(looper.pending(), 1);
        assert_eq!(looper.dispatch(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(looper.dispatch(), 0);
    }

    #[test]
    fn test_tasks_posted_from_worker_run_on_owner_thread() {
        let (looper, handle) = Looper::new();
        let owner = thread::current().id();
        let ran_on = Arc::new(std::sync::Mutex::new(None));

        let slot = ran_on.clone();
        thread::spawn(move || {
            handle.post(move || {
                *slot.lock().unwrap() = Some(thread::current().id());
            });
        })
        .join()
        .unwrap();

        assert_eq!(looper.dispatch_timeout(Duration::from_secs(1)), 1);
        assert_eq!(*ran_on.lock().unwrap(), Some(owner));
    }

    #[test]
    fn test_post_after_looper_dropped() {
        let (looper, handle) = Looper::new();
        drop(looper);
        assert!(!handle.post(|| {}));
    }

    #[test]
    fn test_dispatch_timeout_without_tasks() {
        let (looper, _handle) = Looper::new();
        assert_eq!(looper.dispatch_timeout(Duration::from_millis(5)), 0);
    }
}
