//! A bounded FIFO task queue backed by a fixed set of worker threads.
//!
//! Used specifically to ship `ERROR`/`FATAL` log records to a backup
//! address off the logging hot path: `enqueue` never blocks the caller, and
//! returns `None` when the queue is full or the pool has been stopped so
//! the caller can decide to drop the task rather than wait.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

type Task = Box<dyn FnOnce() + Send + 'static>;

struct Shared {
    started: AtomicBool,
}

pub struct TaskPool {
    sender: Sender<Task>,
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl TaskPool {
    pub fn new(worker_count: usize, queue_capacity: usize) -> Self {
        let (sender, receiver): (Sender<Task>, Receiver<Task>) = bounded(queue_capacity);
        let shared = Arc::new(Shared { started: AtomicBool::new(true) });

        let workers = (0..worker_count.max(1))
            .map(|_| {
                let receiver = receiver.clone();
                std::thread::spawn(move || {
                    while let Ok(task) = receiver.recv() {
                        task();
                    }
                })
            })
            .collect();

        TaskPool { sender, shared, workers }
    }

    /// Enqueues `task`. Returns `false` if the pool is stopped or the queue
    /// is full; the caller is expected to treat this as "best effort, drop
    /// it" rather than retry.
    pub fn enqueue(&self, task: impl FnOnce() + Send + 'static) -> bool {
        if !self.shared.started.load(Ordering::Acquire) {
            return false;
        }
        self.sender.try_send(Box::new(task)).is_ok()
    }

    pub fn stop(&self) {
        self.shared.started.store(false, Ordering::Release);
    }
}

impl Drop for TaskPool {
    fn drop(&mut self) {
        self.stop();
        drop(self.sender.clone());
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[test]
    fn enqueued_tasks_run() {
        let pool = TaskPool::new(2, 16);
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..10 {
            let counter = Arc::clone(&counter);
            assert!(pool.enqueue(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn stopped_pool_rejects_new_tasks() {
        let pool = TaskPool::new(1, 4);
        pool.stop();
        assert!(!pool.enqueue(|| {}));
    }

    #[test]
    fn full_queue_rejects_without_blocking() {
        // a single slow-draining worker and a one-slot queue: the first
        // task is taken immediately, the second fills the queue, and a
        // third must be rejected rather than block this thread.
        let pool = TaskPool::new(1, 1);
        assert!(pool.enqueue(|| std::thread::sleep(Duration::from_millis(300))));
        std::thread::sleep(Duration::from_millis(20));
        assert!(pool.enqueue(|| {}));
        assert!(!pool.enqueue(|| {}));
    }
}
