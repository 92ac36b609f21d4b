//! Double-buffered producer/consumer log drain.
//!
//! Producers append into the active buffer under a single short-held mutex
//! guarding both the producer and consumer buffers, and never touch sink
//! I/O directly. A single background thread wakes on a swap-threshold
//! signal or a 3 second timeout, swaps the producer and consumer buffers
//! while still holding that mutex, then takes the consumer's content and
//! runs the drain function outside the lock so slow sinks never stall
//! producers.

use super::ring_buffer::{BufferConfig, RingBuffer};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Whether the producer buffer may grow without bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferPolicy {
    Unlimited,
    LimitSize { max_bytes: usize },
}

struct Buffers {
    producer: RingBuffer,
    consumer: RingBuffer,
}

struct Shared {
    buffers: Mutex<Buffers>,
    cond: Condvar,
    started: AtomicBool,
    policy: BufferPolicy,
    swap_factor: f64,
    buffer_config: BufferConfig,
}

impl Shared {
    fn needs_swap(&self, producer: &RingBuffer) -> bool {
        producer.readable_bytes() as f64 > producer.size() as f64 * self.swap_factor
    }
}

/// Owns the drain thread and the double buffer. Dropping it stops the
/// thread and joins it, draining anything already pushed.
pub struct AsyncWorker {
    shared: Arc<Shared>,
    thread: Option<JoinHandle<()>>,
}

impl AsyncWorker {
    pub fn new(
        buffer_config: BufferConfig,
        policy: BufferPolicy,
        mut drain: impl FnMut(&[u8]) + Send + 'static,
    ) -> Self {
        let shared = Arc::new(Shared {
            buffers: Mutex::new(Buffers {
                producer: RingBuffer::new(buffer_config),
                consumer: RingBuffer::new(buffer_config),
            }),
            cond: Condvar::new(),
            started: AtomicBool::new(true),
            policy,
            swap_factor: 0.5,
            buffer_config,
        });

        let worker_shared = Arc::clone(&shared);
        let thread = std::thread::spawn(move || {
            loop {
                let mut buffers = worker_shared.buffers.lock();
                worker_shared.cond.wait_for(&mut buffers, Duration::from_secs(3));

                // Drain on either the swap-threshold signal or the 3 second
                // timeout, as long as there's something pending — only an
                // empty producer (spurious wakeup, or genuinely idle) skips
                // a round. A stopped worker with nothing left to drain exits.
                if buffers.producer.is_empty() {
                    if worker_shared.started.load(Ordering::Acquire) {
                        continue;
                    }
                    break;
                }

                let Buffers { producer, consumer } = &mut *buffers;
                producer.swap(consumer);
                let ready =
                    std::mem::replace(&mut buffers.consumer, RingBuffer::new(worker_shared.buffer_config));
                drop(buffers);
                drain(ready.peek());
            }
        });

        AsyncWorker { shared, thread: Some(thread) }
    }

    /// Appends `data` to the producer buffer. Returns `false` if the worker
    /// has been stopped, or if a size-limited policy would be exceeded.
    pub fn push(&self, data: &[u8]) -> bool {
        let mut need_notify = false;
        {
            let mut buffers = self.shared.buffers.lock();
            if !self.shared.started.load(Ordering::Acquire) {
                return false;
            }
            if let BufferPolicy::LimitSize { max_bytes } = self.shared.policy {
                if buffers.producer.readable_bytes() + data.len() > max_bytes {
                    return false;
                }
            }
            buffers.producer.push(data);
            if self.shared.needs_swap(&buffers.producer) {
                need_notify = true;
            }
        }
        if need_notify {
            self.shared.cond.notify_one();
        }
        true
    }

    pub fn stop(&self) {
        self.shared.started.store(false, Ordering::Release);
        self.shared.cond.notify_all();
    }
}

impl Drop for AsyncWorker {
    fn drop(&mut self) {
        self.stop();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}
