//! Out-of-band trade publication
//!
//! The matching thread is the sole producer into the ring; a dedicated
//! publisher thread is the sole consumer and invokes the subscriber
//! callback in enqueue order. The producer never blocks — on overflow the
//! event is dropped and counted, and sequence numbers on the events are
//! the consumer's only way to notice the gap.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};
use types::events::TradeEvent;

use crate::spsc::SpscRing;

/// Callback invoked on the publisher thread for every delivered event.
pub type EventCallback = Box<dyn Fn(&TradeEvent) + Send>;

/// Idle wait between empty polls of the ring.
const IDLE_SLEEP: Duration = Duration::from_micros(10);

const DEFAULT_QUEUE_CAPACITY: usize = 65_536;

/// Publishes trade events to a consumer callback on a dedicated thread.
pub struct MarketDataPublisher {
    queue: Arc<SpscRing<TradeEvent>>,
    running: Arc<AtomicBool>,
    events_published: AtomicU64,
    events_dropped: AtomicU64,
    publisher_thread: Option<thread::JoinHandle<()>>,
}

impl Default for MarketDataPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl MarketDataPublisher {
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            queue: Arc::new(SpscRing::with_capacity(queue_capacity)),
            running: Arc::new(AtomicBool::new(false)),
            events_published: AtomicU64::new(0),
            events_dropped: AtomicU64::new(0),
            publisher_thread: None,
        }
    }

    /// Start the publisher thread. A second call while running is a no-op.
    pub fn start(&mut self, callback: EventCallback) {
        if self.running.load(Ordering::Acquire) {
            return;
        }

        self.running.store(true, Ordering::Release);

        let queue = Arc::clone(&self.queue);
        let running = Arc::clone(&self.running);

        debug!(capacity = self.queue.capacity(), "starting market data publisher");

        self.publisher_thread = Some(thread::spawn(move || {
            while running.load(Ordering::Acquire) {
                match queue.try_pop() {
                    Some(event) => callback(&event),
                    None => thread::sleep(IDLE_SLEEP),
                }
            }

            // Deliver whatever the producer enqueued before stop.
            while let Some(event) = queue.try_pop() {
                callback(&event);
            }
        }));
    }

    /// Stop the publisher thread, draining remaining entries first.
    pub fn stop(&mut self) {
        if !self.running.load(Ordering::Acquire) {
            return;
        }

        self.running.store(false, Ordering::Release);

        if let Some(handle) = self.publisher_thread.take() {
            if handle.join().is_err() {
                warn!("market data publisher thread panicked");
            }
        }

        debug!(
            published = self.events_published.load(Ordering::Relaxed),
            dropped = self.events_dropped.load(Ordering::Relaxed),
            "stopped market data publisher"
        );
    }

    /// Enqueue a trade event for publication. Returns false (and counts a
    /// drop) when the publisher is stopped or the ring is full; never
    /// blocks the matching thread.
    pub fn publish_trade(&self, event: TradeEvent) -> bool {
        if !self.running.load(Ordering::Acquire) {
            self.events_dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        if self.queue.try_push(event).is_err() {
            self.events_dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        self.events_published.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Events accepted into the ring so far.
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    /// Events refused because the publisher was stopped or the ring full.
    pub fn events_dropped(&self) -> u64 {
        self.events_dropped.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Drop for MarketDataPublisher {
    fn drop(&mut self) {
        self.stop();
    }
}
