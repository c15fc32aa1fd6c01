//! Bounded event queue shared between host callbacks and the frame loop.
//!
//! The producer side ([`EventSender`]) is cheap to clone and may be moved to
//! any thread; pushing never blocks. The consumer side ([`EventQueue`]) is
//! owned by a single input device and drained once per frame.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Maximum number of undrained events per device queue.
pub const EVENT_QUEUE_CAPACITY: usize = u8::MAX as usize;

fn try_push<E>(tx: &Sender<E>, event: E) -> bool {
    match tx.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::trace!(pending = tx.len(), "event queue full, event dropped");
            false
        }
        Err(TrySendError::Disconnected(_)) => false,
    }
}

fn discard_pending<E>(rx: &Receiver<E>) -> usize {
    let pending = rx.len();
    rx.try_iter().take(pending).count()
}

/// Producer handle for an [`EventQueue`].
#[derive(Debug)]
pub struct EventSender<E> {
    tx: Sender<E>,
    rx: Receiver<E>,
}

impl<E> Clone for EventSender<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }
}

impl<E> EventSender<E> {
    /// Append an event to the queue.
    ///
    /// Returns `false` when the queue is full; the event is dropped in that
    /// case.
    pub fn push(&self, event: E) -> bool {
        try_push(&self.tx, event)
    }

    /// Discard every event queued at the time of the call.
    ///
    /// Lets a host drop stale input at the moment it notices focus loss,
    /// without waiting for the consumer. Returns the number dropped.
    pub fn clear(&self) -> usize {
        discard_pending(&self.rx)
    }

    /// Number of events currently waiting.
    #[inline]
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    /// Whether the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }
}

/// Consumer side of a bounded FIFO of raw input events.
#[derive(Debug)]
pub struct EventQueue<E> {
    tx: Sender<E>,
    rx: Receiver<E>,
    capacity: usize,
}

impl<E> EventQueue<E> {
    /// Create a queue holding at most [`EVENT_QUEUE_CAPACITY`] events.
    pub fn new() -> Self {
        Self::with_capacity(EVENT_QUEUE_CAPACITY)
    }

    /// Create a queue with a custom bound.
    ///
    /// A capacity of zero would turn the channel into a rendezvous point, so
    /// it is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = bounded(capacity);
        Self { tx, rx, capacity }
    }

    /// Get a producer handle for this queue.
    pub fn sender(&self) -> EventSender<E> {
        EventSender {
            tx: self.tx.clone(),
            rx: self.rx.clone(),
        }
    }

    /// Append an event from the consumer side. Same contract as
    /// [`EventSender::push`].
    pub fn push(&self, event: E) -> bool {
        try_push(&self.tx, event)
    }

    /// Remove and return every event queued at the time of the call, oldest
    /// first.
    ///
    /// Events pushed by other threads while draining are left for the next
    /// call, so one drain is bounded by the queue capacity.
    pub fn drain_all(&self) -> Vec<E> {
        let pending = self.rx.len();
        let mut events = Vec::with_capacity(pending);
        for _ in 0..pending {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(_) => break,
            }
        }
        events
    }

    /// Discard every queued event without applying it.
    ///
    /// Returns the number of events dropped.
    pub fn clear(&self) -> usize {
        discard_pending(&self.rx)
    }

    /// Number of events currently waiting.
    #[inline]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Maximum number of events the queue holds.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_fifo_order() {
        let queue = EventQueue::new();
        for i in 0..10 {
            assert!(queue.push(i));
        }
        assert_eq!(queue.drain_all(), (0..10).collect::<Vec<_>>());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_overflow_rejects_extra_event() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        for i in 0..EVENT_QUEUE_CAPACITY {
            assert!(sender.push(i), "push {i} should fit");
        }
        assert!(!sender.push(EVENT_QUEUE_CAPACITY));
        assert_eq!(queue.len(), 255);

        let drained = queue.drain_all();
        assert_eq!(drained.len(), 255);
        assert_eq!(drained.last(), Some(&254));

        // Room again after the drain.
        assert!(sender.push(0));
    }

    #[test]
    fn test_clear_discards() {
        let queue = EventQueue::new();
        queue.push('a');
        queue.push('b');
        assert_eq!(queue.clear(), 2);
        assert!(queue.drain_all().is_empty());
    }

    #[test]
    fn test_sender_clear_discards_pending() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        sender.push(1);
        sender.push(2);
        assert_eq!(sender.clear(), 2);

        sender.push(3);
        assert_eq!(queue.drain_all(), vec![3]);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let queue: EventQueue<u8> = EventQueue::with_capacity(0);
        assert_eq!(queue.capacity(), 1);
        assert!(queue.push(1));
        assert!(!queue.push(2));
    }

    #[test]
    fn test_concurrent_producers() {
        let queue = EventQueue::with_capacity(1000);
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let sender = queue.sender();
                thread::spawn(move || {
                    for i in 0..100 {
                        assert!(sender.push((t, i)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let events = queue.drain_all();
        assert_eq!(events.len(), 400);
        // Per-producer order survives interleaving.
        for t in 0..4 {
            let seq: Vec<_> = events.iter().filter(|(p, _)| *p == t).map(|(_, i)| *i).collect();
            assert_eq!(seq, (0..100).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_drain_while_producers_push() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 2_000;

        let queue = EventQueue::new();
        let handles: Vec<_> = (0..PRODUCERS)
            .map(|t| {
                let sender = queue.sender();
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        // Retry on overflow so the total stays exact.
                        while !sender.push((t, i)) {
                            thread::yield_now();
                        }
                    }
                })
            })
            .collect();

        let mut next = [0usize; PRODUCERS];
        let mut total = 0;
        while total < PRODUCERS * PER_PRODUCER {
            let batch = queue.drain_all();
            assert!(batch.len() <= EVENT_QUEUE_CAPACITY);
            total += batch.len();
            for (t, i) in batch {
                assert_eq!(i, next[t], "producer {t} out of order");
                next[t] += 1;
            }
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(total, PRODUCERS * PER_PRODUCER);
        assert!(next.iter().all(|n| *n == PER_PRODUCER));
        assert!(queue.drain_all().is_empty());
    }
}
