//! Single-slot result hand-off between workers and the pool.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Sending half of a capacity-one channel.
///
/// The first publish fills the slot; later publishes are dropped without
/// blocking and never replace the stored value.
#[derive(Debug)]
pub struct ResultSlot<T> {
    tx: Sender<T>,
}

impl<T> Clone for ResultSlot<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T> ResultSlot<T> {
    /// Offers a value. Returns `true` if this call filled the slot.
    pub fn try_publish(&self, value: T) -> bool {
        match self.tx.try_send(value) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Creates a slot and the receiver that drains it.
pub fn result_slot<T>() -> (ResultSlot<T>, Receiver<T>) {
    let (tx, rx) = bounded(1);
    (ResultSlot { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_first_publish_wins() {
        let (slot, rx) = result_slot();
        assert!(slot.try_publish(1));
        assert!(!slot.try_publish(2));
        assert_eq!(rx.try_recv(), Ok(1));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_simultaneous_winners() {
        for _ in 0..100 {
            let (slot, rx) = result_slot();
            let barrier = Arc::new(Barrier::new(2));

            let handles: Vec<_> = (0..2)
                .map(|id| {
                    let slot = slot.clone();
                    let barrier = barrier.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        slot.try_publish(id)
                    })
                })
                .collect();
            drop(slot);

            let accepted = handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|&ok| ok)
                .count();

            assert_eq!(accepted, 1);
            assert_eq!(rx.iter().count(), 1);
        }
    }

    #[test]
    fn test_publish_after_receiver_dropped() {
        let (slot, rx) = result_slot();
        drop(rx);
        assert!(!slot.try_publish(7));
    }
}
