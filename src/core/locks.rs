//! Per-card exclusive locks.
//!
//! Two cards participate in every transfer, and concurrent transfers may
//! touch overlapping cards. Both locks are always acquired in ascending
//! card-id order, so two transfers referencing the same pair in opposite
//! directions cannot deadlock, and the limit check plus balance mutation
//! run under the same exclusivity.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Guards held for the duration of a transfer's check-and-mutate section.
///
/// Dropping releases both locks.
pub struct PairGuard {
    _first: OwnedMutexGuard<()>,
    _second: OwnedMutexGuard<()>,
}

/// Lazily-populated table of per-card async mutexes.
#[derive(Debug, Default)]
pub struct CardLocks {
    locks: Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
}

impl CardLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, card_id: i64) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(locks.entry(card_id).or_default())
    }

    /// Locks both cards exclusively, in ascending card-id order.
    ///
    /// The two ids must differ; the engine rejects self-transfers before
    /// reaching this point.
    pub async fn lock_pair(&self, a: i64, b: i64) -> PairGuard {
        debug_assert_ne!(a, b);
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let first = self.handle(low).lock_owned().await;
        let second = self.handle(high).lock_owned().await;
        PairGuard {
            _first: first,
            _second: second,
        }
    }

}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_opposite_direction_pairs_do_not_deadlock() {
        let locks = Arc::new(CardLocks::new());

        let a = Arc::clone(&locks);
        let forward = tokio::spawn(async move {
            for _ in 0..100 {
                let _guard = a.lock_pair(1, 2).await;
            }
        });
        let b = Arc::clone(&locks);
        let backward = tokio::spawn(async move {
            for _ in 0..100 {
                let _guard = b.lock_pair(2, 1).await;
            }
        });

        timeout(Duration::from_secs(5), async {
            forward.await.unwrap();
            backward.await.unwrap();
        })
        .await
        .expect("lock ordering must prevent deadlock");
    }

    #[tokio::test]
    async fn test_overlapping_pairs_exclude_each_other() {
        let locks = Arc::new(CardLocks::new());
        let guard = locks.lock_pair(1, 2).await;

        let contended = Arc::clone(&locks);
        let waiter = tokio::spawn(async move {
            let _guard = contended.lock_pair(2, 3).await;
        });

        // The shared card keeps the second pair waiting
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(guard);
        timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}
