//! Per-identity submission locks.

use alloy::primitives::Address;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockTable = DashMap<Address, Arc<Mutex<()>>>;

/// Lock table keyed by signer identity.
///
/// Holding an identity's guard across authorization and submission means no
/// two requests served by this process can read the same pending nonce.
/// An entry lives only while some request holds or waits on it.
#[derive(Debug, Default, Clone)]
pub struct IdentityLocks {
    locks: Arc<LockTable>,
}

impl IdentityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of `identity`. FIFO among waiters.
    pub async fn acquire(&self, identity: Address) -> IdentityGuard {
        let lock = self
            .locks
            .entry(identity)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        IdentityGuard {
            identity,
            guard: Some(lock.lock_owned().await),
            locks: self.locks.clone(),
        }
    }

    /// Number of identities currently held or awaited.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive hold on one identity. Dropping it releases the lock and removes
/// the table entry once nobody else references it.
#[derive(Debug)]
pub struct IdentityGuard {
    identity: Address,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<LockTable>,
}

impl Drop for IdentityGuard {
    fn drop(&mut self) {
        // Release first so our own Arc no longer counts.
        self.guard.take();
        self.locks
            .remove_if(&self.identity, |_, lock| Arc::strong_count(lock) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_identity_is_exclusive() {
        let locks = IdentityLocks::new();
        let id = Address::repeat_byte(0x01);

        let guard = locks.acquire(id).await;
        let blocked = tokio::time::timeout(Duration::from_millis(50), locks.acquire(id)).await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired = tokio::time::timeout(Duration::from_millis(50), locks.acquire(id)).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn test_distinct_identities_do_not_block() {
        let locks = IdentityLocks::new();
        let _a = locks.acquire(Address::repeat_byte(0x01)).await;
        let b = tokio::time::timeout(
            Duration::from_millis(50),
            locks.acquire(Address::repeat_byte(0x02)),
        )
        .await
        .unwrap();
        assert_eq!(locks.len(), 2);

        drop(b);
        assert_eq!(locks.len(), 1);
    }

    #[tokio::test]
    async fn test_released_identity_leaves_table() {
        let locks = IdentityLocks::new();
        for byte in 0..32u8 {
            let _guard = locks.acquire(Address::repeat_byte(byte)).await;
        }
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_entry_survives_while_waiter_queued() {
        let locks = IdentityLocks::new();
        let id = Address::repeat_byte(0x07);

        let first = locks.acquire(id).await;
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(id).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(first);
        assert_eq!(locks.len(), 1);

        waiter.await.unwrap();
        assert!(locks.is_empty());
    }
}
