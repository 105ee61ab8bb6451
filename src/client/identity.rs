use super::RequestTransaction;
use std::num::NonZeroU32;
use std::sync::{Mutex, PoisonError};

/// Client identity shared by every device session of one client.
///
/// Holds the stable `ClientID` and the `ClientTransactionID` counter. The
/// counter lock is held only while a value is captured and advanced, never
/// across a network call.
#[derive(Debug)]
pub struct ClientIdentity {
    client_id: u32,
    next_transaction_id: Mutex<NonZeroU32>,
}

impl Default for ClientIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientIdentity {
    /// Create an identity with a random client ID.
    pub fn new() -> Self {
        Self::with_client_id(rand::random())
    }

    /// Create an identity with the given client ID.
    pub const fn with_client_id(client_id: u32) -> Self {
        Self {
            client_id,
            next_transaction_id: Mutex::new(NonZeroU32::MIN),
        }
    }

    /// Stable client ID sent with every request.
    pub const fn client_id(&self) -> u32 {
        self.client_id
    }

    /// Capture the next transaction ID.
    ///
    /// IDs start at 1 and wrap back to 1 after `u32::MAX`.
    pub(crate) fn next_transaction(&self) -> RequestTransaction {
        let mut next_id = self
            .next_transaction_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let client_transaction_id = *next_id;
        *next_id = client_transaction_id.checked_add(1).unwrap_or(NonZeroU32::MIN);
        RequestTransaction {
            client_id: self.client_id,
            client_transaction_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ClientIdentity;
    use std::sync::Arc;

    #[test]
    fn ids_start_at_one_and_increase() {
        let identity = ClientIdentity::with_client_id(42);
        let ids = (0..5)
            .map(|_| identity.next_transaction())
            .map(|t| {
                assert_eq!(t.client_id, 42);
                t.client_transaction_id.get()
            })
            .collect::<Vec<_>>();
        assert_eq!(ids, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn concurrent_ids_are_unique_and_ordered() {
        const THREADS: u32 = 8;
        const PER_THREAD: u32 = 500;

        let identity = Arc::new(ClientIdentity::new());

        let per_thread = (0..THREADS)
            .map(|_| {
                let identity = Arc::clone(&identity);
                std::thread::spawn(move || {
                    (0..PER_THREAD)
                        .map(|_| identity.next_transaction().client_transaction_id.get())
                        .collect::<Vec<_>>()
                })
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().expect("worker thread panicked"))
            .collect::<Vec<_>>();

        for ids in &per_thread {
            assert!(
                ids.windows(2).all(|pair| pair[0] < pair[1]),
                "IDs observed by one thread must be strictly increasing"
            );
        }

        let mut all = per_thread.into_iter().flatten().collect::<Vec<_>>();
        all.sort_unstable();
        assert_eq!(all, (1..=THREADS * PER_THREAD).collect::<Vec<_>>());
    }

    #[test]
    fn counter_wraps_to_one() {
        let identity = ClientIdentity::with_client_id(0);
        *identity
            .next_transaction_id
            .lock()
            .expect("lock is not poisoned") = std::num::NonZeroU32::MAX;
        assert_eq!(identity.next_transaction().client_transaction_id.get(), u32::MAX);
        assert_eq!(identity.next_transaction().client_transaction_id.get(), 1);
    }
}
