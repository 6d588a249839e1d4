//! Response routing for pending requests.
//!
//! Before a request is written, its ID is registered to obtain a oneshot
//! receiver. The reader task routes each incoming response to the matching
//! sender; the requester awaits the receiver without holding any lock.
//!
//! Once the reader task stops, the router is closed: waiters are dropped and
//! later registrations fail with [`ShowTypeError::ConnectionClosed`].

use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::oneshot;

use super::request_id::RequestId;
use crate::error::{ShowTypeError, ShowTypeResult};

#[derive(Default)]
pub(crate) struct ResponseRouter {
    pending: DashMap<RequestId, oneshot::Sender<Value>>,
    closed: AtomicBool,
}

impl ResponseRouter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a pending request.
    ///
    /// Fails if the router is closed or a request with this ID is already
    /// pending.
    pub(crate) fn register(&self, id: RequestId) -> ShowTypeResult<oneshot::Receiver<Value>> {
        if self.is_closed() {
            return Err(ShowTypeError::ConnectionClosed);
        }
        if self.pending.contains_key(&id) {
            return Err(ShowTypeError::protocol(format!(
                "Request ID {} already pending",
                id
            )));
        }
        let (tx, rx) = oneshot::channel();
        self.pending.insert(id, tx);
        // fail_all may have run between the check and the insert
        if self.is_closed() {
            self.pending.remove(&id);
            return Err(ShowTypeError::ConnectionClosed);
        }
        Ok(rx)
    }

    /// Deliver a response to its waiter.
    ///
    /// Returns `true` if a waiter received it.
    pub(crate) fn route(&self, response: Value) -> bool {
        let Some(id) = RequestId::from_json(&response) else {
            return false;
        };
        match self.pending.remove(&id) {
            Some((_, sender)) => sender.send(response).is_ok(),
            None => false,
        }
    }

    /// Forget a pending request (e.g. after a timeout).
    pub(crate) fn remove(&self, id: RequestId) {
        self.pending.remove(&id);
    }

    /// Close the router and drop every waiter; their receivers observe a
    /// closed channel.
    pub(crate) fn fail_all(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.pending.clear();
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub(crate) fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn routes_response_to_registered_waiter() {
        let router = ResponseRouter::new();
        let rx = router.register(RequestId::new(1)).unwrap();

        assert!(router.route(json!({"jsonrpc": "2.0", "id": 1, "result": "ok"})));
        assert_eq!(rx.await.unwrap()["result"], "ok");
        assert_eq!(router.pending_count(), 0);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let router = ResponseRouter::new();
        let _rx = router.register(RequestId::new(1)).unwrap();
        assert!(matches!(
            router.register(RequestId::new(1)),
            Err(ShowTypeError::Protocol { .. })
        ));
    }

    #[test]
    fn unknown_response_is_not_delivered() {
        let router = ResponseRouter::new();
        assert!(!router.route(json!({"id": 99, "result": null})));
        assert!(!router.route(json!({"method": "window/logMessage"})));
    }

    #[tokio::test]
    async fn fail_all_closes_receivers() {
        let router = ResponseRouter::new();
        let rx = router.register(RequestId::new(3)).unwrap();
        router.fail_all();
        assert!(rx.await.is_err());
        assert_eq!(router.pending_count(), 0);
    }

    #[test]
    fn register_after_fail_all_is_connection_closed() {
        let router = ResponseRouter::new();
        router.fail_all();

        assert!(router.is_closed());
        assert!(matches!(
            router.register(RequestId::new(4)),
            Err(ShowTypeError::ConnectionClosed)
        ));
        assert_eq!(router.pending_count(), 0);
    }
}
