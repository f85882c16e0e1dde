//! In-memory synchronous event bus.

use tracing::error;

use crate::Event;
use crate::bus::{EventBus, Handler, PublishError, SubscriberId};

/// In-memory pub/sub bus.
///
/// - No IO / no async
/// - Synchronous fan-out in registration order
/// - Every subscriber runs even if an earlier one fails
pub struct InMemoryEventBus<M> {
    subscribers: Vec<(SubscriberId, Handler<M>)>,
    next_id: u64,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 1,
        }
    }
}

impl<M> core::fmt::Debug for InMemoryEventBus<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryEventBus")
            .field(
                "subscribers",
                &self.subscribers.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Event,
{
    type Error = PublishError;

    fn publish(&mut self, message: &M) -> Result<(), Self::Error> {
        let mut first_failure = None;

        for (id, handler) in self.subscribers.iter_mut() {
            if let Err(source) = handler(message) {
                error!(
                    subscriber = %id,
                    event_type = message.event_type(),
                    error = %source,
                    "subscriber failed to process event"
                );
                if first_failure.is_none() {
                    first_failure = Some(PublishError {
                        subscriber: *id,
                        event_type: message.event_type(),
                        source,
                    });
                }
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn subscribe(&mut self, handler: Handler<M>) -> SubscriberId {
        let id = SubscriberId::from_raw(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, handler));
        id
    }

    fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::SubscriberError;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Ping(u32);

    impl Event for Ping {
        fn event_type(&self) -> &'static str {
            "test.ping"
        }

        fn version(&self) -> u32 {
            1
        }
    }

    fn recorder(log: &Rc<RefCell<Vec<(u8, u32)>>>, tag: u8) -> Handler<Ping> {
        let log = Rc::clone(log);
        Box::new(move |ping: &Ping| -> Result<(), SubscriberError> {
            log.borrow_mut().push((tag, ping.0));
            Ok(())
        })
    }

    #[test]
    fn delivers_in_registration_then_publication_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = InMemoryEventBus::new();
        bus.subscribe(recorder(&log, 1));
        bus.subscribe(recorder(&log, 2));

        bus.publish(&Ping(10)).unwrap();
        bus.publish(&Ping(20)).unwrap();

        assert_eq!(*log.borrow(), vec![(1, 10), (2, 10), (1, 20), (2, 20)]);
    }

    #[test]
    fn unsubscribed_handler_stops_receiving() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = InMemoryEventBus::new();
        let first = bus.subscribe(recorder(&log, 1));
        bus.subscribe(recorder(&log, 2));

        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(&Ping(7)).unwrap();
        assert_eq!(*log.borrow(), vec![(2, 7)]);
    }

    #[test]
    fn failure_is_reported_after_all_subscribers_ran() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = InMemoryEventBus::new();
        let failing = bus.subscribe(Box::new(|_: &Ping| -> Result<(), SubscriberError> {
            Err(SubscriberError::inconsistent("no binding"))
        }));
        bus.subscribe(recorder(&log, 2));

        let err = bus.publish(&Ping(3)).unwrap_err();
        assert_eq!(err.subscriber, failing);
        assert_eq!(err.event_type, "test.ping");
        assert_eq!(*log.borrow(), vec![(2, 3)]);
    }
}
