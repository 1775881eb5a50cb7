//! Builder for constructing a bus with pre-seeded subscriptions.

use std::sync::Arc;

use crate::core::bus::EventBus;
use crate::core::config::BusConfig;
use crate::core::registry::HandlerKind;
use crate::events::EventKey;
use crate::subscribers::{Handle, HandleAsync};

/// Builder returned by [`EventBus::builder`].
///
/// Lets the application assembler wire the always-on observers (loggers,
/// monitors) before the bus is handed out to screens.
pub struct BusBuilder {
    config: BusConfig,
    seeds: Vec<(EventKey, HandlerKind)>,
}

impl BusBuilder {
    pub(crate) fn new(config: BusConfig) -> Self {
        Self {
            config,
            seeds: Vec::new(),
        }
    }

    /// Registers a synchronous subscriber at build time.
    pub fn with_subscriber(mut self, key: EventKey, handler: Arc<dyn Handle>) -> Self {
        self.seeds.push((key, HandlerKind::Sync(handler)));
        self
    }

    /// Registers an asynchronous subscriber at build time.
    pub fn with_async_subscriber(mut self, key: EventKey, handler: Arc<dyn HandleAsync>) -> Self {
        self.seeds.push((key, HandlerKind::Async(handler)));
        self
    }

    /// Builds the bus and registers the seeded subscribers in order.
    ///
    /// Returns `Arc<EventBus>`: the bus is shared by cloning the handle, and
    /// its lifetime is owned by whatever assembles the application.
    #[must_use]
    pub fn build(self) -> Arc<EventBus> {
        let bus = EventBus::new(self.config);
        for (key, handler) in self.seeds {
            bus.register(key, handler);
        }
        Arc::new(bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Event, Severity};
    use parking_lot::Mutex;

    #[tokio::test]
    async fn test_seeded_subscribers_are_active() {
        let seen = Arc::new(Mutex::new(0usize));
        let handler: Arc<dyn Handle> = {
            let seen = Arc::clone(&seen);
            Arc::new(move |_: &Event| *seen.lock() += 1)
        };

        let bus = EventBus::builder(BusConfig::default())
            .with_subscriber(EventKey::Notification, handler)
            .build();

        bus.notify("t", "m", Severity::Info).await;
        assert_eq!(*seen.lock(), 1);
        assert_eq!(bus.stats().subscriptions, 1);
    }

    #[test]
    fn test_builder_respects_config() {
        let bus = EventBus::builder(BusConfig {
            start_enabled: false,
            ..BusConfig::default()
        })
        .build();
        assert!(!bus.is_enabled());
    }
}
