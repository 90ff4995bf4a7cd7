//! GUI price feed
//!
//! Prices reach the GUI through a lossy rate limiter: an update arriving
//! less than `throttle_ms` after the last published one is dropped, and
//! once `max_publishes` prices have gone out every later update is
//! dropped. Nothing is queued.

use chrono::Utc;
use tracing::{debug, warn};

use soa::{ConnectorError, Listener, Publisher, Service, ServiceError, Shared};
use types::pricing::Price;

use crate::config::GuiConfig;

/// Minimum-interval limiter with a lifetime cap
#[derive(Debug, Clone)]
pub struct GuiThrottle {
    throttle_ms: i64,
    max_publishes: u32,
    last_ms: Option<i64>,
    published: u32,
    cap_reported: bool,
}

impl GuiThrottle {
    pub fn new(throttle_ms: u64, max_publishes: u32) -> Self {
        Self {
            throttle_ms: i64::try_from(throttle_ms).unwrap_or(i64::MAX),
            max_publishes,
            last_ms: None,
            published: 0,
            cap_reported: false,
        }
    }

    pub fn from_config(config: &GuiConfig) -> Self {
        Self::new(config.throttle_ms, config.max_publishes)
    }

    /// Decide whether an update arriving at `now_ms` may be published
    ///
    /// An accepted update starts a new interval and counts toward the cap.
    pub fn offer(&mut self, now_ms: i64) -> bool {
        if self.published >= self.max_publishes {
            if !self.cap_reported {
                warn!(max_publishes = self.max_publishes, "GUI publish cap reached, dropping updates");
                self.cap_reported = true;
            }
            return false;
        }
        if let Some(last) = self.last_ms {
            if now_ms.saturating_sub(last) < self.throttle_ms {
                return false;
            }
        }
        self.last_ms = Some(now_ms);
        self.published += 1;
        true
    }

    pub fn published(&self) -> u32 {
        self.published
    }
}

/// Throttled publisher of internal prices to the GUI sink
pub struct GuiService {
    throttle: GuiThrottle,
    connector: Box<dyn Publisher<Price>>,
    store: Service<Price>,
}

impl GuiService {
    pub fn new(throttle: GuiThrottle, connector: Box<dyn Publisher<Price>>) -> Self {
        Self {
            throttle,
            connector,
            store: Service::new("gui"),
        }
    }

    /// Last price published for a product
    pub fn get(&self, product_id: &str) -> Option<&Price> {
        self.store.get(product_id)
    }

    pub fn published(&self) -> u32 {
        self.throttle.published()
    }

    /// Offer `price` to the GUI at wall-clock time
    pub fn provide_data(&mut self, price: &Price) -> Result<bool, ServiceError> {
        self.provide_data_at(price, Utc::now().timestamp_millis())
    }

    /// Offer `price` to the GUI at `now_ms`; returns whether it was published
    pub fn provide_data_at(&mut self, price: &Price, now_ms: i64) -> Result<bool, ServiceError> {
        if !self.throttle.offer(now_ms) {
            debug!(product = %price.product.product_id, "GUI update throttled");
            return Ok(false);
        }
        self.connector.publish(price)?;
        self.store.ingest(price.clone())?;
        Ok(true)
    }

    pub fn close(&mut self) -> Result<(), ConnectorError> {
        self.connector.close()
    }
}

/// Feeds internal prices to the GUI
pub struct GuiListener {
    service: Shared<GuiService>,
}

impl GuiListener {
    pub fn new(service: Shared<GuiService>) -> Self {
        Self { service }
    }
}

impl Listener<Price> for GuiListener {
    fn on_add(&mut self, price: &Price) -> Result<(), ServiceError> {
        self.service.borrow_mut().provide_data(price).map(|_| ())
    }
}
