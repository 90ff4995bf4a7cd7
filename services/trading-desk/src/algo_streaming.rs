//! Algorithmic price streaming
//!
//! Every internal price becomes a two-way stream at mid -/+ spread/2. The
//! visible size alternates between 2mm and 1mm, starting with 2mm; the
//! hidden size is always twice the visible size.

use tracing::debug;

use soa::{Listener, Service, ServiceError, Shared};
use types::order::PricingSide;
use types::pricing::Price;
use types::streaming::{PriceStream, PriceStreamOrder};

/// Visible size on the first update and every other one after it
pub const LARGE_VISIBLE_SIZE: i64 = 2_000_000;

/// Visible size on the alternate updates
pub const SMALL_VISIBLE_SIZE: i64 = 1_000_000;

/// Generated streams keyed by product
pub struct AlgoStreamingService {
    store: Service<PriceStream>,
    large_next: bool,
}

impl AlgoStreamingService {
    pub fn new() -> Self {
        Self {
            store: Service::new("algo_streaming"),
            large_next: true,
        }
    }

    pub fn register_listener(&mut self, listener: Box<dyn Listener<PriceStream>>) {
        self.store.register_listener(listener);
    }

    pub fn get(&self, product_id: &str) -> Option<&PriceStream> {
        self.store.get(product_id)
    }

    /// Build the next stream for `price`, advancing the size tier
    pub fn next_stream(&mut self, price: &Price) -> PriceStream {
        let visible = if self.large_next {
            LARGE_VISIBLE_SIZE
        } else {
            SMALL_VISIBLE_SIZE
        };
        self.large_next = !self.large_next;
        let hidden = 2 * visible;

        PriceStream::new(
            price.product.clone(),
            PriceStreamOrder::new(price.bid(), visible, hidden, PricingSide::Bid),
            PriceStreamOrder::new(price.offer(), visible, hidden, PricingSide::Offer),
        )
    }

    /// Stream `price` to listeners
    pub fn publish_price(&mut self, price: &Price) -> Result<(), ServiceError> {
        let stream = self.next_stream(price);
        debug!(
            product = %stream.product.product_id,
            visible = stream.bid_order.visible_quantity,
            "algo stream"
        );
        self.store.ingest(stream)
    }
}

impl Default for AlgoStreamingService {
    fn default() -> Self {
        Self::new()
    }
}

/// Feeds internal prices into the streaming algo
pub struct AlgoStreamingListener {
    service: Shared<AlgoStreamingService>,
}

impl AlgoStreamingListener {
    pub fn new(service: Shared<AlgoStreamingService>) -> Self {
        Self { service }
    }
}

impl Listener<Price> for AlgoStreamingListener {
    fn on_add(&mut self, price: &Price) -> Result<(), ServiceError> {
        self.service.borrow_mut().publish_price(price)
    }
}
