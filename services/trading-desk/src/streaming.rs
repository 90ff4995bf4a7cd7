//! Price streams published to the market

use soa::{Listener, Service, ServiceError, Shared};
use types::streaming::PriceStream;

/// Published streams keyed by product
pub struct StreamingService {
    store: Service<PriceStream>,
}

impl StreamingService {
    pub fn new() -> Self {
        Self {
            store: Service::new("streaming"),
        }
    }

    pub fn register_listener(&mut self, listener: Box<dyn Listener<PriceStream>>) {
        self.store.register_listener(listener);
    }

    pub fn get(&self, product_id: &str) -> Option<&PriceStream> {
        self.store.get(product_id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn publish_price(&mut self, stream: PriceStream) -> Result<(), ServiceError> {
        self.store.ingest(stream)
    }
}

impl Default for StreamingService {
    fn default() -> Self {
        Self::new()
    }
}

/// Forwards algo streams to the streaming service
pub struct StreamingListener {
    service: Shared<StreamingService>,
}

impl StreamingListener {
    pub fn new(service: Shared<StreamingService>) -> Self {
        Self { service }
    }
}

impl Listener<PriceStream> for StreamingListener {
    fn on_add(&mut self, stream: &PriceStream) -> Result<(), ServiceError> {
        self.service.borrow_mut().publish_price(stream.clone())
    }
}
