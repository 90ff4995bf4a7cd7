//! Execution of algo orders on a venue

use tracing::debug;

use soa::{Listener, Service, ServiceError, Shared};
use types::execution::ExecutionOrder;
use types::order::Market;

/// Executed orders keyed by order id
pub struct ExecutionService {
    store: Service<ExecutionOrder>,
}

impl ExecutionService {
    pub fn new() -> Self {
        Self {
            store: Service::new("execution"),
        }
    }

    pub fn register_listener(&mut self, listener: Box<dyn Listener<ExecutionOrder>>) {
        self.store.register_listener(listener);
    }

    pub fn get(&self, order_id: &str) -> Option<&ExecutionOrder> {
        self.store.get(order_id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Execute `order` on `market`
    pub fn execute_order(&mut self, order: ExecutionOrder, market: Market) -> Result<(), ServiceError> {
        debug!(order_id = %order.order_id, %market, "executing order");
        self.store.ingest(order)
    }
}

impl Default for ExecutionService {
    fn default() -> Self {
        Self::new()
    }
}

/// Routes algo orders to the execution service on a fixed venue
pub struct ExecutionListener {
    service: Shared<ExecutionService>,
    market: Market,
}

impl ExecutionListener {
    pub fn new(service: Shared<ExecutionService>, market: Market) -> Self {
        Self { service, market }
    }
}

impl Listener<ExecutionOrder> for ExecutionListener {
    fn on_add(&mut self, order: &ExecutionOrder) -> Result<(), ServiceError> {
        self.service
            .borrow_mut()
            .execute_order(order.clone(), self.market)
    }
}
