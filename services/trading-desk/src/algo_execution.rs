//! Algorithmic execution
//!
//! On every order book update the algo alternates the side it trades,
//! starting with BID, and crosses the spread only when the top of book is
//! at its tightest (1/128 or less). A BID child order lifts the best
//! offer, an OFFER child order hits the best bid; price and size both come
//! from that opposite level.

use rust_decimal::Decimal;
use tracing::debug;

use soa::{Listener, Service, ServiceError, Shared};
use types::execution::ExecutionOrder;
use types::market_data::OrderBook;
use types::order::{OrderType, PricingSide};

/// Widest top-of-book spread the algo will cross: 1/128
pub fn max_spread() -> Decimal {
    Decimal::ONE / Decimal::from(128)
}

/// Execution orders generated by the algo, keyed by order id
pub struct AlgoExecutionService {
    store: Service<ExecutionOrder>,
    count: u64,
}

impl AlgoExecutionService {
    pub fn new() -> Self {
        Self {
            store: Service::new("algo_execution"),
            count: 0,
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

    /// Order books seen so far
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Advance the counter and build the child order for `book`, if any
    pub fn next_order(&mut self, book: &OrderBook) -> Option<ExecutionOrder> {
        self.count += 1;
        let side = if self.count % 2 == 1 {
            PricingSide::Bid
        } else {
            PricingSide::Offer
        };

        let spread = book.spread()?;
        if spread > max_spread() {
            debug!(product = %book.product.product_id, %spread, "spread too wide, no execution");
            return None;
        }

        let level = match side {
            PricingSide::Bid => book.best_offer()?,
            PricingSide::Offer => book.best_bid()?,
        };
        let order_id = self.count.to_string();
        Some(ExecutionOrder {
            product: book.product.clone(),
            side,
            order_id: order_id.clone(),
            order_type: OrderType::Market,
            price: level.price,
            visible_quantity: level.quantity,
            hidden_quantity: level.quantity,
            parent_order_id: order_id,
            is_child_order: false,
        })
    }

    /// Run the algo on `book`, ingesting and notifying any order it produces
    pub fn algo_execute(&mut self, book: &OrderBook) -> Result<Option<String>, ServiceError> {
        match self.next_order(book) {
            Some(order) => {
                let order_id = order.order_id.clone();
                self.store.ingest(order)?;
                Ok(Some(order_id))
            }
            None => Ok(None),
        }
    }
}

impl Default for AlgoExecutionService {
    fn default() -> Self {
        Self::new()
    }
}

/// Feeds market data updates into the algo
pub struct AlgoExecutionListener {
    service: Shared<AlgoExecutionService>,
}

impl AlgoExecutionListener {
    pub fn new(service: Shared<AlgoExecutionService>) -> Self {
        Self { service }
    }
}

impl Listener<OrderBook> for AlgoExecutionListener {
    fn on_add(&mut self, book: &OrderBook) -> Result<(), ServiceError> {
        self.service.borrow_mut().algo_execute(book).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::bond::BondReference;
    use types::market_data::BookOrder;

    fn book(spread_256ths: i64) -> OrderBook {
        let bond = BondReference::treasuries().bond("91282CAY7").unwrap();
        let bid = Decimal::from(99);
        let offer = bid + Decimal::from(spread_256ths) / Decimal::from(256);
        OrderBook::new(
            bond,
            vec![
                BookOrder::new(bid, 1_000_000, PricingSide::Bid),
                BookOrder::new(bid - Decimal::ONE / Decimal::from(256), 2_000_000, PricingSide::Bid),
            ],
            vec![
                BookOrder::new(offer, 3_000_000, PricingSide::Offer),
                BookOrder::new(offer + Decimal::ONE / Decimal::from(256), 4_000_000, PricingSide::Offer),
            ],
        )
    }

    #[test]
    fn test_executes_at_exactly_one_128th() {
        let mut algo = AlgoExecutionService::new();
        let order = algo.next_order(&book(2)).unwrap();
        assert_eq!(order.side, PricingSide::Bid);
        // BID lifts the best offer
        assert_eq!(order.price, Decimal::from(99) + Decimal::from(2) / Decimal::from(256));
        assert_eq!(order.visible_quantity, 3_000_000);
        assert_eq!(order.hidden_quantity, 3_000_000);
        assert_eq!(order.order_type, OrderType::Market);
        assert_eq!(order.order_id, "1");
    }

    #[test]
    fn test_no_execution_when_spread_wider() {
        let mut algo = AlgoExecutionService::new();
        // 1/64
        assert!(algo.next_order(&book(4)).is_none());
        assert_eq!(algo.count(), 1);
    }

    #[test]
    fn test_sides_alternate() {
        let mut algo = AlgoExecutionService::new();
        let first = algo.next_order(&book(2)).unwrap();
        let second = algo.next_order(&book(2)).unwrap();
        let third = algo.next_order(&book(1)).unwrap();
        assert_eq!(first.side, PricingSide::Bid);
        assert_eq!(second.side, PricingSide::Offer);
        assert_eq!(third.side, PricingSide::Bid);

        // OFFER hits the best bid
        assert_eq!(second.price, Decimal::from(99));
        assert_eq!(second.visible_quantity, 1_000_000);
        assert_eq!(second.order_id, "2");
    }

    #[test]
    fn test_gated_update_still_advances_side() {
        let mut algo = AlgoExecutionService::new();
        assert!(algo.next_order(&book(8)).is_none());
        let order = algo.next_order(&book(2)).unwrap();
        assert_eq!(order.side, PricingSide::Offer);
        assert_eq!(order.order_id, "2");
    }

    #[test]
    fn test_algo_execute_ingests_and_notifies() {
        let seen = soa::shared(Vec::new());
        let sink = std::rc::Rc::clone(&seen);
        let mut algo = AlgoExecutionService::new();
        algo.register_listener(Box::new(move |o: &ExecutionOrder| -> Result<(), ServiceError> {
            sink.borrow_mut().push(o.order_id.clone());
            Ok(())
        }));

        assert_eq!(algo.algo_execute(&book(2)).unwrap(), Some("1".to_string()));
        assert_eq!(algo.algo_execute(&book(6)).unwrap(), None);
        assert_eq!(algo.len(), 1);
        assert!(algo.get("1").is_some());
        assert_eq!(*seen.borrow(), vec!["1".to_string()]);
    }
}
