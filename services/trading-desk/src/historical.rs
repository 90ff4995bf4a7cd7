//! Historical data persistence
//!
//! Every record notified to a `HistoricalDataListener` is pushed through
//! the service's sink connector. Persist keys count up from 1 per service.

use tracing::{debug, info};

use soa::{ConnectorError, Listener, Publisher, ServiceError, Shared};

/// Persists records of one data type through a sink connector
pub struct HistoricalDataService<V> {
    data_type: String,
    connector: Box<dyn Publisher<V>>,
    next_key: u64,
}

impl<V> HistoricalDataService<V> {
    pub fn new(data_type: impl Into<String>, connector: Box<dyn Publisher<V>>) -> Self {
        Self {
            data_type: data_type.into(),
            connector,
            next_key: 1,
        }
    }

    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    /// Number of records persisted so far
    pub fn persisted(&self) -> u64 {
        self.next_key - 1
    }

    /// Persist `record` under the next key; returns the key used
    ///
    /// The key is only consumed once the sink acknowledges the record.
    pub fn persist(&mut self, record: &V) -> Result<u64, ConnectorError> {
        let key = self.next_key;
        debug!(data_type = %self.data_type, key, "persisting record");
        self.connector.publish(record)?;
        self.next_key += 1;
        Ok(key)
    }

    /// Close the sink
    pub fn close(&mut self) -> Result<(), ConnectorError> {
        info!(data_type = %self.data_type, persisted = self.persisted(), "closing historical sink");
        self.connector.close()
    }
}

/// Persists every record a service notifies
pub struct HistoricalDataListener<V> {
    service: Shared<HistoricalDataService<V>>,
}

impl<V> HistoricalDataListener<V> {
    pub fn new(service: Shared<HistoricalDataService<V>>) -> Self {
        Self { service }
    }
}

impl<V> Listener<V> for HistoricalDataListener<V> {
    fn on_add(&mut self, record: &V) -> Result<(), ServiceError> {
        self.service.borrow_mut().persist(record)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingPublisher;
    use soa::shared;
    use types::bond::BondReference;
    use types::position::Position;
    use types::trade::Trade;
    use types::order::Side;
    use rust_decimal::Decimal;

    fn position(quantity: i64) -> Position {
        let bond = BondReference::treasuries().bond("91282CAV3").unwrap();
        let trade = Trade::new(bond.clone(), "T1", Decimal::from(99), "TRSY1", quantity, Side::BUY);
        Position::new(bond).with_trade(&trade)
    }

    #[test]
    fn test_keys_increase_per_service() {
        let (publisher, lines) = RecordingPublisher::<Position>::new();
        let mut history = HistoricalDataService::new("positions", Box::new(publisher));
        assert_eq!(history.persist(&position(1_000_000)).unwrap(), 1);
        assert_eq!(history.persist(&position(2_000_000)).unwrap(), 2);
        assert_eq!(history.persisted(), 2);
        assert_eq!(
            *lines.borrow(),
            vec![
                "91282CAV3,1000000,0,0,1000000".to_string(),
                "91282CAV3,2000000,0,0,2000000".to_string(),
            ]
        );
    }

    struct PeerGone;

    impl Publisher<Position> for PeerGone {
        fn publish(&mut self, _: &Position) -> Result<(), ConnectorError> {
            Err(ConnectorError::PeerClosed {
                peer: "127.0.0.1:1239".to_string(),
            })
        }
    }

    #[test]
    fn test_failed_publish_does_not_consume_key() {
        let mut history = HistoricalDataService::<Position>::new("positions", Box::new(PeerGone));
        assert!(matches!(
            history.persist(&position(1_000_000)),
            Err(ConnectorError::PeerClosed { .. })
        ));
        assert_eq!(history.persisted(), 0);

        let (publisher, _lines) = RecordingPublisher::<Position>::new();
        history.connector = Box::new(publisher);
        assert_eq!(history.persist(&position(1_000_000)).unwrap(), 1);
    }

    #[test]
    fn test_listener_persists_and_close_sends_eof() {
        let (publisher, lines) = RecordingPublisher::<Position>::new();
        let history = shared(HistoricalDataService::new("positions", Box::new(publisher)));
        let mut listener = HistoricalDataListener::new(history.clone());
        listener.on_add(&position(5)).unwrap();
        history.borrow_mut().close().unwrap();

        let lines = lines.borrow();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], soa::EOF_SENTINEL);
        assert_eq!(history.borrow().data_type(), "positions");
    }
}
