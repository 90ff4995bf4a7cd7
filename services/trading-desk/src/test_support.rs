//! In-memory publisher for unit tests

use std::marker::PhantomData;
use std::rc::Rc;

use soa::{shared, ConnectorError, Publisher, Shared};
use types::record::WireEncode;

/// Records `to_wire` of every published record; `EOF` on close
pub struct RecordingPublisher<V> {
    lines: Shared<Vec<String>>,
    _record: PhantomData<fn(&V)>,
}

impl<V> RecordingPublisher<V> {
    pub fn new() -> (Self, Shared<Vec<String>>) {
        let lines = shared(Vec::new());
        (
            Self {
                lines: Rc::clone(&lines),
                _record: PhantomData,
            },
            lines,
        )
    }
}

impl<V: WireEncode> Publisher<V> for RecordingPublisher<V> {
    fn publish(&mut self, record: &V) -> Result<(), ConnectorError> {
        self.lines.borrow_mut().push(record.to_wire());
        Ok(())
    }

    fn close(&mut self) -> Result<(), ConnectorError> {
        self.lines.borrow_mut().push(soa::EOF_SENTINEL.to_string());
        Ok(())
    }
}
