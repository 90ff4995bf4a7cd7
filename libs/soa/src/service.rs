//! Keyed store + synchronous notifier
//!
//! `Service::ingest` is the only path that writes a service's store. It
//! replaces any record already held under the same identifier and then
//! calls every registered listener in registration order. A listener
//! error aborts the remaining listeners and is returned to the caller.

use std::cell::RefCell;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::debug;
use types::record::Record;

use crate::error::{ConnectorError, ServiceError};

/// Single-threaded shared handle used to wire services together
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value in a `Shared` handle
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Callback invoked by a service for every ingested record
///
/// Removal and update events never occur in this system, so the contract
/// has a single add event.
pub trait Listener<V> {
    fn on_add(&mut self, record: &V) -> Result<(), ServiceError>;
}

impl<V, F> Listener<V> for F
where
    F: FnMut(&V) -> Result<(), ServiceError>,
{
    fn on_add(&mut self, record: &V) -> Result<(), ServiceError> {
        self(record)
    }
}

/// Target of a source connector's drain
pub trait Subscriber<V> {
    fn on_message(&mut self, record: V) -> Result<(), ServiceError>;
}

/// Outbound side of a connector
pub trait Publisher<V> {
    /// One full round trip with the peer
    fn publish(&mut self, record: &V) -> Result<(), ConnectorError>;

    /// Tell the peer no more records follow
    fn close(&mut self) -> Result<(), ConnectorError> {
        Ok(())
    }
}

/// Latest record per identifier, plus ordered listeners
pub struct Service<V> {
    name: String,
    records: BTreeMap<String, V>,
    listeners: Vec<Box<dyn Listener<V>>>,
}

impl<V: Record> Service<V> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: BTreeMap::new(),
            listeners: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a listener; notification order is registration order
    pub fn register_listener(&mut self, listener: Box<dyn Listener<V>>) {
        self.listeners.push(listener);
    }

    /// Store `record` under its identifier, replacing any previous one, then notify
    pub fn ingest(&mut self, record: V) -> Result<(), ServiceError> {
        let key = record.identifier().to_string();
        debug!(service = %self.name, key = %key, "ingest");

        let Self {
            records, listeners, ..
        } = self;
        let stored = match records.entry(key) {
            Entry::Occupied(mut entry) => {
                entry.insert(record);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(record),
        };
        notify_all(listeners, stored)
    }

    /// Call `on_add` on every listener in registration order
    pub fn notify(&mut self, record: &V) -> Result<(), ServiceError> {
        notify_all(&mut self.listeners, record)
    }

    pub fn get(&self, identifier: &str) -> Option<&V> {
        self.records.get(identifier)
    }

    /// Records in identifier order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<V: Record> Subscriber<V> for Service<V> {
    fn on_message(&mut self, record: V) -> Result<(), ServiceError> {
        self.ingest(record)
    }
}

fn notify_all<V>(listeners: &mut [Box<dyn Listener<V>>], record: &V) -> Result<(), ServiceError> {
    for listener in listeners.iter_mut() {
        listener.on_add(record)?;
    }
    Ok(())
}
