//! Customer inquiry quoting
//!
//! `on_message` drives one inquiry through its lifecycle:
//!
//! - `RECEIVED`: quote at par and hand the inquiry to the quote connector,
//!   then handle it again in the state the connector returns.
//! - `QUOTED`: mark `DONE`, forward the quote, store and notify.
//! - anything else: log, mark `REJECTED`, store and notify.
//!
//! Only terminal inquiries reach the store, so listeners see each inquiry
//! exactly once. Inquiry feed line: `inquiryId,productId,BUY|SELL` with an
//! optional trailing comma.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use soa::{ConnectorError, LineDecoder, Listener, Service, ServiceError, Subscriber};
use types::bond::BondReference;
use types::errors::RecordError;
use types::inquiry::{Inquiry, InquiryState};

use crate::feeds::split_fields_lenient;

/// Quoted price for every inquiry
pub fn par() -> Decimal {
    Decimal::from(100)
}

/// Outbound quote channel; returns the state the inquiry moves to
pub trait QuotePublisher {
    fn publish(&mut self, inquiry: &Inquiry) -> Result<InquiryState, ConnectorError>;
}

/// In-process quote connector
///
/// Accepts every quote on a `RECEIVED` inquiry. Any other state passes
/// through unchanged.
#[derive(Debug, Default)]
pub struct QuoteConnector {
    quotes: u64,
}

impl QuoteConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quotes(&self) -> u64 {
        self.quotes
    }
}

impl QuotePublisher for QuoteConnector {
    fn publish(&mut self, inquiry: &Inquiry) -> Result<InquiryState, ConnectorError> {
        self.quotes += 1;
        match inquiry.state {
            InquiryState::Received => Ok(InquiryState::Quoted),
            state => Ok(state),
        }
    }
}

/// Terminal inquiries keyed by inquiry id
pub struct InquiryService {
    store: Service<Inquiry>,
    quoter: Box<dyn QuotePublisher>,
}

impl InquiryService {
    pub fn new(quoter: Box<dyn QuotePublisher>) -> Self {
        Self {
            store: Service::new("inquiry"),
            quoter,
        }
    }

    pub fn register_listener(&mut self, listener: Box<dyn Listener<Inquiry>>) {
        self.store.register_listener(listener);
    }

    pub fn get(&self, inquiry_id: &str) -> Option<&Inquiry> {
        self.store.get(inquiry_id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Send a quote for `inquiry` at `price` and handle the reply
    pub fn send_quote(&mut self, inquiry: Inquiry, price: Decimal) -> Result<(), ServiceError> {
        let quoted = inquiry.with_price(price);
        let next = self.quoter.publish(&quoted)?;
        debug!(inquiry_id = %quoted.inquiry_id, %next, "quote sent");
        if next == InquiryState::Received {
            // connector did not take the quote
            return self.reject_inquiry(quoted);
        }
        self.on_message(quoted.with_state(next))
    }

    /// Mark `inquiry` rejected, store and notify
    pub fn reject_inquiry(&mut self, inquiry: Inquiry) -> Result<(), ServiceError> {
        warn!(
            inquiry_id = %inquiry.inquiry_id,
            state = %inquiry.state,
            "rejecting inquiry"
        );
        self.store.ingest(inquiry.with_state(InquiryState::Rejected))
    }
}

impl Subscriber<Inquiry> for InquiryService {
    fn on_message(&mut self, inquiry: Inquiry) -> Result<(), ServiceError> {
        match inquiry.state {
            InquiryState::Received => self.send_quote(inquiry, par()),
            InquiryState::Quoted => {
                let done = inquiry.with_state(InquiryState::Done);
                self.quoter.publish(&done)?;
                self.store.ingest(done)
            }
            _ => self.reject_inquiry(inquiry),
        }
    }
}

pub struct InquiryDecoder {
    reference: Arc<BondReference>,
}

impl InquiryDecoder {
    pub fn new(reference: Arc<BondReference>) -> Self {
        Self { reference }
    }
}

impl LineDecoder for InquiryDecoder {
    type Record = Inquiry;

    fn decode(&self, line: &str) -> Result<Inquiry, RecordError> {
        let fields = split_fields_lenient(line, 3)?;
        let bond = self.reference.bond(fields[1])?;
        Ok(Inquiry::received(fields[0], bond, fields[2].parse()?))
    }
}
