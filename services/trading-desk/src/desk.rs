//! Processing graph wiring and feed drivers
//!
//! Listener registration order matters: positions reach risk before the
//! positions sink, executions reach trade booking before the executions
//! sink, and prices reach the GUI before the streaming algo.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use tracing::{error, info};

use soa::{shared, LineDecoder, Publisher, Shared, SinkConnector, SourceConnector, Subscriber};
use types::bond::{Bond, BondReference};
use types::execution::ExecutionOrder;
use types::inquiry::Inquiry;
use types::order::Market;
use types::position::Position;
use types::pricing::Price;
use types::risk::Pv01;
use types::streaming::PriceStream;

use crate::algo_execution::{AlgoExecutionListener, AlgoExecutionService};
use crate::algo_streaming::{AlgoStreamingListener, AlgoStreamingService};
use crate::config::{DeskConfig, StreamEndpoint};
use crate::error::{DeskError, DeskResult};
use crate::execution::{ExecutionListener, ExecutionService};
use crate::gui::{GuiListener, GuiService, GuiThrottle};
use crate::historical::{HistoricalDataListener, HistoricalDataService};
use crate::inquiry::{InquiryDecoder, InquiryService, QuoteConnector};
use crate::market_data::{MarketDataService, OrderBookDecoder};
use crate::position::{PositionListener, PositionService};
use crate::pricing::{PriceDecoder, PricingService};
use crate::risk::{RiskListener, RiskService};
use crate::streaming::{StreamingListener, StreamingService};
use crate::trade_booking::{TradeBookingListener, TradeBookingService, TradeDecoder};

/// Venue for every algo execution
pub const EXECUTION_MARKET: Market = Market::Cme;

/// Outbound publishers, one per output stream
pub struct DeskSinks {
    pub gui: Box<dyn Publisher<Price>>,
    pub executions: Box<dyn Publisher<ExecutionOrder>>,
    pub positions: Box<dyn Publisher<Position>>,
    pub risk: Box<dyn Publisher<Pv01<Bond>>>,
    pub streaming: Box<dyn Publisher<PriceStream>>,
    pub all_inquiries: Box<dyn Publisher<Inquiry>>,
}

impl DeskSinks {
    /// Connect a sink connector for every configured output stream
    pub fn connect(config: &DeskConfig) -> DeskResult<Self> {
        let sinks = &config.sinks;
        Ok(Self {
            gui: Box::new(connect_sink::<Price>(config, &sinks.gui)?),
            executions: Box::new(connect_sink::<ExecutionOrder>(config, &sinks.executions)?),
            positions: Box::new(connect_sink::<Position>(config, &sinks.positions)?),
            risk: Box::new(connect_sink::<Pv01<Bond>>(config, &sinks.risk)?),
            streaming: Box::new(connect_sink::<PriceStream>(config, &sinks.streaming)?),
            all_inquiries: Box::new(connect_sink::<Inquiry>(config, &sinks.all_inquiries)?),
        })
    }
}

fn connect_sink<V: types::record::WireEncode>(
    config: &DeskConfig,
    endpoint: &StreamEndpoint,
) -> DeskResult<SinkConnector<V>> {
    Ok(SinkConnector::connect(config.address(endpoint), endpoint.name.as_str())?)
}

/// Outcome of `Desk::run_all`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records ingested per feed that drained to `EOF`
    pub ingested: BTreeMap<&'static str, usize>,
    /// Feeds that stopped on an error
    pub failed: Vec<&'static str>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The wired service graph
pub struct Desk {
    config: DeskConfig,
    reference: Arc<BondReference>,

    pricing: Shared<PricingService>,
    market_data: Shared<MarketDataService>,
    algo_execution: Shared<AlgoExecutionService>,
    execution: Shared<ExecutionService>,
    trade_booking: Shared<TradeBookingService>,
    position: Shared<PositionService>,
    risk: Shared<RiskService>,
    algo_streaming: Shared<AlgoStreamingService>,
    streaming: Shared<StreamingService>,
    gui: Shared<GuiService>,
    inquiry: Shared<InquiryService>,

    executions_history: Shared<HistoricalDataService<ExecutionOrder>>,
    positions_history: Shared<HistoricalDataService<Position>>,
    risk_history: Shared<HistoricalDataService<Pv01<Bond>>>,
    streaming_history: Shared<HistoricalDataService<PriceStream>>,
    inquiries_history: Shared<HistoricalDataService<Inquiry>>,
}

impl Desk {
    /// Connect every sink and wire the graph; any sink failure fails startup
    pub fn connect(config: DeskConfig, reference: Arc<BondReference>) -> DeskResult<Self> {
        let sinks = DeskSinks::connect(&config)?;
        info!(host = %config.host, "all sinks connected");
        Ok(Self::assemble(config, reference, sinks))
    }

    /// Wire the graph around the given sinks
    pub fn assemble(config: DeskConfig, reference: Arc<BondReference>, sinks: DeskSinks) -> Self {
        let DeskSinks {
            gui: gui_sink,
            executions,
            positions,
            risk: risk_sink,
            streaming: streaming_sink,
            all_inquiries,
        } = sinks;

        let executions_history = shared(HistoricalDataService::new("executions", executions));
        let positions_history = shared(HistoricalDataService::new("positions", positions));
        let risk_history = shared(HistoricalDataService::new("risk", risk_sink));
        let streaming_history = shared(HistoricalDataService::new("streaming", streaming_sink));
        let inquiries_history = shared(HistoricalDataService::new("all_inquiries", all_inquiries));

        // trades -> positions -> risk
        let risk = shared(RiskService::new(Arc::clone(&reference)));
        risk.borrow_mut()
            .register_listener(Box::new(HistoricalDataListener::new(Rc::clone(&risk_history))));

        let position = shared(PositionService::new(Arc::clone(&reference)));
        {
            let mut position = position.borrow_mut();
            position.register_listener(Box::new(RiskListener::new(Rc::clone(&risk))));
            position.register_listener(Box::new(HistoricalDataListener::new(Rc::clone(
                &positions_history,
            ))));
        }

        let trade_booking = shared(TradeBookingService::new());
        trade_booking
            .borrow_mut()
            .register_listener(Box::new(PositionListener::new(Rc::clone(&position))));

        // market data -> algo execution -> execution -> trade booking
        let execution = shared(ExecutionService::new());
        {
            let mut execution = execution.borrow_mut();
            execution.register_listener(Box::new(TradeBookingListener::new(Rc::clone(
                &trade_booking,
            ))));
            execution.register_listener(Box::new(HistoricalDataListener::new(Rc::clone(
                &executions_history,
            ))));
        }

        let algo_execution = shared(AlgoExecutionService::new());
        algo_execution
            .borrow_mut()
            .register_listener(Box::new(ExecutionListener::new(
                Rc::clone(&execution),
                EXECUTION_MARKET,
            )));

        let market_data = shared(MarketDataService::new());
        market_data
            .borrow_mut()
            .register_listener(Box::new(AlgoExecutionListener::new(Rc::clone(&algo_execution))));

        // prices -> gui, prices -> algo streaming -> streaming
        let streaming = shared(StreamingService::new());
        streaming
            .borrow_mut()
            .register_listener(Box::new(HistoricalDataListener::new(Rc::clone(
                &streaming_history,
            ))));

        let algo_streaming = shared(AlgoStreamingService::new());
        algo_streaming
            .borrow_mut()
            .register_listener(Box::new(StreamingListener::new(Rc::clone(&streaming))));

        let gui = shared(GuiService::new(GuiThrottle::from_config(&config.gui), gui_sink));

        let pricing = shared(PricingService::new("pricing"));
        {
            let mut pricing = pricing.borrow_mut();
            pricing.register_listener(Box::new(GuiListener::new(Rc::clone(&gui))));
            pricing.register_listener(Box::new(AlgoStreamingListener::new(Rc::clone(
                &algo_streaming,
            ))));
        }

        // inquiries
        let inquiry = shared(InquiryService::new(Box::new(QuoteConnector::new())));
        inquiry
            .borrow_mut()
            .register_listener(Box::new(HistoricalDataListener::new(Rc::clone(
                &inquiries_history,
            ))));

        Self {
            config,
            reference,
            pricing,
            market_data,
            algo_execution,
            execution,
            trade_booking,
            position,
            risk,
            algo_streaming,
            streaming,
            gui,
            inquiry,
            executions_history,
            positions_history,
            risk_history,
            streaming_history,
            inquiries_history,
        }
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn reference(&self) -> &Arc<BondReference> {
        &self.reference
    }

    // ── Feed drivers ────────────────────────────────────────────────

    /// Drain one input stream into `target`
    fn drain<D, S>(&self, endpoint: &StreamEndpoint, decoder: D, target: &Shared<S>) -> DeskResult<usize>
    where
        D: LineDecoder,
        S: Subscriber<D::Record>,
    {
        let mut source = SourceConnector::connect(
            self.config.address(endpoint),
            endpoint.name.as_str(),
            decoder,
        )?;
        let ingested = source.subscribe(&mut *target.borrow_mut())?;
        Ok(ingested)
    }

    pub fn run_trades(&self) -> DeskResult<usize> {
        let decoder = TradeDecoder::new(Arc::clone(&self.reference));
        self.drain(&self.config.feeds.trades, decoder, &self.trade_booking)
    }

    pub fn run_market_data(&self) -> DeskResult<usize> {
        let decoder = OrderBookDecoder::new(Arc::clone(&self.reference));
        self.drain(&self.config.feeds.market_data, decoder, &self.market_data)
    }

    pub fn run_prices(&self) -> DeskResult<usize> {
        let decoder = PriceDecoder::new(Arc::clone(&self.reference));
        self.drain(&self.config.feeds.prices, decoder, &self.pricing)
    }

    pub fn run_inquiries(&self) -> DeskResult<usize> {
        let decoder = InquiryDecoder::new(Arc::clone(&self.reference));
        self.drain(&self.config.feeds.inquiries, decoder, &self.inquiry)
    }

    /// Drain trades, market data, prices and inquiries in turn
    ///
    /// A failed feed is logged and skipped; records it ingested before the
    /// failure stay in the graph.
    pub fn run_all(&self) -> RunSummary {
        let feeds: [(&'static str, fn(&Self) -> DeskResult<usize>); 4] = [
            ("trades", Self::run_trades),
            ("market_data", Self::run_market_data),
            ("prices", Self::run_prices),
            ("inquiries", Self::run_inquiries),
        ];

        let mut summary = RunSummary::default();
        for (feed, run) in feeds {
            match run(self) {
                Ok(ingested) => {
                    info!(feed, ingested, "feed drained");
                    summary.ingested.insert(feed, ingested);
                }
                Err(e) => {
                    error!(feed, error = %e, "feed failed");
                    summary.failed.push(feed);
                }
            }
        }
        summary
    }

    /// Send `EOF` to every sink
    ///
    /// Every sink is closed even if an earlier one fails; the first error
    /// is returned.
    pub fn shutdown(&self) -> DeskResult<()> {
        let results = [
            ("gui", self.gui.borrow_mut().close()),
            ("executions", self.executions_history.borrow_mut().close()),
            ("positions", self.positions_history.borrow_mut().close()),
            ("risk", self.risk_history.borrow_mut().close()),
            ("streaming", self.streaming_history.borrow_mut().close()),
            ("all_inquiries", self.inquiries_history.borrow_mut().close()),
        ];

        let mut first: Option<DeskError> = None;
        for (sink, result) in results {
            if let Err(e) = result {
                error!(sink, error = %e, "failed to close sink");
                first.get_or_insert(e.into());
            }
        }
        match first {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    // ── Service access ──────────────────────────────────────────────

    pub fn pricing(&self) -> &Shared<PricingService> {
        &self.pricing
    }

    pub fn market_data(&self) -> &Shared<MarketDataService> {
        &self.market_data
    }

    pub fn algo_execution(&self) -> &Shared<AlgoExecutionService> {
        &self.algo_execution
    }

    pub fn execution(&self) -> &Shared<ExecutionService> {
        &self.execution
    }

    pub fn trade_booking(&self) -> &Shared<TradeBookingService> {
        &self.trade_booking
    }

    pub fn position(&self) -> &Shared<PositionService> {
        &self.position
    }

    pub fn risk(&self) -> &Shared<RiskService> {
        &self.risk
    }

    pub fn algo_streaming(&self) -> &Shared<AlgoStreamingService> {
        &self.algo_streaming
    }

    pub fn streaming(&self) -> &Shared<StreamingService> {
        &self.streaming
    }

    pub fn gui(&self) -> &Shared<GuiService> {
        &self.gui
    }

    pub fn inquiry(&self) -> &Shared<InquiryService> {
        &self.inquiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingPublisher;
    use rust_decimal::Decimal;
    use std::net::TcpListener;
    use std::str::FromStr;
    use types::market_data::{BookOrder, OrderBook};
    use types::order::{PricingSide, Side};
    use types::trade::Trade;

    struct Outputs {
        gui: Shared<Vec<String>>,
        executions: Shared<Vec<String>>,
        positions: Shared<Vec<String>>,
        risk: Shared<Vec<String>>,
        streaming: Shared<Vec<String>>,
        all_inquiries: Shared<Vec<String>>,
    }

    fn desk() -> (Desk, Outputs) {
        let (gui, gui_lines) = RecordingPublisher::<Price>::new();
        let (executions, execution_lines) = RecordingPublisher::<ExecutionOrder>::new();
        let (positions, position_lines) = RecordingPublisher::<Position>::new();
        let (risk, risk_lines) = RecordingPublisher::<Pv01<Bond>>::new();
        let (streaming, streaming_lines) = RecordingPublisher::<PriceStream>::new();
        let (all_inquiries, inquiry_lines) = RecordingPublisher::<Inquiry>::new();
        let sinks = DeskSinks {
            gui: Box::new(gui),
            executions: Box::new(executions),
            positions: Box::new(positions),
            risk: Box::new(risk),
            streaming: Box::new(streaming),
            all_inquiries: Box::new(all_inquiries),
        };
        let desk = Desk::assemble(
            DeskConfig::default(),
            Arc::new(BondReference::treasuries()),
            sinks,
        );
        let outputs = Outputs {
            gui: gui_lines,
            executions: execution_lines,
            positions: position_lines,
            risk: risk_lines,
            streaming: streaming_lines,
            all_inquiries: inquiry_lines,
        };
        (desk, outputs)
    }

    fn bond(desk: &Desk, id: &str) -> Bond {
        desk.reference().bond(id).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_trade_flows_to_positions_and_risk() {
        let (desk, out) = desk();
        let trade = Trade::new(
            bond(&desk, "91282CAX9"),
            "TradeId0",
            Decimal::from(99),
            "TRSY1",
            1_000_000,
            Side::BUY,
        );
        desk.trade_booking().borrow_mut().on_message(trade).unwrap();

        assert_eq!(
            *out.positions.borrow(),
            vec!["91282CAX9,1000000,0,0,1000000".to_string()]
        );
        // pv01 stand-in for the 2Y is 0.02
        assert_eq!(*out.risk.borrow(), vec!["91282CAX9,20000.000000".to_string()]);
    }

    #[test]
    fn test_tight_book_executes_and_books_trade() {
        let (desk, out) = desk();
        let product = bond(&desk, "91282CAZ4");
        let book = OrderBook::new(
            product,
            vec![BookOrder::new(dec("99.99609375"), 1_000_000, PricingSide::Bid)],
            vec![BookOrder::new(dec("100.00390625"), 1_000_000, PricingSide::Offer)],
        );
        desk.market_data().borrow_mut().on_message(book).unwrap();

        assert_eq!(
            *out.executions.borrow(),
            vec!["91282CAZ4,1,MARKET,BUY,100-001,1000000,1000000".to_string()]
        );
        let booking = desk.trade_booking().borrow();
        let trade = booking.get("1").unwrap();
        assert_eq!(trade.book, "TRSY2");
        assert_eq!(trade.side, Side::BUY);
        assert_eq!(out.positions.borrow().len(), 1);
        assert_eq!(out.risk.borrow().len(), 1);
    }

    #[test]
    fn test_price_reaches_gui_and_streaming() {
        let (desk, out) = desk();
        let price = Price::new(bond(&desk, "912810SS8"), dec("99.5"), dec("0.015625"));
        desk.pricing().borrow_mut().on_message(price).unwrap();

        assert_eq!(
            *out.gui.borrow(),
            vec!["912810SS8,99.500000,0.015625".to_string()]
        );
        assert_eq!(
            *out.streaming.borrow(),
            vec!["912810SS8,99-156,99-162".to_string()]
        );
    }

    #[test]
    fn test_inquiry_reaches_all_inquiries_sink() {
        let (desk, out) = desk();
        let inquiry = Inquiry::received("0", bond(&desk, "91282CAY7"), Side::BUY);
        desk.inquiry().borrow_mut().on_message(inquiry).unwrap();
        assert_eq!(
            *out.all_inquiries.borrow(),
            vec!["91282CAY7,100-00,DONE".to_string()]
        );
    }

    #[test]
    fn test_shutdown_closes_every_sink() {
        let (desk, out) = desk();
        desk.shutdown().unwrap();
        for lines in [
            &out.gui,
            &out.executions,
            &out.positions,
            &out.risk,
            &out.streaming,
            &out.all_inquiries,
        ] {
            assert_eq!(*lines.borrow(), vec![soa::EOF_SENTINEL.to_string()]);
        }
    }

    #[test]
    fn test_run_all_isolates_unreachable_feeds() {
        // bind then drop to get ports nothing listens on
        let ports: Vec<u16> = (0..4)
            .map(|_| {
                let listener = TcpListener::bind("127.0.0.1:0").unwrap();
                listener.local_addr().unwrap().port()
            })
            .collect();

        let (mut desk, _out) = desk();
        desk.config.feeds.trades.port = ports[0];
        desk.config.feeds.market_data.port = ports[1];
        desk.config.feeds.prices.port = ports[2];
        desk.config.feeds.inquiries.port = ports[3];

        let summary = desk.run_all();
        assert!(!summary.is_success());
        assert_eq!(
            summary.failed,
            vec!["trades", "market_data", "prices", "inquiries"]
        );
        assert!(summary.ingested.is_empty());
    }
}
