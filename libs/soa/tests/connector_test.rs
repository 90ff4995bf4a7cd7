//! Loopback tests for the source and sink connectors
//!
//! Each test runs a scripted peer on a thread and drives the connector
//! against it over 127.0.0.1.

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use soa::{
    ConnectorError, LineDecoder, Publisher, Service, ServiceError, SinkConnector, SourceConnector,
    Subscriber, ACK, EOF_SENTINEL,
};
use types::errors::RecordError;
use types::record::{Record, WireEncode};

#[derive(Debug, Clone, PartialEq)]
struct Tick {
    id: String,
    qty: i64,
}

impl Record for Tick {
    fn identifier(&self) -> &str {
        &self.id
    }
}

impl WireEncode for Tick {
    fn to_wire(&self) -> String {
        format!("{},{}", self.id, self.qty)
    }
}

struct TickDecoder;

impl LineDecoder for TickDecoder {
    type Record = Tick;

    fn decode(&self, line: &str) -> Result<Tick, RecordError> {
        let (id, qty) = line
            .split_once(',')
            .ok_or_else(|| RecordError::invalid("tick", line))?;
        let qty = qty.parse().map_err(|_| RecordError::invalid("qty", qty))?;
        Ok(Tick {
            id: id.to_string(),
            qty,
        })
    }
}

fn read_line(reader: &mut BufReader<TcpStream>) -> Option<String> {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end().to_string()),
    }
}

/// Serve `lines` one per request after the handshake, then `EOF`.
/// Returns every line the client sent.
fn source_peer(lines: Vec<&'static str>) -> (SocketAddr, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut writer = stream.try_clone().unwrap();
        let mut reader = BufReader::new(stream);
        let mut received = Vec::new();

        received.push(read_line(&mut reader).unwrap());
        writeln!(writer, "{}", ACK).unwrap();

        let mut pending = lines.into_iter();
        while let Some(request) = read_line(&mut reader) {
            received.push(request);
            match pending.next() {
                Some(line) => writeln!(writer, "{}", line).unwrap(),
                None => writeln!(writer, "{}", EOF_SENTINEL).unwrap(),
            }
        }
        received
    });
    (addr, handle)
}

/// Ack the handshake and every pushed line until `EOF`.
/// Returns the pushed lines, `EOF` included.
fn sink_peer() -> (SocketAddr, JoinHandle<(String, Vec<String>)>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut writer = stream.try_clone().unwrap();
        let mut reader = BufReader::new(stream);

        let name = read_line(&mut reader).unwrap();
        writeln!(writer, "{}", ACK).unwrap();

        let mut pushed = Vec::new();
        while let Some(line) = read_line(&mut reader) {
            let done = line == EOF_SENTINEL;
            pushed.push(line);
            if done {
                break;
            }
            writeln!(writer, "{}", ACK).unwrap();
        }
        (name, pushed)
    });
    (addr, handle)
}

#[test]
fn test_drain_three_lines_then_eof() {
    let (addr, peer) = source_peer(vec!["a,1", "b,2", "a,3"]);
    let mut source = SourceConnector::connect(addr, "ticks.txt", TickDecoder).unwrap();
    let mut service = Service::new("ticks");

    let ingested = source.subscribe(&mut service).unwrap();
    drop(source);

    assert_eq!(ingested, 3);
    assert_eq!(service.len(), 2);
    assert_eq!(service.get("a").unwrap().qty, 3);

    // handshake + three data requests + the request answered with EOF
    let received = peer.join().unwrap();
    assert_eq!(received.len(), 5);
    assert!(received.iter().all(|line| line == "ticks.txt"));
}

#[test]
fn test_empty_feed() {
    let (addr, peer) = source_peer(vec![]);
    let mut source = SourceConnector::connect(addr, "empty.txt", TickDecoder).unwrap();
    let mut service = Service::new("ticks");
    assert_eq!(source.subscribe(&mut service).unwrap(), 0);
    drop(source);
    assert!(service.is_empty());
    peer.join().unwrap();
}

#[test]
fn test_malformed_line_stops_drain() {
    let (addr, peer) = source_peer(vec!["a,1", "garbage", "b,2"]);
    let mut source = SourceConnector::connect(addr, "ticks.txt", TickDecoder).unwrap();
    let mut service = Service::new("ticks");

    let err = source.subscribe(&mut service).unwrap_err();
    drop(source);

    assert!(matches!(err, ServiceError::Record(_)));
    assert_eq!(service.len(), 1);
    assert!(service.get("b").is_none());
    peer.join().unwrap();
}

struct FailingSubscriber {
    seen: usize,
}

impl Subscriber<Tick> for FailingSubscriber {
    fn on_message(&mut self, record: Tick) -> Result<(), ServiceError> {
        self.seen += 1;
        if record.qty < 0 {
            return Err(RecordError::invalid("qty", record.qty.to_string()).into());
        }
        Ok(())
    }
}

#[test]
fn test_downstream_error_stops_drain() {
    let (addr, peer) = source_peer(vec!["a,1", "b,-1", "c,2"]);
    let mut source = SourceConnector::connect(addr, "ticks.txt", TickDecoder).unwrap();
    let mut subscriber = FailingSubscriber { seen: 0 };

    assert!(source.subscribe(&mut subscriber).is_err());
    drop(source);
    assert_eq!(subscriber.seen, 2);
    peer.join().unwrap();
}

#[test]
fn test_sink_publishes_timestamped_lines_and_eof_on_close() {
    let (addr, peer) = sink_peer();
    let mut sink: SinkConnector<Tick> = SinkConnector::connect(addr, "out.txt").unwrap();

    sink.publish(&Tick {
        id: "x".to_string(),
        qty: 5,
    })
    .unwrap();
    sink.publish(&Tick {
        id: "y".to_string(),
        qty: 6,
    })
    .unwrap();
    assert_eq!(sink.published(), 2);

    sink.close().unwrap();
    assert!(sink.is_closed());
    // Second close is a no-op
    sink.close().unwrap();

    let (name, pushed) = peer.join().unwrap();
    assert_eq!(name, "out.txt");
    assert_eq!(pushed.len(), 3);
    let (ts, body) = pushed[0].split_once(',').unwrap();
    assert!(ts.parse::<i64>().unwrap() > 0);
    assert_eq!(body, "x,5");
    assert!(pushed[1].ends_with(",y,6"));
    assert_eq!(pushed[2], EOF_SENTINEL);
}

#[test]
fn test_sink_sends_eof_on_drop() {
    let (addr, peer) = sink_peer();
    {
        let mut sink: SinkConnector<Tick> = SinkConnector::connect(addr, "out.txt").unwrap();
        sink.publish(&Tick {
            id: "z".to_string(),
            qty: 1,
        })
        .unwrap();
    }
    let (_, pushed) = peer.join().unwrap();
    assert_eq!(pushed.last().map(String::as_str), Some(EOF_SENTINEL));
}

#[test]
fn test_publish_after_close_fails() {
    let (addr, peer) = sink_peer();
    let mut sink: SinkConnector<Tick> = SinkConnector::connect(addr, "out.txt").unwrap();
    sink.close().unwrap();
    let err = sink
        .publish(&Tick {
            id: "late".to_string(),
            qty: 1,
        })
        .unwrap_err();
    assert!(matches!(err, ConnectorError::Closed { .. }));
    peer.join().unwrap();
}
