//! Source and sink peers
//!
//! Both roles accept a single connection, read the stream name and
//! resolve it against a root directory. Stream names are relative paths
//! such as `./data/prices.txt`.

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::net::TcpListener;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

use soa::{ConnectorError, LineChannel, ACK, EOF_SENTINEL};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to accept connection: {0}")]
    Accept(#[source] io::Error),

    #[error("File error on {path}: {source}")]
    File {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),
}

impl ServerError {
    fn file(path: &Path, source: io::Error) -> Self {
        ServerError::File {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Accept one peer and read the stream name it announces
fn accept(listener: &TcpListener) -> Result<(LineChannel, String), ServerError> {
    let (stream, _) = listener.accept().map_err(ServerError::Accept)?;
    let mut channel = LineChannel::from_stream(stream)?;
    let name = channel.recv_line()?.trim().to_string();
    info!(stream = %name, peer = %channel.peer(), "peer connected");
    Ok((channel, name))
}

/// Serve `root/<name>` one line per request, then `EOF`
///
/// Blank lines are skipped. A missing file is served as an empty feed.
/// Returns the number of data lines served.
pub fn serve_source(listener: &TcpListener, root: &Path) -> Result<usize, ServerError> {
    let (mut channel, stream) = accept(listener)?;
    let path = root.join(&stream);

    let lines: Vec<String> = match fs::read_to_string(&path) {
        Ok(content) => content
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "feed file not found, serving empty feed");
            Vec::new()
        }
        Err(e) => return Err(ServerError::file(&path, e)),
    };

    channel.send_line(ACK)?;

    let mut served = 0;
    for line in &lines {
        channel.recv_line()?;
        channel.send_line(line)?;
        served += 1;
    }
    channel.recv_line()?;
    channel.send_line(EOF_SENTINEL)?;

    info!(stream = %stream, served, "source feed finished");
    Ok(served)
}

/// Append every pushed line to `root/<name>` until `EOF`
///
/// Parent directories are created. Returns the number of lines recorded.
pub fn serve_sink(listener: &TcpListener, root: &Path) -> Result<usize, ServerError> {
    let (mut channel, stream) = accept(listener)?;
    let path = root.join(&stream);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ServerError::file(parent, e))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| ServerError::file(&path, e))?;
    let mut out = BufWriter::new(file);

    channel.send_line(ACK)?;

    let mut recorded = 0;
    loop {
        let line = channel.recv_line()?;
        if line.trim() == EOF_SENTINEL {
            break;
        }
        writeln!(out, "{}", line.trim()).map_err(|e| ServerError::file(&path, e))?;
        recorded += 1;
        debug!(stream = %stream, recorded, "line recorded");
        channel.send_line(ACK)?;
    }
    out.flush().map_err(|e| ServerError::file(&path, e))?;

    info!(stream = %stream, recorded, "sink stream closed");
    Ok(recorded)
}
