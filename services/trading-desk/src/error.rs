//! Desk-level errors

use soa::{ConnectorError, ServiceError};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Connector error: {0}")]
    Connector(#[from] ConnectorError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

pub type DeskResult<T> = Result<T, DeskError>;
