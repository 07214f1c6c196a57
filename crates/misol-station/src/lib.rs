//! Station driver for the Misol sensor array
//!
//! Drives the decoder from a non-blocking byte source: the poll-driven
//! [`WeatherStation`] plus simulated and replayed sources. Serial port
//! plumbing is left to the host; anything implementing
//! [`misol_core::ByteSource`] can feed the station.

pub mod replay;
pub mod simulator;
pub mod station;

pub use replay::*;
pub use simulator::*;
pub use station::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationError {
    #[error("Failed to read capture {path}: {source}")]
    Capture {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Capture is empty: {0}")]
    EmptyCapture(String),

    #[error("Invalid hex byte in capture: {0}")]
    InvalidHex(String),
}

pub type StationResult<T> = Result<T, StationError>;
