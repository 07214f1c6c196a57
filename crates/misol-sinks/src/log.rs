//! Sink writing every value to the tracing log

use anyhow::Result;
use misol_core::{Channel, Sink, Value};

#[derive(Debug, Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for LogSink {
    fn publish(&mut self, channel: Channel, value: &Value) -> Result<()> {
        tracing::info!(channel = channel.name(), %value, "Publish");
        Ok(())
    }
}
