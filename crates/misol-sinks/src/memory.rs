//! In-memory sink keeping the latest value per channel

use anyhow::Result;
use misol_core::{Channel, Sink, Value};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MemorySink {
    latest: HashMap<Channel, Value>,
    published: usize,
    cycles: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel: Channel) -> Option<&Value> {
        self.latest.get(&channel)
    }

    pub fn number(&self, channel: Channel) -> Option<f32> {
        self.get(channel).and_then(Value::as_f32)
    }

    pub fn text(&self, channel: Channel) -> Option<&'static str> {
        self.get(channel).and_then(Value::as_text)
    }

    pub fn flag(&self, channel: Channel) -> Option<bool> {
        self.get(channel).and_then(Value::as_flag)
    }

    /// Total `publish` calls received
    pub fn published(&self) -> usize {
        self.published
    }

    /// Total completed cycles
    pub fn cycles(&self) -> usize {
        self.cycles
    }
}

impl Sink for MemorySink {
    fn publish(&mut self, channel: Channel, value: &Value) -> Result<()> {
        self.latest.insert(channel, *value);
        self.published += 1;
        Ok(())
    }

    fn end_cycle(&mut self) -> Result<()> {
        self.cycles += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_latest_value() {
        let mut sink = MemorySink::new();
        sink.publish(Channel::Temperature, &Value::Number(1.0)).unwrap();
        sink.publish(Channel::Temperature, &Value::Number(2.0)).unwrap();
        sink.end_cycle().unwrap();

        assert_eq!(sink.number(Channel::Temperature), Some(2.0));
        assert_eq!(sink.published(), 2);
        assert_eq!(sink.cycles(), 1);
        assert_eq!(sink.get(Channel::Night), None);
    }
}
