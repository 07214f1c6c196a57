use anyhow::Result;

pub mod log;
pub mod memory;

pub use log::LogSink;
pub use memory::MemorySink;

use chrono::{DateTime, Utc};
use misol_core::{Channel, Sink, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One JSON line per cycle with every value published in it
pub struct JsonlSink {
    file: PathBuf,
    current: BTreeMap<Channel, Value>,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    timestamp: DateTime<Utc>,
    values: &'a BTreeMap<Channel, Value>,
}

impl JsonlSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        create_dir_all(dir)?;
        Ok(Self {
            file: dir.join("readings.jsonl"),
            current: BTreeMap::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file
    }
}

impl Sink for JsonlSink {
    fn publish(&mut self, channel: Channel, value: &Value) -> Result<()> {
        self.current.insert(channel, *value);
        Ok(())
    }

    fn end_cycle(&mut self) -> Result<()> {
        if self.current.is_empty() {
            return Ok(());
        }
        let line = serde_json::to_string(&Snapshot {
            timestamp: Utc::now(),
            values: &self.current,
        })?;
        self.current.clear();

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file)?;
        f.write_all(line.as_bytes())?;
        f.write_all(b"\n")?;
        Ok(())
    }
}

/// Forwards every call to each inner sink; the first error is reported after all have run
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn Sink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl Sink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Sink for FanoutSink {
    fn publish(&mut self, channel: Channel, value: &Value) -> Result<()> {
        let mut first_err = None;
        for sink in &mut self.sinks {
            if let Err(e) = sink.publish(channel, value) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn end_cycle(&mut self) -> Result<()> {
        let mut first_err = None;
        for sink in &mut self.sinks {
            if let Err(e) = sink.end_cycle() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_line_per_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonlSink::new(dir.path()).unwrap();

        sink.publish(Channel::Temperature, &Value::Number(20.5)).unwrap();
        sink.publish(Channel::WindDirection, &Value::Text("NNE")).unwrap();
        sink.publish(Channel::Humidity, &Value::Number(f32::NAN)).unwrap();
        sink.end_cycle().unwrap();
        sink.end_cycle().unwrap();

        let content = std::fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);

        let json: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(json["values"]["temperature"], 20.5);
        assert_eq!(json["values"]["wind_direction"], "NNE");
        assert!(json["values"]["humidity"].is_null());
        assert!(json["timestamp"].is_string());
    }

    struct Failing;

    impl Sink for Failing {
        fn publish(&mut self, _channel: Channel, _value: &Value) -> Result<()> {
            anyhow::bail!("offline")
        }
    }

    #[test]
    fn fanout_reaches_every_sink_despite_errors() {
        let mut sink = FanoutSink::new().with(Failing).with(MemorySink::new());
        assert_eq!(sink.len(), 2);

        let err = sink
            .publish(Channel::Night, &Value::Flag(Some(true)))
            .unwrap_err();
        assert_eq!(err.to_string(), "offline");
        assert!(sink.end_cycle().is_ok());
    }
}
