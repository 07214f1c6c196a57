use anyhow::Result;
use std::collections::VecDeque;

use crate::{Channel, Value};

/// Transport that hands over received bytes without blocking
pub trait ByteSource {
    /// Bytes ready to be read right now
    fn available(&mut self) -> usize;

    fn read(&mut self) -> Option<u8>;
}

/// Receiver of decoded and derived values
pub trait Sink {
    fn publish(&mut self, channel: Channel, value: &Value) -> Result<()>;

    /// Called once after each batch of publications
    fn end_cycle(&mut self) -> Result<()> {
        Ok(())
    }
}

impl ByteSource for VecDeque<u8> {
    fn available(&mut self) -> usize {
        self.len()
    }

    fn read(&mut self) -> Option<u8> {
        self.pop_front()
    }
}

impl<T: ByteSource + ?Sized> ByteSource for Box<T> {
    fn available(&mut self) -> usize {
        (**self).available()
    }

    fn read(&mut self) -> Option<u8> {
        (**self).read()
    }
}

impl<T: Sink + ?Sized> Sink for Box<T> {
    fn publish(&mut self, channel: Channel, value: &Value) -> Result<()> {
        (**self).publish(channel, value)
    }

    fn end_cycle(&mut self) -> Result<()> {
        (**self).end_cycle()
    }
}
