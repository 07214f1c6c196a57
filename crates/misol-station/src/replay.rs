//! Replays a capture of the serial line
//!
//! Binary captures are streamed as-is. Files with a `.hex` extension hold
//! hex bytes separated by whitespace, dots or commas, as printed in the
//! station's debug logs; `#` starts a comment and `(n)` length tags are skipped.

use crate::{StationError, StationResult};
use misol_core::ByteSource;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use tracing::info;

/// Byte source releasing at most `chunk` bytes per poll
pub struct ReplaySource {
    data: VecDeque<u8>,
    chunk: usize,
    window: usize,
}

impl ReplaySource {
    pub fn open<P: AsRef<Path>>(path: P, chunk: usize) -> StationResult<Self> {
        let path = path.as_ref();
        let raw = fs::read(path).map_err(|source| StationError::Capture {
            path: path.display().to_string(),
            source,
        })?;

        let bytes = if path.extension().map_or(false, |ext| ext == "hex") {
            parse_hex(&String::from_utf8_lossy(&raw))?
        } else {
            raw
        };
        if bytes.is_empty() {
            return Err(StationError::EmptyCapture(path.display().to_string()));
        }

        info!(path = %path.display(), bytes = bytes.len(), chunk, "Loaded capture");
        Ok(Self::from_bytes(bytes, chunk))
    }

    pub fn from_bytes(bytes: Vec<u8>, chunk: usize) -> Self {
        Self {
            data: bytes.into(),
            chunk: chunk.max(1),
            window: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.data.is_empty()
    }
}

impl ByteSource for ReplaySource {
    fn available(&mut self) -> usize {
        if self.window == 0 {
            self.window = self.chunk.min(self.data.len());
        }
        self.window
    }

    fn read(&mut self) -> Option<u8> {
        let byte = self.data.pop_front()?;
        self.window = self.window.saturating_sub(1);
        Some(byte)
    }
}

fn parse_hex(text: &str) -> StationResult<Vec<u8>> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .flat_map(|line| line.split(|c: char| c.is_whitespace() || c == '.' || c == ','))
        .filter(|token| !token.is_empty() && !token.starts_with('('))
        .map(|token| {
            u8::from_str_radix(token, 16).map_err(|_| StationError::InvalidHex(token.to_string()))
        })
        .collect()
}
