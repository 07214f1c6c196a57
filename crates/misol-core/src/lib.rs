//! Protocol decoding and derived values for the Misol weather-station sensor array
//!
//! This crate turns the array's checksummed serial frames into typed
//! measurements and qualitative descriptions. It does no I/O of its own;
//! bytes come from a [`ByteSource`] and results go to a [`Sink`].

pub mod condition;
pub mod decode;
pub mod describe;
pub mod encode;
pub mod engine;
pub mod frame;
pub mod liveness;
pub mod night;
pub mod pipeline;
pub mod rate;
pub mod settings;
pub mod types;

pub use condition::*;
pub use decode::*;
pub use describe::*;
pub use encode::*;
pub use engine::*;
pub use frame::*;
pub use liveness::*;
pub use night::*;
pub use pipeline::*;
pub use rate::*;
pub use settings::*;
pub use types::*;
