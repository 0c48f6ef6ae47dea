//! sut-protocol: Wire protocol for the SUT agent
//!
//! The SUT agent runs on each test device and accepts line-oriented
//! commands over TCP. Every reply, including the greeting sent on connect,
//! is terminated by the agent prompt. This crate encodes commands and splits
//! the reply stream into individual responses.

pub mod codec;
pub mod command;
pub mod error;
pub mod response;

pub use codec::{SutCodec, MAX_RESPONSE_SIZE, PROMPT};
pub use command::{SutCommand, DEFAULT_PORT};
pub use error::ProtocolError;
pub use response::{Response, AGENT_WARNING};
