// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Protocol layer for SBS-1 message decoding.
//!
//! The [`Protocol`] trait is the byte-oriented seam a feed reader plugs into;
//! [`Decoder`] implements it for the BaseStation/SBS-1 text format.

mod basestation;

pub use basestation::Decoder;
pub(crate) use basestation::decode_line;

use thiserror::Error;

/// Number of comma-separated fields in every SBS-1 line.
pub const SBS1_FIELD_COUNT: usize = 22;

/// Errors that can occur while decoding a line or its timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("expected {expected} fields, found {found}")]
    FieldCountMismatch { expected: usize, found: usize },

    #[error("unknown message kind: {0:?}")]
    UnknownMessageKind(String),

    #[error("transmission type out of range 1-8: {0}")]
    InvalidTransmissionSubtype(i64),

    #[error("invalid integer for field '{field}': {value}")]
    InvalidIntegerField { field: &'static str, value: String },

    #[error("invalid float for field '{field}': {value}")]
    InvalidFloatField { field: &'static str, value: String },

    #[error("invalid timestamp: date {date:?}, time {time:?}")]
    InvalidTimestamp { date: String, time: String },

    #[error("invalid UTF-8 in input")]
    InvalidUtf8,
}

/// Trait for protocol parsers.
pub trait Protocol {
    /// The message type produced by this parser.
    type Message;
    /// The error type for parsing failures.
    type Error;

    /// Parse input bytes into a message.
    ///
    /// Returns `Ok(Some(message))` if parsing succeeded,
    /// `Ok(None)` if the input is valid but doesn't produce a message,
    /// or `Err(error)` if parsing failed.
    fn parse(&mut self, input: &[u8]) -> Result<Option<Self::Message>, Self::Error>;
}
