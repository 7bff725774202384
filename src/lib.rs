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

//! Decoder for the SBS-1/BaseStation ADS-B text protocol.
//!
//! BaseStation-compatible receivers (dump1090, readsb, SBS-1 hardware) emit one
//! comma-separated line per surveillance event on port 30003. This crate turns a
//! single such line into an immutable [`Sbs1Message`] with every field coerced
//! to its semantic type.
//!
//! Reading lines from a socket and aggregating messages into aircraft state are
//! left to the caller.
//!
//! # Quick Start
//!
//! ```
//! use sbs1::{decode, MessageKind, TransmissionType};
//!
//! let line = "MSG,3,1,1,4CA2C6,,2023-01-01,00:00:01.000,2023-01-01,00:00:01.123,,38000,,,51.4775,-0.4614,,,,,,0";
//! let msg = decode(line).unwrap();
//!
//! assert_eq!(msg.message_kind(), MessageKind::Transmission);
//! assert_eq!(msg.transmission_subtype(), Some(TransmissionType::EsAirbornePosition));
//! assert_eq!(msg.altitude(), Some(38000));
//! assert_eq!(msg.is_on_ground(), Some(false));
//! ```
//!
//! # Byte-Oriented Parsing
//!
//! [`Decoder`] implements the [`Protocol`] trait for callers that receive raw
//! bytes and want blank keep-alive lines skipped rather than rejected:
//!
//! ```
//! use sbs1::{Decoder, DecoderConfig, Protocol};
//!
//! let mut decoder = Decoder::new(DecoderConfig {
//!     strip_line_ending: true,
//!     ..Default::default()
//! });
//! let line = b"MSG,5,1,1,A1B2C3,1,2024/01/01,12:00:00.000,2024/01/01,12:00:00.000,,30000,,,,,,1200,0,0,0,0\r\n";
//! if let Ok(Some(msg)) = decoder.parse(line) {
//!     assert_eq!(msg.squawk(), Some("1200"));
//! }
//! ```

pub mod config;
pub mod message;
pub mod protocol;

pub use config::DecoderConfig;
pub use message::{MessageKind, Sbs1Message, TransmissionType};
pub use protocol::{DecodeError, Decoder, Protocol, SBS1_FIELD_COUNT};

/// Decode a single SBS-1 line using the default configuration.
///
/// The line must already be split from its stream and must not carry a line
/// terminator; fields are used exactly as they appear between commas.
pub fn decode(line: &str) -> Result<Sbs1Message, DecodeError> {
    protocol::decode_line(line)
}
