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

//! BaseStation/SBS-1 protocol decoder.
//!
//! Decodes the CSV-based BaseStation format emitted by dump1090 and similar
//! ADS-B decoders on port 30003.
//!
//! Message format:
//! ```text
//! MSG,<type>,<session>,<aircraft>,<icao>,<flight>,<date>,<time>,<date>,<time>,
//!     <callsign>,<altitude>,<speed>,<track>,<lat>,<lon>,<vrate>,<squawk>,
//!     <alert>,<emergency>,<spi>,<on_ground>
//! ```

use log::{debug, trace};

use super::{DecodeError, Protocol, SBS1_FIELD_COUNT};
use crate::config::DecoderConfig;
use crate::message::{MessageKind, Sbs1Message};

/// Configurable SBS-1 decoder.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Create a decoder with the given configuration.
    #[must_use]
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// The configuration this decoder was built with.
    #[must_use]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode one line, applying the configured line ending and blank line handling.
    ///
    /// Returns `Ok(None)` for a blank line when `skip_empty_lines` is set.
    pub fn decode_str(&self, line: &str) -> Result<Option<Sbs1Message>, DecodeError> {
        let line = if self.config.strip_line_ending {
            strip_line_ending(line)
        } else {
            line
        };

        if line.is_empty() && self.config.skip_empty_lines {
            trace!("Skipping empty SBS-1 line");
            return Ok(None);
        }

        match decode_line(line) {
            Ok(msg) => Ok(Some(msg)),
            Err(e) => {
                debug!("Rejected SBS-1 line {line:?}: {e}");
                Err(e)
            }
        }
    }
}

impl Protocol for Decoder {
    type Message = Sbs1Message;
    type Error = DecodeError;

    fn parse(&mut self, input: &[u8]) -> Result<Option<Sbs1Message>, DecodeError> {
        let line = std::str::from_utf8(input).map_err(|e| {
            debug!("Rejected non UTF-8 SBS-1 line: {e}");
            DecodeError::InvalidUtf8
        })?;

        self.decode_str(line)
    }
}

/// Remove one trailing `\n`, `\r\n` or `\r`.
fn strip_line_ending(line: &str) -> &str {
    if let Some(stripped) = line.strip_suffix("\r\n") {
        return stripped;
    }
    line.strip_suffix('\n')
        .or_else(|| line.strip_suffix('\r'))
        .unwrap_or(line)
}

/// Empty fields are absent.
fn optional(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn optional_string(value: &str) -> Option<String> {
    optional(value).map(str::to_string)
}

/// Parse a base-10 integer field.
fn parse_int(field: &'static str, value: &str) -> Result<Option<i64>, DecodeError> {
    optional(value)
        .map(|v| {
            v.parse::<i64>().map_err(|_parse_error| DecodeError::InvalidIntegerField {
                field,
                value: v.to_string(),
            })
        })
        .transpose()
}

fn parse_float(field: &'static str, value: &str) -> Result<Option<f64>, DecodeError> {
    optional(value)
        .map(|v| {
            v.parse::<f64>().map_err(|_parse_error| DecodeError::InvalidFloatField {
                field,
                value: v.to_string(),
            })
        })
        .transpose()
}

/// Parse a SBS-1 flag field. "0" is false, any other non-empty value is true.
fn parse_bool_flag(value: &str) -> Option<bool> {
    optional(value).map(|v| v != "0")
}

/// Decode a single BaseStation line into a message.
pub(crate) fn decode_line(line: &str) -> Result<Sbs1Message, DecodeError> {
    let parts: Vec<&str> = line.split(',').collect();
    let found = parts.len();
    let fields: [&str; SBS1_FIELD_COUNT] =
        parts.try_into().map_err(|_rejected: Vec<&str>| DecodeError::FieldCountMismatch {
            expected: SBS1_FIELD_COUNT,
            found,
        })?;

    let [
        kind,
        transmission_type,
        session_id,
        aircraft_id,
        hex_ident,
        flight_id,
        generated_date,
        generated_time,
        logged_date,
        logged_time,
        callsign,
        altitude,
        ground_speed,
        track,
        lat,
        lon,
        vertical_rate,
        squawk,
        alert,
        emergency,
        spi,
        is_on_ground,
    ] = fields;

    let message_kind: MessageKind = kind.parse()?;

    let transmission_type = parse_int("transmission_type", transmission_type)?;
    if message_kind == MessageKind::Transmission {
        if let Some(code) = transmission_type {
            if !(1..=8).contains(&code) {
                return Err(DecodeError::InvalidTransmissionSubtype(code));
            }
        }
    }

    Ok(Sbs1Message {
        message_kind,
        transmission_type,
        session_id: parse_int("session_id", session_id)?,
        aircraft_id: parse_int("aircraft_id", aircraft_id)?,
        hex_ident: optional_string(hex_ident),
        flight_id: parse_int("flight_id", flight_id)?,
        generated_date: optional_string(generated_date),
        generated_time: optional_string(generated_time),
        logged_date: optional_string(logged_date),
        logged_time: optional_string(logged_time),
        callsign: optional_string(callsign),
        altitude: parse_int("altitude", altitude)?,
        ground_speed: parse_int("ground_speed", ground_speed)?,
        track: parse_int("track", track)?,
        lat: parse_float("lat", lat)?,
        lon: parse_float("lon", lon)?,
        vertical_rate: parse_int("vertical_rate", vertical_rate)?,
        squawk: optional_string(squawk),
        alert: parse_bool_flag(alert),
        emergency: parse_bool_flag(emergency),
        spi: parse_bool_flag(spi),
        is_on_ground: parse_bool_flag(is_on_ground),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSITION: &str = "MSG,3,1,1,4CA2C6,,2023-01-01,00:00:01.000,2023-01-01,00:00:01.123,,38000,,,51.4775,-0.4614,,,,,,0";

    /// Build a 22-field line with the given (index, value) pairs filled in.
    fn line_with(kind: &str, values: &[(usize, &str)]) -> String {
        let mut fields = vec![""; SBS1_FIELD_COUNT];
        fields[0] = kind;
        for &(index, value) in values {
            fields[index] = value;
        }
        fields.join(",")
    }

    #[test]
    fn test_parse_position() {
        let msg = decode_line(POSITION).unwrap();
        assert_eq!(msg.message_kind(), MessageKind::Transmission);
        assert_eq!(msg.transmission_type(), Some(3));
        assert_eq!(msg.hex_ident(), Some("4CA2C6"));
        assert_eq!(msg.altitude(), Some(38000));
        assert!((msg.lat().unwrap() - 51.4775).abs() < 0.0001);
        assert!((msg.lon().unwrap() - (-0.4614)).abs() < 0.0001);
        assert_eq!(msg.is_on_ground(), Some(false));
        assert_eq!(msg.callsign(), None);
    }

    #[test]
    fn test_parse_every_message_kind() {
        for kind in MessageKind::ALL {
            let msg = decode_line(&line_with(kind.tag(), &[(4, "A1B2C3")])).unwrap();
            assert_eq!(msg.message_kind(), kind);
        }
    }

    #[test]
    fn test_parse_unknown_message_kind() {
        let result = decode_line(&line_with("XYZ", &[(1, "3")]));
        assert!(matches!(result, Err(DecodeError::UnknownMessageKind(tag)) if tag == "XYZ"));
    }

    #[test]
    fn test_parse_empty_message_kind() {
        let result = decode_line(&line_with("", &[]));
        assert!(matches!(result, Err(DecodeError::UnknownMessageKind(tag)) if tag.is_empty()));
    }

    #[test]
    fn test_parse_field_count_mismatch() {
        let short = vec![""; 21].join(",");
        assert_eq!(
            decode_line(&short),
            Err(DecodeError::FieldCountMismatch { expected: 22, found: 21 })
        );

        let long = format!("{POSITION},");
        assert_eq!(
            decode_line(&long),
            Err(DecodeError::FieldCountMismatch { expected: 22, found: 23 })
        );
    }

    #[test]
    fn test_parse_empty_line() {
        assert_eq!(
            decode_line(""),
            Err(DecodeError::FieldCountMismatch { expected: 22, found: 1 })
        );
    }

    #[test]
    fn test_all_empty_fields_are_absent() {
        let msg = decode_line(&line_with("MSG", &[])).unwrap();
        assert_eq!(msg.transmission_type(), None);
        assert_eq!(msg.session_id(), None);
        assert_eq!(msg.aircraft_id(), None);
        assert_eq!(msg.hex_ident(), None);
        assert_eq!(msg.flight_id(), None);
        assert_eq!(msg.generated_date(), None);
        assert_eq!(msg.generated_time(), None);
        assert_eq!(msg.logged_date(), None);
        assert_eq!(msg.logged_time(), None);
        assert_eq!(msg.callsign(), None);
        assert_eq!(msg.altitude(), None);
        assert_eq!(msg.ground_speed(), None);
        assert_eq!(msg.track(), None);
        assert_eq!(msg.lat(), None);
        assert_eq!(msg.lon(), None);
        assert_eq!(msg.vertical_rate(), None);
        assert_eq!(msg.squawk(), None);
        assert_eq!(msg.alert(), None);
        assert_eq!(msg.emergency(), None);
        assert_eq!(msg.spi(), None);
        assert_eq!(msg.is_on_ground(), None);
    }

    #[test]
    fn test_parse_int_values() {
        assert_eq!(parse_int("altitude", "123"), Ok(Some(123)));
        assert_eq!(parse_int("vertical_rate", "-5"), Ok(Some(-5)));
        assert_eq!(parse_int("altitude", ""), Ok(None));
        assert!(matches!(
            parse_int("altitude", "12.5"),
            Err(DecodeError::InvalidIntegerField { field: "altitude", value }) if value == "12.5"
        ));
    }

    #[test]
    fn test_parse_float_values() {
        let lat = parse_float("lat", "51.4775").unwrap().unwrap();
        assert!((lat - 51.4775).abs() < f64::EPSILON);
        assert_eq!(parse_float("lat", ""), Ok(None));
        assert!(matches!(
            parse_float("lon", "abc"),
            Err(DecodeError::InvalidFloatField { field: "lon", value }) if value == "abc"
        ));
    }

    #[test]
    fn test_parse_bool_flag_values() {
        assert_eq!(parse_bool_flag("0"), Some(false));
        assert_eq!(parse_bool_flag("1"), Some(true));
        assert_eq!(parse_bool_flag("-1"), Some(true));
        assert_eq!(parse_bool_flag("9"), Some(true));
        assert_eq!(parse_bool_flag(""), None);
    }

    #[test]
    fn test_invalid_integer_field_is_named() {
        let result = decode_line(&line_with("MSG", &[(1, "4"), (12, "fast")]));
        assert!(matches!(
            result,
            Err(DecodeError::InvalidIntegerField { field: "ground_speed", value }) if value == "fast"
        ));
    }

    #[test]
    fn test_transmission_subtype_range() {
        let result = decode_line(&line_with("MSG", &[(1, "9")]));
        assert_eq!(result, Err(DecodeError::InvalidTransmissionSubtype(9)));

        let result = decode_line(&line_with("MSG", &[(1, "0")]));
        assert_eq!(result, Err(DecodeError::InvalidTransmissionSubtype(0)));

        let msg = decode_line(&line_with("MSG", &[(1, "3")])).unwrap();
        assert_eq!(
            msg.transmission_subtype(),
            Some(crate::TransmissionType::EsAirbornePosition)
        );
    }

    #[test]
    fn test_subtype_not_range_checked_for_other_kinds() {
        let msg = decode_line(&line_with("STA", &[(1, "42")])).unwrap();
        assert_eq!(msg.transmission_type(), Some(42));
    }

    #[test]
    fn test_squawk_keeps_leading_zeros() {
        let msg = decode_line(&line_with("MSG", &[(1, "6"), (17, "0042")])).unwrap();
        assert_eq!(msg.squawk(), Some("0042"));
    }

    #[test]
    fn test_fields_are_not_trimmed() {
        let msg = decode_line(&line_with("MSG", &[(1, "1"), (10, "UAL123  ")])).unwrap();
        assert_eq!(msg.callsign(), Some("UAL123  "));
    }

    #[test]
    fn test_decode_is_deterministic() {
        assert_eq!(decode_line(POSITION), decode_line(POSITION));
    }

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending("MSG\r\n"), "MSG");
        assert_eq!(strip_line_ending("MSG\n"), "MSG");
        assert_eq!(strip_line_ending("MSG\r"), "MSG");
        assert_eq!(strip_line_ending("MSG\n\n"), "MSG\n");
        assert_eq!(strip_line_ending("MSG"), "MSG");
    }

    #[test]
    fn test_decoder_strips_line_ending() {
        let mut decoder = Decoder::new(DecoderConfig {
            strip_line_ending: true,
            ..Default::default()
        });
        let line = format!("{POSITION}\r\n");
        let msg = decoder.parse(line.as_bytes()).unwrap().unwrap();
        assert_eq!(msg.is_on_ground(), Some(false));
    }

    #[test]
    fn test_decoder_keeps_line_ending_by_default() {
        let decoder = Decoder::default();
        let line = format!("{POSITION}\r");
        let msg = decoder.decode_str(&line).unwrap().unwrap();
        // "0\r" is not "0", so the lenient flag reads it as true
        assert_eq!(msg.is_on_ground(), Some(true));
    }

    #[test]
    fn test_decoder_skips_empty_lines() {
        let mut decoder = Decoder::default();
        assert_eq!(decoder.parse(b""), Ok(None));

        let mut strict = Decoder::new(DecoderConfig {
            skip_empty_lines: false,
            ..Default::default()
        });
        assert!(matches!(
            strict.parse(b""),
            Err(DecodeError::FieldCountMismatch { found: 1, .. })
        ));
    }

    #[test]
    fn test_decoder_exposes_config() {
        let config = DecoderConfig {
            strip_line_ending: true,
            skip_empty_lines: false,
        };
        assert_eq!(Decoder::new(config).config(), &config);
    }

    #[test]
    fn test_decoder_rejects_invalid_utf8() {
        let mut decoder = Decoder::default();
        assert_eq!(decoder.parse(&[0x4d, 0xff, 0x47]), Err(DecodeError::InvalidUtf8));
    }
}
