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

//! Decoded SBS-1 message types.
//!
//! BaseStation messages carry 22 positional fields. Only the first one, the
//! message kind, is always present; every other field may be empty on the wire
//! and is therefore optional here.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::protocol::DecodeError;

/// Date layouts seen in the generated/logged date fields.
const DATE_FORMATS: [&str; 2] = ["%Y/%m/%d", "%Y-%m-%d"];
/// Time layout for the generated/logged time fields; fractional seconds are optional.
const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// Message category carried in field 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MessageKind {
    /// `SEL`: the operator selected a different aircraft.
    #[serde(rename = "SEL")]
    SelectionChange,
    /// `ID`: a tracked aircraft set or changed its callsign.
    #[serde(rename = "ID")]
    NewId,
    /// `AIR`: first signal from an aircraft that is not yet tracked.
    #[serde(rename = "AIR")]
    NewAircraft,
    /// `STA`: an aircraft's status changed per the receiver's time-outs.
    #[serde(rename = "STA")]
    StatusChange,
    /// `CLK`: the operator opened the details window for an aircraft.
    #[serde(rename = "CLK")]
    Click,
    /// `MSG`: transmission from the aircraft itself, see [`TransmissionType`].
    #[serde(rename = "MSG")]
    Transmission,
}

impl MessageKind {
    /// All message kinds in protocol order.
    pub const ALL: [Self; 6] = [
        Self::SelectionChange,
        Self::NewId,
        Self::NewAircraft,
        Self::StatusChange,
        Self::Click,
        Self::Transmission,
    ];

    /// The tag used on the wire.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::SelectionChange => "SEL",
            Self::NewId => "ID",
            Self::NewAircraft => "AIR",
            Self::StatusChange => "STA",
            Self::Click => "CLK",
            Self::Transmission => "MSG",
        }
    }
}

impl FromStr for MessageKind {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| DecodeError::UnknownMessageKind(s.to_string()))
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Transmission subtype of a `MSG` line (field 2).
///
/// | Code | Message | Downlink format |
/// |------|---------|-----------------|
/// | 1 | ES identification and category | DF17 BDS 0,8 |
/// | 2 | ES surface position | DF17 BDS 0,6 |
/// | 3 | ES airborne position | DF17 BDS 0,5 |
/// | 4 | ES airborne velocity | DF17 BDS 0,9 |
/// | 5 | Surveillance altitude | DF4, DF20 |
/// | 6 | Surveillance ID (squawk) | DF5, DF21 |
/// | 7 | Air-to-air | DF16 |
/// | 8 | All-call reply | DF11 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransmissionType {
    EsIdentAndCategory = 1,
    /// Triggered by the nose gear squat switch.
    EsSurfacePosition = 2,
    EsAirbornePosition = 3,
    EsAirborneVelocity = 4,
    /// Triggered by ground radar, not CRC secured.
    SurveillanceAltitude = 5,
    /// Triggered by ground radar, not CRC secured.
    SurveillanceId = 6,
    /// Triggered by TCAS.
    AirToAir = 7,
    AllCallReply = 8,
}

impl TransmissionType {
    /// All transmission subtypes in code order.
    pub const ALL: [Self; 8] = [
        Self::EsIdentAndCategory,
        Self::EsSurfacePosition,
        Self::EsAirbornePosition,
        Self::EsAirborneVelocity,
        Self::SurveillanceAltitude,
        Self::SurveillanceId,
        Self::AirToAir,
        Self::AllCallReply,
    ];

    /// Numeric code as it appears in field 2.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up a subtype by its numeric code.
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|t| i64::from(t.code()) == code)
    }
}

impl fmt::Display for TransmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One decoded SBS-1 line.
///
/// Built only by the decoder; all fields are read through accessors so a
/// record never changes after decoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sbs1Message {
    pub(crate) message_kind: MessageKind,
    pub(crate) transmission_type: Option<i64>,
    pub(crate) session_id: Option<i64>,
    pub(crate) aircraft_id: Option<i64>,
    pub(crate) hex_ident: Option<String>,
    pub(crate) flight_id: Option<i64>,
    pub(crate) generated_date: Option<String>,
    pub(crate) generated_time: Option<String>,
    pub(crate) logged_date: Option<String>,
    pub(crate) logged_time: Option<String>,
    pub(crate) callsign: Option<String>,
    pub(crate) altitude: Option<i64>,
    pub(crate) ground_speed: Option<i64>,
    pub(crate) track: Option<i64>,
    pub(crate) lat: Option<f64>,
    pub(crate) lon: Option<f64>,
    pub(crate) vertical_rate: Option<i64>,
    pub(crate) squawk: Option<String>,
    pub(crate) alert: Option<bool>,
    pub(crate) emergency: Option<bool>,
    pub(crate) spi: Option<bool>,
    pub(crate) is_on_ground: Option<bool>,
}

impl Sbs1Message {
    #[must_use]
    pub fn message_kind(&self) -> MessageKind {
        self.message_kind
    }

    /// Raw integer from field 2.
    ///
    /// Range-checked to 1-8 only for `MSG` lines; other kinds pass it through.
    #[must_use]
    pub fn transmission_type(&self) -> Option<i64> {
        self.transmission_type
    }

    /// Typed transmission subtype, for `MSG` lines only.
    #[must_use]
    pub fn transmission_subtype(&self) -> Option<TransmissionType> {
        if self.message_kind != MessageKind::Transmission {
            return None;
        }
        self.transmission_type.and_then(TransmissionType::from_code)
    }

    #[must_use]
    pub fn session_id(&self) -> Option<i64> {
        self.session_id
    }

    #[must_use]
    pub fn aircraft_id(&self) -> Option<i64> {
        self.aircraft_id
    }

    /// ICAO 24-bit address as sent (hex string, e.g. "4CA2C6").
    #[must_use]
    pub fn hex_ident(&self) -> Option<&str> {
        self.hex_ident.as_deref()
    }

    /// Alias for [`Self::hex_ident`].
    #[must_use]
    pub fn icao(&self) -> Option<&str> {
        self.hex_ident()
    }

    #[must_use]
    pub fn flight_id(&self) -> Option<i64> {
        self.flight_id
    }

    #[must_use]
    pub fn generated_date(&self) -> Option<&str> {
        self.generated_date.as_deref()
    }

    #[must_use]
    pub fn generated_time(&self) -> Option<&str> {
        self.generated_time.as_deref()
    }

    #[must_use]
    pub fn logged_date(&self) -> Option<&str> {
        self.logged_date.as_deref()
    }

    #[must_use]
    pub fn logged_time(&self) -> Option<&str> {
        self.logged_time.as_deref()
    }

    #[must_use]
    pub fn callsign(&self) -> Option<&str> {
        self.callsign.as_deref()
    }

    /// Altitude in feet.
    #[must_use]
    pub fn altitude(&self) -> Option<i64> {
        self.altitude
    }

    /// Ground speed in knots.
    #[must_use]
    pub fn ground_speed(&self) -> Option<i64> {
        self.ground_speed
    }

    /// Track angle in degrees.
    #[must_use]
    pub fn track(&self) -> Option<i64> {
        self.track
    }

    #[must_use]
    pub fn lat(&self) -> Option<f64> {
        self.lat
    }

    #[must_use]
    pub fn lon(&self) -> Option<f64> {
        self.lon
    }

    /// True when both latitude and longitude are present.
    #[must_use]
    pub fn has_position(&self) -> bool {
        self.lat.is_some() && self.lon.is_some()
    }

    /// Vertical rate in feet per minute (positive = climb).
    #[must_use]
    pub fn vertical_rate(&self) -> Option<i64> {
        self.vertical_rate
    }

    /// Squawk code exactly as sent, leading zeros included.
    #[must_use]
    pub fn squawk(&self) -> Option<&str> {
        self.squawk.as_deref()
    }

    /// Squawk changed flag.
    #[must_use]
    pub fn alert(&self) -> Option<bool> {
        self.alert
    }

    #[must_use]
    pub fn emergency(&self) -> Option<bool> {
        self.emergency
    }

    /// Special Position Identification flag.
    #[must_use]
    pub fn spi(&self) -> Option<bool> {
        self.spi
    }

    #[must_use]
    pub fn is_on_ground(&self) -> Option<bool> {
        self.is_on_ground
    }

    /// When the receiver generated the message.
    ///
    /// `Ok(None)` if either the date or the time field is empty.
    pub fn generated_timestamp(&self) -> Result<Option<NaiveDateTime>, DecodeError> {
        combine_timestamp(self.generated_date(), self.generated_time())
    }

    /// When the receiver logged the message.
    ///
    /// `Ok(None)` if either the date or the time field is empty.
    pub fn logged_timestamp(&self) -> Result<Option<NaiveDateTime>, DecodeError> {
        combine_timestamp(self.logged_date(), self.logged_time())
    }

    /// Generated date field parsed on its own; `Ok(None)` when empty.
    pub fn generated_date_value(&self) -> Result<Option<NaiveDate>, DecodeError> {
        self.generated_date().map(parse_date).transpose()
    }

    /// Generated time field parsed on its own; `Ok(None)` when empty.
    pub fn generated_time_value(&self) -> Result<Option<NaiveTime>, DecodeError> {
        self.generated_time().map(parse_time).transpose()
    }

    /// Logged date field parsed on its own; `Ok(None)` when empty.
    pub fn logged_date_value(&self) -> Result<Option<NaiveDate>, DecodeError> {
        self.logged_date().map(parse_date).transpose()
    }

    /// Logged time field parsed on its own; `Ok(None)` when empty.
    pub fn logged_time_value(&self) -> Result<Option<NaiveTime>, DecodeError> {
        self.logged_time().map(parse_time).transpose()
    }
}

fn parse_date(date: &str) -> Result<NaiveDate, DecodeError> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())
        .ok_or_else(|| DecodeError::InvalidTimestamp {
            date: date.to_string(),
            time: String::new(),
        })
}

fn parse_time(time: &str) -> Result<NaiveTime, DecodeError> {
    NaiveTime::parse_from_str(time, TIME_FORMAT).map_err(|_parse_error| {
        DecodeError::InvalidTimestamp {
            date: String::new(),
            time: time.to_string(),
        }
    })
}

fn combine_timestamp(
    date: Option<&str>,
    time: Option<&str>,
) -> Result<Option<NaiveDateTime>, DecodeError> {
    let (Some(date), Some(time)) = (date, time) else {
        return Ok(None);
    };

    let invalid = || DecodeError::InvalidTimestamp {
        date: date.to_string(),
        time: time.to_string(),
    };
    let date = parse_date(date).map_err(|_partial| invalid())?;
    let time = parse_time(time).map_err(|_partial| invalid())?;

    Ok(Some(NaiveDateTime::new(date, time)))
}
