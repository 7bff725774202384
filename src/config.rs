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

//! Decoder configuration.
//!
//! The defaults reproduce plain SBS-1 decoding exactly. Host applications can
//! embed [`DecoderConfig`] in their own TOML/JSON configuration; missing keys
//! fall back to the defaults.

use serde::{Deserialize, Serialize};

/// Configuration for [`crate::Decoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Remove a single trailing `\n`, `\r\n` or `\r` before splitting.
    ///
    /// Off by default: fields are otherwise used as-is, so a stray `\r` ends
    /// up inside the last field.
    pub strip_line_ending: bool,

    /// Treat an empty input line as "no message" instead of a field count error.
    pub skip_empty_lines: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            strip_line_ending: false,
            skip_empty_lines: true,
        }
    }
}
