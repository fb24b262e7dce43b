/*
 * Copyright Cedar Contributors
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *      https://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use miette::Diagnostic;
use thiserror::Error;

/// Errors parsing a packed address written in hex
#[derive(Debug, Clone, PartialEq, Diagnostic, Error)]
pub enum HexError {
    /// Every byte takes two digits
    #[error("hex string has an odd number of digits ({len})")]
    #[diagnostic(code(prefix_codec_cli::hex_odd_length))]
    OddLength { len: usize },
    /// Something other than `0-9a-fA-F`
    #[error("`{src}` is not a hex string")]
    #[diagnostic(
        code(prefix_codec_cli::hex_invalid_digit),
        help("write the packed address as hex digits, e.g. `0a000001` for 10.0.0.1")
    )]
    InvalidDigit {
        src: String,
        source: hex::FromHexError,
    },
}

/// Errors loading prefix entries
#[derive(Debug, Diagnostic, Error)]
pub enum EntriesError {
    #[error("failed to read prefix entries from stdin")]
    #[diagnostic(code(prefix_codec_cli::entries_read))]
    ReadStdin(#[source] std::io::Error),
    #[error("failed to open prefix entries file {path}")]
    #[diagnostic(code(prefix_codec_cli::entries_read))]
    ReadFile {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse prefix entries from {path}")]
    #[diagnostic(
        code(prefix_codec_cli::entries_parse),
        help("expected a JSON array of prefix entries with addresses written as text")
    )]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}
