//! Parser for Counter-Strike dedicated-server logfiles.
//!
//! Every log line starts with a fixed timestamp prefix followed by a
//! free-form message body. The body is matched against a catalog of
//! patterns, one per known event kind, and converted into a typed
//! [`Message`] carrying the timestamp and the extracted fields. Bodies no
//! pattern covers come back as [`Event::Unknown`] with the raw text, so a
//! line with a valid timestamp is never dropped.
//!
//! Parsing is a pure function of the input line. The catalog is compiled
//! once into a static and only read afterwards, so lines can be parsed
//! from any number of threads without coordination.
//!
//! ```
//! use csgo_log_parser::{parse, Event};
//!
//! let line = r#"L 11/05/2018 - 15:44:36: "Player<12><STEAM_1:1:0101011><CT>" purchased "m4a1""#;
//!
//! let message = parse(line).unwrap();
//! assert_eq!("PlayerPurchase", message.kind());
//!
//! match message.event {
//!     Event::PlayerPurchase { player, item } => {
//!         assert_eq!("Player", player.name);
//!         assert_eq!("m4a1", item);
//!     }
//!     _ => unreachable!(),
//! }
//! ```

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

mod builders;
pub mod catalog;
pub mod event;

pub use catalog::{Builder, Pattern, CATALOG};
pub use event::{Equation, Event, Message, Player, Position, PositionFloat, Velocity};

/// Timestamp format of the log prefix. The log carries no zone; the
/// convention is to read it as UTC.
const TIMESTAMP_FORMAT: &str = "%m/%d/%Y - %H:%M:%S";

lazy_static! {
    /// Top-level shape of every log line: literal `L `, the timestamp,
    /// a colon, then the message body.
    pub static ref LOG_LINE_REGEX: Regex =
        Regex::new(r"L (\d{2}/\d{2}/\d{4} - \d{2}:\d{2}:\d{2}): (.*)").unwrap();
}

/// Why a line failed to parse. Both cases are per-line failures; callers
/// batching a logfile should report them and keep going.
#[derive(Debug, PartialEq, Error)]
pub enum ParseError {
    /// The line does not start with the `L <date> - <time>:` prefix.
    #[error("no match")]
    NoMatch,
    /// The prefix had the right shape but the date or time values do not
    /// form a valid timestamp (e.g. day 50). Carries the underlying
    /// chrono error.
    #[error(transparent)]
    InvalidTimestamp(#[from] chrono::ParseError),
}

/// Parses one newline-trimmed log line against the default catalog.
pub fn parse(line: &str) -> Result<Message, ParseError> {
    parse_with_catalog(line, &CATALOG)
}

/// Parses one log line against a caller-supplied catalog. The catalog is
/// scanned in order and the first matching entry's builder produces the
/// message; entries are expected to be pairwise disjoint.
pub fn parse_with_catalog(line: &str, catalog: &[Pattern]) -> Result<Message, ParseError> {
    let caps = LOG_LINE_REGEX.captures(line).ok_or(ParseError::NoMatch)?;

    let time = NaiveDateTime::parse_from_str(&caps[1], TIMESTAMP_FORMAT)?.and_utc();
    let body = caps.get(2).map_or("", |m| m.as_str());

    for pattern in catalog {
        if let Some(groups) = pattern.regex.captures(body) {
            return Ok((pattern.build)(time, &groups));
        }
    }

    // Valid line, unmodeled body: degrade to Unknown instead of dropping
    // the data.
    Ok(Message::new(
        time,
        Event::Unknown {
            raw: body.to_string(),
        },
    ))
}

/// Renders a message as single-line JSON. `serde_json` leaves `<`, `>`
/// and `&` unescaped, which matters because raw log text ends up in
/// several string fields.
pub fn to_json(message: &Message) -> serde_json::Result<String> {
    serde_json::to_string(message)
}
