// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule-cell mini-language.
//!
//! A single free-text cell edit becomes exactly one of four intents. Rules
//! are tried in order and the first match wins:
//!
//! 1. empty, or an off-synonym (case-insensitive) → [`CellIntent::Clear`]
//! 2. exactly `+` → [`CellIntent::Overtime`]
//! 3. digit-led text containing `:` or `.` → [`CellIntent::Timed`] or
//!    `InvalidTime`
//! 4. anything else is a shop short code → [`CellIntent::Loaned`] or
//!    `UnknownToken`
//!
//! The parser is pure given the list of known shops.

use crate::error::DomainError;
use crate::shift::ShiftKind;
use crate::types::Shop;
use time::Time;
use time::macros::format_description;

/// The parsed meaning of a schedule-cell edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellIntent {
    /// Remove the day's shift.
    Clear,
    /// Overtime slot with no start time.
    Overtime,
    /// Regular shift at a start time.
    Timed(Time),
    /// Shift worked at another shop.
    Loaned(Shop),
}

impl CellIntent {
    /// Converts a non-clearing intent into the shift kind it produces.
    ///
    /// Returns `None` for [`CellIntent::Clear`]. A loan to a shop that has
    /// not been persisted also yields `None`.
    #[must_use]
    pub fn shift_kind(&self) -> Option<ShiftKind> {
        match self {
            Self::Clear => None,
            Self::Overtime => Some(ShiftKind::Overtime),
            Self::Timed(start) => Some(ShiftKind::Timed { start: *start }),
            Self::Loaned(shop) => shop
                .shop_id()
                .map(|shop_id| ShiftKind::Loaned { shop_id }),
        }
    }

    /// Returns the stable name of the intent (`cleared`, `overtime`, `timed`, `loaned`).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Clear => "cleared",
            Self::Overtime => "overtime",
            Self::Timed(_) => "timed",
            Self::Loaned(_) => "loaned",
        }
    }
}

/// Parser for schedule-cell edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellParser {
    /// Lower-cased words that mean "day off".
    off_words: Vec<String>,
}

impl CellParser {
    /// Words treated as "day off" when no other set is configured.
    pub const DEFAULT_OFF_WORDS: [&'static str; 5] = ["off", "none", "-", "выходной", "вых"];

    /// Creates a parser with a custom set of off-synonyms.
    #[must_use]
    pub fn new<I, S>(off_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            off_words: off_words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Returns the configured off-synonyms.
    #[must_use]
    pub fn off_words(&self) -> &[String] {
        &self.off_words
    }

    /// Parses one cell edit.
    ///
    /// # Arguments
    ///
    /// * `raw` - The edited cell text
    /// * `shops` - All known shops, for short-code lookup
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTime` for time-like text that is not a
    /// valid `HH:MM`, and `DomainError::UnknownToken` when no shop has the
    /// given short code.
    pub fn parse(&self, raw: &str, shops: &[Shop]) -> Result<CellIntent, DomainError> {
        let text: &str = raw.trim();

        if text.is_empty() || self.is_off_word(text) {
            return Ok(CellIntent::Clear);
        }

        if text == "+" {
            return Ok(CellIntent::Overtime);
        }

        if looks_like_time(text) {
            return parse_start_time(text).map(CellIntent::Timed);
        }

        shops
            .iter()
            .find(|shop| shop.short_code.value() == text)
            .map(|shop| CellIntent::Loaned(shop.clone()))
            .ok_or_else(|| DomainError::UnknownToken {
                token: text.to_string(),
            })
    }

    /// Returns `true` when `token` is read as a day off, overtime or a time
    /// before short codes are consulted.
    #[must_use]
    pub fn reserves(&self, token: &str) -> bool {
        let text: &str = token.trim();
        text.is_empty() || self.is_off_word(text) || text == "+" || looks_like_time(text)
    }

    fn is_off_word(&self, text: &str) -> bool {
        let lowered: String = text.to_lowercase();
        self.off_words.iter().any(|w| *w == lowered)
    }
}

impl Default for CellParser {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OFF_WORDS)
    }
}

fn looks_like_time(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_digit()) && text.contains([':', '.'])
}

/// Normalizes `9.30` / `9:30` to `09:30` and parses it strictly.
fn parse_start_time(text: &str) -> Result<Time, DomainError> {
    let mut normalized: String = text.replace('.', ":");
    if normalized.find(':') == Some(1) {
        normalized.insert(0, '0');
    }

    Time::parse(&normalized, format_description!("[hour]:[minute]")).map_err(|_| {
        DomainError::InvalidTime {
            input: text.to_string(),
        }
    })
}
