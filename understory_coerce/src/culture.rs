// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Culture-sensitive parsing settings.

use alloc::string::String;

use chrono::NaiveDate;

/// ISO 8601 calendar date, accepted by every culture.
const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Formatting conventions used when parsing strings into numbers and dates.
///
/// # Example
///
/// ```rust
/// use understory_coerce::Culture;
///
/// let swiss = Culture::new("de-CH")
///     .with_decimal_separator('.')
///     .with_group_separator(Some('\''))
///     .with_date_format("%d.%m.%Y");
///
/// assert_eq!(swiss.group_separator(), Some('\''));
/// assert_eq!(Culture::DE_DE.decimal_separator(), ',');
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Culture {
    name: &'static str,
    decimal_separator: char,
    group_separator: Option<char>,
    date_format: &'static str,
}

impl Culture {
    /// Culture-independent conventions.
    pub const INVARIANT: Self = Self::new("");

    /// English (United States).
    pub const EN_US: Self = Self::new("en-US").with_date_format("%m/%d/%Y");

    /// German (Germany).
    pub const DE_DE: Self = Self::new("de-DE")
        .with_decimal_separator(',')
        .with_group_separator(Some('.'))
        .with_date_format("%d.%m.%Y");

    /// French (France).
    pub const FR_FR: Self = Self::new("fr-FR")
        .with_decimal_separator(',')
        .with_group_separator(Some('\u{a0}'))
        .with_date_format("%d/%m/%Y");

    /// Creates a culture with invariant conventions and the given name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            decimal_separator: '.',
            group_separator: Some(','),
            date_format: ISO_DATE_FORMAT,
        }
    }

    /// Sets the decimal separator.
    #[must_use]
    pub const fn with_decimal_separator(mut self, separator: char) -> Self {
        self.decimal_separator = separator;
        self
    }

    /// Sets the digit group separator, or disables grouping with `None`.
    #[must_use]
    pub const fn with_group_separator(mut self, separator: Option<char>) -> Self {
        self.group_separator = separator;
        self
    }

    /// Sets the date format, as a `chrono` strftime pattern.
    #[must_use]
    pub const fn with_date_format(mut self, format: &'static str) -> Self {
        self.date_format = format;
        self
    }

    /// Returns the culture name; empty for the invariant culture.
    #[must_use]
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the decimal separator.
    #[must_use]
    #[inline]
    pub const fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    /// Returns the digit group separator.
    #[must_use]
    #[inline]
    pub const fn group_separator(&self) -> Option<char> {
        self.group_separator
    }

    /// Returns the date format.
    #[must_use]
    #[inline]
    pub const fn date_format(&self) -> &'static str {
        self.date_format
    }

    /// Rewrites a culture-formatted real number into the form accepted by
    /// `str::parse`, dropping group separators.
    ///
    /// Returns `None` if the input contains a `.` the culture gives no
    /// meaning to.
    pub(crate) fn normalize_real(&self, input: &str) -> Option<String> {
        let mut normalized = String::with_capacity(input.len());
        for c in input.trim().chars() {
            if Some(c) == self.group_separator {
                continue;
            }
            if c == self.decimal_separator {
                normalized.push('.');
            } else if c == '.' {
                return None;
            } else {
                normalized.push(c);
            }
        }
        Some(normalized)
    }

    /// Parses a date using this culture's format, then ISO 8601.
    pub(crate) fn parse_date(&self, input: &str) -> Option<NaiveDate> {
        let input = input.trim();
        NaiveDate::parse_from_str(input, self.date_format)
            .or_else(|_| NaiveDate::parse_from_str(input, ISO_DATE_FORMAT))
            .ok()
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::INVARIANT
    }
}
