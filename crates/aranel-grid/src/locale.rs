//! Culture-aware parsing of filter values.
//!
//! A [`Locale`] turns the raw strings of a load request into typed filter
//! values: numbers with the culture's separators, dates in the culture's
//! formats, and text lower-cased with the culture's casing rules.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use unic_langid::LanguageIdentifier;

/// Naive formats accepted by every locale, tried after RFC 3339.
const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d"];

/// Lower-casing rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Casing {
    /// Unicode default lower-casing.
    #[default]
    Invariant,
    /// Turkic rules: `I` lowers to dotless `ı`, `İ` lowers to `i`.
    Turkic,
}

impl Casing {
    /// Lower-cases `s` under these rules.
    pub fn lowercase(self, s: &str) -> String {
        match self {
            Casing::Invariant => s.to_lowercase(),
            Casing::Turkic => {
                let mut out = String::with_capacity(s.len());
                for c in s.chars() {
                    match c {
                        'I' => out.push('ı'),
                        'İ' => out.push('i'),
                        other => out.extend(other.to_lowercase()),
                    }
                }
                out
            }
        }
    }

    /// Orders two strings by their lower-cased form under these rules.
    ///
    /// Strings that fold to the same text fall back to ordinal order, so
    /// `"Apple"` sorts before `"apple"` and the result stays total.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        self.fold(a).cmp(self.fold(b)).then_with(|| a.cmp(b))
    }

    fn fold(self, s: &str) -> impl Iterator<Item = char> + '_ {
        s.chars()
            .map(move |c| match (self, c) {
                (Casing::Turkic, 'I') => 'ı',
                (Casing::Turkic, 'İ') => 'i',
                _ => c,
            })
            .flat_map(char::to_lowercase)
    }
}

/// A date/time parsed from a filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDateTime {
    /// The wall-clock value as written (UTC values are in UTC).
    pub value: NaiveDateTime,
    /// Whether the input carried an explicit UTC designator (`Z` or `+00:00`).
    pub utc: bool,
}

/// Parsing and casing rules for one culture.
///
/// # Example
///
/// ```
/// use aranel_grid::Locale;
/// use rust_decimal::Decimal;
///
/// let tr = Locale::from_tag("tr-TR").unwrap();
/// assert_eq!(tr.parse_decimal("1.234,5"), Some(Decimal::new(12345, 1)));
/// assert_eq!(tr.lowercase("IŞIK"), "ışık");
///
/// let custom = Locale::new("x-pipe").date_format("%Y|%m|%d");
/// assert!(custom.parse_datetime("2024|03|15").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    tag: String,
    decimal_separator: char,
    group_separator: char,
    date_formats: Vec<String>,
    datetime_formats: Vec<String>,
    casing: Casing,
}

impl Default for Locale {
    fn default() -> Self {
        Locale::invariant()
    }
}

impl Locale {
    /// Creates a locale with invariant separators and no culture formats.
    ///
    /// ISO 8601 and RFC 3339 dates are always accepted.
    pub fn new(tag: impl Into<String>) -> Self {
        Locale {
            tag: tag.into(),
            decimal_separator: '.',
            group_separator: ',',
            date_formats: Vec::new(),
            datetime_formats: Vec::new(),
            casing: Casing::Invariant,
        }
    }

    /// The culture-neutral locale: `.` decimals, `,` groups, US dates.
    pub fn invariant() -> Self {
        Locale::new("invariant").us_dates()
    }

    /// Looks up a built-in locale by culture tag, ignoring case.
    ///
    /// Known cultures: `invariant`, `en-US`, `en-GB`, `tr-TR`, `de-DE`,
    /// `fr-FR`. Tags are BCP 47, so `tr_TR` and a bare `tr` are accepted
    /// too. A bare language picks that language's default region.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.is_empty() || tag.eq_ignore_ascii_case("invariant") {
            return Some(Locale::invariant());
        }

        let id: LanguageIdentifier = tag.parse().ok()?;
        let region = id.region.as_ref().map(|region| region.as_str());
        let locale = match (id.language.as_str(), region) {
            ("en", None | Some("US")) => Locale::new("en-US").us_dates(),
            ("en", Some("GB")) => Locale::new("en-GB").day_first_dates('/'),
            ("tr", None | Some("TR")) => Locale::new("tr-TR")
                .separators(',', '.')
                .day_first_dates('.')
                .casing(Casing::Turkic),
            ("de", None | Some("DE")) => Locale::new("de-DE")
                .separators(',', '.')
                .day_first_dates('.'),
            ("fr", None | Some("FR")) => Locale::new("fr-FR")
                .separators(',', '\u{202f}')
                .day_first_dates('/'),
            _ => return None,
        };
        Some(locale)
    }

    fn us_dates(self) -> Self {
        self.datetime_format("%m/%d/%Y %H:%M:%S")
            .datetime_format("%m/%d/%Y %H:%M")
            .date_format("%m/%d/%Y")
    }

    fn day_first_dates(self, sep: char) -> Self {
        self.datetime_format(&format!("%d{sep}%m{sep}%Y %H:%M:%S"))
            .datetime_format(&format!("%d{sep}%m{sep}%Y %H:%M"))
            .date_format(&format!("%d{sep}%m{sep}%Y"))
    }

    /// Sets the decimal and group separators.
    pub fn separators(mut self, decimal: char, group: char) -> Self {
        self.decimal_separator = decimal;
        self.group_separator = group;
        self
    }

    /// Adds a date-only `chrono` format (the time is taken as midnight).
    pub fn date_format(mut self, format: &str) -> Self {
        self.date_formats.push(format.to_string());
        self
    }

    /// Adds a date-and-time `chrono` format.
    pub fn datetime_format(mut self, format: &str) -> Self {
        self.datetime_formats.push(format.to_string());
        self
    }

    /// Sets the lower-casing rules.
    pub fn casing(mut self, casing: Casing) -> Self {
        self.casing = casing;
        self
    }

    /// Returns the culture tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the lower-casing rules.
    pub fn casing_rules(&self) -> Casing {
        self.casing
    }

    /// Lower-cases `s` with this locale's rules.
    pub fn lowercase(&self, s: &str) -> String {
        self.casing.lowercase(s)
    }

    /// Parses `true` or `false`, ignoring ASCII case and surrounding whitespace.
    pub fn parse_bool(&self, s: &str) -> Option<bool> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("true") {
            Some(true)
        } else if s.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    /// Parses a 32-bit integer.
    pub fn parse_int(&self, s: &str) -> Option<i32> {
        self.normalize_number(s)?.parse().ok()
    }

    /// Parses a decimal, accepting scientific notation.
    pub fn parse_decimal(&self, s: &str) -> Option<Decimal> {
        let normalized = self.normalize_number(s)?;
        if normalized.contains(['e', 'E']) {
            Decimal::from_scientific(&normalized).ok()
        } else {
            Decimal::from_str(&normalized).ok()
        }
    }

    /// Parses a finite floating point number.
    pub fn parse_float(&self, s: &str) -> Option<f64> {
        self.normalize_number(s)?
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
    }

    /// Rewrites a culture number into the `1234.5` form, or `None` if it
    /// contains anything but digits, a sign, separators and an exponent.
    fn normalize_number(&self, s: &str) -> Option<String> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            if c == self.decimal_separator {
                out.push('.');
            } else if c == self.group_separator
                || (self.group_separator.is_whitespace() && c.is_whitespace())
            {
                continue;
            } else if c.is_ascii_digit() || matches!(c, '+' | '-' | 'e' | 'E') {
                out.push(c);
            } else {
                return None;
            }
        }
        Some(out)
    }

    /// Parses a date/time.
    ///
    /// RFC 3339 input keeps its written wall time and is flagged `utc` when
    /// its offset is zero. Otherwise ISO 8601 and then the locale's own
    /// formats are tried.
    pub fn parse_datetime(&self, s: &str) -> Option<ParsedDateTime> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(zoned) = DateTime::parse_from_rfc3339(s) {
            return Some(ParsedDateTime {
                value: zoned.naive_local(),
                utc: zoned.offset().local_minus_utc() == 0,
            });
        }

        let datetime_formats = ISO_DATETIME_FORMATS
            .iter()
            .copied()
            .chain(self.datetime_formats.iter().map(String::as_str));
        for format in datetime_formats {
            if let Ok(value) = NaiveDateTime::parse_from_str(s, format) {
                return Some(ParsedDateTime { value, utc: false });
            }
        }

        let date_formats = ISO_DATE_FORMATS
            .iter()
            .copied()
            .chain(self.date_formats.iter().map(String::as_str));
        for format in date_formats {
            if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                return Some(ParsedDateTime {
                    value: date.and_time(NaiveTime::MIN),
                    utc: false,
                });
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn known_tags() {
        for tag in ["invariant", "en-US", "EN-gb", "tr-TR", "de-DE", "fr-FR"] {
            assert!(Locale::from_tag(tag).is_some(), "{tag}");
        }
        assert!(Locale::from_tag("xx-YY").is_none());
        assert!(Locale::from_tag("en-AU").is_none());
        assert!(Locale::from_tag("not a tag").is_none());
        assert_eq!(Locale::from_tag("tr-tr").unwrap().tag(), "tr-TR");
        assert_eq!(Locale::from_tag("").unwrap().tag(), "invariant");
    }

    #[test]
    fn underscore_and_bare_tags() {
        for (tag, expected) in [
            ("tr_TR", "tr-TR"),
            ("de_DE", "de-DE"),
            ("en_US", "en-US"),
            ("en_gb", "en-GB"),
            ("fr", "fr-FR"),
            ("TR", "tr-TR"),
        ] {
            let locale = Locale::from_tag(tag).unwrap_or_else(|| panic!("{tag} not recognised"));
            assert_eq!(locale.tag(), expected);
        }
        let tr = Locale::from_tag("tr_TR").unwrap();
        assert_eq!(tr.casing_rules(), Casing::Turkic);
        assert_eq!(tr.parse_decimal("1.234,5"), Some(Decimal::new(12345, 1)));
    }

    #[test]
    fn bools() {
        let locale = Locale::invariant();
        assert_eq!(locale.parse_bool("true"), Some(true));
        assert_eq!(locale.parse_bool(" False "), Some(false));
        assert_eq!(locale.parse_bool("yes"), None);
        assert_eq!(locale.parse_bool("1"), None);
    }

    #[test]
    fn invariant_numbers() {
        let locale = Locale::invariant();
        assert_eq!(locale.parse_int("42"), Some(42));
        assert_eq!(locale.parse_int("-7"), Some(-7));
        assert_eq!(locale.parse_int("1,000"), Some(1000));
        assert_eq!(locale.parse_int("1.5"), None);
        assert_eq!(locale.parse_int("abc"), None);
        assert_eq!(locale.parse_int("99999999999"), None);
        assert_eq!(locale.parse_decimal("1,234.50"), Some(Decimal::new(123450, 2)));
        assert_eq!(locale.parse_float("2.5"), Some(2.5));
        assert_eq!(locale.parse_float("1e3"), Some(1000.0));
    }

    #[test]
    fn turkish_numbers() {
        let tr = Locale::from_tag("tr-TR").unwrap();
        assert_eq!(tr.parse_decimal("1.234,5"), Some(Decimal::new(12345, 1)));
        assert_eq!(tr.parse_float("0,25"), Some(0.25));
        assert_eq!(tr.parse_int("1.000"), Some(1000));
    }

    #[test]
    fn french_group_spaces() {
        let fr = Locale::from_tag("fr-FR").unwrap();
        assert_eq!(fr.parse_decimal("1 234,5"), Some(Decimal::new(12345, 1)));
        assert_eq!(fr.parse_decimal("1\u{202f}234,5"), Some(Decimal::new(12345, 1)));
    }

    #[test]
    fn non_numbers_rejected() {
        let locale = Locale::invariant();
        assert_eq!(locale.parse_float("inf"), None);
        assert_eq!(locale.parse_float("NaN"), None);
        assert_eq!(locale.parse_decimal("12abc"), None);
        assert_eq!(locale.parse_decimal("   "), None);
    }

    #[test]
    fn iso_dates_everywhere() {
        for locale in [Locale::invariant(), Locale::from_tag("tr-TR").unwrap()] {
            let parsed = locale.parse_datetime("2024-03-15").unwrap();
            assert_eq!(parsed.value, dt(2024, 3, 15, 0, 0));
            assert!(!parsed.utc);

            let parsed = locale.parse_datetime("2024-03-15T10:30:00").unwrap();
            assert_eq!(parsed.value, dt(2024, 3, 15, 10, 30));
        }
    }

    #[test]
    fn rfc3339_utc_flag() {
        let locale = Locale::invariant();
        let parsed = locale.parse_datetime("2024-03-14T21:00:00.000Z").unwrap();
        assert!(parsed.utc);
        assert_eq!(parsed.value, dt(2024, 3, 14, 21, 0));

        let parsed = locale.parse_datetime("2024-03-15T09:00:00+03:00").unwrap();
        assert!(!parsed.utc);
        assert_eq!(parsed.value, dt(2024, 3, 15, 9, 0));
    }

    #[test]
    fn culture_dates() {
        let us = Locale::invariant();
        assert_eq!(us.parse_datetime("03/15/2024").unwrap().value, dt(2024, 3, 15, 0, 0));
        assert!(us.parse_datetime("15/03/2024").is_none());

        let tr = Locale::from_tag("tr-TR").unwrap();
        assert_eq!(tr.parse_datetime("15.03.2024").unwrap().value, dt(2024, 3, 15, 0, 0));
        assert_eq!(
            tr.parse_datetime("15.03.2024 14:05").unwrap().value,
            dt(2024, 3, 15, 14, 5)
        );
        assert!(tr.parse_datetime("not a date").is_none());
    }

    #[test]
    fn casing_rules() {
        assert_eq!(Locale::invariant().lowercase("Desk CHAIR"), "desk chair");
        let tr = Locale::from_tag("tr-TR").unwrap();
        assert_eq!(tr.lowercase("KIRMIZI"), "kırmızı");
        assert_eq!(tr.lowercase("İSTANBUL"), "istanbul");
        assert_eq!(tr.casing_rules(), Casing::Turkic);
    }

    #[test]
    fn compare_folds_case_then_breaks_ties_ordinally() {
        let invariant = Casing::Invariant;
        assert_eq!(invariant.compare("apple", "Banana"), Ordering::Less);
        assert_eq!(invariant.compare("Banana", "cherry"), Ordering::Less);
        assert_eq!(invariant.compare("Apple", "apple"), Ordering::Less);
        assert_eq!(invariant.compare("apple", "apple"), Ordering::Equal);

        // Dotless ı sorts after i, so a Turkic capital I sorts after i.
        assert_eq!(invariant.compare("Ifak", "ilgaz"), Ordering::Less);
        assert_eq!(Casing::Turkic.compare("Ifak", "ilgaz"), Ordering::Greater);
        assert_eq!(Casing::Turkic.compare("izmir", "İzmir"), Ordering::Less);
    }
}
