//! Token patterns such as `yyyy-MM-dd HH:mm:ss`.
//!
//! ASCII letters are reserved pattern letters, text inside single quotes is
//! literal and `''` is a literal quote. Everything else is copied through
//! verbatim. A run of one letter (`M`, `d`, `H`, ...) accepts one or two
//! digits when parsing, a doubled letter requires exactly two. A numeric
//! field directly followed by other numeric fields leaves their digits to
//! them, so `yyyyMMdd` parses `20240320`.

use crate::domain::model::CivilDateTime;
use crate::utils::error::{DateHelperError, Result};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use std::fmt::{self, Write};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

const WEEKDAY_VALUES: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    /// Two-digit year, read as 2000 + yy.
    YearOfCentury,
    Month,
    Day,
    DayOfYear,
    Hour,
    /// 1-12, needs an AM/PM marker to resolve.
    ClockHour,
    Minute,
    Second,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Number {
        field: Field,
        min: usize,
        max: usize,
        /// Follows another numeric field with no separator.
        adjacent: bool,
    },
    Fraction(usize),
    MonthName { full: bool },
    WeekdayName { full: bool },
    AmPm,
}

impl Token {
    fn is_numeric(&self) -> bool {
        matches!(self, Token::Number { .. } | Token::Fraction(_))
    }

    fn fixed_width(&self) -> usize {
        match self {
            Token::Number { min, .. } => *min,
            Token::Fraction(width) => *width,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    tokens: Vec<Token>,
}

impl DatePattern {
    pub fn compile(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(format_error(pattern, "pattern is empty"));
        }

        let mut tokens: Vec<Token> = Vec::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\'' => {
                    if chars.peek() == Some(&'\'') {
                        chars.next();
                        push_literal(&mut tokens, '\'');
                        continue;
                    }
                    let mut closed = false;
                    while let Some(quoted) = chars.next() {
                        if quoted == '\'' {
                            if chars.peek() == Some(&'\'') {
                                chars.next();
                                push_literal(&mut tokens, '\'');
                                continue;
                            }
                            closed = true;
                            break;
                        }
                        push_literal(&mut tokens, quoted);
                    }
                    if !closed {
                        return Err(format_error(pattern, "unterminated quoted literal"));
                    }
                }
                '[' | ']' | '{' | '}' | '#' => {
                    return Err(format_error(
                        pattern,
                        &format!("reserved character '{}' must be quoted", c),
                    ));
                }
                c if c.is_ascii_alphabetic() => {
                    let mut width = 1;
                    while chars.peek() == Some(&c) {
                        chars.next();
                        width += 1;
                    }
                    let mut token =
                        token_for(c, width).map_err(|reason| format_error(pattern, &reason))?;
                    if let Token::Number { adjacent, .. } = &mut token {
                        *adjacent = tokens.last().is_some_and(Token::is_numeric);
                    }
                    tokens.push(token);
                }
                c => push_literal(&mut tokens, c),
            }
        }

        Ok(Self {
            source: pattern.to_string(),
            tokens,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn format(&self, date: &CivilDateTime) -> Result<String> {
        let mut out = String::new();
        for token in &self.tokens {
            let written = match token {
                Token::Literal(text) => out.write_str(text),
                Token::Number { field, min, .. } => {
                    let value = field_value(date, *field);
                    if value < 0 {
                        write!(out, "-{:0width$}", -value, width = *min)
                    } else {
                        write!(out, "{:0width$}", value, width = *min)
                    }
                }
                Token::Fraction(width) => {
                    let nanos = format!("{:09}", date.nanosecond() % 1_000_000_000);
                    out.write_str(&nanos[..*width])
                }
                Token::MonthName { full } => {
                    out.write_str(name(MONTHS[date.month0() as usize], *full))
                }
                Token::WeekdayName { full } => {
                    let index = date.weekday().num_days_from_monday() as usize;
                    out.write_str(name(WEEKDAYS[index], *full))
                }
                Token::AmPm => out.write_str(if date.hour() < 12 { "AM" } else { "PM" }),
            };
            written.map_err(|_| format_error(&self.source, "cannot render this datetime"))?;
        }
        Ok(out)
    }

    /// Strict parse: every token must match and no input may be left over.
    pub fn parse(&self, text: &str) -> Result<CivilDateTime> {
        self.scan(text)
            .and_then(|fields| fields.resolve())
            .map_err(|reason| {
                tracing::debug!("'{}' rejected by pattern '{}': {}", text, self.source, reason);
                DateHelperError::ParseError {
                    input: text.to_string(),
                    pattern: self.source.clone(),
                    reason,
                }
            })
    }

    fn scan(&self, text: &str) -> std::result::Result<ParsedFields, String> {
        let mut fields = ParsedFields::default();
        let mut rest = text;

        for (index, token) in self.tokens.iter().enumerate() {
            match token {
                Token::Literal(literal) => {
                    rest = rest
                        .strip_prefix(literal.as_str())
                        .ok_or_else(|| format!("expected '{}' at '{}'", literal, rest))?;
                }
                Token::Number {
                    field,
                    min,
                    max,
                    adjacent,
                } => {
                    let available = rest.bytes().take_while(u8::is_ascii_digit).count();
                    let width = if *adjacent {
                        *min
                    } else {
                        (*max).min(available.saturating_sub(self.reserved_after(index)))
                    };
                    if width < *min || width > available {
                        return Err(format!("expected {} digit(s) at '{}'", min, rest));
                    }
                    let (digits, tail) = rest.split_at(width);
                    let value: u32 = digits
                        .parse()
                        .map_err(|_| format!("'{}' is not a number", digits))?;
                    fields.assign(*field, value)?;
                    rest = tail;
                }
                Token::Fraction(width) => {
                    let available = rest.bytes().take_while(u8::is_ascii_digit).count();
                    if available < *width {
                        return Err(format!(
                            "expected {} fraction digit(s) at '{}'",
                            width, rest
                        ));
                    }
                    let (digits, tail) = rest.split_at(*width);
                    let value: u32 = digits
                        .parse()
                        .map_err(|_| format!("'{}' is not a number", digits))?;
                    let nano = value * 10u32.pow(9 - *width as u32);
                    set_once(&mut fields.nano, nano, "fraction")?;
                    rest = tail;
                }
                Token::MonthName { full } => {
                    let (index, tail) = match_name(rest, &MONTHS, *full)?;
                    set_once(&mut fields.month, index as u32 + 1, "month")?;
                    rest = tail;
                }
                Token::WeekdayName { full } => {
                    let (index, tail) = match_name(rest, &WEEKDAYS, *full)?;
                    set_once(&mut fields.weekday, WEEKDAY_VALUES[index], "weekday")?;
                    rest = tail;
                }
                Token::AmPm => {
                    let (pm, tail) = if let Some(tail) = rest.strip_prefix("AM") {
                        (false, tail)
                    } else if let Some(tail) = rest.strip_prefix("PM") {
                        (true, tail)
                    } else {
                        return Err(format!("expected AM or PM at '{}'", rest));
                    };
                    set_once(&mut fields.pm, pm, "AM/PM")?;
                    rest = tail;
                }
            }
        }

        if !rest.is_empty() {
            return Err(format!("unparsed text '{}'", rest));
        }
        Ok(fields)
    }

    /// Digits claimed by the numeric fields glued to the token at `index`.
    fn reserved_after(&self, index: usize) -> usize {
        self.tokens[index + 1..]
            .iter()
            .take_while(|token| token.is_numeric())
            .map(Token::fixed_width)
            .sum()
    }
}

impl fmt::Display for DatePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[derive(Debug, Default)]
struct ParsedFields {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    day_of_year: Option<u32>,
    hour: Option<u32>,
    clock_hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    nano: Option<u32>,
    pm: Option<bool>,
    weekday: Option<Weekday>,
}

impl ParsedFields {
    fn assign(&mut self, field: Field, value: u32) -> std::result::Result<(), String> {
        match field {
            Field::Year => set_once(&mut self.year, value as i32, "year"),
            Field::YearOfCentury => set_once(&mut self.year, 2000 + value as i32, "year"),
            Field::Month => set_once(&mut self.month, value, "month"),
            Field::Day => set_once(&mut self.day, value, "day"),
            Field::DayOfYear => set_once(&mut self.day_of_year, value, "day of year"),
            Field::Hour => set_once(&mut self.hour, value, "hour"),
            Field::ClockHour => set_once(&mut self.clock_hour, value, "hour"),
            Field::Minute => set_once(&mut self.minute, value, "minute"),
            Field::Second => set_once(&mut self.second, value, "second"),
        }
    }

    fn resolve(self) -> std::result::Result<CivilDateTime, String> {
        let year = self.year.ok_or("no year in input")?;
        let date = match (self.month, self.day, self.day_of_year) {
            (Some(month), Some(day), day_of_year) => {
                let date = NaiveDate::from_ymd_opt(year, month, day)
                    .ok_or_else(|| format!("{}-{}-{} is not a calendar date", year, month, day))?;
                if day_of_year.is_some_and(|ordinal| ordinal != date.ordinal()) {
                    return Err(format!("day of year does not match {}", date));
                }
                date
            }
            (None, None, Some(ordinal)) => NaiveDate::from_yo_opt(year, ordinal)
                .ok_or_else(|| format!("day {} does not exist in {}", ordinal, year))?,
            _ => return Err("not enough date fields".to_string()),
        };
        if self.weekday.is_some_and(|weekday| weekday != date.weekday()) {
            return Err(format!("{} is a {}", date, date.weekday()));
        }

        let from_clock = match (self.clock_hour, self.pm) {
            (Some(hour), Some(pm)) => {
                if !(1..=12).contains(&hour) {
                    return Err(format!("clock hour {} is outside 1-12", hour));
                }
                Some(hour % 12 + if pm { 12 } else { 0 })
            }
            (Some(_), None) => return Err("a 12-hour field needs an AM/PM marker".to_string()),
            (None, _) => None,
        };
        let hour = match (self.hour, from_clock) {
            (Some(hour), Some(clock)) if hour != clock => {
                return Err(format!("hour {} conflicts with {}", hour, clock));
            }
            (Some(hour), _) | (None, Some(hour)) => hour,
            (None, None) => return Err("not enough time fields: no hour".to_string()),
        };
        if self.pm.is_some_and(|pm| pm != (hour >= 12)) {
            return Err(format!("hour {} conflicts with the AM/PM marker", hour));
        }

        let time = NaiveTime::from_hms_nano_opt(
            hour,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            self.nano.unwrap_or(0),
        )
        .ok_or_else(|| "time of day out of range".to_string())?;

        Ok(date.and_time(time))
    }
}

fn set_once<T: PartialEq + Copy>(
    slot: &mut Option<T>,
    value: T,
    what: &str,
) -> std::result::Result<(), String> {
    match *slot {
        Some(existing) if existing != value => Err(format!("conflicting values for {}", what)),
        _ => {
            *slot = Some(value);
            Ok(())
        }
    }
}

fn name(full_name: &'static str, full: bool) -> &'static str {
    if full {
        full_name
    } else {
        &full_name[..3]
    }
}

fn match_name<'a>(
    text: &'a str,
    names: &[&'static str],
    full: bool,
) -> std::result::Result<(usize, &'a str), String> {
    names
        .iter()
        .enumerate()
        .find_map(|(index, candidate)| {
            text.strip_prefix(name(candidate, full))
                .map(|tail| (index, tail))
        })
        .ok_or_else(|| format!("no name matches '{}'", text))
}

fn field_value(date: &CivilDateTime, field: Field) -> i64 {
    let value = match field {
        Field::Year => return i64::from(date.year()),
        Field::YearOfCentury => date.year().rem_euclid(100) as u32,
        Field::Month => date.month(),
        Field::Day => date.day(),
        Field::DayOfYear => date.ordinal(),
        Field::Hour => date.hour(),
        Field::ClockHour => match date.hour() % 12 {
            0 => 12,
            hour => hour,
        },
        Field::Minute => date.minute(),
        Field::Second => date.second(),
    };
    i64::from(value)
}

fn token_for(letter: char, width: usize) -> std::result::Result<Token, String> {
    let number = |field, min, max| Token::Number {
        field,
        min,
        max,
        adjacent: false,
    };
    let token = match (letter, width) {
        ('y' | 'u', 2) => number(Field::YearOfCentury, 2, 2),
        ('y' | 'u', 1 | 3..=9) => number(Field::Year, width, 9),
        ('M', 1) => number(Field::Month, 1, 2),
        ('M', 2) => number(Field::Month, 2, 2),
        ('M', 3) => Token::MonthName { full: false },
        ('M', 4) => Token::MonthName { full: true },
        ('d', 1 | 2) => number(Field::Day, width, 2),
        ('D', 1..=3) => number(Field::DayOfYear, width, 3),
        ('H', 1 | 2) => number(Field::Hour, width, 2),
        ('h', 1 | 2) => number(Field::ClockHour, width, 2),
        ('m', 1 | 2) => number(Field::Minute, width, 2),
        ('s', 1 | 2) => number(Field::Second, width, 2),
        ('S', 1..=9) => Token::Fraction(width),
        ('a', 1) => Token::AmPm,
        ('E', 1..=3) => Token::WeekdayName { full: false },
        ('E', 4) => Token::WeekdayName { full: true },
        ('z' | 'Z' | 'X' | 'x' | 'V' | 'O', _) => {
            return Err(format!(
                "zone letter '{}' has no value on a datetime without a time zone",
                letter
            ));
        }
        _ => {
            return Err(format!(
                "unsupported pattern letters '{}'",
                letter.to_string().repeat(width)
            ));
        }
    };
    Ok(token)
}

fn push_literal(tokens: &mut Vec<Token>, c: char) {
    if let Some(Token::Literal(text)) = tokens.last_mut() {
        text.push(c);
    } else {
        tokens.push(Token::Literal(c.to_string()));
    }
}

fn format_error(pattern: &str, reason: &str) -> DateHelperError {
    tracing::debug!("rejecting date pattern '{}': {}", pattern, reason);
    DateHelperError::FormatError {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    }
}
