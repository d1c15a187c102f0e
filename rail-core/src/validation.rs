//! Input sanitizers and field validators for passenger and payer forms.
//!
//! Sanitizers run on every keystroke and never reject input; they only
//! reshape it. Validators are pure predicates consulted when a step is left.

use chrono::NaiveDate;
use regex::Regex;
use rail_shared::DocumentType;
use serde::Serialize;
use std::sync::LazyLock;

use crate::Field;

pub const PASSPORT_SERIES_LEN: usize = 4;
pub const PASSPORT_NUMBER_LEN: usize = 6;
pub const CERTIFICATE_MAX_LEN: usize = 14;
const PHONE_DIGITS: usize = 11;
const FOREIGN_PHONE_DIGITS: usize = 15;

fn is_cyrillic(c: char) -> bool {
    matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
}

/// Keeps Latin and Cyrillic letters, spaces and hyphens, then capitalizes
/// the first letter and lowercases the rest.
pub fn sanitize_name(input: &str) -> String {
    let kept: String = input
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || is_cyrillic(*c) || *c == ' ' || *c == '-')
        .collect();

    let mut chars = kept.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Birthday mask: up to eight digits rendered as `DD.MM.YYYY`.
pub fn sanitize_birthday(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(char::is_ascii_digit).take(8).collect();
    let mut out = String::with_capacity(10);
    for (i, c) in digits.iter().enumerate() {
        if i == 2 || i == 4 {
            out.push('.');
        }
        out.push(*c);
    }
    out
}

fn leading_number(part: &str) -> Option<i32> {
    let digits: String = part.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Calendar check over day, month and year strings.
pub fn is_valid_date(day: &str, month: &str, year: &str) -> bool {
    let (Some(day), Some(month), Some(year)) =
        (leading_number(day), leading_number(month), leading_number(year))
    else {
        return false;
    };

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) || !(1900..=2100).contains(&year) {
        return false;
    }

    NaiveDate::from_ymd_opt(year, month as u32, day as u32).is_some()
}

/// `DD.MM.YYYY`, fully typed, naming a real calendar date.
pub fn is_valid_birthday(birthday: &str) -> bool {
    if birthday.chars().count() != 10 {
        return false;
    }
    let parts: Vec<&str> = birthday.split('.').collect();
    match parts.as_slice() {
        [day, month, year] => is_valid_date(day, month, year),
        _ => false,
    }
}

pub fn sanitize_passport_series(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).take(PASSPORT_SERIES_LEN).collect()
}

pub fn sanitize_passport_number(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).take(PASSPORT_NUMBER_LEN).collect()
}

pub fn is_valid_passport(series: &str, number: &str) -> bool {
    series.len() == PASSPORT_SERIES_LEN
        && number.len() == PASSPORT_NUMBER_LEN
        && series.chars().all(|c| c.is_ascii_digit())
        && number.chars().all(|c| c.is_ascii_digit())
}

/// Uppercases and keeps digits, Cyrillic letters, Roman numeral letters and hyphens.
pub fn sanitize_certificate_number(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit() || is_cyrillic(*c) || "IVXLCDMivxlcdm".contains(*c) || *c == '-')
        .flat_map(char::to_uppercase)
        .take(CERTIFICATE_MAX_LEN)
        .collect()
}

/// Birth certificate number such as `VIII-ЫП-123456`.
pub fn is_valid_certificate(number: &str) -> bool {
    static REGEX: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[IVXLCDM]{1,4}-[А-Я]{2}-[0-9]{6}$").expect("valid regex")
    });

    REGEX.is_match(number)
}

pub fn is_valid_document(doc_type: DocumentType, series: &str, number: &str) -> bool {
    match doc_type {
        DocumentType::Passport => is_valid_passport(series, number),
        DocumentType::BirthCertificate => is_valid_certificate(number),
    }
}

fn slice(s: &str, from: usize, to: usize) -> &str {
    let to = to.min(s.len());
    let from = from.min(to);
    &s[from..to]
}

/// Phone mask.
///
/// Russian numbers render as `+7 999 123 45 67` (or with an `8` prefix when
/// typed that way); a leading `9` is read as a `+7` number with the country
/// code omitted. Anything else becomes `+` followed by up to 15 raw digits.
pub fn format_phone(input: &str) -> String {
    let mut digits: String = input.chars().filter(char::is_ascii_digit).collect();
    let Some(first) = digits.chars().next() else {
        return String::new();
    };

    if !matches!(first, '7' | '8' | '9') {
        let raw: String = digits.chars().take(FOREIGN_PHONE_DIGITS).collect();
        return format!("+{raw}");
    }

    if first == '9' {
        digits.insert(0, '7');
    }
    digits.truncate(PHONE_DIGITS);

    let prefix = if digits.starts_with('8') { "8" } else { "+7" };
    let body = &digits[1..];

    let mut out = prefix.to_string();
    if !body.is_empty() {
        out.push(' ');
        out.push_str(slice(body, 0, 3));
    }
    if body.len() >= 4 {
        out.push(' ');
        out.push_str(slice(body, 3, 6));
    }
    if body.len() >= 7 {
        out.push(' ');
        out.push_str(slice(body, 6, 8));
    }
    if body.len() >= 9 {
        out.push(' ');
        out.push_str(slice(body, 8, 10));
    }
    out
}

pub fn is_valid_phone(phone: &str) -> bool {
    phone.chars().filter(char::is_ascii_digit).count() == PHONE_DIGITS
}

pub fn sanitize_email(input: &str) -> String {
    input.chars().filter(|c| !is_cyrillic(*c)).collect()
}

pub fn is_valid_email(email: &str) -> bool {
    static REGEX: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,6}$").expect("valid regex")
    });

    REGEX.is_match(email)
}

/// Fields that failed validation for one record.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<Field>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn check(&mut self, ok: bool, field: Field) {
        if !ok {
            self.errors.push(field);
        }
    }
}
