//! Normalization of the date strings found in the raw datasets.
//!
//! Two layouts occur upstream: the Czech `D.M.YYYY` (day first, not
//! zero-padded) and ISO `YYYY-MM-DD`. Fields are split by position, so a
//! string like `1.2.2020` is always the first of February.

use chrono::naive::NaiveDate;

use super::error::{Result,Error};


pub fn normalize(raw: &str) -> Result<NaiveDate> {

    let raw = raw.trim();
    let malformed = || Error::MalformedDate(raw.to_string());

    let (year, month, day) = match (raw.contains('.'), raw.contains('-')) {
	(true, false) => {
	    let (day, month, year) = split3(raw, '.').ok_or_else(malformed)?;
	    if year.len() != 4 || day.len() > 2 || month.len() > 2 {
		return Err(malformed());
	    }
	    (year, month, day)
	},
	(false, true) => {
	    let (year, month, day) = split3(raw, '-').ok_or_else(malformed)?;
	    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
		return Err(malformed());
	    }
	    (year, month, day)
	},
	_ => return Err(malformed()),
    };

    NaiveDate::from_ymd_opt(number(year).ok_or_else(malformed)? as i32,
			    number(month).ok_or_else(malformed)?,
			    number(day).ok_or_else(malformed)?)
	.ok_or_else(malformed)

}


/// Canonical `YYYY-MM-DD` rendering of a raw date.
pub fn normalize_str(raw: &str) -> Result<String> {
    normalize(raw).map(|date| iso(&date))
}


pub fn iso(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}


fn split3(s: &str, sep: char) -> Option<(&str, &str, &str)> {
    let mut parts = s.split(sep);
    let fields = (parts.next()?, parts.next()?, parts.next()?);
    match parts.next() {
	Some(_) => None,
	None => Some(fields),
    }
}

fn number(field: &str) -> Option<u32> {
    match !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit()) {
	false => None,
	true => field.parse().ok(),
    }
}
