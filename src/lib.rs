//! Data layer of a COVID-19 dashboard for Czech regions and districts.
//!
//! Per-person infection, cure and death records are counted per district
//! and day ([`aggregate`]), densified into gap-free cumulative series
//! ([`timeline`]) and queried per view, needle and time window
//! ([`stats`]).

pub mod error;
pub mod date;
pub mod geo;
pub mod mzcr;
pub mod aggregate;
pub mod timeline;
pub mod stats;
pub mod storage;
pub mod state;
pub mod dashboard;
pub mod config;
pub mod graph;

use chrono::naive::NaiveDate;

pub use error::{Error,Result};


/// Inclusive day range.
#[derive(Clone,Debug)]
pub struct NaiveDateRange(Option<NaiveDate>,NaiveDate);

impl NaiveDateRange {

    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
	Self(Some(start), end)
    }

    /// Number of days in `[start, end]`, zero when `end` precedes `start`.
    pub fn days(start: NaiveDate, end: NaiveDate) -> usize {
	((end - start).num_days() + 1).max(0) as usize
    }

}

impl Iterator for NaiveDateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<NaiveDate> {
	let current = self.0.filter(|date| *date <= self.1)?;
	self.0 = current.succ_opt();
	Some(current)
    }
}
