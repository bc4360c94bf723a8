use std::collections::HashMap;
use std::ops::AddAssign;

use chrono::naive::NaiveDate;
use log::{debug,info,warn};

use super::date;
use super::mzcr::{RawPersonEvent,Dataset};


/// New infections, cures and deaths of one district on one day.
#[derive(Clone,Debug,Default,PartialEq,Eq)]
pub struct DailyDelta {
    pub region: Option<String>,
    pub infected: u64,
    pub cured: u64,
    pub deaths: u64,
}

impl DailyDelta {

    fn increment(&mut self, dataset: Dataset) {
	match dataset {
	    Dataset::Infections => self.infected += 1,
	    Dataset::Cures => self.cured += 1,
	    Dataset::Deaths => self.deaths += 1,
	}
    }

}

impl AddAssign<&DailyDelta> for DailyDelta {
    fn add_assign(&mut self, other: &DailyDelta) {
	if self.region.is_none() {
	    self.region = other.region.clone();
	}
	self.infected += other.infected;
	self.cured += other.cured;
	self.deaths += other.deaths;
    }
}


pub type Deltas = HashMap<(String,NaiveDate),DailyDelta>;

#[derive(Debug,Default)]
pub struct Aggregation {
    pub deltas: Deltas,
    /// Events whose date matched no known layout.
    pub rejected_dates: usize,
    /// Events without a district code.
    pub missing_district: usize,
}

impl Aggregation {

    pub fn add(&mut self, dataset: Dataset, event: &RawPersonEvent) {

	let district = match event.district_code.as_deref() {
	    Some(district) if !district.is_empty() => district,
	    _ => {
		debug!("Skipping {} record without district ({})", dataset, event.date);
		self.missing_district += 1;
		return;
	    }
	};

	let date = match date::normalize(&event.date) {
	    Ok(date) => date,
	    Err(err) => {
		debug!("Skipping {} record for {}: {}", dataset, district, err);
		self.rejected_dates += 1;
		return;
	    }
	};

	let delta = self.deltas.entry((district.to_string(), date))
	    .or_insert_with(|| DailyDelta {
		region: event.region_code.clone(),
		..DailyDelta::default()
	    });
	delta.increment(dataset);

    }

}


/// Counts events per (district, day). The result holds single-day
/// increments, not running totals.
pub fn aggregate(infections: &[RawPersonEvent], cures: &[RawPersonEvent],
		 deaths: &[RawPersonEvent]) -> Aggregation {

    let mut aggregation = Aggregation::default();

    for (dataset, events) in [(Dataset::Infections, infections),
			      (Dataset::Cures, cures),
			      (Dataset::Deaths, deaths)] {
	for event in events {
	    aggregation.add(dataset, event);
	}
    }

    if aggregation.rejected_dates > 0 {
	warn!("Rejected {} records with malformed dates", aggregation.rejected_dates);
    }
    if aggregation.missing_district > 0 {
	warn!("Skipped {} records without district", aggregation.missing_district);
    }
    info!("Aggregated {} events into {} district days",
	  infections.len() + cures.len() + deaths.len(), aggregation.deltas.len());

    aggregation

}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::mzcr::tests::event;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
	NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn counts_each_dataset_in_its_own_field() {
	let agg = aggregate(&[event("CZ0642", "1.3.2020"), event("CZ0642", "1.3.2020")],
			    &[event("CZ0642", "1.3.2020")],
			    &[event("CZ0643", "2020-03-02")]);
	assert_eq!(agg.deltas.len(), 2);
	assert_eq!(agg.deltas[&("CZ0642".to_string(), day(2020, 3, 1))], DailyDelta {
	    region: Some("CZ064".to_string()), infected: 2, cured: 1, deaths: 0,
	});
	assert_eq!(agg.deltas[&("CZ0643".to_string(), day(2020, 3, 2))].deaths, 1);
    }

    #[test]
    fn both_date_layouts_share_a_key() {
	let agg = aggregate(&[event("CZ0100", "5.3.2020"), event("CZ0100", "2020-03-05")], &[], &[]);
	assert_eq!(agg.deltas.len(), 1);
	assert_eq!(agg.deltas[&("CZ0100".to_string(), day(2020, 3, 5))].infected, 2);
    }

    #[test]
    fn order_of_datasets_does_not_matter() {
	let a = vec![event("CZ0642", "1.3.2020"), event("CZ0201", "3.3.2020")];
	let b = vec![event("CZ0201", "3.3.2020")];
	let first = aggregate(&a, &b, &[]);
	let mut second = Aggregation::default();
	for e in b.iter().rev() {
	    second.add(Dataset::Cures, e);
	}
	for e in a.iter().rev() {
	    second.add(Dataset::Infections, e);
	}
	assert_eq!(first.deltas, second.deltas);
    }

    #[test]
    fn skips_bad_records_and_counts_them() {
	let mut nameless = event("CZ0642", "1.3.2020");
	nameless.district_code = None;
	let agg = aggregate(&[event("CZ0642", "3/1/2020"), nameless, event("CZ0642", "1.3.2020")],
			    &[event("CZ0642", "31.2.2020")], &[]);
	assert_eq!(agg.rejected_dates, 2);
	assert_eq!(agg.missing_district, 1);
	assert_eq!(agg.deltas.len(), 1);
    }

    #[test]
    fn region_comes_from_first_event() {
	let mut odd = event("CZ0642", "1.3.2020");
	odd.region_code = None;
	let agg = aggregate(&[odd, event("CZ0642", "1.3.2020")], &[], &[]);
	assert_eq!(agg.deltas[&("CZ0642".to_string(), day(2020, 3, 1))].region, None);
    }
}
