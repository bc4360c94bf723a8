use std::collections::{BTreeMap,BTreeSet,HashMap};

use chrono::naive::NaiveDate;
use log::{info,warn};
use serde::{Serialize,Deserialize};

use super::aggregate::{Deltas,DailyDelta};
use super::error::Error;
use super::geo::District;
use super::NaiveDateRange;


/// Cumulative counts of one area on one day. District records carry
/// both codes; region records have no district and country records
/// neither.
#[derive(Serialize,Deserialize,Clone,Debug,PartialEq,Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub region: Option<String>,
    pub infected_count: u64,
    pub cured_count: u64,
    pub death_count: u64,
}

impl DailyRecord {

    pub fn active_count(&self) -> i64 {
	self.infected_count as i64 - self.cured_count as i64 - self.death_count as i64
    }

}


#[derive(Debug,Default)]
pub struct Densified {
    pub records: Vec<DailyRecord>,
    /// District codes seen in the deltas but missing from the master list.
    pub unresolved: BTreeSet<String>,
    /// Deltas dated after the end of the timeline.
    pub dropped: usize,
}


struct Row {
    region: Option<String>,
    total: DailyDelta,
}


/// Turns sparse daily deltas into one cumulative record per district and
/// day in `[start, end]`, ordered by date and then district code.
///
/// Every district of `districts` starts from zero on `start`, even without
/// any events. Deltas dated before `start` are counted into that first day.
pub fn densify<'a, I>(deltas: &Deltas, districts: I, start: NaiveDate, end: NaiveDate) -> Densified
where I: IntoIterator<Item = &'a District> {

    let mut rows: BTreeMap<&str,Row> = districts.into_iter().map(
	|d| (d.code, Row { region: Some(d.region_code().to_string()), total: DailyDelta::default() })
    ).collect();

    let mut by_district: HashMap<&str,BTreeMap<NaiveDate,&DailyDelta>> = HashMap::new();
    let mut unresolved = BTreeSet::new();
    let mut dropped = 0;

    for ((district, date), delta) in deltas {
	let row = rows.entry(district.as_str()).or_insert_with(|| {
	    warn!("{} (reported in {}), keeping it without region",
		  Error::UnknownDistrict(district.clone()),
		  delta.region.as_deref().unwrap_or("no region"));
	    unresolved.insert(district.clone());
	    Row { region: None, total: DailyDelta::default() }
	});
	if *date < start {
	    row.total += delta;
	} else if *date > end {
	    dropped += 1;
	} else {
	    by_district.entry(district.as_str()).or_default().insert(*date, delta);
	}
    }

    if dropped > 0 {
	warn!("Dropped {} district days after {}", dropped, end);
    }

    let mut records = Vec::with_capacity(rows.len() * NaiveDateRange::days(start, end));

    for date in NaiveDateRange::new(start, end) {
	for (district, row) in rows.iter_mut() {
	    if let Some(delta) = by_district.get(district).and_then(|days| days.get(&date)) {
		row.total += *delta;
	    }
	    records.push(DailyRecord {
		date,
		district: Some(district.to_string()),
		region: row.region.clone(),
		infected_count: row.total.infected,
		cured_count: row.total.cured,
		death_count: row.total.deaths,
	    });
	}
    }

    info!("Densified {} districts from {} to {} into {} records",
	  rows.len(), start, end, records.len());

    Densified { records, unresolved, dropped }

}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::geo::DISTRICTS;
    use crate::mzcr::tests::event;
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
	NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series<'a>(records: &'a [DailyRecord], district: &'a str) -> impl Iterator<Item = &'a DailyRecord> {
	records.iter().filter(move |r| r.district.as_deref() == Some(district))
    }

    const BRNO: District = District { code: "CZ0642", name: "Brno-město" };
    const BLANSKO: District = District { code: "CZ0641", name: "Blansko" };

    #[test]
    fn seeds_and_carries_forward() {
	let agg = aggregate(&[event("CZ0642", "1.3.2020")], &[], &[]);
	let out = densify(&agg.deltas, &[BRNO], day(2020, 3, 1), day(2020, 3, 3));
	let infected: Vec<_> = series(&out.records, "CZ0642").map(|r| r.infected_count).collect();
	assert_eq!(infected, vec![1, 1, 1]);
    }

    #[test]
    fn accumulates_later_deltas() {
	let agg = aggregate(&[event("CZ0642", "2.3.2020"), event("CZ0642", "4.3.2020"),
			      event("CZ0642", "4.3.2020")],
			    &[event("CZ0642", "4.3.2020")], &[event("CZ0642", "5.3.2020")]);
	let out = densify(&agg.deltas, &[BRNO], day(2020, 3, 1), day(2020, 3, 5));
	let counts: Vec<_> = series(&out.records, "CZ0642")
	    .map(|r| (r.infected_count, r.cured_count, r.death_count)).collect();
	assert_eq!(counts, vec![(0,0,0), (1,0,0), (1,0,0), (3,1,0), (3,1,1)]);
    }

    #[test]
    fn quiet_districts_stay_at_zero() {
	let agg = aggregate(&[event("CZ0642", "1.3.2020")], &[], &[]);
	let out = densify(&agg.deltas, &[BLANSKO, BRNO], day(2020, 3, 1), day(2020, 3, 10));
	assert_eq!(out.records.len(), 20);
	assert!(series(&out.records, "CZ0641").all(|r| r.infected_count == 0));
	assert!(series(&out.records, "CZ0641").all(|r| r.region.as_deref() == Some("CZ064")));
    }

    #[test]
    fn one_record_per_district_and_day() {
	let agg = aggregate(&[event("CZ0100", "15.3.2020")], &[], &[]);
	let (start, end) = (day(2020, 3, 1), day(2020, 4, 30));
	let out = densify(&agg.deltas, DISTRICTS, start, end);
	assert_eq!(out.records.len(), 77 * 61);
	let keys: BTreeSet<_> = out.records.iter()
	    .map(|r| (r.district.clone(), r.date)).collect();
	assert_eq!(keys.len(), out.records.len());
	for district in DISTRICTS {
	    let dates: Vec<_> = series(&out.records, district.code).map(|r| r.date).collect();
	    assert_eq!(dates, NaiveDateRange::new(start, end).collect::<Vec<_>>());
	}
    }

    #[test]
    fn output_is_ordered_by_date() {
	let agg = aggregate(&[], &[], &[]);
	let out = densify(&agg.deltas, &[BRNO, BLANSKO], day(2020, 3, 1), day(2020, 3, 4));
	assert!(out.records.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn unknown_districts_pass_through_without_region() {
	let agg = aggregate(&[event("CZ9999", "2.3.2020")], &[], &[]);
	let out = densify(&agg.deltas, &[BRNO], day(2020, 3, 1), day(2020, 3, 3));
	assert_eq!(out.unresolved.iter().collect::<Vec<_>>(), vec!["CZ9999"]);
	let unknown: Vec<_> = series(&out.records, "CZ9999").collect();
	assert_eq!(unknown.len(), 3);
	assert!(unknown.iter().all(|r| r.region.is_none()));
	assert_eq!(unknown.iter().map(|r| r.infected_count).collect::<Vec<_>>(), vec![0, 1, 1]);
    }

    #[test]
    fn deltas_outside_the_window() {
	let agg = aggregate(&[event("CZ0642", "20.2.2020"), event("CZ0642", "1.3.2020"),
			      event("CZ0642", "10.3.2020")], &[], &[]);
	let out = densify(&agg.deltas, &[BRNO], day(2020, 3, 1), day(2020, 3, 2));
	assert_eq!(out.dropped, 1);
	let infected: Vec<_> = series(&out.records, "CZ0642").map(|r| r.infected_count).collect();
	assert_eq!(infected, vec![2, 2]);
    }

    #[test]
    fn empty_when_end_precedes_start() {
	let agg = aggregate(&[], &[], &[]);
	assert!(densify(&agg.deltas, &[BRNO], day(2020, 3, 2), day(2020, 3, 1)).records.is_empty());
    }

    #[test]
    fn active_count_is_not_clamped() {
	let record = DailyRecord {
	    date: day(2020, 3, 1), district: None, region: None,
	    infected_count: 1, cured_count: 2, death_count: 1,
	};
	assert_eq!(record.active_count(), -2);
    }

    fn arb_events() -> impl Strategy<Value = Vec<(usize, u32)>> {
	prop::collection::vec((0..4usize, 1..=31u32), 0..60)
    }

    fn to_events(raw: &[(usize, u32)]) -> Vec<crate::mzcr::RawPersonEvent> {
	const CODES: [&str; 4] = ["CZ0641", "CZ0642", "CZ0643", "CZ0100"];
	raw.iter().map(|&(d, day)| event(CODES[d], &format!("{}.3.2020", day))).collect()
    }

    proptest! {
	#![proptest_config(ProptestConfig::with_cases(64))]

	#[test]
	fn prop_counters_never_decrease(inf in arb_events(), cur in arb_events(), dead in arb_events()) {
	    let agg = aggregate(&to_events(&inf), &to_events(&cur), &to_events(&dead));
	    let out = densify(&agg.deltas, DISTRICTS, day(2020, 3, 1), day(2020, 3, 31));
	    for district in DISTRICTS {
		let rows: Vec<_> = series(&out.records, district.code).collect();
		prop_assert_eq!(rows.len(), 31);
		for w in rows.windows(2) {
		    prop_assert!(w[1].infected_count >= w[0].infected_count);
		    prop_assert!(w[1].cured_count >= w[0].cured_count);
		    prop_assert!(w[1].death_count >= w[0].death_count);
		}
	    }
	}

	#[test]
	fn prop_last_day_holds_all_events(inf in arb_events(), cur in arb_events(), dead in arb_events()) {
	    let agg = aggregate(&to_events(&inf), &to_events(&cur), &to_events(&dead));
	    let out = densify(&agg.deltas, DISTRICTS, day(2020, 3, 1), day(2020, 3, 31));
	    let last: Vec<_> = out.records.iter().filter(|r| r.date == day(2020, 3, 31)).collect();
	    prop_assert_eq!(last.iter().map(|r| r.infected_count).sum::<u64>(), inf.len() as u64);
	    prop_assert_eq!(last.iter().map(|r| r.cured_count).sum::<u64>(), cur.len() as u64);
	    prop_assert_eq!(last.iter().map(|r| r.death_count).sum::<u64>(), dead.len() as u64);
	}
    }
}
