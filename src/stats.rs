//! Derived statistics over a densified timeline.
//!
//! Everything here is a pure function of its inputs. [`Selectors`] only
//! adds caching on top: a cached result is always equal to a fresh one.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Duration;
use chrono::naive::NaiveDate;
use log::{debug,warn};
use serde::Serialize;

use super::dashboard::Timeline;
use super::state::{Selection,ViewMode};
use super::timeline::DailyRecord;


#[derive(Serialize,Clone,Debug,PartialEq,Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    #[serde(flatten)]
    pub record: DailyRecord,
    pub active_count: i64,
}

impl StatsRecord {

    pub fn date(&self) -> NaiveDate {
	self.record.date
    }

}


/// Sums district records into one record per day and region. Records
/// without a region are left out. The output has no district, so
/// grouping it again returns it unchanged.
pub fn group_by_region(records: &[DailyRecord]) -> Vec<DailyRecord> {

    let mut groups: BTreeMap<(NaiveDate,&str),DailyRecord> = BTreeMap::new();
    let mut orphans = 0;

    for record in records {
	let region = match record.region.as_deref() {
	    Some(region) => region,
	    None => { orphans += 1; continue; }
	};
	let group = groups.entry((record.date, region)).or_insert_with(|| DailyRecord {
	    date: record.date,
	    district: None,
	    region: Some(region.to_string()),
	    infected_count: 0,
	    cured_count: 0,
	    death_count: 0,
	});
	group.infected_count += record.infected_count;
	group.cured_count += record.cured_count;
	group.death_count += record.death_count;
    }

    if orphans > 0 {
	warn!("Left {} records without region out of the region view", orphans);
    }

    groups.into_values().collect()

}


/// National totals, one record per day.
pub fn group_by_country(records: &[DailyRecord]) -> Vec<DailyRecord> {

    let mut days: BTreeMap<NaiveDate,DailyRecord> = BTreeMap::new();

    for record in records {
	let total = days.entry(record.date).or_insert_with(|| DailyRecord {
	    date: record.date,
	    district: None,
	    region: None,
	    infected_count: 0,
	    cured_count: 0,
	    death_count: 0,
	});
	total.infected_count += record.infected_count;
	total.cured_count += record.cured_count;
	total.death_count += record.death_count;
    }

    days.into_values().collect()

}


pub fn with_active_count(records: Vec<DailyRecord>) -> Vec<StatsRecord> {
    records.into_iter().map(|record| StatsRecord {
	active_count: record.active_count(),
	record,
    }).collect()
}


pub fn max_active_count<'a, I>(records: I) -> i64
where I: IntoIterator<Item = &'a StatsRecord> {
    records.into_iter().map(|r| r.active_count).fold(0, i64::max)
}


/// Records of the needle day, one per area of the view.
pub fn slice_for_map(records: &[StatsRecord], needle: NaiveDate) -> Vec<&StatsRecord> {
    records.iter().filter(|r| r.record.date == needle).collect()
}


/// The selected area over `[today - window_days, today]`, oldest first.
pub fn slice_for_graph<'a>(records: &'a [StatsRecord], view_mode: ViewMode, area: &str,
			   window_days: u32, today: NaiveDate) -> Vec<&'a StatsRecord> {

    let from = today.checked_sub_signed(Duration::days(window_days.into()))
	.unwrap_or(NaiveDate::MIN);

    let mut slice: Vec<_> = records.iter().filter(|r| {
	let code = match view_mode {
	    ViewMode::District => r.record.district.as_deref(),
	    ViewMode::Region => r.record.region.as_deref(),
	};
	code == Some(area) && r.record.date >= from && r.record.date <= today
    }).collect();

    slice.sort_by_key(|r| r.record.date);
    slice

}


/// Records of a timeline as seen in a view mode: grouped by region first
/// when needed, then with active counts.
pub fn view_data(records: &[DailyRecord], view_mode: ViewMode) -> Vec<StatsRecord> {
    match view_mode {
	ViewMode::Region => with_active_count(group_by_region(records)),
	ViewMode::District => with_active_count(records.to_vec()),
    }
}


struct Cached {
    timeline: Arc<Timeline>,
    view_mode: ViewMode,
    data: Arc<Vec<StatsRecord>>,
    max_active_count: i64,
}

/// Memoized view data, keyed by timeline snapshot identity and view mode.
#[derive(Default)]
pub struct Selectors {
    cached: Option<Cached>,
}

impl Selectors {

    pub fn new() -> Self {
	Self::default()
    }

    fn cached(&mut self, timeline: &Arc<Timeline>, view_mode: ViewMode) -> &Cached {

	let hit = self.cached.as_ref().map_or(false, |c| {
	    Arc::ptr_eq(&c.timeline, timeline) && c.view_mode == view_mode
	});

	if !hit {
	    self.cached = None;
	}

	self.cached.get_or_insert_with(|| {
	    debug!("Recomputing {} view", view_mode);
	    let data = view_data(&timeline.records, view_mode);
	    Cached {
		timeline: Arc::clone(timeline),
		view_mode,
		max_active_count: max_active_count(&data),
		data: Arc::new(data),
	    }
	})

    }

    pub fn data_with_view(&mut self, timeline: &Arc<Timeline>, view_mode: ViewMode) -> Arc<Vec<StatsRecord>> {
	Arc::clone(&self.cached(timeline, view_mode).data)
    }

    pub fn max_active_count(&mut self, timeline: &Arc<Timeline>, view_mode: ViewMode) -> i64 {
	self.cached(timeline, view_mode).max_active_count
    }

    pub fn map_data(&mut self, timeline: &Arc<Timeline>, selection: &Selection) -> Vec<StatsRecord> {
	slice_for_map(&self.cached(timeline, selection.view_mode).data, selection.needle)
	    .into_iter().cloned().collect()
    }

    pub fn graph_data(&mut self, timeline: &Arc<Timeline>, selection: &Selection) -> Vec<StatsRecord> {
	let today = timeline.end;
	slice_for_graph(&self.cached(timeline, selection.view_mode).data, selection.view_mode,
			selection.selected_area(), selection.window_days, today)
	    .into_iter().cloned().collect()
    }

}
