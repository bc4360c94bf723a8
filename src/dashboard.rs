use std::collections::BTreeSet;
use std::sync::{Arc,Mutex,RwLock};

use chrono::naive::NaiveDate;
use log::{info,warn};

use super::aggregate::aggregate;
use super::error::Result;
use super::geo::District;
use super::mzcr::{self,Datasets,Source};
use super::timeline::{densify,DailyRecord};


/// Data-quality counters of one pipeline run.
#[derive(Clone,Debug,Default,PartialEq,Eq)]
pub struct PipelineReport {
    pub rejected_dates: usize,
    pub missing_district: usize,
    pub dropped_deltas: usize,
    pub unresolved_districts: BTreeSet<String>,
}

/// Immutable result of one pipeline run.
#[derive(Clone,Debug)]
pub struct Timeline {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub records: Vec<DailyRecord>,
    pub report: PipelineReport,
}


pub fn build_timeline(data: &Datasets, districts: &[District],
		      start: NaiveDate, end: NaiveDate) -> Timeline {

    let aggregation = aggregate(&data.infections, &data.cures, &data.deaths);
    let densified = densify(&aggregation.deltas, districts, start, end);

    Timeline {
	start,
	end,
	records: densified.records,
	report: PipelineReport {
	    rejected_dates: aggregation.rejected_dates,
	    missing_district: aggregation.missing_district,
	    dropped_deltas: densified.dropped,
	    unresolved_districts: densified.unresolved,
	},
    }

}


#[derive(Clone,Debug,PartialEq,Eq)]
pub enum LoadStatus {
    Loading,
    Loaded,
    /// The last refresh failed; any earlier timeline is still current.
    Failed(String),
}


/// Holds the current timeline snapshot. A successful refresh replaces it
/// wholesale; overlapping refreshes end with whichever finished last.
pub struct Dashboard {
    districts: Vec<District>,
    start: NaiveDate,
    timeline: RwLock<Option<Arc<Timeline>>>,
    status: Mutex<LoadStatus>,
}

impl Dashboard {

    pub fn new(districts: &[District], start: NaiveDate) -> Self {
	Self {
	    districts: districts.to_vec(),
	    start,
	    timeline: RwLock::new(None),
	    status: Mutex::new(LoadStatus::Loading),
	}
    }

    pub fn timeline(&self) -> Option<Arc<Timeline>> {
	self.timeline.read().ok().and_then(|t| t.clone())
    }

    pub fn status(&self) -> LoadStatus {
	self.status.lock().map(|s| s.clone()).unwrap_or(LoadStatus::Loading)
    }

    /// Whether any refresh has succeeded so far.
    pub fn loaded(&self) -> bool {
	self.timeline().is_some()
    }

    /// Fetches the three datasets and rebuilds the timeline up to `today`.
    /// On failure the previous timeline stays in place.
    pub fn refresh<S: Source + ?Sized>(&self, source: &S, today: NaiveDate) -> Result<Arc<Timeline>> {

	let data = match mzcr::fetch_all(source) {
	    Ok(data) => data,
	    Err(err) => {
		warn!("Refresh failed, keeping previous data: {}", err);
		self.set_status(LoadStatus::Failed(err.to_string()));
		return Err(err);
	    }
	};

	let timeline = Arc::new(build_timeline(&data, &self.districts, self.start, today));
	info!("Timeline {}..{} ready: {} records", timeline.start, timeline.end, timeline.records.len());

	*self.timeline.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Arc::clone(&timeline));
	self.set_status(LoadStatus::Loaded);
	Ok(timeline)

    }

    fn set_status(&self, status: LoadStatus) {
	*self.status.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = status;
    }

}
