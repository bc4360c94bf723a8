//! Selection state: view mode, selected areas, time window and needle.
//!
//! The state only changes through [`Action`]s dispatched on a
//! [`SelectionStore`]. Observers see every change; persistence is one of
//! them (see [`persistence`]).

use std::fmt;
use std::str::FromStr;

use chrono::naive::NaiveDate;
use log::warn;

use super::storage::Storage;


pub const DEFAULT_REGION: &str = "CZ064"; // Jihomoravský kraj
pub const DEFAULT_DISTRICT: &str = "CZ0642"; // Brno-město
pub const DEFAULT_WINDOW_DAYS: u32 = 14;

const KEY_VIEW: &str = "dataView";
const KEY_REGION: &str = "regionCode";
const KEY_DISTRICT: &str = "districtCode";
const KEY_WINDOW: &str = "timeIntervalDays";


#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash)]
pub enum ViewMode {
    Region,
    District,
}

impl ViewMode {

    pub fn name(&self) -> &'static str {
	match self {
	    Self::Region => "region",
	    Self::District => "district",
	}
    }

}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	write!(f, "{}", self.name())
    }
}

impl FromStr for ViewMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
	match s {
	    "region" => Ok(Self::Region),
	    "district" => Ok(Self::District),
	    other => Err(format!("unknown view mode {:?}", other)),
	}
    }
}


pub struct TimeInterval {
    pub id: &'static str,
    pub label: &'static str,
    pub days: u32,
}

pub const TIME_INTERVALS: [TimeInterval; 4] = [
    TimeInterval { id: "7days", label: "7 dní", days: 7 },
    TimeInterval { id: "14days", label: "14 dní", days: 14 },
    TimeInterval { id: "30days", label: "30 dní", days: 30 },
    TimeInterval { id: "all", label: "vše", days: 1_000_000 },
];


#[derive(Clone,Debug,PartialEq,Eq)]
pub struct Selection {
    pub view_mode: ViewMode,
    pub region_code: String,
    pub district_code: String,
    pub window_days: u32,
    pub needle: NaiveDate,
}

impl Selection {

    pub fn default_at(needle: NaiveDate) -> Self {
	Self {
	    view_mode: ViewMode::Region,
	    region_code: DEFAULT_REGION.to_string(),
	    district_code: DEFAULT_DISTRICT.to_string(),
	    window_days: DEFAULT_WINDOW_DAYS,
	    needle,
	}
    }

    /// Restores the persisted fields, falling back to the defaults for
    /// anything absent or unparseable. The needle is not persisted.
    pub fn restore<S: Storage + ?Sized>(storage: &S, needle: NaiveDate) -> Self {

	let defaults = Self::default_at(needle);

	let view_mode = match storage.get(KEY_VIEW).map(|v| v.parse::<ViewMode>()) {
	    Some(Ok(view_mode)) => view_mode,
	    Some(Err(err)) => { warn!("Ignoring stored {}: {}", KEY_VIEW, err); defaults.view_mode },
	    None => defaults.view_mode,
	};
	let window_days = match storage.get(KEY_WINDOW).map(|v| v.parse::<u32>()) {
	    Some(Ok(days)) if days > 0 => days,
	    Some(_) => { warn!("Ignoring stored {}", KEY_WINDOW); defaults.window_days },
	    None => defaults.window_days,
	};

	Self {
	    view_mode,
	    region_code: storage.get(KEY_REGION).filter(|v| !v.is_empty())
		.unwrap_or(defaults.region_code),
	    district_code: storage.get(KEY_DISTRICT).filter(|v| !v.is_empty())
		.unwrap_or(defaults.district_code),
	    window_days,
	    needle,
	}

    }

    /// Region code in region view, district code in district view.
    pub fn selected_area(&self) -> &str {
	match self.view_mode {
	    ViewMode::Region => &self.region_code,
	    ViewMode::District => &self.district_code,
	}
    }

    pub fn persisted(&self) -> [(&'static str, String); 4] {
	[(KEY_VIEW, self.view_mode.to_string()),
	 (KEY_REGION, self.region_code.clone()),
	 (KEY_DISTRICT, self.district_code.clone()),
	 (KEY_WINDOW, self.window_days.to_string())]
    }

}


#[derive(Clone,Debug,PartialEq,Eq)]
pub enum Action {
    SetRegion(String),
    SetDistrict(String),
    SwitchView(ViewMode),
    SetWindowDays(u32),
    SetNeedle(NaiveDate),
}

impl Selection {

    fn apply(&mut self, action: Action) {
	match action {
	    Action::SetRegion(code) => self.region_code = code,
	    Action::SetDistrict(code) => self.district_code = code,
	    Action::SwitchView(view_mode) => self.view_mode = view_mode,
	    Action::SetWindowDays(days) => self.window_days = days,
	    Action::SetNeedle(needle) => self.needle = needle,
	}
    }

}


type Observer = Box<dyn FnMut(&Selection, &Selection)>;

pub struct SelectionStore {
    state: Selection,
    observers: Vec<Observer>,
}

impl SelectionStore {

    pub fn new(state: Selection) -> Self {
	Self { state, observers: Vec::new() }
    }

    pub fn state(&self) -> &Selection {
	&self.state
    }

    /// Registers `observer`, called with the old and new state after
    /// every dispatched action.
    pub fn subscribe<F>(&mut self, observer: F)
    where F: FnMut(&Selection, &Selection) + 'static {
	self.observers.push(Box::new(observer));
    }

    pub fn dispatch(&mut self, action: Action) {
	let old = self.state.clone();
	self.state.apply(action);
	for observer in self.observers.iter_mut() {
	    observer(&old, &self.state);
	}
    }

}


/// Observer writing persisted fields that changed to `storage`.
pub fn persistence<S: Storage + 'static>(mut storage: S) -> impl FnMut(&Selection, &Selection) {
    move |old, new| {
	for ((key, before), (_, after)) in old.persisted().iter().zip(new.persisted().iter()) {
	    if before != after {
		if let Err(err) = storage.set(key, after) {
		    warn!("Could not persist {}: {}", key, err);
		}
	    }
	}
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
	NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn restores_defaults_from_empty_storage() {
	let selection = Selection::restore(&MemoryStorage::new(), day(2020, 10, 1));
	assert_eq!(selection, Selection::default_at(day(2020, 10, 1)));
	assert_eq!(selection.selected_area(), "CZ064");
    }

    #[test]
    fn restores_stored_values() {
	let mut storage = MemoryStorage::new();
	storage.set("dataView", "district").unwrap();
	storage.set("districtCode", "CZ0806").unwrap();
	storage.set("timeIntervalDays", "30").unwrap();
	let selection = Selection::restore(&storage, day(2020, 10, 1));
	assert_eq!(selection.view_mode, ViewMode::District);
	assert_eq!(selection.selected_area(), "CZ0806");
	assert_eq!(selection.window_days, 30);
	assert_eq!(selection.region_code, DEFAULT_REGION);
    }

    #[test]
    fn falls_back_on_garbage() {
	let mut storage = MemoryStorage::new();
	storage.set("dataView", "country").unwrap();
	storage.set("timeIntervalDays", "fortnight").unwrap();
	storage.set("regionCode", "").unwrap();
	let selection = Selection::restore(&storage, day(2020, 10, 1));
	assert_eq!(selection, Selection::default_at(day(2020, 10, 1)));
	storage.set("timeIntervalDays", "0").unwrap();
	assert_eq!(Selection::restore(&storage, day(2020, 10, 1)).window_days, DEFAULT_WINDOW_DAYS);
    }

    #[test]
    fn actions_update_state_and_notify() {
	let seen = Rc::new(RefCell::new(Vec::new()));
	let mut store = SelectionStore::new(Selection::default_at(day(2020, 10, 1)));
	let log = Rc::clone(&seen);
	store.subscribe(move |old, new| log.borrow_mut().push((old.clone(), new.clone())));

	store.dispatch(Action::SwitchView(ViewMode::District));
	store.dispatch(Action::SetDistrict("CZ0100".to_string()));
	store.dispatch(Action::SetNeedle(day(2020, 9, 1)));

	assert_eq!(store.state().selected_area(), "CZ0100");
	assert_eq!(store.state().needle, day(2020, 9, 1));
	let seen = seen.borrow();
	assert_eq!(seen.len(), 3);
	assert_eq!(seen[0].0.view_mode, ViewMode::Region);
	assert_eq!(seen[0].1.view_mode, ViewMode::District);
    }

    #[test]
    fn persists_only_changed_fields() {
	let storage = MemoryStorage::new();
	let mut store = SelectionStore::new(Selection::default_at(day(2020, 10, 1)));
	store.subscribe(persistence(storage.clone()));

	store.dispatch(Action::SetNeedle(day(2020, 9, 1)));
	assert!(storage.items().is_empty());

	store.dispatch(Action::SetRegion("CZ080".to_string()));
	store.dispatch(Action::SetWindowDays(TIME_INTERVALS[2].days));
	let items = storage.items();
	assert_eq!(items.len(), 2);
	assert_eq!(items["regionCode"], "CZ080");
	assert_eq!(items["timeIntervalDays"], "30");

	let restored = Selection::restore(&storage, day(2020, 10, 1));
	assert_eq!(restored.region_code, "CZ080");
	assert_eq!(restored.window_days, 30);
    }

    #[test]
    fn view_mode_round_trips_through_its_name() {
	for view_mode in [ViewMode::Region, ViewMode::District] {
	    assert_eq!(view_mode.name().parse::<ViewMode>(), Ok(view_mode));
	}
    }
}
