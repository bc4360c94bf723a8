use std::fs;
use std::path::{Path,PathBuf};
use std::time::Duration;

use chrono::naive::NaiveDate;
use log::info;
use serde::Deserialize;

use super::error::Result;


#[derive(Deserialize,Debug,Clone,PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub base_url: String,
    pub cache_path: PathBuf,
    pub graph_path: PathBuf,
    pub settings_path: PathBuf,
    /// First day of the timeline.
    pub start_date: NaiveDate,
    pub cache_max_age_minutes: u64,
}

impl Default for Config {
    fn default() -> Self {
	Self {
	    base_url: "https://onemocneni-aktualne.mzcr.cz/api/v2/covid-19".to_string(),
	    cache_path: PathBuf::from("cache"),
	    graph_path: PathBuf::from("graphs"),
	    settings_path: PathBuf::from("settings.json"),
	    start_date: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap_or(NaiveDate::MIN),
	    cache_max_age_minutes: 30,
	}
    }
}

impl Config {

    /// Reads `path`, or returns the defaults when there is no such file.
    pub fn load(path: &Path) -> Result<Self> {
	match path.exists() {
	    false => Ok(Self::default()),
	    true => {
		info!("Reading configuration from {}", path.display());
		Ok(toml::from_str(&fs::read_to_string(path)?)?)
	    }
	}
    }

    pub fn cache_max_age(&self) -> Duration {
	Duration::from_secs(self.cache_max_age_minutes * 60)
    }

}
