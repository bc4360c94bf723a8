use std::{fmt,fs,io,thread};
use std::fs::File;
use std::path::{Path,PathBuf};
use std::time::Duration;

use log::{debug,info};
use serde::{Serialize,Deserialize};

use super::error::{Result,Error};


/// One person-level event as published by the ministry of health
/// (onemocneni-aktualne.mzcr.cz, API v2). The payload carries more
/// fields (age, sex, infection abroad), which are ignored.
#[derive(Serialize,Deserialize,Clone,Debug,PartialEq)]
pub struct RawPersonEvent {
    #[serde(rename = "datum")]
    pub date: String,
    #[serde(rename = "kraj_nuts_kod")]
    pub region_code: Option<String>,
    #[serde(rename = "okres_lau_kod")]
    pub district_code: Option<String>,
}

#[derive(Serialize,Deserialize,Debug)]
pub struct Payload {
    pub data: Vec<RawPersonEvent>,
}


#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash)]
pub enum Dataset {
    Infections,
    Cures,
    Deaths,
}

impl Dataset {

    pub const ALL: [Dataset; 3] = [Dataset::Infections, Dataset::Cures, Dataset::Deaths];

    pub fn resource(&self) -> &'static str {
	match self {
	    Self::Infections => "osoby",
	    Self::Cures => "vyleceni",
	    Self::Deaths => "umrti",
	}
    }

}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	write!(f, "{}", self.resource())
    }
}


/// Where the raw event lists come from.
pub trait Source: Sync {
    fn fetch(&self, dataset: Dataset) -> Result<Vec<RawPersonEvent>>;
}

#[derive(Debug,Default,Clone)]
pub struct Datasets {
    pub infections: Vec<RawPersonEvent>,
    pub cures: Vec<RawPersonEvent>,
    pub deaths: Vec<RawPersonEvent>,
}


/// Fetches the three datasets concurrently. Returns only after all
/// three requests have finished; any failure fails the whole fetch.
pub fn fetch_all<S: Source + ?Sized>(source: &S) -> Result<Datasets> {

    thread::scope(|scope| {

	let workers: Vec<_> = Dataset::ALL.iter().map(
	    |&dataset| (dataset, scope.spawn(move || source.fetch(dataset)))
	).collect();

	let results: Vec<Result<Vec<RawPersonEvent>>> = workers.into_iter().map(
	    |(dataset, worker)| match worker.join() {
		Ok(Ok(data)) => Ok(data),
		Ok(Err(err)) => Err(Error::fetch(dataset, err)),
		Err(_) => Err(Error::FetchAborted(dataset)),
	    }
	).collect();

	let [infections, cures, deaths]: [Result<_>; 3] = results.try_into()
	    .map_err(|_| Error::MissingData)?;
	Ok(Datasets {
	    infections: infections?,
	    cures: cures?,
	    deaths: deaths?,
	})

    })

}


pub struct HttpSource {
    base_url: String,
    cache_path: PathBuf,
    max_age: Duration,
}

impl HttpSource {

    pub fn new(base_url: &str, cache_path: &Path, max_age: Duration) -> Self {
	Self {
	    base_url: base_url.trim_end_matches('/').to_string(),
	    cache_path: cache_path.join("mzcr"),
	    max_age,
	}
    }

    pub fn url(&self, dataset: Dataset) -> String {
	format!("{}/{}.min.json", self.base_url, dataset.resource())
    }

    fn cache_file(&self, dataset: Dataset) -> PathBuf {
	self.cache_path.join(format!("{}.json", dataset.resource()))
    }

    fn cached(&self, dataset: Dataset) -> Result<Option<Vec<RawPersonEvent>>> {
	let cache_file = self.cache_file(dataset);
	if cache_file.exists() && fs::metadata(&cache_file)?.modified()?.elapsed()? < self.max_age {
	    let contents = serde_json::from_reader::<_,Payload>(
		io::BufReader::new(File::open(&cache_file)?));
	    match contents {
		Ok(payload) => return Ok(Some(payload.data)),
		Err(err) => debug!("Ignoring unreadable cache {}: {}", cache_file.display(), err),
	    }
	}
	Ok(None)
    }

    fn download(&self, dataset: Dataset) -> Result<Payload> {

	info!("Downloading {}...", self.url(dataset));
	let res = reqwest::blocking::get(&self.url(dataset))?;

	match res.status().is_success() {
	    false => Err(Error::HttpError(res.status())),
	    true => Ok(res.json()?),
	}

    }

}

impl Source for HttpSource {

    fn fetch(&self, dataset: Dataset) -> Result<Vec<RawPersonEvent>> {

	if let Some(data) = self.cached(dataset)? {
	    debug!("Using cached {}", dataset);
	    return Ok(data);
	}

	let payload = self.download(dataset)?;
	fs::create_dir_all(&self.cache_path)?;
	serde_json::to_writer(io::BufWriter::new(File::create(self.cache_file(dataset))?), &payload)?;
	info!("Fetched {} {} records", payload.data.len(), dataset);
	Ok(payload.data)

    }

}
