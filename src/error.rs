use std::{io,time};

use thiserror::Error;

use super::mzcr::Dataset;


pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug,Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    IO(#[from] io::Error),
    #[error("JSON error: {0}")]
    JSON(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Request error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("HTTP error: {0}")]
    HttpError(reqwest::StatusCode),
    #[error("System Time error: {0}")]
    SystemTime(#[from] time::SystemTimeError),
    /// A raw date matched neither `D.M.YYYY` nor `YYYY-MM-DD`.
    #[error("Malformed date: {0:?}")]
    MalformedDate(String),
    /// Soft error: the district is missing from the master list.
    #[error("Unknown district: {0}")]
    UnknownDistrict(String),
    #[error("Fetching {dataset} failed: {source}")]
    Fetch {
	dataset: Dataset,
	source: Box<Error>,
    },
    #[error("Fetch worker for {0} panicked")]
    FetchAborted(Dataset),
    #[error("No data!")]
    MissingData,
}

impl Error {

    pub fn fetch(dataset: Dataset, err: Error) -> Self {
	match err {
	    err @ Self::Fetch { .. } => err,
	    err => Self::Fetch { dataset, source: Box::new(err) },
	}
    }

}
