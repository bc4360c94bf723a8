use std::collections::BTreeMap;
use std::fs::{self,File};
use std::io;
use std::path::{Path,PathBuf};
use std::sync::{Arc,Mutex};

use log::warn;

use super::error::Result;


/// Plain string key/value store for user preferences.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}


/// Preferences kept as a flat JSON object on disk.
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String,String>,
}

impl FileStorage {

    /// Opens the store at `path`. A missing or unreadable file starts
    /// an empty store.
    pub fn open(path: &Path) -> Self {
	let items = match File::open(path) {
	    Err(_) => BTreeMap::new(),
	    Ok(file) => serde_json::from_reader(io::BufReader::new(file)).unwrap_or_else(|err| {
		warn!("Ignoring unreadable settings {}: {}", path.display(), err);
		BTreeMap::new()
	    }),
	};
	Self { path: path.to_path_buf(), items }
    }

}

impl Storage for FileStorage {

    fn get(&self, key: &str) -> Option<String> {
	self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
	self.items.insert(key.to_string(), value.to_string());
	if let Some(dir) = self.path.parent() {
	    fs::create_dir_all(dir)?;
	}
	serde_json::to_writer_pretty(io::BufWriter::new(File::create(&self.path)?), &self.items)?;
	Ok(())
    }

}


/// In-memory store. Clones share the same items.
#[derive(Clone,Default,Debug)]
pub struct MemoryStorage {
    items: Arc<Mutex<BTreeMap<String,String>>>,
}

impl MemoryStorage {

    pub fn new() -> Self {
	Self::default()
    }

    pub fn items(&self) -> BTreeMap<String,String> {
	self.items.lock().map(|items| items.clone()).unwrap_or_default()
    }

}

impl Storage for MemoryStorage {

    fn get(&self, key: &str) -> Option<String> {
	self.items.lock().ok()?.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
	if let Ok(mut items) = self.items.lock() {
	    items.insert(key.to_string(), value.to_string());
	}
	Ok(())
    }

}
