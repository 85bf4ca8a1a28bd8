use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use blackjack::Wallet;
use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed store: {0}")]
    Format(#[from] serde_json::Error),
}

/// Named numeric entries that outlive the session.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<u64>, StoreError>;

    /// Write every entry or none of them.
    fn set_many(&mut self, entries: &[(&str, u64)]) -> Result<(), StoreError>;

    fn set(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
        self.set_many(&[(key, value)])
    }
}

/// A single named entry in a [`Storage`].
pub struct Item {
    key: &'static str,
}

impl Item {
    pub const fn new(key: &'static str) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn may_load(&self, store: &dyn Storage) -> Result<Option<u64>, StoreError> {
        store.get(self.key)
    }

    pub fn save(&self, store: &mut dyn Storage, value: u64) -> Result<(), StoreError> {
        store.set(self.key, value)
    }
}

pub const BALANCE: Item = Item::new("blackjack_balance_v1");
pub const DEBT: Item = Item::new("blackjack_debt_v1");

/// Read the wallet, falling back to `starting_balance` and no debt for
/// entries that were never written.
pub fn load_wallet(store: &dyn Storage, starting_balance: u64) -> Result<Wallet, StoreError> {
    let balance = BALANCE.may_load(store)?.unwrap_or(starting_balance);
    let debt = DEBT.may_load(store)?.unwrap_or_default();
    Ok(Wallet::new(balance, debt))
}

pub fn save_wallet(store: &mut dyn Storage, wallet: &Wallet) -> Result<(), StoreError> {
    store.set_many(&[(BALANCE.key(), wallet.balance), (DEBT.key(), wallet.debt)])?;
    debug!("saved wallet balance={} debt={}", wallet.balance, wallet.debt);
    Ok(())
}

/// In-process store for tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, u64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        Ok(self.entries.get(key).copied())
    }

    fn set_many(&mut self, entries: &[(&str, u64)]) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.entries.insert(key.to_string(), *value);
        }
        Ok(())
    }
}

/// JSON object on disk. Every write replaces the whole file through a
/// temporary file in the same directory, so a failed write leaves the
/// previous contents in place.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: BTreeMap<String, u64>,
}

impl JsonFileStorage {
    /// Open `path`, treating a missing file as an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("opened store {} with {} entries", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, entries: &BTreeMap<String, u64>) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, entries)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        Ok(self.entries.get(key).copied())
    }

    fn set_many(&mut self, entries: &[(&str, u64)]) -> Result<(), StoreError> {
        let mut next = self.entries.clone();
        for (key, value) in entries {
            next.insert(key.to_string(), *value);
        }
        self.write_file(&next)?;
        self.entries = next;
        Ok(())
    }
}
