//! Save persistence for stage progress, upgrade levels and the wallet.
//!
//! The game core only sees the `Persistence` trait. `JsonFileStore` keeps
//! everything in one pretty-printed JSON file under ~/.slime_breach/;
//! `MemoryStore` backs tests and the simulator.

use crate::stats::CurrencyWallet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SAVE_FILE_NAME: &str = "save.json";

/// Storage collaborator called at session boundaries and after stage unlocks.
pub trait Persistence {
    /// Returns `(current, unlocked)`.
    fn load_stage(&self) -> (u32, u32);
    fn save_stage(&mut self, current: u32, unlocked: u32) -> io::Result<()>;
    /// Level for an upgrade id; 0 when never saved.
    fn load_upgrade_level(&self, name: &str) -> i32;
    fn save_upgrade_level(&mut self, name: &str, level: i32) -> io::Result<()>;
    fn load_wallet(&self) -> CurrencyWallet;
    fn save_wallet(&mut self, wallet: &CurrencyWallet) -> io::Result<()>;
}

/// Everything that survives between sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SaveData {
    pub current_stage: u32,
    pub unlocked_stage: u32,
    pub upgrade_levels: BTreeMap<String, i32>,
    pub wallet: CurrencyWallet,
    /// Unix timestamp of the last write.
    pub last_saved: i64,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            current_stage: 1,
            unlocked_stage: 1,
            upgrade_levels: BTreeMap::new(),
            wallet: CurrencyWallet::new(),
            last_saved: 0,
        }
    }
}

impl SaveData {
    fn stage(&self) -> (u32, u32) {
        let unlocked = self.unlocked_stage.max(1);
        (self.current_stage.clamp(1, unlocked), unlocked)
    }
}

/// In-memory store. `fail_saves` makes every save return an error.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub data: SaveData,
    pub save_count: usize,
    pub fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: SaveData) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    fn record_save(&mut self) -> io::Result<()> {
        if self.fail_saves {
            return Err(io::Error::new(io::ErrorKind::Other, "saves disabled"));
        }
        self.save_count += 1;
        self.data.last_saved = chrono::Utc::now().timestamp();
        Ok(())
    }
}

impl Persistence for MemoryStore {
    fn load_stage(&self) -> (u32, u32) {
        self.data.stage()
    }

    fn save_stage(&mut self, current: u32, unlocked: u32) -> io::Result<()> {
        self.record_save()?;
        self.data.current_stage = current;
        self.data.unlocked_stage = unlocked;
        Ok(())
    }

    fn load_upgrade_level(&self, name: &str) -> i32 {
        self.data.upgrade_levels.get(name).copied().unwrap_or(0)
    }

    fn save_upgrade_level(&mut self, name: &str, level: i32) -> io::Result<()> {
        self.record_save()?;
        self.data.upgrade_levels.insert(name.to_string(), level);
        Ok(())
    }

    fn load_wallet(&self) -> CurrencyWallet {
        self.data.wallet
    }

    fn save_wallet(&mut self, wallet: &CurrencyWallet) -> io::Result<()> {
        self.record_save()?;
        self.data.wallet = *wallet;
        Ok(())
    }
}

/// Get the ~/.slime_breach/ directory path, creating it if needed.
pub fn save_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(".slime_breach");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Load a JSON file, returning `T::default()` if missing or invalid.
pub fn load_json_or_default<T: Default + serde::de::DeserializeOwned>(path: &Path) -> T {
    match fs::read_to_string(path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_default(),
        Err(_) => T::default(),
    }
}

/// Save a value as pretty-printed JSON.
pub fn save_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)?;
    Ok(())
}

/// Single-file JSON store. Every save rewrites the file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    data: SaveData,
}

impl JsonFileStore {
    /// Opens ~/.slime_breach/save.json.
    pub fn open_default() -> io::Result<Self> {
        Ok(Self::open(save_dir()?.join(SAVE_FILE_NAME)))
    }

    /// Opens a save file at `path`; missing or corrupt files start fresh.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = load_json_or_default(&path);
        Self { path, data }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &SaveData {
        &self.data
    }

    fn flush(&mut self) -> io::Result<()> {
        self.data.last_saved = chrono::Utc::now().timestamp();
        save_json(&self.path, &self.data)
    }
}

impl Persistence for JsonFileStore {
    fn load_stage(&self) -> (u32, u32) {
        self.data.stage()
    }

    fn save_stage(&mut self, current: u32, unlocked: u32) -> io::Result<()> {
        self.data.current_stage = current;
        self.data.unlocked_stage = unlocked;
        self.flush()
    }

    fn load_upgrade_level(&self, name: &str) -> i32 {
        self.data.upgrade_levels.get(name).copied().unwrap_or(0)
    }

    fn save_upgrade_level(&mut self, name: &str, level: i32) -> io::Result<()> {
        self.data.upgrade_levels.insert(name.to_string(), level);
        self.flush()
    }

    fn load_wallet(&self) -> CurrencyWallet {
        self.data.wallet
    }

    fn save_wallet(&mut self, wallet: &CurrencyWallet) -> io::Result<()> {
        self.data.wallet = *wallet;
        self.flush()
    }
}
