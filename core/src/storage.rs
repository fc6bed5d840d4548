// core/src/storage.rs
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::errors::WorkoutError;

/// Nøkkel for primærlista (innsettingsrekkefølge).
pub const KEY_WORKOUTS: &str = "workouts";
/// Nøkkel for den distansesorterte kopien.
pub const KEY_WORKOUTS_SORT: &str = "workoutsSort";

/// Key-value-flate med strengnøkler og strengverdier, som nettleserens
/// localStorage: `get` gir verdi eller fravær, `set` overskriver,
/// `clear` tømmer alt. Skrivefeil propageres uhåndtert til kalleren.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), WorkoutError>;
    fn clear(&mut self) -> Result<(), WorkoutError>;
}

/// Flyktig lager i minnet, til tester og headless kjøring.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Antall lagrede nøkler.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), WorkoutError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), WorkoutError> {
        self.entries.clear();
        Ok(())
    }
}

/// Filbasert lager: én JSON-blob per nøkkel under en rotkatalog.
#[derive(Debug)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.key_path(key);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => {
                    info!("📂 Leste «{}» fra {}", key, path.display());
                    Some(contents)
                }
                Err(e) => {
                    warn!("⚠️ Kunne ikke lese {}: {}", path.display(), e);
                    None
                }
            }
        } else {
            None
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), WorkoutError> {
        fs::create_dir_all(&self.root)?;
        let path = self.key_path(key);
        fs::write(&path, value)?;
        info!("✅ Lagret «{}» til {}", key, path.display());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), WorkoutError> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {
                info!("🗑️ Tømte lageret i {}", self.root.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
