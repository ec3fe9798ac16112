use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use std::{
    cell::RefCell,
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

/// Where the favorites list lives between runs.
pub trait FavoritesBackend: Debug {
    fn load(&self) -> Result<Vec<String>>;
    fn save(&self, cities: &[String]) -> Result<()>;
}

/// JSON array of city names in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backend at the platform data directory.
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skytemp", "skytemp")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(dirs.data_dir().join("favorites.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesBackend for JsonFileBackend {
    fn load(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read favorites file: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse favorites file: {}", self.path.display()))
    }

    fn save(&self, cities: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string(cities).context("Failed to serialize favorites")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write favorites file: {}", self.path.display()))
    }
}

/// Volatile backend, handy for tests and one-off sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    saved: RefCell<Vec<String>>,
}

impl MemoryBackend {
    pub fn with(cities: &[&str]) -> Self {
        Self {
            saved: RefCell::new(cities.iter().map(|c| c.to_string()).collect()),
        }
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.saved.borrow().clone()
    }
}

impl FavoritesBackend for MemoryBackend {
    fn load(&self) -> Result<Vec<String>> {
        Ok(self.snapshot())
    }

    fn save(&self, cities: &[String]) -> Result<()> {
        *self.saved.borrow_mut() = cities.to_vec();
        Ok(())
    }
}

/// Ordered, duplicate-free list of favorite cities.
///
/// Loaded once on open; every change is written straight back.
#[derive(Debug)]
pub struct Favorites<B: FavoritesBackend> {
    cities: Vec<String>,
    backend: B,
}

impl<B: FavoritesBackend> Favorites<B> {
    pub fn open(backend: B) -> Result<Self> {
        let cities = backend.load()?;
        Ok(Self { cities, backend })
    }

    pub fn list(&self) -> &[String] {
        &self.cities
    }

    pub fn contains(&self, city: &str) -> bool {
        self.cities.iter().any(|c| c == city)
    }

    /// Returns false when the city was already present or is blank.
    pub fn add(&mut self, city: &str) -> Result<bool> {
        let city = city.trim();
        if city.is_empty() || self.contains(city) {
            return Ok(false);
        }

        self.cities.push(city.to_string());
        self.backend.save(&self.cities)?;
        Ok(true)
    }

    /// Returns false when nothing matched.
    pub fn remove(&mut self, city: &str) -> Result<bool> {
        let city = city.trim();
        let before = self.cities.len();
        self.cities.retain(|c| c != city);

        if self.cities.len() == before {
            return Ok(false);
        }

        self.backend.save(&self.cities)?;
        Ok(true)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
