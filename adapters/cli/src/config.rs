//! Settings file handling and content pool loading.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use gene_link_core::{ContentPool, SelectionAfterMiss};
use gene_link_system_unlocks::DEFAULT_STORE_KEY;
use serde::Deserialize;

const SUPPORTED_SETTINGS_VERSION: u32 = 1;

/// Content pool compiled into the binary.
const BUILTIN_POOL: &str = include_str!("../data/diagnoses.json");

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    version: u32,
    pool: Option<PathBuf>,
    store: Option<PathBuf>,
    seed: Option<u64>,
    clear_selection_on_miss: Option<bool>,
    sound: Option<bool>,
}

/// Values taken from the command line, applied on top of the settings file.
#[derive(Clone, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) pool: Option<PathBuf>,
    pub(crate) store: Option<PathBuf>,
    pub(crate) seed: Option<u64>,
    pub(crate) clear_on_miss: bool,
    pub(crate) mute: bool,
}

/// Fully resolved session settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) pool: Option<PathBuf>,
    pub(crate) store: PathBuf,
    pub(crate) seed: Option<u64>,
    pub(crate) selection_after_miss: SelectionAfterMiss,
    pub(crate) sound: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pool: None,
            store: PathBuf::from(DEFAULT_STORE_KEY),
            seed: None,
            selection_after_miss: SelectionAfterMiss::Retain,
            sound: true,
        }
    }
}

impl Settings {
    /// Reads the optional settings file and applies command-line overrides.
    pub(crate) fn resolve(config: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let base = match config {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read settings at {}", path.display()))?;
                let directory = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                parse_settings(&contents, &directory)
                    .with_context(|| format!("invalid settings file {}", path.display()))?
            }
            None => Self::default(),
        };
        Ok(base.with_overrides(overrides))
    }

    fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(pool) = overrides.pool {
            self.pool = Some(pool);
        }
        if let Some(store) = overrides.store {
            self.store = store;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if overrides.clear_on_miss {
            self.selection_after_miss = SelectionAfterMiss::Clear;
        }
        if overrides.mute {
            self.sound = false;
        }
        self
    }

    /// Loads the configured content pool, falling back to the built-in one.
    pub(crate) fn load_pool(&self) -> Result<ContentPool> {
        let Some(path) = &self.pool else {
            return ContentPool::from_json(BUILTIN_POOL).context("built-in content pool is invalid");
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read content pool at {}", path.display()))?;
        let pool = ContentPool::from_json(&contents)
            .with_context(|| format!("content pool at {} is invalid", path.display()))?;
        log::debug!("loaded {} diagnoses from {}", pool.len(), path.display());
        Ok(pool)
    }
}

fn parse_settings(contents: &str, base_path: &Path) -> Result<Settings> {
    let file: SettingsFile =
        toml::from_str(contents).context("failed to parse settings toml contents")?;
    if file.version != SUPPORTED_SETTINGS_VERSION {
        bail!(
            "unsupported settings version {}; expected {}",
            file.version,
            SUPPORTED_SETTINGS_VERSION
        );
    }

    let defaults = Settings::default();
    Ok(Settings {
        pool: file.pool.map(|path| base_path.join(path)),
        store: file
            .store
            .map_or(defaults.store, |path| base_path.join(path)),
        seed: file.seed,
        selection_after_miss: match file.clear_selection_on_miss {
            Some(true) => SelectionAfterMiss::Clear,
            Some(false) | None => SelectionAfterMiss::Retain,
        },
        sound: file.sound.unwrap_or(defaults.sound),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_resolve_paths_relative_to_base_directory() {
        let settings = parse_settings(
            r#"
                version = 1
                pool = "content/pool.json"
                store = "saves/unlocked.json"
                seed = 42
                clear_selection_on_miss = true
                sound = false
            "#,
            Path::new("root"),
        )
        .expect("settings should parse");

        assert_eq!(
            settings,
            Settings {
                pool: Some(PathBuf::from("root/content/pool.json")),
                store: PathBuf::from("root/saves/unlocked.json"),
                seed: Some(42),
                selection_after_miss: SelectionAfterMiss::Clear,
                sound: false,
            }
        );
    }

    #[test]
    fn settings_reject_unsupported_version() {
        let result = parse_settings("version = 2", Path::new("."));

        assert!(result.is_err(), "future settings versions must be rejected");
    }

    #[test]
    fn settings_reject_unknown_keys() {
        let result = parse_settings("version = 1\ndifficulty = \"hard\"", Path::new("."));

        assert!(result.is_err(), "unknown keys must be rejected");
    }

    #[test]
    fn minimal_settings_keep_defaults() {
        let settings = parse_settings("version = 1", Path::new("anywhere"))
            .expect("version alone is a valid settings file");

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn command_line_overrides_win() {
        let settings = Settings {
            seed: Some(1),
            ..Settings::default()
        }
        .with_overrides(Overrides {
            store: Some(PathBuf::from("elsewhere.json")),
            seed: Some(9),
            clear_on_miss: true,
            mute: true,
            ..Overrides::default()
        });

        assert_eq!(settings.store, PathBuf::from("elsewhere.json"));
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.selection_after_miss, SelectionAfterMiss::Clear);
        assert!(!settings.sound);
        assert_eq!(settings.pool, None);
    }

    #[test]
    fn builtin_pool_is_valid() {
        let pool = Settings::default()
            .load_pool()
            .expect("built-in pool must load");

        assert!(pool.len() >= 8);
    }
}
