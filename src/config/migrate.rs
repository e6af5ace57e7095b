//! Config file upgrades: add keys introduced by newer releases without
//! touching the values the office already set.

use super::{CONFIG_KEYS, Config};
use crate::errors::{AppError, AppResult};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Add every missing key to the YAML file at `path`, using default values.
/// Returns the keys that were added; an empty list means nothing changed.
pub fn fill_missing_keys(path: &Path) -> AppResult<Vec<&'static str>> {
    let content = fs::read_to_string(path)?;
    let missing = Config::missing_keys(&content)?;
    if missing.is_empty() {
        return Ok(missing);
    }

    let mut yaml: Value = serde_yaml::from_str(&content)?;
    let defaults = serde_yaml::to_value(Config::default())?;

    let (Some(map), Some(default_map)) = (yaml.as_mapping_mut(), defaults.as_mapping()) else {
        return Err(AppError::Config(format!(
            "{}: configuration root is not a mapping",
            path.display()
        )));
    };

    for key in CONFIG_KEYS {
        let k = Value::String(key.to_string());
        if !map.contains_key(&k)
            && let Some(v) = default_map.get(&k)
        {
            map.insert(k, v.clone());
        }
    }

    fs::write(path, serde_yaml::to_string(&yaml)?)?;
    tracing::info!(path = %path.display(), added = ?missing, "config keys added");

    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn adds_defaults_and_keeps_existing_values() {
        let path = env::temp_dir().join("rtripclock_cfg_migrate_test.conf");
        fs::write(&path, "database: /srv/bus.sqlite\ntimezone: America/Chicago\n").unwrap();

        let added = fill_missing_keys(&path).unwrap();
        assert!(added.contains(&"week_start"));
        assert!(!added.contains(&"timezone"));

        let cfg: Config = serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cfg.database, "/srv/bus.sqlite");
        assert_eq!(cfg.timezone, "America/Chicago");
        assert_eq!(cfg.day_reset_time, "00:00");

        // Second run is a no-op.
        assert!(fill_missing_keys(&path).unwrap().is_empty());
        fs::remove_file(&path).ok();
    }
}
