//! Locating and reading the `config.toml` that tunes layout and storage.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use waymark::config::AppConfig;

/// Failure to read an existing configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration `{path}`: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to read configuration `{path}`: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// Loads the first configuration found, in this order: `explicit_path`,
/// `waymark/config.toml` under the working directory, `config.toml` in the
/// platform config directory. Falls back to [`AppConfig::default`].
///
/// # Errors
///
/// Fails if `explicit_path` does not exist, or if the chosen file cannot be
/// read or parsed.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, ConfigError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("waymark/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("org", "waymark", "waymark") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("No platform config directory on this system");
    }

    debug!("Using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;

    #[test]
    fn test_explicit_path_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[layout]\ngeneral_spacing = 12.0\n\n[storage]\nflowchart_dir = \"charts\"\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.layout().general_spacing(), 12.0);
        assert_eq!(config.storage().flowchart_dir(), Path::new("charts"));
        assert_eq!(config.storage().data_dir(), Path::new("data"));
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = tempdir().unwrap();
        let err = load_config(Some(dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[layout\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
