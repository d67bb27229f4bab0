//! INI configuration adapter backed by `configparser`.

use crate::domain::error::CompareError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::{Path, PathBuf};

const INLINE_SOURCE: &str = "<inline>";

/// Sections and keys are case-insensitive; values are kept as written.
pub struct FileConfigAdapter {
    ini: Ini,
    source: Option<PathBuf>,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CompareError> {
        let path = path.as_ref();
        let mut ini = Ini::new();
        ini.load(path).map_err(|reason| CompareError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self {
            ini,
            source: Some(path.to_path_buf()),
        })
    }

    pub fn from_string(content: &str) -> Result<Self, CompareError> {
        let mut ini = Ini::new();
        ini.read(content.to_string())
            .map_err(|reason| CompareError::ConfigParse {
                file: INLINE_SOURCE.to_string(),
                reason,
            })?;
        Ok(Self { ini, source: None })
    }

    /// No settings at all; every lookup falls back to defaults.
    pub fn empty() -> Self {
        Self {
            ini: Ini::new(),
            source: None,
        }
    }

    /// File the settings were loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.ini.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match self.ini.getint(section, key) {
            Ok(Some(value)) => value,
            _ => default,
        }
    }
}
