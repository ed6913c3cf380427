// Runtime configuration. There is no config file; the only knob is the
// directory where list files live, taken from the environment.

use std::path::PathBuf;

/// Environment variable naming the directory for `<name>.txt` files.
pub const DIR_VAR: &str = "LIST_MAKER_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Read `LIST_MAKER_DIR`, falling back to the current directory when it
    /// is unset or blank.
    pub fn from_env() -> Self {
        Self::from_dir_var(std::env::var(DIR_VAR).ok())
    }

    fn from_dir_var(value: Option<String>) -> Self {
        match value {
            Some(dir) if !dir.trim().is_empty() => Config {
                data_dir: PathBuf::from(dir),
            },
            _ => Config::default(),
        }
    }
}
