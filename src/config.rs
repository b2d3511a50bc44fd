use std::path::PathBuf;

use crate::error::{FamError, FamResult};
use crate::logging;

pub const ENV_DB: &str = "FAMTREE_DB";
pub const ENV_LOG_LEVEL: &str = "FAMTREE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "FAMTREE_LOG_DIR";

/// Runtime settings for the command-line front end.
///
/// Resolved from explicit flags first, then `FAMTREE_*` environment
/// variables, then built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(".data").join("famtree.db"),
            log_level: logging::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source; blank values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(db) = get(ENV_DB) {
            config.db_path = PathBuf::from(db);
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        config.log_dir = get(ENV_LOG_DIR).map(PathBuf::from);
        config
    }

    /// Consumes the global `--file`, `--log-level` and `--log-dir` flags
    /// and returns the remaining arguments in order.
    pub fn apply_args<I>(&mut self, args: I) -> FamResult<Vec<String>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut rest = Vec::new();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--file" | "-f" => self.db_path = PathBuf::from(flag_value(&mut args, &arg)?),
                "--log-level" => self.log_level = flag_value(&mut args, &arg)?,
                "--log-dir" => self.log_dir = Some(PathBuf::from(flag_value(&mut args, &arg)?)),
                _ => rest.push(arg),
            }
        }
        Ok(rest)
    }
}

fn flag_value(args: &mut impl Iterator<Item = String>, flag: &str) -> FamResult<String> {
    args.next()
        .ok_or_else(|| FamError::Other(format!("{} requires a value", flag)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert!(config.db_path.ends_with("famtree.db"));
    }

    #[test]
    fn env_overrides_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_DB, "/tmp/tree.db"),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_DIR, "/var/log/famtree"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/tmp/tree.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/famtree")));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let config = Config::from_lookup(lookup_from(&[(ENV_DB, "  ")]));
        assert_eq!(config.db_path, Config::default().db_path);
    }

    #[test]
    fn flags_override_env_and_leave_the_rest() {
        let mut config = Config::from_lookup(lookup_from(&[(ENV_LOG_LEVEL, "warn")]));
        let args = ["tree", "--log-level", "trace", "abc", "-f", "x.db"]
            .iter()
            .map(|s| s.to_string());
        let rest = config.apply_args(args).unwrap();

        assert_eq!(rest, vec!["tree".to_string(), "abc".to_string()]);
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.db_path, PathBuf::from("x.db"));
    }

    #[test]
    fn flag_without_value_is_an_error() {
        let mut config = Config::default();
        assert!(config.apply_args(vec!["--file".to_string()]).is_err());
    }
}
