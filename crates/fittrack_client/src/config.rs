use crate::FitTrackError;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub token_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, FitTrackError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. This avoids mutating global environment in tests and keeps
    /// `from_env()` small and safe.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, FitTrackError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let base_url = get("FITTRACK_API_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(FitTrackError::Config(format!(
                "FITTRACK_API_URL must be an http(s) URL, got {base_url}"
            )));
        }
        let token_file = match get("FITTRACK_TOKEN_FILE").filter(|s| !s.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => {
                let home = get("HOME").ok_or_else(|| {
                    FitTrackError::Config("FITTRACK_TOKEN_FILE or HOME must be set".into())
                })?;
                PathBuf::from(home).join(".fittrack").join("session.json")
            }
        };
        Ok(Self {
            base_url,
            token_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_defaults_base_url() {
        let get = |k: &str| match k {
            "HOME" => Some("/home/alice".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.base_url, "http://localhost:5001");
        assert_eq!(
            cfg.token_file,
            PathBuf::from("/home/alice/.fittrack/session.json")
        );
    }

    #[test]
    fn from_env_reads_values() {
        let get = |k: &str| match k {
            "FITTRACK_API_URL" => Some("https://api.example.com".into()),
            "FITTRACK_TOKEN_FILE" => Some("/tmp/tok.json".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.base_url, "https://api.example.com");
        assert_eq!(cfg.token_file, PathBuf::from("/tmp/tok.json"));
    }

    #[test]
    fn from_env_rejects_non_http_url() {
        let get = |k: &str| match k {
            "FITTRACK_API_URL" => Some("localhost:5001".into()),
            "HOME" => Some("/root".into()),
            _ => None,
        };
        assert!(Config::from_env_with(get).is_err());
    }

    #[test]
    fn from_env_without_home_or_token_file_errors() {
        let res = Config::from_env_with(|_| None);
        assert!(res.is_err());
    }
}
