// src/config.rs
//! Environment-sourced run configuration. Local runs load `.env` via
//! dotenvy in main; scheduled runs get the variables from the environment.

use anyhow::{bail, Result};

pub const DEFAULT_SUBREDDIT: &str = "CallOfDutyMobile";
pub const DEFAULT_POST_LIMIT: usize = 50;
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OUTPUT_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct Config {
    pub subreddit: String,
    pub post_limit: usize,
    /// `None` disables age filtering entirely.
    pub max_age_hours: Option<u64>,
    pub openai_api_key: String,
    pub openai_model: String,
    pub output_dir: String,
}

impl Config {
    /// Read configuration from the process environment. Fails only on the
    /// missing API credential; everything else falls back to defaults.
    pub fn from_env() -> Result<Self> {
        let subreddit = env_trimmed("SUBREDDIT").unwrap_or_else(|| DEFAULT_SUBREDDIT.to_string());

        let post_limit = env_trimmed("POST_LIMIT")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_POST_LIMIT);

        // Unset, empty, unparseable, or zero all mean "no filtering".
        let max_age_hours = env_trimmed("MAX_AGE_HOURS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|h| *h > 0);

        let openai_api_key = match env_trimmed("OPENAI_API_KEY") {
            Some(k) => k,
            None => bail!("OPENAI_API_KEY missing. Set it in the environment or scripts/.env."),
        };

        let openai_model = env_trimmed("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let output_dir = env_trimmed("OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());

        Ok(Self {
            subreddit,
            post_limit,
            max_age_hours,
            openai_api_key,
            openai_model,
            output_dir,
        })
    }
}

fn env_trimmed(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn clear_all() {
        for k in [
            "SUBREDDIT",
            "POST_LIMIT",
            "MAX_AGE_HOURS",
            "OPENAI_API_KEY",
            "OPENAI_MODEL",
            "OUTPUT_DIR",
        ] {
            env::remove_var(k);
        }
    }

    #[serial_test::serial]
    #[test]
    fn missing_api_key_is_fatal() {
        clear_all();
        assert!(Config::from_env().is_err());
    }

    #[serial_test::serial]
    #[test]
    fn defaults_apply_when_only_key_is_set() {
        clear_all();
        env::set_var("OPENAI_API_KEY", "sk-test");
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.subreddit, DEFAULT_SUBREDDIT);
        assert_eq!(cfg.post_limit, DEFAULT_POST_LIMIT);
        assert_eq!(cfg.max_age_hours, None);
        assert_eq!(cfg.openai_model, DEFAULT_MODEL);
        env::remove_var("OPENAI_API_KEY");
    }

    #[serial_test::serial]
    #[test]
    fn zero_and_garbage_max_age_mean_no_filtering() {
        clear_all();
        env::set_var("OPENAI_API_KEY", "sk-test");
        env::set_var("MAX_AGE_HOURS", "0");
        assert_eq!(Config::from_env().unwrap().max_age_hours, None);
        env::set_var("MAX_AGE_HOURS", "abc");
        assert_eq!(Config::from_env().unwrap().max_age_hours, None);
        env::set_var("MAX_AGE_HOURS", "24");
        assert_eq!(Config::from_env().unwrap().max_age_hours, Some(24));
        clear_all();
    }
}
