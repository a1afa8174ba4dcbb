use log::info;
use std::collections::HashMap;
use std::path::Path;

use crate::auth::Token;
use crate::error::{CommitLensError, Result};

pub const GITHUB_TOKEN_KEY: &str = "GITHUB_ACCESS_TOKEN";
pub const GEMINI_KEY_KEY: &str = "GEMINI_API_TOKEN";
const GITHUB_URL_KEY: &str = "GITHUB_API_URL";
const GEMINI_URL_KEY: &str = "GEMINI_API_URL";
const GEMINI_MODEL_KEY: &str = "GEMINI_MODEL";

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Credentials and endpoints, read once at startup and passed to the clients.
#[derive(Debug)]
pub struct Config {
    pub github_token: Token,
    pub gemini_api_key: Token,
    pub github_api_url: String,
    pub gemini_api_url: String,
    pub gemini_model: String,
}

impl Config {
    /// Read the env file at `path` without touching the process environment.
    pub fn load(path: &Path) -> Result<Self> {
        let entries = dotenvy::from_path_iter(path)
            .map_err(|e| {
                CommitLensError::Config(format!("Cannot read {}: {e}", path.display()))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                CommitLensError::Config(format!("Cannot parse {}: {e}", path.display()))
            })?;

        let config = Self::from_entries(entries)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_entries<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values: HashMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let github_token = required(&mut values, GITHUB_TOKEN_KEY)?;
        let gemini_api_key = required(&mut values, GEMINI_KEY_KEY)?;

        Ok(Self {
            github_token,
            gemini_api_key,
            github_api_url: optional(&mut values, GITHUB_URL_KEY, DEFAULT_GITHUB_API_URL),
            gemini_api_url: optional(&mut values, GEMINI_URL_KEY, DEFAULT_GEMINI_API_URL),
            gemini_model: optional(&mut values, GEMINI_MODEL_KEY, DEFAULT_GEMINI_MODEL),
        })
    }
}

fn required(values: &mut HashMap<String, String>, key: &str) -> Result<Token> {
    let token = values
        .remove(key)
        .map(Token::from)
        .ok_or_else(|| CommitLensError::Config(format!("{key} is missing")))?;

    if token.is_blank() {
        return Err(CommitLensError::Config(format!("{key} is empty")));
    }

    Ok(Token::from(token.as_str().trim()))
}

fn optional(values: &mut HashMap<String, String>, key: &str, default: &str) -> String {
    values
        .remove(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
