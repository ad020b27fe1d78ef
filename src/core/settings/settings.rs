// Runtime settings for the Markov pipeline.
//
// Everything comes from a key lookup so the same parsing works for the real
// environment (`from_env`) and for tests (`from_lookup` with a map).

use crate::core::markov::DEFAULT_MAX_WORDS;
use thiserror::Error;

pub const LISTEN_CHANNELS_KEY: &str = "MARKOV_LISTEN_CHANNELS";
pub const REPLY_CHANNELS_KEY: &str = "MARKOV_REPLY_CHANNELS";
pub const DATABASE_PATH_KEY: &str = "MARKOV_DATABASE_PATH";
pub const MAX_WORDS_KEY: &str = "MARKOV_MAX_WORDS";

const DEFAULT_DATABASE_PATH: &str = "data/markov.db";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{key} contains an invalid channel ID: {value:?}")]
    InvalidChannelId { key: &'static str, value: String },

    #[error("{key} must be a positive number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkovSettings {
    /// Channels to backfill and learn from, in configured order.
    pub listen_channels: Vec<u64>,
    /// Channels where a mention gets a generated reply.
    pub reply_channels: Vec<u64>,
    pub database_path: String,
    pub max_words: usize,
}

impl MarkovSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let listen_channels = parse_channel_list(
            LISTEN_CHANNELS_KEY,
            get(LISTEN_CHANNELS_KEY).as_deref().unwrap_or(""),
        )?;
        let reply_channels = parse_channel_list(
            REPLY_CHANNELS_KEY,
            get(REPLY_CHANNELS_KEY).as_deref().unwrap_or(""),
        )?;

        let database_path = get(DATABASE_PATH_KEY)
            .filter(|path| !path.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

        let max_words = match get(MAX_WORDS_KEY) {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| SettingsError::InvalidNumber {
                    key: MAX_WORDS_KEY,
                    value: raw.clone(),
                })?,
            None => DEFAULT_MAX_WORDS,
        };

        Ok(Self {
            listen_channels,
            reply_channels,
            database_path,
            max_words,
        })
    }

    pub fn listens_to(&self, channel_id: u64) -> bool {
        self.listen_channels.contains(&channel_id)
    }

    pub fn replies_in(&self, channel_id: u64) -> bool {
        self.reply_channels.contains(&channel_id)
    }
}

/// Parse a comma or whitespace separated list of channel IDs, keeping order
/// and dropping repeats.
fn parse_channel_list(key: &'static str, raw: &str) -> Result<Vec<u64>, SettingsError> {
    let mut channels = Vec::new();
    for part in raw.split(|c: char| c == ',' || c.is_whitespace()) {
        if part.is_empty() {
            continue;
        }
        let id = part
            .parse::<u64>()
            .ok()
            .filter(|id| *id != 0)
            .ok_or_else(|| SettingsError::InvalidChannelId {
                key,
                value: part.to_string(),
            })?;
        if !channels.contains(&id) {
            channels.push(id);
        }
    }
    Ok(channels)
}
