// Runtime configuration with defaults taken from the tuning constants.
//
// The web front-end reads overrides from the page query string
// (`?model=...&audio=...&volume=0.3`). Each key is validated on its own so a
// bad value only loses that one override.

use super::constants::{AUDIO_URL, AUDIO_VOLUME, FFT_SIZE, MODEL_URL, PARTICLE_COUNT, PARTICLE_SEED};

pub const FFT_SIZE_MIN: u32 = 32;
pub const FFT_SIZE_MAX: u32 = 32768;
pub const PARTICLE_COUNT_MAX: usize = 100_000;

/// Query-string keys understood by [`SceneConfig::apply_override`].
pub const QUERY_KEYS: &[&str] = &["model", "audio", "volume", "fft", "particles", "seed"];

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown config key `{0}`")]
    UnknownKey(String),
    #[error("`{key}` must not be empty")]
    Empty { key: &'static str },
    #[error("`{key}`: cannot parse `{value}`")]
    Parse { key: &'static str, value: String },
    #[error("`{key}` = {value} is out of range ({expected})")]
    OutOfRange {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub model_url: String,
    pub audio_url: String,
    pub volume: f64,
    pub fft_size: u32,
    pub particle_count: usize,
    pub particle_seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            model_url: MODEL_URL.to_string(),
            audio_url: AUDIO_URL.to_string(),
            volume: AUDIO_VOLUME,
            fft_size: FFT_SIZE,
            particle_count: PARTICLE_COUNT,
            particle_seed: PARTICLE_SEED,
        }
    }
}

impl SceneConfig {
    /// Apply a single `key=value` override, leaving `self` untouched on error.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "model" => self.model_url = non_empty("model", value)?,
            "audio" => self.audio_url = non_empty("audio", value)?,
            "volume" => {
                let v: f64 = parse("volume", value)?;
                if !(0.0..=1.0).contains(&v) {
                    return Err(out_of_range("volume", value, "0..=1"));
                }
                self.volume = v;
            }
            "fft" => {
                let v: u32 = parse("fft", value)?;
                if !v.is_power_of_two() || !(FFT_SIZE_MIN..=FFT_SIZE_MAX).contains(&v) {
                    return Err(out_of_range("fft", value, "power of two in 32..=32768"));
                }
                self.fft_size = v;
            }
            "particles" => {
                let v: usize = parse("particles", value)?;
                if v == 0 || v > PARTICLE_COUNT_MAX {
                    return Err(out_of_range("particles", value, "1..=100000"));
                }
                self.particle_count = v;
            }
            "seed" => self.particle_seed = parse("seed", value)?,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// Apply every pair, collecting the rejected ones.
    pub fn apply_overrides<'a, I>(&mut self, pairs: I) -> Vec<ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        pairs
            .into_iter()
            .filter_map(|(k, v)| self.apply_override(k, v).err())
            .collect()
    }

    #[inline]
    pub fn bin_count(&self) -> usize {
        (self.fft_size / 2) as usize
    }
}

fn non_empty(key: &'static str, value: &str) -> Result<String, ConfigError> {
    if value.is_empty() {
        Err(ConfigError::Empty { key })
    } else {
        Ok(value.to_string())
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Parse {
        key,
        value: value.to_string(),
    })
}

fn out_of_range(key: &'static str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::OutOfRange {
        key,
        value: value.to_string(),
        expected,
    }
}
