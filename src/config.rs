//! Runtime configuration.
//!
//! The data directory comes from `--data-dir`, then `GARDEN_HOME`, then
//! `$HOME/.garden`. Inside it an optional `config.json` tunes speech,
//! weather and search; a few environment variables override the file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chatbot::{Chatbot, CustomSearch};
use crate::speech::{CommandSpeaker, ConsoleSpeaker, MutedSpeaker, Speaker, Voice};
use crate::weather::{CannedWeather, FallbackWeather, OpenWeatherSource, WeatherSource};

pub const CONFIG_FILE: &str = "config.json";
pub const STORE_FILE: &str = "storage.json";

pub const ENV_HOME: &str = "GARDEN_HOME";
pub const ENV_WEATHER_KEY: &str = "GARDEN_WEATHER_API_KEY";
pub const ENV_SPEECH: &str = "GARDEN_SPEECH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TTS program to run. `console` prints utterances instead; unset or `off` stays silent.
    pub speech_program: Option<String>,
    pub voice: Voice,
    pub weather_api_key: Option<String>,
    /// Appended to city names without a country code.
    pub default_country: String,
    pub assistant_name: String,
    pub search_api_key: Option<String>,
    pub search_engine_id: Option<String>,
    #[serde(skip)]
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            speech_program: None,
            voice: Voice::Male,
            weather_api_key: None,
            default_country: "ZA".to_string(),
            assistant_name: "Sherwon".to_string(),
            search_api_key: None,
            search_engine_id: None,
            data_dir: PathBuf::from(".garden"),
        }
    }
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn resolve(data_dir: Option<PathBuf>) -> Self {
        Self::resolve_with(data_dir, |key| std::env::var(key).ok())
    }

    /// Resolve configuration using `env` to look up environment variables.
    pub fn resolve_with(data_dir: Option<PathBuf>, env: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = data_dir
            .or_else(|| env(ENV_HOME).map(PathBuf::from))
            .unwrap_or_else(|| {
                let home = env("HOME").unwrap_or_else(|| ".".to_string());
                PathBuf::from(home).join(".garden")
            });

        let mut config = Self::load_file(&data_dir.join(CONFIG_FILE));
        config.data_dir = data_dir;

        if let Some(key) = env(ENV_WEATHER_KEY).filter(|k| !k.trim().is_empty()) {
            config.weather_api_key = Some(key);
        }
        if let Some(program) = env(ENV_SPEECH).filter(|p| !p.trim().is_empty()) {
            config.speech_program = Some(program);
        }
        config
    }

    fn load_file(path: &Path) -> Self {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Config::default(),
            Err(e) => {
                log::warn!("Error reading {}, using defaults: {e}", path.display());
                return Config::default();
            }
        };
        match serde_json::from_str(&data) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Error parsing {}, using defaults: {e}", path.display());
                Config::default()
            }
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }

    pub fn speaker(&self) -> Box<dyn Speaker> {
        match self.speech_program.as_deref().map(str::trim) {
            None | Some("off" | "none" | "") => Box::new(MutedSpeaker),
            Some("console") => Box::new(ConsoleSpeaker),
            Some(program) => Box::new(CommandSpeaker::new(program).with_default_voice(self.voice)),
        }
    }

    /// Speaker for full-screen mode, where printing would corrupt the display.
    pub fn tui_speaker(&self) -> Box<dyn Speaker> {
        match self.speech_program.as_deref().map(str::trim) {
            Some("console") => Box::new(MutedSpeaker),
            _ => self.speaker(),
        }
    }

    /// Live weather with a canned fallback, or canned weather only without an API key.
    pub fn weather_source(&self) -> Box<dyn WeatherSource> {
        let Some(key) = self.weather_api_key.as_deref() else {
            return Box::new(CannedWeather::new());
        };
        match OpenWeatherSource::new(key, &self.default_country) {
            Ok(live) => Box::new(FallbackWeather::new(Box::new(live), Box::new(CannedWeather::new()))),
            Err(e) => {
                log::warn!("Could not set up weather client: {e}");
                Box::new(CannedWeather::new())
            }
        }
    }

    pub fn chatbot(&self) -> Chatbot {
        let (Some(key), Some(cx)) = (self.search_api_key.as_deref(), self.search_engine_id.as_deref()) else {
            return Chatbot::new();
        };
        match CustomSearch::new(key, cx) {
            Ok(search) => Chatbot::with_searcher(Box::new(search)),
            Err(e) => {
                log::warn!("Could not set up search client: {e}");
                Chatbot::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn data_dir_precedence() {
        let env = env_of(&[("GARDEN_HOME", "/srv/garden"), ("HOME", "/home/sam")]);
        let flag = Config::resolve_with(Some(PathBuf::from("/tmp/g")), &env);
        assert_eq!(flag.data_dir, PathBuf::from("/tmp/g"));
        assert_eq!(flag.store_path(), PathBuf::from("/tmp/g/storage.json"));

        let from_env = Config::resolve_with(None, &env);
        assert_eq!(from_env.data_dir, PathBuf::from("/srv/garden"));

        let from_home = Config::resolve_with(None, env_of(&[("HOME", "/home/sam")]));
        assert_eq!(from_home.data_dir, PathBuf::from("/home/sam/.garden"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::resolve_with(Some(dir.path().to_path_buf()), env_of(&[]));
        assert_eq!(config.default_country, "ZA");
        assert_eq!(config.assistant_name, "Sherwon");
        assert!(config.weather_api_key.is_none());
    }

    #[test]
    fn file_values_and_env_overrides() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"speech_program":"espeak","voice":"female","weather_api_key":"from-file","default_country":"GB"}"#,
        )
        .unwrap();

        let config = Config::resolve_with(Some(dir.path().to_path_buf()), env_of(&[]));
        assert_eq!(config.speech_program.as_deref(), Some("espeak"));
        assert_eq!(config.voice, Voice::Female);
        assert_eq!(config.default_country, "GB");
        assert_eq!(config.assistant_name, "Sherwon");

        let env = env_of(&[("GARDEN_WEATHER_API_KEY", "from-env"), ("GARDEN_SPEECH", "off")]);
        let config = Config::resolve_with(Some(dir.path().to_path_buf()), env);
        assert_eq!(config.weather_api_key.as_deref(), Some("from-env"));
        assert_eq!(config.speech_program.as_deref(), Some("off"));
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{ nope").unwrap();
        let config = Config::resolve_with(Some(dir.path().to_path_buf()), env_of(&[]));
        assert_eq!(config, Config { data_dir: dir.path().to_path_buf(), ..Config::default() });
    }
}
