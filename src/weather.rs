//! Weather lookup and garden advice.
//!
//! Live data comes from OpenWeatherMap when an API key is configured. Without
//! a key, or when the lookup fails, [`CannedWeather`] makes up a plausible
//! report so the advice still has something to work with.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::error::{GardenError, Result};

pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: String,
    pub description: String,
    pub temp_c: f64,
    pub humidity_pct: f64,
    pub wind_mps: f64,
    /// True when the numbers were generated rather than fetched.
    pub canned: bool,
}

impl WeatherReport {
    /// Spoken/printed weather sentence for `name`.
    pub fn sentence(&self, name: &str) -> String {
        format!(
            "Hello {name}, the weather in {} today is {}, temperature {}°C, humidity {}%, wind speed {} meters per second.",
            self.city, self.description, self.temp_c, self.humidity_pct, self.wind_mps
        )
    }
}

/// Gardening advice for a weather description. Rules are checked in order.
pub fn garden_advice(description: &str, name: &str) -> String {
    let desc = description.to_lowercase();
    if desc.contains("rain") {
        "Looks like rain today! No need to water your plants, enjoy the shower!".into()
    } else if desc.contains("cloud") {
        "Cloudy day! Maybe water your garden a little if the soil feels dry.".into()
    } else if desc.contains("sun") || desc.contains("clear") {
        "It's sunny! Time to water your spinach and dance with the sun!".into()
    } else if desc.contains("storm") || desc.contains("thunder") {
        "Stormy day! Stay safe and let nature water your plants.".into()
    } else {
        format!("Check your garden, {name}! The weather is a bit tricky today, use your gardening instincts!")
    }
}

/// Append the default country code when `city` has none ("Durban" -> "Durban,ZA").
pub fn normalize_city(city: &str, default_country: &str) -> String {
    let city = city.trim();
    if city.contains(',') || default_country.is_empty() {
        city.to_string()
    } else {
        format!("{city},{default_country}")
    }
}

pub trait WeatherSource {
    fn fetch(&mut self, city: &str) -> Result<WeatherReport>;
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    weather: Vec<OwmCondition>,
    main: OwmMain,
    wind: OwmWind,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

/// Build a report from an OpenWeatherMap `weather` response body.
pub fn report_from_json(city: &str, body: &str) -> Result<WeatherReport> {
    let resp: OwmResponse = serde_json::from_str(body)?;
    let description = resp
        .weather
        .into_iter()
        .next()
        .map(|c| c.description)
        .ok_or_else(|| GardenError::Weather("response has no weather conditions".into()))?;
    Ok(WeatherReport {
        city: city.trim().to_string(),
        description,
        temp_c: resp.main.temp,
        humidity_pct: resp.main.humidity,
        wind_mps: resp.wind.speed,
        canned: false,
    })
}

/// OpenWeatherMap current-weather lookup (metric units).
pub struct OpenWeatherSource {
    client: reqwest::blocking::Client,
    api_key: String,
    default_country: String,
    base_url: String,
}

impl OpenWeatherSource {
    pub fn new(api_key: &str, default_country: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(OpenWeatherSource {
            client,
            api_key: api_key.to_string(),
            default_country: default_country.to_string(),
            base_url: OPENWEATHER_URL.to_string(),
        })
    }
}

impl WeatherSource for OpenWeatherSource {
    fn fetch(&mut self, city: &str) -> Result<WeatherReport> {
        let query = normalize_city(city, &self.default_country);
        log::debug!("fetching weather for {query}");
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("q", query.as_str()), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()?;
        if !resp.status().is_success() {
            return Err(status_error(city, resp.status()));
        }
        let body = resp.text()?;
        report_from_json(city, &body)
    }
}

/// Error for a non-success lookup status. OpenWeatherMap answers 404 for unknown towns.
pub fn status_error(city: &str, status: reqwest::StatusCode) -> GardenError {
    if status == reqwest::StatusCode::NOT_FOUND {
        GardenError::CityNotFound(city.trim().to_string())
    } else {
        GardenError::Http(format!("weather service returned {status}"))
    }
}

const CANNED_CONDITIONS: [(&str, (f64, f64)); 6] = [
    ("clear sky", (18.0, 32.0)),
    ("few clouds", (15.0, 28.0)),
    ("overcast clouds", (12.0, 24.0)),
    ("light rain", (10.0, 22.0)),
    ("thunderstorm", (16.0, 27.0)),
    ("mist", (8.0, 18.0)),
];

/// Offline stand-in that invents plausible weather.
pub struct CannedWeather {
    rng: StdRng,
}

impl CannedWeather {
    pub fn new() -> Self {
        CannedWeather {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        CannedWeather {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for CannedWeather {
    fn default() -> Self {
        Self::new()
    }
}

impl WeatherSource for CannedWeather {
    fn fetch(&mut self, city: &str) -> Result<WeatherReport> {
        let (description, (lo, hi)) = *CANNED_CONDITIONS
            .choose(&mut self.rng)
            .unwrap_or(&CANNED_CONDITIONS[0]);
        let round1 = |v: f64| (v * 10.0).round() / 10.0;
        Ok(WeatherReport {
            city: city.trim().to_string(),
            description: description.to_string(),
            temp_c: round1(self.rng.random_range(lo..hi)),
            humidity_pct: self.rng.random_range(30..95) as f64,
            wind_mps: round1(self.rng.random_range(0.5..9.0)),
            canned: true,
        })
    }
}

/// Tries `primary`, falling back to `fallback` when the lookup itself fails.
/// An unknown town is reported as is.
pub struct FallbackWeather {
    primary: Box<dyn WeatherSource>,
    fallback: Box<dyn WeatherSource>,
}

impl FallbackWeather {
    pub fn new(primary: Box<dyn WeatherSource>, fallback: Box<dyn WeatherSource>) -> Self {
        FallbackWeather { primary, fallback }
    }
}

impl WeatherSource for FallbackWeather {
    fn fetch(&mut self, city: &str) -> Result<WeatherReport> {
        match self.primary.fetch(city) {
            Ok(report) => Ok(report),
            Err(e @ GardenError::CityNotFound(_)) => Err(e),
            Err(e) => {
                log::warn!("live weather lookup failed, using canned data: {e}");
                self.fallback.fetch(city)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offline;

    impl WeatherSource for Offline {
        fn fetch(&mut self, _city: &str) -> Result<WeatherReport> {
            Err(GardenError::Http("operation timed out".into()))
        }
    }

    struct UnknownTown;

    impl WeatherSource for UnknownTown {
        fn fetch(&mut self, city: &str) -> Result<WeatherReport> {
            Err(GardenError::CityNotFound(city.to_string()))
        }
    }

    #[test]
    fn advice_rules_in_order() {
        assert!(garden_advice("light rain", "x").starts_with("Looks like rain"));
        assert!(garden_advice("thunderstorm with rain", "x").starts_with("Looks like rain"));
        assert!(garden_advice("Broken Clouds", "x").starts_with("Cloudy day"));
        assert!(garden_advice("clear sky", "x").starts_with("It's sunny"));
        assert!(garden_advice("thunderstorm", "x").starts_with("Stormy day"));
        assert_eq!(
            garden_advice("haze", "Farmer"),
            "Check your garden, Farmer! The weather is a bit tricky today, use your gardening instincts!"
        );
    }

    #[test]
    fn country_code_is_appended_once() {
        assert_eq!(normalize_city(" Durban ", "ZA"), "Durban,ZA");
        assert_eq!(normalize_city("London,GB", "ZA"), "London,GB");
        assert_eq!(normalize_city("Paris", ""), "Paris");
    }

    #[test]
    fn parses_openweather_body() {
        let body = r#"{"weather":[{"id":500,"main":"Rain","description":"light rain"}],
            "main":{"temp":21.5,"humidity":80},"wind":{"speed":3.6},"name":"Durban"}"#;
        let report = report_from_json("Durban", body).unwrap();
        assert_eq!(report.description, "light rain");
        assert_eq!(report.humidity_pct, 80.0);
        assert!(!report.canned);
        assert_eq!(
            report.sentence("Farmer"),
            "Hello Farmer, the weather in Durban today is light rain, temperature 21.5°C, humidity 80%, wind speed 3.6 meters per second."
        );
    }

    #[test]
    fn body_without_conditions_is_an_error() {
        let body = r#"{"weather":[],"main":{"temp":1,"humidity":2},"wind":{"speed":3}}"#;
        assert!(report_from_json("x", body).is_err());
        assert!(report_from_json("x", "not json").is_err());
    }

    #[test]
    fn canned_reports_stay_in_range() {
        let mut source = CannedWeather::with_seed(42);
        for _ in 0..20 {
            let r = source.fetch("Pretoria").unwrap();
            assert!(r.canned);
            assert!((30.0..95.0).contains(&r.humidity_pct));
            assert!(r.temp_c >= 8.0 && r.temp_c <= 32.0);
            assert!(CANNED_CONDITIONS.iter().any(|(d, _)| *d == r.description));
        }
    }

    #[test]
    fn fallback_is_used_when_primary_fails() {
        let mut source = FallbackWeather::new(Box::new(Offline), Box::new(CannedWeather::with_seed(1)));
        let report = source.fetch("Durban").unwrap();
        assert!(report.canned);
        assert_eq!(report.city, "Durban");
    }

    #[test]
    fn unknown_town_is_not_replaced_by_canned_weather() {
        let mut source = FallbackWeather::new(Box::new(UnknownTown), Box::new(CannedWeather::with_seed(1)));
        match source.fetch("Durbn") {
            Err(GardenError::CityNotFound(city)) => assert_eq!(city, "Durbn"),
            other => panic!("expected CityNotFound, got {other:?}"),
        }
    }

    #[test]
    fn lookup_status_mapping() {
        assert!(matches!(
            status_error(" Durbn ", reqwest::StatusCode::NOT_FOUND),
            GardenError::CityNotFound(c) if c == "Durbn"
        ));
        assert!(matches!(
            status_error("Durban", reqwest::StatusCode::UNAUTHORIZED),
            GardenError::Http(_)
        ));
    }
}
