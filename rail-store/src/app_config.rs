use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub listing: ListingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Candidates requested per search, before client-side filtering.
    #[serde(default = "default_fetch_limit")]
    pub route_fetch_limit: usize,
}

fn default_timeout() -> u64 { 30 }
fn default_fetch_limit() -> usize { 5000 }

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    /// Offset of the local time zone used for times, dates and hour filters.
    pub utc_offset_minutes: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { utc_offset_minutes: 180 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ListingConfig {
    pub page_size: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { page_size: 5 }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides, `development` unless RUN_MODE says otherwise
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `RAIL__BACKEND__BASE_URL=http://localhost:3000` sets `backend.base_url`
            .add_source(config::Environment::with_prefix("RAIL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_sections_fall_back() {
        let source = r#"
            [server]
            port = 8080

            [backend]
            base_url = "https://students.netoservices.ru/fe-diplom"
        "#;
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.backend.route_fetch_limit, 5000);
        assert_eq!(config.backend.timeout_seconds, 30);
        assert_eq!(config.display.utc_offset_minutes, 180);
        assert_eq!(config.listing.page_size, 5);
    }
}
