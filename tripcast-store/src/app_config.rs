use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub recommendation: RecommendationConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Currency conversion captured at normalization time.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PricingConfig {
    pub fx_rate: f64,
    pub base_currency: String,
    pub display_currency: String,
    pub taxes_included: bool,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            fx_rate: 56.45,
            base_currency: "USD".to_string(),
            display_currency: "PHP".to_string(),
            taxes_included: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScoringConfig {
    pub price_weight: f64,
    pub quality_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            price_weight: 0.75,
            quality_weight: 0.25,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ValidationConfig {
    pub long_haul_airports: Vec<String>,
    /// Short and medium haul low-cost carriers (Cebu Pacific, AirAsia).
    pub reserved_lcc_carriers: Vec<String>,
    pub long_haul_price_floor: i64,
    pub soft_outlier_floor: i64,
    pub soft_outlier_allow_list: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            long_haul_airports: ["SFO", "LAX", "JFK", "LHR", "CDG", "FCO"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            reserved_lcc_carriers: vec!["5J".to_string(), "Z2".to_string()],
            long_haul_price_floor: 15000,
            soft_outlier_floor: 5000,
            soft_outlier_allow_list: ["SIN", "HKG", "TPE"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ValidationConfig {
    pub fn is_long_haul(&self, iata: &str) -> bool {
        self.long_haul_airports.iter().any(|a| a == iata)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Wins allowed per country across one 12-month build.
    pub diversification_cap: u32,
    pub samples_per_month: u32,
    pub trend_sample_day: u32,
    pub trend_premium: f64,
    /// Calendar year planned; defaults to the current year.
    pub horizon_year: Option<i32>,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            diversification_cap: 2,
            samples_per_month: 5,
            trend_sample_day: 15,
            trend_premium: 1.10,
            horizon_year: None,
        }
    }
}

/// Settings for the stand-in offer generator.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProviderConfig {
    pub seed: Option<u64>,
    pub fault_rate: f64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            seed: None,
            fault_rate: 0.10,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Developer overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(env_source())
            .build()?;

        s.try_deserialize()
    }
}

/// Eg. `TRIPCAST__SCORING__PRICE_WEIGHT=0.6`. The `__` separator also
/// follows the prefix.
fn env_source() -> config::Environment {
    config::Environment::with_prefix("TRIPCAST").separator("__")
}
