use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Average seasonal irradiation shape applied when a location does not
    /// carry its own table. Twelve multipliers, one per calendar month,
    /// averaging ~1.0 over the year.
    pub default_seasonal_factors: [f64; 12],
    pub locations: Vec<LocationProfile>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// One entry of the location catalog: irradiance and regional installed
/// cost for a city. Loaded once at startup and treated as immutable.
#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct LocationProfile {
    pub name: String,
    /// Average daily peak sun hours (HSP) for the location.
    pub peak_sun_hours: f64,
    /// Regional installed cost per watt-peak (BRL/Wp).
    pub cost_per_wp: f64,
    /// Location-specific seasonal shape; falls back to the catalog default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonal_factors: Option<[f64; 12]>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Catalog sanity checks. The sizing formulas divide by peak sun hours
    /// and cost per Wp, so both must be strictly positive.
    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.locations.is_empty() {
            return Err("location catalog is empty".into());
        }
        for location in &self.locations {
            if location.peak_sun_hours <= 0.0 {
                return Err(format!("{}: peak_sun_hours must be > 0", location.name).into());
            }
            if location.cost_per_wp <= 0.0 {
                return Err(format!("{}: cost_per_wp must be > 0", location.name).into());
            }
            if let Some(factors) = &location.seasonal_factors {
                if factors.iter().any(|f| *f <= 0.0) {
                    return Err(format!("{}: seasonal factors must be > 0", location.name).into());
                }
            }
        }
        if self.default_seasonal_factors.iter().any(|f| *f <= 0.0) {
            return Err("default seasonal factors must be > 0".into());
        }
        let mut names: Vec<&str> = self.locations.iter().map(|l| l.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        if names.len() != self.locations.len() {
            return Err("location names must be unique".into());
        }
        Ok(())
    }

    pub fn find_location(&self, name: &str) -> Option<&LocationProfile> {
        self.locations.iter().find(|l| l.name == name)
    }

    pub fn seasonal_factors_for<'a>(&'a self, location: &'a LocationProfile) -> &'a [f64; 12] {
        location
            .seasonal_factors
            .as_ref()
            .unwrap_or(&self.default_seasonal_factors)
    }
}
