//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::sim::SimError;
use crate::sim::types::{DispatchMode, StepDuration, WindModel};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the [`ScenarioConfig::microgrid`]
/// preset. Load from TOML with [`ScenarioConfig::from_toml_file`] or pick a
/// built-in preset with [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run length, timing, and dispatch variant.
    #[serde(default)]
    pub simulation: SimulationSection,
    /// Generator capacities, switches, and ramp filter.
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Electrical battery parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Thermal storage and thermal demand.
    #[serde(default)]
    pub thermal: ThermalConfig,
    /// Electrical demand source.
    #[serde(default)]
    pub demand: DemandConfig,
}

/// Run length, timing, and dispatch variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSection {
    /// Number of timesteps (must be > 0).
    pub steps: usize,
    /// `"hourly"` or `"15-min"`.
    pub step_duration: String,
    /// Timestamp of step 0 as `YYYY-MM-DDTHH:MM:SS`; today's local midnight when absent.
    pub start: Option<String>,
    /// Master random seed.
    pub seed: u64,
    /// `"default"` or `"peak_shaving"`.
    pub dispatch_mode: String,
    /// Suppress generation while the battery is full until it empties.
    pub enable_gating: bool,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            steps: 24 * 7,
            step_duration: "hourly".to_string(),
            start: None,
            seed: 42,
            dispatch_mode: "default".to_string(),
            enable_gating: true,
        }
    }
}

/// Generator capacities, switches, and ramp filter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Solar peak output (kW).
    pub solar_capacity_kw: f32,
    /// Wind rated output (kW).
    pub wind_capacity_kw: f32,
    /// CHP constant electrical output (kW).
    pub chp_capacity_kw: f32,
    pub use_solar: bool,
    pub use_wind: bool,
    pub use_chp: bool,
    /// Wind draw: `"normal"` or `"uniform"`.
    pub wind_model: String,
    /// Maximum step-to-step change of ramped profiles (kW).
    pub ramp_rate: f32,
    pub ramp_solar: bool,
    pub ramp_wind: bool,
    pub ramp_chp: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            solar_capacity_kw: 3000.0,
            wind_capacity_kw: 3000.0,
            chp_capacity_kw: 3000.0,
            use_solar: true,
            use_wind: true,
            use_chp: true,
            wind_model: "normal".to_string(),
            ramp_rate: 0.5,
            ramp_solar: false,
            ramp_wind: true,
            ramp_chp: false,
        }
    }
}

/// Electrical battery parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Total energy capacity (kWh).
    pub capacity_kwh: f32,
    /// Charge efficiency (0.0–1.0).
    pub efficiency: f32,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 10_000.0,
            efficiency: 0.9,
        }
    }
}

/// Thermal storage and thermal demand.
///
/// The demand fields follow [`SeriesSource`]; `"neighborhood"` is not
/// accepted here.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThermalConfig {
    /// Model the thermal pool at all; off unless set.
    pub enabled: bool,
    /// Total thermal capacity (kWh).
    pub capacity_kwh: f32,
    /// Charge efficiency (0.0–1.0).
    pub efficiency: f32,
    pub source: String,
    pub min_kw: u32,
    pub max_kw: u32,
    pub profile: Vec<f32>,
    pub csv_path: Option<String>,
    pub csv_column: String,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            capacity_kwh: 5000.0,
            efficiency: 0.85,
            source: "random".to_string(),
            min_kw: 2000,
            max_kw: 3999,
            profile: Vec::new(),
            csv_path: None,
            csv_column: "thermal_demand_kw".to_string(),
        }
    }
}

impl ThermalConfig {
    pub fn series(&self) -> SeriesSource<'_> {
        SeriesSource {
            source: &self.source,
            min_kw: self.min_kw,
            max_kw: self.max_kw,
            profile: &self.profile,
            csv_path: self.csv_path.as_deref(),
            csv_column: &self.csv_column,
        }
    }
}

/// Electrical demand source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    pub source: String,
    pub min_kw: u32,
    pub max_kw: u32,
    pub profile: Vec<f32>,
    pub csv_path: Option<String>,
    pub csv_column: String,
    /// Building series summed when `source = "neighborhood"`.
    pub buildings: Vec<BuildingConfig>,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            source: "random".to_string(),
            min_kw: 3000,
            max_kw: 10_000,
            profile: Vec::new(),
            csv_path: None,
            csv_column: default_demand_column(),
            buildings: Vec::new(),
        }
    }
}

impl DemandConfig {
    pub fn series(&self) -> SeriesSource<'_> {
        SeriesSource {
            source: &self.source,
            min_kw: self.min_kw,
            max_kw: self.max_kw,
            profile: &self.profile,
            csv_path: self.csv_path.as_deref(),
            csv_column: &self.csv_column,
        }
    }
}

/// Where a demand series comes from.
///
/// `source` selects one of `"random"` (seeded integers in
/// `[min_kw, max_kw]`), `"profile"` (inline values tiled over the run),
/// `"csv"` (column `csv_column` of `csv_path`), or, for electrical demand
/// only, `"neighborhood"`.
#[derive(Debug, Clone, Copy)]
pub struct SeriesSource<'a> {
    pub source: &'a str,
    pub min_kw: u32,
    pub max_kw: u32,
    pub profile: &'a [f32],
    pub csv_path: Option<&'a str>,
    pub csv_column: &'a str,
}

/// One building of a neighborhood demand.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildingConfig {
    pub name: String,
    /// Inline profile tiled over the run; ignored when `csv_path` is set.
    #[serde(default)]
    pub profile: Vec<f32>,
    pub csv_path: Option<String>,
    #[serde(default = "default_demand_column")]
    pub csv_column: String,
}

fn default_demand_column() -> String {
    "demand_kw".to_string()
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.steps"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::configuration(e.field, e.message)
    }
}

impl ScenarioConfig {
    /// Returns the gated one-week hourly microgrid, electrical only.
    pub fn microgrid() -> Self {
        Self::default()
    }

    /// Returns the gated microgrid at 15-minute resolution over the same week.
    pub fn microgrid_15min() -> Self {
        Self {
            simulation: SimulationSection {
                steps: 96 * 7,
                step_duration: "15-min".to_string(),
                ..SimulationSection::default()
            },
            ..Self::default()
        }
    }

    /// Returns the ungated peak-shaving distribution microgrid: small battery,
    /// thermal pool, no wind, ramp-limited wind and CHP profiles.
    pub fn distribution() -> Self {
        Self {
            simulation: SimulationSection {
                dispatch_mode: "peak_shaving".to_string(),
                enable_gating: false,
                ..SimulationSection::default()
            },
            generation: GenerationConfig {
                solar_capacity_kw: 2000.0,
                wind_capacity_kw: 0.0,
                chp_capacity_kw: 1600.0,
                use_wind: false,
                wind_model: "uniform".to_string(),
                ramp_rate: 0.1,
                ramp_chp: true,
                ..GenerationConfig::default()
            },
            battery: BatteryConfig {
                capacity_kwh: 30.0,
                efficiency: 0.9,
            },
            thermal: ThermalConfig {
                enabled: true,
                capacity_kwh: 105.0,
                ..ThermalConfig::default()
            },
            demand: DemandConfig::default(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["microgrid", "microgrid_15min", "distribution"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "microgrid" => Ok(Self::microgrid()),
            "microgrid_15min" => Ok(Self::microgrid_15min()),
            "distribution" => Ok(Self::distribution()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Parsed start timestamp, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `simulation.start` is not `YYYY-MM-DDTHH:MM:SS`.
    pub fn start(&self) -> Result<Option<NaiveDateTime>, ConfigError> {
        self.simulation
            .start
            .as_deref()
            .map(|s| {
                s.parse::<NaiveDateTime>().map_err(|e| {
                    ConfigError::new("simulation.start", format!("\"{s}\": {e}"))
                })
            })
            .transpose()
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Numeric ranges that
    /// the simulator itself rejects are checked again at run time.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.steps == 0 {
            errors.push(ConfigError::new("simulation.steps", "must be > 0"));
        }
        if let Err(e) = s.step_duration.parse::<StepDuration>() {
            errors.push(ConfigError::new("simulation.step_duration", e.to_string()));
        }
        if let Err(e) = s.dispatch_mode.parse::<DispatchMode>() {
            errors.push(ConfigError::new("simulation.dispatch_mode", e.to_string()));
        }
        if let Err(e) = self.start() {
            errors.push(e);
        }

        let g = &self.generation;
        if let Err(e) = g.wind_model.parse::<WindModel>() {
            errors.push(ConfigError::new("generation.wind_model", e.to_string()));
        }
        for (field, value) in [
            ("generation.solar_capacity_kw", g.solar_capacity_kw),
            ("generation.wind_capacity_kw", g.wind_capacity_kw),
            ("generation.chp_capacity_kw", g.chp_capacity_kw),
            ("generation.ramp_rate", g.ramp_rate),
            ("battery.capacity_kwh", self.battery.capacity_kwh),
        ] {
            if value.is_nan() || value < 0.0 {
                errors.push(ConfigError::new(field, "must be >= 0"));
            }
        }

        if !(0.0..=1.0).contains(&self.battery.efficiency) {
            errors.push(ConfigError::new("battery.efficiency", "must be in [0.0, 1.0]"));
        }
        if s.enable_gating && self.battery.capacity_kwh <= 0.0 {
            errors.push(ConfigError::new(
                "battery.capacity_kwh",
                "must be > 0 when simulation.enable_gating is set",
            ));
        }

        let th = &self.thermal;
        if th.enabled {
            if th.capacity_kwh.is_nan() || th.capacity_kwh < 0.0 {
                errors.push(ConfigError::new("thermal.capacity_kwh", "must be >= 0"));
            }
            if !(0.0..=1.0).contains(&th.efficiency) {
                errors.push(ConfigError::new("thermal.efficiency", "must be in [0.0, 1.0]"));
            }
            validate_source(th.series(), "thermal", false, &mut errors);
        }

        validate_source(self.demand.series(), "demand", true, &mut errors);
        if self.demand.source == "neighborhood" {
            if self.demand.buildings.is_empty() {
                errors.push(ConfigError::new(
                    "demand.buildings",
                    "must list at least one building for source \"neighborhood\"",
                ));
            }
            for (i, b) in self.demand.buildings.iter().enumerate() {
                if b.name.is_empty() {
                    errors.push(ConfigError::new(
                        format!("demand.buildings[{i}].name"),
                        "must not be empty",
                    ));
                }
                if b.csv_path.is_none() && b.profile.is_empty() {
                    errors.push(ConfigError::new(
                        format!("demand.buildings[{i}]"),
                        "needs a profile or a csv_path",
                    ));
                }
            }
        }

        errors
    }
}

fn validate_source(
    src: SeriesSource<'_>,
    section: &str,
    allow_neighborhood: bool,
    errors: &mut Vec<ConfigError>,
) {
    match src.source {
        "random" => {
            if src.min_kw > src.max_kw {
                errors.push(ConfigError::new(
                    format!("{section}.min_kw"),
                    format!("must be <= {section}.max_kw"),
                ));
            }
        }
        "profile" => {
            if src.profile.is_empty() {
                errors.push(ConfigError::new(
                    format!("{section}.profile"),
                    "must not be empty for source \"profile\"",
                ));
            }
        }
        "csv" => {
            if src.csv_path.is_none() {
                errors.push(ConfigError::new(
                    format!("{section}.csv_path"),
                    "is required for source \"csv\"",
                ));
            }
        }
        "neighborhood" if allow_neighborhood => {}
        other => {
            let allowed = if allow_neighborhood {
                "\"random\", \"profile\", \"csv\" or \"neighborhood\""
            } else {
                "\"random\", \"profile\" or \"csv\""
            };
            errors.push(ConfigError::new(
                format!("{section}.source"),
                format!("must be {allowed}, got \"{other}\""),
            ));
        }
    }
}
