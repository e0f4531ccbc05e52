//! Simulation driver configuration.
use std::env;
use std::path::PathBuf;

/// Configuration for the fixed-step simulation loop.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    /// Directory with `config.toml` and `items.ron`.
    pub data_dir: PathBuf,
    /// Optional RON command script; the built-in script runs otherwise.
    pub script: Option<PathBuf>,
    /// Seconds elapsed per tick.
    pub tick_seconds: f32,
    /// Number of ticks to run.
    pub ticks: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            data_dir: inventory_content::default_data_dir(),
            script: None,
            tick_seconds: 0.5,
            ticks: 20,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `INVENTORY_DATA_DIR` - Content directory (default: bundled data)
    /// - `SIM_SCRIPT` - RON command script (default: built-in script)
    /// - `SIM_TICK_SECONDS` - Seconds per tick (default: 0.5)
    /// - `SIM_TICKS` - Number of ticks (default: 20)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("INVENTORY_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.script = env::var("SIM_SCRIPT").ok().map(PathBuf::from);

        if let Some(seconds) = read_env::<f32>("SIM_TICK_SECONDS")
            && seconds.is_finite()
            && seconds >= 0.0
        {
            config.tick_seconds = seconds;
        }
        if let Some(ticks) = read_env::<u32>("SIM_TICKS") {
            config.ticks = ticks;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
