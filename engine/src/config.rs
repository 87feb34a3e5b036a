use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::render::Color;

pub const GRID_COLUMNS: usize = 200;
pub const GRID_ROWS: usize = GRID_COLUMNS * 9 / 16;
pub const CELL_SIZE: f32 = 8.0;
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Rejected configuration values. Nothing invalid reaches the engine.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid must have at least one row and one column, got {rows}x{columns}")]
    EmptyGrid { rows: usize, columns: usize },
    #[error("cell size must be a positive number of pixels, got {0}")]
    InvalidCellSize(f32),
    #[error("cell size {size} is outside the zoom range {min}..={max}")]
    CellSizeOutOfRange { size: f32, min: f32, max: f32 },
    #[error("tick period must be non-zero")]
    ZeroTickPeriod,
    #[error("tick period {period:?} is outside the speed range {min:?}..={max:?}")]
    TickPeriodOutOfRange {
        period: Duration,
        min: Duration,
        max: Duration,
    },
    #[error("random fill density must be within 0.0..=1.0, got {0}")]
    InvalidDensity(f64),
    #[error("invalid value {value:?} for {var}")]
    Parse { var: &'static str, value: String },
}

/// Static settings for a simulation session.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rows: usize,
    pub columns: usize,
    /// Initial pixels per cell.
    pub cell_size: f32,
    pub min_cell_size: f32,
    pub max_cell_size: f32,
    /// Initial time between generations.
    pub tick_period: Duration,
    pub min_tick_period: Duration,
    pub max_tick_period: Duration,
    pub cell_color: Color,
    pub background: Color,
    pub grid_line: Color,
    /// Chance of each cell being alive after a randomize.
    pub random_density: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rows: GRID_ROWS,
            columns: GRID_COLUMNS,
            cell_size: CELL_SIZE,
            min_cell_size: 2.0,
            max_cell_size: 64.0,
            tick_period: TICK_PERIOD,
            min_tick_period: Duration::from_millis(10),
            max_tick_period: Duration::from_millis(2000),
            cell_color: Color::RED,
            background: Color::WHITE,
            grid_line: Color::GREY,
            random_density: 0.5,
        }
    }
}

impl Config {
    /// Defaults overlaid with `LIFE_ROWS`, `LIFE_COLUMNS`, `LIFE_CELL_SIZE`
    /// and `LIFE_TICK_MS`, then validated.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        if let Some(rows) = parse_var(&lookup, "LIFE_ROWS")? {
            config.rows = rows;
        }
        if let Some(columns) = parse_var(&lookup, "LIFE_COLUMNS")? {
            config.columns = columns;
        }
        if let Some(cell_size) = parse_var(&lookup, "LIFE_CELL_SIZE")? {
            config.cell_size = cell_size;
        }
        if let Some(millis) = parse_var(&lookup, "LIFE_TICK_MS")? {
            config.tick_period = Duration::from_millis(millis);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        for size in [self.cell_size, self.min_cell_size, self.max_cell_size] {
            if !size.is_finite() || size <= 0.0 {
                return Err(ConfigError::InvalidCellSize(size));
            }
        }
        if !(self.min_cell_size..=self.max_cell_size).contains(&self.cell_size) {
            return Err(ConfigError::CellSizeOutOfRange {
                size: self.cell_size,
                min: self.min_cell_size,
                max: self.max_cell_size,
            });
        }
        if self.tick_period.is_zero() || self.min_tick_period.is_zero() {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if !(self.min_tick_period..=self.max_tick_period).contains(&self.tick_period) {
            return Err(ConfigError::TickPeriodOutOfRange {
                period: self.tick_period,
                min: self.min_tick_period,
                max: self.max_tick_period,
            });
        }
        if !(0.0..=1.0).contains(&self.random_density) {
            return Err(ConfigError::InvalidDensity(self.random_density));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Parse { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn default_is_valid() {
        let config = Config::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!((config.rows, config.columns), (112, 200));
    }

    #[test]
    fn rejects_empty_grid() {
        let config = Config {
            rows: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyGrid { rows: 0, columns: 200 }));
    }

    #[test]
    fn rejects_non_positive_cell_size() {
        for size in [0.0, -4.0, f32::NAN] {
            let config = Config {
                cell_size: size,
                ..Config::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::InvalidCellSize(_))));
        }
    }

    #[test]
    fn rejects_cell_size_outside_zoom_range() {
        let config = Config {
            cell_size: 128.0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::CellSizeOutOfRange { .. })));
    }

    #[test]
    fn rejects_bad_tick_periods() {
        let config = Config {
            tick_period: Duration::ZERO,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickPeriod));

        let config = Config {
            tick_period: Duration::from_secs(10),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::TickPeriodOutOfRange { .. })));
    }

    #[test]
    fn rejects_bad_density() {
        let config = Config {
            random_density: 1.5,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidDensity(1.5)));
    }

    #[test]
    fn env_overrides_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("LIFE_ROWS", "20"),
            ("LIFE_COLUMNS", " 30 "),
            ("LIFE_CELL_SIZE", "16"),
            ("LIFE_TICK_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(config.rows, 20);
        assert_eq!(config.columns, 30);
        assert_eq!(config.cell_size, 16.0);
        assert_eq!(config.tick_period, Duration::from_millis(250));
    }

    #[test]
    fn env_values_are_validated() {
        let err = Config::from_lookup(lookup(&[("LIFE_ROWS", "lots")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Parse {
                var: "LIFE_ROWS",
                value: "lots".to_string()
            }
        );
        assert_eq!(err.to_string(), "invalid value \"lots\" for LIFE_ROWS");

        let err = Config::from_lookup(lookup(&[("LIFE_COLUMNS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyGrid { .. }));
    }
}
