use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Walltime limit of a job, either a number of hours or a preformatted string.
#[derive(Debug, Clone, PartialEq)]
pub enum Walltime {
    Hours(f64),
    Formatted(String),
}

impl Walltime {
    /// Walltime in scheduler format: `H:MM:SS`, minutes and seconds zero-padded,
    /// hours unpadded. `Formatted` values are passed through unchanged.
    pub fn format(&self) -> String {
        match self {
            Self::Formatted(s) => s.clone(),
            Self::Hours(hours) => {
                let hh = hours.floor();
                let minutes = (hours - hh) * 60.0;
                let mm = minutes.floor();
                let ss = ((minutes - mm) * 60.0).floor();
                format!("{}:{:02}:{:02}", hh as u64, mm as u64, ss as u64)
            }
        }
    }
}

impl fmt::Display for Walltime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl FromStr for Walltime {
    type Err = Error;

    /// Numbers are hours; anything containing ':' is taken as preformatted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains(':') {
            let all_numeric = s
                .split(':')
                .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));
            if all_numeric {
                return Ok(Self::Formatted(s.to_owned()));
            }
        } else if let Ok(hours) = s.parse::<f64>() {
            if hours.is_finite() && hours > 0.0 {
                return Ok(Self::Hours(hours));
            }
        }
        Err(Error::InvalidWalltime(s.to_owned()))
    }
}

impl From<f64> for Walltime {
    fn from(hours: f64) -> Self {
        Self::Hours(hours)
    }
}
