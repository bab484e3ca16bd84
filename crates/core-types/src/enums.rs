use serde::{Deserialize, Serialize};
use std::fmt;

/// The headline call of an impact analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The strategy pays back its implementation cost.
    GreenLight,
    /// The lift does not cover the implementation cost.
    Caution,
}

impl Verdict {
    pub fn is_profitable(&self) -> bool {
        matches!(self, Verdict::GreenLight)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::GreenLight => write!(f, "Green Light"),
            Verdict::Caution => write!(f, "Caution"),
        }
    }
}

/// Classification of a simulated probability of profit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Safe,
    Moderate,
    High,
}

impl RiskBand {
    /// Buckets a win rate expressed in percent (0-100).
    pub fn from_win_rate(win_rate_pct: f64) -> Self {
        if win_rate_pct > 80.0 {
            RiskBand::Safe
        } else if win_rate_pct > 50.0 {
            RiskBand::Moderate
        } else {
            RiskBand::High
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            RiskBand::Safe => "Safe bet. Highly likely to make money.",
            RiskBand::Moderate => "Moderate risk. It's a coin flip.",
            RiskBand::High => "High risk. Likely to lose money.",
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskBand::Safe => write!(f, "Safe"),
            RiskBand::Moderate => write!(f, "Moderate"),
            RiskBand::High => write!(f, "High"),
        }
    }
}
