use super::plan::or_fallback;
use super::types::IncomeDecline;

pub(crate) const DEFAULT_FIRST_ONSET: u32 = 55;
pub(crate) const DEFAULT_FIRST_RETENTION_PERCENT: f64 = 85.0;
pub(crate) const DEFAULT_SECOND_ONSET: u32 = 60;
pub(crate) const DEFAULT_SECOND_RETENTION_PERCENT: f64 = 60.0;

/// One step of a staged income decline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IncomeStage {
    pub onset_age: u32,
    pub retention: f64,
}

/// Staged schedule mapping an age to the share of base income still earned.
///
/// A disabled curve pushes both onsets past `horizon_age` so it never bites.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IncomeCurve {
    enabled: bool,
    first: IncomeStage,
    second: IncomeStage,
}

impl IncomeCurve {
    pub fn disabled(horizon_age: u32) -> Self {
        let never = IncomeStage {
            onset_age: horizon_age + 1,
            retention: 1.0,
        };
        Self {
            enabled: false,
            first: never,
            second: never,
        }
    }

    /// Retention fractions are clamped to `[0, 1]`.
    pub fn staged(first: IncomeStage, second: IncomeStage) -> Self {
        Self {
            enabled: true,
            first: IncomeStage {
                retention: clamp_fraction(first.retention),
                ..first
            },
            second: IncomeStage {
                retention: clamp_fraction(second.retention),
                ..second
            },
        }
    }

    pub fn from_decline(decline: Option<&IncomeDecline>, horizon_age: u32) -> Self {
        let Some(decline) = decline else {
            return Self::disabled(horizon_age);
        };
        Self::staged(
            IncomeStage {
                onset_age: or_fallback(decline.first.onset_age, DEFAULT_FIRST_ONSET),
                retention: retention_or(
                    decline.first.retention_percent,
                    DEFAULT_FIRST_RETENTION_PERCENT,
                ),
            },
            IncomeStage {
                onset_age: or_fallback(decline.second.onset_age, DEFAULT_SECOND_ONSET),
                retention: retention_or(
                    decline.second.retention_percent,
                    DEFAULT_SECOND_RETENTION_PERCENT,
                ),
            },
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn first(&self) -> IncomeStage {
        self.first
    }

    pub fn second(&self) -> IncomeStage {
        self.second
    }

    pub fn multiplier(&self, age: u32) -> f64 {
        if !self.enabled {
            return 1.0;
        }
        if age >= self.second.onset_age {
            self.second.retention
        } else if age >= self.first.onset_age {
            self.first.retention
        } else {
            1.0
        }
    }
}

/// A retention of zero percent counts as unset.
fn retention_or(percent: Option<f64>, fallback_percent: f64) -> f64 {
    percent.filter(|&p| p != 0.0).unwrap_or(fallback_percent) / 100.0
}

fn clamp_fraction(value: f64) -> f64 {
    if value.is_nan() {
        return 1.0;
    }
    value.clamp(0.0, 1.0)
}
