/// Gross-income band with the flat rate that applies inside it.
#[derive(Copy, Clone, Debug)]
struct RateBand {
    upper_gross: f64,
    rate: f64,
}

const RETENTION_BANDS: [RateBand; 3] = [
    RateBand {
        upper_gross: 500.0,
        rate: 0.80,
    },
    RateBand {
        upper_gross: 1000.0,
        rate: 0.75,
    },
    RateBand {
        upper_gross: f64::INFINITY,
        rate: 0.70,
    },
];

/// Marginal deduction rates for contributions to a tax-advantaged retirement plan.
const CREDIT_BANDS: [RateBand; 3] = [
    RateBand {
        upper_gross: 500.0,
        rate: 0.20,
    },
    RateBand {
        upper_gross: 1000.0,
        rate: 0.28,
    },
    RateBand {
        upper_gross: f64::INFINITY,
        rate: 0.33,
    },
];

fn band_for(bands: &[RateBand], gross: f64) -> usize {
    bands
        .iter()
        .position(|band| gross <= band.upper_gross)
        .unwrap_or(bands.len() - 1)
}

/// Take-home pay for a gross annual income.
///
/// Each band applies one flat rate to the whole income. Crossing into a band
/// with a lower rate never pays less than the top of the band below it.
pub fn net_income(gross_annual: f64) -> f64 {
    if gross_annual.is_nan() || gross_annual <= 0.0 {
        return 0.0;
    }
    let idx = band_for(&RETENTION_BANDS, gross_annual);
    let flat = gross_annual * RETENTION_BANDS[idx].rate;
    if idx == 0 {
        return flat;
    }
    let below = RETENTION_BANDS[idx - 1];
    flat.max(below.upper_gross * below.rate)
}

/// Yearly tax saved by paying `annual_contribution` into a deductible plan.
pub fn contribution_tax_credit(gross_annual: f64, annual_contribution: f64) -> f64 {
    if gross_annual.is_nan() || gross_annual <= 0.0 || annual_contribution.is_nan() {
        return 0.0;
    }
    if annual_contribution <= 0.0 {
        return 0.0;
    }
    let idx = band_for(&CREDIT_BANDS, gross_annual);
    annual_contribution * CREDIT_BANDS[idx].rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    #[test]
    fn flat_rate_per_band() {
        assert_eq!(net_income(0.0), 0.0);
        assert_eq!(net_income(-20.0), 0.0);
        assert_eq!(net_income(500.0), 400.0);
        assert_eq!(net_income(800.0), 600.0);
        assert_eq!(net_income(1000.0), 750.0);
        assert_eq!(net_income(2000.0), 1400.0);
    }

    #[test]
    fn band_edges_never_drop_take_home() {
        assert_eq!(net_income(501.0), 400.0);
        assert_eq!(net_income(1001.0), 750.0);
        assert!(net_income(540.0) > 400.0);
    }

    #[test]
    fn contribution_credit_uses_gross_band() {
        assert!((contribution_tax_credit(500.0, 100.0) - 20.0).abs() < 1e-9);
        assert!((contribution_tax_credit(700.0, 100.0) - 28.0).abs() < 1e-9);
        assert!((contribution_tax_credit(1200.0, 100.0) - 33.0).abs() < 1e-9);
        assert_eq!(contribution_tax_credit(0.0, 100.0), 0.0);
        assert_eq!(contribution_tax_credit(700.0, 0.0), 0.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(128))]

        #[test]
        fn net_income_is_monotonic(a in -100.0_f64..5000.0, b in -100.0_f64..5000.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(net_income(low) <= net_income(high));
            prop_assert!(net_income(high) <= high.max(0.0));
        }
    }
}
