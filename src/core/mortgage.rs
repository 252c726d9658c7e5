const INSTALLMENTS_PER_YEAR: f64 = 12.0;

/// Yearly cost of a fixed-rate loan repaid in equal monthly installments.
///
/// Returns 0 for a non-positive principal or term. A zero rate spreads the
/// principal evenly over the term.
pub fn annual_payment(principal: f64, term_years: u32, annual_rate_percent: f64) -> f64 {
    if principal <= 0.0 || term_years == 0 {
        return 0.0;
    }
    let monthly_rate = annual_rate_percent / 100.0 / INSTALLMENTS_PER_YEAR;
    if monthly_rate == 0.0 {
        return principal / f64::from(term_years);
    }
    let installments = f64::from(term_years) * INSTALLMENTS_PER_YEAR;
    let growth = (1.0 + monthly_rate).powf(installments);
    let monthly = principal * monthly_rate * growth / (growth - 1.0);
    monthly * INSTALLMENTS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn non_positive_inputs_cost_nothing() {
        assert_eq!(annual_payment(0.0, 35, 1.5), 0.0);
        assert_eq!(annual_payment(-100.0, 35, 1.5), 0.0);
        assert_eq!(annual_payment(2400.0, 0, 1.5), 0.0);
    }

    #[test]
    fn scenario_loan_pays_interest_and_matches_formula() {
        let payment = annual_payment(2400.0, 35, 1.5);
        assert!(payment * 35.0 > 2400.0);

        let r: f64 = 0.015 / 12.0;
        let n = 35.0 * 12.0;
        let expected = 2400.0 * r * (1.0 + r).powf(n) / ((1.0 + r).powf(n) - 1.0) * 12.0;
        assert_approx(payment, expected);
    }

    #[test]
    fn hand_calculated_one_year_loan() {
        // 12 installments at 1% a month on 1200: 106.6185... each.
        assert_approx(annual_payment(1200.0, 1, 12.0), 1279.42255696812);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn zero_rate_spreads_principal_evenly(principal in 0.01_f64..1e7, term in 1_u32..60) {
            let payment = annual_payment(principal, term, 0.0);
            prop_assert!((payment - principal / f64::from(term)).abs() <= 1e-9 * principal);
        }

        #[test]
        fn positive_rate_always_costs_more_than_principal(
            principal in 1.0_f64..1e6,
            term in 1_u32..50,
            rate in 0.1_f64..15.0,
        ) {
            let payment = annual_payment(principal, term, rate);
            prop_assert!(payment * f64::from(term) > principal);
        }
    }
}
