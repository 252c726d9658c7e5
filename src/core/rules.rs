//! The yearly cash flows, one rule per concern, applied in a fixed order.
//!
//! Investment growth runs before the rules and the shortfall waterfall after
//! them, both in the engine. Every rule here only touches cash, except the
//! contribution transfer which moves cash into the liquid pot.

use super::education;
use super::engine::Balances;
use super::events::EventCalendar;
use super::plan::{HOUSING_MAINTENANCE_ANNUAL, HousingPlan, PENSION_START_AGE, Plan};

const TEEN_SURCHARGE_ANNUAL: f64 = 36.0;
const YOUNG_ADULT_SURCHARGE_ANNUAL: f64 = 60.0;

/// The simulated year a rule is evaluated for.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Year {
    pub age: u32,
    pub elapsed: u32,
    /// Cumulative price level relative to today.
    pub inflation: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum CashFlowRule {
    Severance,
    HeadIncome,
    PostRetirementWork,
    SecondEarnerIncome,
    PublicPension,
    LivingExpenses,
    DependentLiving,
    ContributionTaxCredit,
    ContributionTransfer,
    MajorExpenses,
    Housing,
    Care,
    Education,
}

pub(crate) const YEARLY_RULES: [CashFlowRule; 13] = [
    CashFlowRule::Severance,
    CashFlowRule::HeadIncome,
    CashFlowRule::PostRetirementWork,
    CashFlowRule::SecondEarnerIncome,
    CashFlowRule::PublicPension,
    CashFlowRule::LivingExpenses,
    CashFlowRule::DependentLiving,
    CashFlowRule::ContributionTaxCredit,
    CashFlowRule::ContributionTransfer,
    CashFlowRule::MajorExpenses,
    CashFlowRule::Housing,
    CashFlowRule::Care,
    CashFlowRule::Education,
];

impl CashFlowRule {
    pub fn apply(self, plan: &Plan, calendar: &EventCalendar, year: Year, balances: &mut Balances) {
        match self {
            CashFlowRule::Severance => {
                if year.age == plan.retirement_age && plan.severance_pay > 0.0 {
                    balances.cash += plan.severance_pay;
                }
            }
            CashFlowRule::HeadIncome => {
                if year.age <= plan.retirement_age {
                    let share = plan.income_curve.multiplier(year.age);
                    balances.cash += plan.head_net_income * share * year.inflation;
                }
            }
            CashFlowRule::PostRetirementWork => {
                if let Some(work) = plan.post_work {
                    if year.age > plan.retirement_age && year.age <= work.until_age {
                        balances.cash += work.annual_income;
                    }
                }
            }
            CashFlowRule::SecondEarnerIncome => {
                if let Some(earner) = &plan.second_earner {
                    let earner_age = earner.age_now.saturating_add(year.elapsed);
                    if earner.age_now > 0 && earner_age <= earner.retirement_age {
                        balances.cash += earner.net_income * year.inflation;
                    }
                }
            }
            CashFlowRule::PublicPension => {
                if year.age >= PENSION_START_AGE {
                    balances.cash += plan.annual_pension;
                }
            }
            CashFlowRule::LivingExpenses => {
                balances.cash -= plan.monthly_expenses * 12.0 * year.inflation;
            }
            CashFlowRule::DependentLiving => {
                let surcharge: f64 = plan
                    .dependents
                    .iter()
                    .map(|d| dependent_surcharge(d.age_now.saturating_add(year.elapsed)))
                    .sum();
                if surcharge > 0.0 {
                    balances.cash -= surcharge * year.inflation;
                }
            }
            CashFlowRule::ContributionTaxCredit => {
                if plan.contribution_tax_credit > 0.0 && year.age <= plan.tax_credit_until_age {
                    balances.cash += plan.contribution_tax_credit;
                }
            }
            CashFlowRule::ContributionTransfer => {
                if year.age <= plan.contribution_stop_age && plan.annual_contribution > 0.0 {
                    balances.cash -= plan.annual_contribution;
                    balances.liquid += plan.annual_contribution;
                }
            }
            CashFlowRule::MajorExpenses => {
                balances.cash -= calendar.expenses_at(year.age);
            }
            CashFlowRule::Housing => apply_housing(plan, year, balances),
            CashFlowRule::Care => {
                for care in [plan.elder_care, plan.self_care].into_iter().flatten() {
                    if care.is_active(year.age) {
                        balances.cash -= care.annual_cost;
                    }
                }
            }
            CashFlowRule::Education => {
                for dependent in &plan.dependents {
                    let age = dependent.age_now.saturating_add(year.elapsed);
                    balances.cash -=
                        education::annual_cost(dependent.track, age, dependent.manual_annual_cost);
                }
            }
        }
    }
}

/// Extra living cost for a dependent of the given age, before inflation.
fn dependent_surcharge(age: u32) -> f64 {
    match age {
        13..=15 => TEEN_SURCHARGE_ANNUAL,
        16..=22 => YOUNG_ADULT_SURCHARGE_ANNUAL,
        _ => 0.0,
    }
}

/// Loan, maintenance, sale and rent. Charges stop for good in the sale year.
fn apply_housing(plan: &Plan, year: Year, balances: &mut Balances) {
    let age = year.age;
    if let Some(sale) = plan.sale {
        if age == sale.age {
            balances.cash += sale.price;
            balances.cash -= sale.relocation_cost;
        }
    }

    if !plan.sale_has_happened_by(age) {
        match plan.housing {
            HousingPlan::None => {}
            HousingPlan::Planned {
                purchase_age,
                down_payment,
                annual_payment,
                loan_end_age,
            } => {
                // A purchase at or before today counts as already owned: the
                // down payment is behind us and the loan runs from next year.
                let purchase_ahead = purchase_age > plan.current_age;
                let loan_start = if purchase_ahead {
                    purchase_age
                } else {
                    plan.current_age + 1
                };
                if purchase_ahead && age == purchase_age {
                    balances.cash -= down_payment;
                }
                if age >= loan_start && age < loan_end_age {
                    balances.cash -= annual_payment;
                }
                if age >= loan_start {
                    balances.cash -= HOUSING_MAINTENANCE_ANNUAL;
                }
            }
            HousingPlan::Existing {
                annual_payment,
                loan_end_age,
            } => {
                if age <= loan_end_age {
                    balances.cash -= annual_payment;
                }
                balances.cash -= HOUSING_MAINTENANCE_ANNUAL;
            }
        }
    }

    if let Some(sale) = plan.sale {
        if age > sale.age && sale.annual_rent > 0.0 {
            balances.cash -= sale.annual_rent;
        }
    }
}
