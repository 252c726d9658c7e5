use std::collections::BTreeMap;

use super::plan::{HORIZON_AGE, HousingPlan, Plan};

pub const LABEL_RETIREMENT: &str = "Retirement";
pub const LABEL_SEVERANCE: &str = "Severance pay";
pub const LABEL_HOME_PURCHASE: &str = "Home purchase";
pub const LABEL_HOME_SALE: &str = "Home sale";
pub const LABEL_FIRST_DECLINE: &str = "Income decline (stage 1)";
pub const LABEL_SECOND_DECLINE: &str = "Income decline (stage 2)";
pub const LABEL_CONTRIBUTIONS_END: &str = "Contributions end";
pub const LABEL_WORK_END: &str = "Work ends";
pub const LABEL_ELDER_CARE: &str = "Elder care";
pub const LABEL_SELF_CARE: &str = "Self care";

/// Per-age event labels and one-off expense totals, built once per projection.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct EventCalendar {
    labels: BTreeMap<u32, Vec<String>>,
    amounts: BTreeMap<u32, f64>,
}

impl EventCalendar {
    pub fn build(plan: &Plan) -> Self {
        let mut calendar = Self::default();
        let current_age = plan.current_age;
        let within = |age: u32| age > current_age && age <= HORIZON_AGE;

        calendar.push_label(plan.retirement_age, LABEL_RETIREMENT);
        if plan.severance_pay > 0.0 {
            calendar.push_label(plan.retirement_age, LABEL_SEVERANCE);
        }

        if let HousingPlan::Planned { purchase_age, .. } = plan.housing {
            if purchase_age > current_age {
                calendar.push_label(purchase_age, LABEL_HOME_PURCHASE);
            }
        }
        if let Some(sale) = plan.sale {
            if sale.age <= HORIZON_AGE {
                calendar.push_label(sale.age, LABEL_HOME_SALE);
            }
        }

        let curve = &plan.income_curve;
        if curve.is_enabled() && within(curve.first().onset_age) {
            calendar.push_label(curve.first().onset_age, LABEL_FIRST_DECLINE);
        }
        if plan.contribution_stop_age < plan.retirement_age && within(plan.contribution_stop_age) {
            calendar.push_label(plan.contribution_stop_age, LABEL_CONTRIBUTIONS_END);
        }
        if curve.is_enabled() && within(curve.second().onset_age) {
            calendar.push_label(curve.second().onset_age, LABEL_SECOND_DECLINE);
        }

        if let Some(work) = plan.post_work {
            if work.until_age > plan.retirement_age && work.until_age <= HORIZON_AGE {
                calendar.push_label(work.until_age, LABEL_WORK_END);
            }
        }

        for (care, label) in [
            (plan.elder_care, LABEL_ELDER_CARE),
            (plan.self_care, LABEL_SELF_CARE),
        ] {
            if let Some(care) = care {
                if care.onset_age <= HORIZON_AGE {
                    calendar.push_label(care.onset_age, label);
                }
            }
        }

        for expense in &plan.major_expenses {
            if expense.amount > 0.0 {
                calendar.push_label(expense.age, &expense.label);
            }
            *calendar.amounts.entry(expense.age).or_insert(0.0) += expense.amount;
        }

        calendar
    }

    fn push_label(&mut self, age: u32, label: &str) {
        self.labels.entry(age).or_default().push(label.to_string());
    }

    pub fn labels_at(&self, age: u32) -> &[String] {
        self.labels.get(&age).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn expenses_at(&self, age: u32) -> f64 {
        self.amounts.get(&age).copied().unwrap_or(0.0)
    }
}
