use super::income_curve::IncomeCurve;
use super::mortgage::annual_payment;
use super::net_income::{contribution_tax_credit, net_income};
use super::types::{
    CareEvent, ContributionStopPolicy, EducationTrack, HomeSale, Housing, HouseholdState,
};

pub const HORIZON_AGE: u32 = 100;
pub const REFERENCE_AGE: u32 = 80;
pub const PENSION_START_AGE: u32 = 65;
pub const LOCKED_UNLOCK_AGE: u32 = 60;
pub const TAX_ADVANTAGED_MAX_AGE: u32 = 65;
pub const HOUSING_MAINTENANCE_ANNUAL: f64 = 30.0;
pub const CARE_SPREAD_YEARS: u32 = 5;

const MIN_CURRENT_AGE: u32 = 18;
const DEFAULT_CURRENT_AGE: u32 = 30;
const DEFAULT_RETIREMENT_AGE: u32 = 65;
const DEFAULT_SECOND_EARNER_RETIREMENT_AGE: u32 = 65;
const DEFAULT_WORK_UNTIL_AGE: u32 = 70;
const DEFAULT_SALE_AGE: u32 = 75;
const DEFAULT_ELDER_CARE_AGE: u32 = 55;
const DEFAULT_SELF_CARE_AGE: u32 = 80;
const DEFAULT_LOAN_YEARS: u32 = 35;
const DEFAULT_LOAN_RATE_PERCENT: f64 = 1.5;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EarnerPlan {
    /// Zero when the age was never entered; such an earner brings no income.
    pub age_now: u32,
    pub net_income: f64,
    pub retirement_age: u32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct WorkWindow {
    pub until_age: u32,
    pub annual_income: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DependentPlan {
    pub age_now: u32,
    pub track: EducationTrack,
    pub manual_annual_cost: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum HousingPlan {
    None,
    Planned {
        purchase_age: u32,
        down_payment: f64,
        annual_payment: f64,
        loan_end_age: u32,
    },
    Existing {
        annual_payment: f64,
        loan_end_age: u32,
    },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct SalePlan {
    pub age: u32,
    pub price: f64,
    pub relocation_cost: f64,
    pub annual_rent: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct CarePlan {
    pub onset_age: u32,
    pub annual_cost: f64,
}

impl CarePlan {
    pub fn is_active(&self, age: u32) -> bool {
        age >= self.onset_age && age < self.onset_age.saturating_add(CARE_SPREAD_YEARS)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ScheduledExpense {
    pub age: u32,
    pub label: String,
    pub amount: f64,
}

/// A household snapshot resolved into the numbers the yearly loop consumes.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Plan {
    pub current_age: u32,
    pub retirement_age: u32,

    pub cash: f64,
    pub liquid: f64,
    pub locked: f64,
    /// Declared cash plus declared investments, before the locked split.
    pub starting_total: f64,

    pub head_net_income: f64,
    pub income_curve: IncomeCurve,
    pub second_earner: Option<EarnerPlan>,
    pub post_work: Option<WorkWindow>,
    pub severance_pay: f64,
    pub annual_pension: f64,

    pub monthly_expenses: f64,
    pub dependents: Vec<DependentPlan>,

    pub annual_contribution: f64,
    pub contribution_stop_age: u32,
    pub contribution_tax_credit: f64,
    pub tax_credit_until_age: u32,

    pub housing: HousingPlan,
    pub sale: Option<SalePlan>,
    pub elder_care: Option<CarePlan>,
    pub self_care: Option<CarePlan>,
    pub major_expenses: Vec<ScheduledExpense>,
}

fn non_negative(value: f64) -> f64 {
    value.max(0.0)
}

/// An age or term of zero counts as unset, like a missing one.
pub(crate) fn or_fallback(value: Option<u32>, fallback: u32) -> u32 {
    value.filter(|&v| v != 0).unwrap_or(fallback)
}

impl Plan {
    pub fn resolve(state: &HouseholdState) -> Self {
        let current_age =
            or_fallback(state.age, DEFAULT_CURRENT_AGE).clamp(MIN_CURRENT_AGE, HORIZON_AGE);
        let retirement_age = or_fallback(state.retirement_age, DEFAULT_RETIREMENT_AGE)
            .max(current_age.saturating_add(1));

        let cash = non_negative(state.cash);
        let investments = non_negative(state.investments);
        let locked = non_negative(state.locked_retirement);

        let gross_income = non_negative(state.gross_income);
        let income_curve = IncomeCurve::from_decline(state.income_decline.as_ref(), HORIZON_AGE);
        let contribution_stop_age = contribution_stop_age(
            &state.contribution_stop,
            &income_curve,
            current_age,
            retirement_age,
        );

        let contribution_tax_credit = state
            .tax_advantaged_contribution
            .as_ref()
            .map(|c| contribution_tax_credit(gross_income, non_negative(c.monthly_amount) * 12.0))
            .unwrap_or(0.0);

        let second_earner = state.second_earner.as_ref().map(|earner| EarnerPlan {
            age_now: earner.age,
            net_income: net_income(non_negative(earner.gross_income)),
            retirement_age: or_fallback(
                earner.retirement_age,
                DEFAULT_SECOND_EARNER_RETIREMENT_AGE,
            ),
        });

        let post_work = state.post_retirement_work.as_ref().map(|work| WorkWindow {
            until_age: or_fallback(work.until_age, DEFAULT_WORK_UNTIL_AGE),
            annual_income: non_negative(work.monthly_income) * 12.0,
        });

        let dependents = state
            .dependents
            .iter()
            .map(|d| DependentPlan {
                age_now: d.age,
                track: d.track,
                manual_annual_cost: d.manual_annual_cost,
            })
            .collect();

        let (housing, sale) = resolve_housing(&state.housing, current_age);

        let major_expenses = state
            .major_expenses
            .iter()
            .filter(|e| e.enabled)
            .filter_map(|e| {
                let age = e.target_age?;
                (age > current_age && age <= HORIZON_AGE).then(|| ScheduledExpense {
                    age,
                    label: e.label.clone(),
                    amount: e.amount,
                })
            })
            .collect();

        let plan = Plan {
            current_age,
            retirement_age,
            cash,
            liquid: non_negative(investments - locked),
            locked,
            starting_total: cash + investments,
            head_net_income: net_income(gross_income),
            income_curve,
            second_earner,
            post_work,
            severance_pay: non_negative(state.severance_pay),
            annual_pension: non_negative(state.monthly_pension) * 12.0,
            monthly_expenses: non_negative(state.monthly_expenses),
            dependents,
            annual_contribution: non_negative(state.monthly_contribution) * 12.0,
            contribution_stop_age,
            contribution_tax_credit,
            tax_credit_until_age: contribution_stop_age.min(TAX_ADVANTAGED_MAX_AGE),
            housing,
            sale,
            elder_care: resolve_care(
                state.elder_care.as_ref(),
                DEFAULT_ELDER_CARE_AGE,
                current_age,
            ),
            self_care: resolve_care(state.self_care.as_ref(), DEFAULT_SELF_CARE_AGE, current_age),
            major_expenses,
        };

        log::trace!(
            "plan resolved: age {}..={}, retirement {}, contributions stop at {}, housing {:?}",
            plan.current_age,
            HORIZON_AGE,
            plan.retirement_age,
            plan.contribution_stop_age,
            plan.housing
        );
        plan
    }

    /// Monthly take-home pay at the current age minus monthly expenses.
    pub fn monthly_balance(&self) -> f64 {
        let head = self.head_net_income * self.income_curve.multiplier(self.current_age) / 12.0;
        let partner = self
            .second_earner
            .as_ref()
            .map(|earner| earner.net_income / 12.0)
            .unwrap_or(0.0);
        head + partner - self.monthly_expenses
    }

    pub fn sale_has_happened_by(&self, age: u32) -> bool {
        self.sale.is_some_and(|sale| age >= sale.age)
    }
}

/// The automatic policy also stops at the first income-decline onset when that
/// falls inside the horizon and after today.
fn contribution_stop_age(
    policy: &ContributionStopPolicy,
    curve: &IncomeCurve,
    current_age: u32,
    retirement_age: u32,
) -> u32 {
    match policy {
        ContributionStopPolicy::Manual { stop_age } => or_fallback(*stop_age, retirement_age),
        ContributionStopPolicy::Automatic => {
            let first_onset = curve.first().onset_age;
            if curve.is_enabled() && first_onset <= HORIZON_AGE && first_onset > current_age {
                retirement_age.min(first_onset)
            } else {
                retirement_age
            }
        }
    }
}

fn resolve_sale(sale: Option<&HomeSale>, current_age: u32) -> Option<SalePlan> {
    sale.map(|sale| SalePlan {
        age: or_fallback(sale.age, DEFAULT_SALE_AGE).max(current_age.saturating_add(1)),
        price: non_negative(sale.price),
        relocation_cost: non_negative(sale.relocation_cost),
        annual_rent: non_negative(sale.monthly_rent) * 12.0,
    })
}

fn resolve_housing(housing: &Housing, current_age: u32) -> (HousingPlan, Option<SalePlan>) {
    match housing {
        Housing::None => (HousingPlan::None, None),
        Housing::PlannedPurchase(purchase) => {
            if purchase.purchase_age == 0 || purchase.purchase_age > HORIZON_AGE {
                return (HousingPlan::None, None);
            }
            let down_payment = non_negative(purchase.down_payment);
            let loan_years = or_fallback(purchase.loan_years, DEFAULT_LOAN_YEARS);
            let rate = purchase.loan_rate_percent.unwrap_or(DEFAULT_LOAN_RATE_PERCENT);
            let principal = non_negative(purchase.price - down_payment);
            (
                HousingPlan::Planned {
                    purchase_age: purchase.purchase_age,
                    down_payment,
                    annual_payment: annual_payment(principal, loan_years, rate),
                    loan_end_age: purchase.purchase_age.saturating_add(loan_years),
                },
                resolve_sale(purchase.sale.as_ref(), current_age),
            )
        }
        Housing::ExistingLoan(loan) => {
            let rate = loan.rate_percent.unwrap_or(0.0);
            (
                HousingPlan::Existing {
                    annual_payment: annual_payment(
                        non_negative(loan.balance),
                        loan.remaining_years,
                        rate,
                    ),
                    loan_end_age: current_age.saturating_add(loan.remaining_years),
                },
                resolve_sale(loan.sale.as_ref(), current_age),
            )
        }
    }
}

fn resolve_care(
    care: Option<&CareEvent>,
    default_onset: u32,
    current_age: u32,
) -> Option<CarePlan> {
    care.map(|care| CarePlan {
        onset_age: or_fallback(care.onset_age, default_onset).max(current_age),
        annual_cost: non_negative(care.total_cost) / f64::from(CARE_SPREAD_YEARS),
    })
}
