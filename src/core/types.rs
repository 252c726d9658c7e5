use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EducationTrack {
    #[default]
    #[serde(alias = "allPublic", alias = "all_public")]
    AllPublic,
    #[serde(alias = "highPrivate", alias = "high_private")]
    HighPrivate,
    #[serde(alias = "middlePrivate", alias = "middle_private")]
    MiddlePrivate,
    Custom,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dependent {
    #[serde(deserialize_with = "lenient::age")]
    pub age: u32,
    pub track: EducationTrack,
    /// Used only when `track` is [`EducationTrack::Custom`].
    #[serde(deserialize_with = "lenient::amount")]
    pub manual_annual_cost: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecondEarner {
    #[serde(deserialize_with = "lenient::age")]
    pub age: u32,
    #[serde(deserialize_with = "lenient::amount")]
    pub gross_income: f64,
    #[serde(deserialize_with = "lenient::opt_age")]
    pub retirement_age: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum ContributionStopPolicy {
    /// Stop at retirement, or earlier at the first income-decline onset.
    #[default]
    Automatic,
    /// Stop at a chosen age; retirement age when unset.
    #[serde(rename_all = "camelCase")]
    Manual {
        #[serde(default, deserialize_with = "lenient::opt_age")]
        stop_age: Option<u32>,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaxAdvantagedContribution {
    #[serde(deserialize_with = "lenient::amount")]
    pub monthly_amount: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HomeSale {
    #[serde(deserialize_with = "lenient::opt_age")]
    pub age: Option<u32>,
    #[serde(deserialize_with = "lenient::amount")]
    pub price: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub relocation_cost: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub monthly_rent: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannedPurchase {
    /// Zero or missing disables every housing cash flow.
    #[serde(deserialize_with = "lenient::age")]
    pub purchase_age: u32,
    #[serde(deserialize_with = "lenient::amount")]
    pub price: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub down_payment: f64,
    #[serde(deserialize_with = "lenient::opt_age")]
    pub loan_years: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_amount")]
    pub loan_rate_percent: Option<f64>,
    pub sale: Option<HomeSale>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExistingLoan {
    #[serde(deserialize_with = "lenient::amount")]
    pub balance: f64,
    #[serde(deserialize_with = "lenient::age")]
    pub remaining_years: u32,
    #[serde(deserialize_with = "lenient::opt_amount")]
    pub rate_percent: Option<f64>,
    pub sale: Option<HomeSale>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Housing {
    #[default]
    None,
    PlannedPurchase(PlannedPurchase),
    ExistingLoan(ExistingLoan),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeclineStage {
    #[serde(deserialize_with = "lenient::opt_age")]
    pub onset_age: Option<u32>,
    /// Share of base income kept from the onset, in percent.
    #[serde(deserialize_with = "lenient::opt_amount")]
    pub retention_percent: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncomeDecline {
    pub first: DeclineStage,
    pub second: DeclineStage,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostRetirementWork {
    #[serde(deserialize_with = "lenient::opt_age")]
    pub until_age: Option<u32>,
    #[serde(deserialize_with = "lenient::amount")]
    pub monthly_income: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CareEvent {
    #[serde(deserialize_with = "lenient::opt_age")]
    pub onset_age: Option<u32>,
    #[serde(deserialize_with = "lenient::amount")]
    pub total_cost: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MajorExpense {
    pub label: String,
    #[serde(deserialize_with = "lenient::amount")]
    pub amount: f64,
    #[serde(deserialize_with = "lenient::opt_age")]
    pub target_age: Option<u32>,
    pub enabled: bool,
}

/// Snapshot of a household, as captured by the input wizard.
///
/// All money is in one unit per year or month as named. `investments` is the
/// whole yield-bearing pot and `locked_retirement` the part of it that cannot
/// be touched before the unlock age.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HouseholdState {
    #[serde(deserialize_with = "lenient::opt_age")]
    pub age: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_age")]
    pub retirement_age: Option<u32>,
    pub second_earner: Option<SecondEarner>,
    pub dependents: Vec<Dependent>,

    #[serde(deserialize_with = "lenient::amount")]
    pub cash: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub investments: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub locked_retirement: f64,

    #[serde(deserialize_with = "lenient::amount")]
    pub gross_income: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub monthly_expenses: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub monthly_contribution: f64,
    pub contribution_stop: ContributionStopPolicy,
    pub tax_advantaged_contribution: Option<TaxAdvantagedContribution>,

    #[serde(deserialize_with = "lenient::amount")]
    pub severance_pay: f64,
    #[serde(deserialize_with = "lenient::amount")]
    pub monthly_pension: f64,

    pub housing: Housing,
    pub income_decline: Option<IncomeDecline>,
    pub post_retirement_work: Option<PostRetirementWork>,
    pub elder_care: Option<CareEvent>,
    pub self_care: Option<CareEvent>,
    pub major_expenses: Vec<MajorExpense>,
}

/// Macro-economic assumptions, both in percent per year.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    pub investment_rate: f64,
    pub inflation_rate: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            investment_rate: 3.0,
            inflation_rate: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyDataPoint {
    pub age: u32,
    pub assets: i64,
    pub events: Vec<String>,
    pub is_retirement: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub yearly_data: Vec<YearlyDataPoint>,
    pub current_age: u32,
    pub retirement_age: u32,
    pub assets_at_retirement: i64,
    pub assets_at_80: i64,
    /// Net monthly income minus monthly expenses today, contributions excluded.
    pub monthly_balance: f64,
    pub depletion_age: Option<u32>,
}

/// Unrounded per-tier balances at the end of a simulated year.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshot {
    pub age: u32,
    pub cash: f64,
    pub liquid: f64,
    pub locked: f64,
    pub total: f64,
}
