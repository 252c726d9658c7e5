mod education;
mod engine;
mod events;
mod format;
mod income_curve;
mod lenient;
mod mortgage;
mod net_income;
mod plan;
mod rules;
mod types;

pub use education::annual_cost;
pub use engine::{project, trace_balances};
pub use format::{format_axis_label, format_currency};
pub use income_curve::{IncomeCurve, IncomeStage};
pub use lenient::{parse_age, parse_amount};
pub use mortgage::annual_payment;
pub use net_income::{contribution_tax_credit, net_income};
pub use plan::{HORIZON_AGE, REFERENCE_AGE};
pub use types::{
    BalanceSnapshot, CareEvent, ContributionStopPolicy, DeclineStage, Dependent, EducationTrack,
    ExistingLoan, HomeSale, HouseholdState, Housing, IncomeDecline, MajorExpense, PlannedPurchase,
    PostRetirementWork, SecondEarner, SimulationParameters, SimulationResult,
    TaxAdvantagedContribution, YearlyDataPoint,
};
