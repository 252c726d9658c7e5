use super::events::EventCalendar;
use super::plan::{HORIZON_AGE, LOCKED_UNLOCK_AGE, Plan, REFERENCE_AGE};
use super::rules::{YEARLY_RULES, Year};
use super::types::{
    BalanceSnapshot, HouseholdState, SimulationParameters, SimulationResult, YearlyDataPoint,
};

/// The three balance tiers carried from one year to the next.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct Balances {
    /// Zero-yield. Stays below zero only while the locked tier is still closed.
    pub cash: f64,
    pub liquid: f64,
    pub locked: f64,
}

#[derive(Copy, Clone, Debug)]
enum Pot {
    Liquid,
    Locked,
}

impl Balances {
    fn opening(plan: &Plan) -> Self {
        Self {
            cash: plan.cash,
            liquid: plan.liquid,
            locked: plan.locked,
        }
    }

    pub fn total(&self) -> f64 {
        self.cash + self.liquid + self.locked
    }

    fn grow(&mut self, factor: f64) {
        self.liquid = (self.liquid * factor).max(0.0);
        self.locked = (self.locked * factor).max(0.0);
    }

    /// Pays a negative cash balance out of the liquid tier, then out of the
    /// locked tier once it has opened.
    fn cover_shortfall(&mut self, age: u32) {
        let sequence: &[Pot] = if age >= LOCKED_UNLOCK_AGE {
            &[Pot::Liquid, Pot::Locked]
        } else {
            &[Pot::Liquid]
        };
        for pot in sequence {
            if self.cash >= 0.0 {
                break;
            }
            let withdrawn = self.withdraw_from_single_pot(*pot, -self.cash);
            self.cash += withdrawn;
        }
    }

    fn withdraw_from_single_pot(&mut self, pot: Pot, shortfall: f64) -> f64 {
        let balance = match pot {
            Pot::Liquid => &mut self.liquid,
            Pot::Locked => &mut self.locked,
        };
        if *balance <= 0.0 {
            return 0.0;
        }
        let x = balance.min(shortfall);
        *balance -= x;
        x
    }

    fn snapshot(&self, age: u32) -> BalanceSnapshot {
        BalanceSnapshot {
            age,
            cash: self.cash,
            liquid: self.liquid,
            locked: self.locked,
            total: self.total(),
        }
    }
}

struct ProjectionOutcome {
    yearly_data: Vec<YearlyDataPoint>,
    assets_at_retirement: f64,
    assets_at_reference: f64,
    depletion_age: Option<u32>,
}

/// Projects a household's total assets for every age from today to the horizon.
pub fn project(state: &HouseholdState, params: &SimulationParameters) -> SimulationResult {
    let plan = Plan::resolve(state);
    let calendar = EventCalendar::build(&plan);
    let outcome = simulate(&plan, &calendar, params, None);

    SimulationResult {
        yearly_data: outcome.yearly_data,
        current_age: plan.current_age,
        retirement_age: plan.retirement_age,
        assets_at_retirement: round_assets(outcome.assets_at_retirement),
        assets_at_80: round_assets(outcome.assets_at_reference),
        monthly_balance: round_half_up(plan.monthly_balance() * 10.0) / 10.0,
        depletion_age: outcome.depletion_age,
    }
}

/// The same projection, reporting the unrounded tiers at the end of each year.
pub fn trace_balances(
    state: &HouseholdState,
    params: &SimulationParameters,
) -> Vec<BalanceSnapshot> {
    let plan = Plan::resolve(state);
    let calendar = EventCalendar::build(&plan);
    let mut trace = Vec::with_capacity(point_count(&plan));
    simulate(&plan, &calendar, params, Some(&mut trace));
    trace
}

fn point_count(plan: &Plan) -> usize {
    (HORIZON_AGE.saturating_sub(plan.current_age) + 1) as usize
}

/// Halves round towards positive infinity, so `-2.5` becomes `-2`.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn round_assets(value: f64) -> i64 {
    round_half_up(value) as i64
}

fn simulate(
    plan: &Plan,
    calendar: &EventCalendar,
    params: &SimulationParameters,
    mut trace: Option<&mut Vec<BalanceSnapshot>>,
) -> ProjectionOutcome {
    let growth = 1.0 + params.investment_rate / 100.0;
    let inflation_rate = params.inflation_rate / 100.0;

    // A traced run reports tiers only, so it skips the labelled points.
    let record_points = trace.is_none();
    let mut balances = Balances::opening(plan);
    let mut yearly_data = Vec::with_capacity(if record_points { point_count(plan) } else { 0 });
    let mut assets_at_retirement = plan.starting_total;
    let mut assets_at_reference = plan.starting_total;
    let mut depletion_age = None;

    if let Some(trace_rows) = trace.as_deref_mut() {
        trace_rows.push(balances.snapshot(plan.current_age));
    } else {
        yearly_data.push(YearlyDataPoint {
            age: plan.current_age,
            assets: round_assets(balances.total()),
            events: Vec::new(),
            is_retirement: false,
        });
    }

    for age in (plan.current_age + 1)..=HORIZON_AGE {
        let elapsed = age - plan.current_age;
        let year = Year {
            age,
            elapsed,
            inflation: (1.0 + inflation_rate).powi(elapsed as i32),
        };

        balances.grow(growth);
        for rule in YEARLY_RULES {
            rule.apply(plan, calendar, year, &mut balances);
        }
        balances.cover_shortfall(age);

        let total = balances.total();
        if total < 0.0 && depletion_age.is_none() {
            depletion_age = Some(age);
        }

        if let Some(trace_rows) = trace.as_deref_mut() {
            trace_rows.push(balances.snapshot(age));
        } else {
            yearly_data.push(YearlyDataPoint {
                age,
                assets: round_assets(total),
                events: calendar.labels_at(age).to_vec(),
                is_retirement: age == plan.retirement_age,
            });
        }

        if age == plan.retirement_age {
            assets_at_retirement = total;
        }
        if age == REFERENCE_AGE {
            assets_at_reference = total;
        }
    }

    log::trace!(
        "projection from {} to {}: depletion {:?}",
        plan.current_age,
        HORIZON_AGE,
        depletion_age
    );

    ProjectionOutcome {
        yearly_data,
        assets_at_retirement,
        assets_at_reference,
        depletion_age,
    }
}
