//! Scenario execution and reporting

use crate::config::{display_identity, parse_identity, Action, Scenario, ScenarioError};
use crate::ledger::{Ledger, LedgerError};
use cpamm_common::PoolOp;
use cpamm_program::{InitializeParams, PoolDelta, PoolState, Transition};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeltaReport {
    pub x_in: u64,
    pub x_out: u64,
    pub y_in: u64,
    pub y_out: u64,
    pub lp_minted: u64,
    pub lp_burned: u64,
}

impl From<&PoolDelta> for DeltaReport {
    fn from(d: &PoolDelta) -> Self {
        Self {
            x_in: d.x_in,
            x_out: d.x_out,
            y_in: d.y_in,
            y_out: d.y_out,
            lp_minted: d.lp_minted,
            lp_burned: d.lp_burned,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub pool: u64,
    pub caller: String,
    pub op: String,
    /// "ok" or the error name
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<DeltaReport>,
    /// Outcome equals the step's expectation
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolReport {
    pub seed: u64,
    pub fee_bps: u16,
    pub locked: bool,
    pub seqno: u64,
    pub reserve_x: u64,
    pub reserve_y: u64,
    pub lp_supply: u64,
    /// Y per X, 1e6 scale
    pub spot_price: u64,
}

impl TryFrom<&PoolState> for PoolReport {
    type Error = ScenarioError;

    fn try_from(p: &PoolState) -> Result<Self, Self::Error> {
        let spot_price = p
            .spot_price_x_in_y()
            .map_err(|error| ScenarioError::Report {
                seed: p.seed(),
                error,
            })?;
        Ok(Self {
            seed: p.seed(),
            fee_bps: p.config.fee_bps,
            locked: p.config.is_locked(),
            seqno: p.seqno,
            reserve_x: p.reserve_x(),
            reserve_y: p.reserve_y(),
            lp_supply: p.lp_supply(),
            spot_price,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub steps: Vec<StepReport>,
    pub pools: Vec<PoolReport>,
}

impl Report {
    pub fn mismatches(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|s| !s.matched)
    }
}

fn op_name(action: &Action) -> &'static str {
    let op = match action {
        Action::Deposit { .. } => PoolOp::Deposit,
        Action::Withdraw { .. } => PoolOp::Withdraw,
        Action::Swap { .. } => PoolOp::Swap,
        Action::Lock => PoolOp::Lock,
        Action::Unlock => PoolOp::Unlock,
    };
    op.name()
}

/// Build the ledger from the scenario's pools and funding
pub fn setup(scenario: &Scenario) -> Result<Ledger, ScenarioError> {
    let mut ledger = Ledger::new();

    for spec in &scenario.pools {
        let params = InitializeParams {
            seed: spec.seed,
            fee_bps: spec.fee_bps,
            authority: spec.authority.as_deref().map(parse_identity).transpose()?,
            mint_x: parse_identity(&spec.mint_x)?,
            mint_y: parse_identity(&spec.mint_y)?,
            bump: 0,
            lp_bump: 0,
        };
        ledger
            .create_pool(&params)
            .map_err(|source| ScenarioError::Setup {
                seed: spec.seed,
                source,
            })?;
    }

    for funding in &scenario.funding {
        let owner = parse_identity(&funding.owner)?;
        let mint = parse_identity(&funding.mint)?;
        ledger
            .fund(owner, mint, funding.amount)
            .map_err(|source| ScenarioError::Funding {
                owner: funding.owner.clone(),
                mint: funding.mint.clone(),
                source,
            })?;
    }

    Ok(ledger)
}

/// Run every step; failing steps are recorded, not fatal
pub fn run(scenario: &Scenario) -> Result<(Ledger, Report), ScenarioError> {
    let mut ledger = setup(scenario)?;
    let mut steps = Vec::with_capacity(scenario.steps.len());

    for (index, step) in scenario.steps.iter().enumerate() {
        let caller = parse_identity(&step.caller)?;
        let result: Result<Transition, LedgerError> = match step.action {
            Action::Deposit {
                lp_amount,
                max_x,
                max_y,
            } => ledger.deposit(step.pool, &caller, lp_amount, max_x, max_y),
            Action::Withdraw {
                lp_amount,
                min_x,
                min_y,
            } => ledger.withdraw(step.pool, &caller, lp_amount, min_x, min_y),
            Action::Swap {
                amount_in,
                direction,
                min_out,
            } => ledger.swap(step.pool, &caller, amount_in, direction.into(), min_out),
            Action::Lock => ledger.lock(step.pool, &caller),
            Action::Unlock => ledger.unlock(step.pool, &caller),
        };

        let (outcome, delta) = match &result {
            Ok(t) => ("ok".to_string(), Some(DeltaReport::from(&t.delta))),
            Err(e) => (e.name(), None),
        };
        let matched = match &step.expect {
            Some(expected) => *expected == outcome,
            None => result.is_ok(),
        };

        match &result {
            Ok(_) => log::info!(
                "step {}: {} on pool {} by {} ok",
                index,
                op_name(&step.action),
                step.pool,
                step.caller
            ),
            Err(e) if matched => log::info!(
                "step {}: {} on pool {} rejected as expected: {}",
                index,
                op_name(&step.action),
                step.pool,
                e
            ),
            Err(LedgerError::Pool(e)) if e.is_recoverable() => log::warn!(
                "step {}: {} on pool {} failed: {}",
                index,
                op_name(&step.action),
                step.pool,
                e
            ),
            Err(e) => log::error!(
                "step {}: {} on pool {} failed: {}",
                index,
                op_name(&step.action),
                step.pool,
                e
            ),
        }

        steps.push(StepReport {
            index,
            pool: step.pool,
            caller: display_identity(&caller),
            op: op_name(&step.action).to_string(),
            outcome,
            delta,
            matched,
        });
    }

    let pools = ledger
        .registry()
        .iter()
        .map(PoolReport::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((ledger, Report { steps, pools }))
}
