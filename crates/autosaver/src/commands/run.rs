//! Run command - compare the balance with the budget and offer to save the surplus.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::Result;
use rust_decimal::{Decimal, RoundingStrategy};

use autosaver_bank::{Bank, BankClient, MoneyAmount, SaveResult};
use autosaver_config::ConfigError;

use super::Context;
use crate::budget::{Budget, MonthWindow};
use crate::prompt::{ConsolePrompt, confirm};

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Balance at or below the budget line; nothing offered.
    NoSpareCash,
    /// The user declined the transfer.
    NotConfirmed,
    Saved,
    /// The provider did not accept the deposit.
    Failed(SaveResult),
}

impl Outcome {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Outcome::Failed(_) => ExitCode::FAILURE,
            _ => ExitCode::SUCCESS,
        }
    }
}

/// Run the run command.
pub async fn run(ctx: &Context) -> Result<ExitCode> {
    let loaded = ctx.load_config()?;
    let config = &loaded.config;

    if let Err(ConfigError::NoProvider) = config.provider() {
        println!("Set `use` to either \"starling\" or \"monzo\".");
        return Ok(ExitCode::FAILURE);
    }

    let store = ctx.token_store()?;
    let bank = Bank::from_config(config, &store, &ConsolePrompt).await?;

    let outcome = save_surplus(
        &bank,
        &Budget::from_config(config),
        &MonthWindow::current(),
        &mut io::stdin().lock(),
        &mut io::stdout().lock(),
    )
    .await?;

    tracing::info!(?outcome, "Run finished");
    Ok(outcome.exit_code())
}

/// Check `bank` against the budget and, if the user agrees, move the surplus
/// into the goal.
///
/// Makes at most one `save_to_goal` call.
pub async fn save_surplus(
    bank: &dyn BankClient,
    budget: &Budget,
    window: &MonthWindow,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<Outcome> {
    let balance = bank.get_balance().await?;
    let plan = budget.plan(window, balance);

    writeln!(output, "{} - {}", plan.window.first_day, plan.window.last_day)?;
    writeln!(output, "Current balance: £{}", plan.balance)?;
    writeln!(output, "Spend rate: £{}/day", plan.spend_rate)?;
    writeln!(output, "OK balance for today: £{}", plan.ok_balance)?;

    if !plan.surplus.is_positive() {
        writeln!(
            output,
            "No spare cash. £{} below OK.",
            plan.ok_balance - plan.balance
        )?;
        return Ok(Outcome::NoSpareCash);
    }

    let goal = bank.get_goal_data().await?;
    let prospective = goal.balance + plan.surplus;

    writeln!(
        output,
        "Looks like £{} could be saved into '{}'.",
        plan.surplus, goal.name
    )?;
    writeln!(
        output,
        "Target is £{} - this would get from £{} ({}) to £{} ({}).",
        goal.target,
        goal.balance,
        percent_of(goal.balance, goal.target),
        prospective,
        percent_of(prospective, goal.target),
    )?;

    if !confirm(input, output, "Do this (enter y)? ")? {
        writeln!(output, "No actions taken.")?;
        return Ok(Outcome::NotConfirmed);
    }

    let result = bank.save_to_goal(plan.surplus).await?;
    if result.success {
        writeln!(output, "Done!")?;
        Ok(Outcome::Saved)
    } else {
        writeln!(output, "ERROR")?;
        writeln!(output, "{}", serde_json::to_string_pretty(&result.raw)?)?;
        Ok(Outcome::Failed(result))
    }
}

/// Whole-number percentage of `target`, or `n/a` without a target.
fn percent_of(amount: MoneyAmount, target: MoneyAmount) -> String {
    if target == MoneyAmount::ZERO {
        return "n/a".to_string();
    }
    let percent = (amount.as_decimal() * Decimal::ONE_HUNDRED / target.as_decimal())
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    format!("{}%", percent)
}
