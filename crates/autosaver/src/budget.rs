//! The linear monthly budget.
//!
//! The balance allowed to remain on day `d` of an `n`-day month falls in a
//! straight line from `start_month_with` on day 0 to `end_month_with` on day
//! `n`. Anything above that line is spare cash.

use chrono::{Datelike, Days, Local, Months, NaiveDate};
use rust_decimal::Decimal;

use autosaver_bank::MoneyAmount;
use autosaver_config::AutosaverConfig;

/// The calendar month containing `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub today: NaiveDate,
}

impl MonthWindow {
    pub fn containing(today: NaiveDate) -> Self {
        let first_day = today - Days::new(u64::from(today.day0()));
        let last_day = first_day + Months::new(1) - Days::new(1);
        Self {
            first_day,
            last_day,
            today,
        }
    }

    /// The month containing the local date.
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day.day()
    }

    /// Day of the month, starting at 1.
    pub fn day(&self) -> u32 {
        self.today.day()
    }
}

/// Start and end of month balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    pub start_month_with: Decimal,
    pub end_month_with: Decimal,
}

impl Budget {
    pub fn from_config(config: &AutosaverConfig) -> Self {
        Self {
            start_month_with: config.start_month_with,
            end_month_with: config.end_month_with,
        }
    }

    /// Change in the allowed balance per day. Negative when spending.
    pub fn gradient(&self, days_in_month: u32) -> Decimal {
        (self.end_month_with - self.start_month_with) / Decimal::from(days_in_month)
    }

    /// Balance allowed on `day`, rounded half-to-even to the penny.
    pub fn ok_balance(&self, day: u32, days_in_month: u32) -> MoneyAmount {
        MoneyAmount::from_decimal(
            self.gradient(days_in_month) * Decimal::from(day) + self.start_month_with,
        )
    }

    /// Work out where `balance` stands against the budget for `window`.
    pub fn plan(&self, window: &MonthWindow, balance: MoneyAmount) -> Plan {
        let days = window.days_in_month();
        let ok_balance = self.ok_balance(window.day(), days);
        Plan {
            window: *window,
            balance,
            spend_rate: MoneyAmount::from_decimal(-self.gradient(days)),
            ok_balance,
            surplus: balance - ok_balance,
        }
    }
}

/// One day's position against the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub window: MonthWindow,
    pub balance: MoneyAmount,
    /// Spend allowed per day.
    pub spend_rate: MoneyAmount,
    pub ok_balance: MoneyAmount,
    /// `balance - ok_balance`; only a positive surplus can be saved.
    pub surplus: MoneyAmount,
}
