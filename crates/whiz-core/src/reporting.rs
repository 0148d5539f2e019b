//! # Sales Reporting
//!
//! Period-bucketed aggregation of transaction totals for the dashboard
//! sales chart.
//!
//! ## Bucketing Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Report Periods                                     │
//! │                                                                         │
//! │  Today  → 24 hourly buckets    "00:00" .. "23:00"                      │
//! │  Week   →  7 daily buckets     "Mon" "Tue" ..   (last 7 days)          │
//! │  Month  → 30 daily buckets     "Jul 8" "Jul 9" .. (last 30 days)       │
//! │  Year   → 12 monthly buckets   "Jan" .. "Dec"   (current year)         │
//! │                                                                         │
//! │  Buckets are always emitted in full: empty buckets carry zero, and     │
//! │  buckets past "now" (today's later hours, this year's later months)    │
//! │  appear in the series as zeros.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transactions outside the period's window are ignored, so the sum of
//! the series always equals the sum of the in-window inputs.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Period
// =============================================================================

/// Reporting period selector for the dashboard chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Today,
    Week,
    Month,
    Year,
}

impl Default for ReportPeriod {
    /// The dashboard opens on the weekly view.
    fn default() -> Self {
        ReportPeriod::Week
    }
}

impl ReportPeriod {
    /// Fixed number of buckets this period produces.
    pub const fn bucket_count(&self) -> usize {
        match self {
            ReportPeriod::Today => 24,
            ReportPeriod::Week => 7,
            ReportPeriod::Month => 30,
            ReportPeriod::Year => 12,
        }
    }

    /// Inclusive start of the period's window, given the current instant.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        let start_day = match self {
            ReportPeriod::Today => today,
            ReportPeriod::Week => today - Days::new(6),
            ReportPeriod::Month => today - Days::new(29),
            ReportPeriod::Year => NaiveDate::from_ymd_opt(now.year(), 1, 1)
                .unwrap_or(today),
        };
        start_of_day(start_day)
    }

    /// Exclusive end of the period's window.
    ///
    /// Today and Year extend past "now" so that future buckets exist
    /// (and stay zero); Week and Month end at the end of the current day.
    pub fn window_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        match self {
            ReportPeriod::Year => start_of_day(
                NaiveDate::from_ymd_opt(now.year() + 1, 1, 1).unwrap_or(today),
            ),
            _ => start_of_day(today + Days::new(1)),
        }
    }
}

impl std::str::FromStr for ReportPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "today" => Ok(ReportPeriod::Today),
            "week" => Ok(ReportPeriod::Week),
            "month" => Ok(ReportPeriod::Month),
            "year" => Ok(ReportPeriod::Year),
            other => Err(format!("unknown report period: {other}")),
        }
    }
}

// =============================================================================
// Series
// =============================================================================

/// A timestamped transaction total, the bucketer's input unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleTotal {
    pub occurred_at: DateTime<Utc>,
    pub amount: Money,
}

/// An ordered label/value series for the dashboard chart.
///
/// `labels` and `values` are parallel arrays of the period's fixed
/// bucket count, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSeries {
    pub labels: Vec<String>,
    pub values: Vec<Money>,
}

impl SalesSeries {
    /// Sum of all bucket values.
    pub fn total(&self) -> Money {
        self.values.iter().copied().sum()
    }
}

// =============================================================================
// Bucketer
// =============================================================================

/// Groups transaction totals into the period's fixed buckets.
///
/// Produces a chronological label/value series with zero-fill for empty
/// buckets. Inputs outside the period's window are ignored.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use whiz_core::money::Money;
/// use whiz_core::reporting::{bucket_sales, ReportPeriod, SaleTotal};
///
/// let now = Utc.with_ymd_and_hms(2026, 8, 6, 14, 30, 0).unwrap();
/// let sales = vec![SaleTotal {
///     occurred_at: Utc.with_ymd_and_hms(2026, 8, 6, 9, 15, 0).unwrap(),
///     amount: Money::from_cents(25000),
/// }];
///
/// let series = bucket_sales(ReportPeriod::Today, now, &sales);
/// assert_eq!(series.labels.len(), 24);
/// assert_eq!(series.values[9].cents(), 25000);
/// ```
pub fn bucket_sales(period: ReportPeriod, now: DateTime<Utc>, sales: &[SaleTotal]) -> SalesSeries {
    let mut labels = Vec::with_capacity(period.bucket_count());
    let mut values = vec![Money::zero(); period.bucket_count()];
    let today = now.date_naive();

    match period {
        ReportPeriod::Today => {
            for hour in 0..24 {
                labels.push(format!("{hour:02}:00"));
            }
            for sale in in_window(period, now, sales) {
                let idx = sale.occurred_at.hour() as usize;
                values[idx] += sale.amount;
            }
        }

        ReportPeriod::Week | ReportPeriod::Month => {
            let days = period.bucket_count() as u64;
            let start_day = today - Days::new(days - 1);

            for offset in 0..days {
                let day = start_day + Days::new(offset);
                let label = match period {
                    ReportPeriod::Week => day.format("%a").to_string(),
                    _ => format!("{} {}", day.format("%b"), day.day()),
                };
                labels.push(label);
            }
            for sale in in_window(period, now, sales) {
                let idx = (sale.occurred_at.date_naive() - start_day).num_days();
                values[idx as usize] += sale.amount;
            }
        }

        ReportPeriod::Year => {
            const MONTH_NAMES: [&str; 12] = [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ];
            labels.extend(MONTH_NAMES.iter().map(|m| m.to_string()));

            for sale in in_window(period, now, sales) {
                let idx = sale.occurred_at.month0() as usize;
                values[idx] += sale.amount;
            }
        }
    }

    SalesSeries { labels, values }
}

/// Filters inputs to the period's window.
fn in_window<'a>(
    period: ReportPeriod,
    now: DateTime<Utc>,
    sales: &'a [SaleTotal],
) -> impl Iterator<Item = &'a SaleTotal> {
    let start = period.window_start(now);
    let end = period.window_end(now);
    sales
        .iter()
        .filter(move |s| s.occurred_at >= start && s.occurred_at < end)
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

// =============================================================================
// Unit Tests
// =============================================================================
