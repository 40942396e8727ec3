//! Bill terms
//!
//! Terms decide when a posted document falls due and until when an early
//! payment discount applies. Two shapes exist: a fixed number of days after
//! posting, or a day in a following month ("proximo").

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use core_kernel::{BillTermsId, ExactDecimal};

use crate::error::BillingError;

/// How due and discount dates are computed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermsKind {
    /// Due `due_days` after the post date
    Days {
        due_days: u32,
        discount_days: Option<u32>,
        discount: Option<ExactDecimal>,
    },
    /// Due on `due_day` of the next month, or the month after when posted
    /// after `cutoff_day`
    Proximo {
        due_day: u32,
        cutoff_day: u32,
        discount_day: Option<u32>,
        discount: Option<ExactDecimal>,
    },
}

/// Named payment terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillTerms {
    pub id: BillTermsId,
    pub name: String,
    pub description: Option<String>,
    pub kind: TermsKind,
}

impl BillTerms {
    /// Terms due a number of days after posting
    ///
    /// # Errors
    ///
    /// Returns `InvalidTerms` when the discount period exceeds the due period
    /// or the discount percentage is outside 0..=100
    pub fn days(
        name: impl Into<String>,
        due_days: u32,
        discount: Option<(u32, ExactDecimal)>,
    ) -> Result<Self, BillingError> {
        if let Some((discount_days, pct)) = discount {
            if discount_days > due_days {
                return Err(BillingError::InvalidTerms(format!(
                    "discount period {discount_days} exceeds due period {due_days}"
                )));
            }
            check_discount(&pct)?;
        }
        Ok(Self {
            id: BillTermsId::new_v7(),
            name: name.into(),
            description: None,
            kind: TermsKind::Days {
                due_days,
                discount_days: discount.map(|(days, _)| days),
                discount: discount.map(|(_, pct)| pct),
            },
        })
    }

    /// Terms due on a day of a following month
    ///
    /// A `cutoff_day` of 0 means documents are never pushed to the month
    /// after next.
    pub fn proximo(
        name: impl Into<String>,
        due_day: u32,
        cutoff_day: u32,
        discount: Option<(u32, ExactDecimal)>,
    ) -> Result<Self, BillingError> {
        if !(1..=31).contains(&due_day) || cutoff_day > 31 {
            return Err(BillingError::InvalidTerms(format!(
                "due day {due_day} / cutoff day {cutoff_day} out of range"
            )));
        }
        if let Some((discount_day, pct)) = discount {
            if !(1..=31).contains(&discount_day) {
                return Err(BillingError::InvalidTerms(format!(
                    "discount day {discount_day} out of range"
                )));
            }
            check_discount(&pct)?;
        }
        Ok(Self {
            id: BillTermsId::new_v7(),
            name: name.into(),
            description: None,
            kind: TermsKind::Proximo {
                due_day,
                cutoff_day,
                discount_day: discount.map(|(day, _)| day),
                discount: discount.map(|(_, pct)| pct),
            },
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Date a document posted on `post_date` falls due
    pub fn due_date(&self, post_date: NaiveDate) -> Result<NaiveDate, BillingError> {
        match &self.kind {
            TermsKind::Days { due_days, .. } => add_days(post_date, *due_days),
            TermsKind::Proximo { due_day, cutoff_day, .. } => {
                proximo_date(post_date, *cutoff_day, *due_day)
            }
        }
    }

    /// Last date the early payment discount applies, if the terms grant one
    pub fn discount_date(&self, post_date: NaiveDate) -> Result<Option<NaiveDate>, BillingError> {
        match &self.kind {
            TermsKind::Days { discount_days, .. } => discount_days
                .map(|days| add_days(post_date, days))
                .transpose(),
            TermsKind::Proximo { discount_day, cutoff_day, .. } => discount_day
                .map(|day| proximo_date(post_date, *cutoff_day, day))
                .transpose(),
        }
    }

    /// Discount percentage granted for early payment
    pub fn discount(&self) -> Option<ExactDecimal> {
        match &self.kind {
            TermsKind::Days { discount, .. } | TermsKind::Proximo { discount, .. } => *discount,
        }
    }
}

fn check_discount(pct: &ExactDecimal) -> Result<(), BillingError> {
    if pct.is_negative() || *pct > ExactDecimal::from_integer(100) {
        return Err(BillingError::InvalidTerms(format!("discount {pct} outside 0..=100")));
    }
    Ok(())
}

fn add_days(date: NaiveDate, days: u32) -> Result<NaiveDate, BillingError> {
    date.checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| BillingError::DateOutOfRange(format!("{date} + {days} days")))
}

/// `day` of the month after `post_date`, or the month after that when
/// `post_date` lies past `cutoff_day`; clamped to the month's last day
fn proximo_date(post_date: NaiveDate, cutoff_day: u32, day: u32) -> Result<NaiveDate, BillingError> {
    let out_of_range = || BillingError::DateOutOfRange(format!("proximo of {post_date}"));

    let months_ahead = if cutoff_day > 0 && post_date.day() > cutoff_day { 2 } else { 1 };
    let first = post_date
        .with_day(1)
        .and_then(|d| d.checked_add_months(Months::new(months_ahead)))
        .ok_or_else(out_of_range)?;
    let last_day = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(out_of_range)?
        .day();

    first.with_day(day.min(last_day)).ok_or_else(out_of_range)
}
