//! Transaction and split types
//!
//! A transaction is a dated set of splits, each moving a signed value into
//! one account. Values are signed directly (no debit/credit flag); a
//! transaction is balanced when its split values sum to exactly zero.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{
    AccountId, DecimalError, ExactDecimal, FinancialIdentifier, InvoiceId, SplitId, TransactionId,
};

/// A single split (line) of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub id: SplitId,
    /// Account the value is booked to
    pub account_id: AccountId,
    /// Signed value in the transaction currency
    pub value: ExactDecimal,
    pub memo: String,
    /// Short action label, e.g. "Invoice"
    pub action: String,
}

impl Split {
    /// Creates a split booking `value` to `account_id`
    pub fn new(account_id: AccountId, value: ExactDecimal) -> Self {
        Self {
            id: SplitId::new_v7(),
            account_id,
            value,
            memo: String::new(),
            action: String::new(),
        }
    }

    /// Adds a memo to the split
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Adds an action label to the split
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }
}

/// A financial transaction consisting of multiple splits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Currency every split value is denominated in
    pub currency: FinancialIdentifier,
    pub date_entered: DateTime<Utc>,
    pub date_posted: NaiveDate,
    /// Transaction number, e.g. the invoice id
    pub num: String,
    pub description: String,
    /// Document this transaction posts, if any
    pub document_id: Option<InvoiceId>,
    pub splits: Vec<Split>,
}

impl Transaction {
    /// Creates a new transaction without splits
    ///
    /// # Arguments
    ///
    /// * `currency` - Transaction currency
    /// * `date_posted` - Accounting date
    /// * `description` - Description of the transaction
    pub fn new(
        currency: FinancialIdentifier,
        date_posted: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: TransactionId::new_v7(),
            currency,
            date_entered: Utc::now(),
            date_posted,
            num: String::new(),
            description: description.into(),
            document_id: None,
            splits: Vec::new(),
        }
    }

    /// Sets the transaction number
    pub fn with_num(mut self, num: impl Into<String>) -> Self {
        self.num = num.into();
        self
    }

    /// Links the posted document
    pub fn for_document(mut self, document_id: InvoiceId) -> Self {
        self.document_id = Some(document_id);
        self
    }

    /// Adds a split
    pub fn with_split(mut self, split: Split) -> Self {
        self.splits.push(split);
        self
    }

    /// Sum of all split values
    pub fn balance(&self) -> Result<ExactDecimal, DecimalError> {
        self.splits
            .iter()
            .try_fold(ExactDecimal::ZERO, |acc, split| acc.checked_add(&split.value))
    }

    /// True if the split values sum to exactly zero
    pub fn is_balanced(&self) -> bool {
        self.balance().map_or(false, |balance| balance.is_zero())
    }

    /// Splits booked to `account_id`
    pub fn splits_for<'a>(&'a self, account_id: &'a AccountId) -> impl Iterator<Item = &'a Split> + 'a {
        self.splits.iter().filter(move |split| split.account_id == *account_id)
    }
}
