//! Account types for the chart of accounts
//!
//! This module defines the account structure of the book. Account types are
//! the kinds a ledger file knows about; posting rules only ever look at the
//! four income/expense/receivable/payable kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, FinancialIdentifier};
use domain_party::AccountConstraint;

/// Types of accounts in the chart of accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Bank,
    Cash,
    Asset,
    /// Credit card
    Credit,
    Liability,
    Stock,
    Mutual,
    Currency,
    Income,
    Expense,
    Equity,
    /// Accounts receivable (A/R)
    Receivable,
    /// Accounts payable (A/P)
    Payable,
    Trading,
    /// Top of the account tree
    Root,
}

impl AccountType {
    pub const ALL: [AccountType; 15] = [
        AccountType::Bank,
        AccountType::Cash,
        AccountType::Asset,
        AccountType::Credit,
        AccountType::Liability,
        AccountType::Stock,
        AccountType::Mutual,
        AccountType::Currency,
        AccountType::Income,
        AccountType::Expense,
        AccountType::Equity,
        AccountType::Receivable,
        AccountType::Payable,
        AccountType::Trading,
        AccountType::Root,
    ];

    /// True if an account of this type may be used where `constraint` applies
    pub fn satisfies(&self, constraint: AccountConstraint) -> bool {
        matches!(
            (self, constraint),
            (AccountType::Income, AccountConstraint::Income)
                | (AccountType::Expense, AccountConstraint::Expense)
                | (AccountType::Receivable, AccountConstraint::Receivable)
                | (AccountType::Payable, AccountConstraint::Payable)
        )
    }

    /// Returns true if this account type has a debit normal balance
    pub fn is_debit_normal(&self) -> bool {
        matches!(
            self,
            AccountType::Bank
                | AccountType::Cash
                | AccountType::Asset
                | AccountType::Stock
                | AccountType::Mutual
                | AccountType::Currency
                | AccountType::Expense
                | AccountType::Receivable
        )
    }

    /// Name used in the ledger file
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Bank => "BANK",
            AccountType::Cash => "CASH",
            AccountType::Asset => "ASSET",
            AccountType::Credit => "CREDIT",
            AccountType::Liability => "LIABILITY",
            AccountType::Stock => "STOCK",
            AccountType::Mutual => "MUTUAL",
            AccountType::Currency => "CURRENCY",
            AccountType::Income => "INCOME",
            AccountType::Expense => "EXPENSE",
            AccountType::Equity => "EQUITY",
            AccountType::Receivable => "RECEIVABLE",
            AccountType::Payable => "PAYABLE",
            AccountType::Trading => "TRADING",
            AccountType::Root => "ROOT",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown account type: {s}"))
    }
}

/// An account in the chart of accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,
    /// Account code (e.g., "4000")
    pub code: String,
    /// Account name, without parent path
    pub name: String,
    pub account_type: AccountType,
    /// Commodity the account is kept in
    pub commodity: FinancialIdentifier,
    /// Parent account ID (for hierarchical charts)
    pub parent_id: Option<AccountId>,
    pub description: Option<String>,
    /// Placeholder accounts only group children
    pub placeholder: bool,
}

impl Account {
    /// Creates a new account
    ///
    /// # Arguments
    ///
    /// * `id` - Unique identifier
    /// * `code` - Account code
    /// * `name` - Account name
    /// * `account_type` - Type of account
    /// * `commodity` - Commodity the account is kept in
    pub fn new(
        id: AccountId,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        commodity: FinancialIdentifier,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            name: name.into(),
            account_type,
            commodity,
            parent_id: None,
            description: None,
            placeholder: false,
        }
    }

    /// Sets the parent account
    pub fn with_parent(mut self, parent_id: AccountId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Marks the account as placeholder
    pub fn placeholder(mut self) -> Self {
        self.placeholder = true;
        self
    }
}

/// What the posting engine needs to know about an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: AccountId,
    pub account_type: AccountType,
    /// Full colon-separated path, e.g. `Income:Consulting`
    pub full_name: String,
    pub commodity: FinancialIdentifier,
}
