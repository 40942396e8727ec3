//! In-memory book
//!
//! This module provides an in-memory ledger tree implementing [`BookPort`].
//! It holds the chart of accounts, tax tables, bill terms and every
//! transaction inserted, and keeps running balances per account.
//!
//! # Invariants
//!
//! - Every stored transaction balances to exactly zero
//! - Account balances are always consistent with the stored splits
//! - Stored transactions are never modified

use std::collections::HashMap;

use tracing::{debug, instrument};

use core_kernel::{
    AccountId, BillTermsId, Currency, ExactDecimal, FinancialIdentifier, TaxTableId, TransactionId,
};
use domain_tax::{TaxTable, TaxTableLookup};

use crate::account::{Account, AccountInfo};
use crate::error::BillingError;
use crate::ports::BookPort;
use crate::terms::BillTerms;
use crate::transaction::Transaction;

/// An in-memory book
#[derive(Debug, Clone)]
pub struct Book {
    /// Chart of accounts
    accounts: HashMap<AccountId, Account>,
    tax_tables: HashMap<TaxTableId, TaxTable>,
    terms: HashMap<BillTermsId, BillTerms>,
    transactions: Vec<Transaction>,
    /// Running account balances
    balances: HashMap<AccountId, ExactDecimal>,
    /// Book currency
    currency: Currency,
}

impl Book {
    /// Creates an empty book kept in `currency`
    pub fn new(currency: Currency) -> Self {
        Self {
            accounts: HashMap::new(),
            tax_tables: HashMap::new(),
            terms: HashMap::new(),
            transactions: Vec::new(),
            balances: HashMap::new(),
            currency,
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Adds an account to the chart of accounts
    ///
    /// # Errors
    ///
    /// - `AccountAlreadyExists` if the id is taken
    /// - `AccountNotFound` if the parent is not in the book yet
    pub fn add_account(&mut self, account: Account) -> Result<(), BillingError> {
        if self.accounts.contains_key(&account.id) {
            return Err(BillingError::AccountAlreadyExists(account.id.to_string()));
        }
        if let Some(parent_id) = account.parent_id {
            if !self.accounts.contains_key(&parent_id) {
                return Err(BillingError::account_not_found(parent_id));
            }
        }

        let account_id = account.id;
        self.accounts.insert(account_id, account);
        self.balances.insert(account_id, ExactDecimal::ZERO);

        Ok(())
    }

    /// Adds a tax table
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTaxTable` if another table has the same name
    pub fn add_tax_table(&mut self, table: TaxTable) -> Result<(), BillingError> {
        if self.tax_table_by_name(table.name()).is_some() {
            return Err(BillingError::DuplicateTaxTable(table.name().to_string()));
        }
        self.tax_tables.insert(table.id(), table);
        Ok(())
    }

    /// Adds bill terms
    pub fn add_bill_terms(&mut self, terms: BillTerms) {
        self.terms.insert(terms.id, terms);
    }

    /// Gets an account by ID
    pub fn get_account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// Finds an account by its code
    pub fn account_by_code(&self, code: &str) -> Option<&Account> {
        self.accounts.values().find(|account| account.code == code)
    }

    /// Colon-separated path from the top of the tree, e.g. `Income:Consulting`
    pub fn full_name(&self, id: &AccountId) -> Option<String> {
        let mut names = Vec::new();
        let mut next = Some(*id);
        while let Some(current) = next {
            let account = self.accounts.get(&current)?;
            names.push(account.name.as_str());
            next = account.parent_id;
            if names.len() > self.accounts.len() {
                return None;
            }
        }
        names.reverse();
        Some(names.join(":"))
    }

    /// Gets a stored transaction
    pub fn transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|transaction| transaction.id == *id)
    }

    /// All stored transactions in insertion order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Raw balance of an account: the signed sum of its split values
    pub fn balance(&self, id: &AccountId) -> Option<ExactDecimal> {
        self.balances.get(id).copied()
    }

    /// Balance with the sign flipped for credit-normal accounts, the way
    /// reports show it
    pub fn reported_balance(&self, id: &AccountId) -> Option<ExactDecimal> {
        let account = self.accounts.get(id)?;
        let balance = self.balance(id)?;
        Some(if account.account_type.is_debit_normal() { balance } else { -balance })
    }
}

impl BookPort for Book {
    fn account(&self, id: &AccountId) -> Option<AccountInfo> {
        let account = self.accounts.get(id)?;
        Some(AccountInfo {
            id: account.id,
            account_type: account.account_type,
            full_name: self.full_name(id)?,
            commodity: account.commodity.clone(),
        })
    }

    fn tax_table(&self, id: &TaxTableId) -> Option<&TaxTable> {
        self.tax_tables.get(id)
    }

    fn tax_table_by_name(&self, name: &str) -> Option<&TaxTable> {
        self.tax_tables.values().find(|table| table.name() == name)
    }

    fn bill_terms(&self, id: &BillTermsId) -> Option<&BillTerms> {
        self.terms.get(id)
    }

    fn is_known_currency(&self, currency: &FinancialIdentifier) -> bool {
        currency.is_currency()
    }

    #[instrument(skip(self, transaction), fields(transaction_id = %transaction.id, splits = transaction.splits.len()))]
    fn insert_transaction(&mut self, transaction: Transaction) -> Result<TransactionId, BillingError> {
        for split in &transaction.splits {
            if !self.accounts.contains_key(&split.account_id) {
                return Err(BillingError::account_not_found(split.account_id));
            }
        }

        let imbalance = transaction.balance()?;
        if !imbalance.is_zero() {
            return Err(BillingError::UnbalancedPosting { imbalance });
        }

        // All new balances are computed before any is applied
        let mut updated: HashMap<AccountId, ExactDecimal> = HashMap::new();
        for split in &transaction.splits {
            let current = match updated.get(&split.account_id) {
                Some(value) => *value,
                None => self.balances.get(&split.account_id).copied().unwrap_or_default(),
            };
            updated.insert(split.account_id, current.checked_add(&split.value)?);
        }
        self.balances.extend(updated);

        let transaction_id = transaction.id;
        debug!(description = %transaction.description, "Transaction stored");
        self.transactions.push(transaction);

        Ok(transaction_id)
    }
}

impl TaxTableLookup for Book {
    fn find_tax_table(&self, id: &TaxTableId) -> Option<&TaxTable> {
        self.tax_tables.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountType;
    use crate::transaction::Split;
    use chrono::NaiveDate;

    fn eur() -> Currency {
        Currency::from_code("EUR").unwrap()
    }

    fn setup_book() -> (Book, AccountId, AccountId) {
        let mut book = Book::new(eur());
        let commodity = FinancialIdentifier::from(eur());
        let cash = Account::new(AccountId::new(), "1000", "Cash", AccountType::Cash, commodity.clone());
        let income = Account::new(AccountId::new(), "4000", "Sales", AccountType::Income, commodity);
        let (cash_id, income_id) = (cash.id, income.id);
        book.add_account(cash).unwrap();
        book.add_account(income).unwrap();
        (book, cash_id, income_id)
    }

    #[test]
    fn test_insert_updates_balances() {
        let (mut book, cash, income) = setup_book();
        let amount = ExactDecimal::from_integer(1000);
        let transaction = Transaction::new(eur().into(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), "Sale")
            .with_split(Split::new(cash, amount))
            .with_split(Split::new(income, -amount));

        let id = book.insert_transaction(transaction).unwrap();

        assert!(book.transaction(&id).is_some());
        assert_eq!(book.balance(&cash), Some(amount));
        assert_eq!(book.balance(&income), Some(-amount));
        assert_eq!(book.reported_balance(&income), Some(amount));
    }

    #[test]
    fn test_unbalanced_insert_rejected() {
        let (mut book, cash, _) = setup_book();
        let transaction = Transaction::new(eur().into(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), "Broken")
            .with_split(Split::new(cash, ExactDecimal::ONE));

        let result = book.insert_transaction(transaction);

        assert!(matches!(result, Err(BillingError::UnbalancedPosting { .. })));
        assert!(book.transactions().is_empty());
        assert_eq!(book.balance(&cash), Some(ExactDecimal::ZERO));
    }

    #[test]
    fn test_duplicate_account_rejected() {
        let (mut book, cash, _) = setup_book();
        let duplicate = book.get_account(&cash).unwrap().clone();
        assert!(matches!(book.add_account(duplicate), Err(BillingError::AccountAlreadyExists(_))));
    }
}
