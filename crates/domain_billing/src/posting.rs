//! Document posting
//!
//! Posting turns an invoice document into one balanced transaction:
//!
//! - one split per distinct income/expense account, in the order the
//!   accounts first appear among the entries, carrying the summed net amounts
//! - one split for the aggregated tax, only when the tax is non-zero
//! - exactly one receivable/payable split carrying the negated sum of all
//!   other splits
//!
//! Every account is type-checked against the owner before anything is
//! computed, and nothing is written (book or document) unless the whole
//! posting succeeds.

use chrono::{Days, NaiveDate};
use tracing::{debug, info, instrument, warn};

use core_kernel::{AccountId, ExactDecimal};
use domain_party::{AccountConstraint, OwnerKind};
use domain_tax::TaxTable;

use crate::config::PostingConfig;
use crate::error::BillingError;
use crate::invoice::{Entry, InvoiceDocument, TaxInclusion, TaxSpec};
use crate::ports::BookPort;
use crate::transaction::{Split, Transaction};

/// Accounts and dates chosen when posting a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingRequest {
    /// Default target for entries without their own account
    pub income_expense_account: AccountId,
    /// Account of the closing split
    pub receivable_payable_account: AccountId,
    pub post_date: NaiveDate,
    /// Explicit due date; otherwise derived from terms or configuration
    pub due_date: Option<NaiveDate>,
    /// Memo of the closing split
    pub memo: Option<String>,
}

impl PostingRequest {
    pub fn new(
        income_expense_account: AccountId,
        receivable_payable_account: AccountId,
        post_date: NaiveDate,
    ) -> Self {
        Self {
            income_expense_account,
            receivable_payable_account,
            post_date,
            due_date: None,
            memo: None,
        }
    }

    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}

/// Net and tax parts of one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryAmounts {
    pub net: ExactDecimal,
    pub tax: ExactDecimal,
}

/// Splits an entry's line amount into net and tax.
///
/// `table` must be the table referenced by `TaxSpec::Table`; it is ignored
/// for the other tax specs. Only the table's own entries are applied.
pub fn entry_amounts(entry: &Entry, table: Option<&TaxTable>) -> Result<EntryAmounts, BillingError> {
    let line = entry.line_amount()?;

    let (net, tax) = match (entry.tax, entry.tax_inclusion) {
        (TaxSpec::None, _) => (line, ExactDecimal::ZERO),
        (TaxSpec::Amount(amount), TaxInclusion::Excluded) => (line, amount),
        (TaxSpec::Amount(amount), TaxInclusion::Included) => (line.checked_sub(&amount)?, amount),
        (TaxSpec::Table(id), inclusion) => {
            let table = table.ok_or_else(|| BillingError::tax_table_not_found(id))?;
            match inclusion {
                TaxInclusion::Excluded => (line, table.resolve_amount(&line)?),
                TaxInclusion::Included => {
                    let net = table.net_from_gross(&line)?;
                    (net, line.checked_sub(&net)?)
                }
            }
        }
    };

    Ok(EntryAmounts { net, tax })
}

/// Posts invoice documents into a book
#[derive(Debug, Clone, Default)]
pub struct PostingEngine {
    config: PostingConfig,
}

impl PostingEngine {
    pub fn new(config: PostingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PostingConfig {
        &self.config
    }

    /// Posts `document` into `book`
    ///
    /// On success the transaction is stored in the book, the document is
    /// Posted and a `Posted` event is queued on it. On failure neither the
    /// book nor the document has changed.
    ///
    /// # Errors
    ///
    /// - `AlreadyPosted` if the document was posted before
    /// - `EmptyDocument` if it has no entries
    /// - `AccountNotFound` / `WrongAccountType` if an account is missing or
    ///   does not fit the owner
    /// - `TaxTableNotFound` / `MissingTaxAccount` if tax cannot be booked
    /// - `UnbalancedPosting` if the splits do not sum to zero
    #[instrument(
        skip(self, document, book, request),
        fields(document_id = %document.id(), owner_kind = %document.owner().owner_kind())
    )]
    pub fn post(
        &self,
        document: &mut InvoiceDocument,
        book: &mut dyn BookPort,
        request: &PostingRequest,
    ) -> Result<Transaction, BillingError> {
        let transaction = self.build_transaction(document, &*book, request)?;
        let date_due = self.resolve_due_date(document, &*book, request)?;
        let total = transaction
            .splits
            .last()
            .map(|closing| closing.value.negate())
            .unwrap_or_default();

        let transaction_id = book.insert_transaction(transaction.clone())?;
        document.mark_posted(transaction_id, request.post_date, date_due, total);

        let display_total = self
            .config
            .format_amount(&total)
            .unwrap_or_else(|_| total.to_string());
        info!(%transaction_id, total = %display_total, %date_due, "Document posted");

        Ok(transaction)
    }

    /// Computes the transaction posting would create, without storing it
    pub fn preview(
        &self,
        document: &InvoiceDocument,
        book: &dyn BookPort,
        request: &PostingRequest,
    ) -> Result<Transaction, BillingError> {
        self.build_transaction(document, book, request)
    }

    fn build_transaction(
        &self,
        document: &InvoiceDocument,
        book: &dyn BookPort,
        request: &PostingRequest,
    ) -> Result<Transaction, BillingError> {
        if document.is_posted() {
            warn!(document_id = %document.id(), "Document already posted");
            return Err(BillingError::AlreadyPosted(document.id().to_string()));
        }
        if document.entries().is_empty() {
            return Err(BillingError::EmptyDocument);
        }
        if !book.is_known_currency(document.currency()) {
            return Err(BillingError::UnknownCurrency(document.currency().to_string()));
        }

        let owner = document.owner();
        let target_constraint = owner.resolve_income_expense_constraint();
        let closing_constraint = owner.resolve_receivable_payable_constraint();

        check_account(book, &request.income_expense_account, target_constraint)?;
        check_account(book, &request.receivable_payable_account, closing_constraint)?;
        for entry in document.entries() {
            if let Some(account_id) = &entry.account_id {
                check_account(book, account_id, target_constraint)?;
            }
        }

        let mut targets: Vec<(AccountId, ExactDecimal, String)> = Vec::new();
        let mut tax_total = ExactDecimal::ZERO;
        let mut first_table: Option<&TaxTable> = None;

        for entry in document.entries() {
            let table = match entry.tax {
                TaxSpec::Table(id) => {
                    let table = book
                        .tax_table(&id)
                        .ok_or_else(|| BillingError::tax_table_not_found(id))?;
                    if first_table.is_none() {
                        first_table = Some(table);
                    }
                    Some(table)
                }
                _ => None,
            };
            let amounts = entry_amounts(entry, table)?;
            tax_total = tax_total.checked_add(&amounts.tax)?;

            let account_id = entry.account_id.unwrap_or(request.income_expense_account);
            match targets.iter_mut().find(|(id, _, _)| *id == account_id) {
                Some((_, value, _)) => *value = value.checked_add(&amounts.net)?,
                None => targets.push((account_id, amounts.net, entry.description.clone())),
            }
            debug!(%account_id, net = %amounts.net, tax = %amounts.tax, "Entry accumulated");
        }

        let mut transaction = Transaction::new(
            document.currency().clone(),
            request.post_date,
            format!("{}{}", self.config.transaction_description_prefix, owner.name()),
        )
        .with_num(document.id().to_string())
        .for_document(document.id());

        for (account_id, value, memo) in targets {
            transaction = transaction.with_split(Split::new(account_id, value).with_memo(memo));
        }

        if !tax_total.is_zero() {
            let tax_account = document
                .tax_account()
                .or_else(|| first_table.and_then(|t| t.entries().first()).map(|e| e.account_id()))
                .ok_or(BillingError::MissingTaxAccount)?;
            if book.account(&tax_account).is_none() {
                return Err(BillingError::account_not_found(tax_account));
            }
            transaction = transaction.with_split(
                Split::new(tax_account, tax_total).with_memo(self.config.tax_split_memo.clone()),
            );
        }

        let closing = transaction.balance()?.negate();
        let action = self
            .config
            .receivable_split_action
            .clone()
            .unwrap_or_else(|| closing_action(owner.effective_kind()).to_string());
        transaction = transaction.with_split(
            Split::new(request.receivable_payable_account, closing)
                .with_memo(request.memo.clone().unwrap_or_default())
                .with_action(action),
        );

        let imbalance = transaction.balance()?;
        if !imbalance.is_zero() {
            return Err(BillingError::UnbalancedPosting { imbalance });
        }

        Ok(transaction)
    }

    /// Explicit due date, else the document's terms, else the configured default
    fn resolve_due_date(
        &self,
        document: &InvoiceDocument,
        book: &dyn BookPort,
        request: &PostingRequest,
    ) -> Result<NaiveDate, BillingError> {
        if let Some(due) = request.due_date {
            return Ok(due);
        }
        if let Some(terms_id) = document.terms_id() {
            let terms = book
                .bill_terms(&terms_id)
                .ok_or_else(|| BillingError::BillTermsNotFound(terms_id.to_string()))?;
            return terms.due_date(request.post_date);
        }
        request
            .post_date
            .checked_add_days(Days::new(u64::from(self.config.default_due_days)))
            .ok_or_else(|| BillingError::DateOutOfRange(request.post_date.to_string()))
    }
}

fn check_account(
    book: &dyn BookPort,
    account_id: &AccountId,
    constraint: AccountConstraint,
) -> Result<(), BillingError> {
    let info = book
        .account(account_id)
        .ok_or_else(|| BillingError::account_not_found(account_id))?;
    if !info.account_type.satisfies(constraint) {
        warn!(account = %info.full_name, actual = %info.account_type, expected = %constraint, "Wrong account type");
        return Err(BillingError::WrongAccountType {
            account: info.full_name,
            expected: constraint,
            actual: info.account_type,
        });
    }
    Ok(())
}

fn closing_action(kind: OwnerKind) -> &'static str {
    match kind {
        OwnerKind::Vendor => "Bill",
        _ => "Invoice",
    }
}
