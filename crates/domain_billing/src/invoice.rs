//! Invoice documents
//!
//! An invoice document (customer invoice, vendor bill or job invoice) is a
//! list of line entries owned by exactly one [`Owner`]. It moves through
//! three states:
//!
//! ```text
//! Draft ──create_entry──▶ HasEntries ──post──▶ Posted
//!   ▲                         │
//!   └──remove last entry──────┘
//! ```
//!
//! Posted is terminal: once a posting transaction exists the document
//! rejects every change. Posting itself lives in [`crate::posting`].

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use core_kernel::{
    AccountId, BillTermsId, Currency, EntryId, ExactDecimal, FinancialIdentifier, InvoiceId,
    TaxTableId, TransactionId,
};
use domain_party::{Owner, OwnerKind, PartyError};

use crate::error::BillingError;
use crate::events::DocumentEvent;
use crate::ports::BookPort;
use crate::posting::entry_amounts;

/// Kind of document, derived from its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    CustomerInvoice,
    VendorBill,
    JobInvoice,
}

impl DocumentKind {
    /// Kind of document an owner receives
    pub fn for_owner(owner: &Owner) -> Self {
        match owner.owner_kind() {
            OwnerKind::Customer => DocumentKind::CustomerInvoice,
            OwnerKind::Vendor => DocumentKind::VendorBill,
            OwnerKind::Job => DocumentKind::JobInvoice,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::CustomerInvoice => "Invoice",
            DocumentKind::VendorBill => "Bill",
            DocumentKind::JobInvoice => "Job Invoice",
        }
    }
}

/// Lifecycle state of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentState {
    /// No entries yet
    Draft,
    /// At least one entry, not posted
    HasEntries,
    /// Posted to the book; terminal
    Posted {
        transaction_id: TransactionId,
        date_posted: NaiveDate,
        date_due: NaiveDate,
    },
}

/// How the tax of an entry is determined; the variants are exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxSpec {
    /// Untaxed
    None,
    /// A flat tax amount for the whole line
    Amount(ExactDecimal),
    /// Tax resolved from a tax table
    Table(TaxTableId),
}

/// Whether the line price already contains the tax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaxInclusion {
    /// Price is net; tax is added on top
    #[default]
    Excluded,
    /// Price is gross; tax is extracted from it
    Included,
}

/// Input for a new entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub description: String,
    /// Overrides the income/expense account chosen at posting
    pub account_id: Option<AccountId>,
    pub quantity: ExactDecimal,
    pub unit_price: ExactDecimal,
    pub tax: TaxSpec,
    pub tax_inclusion: TaxInclusion,
}

impl EntryDraft {
    /// An untaxed entry
    pub fn new(description: impl Into<String>, quantity: ExactDecimal, unit_price: ExactDecimal) -> Self {
        Self {
            description: description.into(),
            account_id: None,
            quantity,
            unit_price,
            tax: TaxSpec::None,
            tax_inclusion: TaxInclusion::Excluded,
        }
    }

    pub fn with_account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn with_tax(mut self, tax: TaxSpec) -> Self {
        self.tax = tax;
        self
    }

    /// Marks the price as tax-inclusive
    pub fn tax_included(mut self) -> Self {
        self.tax_inclusion = TaxInclusion::Included;
        self
    }
}

/// A line entry of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub description: String,
    pub account_id: Option<AccountId>,
    pub quantity: ExactDecimal,
    pub unit_price: ExactDecimal,
    pub tax: TaxSpec,
    pub tax_inclusion: TaxInclusion,
}

impl Entry {
    fn from_draft(draft: EntryDraft) -> Self {
        Self {
            id: EntryId::new_v7(),
            description: draft.description,
            account_id: draft.account_id,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            tax: draft.tax,
            tax_inclusion: draft.tax_inclusion,
        }
    }

    /// `quantity * unit_price`, before any tax handling
    pub fn line_amount(&self) -> Result<ExactDecimal, BillingError> {
        Ok(self.quantity.checked_mul(&self.unit_price)?)
    }
}

/// Net, tax and gross sums of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    pub net: ExactDecimal,
    pub tax: ExactDecimal,
    pub gross: ExactDecimal,
}

/// An invoice, bill or job invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDocument {
    id: InvoiceId,
    kind: DocumentKind,
    owner: Owner,
    currency: FinancialIdentifier,
    date_opened: NaiveDate,
    /// Terms used to derive the due date at posting
    terms_id: Option<BillTermsId>,
    /// Account the aggregated tax is booked to
    tax_account: Option<AccountId>,
    notes: Option<String>,
    entries: Vec<Entry>,
    state: DocumentState,
    /// Domain events to be published
    #[serde(skip)]
    events: Vec<DocumentEvent>,
}

impl InvoiceDocument {
    /// Opens a new document for `owner`
    ///
    /// The document kind follows from the owner, and the owner's default
    /// terms are copied onto the document.
    ///
    /// # Errors
    ///
    /// Returns `Party(InactiveOwner)` for a deactivated owner
    pub fn new(owner: Owner, currency: Currency, date_opened: NaiveDate) -> Result<Self, BillingError> {
        if !owner.is_active() {
            return Err(PartyError::InactiveOwner(owner.name().to_string()).into());
        }

        Ok(Self {
            id: InvoiceId::new_v7(),
            kind: DocumentKind::for_owner(&owner),
            terms_id: owner.default_terms(),
            owner,
            currency: FinancialIdentifier::from(currency),
            date_opened,
            tax_account: None,
            notes: None,
            entries: Vec::new(),
            state: DocumentState::Draft,
            events: Vec::new(),
        })
    }

    pub fn with_terms(mut self, terms_id: BillTermsId) -> Self {
        self.terms_id = Some(terms_id);
        self
    }

    pub fn with_tax_account(mut self, account_id: AccountId) -> Self {
        self.tax_account = Some(account_id);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Returns the document ID
    pub fn id(&self) -> InvoiceId {
        self.id
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn currency(&self) -> &FinancialIdentifier {
        &self.currency
    }

    pub fn date_opened(&self) -> NaiveDate {
        self.date_opened
    }

    pub fn terms_id(&self) -> Option<BillTermsId> {
        self.terms_id
    }

    pub fn tax_account(&self) -> Option<AccountId> {
        self.tax_account
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the entries in insertion order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the current state
    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    /// Checks if entries can still be added or removed
    pub fn is_modifiable(&self) -> bool {
        !self.is_posted()
    }

    pub fn is_posted(&self) -> bool {
        matches!(self.state, DocumentState::Posted { .. })
    }

    /// Transaction created by posting, if posted
    pub fn posted_transaction(&self) -> Option<TransactionId> {
        match self.state {
            DocumentState::Posted { transaction_id, .. } => Some(transaction_id),
            _ => None,
        }
    }

    pub fn date_posted(&self) -> Option<NaiveDate> {
        match self.state {
            DocumentState::Posted { date_posted, .. } => Some(date_posted),
            _ => None,
        }
    }

    pub fn date_due(&self) -> Option<NaiveDate> {
        match self.state {
            DocumentState::Posted { date_due, .. } => Some(date_due),
            _ => None,
        }
    }

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<DocumentEvent> {
        std::mem::take(&mut self.events)
    }

    /// Adds a line entry
    ///
    /// # Errors
    ///
    /// Returns `NotModifiable` once the document is posted
    pub fn create_entry(&mut self, draft: EntryDraft) -> Result<EntryId, BillingError> {
        self.ensure_modifiable()?;

        let entry = Entry::from_draft(draft);
        let entry_id = entry.id;
        self.entries.push(entry);
        self.state = DocumentState::HasEntries;

        self.events.push(DocumentEvent::EntryAdded {
            document_id: self.id,
            entry_id,
            timestamp: Utc::now(),
        });

        Ok(entry_id)
    }

    /// Removes a line entry; removing the last one returns the document to Draft
    ///
    /// # Errors
    ///
    /// - `NotModifiable` once the document is posted
    /// - `EntryNotFound` for an unknown entry
    pub fn remove_entry(&mut self, entry_id: EntryId) -> Result<Entry, BillingError> {
        self.ensure_modifiable()?;

        let position = self
            .entries
            .iter()
            .position(|entry| entry.id == entry_id)
            .ok_or_else(|| BillingError::EntryNotFound(entry_id.to_string()))?;
        let removed = self.entries.remove(position);

        if self.entries.is_empty() {
            self.state = DocumentState::Draft;
        }

        self.events.push(DocumentEvent::EntryRemoved {
            document_id: self.id,
            entry_id,
            timestamp: Utc::now(),
        });

        Ok(removed)
    }

    /// Net, tax and gross sums, resolving tax tables through `book`
    pub fn totals(&self, book: &dyn BookPort) -> Result<DocumentTotals, BillingError> {
        let mut net = ExactDecimal::ZERO;
        let mut tax = ExactDecimal::ZERO;
        for entry in &self.entries {
            let table = match entry.tax {
                TaxSpec::Table(id) => Some(
                    book.tax_table(&id)
                        .ok_or_else(|| BillingError::tax_table_not_found(id))?,
                ),
                _ => None,
            };
            let amounts = entry_amounts(entry, table)?;
            net = net.checked_add(&amounts.net)?;
            tax = tax.checked_add(&amounts.tax)?;
        }
        Ok(DocumentTotals {
            net,
            tax,
            gross: net.checked_add(&tax)?,
        })
    }

    pub(crate) fn mark_posted(
        &mut self,
        transaction_id: TransactionId,
        date_posted: NaiveDate,
        date_due: NaiveDate,
        total: ExactDecimal,
    ) {
        self.state = DocumentState::Posted {
            transaction_id,
            date_posted,
            date_due,
        };
        self.events.push(DocumentEvent::Posted {
            document_id: self.id,
            transaction_id,
            total,
            date_posted,
            date_due,
            timestamp: Utc::now(),
        });
    }

    fn ensure_modifiable(&self) -> Result<(), BillingError> {
        if self.is_modifiable() {
            return Ok(());
        }
        warn!(document_id = %self.id, "Rejected change to posted document");
        Err(BillingError::NotModifiable(self.id.to_string()))
    }
}
