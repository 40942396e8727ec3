//! Test Data Builders
//!
//! Provides builder patterns for constructing books and documents with
//! sensible defaults. These builders allow tests to specify only the relevant
//! fields while using defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{AccountId, BillTermsId, Currency, ExactDecimal, FinancialIdentifier, TaxTableId};
use domain_billing::{Account, AccountType, BillTerms, Book, EntryDraft, InvoiceDocument};
use domain_party::Owner;
use domain_tax::{TaxTable, TaxTableEntry};

use crate::fixtures::{AmountFixtures, CurrencyFixtures, DateFixtures, PartyFixtures};

/// Account ids of the standard chart of accounts
#[derive(Debug, Clone, Copy)]
pub struct StandardAccounts {
    /// `Assets:Bank`
    pub bank: AccountId,
    /// `Assets:Accounts Receivable`
    pub receivable: AccountId,
    /// `Liabilities:Accounts Payable`
    pub payable: AccountId,
    /// `Liabilities:VAT Payable`
    pub tax_payable: AccountId,
    /// `Income:Sales`
    pub income: AccountId,
    /// `Income:Services`
    pub services: AccountId,
    /// `Expenses:Supplies`
    pub expense: AccountId,
}

/// A populated book plus the ids tests refer to
#[derive(Debug, Clone)]
pub struct TestBook {
    pub book: Book,
    pub accounts: StandardAccounts,
    /// Standard VAT table booking to `tax_payable`
    pub vat: TaxTableId,
    /// Reduced VAT table booking to `tax_payable`
    pub reduced_vat: TaxTableId,
    /// Net 14 days terms
    pub net_14: BillTermsId,
}

/// Builder for a book with the standard chart of accounts
pub struct TestBookBuilder {
    currency: Currency,
    vat_rate: ExactDecimal,
    reduced_rate: ExactDecimal,
}

impl Default for TestBookBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBookBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            currency: CurrencyFixtures::eur(),
            vat_rate: AmountFixtures::vat_rate(),
            reduced_rate: AmountFixtures::reduced_rate(),
        }
    }

    /// Sets the book currency
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Sets the standard VAT percentage
    pub fn with_vat_rate(mut self, rate: ExactDecimal) -> Self {
        self.vat_rate = rate;
        self
    }

    /// Sets the reduced VAT percentage
    pub fn with_reduced_rate(mut self, rate: ExactDecimal) -> Self {
        self.reduced_rate = rate;
        self
    }

    /// Builds the book
    pub fn build(self) -> TestBook {
        let mut book = Book::new(self.currency);
        let commodity = FinancialIdentifier::from(self.currency);

        let mut add = |code: &str, name: &str, account_type: AccountType, parent: Option<AccountId>| {
            let mut account = Account::new(AccountId::new(), code, name, account_type, commodity.clone());
            if let Some(parent_id) = parent {
                account = account.with_parent(parent_id);
            } else {
                account = account.placeholder();
            }
            let id = account.id;
            book.add_account(account).unwrap();
            id
        };

        let assets = add("1", "Assets", AccountType::Asset, None);
        let liabilities = add("2", "Liabilities", AccountType::Liability, None);
        let income = add("4", "Income", AccountType::Income, None);
        let expenses = add("6", "Expenses", AccountType::Expense, None);

        let accounts = StandardAccounts {
            bank: add("1000", "Bank", AccountType::Bank, Some(assets)),
            receivable: add("1200", "Accounts Receivable", AccountType::Receivable, Some(assets)),
            payable: add("2000", "Accounts Payable", AccountType::Payable, Some(liabilities)),
            tax_payable: add("2200", "VAT Payable", AccountType::Liability, Some(liabilities)),
            income: add("4000", "Sales", AccountType::Income, Some(income)),
            services: add("4100", "Services", AccountType::Income, Some(income)),
            expense: add("6000", "Supplies", AccountType::Expense, Some(expenses)),
        };

        let vat = TaxTable::new(TaxTableId::new(), "VAT")
            .unwrap()
            .with_entry(TaxTableEntry::new(self.vat_rate, accounts.tax_payable).unwrap());
        let reduced_vat = TaxTable::new(TaxTableId::new(), "Reduced VAT")
            .unwrap()
            .with_entry(TaxTableEntry::new(self.reduced_rate, accounts.tax_payable).unwrap());
        let (vat_id, reduced_id) = (vat.id(), reduced_vat.id());
        book.add_tax_table(vat).unwrap();
        book.add_tax_table(reduced_vat).unwrap();

        let net_14 = BillTerms::days("Net 14", 14, None).unwrap();
        let net_14_id = net_14.id;
        book.add_bill_terms(net_14);

        TestBook {
            book,
            accounts,
            vat: vat_id,
            reduced_vat: reduced_id,
            net_14: net_14_id,
        }
    }
}

/// Builder for invoice documents
pub struct TestInvoiceBuilder {
    owner: Owner,
    currency: Currency,
    date_opened: NaiveDate,
    entries: Vec<EntryDraft>,
    tax_account: Option<AccountId>,
    terms_id: Option<BillTermsId>,
}

impl Default for TestInvoiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestInvoiceBuilder {
    /// Creates a new builder for a customer invoice without entries
    pub fn new() -> Self {
        Self {
            owner: PartyFixtures::customer_owner(),
            currency: CurrencyFixtures::eur(),
            date_opened: DateFixtures::opened(),
            entries: Vec::new(),
            tax_account: None,
            terms_id: None,
        }
    }

    /// Sets the owner, which also decides the document kind
    pub fn for_owner(mut self, owner: Owner) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Adds an entry
    pub fn with_entry(mut self, draft: EntryDraft) -> Self {
        self.entries.push(draft);
        self
    }

    /// Adds an untaxed entry of `quantity` times `unit_price`
    pub fn with_line(self, description: &str, quantity: i64, unit_price: &str) -> Self {
        self.with_entry(EntryDraft::new(
            description,
            ExactDecimal::from_integer(quantity),
            AmountFixtures::parse(unit_price),
        ))
    }

    pub fn with_tax_account(mut self, account_id: AccountId) -> Self {
        self.tax_account = Some(account_id);
        self
    }

    pub fn with_terms(mut self, terms_id: BillTermsId) -> Self {
        self.terms_id = Some(terms_id);
        self
    }

    /// Builds the document, creating every entry in order
    pub fn build(self) -> InvoiceDocument {
        let mut document = InvoiceDocument::new(self.owner, self.currency, self.date_opened).unwrap();
        if let Some(account_id) = self.tax_account {
            document = document.with_tax_account(account_id);
        }
        if let Some(terms_id) = self.terms_id {
            document = document.with_terms(terms_id);
        }
        for draft in self.entries {
            document.create_entry(draft).unwrap();
        }
        document.take_events();
        document
    }
}
