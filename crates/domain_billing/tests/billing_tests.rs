//! Posting tests for domain_billing

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal_macros::dec as decimal;

use core_kernel::{AccountId, BillTermsId, ExactDecimal, TaxTableId};
use domain_billing::{
    Account, AccountType, BillTerms, BillingError, BookPort, DocumentEvent, DocumentKind,
    DocumentState, EntryDraft, InvoiceDocument, PostingConfig, PostingEngine, PostingRequest,
    TaxSpec,
};
use domain_party::{AccountConstraint, Owner, PartyError};
use test_utils::{
    assert_account_balance, assert_balanced, assert_decimal_eq, assert_err_variant,
    assert_no_split, assert_single_split, entry_draft_strategy, init_test_logging, AmountFixtures,
    CurrencyFixtures, DateFixtures, PartyFixtures, StandardAccounts, TestBook, TestBookBuilder,
    TestInvoiceBuilder,
};

fn dec(value: &str) -> ExactDecimal {
    AmountFixtures::parse(value)
}

fn line(description: &str, price: &str) -> EntryDraft {
    EntryDraft::new(description, ExactDecimal::ONE, dec(price))
}

fn customer_request(accounts: &StandardAccounts) -> PostingRequest {
    PostingRequest::new(
        accounts.income,
        accounts.receivable,
        DateFixtures::posted(),
    )
}

fn vendor_request(accounts: &StandardAccounts) -> PostingRequest {
    PostingRequest::new(
        accounts.expense,
        accounts.payable,
        DateFixtures::posted(),
    )
}

/// Untaxed, flat-taxed and table-taxed lines of 12.50 each
fn three_line_invoice(test_book: &TestBook) -> InvoiceDocument {
    TestInvoiceBuilder::new()
        .with_entry(line("Consulting", "12.50"))
        .with_entry(line("Travel", "12.50").with_tax(TaxSpec::Amount(AmountFixtures::flat_tax())))
        .with_entry(line("Licence", "12.50").with_tax(TaxSpec::Table(test_book.vat)))
        .build()
}

// ============================================================================
// Customer Invoice Posting
// ============================================================================

mod customer_invoice_tests {
    use super::*;

    #[test]
    fn test_three_lines_post_balanced_transaction() {
        init_test_logging();
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = three_line_invoice(&test_book);
        let request = customer_request(&test_book.accounts);

        let transaction = PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &request)
            .unwrap();

        assert_balanced(&transaction);
        assert_eq!(transaction.splits.len(), 3);

        let income = assert_single_split(&transaction, &test_book.accounts.income);
        assert_decimal_eq(income.value, "37.50");
        assert_eq!(income.memo, "Consulting");

        let tax = assert_single_split(&transaction, &test_book.accounts.tax_payable);
        assert_decimal_eq(tax.value, "3.75");
        assert_eq!(tax.memo, "Tax");

        let receivable = assert_single_split(&transaction, &test_book.accounts.receivable);
        assert_decimal_eq(receivable.value, "-41.25");
        assert_eq!(receivable.action, "Invoice");
        assert_eq!(transaction.splits.last().unwrap().account_id, test_book.accounts.receivable);
    }

    #[test]
    fn test_posting_updates_document_and_book() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = three_line_invoice(&test_book);
        let request = customer_request(&test_book.accounts);

        let transaction = PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &request)
            .unwrap();

        assert!(invoice.is_posted());
        assert!(!invoice.is_modifiable());
        assert_eq!(invoice.posted_transaction(), Some(transaction.id));
        assert_eq!(invoice.date_posted(), Some(DateFixtures::posted()));

        assert_eq!(test_book.book.transaction(&transaction.id), Some(&transaction));
        assert_account_balance(&test_book.book, &test_book.accounts.income, "37.50");
        assert_account_balance(&test_book.book, &test_book.accounts.tax_payable, "3.75");
        assert_account_balance(&test_book.book, &test_book.accounts.receivable, "-41.25");
    }

    #[test]
    fn test_transaction_metadata() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = TestInvoiceBuilder::new().with_line("Widget", 2, "5").build();
        let request = customer_request(&test_book.accounts).with_memo("March services");

        let transaction = PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &request)
            .unwrap();

        assert_eq!(transaction.description, "Acme GmbH");
        assert_eq!(transaction.num, invoice.id().to_string());
        assert_eq!(transaction.document_id, Some(invoice.id()));
        assert_eq!(transaction.date_posted, DateFixtures::posted());
        assert_eq!(transaction.currency, CurrencyFixtures::eur_id());
        assert_eq!(transaction.splits.last().unwrap().memo, "March services");
    }

    #[test]
    fn test_no_tax_split_when_untaxed() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = TestInvoiceBuilder::new().with_line("Widget", 3, "4.10").build();
        let request = customer_request(&test_book.accounts);

        let transaction = PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &request)
            .unwrap();

        assert_eq!(transaction.splits.len(), 2);
        assert_no_split(&transaction, &test_book.accounts.tax_payable);
        assert_decimal_eq(transaction.splits[1].value, "-12.30");
    }

    #[test]
    fn test_fractional_quantities_stay_exact() {
        let mut test_book = TestBookBuilder::new().build();
        let third = AmountFixtures::one_third();
        let mut invoice = TestInvoiceBuilder::new()
            .with_entry(EntryDraft::new("Part A", third, dec("10")))
            .with_entry(EntryDraft::new("Part B", third, dec("10")))
            .with_entry(EntryDraft::new("Part C", third, dec("10")))
            .build();
        let request = customer_request(&test_book.accounts);

        let transaction = PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &request)
            .unwrap();

        assert_decimal_eq(transaction.splits[0].value, "10");
        assert_decimal_eq(transaction.splits[1].value, "-10");
    }

    #[test]
    fn test_target_splits_follow_first_appearance() {
        let mut test_book = TestBookBuilder::new().build();
        let services = test_book.accounts.services;
        let mut invoice = TestInvoiceBuilder::new()
            .with_entry(line("Goods", "10"))
            .with_entry(line("Support", "20").with_account(services))
            .with_entry(line("More goods", "5"))
            .build();
        let request = customer_request(&test_book.accounts);

        let transaction = PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &request)
            .unwrap();

        assert_eq!(transaction.splits.len(), 3);
        assert_eq!(transaction.splits[0].account_id, test_book.accounts.income);
        assert_decimal_eq(transaction.splits[0].value, "15");
        assert_eq!(transaction.splits[0].memo, "Goods");
        assert_eq!(transaction.splits[1].account_id, services);
        assert_decimal_eq(transaction.splits[1].value, "20");
        assert_decimal_eq(transaction.splits[2].value, "-35");
    }

    #[test]
    fn test_tables_do_not_inherit_parent_entries() {
        let mut test_book = TestBookBuilder::new().build();
        let child = domain_tax::TaxTable::new(TaxTableId::new(), "Exempt").unwrap().with_parent(test_book.vat);
        let child_id = child.id();
        test_book.book.add_tax_table(child).unwrap();

        let mut invoice = TestInvoiceBuilder::new()
            .with_entry(line("Books", "40").with_tax(TaxSpec::Table(child_id)))
            .build();
        let request = customer_request(&test_book.accounts);

        let transaction = PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &request)
            .unwrap();

        assert_eq!(transaction.splits.len(), 2);
        assert_decimal_eq(transaction.splits[1].value, "-40");
    }
}

// ============================================================================
// Serialization
// ============================================================================

mod serialization_tests {
    use super::*;
    use domain_billing::Transaction;

    #[test]
    fn test_posted_transaction_survives_json() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = three_line_invoice(&test_book);
        let transaction = PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &customer_request(&test_book.accounts))
            .unwrap();

        let json = serde_json::to_string(&transaction).unwrap();
        assert!(json.contains("\"-41.25\""));
        let restored: Transaction = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, transaction);
    }

    #[test]
    fn test_posted_document_keeps_state_but_not_events() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = TestInvoiceBuilder::new().with_line("Goods", 1, "10").build();
        PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &customer_request(&test_book.accounts))
            .unwrap();

        let json = serde_json::to_string(&invoice).unwrap();
        let mut restored: InvoiceDocument = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.state(), invoice.state());
        assert!(restored.take_events().is_empty());
    }

    #[test]
    fn test_gross_total_converts_to_decimal() {
        let test_book = TestBookBuilder::new().build();
        let invoice = three_line_invoice(&test_book);

        let totals = invoice.totals(&test_book.book).unwrap();

        assert_eq!(totals.gross.to_decimal().unwrap(), decimal!(41.25));
    }
}

// ============================================================================
// Rejected Postings
// ============================================================================

mod rejection_tests {
    use super::*;

    #[test]
    fn test_expense_account_rejected_for_customer() {
        init_test_logging();
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = three_line_invoice(&test_book);
        let request = PostingRequest::new(
            test_book.accounts.expense,
            test_book.accounts.receivable,
            DateFixtures::posted(),
        );

        let result = PostingEngine::default().post(&mut invoice, &mut test_book.book, &request);

        match result {
            Err(BillingError::WrongAccountType { account, expected, actual }) => {
                assert_eq!(account, "Expenses:Supplies");
                assert_eq!(expected, AccountConstraint::Income);
                assert_eq!(actual, AccountType::Expense);
            }
            other => panic!("Expected WrongAccountType, got {other:?}"),
        }
        assert_eq!(invoice.state(), &DocumentState::HasEntries);
        assert!(test_book.book.transactions().is_empty());
        assert_account_balance(&test_book.book, &test_book.accounts.receivable, "0");
    }

    #[test]
    fn test_payable_rejected_as_customer_closing_account() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = three_line_invoice(&test_book);
        let request = PostingRequest::new(
            test_book.accounts.income,
            test_book.accounts.payable,
            DateFixtures::posted(),
        );

        assert_err_variant!(
            PostingEngine::default().post(&mut invoice, &mut test_book.book, &request),
            BillingError::WrongAccountType { expected: AccountConstraint::Receivable, .. }
        );
        assert!(!invoice.is_posted());
    }

    #[test]
    fn test_entry_account_override_is_type_checked() {
        let mut test_book = TestBookBuilder::new().build();
        let expense = test_book.accounts.expense;
        let mut invoice = TestInvoiceBuilder::new()
            .with_entry(line("Goods", "10"))
            .with_entry(line("Misfiled", "10").with_account(expense))
            .build();
        let request = customer_request(&test_book.accounts);

        assert_err_variant!(
            PostingEngine::default().post(&mut invoice, &mut test_book.book, &request),
            BillingError::WrongAccountType { actual: AccountType::Expense, .. }
        );
        assert!(test_book.book.transactions().is_empty());
    }

    #[test]
    fn test_unknown_account_rejected() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = three_line_invoice(&test_book);
        let request = PostingRequest::new(
            AccountId::new(),
            test_book.accounts.receivable,
            DateFixtures::posted(),
        );

        assert_err_variant!(
            PostingEngine::default().post(&mut invoice, &mut test_book.book, &request),
            BillingError::AccountNotFound(_)
        );
    }

    #[test]
    fn test_empty_document_rejected() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = TestInvoiceBuilder::new().build();
        let request = customer_request(&test_book.accounts);

        assert_err_variant!(
            PostingEngine::default().post(&mut invoice, &mut test_book.book, &request),
            BillingError::EmptyDocument
        );
        assert_eq!(invoice.state(), &DocumentState::Draft);
    }

    #[test]
    fn test_second_post_rejected_and_first_kept() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = three_line_invoice(&test_book);
        let request = customer_request(&test_book.accounts);
        let engine = PostingEngine::default();

        let first = engine.post(&mut invoice, &mut test_book.book, &request).unwrap();
        let state = invoice.state().clone();
        let result = engine.post(&mut invoice, &mut test_book.book, &request);

        assert!(matches!(result, Err(BillingError::AlreadyPosted(_))));
        assert_eq!(invoice.state(), &state);
        assert_eq!(test_book.book.transactions(), std::slice::from_ref(&first));
        assert_account_balance(&test_book.book, &test_book.accounts.receivable, "-41.25");
    }

    #[test]
    fn test_unknown_tax_table_rejected() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = TestInvoiceBuilder::new()
            .with_entry(line("Goods", "10").with_tax(TaxSpec::Table(TaxTableId::new())))
            .build();
        let request = customer_request(&test_book.accounts);

        assert_err_variant!(
            PostingEngine::default().post(&mut invoice, &mut test_book.book, &request),
            BillingError::TaxTableNotFound(_)
        );
    }

    #[test]
    fn test_document_errors_are_classified() {
        assert!(BillingError::EmptyDocument.is_document_error());
        assert!(BillingError::AlreadyPosted("INV-1".into()).is_document_error());
        assert!(!BillingError::MissingTaxAccount.is_document_error());
    }
}

// ============================================================================
// Tax Handling
// ============================================================================

mod tax_tests {
    use super::*;

    #[test]
    fn test_flat_tax_without_account_is_rejected() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = TestInvoiceBuilder::new()
            .with_entry(line("Goods", "10").with_tax(TaxSpec::Amount(dec("2"))))
            .build();
        let request = customer_request(&test_book.accounts);

        assert_err_variant!(
            PostingEngine::default().post(&mut invoice, &mut test_book.book, &request),
            BillingError::MissingTaxAccount
        );
        assert!(test_book.book.transactions().is_empty());
    }

    #[test]
    fn test_flat_tax_uses_document_tax_account() {
        let mut test_book = TestBookBuilder::new().build();
        let tax_account = test_book.accounts.tax_payable;
        let mut invoice = TestInvoiceBuilder::new()
            .with_tax_account(tax_account)
            .with_entry(line("Goods", "10").with_tax(TaxSpec::Amount(dec("2"))))
            .build();
        let request = customer_request(&test_book.accounts);

        let transaction = PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &request)
            .unwrap();

        assert_decimal_eq(assert_single_split(&transaction, &tax_account).value, "2");
        assert_decimal_eq(transaction.splits[2].value, "-12");
    }

    #[test]
    fn test_document_tax_account_wins_over_table_account() {
        let mut test_book = TestBookBuilder::new().build();
        let collected = Account::new(
            AccountId::new(),
            "2210",
            "VAT Collected",
            AccountType::Liability,
            CurrencyFixtures::eur_id(),
        );
        let collected_id = collected.id;
        test_book.book.add_account(collected).unwrap();

        let mut invoice = TestInvoiceBuilder::new()
            .with_tax_account(collected_id)
            .with_entry(line("Goods", "100").with_tax(TaxSpec::Table(test_book.vat)))
            .build();
        let request = customer_request(&test_book.accounts);

        let transaction = PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &request)
            .unwrap();

        assert_decimal_eq(assert_single_split(&transaction, &collected_id).value, "20");
        assert_no_split(&transaction, &test_book.accounts.tax_payable);
    }

    #[test]
    fn test_taxes_of_several_tables_are_aggregated() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = TestInvoiceBuilder::new()
            .with_entry(line("Standard", "100").with_tax(TaxSpec::Table(test_book.vat)))
            .with_entry(line("Reduced", "100").with_tax(TaxSpec::Table(test_book.reduced_vat)))
            .build();
        let request = customer_request(&test_book.accounts);

        let transaction = PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &request)
            .unwrap();

        let tax = assert_single_split(&transaction, &test_book.accounts.tax_payable);
        assert_decimal_eq(tax.value, "27");
        assert_decimal_eq(transaction.splits.last().unwrap().value, "-227");
    }

    #[test]
    fn test_tax_included_table_extracts_tax() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = TestInvoiceBuilder::new()
            .with_entry(line("Gross priced", "12").with_tax(TaxSpec::Table(test_book.vat)).tax_included())
            .build();
        let request = customer_request(&test_book.accounts);

        let transaction = PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &request)
            .unwrap();

        assert_decimal_eq(transaction.splits[0].value, "10");
        assert_decimal_eq(transaction.splits[1].value, "2");
        assert_decimal_eq(transaction.splits[2].value, "-12");
    }

    #[test]
    fn test_tax_included_flat_amount() {
        let mut test_book = TestBookBuilder::new().build();
        let tax_account = test_book.accounts.tax_payable;
        let mut invoice = TestInvoiceBuilder::new()
            .with_tax_account(tax_account)
            .with_entry(line("Gross priced", "12").with_tax(TaxSpec::Amount(dec("2"))).tax_included())
            .build();

        let totals = invoice.totals(&test_book.book).unwrap();
        assert_decimal_eq(totals.net, "10");
        assert_decimal_eq(totals.tax, "2");
        assert_decimal_eq(totals.gross, "12");

        let request = customer_request(&test_book.accounts);
        let transaction = PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &request)
            .unwrap();
        assert_decimal_eq(transaction.splits[2].value, "-12");
    }

    #[test]
    fn test_totals_match_closing_split() {
        let test_book = TestBookBuilder::new().build();
        let invoice = three_line_invoice(&test_book);

        let totals = invoice.totals(&test_book.book).unwrap();
        let preview = PostingEngine::default()
            .preview(&invoice, &test_book.book, &customer_request(&test_book.accounts))
            .unwrap();

        assert_decimal_eq(totals.gross, "41.25");
        assert_eq!(preview.splits.last().unwrap().value, -totals.gross);
    }
}

// ============================================================================
// Owners
// ============================================================================

mod owner_tests {
    use super::*;

    #[test]
    fn test_vendor_bill_posts_to_expense_and_payable() {
        let mut test_book = TestBookBuilder::new().build();
        let mut bill = TestInvoiceBuilder::new()
            .for_owner(PartyFixtures::vendor_owner())
            .with_entry(line("Paper", "30").with_tax(TaxSpec::Table(test_book.vat)))
            .build();
        let request = vendor_request(&test_book.accounts);

        let transaction = PostingEngine::default()
            .post(&mut bill, &mut test_book.book, &request)
            .unwrap();

        assert_eq!(bill.kind(), DocumentKind::VendorBill);
        assert_decimal_eq(assert_single_split(&transaction, &test_book.accounts.expense).value, "30");
        let payable = assert_single_split(&transaction, &test_book.accounts.payable);
        assert_decimal_eq(payable.value, "-36");
        assert_eq!(payable.action, "Bill");
    }

    #[test]
    fn test_vendor_bill_rejects_income_account() {
        let mut test_book = TestBookBuilder::new().build();
        let mut bill = TestInvoiceBuilder::new()
            .for_owner(PartyFixtures::vendor_owner())
            .with_line("Paper", 1, "30")
            .build();
        let request = customer_request(&test_book.accounts);

        assert_err_variant!(
            PostingEngine::default().post(&mut bill, &mut test_book.book, &request),
            BillingError::WrongAccountType { expected: AccountConstraint::Expense, actual: AccountType::Income, .. }
        );
    }

    #[test]
    fn test_customer_job_posts_like_customer() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = TestInvoiceBuilder::new()
            .for_owner(PartyFixtures::customer_job_owner())
            .with_line("Design", 8, "95")
            .build();
        let request = customer_request(&test_book.accounts);

        let transaction = PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &request)
            .unwrap();

        assert_eq!(invoice.kind(), DocumentKind::JobInvoice);
        assert_eq!(transaction.description, "Website relaunch");
        let receivable = assert_single_split(&transaction, &test_book.accounts.receivable);
        assert_decimal_eq(receivable.value, "-760");
        assert_eq!(receivable.action, "Invoice");
    }

    #[test]
    fn test_vendor_job_posts_like_vendor() {
        let mut test_book = TestBookBuilder::new().build();
        let mut bill = TestInvoiceBuilder::new()
            .for_owner(PartyFixtures::vendor_job_owner())
            .with_line("Shelving", 4, "250")
            .build();

        let wrong = PostingEngine::default().post(&mut bill, &mut test_book.book, &customer_request(&test_book.accounts));
        assert!(matches!(wrong, Err(BillingError::WrongAccountType { .. })));

        let transaction = PostingEngine::default()
            .post(&mut bill, &mut test_book.book, &vendor_request(&test_book.accounts))
            .unwrap();
        assert_eq!(transaction.splits.last().unwrap().action, "Bill");
    }

    #[test]
    fn test_inactive_owner_cannot_open_document() {
        let mut customer = PartyFixtures::customer();
        customer.deactivate();

        let result = InvoiceDocument::new(Owner::from(customer), CurrencyFixtures::eur(), DateFixtures::opened());

        assert!(matches!(result, Err(BillingError::Party(PartyError::InactiveOwner(_)))));
    }
}

// ============================================================================
// Document Lifecycle
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_entries_move_document_between_draft_and_has_entries() {
        let mut invoice = TestInvoiceBuilder::new().build();
        assert_eq!(invoice.state(), &DocumentState::Draft);

        let first = invoice.create_entry(line("Goods", "10")).unwrap();
        let second = invoice.create_entry(line("More goods", "5")).unwrap();
        assert_eq!(invoice.state(), &DocumentState::HasEntries);

        invoice.remove_entry(first).unwrap();
        assert_eq!(invoice.state(), &DocumentState::HasEntries);
        let removed = invoice.remove_entry(second).unwrap();
        assert_eq!(removed.description, "More goods");
        assert_eq!(invoice.state(), &DocumentState::Draft);
    }

    #[test]
    fn test_unknown_entry_cannot_be_removed() {
        let mut invoice = TestInvoiceBuilder::new().with_line("Goods", 1, "10").build();
        assert_err_variant!(
            invoice.remove_entry(core_kernel::EntryId::new()),
            BillingError::EntryNotFound(_)
        );
    }

    #[test]
    fn test_posted_document_rejects_changes() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = TestInvoiceBuilder::new().with_line("Goods", 1, "10").build();
        let entry_id = invoice.entries()[0].id;
        PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &customer_request(&test_book.accounts))
            .unwrap();

        assert_err_variant!(invoice.create_entry(line("Late", "1")), BillingError::NotModifiable(_));
        assert_err_variant!(invoice.remove_entry(entry_id), BillingError::NotModifiable(_));
        assert_eq!(invoice.entries().len(), 1);
    }

    #[test]
    fn test_events_are_recorded_and_taken() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = TestInvoiceBuilder::new().build();
        let entry_id = invoice.create_entry(line("Goods", "10")).unwrap();

        let events = invoice.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], DocumentEvent::EntryAdded { entry_id: id, .. } if id == entry_id));
        assert!(invoice.take_events().is_empty());

        let transaction = PostingEngine::default()
            .post(&mut invoice, &mut test_book.book, &customer_request(&test_book.accounts))
            .unwrap();

        let events = invoice.take_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            DocumentEvent::Posted { document_id, transaction_id, total, date_due, .. } => {
                assert_eq!(*document_id, invoice.id());
                assert_eq!(*transaction_id, transaction.id);
                assert_decimal_eq(*total, "10");
                assert_eq!(*date_due, DateFixtures::default_due());
            }
            other => panic!("Expected Posted, got {other:?}"),
        }
    }

    #[test]
    fn test_preview_leaves_book_and_document_unchanged() {
        let test_book = TestBookBuilder::new().build();
        let invoice = three_line_invoice(&test_book);

        let preview = PostingEngine::default()
            .preview(&invoice, &test_book.book, &customer_request(&test_book.accounts))
            .unwrap();

        assert_balanced(&preview);
        assert!(test_book.book.transactions().is_empty());
        assert_eq!(invoice.state(), &DocumentState::HasEntries);
    }

    #[test]
    fn test_preview_of_posted_document_fails() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = three_line_invoice(&test_book);
        let engine = PostingEngine::default();
        engine.post(&mut invoice, &mut test_book.book, &customer_request(&test_book.accounts)).unwrap();

        assert_err_variant!(
            engine.preview(&invoice, &test_book.book, &customer_request(&test_book.accounts)),
            BillingError::AlreadyPosted(_)
        );
    }
}

// ============================================================================
// Due Dates
// ============================================================================

mod due_date_tests {
    use super::*;

    fn post_with(test_book: &mut TestBook, invoice: &mut InvoiceDocument, request: &PostingRequest) -> NaiveDate {
        PostingEngine::default().post(invoice, &mut test_book.book, request).unwrap();
        invoice.date_due().unwrap()
    }

    #[test]
    fn test_explicit_due_date_wins() {
        let mut test_book = TestBookBuilder::new().build();
        let due = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut invoice = TestInvoiceBuilder::new()
            .with_terms(test_book.net_14)
            .with_line("Goods", 1, "10")
            .build();
        let request = customer_request(&test_book.accounts).due(due);

        assert_eq!(post_with(&mut test_book, &mut invoice, &request), due);
    }

    #[test]
    fn test_document_terms_give_due_date() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = TestInvoiceBuilder::new()
            .with_terms(test_book.net_14)
            .with_line("Goods", 1, "10")
            .build();
        let request = customer_request(&test_book.accounts);

        assert_eq!(
            post_with(&mut test_book, &mut invoice, &request),
            NaiveDate::from_ymd_opt(2024, 3, 29).unwrap()
        );
    }

    #[test]
    fn test_owner_terms_copied_to_document() {
        let mut test_book = TestBookBuilder::new().build();
        let proximo = BillTerms::proximo("10th next month", 10, 25, None).unwrap();
        let proximo_id = proximo.id;
        test_book.book.add_bill_terms(proximo);

        let customer = PartyFixtures::customer().with_terms(proximo_id);
        let mut invoice = TestInvoiceBuilder::new()
            .for_owner(Owner::from(customer))
            .with_line("Goods", 1, "10")
            .build();
        assert_eq!(invoice.terms_id(), Some(proximo_id));
        let request = customer_request(&test_book.accounts);

        assert_eq!(
            post_with(&mut test_book, &mut invoice, &request),
            NaiveDate::from_ymd_opt(2024, 4, 10).unwrap()
        );
    }

    #[test]
    fn test_default_due_days_without_terms() {
        let mut test_book = TestBookBuilder::new().build();
        let mut invoice = TestInvoiceBuilder::new().with_line("Goods", 1, "10").build();
        let request = customer_request(&test_book.accounts);

        assert_eq!(post_with(&mut test_book, &mut invoice, &request), DateFixtures::default_due());
    }

    #[test]
    fn test_unknown_terms_rejected_before_posting() {
        let mut test_book = TestBookBuilder::new().build();
        let missing = BillTermsId::new();
        let mut invoice = TestInvoiceBuilder::new()
            .with_terms(missing)
            .with_line("Goods", 1, "10")
            .build();

        let result = PostingEngine::default().post(
            &mut invoice,
            &mut test_book.book,
            &customer_request(&test_book.accounts),
        );

        assert_eq!(result, Err(BillingError::BillTermsNotFound(missing.to_string())));
        assert_eq!(invoice.state(), &DocumentState::HasEntries);
        assert!(invoice.date_due().is_none());
        assert!(test_book.book.transactions().is_empty());
    }

    #[test]
    fn test_explicit_due_date_skips_terms_lookup() {
        let mut test_book = TestBookBuilder::new().build();
        let due = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut invoice = TestInvoiceBuilder::new()
            .with_terms(BillTermsId::new())
            .with_line("Goods", 1, "10")
            .build();
        let request = customer_request(&test_book.accounts).due(due);

        assert_eq!(post_with(&mut test_book, &mut invoice, &request), due);
    }
}

// ============================================================================
// Configuration
// ============================================================================

mod config_tests {
    use super::*;

    #[test]
    fn test_configured_labels_are_used() {
        let mut test_book = TestBookBuilder::new().build();
        let config = PostingConfig {
            transaction_description_prefix: "Invoice to ".to_string(),
            tax_split_memo: "VAT".to_string(),
            receivable_split_action: Some("Sale".to_string()),
            ..PostingConfig::default()
        };
        let engine = PostingEngine::new(config);
        let mut invoice = three_line_invoice(&test_book);

        let transaction = engine
            .post(&mut invoice, &mut test_book.book, &customer_request(&test_book.accounts))
            .unwrap();

        assert_eq!(transaction.description, "Invoice to Acme GmbH");
        assert_eq!(assert_single_split(&transaction, &test_book.accounts.tax_payable).memo, "VAT");
        assert_eq!(transaction.splits.last().unwrap().action, "Sale");
    }

    #[test]
    fn test_configured_default_due_days() {
        let mut test_book = TestBookBuilder::new().build();
        let engine = PostingEngine::new(PostingConfig {
            default_due_days: 10,
            ..PostingConfig::default()
        });
        let mut invoice = TestInvoiceBuilder::new().with_line("Goods", 1, "10").build();

        engine
            .post(&mut invoice, &mut test_book.book, &customer_request(&test_book.accounts))
            .unwrap();

        assert_eq!(invoice.date_due(), NaiveDate::from_ymd_opt(2024, 3, 25));
    }

    #[test]
    fn test_from_env_reads_prefixed_variables() {
        std::env::set_var("POSTING_TAX_SPLIT_MEMO", "Sales tax");
        std::env::set_var("POSTING_DEFAULT_CURRENCY", "USD");

        let config = PostingConfig::from_env().unwrap();

        assert_eq!(config.tax_split_memo, "Sales tax");
        assert_eq!(config.currency().unwrap(), CurrencyFixtures::usd());
        assert_eq!(config.display_decimal_places, 2);

        std::env::remove_var("POSTING_TAX_SPLIT_MEMO");
        std::env::remove_var("POSTING_DEFAULT_CURRENCY");
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod property_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_posting_always_balances(
            drafts in prop::collection::vec(entry_draft_strategy(TaxTableId::new()), 1..8)
        ) {
            let mut test_book = TestBookBuilder::new().build();
            let mut builder = TestInvoiceBuilder::new().with_tax_account(test_book.accounts.tax_payable);
            for mut draft in drafts {
                if let TaxSpec::Table(_) = draft.tax {
                    draft.tax = TaxSpec::Table(test_book.vat);
                }
                builder = builder.with_entry(draft);
            }
            let mut invoice = builder.build();
            let totals = invoice.totals(&test_book.book).unwrap();

            let transaction = PostingEngine::default()
                .post(&mut invoice, &mut test_book.book, &customer_request(&test_book.accounts))
                .unwrap();

            prop_assert!(transaction.is_balanced());
            prop_assert_eq!(transaction.splits.last().unwrap().value, -totals.gross);

            let book_total = [
                test_book.accounts.income,
                test_book.accounts.tax_payable,
                test_book.accounts.receivable,
            ]
            .iter()
            .map(|id| test_book.book.balance(id).unwrap())
            .sum::<ExactDecimal>();
            prop_assert!(book_total.is_zero());
        }
    }
}
