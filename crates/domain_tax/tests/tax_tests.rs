//! Tests for tax tables and parent chain resolution

use std::collections::HashMap;

use core_kernel::{AccountId, ExactDecimal, TaxTableId};
use domain_tax::{ancestors, effective_entries, TaxError, TaxTable, TaxTableEntry};
use proptest::prelude::*;

fn dec(s: &str) -> ExactDecimal {
    ExactDecimal::parse(s).unwrap()
}

fn table_with(name: &str, percentages: &[&str]) -> TaxTable {
    percentages.iter().fold(
        TaxTable::new(TaxTableId::new(), name).unwrap(),
        |table, pct| table.with_entry(TaxTableEntry::new(dec(pct), AccountId::new()).unwrap()),
    )
}

mod resolve_amount {
    use super::*;

    #[test]
    fn test_nineteen_percent_of_hundred_is_exactly_nineteen() {
        let table = table_with("VAT 19", &["19"]);
        let amount = table.resolve_amount(&dec("100")).unwrap();
        assert_eq!(amount, dec("19"));
        assert_eq!(amount.to_canonical_string(), "19");
    }

    #[test]
    fn test_fractional_result_is_exact() {
        let table = table_with("VAT 20", &["20"]);
        assert_eq!(table.resolve_amount(&dec("12.50")).unwrap(), dec("2.5"));

        let table = table_with("Odd", &["7"]);
        assert_eq!(table.resolve_amount(&dec("1/3")).unwrap(), dec("7/300"));
    }

    #[test]
    fn test_multiple_entries_are_summed() {
        let table = table_with("Combined", &["19", "2.5"]);
        assert_eq!(table.resolve_amount(&dec("200")).unwrap(), dec("43"));
        assert_eq!(table.total_percentage().unwrap(), dec("21.5"));
    }

    #[test]
    fn test_empty_table_resolves_to_zero() {
        let table = table_with("Empty", &[]);
        assert_eq!(table.resolve_amount(&dec("999.99")).unwrap(), ExactDecimal::ZERO);
    }

    #[test]
    fn test_parent_is_not_merged() {
        let parent = table_with("Parent", &["19"]);
        let child = table_with("Child", &[]).with_parent(parent.id());

        assert_eq!(child.parent_id(), Some(parent.id()));
        assert!(child.resolve_amount(&dec("100")).unwrap().is_zero());
    }

    #[test]
    fn test_negative_base_gives_negative_tax() {
        let table = table_with("VAT 19", &["19"]);
        assert_eq!(table.resolve_amount(&dec("-100")).unwrap(), dec("-19"));
    }
}

mod net_from_gross {
    use super::*;

    #[test]
    fn test_extracts_net_amount() {
        let table = table_with("VAT 19", &["19"]);
        assert_eq!(table.net_from_gross(&dec("119")).unwrap(), dec("100"));
    }

    #[test]
    fn test_empty_table_is_identity() {
        let table = table_with("Empty", &[]);
        assert_eq!(table.net_from_gross(&dec("42.42")).unwrap(), dec("42.42"));
    }
}

mod table_metadata {
    use super::*;

    #[test]
    fn test_name_is_required() {
        assert_eq!(TaxTable::new(TaxTableId::new(), "  "), Err(TaxError::EmptyName));
    }

    #[test]
    fn test_invisible_flag() {
        let table = table_with("Hidden", &[]).invisible();
        assert!(table.is_invisible());
        assert!(!table_with("Shown", &[]).is_invisible());
    }

    #[test]
    fn test_entries_keep_insertion_order() {
        let table = table_with("Ordered", &["1", "2", "3"]);
        let pcts: Vec<_> = table.entries().iter().map(|e| e.percentage()).collect();
        assert_eq!(pcts, vec![dec("1"), dec("2"), dec("3")]);
    }

    #[test]
    fn test_serialization_keeps_exact_percentages() {
        let table = table_with("VAT", &["1/3"]);
        let json = serde_json::to_string(&table).unwrap();
        let back: TaxTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_deserialize_rejects_blank_name() {
        let mut json = serde_json::to_value(table_with("VAT", &["19"])).unwrap();
        json["name"] = serde_json::json!("   ");
        let err = serde_json::from_value::<TaxTable>(json).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_deserialize_rejects_negative_percentage() {
        let mut json = serde_json::to_value(table_with("VAT", &["19"])).unwrap();
        json["entries"][0]["percentage"] = serde_json::json!("-5");
        assert!(serde_json::from_value::<TaxTable>(json).is_err());

        let entry = serde_json::json!({ "percentage": "-0.5", "account_id": AccountId::new() });
        assert!(serde_json::from_value::<TaxTableEntry>(entry).is_err());
    }

    #[test]
    fn test_deserialize_keeps_flags_and_parent() {
        let table = table_with("Reduced", &["7", "0"])
            .with_parent(TaxTableId::new())
            .invisible();
        let back: TaxTable = serde_json::from_value(serde_json::to_value(&table).unwrap()).unwrap();
        assert_eq!(back, table);
        assert_eq!(back.entries()[1].percentage(), ExactDecimal::ZERO);
    }
}

mod chain {
    use super::*;

    fn lookup_of(tables: &[&TaxTable]) -> HashMap<TaxTableId, TaxTable> {
        tables.iter().map(|t| (t.id(), (*t).clone())).collect()
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let root = table_with("Root", &["19"]);
        let middle = table_with("Middle", &[]).with_parent(root.id());
        let leaf = table_with("Leaf", &[]).with_parent(middle.id());
        let lookup = lookup_of(&[&root, &middle, &leaf]);

        let names: Vec<_> = ancestors(&lookup, &leaf).unwrap().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Middle", "Root"]);
    }

    #[test]
    fn test_effective_entries_fall_back_to_first_non_empty_ancestor() {
        let root = table_with("Root", &["19"]);
        let middle = table_with("Middle", &["7"]).with_parent(root.id());
        let leaf = table_with("Leaf", &[]).with_parent(middle.id());
        let lookup = lookup_of(&[&root, &middle, &leaf]);

        let entries = effective_entries(&lookup, &leaf).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].percentage(), dec("7"));
    }

    #[test]
    fn test_effective_entries_prefer_own() {
        let root = table_with("Root", &["19"]);
        let leaf = table_with("Leaf", &["5"]).with_parent(root.id());
        let tables = vec![root, leaf.clone()];

        let entries = effective_entries(tables.as_slice(), &leaf).unwrap();
        assert_eq!(entries[0].percentage(), dec("5"));
    }

    #[test]
    fn test_missing_parent() {
        let orphan = table_with("Orphan", &[]).with_parent(TaxTableId::new());
        let lookup = lookup_of(&[&orphan]);
        assert!(matches!(ancestors(&lookup, &orphan), Err(TaxError::TaxTableNotFound(_))));
    }

    #[test]
    fn test_cycle_detected() {
        let a_id = TaxTableId::new();
        let b = table_with("B", &[]).with_parent(a_id);
        let a = TaxTable::new(a_id, "A").unwrap().with_parent(b.id());
        let lookup = lookup_of(&[&a, &b]);

        assert!(matches!(effective_entries(&lookup, &a), Err(TaxError::CyclicParent(_))));
    }
}

proptest! {
    #[test]
    fn prop_resolve_amount_is_linear(
        pct in 0i64..100,
        a in -1_000_000i64..1_000_000,
        b in -1_000_000i64..1_000_000,
    ) {
        let table = table_with("Prop", &[&pct.to_string()]);
        let (a, b) = (ExactDecimal::from_fraction(a.into(), 100).unwrap(), ExactDecimal::from_fraction(b.into(), 100).unwrap());
        let sum = table.resolve_amount(&(a + b)).unwrap();
        let parts = table.resolve_amount(&a).unwrap() + table.resolve_amount(&b).unwrap();
        prop_assert_eq!(sum, parts);
    }

    #[test]
    fn prop_net_from_gross_inverts_tax(pct in 0i64..50, net in 0i64..10_000_000) {
        let table = table_with("Prop", &[&pct.to_string()]);
        let net = ExactDecimal::from_fraction(net.into(), 100).unwrap();
        let gross = net + table.resolve_amount(&net).unwrap();
        prop_assert_eq!(table.net_from_gross(&gross).unwrap(), net);
    }
}
