//! Explicit parent-chain resolution
//!
//! [`TaxTable::resolve_amount`] only ever looks at a table's own entries.
//! When a caller wants a child table to fall back to its ancestors, it asks
//! for that here, against some lookup of tables by id.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use core_kernel::TaxTableId;

use crate::error::TaxError;
use crate::table::{TaxTable, TaxTableEntry};

/// Something that can hand out tax tables by id
pub trait TaxTableLookup {
    fn find_tax_table(&self, id: &TaxTableId) -> Option<&TaxTable>;
}

impl TaxTableLookup for HashMap<TaxTableId, TaxTable> {
    fn find_tax_table(&self, id: &TaxTableId) -> Option<&TaxTable> {
        self.get(id)
    }
}

impl TaxTableLookup for [TaxTable] {
    fn find_tax_table(&self, id: &TaxTableId) -> Option<&TaxTable> {
        self.iter().find(|table| table.id() == *id)
    }
}

/// Ancestors of `table`, nearest parent first.
///
/// # Errors
///
/// * `TaxTableNotFound` - a parent id does not resolve
/// * `CyclicParent` - the chain revisits a table
pub fn ancestors<'a, L>(lookup: &'a L, table: &TaxTable) -> Result<Vec<&'a TaxTable>, TaxError>
where
    L: TaxTableLookup + ?Sized,
{
    let mut seen = HashSet::from([table.id()]);
    let mut chain = Vec::new();
    let mut next = table.parent_id();

    while let Some(parent_id) = next {
        if !seen.insert(parent_id) {
            return Err(TaxError::CyclicParent(parent_id.to_string()));
        }
        let parent = lookup
            .find_tax_table(&parent_id)
            .ok_or_else(|| TaxError::not_found(parent_id))?;
        chain.push(parent);
        next = parent.parent_id();
    }

    Ok(chain)
}

/// The first non-empty entry list along `table` and its ancestors.
///
/// Returns the table's own entries when it has any. Otherwise walks the
/// parents in order and returns the first list found; an entirely empty
/// chain resolves to no entries.
pub fn effective_entries<'a, L>(
    lookup: &'a L,
    table: &'a TaxTable,
) -> Result<&'a [TaxTableEntry], TaxError>
where
    L: TaxTableLookup + ?Sized,
{
    if !table.entries().is_empty() {
        return Ok(table.entries());
    }

    for ancestor in ancestors(lookup, table)? {
        if !ancestor.entries().is_empty() {
            debug!(table = %table.name(), inherited_from = %ancestor.name(), "Using inherited tax entries");
            return Ok(ancestor.entries());
        }
    }

    Ok(&[])
}
