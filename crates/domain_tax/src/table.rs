//! Tax tables
//!
//! A tax table is a named list of percentage rules, each booking its share
//! against a ledger account. Tables may name a parent table, but the link is
//! informational: nothing in this module follows it. Callers that want
//! inheritance walk the chain themselves through [`crate::chain`].

use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, ExactDecimal, TaxTableId};

use crate::error::TaxError;

/// One percentage rule of a tax table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTaxTableEntry")]
pub struct TaxTableEntry {
    /// Percentage of the base amount (19 means 19 %)
    percentage: ExactDecimal,
    /// Account receiving the tax
    account_id: AccountId,
}

impl TaxTableEntry {
    /// Creates a percentage rule
    ///
    /// # Errors
    ///
    /// Returns `NegativePercentage` for percentages below zero
    pub fn new(percentage: ExactDecimal, account_id: AccountId) -> Result<Self, TaxError> {
        if percentage.is_negative() {
            return Err(TaxError::NegativePercentage(percentage.to_string()));
        }
        Ok(Self { percentage, account_id })
    }

    pub fn percentage(&self) -> ExactDecimal {
        self.percentage
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Tax this rule levies on `base`: `base * percentage / 100`
    pub fn amount_for(&self, base: &ExactDecimal) -> Result<ExactDecimal, TaxError> {
        Ok(self.percentage.percent_of(base)?)
    }
}

/// Unchecked wire form of [`TaxTableEntry`]
#[derive(Deserialize)]
struct RawTaxTableEntry {
    percentage: ExactDecimal,
    account_id: AccountId,
}

impl TryFrom<RawTaxTableEntry> for TaxTableEntry {
    type Error = TaxError;

    fn try_from(raw: RawTaxTableEntry) -> Result<Self, Self::Error> {
        TaxTableEntry::new(raw.percentage, raw.account_id)
    }
}

/// A named, possibly parented list of tax rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTaxTable")]
pub struct TaxTable {
    id: TaxTableId,
    name: String,
    invisible: bool,
    parent_id: Option<TaxTableId>,
    entries: Vec<TaxTableEntry>,
}

/// Unchecked wire form of [`TaxTable`]
#[derive(Deserialize)]
struct RawTaxTable {
    id: TaxTableId,
    name: String,
    #[serde(default)]
    invisible: bool,
    #[serde(default)]
    parent_id: Option<TaxTableId>,
    #[serde(default)]
    entries: Vec<TaxTableEntry>,
}

impl TryFrom<RawTaxTable> for TaxTable {
    type Error = TaxError;

    fn try_from(raw: RawTaxTable) -> Result<Self, Self::Error> {
        let table = TaxTable::new(raw.id, raw.name)?;
        Ok(TaxTable {
            invisible: raw.invisible,
            parent_id: raw.parent_id,
            entries: raw.entries,
            ..table
        })
    }
}

impl TaxTable {
    /// Creates an empty, visible table without parent
    pub fn new(id: TaxTableId, name: impl Into<String>) -> Result<Self, TaxError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TaxError::EmptyName);
        }
        Ok(Self {
            id,
            name,
            invisible: false,
            parent_id: None,
            entries: Vec::new(),
        })
    }

    /// Appends a rule; entry order is preserved
    pub fn with_entry(mut self, entry: TaxTableEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Links a parent table by id
    pub fn with_parent(mut self, parent_id: TaxTableId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Hides the table from selection lists
    pub fn invisible(mut self) -> Self {
        self.invisible = true;
        self
    }

    pub fn id(&self) -> TaxTableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[TaxTableEntry] {
        &self.entries
    }

    pub fn parent_id(&self) -> Option<TaxTableId> {
        self.parent_id
    }

    pub fn is_invisible(&self) -> bool {
        self.invisible
    }

    /// Sum of all rule percentages
    pub fn total_percentage(&self) -> Result<ExactDecimal, TaxError> {
        self.entries.iter().try_fold(ExactDecimal::ZERO, |acc, entry| {
            Ok(acc.checked_add(&entry.percentage)?)
        })
    }

    /// Tax levied on `base` by this table's own rules.
    ///
    /// Sums `base * percentage / 100` over the entries, exactly. An empty
    /// table yields zero; the parent table is never consulted.
    pub fn resolve_amount(&self, base: &ExactDecimal) -> Result<ExactDecimal, TaxError> {
        self.entries.iter().try_fold(ExactDecimal::ZERO, |acc, entry| {
            Ok(acc.checked_add(&entry.amount_for(base)?)?)
        })
    }

    /// Net amount contained in a tax-inclusive `gross`:
    /// `gross * 100 / (100 + total_percentage)`
    pub fn net_from_gross(&self, gross: &ExactDecimal) -> Result<ExactDecimal, TaxError> {
        let hundred = ExactDecimal::from_integer(100);
        let divisor = hundred.checked_add(&self.total_percentage()?)?;
        Ok(gross.checked_mul(&hundred)?.checked_div(&divisor)?)
    }
}
