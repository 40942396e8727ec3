//! Domain events for invoice documents
//!
//! Documents record what happened to them as events instead of calling out
//! to listeners. Callers collect them with
//! [`InvoiceDocument::take_events`](crate::invoice::InvoiceDocument::take_events)
//! after a successful transition.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{EntryId, ExactDecimal, InvoiceId, TransactionId};

/// Domain events emitted by an invoice document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentEvent {
    /// An entry was added
    EntryAdded {
        document_id: InvoiceId,
        entry_id: EntryId,
        timestamp: DateTime<Utc>,
    },

    /// An entry was removed
    EntryRemoved {
        document_id: InvoiceId,
        entry_id: EntryId,
        timestamp: DateTime<Utc>,
    },

    /// The document was posted to the book
    Posted {
        document_id: InvoiceId,
        transaction_id: TransactionId,
        /// Gross amount carried by the closing split
        total: ExactDecimal,
        date_posted: NaiveDate,
        date_due: NaiveDate,
        timestamp: DateTime<Utc>,
    },
}

impl DocumentEvent {
    /// Returns the document ID associated with this event
    pub fn document_id(&self) -> InvoiceId {
        match self {
            DocumentEvent::EntryAdded { document_id, .. }
            | DocumentEvent::EntryRemoved { document_id, .. }
            | DocumentEvent::Posted { document_id, .. } => *document_id,
        }
    }

    /// Returns the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            DocumentEvent::EntryAdded { timestamp, .. }
            | DocumentEvent::EntryRemoved { timestamp, .. }
            | DocumentEvent::Posted { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            DocumentEvent::EntryAdded { .. } => "EntryAdded",
            DocumentEvent::EntryRemoved { .. } => "EntryRemoved",
            DocumentEvent::Posted { .. } => "Posted",
        }
    }
}
