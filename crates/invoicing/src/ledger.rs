//! Ordered, positionally keyed collection of invoice records.
//!
//! The processor expects items and taxes as JSON objects keyed by synthetic
//! identifiers (`item_0`, `item_1`, ... / `tax_0`, ...). This module owns that
//! keying scheme so the aggregator only ever appends records.
//!
//! ## Keying
//!
//! Keys are derived from position, never stored:
//!
//! ```text
//! append([A, B])   → item_0 = A, item_1 = B
//! append([C])      → item_2 = C            (continues, never restarts at 0)
//! ```
//!
//! Because records are never removed or reordered, a key names the same record
//! for the lifetime of the ledger and two appends can never collide.
//!
//! ## Wire shape
//!
//! `Ledger<T>` serializes as a JSON object in insertion order, so `item_2`
//! precedes `item_10` in the rendered payload even though it sorts after it
//! lexically.

use serde::ser::{Serialize, SerializeMap, Serializer};

use checkout_core::ValueObject;

/// Append-only sequence of records exposed under synthetic keys.
///
/// The record at position `n` is keyed `<prefix>_<n>`.
///
/// ## Usage
///
/// ```ignore
/// let mut taxes: Ledger<Tax> = Ledger::new("tax");
/// taxes.append([Tax::new("NHIS TAX", dec!(23.8))]);
/// taxes.append([Tax::new("VAT", dec!(5))]);
///
/// assert_eq!(taxes.get("tax_1").map(|t| t.name.as_str()), Some("VAT"));
/// assert_eq!(serde_json::to_value(&taxes)?["tax_0"]["amount"], 23.8);
/// ```
///
/// ## Invariants
///
/// - **Append-only**: there is no removal or in-place update.
/// - **Unique keys**: `key_for(n)` is only ever handed out for position `n`.
/// - **Value records**: entries are [`ValueObject`]s, so cloning a ledger to
///   stage changes is a plain copy with no shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger<T> {
    prefix: &'static str,
    entries: Vec<T>,
}

impl<T: ValueObject> Ledger<T> {
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            entries: Vec::new(),
        }
    }

    pub fn append<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.entries.extend(records);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn key_for(&self, position: usize) -> String {
        format!("{}_{}", self.prefix, position)
    }

    /// Look up a record by its synthetic key.
    pub fn get(&self, key: &str) -> Option<&T> {
        let position = key
            .strip_prefix(self.prefix)?
            .strip_prefix('_')?
            .parse::<usize>()
            .ok()?;
        self.entries.get(position)
    }

    pub fn records(&self) -> &[T] {
        &self.entries
    }

    /// `(key, record)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (String, &T)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(position, record)| (self.key_for(position), record))
    }
}

impl<T: Serialize + ValueObject> Serialize for Ledger<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, record) in self.iter() {
            map.serialize_entry(&key, record)?;
        }
        map.end()
    }
}
