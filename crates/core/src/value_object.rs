//! Value object trait: equality by value, not identity.

/// Marker trait for records that are defined entirely by their attributes.
///
/// Line items, taxes and store profiles are value objects: two items with the
/// same fields are the same item, and "changing" one means recording a new one.
/// The ledger only stores value objects, which keeps its entries cheap to
/// clone when an invoice is staged before dispatch.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
