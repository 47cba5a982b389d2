use serde::{Serialize, de::DeserializeOwned};

use domain_seedwork::{AggregateRoot, Passport};

/// Pure mapping between a persistence record and a domain aggregate.
///
/// Implementations must not perform I/O or touch event buffers; the
/// repository owns both sides of that. `to_domain` hands the passport to
/// the rebuilt aggregate so its business methods can authorize later
/// mutations, and must return an aggregate with clean buffers and a clear
/// modified flag.
///
/// The record type is what actually lands in the document body, so it is
/// the place for schema-versioning fields and other persistence-only
/// concerns the aggregate never sees.
pub trait TypeConverter: Send + Sync {
    type Aggregate: AggregateRoot;
    type Record: Serialize + DeserializeOwned + Send;
    type Passport: Passport;

    /// Rebuilds an aggregate from its persistence record.
    fn to_domain(&self, record: Self::Record, passport: Self::Passport) -> Self::Aggregate;

    /// Projects an aggregate onto its persistence record.
    fn to_persistence(&self, aggregate: &Self::Aggregate) -> Self::Record;
}
