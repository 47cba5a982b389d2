//! Community bounded context.
//!
//! The Community aggregate is the consistency boundary for a community's
//! identity: its display name, custom domains, and URL handle. Every
//! mutation is gated by the caller's [`CommunityPassport`], and changes
//! flow to the rest of the system as domain events (same-process, before
//! commit) and integration events (cross-process, after commit) through
//! the persistence seedwork.

pub mod community;
pub mod passport;

pub use community::{
    COMMUNITY_CREATED, COMMUNITY_DELETED, COMMUNITY_DOMAIN_UPDATED, COMMUNITY_NAME_CHANGED,
    Community, CommunityConverter, CommunityCreatedPayload, CommunityDeletedPayload,
    CommunityDomainUpdatedPayload, CommunityNameChangedPayload, CommunityRecord,
};
pub use passport::CommunityPassport;

/// Unit of work for the Community aggregate over a chosen store.
pub type CommunityUnitOfWork<S> = persistence_seedwork::UnitOfWork<S, CommunityConverter>;

/// Passport-bound unit of work for the Community aggregate.
pub type InitializedCommunityUnitOfWork<S> =
    persistence_seedwork::InitializedUnitOfWork<S, CommunityConverter>;
