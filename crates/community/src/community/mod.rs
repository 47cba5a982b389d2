//! The Community aggregate, its events, and its persistence converter.

mod aggregate;
mod converter;
mod events;

pub use aggregate::Community;
pub use converter::{CommunityConverter, CommunityRecord};
pub use events::{
    COMMUNITY_CREATED, COMMUNITY_DELETED, COMMUNITY_DOMAIN_UPDATED, COMMUNITY_NAME_CHANGED,
    CommunityCreatedPayload, CommunityDeletedPayload, CommunityDomainUpdatedPayload,
    CommunityNameChangedPayload,
};
