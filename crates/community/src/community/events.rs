//! Event kinds and payloads raised by the Community aggregate.
//!
//! Kinds tagged "integration" are consumed outside the process (search
//! indexing, domain provisioning, member cleanup) and only dispatch after
//! the owning transaction commits.

use serde::{Deserialize, Serialize};

use common::{AggregateId, EventKind};

/// Integration: a community came into existence.
pub const COMMUNITY_CREATED: EventKind = EventKind::new("CommunityCreated");

/// Domain: the display name changed.
pub const COMMUNITY_NAME_CHANGED: EventKind = EventKind::new("CommunityNameChanged");

/// Domain and integration: the custom domain changed. In-process listeners
/// revalidate dependent settings before commit; the external listener
/// reconfigures DNS afterwards.
pub const COMMUNITY_DOMAIN_UPDATED: EventKind = EventKind::new("CommunityDomainUpdated");

/// Integration: the community was tombstoned and its document removed.
pub const COMMUNITY_DELETED: EventKind = EventKind::new("CommunityDeleted");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityCreatedPayload {
    pub community_id: AggregateId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityNameChangedPayload {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityDomainUpdatedPayload {
    pub community_id: AggregateId,
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityDeletedPayload {
    pub community_id: AggregateId,
}
