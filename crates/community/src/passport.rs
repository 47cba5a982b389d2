use common::AggregateId;
use domain_seedwork::Passport;

/// Authorization capability for community operations.
///
/// Resolved once per request by the API layer and carried opaquely through
/// the persistence engine; only aggregate business methods inspect it.
#[derive(Debug, Clone)]
pub struct CommunityPassport {
    /// The member acting, if the caller is signed in as one.
    pub member_id: Option<AggregateId>,

    /// May change community settings (name, domains, handle).
    pub can_manage_communities: bool,

    /// Backoffice/system principal; required for destructive operations.
    pub is_system_account: bool,
}

impl CommunityPassport {
    /// Passport for a community-managing member.
    pub fn for_manager(member_id: AggregateId) -> Self {
        Self {
            member_id: Some(member_id),
            can_manage_communities: true,
            is_system_account: false,
        }
    }

    /// Passport for a read-only member.
    pub fn for_member(member_id: AggregateId) -> Self {
        Self {
            member_id: Some(member_id),
            can_manage_communities: false,
            is_system_account: false,
        }
    }

    /// Passport for system-level processes.
    pub fn for_system() -> Self {
        Self {
            member_id: None,
            can_manage_communities: true,
            is_system_account: true,
        }
    }

    /// True if settings mutations are allowed.
    pub fn can_manage(&self) -> bool {
        self.can_manage_communities || self.is_system_account
    }
}

impl Passport for CommunityPassport {}
