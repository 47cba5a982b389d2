//! Community aggregate implementation.

use common::AggregateId;
use domain_seedwork::{AggregateBase, AggregateRoot, DomainError};

use crate::passport::CommunityPassport;

use super::events::{
    COMMUNITY_CREATED, COMMUNITY_DELETED, COMMUNITY_DOMAIN_UPDATED, COMMUNITY_NAME_CHANGED,
    CommunityCreatedPayload, CommunityDeletedPayload, CommunityDomainUpdatedPayload,
    CommunityNameChangedPayload,
};

const MAX_NAME_LENGTH: usize = 200;
const MAX_HANDLE_LENGTH: usize = 50;

/// Community aggregate root.
///
/// Owns a community's identity settings. The passport travels inside the
/// aggregate so every setter can authorize the mutation it performs; the
/// props are never handed out mutably.
#[derive(Debug)]
pub struct Community {
    pub(super) id: AggregateId,
    pub(super) name: String,
    pub(super) domain: Option<String>,
    pub(super) white_label_domain: Option<String>,
    pub(super) handle: Option<String>,
    pub(super) passport: CommunityPassport,
    pub(super) base: AggregateBase,
}

// Query methods
impl Community {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn white_label_domain(&self) -> Option<&str> {
        self.white_label_domain.as_deref()
    }

    pub fn handle(&self) -> Option<&str> {
        self.handle.as_deref()
    }
}

// Command methods
impl Community {
    /// Creates a community for the acting passport.
    ///
    /// Raises the created integration event; external consumers only learn
    /// about the community once the creating transaction commits.
    pub fn new(passport: CommunityPassport, name: &str) -> Result<Self, DomainError> {
        validate_name(name)?;
        let mut community = Self {
            id: AggregateId::new(),
            name: name.to_string(),
            domain: None,
            white_label_domain: None,
            handle: None,
            passport,
            base: AggregateBase::new(),
        };
        community.raise_integration_event(
            COMMUNITY_CREATED,
            &CommunityCreatedPayload {
                community_id: community.id,
                name: community.name.clone(),
            },
        )?;
        Ok(community)
    }

    /// Renames the community. Raises a same-process name-changed event.
    pub fn set_name(&mut self, name: &str) -> Result<(), DomainError> {
        self.ensure_can_manage("set name")?;
        validate_name(name)?;
        self.name = name.to_string();
        self.raise_domain_event(
            COMMUNITY_NAME_CHANGED,
            &CommunityNameChangedPayload {
                name: self.name.clone(),
            },
        )
    }

    /// Changes the custom domain.
    ///
    /// Raised on both buses: in-process listeners revalidate dependent
    /// settings inside the transaction, and the external DNS listener is
    /// notified after commit.
    pub fn set_domain(&mut self, domain: Option<String>) -> Result<(), DomainError> {
        self.ensure_can_manage("set domain")?;
        if let Some(domain) = &domain
            && domain.trim().is_empty()
        {
            return Err(DomainError::Validation("domain must not be blank".into()));
        }
        self.domain = domain;
        let payload = CommunityDomainUpdatedPayload {
            community_id: self.id,
            domain: self.domain.clone(),
        };
        self.raise_domain_event(COMMUNITY_DOMAIN_UPDATED, &payload)?;
        self.raise_integration_event(COMMUNITY_DOMAIN_UPDATED, &payload)
    }

    /// Changes the white-label domain. A plain field write with no event.
    pub fn set_white_label_domain(&mut self, domain: Option<String>) -> Result<(), DomainError> {
        self.ensure_can_manage("set white-label domain")?;
        self.white_label_domain = domain;
        self.base.mark_modified();
        Ok(())
    }

    /// Changes the URL handle.
    pub fn set_handle(&mut self, handle: Option<String>) -> Result<(), DomainError> {
        self.ensure_can_manage("set handle")?;
        if let Some(handle) = &handle {
            validate_handle(handle)?;
        }
        self.handle = handle;
        self.base.mark_modified();
        Ok(())
    }

    /// Tombstones the community; the next save deletes its document.
    ///
    /// Destructive, so it takes a system passport. Raises the deleted
    /// integration event for cross-context cleanup.
    pub fn delete(&mut self) -> Result<(), DomainError> {
        if !self.passport.is_system_account {
            return Err(DomainError::PermissionDenied(
                "only a system account may delete a community".into(),
            ));
        }
        self.base.set_deleted();
        self.raise_integration_event(
            COMMUNITY_DELETED,
            &CommunityDeletedPayload {
                community_id: self.id,
            },
        )
    }

    fn ensure_can_manage(&self, operation: &str) -> Result<(), DomainError> {
        if !self.passport.can_manage() {
            return Err(DomainError::PermissionDenied(format!(
                "passport may not {operation} for this community"
            )));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation(
            "community name must not be blank".into(),
        ));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(DomainError::Validation(format!(
            "community name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_handle(handle: &str) -> Result<(), DomainError> {
    if handle.is_empty() || handle.len() > MAX_HANDLE_LENGTH {
        return Err(DomainError::Validation(format!(
            "handle must be between 1 and {MAX_HANDLE_LENGTH} characters"
        )));
    }
    if !handle
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(DomainError::Validation(
            "handle may only contain letters, digits, and dashes".into(),
        ));
    }
    Ok(())
}

impl AggregateRoot for Community {
    fn aggregate_type() -> &'static str {
        "communities"
    }

    fn id(&self) -> AggregateId {
        self.id
    }

    fn base(&self) -> &AggregateBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut AggregateBase {
        &mut self.base
    }

    fn on_save(&self, _was_modified: bool) -> Result<(), DomainError> {
        // Setters validate on the way in; this guards direct construction
        // paths and future invariants spanning multiple fields.
        validate_name(&self.name)?;
        if let Some(handle) = &self.handle {
            validate_handle(handle)?;
        }
        Ok(())
    }
}
