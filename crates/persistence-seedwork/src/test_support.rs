//! Fixtures shared by the repository and unit-of-work tests: a minimal
//! aggregate with one passport-gated field, its converter, and a bus
//! wiring that records every dispatch.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use common::{AggregateId, EventKind};
use doc_store::InMemoryDocumentStore;
use domain_seedwork::{AggregateBase, AggregateRoot, DomainError, EventBus, Passport};

use crate::converter::TypeConverter;
use crate::unit_of_work::UnitOfWork;

pub(crate) const LISTING_RENAMED: EventKind = EventKind::new("ListingRenamed");
pub(crate) const LISTING_PUBLISHED: EventKind = EventKind::new("ListingPublished");

#[derive(Debug, Clone)]
pub(crate) struct TestPassport {
    pub can_edit: bool,
}

impl Passport for TestPassport {}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct NamePayload {
    pub name: String,
}

#[derive(Debug)]
pub(crate) struct Listing {
    pub id: AggregateId,
    pub name: String,
    pub passport: TestPassport,
    pub base: AggregateBase,
}

impl Listing {
    pub fn new(passport: TestPassport, name: &str) -> Self {
        Self {
            id: AggregateId::new(),
            name: name.to_string(),
            passport,
            base: AggregateBase::new(),
        }
    }

    pub fn rename(&mut self, name: &str) -> Result<(), DomainError> {
        if !self.passport.can_edit {
            return Err(DomainError::PermissionDenied(
                "passport may not edit listings".into(),
            ));
        }
        self.name = name.to_string();
        self.raise_domain_event(
            LISTING_RENAMED,
            &NamePayload {
                name: name.to_string(),
            },
        )
    }

    pub fn publish(&mut self) -> Result<(), DomainError> {
        self.raise_integration_event(
            LISTING_PUBLISHED,
            &NamePayload {
                name: self.name.clone(),
            },
        )
    }

    pub fn discard(&mut self) -> Result<(), DomainError> {
        if !self.passport.can_edit {
            return Err(DomainError::PermissionDenied(
                "passport may not discard listings".into(),
            ));
        }
        self.base.set_deleted();
        Ok(())
    }
}

impl AggregateRoot for Listing {
    fn aggregate_type() -> &'static str {
        "listings"
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
        if self.name.is_empty() {
            return Err(DomainError::Validation("listing name must be set".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ListingRecord {
    pub id: AggregateId,
    pub name: String,
}

pub(crate) struct ListingConverter;

impl TypeConverter for ListingConverter {
    type Aggregate = Listing;
    type Record = ListingRecord;
    type Passport = TestPassport;

    fn to_domain(&self, record: ListingRecord, passport: TestPassport) -> Listing {
        Listing {
            id: record.id,
            name: record.name,
            passport,
            base: AggregateBase::new(),
        }
    }

    fn to_persistence(&self, aggregate: &Listing) -> ListingRecord {
        ListingRecord {
            id: aggregate.id,
            name: aggregate.name.clone(),
        }
    }
}

/// Everything a test needs: the engine plus dispatch logs for both buses.
pub(crate) struct TestEngine {
    pub store: Arc<InMemoryDocumentStore>,
    pub unit_of_work: UnitOfWork<InMemoryDocumentStore, ListingConverter>,
    pub domain_log: Arc<Mutex<Vec<(EventKind, String)>>>,
    pub integration_log: Arc<Mutex<Vec<(EventKind, String)>>>,
}

fn recording(log: Arc<Mutex<Vec<(EventKind, String)>>>, kind: EventKind, bus: &mut EventBus) {
    bus.register(kind, move |event| {
        let log = log.clone();
        async move {
            let name = event.payload["name"].as_str().unwrap_or_default().to_string();
            log.lock().unwrap().push((event.kind, name));
            Ok::<(), domain_seedwork::HandlerError>(())
        }
    });
}

pub(crate) fn test_engine() -> TestEngine {
    let store = Arc::new(InMemoryDocumentStore::new());
    let domain_log = Arc::new(Mutex::new(Vec::new()));
    let integration_log = Arc::new(Mutex::new(Vec::new()));

    let mut domain_bus = EventBus::new("domain");
    recording(domain_log.clone(), LISTING_RENAMED, &mut domain_bus);

    let mut integration_bus = EventBus::new("integration");
    recording(integration_log.clone(), LISTING_PUBLISHED, &mut integration_bus);

    let unit_of_work = UnitOfWork::new(
        store.clone(),
        Arc::new(ListingConverter),
        Arc::new(domain_bus),
        Arc::new(integration_bus),
    );

    TestEngine {
        store,
        unit_of_work,
        domain_log,
        integration_log,
    }
}
