use serde::{Deserialize, Serialize};

use common::AggregateId;
use domain_seedwork::AggregateBase;
use persistence_seedwork::TypeConverter;

use crate::passport::CommunityPassport;

use super::aggregate::Community;

/// Persistence shape of a community document.
///
/// Carries a schema version so future migrations can tell document
/// generations apart; the aggregate never sees this field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityRecord {
    pub id: AggregateId,
    pub schema_version: String,
    pub name: String,
    pub domain: Option<String>,
    pub white_label_domain: Option<String>,
    pub handle: Option<String>,
}

pub(crate) const SCHEMA_VERSION: &str = "1.0.0";

/// Pure mapping between [`Community`] and [`CommunityRecord`].
pub struct CommunityConverter;

impl TypeConverter for CommunityConverter {
    type Aggregate = Community;
    type Record = CommunityRecord;
    type Passport = CommunityPassport;

    fn to_domain(&self, record: CommunityRecord, passport: CommunityPassport) -> Community {
        Community {
            id: record.id,
            name: record.name,
            domain: record.domain,
            white_label_domain: record.white_label_domain,
            handle: record.handle,
            passport,
            base: AggregateBase::new(),
        }
    }

    fn to_persistence(&self, aggregate: &Community) -> CommunityRecord {
        CommunityRecord {
            id: aggregate.id,
            schema_version: SCHEMA_VERSION.to_string(),
            name: aggregate.name.clone(),
            domain: aggregate.domain.clone(),
            white_label_domain: aggregate.white_label_domain.clone(),
            handle: aggregate.handle.clone(),
        }
    }
}
