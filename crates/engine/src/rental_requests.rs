//! The module contains the `RentalRequest` struct and its table.
//!
//! A rental request is a tenant's application to rent a specific house.
//! It starts `pending` and transitions exactly once to `approved` or
//! `rejected`, driven by the owning landlord.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::EngineError;

/// Status of a rental request. `Approved` and `Rejected` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl TryFrom<&str> for RequestStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(EngineError::BadRequest(format!(
                "invalid request status: {other}"
            ))),
        }
    }
}

/// A landlord's decision on a pending request. `Pending` is not a
/// decision, so this is narrower than [`RequestStatus`] on purpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestDecision {
    Approved,
    Rejected,
}

impl RequestDecision {
    pub fn as_status(self) -> RequestStatus {
        match self {
            Self::Approved => RequestStatus::Approved,
            Self::Rejected => RequestStatus::Rejected,
        }
    }
}

/// A tenant's application to rent a house.
#[derive(Clone, Debug, PartialEq)]
pub struct RentalRequest {
    pub id: Uuid,
    pub rental_house_id: Uuid,
    pub tenant_id: String,
    pub status: RequestStatus,
    pub message: Option<String>,
    /// Contact phone, filled when the request is approved.
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RentalRequest {
    pub fn new(rental_house_id: Uuid, tenant_id: &str, message: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            rental_house_id,
            tenant_id: tenant_id.to_string(),
            status: RequestStatus::Pending,
            message,
            phone: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rental_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub rental_house_id: String,
    pub tenant_id: String,
    pub status: String,
    pub message: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rental_houses::Entity",
        from = "Column::RentalHouseId",
        to = "super::rental_houses::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    RentalHouses,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TenantId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::rental_houses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RentalHouses.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&RentalRequest> for ActiveModel {
    fn from(value: &RentalRequest) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            rental_house_id: ActiveValue::Set(value.rental_house_id.to_string()),
            tenant_id: ActiveValue::Set(value.tenant_id.clone()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            message: ActiveValue::Set(value.message.clone()),
            phone: ActiveValue::Set(value.phone.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for RentalRequest {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id).map_err(|err| {
            EngineError::Database(DbErr::Custom(format!("corrupt rental_requests.id: {err}")))
        })?;
        let rental_house_id = Uuid::parse_str(&model.rental_house_id).map_err(|err| {
            EngineError::Database(DbErr::Custom(format!(
                "corrupt rental_requests.rental_house_id: {err}"
            )))
        })?;
        let status = RequestStatus::try_from(model.status.as_str())?;
        Ok(Self {
            id,
            rental_house_id,
            tenant_id: model.tenant_id,
            status,
            message: model.message,
            phone: model.phone,
            created_at: model.created_at,
        })
    }
}
