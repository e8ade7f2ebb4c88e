//! The module contains the `Order` struct and its table.
//!
//! An order is a payment transaction for an approved rental request,
//! correlated with the external gateway via `transaction_id`. Its
//! lifecycle is driven by gateway verification results.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Failed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Maps a gateway verification status onto the order lifecycle.
    ///
    /// Anything the gateway does not report as success or cancellation is
    /// treated as a failed payment.
    pub fn from_gateway(status: &str) -> Self {
        match status {
            "Success" => Self::Paid,
            "Cancel" | "Cancelled" => Self::Cancelled,
            _ => Self::Failed,
        }
    }
}

impl TryFrom<&str> for OrderStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::BadRequest(format!(
                "invalid order status: {other}"
            ))),
        }
    }
}

/// A payment transaction record.
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub rental_request_id: Uuid,
    pub tenant_id: String,
    /// Amount in minor currency units, fixed from the listing at order time.
    pub amount_minor: i64,
    pub status: OrderStatus,
    /// Gateway-side transaction id, set once payment is initiated.
    pub transaction_id: Option<String>,
    /// Passed through to the gateway; the engine does no deduplication.
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(rental_request_id: Uuid, tenant_id: &str, amount_minor: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            rental_request_id,
            tenant_id: tenant_id.to_string(),
            amount_minor,
            status: OrderStatus::Pending,
            transaction_id: None,
            idempotency_key: Some(Uuid::new_v4().to_string()),
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub rental_request_id: String,
    pub tenant_id: String,
    pub amount_minor: i64,
    pub status: String,
    pub transaction_id: Option<String>,
    pub idempotency_key: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rental_requests::Entity",
        from = "Column::RentalRequestId",
        to = "super::rental_requests::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    RentalRequests,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TenantId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::rental_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RentalRequests.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Order> for ActiveModel {
    fn from(value: &Order) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            rental_request_id: ActiveValue::Set(value.rental_request_id.to_string()),
            tenant_id: ActiveValue::Set(value.tenant_id.clone()),
            amount_minor: ActiveValue::Set(value.amount_minor),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            transaction_id: ActiveValue::Set(value.transaction_id.clone()),
            idempotency_key: ActiveValue::Set(value.idempotency_key.clone()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Order {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id).map_err(|err| {
            EngineError::Database(DbErr::Custom(format!("corrupt orders.id: {err}")))
        })?;
        let rental_request_id = Uuid::parse_str(&model.rental_request_id).map_err(|err| {
            EngineError::Database(DbErr::Custom(format!(
                "corrupt orders.rental_request_id: {err}"
            )))
        })?;
        let status = OrderStatus::try_from(model.status.as_str())?;
        Ok(Self {
            id,
            rental_request_id,
            tenant_id: model.tenant_id,
            amount_minor: model.amount_minor,
            status,
            transaction_id: model.transaction_id,
            idempotency_key: model.idempotency_key,
            created_at: model.created_at,
        })
    }
}
