//! The module contains the `RentalHouse` struct and its table.
//!
//! A rental house is a listing advertised by a landlord. The image
//! locations are stored as an ordered JSON array in a text column; the
//! database never sees them individually.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Listing lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListingStatus {
    Available,
    Rented,
}

impl ListingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Rented => "rented",
        }
    }
}

impl TryFrom<&str> for ListingStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "available" => Ok(Self::Available),
            "rented" => Ok(Self::Rented),
            other => Err(EngineError::BadRequest(format!(
                "invalid listing status: {other}"
            ))),
        }
    }
}

/// A rental house listing.
#[derive(Clone, Debug, PartialEq)]
pub struct RentalHouse {
    /// Stable identifier, generated once and persisted.
    pub id: Uuid,
    /// Owner of the listing. Always set from the authenticated creator.
    pub landlord_id: String,
    pub location: String,
    pub description: String,
    /// Monthly rent in minor currency units.
    pub rent_minor: i64,
    pub bedrooms: i32,
    pub image_urls: Vec<String>,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
}

impl RentalHouse {
    pub fn new(
        landlord_id: &str,
        location: String,
        description: String,
        rent_minor: i64,
        bedrooms: i32,
        image_urls: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            landlord_id: landlord_id.to_string(),
            location,
            description,
            rent_minor,
            bedrooms,
            image_urls,
            status: ListingStatus::Available,
            created_at: Utc::now(),
        }
    }
}

fn encode_image_urls(urls: &[String]) -> String {
    serde_json::to_string(urls).unwrap_or_else(|_| "[]".to_string())
}

fn decode_image_urls(raw: &str) -> ResultEngine<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|err| EngineError::Database(DbErr::Custom(format!("corrupt image_urls: {err}"))))
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rental_houses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub landlord_id: String,
    pub location: String,
    pub description: String,
    pub rent_minor: i64,
    pub bedrooms: i32,
    pub image_urls: String,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::LandlordId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
    #[sea_orm(has_many = "super::rental_requests::Entity")]
    RentalRequests,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::rental_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RentalRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&RentalHouse> for ActiveModel {
    fn from(value: &RentalHouse) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            landlord_id: ActiveValue::Set(value.landlord_id.clone()),
            location: ActiveValue::Set(value.location.clone()),
            description: ActiveValue::Set(value.description.clone()),
            rent_minor: ActiveValue::Set(value.rent_minor),
            bedrooms: ActiveValue::Set(value.bedrooms),
            image_urls: ActiveValue::Set(encode_image_urls(&value.image_urls)),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for RentalHouse {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id).map_err(|err| {
            EngineError::Database(DbErr::Custom(format!("corrupt rental_houses.id: {err}")))
        })?;
        let image_urls = decode_image_urls(&model.image_urls)?;
        let status = ListingStatus::try_from(model.status.as_str())?;
        Ok(Self {
            id,
            landlord_id: model.landlord_id,
            location: model.location,
            description: model.description,
            rent_minor: model.rent_minor,
            bedrooms: model.bedrooms,
            image_urls,
            status,
            created_at: model.created_at,
        })
    }
}
