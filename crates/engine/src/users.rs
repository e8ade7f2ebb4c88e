//! Users table.
//!
//! Registration happens in an external auth flow; the engine only reads
//! users for ownership checks and deletes them on behalf of admins.

use sea_orm::entity::prelude::*;

use crate::EngineError;

/// Role of a user in the marketplace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Tenant,
    Landlord,
    Admin,
}

impl Role {
    /// Returns the canonical role string stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tenant => "tenant",
            Self::Landlord => "landlord",
            Self::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "tenant" => Ok(Self::Tenant),
            "landlord" => Ok(Self::Landlord),
            "admin" => Ok(Self::Admin),
            other => Err(EngineError::BadRequest(format!("invalid role: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::rental_houses::Entity")]
    RentalHouses,
}

impl Related<super::rental_houses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RentalHouses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A user as exposed by the API. Never carries the password.
#[derive(Clone, Debug, PartialEq)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl TryFrom<Model> for PublicUser {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let role = Role::try_from(model.role.as_str())?;
        Ok(Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role,
            phone: model.phone,
            address: model.address,
        })
    }
}
