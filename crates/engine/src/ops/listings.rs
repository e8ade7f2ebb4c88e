//! Listing CRUD operations.

use std::collections::HashMap;

use sea_orm::{ActiveValue, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    query::{Meta, QueryBuilder},
    rental_houses::{self, ListingStatus, RentalHouse},
    users::{self, PublicUser},
};

use super::{Engine, normalize_required_text};

/// String-valued columns callers may filter on. Numeric columns are left
/// out: sqlite compares text params against integers without coercion.
const FILTER_COLUMNS: &[(&str, rental_houses::Column)] = &[
    ("location", rental_houses::Column::Location),
    ("status", rental_houses::Column::Status),
    ("landlord_id", rental_houses::Column::LandlordId),
];

const SORT_COLUMNS: &[(&str, rental_houses::Column)] = &[
    ("rent_minor", rental_houses::Column::RentMinor),
    ("bedrooms", rental_houses::Column::Bedrooms),
    ("created_at", rental_houses::Column::CreatedAt),
];

/// Fields a landlord may create a listing with. Ownership is not among
/// them; `landlord_id` always comes from the authenticated caller.
#[derive(Clone, Debug)]
pub struct NewListing {
    pub location: String,
    pub description: String,
    pub rent_minor: i64,
    pub bedrooms: i32,
}

/// Allow-list of mutable listing fields for partial updates.
#[derive(Clone, Debug, Default)]
pub struct ListingUpdate {
    pub location: Option<String>,
    pub description: Option<String>,
    pub rent_minor: Option<i64>,
    pub bedrooms: Option<i32>,
    pub status: Option<ListingStatus>,
}

/// A listing with its owner expanded, when the owner still exists.
#[derive(Clone, Debug)]
pub struct ListingWithOwner {
    pub listing: RentalHouse,
    pub owner: Option<PublicUser>,
}

impl Engine {
    /// Creates a listing owned by `landlord_id`.
    ///
    /// At least one image location is required; the sequence order is
    /// preserved as given.
    pub async fn create_listing(
        &self,
        landlord_id: &str,
        new: NewListing,
        image_urls: Vec<String>,
    ) -> ResultEngine<RentalHouse> {
        if image_urls.is_empty() {
            return Err(EngineError::BadRequest("images are required".to_string()));
        }
        let location = normalize_required_text(&new.location, "location")?;
        if new.rent_minor <= 0 {
            return Err(EngineError::BadRequest("rent must be positive".to_string()));
        }

        let house = RentalHouse::new(
            landlord_id,
            location,
            new.description,
            new.rent_minor,
            new.bedrooms,
            image_urls,
        );
        rental_houses::ActiveModel::from(&house)
            .insert(&self.database)
            .await?;
        Ok(house)
    }

    /// Lists all listings, filtered/sorted/paginated by the query map.
    pub async fn list_listings(
        &self,
        params: &HashMap<String, String>,
    ) -> ResultEngine<(Vec<RentalHouse>, Meta)> {
        let query = QueryBuilder::new(rental_houses::Entity::find(), params)
            .filter(FILTER_COLUMNS)
            .sort(SORT_COLUMNS, rental_houses::Column::CreatedAt)
            .paginate();

        let meta = query.count_total(&self.database).await?;
        let rows = query.all(&self.database).await?;
        let listings = rows
            .into_iter()
            .map(RentalHouse::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        Ok((listings, meta))
    }

    /// Lists the landlord's own listings with the owner joined in.
    pub async fn landlord_listings(
        &self,
        landlord_id: &str,
        params: &HashMap<String, String>,
    ) -> ResultEngine<(Vec<ListingWithOwner>, Meta)> {
        let select = rental_houses::Entity::find()
            .filter(rental_houses::Column::LandlordId.eq(landlord_id.to_string()));
        let query = QueryBuilder::new(select, params)
            .filter(FILTER_COLUMNS)
            .sort(SORT_COLUMNS, rental_houses::Column::CreatedAt)
            .paginate();

        let meta = query.count_total(&self.database).await?;
        let rows = query.all(&self.database).await?;

        // One owner for every row, so a single lookup suffices.
        let owner = users::Entity::find_by_id(landlord_id.to_string())
            .one(&self.database)
            .await?
            .map(PublicUser::try_from)
            .transpose()?;

        let listings = rows
            .into_iter()
            .map(|model| {
                Ok(ListingWithOwner {
                    listing: RentalHouse::try_from(model)?,
                    owner: owner.clone(),
                })
            })
            .collect::<ResultEngine<Vec<_>>>()?;
        Ok((listings, meta))
    }

    /// Fetches a single listing with its owner expanded.
    ///
    /// A malformed id is treated the same as a missing row: `Ok(None)`.
    pub async fn get_listing(&self, id: &str) -> ResultEngine<Option<ListingWithOwner>> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let Some((model, owner)) = rental_houses::Entity::find_by_id(id.to_string())
            .find_also_related(users::Entity)
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };

        let listing = RentalHouse::try_from(model)?;
        let owner = owner.map(PublicUser::try_from).transpose()?;
        Ok(Some(ListingWithOwner { listing, owner }))
    }

    /// Partially updates a listing owned by `landlord_id`.
    ///
    /// The row is matched on id *and* owner, so a non-owner sees the same
    /// `KeyNotFound` as a missing listing and ownership can never move.
    pub async fn update_listing(
        &self,
        id: &str,
        landlord_id: &str,
        update: ListingUpdate,
    ) -> ResultEngine<RentalHouse> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Err(EngineError::KeyNotFound("rental house".to_string()));
        };

        let Some(model) = rental_houses::Entity::find_by_id(id.to_string())
            .filter(rental_houses::Column::LandlordId.eq(landlord_id.to_string()))
            .one(&self.database)
            .await?
        else {
            return Err(EngineError::KeyNotFound("rental house".to_string()));
        };

        let mut active: rental_houses::ActiveModel = model.into();
        if let Some(location) = update.location.as_deref() {
            active.location = ActiveValue::Set(normalize_required_text(location, "location")?);
        }
        if let Some(description) = update.description {
            active.description = ActiveValue::Set(description);
        }
        if let Some(rent_minor) = update.rent_minor {
            if rent_minor <= 0 {
                return Err(EngineError::BadRequest("rent must be positive".to_string()));
            }
            active.rent_minor = ActiveValue::Set(rent_minor);
        }
        if let Some(bedrooms) = update.bedrooms {
            active.bedrooms = ActiveValue::Set(bedrooms);
        }
        if let Some(status) = update.status {
            active.status = ActiveValue::Set(status.as_str().to_string());
        }

        let model = active.update(&self.database).await?;
        RentalHouse::try_from(model)
    }

    /// Deletes a listing, returning the deleted record.
    ///
    /// A malformed or unknown id yields `Ok(None)`.
    pub async fn delete_listing(&self, id: &str) -> ResultEngine<Option<RentalHouse>> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let Some(model) = rental_houses::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };

        rental_houses::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        Ok(Some(RentalHouse::try_from(model)?))
    }
}
