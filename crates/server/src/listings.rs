//! Rental listing API endpoints.

use std::collections::HashMap;

use api_types::{
    ApiResponse, Meta,
    listing::{ListingNew, ListingStatus, ListingUpdate, ListingView},
    user::{Role, UserView},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{EngineError, ListingWithOwner, NewListing, PublicUser, RentalHouse};

use crate::{ServerError, server::ServerState, user};

pub(crate) fn map_meta(meta: engine::Meta) -> Meta {
    Meta {
        page: meta.page,
        limit: meta.limit,
        total: meta.total,
        total_page: meta.total_page,
    }
}

pub(crate) fn map_role(role: engine::Role) -> Role {
    match role {
        engine::Role::Tenant => Role::Tenant,
        engine::Role::Landlord => Role::Landlord,
        engine::Role::Admin => Role::Admin,
    }
}

pub(crate) fn map_user(user: PublicUser) -> UserView {
    UserView {
        id: user.id,
        name: user.name,
        email: user.email,
        role: map_role(user.role),
        phone: user.phone,
        address: user.address,
    }
}

fn map_status(status: engine::ListingStatus) -> ListingStatus {
    match status {
        engine::ListingStatus::Available => ListingStatus::Available,
        engine::ListingStatus::Rented => ListingStatus::Rented,
    }
}

pub(crate) fn map_listing(listing: RentalHouse, landlord: Option<PublicUser>) -> ListingView {
    ListingView {
        id: listing.id,
        landlord_id: listing.landlord_id,
        location: listing.location,
        description: listing.description,
        rent_minor: listing.rent_minor,
        bedrooms: listing.bedrooms,
        image_urls: listing.image_urls,
        status: map_status(listing.status),
        created_at: listing.created_at,
        landlord: landlord.map(map_user),
    }
}

fn map_listing_with_owner(entry: ListingWithOwner) -> ListingView {
    map_listing(entry.listing, entry.owner)
}

pub async fn browse(
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ApiResponse<Vec<ListingView>>>, ServerError> {
    let (listings, meta) = state.engine.list_listings(&params).await?;
    let listings = listings
        .into_iter()
        .map(|listing| map_listing(listing, None))
        .collect();
    Ok(Json(ApiResponse::with_meta(
        "All rental listings retrieved successfully",
        listings,
        map_meta(meta),
    )))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(rental_house_id): Path<String>,
) -> Result<Json<ApiResponse<ListingView>>, ServerError> {
    let Some(entry) = state.engine.get_listing(&rental_house_id).await? else {
        return Err(EngineError::KeyNotFound("rental house".to_string()).into());
    };
    Ok(Json(ApiResponse::new(
        "Rental house retrieved successfully",
        map_listing_with_owner(entry),
    )))
}

pub async fn create(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ListingNew>,
) -> Result<(StatusCode, Json<ApiResponse<ListingView>>), ServerError> {
    user::require_role(&caller, "landlord")?;

    let listing = state
        .engine
        .create_listing(
            &caller.id,
            NewListing {
                location: payload.location,
                description: payload.description,
                rent_minor: payload.rent_minor,
                bedrooms: payload.bedrooms,
            },
            payload.image_urls,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Rental house listing created successfully",
            map_listing(listing, None),
        )),
    ))
}

pub async fn mine(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ApiResponse<Vec<ListingView>>>, ServerError> {
    user::require_role(&caller, "landlord")?;

    let (listings, meta) = state.engine.landlord_listings(&caller.id, &params).await?;
    let listings = listings.into_iter().map(map_listing_with_owner).collect();
    Ok(Json(ApiResponse::with_meta(
        "Landlord listings retrieved successfully",
        listings,
        map_meta(meta),
    )))
}

pub async fn update(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(rental_house_id): Path<String>,
    Json(payload): Json<ListingUpdate>,
) -> Result<Json<ApiResponse<ListingView>>, ServerError> {
    user::require_role(&caller, "landlord")?;

    let update = engine::ListingUpdate {
        location: payload.location,
        description: payload.description,
        rent_minor: payload.rent_minor,
        bedrooms: payload.bedrooms,
        status: payload.status.map(|status| match status {
            ListingStatus::Available => engine::ListingStatus::Available,
            ListingStatus::Rented => engine::ListingStatus::Rented,
        }),
    };
    let listing = state
        .engine
        .update_listing(&rental_house_id, &caller.id, update)
        .await?;
    Ok(Json(ApiResponse::new(
        "Rental house updated successfully",
        map_listing(listing, None),
    )))
}

pub async fn remove(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(rental_house_id): Path<String>,
) -> Result<Json<ApiResponse<ListingView>>, ServerError> {
    user::require_any_role(&caller, &["landlord", "admin"])?;

    // Landlords may only remove their own listings; admins remove any.
    if caller.role == "landlord" {
        let owned = state
            .engine
            .get_listing(&rental_house_id)
            .await?
            .is_some_and(|entry| entry.listing.landlord_id == caller.id);
        if !owned {
            return Err(EngineError::KeyNotFound("rental house".to_string()).into());
        }
    }

    let Some(listing) = state.engine.delete_listing(&rental_house_id).await? else {
        return Err(EngineError::KeyNotFound("rental house".to_string()).into());
    };
    Ok(Json(ApiResponse::new(
        "Rental house deleted successfully",
        map_listing(listing, None),
    )))
}
