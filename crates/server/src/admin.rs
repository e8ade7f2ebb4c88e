//! Admin moderation API endpoints.

use std::collections::HashMap;

use api_types::{
    ApiResponse,
    admin::Summary,
    listing::ListingView,
    order::OrderView,
    user::UserView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use crate::{ServerError, listings as listing_views, orders as order_views, server::ServerState, user};

pub async fn listings(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ApiResponse<Vec<ListingView>>>, ServerError> {
    user::require_role(&caller, "admin")?;

    let (listings, meta) = state.engine.list_listings(&params).await?;
    let listings = listings
        .into_iter()
        .map(|listing| listing_views::map_listing(listing, None))
        .collect();
    Ok(Json(ApiResponse::with_meta(
        "All rental listings retrieved successfully",
        listings,
        listing_views::map_meta(meta),
    )))
}

pub async fn users(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ApiResponse<Vec<UserView>>>, ServerError> {
    user::require_role(&caller, "admin")?;

    let (users, meta) = state.engine.all_users(&params).await?;
    let users = users.into_iter().map(listing_views::map_user).collect();
    Ok(Json(ApiResponse::with_meta(
        "All users retrieved successfully",
        users,
        listing_views::map_meta(meta),
    )))
}

pub async fn orders(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ApiResponse<Vec<OrderView>>>, ServerError> {
    user::require_role(&caller, "admin")?;

    let (orders, meta) = state.engine.all_orders(&params).await?;
    let orders = orders.into_iter().map(order_views::map_order).collect();
    Ok(Json(ApiResponse::with_meta(
        "All rental transactions retrieved successfully",
        orders,
        listing_views::map_meta(meta),
    )))
}

pub async fn summary(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Summary>>, ServerError> {
    user::require_role(&caller, "admin")?;

    let summary = state.engine.summary().await?;
    Ok(Json(ApiResponse::new(
        "Summary retrieved successfully",
        Summary {
            tenants: summary.tenants,
            landlords: summary.landlords,
            admins: summary.admins,
            listings: summary.listings,
            rental_requests: summary.rental_requests,
            orders: summary.orders,
        },
    )))
}

pub async fn remove_user(
    Extension(caller): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserView>>, ServerError> {
    user::require_role(&caller, "admin")?;

    let removed = state.engine.delete_user(&user_id).await?;
    Ok(Json(ApiResponse::new(
        "User deleted successfully",
        listing_views::map_user(removed),
    )))
}
