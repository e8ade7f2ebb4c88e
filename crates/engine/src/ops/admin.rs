//! Admin moderation operations.
//!
//! Admins see every user and every order, can remove users outright, and
//! get a headline count summary for the dashboard. User removal is a hard
//! delete; rows referencing a removed user stay behind and read paths
//! report them as not found.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter};

use crate::{
    EngineError, ResultEngine,
    orders::{self, Order},
    query::{Meta, QueryBuilder},
    rental_houses, rental_requests,
    users::{self, PublicUser, Role},
};

use super::Engine;

const USER_FILTER_COLUMNS: &[(&str, users::Column)] = &[
    ("role", users::Column::Role),
    ("email", users::Column::Email),
];

const USER_SORT_COLUMNS: &[(&str, users::Column)] = &[
    ("created_at", users::Column::CreatedAt),
    ("name", users::Column::Name),
];

const ORDER_FILTER_COLUMNS: &[(&str, orders::Column)] = &[
    ("status", orders::Column::Status),
    ("tenant_id", orders::Column::TenantId),
];

const ORDER_SORT_COLUMNS: &[(&str, orders::Column)] = &[
    ("created_at", orders::Column::CreatedAt),
    ("amount_minor", orders::Column::AmountMinor),
];

/// Headline counts for the admin dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdminSummary {
    pub tenants: u64,
    pub landlords: u64,
    pub admins: u64,
    pub listings: u64,
    pub rental_requests: u64,
    pub orders: u64,
}

impl Engine {
    /// Lists all users, filterable by role and email.
    pub async fn all_users(
        &self,
        params: &HashMap<String, String>,
    ) -> ResultEngine<(Vec<PublicUser>, Meta)> {
        let query = QueryBuilder::new(users::Entity::find(), params)
            .filter(USER_FILTER_COLUMNS)
            .sort(USER_SORT_COLUMNS, users::Column::CreatedAt)
            .paginate();

        let meta = query.count_total(&self.database).await?;
        let rows = query.all(&self.database).await?;
        let users = rows
            .into_iter()
            .map(PublicUser::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        Ok((users, meta))
    }

    /// Hard-deletes a user, returning the removed record.
    pub async fn delete_user(&self, user_id: &str) -> ResultEngine<PublicUser> {
        let Some(model) = users::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await?
        else {
            return Err(EngineError::KeyNotFound("user".to_string()));
        };

        let user = PublicUser::try_from(model.clone())?;
        model.delete(&self.database).await?;
        Ok(user)
    }

    /// Lists all orders, filterable by status and tenant.
    pub async fn all_orders(
        &self,
        params: &HashMap<String, String>,
    ) -> ResultEngine<(Vec<Order>, Meta)> {
        let query = QueryBuilder::new(orders::Entity::find(), params)
            .filter(ORDER_FILTER_COLUMNS)
            .sort(ORDER_SORT_COLUMNS, orders::Column::CreatedAt)
            .paginate();

        let meta = query.count_total(&self.database).await?;
        let rows = query.all(&self.database).await?;
        let orders = rows
            .into_iter()
            .map(Order::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        Ok((orders, meta))
    }

    /// Counts users per role plus listings, requests and orders.
    pub async fn summary(&self) -> ResultEngine<AdminSummary> {
        let count_role = |role: Role| {
            users::Entity::find()
                .filter(users::Column::Role.eq(role.as_str()))
                .count(&self.database)
        };
        Ok(AdminSummary {
            tenants: count_role(Role::Tenant).await?,
            landlords: count_role(Role::Landlord).await?,
            admins: count_role(Role::Admin).await?,
            listings: rental_houses::Entity::find().count(&self.database).await?,
            rental_requests: rental_requests::Entity::find()
                .count(&self.database)
                .await?,
            orders: orders::Entity::find().count(&self.database).await?,
        })
    }
}
