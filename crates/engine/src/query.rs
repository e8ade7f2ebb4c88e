//! Generic filter/sort/paginate helper over an entity select.
//!
//! The builder wraps a base [`Select`] plus the untyped query-string map a
//! handler receives, and layers transformations onto the select without
//! ever mutating the map. Column names coming from the outside are matched
//! against per-entity allow-lists, so an unknown or reserved key is simply
//! ignored rather than interpolated.
//!
//! [`count_total`] runs against the filtered select before pagination is
//! applied, so its result is invariant under `page`/`limit` changes.
//!
//! [`count_total`]: QueryBuilder::count_total

use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};

use crate::ResultEngine;

/// Keys consumed by the builder itself; never treated as filters.
const RESERVED_KEYS: &[&str] = &["page", "limit", "sort_by", "sort_order"];

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_LIMIT: u64 = 10;

/// Pagination summary returned alongside a page of results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Meta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_page: u64,
}

#[derive(Clone, Debug)]
pub struct QueryBuilder<E: EntityTrait> {
    select: Select<E>,
    params: HashMap<String, String>,
    page: u64,
    limit: u64,
    paginated: bool,
}

impl<E> QueryBuilder<E>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync,
{
    pub fn new(select: Select<E>, params: &HashMap<String, String>) -> Self {
        let page = parse_param(params, "page", DEFAULT_PAGE);
        let limit = parse_param(params, "limit", DEFAULT_LIMIT);
        Self {
            select,
            params: params.clone(),
            page,
            limit,
            paginated: false,
        }
    }

    /// Applies an equality filter for every map key found in `columns`.
    ///
    /// Allow-lists must not name a key the builder consumes itself.
    pub fn filter(mut self, columns: &[(&str, E::Column)]) -> Self {
        debug_assert!(
            columns.iter().all(|(name, _)| !RESERVED_KEYS.contains(name)),
            "filter allow-list collides with a reserved key"
        );
        for (name, column) in columns {
            if let Some(value) = self.params.get(*name) {
                self.select = self.select.filter((*column).eq(value.clone()));
            }
        }
        self
    }

    /// Orders by `sort_by`/`sort_order` when allow-listed, else by `default`.
    ///
    /// The default direction is descending, so `created_at` defaults give
    /// newest-first listings.
    pub fn sort(mut self, columns: &[(&str, E::Column)], default: E::Column) -> Self {
        let column = self
            .params
            .get("sort_by")
            .and_then(|name| {
                columns
                    .iter()
                    .find(|(candidate, _)| *candidate == name.as_str())
                    .map(|(_, column)| *column)
            })
            .unwrap_or(default);
        let order = match self.params.get("sort_order").map(String::as_str) {
            Some("asc") => Order::Asc,
            _ => Order::Desc,
        };
        self.select = self.select.order_by(column, order);
        self
    }

    /// Marks the query as paginated. The window is applied at fetch time.
    pub fn paginate(mut self) -> Self {
        self.paginated = true;
        self
    }

    /// Fetches the page (or everything, if `paginate` was never called).
    pub async fn all<C: ConnectionTrait>(&self, db: &C) -> ResultEngine<Vec<E::Model>> {
        let mut select = self.select.clone();
        if self.paginated {
            select = select
                .offset((self.page - 1) * self.limit)
                .limit(self.limit);
        }
        select.all(db).await.map_err(Into::into)
    }

    /// Counts over the filtered select, ignoring any pagination window.
    pub async fn count_total<C: ConnectionTrait>(&self, db: &C) -> ResultEngine<Meta> {
        let total = self.select.clone().count(db).await?;
        Ok(Meta {
            page: self.page,
            limit: self.limit,
            total,
            total_page: pages_for(total, self.limit),
        })
    }
}

fn parse_param(params: &HashMap<String, String>, key: &str, default: u64) -> u64 {
    params
        .get(key)
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value >= 1)
        .unwrap_or(default)
}

const fn pages_for(total: u64, limit: u64) -> u64 {
    total.div_ceil(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_params_absent() {
        let params = HashMap::new();
        assert_eq!(parse_param(&params, "page", DEFAULT_PAGE), 1);
        assert_eq!(parse_param(&params, "limit", DEFAULT_LIMIT), 10);
    }

    #[test]
    fn invalid_and_zero_params_fall_back() {
        let params = HashMap::from([
            ("page".to_string(), "zero".to_string()),
            ("limit".to_string(), "0".to_string()),
        ]);
        assert_eq!(parse_param(&params, "page", DEFAULT_PAGE), 1);
        assert_eq!(parse_param(&params, "limit", DEFAULT_LIMIT), 10);
    }

    #[test]
    #[should_panic(expected = "collides with a reserved key")]
    fn reserved_key_in_an_allow_list_is_rejected() {
        use crate::users;

        let params = HashMap::new();
        let _ = QueryBuilder::new(users::Entity::find(), &params)
            .filter(&[("page", users::Column::Id)]);
    }

    #[test]
    fn total_page_rounds_up() {
        assert_eq!(pages_for(25, 10), 3);
        assert_eq!(pages_for(30, 10), 3);
        assert_eq!(pages_for(0, 10), 0);
        assert_eq!(pages_for(1, 10), 1);
    }
}
