use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{admin, listings, orders, requests, user};
use engine::{Engine, PaymentClient};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub payments: Arc<PaymentClient>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(auth_header) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Email.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    // Browsing listings needs no account; everything else does.
    let public = Router::new()
        .route("/landlords", get(listings::browse))
        .route("/landlords/{rental_house_id}", get(listings::get));

    let gated = Router::new()
        .route("/landlords", post(listings::create))
        .route("/landlords/mine", get(listings::mine))
        .route(
            "/landlords/requests/{request_id}",
            patch(requests::respond),
        )
        .route(
            "/landlords/{rental_house_id}",
            patch(listings::update).delete(listings::remove),
        )
        .route("/rental-requests", post(requests::create))
        .route("/rental-requests/mine", get(requests::mine))
        .route("/rental-requests/incoming", get(requests::incoming))
        .route("/admin/listings", get(admin::listings))
        .route("/admin/users", get(admin::users))
        .route("/admin/rental-transactions", get(admin::orders))
        .route("/admin/summary", get(admin::summary))
        .route("/admin/user/{user_id}", patch(admin::remove_user))
        .route("/order", post(orders::create))
        .route("/order/verify", get(orders::verify))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    public.merge(gated).with_state(state)
}

pub async fn run(engine: Engine, payments: PaymentClient, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, payments, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    payments: PaymentClient,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        payments: Arc::new(payments),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    payments: PaymentClient,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, payments, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use chrono::Utc;
    use http_body_util::BodyExt;
    use sea_orm::{ConnectionTrait, Database, Statement};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use engine::PaymentConfig;
    use migration::MigratorTrait;

    async fn seed_user(db: &DatabaseConnection, id: &str, role: &str, phone: Option<&str>) {
        let backend = db.get_database_backend();
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (id, name, email, password, role, phone, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            vec![
                id.into(),
                format!("{id} name").into(),
                format!("{id}@example.com").into(),
                "password".into(),
                role.into(),
                phone.map(ToString::to_string).into(),
                Utc::now().into(),
            ],
        ))
        .await
        .unwrap();
    }

    async fn setup() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        seed_user(&db, "landlord-1", "landlord", Some("017000001")).await;
        seed_user(&db, "tenant-1", "tenant", None).await;
        seed_user(&db, "admin-1", "admin", None).await;

        let engine = Engine::builder()
            .database(db.clone())
            .build()
            .await
            .unwrap();
        // Unroutable gateway; none of these tests reach the payment routes.
        let payments = PaymentClient::new(PaymentConfig {
            base_url: "http://127.0.0.1:1/".to_string(),
            store_id: "store".to_string(),
            store_secret: "secret".to_string(),
            return_url: "http://localhost/return".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();

        router(ServerState {
            engine: Arc::new(engine),
            payments: Arc::new(payments),
            db,
        })
    }

    fn basic_auth(user_id: &str) -> String {
        let encoded = STANDARD.encode(format!("{user_id}@example.com:password"));
        format!("Basic {encoded}")
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, user_id: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::AUTHORIZATION, basic_auth(user_id))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn listing_body() -> Value {
        json!({
            "location": "Dhaka",
            "description": "two rooms",
            "rent_minor": 1_500_000,
            "bedrooms": 2,
            "image_urls": ["front.jpg"],
        })
    }

    #[tokio::test]
    async fn browsing_listings_needs_no_auth() {
        let router = setup().await;

        let response = router
            .oneshot(Request::get("/landlords").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["meta"]["page"], json!(1));
    }

    #[tokio::test]
    async fn creating_a_listing_needs_auth() {
        let router = setup().await;

        let response = router
            .oneshot(
                Request::post("/landlords")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&listing_body()).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn tenants_cannot_create_listings() {
        let router = setup().await;

        let response = router
            .oneshot(post_json("/landlords", "tenant-1", listing_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn landlord_creates_and_anyone_reads_back() {
        let router = setup().await;

        let response = router
            .clone()
            .oneshot(post_json("/landlords", "landlord-1", listing_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(
            created["message"],
            json!("Rental house listing created successfully")
        );
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let response = router
            .oneshot(
                Request::get(format!("/landlords/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["landlord"]["id"], json!("landlord-1"));
        assert_eq!(body["data"]["status"], json!("available"));
    }

    #[tokio::test]
    async fn malformed_listing_id_gets_a_404_envelope() {
        let router = setup().await;

        let response = router
            .oneshot(
                Request::get("/landlords/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("rental house not found"));
    }

    #[tokio::test]
    async fn summary_is_admin_only() {
        let router = setup().await;

        let response = router
            .clone()
            .oneshot(
                Request::get("/admin/summary")
                    .header(header::AUTHORIZATION, basic_auth("tenant-1"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = router
            .oneshot(
                Request::get("/admin/summary")
                    .header(header::AUTHORIZATION, basic_auth("admin-1"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["tenants"], json!(1));
        assert_eq!(body["data"]["landlords"], json!(1));
        assert_eq!(body["data"]["admins"], json!(1));
    }
}
