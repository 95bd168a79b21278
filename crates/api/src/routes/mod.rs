//! API routes

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

pub mod appeals;
pub mod categories;
pub mod config;
pub mod health;
pub mod items;
pub mod profiles;

/// Every endpoint, bound to the shared state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        // Items
        .route("/api/items", get(items::list).post(items::submit))
        .route(
            "/api/items/:id",
            get(items::get).delete(items::soft_delete),
        )
        .route("/api/items/:id/status", post(items::set_status))
        .route("/api/items/:id/approve", post(items::approve))
        .route("/api/items/:id/reject", post(items::reject))
        .route("/api/items/:id/urgent", post(items::toggle_urgent))
        .route("/api/items/:id/donated", post(items::mark_donated))
        .route("/api/admin/items/:id", delete(items::hard_delete))
        // Profiles
        .route("/api/profiles", get(profiles::list))
        .route("/api/profiles/:id", get(profiles::get))
        .route("/api/profiles/:id/ban", post(profiles::set_ban))
        .route("/api/profiles/:id/role", post(profiles::set_role))
        .route(
            "/api/profiles/:id/points",
            post(profiles::award_points).put(profiles::correct_points),
        )
        // Configuration
        .route("/api/point-values", get(config::list_point_values))
        .route("/api/point-values/:key", put(config::upsert_point_value))
        .route("/api/settings", get(config::list_settings))
        .route("/api/settings/:key", put(config::upsert_setting))
        // Categories
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/categories/:id",
            put(categories::update).delete(categories::delete),
        )
        .route(
            "/api/categories/:id/sub-categories",
            post(categories::create_sub),
        )
        .route(
            "/api/sub-categories/:id",
            put(categories::update_sub).delete(categories::delete_sub),
        )
        // Appeals
        .route("/api/appeals", get(appeals::list).post(appeals::create))
        .route(
            "/api/appeals/:id",
            get(appeals::get)
                .patch(appeals::update)
                .delete(appeals::delete),
        )
        .route("/api/appeals/:id/status", post(appeals::set_status))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tests::{token_for, AUDIENCE, SECRET};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use common::models::{actions, ItemStatus, Role};
    use common::Config;
    use db::{MemoryStore, PointStore};
    use moderation::ModerationService;
    use revalidate::RecordingRevalidator;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn test_config() -> Config {
        Config {
            database_url: String::new(),
            db_max_connections: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            auth_jwt_secret: SECRET.to_string(),
            auth_jwt_audience: AUDIENCE.to_string(),
            revalidate_url: None,
            revalidate_secret: None,
        }
    }

    fn app(store: Arc<MemoryStore>) -> Router {
        let moderation = ModerationService::new(store, Arc::new(RecordingRevalidator::new()));
        router(Arc::new(AppState::new(&test_config(), moderation)))
    }

    fn bearer(user_id: Uuid) -> String {
        format!(
            "Bearer {}",
            token_for(&user_id.to_string(), SECRET, AUDIENCE, 3600)
        )
    }

    fn post_json(uri: &str, auth: Option<String>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Arc::new(MemoryStore::new()))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_approve_returns_success_and_pays_owner() {
        let store = Arc::new(MemoryStore::new());
        let moderator = Uuid::new_v4();
        let owner = Uuid::new_v4();
        store.add_profile(moderator, Role::Moderator, 0.0).await;
        store.add_profile(owner, Role::User, 2.0).await;
        store.upsert_point_value(actions::UPLOAD_ITEM, 0.5).await.unwrap();
        let item = store.add_item(Some(owner), false).await;

        let response = app(store.clone())
            .oneshot(post_json(
                &format!("/api/items/{}/approve", item.id),
                Some(bearer(moderator)),
                serde_json::json!({}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["success"], true);
        assert_eq!(store.item(item.id).await.unwrap().status, ItemStatus::Active);
        assert_eq!(store.profile(owner).await.unwrap().points, 2.5);
    }

    #[tokio::test]
    async fn test_reject_without_token_is_forbidden() {
        let store = Arc::new(MemoryStore::new());
        let item = store.add_item(None, false).await;

        let response = app(store.clone())
            .oneshot(post_json(
                &format!("/api/items/{}/reject", item.id),
                None,
                serde_json::json!({ "reason": "spam" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = json_body(response).await;
        assert_eq!(body["code"], "unauthorized");
        assert!(body["error"].is_string());
        assert_eq!(
            store.item(item.id).await.unwrap().status,
            ItemStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_guest_submission_and_validation_error() {
        let store = Arc::new(MemoryStore::new());

        let response = app(store.clone())
            .oneshot(post_json(
                "/api/items",
                None,
                serde_json::json!({ "title": "Bookshelf" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "pending");
        assert!(body["owner_user_id"].is_null());

        let response = app(store)
            .oneshot(post_json(
                "/api/items",
                None,
                serde_json::json!({ "title": "" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "validation_error");
    }

    #[tokio::test]
    async fn test_unknown_item_is_404() {
        let store = Arc::new(MemoryStore::new());
        let admin = Uuid::new_v4();
        store.add_profile(admin, Role::Admin, 0.0).await;

        let response = app(store)
            .oneshot(post_json(
                &format!("/api/items/{}/status", Uuid::new_v4()),
                Some(bearer(admin)),
                serde_json::json!({ "status": "rejected", "reason": "gone" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
