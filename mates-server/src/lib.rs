pub mod accounts;
pub mod config;
pub mod error;
pub mod graph;
pub mod handlers;
pub mod store;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use accounts::Accounts;
use graph::FriendGraph;
use store::UserStore;

pub use error::{AppError, Result};

/// Shared handler state: the store plus the services layered on it.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub graph: FriendGraph,
    pub accounts: Accounts,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            graph: FriendGraph::new(store.clone()),
            accounts: Accounts::new(store.clone()),
            store,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/:username/friends", get(handlers::friend_list))
        .route("/:username/friend-requests", get(handlers::friend_request_list))
        .route("/:username/send-friend-request", post(handlers::send_friend_request))
        .route("/:username/respond-friend-request", post(handlers::respond_friend_request))
        .route("/:username/unfriend", post(handlers::unfriend))
        .route("/:username/search", get(handlers::search))
        .route("/:username/user/:other", get(handlers::view_profile))
        .layer(Extension(state))
}
