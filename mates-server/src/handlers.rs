use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::de::DeserializeOwned;
use serde_json::Value;

use mates_common::{
    AddFriendRequest, DeleteFriendRequest, LoginReply, LoginRequest, ProfileView, RegisterRequest,
    RespondFriendRequest, SearchResults, Username,
};

use crate::error::{AppError, Result};
use crate::AppState;

fn decode<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|_| AppError::bad_request("request does not have an important key"))
}

pub async fn register(
    Extension(state): Extension<AppState>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse> {
    let request: RegisterRequest = decode(payload)?;
    state
        .accounts
        .register(&request.username, &request.password, request.name.as_deref())?;
    Ok("account created")
}

pub async fn login(
    Extension(state): Extension<AppState>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse> {
    let request: LoginRequest = decode(payload)?;
    let message = if state.accounts.verify(&request.username, &request.password)? {
        "logged in"
    } else {
        "wrong username or password"
    };
    Ok(Json(LoginReply {
        message: message.to_string(),
    }))
}

pub async fn friend_list(
    Extension(state): Extension<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.graph.list_friends(&Username::new(username))?))
}

pub async fn friend_request_list(
    Extension(state): Extension<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.graph.list_pending_requests(&Username::new(username))?))
}

pub async fn send_friend_request(
    Extension(state): Extension<AppState>,
    Path(username): Path<String>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse> {
    let request: AddFriendRequest = decode(payload)?;
    state
        .graph
        .request_friend(&Username::new(username), &request.username)?;
    Ok("ok")
}

pub async fn respond_friend_request(
    Extension(state): Extension<AppState>,
    Path(username): Path<String>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse> {
    let request: RespondFriendRequest = decode(payload)?;
    state
        .graph
        .respond_to_request(&Username::new(username), &request.username, request.accepted)?;
    Ok("ok")
}

pub async fn unfriend(
    Extension(state): Extension<AppState>,
    Path(username): Path<String>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse> {
    let request: DeleteFriendRequest = decode(payload)?;
    state
        .graph
        .remove_friend(&Username::new(username), &request.username)?;
    Ok("friend deleted")
}

pub async fn search(
    Extension(state): Extension<AppState>,
    Path(username): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse> {
    let query = params
        .get("username")
        .ok_or_else(|| AppError::bad_request("no username (GET) parameter found in the request"))?;
    let users = state.graph.search_users(query, &Username::new(username))?;
    Ok(Json(SearchResults { users }))
}

/// Profile of `other` as seen by `viewer`. `my_profile` marks the viewer's
/// own page, `is_friend` whether the two share a confirmed edge.
pub async fn view_profile(
    Extension(state): Extension<AppState>,
    Path((viewer, other)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let viewer = Username::new(viewer);
    let other = Username::new(other);
    state.store.get_user(&viewer)?.ok_or(AppError::NotFound)?;
    let record = state.store.get_user(&other)?.ok_or(AppError::NotFound)?;

    let my_profile = viewer == other;
    let is_friend = !my_profile && record.friends.contains(&viewer);
    Ok(Json(ProfileView {
        name: record.name,
        username: other.clone(),
        avatar_url: other.avatar_url(),
        profile_link: other.profile_link(),
        my_profile,
        is_friend,
    }))
}
