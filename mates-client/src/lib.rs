use reqwest::{Client, Response, StatusCode};
use thiserror::Error;

use mates_common::{
    AddFriendRequest, DeleteFriendRequest, LoginReply, LoginRequest, ProfileView, RegisterRequest,
    RespondFriendRequest, SearchResults, UserSummary, Username,
};

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the request; `reason` is its response body.
    #[error("{status}: {reason}")]
    Api { status: StatusCode, reason: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    pub fn reason(&self) -> Option<&str> {
        match self {
            ClientError::Api { reason, .. } => Some(reason),
            ClientError::Http(_) => None,
        }
    }
}

async fn checked(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let reason = response.text().await.unwrap_or_default();
    Err(ClientError::Api { status, reason })
}

/// HTTP client for a mates server, one method per endpoint.
#[derive(Clone)]
pub struct MatesClient {
    base: String,
    http: Client,
}

impl MatesClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<String> {
        let body = RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            name: name.map(str::to_string),
        };
        let response = self
            .http
            .post(format!("{}/register", self.base))
            .json(&body)
            .send()
            .await?;
        Ok(checked(response).await?.text().await?)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginReply> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(format!("{}/login", self.base))
            .json(&body)
            .send()
            .await?;
        Ok(checked(response).await?.json::<_>().await?)
    }

    pub async fn friends(&self, user: &Username) -> Result<Vec<UserSummary>> {
        let response = self
            .http
            .get(format!("{}/{}/friends", self.base, user))
            .send()
            .await?;
        Ok(checked(response).await?.json::<_>().await?)
    }

    pub async fn friend_requests(&self, user: &Username) -> Result<Vec<UserSummary>> {
        let response = self
            .http
            .get(format!("{}/{}/friend-requests", self.base, user))
            .send()
            .await?;
        Ok(checked(response).await?.json::<_>().await?)
    }

    pub async fn send_friend_request(&self, user: &Username, target: &Username) -> Result<String> {
        let body = AddFriendRequest {
            username: target.clone(),
        };
        let response = self
            .http
            .post(format!("{}/{}/send-friend-request", self.base, user))
            .json(&body)
            .send()
            .await?;
        Ok(checked(response).await?.text().await?)
    }

    pub async fn respond_friend_request(
        &self,
        user: &Username,
        requester: &Username,
        accepted: bool,
    ) -> Result<String> {
        let body = RespondFriendRequest {
            username: requester.clone(),
            accepted,
        };
        let response = self
            .http
            .post(format!("{}/{}/respond-friend-request", self.base, user))
            .json(&body)
            .send()
            .await?;
        Ok(checked(response).await?.text().await?)
    }

    pub async fn unfriend(&self, user: &Username, target: &Username) -> Result<String> {
        let body = DeleteFriendRequest {
            username: target.clone(),
        };
        let response = self
            .http
            .post(format!("{}/{}/unfriend", self.base, user))
            .json(&body)
            .send()
            .await?;
        Ok(checked(response).await?.text().await?)
    }

    pub async fn search(&self, user: &Username, query: &str) -> Result<SearchResults> {
        let response = self
            .http
            .get(format!("{}/{}/search", self.base, user))
            .query(&[("username", query)])
            .send()
            .await?;
        Ok(checked(response).await?.json::<_>().await?)
    }

    pub async fn profile(&self, viewer: &Username, other: &Username) -> Result<ProfileView> {
        let response = self
            .http
            .get(format!("{}/{}/user/{}", self.base, viewer, other))
            .send()
            .await?;
        Ok(checked(response).await?.json::<_>().await?)
    }
}
