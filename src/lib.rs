use serde::{Deserialize, Serialize};

/// Unique, immutable account identifier. Case-sensitive.
#[derive(Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Debug, Serialize, Deserialize, Default)]
pub struct Username(pub String);

impl Username {
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical profile page link for this user.
    pub fn profile_link(&self) -> String {
        format!("/user/{}", self.0)
    }

    /// Profile picture link for this user. Serving the image itself is the
    /// media layer's job, not this service's.
    pub fn avatar_url(&self) -> String {
        format!("/profile/img/{}", self.0)
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Username {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Username {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
pub struct LoginReply {
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
pub struct AddFriendRequest {
    pub username: Username,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
pub struct RespondFriendRequest {
    pub username: Username,
    pub accepted: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
pub struct DeleteFriendRequest {
    pub username: Username,
}

/// One user as rendered in friend lists, pending-request lists and search
/// results: display name plus the links a client needs to show them.
#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
pub struct UserSummary {
    pub name: String,
    pub username: Username,
    pub avatar_url: String,
    pub profile_link: String,
}

impl UserSummary {
    pub fn for_user(username: &Username, name: &str) -> Self {
        Self {
            name: name.to_string(),
            username: username.clone(),
            avatar_url: username.avatar_url(),
            profile_link: username.profile_link(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
pub struct SearchResults {
    pub users: Vec<UserSummary>,
}

/// Another user's profile as seen by a particular viewer.
#[derive(Clone, Debug, Serialize, Deserialize, Default, Eq, PartialEq)]
pub struct ProfileView {
    pub name: String,
    pub username: Username,
    pub avatar_url: String,
    pub profile_link: String,
    pub my_profile: bool,
    pub is_friend: bool,
}
