use std::sync::Arc;

use mates_common::{UserSummary, Username};

use crate::error::{AppError, Result};
use crate::store::{UserRecord, UserStore};

/// The friend graph. Every relation change between two users goes through
/// here, which is what keeps the graph invariants honest: no self edges, no
/// duplicate pending requests, and a confirmed friendship is symmetric and
/// never coexists with a pending request between the same pair.
#[derive(Clone)]
pub struct FriendGraph {
    store: Arc<dyn UserStore>,
}

impl FriendGraph {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    fn resolve(&self, username: &Username) -> Result<UserRecord> {
        self.store.get_user(username)?.ok_or(AppError::NotFound)
    }

    /// Records a pending request from `requester` on `target`'s side.
    pub fn request_friend(&self, requester: &Username, target: &Username) -> Result<()> {
        if requester == target {
            return Err(AppError::bad_request("cannot send a friend request to yourself"));
        }
        self.resolve(requester)?;
        self.store.update_user(target, &|record| {
            if record.friends.contains(requester) {
                return Err(AppError::AlreadyFriends);
            }
            if record.friend_requests.contains(requester) {
                return Err(AppError::DuplicateRequest);
            }
            record.friend_requests.push(requester.clone());
            Ok(())
        })?;
        tracing::info!(%requester, %target, "friend request sent");
        Ok(())
    }

    /// Consumes the pending request from `requester`. On accept the edge is
    /// written to both sides and any reverse pending request is dropped; on
    /// decline the request simply disappears.
    pub fn respond_to_request(
        &self,
        responder: &Username,
        requester: &Username,
        accept: bool,
    ) -> Result<()> {
        if responder == requester {
            return Err(AppError::NoSuchRequest);
        }
        self.store.update_pair(responder, requester, &|me, them| {
            let position = me
                .friend_requests
                .iter()
                .position(|u| u == requester)
                .ok_or(AppError::NoSuchRequest)?;
            me.friend_requests.remove(position);
            if accept {
                them.friend_requests.retain(|u| u != responder);
                if !me.friends.contains(requester) {
                    me.friends.push(requester.clone());
                }
                if !them.friends.contains(responder) {
                    them.friends.push(responder.clone());
                }
            }
            Ok(())
        })?;
        tracing::info!(%responder, %requester, accept, "friend request answered");
        Ok(())
    }

    /// Drops a confirmed friendship from both sides.
    pub fn remove_friend(&self, user: &Username, other: &Username) -> Result<()> {
        if user == other {
            return Err(AppError::NotFriends);
        }
        self.store.update_pair(user, other, &|me, them| {
            let position = me
                .friends
                .iter()
                .position(|u| u == other)
                .ok_or(AppError::NotFriends)?;
            me.friends.remove(position);
            them.friends.retain(|u| u != user);
            Ok(())
        })?;
        tracing::info!(%user, %other, "unfriended");
        Ok(())
    }

    pub fn list_friends(&self, user: &Username) -> Result<Vec<UserSummary>> {
        let record = self.resolve(user)?;
        self.summaries(&record.friends)
    }

    /// Pending requests waiting on `user`, oldest first.
    pub fn list_pending_requests(&self, user: &Username) -> Result<Vec<UserSummary>> {
        let record = self.resolve(user)?;
        self.summaries(&record.friend_requests)
    }

    pub fn is_friend(&self, user: &Username, other: &Username) -> Result<bool> {
        Ok(self.resolve(user)?.friends.contains(other))
    }

    /// Case-insensitive substring match over usernames, excluding the caller.
    pub fn search_users(&self, query: &str, exclude: &Username) -> Result<Vec<UserSummary>> {
        self.resolve(exclude)?;
        let needle = query.to_lowercase();
        let mut matches = Vec::new();
        for username in self.store.usernames()? {
            if &username == exclude || !username.as_str().to_lowercase().contains(&needle) {
                continue;
            }
            if let Some(record) = self.store.get_user(&username)? {
                matches.push(UserSummary::for_user(&username, &record.name));
            }
        }
        Ok(matches)
    }

    fn summaries(&self, usernames: &[Username]) -> Result<Vec<UserSummary>> {
        let mut out = Vec::with_capacity(usernames.len());
        for username in usernames {
            if let Some(record) = self.store.get_user(username)? {
                out.push(UserSummary::for_user(username, &record.name));
            }
        }
        Ok(out)
    }
}
