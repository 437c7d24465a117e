use mates_client::{ClientError, MatesClient};
use mates_common::Username;
use mates_test::spawn_server;

fn reason(err: &ClientError) -> &str {
    err.reason().expect("expected an api refusal")
}

fn status(err: &ClientError) -> u16 {
    match err {
        ClientError::Api { status, .. } => status.as_u16(),
        other => panic!("expected an api refusal, got {other}"),
    }
}

fn usernames(summaries: &[mates_common::UserSummary]) -> Vec<&str> {
    summaries.iter().map(|s| s.username.as_str()).collect()
}

#[tokio::test]
async fn request_accept_unfriend_round_trip() -> anyhow::Result<()> {
    let server = spawn_server()?;
    let client = MatesClient::new(server.base_url());

    client.register("alice", "pw-a", Some("Alice A")).await?;
    client.register("bob", "pw-b", Some("Bob B")).await?;
    let alice = Username::from("alice");
    let bob = Username::from("bob");

    assert!(client.friends(&alice).await?.is_empty());

    assert_eq!(client.send_friend_request(&alice, &bob).await?, "ok");
    let pending = client.friend_requests(&bob).await?;
    assert_eq!(usernames(&pending), ["alice"]);
    assert_eq!(pending[0].name, "Alice A");
    assert_eq!(pending[0].profile_link, "/user/alice");
    assert_eq!(pending[0].avatar_url, "/profile/img/alice");
    assert!(client.friend_requests(&alice).await?.is_empty());
    assert!(client.friends(&bob).await?.is_empty());

    assert_eq!(client.respond_friend_request(&bob, &alice, true).await?, "ok");
    assert_eq!(usernames(&client.friends(&alice).await?), ["bob"]);
    assert_eq!(usernames(&client.friends(&bob).await?), ["alice"]);
    assert!(client.friend_requests(&bob).await?.is_empty());

    assert_eq!(client.unfriend(&alice, &bob).await?, "friend deleted");
    assert!(client.friends(&alice).await?.is_empty());
    assert!(client.friends(&bob).await?.is_empty());

    // a declined request disappears without creating a relation
    client.send_friend_request(&alice, &bob).await?;
    client.respond_friend_request(&bob, &alice, false).await?;
    assert!(client.friends(&alice).await?.is_empty());
    assert!(client.friends(&bob).await?.is_empty());
    assert!(client.friend_requests(&bob).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn relation_errors_carry_their_reasons() -> anyhow::Result<()> {
    let server = spawn_server()?;
    let client = MatesClient::new(server.base_url());

    client.register("alice", "pw", None).await?;
    client.register("bob", "pw", None).await?;
    let alice = Username::from("alice");
    let bob = Username::from("bob");
    let ghost = Username::from("ghost");

    let err = client.send_friend_request(&alice, &ghost).await.unwrap_err();
    assert_eq!(status(&err), 404);
    assert_eq!(reason(&err), "no user with provided username");

    let err = client.send_friend_request(&ghost, &alice).await.unwrap_err();
    assert_eq!(status(&err), 404);

    let err = client.send_friend_request(&alice, &alice).await.unwrap_err();
    assert_eq!(status(&err), 400);
    assert_eq!(reason(&err), "cannot send a friend request to yourself");

    let err = client
        .respond_friend_request(&bob, &alice, true)
        .await
        .unwrap_err();
    assert_eq!(status(&err), 400);
    assert_eq!(
        reason(&err),
        "the user with provided username did not send a friend request to you"
    );

    let err = client.unfriend(&alice, &bob).await.unwrap_err();
    assert_eq!(status(&err), 400);
    assert_eq!(reason(&err), "user with username is not in your friend list");

    client.send_friend_request(&alice, &bob).await?;
    let err = client.send_friend_request(&alice, &bob).await.unwrap_err();
    assert_eq!(status(&err), 400);
    assert_eq!(reason(&err), "already in friend list");

    client.respond_friend_request(&bob, &alice, true).await?;
    let err = client.send_friend_request(&bob, &alice).await.unwrap_err();
    assert_eq!(reason(&err), "already in friend list");

    Ok(())
}

#[tokio::test]
async fn mutual_requests_collapse_on_accept() -> anyhow::Result<()> {
    let server = spawn_server()?;
    let client = MatesClient::new(server.base_url());

    client.register("alice", "pw", None).await?;
    client.register("bob", "pw", None).await?;
    let alice = Username::from("alice");
    let bob = Username::from("bob");

    client.send_friend_request(&alice, &bob).await?;
    client.send_friend_request(&bob, &alice).await?;
    assert_eq!(client.friend_requests(&alice).await?.len(), 1);
    assert_eq!(client.friend_requests(&bob).await?.len(), 1);

    client.respond_friend_request(&bob, &alice, true).await?;
    assert_eq!(usernames(&client.friends(&alice).await?), ["bob"]);
    assert_eq!(usernames(&client.friends(&bob).await?), ["alice"]);
    assert!(client.friend_requests(&alice).await?.is_empty());
    assert!(client.friend_requests(&bob).await?.is_empty());

    // the reverse request was purged, so answering it now fails
    let err = client
        .respond_friend_request(&alice, &bob, true)
        .await
        .unwrap_err();
    assert_eq!(
        reason(&err),
        "the user with provided username did not send a friend request to you"
    );

    Ok(())
}

#[tokio::test]
async fn search_matches_substrings_case_insensitively() -> anyhow::Result<()> {
    let server = spawn_server()?;
    let client = MatesClient::new(server.base_url());

    client.register("alice", "pw", Some("Alice A")).await?;
    client.register("Alfred", "pw", None).await?;
    client.register("bob", "pw", None).await?;
    let alice = Username::from("alice");
    let bob = Username::from("bob");

    let results = client.search(&alice, "AL").await?;
    assert_eq!(usernames(&results.users), ["Alfred"]);

    let results = client.search(&bob, "al").await?;
    assert_eq!(usernames(&results.users), ["Alfred", "alice"]);
    assert_eq!(results.users[1].name, "Alice A");
    assert_eq!(results.users[1].profile_link, "/user/alice");

    assert!(client.search(&alice, "zed").await?.users.is_empty());

    // an empty query matches everyone else
    let results = client.search(&alice, "").await?;
    assert_eq!(usernames(&results.users), ["Alfred", "bob"]);

    let err = client.search(&Username::from("ghost"), "al").await.unwrap_err();
    assert_eq!(status(&err), 404);

    Ok(())
}

#[tokio::test]
async fn malformed_requests_are_refused() -> anyhow::Result<()> {
    let server = spawn_server()?;
    let client = MatesClient::new(server.base_url());
    let http = reqwest::Client::new();

    client.register("alice", "pw", None).await?;

    let response = http
        .get(format!("{}/alice/search", server.base_url()))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(
        response.text().await?,
        "no username (GET) parameter found in the request"
    );

    let response = http
        .post(format!("{}/alice/send-friend-request", server.base_url()))
        .json(&serde_json::json!({ "wrong": "key" }))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(response.text().await?, "request does not have an important key");

    let response = http
        .post(format!("{}/alice/respond-friend-request", server.base_url()))
        .json(&serde_json::json!({ "username": "bob" }))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(response.text().await?, "request does not have an important key");

    Ok(())
}
