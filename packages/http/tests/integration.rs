use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eventual_http::{
    Client, FailureBody, FetchError, ObservedState, RequestOptions,
};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
struct Post {
    title: String,
    body: String,
    #[serde(rename = "userId")]
    user_id: u64,
}

async fn client_for(server: &MockServer) -> Client {
    Client::new(&server.uri()).unwrap()
}

#[tokio::test]
async fn get_json_resolves_to_decoded_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 123,
            "name": "Alice"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let user = client
        .get_json("users/123", RequestOptions::new())
        .outcome()
        .await
        .unwrap();

    assert_eq!(user["id"], 123);
    assert_eq!(user["name"], "Alice");
}

#[tokio::test]
async fn post_json_sends_serialized_body_and_decodes_response() {
    let server = MockServer::start().await;

    let new_post = Post {
        title: "a".to_string(),
        body: "b".to_string(),
        user_id: 1,
    };

    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(body_json(&new_post))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 101
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let created = client
        .post_json("posts", &new_post, RequestOptions::new())
        .outcome()
        .await
        .unwrap();

    assert_eq!(created, serde_json::json!({"id": 101}));
}

#[tokio::test]
async fn json_404_is_classified_with_structured_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": "missing"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let error = client
        .get_json("missing", RequestOptions::new())
        .outcome()
        .await
        .unwrap_err();

    match error {
        FetchError::Http(failure) => {
            assert_eq!(failure.status, 404);
            assert_eq!(
                failure.body,
                FailureBody::Json(serde_json::json!({"error": "missing"}))
            );
        }
        other => panic!("expected Http failure, got {other:?}"),
    }
}

#[tokio::test]
async fn plain_text_500_is_classified_with_raw_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let error = client
        .get_json("broken", RequestOptions::new())
        .outcome()
        .await
        .unwrap_err();

    match error {
        FetchError::Http(failure) => {
            assert_eq!(failure.status, 500);
            assert_eq!(failure.body, FailureBody::Text("boom".to_string()));
        }
        other => panic!("expected Http failure, got {other:?}"),
    }
}

#[tokio::test]
async fn recover_intercepts_a_classified_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": "missing"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let value = client
        .get_json("missing", RequestOptions::new())
        .recover(|cause| match cause {
            FetchError::Http(failure) if failure.status == 404 => {
                Ok(serde_json::json!({"fallback": true}))
            }
            other => Err(other),
        })
        .outcome()
        .await
        .unwrap();

    assert_eq!(value, serde_json::json!({"fallback": true}));
}

#[tokio::test]
async fn default_and_per_call_headers_are_merged_with_per_call_winning() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(header("x", "2"))
        .and(header("y", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server).await.with_default_header("x", "1");
    let items = client
        .get_json(
            "items",
            RequestOptions::new().with_header("x", "2").with_header("y", "2"),
        )
        .outcome()
        .await
        .unwrap();

    assert_eq!(items, serde_json::json!([]));
}

#[tokio::test]
async fn observer_sees_placeholder_then_settled_value() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"ok": true}))
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let future = client.get_json("slow", RequestOptions::new());

    let states = Arc::new(Mutex::new(Vec::new()));
    let sink = states.clone();
    let _sub = future.observe(move |state| sink.lock().unwrap().push(state));

    assert_eq!(future.outcome().await.unwrap(), serde_json::json!({"ok": true}));

    let states = states.lock().unwrap();
    assert!(matches!(states[0], ObservedState::Pending(None)));
    match &states[1] {
        ObservedState::Resolved(value) => assert_eq!(value, &serde_json::json!({"ok": true})),
        other => panic!("expected resolved state, got {other:?}"),
    }
    assert_eq!(states.len(), 2);
}

#[tokio::test]
async fn late_observer_replays_the_settled_value() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": 42})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let future = client.get_json("data", RequestOptions::new());
    future.outcome().await.unwrap();

    let states = Arc::new(Mutex::new(Vec::new()));
    let sink = states.clone();
    let _sub = future.observe(move |state| sink.lock().unwrap().push(state));

    let states = states.lock().unwrap();
    assert_eq!(states.len(), 1);
    match &states[0] {
        ObservedState::Resolved(value) => assert_eq!(value, &serde_json::json!({"value": 42})),
        other => panic!("expected resolved state, got {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_propagates_unclassified() {
    // Grab a port nothing is listening on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = Client::new(&format!("http://127.0.0.1:{port}/")).unwrap();
    let error = client
        .get_json("data", RequestOptions::new())
        .outcome()
        .await
        .unwrap_err();

    assert_eq!(error.status(), None);
    assert!(matches!(error, FetchError::Transport(_)));
}

#[tokio::test]
async fn delete_and_put_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1})))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let updated = client
        .put_json(
            "posts/1",
            &serde_json::json!({"title": "edited"}),
            RequestOptions::new(),
        )
        .outcome()
        .await
        .unwrap();
    assert_eq!(updated, serde_json::json!({"id": 1}));

    let deleted = client
        .delete_json("posts/1", RequestOptions::new())
        .outcome()
        .await
        .unwrap();
    assert_eq!(deleted, serde_json::json!({}));
}

#[tokio::test]
async fn finalize_runs_after_settlement_without_changing_the_outcome() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"n": 1})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let settled = Arc::new(Mutex::new(false));
    let flag = settled.clone();

    let value = client
        .get_json("data", RequestOptions::new())
        .finalize(move || *flag.lock().unwrap() = true)
        .outcome()
        .await
        .unwrap();

    assert_eq!(value, serde_json::json!({"n": 1}));
    assert!(*settled.lock().unwrap());
}
