//! The reqwest adapter against a local stub of the voting service.

mod common;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{head, post};
use axum::Router;
use common::{player, RecordingChat, RecordingCommands};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use vote_bridge::{
    CommandEvent, CommandSender, HostServices, HttpTransport, MainThreadQueue, ReqwestTransport,
    TransportError, VoteBridge, VoteConfig, VoteRequest, VoteState,
};

#[derive(Clone, Default)]
struct StubState {
    voted_ips: Arc<Mutex<Vec<String>>>,
}

async fn generate(
    State(state): State<StubState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    if headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) != Some("application/json")
    {
        return (StatusCode::UNSUPPORTED_MEDIA_TYPE, String::new());
    }
    let Ok(request) = serde_json::from_slice::<VoteRequest>(&body) else {
        return (StatusCode::BAD_REQUEST, String::new());
    };

    match slug.as_str() {
        "limited" => (StatusCode::TOO_MANY_REQUESTS, String::new()),
        "broken" => (StatusCode::OK, "<html>oops</html>".to_string()),
        _ => {
            state.voted_ips.lock().push(request.ip);
            (
                StatusCode::OK,
                r#"{"url":"https://v.example/x","code":"abc123"}"#.to_string(),
            )
        }
    }
}

async fn validate(Query(params): Query<HashMap<String, String>>) -> StatusCode {
    match params.get("code").map(String::as_str) {
        Some("abc123") => StatusCode::OK,
        Some("late") => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::GONE,
    }
}

async fn spawn_stub() -> (SocketAddr, StubState) {
    let state = StubState::default();
    let app = Router::new()
        .route("/api/external-votes/:slug", post(generate))
        .route("/api/external-votes", head(validate))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_post_returns_status_and_body() {
    let (addr, state) = spawn_stub().await;
    let transport = ReqwestTransport::new().unwrap();

    let result = transport
        .post(
            &format!("http://{addr}/api/external-votes/survival"),
            br#"{"ip":"198.51.100.4"}"#.to_vec(),
            &[("Content-Type", "application/json")],
        )
        .await
        .unwrap();

    assert_eq!(result.status, 200);
    assert_eq!(
        &result.body[..],
        br#"{"url":"https://v.example/x","code":"abc123"}"#
    );
    assert_eq!(*state.voted_ips.lock(), vec!["198.51.100.4".to_string()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_error_statuses_are_results() {
    let (addr, _) = spawn_stub().await;
    let transport = ReqwestTransport::new().unwrap();

    let limited = transport
        .post(
            &format!("http://{addr}/api/external-votes/limited"),
            br#"{"ip":"198.51.100.4"}"#.to_vec(),
            &[("Content-Type", "application/json")],
        )
        .await
        .unwrap();
    assert_eq!(limited.status, 429);

    let expired = transport
        .head(&format!("http://{addr}/api/external-votes?code=late"))
        .await
        .unwrap();
    assert_eq!(expired.status, 504);
    assert!(expired.body.is_empty());

    let gone = transport
        .head(&format!("http://{addr}/api/external-votes?code=unknown"))
        .await
        .unwrap();
    assert_eq!(gone.status, 410);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = ReqwestTransport::new().unwrap();
    let result = transport
        .head(&format!("http://{addr}/api/external-votes?code=abc123"))
        .await;
    assert!(matches!(result, Err(TransportError::Connect(_))), "got {result:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_closed_transport_fails_fast() {
    let (addr, _) = spawn_stub().await;
    let transport = ReqwestTransport::new().unwrap();
    transport.close();

    let result = transport
        .head(&format!("http://{addr}/api/external-votes?code=abc123"))
        .await;
    assert_eq!(result, Err(TransportError::Closed));
}

struct LiveBridge {
    bridge: VoteBridge,
    chat: Arc<RecordingChat>,
    commands: Arc<RecordingCommands>,
    queue: MainThreadQueue,
}

fn live_bridge(addr: SocketAddr, server_id: &str) -> LiveBridge {
    let chat = Arc::new(RecordingChat::default());
    let commands = Arc::new(RecordingCommands::default());
    let queue = MainThreadQueue::new();
    let host = HostServices::new(chat.clone(), commands.clone(), Arc::new(queue.handle()));

    let config = VoteConfig {
        server_id: server_id.to_string(),
        reward_commands: vec!["give %player-name% diamond 1".to_string()],
        api_base_url: format!("http://{addr}"),
        ..Default::default()
    };
    let bridge = VoteBridge::start(
        config,
        Arc::new(ReqwestTransport::new().unwrap()),
        host,
        tokio::runtime::Handle::current(),
    )
    .unwrap();

    LiveBridge {
        bridge,
        chat,
        commands,
        queue,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_full_vote_over_http() {
    let (addr, state) = spawn_stub().await;
    let live = live_bridge(addr, "survival");

    let state_after = common::finish(live.bridge.handle_command(CommandEvent::new(
        CommandSender::Player(player("Steve")),
        "/vote",
    )))
    .await;
    assert!(matches!(state_after, VoteState::Rewarded), "got {state_after:?}");
    assert_eq!(*state.voted_ips.lock(), vec!["203.0.113.7".to_string()]);
    assert!(live
        .chat
        .texts()
        .contains(&"Your vote link: https://v.example/x".to_string()));

    live.queue.run_pending();
    assert_eq!(live.commands.commands(), vec!["give Steve diamond 1"]);

    live.bridge.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_body_over_http() {
    let (addr, _) = spawn_stub().await;
    let live = live_bridge(addr, "broken");

    let state = common::finish(live.bridge.handle_command(CommandEvent::new(
        CommandSender::Player(player("Steve")),
        "/blvote",
    )))
    .await;
    assert!(matches!(state, VoteState::Failed(vote_bridge::VoteError::Decode(_))));
    assert_eq!(live.queue.pending(), 0);
}
