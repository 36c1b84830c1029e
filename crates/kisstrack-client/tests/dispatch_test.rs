use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::extract::ConnectInfo;
use axum::Router;
use kisstrack_client::{
    build_client, call_at, ApiKey, ClientConfig, DispatchError, Endpoint, Tracker,
};
use kisstrack_types::{CallType, Identity, Property, SimpleText, Timestamp};
use tokio::net::TcpListener;

/// The 1x1 transparent GIF the tracking service answers with.
const PIXEL: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0xff, 0xff,
    0xff, 0x00, 0x00, 0x00, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
];

#[derive(Debug, Clone)]
struct Seen {
    peer: SocketAddr,
    method: Method,
    path: String,
    query: Option<String>,
}

type Log = Arc<Mutex<Vec<Seen>>>;

/// Starts a server on an ephemeral port that records every request, along
/// with the client socket it arrived on, and answers with `respond`.
async fn spawn_server<F>(respond: F) -> (SocketAddr, Log)
where
    F: Fn() -> Response + Clone + Send + Sync + 'static,
{
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let recorded = log.clone();
    let app = Router::new().fallback(
        move |ConnectInfo(peer): ConnectInfo<SocketAddr>, method: Method, uri: Uri| {
            let recorded = recorded.clone();
            let respond = respond.clone();
            async move {
                recorded.lock().unwrap().push(Seen {
                    peer,
                    method,
                    path: uri.path().to_string(),
                    query: uri.query().map(str::to_string),
                });
                respond()
            }
        },
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    (addr, log)
}

async fn spawn_pixel_server() -> (SocketAddr, Log) {
    spawn_server(|| ([(header::CONTENT_TYPE, "image/gif")], PIXEL).into_response()).await
}

fn endpoint_for(addr: SocketAddr) -> Endpoint {
    Endpoint::new("http", addr.ip().to_string(), addr.port())
}

fn client() -> reqwest::Client {
    build_client(&ClientConfig::default()).unwrap()
}

fn st(s: &str) -> SimpleText {
    SimpleText::from(s)
}

#[tokio::test]
async fn record_call_sends_one_get_with_ordered_query() {
    let (addr, log) = spawn_pixel_server().await;
    let call = CallType::record(
        st("Purchased"),
        st("user-42"),
        Timestamp::from_epoch_seconds(1_700_000_000).unwrap(),
        [Property::new("item", "Widget")],
    );

    call_at(&client(), &endpoint_for(addr), &ApiKey::new("test-key"), &call)
        .await
        .expect("call should succeed");

    let seen = log.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::GET);
    assert_eq!(seen[0].path, "/e");
    assert_eq!(
        seen[0].query.as_deref(),
        Some("_k=test-key&_n=Purchased&_p=user-42&_d=1&_t=1700000000&item=Widget")
    );
}

#[tokio::test]
async fn set_props_and_alias_use_their_paths() {
    let (addr, log) = spawn_pixel_server().await;
    let tracker = Tracker::with_endpoint(client(), "k", endpoint_for(addr));

    tracker
        .set_props(
            st("user-42"),
            Timestamp::Automatic,
            [Property::new("plan", "pro"), Property::new("seats", "5")],
        )
        .await
        .unwrap();
    tracker.alias(st("anon-7"), st("user-42")).await.unwrap();

    let seen = log.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].path, "/s");
    assert_eq!(
        seen[0].query.as_deref(),
        Some("_k=k&_p=user-42&plan=pro&seats=5")
    );
    assert_eq!(seen[1].path, "/a");
    assert_eq!(seen[1].query.as_deref(), Some("_k=k&_p=anon-7&_n=user-42"));
}

#[tokio::test]
async fn typed_identities_are_rendered() {
    struct UserId(u64);

    impl Identity for UserId {
        fn render_identity(&self) -> SimpleText {
            SimpleText::from(format!("user-{}", self.0))
        }
    }

    let (addr, log) = spawn_pixel_server().await;
    let tracker = Tracker::with_endpoint(client(), "k", endpoint_for(addr));
    tracker
        .record(st("Signed Up"), UserId(9), Timestamp::Automatic, Vec::new())
        .await
        .unwrap();

    let seen = log.lock().unwrap().clone();
    assert_eq!(
        seen[0].query.as_deref(),
        Some("_k=k&_n=Signed+Up&_p=user-9")
    );
}

#[tokio::test]
async fn non_success_status_is_not_an_error() {
    let (addr, log) =
        spawn_server(|| (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()).await;
    let call = CallType::alias(st("a"), st("b"));

    call_at(&client(), &endpoint_for(addr), &ApiKey::new("k"), &call)
        .await
        .expect("status codes are never inspected");
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn large_bodies_are_drained() {
    let (addr, log) = spawn_server(|| vec![0u8; 256 * 1024].into_response()).await;
    let tracker = Tracker::with_endpoint(client(), "k", endpoint_for(addr));

    for _ in 0..3 {
        tracker.alias(st("a"), st("b")).await.unwrap();
    }

    let seen = log.lock().unwrap().clone();
    assert_eq!(seen.len(), 3);
    let connections: HashSet<SocketAddr> = seen.iter().map(|s| s.peer).collect();
    assert_eq!(
        connections.len(),
        1,
        "a fully read response returns its connection to the pool for reuse"
    );
}

#[tokio::test]
async fn redirects_are_not_followed() {
    let (target, target_log) = spawn_pixel_server().await;
    let location = format!("http://{target}/e");
    let (addr, log) = spawn_server(move || {
        (StatusCode::FOUND, [(header::LOCATION, location.clone())]).into_response()
    })
    .await;

    let call = CallType::alias(st("a"), st("b"));
    call_at(&client(), &endpoint_for(addr), &ApiKey::new("secret"), &call)
        .await
        .unwrap();

    assert_eq!(log.lock().unwrap().len(), 1);
    assert!(
        target_log.lock().unwrap().is_empty(),
        "the redirect target must never see the API key"
    );
}

#[tokio::test]
async fn redirect_following_client_still_completes() {
    let (target, target_log) = spawn_pixel_server().await;
    let location = format!("http://{target}/e");
    let (addr, log) = spawn_server(move || {
        (StatusCode::FOUND, [(header::LOCATION, location.clone())]).into_response()
    })
    .await;

    // reqwest's default client follows up to 10 redirects.
    let following = reqwest::Client::new();
    let call = CallType::alias(st("a"), st("b"));
    call_at(&following, &endpoint_for(addr), &ApiKey::new("secret"), &call)
        .await
        .expect("a followed redirect is logged, not treated as an error");

    assert_eq!(log.lock().unwrap().len(), 1);
    let reached = target_log.lock().unwrap().clone();
    assert_eq!(reached.len(), 1);
    assert_eq!(reached[0].path, "/e");
}

#[tokio::test]
async fn transport_failure_propagates_and_leaves_no_state() {
    let closed = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let client = client();
    let key = ApiKey::new("k");
    let call = CallType::set_props(st("user-42"), Timestamp::Automatic, [Property::new("a", "b")]);

    let err = call_at(&client, &endpoint_for(closed), &key, &call)
        .await
        .expect_err("nothing is listening");
    assert!(matches!(err, DispatchError::Transport(_)), "{err:?}");

    let (addr, log) = spawn_pixel_server().await;
    call_at(&client, &endpoint_for(addr), &key, &call)
        .await
        .expect("a later call over the same client succeeds");
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let (addr, log) = spawn_pixel_server().await;
    let tracker = Tracker::with_endpoint(client(), "k", endpoint_for(addr));

    let mut handles = Vec::new();
    for i in 0..16 {
        let tracker = tracker.clone();
        handles.push(tokio::spawn(async move {
            tracker
                .record(
                    st("Tick"),
                    SimpleText::from(format!("user-{i}")),
                    Timestamp::Automatic,
                    Vec::new(),
                )
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let seen = log.lock().unwrap().clone();
    assert_eq!(seen.len(), 16);
    for i in 0..16 {
        let expected = format!("_k=k&_n=Tick&_p=user-{i}");
        assert!(seen.iter().any(|s| s.query.as_deref() == Some(expected.as_str())));
    }
}
