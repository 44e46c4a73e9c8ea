use super::*;
use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Debug)]
struct CapturedRequest {
    content_type: String,
    body: Vec<u8>,
}

#[derive(Clone)]
struct CaptureState {
    tx: Arc<Mutex<Option<oneshot::Sender<CapturedRequest>>>>,
    reply: serde_json::Value,
}

async fn capture(State(state): State<CaptureState>, headers: HeaderMap, body: Bytes) -> Json<serde_json::Value> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(CapturedRequest {
            content_type,
            body: body.to_vec(),
        });
    }
    Json(state.reply.clone())
}

async fn serve(app: Router) -> Result<String> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

async fn spawn_capture_server(
    path: &str,
    reply: serde_json::Value,
) -> Result<(String, oneshot::Receiver<CapturedRequest>)> {
    let (tx, rx) = oneshot::channel();
    let state = CaptureState {
        tx: Arc::new(Mutex::new(Some(tx))),
        reply,
    };
    let app = Router::new().route(path, post(capture)).with_state(state);
    Ok((serve(app).await?, rx))
}

async fn spawn_slow_server(path: &str, delay: Duration) -> Result<String> {
    let app = Router::new().route(
        path,
        post(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!({"response": "too late"}))
        }),
    );
    serve(app).await
}

#[test]
fn default_timeout_is_thirty_seconds() {
    let client = ApiClient::new("http://127.0.0.1:5000").expect("client");
    assert_eq!(client.timeout(), Duration::from_secs(30));
    assert_eq!(client.base_url().as_str(), "http://127.0.0.1:5000/");
}

#[test]
fn rejects_invalid_base_url() {
    let err = ApiClient::new("not a url").expect_err("must fail");
    assert_eq!(err.kind(), ClientErrorKind::Config);
}

#[tokio::test]
async fn marketing_plan_posts_exact_json_body() {
    let (url, captured) = spawn_capture_server(
        "/marketing/generate",
        json!({"conversation": [{"round": 1, "question": "q", "answer": "a"}]}),
    )
    .await
    .expect("spawn server");
    let client = ApiClient::new(&url).expect("client");

    let result = client
        .generate_marketing_plan(
            &MarketingRequest {
                product: "A".into(),
                target: "B".into(),
                goal: "C".into(),
            },
            &CancelSignal::never(),
        )
        .await
        .expect("plan");

    let captured = captured.await.expect("captured");
    assert_eq!(captured.content_type, "application/json");
    assert_eq!(
        String::from_utf8(captured.body).expect("utf8"),
        r#"{"product":"A","target":"B","goal":"C"}"#
    );
    let turns = result.conversation.expect("conversation");
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].answer, "a");
}

#[tokio::test]
async fn refine_accepts_plain_text_plan() {
    let (url, captured) = spawn_capture_server("/marketing/refine", json!("优化后的完整方案"))
        .await
        .expect("spawn server");
    let client = ApiClient::new(&url).expect("client");

    let reply = client
        .refine_marketing_plan(
            &RefineRequest {
                plan: "初始方案".into(),
                feedback: "预算减半".into(),
            },
            &CancelSignal::never(),
        )
        .await
        .expect("refined plan");

    let captured = captured.await.expect("captured");
    let sent: serde_json::Value = serde_json::from_slice(&captured.body).expect("json");
    assert_eq!(sent, json!({"plan": "初始方案", "feedback": "预算减半"}));
    assert_eq!(reply, RefineReply::Plan("优化后的完整方案".into()));
}

#[tokio::test]
async fn expert_search_is_form_encoded() {
    let (url, captured) = spawn_capture_server(
        "/process",
        json!({"summary": "s", "facts": ["f1", "f2"], "interest": [], "letter": ["hello"]}),
    )
    .await
    .expect("spawn server");
    let client = ApiClient::new(&url).expect("client");
    let request = SearchRequest::new()
        .with_field("category", "beauty")
        .with_field("name", "alice");

    let result = client
        .search_experts(&request, &CancelSignal::never())
        .await
        .expect("result");

    let captured = captured.await.expect("captured");
    assert_eq!(captured.content_type, "application/x-www-form-urlencoded");
    assert_eq!(captured.body, b"category=beauty&name=alice");
    assert_eq!(result.facts, vec!["f1".to_string(), "f2".to_string()]);
    assert_eq!(result.first_letter(), Some("hello"));
}

#[tokio::test]
async fn slow_response_maps_to_timeout_not_network_error() {
    let url = spawn_slow_server("/chat", Duration::from_millis(500))
        .await
        .expect("spawn server");
    let client = ApiClient::new(&url)
        .expect("client")
        .with_timeout(Duration::from_millis(50));

    let err = client
        .chat(
            &ChatRequest {
                message: "hi".into(),
            },
            &CancelSignal::never(),
        )
        .await
        .expect_err("must time out");

    assert_eq!(err.kind(), ClientErrorKind::Timeout);
    assert!(err.to_string().contains("/chat"));
}

#[tokio::test]
async fn cancel_signal_aborts_in_flight_request() {
    let url = spawn_slow_server("/chat", Duration::from_millis(500))
        .await
        .expect("spawn server");
    let client = ApiClient::new(&url).expect("client");
    let (handle, signal) = cancel_pair();

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.cancel();
    });
    let err = client
        .chat(
            &ChatRequest {
                message: "hi".into(),
            },
            &signal,
        )
        .await
        .expect_err("must be cancelled");
    canceller.await.expect("canceller");

    assert_eq!(err.kind(), ClientErrorKind::Cancelled);
    assert!(signal.is_cancelled());
}

#[tokio::test]
async fn error_status_carries_server_message() {
    let app = Router::new().route(
        "/marketing/generate",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "缺少必要参数"})),
            )
        }),
    );
    let url = serve(app).await.expect("spawn server");
    let client = ApiClient::new(&url).expect("client");

    let err = client
        .generate_marketing_plan(
            &MarketingRequest {
                product: String::new(),
                target: String::new(),
                goal: String::new(),
            },
            &CancelSignal::never(),
        )
        .await
        .expect_err("must fail");

    assert_eq!(err.kind(), ClientErrorKind::Status);
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.server_message(), Some("缺少必要参数"));
}

#[tokio::test]
async fn error_status_without_body_has_no_server_message() {
    let app = Router::new().route("/chat", post(|| async { StatusCode::BAD_GATEWAY }));
    let url = serve(app).await.expect("spawn server");
    let client = ApiClient::new(&url).expect("client");

    let err = client
        .chat(
            &ChatRequest {
                message: "hi".into(),
            },
            &CancelSignal::never(),
        )
        .await
        .expect_err("must fail");

    assert_eq!(err.status(), Some(502));
    assert_eq!(err.server_message(), None);
}

#[tokio::test]
async fn inventory_error_payload_is_returned_in_band() {
    let (url, captured) = spawn_capture_server(
        "/inventory/analyze",
        json!({
            "error": "分析库存时出现错误",
            "factors": {"weather_impact": {}, "social_trends": {}, "seasonal_events": []},
            "strategy": {},
            "logistics": {}
        }),
    )
    .await
    .expect("spawn server");
    let client = ApiClient::new(&url).expect("client");

    let result = client
        .analyze_inventory(
            &InventoryRequest {
                product: "雨伞".into(),
                city: "上海".into(),
                current_stock: 120,
            },
            &CancelSignal::never(),
        )
        .await
        .expect("result");

    let captured = captured.await.expect("captured");
    let sent: serde_json::Value = serde_json::from_slice(&captured.body).expect("json");
    assert_eq!(
        sent,
        json!({"product": "雨伞", "city": "上海", "current_stock": 120})
    );
    assert_eq!(result.into_outcome().unwrap_err(), "分析库存时出现错误");
}

#[tokio::test]
async fn non_json_success_body_is_a_decode_error() {
    let app = Router::new().route("/chat", post(|| async { "<html>oops</html>" }));
    let url = serve(app).await.expect("spawn server");
    let client = ApiClient::new(&url).expect("client");

    let err = client
        .chat(
            &ChatRequest {
                message: "hi".into(),
            },
            &CancelSignal::never(),
        )
        .await
        .expect_err("must fail");

    assert_eq!(err.kind(), ClientErrorKind::Decode);
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = ApiClient::new(&format!("http://{addr}")).expect("client");

    let err = client
        .chat(
            &ChatRequest {
                message: "hi".into(),
            },
            &CancelSignal::never(),
        )
        .await
        .expect_err("must fail");

    assert_eq!(err.kind(), ClientErrorKind::Network);
}

#[tokio::test]
async fn base_url_path_prefix_is_preserved() {
    let (url, captured) = spawn_capture_server("/api/chat", json!({"response": "pong"}))
        .await
        .expect("spawn server");
    let client = ApiClient::new(&format!("{url}/api")).expect("client");

    let reply = client
        .chat(
            &ChatRequest {
                message: "ping".into(),
            },
            &CancelSignal::never(),
        )
        .await
        .expect("reply");

    assert!(captured.await.is_ok());
    assert_eq!(reply.response.as_deref(), Some("pong"));
}
