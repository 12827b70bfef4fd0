//! Behavior of the standard middlewares, each composed around a recording base fetch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use assert2::{check, let_assert};
use chrono::{TimeZone, Utc};
use fetchwrap::middleware::{
    Logger, OptionsByUrlPattern, ReceiveJson, SendJson, Testing, UrlParams,
};
use fetchwrap::{
    Error, Fetch, FetchOptions, FetchWrap, Json, Method, Mock, Params, Reply, Response, Spy,
    fetch_fn,
};
use serde_json::json;

type Calls = Arc<Mutex<Vec<(String, FetchOptions)>>>;

/// Base fetch resolving every call to `reply`, recording what it was given.
fn mock_fetch(reply: impl Into<Reply>) -> (impl Fetch, Calls) {
    let reply = reply.into();
    let calls: Calls = Arc::default();
    let record = Arc::clone(&calls);
    let fetch = fetch_fn(move |url: String, options: FetchOptions| {
        record.lock().expect("lock").push((url, options));
        let reply = reply.clone();
        async move { Ok(reply) }
    });
    (fetch, calls)
}

/// Base fetch failing every call with `error()`.
fn failing_fetch(error: impl Fn() -> Error + Send + Sync + 'static) -> impl Fetch {
    fetch_fn(move |_url: String, _options: FetchOptions| {
        let error = error();
        async move { Err(error) }
    })
}

fn recorded(calls: &Calls) -> Vec<(String, FetchOptions)> {
    calls.lock().expect("lock").clone()
}

fn params(value: serde_json::Value) -> Params {
    let_assert!(serde_json::Value::Object(map) = value);
    map
}

fn log_lines() -> (Logger, Arc<Mutex<Vec<String>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let logger =
        Logger::new().with_sink(move |line: &str| sink.lock().expect("lock").push(line.to_string()));
    (logger, lines)
}

fn json_response(body: &str) -> Response {
    Response::new(200, HashMap::new(), body.to_string()).with_header("content-type", "application/json")
}

// ============================================================================
// OptionsByUrlPattern
// ============================================================================

fn authorization_rules() -> OptionsByUrlPattern {
    OptionsByUrlPattern::new()
        .try_with_pattern(
            "http://localhost/*",
            FetchOptions::new().with_header("Authorization", "Token qwerty"),
        )
        .expect("valid pattern")
}

#[tokio::test]
async fn options_by_url_pattern_adds_options_to_matching_url() {
    let (base, calls) = mock_fetch(json!(123));
    let fetch = FetchWrap::builder(base).with(authorization_rules()).build();

    fetch.get("http://localhost/fake-url").await.expect("reply");

    let calls = recorded(&calls);
    check!(calls.len() == 1);
    check!(calls[0].1 == FetchOptions::new().with_header("Authorization", "Token qwerty"));
}

#[tokio::test]
async fn options_by_url_pattern_ignores_other_urls() {
    let (base, calls) = mock_fetch(json!(123));
    let fetch = FetchWrap::builder(base).with(authorization_rules()).build();

    fetch.get("http://somedomain.com/fake-url").await.expect("reply");

    check!(recorded(&calls)[0].1 == FetchOptions::new());
}

#[tokio::test]
async fn options_by_url_pattern_keeps_caller_headers() {
    let (base, calls) = mock_fetch(json!(123));
    let fetch = FetchWrap::builder(base).with(authorization_rules()).build();

    fetch
        .fetch(
            "http://localhost/fake-url",
            FetchOptions::new()
                .with_header("Authorization", "Token mine")
                .with_header("Accept", "text/plain"),
        )
        .await
        .expect("reply");

    let options = &recorded(&calls)[0].1;
    check!(options.header("Authorization") == Some("Token mine"));
    check!(options.header("Accept") == Some("text/plain"));
}

#[tokio::test]
async fn options_by_url_pattern_matches_anywhere_in_the_url() {
    let (base, calls) = mock_fetch(json!(123));
    let rules = OptionsByUrlPattern::new()
        .try_with_pattern(
            "/api/*",
            FetchOptions::new().with_header("X-Api-Version", "2"),
        )
        .expect("valid pattern");
    let fetch = FetchWrap::builder(base).with(rules).build();

    fetch.get("https://example.com/api/users").await.expect("reply");
    fetch.get("https://example.com/web/users").await.expect("reply");

    let calls = recorded(&calls);
    check!(calls[0].1.header("X-Api-Version") == Some("2"));
    check!(calls[1].1.header("X-Api-Version") == None);
}

// ============================================================================
// Logger
// ============================================================================

#[tokio::test]
async fn logger_logs_request_and_success() {
    let (base, _calls) = mock_fetch(json!(123));
    let (logger, lines) = log_lines();
    let fetch = FetchWrap::builder(base).with(logger.success(true)).build();

    fetch.get("http://localhost/fake-url").await.expect("reply");

    check!(
        *lines.lock().expect("lock")
            == vec![
                "[fetch] GET http://localhost/fake-url",
                "[fetch] SUCCESS for GET http://localhost/fake-url",
            ]
    );
}

#[tokio::test]
async fn logger_skips_success_unless_asked() {
    let (base, _calls) = mock_fetch(json!(123));
    let (logger, lines) = log_lines();
    let fetch = FetchWrap::builder(base).with(logger).build();

    fetch
        .fetch("http://localhost/users", FetchOptions::new().with_method(Method::Post))
        .await
        .expect("reply");

    check!(*lines.lock().expect("lock") == vec!["[fetch] POST http://localhost/users"]);
}

#[tokio::test]
async fn logger_logs_request_and_error() {
    let (logger, lines) = log_lines();
    let fetch = FetchWrap::builder(failing_fetch(|| Error::connection("request failed")))
        .with(logger)
        .build();

    let result = fetch.get("http://localhost/fake-url").await;

    let_assert!(Err(Error::Connection(message)) = result);
    check!(message == "request failed");
    check!(
        *lines.lock().expect("lock")
            == vec![
                "[fetch] GET http://localhost/fake-url",
                "[fetch] FAILED connection error: request failed for GET http://localhost/fake-url",
            ]
    );
}

#[tokio::test]
async fn logger_leaves_expected_http_errors_to_the_caller() {
    let (logger, lines) = log_lines();
    let fetch = FetchWrap::builder(failing_fetch(|| {
        Error::http(Response::new(404, HashMap::new(), ""))
    }))
    .with(logger)
    .build();

    let result = fetch.get("http://localhost/missing").await;

    let_assert!(Err(err) = result);
    check!(err.status() == Some(404));
    check!(*lines.lock().expect("lock") == vec!["[fetch] GET http://localhost/missing"]);
}

#[tokio::test]
async fn logger_reports_other_http_errors() {
    let (logger, lines) = log_lines();
    let fetch = FetchWrap::builder(failing_fetch(|| {
        Error::http(Response::new(405, HashMap::new(), ""))
    }))
    .with(logger)
    .build();

    let result = fetch.get("http://localhost/users").await;

    let_assert!(Err(err) = result);
    check!(err.status() == Some(405));
    check!(
        lines.lock().expect("lock").last().map(String::as_str)
            == Some("[fetch] FAILED http error 405: Method Not Allowed for GET http://localhost/users")
    );
}

// ============================================================================
// UrlParams
// ============================================================================

#[tokio::test]
async fn url_params_fills_url_tokens() {
    let (base, calls) = mock_fetch(json!(123));
    let fetch = FetchWrap::builder(base)
        .with(UrlParams::new(params(json!({ "id": 57, "section": "settings" }))))
        .build();

    fetch
        .get("http://localhost/users/{id}/{section}")
        .await
        .expect("reply");

    check!(recorded(&calls)[0].0 == "http://localhost/users/57/settings");
}

#[tokio::test]
async fn url_params_fills_with_additional_params() {
    let (base, calls) = mock_fetch(json!(123));
    let fetch = FetchWrap::builder(base)
        .with(UrlParams::new(params(json!({ "id": 57 }))))
        .build();

    let options = FetchOptions::new()
        .with_param("section", "notifications")
        .with_param("token", 1234)
        .with_param("email", "john@smith.com");
    fetch
        .fetch("http://localhost/users/{id}/{section}", options.clone())
        .await
        .expect("reply");

    let calls = recorded(&calls);
    check!(calls[0].0 == "http://localhost/users/57/notifications?token=1234&email=john%40smith.com");
    check!(calls[0].1 == options);
}

#[tokio::test]
async fn url_params_fails_if_token_cannot_be_replaced() {
    let (base, calls) = mock_fetch(json!(123));
    let fetch = FetchWrap::builder(base)
        .with(UrlParams::new(params(json!({ "id": 57 }))))
        .build();

    let result = fetch
        .fetch(
            "http://localhost/users/{id}/{section}",
            FetchOptions::new()
                .with_param("token", 1234)
                .with_param("email", "john@smith.com"),
        )
        .await;

    let_assert!(Err(err) = result);
    check!(err.to_string() == "url param not found: {section}");
    check!(recorded(&calls).is_empty());
}

#[tokio::test]
async fn url_params_missing_token_failure_can_be_disabled() {
    let (base, calls) = mock_fetch(json!(123));
    let fetch = FetchWrap::builder(base)
        .with(UrlParams::new(params(json!({ "id": 57 }))).fail_if_token_is_missing(false))
        .build();

    let reply = fetch
        .fetch(
            "http://localhost/users/{id}/{section}",
            FetchOptions::new()
                .with_param("token", 1234)
                .with_param("email", "john@smith.com"),
        )
        .await
        .expect("reply");

    check!(reply == Reply::from(json!(123)));
    check!(
        recorded(&calls)[0].0
            == "http://localhost/users/57/{section}?token=1234&email=john%40smith.com"
    );
}

// ============================================================================
// SendJson
// ============================================================================

#[tokio::test]
async fn send_json_sends_body_as_json() {
    let (base, calls) = mock_fetch(json!(123));
    let fetch = FetchWrap::builder(base).with(SendJson).build();

    fetch
        .fetch(
            "http://localhost/users",
            FetchOptions::new()
                .with_method(Method::Post)
                .with_body(json!({ "name": "john" })),
        )
        .await
        .expect("reply");

    check!(
        recorded(&calls)[0].1
            == FetchOptions::new()
                .with_method(Method::Post)
                .with_header("Content-Type", "application/json")
                .with_body(r#"{"name":"john"}"#)
    );
}

#[tokio::test]
async fn send_json_replaces_content_type_in_any_case() {
    let (base, calls) = mock_fetch(json!(123));
    let fetch = FetchWrap::builder(base).with(SendJson).build();

    fetch
        .fetch(
            "http://localhost/users",
            FetchOptions::new()
                .with_header("content-type", "text/plain")
                .with_body(json!({ "name": "john" })),
        )
        .await
        .expect("reply");

    let options = &recorded(&calls)[0].1;
    let content_types: Vec<&String> = options
        .headers()
        .keys()
        .filter(|name| name.eq_ignore_ascii_case("content-type"))
        .collect();
    check!(content_types == vec!["Content-Type"]);
    check!(options.header("content-type") == Some("application/json"));
}

#[tokio::test]
async fn send_json_without_body_only_sets_content_type() {
    let (base, calls) = mock_fetch(json!(123));
    let fetch = FetchWrap::builder(base).with(SendJson).build();

    fetch.get("http://localhost/users").await.expect("reply");

    check!(
        recorded(&calls)[0].1 == FetchOptions::new().with_header("Content-Type", "application/json")
    );
}

// ============================================================================
// ReceiveJson
// ============================================================================

#[tokio::test]
async fn receive_json_parses_json_responses() {
    let (base, _calls) = mock_fetch(json_response(
        r#"{"name":"john","birthdate":"1936-03-01T00:00:00.000Z"}"#,
    ));
    let fetch = FetchWrap::builder(base).with(ReceiveJson::new()).build();

    let reply = fetch.get("http://localhost/users").await.expect("reply");

    let birthdate = Utc
        .with_ymd_and_hms(1936, 3, 1, 0, 0, 0)
        .single()
        .expect("valid date");
    check!(
        reply
            == Reply::Json(Json::object([
                ("name", Json::from("john")),
                ("birthdate", Json::from(birthdate)),
            ]))
    );
}

#[tokio::test]
async fn receive_json_fails_on_http_errors() {
    let (base, _calls) = mock_fetch(
        Response::new(403, HashMap::new(), "").with_status_text("Not Authorized"),
    );
    let fetch = FetchWrap::builder(base).with(ReceiveJson::new()).build();

    let result = fetch.get("http://localhost/users").await;

    let_assert!(Err(err) = result);
    check!(err.to_string() == "http error 403: Not Authorized");
    check!(err.status() == Some(403));
    check!(err.response().map(Response::status_text) == Some("Not Authorized"));
}

#[tokio::test]
async fn receive_json_returns_text_for_other_content_types() {
    let (base, _calls) = mock_fetch(
        Response::new(200, HashMap::new(), "hello").with_header("Content-Type", "text/plain"),
    );
    let fetch = FetchWrap::builder(base).with(ReceiveJson::new()).build();

    let reply = fetch.get("http://localhost/greeting").await.expect("reply");

    check!(reply == Reply::Text("hello".to_string()));
}

#[tokio::test]
async fn receive_json_empty_body_is_empty_reply() {
    let (base, _calls) = mock_fetch(json_response(""));
    let fetch = FetchWrap::builder(base).with(ReceiveJson::new()).build();

    let reply = fetch.get("http://localhost/users/57").await.expect("reply");

    check!(reply.is_empty());
}

#[tokio::test]
async fn receive_json_accept_header_does_not_override_caller() {
    let (base, calls) = mock_fetch(json_response("{}"));
    let fetch = FetchWrap::builder(base)
        .with(ReceiveJson::new().accept_header(true))
        .build();

    fetch.get("http://localhost/a").await.expect("reply");
    fetch
        .fetch("http://localhost/b", FetchOptions::new().with_header("Accept", "text/csv"))
        .await
        .expect("reply");

    let calls = recorded(&calls);
    check!(calls[0].1.header("Accept") == Some("application/json"));
    check!(calls[1].1.header("Accept") == Some("text/csv"));
}

#[tokio::test]
async fn send_and_receive_json_round_trip() {
    // Echo server: answers with the body it was sent.
    let echo = fetch_fn(|_url: String, options: FetchOptions| async move {
        let body = match options.body() {
            Some(fetchwrap::Body::Text(text)) => text.clone(),
            _ => String::new(),
        };
        Ok(Reply::Response(json_response(&body)))
    });
    let fetch = FetchWrap::builder(echo)
        .with(ReceiveJson::new())
        .with(SendJson)
        .build();

    let sent = Json::object([
        ("name", Json::from("john")),
        ("tags", Json::Array(vec![Json::from("a"), Json::Null])),
        (
            "birthdate",
            Json::from(
                Utc.with_ymd_and_hms(1936, 3, 1, 0, 0, 0)
                    .single()
                    .expect("valid date"),
            ),
        ),
    ]);
    let reply = fetch
        .fetch(
            "http://localhost/echo",
            FetchOptions::new().with_method(Method::Post).with_body(sent.clone()),
        )
        .await
        .expect("reply");

    check!(reply == Reply::Json(sent));
}

// ============================================================================
// Testing
// ============================================================================

#[tokio::test]
async fn testing_fails_if_not_mocked() {
    let (base, calls) = mock_fetch(json!(123));
    let fetch = FetchWrap::builder(base).with(Testing::new()).build();

    let result = fetch
        .fetch("http://localhost/users", FetchOptions::new().with_method(Method::Put))
        .await;

    let_assert!(Err(err) = result);
    check!(err.to_string() == "[fetch] request mock not found for: http://localhost/users");
    check!(recorded(&calls).is_empty());
}

#[tokio::test]
async fn testing_can_mock_the_response() {
    let (base, calls) = mock_fetch(json!(123));
    let fetch = FetchWrap::builder(base)
        .with(Testing::new().with_mock(Mock::value(json!(321))))
        .build();

    let reply = fetch
        .fetch("http://localhost/users", FetchOptions::new().with_method(Method::Put))
        .await
        .expect("reply");

    check!(reply == Reply::from(json!(321)));
    check!(recorded(&calls).is_empty());
}

#[tokio::test]
async fn testing_can_spy_requests() {
    let (base, _calls) = mock_fetch(json!(123));
    let spy_log: Calls = Arc::default();
    let record = Arc::clone(&spy_log);
    let fetch = FetchWrap::builder(base)
        .with(
            Testing::new()
                .with_spy(Spy::new(move |url, options| {
                    record
                        .lock()
                        .expect("lock")
                        .push((url.to_string(), options.clone()));
                }))
                .with_mock(Mock::value(json!(321))),
        )
        .build();

    fetch
        .fetch("http://localhost/users", FetchOptions::new().with_method(Method::Put))
        .await
        .expect("reply");

    check!(
        recorded(&spy_log)
            == vec![(
                "http://localhost/users".to_string(),
                FetchOptions::new().with_method(Method::Put)
            )]
    );
}

#[tokio::test]
async fn testing_spy_runs_before_the_mock() {
    let (base, _calls) = mock_fetch(json!(123));
    let events = Arc::new(Mutex::new(Vec::new()));
    let (spy_events, mock_events) = (Arc::clone(&events), Arc::clone(&events));
    let fetch = FetchWrap::builder(base)
        .with(
            Testing::new()
                .with_spy(Spy::new(move |_url, _options| {
                    spy_events.lock().expect("lock").push("spy");
                }))
                .with_mock(Mock::from_fn(move |url, _options| {
                    mock_events.lock().expect("lock").push("mock");
                    Reply::Text(format!("mocked {url}"))
                })),
        )
        .build();

    let reply = fetch.get("http://localhost/users").await.expect("reply");

    check!(reply == Reply::from("mocked http://localhost/users"));
    check!(*events.lock().expect("lock") == vec!["spy", "mock"]);
}

#[tokio::test]
async fn testing_request_mock_wins_over_configured_mock() {
    let (base, _calls) = mock_fetch(json!(123));
    let fetch = FetchWrap::builder(base)
        .with(Testing::new().with_mock(Mock::value(json!(321))))
        .build();

    let reply = fetch
        .fetch(
            "http://localhost/users",
            FetchOptions::new().with_mock(Mock::value("per call")),
        )
        .await
        .expect("reply");

    check!(reply == Reply::from("per call"));
}

#[tokio::test]
async fn testing_can_fall_through_to_the_base_fetch() {
    let (base, calls) = mock_fetch(json!(123));
    let fetch = FetchWrap::builder(base)
        .with(Testing::new().fail_if_no_mock(false))
        .build();

    let reply = fetch.get("http://localhost/users").await.expect("reply");

    check!(reply == Reply::from(json!(123)));
    check!(recorded(&calls).len() == 1);
}

#[tokio::test]
async fn mocks_are_routed_by_url_pattern() {
    let (base, _calls) = mock_fetch(json!(123));
    let fetch = FetchWrap::builder(base)
        .with(
            OptionsByUrlPattern::new()
                .try_with_pattern(
                    "http://localhost/users/*",
                    FetchOptions::new().with_mock(Mock::value(json!({ "id": 57 }))),
                )
                .expect("valid pattern"),
        )
        .with(ReceiveJson::new())
        .with(Testing::new())
        .build();

    let user = fetch.get("http://localhost/users/57").await.expect("reply");
    check!(user == Reply::from(json!({ "id": 57 })));

    let result = fetch.get("http://localhost/groups/1").await;
    let_assert!(Err(Error::MockNotFound { url }) = result);
    check!(url == "http://localhost/groups/1");
}
