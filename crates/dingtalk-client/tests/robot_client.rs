//! Integration tests for Robot.
//!
//! Uses wiremock for HTTP mocking. Tests cover signed and unsigned sends,
//! business error passthrough, retry on transport failures, and the user
//! agent header.

use dingtalk_client::{
    sign_webhook, DingTalkError, Message, Robot, WebhookConfig, USER_AGENT_VALUE,
};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HELLO_BODY: &str = r#"{"msgtype":"text","text":{"content":"hello"}}"#;

fn robot_config(mock_server: &MockServer) -> WebhookConfig {
    WebhookConfig::default()
        .with_url(format!("{}/robot/send", mock_server.uri()))
        .with_token("test-token")
}

fn ok_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(r#"{"errcode":0,"errmsg":"ok"}"#)
}

#[tokio::test]
async fn test_signed_send_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/robot/send"))
        .and(query_param("access_token", "test-token"))
        .and(header("content-type", "application/json"))
        .and(body_string(HELLO_BODY))
        .respond_with(ok_response())
        .expect(1)
        .mount(&mock_server)
        .await;

    let robot = Robot::new(robot_config(&mock_server).with_secret("s3cr3t")).unwrap();
    let envelope = robot
        .send(&Message::text("hello"))
        .await
        .expect("send failed");

    assert_eq!(envelope.error_code, 0);
    assert_eq!(envelope.error_message, "ok");

    let requests = mock_server.received_requests().await.unwrap();
    let url = &requests[0].url;
    let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let get = |k: &str| {
        params
            .iter()
            .find(|(name, _)| name == k)
            .map(|(_, v)| v.clone())
    };

    let timestamp = get("timestamp").expect("timestamp missing");
    let sign = get("sign").expect("sign missing");
    assert_eq!(get("access_token").as_deref(), Some("test-token"));

    // Recompute from the transmitted timestamp
    let ms: u64 = timestamp.parse().unwrap();
    let expected =
        sign_webhook("s3cr3t", std::time::UNIX_EPOCH + std::time::Duration::from_millis(ms));
    assert_eq!(sign, expected.signature);
}

#[tokio::test]
async fn test_signed_send_business_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/robot/send"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"errcode":300001,"errmsg":"invalid token"}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let robot = Robot::new(robot_config(&mock_server).with_secret("s3cr3t")).unwrap();
    let err = robot
        .send_with_retry(&Message::text("hello"), 3)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "<300001>: invalid token");
    assert!(matches!(
        err,
        DingTalkError::Api { code: 300001, ref message, .. } if message == "invalid token"
    ));
}

#[tokio::test]
async fn test_unsigned_send_has_no_signature_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/robot/send"))
        .respond_with(ok_response())
        .mount(&mock_server)
        .await;

    let robot = Robot::new(robot_config(&mock_server)).unwrap();
    robot.send(&Message::text("hello")).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("access_token=test-token"));
}

#[tokio::test]
async fn test_retry_on_5xx_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/robot/send"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/robot/send"))
        .respond_with(ok_response())
        .expect(1)
        .mount(&mock_server)
        .await;

    let robot = Robot::new(robot_config(&mock_server)).unwrap();
    let envelope = robot
        .send_with_retry(&Message::markdown("Build", "**green**"), 2)
        .await
        .expect("should succeed on third attempt");
    assert!(envelope.is_success());
}

#[tokio::test]
async fn test_max_retries_exceeded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/robot/send"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let robot = Robot::new(robot_config(&mock_server).with_max_retries(2)).unwrap();
    let err = robot.send(&Message::text("hello")).await.unwrap_err();

    assert!(matches!(err, DingTalkError::Decode { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Nothing listens on port 1
    let config = WebhookConfig::default()
        .with_url("http://127.0.0.1:1/robot/send")
        .with_token("test-token")
        .with_timeout_secs(2);
    let robot = Robot::new(config).unwrap();

    let err = robot
        .send_with_retry(&Message::text("hello"), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, DingTalkError::Network { .. }), "got {err:?}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_user_agent_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("user-agent", USER_AGENT_VALUE))
        .respond_with(ok_response())
        .expect(1)
        .mount(&mock_server)
        .await;

    let robot = Robot::new(robot_config(&mock_server)).unwrap();
    robot.send(&Message::text("hello")).await.unwrap();
}

#[tokio::test]
async fn test_mention_body_on_wire() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/robot/send"))
        .and(body_string(
            r#"{"msgtype":"text","text":{"content":"oncall"},"at":{"atMobiles":["13800000000","13900000000"]}}"#,
        ))
        .respond_with(ok_response())
        .expect(1)
        .mount(&mock_server)
        .await;

    let robot = Robot::new(robot_config(&mock_server)).unwrap();
    let msg = Message::text("oncall").at_mobiles(["13800000000", "13900000000"]);
    robot.send(&msg).await.unwrap();
}
