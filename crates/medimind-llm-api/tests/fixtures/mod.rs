use std::time::Duration;

use medimind_llm_api::{ClientSettings, GroqClient};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "gsk_test_key_0123456789";
pub const COMPLETIONS_PATH: &str = "/openai/v1/chat/completions";

/// Mock server utilities for testing the completion client
pub struct LlmMockServer {
    server: MockServer,
}

impl LlmMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    pub fn settings(&self) -> ClientSettings {
        ClientSettings::new(TEST_API_KEY)
            .with_api_url(format!("{}{}", self.server.uri(), COMPLETIONS_PATH))
            .with_timeout(Duration::from_secs(5))
    }

    pub fn client(&self) -> GroqClient {
        GroqClient::new(self.settings()).expect("client builds")
    }

    /// SSE body with one chunk per fragment, terminated by `[DONE]`
    pub fn sse_body(fragments: &[&str]) -> String {
        let mut body = String::new();
        body.push_str(&format!(
            "data: {}\n\n",
            json!({
                "id": "chatcmpl-1",
                "choices": [{"index": 0, "delta": {"role": "assistant", "content": ""}}]
            })
        ));
        for fragment in fragments {
            body.push_str(&format!(
                "data: {}\n\n",
                json!({
                    "id": "chatcmpl-1",
                    "choices": [{"index": 0, "delta": {"content": fragment}, "finish_reason": null}]
                })
            ));
        }
        body.push_str("data: [DONE]\n\n");
        body
    }

    /// Mock a successful streamed completion
    pub async fn mock_stream(&self, fragments: &[&str]) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(Self::sse_body(fragments), "text/event-stream"),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock a raw streamed body
    pub async fn mock_raw_stream(&self, body: &str) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/event-stream"),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock an error status with a JSON error body
    pub async fn mock_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": {"message": message, "type": "invalid_request_error"}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a non-streamed completion such as a vision response
    pub async fn mock_completion(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-2",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": content},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a response that arrives after `delay`
    pub async fn mock_slow(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(Self::sse_body(&["late"]), "text/event-stream")
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of every request the server has seen
    pub async fn request_bodies(&self) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|req| serde_json::from_slice(&req.body).expect("request body is JSON"))
            .collect()
    }
}

/// Raw HTTP server that sends the response head and one SSE chunk, then
/// holds the connection open without sending anything else.
///
/// wiremock only delays whole responses, so a stall in the middle of the
/// body needs a hand-driven socket.
pub async fn stalled_stream_server(first_fragment: &str, stall: Duration) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let event = format!(
        "data: {}\n\n",
        json!({"id": "chatcmpl-1", "choices": [{"index": 0, "delta": {"content": first_fragment}}]})
    );

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut buf = vec![0u8; 16 * 1024];
        let _ = socket.read(&mut buf).await;

        let head = "HTTP/1.1 200 OK\r\n\
                    Content-Type: text/event-stream\r\n\
                    Transfer-Encoding: chunked\r\n\r\n";
        let chunk = format!("{:x}\r\n{}\r\n", event.len(), event);
        let _ = socket.write_all(head.as_bytes()).await;
        let _ = socket.write_all(chunk.as_bytes()).await;
        let _ = socket.flush().await;

        tokio::time::sleep(stall).await;
    });

    format!("http://{}{}", addr, COMPLETIONS_PATH)
}
