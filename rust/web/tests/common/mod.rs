#![allow(dead_code)]

use fivepiles_web::server::{ServerConfig, ServerHandle, WebServer};
use serde_json::Value;
use std::net::SocketAddr;
use std::time::Duration;
use warp::hyper::{self, Body, Client as HyperClient, Request};

pub struct TestServer {
    pub handle: ServerHandle,
    pub client: HyperClient<hyper::client::HttpConnector>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::for_tests()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let handle = WebServer::new(config).start().await.expect("start server");
        tokio::time::sleep(Duration::from_millis(20)).await;
        Self {
            handle,
            client: HyperClient::new(),
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.handle.address()
    }

    pub fn uri(&self, path: &str) -> hyper::Uri {
        format!("http://{}{path}", self.address())
            .parse()
            .expect("parse uri")
    }

    pub async fn get(&self, path: &str) -> (hyper::StatusCode, Value) {
        let response = self.client.get(self.uri(path)).await.expect("GET request");
        read_json(response).await
    }

    pub async fn post(&self, path: &str, body: Value) -> (hyper::StatusCode, Value) {
        let request = Request::builder()
            .method(hyper::Method::POST)
            .uri(self.uri(path))
            .header(hyper::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build POST request");
        let response = self.client.request(request).await.expect("POST request");
        read_json(response).await
    }

    pub async fn delete(&self, path: &str) -> (hyper::StatusCode, Value) {
        let request = Request::builder()
            .method(hyper::Method::DELETE)
            .uri(self.uri(path))
            .body(Body::empty())
            .expect("build DELETE request");
        let response = self.client.request(request).await.expect("DELETE request");
        read_json(response).await
    }

    pub async fn create_room(&self, body: Value) -> String {
        let (status, json) = self.post("/api/rooms", body).await;
        assert_eq!(status, hyper::StatusCode::CREATED, "create room: {json}");
        json["room_id"].as_str().expect("room_id").to_string()
    }

    pub async fn join(&self, room: &str, role: &str) -> String {
        let (status, json) = self
            .post(&format!("/api/rooms/{room}/join"), serde_json::json!({ "role": role }))
            .await;
        assert_eq!(status, hyper::StatusCode::OK, "join {role}: {json}");
        json["player_id"].as_str().expect("player_id").to_string()
    }

    pub async fn state(&self, room: &str, token: Option<&str>) -> Value {
        let path = match token {
            Some(token) => format!("/api/rooms/{room}/state?player_id={token}"),
            None => format!("/api/rooms/{room}/state"),
        };
        let (status, json) = self.get(&path).await;
        assert_eq!(status, hyper::StatusCode::OK, "state: {json}");
        json
    }

    /// Draws if needed, then plays the first card of the hand into the first
    /// open pile. Returns the play response body.
    pub async fn take_turn(&self, room: &str, token: &str) -> Value {
        let view = self.state(room, Some(token)).await;
        if view["turn_step"] == "must_draw" {
            let source = if view["deck_size"].as_u64() > Some(0) {
                "deck"
            } else {
                "exposed"
            };
            let (status, json) = self
                .post(
                    &format!("/api/rooms/{room}/draw"),
                    serde_json::json!({ "player_id": token, "source": source }),
                )
                .await;
            assert_eq!(status, hyper::StatusCode::OK, "draw: {json}");
        }

        let view = self.state(room, Some(token)).await;
        let me = view["you"].as_str().expect("seated viewer").to_string();
        let card = view["hand"][0].as_str().expect("card in hand").to_string();
        let pile = view["piles"][&me]
            .as_array()
            .expect("pile array")
            .iter()
            .position(|p| p.as_array().map_or(0, Vec::len) < 5)
            .expect("open pile");

        let (status, json) = self
            .post(
                &format!("/api/rooms/{room}/play"),
                serde_json::json!({ "player_id": token, "card": card, "pile": pile }),
            )
            .await;
        assert_eq!(status, hyper::StatusCode::OK, "play: {json}");
        json
    }

    pub async fn shutdown(self) {
        tokio::time::timeout(Duration::from_secs(2), self.handle.shutdown())
            .await
            .expect("shutdown timed out")
            .expect("shutdown failed");
    }
}

pub async fn read_json(response: hyper::Response<Body>) -> (hyper::StatusCode, Value) {
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body())
        .await
        .expect("read body");
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    let json = serde_json::from_slice(&bytes).expect("parse json body");
    (status, json)
}
