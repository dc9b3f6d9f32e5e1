//! Scripted stand-in for the shop GraphQL API.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::TcpListener;
use std::sync::Mutex;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};

/// Pick a port the OS considers free right now.
pub fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Wait until `url` answers at all, retrying every 50 ms for up to 5 s.
pub async fn wait_for_http(url: &str) {
    let client = reqwest::Client::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if tokio::time::Instant::now() > deadline {
            panic!("{} did not become ready", url);
        }
        if client.get(url).send().await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
    pub token: Option<String>,
    pub delay: Duration,
}

impl Reply {
    pub fn data(data: Value) -> Self {
        Reply {
            status: 200,
            body: json!({ "data": data }),
            token: None,
            delay: Duration::ZERO,
        }
    }

    pub fn errors(message: &str) -> Self {
        Reply {
            status: 200,
            body: json!({ "errors": [{ "message": message }, { "message": "second" }] }),
            token: None,
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Reply {
            status,
            body: json!({ "message": "unavailable" }),
            token: None,
            delay: Duration::ZERO,
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// One request as the backend received it.
#[derive(Debug, Clone)]
pub struct Seen {
    pub token: Option<String>,
    pub query: String,
    pub variables: Value,
}

#[derive(Default)]
struct MockState {
    replies: Mutex<VecDeque<Reply>>,
    seen: Mutex<Vec<Seen>>,
}

async fn graphql(
    state: web::Data<MockState>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> HttpResponse {
    let token = req
        .headers()
        .get("vendure-token")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.seen.lock().unwrap().push(Seen {
        token,
        query: body["query"].as_str().unwrap_or_default().to_string(),
        variables: body["variables"].clone(),
    });

    let reply = state
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Reply::data(json!({})));
    if !reply.delay.is_zero() {
        actix_web::rt::time::sleep(reply.delay).await;
    }

    let mut response = HttpResponse::build(StatusCode::from_u16(reply.status).unwrap());
    if let Some(token) = reply.token {
        response.insert_header(("vendure-token", token));
    }
    response.json(reply.body)
}

pub struct MockBackend {
    pub url: String,
    state: web::Data<MockState>,
}

impl MockBackend {
    /// Binds on a free port and serves in the background. Must be called
    /// from within a tokio runtime.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let state = web::Data::new(MockState::default());
        let shared = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(shared.clone())
                .route("/shop-api", web::post().to(graphql))
        })
        .workers(1)
        .listen(listener)
        .unwrap()
        .run();
        tokio::spawn(server);

        MockBackend {
            url: format!("http://127.0.0.1:{}/shop-api", port),
            state,
        }
    }

    pub fn reply(&self, reply: Reply) {
        self.state.replies.lock().unwrap().push_back(reply);
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.state.seen.lock().unwrap().clone()
    }
}

pub fn order_json(lines: Value) -> Value {
    json!({
        "id": "42",
        "code": "ABC123",
        "state": "AddingItems",
        "total": 100000,
        "totalWithTax": 100000,
        "currencyCode": "VND",
        "shipping": 0,
        "shippingWithTax": 0,
        "lines": lines
    })
}

pub fn line_json(id: &str, variant_id: &str, quantity: u32, price_with_tax: i64) -> Value {
    json!({
        "id": id,
        "quantity": quantity,
        "productVariant": {
            "id": variant_id,
            "name": "Ca hoi",
            "sku": "CH-1",
            "price": price_with_tax,
            "priceWithTax": price_with_tax,
            "currencyCode": "VND",
            "product": {
                "id": "p1",
                "name": "Ca hoi",
                "slug": "ca-hoi",
                "description": "",
                "featuredAsset": null
            }
        }
    })
}
