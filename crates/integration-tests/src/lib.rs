//! Integration test support for Web Larek.
//!
//! [`FakeLarek`] serves the two Web Larek endpoints from memory on an
//! ephemeral local port and records every order it receives.
//!
//! ```rust,ignore
//! let api = FakeLarek::start(OrderReply::Accept).await;
//! let config = api.config();
//! let client = LarekClient::new(&config)?;
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use web_larek_storefront::config::ApiConfig;

/// How the fake answers `POST /order`.
#[derive(Debug, Clone)]
pub enum OrderReply {
    /// `200 {id, total}` echoing the posted total.
    Accept,
    /// `status {error}`.
    Reject { status: u16, message: String },
    /// `502` with an HTML body.
    Broken,
}

struct FakeState {
    products: Value,
    reply: OrderReply,
    orders: Mutex<Vec<Value>>,
}

/// A running fake Web Larek API.
pub struct FakeLarek {
    addr: SocketAddr,
    state: Arc<FakeState>,
    server: JoinHandle<()>,
}

impl FakeLarek {
    /// Serve [`catalog`] and answer orders with `reply`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind.
    pub async fn start(reply: OrderReply) -> Self {
        Self::with_products(catalog(), reply).await
    }

    /// Serve `products` (a JSON array) and answer orders with `reply`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind.
    #[allow(clippy::expect_used)]
    pub async fn with_products(products: Value, reply: OrderReply) -> Self {
        let state = Arc::new(FakeState {
            products,
            reply,
            orders: Mutex::default(),
        });

        let app = Router::new()
            .route("/api/weblarek/product", get(list_products))
            .route("/api/weblarek/order", post(create_order))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake API");
        let addr = listener.local_addr().expect("Fake API has no address");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Origin to point `API_ORIGIN` at.
    #[must_use]
    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration for this fake.
    ///
    /// # Panics
    ///
    /// Never for the loopback origin.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn config(&self) -> ApiConfig {
        ApiConfig::from_origin(&self.origin(), Duration::from_secs(5))
            .expect("Loopback origin is a valid URL")
    }

    /// Every order body received so far.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        self.state
            .orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for FakeLarek {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn list_products(State(state): State<Arc<FakeState>>) -> Json<Value> {
    let items = state.products.as_array().map_or(0, Vec::len);
    Json(json!({ "total": items, "items": state.products }))
}

async fn create_order(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Response {
    let total = body.get("total").cloned().unwrap_or(Value::Null);
    state
        .orders
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(body);

    match &state.reply {
        OrderReply::Accept => Json(json!({
            "id": "28c57cb4-3002-4445-8aa1-2a06a5055ae5",
            "total": total,
        }))
        .into_response(),
        OrderReply::Reject { status, message } => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST),
            Json(json!({ "error": message })),
        )
            .into_response(),
        OrderReply::Broken => (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").into_response(),
    }
}

/// Id of the 750-synapse soft skill.
pub const HOUR_ID: &str = "854cef69-976d-4c2a-a18c-2aa45046c390";
/// Id of the 1450-synapse lollipop.
pub const HEX_ID: &str = "c101ab44-ed99-4a54-990d-47aa2bb4e7d9";
/// Id of the priceless timer.
pub const TIMER_ID: &str = "b06cde61-912f-4663-9751-09956c0eed67";
/// Id of the 2500-synapse framework.
pub const COOKIE_ID: &str = "412bcf81-7e75-4e70-bdb9-d3c73c9803b7";

/// A catalog in the shape the real API returns.
#[must_use]
pub fn catalog() -> Value {
    json!([
        {
            "id": HOUR_ID,
            "description": "Если планируете решать задачи в тренажёре, берите два.",
            "image": "/5_Dots.svg",
            "title": "+1 час в сутках",
            "category": "софт-скил",
            "price": 750
        },
        {
            "id": HEX_ID,
            "description": "Лизните этот леденец, чтобы мгновенно запоминать и узнавать любой цветовой код CSS.",
            "image": "/Shell.svg",
            "title": "HEX-леденец",
            "category": "другое",
            "price": 1450
        },
        {
            "id": TIMER_ID,
            "description": "Будет стоять над душой и не давать прокрастинировать.",
            "image": "/Asterisk_2.svg",
            "title": "Мамка-таймер",
            "category": "софт-скил",
            "price": null
        },
        {
            "id": COOKIE_ID,
            "description": "Откройте эти куки, чтобы узнать, какой фреймворк вы должны изучить дальше.",
            "image": "/Soft_Flower.svg",
            "title": "Фреймворк куки судьбы",
            "category": "дополнительное",
            "price": 2500
        }
    ])
}
