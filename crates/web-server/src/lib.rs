// In crates/web-server/src/lib.rs

use app_config::types::ServerSettings;
use axum::{
    Router,
    extract::State,
    response::{Html, Json},
    routing::get,
};
use core_types::ResultSet;
use engine::Engine;
use tokio::net::TcpListener;
use types::SignalsResponse;

pub mod error;
pub mod types;

// Re-export our custom error type for convenience.
pub use error::{Error, Result};

/// The shared application state that is available to all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
}

/// Creates the main application router with all routes and middleware.
pub fn create_router(app_state: AppState) -> Router {
    // The signal table is read-only, so any origin may fetch it.
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    let api_router = Router::new().route("/signals", get(get_signals_handler));

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_check_handler))
        .nest("/api", api_router)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// A simple health check handler.
async fn health_check_handler() -> &'static str {
    "OK"
}

/// The handler for `GET /api/signals`.
/// Runs a fresh scan on every request.
async fn get_signals_handler(State(state): State<AppState>) -> Json<SignalsResponse> {
    let results = state.engine.run_strategy().await;
    Json(SignalsResponse::from(results))
}

/// The handler for `GET /`: the ranked signals as an HTML table.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let results = state.engine.run_strategy().await;
    Html(render_page(&results))
}

fn render_page(results: &ResultSet) -> String {
    let body = match results {
        ResultSet::Empty => "<p>No V20 signals found.</p>".to_string(),
        ResultSet::Signals(records) => {
            let rows: String = records
                .iter()
                .map(|r| {
                    format!(
                        "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr>",
                        r.signal_date,
                        escape(&r.symbol.0),
                        r.buy_at,
                        r.sell_at,
                        r.percent_move,
                        r.latest_close,
                        r.proximity_percent,
                    )
                })
                .collect();
            format!(
                "<table><thead><tr><th>Signal Date</th><th>Symbol</th><th>Buy At</th><th>Sell At</th>\
                 <th>%Move</th><th>Close</th><th>Proximity%</th></tr></thead><tbody>{rows}</tbody></table>"
            )
        }
    };

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>V20 Signals</title></head>\
         <body><h1>V20 Signals</h1>{body}</body></html>"
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Binds the configured address and serves until the process is stopped.
pub async fn run(settings: ServerSettings, engine: Engine) -> Result<()> {
    let app = create_router(AppState { engine });

    let address = format!("{}:{}", settings.host, settings.port);
    let listener = TcpListener::bind(&address).await.map_err(Error::ServerBindError)?;
    tracing::info!("Web server listening on {}", address);

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(Error::ServeError)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, NaiveDate};
    use core_types::{LookbackWindow, PricePoint, PriceSeries, Symbol};
    use market_data::PriceProvider;
    use std::sync::{Arc, Mutex};
    use strategies::V20Scanner;
    use strategies::types::V20Settings;
    use tower::ServiceExt;

    /// Serves one qualifying rally for "RELIANCE" and fails everything else.
    #[derive(Default)]
    struct RallyProvider {
        window_end: Mutex<Option<NaiveDate>>,
    }

    #[async_trait]
    impl PriceProvider for RallyProvider {
        fn name(&self) -> &'static str {
            "rally"
        }

        async fn fetch(&self, symbol: &Symbol, window: &LookbackWindow) -> market_data::Result<PriceSeries> {
            if symbol.0 != "RELIANCE" {
                return Err(market_data::Error::NoData(symbol.0.clone()));
            }
            let bars = [
                (90.0, 91.0, 89.0, 90.0),
                (82.0, 90.0, 80.0, 88.0),
                (88.0, 100.0, 87.0, 98.0),
                (98.0, 99.0, 94.0, 95.0),
                (95.0, 96.0, 85.0, 88.0),
            ];
            *self.window_end.lock().unwrap() = Some(window.end);
            let start = window.end - Duration::days(bars.len() as i64 - 1);
            let points = bars
                .iter()
                .enumerate()
                .map(|(i, &(o, h, l, c))| PricePoint::new(start + Duration::days(i as i64), o, h, l, c))
                .collect();
            Ok(PriceSeries::new(symbol.clone(), points)?)
        }
    }

    fn app_with(symbols: &[&str], provider: Arc<RallyProvider>) -> Router {
        let scanner = Arc::new(V20Scanner::new(V20Settings::default()).unwrap());
        let universe = symbols.iter().map(|s| Symbol::from(*s)).collect();
        let engine = Engine::new(universe, 30, 2, provider, scanner).unwrap();
        create_router(AppState { engine })
    }

    fn app(symbols: &[&str]) -> Router {
        app_with(symbols, Arc::new(RallyProvider::default()))
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (status, body) = get(app(&[]), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn signals_endpoint_returns_ranked_records() {
        let provider = Arc::new(RallyProvider::default());
        let (status, body) = get(app_with(&["INFY", "RELIANCE"], provider.clone()), "/api/signals").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["signals"][0]["symbol"], "RELIANCE");
        let percent_move: f64 = json["signals"][0]["percent_move"].as_str().unwrap().parse().unwrap();
        assert_eq!(percent_move, 25.0);

        // The breaking day is the second to last bar of the served window.
        let window_end = provider.window_end.lock().unwrap().expect("RELIANCE was fetched");
        let expected_date = window_end - Duration::days(1);
        assert_eq!(json["signals"][0]["signal_date"], expected_date.to_string());
    }

    #[tokio::test]
    async fn signals_endpoint_reports_empty_result() {
        let (_, body) = get(app(&["INFY"]), "/api/signals").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["count"], 0);
        assert_eq!(json["signals"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn index_renders_table() {
        let (status, body) = get(app(&["RELIANCE"]), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<td>RELIANCE</td><td>80.00</td><td>100.00</td><td>25.00</td><td>88.00</td><td>10.00</td>"));
    }

    #[tokio::test]
    async fn index_renders_empty_message() {
        let (_, body) = get(app(&["ITC"]), "/").await;
        assert!(body.contains("No V20 signals found."));
    }

    #[test]
    fn escape_html_in_symbols() {
        assert_eq!(escape("A&B<C>"), "A&amp;B&lt;C&gt;");
    }
}
