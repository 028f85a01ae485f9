use crate::cli::ServeArgs;
use crate::llm::chat::openai::{ OpenAIChatClient, UpstreamResponse };
use crate::models::chat::{ relay_messages, ErrorEnvelope };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    body::Bytes,
    routing::post,
    Router,
    extract::{ DefaultBodyLimit, State },
    response::{ IntoResponse, Response },
    http::{ header, HeaderValue, Method, StatusCode },
};
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, warn, error };

pub const MISSING_KEY_MESSAGE: &str = "Missing OPENAI_API_KEY";

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";

#[derive(Clone)]
pub struct AppState {
    upstream: Arc<OpenAIChatClient>,
}

impl AppState {
    pub fn new(upstream: OpenAIChatClient) -> Self {
        Self { upstream: Arc::new(upstream) }
    }

    pub fn from_args(args: &ServeArgs) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let upstream = OpenAIChatClient::new(
            args.openai_api_key.clone(),
            None,
            Some(args.upstream_url.clone())
        )?;
        Ok(Self::new(upstream))
    }
}

/// Every OPTIONS request is answered here with an empty 200. JSON replies
/// carry the full header set themselves, see `json_response`.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(relay_handler))
        .route("/{*path}", post(relay_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(cors_layer())
        .with_state(state)
}

pub async fn start_http_server(args: ServeArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = args.server_addr.parse::<SocketAddr>()?;
    let state = AppState::from_args(&args)?;
    let app = router(state);

    if args.enable_tls {
        let (cert_path, key_path) = match (&args.tls_cert_path, &args.tls_key_path) {
            (Some(cert), Some(key)) => (cert, key),
            _ => {
                error!("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.");
                return Err("Missing TLS certificate or key path".into());
            }
        };
        info!("TLS enabled. Loading certificate from '{}' and key from '{}'", cert_path, key_path);
        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            cert_path,
            key_path
        ).await?;

        info!("Relay listening on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service()).await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Relay listening on: http://{}", addr);
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    let mut response = (status, body).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    response
}

fn error_response(message: impl Into<String>) -> Response {
    let envelope = ErrorEnvelope { error: message.into() };
    let body = serde_json::to_vec(&envelope).unwrap_or_default();
    json_response(StatusCode::INTERNAL_SERVER_ERROR, body)
}

/// Upstream status and body go back untouched; a body that is not JSON is
/// reported the same way as a failed call.
fn relay_response(upstream: UpstreamResponse) -> Response {
    if let Err(e) = serde_json::from_slice::<serde::de::IgnoredAny>(&upstream.body) {
        warn!("Upstream returned a non-JSON body ({}): {}", upstream.status, e);
        return error_response(e.to_string());
    }
    let status = StatusCode::from_u16(upstream.status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    json_response(status, upstream.body)
}

async fn relay_handler(State(state): State<AppState>, body: Bytes) -> Response {
    if !state.upstream.has_api_key() {
        error!("Rejecting relay request: no upstream API key configured");
        return error_response(MISSING_KEY_MESSAGE);
    }

    let messages = relay_messages(&body);
    info!("Relaying {} messages to {}", messages.len(), state.upstream.base_url());

    match state.upstream.forward(&messages).await {
        Ok(upstream) => {
            info!("Upstream answered {}", upstream.status);
            relay_response(upstream)
        }
        Err(e) => {
            error!("Relay forwarding failed: {}", e);
            error_response(e.to_string())
        }
    }
}
