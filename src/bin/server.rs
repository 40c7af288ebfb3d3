//! REST API server for card checking.
//!
//! # Usage
//!
//! ```bash
//! # Start server
//! cccheck-server
//!
//! # With custom port and configuration
//! cccheck-server --port 8080 --config checker.json
//! ```
//!
//! # Swagger UI
//!
//! Visit http://localhost:3000/swagger-ui/ for interactive API documentation.

use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use cc_checker::bulk::{BulkResult, Filter};
use cc_checker::generate::{ExportFormat, GenerateTarget, GeneratedCard};
use cc_checker::history::CheckRecord;
use cc_checker::session::Session;
use cc_checker::{
    classify, classify_bin, format, CardNumber, CheckerConfig, ValidateOptions, ValidationVerdict,
    YearMonth,
};

// ============================================================================
// OpenAPI Documentation
// ============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Card Checker API",
        version = "0.1.0",
        description = "Card network classification, validation with a simulated live check, test-card generation and bulk parsing. No auth or rate limiting.",
        license(name = "MIT"),
        contact(name = "API Support")
    ),
    tags(
        (name = "Detection", description = "Network classification and BIN checks"),
        (name = "Validation", description = "Card number validation and live checks"),
        (name = "Generation", description = "Test card generation"),
        (name = "Bulk", description = "Bulk card list parsing"),
        (name = "Formatting", description = "Card number formatting utilities"),
        (name = "System", description = "Health and status endpoints")
    ),
    paths(
        classify_handler,
        bin_handler,
        lookup_handler,
        validate_handler,
        check_handler,
        history_handler,
        clear_history_handler,
        generate_handler,
        bulk_handler,
        format_handler,
        health,
    ),
    components(schemas(
        CardQuery,
        ClassifyResponse,
        BinResponse,
        LookupQuery,
        LookupResponse,
        ValidateRequest,
        CheckRequest,
        VerdictResponse,
        HistoryEntry,
        HistoryResponse,
        GenerateRequest,
        GeneratedCardResponse,
        GenerateResponse,
        BulkRequest,
        BulkRow,
        BulkSummaryResponse,
        BulkResponse,
        FormatRequest,
        FormatResponse,
        HealthResponse,
    ))
)]
struct ApiDoc;

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
struct AppState {
    session: Arc<Mutex<Session>>,
    config: Arc<CheckerConfig>,
}

type ApiError = (StatusCode, String);

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize, ToSchema, IntoParams)]
struct CardQuery {
    /// Card number or prefix (separators allowed)
    card: String,
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "network": "Discover",
    "label": "Discover Card",
    "valid_lengths": [16],
    "uses_checksum": true
}))]
struct ClassifyResponse {
    /// Detected network, or null when no rule matches
    network: Option<String>,
    /// Label of the matching catalog rule
    label: Option<String>,
    /// Accepted number lengths for the network
    valid_lengths: Option<Vec<usize>>,
    /// Whether the network requires a Luhn checksum
    uses_checksum: Option<bool>,
}

#[derive(Serialize, ToSchema)]
struct BinResponse {
    /// Whether the first six digits match a catalog rule
    valid: bool,
    /// The six digits that were checked
    bin: String,
    /// Network of the matching rule
    #[serde(skip_serializing_if = "Option::is_none")]
    network: Option<String>,
    /// Label of the matching rule
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

#[derive(Deserialize, ToSchema, IntoParams)]
struct LookupQuery {
    /// BIN (6-8 digits) or full card number
    bin: String,
}

#[derive(Serialize, ToSchema)]
struct LookupResponse {
    /// The BIN entry that matched
    bin: String,
    /// Issuing bank
    issuer: Option<String>,
    /// ISO country code
    country: Option<String>,
    /// Network name
    brand: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({"card_number": "4532-0151-1283-0366"}))]
struct ValidateRequest {
    /// Card number to validate. Spaces and dashes are ignored.
    card_number: String,
}

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({"card_number": "378282246310005", "expiry": "12/27", "cvv": "1234"}))]
struct CheckRequest {
    /// Card number to check
    card_number: String,
    /// Expiry as MM/YY
    expiry: String,
    /// CVV (4 digits for American Express, 3 otherwise)
    cvv: String,
}

#[derive(Serialize, ToSchema)]
#[schema(example = json!({
    "ok": false,
    "reason_code": "CHECKSUM_FAIL",
    "message": "invalid checksum (Luhn check failed) - please verify the card number",
    "network": "Visa",
    "masked": "****-****-****-0367"
}))]
struct VerdictResponse {
    /// True when every check passed
    ok: bool,
    /// Why validation failed (EMPTY, UNRECOGNIZED_NETWORK, BAD_LENGTH, CHECKSUM_FAIL, BAD_EXPIRY, BAD_CVV, LIVE_CHECK_FAIL)
    #[serde(skip_serializing_if = "Option::is_none")]
    reason_code: Option<String>,
    /// Human-readable explanation
    message: String,
    /// Detected network
    #[serde(skip_serializing_if = "Option::is_none")]
    network: Option<String>,
    /// Label of the matching BIN rule
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    /// Live-check score out of 120
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<u32>,
    /// Masked number, safe for display
    #[serde(skip_serializing_if = "Option::is_none")]
    masked: Option<String>,
}

impl VerdictResponse {
    fn new(input: &str, verdict: ValidationVerdict) -> Self {
        Self {
            ok: verdict.ok,
            reason_code: verdict.reason_code.map(|c| c.as_str().to_string()),
            message: verdict.message,
            network: verdict.network.map(|n| n.display_name().to_string()),
            label: verdict.label.map(str::to_string),
            score: verdict.score,
            masked: CardNumber::parse(input).map(|n| n.masked()),
        }
    }
}

#[derive(Serialize, ToSchema)]
struct HistoryEntry {
    /// Masked number
    masked: String,
    /// Detected network
    network: Option<String>,
    /// Whether the check passed
    ok: bool,
    /// Reason code of a failed check
    reason_code: Option<String>,
    /// RFC 3339 completion time
    timestamp: String,
}

impl From<&CheckRecord> for HistoryEntry {
    fn from(record: &CheckRecord) -> Self {
        Self {
            masked: record.masked(),
            network: record.network.map(|n| n.display_name().to_string()),
            ok: record.ok(),
            reason_code: record.verdict.reason_code.map(|c| c.as_str().to_string()),
            timestamp: record.timestamp.to_rfc3339(),
        }
    }
}

#[derive(Serialize, ToSchema)]
struct HistoryResponse {
    /// Recent checks, most recent first
    checks: Vec<HistoryEntry>,
    /// Maximum number of checks kept
    capacity: usize,
}

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({"network": "all", "count": 12}))]
struct GenerateRequest {
    /// Network id (visa, mastercard, amex, discover, diners, jcb, maestro, unionpay), "random" or "all"
    #[serde(default = "default_network")]
    network: String,
    /// Number of test cards to generate (1-100, default: 1)
    #[serde(default = "default_count")]
    count: usize,
}

fn default_network() -> String {
    "random".to_string()
}

fn default_count() -> usize {
    1
}

#[derive(Serialize, ToSchema)]
struct GeneratedCardResponse {
    /// Card number, null when generation gave up
    number: Option<String>,
    /// Number grouped for display
    formatted: String,
    /// Network id
    network: String,
    /// CVV
    cvv: String,
    /// Expiry as MM/YY
    expiry: String,
    /// Issuing bank
    bank: String,
    /// Issuer country code
    country: String,
    /// Whether the number passes validation
    is_valid: bool,
    /// "number | MM/YY | cvv" export line
    pipe_line: Option<String>,
}

impl From<GeneratedCard> for GeneratedCardResponse {
    fn from(card: GeneratedCard) -> Self {
        Self {
            number: card.number.as_ref().map(|n| n.number()),
            formatted: card.formatted(),
            network: card.network.id().to_string(),
            cvv: card.cvv.clone(),
            expiry: card.expiry.to_string(),
            is_valid: card.is_valid,
            pipe_line: card.export_line(ExportFormat::Pipe),
            bank: card.bank,
            country: card.country_code,
        }
    }
}

#[derive(Serialize, ToSchema)]
struct GenerateResponse {
    /// Generated cards
    cards: Vec<GeneratedCardResponse>,
}

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({"text": "5255 9391 0489 8994 | 05/26 | 244\n4546 5691 4776 4006 10 29 564", "filter": "all"}))]
struct BulkRequest {
    /// One card per line, pipe- or space-delimited
    text: String,
    /// all, valid or invalid
    #[serde(default)]
    #[schema(value_type = String)]
    filter: Filter,
}

#[derive(Serialize, ToSchema)]
struct BulkRow {
    /// 1-based input line
    line: usize,
    /// Line format that matched
    format: String,
    /// Number grouped for display
    number: String,
    /// Detected network
    network: Option<String>,
    /// CVV
    cvv: String,
    /// Expiry as MM/YY
    expiry: String,
    /// Issuing bank
    bank: String,
    /// Issuer country code
    country: String,
    /// Whether the number validated
    valid: bool,
    /// Reason code of an invalid number
    reason_code: Option<String>,
}

impl From<&BulkResult> for BulkRow {
    fn from(result: &BulkResult) -> Self {
        Self {
            line: result.line,
            format: result.entry.format.to_string(),
            number: format::format_for_display(&result.entry.number),
            network: result.network.map(|n| n.display_name().to_string()),
            cvv: result.entry.cvv.clone(),
            expiry: result.entry.expiry.clone(),
            bank: result.issuer.bank.to_string(),
            country: result.issuer.country.to_string(),
            valid: result.is_valid(),
            reason_code: result.verdict.reason_code.map(|c| c.as_str().to_string()),
        }
    }
}

#[derive(Serialize, ToSchema)]
struct BulkSummaryResponse {
    /// Lines that yielded a card
    total: usize,
    /// Valid numbers
    valid: usize,
    /// Invalid numbers
    invalid: usize,
    /// Non-blank lines without a card
    dropped: usize,
}

#[derive(Serialize, ToSchema)]
struct BulkResponse {
    /// Rows accepted by the filter
    results: Vec<BulkRow>,
    /// Counts over the whole input
    summary: BulkSummaryResponse,
}

#[derive(Deserialize, ToSchema)]
struct FormatRequest {
    /// Card number to format
    card_number: String,
    /// Separator (default: space)
    #[serde(default = "default_separator")]
    separator: String,
}

fn default_separator() -> String {
    " ".to_string()
}

#[derive(Serialize, ToSchema)]
struct FormatResponse {
    /// Formatted card number
    formatted: String,
    /// Digits only
    stripped: String,
}

#[derive(Serialize, ToSchema)]
struct HealthResponse {
    /// Service status
    status: String,
    /// API version
    version: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Classify a (partial) card number
#[utoipa::path(
    get,
    path = "/classify",
    params(CardQuery),
    responses(
        (status = 200, description = "Detected network", body = ClassifyResponse)
    ),
    tag = "Detection"
)]
async fn classify_handler(Query(query): Query<CardQuery>) -> Json<ClassifyResponse> {
    match classify(&query.card) {
        Some(c) => Json(ClassifyResponse {
            network: Some(c.network.display_name().to_string()),
            label: Some(c.label.to_string()),
            valid_lengths: Some(c.valid_lengths.iter().map(|&l| l as usize).collect()),
            uses_checksum: Some(c.uses_checksum),
        }),
        None => Json(ClassifyResponse {
            network: None,
            label: None,
            valid_lengths: None,
            uses_checksum: None,
        }),
    }
}

/// Check the first six digits against the catalog
#[utoipa::path(
    get,
    path = "/bin",
    params(CardQuery),
    responses(
        (status = 200, description = "BIN check", body = BinResponse),
        (status = 400, description = "Fewer than six digits")
    ),
    tag = "Detection"
)]
async fn bin_handler(Query(query): Query<CardQuery>) -> Result<Json<BinResponse>, ApiError> {
    let check = classify_bin(&query.card)
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "a BIN needs at least 6 digits".to_string()))?;
    Ok(Json(BinResponse {
        valid: check.valid,
        bin: check.bin,
        network: check.network.map(|n| n.display_name().to_string()),
        label: check.label.map(str::to_string),
    }))
}

/// Issuer metadata for a BIN
#[utoipa::path(
    get,
    path = "/lookup",
    params(LookupQuery),
    responses(
        (status = 200, description = "Issuer metadata", body = LookupResponse),
        (status = 404, description = "Lookup failed")
    ),
    tag = "Detection"
)]
async fn lookup_handler(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<LookupResponse>, ApiError> {
    let session = state.session.lock().await;
    let info = session
        .lookup_bin(&query.bin)
        .map_err(|e| (StatusCode::NOT_FOUND, format!("{}: {}", e.code().as_str(), e)))?;
    Ok(Json(LookupResponse {
        bin: info.bin,
        issuer: info.issuer,
        country: info.country,
        brand: info.brand,
    }))
}

/// Validate a card number
#[utoipa::path(
    post,
    path = "/validate",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Validation verdict", body = VerdictResponse)
    ),
    tag = "Validation"
)]
async fn validate_handler(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Json<VerdictResponse> {
    let verdict = state
        .session
        .lock()
        .await
        .check_now(&req.card_number, &ValidateOptions::new(), YearMonth::current());
    Json(VerdictResponse::new(&req.card_number, verdict))
}

/// Run the simulated live check
///
/// Waits for the configured live-check delay before answering.
#[utoipa::path(
    post,
    path = "/check",
    request_body = CheckRequest,
    responses(
        (status = 200, description = "Live-check verdict", body = VerdictResponse)
    ),
    tag = "Validation"
)]
async fn check_handler(
    State(state): State<AppState>,
    Json(req): Json<CheckRequest>,
) -> Json<VerdictResponse> {
    tokio::time::sleep(state.config.live_check_delay()).await;
    let options = ValidateOptions::live(req.expiry, req.cvv);
    let verdict = state
        .session
        .lock()
        .await
        .check_now(&req.card_number, &options, YearMonth::current());
    Json(VerdictResponse::new(&req.card_number, verdict))
}

/// Recent checks
#[utoipa::path(
    get,
    path = "/history",
    responses(
        (status = 200, description = "Recent checks, most recent first", body = HistoryResponse)
    ),
    tag = "Validation"
)]
async fn history_handler(State(state): State<AppState>) -> Json<HistoryResponse> {
    let session = state.session.lock().await;
    Json(HistoryResponse {
        checks: session.history().iter().map(HistoryEntry::from).collect(),
        capacity: session.history().capacity(),
    })
}

/// Clear the check history
#[utoipa::path(
    delete,
    path = "/history",
    responses(
        (status = 204, description = "History cleared")
    ),
    tag = "Validation"
)]
async fn clear_history_handler(State(state): State<AppState>) -> StatusCode {
    state.session.lock().await.clear_history();
    StatusCode::NO_CONTENT
}

/// Generate test cards
#[utoipa::path(
    post,
    path = "/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated cards", body = GenerateResponse),
        (status = 400, description = "Unknown network")
    ),
    tag = "Generation"
)]
async fn generate_handler(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let target: GenerateTarget = req
        .network
        .parse()
        .map_err(|e: cc_checker::card::UnknownNetwork| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let count = req.count.clamp(1, 100); // Limit to 100 cards

    let cards = cc_checker::generate::generate_many(
        target,
        count,
        &mut rand::thread_rng(),
        YearMonth::current(),
        &state.config,
    );

    Ok(Json(GenerateResponse {
        cards: cards.into_iter().map(GeneratedCardResponse::from).collect(),
    }))
}

/// Parse a bulk card list
#[utoipa::path(
    post,
    path = "/bulk",
    request_body = BulkRequest,
    responses(
        (status = 200, description = "Parsed and validated lines", body = BulkResponse)
    ),
    tag = "Bulk"
)]
async fn bulk_handler(Json(req): Json<BulkRequest>) -> Json<BulkResponse> {
    let report = cc_checker::parse_bulk(&req.text, YearMonth::current());
    let summary = report.summary();
    Json(BulkResponse {
        results: report.filter(req.filter).map(BulkRow::from).collect(),
        summary: BulkSummaryResponse {
            total: summary.total,
            valid: summary.valid,
            invalid: summary.invalid,
            dropped: summary.dropped,
        },
    })
}

/// Format a card number
#[utoipa::path(
    post,
    path = "/format",
    request_body = FormatRequest,
    responses(
        (status = 200, description = "Formatted card", body = FormatResponse)
    ),
    tag = "Formatting"
)]
async fn format_handler(Json(req): Json<FormatRequest>) -> Json<FormatResponse> {
    Json(FormatResponse {
        formatted: format::format_with_separator(&req.card_number, &req.separator),
        stripped: format::strip_non_digits(&req.card_number),
    })
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "System"
)]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Main
// ============================================================================

fn flag_value(name: &str) -> Option<String> {
    std::env::args().skip_while(|a| a != name).nth(1)
}

fn load_config() -> CheckerConfig {
    let Some(path) = flag_value("--config") else {
        return CheckerConfig::default();
    };
    match CheckerConfig::from_json_file(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(path = %path, error = %e, "failed to load configuration");
            std::process::exit(2);
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = flag_value("--port")
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let config = load_config();

    let state = AppState {
        session: Arc::new(Mutex::new(Session::new(config.clone()))),
        config: Arc::new(config),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(Any);

    // Build router with Swagger UI
    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/classify", get(classify_handler))
        .route("/bin", get(bin_handler))
        .route("/lookup", get(lookup_handler))
        .route("/validate", post(validate_handler))
        .route("/check", post(check_handler))
        .route("/history", get(history_handler).delete(clear_history_handler))
        .route("/generate", post(generate_handler))
        .route("/bulk", post(bulk_handler))
        .route("/format", post(format_handler))
        .route("/health", get(health))
        .with_state(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}:{}/swagger-ui/", "localhost", port);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
    }
}
