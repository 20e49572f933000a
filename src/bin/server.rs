use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use ship_packer::parse::parse_inventory;
use ship_packer::solver::Solver;
use ship_packer::types::{Chunk, ItemStack, PackWarning, PackageSummary, PackingConfig};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct PackRequest {
    /// Tab-separated inventory with a header row.
    #[serde(default)]
    inventory: Option<String>,
    /// Already-parsed stacks; appended after any `inventory` rows.
    #[serde(default)]
    stacks: Vec<ItemStack>,
    #[serde(default)]
    config: PackingConfig,
}

#[derive(Serialize)]
struct PackResponse {
    packages: Vec<PackageSummary>,
    package_count: usize,
    estimated_packages: usize,
    total_volume: f64,
    total_value: f64,
    waste_percent: f64,
    warnings: Vec<PackWarning>,
    unplaced: Vec<UnplacedResponse>,
}

#[derive(Serialize)]
struct UnplacedResponse {
    chunk: Chunk,
    error: String,
}

async fn pack(Json(req): Json<PackRequest>) -> Result<Json<PackResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /pack"
    );

    let mut stacks = match &req.inventory {
        Some(text) => {
            parse_inventory(text).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
        }
        None => Vec::new(),
    };
    stacks.extend(req.stacks);
    if stacks.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "request must include inventory or stacks".to_string(),
        ));
    }

    let solution = Solver::new(req.config, stacks)
        .solve()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let unplaced = solution
        .unplaced
        .iter()
        .cloned()
        .zip(solution.errors())
        .map(|(chunk, error)| UnplacedResponse {
            chunk,
            error: error.to_string(),
        })
        .collect();

    let response = PackResponse {
        package_count: solution.package_count(),
        estimated_packages: solution.estimated_packages(),
        total_volume: solution.total_volume(),
        total_value: solution.total_value(),
        waste_percent: solution.total_waste_percent(),
        warnings: solution.warnings,
        packages: solution.packages,
        unplaced,
    };

    Ok(Json(response))
}

#[tokio::main]
async fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/pack", post(pack))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
