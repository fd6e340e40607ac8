use crate::config::Config;
use crate::errors::{RelayError, Result};
use crate::services::quote_service::QuoteService;
use crate::util;
use axum::extract::{Path, Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone)]
struct AppState {
    service: Arc<QuoteService>,
}

/// 统一的JSON响应信封
#[derive(Debug, Serialize)]
struct ApiResponse<T: Serialize> {
    success: bool,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self { success: true, data })
    }
}

/// 将内部错误映射为HTTP错误响应
struct ApiError(RelayError);

impl From<RelayError> for ApiError {
    fn from(e: RelayError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            RelayError::SymbolNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
            "success": false,
            "error": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct QuotesRequest {
    #[serde(default)]
    symbols: Vec<String>,
}

/// 获取单个股票/ETF/指数实时行情
async fn get_quote(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let quote = state.service.get_quote(&symbol).await?;
    Ok(ApiResponse::ok(quote))
}

/// 批量获取行情数据
async fn get_quotes(
    State(state): State<AppState>,
    Json(request): Json<QuotesRequest>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let quotes: HashMap<_, _> = state.service.get_quotes(&request.symbols).await?;
    Ok(ApiResponse::ok(quotes))
}

/// 获取所有ETF实时行情
async fn get_all_etf(
    State(state): State<AppState>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let list = state.service.list_etf().await?;
    Ok(ApiResponse::ok(list))
}

/// 获取所有A股指数实时行情
async fn get_all_index(
    State(state): State<AppState>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let list = state.service.list_index().await?;
    Ok(ApiResponse::ok(list))
}

/// 健康检查
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "time": util::now_shanghai(),
    }))
}

/// 跨域响应头，前端页面直接访问本服务
async fn cors(request: Request, next: Next) -> Response {
    // OPTIONS预检请求不进入路由，直接应答
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

/// 构建API路由
pub fn router(service: Arc<QuoteService>) -> Router {
    let state = AppState { service };
    Router::new()
        .route("/api/quote/{symbol}", get(get_quote))
        .route("/api/quotes", post(get_quotes))
        .route("/api/etf/all", get(get_all_etf))
        .route("/api/index/all", get(get_all_index))
        .route("/api/health", get(health_check))
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

/// 启动HTTP服务
pub async fn serve(config: &Config, service: Arc<QuoteService>) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("启动实时行情API服务 http://{}", addr);
    info!("  GET  /api/quote/{{symbol}}  - 获取单个行情");
    info!("  POST /api/quotes          - 批量获取行情");
    info!("  GET  /api/etf/all         - 获取所有ETF行情");
    info!("  GET  /api/index/all       - 获取所有指数行情");
    info!("  GET  /api/health          - 健康检查");

    axum::serve(listener, router(service)).await?;
    Ok(())
}
