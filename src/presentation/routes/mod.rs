// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::presentation::handlers::ticket_handler;
use axum::{
    routing::{get, post},
    Router,
};

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let ticket_routes = Router::new()
        .route("/v1/tickets", post(ticket_handler::open_ticket))
        .route("/v1/tickets/{id}", get(ticket_handler::get_ticket))
        .route(
            "/v1/tickets/{id}/assign",
            post(ticket_handler::assign_automatically),
        )
        .route(
            "/v1/tickets/{id}/assign/manual",
            post(ticket_handler::assign_manually),
        )
        .route("/v1/tickets/{id}/escalate", post(ticket_handler::escalate))
        .route(
            "/v1/tickets/{id}/escalate/check",
            post(ticket_handler::check_escalation),
        )
        .route(
            "/v1/tickets/{id}/escalations",
            get(ticket_handler::escalation_history),
        );

    Router::new().merge(public_routes).merge(ticket_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
