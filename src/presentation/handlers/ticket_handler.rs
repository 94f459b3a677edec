// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::assign_request::ManualAssignRequestDto;
use crate::application::dto::create_ticket_request::CreateTicketRequestDto;
use crate::application::dto::envelope::ServiceResponse;
use crate::application::dto::escalate_request::EscalateRequestDto;
use crate::application::dto::ticket_response::{
    AssignmentOutcomeDto, EscalationCheckDto, EscalationRecordDto, IncidentDto, OpenTicketDataDto,
};
use crate::application::use_cases::ticket_use_case::TicketUseCase;
use crate::presentation::errors::AppError;
use axum::extract::{Extension, Path};
use axum::Json;
use std::sync::Arc;
use validator::Validate;

/// 工单创建处理器
pub async fn open_ticket(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    Json(request): Json<CreateTicketRequestDto>,
) -> Result<Json<ServiceResponse<OpenTicketDataDto>>, AppError> {
    if let Err(errors) = request.validate() {
        return Err(AppError::from(anyhow::anyhow!(
            "Validation error: {:?}",
            errors
        )));
    }
    Ok(Json(use_case.open_ticket(request).await))
}

/// 工单查询处理器
pub async fn get_ticket(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    Path(id): Path<i64>,
) -> Result<Json<ServiceResponse<IncidentDto>>, AppError> {
    Ok(Json(use_case.get_ticket(id).await))
}

/// 自动分派处理器
pub async fn assign_automatically(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    Path(id): Path<i64>,
) -> Result<Json<ServiceResponse<AssignmentOutcomeDto>>, AppError> {
    Ok(Json(use_case.assign_automatically(id).await))
}

/// 人工分派处理器
pub async fn assign_manually(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    Path(id): Path<i64>,
    Json(request): Json<ManualAssignRequestDto>,
) -> Result<Json<ServiceResponse<IncidentDto>>, AppError> {
    if let Err(errors) = request.validate() {
        return Err(AppError::from(anyhow::anyhow!(
            "Validation error: {:?}",
            errors
        )));
    }
    Ok(Json(use_case.assign_manually(id, request).await))
}

/// 升级处理器
pub async fn escalate(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    Path(id): Path<i64>,
    Json(request): Json<EscalateRequestDto>,
) -> Result<Json<ServiceResponse<IncidentDto>>, AppError> {
    if let Err(errors) = request.validate() {
        return Err(AppError::from(anyhow::anyhow!(
            "Validation error: {:?}",
            errors
        )));
    }
    Ok(Json(use_case.escalate(id, request).await))
}

/// 自动升级检查处理器
pub async fn check_escalation(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    Path(id): Path<i64>,
) -> Result<Json<ServiceResponse<EscalationCheckDto>>, AppError> {
    Ok(Json(use_case.check_escalation(id).await))
}

/// 升级历史查询处理器
pub async fn escalation_history(
    Extension(use_case): Extension<Arc<TicketUseCase>>,
    Path(id): Path<i64>,
) -> Result<Json<ServiceResponse<Vec<EscalationRecordDto>>>, AppError> {
    Ok(Json(use_case.escalation_history(id).await))
}
