use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use milk_lifecycle::PublicView;
use milk_types::{CreateBatchRequest, LabResult};

use crate::auth::Caller;
use crate::dto::{
    lab_request, ApproveBody, HealthResponse, LedgerResponse, ProcessBody, ShipBody, TransportBody,
};
use crate::error::ServerResult;
use crate::state::AppState;

type Body<T> = Result<Json<T>, JsonRejection>;

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

pub async fn create_batch(
    State(state): State<AppState>,
    caller: Caller,
    body: Body<CreateBatchRequest>,
) -> ServerResult<(StatusCode, Json<LedgerResponse>)> {
    let Json(req) = body?;
    let outcome = state.service.create_batch(&caller.identity, &req).await?;
    Ok((StatusCode::CREATED, Json(LedgerResponse::tx(outcome))))
}

pub async fn list_batches(
    State(state): State<AppState>,
    caller: Caller,
) -> ServerResult<Json<LedgerResponse>> {
    let raw = state.service.get_all_batches(&caller.identity).await?;
    Ok(Json(LedgerResponse::read(raw)))
}

pub async fn read_batch(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> ServerResult<Json<LedgerResponse>> {
    let raw = state.service.read_batch(&caller.identity, &id).await?;
    Ok(Json(LedgerResponse::read(raw)))
}

pub async fn batch_history(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> ServerResult<Json<LedgerResponse>> {
    let raw = state.service.get_history(&caller.identity, &id).await?;
    Ok(Json(LedgerResponse::read(raw)))
}

pub async fn add_transport(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: Body<TransportBody>,
) -> ServerResult<Json<LedgerResponse>> {
    let Json(body) = body?;
    let outcome = state
        .service
        .add_transport_event(&caller.identity, &body.into_request(id))
        .await?;
    Ok(Json(LedgerResponse::tx(outcome)))
}

pub async fn add_lab_result(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: Body<LabResult>,
) -> ServerResult<Json<LedgerResponse>> {
    let Json(result) = body?;
    let outcome = state
        .service
        .add_lab_result(&caller.identity, &lab_request(id, result))
        .await?;
    Ok(Json(LedgerResponse::tx(outcome)))
}

pub async fn approve_batch(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: Body<ApproveBody>,
) -> ServerResult<Json<LedgerResponse>> {
    let Json(body) = body?;
    let outcome = state
        .service
        .approve_batch(&caller.identity, &body.into_request(id))
        .await?;
    Ok(Json(LedgerResponse::tx(outcome)))
}

pub async fn process_batch(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: Body<ProcessBody>,
) -> ServerResult<Json<LedgerResponse>> {
    let Json(body) = body?;
    let req = body.into_request(id)?;
    let outcome = state.service.process_batch(&caller.identity, &req).await?;
    Ok(Json(LedgerResponse::tx(outcome)))
}

pub async fn ship_batch(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    body: Body<ShipBody>,
) -> ServerResult<Json<LedgerResponse>> {
    let Json(body) = body?;
    let outcome = state
        .service
        .ship_to_retail(&caller.identity, &body.into_request(id))
        .await?;
    Ok(Json(LedgerResponse::tx(outcome)))
}

pub async fn receive_batch(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> ServerResult<Json<LedgerResponse>> {
    let outcome = state.service.receive_at_retail(&caller.identity, &id).await?;
    Ok(Json(LedgerResponse::tx(outcome)))
}

/// Anonymous route: runs under the configured public identity.
pub async fn public_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<PublicView>> {
    Ok(Json(state.service.public_view(&id).await?))
}
