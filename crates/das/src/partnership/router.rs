use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::blacklist::BlacklistRegistry;
use super::domain::{PartnershipId, PartnershipRole, PartnershipRoleView};
use super::repository::{
    PartnershipRepository, PartnershipRequestRepository, SearchPartnershipRequestCriteria,
};
use super::request::{
    PartnershipRequest, PartnershipRequestResponse, RequestStatus, RequestStatusView,
};
use super::service::PartnershipRequestService;
use super::validation::PartnershipRequestError;
use crate::account::{AccountDirectory, AccountId};
use crate::store::RepositoryError;

type SharedService<D, B, P, R> = Arc<PartnershipRequestService<D, B, P, R>>;

/// Router builder exposing the partnership request workflow and partnership lookups.
pub fn partnership_router<D, B, P, R>(service: SharedService<D, B, P, R>) -> Router
where
    D: AccountDirectory + 'static,
    B: BlacklistRegistry + 'static,
    P: PartnershipRepository + 'static,
    R: PartnershipRequestRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/partnership/requests",
            post(create_request_handler::<D, B, P, R>).get(list_requests_handler::<D, B, P, R>),
        )
        .route(
            "/api/v1/partnership/requests/respond",
            post(respond_handler::<D, B, P, R>),
        )
        .route("/api/v1/partnership/request/status", get(request_status_handler))
        .route("/api/v1/partnership/roles", get(roles_handler))
        .route(
            "/api/v1/partnerships",
            get(account_partnerships_handler::<D, B, P, R>),
        )
        .route(
            "/api/v1/partnerships/:partnership_id",
            get(partnership_handler::<D, B, P, R>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RequestListQuery {
    pub(crate) sender: Option<u64>,
    pub(crate) recipient: Option<u64>,
    pub(crate) status: Option<RequestStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountQuery {
    pub(crate) account: u64,
}

pub(crate) fn error_response(error: PartnershipRequestError) -> Response {
    let status = match &error {
        PartnershipRequestError::InvalidRoleAssignment(_)
        | PartnershipRequestError::MissingIdentifier(_) => StatusCode::BAD_REQUEST,
        PartnershipRequestError::SenderBlocked => StatusCode::FORBIDDEN,
        PartnershipRequestError::RequestNotFound { .. } => StatusCode::NOT_FOUND,
        PartnershipRequestError::DuplicatePartnership { .. }
        | PartnershipRequestError::PendingRequestExists { .. }
        | PartnershipRequestError::AlreadyResolved { .. } => StatusCode::CONFLICT,
        PartnershipRequestError::AccountNotEligible { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PartnershipRequestError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

fn repository_error_response(error: RepositoryError) -> Response {
    error_response(PartnershipRequestError::Repository(error))
}

pub(crate) async fn create_request_handler<D, B, P, R>(
    State(service): State<SharedService<D, B, P, R>>,
    Json(request): Json<PartnershipRequest>,
) -> Response
where
    D: AccountDirectory + 'static,
    B: BlacklistRegistry + 'static,
    P: PartnershipRepository + 'static,
    R: PartnershipRequestRepository + 'static,
{
    match service.create_request(request) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn respond_handler<D, B, P, R>(
    State(service): State<SharedService<D, B, P, R>>,
    Json(response): Json<PartnershipRequestResponse>,
) -> Response
where
    D: AccountDirectory + 'static,
    B: BlacklistRegistry + 'static,
    P: PartnershipRepository + 'static,
    R: PartnershipRequestRepository + 'static,
{
    match service.respond(response) {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_requests_handler<D, B, P, R>(
    State(service): State<SharedService<D, B, P, R>>,
    Query(query): Query<RequestListQuery>,
) -> Response
where
    D: AccountDirectory + 'static,
    B: BlacklistRegistry + 'static,
    P: PartnershipRepository + 'static,
    R: PartnershipRequestRepository + 'static,
{
    if query.sender.is_none() && query.recipient.is_none() {
        return error_response(PartnershipRequestError::MissingIdentifier(
            "sender or recipient",
        ));
    }

    let criteria = SearchPartnershipRequestCriteria {
        request_id: None,
        sender_id: query.sender.map(AccountId),
        recipient_id: query.recipient.map(AccountId),
        status: query.status,
    };
    match service.search_requests(&criteria) {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(error) => repository_error_response(error),
    }
}

pub(crate) async fn account_partnerships_handler<D, B, P, R>(
    State(service): State<SharedService<D, B, P, R>>,
    Query(query): Query<AccountQuery>,
) -> Response
where
    D: AccountDirectory + 'static,
    B: BlacklistRegistry + 'static,
    P: PartnershipRepository + 'static,
    R: PartnershipRequestRepository + 'static,
{
    match service.partnerships_for(AccountId(query.account)) {
        Ok(partnerships) => (StatusCode::OK, Json(partnerships)).into_response(),
        Err(error) => repository_error_response(error),
    }
}

pub(crate) async fn partnership_handler<D, B, P, R>(
    State(service): State<SharedService<D, B, P, R>>,
    Path(partnership_id): Path<u64>,
) -> Response
where
    D: AccountDirectory + 'static,
    B: BlacklistRegistry + 'static,
    P: PartnershipRepository + 'static,
    R: PartnershipRequestRepository + 'static,
{
    let id = PartnershipId(partnership_id);
    match service.partnership_by_id(id) {
        Ok(Some(partnership)) => (StatusCode::OK, Json(partnership)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": format!("cannot find partnership with id {id}"),
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(error) => repository_error_response(error),
    }
}

pub(crate) async fn request_status_handler() -> Json<Vec<RequestStatusView>> {
    Json(RequestStatus::ALL.into_iter().map(Into::into).collect())
}

pub(crate) async fn roles_handler() -> Json<Vec<PartnershipRoleView>> {
    Json(PartnershipRole::ALL.into_iter().map(Into::into).collect())
}
