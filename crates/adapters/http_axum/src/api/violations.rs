//! JSON REST handlers for violations.

use std::str::FromStr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use camguard_app::ports::ViolationRepository;
use camguard_domain::error::ValidationError;
use camguard_domain::id::ViolationId;
use camguard_domain::image::{ImageData, MAX_IMAGE_BYTES};
use camguard_domain::pagination::Page;
use camguard_domain::violation::{Violation, ViolationType};

use crate::api::metadata::{self, UploadQuery};
use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the total number of stored violations on list responses.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Query parameters for paginated endpoints.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Query parameters for the recent endpoint.
#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok { total: u64, items: Json<Vec<Violation>> },
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok { total, items } => {
                ([(TOTAL_COUNT_HEADER, total.to_string())], items).into_response()
            }
        }
    }
}

/// Possible responses from the recent and by-type endpoints.
pub enum FilteredResponse {
    Ok(Json<Vec<Violation>>),
}

impl IntoResponse for FilteredResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Violation>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the image endpoint.
pub enum ImageResponse {
    Ok(ImageData),
}

impl IntoResponse for ImageResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(image) => ([(CONTENT_TYPE, "image/jpeg")], image.into_inner()).into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<Violation>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

fn parse_id(raw: &str) -> Result<ViolationId, ApiError> {
    ViolationId::from_str(raw).map_err(|_| ValidationError::InvalidId(raw.to_owned()).into())
}

fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(inner)| inner)
        .map_err(|rejection| ValidationError::InvalidQuery(rejection.body_text()).into())
}

fn page_from(query: PageQuery) -> Result<Page, ApiError> {
    Ok(Page::new(query.page, query.limit)?)
}

/// `GET /api/violations?page=&limit=`
pub async fn list<VR>(
    State(state): State<AppState<VR>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<ListResponse, ApiError>
where
    VR: ViolationRepository + Send + Sync + 'static,
{
    let page = page_from(parse_query(query)?)?;
    let items = state.violation_service.list_violations(page).await?;
    let total = state.violation_service.count_violations().await?;
    Ok(ListResponse::Ok {
        total,
        items: Json(items),
    })
}

/// `GET /api/violations/recent?limit=`
pub async fn recent<VR>(
    State(state): State<AppState<VR>>,
    query: Result<Query<RecentQuery>, QueryRejection>,
) -> Result<FilteredResponse, ApiError>
where
    VR: ViolationRepository + Send + Sync + 'static,
{
    let RecentQuery { limit } = parse_query(query)?;
    let items = state.violation_service.recent_violations(limit).await?;
    Ok(FilteredResponse::Ok(Json(items)))
}

/// `GET /api/violations/type/:type?page=&limit=`
pub async fn by_type<VR>(
    State(state): State<AppState<VR>>,
    Path(violation_type): Path<String>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<FilteredResponse, ApiError>
where
    VR: ViolationRepository + Send + Sync + 'static,
{
    let violation_type = ViolationType::from_str(&violation_type)?;
    let page = page_from(parse_query(query)?)?;
    let items = state
        .violation_service
        .violations_by_type(violation_type, page)
        .await?;
    Ok(FilteredResponse::Ok(Json(items)))
}

/// `GET /api/violations/:id`
pub async fn get<VR>(
    State(state): State<AppState<VR>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    VR: ViolationRepository + Send + Sync + 'static,
{
    let violation = state.violation_service.get_violation(parse_id(&id)?).await?;
    Ok(GetResponse::Ok(Json(violation)))
}

/// `GET /api/violations/:id/image`
pub async fn image<VR>(
    State(state): State<AppState<VR>>,
    Path(id): Path<String>,
) -> Result<ImageResponse, ApiError>
where
    VR: ViolationRepository + Send + Sync + 'static,
{
    let image = state.violation_service.get_image(parse_id(&id)?).await?;
    Ok(ImageResponse::Ok(image))
}

/// `POST /api/violations` — raw JPEG body, metadata in headers or query.
pub async fn create<VR>(
    State(state): State<AppState<VR>>,
    query: Result<Query<UploadQuery>, QueryRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<CreateResponse, ApiError>
where
    VR: ViolationRepository + Send + Sync + 'static,
{
    metadata::ensure_jpeg(&headers)?;
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ValidationError::ImageTooLarge {
                max: MAX_IMAGE_BYTES,
            }
        } else {
            ValidationError::UnreadableBody(rejection.body_text())
        }
    })?;
    let readings = metadata::sensor_readings(parse_query(query)?, &headers)?;

    let created = state
        .violation_service
        .record(body.to_vec(), readings)
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `DELETE /api/violations/:id`
pub async fn delete<VR>(
    State(state): State<AppState<VR>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    VR: ViolationRepository + Send + Sync + 'static,
{
    state
        .violation_service
        .delete_violation(parse_id(&id)?)
        .await?;
    Ok(DeleteResponse::NoContent)
}
