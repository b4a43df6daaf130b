// SPDX-License-Identifier: AGPL-3.0-or-later

use axum::extract::{Extension, Path};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::header;
use serde::Deserialize;

use crate::db::errors::SheetStoreError;
use crate::db::traits::SheetStore;
use crate::http::context::HttpServiceContext;
use crate::locale::Locale;
use crate::sheet::{GroupId, NewSheet, Sheet, SheetId, SheetPatch};
use crate::workbook::DecodeError;

/// Request header carrying the permission groups of the caller.
///
/// The service itself does not authenticate principals, it expects an
/// authenticating reverse proxy to resolve the caller and forward its group
/// memberships as a comma-separated list in this header.
pub const AUTH_GROUPS_HEADER: &str = "x-auth-groups";

/// Request body for creating a sheet record.
#[derive(Debug, Deserialize)]
pub struct CreateSheetRequest {
    /// User-visible title, required.
    pub name: String,

    /// Base64-encoded workbook document. Omitted: the default empty workbook
    /// is generated.
    pub data: Option<String>,

    /// Base64-encoded preview image.
    pub thumbnail: Option<String>,

    /// Position in the default listing order.
    pub sequence: Option<i64>,

    /// Permission groups. Omitted: the built-in "internal user" group.
    pub group_ids: Option<Vec<GroupId>>,

    /// Locale for the default workbook. Omitted: the configured default.
    pub locale: Option<Locale>,
}

/// Request body for partially updating a sheet record.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSheetRequest {
    /// New user-visible title.
    pub name: Option<String>,

    /// New base64-encoded workbook document.
    pub data: Option<String>,

    /// New base64-encoded preview image.
    pub thumbnail: Option<String>,

    /// New position in the default listing order.
    pub sequence: Option<i64>,

    /// Replacement for the full set of permission groups.
    pub group_ids: Option<Vec<GroupId>>,
}

/// Handle requests for creating a new sheet record.
pub async fn handle_create_sheet(
    Extension(context): Extension<HttpServiceContext>,
    Json(request): Json<CreateSheetRequest>,
) -> Result<(StatusCode, Json<Sheet>), SheetHttpError> {
    let new_sheet = NewSheet {
        name: request.name,
        data: request.data,
        thumbnail: request.thumbnail,
        sequence: request.sequence,
        group_ids: request.group_ids.unwrap_or_default(),
        locale: request.locale.unwrap_or(context.default_locale.clone()),
    };

    let sheet = context.store.insert_sheet(&new_sheet).await?;

    Ok((StatusCode::CREATED, Json(sheet)))
}

/// Handle requests for listing all sheet records.
///
/// Records the caller may not access are filtered from the result instead of
/// failing the whole request. The order is the default one: ascending
/// `sequence`, ties broken by id.
pub async fn handle_list_sheets(
    Extension(context): Extension<HttpServiceContext>,
    headers: HeaderMap,
) -> Result<Json<Vec<Sheet>>, SheetHttpError> {
    let groups = caller_groups(&headers);

    let sheets = context
        .store
        .list_sheets()
        .await?
        .into_iter()
        .filter(|sheet| sheet.accessible_by(&groups))
        .collect();

    Ok(Json(sheets))
}

/// Handle requests for one sheet record.
pub async fn handle_get_sheet(
    Extension(context): Extension<HttpServiceContext>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Sheet>, SheetHttpError> {
    let sheet = get_accessible_sheet(&context, &headers, &id).await?;
    Ok(Json(sheet))
}

/// Handle requests for updating a sheet record.
pub async fn handle_update_sheet(
    Extension(context): Extension<HttpServiceContext>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(request): Json<UpdateSheetRequest>,
) -> Result<Json<Sheet>, SheetHttpError> {
    let sheet = get_accessible_sheet(&context, &headers, &id).await?;

    let patch = SheetPatch {
        name: request.name,
        data: request.data,
        thumbnail: request.thumbnail,
        sequence: request.sequence,
        group_ids: request.group_ids,
    };

    let updated = context
        .store
        .update_sheet(&sheet.id, &patch)
        .await?
        .ok_or(SheetHttpError::NotFound)?;

    Ok(Json(updated))
}

/// Handle requests for deleting a sheet record.
pub async fn handle_delete_sheet(
    Extension(context): Extension<HttpServiceContext>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, SheetHttpError> {
    let sheet = get_accessible_sheet(&context, &headers, &id).await?;

    if context.store.delete_sheet(&sheet.id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(SheetHttpError::NotFound)
    }
}

/// Handle requests for the decoded workbook bytes of a sheet record.
///
/// This serves the derived `raw` value: recomputed from the stored `data` on
/// every request, never persisted. A payload which is not valid base64 makes
/// the request fail, the stored record stays as it is.
pub async fn handle_sheet_raw(
    Extension(context): Extension<HttpServiceContext>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, SheetHttpError> {
    let sheet = get_accessible_sheet(&context, &headers, &id).await?;

    let raw = sheet.raw().map_err(SheetHttpError::InvalidData)?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        raw,
    )
        .into_response())
}

/// Loads a sheet record and enforces the group-based access check.
async fn get_accessible_sheet(
    context: &HttpServiceContext,
    headers: &HeaderMap,
    id: &str,
) -> Result<Sheet, SheetHttpError> {
    let sheet = context
        .store
        .get_sheet(&SheetId::from(id))
        .await?
        .ok_or(SheetHttpError::NotFound)?;

    if !sheet.accessible_by(&caller_groups(headers)) {
        return Err(SheetHttpError::Forbidden);
    }

    Ok(sheet)
}

/// Returns the permission groups the caller presented in the request.
fn caller_groups(headers: &HeaderMap) -> Vec<GroupId> {
    headers
        .get(AUTH_GROUPS_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|group| !group.is_empty())
                .map(GroupId::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Errors of the sheet record HTTP API.
#[derive(Debug)]
pub enum SheetHttpError {
    /// No sheet record with the requested id exists.
    NotFound,

    /// The caller lacks a group membership required by the record.
    Forbidden,

    /// The stored payload could not be decoded.
    InvalidData(DecodeError),

    /// The storage layer failed.
    Store(SheetStoreError),
}

impl From<SheetStoreError> for SheetHttpError {
    fn from(error: SheetStoreError) -> Self {
        Self::Store(error)
    }
}

impl IntoResponse for SheetHttpError {
    fn into_response(self) -> Response {
        match self {
            SheetHttpError::NotFound => {
                (StatusCode::NOT_FOUND, "Could not find sheet").into_response()
            }
            SheetHttpError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Caller is not a member of any group of this sheet",
            )
                .into_response(),
            SheetHttpError::InvalidData(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Could not decode sheet data: {}", err),
            )
                .into_response(),
            SheetHttpError::Store(
                err @ SheetStoreError::ValidationFailed(_) | err @ SheetStoreError::UnknownGroup(_),
            ) => (StatusCode::BAD_REQUEST, format!("{}", err)).into_response(),
            SheetHttpError::Store(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Something went wrong: {}", err),
            )
                .into_response(),
        }
    }
}
