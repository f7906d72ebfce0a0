//! `/people` routes.
//!
//! Every failure, whatever its cause, is answered with 400 and an `error`
//! field. Lookups that match nothing succeed with a JSON `null`.

use crate::dtos::PersonResponse;
use crate::models::PersonFields;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use tracing::instrument;

/// List all people.
///
/// GET /people
pub async fn list_people(
    State(state): State<AppState>,
) -> Result<Json<Vec<PersonResponse>>, AppError> {
    let people = state.store.list_all().await.map_err(AppError::collapse)?;
    Ok(Json(people.into_iter().map(PersonResponse::from).collect()))
}

/// Create a person from the request body. Answers 200, not 201.
///
/// POST /people
#[instrument(skip(state, payload), fields(person_id))]
pub async fn create_person(
    State(state): State<AppState>,
    payload: Result<Json<PersonFields>, JsonRejection>,
) -> Result<Json<PersonResponse>, AppError> {
    let Json(fields) = payload?;

    let person = state.store.create(fields).await.map_err(AppError::collapse)?;
    let response = PersonResponse::from(person);

    tracing::Span::current().record("person_id", response.id.as_str());
    tracing::info!("Person created");

    Ok(Json(response))
}

/// GET /people/:id
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<PersonResponse>>, AppError> {
    let person = state.store.get_by_id(&id).await.map_err(AppError::collapse)?;
    Ok(Json(person.map(PersonResponse::from)))
}

/// Merge the request body into a person. Fields not sent are kept.
///
/// PUT /people/:id
#[instrument(skip(state, payload))]
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PersonFields>, JsonRejection>,
) -> Result<Json<Option<PersonResponse>>, AppError> {
    let Json(fields) = payload?;

    let person = state
        .store
        .update_by_id(&id, fields)
        .await
        .map_err(AppError::collapse)?;

    if person.is_some() {
        tracing::info!("Person updated");
    }

    Ok(Json(person.map(PersonResponse::from)))
}

/// Delete a person, answering 204 with the removed record as the body.
///
/// Servers drop 204 bodies on the wire; in-process callers still see it.
///
/// DELETE /people/:id
#[instrument(skip(state))]
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Option<PersonResponse>>), AppError> {
    let person = state.store.delete_by_id(&id).await.map_err(AppError::collapse)?;

    if person.is_some() {
        tracing::info!("Person deleted");
    }

    Ok((StatusCode::NO_CONTENT, Json(person.map(PersonResponse::from))))
}
