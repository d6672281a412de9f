/*
 * Responsibility
 * - /movies 系 CRUD handler
 * - JsonBody/MovieId extractor で受け、DTO validation → repo 呼び出し
 * - create/update の user は RequestContext の Subject (email)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::movies::{DeleteMovieResponse, MovieRequest, MovieResponse},
        extractors::{Ctx, JsonBody, MovieId},
    },
    error::Error,
    state::AppState,
};

fn movie_not_found(id: MovieId) -> Error {
    Error::not_found("movie not found").with_param("id", id.0)
}

pub async fn list_movies(
    State(state): State<AppState>,
) -> Result<Json<Vec<MovieResponse>>, Error> {
    let rows = state.movies.list().await?;
    Ok(Json(rows.into_iter().map(MovieResponse::from).collect()))
}

pub async fn create_movie(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    JsonBody(req): JsonBody<MovieRequest>,
) -> Result<(StatusCode, Json<MovieResponse>), Error> {
    let fields = req.validate()?;
    let subject = ctx.subject()?;

    let row = state.movies.create(fields, subject.id()).await?;
    tracing::info!(id = %row.id, user = subject.id(), "movie created");

    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn get_movie(
    State(state): State<AppState>,
    id: MovieId,
) -> Result<Json<MovieResponse>, Error> {
    let row = state
        .movies
        .get(id.0)
        .await?
        .ok_or_else(|| movie_not_found(id))?;

    Ok(Json(row.into()))
}

pub async fn update_movie(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    id: MovieId,
    JsonBody(req): JsonBody<MovieRequest>,
) -> Result<Json<MovieResponse>, Error> {
    let fields = req.validate()?;
    let subject = ctx.subject()?;

    let row = state
        .movies
        .update(id.0, fields, subject.id())
        .await?
        .ok_or_else(|| movie_not_found(id))?;

    Ok(Json(row.into()))
}

pub async fn delete_movie(
    State(state): State<AppState>,
    id: MovieId,
) -> Result<Json<DeleteMovieResponse>, Error> {
    let row = state
        .movies
        .delete(id.0)
        .await?
        .ok_or_else(|| movie_not_found(id))?;
    tracing::info!(id = %row.id, "movie deleted");

    Ok(Json(DeleteMovieResponse {
        external_id: row.id,
        deleted: true,
    }))
}
