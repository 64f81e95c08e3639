use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use common::types::MessageBody;
use service::artists::domain::{parse_requested_index, Payload, Record};

use crate::errors::JsonApiError;
use crate::routes::AppState;

type JsonPayload = Result<Json<Payload>, JsonRejection>;
type PathSegment = Result<Path<String>, PathRejection>;

fn message(text: String) -> Json<MessageBody> {
    Json(MessageBody { mensagem: text })
}

/// 列出全部艺人记录
#[utoipa::path(
    get, path = "/data", tag = "artists",
    responses(
        (status = 200, description = "All records in file order", body = [crate::openapi::ArtistRecordDoc]),
        (status = 500, description = "Storage failure", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn list_artists(State(state): State<AppState>) -> Result<Json<Vec<Record>>, JsonApiError> {
    Ok(Json(state.artists.list().await?))
}

#[utoipa::path(
    get, path = "/data/artist/{name}", tag = "artists",
    params(("name" = String, Path, description = "Artist Name, case-insensitive")),
    responses(
        (status = 200, description = "First matching record", body = crate::openapi::ArtistRecordDoc),
        (status = 404, description = "Artist not found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get_artist_by_name(
    State(state): State<AppState>,
    name: PathSegment,
) -> Result<Json<Record>, JsonApiError> {
    let Path(name) = name?;
    Ok(Json(state.artists.get_by_name(&name).await?))
}

#[utoipa::path(
    get, path = "/data/index/{n}", tag = "artists",
    params(("n" = u64, Path, description = "Index value")),
    responses(
        (status = 200, description = "First record with this Index", body = crate::openapi::ArtistRecordDoc),
        (status = 400, description = "Index is not a non-negative integer", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Artist not found", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "A stored Index is not an integer", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn get_artist_by_index(
    State(state): State<AppState>,
    n: PathSegment,
) -> Result<Json<Record>, JsonApiError> {
    let Path(n) = n?;
    let index = parse_requested_index(&n)?;
    Ok(Json(state.artists.get_by_index(index).await?))
}

/// 按名称更新：只覆盖记录中已存在的列
#[utoipa::path(
    put, path = "/data/update/{name}", tag = "artists",
    params(("name" = String, Path, description = "Artist Name, case-insensitive")),
    request_body = crate::openapi::UpdatePayloadDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::MessageBodyDoc),
        (status = 400, description = "Invalid JSON body", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Artist not found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update_artist_by_name(
    State(state): State<AppState>,
    name: PathSegment,
    payload: JsonPayload,
) -> Result<Json<MessageBody>, JsonApiError> {
    let Path(name) = name?;
    let Json(payload) = payload?;
    state.artists.update_by_name(&name, payload).await?;
    Ok(message(format!("Dados do artista '{name}' atualizados com sucesso!")))
}

#[utoipa::path(
    put, path = "/data/update/index/{n}", tag = "artists",
    params(("n" = u64, Path, description = "Index value")),
    request_body = crate::openapi::UpdatePayloadDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::MessageBodyDoc),
        (status = 400, description = "Invalid index or JSON body", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Artist not found", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "A stored Index is not an integer", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn update_artist_by_index(
    State(state): State<AppState>,
    n: PathSegment,
    payload: JsonPayload,
) -> Result<Json<MessageBody>, JsonApiError> {
    let Path(n) = n?;
    let index = parse_requested_index(&n)?;
    let Json(payload) = payload?;
    state.artists.update_by_index(index, payload).await?;
    Ok(message(format!("Dados do artista com índice '{index}' atualizados com sucesso!")))
}

/// 按名称删除：删除所有同名（忽略大小写）记录
#[utoipa::path(
    delete, path = "/data/delete/{name}", tag = "artists",
    params(("name" = String, Path, description = "Artist Name, case-insensitive")),
    responses(
        (status = 200, description = "Every matching record removed", body = crate::openapi::MessageBodyDoc),
        (status = 404, description = "Artist not found", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete_artist_by_name(
    State(state): State<AppState>,
    name: PathSegment,
) -> Result<Json<MessageBody>, JsonApiError> {
    let Path(name) = name?;
    state.artists.delete_by_name(&name).await?;
    Ok(message(format!("Artista '{name}' deletado com sucesso!")))
}

#[utoipa::path(
    delete, path = "/data/delete/index/{n}", tag = "artists",
    params(("n" = u64, Path, description = "Index value")),
    responses(
        (status = 200, description = "Every matching record removed", body = crate::openapi::MessageBodyDoc),
        (status = 400, description = "Index is not a non-negative integer", body = crate::openapi::ErrorBodyDoc),
        (status = 404, description = "Artist not found", body = crate::openapi::ErrorBodyDoc),
        (status = 500, description = "A stored Index is not an integer", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn delete_artist_by_index(
    State(state): State<AppState>,
    n: PathSegment,
) -> Result<Json<MessageBody>, JsonApiError> {
    let Path(n) = n?;
    let index = parse_requested_index(&n)?;
    state.artists.delete_by_index(index).await?;
    Ok(message(format!("Artista com índice '{index}' deletado com sucesso!")))
}

/// 新增艺人：Index 由服务端生成
#[utoipa::path(
    post, path = "/data/add", tag = "artists",
    request_body = crate::openapi::ArtistRecordDoc,
    responses(
        (status = 201, description = "Created, with the assigned Index", body = crate::openapi::ArtistRecordDoc),
        (status = 400, description = "Artist already exists or Artist Name missing", body = crate::openapi::ErrorBodyDoc)
    )
)]
pub async fn add_artist(
    State(state): State<AppState>,
    payload: JsonPayload,
) -> Result<(StatusCode, Json<Record>), JsonApiError> {
    let Json(payload) = payload?;
    let created = state.artists.add(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
