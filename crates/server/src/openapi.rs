use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Documentation shape of an artist record. Any other column of the dataset
/// is passed through as an extra string property.
#[derive(Serialize, ToSchema)]
pub struct ArtistRecordDoc {
    #[serde(rename = "Index")]
    #[schema(example = "1")]
    pub index: String,
    #[serde(rename = "Artist Name")]
    #[schema(example = "Adele")]
    pub artist_name: String,
}

/// Fields to overwrite; keys the record does not already have are ignored.
#[derive(Serialize, ToSchema)]
pub struct UpdatePayloadDoc {
    #[serde(rename = "Artist Name")]
    pub artist_name: Option<String>,
    #[serde(rename = "Genre")]
    #[schema(example = "Soul")]
    pub genre: Option<String>,
}

#[derive(ToSchema)]
pub struct MessageBodyDoc { pub mensagem: String }

#[derive(ToSchema)]
pub struct ErrorBodyDoc { pub erro: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::artists::list_artists,
        crate::routes::artists::get_artist_by_name,
        crate::routes::artists::get_artist_by_index,
        crate::routes::artists::update_artist_by_name,
        crate::routes::artists::update_artist_by_index,
        crate::routes::artists::delete_artist_by_name,
        crate::routes::artists::delete_artist_by_index,
        crate::routes::artists::add_artist,
    ),
    components(
        schemas(
            HealthResponse,
            ArtistRecordDoc,
            UpdatePayloadDoc,
            MessageBodyDoc,
            ErrorBodyDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "artists")
    )
)]
pub struct ApiDoc;
