//
// web.rs
// Dicom-Png-rs
//
// Axum-based HTTP adapter exposing upload, header lookup, header listing, and PNG conversion APIs.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::Path;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path as UrlPath, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::{
    directory,
    error::DicomError,
    image,
    models::{FileResponse, HeaderResponse, MessageResponse},
    png,
    storage::{self, FileStore},
    tag,
    values::{self, HeaderMap},
};

#[derive(Clone)]
struct AppState {
    store: FileStore,
}

type ApiError = (StatusCode, Json<MessageResponse>);
type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Default, Deserialize)]
struct FileQuery {
    filename: Option<String>,
}

impl FileQuery {
    fn filename(&self) -> Option<&str> {
        self.filename.as_deref().filter(|f| !f.is_empty())
    }
}

/// Bootstraps the Axum HTTP server on top of a store rooted at `storage_dir`.
pub async fn start_server(host: &str, port: u16, storage_dir: &Path) -> anyhow::Result<()> {
    let app = router(FileStore::new(storage_dir)?);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!(%addr, storage = ?storage_dir, "server running");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Wires up the API routes over the given store.
pub fn router(store: FileStore) -> Router {
    Router::new()
        .route("/api/v1/file", post(upload_handler))
        .route("/api/v1/file/headers", get(headers_handler))
        .route("/api/v1/file/header", get(missing_tag_handler))
        .route("/api/v1/file/header/:tag", get(header_handler))
        .route(
            "/api/v1/file/png",
            post(create_png_handler).get(get_png_handler),
        )
        .with_state(AppState { store })
        .layer(CorsLayer::permissive())
}

async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<FileResponse>> {
    let mut multipart =
        multipart.map_err(|_| bad_request("Invalid Content-Type, must be multipart/form-data"))?;

    // Find the first part named "file" and pull bytes eagerly.
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        if field.name() == Some("file") {
            let name = field.file_name().map(|s| s.to_string());
            let data = field.bytes().await.map_err(bad_request)?;
            upload = Some((name, data));
            break;
        }
    }

    let Some((Some(name), data)) = upload.filter(|(name, _)| name.as_deref() != Some("")) else {
        return Err(bad_request("File is required"));
    };

    if !directory::has_dicom_signature(&data) {
        return Err(bad_request("Invalid file format, must be in DICOM format"));
    }

    let saved = state.store.write(&name, &data).map_err(|err| {
        warn!(error = %format!("{err:#}"), "failed to save upload");
        internal_error("System error saving file")
    })?;
    info!(file = %saved, bytes = data.len(), "stored upload");

    Ok(Json(FileResponse {
        message: "File received and saved".into(),
        file_name: saved,
    }))
}

async fn headers_handler(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> ApiResult<Json<HeaderMap>> {
    let filename = query
        .filename()
        .ok_or_else(|| bad_request("Filename is required"))?;
    let bytes = read_stored(&state, filename, "No file is present at the supplied filename")?;
    Ok(Json(values::extract_all_from_bytes(&bytes)))
}

async fn header_handler(
    State(state): State<AppState>,
    UrlPath(raw_tag): UrlPath<String>,
    Query(query): Query<FileQuery>,
) -> ApiResult<Json<HeaderResponse>> {
    let tag =
        tag::normalize(Some(raw_tag.as_str())).map_err(|_| bad_request("No tag is present"))?;
    let filename = query
        .filename()
        .ok_or_else(|| bad_request("No filename is present"))?;
    let bytes = read_stored(&state, filename, "No file is present at the supplied filename")?;

    let value = values::extract_from_bytes(&bytes, tag).map_err(bad_request)?;
    if value.is_absent() {
        return Err(bad_request(format!("No header found for tag: \"{tag}\"")));
    }

    Ok(Json(HeaderResponse { tag, value }))
}

async fn missing_tag_handler() -> ApiError {
    bad_request("No Tag Defined")
}

async fn create_png_handler(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> ApiResult<Json<FileResponse>> {
    let filename = query
        .filename()
        .ok_or_else(|| bad_request("Filename is required"))?;
    let bytes = read_stored(&state, filename, "No DICOM file is present at that filename")?;

    let png = image::dicom_to_png(&bytes).map_err(|err| match err {
        DicomError::NotDicom | DicomError::NoPixelData => bad_request("File is not a DICOM"),
        other => bad_request(other),
    })?;

    let saved = state
        .store
        .write(&storage::png_file_name(filename), &png)
        .map_err(|err| {
            warn!(error = %format!("{err:#}"), "failed to save png");
            internal_error("System error saving file")
        })?;
    info!(source = %filename, file = %saved, "created png");

    Ok(Json(FileResponse {
        message: "File created".into(),
        file_name: saved,
    }))
}

async fn get_png_handler(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> ApiResult<impl IntoResponse> {
    let filename = query
        .filename()
        .ok_or_else(|| bad_request("Filename is required"))?;
    let bytes = read_stored(&state, filename, "No PNG file is present at that filename")?;

    if !png::is_png(&bytes) {
        return Err(bad_request("File is not a PNG"));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CONTENT_DISPOSITION, "inline; filename=image.png"),
        ],
        bytes,
    ))
}

fn read_stored(state: &AppState, filename: &str, missing: &str) -> ApiResult<Vec<u8>> {
    match state.store.read(filename) {
        Ok(Some(bytes)) => Ok(bytes),
        Ok(None) => Err(bad_request(missing)),
        Err(err) => {
            warn!(file = %filename, error = %format!("{err:#}"), "failed to read stored file");
            Err(bad_request(missing))
        }
    }
}

fn bad_request<E: Display>(err: E) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(MessageResponse::new(err.to_string())),
    )
}

fn internal_error<E: Display>(err: E) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(MessageResponse::new(err.to_string())),
    )
}
