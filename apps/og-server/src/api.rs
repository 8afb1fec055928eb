//! API handlers for the preview server
//!
//! - `GET /health`: service status
//! - `GET /ai`: interactive preview page
//! - `GET /og/app/{slug}.png`: preview image of a stored post

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use og_render::{Color, ImageFormat, RenderRequest, SecondaryFont};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::ApiError;
use crate::pages;
use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// `registered` or `fallback`
    pub secondary_font: &'static str,
    pub secondary_family: Option<String>,
}

/// Handler: GET /health
pub async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (secondary_font, secondary_family) = match state.renderer.fonts().secondary_status() {
        SecondaryFont::Registered { family } => ("registered", Some(family.clone())),
        SecondaryFont::Fallback { .. } => ("fallback", None),
    };

    Json(HealthResponse {
        status: "healthy",
        service: "og-server",
        version: env!("CARGO_PKG_VERSION"),
        secondary_font,
        secondary_family,
    })
}

/// Query parameters of the interactive preview
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewQuery {
    #[serde(alias = "title")]
    pub primary_title: Option<String>,
    #[serde(alias = "banglaTitle")]
    pub secondary_title: Option<String>,
    #[serde(alias = "bgColor")]
    pub background_color: Option<String>,
}

/// Parse a requested background; unparseable values fall back to the palette
fn parse_background(raw: Option<&str>) -> Option<Color> {
    let raw = raw.filter(|value| !value.is_empty())?;
    match raw.parse::<Color>() {
        Ok(color) => Some(color),
        Err(err) => {
            warn!("Ignoring background color: {}", err);
            None
        }
    }
}

/// Handler: GET /ai
pub async fn handle_preview_page(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    let primary = query
        .primary_title
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| state.default_title.to_string());
    let secondary = query.secondary_title.unwrap_or_default();
    let background = parse_background(query.background_color.as_deref());

    info!("Preview request: title={:?}", primary);
    debug!("Secondary title: {:?}, background: {:?}", secondary, background);

    let request = RenderRequest::new(primary.as_str(), secondary).with_background(background);

    match og_render::render(&state.renderer, request, ImageFormat::DataUri, state.timeout_ms).await
    {
        Ok(image) => Html(pages::preview_page(&primary, &image.into_data_uri())).into_response(),
        Err(err) => {
            error!("Error generating image: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(pages::error_page()),
            )
                .into_response()
        }
    }
}

/// Handler: GET /og/app/{slug}.png
pub async fn handle_post_image(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<Response, ApiError> {
    let slug = file.strip_suffix(".png").ok_or(ApiError::PostNotFound)?;

    info!("Post image request: slug={}", slug);

    let post = state
        .posts
        .find_by_slug(slug)
        .await?
        .ok_or(ApiError::PostNotFound)?;

    let request = RenderRequest::new(post.display_title(slug), post.secondary_title());
    let image =
        og_render::render(&state.renderer, request, ImageFormat::Png, state.timeout_ms).await?;

    let content_type = image.format().content_type();
    Ok(([(header::CONTENT_TYPE, content_type)], image.into_bytes()).into_response())
}
