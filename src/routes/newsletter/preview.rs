use crate::build_error_response;
use crate::domain::{MessageChunks, NewsletterHtml, NewsletterWebhookPayload, SplitError};
use crate::newsletter_pipeline::{RelaySettings, render_newsletter};
use crate::utils::error_chain_fmt;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use serde::Serialize;

#[derive(thiserror::Error)]
pub enum PreviewError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    Unsplittable(#[from] SplitError),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for PreviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for PreviewError {
    fn error_response(&self) -> HttpResponse {
        let status_code = match self {
            PreviewError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PreviewError::Unsplittable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PreviewError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        build_error_response(status_code, self.to_string())
    }
}

#[derive(Serialize)]
struct PreviewResponse {
    text: String,
    lead_image: Option<String>,
    chunks: Vec<String>,
}

/// Runs the transform without sending anything.
#[tracing::instrument(name = "Preview newsletter", skip_all)]
pub async fn preview_newsletter(
    payload: web::Json<NewsletterWebhookPayload>,
    settings: web::Data<RelaySettings>,
) -> Result<HttpResponse, PreviewError> {
    let html: NewsletterHtml = payload
        .into_inner()
        .try_into()
        .map_err(PreviewError::ValidationError)?;

    let rendered = render_newsletter(html).await?;
    let chunks = MessageChunks::split(&rendered.text, settings.message_limit)?;

    Ok(HttpResponse::Ok().json(PreviewResponse {
        chunks: chunks.into_iter().collect(),
        lead_image: rendered.lead_image.map(|url| url.as_ref().to_string()),
        text: rendered.text,
    }))
}
