//! Email handlers.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::mail::{Email, MailService, SendEmailRequest};
use crate::web::dto::{MessageResponse, SendEmailResponse};
use crate::web::error::{ApiError, ErrorBody};

use super::{parse_id, AppState, FormData};

/// POST /api/emails/send - Send an email.
///
/// Request body: multipart/form-data with "from", "to", "subject", "body",
/// an optional "labels" JSON array and an optional "attachment" file.
#[utoipa::path(
    post,
    path = "/api/emails/send",
    tag = "emails",
    request_body(content = String, content_type = "multipart/form-data", description = "from, to, subject, body, labels and attachment"),
    responses(
        (status = 201, description = "Email sent", body = SendEmailResponse),
        (status = 400, description = "Missing fields or invalid labels", body = ErrorBody),
        (status = 413, description = "Attachment too large", body = ErrorBody)
    )
)]
pub async fn send_email(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<SendEmailResponse>), ApiError> {
    let mut form = FormData::read(multipart, "attachment").await?;

    let mut request = SendEmailRequest {
        from: form.take("from").unwrap_or_default(),
        to: form.take("to").unwrap_or_default(),
        subject: form.take("subject").unwrap_or_default(),
        body: form.take("body").unwrap_or_default(),
        labels: form.take("labels"),
        attachment: None,
    };

    if let Some(file) = form.file.take() {
        request.attachment = Some(state.storage.save_attachment(&file.content, &file.file_name)?);
    }

    let service = MailService::new(state.db.pool(), &state.hub);
    let email = match service.send(&request).await {
        Ok(email) => email,
        Err(e) => {
            if let Some(ref attachment) = request.attachment {
                if let Err(err) = state.storage.delete(attachment) {
                    tracing::warn!("Failed to remove orphaned attachment {}: {}", attachment, err);
                }
            }
            return Err(e.into());
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(SendEmailResponse {
            message: "Email sent successfully".to_string(),
            email,
        }),
    ))
}

/// GET /api/emails/inbox/:email - Emails received by an address.
#[utoipa::path(
    get,
    path = "/api/emails/inbox/{email}",
    tag = "emails",
    params(
        ("email" = String, Path, description = "Recipient address")
    ),
    responses(
        (status = 200, description = "Inbox, newest first", body = Vec<Email>)
    )
)]
pub async fn inbox(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<Vec<Email>>, ApiError> {
    let emails = MailService::new(state.db.pool(), &state.hub)
        .list_inbox(&address)
        .await?;
    Ok(Json(emails))
}

/// GET /api/emails/sent/:email - Emails sent from an address.
#[utoipa::path(
    get,
    path = "/api/emails/sent/{email}",
    tag = "emails",
    params(
        ("email" = String, Path, description = "Sender address")
    ),
    responses(
        (status = 200, description = "Sent emails, newest first", body = Vec<Email>)
    )
)]
pub async fn sent(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<Vec<Email>>, ApiError> {
    let emails = MailService::new(state.db.pool(), &state.hub)
        .list_sent(&address)
        .await?;
    Ok(Json(emails))
}

/// GET /api/emails/snoozed/:email - Received emails labelled Snoozed.
#[utoipa::path(
    get,
    path = "/api/emails/snoozed/{email}",
    tag = "emails",
    params(
        ("email" = String, Path, description = "Recipient address")
    ),
    responses(
        (status = 200, description = "Snoozed emails, newest first", body = Vec<Email>)
    )
)]
pub async fn snoozed(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<Vec<Email>>, ApiError> {
    let emails = MailService::new(state.db.pool(), &state.hub)
        .list_snoozed(&address)
        .await?;
    Ok(Json(emails))
}

/// GET /api/emails/:id - Get an email.
#[utoipa::path(
    get,
    path = "/api/emails/{id}",
    tag = "emails",
    params(
        ("id" = i64, Path, description = "Email ID")
    ),
    responses(
        (status = 200, description = "Email", body = Email),
        (status = 404, description = "Email not found", body = ErrorBody)
    )
)]
pub async fn get_email(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Email>, ApiError> {
    let id = parse_id(&id, "email")?;
    let email = MailService::new(state.db.pool(), &state.hub).get(id).await?;
    Ok(Json(email))
}

/// PUT /api/emails/read/:id - Mark an email as read.
#[utoipa::path(
    put,
    path = "/api/emails/read/{id}",
    tag = "emails",
    params(
        ("id" = i64, Path, description = "Email ID")
    ),
    responses(
        (status = 200, description = "Updated email", body = Email),
        (status = 404, description = "Email not found", body = ErrorBody)
    )
)]
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Email>, ApiError> {
    let id = parse_id(&id, "email")?;
    let email = MailService::new(state.db.pool(), &state.hub)
        .mark_read(id)
        .await?;
    Ok(Json(email))
}

/// DELETE /api/emails/:id - Delete an email and its attachment.
#[utoipa::path(
    delete,
    path = "/api/emails/{id}",
    tag = "emails",
    params(
        ("id" = i64, Path, description = "Email ID")
    ),
    responses(
        (status = 200, description = "Email deleted (or already absent)", body = MessageResponse)
    )
)]
pub async fn delete_email(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    // Unknown and non-numeric ids both count as already deleted.
    let Ok(id) = parse_id(&id, "email") else {
        return Ok(Json(MessageResponse::new("Email deleted successfully")));
    };

    let removed = MailService::new(state.db.pool(), &state.hub)
        .delete(id)
        .await?;

    if let Some(attachment) = removed.and_then(|email| email.attachment) {
        if let Err(e) = state.storage.delete(&attachment) {
            tracing::warn!("Failed to remove attachment {}: {}", attachment, e);
        }
    }

    Ok(Json(MessageResponse::new("Email deleted successfully")))
}
