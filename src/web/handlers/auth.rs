//! Account handlers.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::auth::{CredentialStore, ProfilePatch};
use crate::db::UserRepository;
use crate::web::dto::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UpdateProfileResponse,
    ValidatedJson,
};
use crate::web::error::{ApiError, ErrorBody};

use super::{parse_id, AppState, FormData};

/// POST /api/auth/register - Create an account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid input or email already registered", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let store = CredentialStore::new(state.db.pool(), &state.accepted_domains);
    let user = store.register(&req.name, &req.email, &req.password).await?;
    let token = state.sessions.issue(user.id)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            msg: "User registered successfully".to_string(),
            token,
            user,
        }),
    ))
}

/// POST /api/auth/login - Log in with email and password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Missing fields", body = ErrorBody),
        (status = 401, description = "Wrong password", body = ErrorBody),
        (status = 404, description = "Unknown email", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let store = CredentialStore::new(state.db.pool(), &state.accepted_domains);
    let (user, token) = store.login(&state.sessions, &req.email, &req.password).await?;

    Ok(Json(LoginResponse { token, user }))
}

/// PUT /api/auth/update/:id - Update profile fields and avatar.
///
/// Request body: multipart/form-data with optional "name", "email",
/// "password" and "avatar" parts.
#[utoipa::path(
    put,
    path = "/api/auth/update/{id}",
    tag = "auth",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body(content = String, content_type = "multipart/form-data", description = "Optional name, email, password and avatar file"),
    responses(
        (status = 200, description = "Profile updated", body = UpdateProfileResponse),
        (status = 400, description = "Invalid input or email already registered", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<UpdateProfileResponse>, ApiError> {
    let id = parse_id(&id, "user")?;
    let mut form = FormData::read(multipart, "avatar").await?;

    let mut patch = ProfilePatch {
        name: form.take("name"),
        email: form.take("email"),
        password: form.take("password"),
        avatar: None,
    };

    let mut previous_avatar = None;
    if let Some(file) = form.file.take() {
        previous_avatar = UserRepository::new(state.db.pool())
            .get_by_id(id)
            .await?
            .and_then(|user| user.avatar);
        patch.avatar = Some(state.storage.save_avatar(&file.content, &file.file_name)?);
    }

    let store = CredentialStore::new(state.db.pool(), &state.accepted_domains);
    let result = store.update_profile(id, &patch).await;

    // On failure the new file is orphaned; on success the replaced one is.
    let stale = if result.is_err() {
        patch.avatar.as_deref()
    } else {
        previous_avatar.as_deref()
    };
    if let Some(avatar) = stale {
        if let Err(e) = state.storage.delete(avatar) {
            tracing::warn!("Failed to remove stale avatar {}: {}", avatar, e);
        }
    }

    Ok(Json(UpdateProfileResponse {
        msg: "Profile updated successfully".to_string(),
        user: result?,
    }))
}
