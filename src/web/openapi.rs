//! OpenAPI document for the HTTP API.

use utoipa::OpenApi;

use crate::db::PublicUser;
use crate::mail::Email;

use super::dto::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, RegisterResponse,
    SendEmailResponse, UpdateProfileResponse,
};
use super::error::{ErrorBody, ErrorCode};
use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(title = "Mailroom API", description = "Webmail backend: accounts, emails and real-time delivery"),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::update_profile,
        handlers::email::send_email,
        handlers::email::inbox,
        handlers::email::sent,
        handlers::email::snoozed,
        handlers::email::get_email,
        handlers::email::mark_read,
        handlers::email::delete_email,
    ),
    components(schemas(
        PublicUser,
        Email,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        UpdateProfileResponse,
        SendEmailResponse,
        MessageResponse,
        ErrorBody,
        ErrorCode,
    )),
    tags(
        (name = "auth", description = "Registration, login and profile"),
        (name = "emails", description = "Send, list, read and delete emails")
    )
)]
pub struct ApiDoc;
