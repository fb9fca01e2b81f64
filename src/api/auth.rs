use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

// ============================================================================
// Operator Login
// ============================================================================
//
// A single configured account. The issued token is static and no route
// checks it.
//
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    pub role: String,
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login))
        .route("/logout", web::post().to(logout));
}

async fn login(auth: web::Data<AuthConfig>, body: web::Json<LoginRequest>) -> HttpResponse {
    let LoginRequest { username, password } = body.into_inner();
    let accepted = username.as_deref() == Some(auth.username.as_str())
        && password.as_deref() == Some(auth.password.as_str());

    if !accepted {
        tracing::warn!(username = ?username, "Login rejected");
        return HttpResponse::Unauthorized().json(AuthResponse {
            success: false,
            message: "Invalid credentials".to_string(),
            token: None,
            user: None,
        });
    }

    tracing::info!(username = %auth.username, "🔑 Operator logged in");
    HttpResponse::Ok().json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        token: Some(auth.token.clone()),
        user: Some(UserInfo {
            username: auth.username.clone(),
            role: "ADMIN".to_string(),
        }),
    })
}

async fn logout() -> HttpResponse {
    HttpResponse::Ok().json(AuthResponse {
        success: true,
        message: "Logout successful".to_string(),
        token: None,
        user: None,
    })
}
