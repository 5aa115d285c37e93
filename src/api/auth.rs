use rocket::{Route, State, serde::json::Json};
use serde::{Deserialize, Serialize};

use crate::{
    api::{
        AppState,
        guards::{BearerToken, Caller},
        response::{ApiError, ApiResult, Envelope},
    },
    auth::{AuthError, SignUp, SignedIn},
    models::user::Identity,
};

pub fn routes() -> Vec<Route> {
    routes![signup, login, logout, me]
}

#[derive(Debug, Default, Deserialize)]
pub struct SignUpRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoggedIn {
    #[serde(flatten)]
    pub signed_in: SignedIn,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct Me {
    pub user: Identity,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    pub role: Option<String>,
}

fn credentials(
    email: Option<String>,
    password: Option<String>,
) -> Result<(String, String), ApiError> {
    let email = email.map(|e| e.trim().to_string()).unwrap_or_default();
    let password = password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }
    Ok((email, password))
}

#[post("/signup", data = "<payload>")]
pub async fn signup(
    state: &State<AppState>,
    payload: Json<SignUpRequest>,
) -> ApiResult<SignedIn> {
    let SignUpRequest {
        email,
        password,
        name,
    } = payload.into_inner();
    let (email, password) = credentials(email, password)?;
    if !email.contains('@') {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    if password.chars().count() < state.min_password_length {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {} characters",
            state.min_password_length
        )));
    }

    let request = SignUp {
        email,
        password,
        name,
    };
    match state.auth.sign_up(request).await {
        Ok(signed_in) => {
            tracing::info!("[signup] Registered {}", signed_in.user.id);
            Ok(Envelope::created(signed_in).with_message("User registered successfully"))
        }
        Err(e @ AuthError::EmailTaken) => Err(ApiError::BadRequest {
            error: "Signup failed".to_string(),
            message: Some(e.to_string()),
        }),
        Err(e) => Err(ApiError::internal("Signup failed", e)),
    }
}

#[post("/login", data = "<payload>")]
pub async fn login(
    state: &State<AppState>,
    payload: Json<LoginRequest>,
) -> ApiResult<LoggedIn> {
    let LoginRequest { email, password } = payload.into_inner();
    let (email, password) = credentials(email, password)?;

    match state.auth.sign_in(&email, &password).await {
        Ok(signed_in) => {
            let is_admin = state.auth.is_admin(&signed_in.user).await;
            Ok(Envelope::ok(LoggedIn {
                signed_in,
                is_admin,
            })
            .with_message("Login successful"))
        }
        Err(AuthError::InvalidCredentials) => {
            Err(ApiError::Unauthorized("Login failed".to_string()))
        }
        Err(e) => Err(ApiError::internal("Login failed", e)),
    }
}

/// Unknown or already revoked tokens still log out successfully.
#[post("/logout")]
pub async fn logout(state: &State<AppState>, token: BearerToken) -> ApiResult<()> {
    state.auth.sign_out(&token.0).await?;
    Ok(Envelope::acknowledged("Logout successful"))
}

#[get("/me")]
pub async fn me(state: &State<AppState>, caller: Caller) -> ApiResult<Me> {
    let Caller(user) = caller;
    let role = match state.auth.admin_role(&user.id).await {
        Ok(role) => role,
        Err(e) => {
            tracing::warn!("[me] Admin lookup failed for {}: {:?}", user.id, e);
            None
        }
    };

    Ok(Envelope::ok(Me {
        user,
        is_admin: role.is_some(),
        role,
    }))
}
