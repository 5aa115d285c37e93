use rocket::{
    Request,
    outcome::try_outcome,
    request::{FromRequest, Outcome},
};

use crate::{
    api::{AppState, response::ApiError},
    models::user::Identity,
    utils::token::parse_bearer,
};

/// Set by a failing guard so the catcher can report why the request was
/// refused. The first failure recorded for a request wins.
#[derive(Debug, Clone, Default)]
pub struct GuardFailure(pub Option<String>);

fn fail<T>(request: &Request<'_>, error: ApiError) -> Outcome<T, ApiError> {
    let status = error.status();
    request.local_cache(|| GuardFailure(Some(error.to_string())));
    Outcome::Error((status, error))
}

fn state<'r>(request: &'r Request<'_>) -> Result<&'r AppState, ApiError> {
    request
        .rocket()
        .state::<AppState>()
        .ok_or_else(|| ApiError::internal("Server state missing", "AppState is not managed"))
}

/// The raw token from `Authorization: Bearer <token>`. Not verified.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BearerToken {
    type Error = ApiError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match request
            .headers()
            .get_one("Authorization")
            .and_then(parse_bearer)
        {
            Some(token) => Outcome::Success(BearerToken(token.to_string())),
            None => fail(
                request,
                ApiError::Unauthorized("No authorization token provided".to_string()),
            ),
        }
    }
}

/// A caller whose token the auth gate accepted.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Caller {
    type Error = ApiError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let BearerToken(token) = try_outcome!(request.guard::<BearerToken>().await);
        let state = match state(request) {
            Ok(state) => state,
            Err(e) => return fail(request, e),
        };

        match state.auth.verify_token(&token).await {
            Ok(identity) => Outcome::Success(Caller(identity)),
            Err(e) => {
                tracing::debug!("[Caller::from_request] Token rejected: {}", e);
                fail(
                    request,
                    ApiError::Unauthorized("Invalid or expired token".to_string()),
                )
            }
        }
    }
}

/// A verified caller on the admin allow-list.
#[derive(Debug, Clone)]
pub struct AdminCaller(pub Identity);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminCaller {
    type Error = ApiError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let Caller(identity) = try_outcome!(request.guard::<Caller>().await);
        let state = match state(request) {
            Ok(state) => state,
            Err(e) => return fail(request, e),
        };

        if state.auth.is_admin(&identity).await {
            Outcome::Success(AdminCaller(identity))
        } else {
            tracing::info!(
                "[AdminCaller::from_request] {} is not an admin",
                identity.id
            );
            fail(
                request,
                ApiError::Forbidden("Admin access required".to_string()),
            )
        }
    }
}
