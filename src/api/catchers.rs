use rocket::{Catcher, Request, http::Status};

use crate::api::{guards::GuardFailure, response::Envelope};

pub fn catchers() -> Vec<Catcher> {
    catchers![envelope]
}

fn default_error(status: Status) -> String {
    match status.code {
        400 | 422 => "Invalid request body".to_string(),
        401 => "Authentication required".to_string(),
        403 => "Admin access required".to_string(),
        404 => "Not found".to_string(),
        _ => status.reason().unwrap_or("Request failed").to_string(),
    }
}

/// Answers unmatched routes, body parse failures and guard failures with the
/// JSON envelope.
#[catch(default)]
pub fn envelope(status: Status, request: &Request<'_>) -> Envelope<()> {
    let error = request
        .local_cache(GuardFailure::default)
        .0
        .clone()
        .unwrap_or_else(|| default_error(status));
    Envelope::failure(status, error)
}
