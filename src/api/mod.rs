//! HTTP surface: `/api/resources`, `/api/auth` and `/health`.
//!
//! Handlers only see the [`ResourceStore`] and [`AuthGate`] trait objects held
//! in [`AppState`], so the same Rocket instance runs against PostgreSQL or the
//! in-memory backends.

use rocket::{Build, Rocket, http::Method};
use rocket_cors::{AllowedHeaders, AllowedOrigins, Cors, CorsOptions};

use crate::{auth::AuthGate, store::ResourceStore};

pub mod auth;
pub mod catchers;
pub mod guards;
pub mod resources;
pub mod response;
pub mod validation;


use response::Envelope;

pub struct AppState {
    pub resources: Box<dyn ResourceStore>,
    pub auth: Box<dyn AuthGate>,
    pub min_password_length: usize,
}

impl AppState {
    pub fn new(
        resources: Box<dyn ResourceStore>,
        auth: Box<dyn AuthGate>,
        min_password_length: usize,
    ) -> Self {
        Self {
            resources,
            auth,
            min_password_length,
        }
    }
}

#[get("/health")]
pub fn health() -> Envelope<()> {
    Envelope::acknowledged("OK")
}

pub fn rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount("/", routes![health])
        .mount("/api/auth", auth::routes())
        .mount("/api/resources", resources::routes())
        .register("/", catchers::catchers())
}

pub fn cors(allowed_origins: &[String]) -> Result<Cors, rocket_cors::Error> {
    CorsOptions {
        allowed_origins: AllowedOrigins::some_exact(allowed_origins),
        allowed_methods: [
            Method::Get,
            Method::Post,
            Method::Patch,
            Method::Put,
            Method::Delete,
            Method::Options,
        ]
        .into_iter()
        .map(From::from)
        .collect(),
        allowed_headers: AllowedHeaders::some(&["Authorization", "Content-Type"]),
        allow_credentials: true,
        ..Default::default()
    }
    .to_cors()
}
