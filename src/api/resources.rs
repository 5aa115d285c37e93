use rocket::{Route, State, serde::json::Json};

use crate::{
    api::{
        AppState,
        guards::{AdminCaller, Caller},
        response::{ApiError, ApiResult, Envelope},
        validation::SubmitResourceRequest,
    },
    models::resource::{Category, Resource, ResourceStatus},
    store::{ResourceFilter, StoreError},
};

pub fn routes() -> Vec<Route> {
    routes![
        list_approved,
        list_pending,
        get_resource,
        submit,
        approve,
        reject
    ]
}

fn query_value(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[get("/?<category>&<pincode>&<search>")]
pub async fn list_approved(
    state: &State<AppState>,
    category: Option<String>,
    pincode: Option<String>,
    search: Option<String>,
) -> ApiResult<Vec<Resource>> {
    let filter = ResourceFilter {
        status: Some(ResourceStatus::Approved),
        category: query_value(category).filter(|c| c != Category::ANY),
        pincode: query_value(pincode),
        search: query_value(search),
    };

    let resources = state
        .resources
        .list(&filter)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch resources", e))?;
    Ok(Envelope::list(resources))
}

#[get("/pending")]
pub async fn list_pending(
    state: &State<AppState>,
    admin: AdminCaller,
) -> ApiResult<Vec<Resource>> {
    let resources = state
        .resources
        .list(&ResourceFilter::with_status(ResourceStatus::Pending))
        .await
        .map_err(|e| ApiError::internal("Failed to fetch pending resources", e))?;
    tracing::debug!(
        "[list_pending] {} pending resource(s) for {}",
        resources.len(),
        admin.0.id
    );
    Ok(Envelope::list(resources))
}

/// Any status is returned; the id itself is the capability.
#[get("/<id>")]
pub async fn get_resource(state: &State<AppState>, id: &str) -> ApiResult<Resource> {
    let resource = state.resources.get(id).await?;
    Ok(Envelope::ok(resource))
}

#[post("/", data = "<payload>")]
pub async fn submit(
    state: &State<AppState>,
    caller: Caller,
    payload: Json<SubmitResourceRequest>,
) -> ApiResult<Resource> {
    let Caller(identity) = caller;
    let resource = payload
        .into_inner()
        .validate(&identity)
        .map_err(ApiError::Validation)?;

    let resource = state
        .resources
        .insert(resource)
        .await
        .map_err(|e| ApiError::internal("Failed to submit resource", e))?;
    tracing::info!(
        "[submit] {} submitted resource {}",
        identity.id,
        resource.id
    );
    Ok(Envelope::created(resource)
        .with_message("Resource submitted successfully. It will be reviewed before publishing."))
}

async fn moderate(
    state: &AppState,
    admin: &AdminCaller,
    id: &str,
    to: ResourceStatus,
) -> Result<Resource, ApiError> {
    match state
        .resources
        .transition(id, ResourceStatus::Pending, to)
        .await
    {
        Ok(resource) => {
            tracing::info!(
                "[moderate] {} moved resource {} to {}",
                admin.0.id,
                id,
                to.as_str()
            );
            Ok(resource)
        }
        Err(StoreError::NotFound) => Err(ApiError::NotFound(
            "Pending resource not found".to_string(),
        )),
        Err(e) => Err(ApiError::internal("Failed to update resource", e)),
    }
}

#[patch("/<id>/approve")]
pub async fn approve(
    state: &State<AppState>,
    admin: AdminCaller,
    id: &str,
) -> ApiResult<Resource> {
    let resource = moderate(state, &admin, id, ResourceStatus::Approved).await?;
    Ok(Envelope::ok(resource).with_message("Resource approved successfully"))
}

#[patch("/<id>/reject")]
pub async fn reject(
    state: &State<AppState>,
    admin: AdminCaller,
    id: &str,
) -> ApiResult<Resource> {
    let resource = moderate(state, &admin, id, ResourceStatus::Rejected).await?;
    Ok(Envelope::ok(resource).with_message("Resource rejected"))
}
