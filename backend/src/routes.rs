use std::sync::Arc;

use rocket::{State, get, post, put, delete, http::Status, serde::json::Json};
use shared::{EntityStore, HealthReport, Links, MemoryStore, Vote};
use tracing::{debug, instrument};

use crate::{
    config::Config,
    error::ApiError,
    metrics::Metrics,
    processor::VoteProcessor,
    remote::{HttpResourceService, ResourceService},
};

pub struct AppState {
    pub processor: VoteProcessor,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_collaborators(
            config,
            Arc::new(MemoryStore::<Vote>::new()),
            Arc::new(HttpResourceService::new()),
        )
    }

    pub fn with_collaborators(
        config: Config,
        store: Arc<dyn EntityStore<Vote>>,
        remote: Arc<dyn ResourceService>,
    ) -> Self {
        let metrics = Arc::new(Metrics::new());
        Self {
            processor: VoteProcessor::new(store, remote, config.internal, config.external, metrics.clone()),
            metrics,
        }
    }
}

fn ensure_matching_id(state: &AppState, path: u32, vote: &Vote) -> Result<(), ApiError> {
    if path != vote.vote_id {
        debug!("URL id {} does not match body id {}", path, vote.vote_id);
        state.metrics.record_failure();
        return Err(ApiError::IdMismatch { path, body: vote.vote_id });
    }
    Ok(())
}

#[instrument(skip(state))]
#[get("/votes")]
pub async fn list_votes(state: &State<AppState>) -> Result<Json<Vec<Links>>, ApiError> {
    Ok(Json(state.processor.list_votes()?))
}

#[instrument(skip(state))]
#[delete("/votes")]
pub async fn delete_all_votes(state: &State<AppState>) -> Result<Status, ApiError> {
    let deleted = state.processor.delete_all_votes().await?;
    debug!("Deleted {} votes", deleted);
    Ok(Status::Ok)
}

#[instrument(skip(state))]
#[get("/votes/health")]
pub async fn health(state: &State<AppState>) -> Json<HealthReport> {
    let report = state.metrics.report();
    state.metrics.record_success();
    Json(report)
}

#[instrument(skip(state), fields(vote_id = %id))]
#[get("/votes/<id>")]
pub async fn get_vote(state: &State<AppState>, id: u32) -> Result<Json<Links>, ApiError> {
    Ok(Json(state.processor.get_vote(id)?))
}

#[instrument(skip(state, vote), fields(vote_id = %id))]
#[post("/votes/<id>", format = "json", data = "<vote>")]
pub async fn add_vote(state: &State<AppState>, id: u32, vote: Json<Vote>) -> Result<Json<Links>, ApiError> {
    let vote = vote.into_inner();
    ensure_matching_id(state, id, &vote)?;
    Ok(Json(state.processor.add_vote(vote).await?))
}

#[instrument(skip(state, vote), fields(vote_id = %id))]
#[put("/votes/<id>", format = "json", data = "<vote>")]
pub async fn update_vote(state: &State<AppState>, id: u32, vote: Json<Vote>) -> Result<Json<Links>, ApiError> {
    let vote = vote.into_inner();
    ensure_matching_id(state, id, &vote)?;
    Ok(Json(state.processor.update_vote(vote).await?))
}

#[instrument(skip(state, vote), fields(vote_id = vote.vote_id))]
#[put("/votes", format = "json", data = "<vote>")]
pub async fn update_vote_from_body(state: &State<AppState>, vote: Json<Vote>) -> Result<Json<Links>, ApiError> {
    Ok(Json(state.processor.update_vote(vote.into_inner()).await?))
}

#[instrument(skip(state), fields(vote_id = %id))]
#[delete("/votes/<id>")]
pub async fn delete_vote(state: &State<AppState>, id: u32) -> Result<Status, ApiError> {
    state.processor.delete_vote(id).await?;
    Ok(Status::Ok)
}

#[rocket::options("/<_..>")]
pub async fn all_options() -> Status {
    Status::Ok
}
