pub mod processor;
pub mod routes;
pub mod remote;
pub mod cors;
pub mod error;
pub mod config;
pub mod metrics;
pub mod catchers;
pub use shared::{models::*, error::*, links::*, store::*};

use rocket::{Build, Rocket, catchers, routes};

use crate::{
    catchers::{bad_request, internal_error, not_found, unprocessable_entity},
    cors::CORS,
    routes::{
        add_vote, all_options, delete_all_votes, delete_vote, get_vote, health, list_votes, update_vote,
        update_vote_from_body, AppState,
    },
};

pub fn build_rocket(app_state: AppState) -> Rocket<Build> {
    rocket::build()
        .attach(CORS)
        .manage(app_state)
        .mount(
            "/",
            routes![
                list_votes,
                delete_all_votes,
                health,
                get_vote,
                add_vote,
                update_vote,
                update_vote_from_body,
                delete_vote,
                all_options
            ],
        )
        .register(
            "/",
            catchers![
                bad_request,
                not_found,
                unprocessable_entity,
                internal_error
            ],
        )
}
