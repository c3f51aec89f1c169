use votes_api::{build_rocket, config::Config, routes::AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[rocket::launch]
fn rocket() -> _ {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚀 Starting votes API");
    let config = Config::load();
    build_rocket(AppState::new(config))
}
