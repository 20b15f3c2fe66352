mod config;
mod content;
mod db;
mod error;
mod page_views;
mod services;
mod session;
mod storage;

use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;

use crate::config::Config;
use crate::db::AppState;
use crate::session::SessionsState;
use crate::storage::MediaStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = Config::load();

    let state = AppState { db_path: config.db_path.clone() };
    let conn = db::open(&config.db_path)
        .map_err(|e| std::io::Error::other(format!("could not open database: {e}")))?;
    db::init_schema(&conn)
        .map_err(|e| std::io::Error::other(format!("could not initialise schema: {e}")))?;
    drop(conn);

    let media = MediaStore::new(&config.media_dir)?;
    let sessions = SessionsState::new();

    info!("portal listening on http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(2 * 1024 * 1024)) // 2 MB
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(media.clone()))
            .app_data(web::Data::new(sessions.clone()))
            .service(services::auth::configure_routes())
            .service(services::notices::configure_routes())
            .service(services::events::configure_routes())
            .service(services::publications::configure_routes())
            .service(services::projects::configure_routes())
            .service(services::tech_news::configure_routes())
            .service(services::gallery::configure_routes())
            .service(services::chairman::configure_routes())
            .service(services::directory::configure_routes())
            .service(services::linking::configure_routes())
            .service(services::stats::configure_routes())
            .service(services::stats::page_view_routes())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
