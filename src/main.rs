mod config;
mod db;
mod duration;
mod errors;
mod models;
mod routes;
mod store;

use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use env_logger::Env;

use crate::config::Config;
use crate::db::Db;
use crate::store::SqlStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Init logger to show info by default, but can be overridden by RUST_LOG
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cfg = Config::from_args_env().expect("config init failed");

    let db = Db::connect_and_migrate(&cfg)
        .await
        .expect("database init failed");
    let store = SqlStore::new(db.clone(), &cfg.uploads_dir);

    log::info!("Starting server at {}", cfg.listen);

    let listen_addr = cfg.listen.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(Data::new(cfg.clone()))
            .app_data(Data::new(db.clone()))
            .app_data(Data::new(store.clone()))
            .configure(routes::configure::<SqlStore>)
    })
    .bind(listen_addr)?
    .run()
    .await
}
