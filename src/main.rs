use actix_cors::Cors;
use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

mod config;
mod controllers;
mod error;
mod notes;
mod sync;

use config::Config;
use notes::cache::NoteCache;
use notes::service::Journal;
use notes::store::NoteStore;
use sync::debounce::Debouncer;
use sync::git::GitRemote;
use sync::Syncer;

pub struct AppState {
    pub config: Config,
    pub journal: Arc<Journal>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    let git = Arc::new(GitRemote::new(config.notes_dir.clone()));
    if !git.repository_root_matches().await {
        log::error!(
            "notes root {} is missing or not the top of a git working tree",
            config.notes_dir.display()
        );
        std::process::exit(1);
    }

    let store = Arc::new(NoteStore::new(config.notes_dir.clone()));
    let cache = Arc::new(NoteCache::new(config.cache_budget_bytes));
    let write_lock = Arc::new(tokio::sync::Mutex::new(()));

    let syncer = Arc::new(Syncer::new(
        Arc::clone(&git),
        Arc::clone(&cache),
        Arc::clone(&store),
        Arc::clone(&write_lock),
    ));
    let debouncer = Arc::new(Debouncer::new(Duration::from_secs(config.debounce_secs)));
    let journal = Arc::new(Journal::new(
        store, cache, git, debouncer, syncer.clone(), write_lock,
    ));

    log::info!("building note cache from {}", config.notes_dir.display());
    journal
        .init_cache()
        .await
        .expect("Failed to build the note cache");

    // Periodic pull so foreign edits land even without local saves.
    let shutdown = CancellationToken::new();
    let reconciler = sync::reconciler::spawn(
        Duration::from_secs(config.sync_interval_secs),
        shutdown.clone(),
        {
            let syncer = Arc::clone(&syncer);
            move || {
                let syncer = Arc::clone(&syncer);
                async move { syncer.reconcile().await }
            }
        },
    );

    log::info!("serving on port {}", port);

    let notes_dir = config.notes_dir.clone();
    let static_dir = config.static_dir.clone();

    let result = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                config: config.clone(),
                journal: Arc::clone(&journal),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::notes::config)
            .configure(controllers::attachments::config)
            // Attachment redirects resolve against this mount.
            .service(Files::new("/db", notes_dir.clone()))
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await;

    shutdown.cancel();
    let _ = reconciler.await;
    result
}
