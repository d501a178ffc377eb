use std::sync::Arc;

use tracing::{error, info, warn};

use droply::config::ObjectStoreProvider;
use droply::web::WebServer;
use droply::{Config, Database, ImageKitClient, MemoryObjectStore, ObjectStore};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = droply::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        droply::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = run(config).await {
        error!("Droply stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> droply::Result<()> {
    config.validate()?;

    info!("Droply - personal file storage");

    let db = Database::open(&config.database.path).await?;

    let object_store: Arc<dyn ObjectStore> = match config.object_store.provider {
        ObjectStoreProvider::ImageKit => {
            info!("Using ImageKit at {}", config.object_store.api_base);
            Arc::new(ImageKitClient::new(&config.object_store)?)
        }
        ObjectStoreProvider::Memory => {
            warn!("Using the in-memory object store; remote objects are not persisted");
            Arc::new(MemoryObjectStore::new())
        }
    };

    let server = WebServer::new(&config.web, Arc::new(db), object_store, &config.deletion)?;
    info!("Server configured on {}", server.addr());

    server.run().await
}
