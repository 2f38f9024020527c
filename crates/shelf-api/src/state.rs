//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use shelf_auth::JwtDecoder;
use shelf_core::config::AppConfig;
use shelf_database::StoreProvider;
use shelf_service::{
    CollectionService, ComicService, ListingService, StatsService, TreeService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Process start, for uptime reporting
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    /// Store backend (PostgreSQL or in-memory)
    pub store: Arc<dyn StoreProvider>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Collection CRUD service
    pub collection_service: Arc<CollectionService>,
    /// Comic CRUD service
    pub comic_service: Arc<ComicService>,
    /// Subtree delete, bulk marking and ingestion
    pub tree_service: Arc<TreeService>,
    /// Annotated listings, details and trees
    pub listing_service: Arc<ListingService>,
    /// Reading statistics
    pub stats_service: Arc<StatsService>,
}

impl AppState {
    /// Wires every service over `store`.
    pub fn new(config: AppConfig, store: Arc<dyn StoreProvider>) -> Self {
        let scope = config.tree.read_scope;
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        Self {
            collection_service: Arc::new(CollectionService::new(Arc::clone(&store))),
            comic_service: Arc::new(ComicService::new(Arc::clone(&store))),
            tree_service: Arc::new(TreeService::new(Arc::clone(&store), scope)),
            listing_service: Arc::new(ListingService::new(Arc::clone(&store), scope)),
            stats_service: Arc::new(StatsService::new(Arc::clone(&store))),
            config: Arc::new(config),
            started_at: Instant::now(),
            store,
            jwt_decoder,
        }
    }
}
