//! Application state for the web layer.

use std::sync::Arc;

use crate::booking::BookingCoordinator;
use crate::directory::{CacheConfig, CachedDirectory};
use crate::resolver::{JourneyResolver, SearchConfig};
use crate::store::MemoryStore;

/// Directory used by the server: the store behind a name cache.
pub type ServerDirectory = CachedDirectory<MemoryStore>;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Journey search and timetable lookups
    pub resolver: Arc<JourneyResolver<ServerDirectory, MemoryStore>>,

    /// Ticket booking and management
    pub booking: Arc<BookingCoordinator<ServerDirectory, MemoryStore>>,
}

impl AppState {
    /// Create a new app state over one store.
    ///
    /// The resolver and the coordinator share a single name cache.
    pub fn new(store: MemoryStore, search: SearchConfig, cache: &CacheConfig) -> Self {
        let directory = CachedDirectory::new(store.clone(), cache);
        Self {
            resolver: Arc::new(JourneyResolver::new(directory.clone(), store.clone(), search)),
            booking: Arc::new(BookingCoordinator::new(directory, store)),
        }
    }
}
