use async_trait::async_trait;
use std::collections::BTreeSet;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::shared::AppError;

/// Named rooms advertised to clients
///
/// Presence does not depend on the catalog: clients may join rooms that
/// were never created here.
#[async_trait]
pub trait RoomCatalog {
    async fn create_room(&self, name: &str) -> Result<(), AppError>;
    async fn list_rooms(&self) -> Result<Vec<String>, AppError>;
    async fn contains(&self, name: &str) -> Result<bool, AppError>;
}

/// In-memory implementation of RoomCatalog
pub struct InMemoryRoomCatalog {
    rooms: RwLock<BTreeSet<String>>,
}

impl Default for InMemoryRoomCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomCatalog {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(BTreeSet::new()),
        }
    }

    /// Catalog pre-populated with the given room names; blank names are skipped
    pub fn seeded<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rooms = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        Self {
            rooms: RwLock::new(rooms),
        }
    }
}

#[async_trait]
impl RoomCatalog for InMemoryRoomCatalog {
    #[instrument(skip(self))]
    async fn create_room(&self, name: &str) -> Result<(), AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Room name must not be empty".to_string()));
        }

        let mut rooms = self.rooms.write().await;
        if !rooms.insert(name.to_string()) {
            warn!(room_id = %name, "Room already exists");
            return Err(AppError::Conflict(format!("Room '{}' already exists", name)));
        }

        info!(room_id = %name, total_rooms = rooms.len(), "Room added to catalog");
        Ok(())
    }

    async fn list_rooms(&self) -> Result<Vec<String>, AppError> {
        let rooms = self.rooms.read().await;
        debug!(room_count = rooms.len(), "Listing catalog rooms");
        Ok(rooms.iter().cloned().collect())
    }

    async fn contains(&self, name: &str) -> Result<bool, AppError> {
        Ok(self.rooms.read().await.contains(name.trim()))
    }
}
