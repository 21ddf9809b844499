// Public API - what other modules can use
pub use catalog::{InMemoryRoomCatalog, RoomCatalog};
pub use coordinator::{
    BroadcastCoordinator, CoordinatorError, JoinOutcome, LeaveOutcome, MessageOutcome,
};
pub use handlers::{create_room, list_rooms};

// Internal modules
pub mod catalog;
mod coordinator;
mod handlers;
pub mod history;
pub mod membership;
pub mod models;
pub mod registry;
mod store;
pub mod types;
