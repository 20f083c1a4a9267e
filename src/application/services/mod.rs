pub mod command_service;
pub mod progress;
pub mod session;
pub mod sync_service;


pub use command_service::PartyParrots;
pub use session::SessionManager;
pub use sync_service::SyncService;
