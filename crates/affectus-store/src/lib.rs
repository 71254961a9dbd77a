//! Durable-store interface, session store and experience log.

pub mod experience_log;
pub mod persistence;
pub mod session;

pub use experience_log::ExperienceLog;
pub use persistence::{DurableStore, InMemoryDurableStore, StoreError};
pub use session::SessionStore;
