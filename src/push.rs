pub mod key_cache;
pub mod key_codec;
pub mod manager;
pub mod permission;
pub mod registrar;
pub mod session;
#[cfg(not(target_arch = "wasm32"))]
pub mod vapid;

pub use key_cache::KeyCache;
pub use manager::SubscriptionManager;
pub use permission::PermissionGate;
pub use registrar::WorkerRegistrar;
pub use session::Session;
