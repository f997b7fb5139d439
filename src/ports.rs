pub mod platform;
pub mod server;
pub mod worker;

pub use platform::{NotificationPermissions, PlatformSubscription, WorkerContainer, WorkerRegistration};
pub use server::ServerApi;
pub use worker::{ActivatedNotification, NotificationSurface, WindowClient, WindowClients};
