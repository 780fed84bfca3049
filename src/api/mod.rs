pub mod docs;
pub mod forwarded;
pub mod handlers;
pub mod routes;
pub mod server;

pub use forwarded::ForwardedInfo;
pub use routes::{build_router, AppState};
pub use server::start_api_server;
