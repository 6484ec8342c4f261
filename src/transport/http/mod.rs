pub mod router;
pub mod types;
pub mod handlers {
    pub mod books;
    pub mod common;
    pub mod health;
    pub mod reading;
    pub mod statistics;
}

pub use router::{cors_layer, create_router, ApiDoc};
pub use types::{AppState, API_PREFIX};
