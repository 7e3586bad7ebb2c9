mod engine;
mod handlers;
mod model;
mod routes;

pub use engine::Engine;
pub use handlers::analyze;
pub use model::*;
pub use routes::router;
