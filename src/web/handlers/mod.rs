pub mod recommendation_handlers;
pub mod system_handlers;

pub use recommendation_handlers::*;
pub use system_handlers::*;
