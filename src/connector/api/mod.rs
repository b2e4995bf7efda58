pub mod container;
pub mod controller;
pub mod cors;
pub mod error;
pub mod router;

pub use container::{Container, ContainerConfig};
pub use error::ApiError;
pub use router::{build_router, serve};
