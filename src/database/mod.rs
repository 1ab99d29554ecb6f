pub mod gateway;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;

pub use gateway::{PageRequest, ProjectGateway};
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryProjectGateway;
pub use postgres::PgProjectGateway;
