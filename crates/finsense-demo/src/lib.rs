pub mod cli;
pub mod config;
pub mod models;
pub mod server;
pub mod state;

pub use cli::*;
pub use config::*;
pub use models::*;
pub use server::*;
pub use state::*;
