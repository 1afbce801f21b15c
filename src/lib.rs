pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod view;

pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use view::ContactView;
