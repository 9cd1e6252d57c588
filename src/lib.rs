//! Primatech Books
//!
//! Session and navigation core of the book catalog app: configuration,
//! logging and the composition root that wires the workspace crates
//! together.
//!
//! # Example
//!
//! ```rust,no_run
//! use primatech_books::{logging, App, AppConfig};
//! use std::path::Path;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = AppConfig::load_from(Path::new("primatech.json"))?;
//! logging::init(&config.log_filter);
//!
//! let app = App::bootstrap(config).await?;
//! println!("showing {}", app.root());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod config;
pub mod logging;

pub use app::App;
pub use config::AppConfig;
