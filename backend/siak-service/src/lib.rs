pub mod app;
pub mod authorization;
pub mod config;
pub mod error;
pub mod grpc;
pub mod logging;
pub mod models;
pub mod upstream;

// Re-export commonly used types
pub use app::App;
pub use config::{Config, ConfigError};
pub use error::{FetchError, StartupError};
pub use grpc::MhsBiodataApiHandler;
pub use models::{AlumniVerdict, MhsBiodata};
pub use upstream::{BiodataSource, FetchOutcome, SiakApiClient, StaticSource};
