pub mod config;
pub mod errors;
pub mod logger;

pub use config::AppConfig;
pub use config::CargoEnv;
pub use config::EnvLoader;
pub use config::FaucetParams;
pub use errors::AppError;
pub use errors::AppResult;
pub use logger::Logger;
