// Application Layer - Use Cases and Business Logic

pub mod invoker;
pub mod prediction;
pub mod server_info;

// Re-exports
pub use invoker::Invoker;
pub use prediction::PredictionService;
pub use server_info::ServerInfo;
