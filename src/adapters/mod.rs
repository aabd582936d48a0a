// Adapters layer: concrete implementations of the domain ports.

pub mod command;
pub mod pm2;
pub mod prompt;

pub use command::TokioCommandRunner;
pub use pm2::Pm2Supervisor;
pub use prompt::DialoguerPrompter;
