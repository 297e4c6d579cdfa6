//! Interactive terminal client.

mod command;
mod config;
mod error;
mod player;
mod render;
mod runner;
mod signal;

pub use command::{CommandError, UserCommand, parse as parse_command};
pub use config::ClientConfig;
pub use error::ClientError;
pub use player::LocalPlayer;
pub use runner::{ClientApp, run_client};
