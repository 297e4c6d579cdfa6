//! UI 層のエラー定義

use thiserror::Error;

use crate::{
    domain::{ConnectionError, ValueObjectError},
    usecase::SessionError,
};

use super::command::CommandError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("Invalid input: {0}")]
    Input(#[from] ValueObjectError),

    #[error("Terminal error: {0}")]
    Terminal(#[from] rustyline::error::ReadlineError),
}
