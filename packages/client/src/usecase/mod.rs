//! UseCase 層
//!
//! セッションの振る舞いを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

mod chat;
pub mod echo_suppression;
pub mod effect;
mod episode_sync;
pub mod error;
mod room_session;
pub mod session;
mod video_sync;

#[cfg(test)]
pub(crate) mod test_support;

pub use echo_suppression::{DEFAULT_ECHO_WINDOW, EchoSuppressor};
pub use effect::SessionEffect;
pub use error::SessionError;
pub use session::WatchPartySession;
