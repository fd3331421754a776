//! UseCase 層
//!
//! プロトコルの振る舞いを実装するレイヤー。
//! UI 層（リアクターのハンドラ）から呼び出され、Domain 層とレジストリを操作します。

pub mod announce;
pub mod error;
pub mod heartbeat;
pub mod register_peer;
pub mod rename_peer;
pub mod send_message;
pub mod unregister_peer;

pub use announce::Handled;
pub use error::{ConnectError, HeartbeatError, RenameError, SendMessageError};
pub use heartbeat::HeartbeatUseCase;
pub use register_peer::RegisterPeerUseCase;
pub use rename_peer::{RenameOutcome, RenamePeerUseCase};
pub use send_message::SendMessageUseCase;
pub use unregister_peer::UnregisterPeerUseCase;
