//! UseCase 層のエラー定義

use linechat_shared::{ConnectionError, SocketId};
use thiserror::Error;

use crate::domain::{RegistryError, ValueObjectError};

/// 接続登録のエラー
#[derive(Debug, Error)]
pub enum ConnectError {
    /// サーバーが満員
    #[error("Server is full ({capacity} connections)")]
    ServerFull { capacity: usize },

    /// レジストリへの登録失敗
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// ニックネーム変更のエラー
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("Unknown peer {0}")]
    UnknownPeer(SocketId),

    /// 不正なニックネーム
    #[error("Invalid nickname: {0}")]
    InvalidNickname(#[from] ValueObjectError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

/// チャット送信のエラー
#[derive(Debug, Error)]
pub enum SendMessageError {
    #[error("Unknown peer {0}")]
    UnknownPeer(SocketId),

    /// 空のメッセージ
    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] ValueObjectError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

/// PING 応答のエラー
#[derive(Debug, Error)]
pub enum HeartbeatError {
    #[error("Unknown peer {0}")]
    UnknownPeer(SocketId),
}
