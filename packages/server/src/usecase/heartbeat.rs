//! UseCase: PING 応答処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - HeartbeatUseCase::execute() メソッド
//! - PONG が送信元にだけ返ること
//!
//! ### なぜこのテストが必要か
//! - 他の接続には何も送られないことを保証
//! - PONG の書き込み失敗が通常の切断として扱われることを確認

use std::io::{Read, Write};

use linechat_shared::{Command, SocketId};

use crate::infrastructure::ConnectionRegistry;

use super::{
    announce::{Handled, depart},
    error::HeartbeatError,
};

/// PING 応答のユースケース
pub struct HeartbeatUseCase<'a, S> {
    registry: &'a mut ConnectionRegistry<S>,
}

impl<'a, S: Read + Write> HeartbeatUseCase<'a, S> {
    /// 新しい HeartbeatUseCase を作成
    pub fn new(registry: &'a mut ConnectionRegistry<S>) -> Self {
        Self { registry }
    }

    /// PING 応答を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Handled)` - PONG を書き込めたかどうかと、外れた接続
    /// * `Err(HeartbeatError)` - 未登録の接続
    pub fn execute(&mut self, id: SocketId) -> Result<Handled<bool, S>, HeartbeatError> {
        let entry = self
            .registry
            .get_mut(id)
            .ok_or(HeartbeatError::UnknownPeer(id))?;

        match entry.connection.send(&Command::Pong) {
            Ok(()) => {
                tracing::trace!("PONG -> {}", id);
                Ok(Handled::new(true, Vec::new()))
            }
            Err(e) => {
                tracing::warn!("Dropping {} after failed PONG: {}", id, e);
                let retired = match self.registry.unregister(id) {
                    Some(entry) => depart(self.registry, entry),
                    None => Vec::new(),
                };
                Ok(Handled::new(false, retired))
            }
        }
    }
}
