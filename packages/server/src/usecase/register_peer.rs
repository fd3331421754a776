//! UseCase: 接続登録処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterPeerUseCase::execute() メソッド
//! - 受け付けた接続のレジストリ登録とゲスト名の予約
//!
//! ### なぜこのテストが必要か
//! - ゲスト名が受け付け順に Guest1, Guest2 と割り当てられることを保証
//! - 参加通知は名前が確定するまで送られないことを確認
//! - 満員時に接続へ通知して拒否することを確認

use std::io::{Read, Write};

use linechat_shared::{Command, Connection, time::now_millis};

use crate::{
    domain::{Nickname, Timestamp, roster},
    infrastructure::ConnectionRegistry,
};

use super::error::ConnectError;

/// 接続登録のユースケース
pub struct RegisterPeerUseCase<'a, S> {
    registry: &'a mut ConnectionRegistry<S>,
}

impl<'a, S: Read + Write> RegisterPeerUseCase<'a, S> {
    /// 新しい RegisterPeerUseCase を作成
    pub fn new(registry: &'a mut ConnectionRegistry<S>) -> Self {
        Self { registry }
    }

    /// 接続登録を実行
    ///
    /// # Arguments
    ///
    /// * `connection` - listener から受け付けた接続
    ///
    /// # Returns
    ///
    /// * `Ok(Nickname)` - 予約されたゲスト名
    /// * `Err(ConnectError)` - 登録失敗（接続は破棄される）
    pub fn execute(&mut self, mut connection: Connection<S>) -> Result<Nickname, ConnectError> {
        if self.registry.len() >= self.registry.capacity() {
            let capacity = self.registry.capacity();
            if let Err(e) = connection.send(&Command::info("Server is full.")) {
                tracing::debug!("Could not tell {} the server is full: {}", connection.id(), e);
            }
            connection.close();
            return Err(ConnectError::ServerFull { capacity });
        }

        let id = connection.id();
        let guest_name = self
            .registry
            .register(connection, Timestamp::new(now_millis()))?;
        tracing::info!("Accepted {} as {}", id, guest_name);
        tracing::debug!("Participants: {}", roster(&self.registry.participants()));
        Ok(guest_name)
    }
}
