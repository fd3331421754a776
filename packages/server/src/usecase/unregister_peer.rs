//! UseCase: 接続切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UnregisterPeerUseCase::execute() メソッド
//! - レジストリからの削除と退出通知
//!
//! ### なぜこのテストが必要か
//! - 名前付きの接続だけが退出を通知されることを保証
//! - 存在しない接続の削除が何もしないことを確認

use std::io::{Read, Write};

use linechat_shared::SocketId;

use crate::{
    domain::roster,
    infrastructure::{ConnectionRegistry, Retired},
};

use super::announce::depart;

/// 接続切断のユースケース
pub struct UnregisterPeerUseCase<'a, S> {
    registry: &'a mut ConnectionRegistry<S>,
}

impl<'a, S: Read + Write> UnregisterPeerUseCase<'a, S> {
    /// 新しい UnregisterPeerUseCase を作成
    pub fn new(registry: &'a mut ConnectionRegistry<S>) -> Self {
        Self { registry }
    }

    /// 接続切断を実行
    ///
    /// # Returns
    ///
    /// レジストリから外れた接続（対象自身と、退出通知で失敗した接続）。
    /// 未登録の ID なら空
    pub fn execute(&mut self, id: SocketId) -> Retired<S> {
        let Some(entry) = self.registry.unregister(id) else {
            return Vec::new();
        };
        match entry.connection.display_name() {
            Some(name) => tracing::info!("{} ({}) left", id, name),
            None => tracing::info!("{} left before choosing a name", id),
        }
        let retired = depart(self.registry, entry);
        tracing::debug!("Participants: {}", roster(&self.registry.participants()));
        retired
    }
}
