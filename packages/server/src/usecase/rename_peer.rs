//! UseCase: ニックネーム変更処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RenamePeerUseCase::execute() メソッド
//! - 初回の NICK は参加通知、2 回目以降は名前変更通知になること
//!
//! ### なぜこのテストが必要か
//! - NICK:bob → NICK:bobby で参加通知が 1 回、名前変更通知が 1 回だけ送られることを保証
//! - 不正な名前や同じ名前への変更で通知が送られないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：初回命名、名前変更
//! - 異常系：不正なニックネーム
//! - エッジケース：既定名 "Guest" の指定（予約済みのゲスト名を採用）

use std::io::{Read, Write};

use linechat_shared::{DEFAULT_NICKNAME, SocketId};

use crate::{
    domain::{Nickname, roster},
    infrastructure::ConnectionRegistry,
};

use super::{
    announce::{Handled, announce, join_notice, rename_notice},
    error::RenameError,
};

/// ニックネーム変更の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// 初めて名前が決まり、参加が通知された
    Joined { name: String },
    /// 名前が変わり、変更が通知された
    Renamed { old: String, new: String },
    /// 現在と同じ名前だった
    Unchanged,
}

/// ニックネーム変更のユースケース
pub struct RenamePeerUseCase<'a, S> {
    registry: &'a mut ConnectionRegistry<S>,
}

impl<'a, S: Read + Write> RenamePeerUseCase<'a, S> {
    /// 新しい RenamePeerUseCase を作成
    pub fn new(registry: &'a mut ConnectionRegistry<S>) -> Self {
        Self { registry }
    }

    /// ニックネーム変更を実行
    ///
    /// # Arguments
    ///
    /// * `id` - 名前を変更する接続
    /// * `requested` - 要求された名前。既定名 "Guest" は予約済みのゲスト名に置き換える
    ///
    /// # Returns
    ///
    /// * `Ok(Handled)` - 変更結果と、通知中に外れた接続
    /// * `Err(RenameError)` - 未登録の接続、または不正な名前
    pub fn execute(
        &mut self,
        id: SocketId,
        requested: String,
    ) -> Result<Handled<RenameOutcome, S>, RenameError> {
        let entry = self
            .registry
            .get_mut(id)
            .ok_or(RenameError::UnknownPeer(id))?;

        let nickname = if requested == DEFAULT_NICKNAME {
            entry.guest_name.clone()
        } else {
            Nickname::new(requested)?
        };
        if entry.connection.display_name() == Some(nickname.as_str()) {
            return Ok(Handled::new(RenameOutcome::Unchanged, Vec::new()));
        }

        let previous = entry.connection.set_display_name(nickname.as_str())?;
        let new = nickname.into_string();
        let (outcome, retired) = match previous {
            None => {
                tracing::info!("{} joined as {}", id, new);
                let retired = announce(self.registry, &join_notice(&new), Some(id));
                (RenameOutcome::Joined { name: new }, retired)
            }
            Some(old) => {
                tracing::info!("{} renamed {} -> {}", id, old, new);
                let retired = announce(self.registry, &rename_notice(&old, &new), None);
                (RenameOutcome::Renamed { old, new }, retired)
            }
        };
        tracing::debug!("Participants: {}", roster(&self.registry.participants()));
        Ok(Handled::new(outcome, retired))
    }
}
