//! UseCase: チャット送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - FROM 行が送信者を含む全員に届くこと
//!
//! ### なぜこのテストが必要か
//! - 送信者自身にもエコーされることを保証
//! - 名前を決める前のチャットではゲスト名で参加が通知されることを確認
//! - 途中で書き込みに失敗した接続があってもエラーにならないことを確認

use std::io::{Read, Write};

use linechat_shared::{Command, SocketId};

use crate::{domain::MessageText, infrastructure::ConnectionRegistry};

use super::{
    announce::{Handled, announce, join_notice},
    error::SendMessageError,
};

/// チャット送信のユースケース
pub struct SendMessageUseCase<'a, S> {
    registry: &'a mut ConnectionRegistry<S>,
}

impl<'a, S: Read + Write> SendMessageUseCase<'a, S> {
    /// 新しい SendMessageUseCase を作成
    pub fn new(registry: &'a mut ConnectionRegistry<S>) -> Self {
        Self { registry }
    }

    /// チャット送信を実行
    ///
    /// # Arguments
    ///
    /// * `id` - 送信元の接続
    /// * `text` - チャット本文
    ///
    /// # Returns
    ///
    /// * `Ok(Handled)` - 配信に使った名前と、配信中に外れた接続
    /// * `Err(SendMessageError)` - 未登録の接続、または空のメッセージ
    pub fn execute(
        &mut self,
        id: SocketId,
        text: String,
    ) -> Result<Handled<String, S>, SendMessageError> {
        let text = MessageText::new(text)?;
        let entry = self
            .registry
            .get_mut(id)
            .ok_or(SendMessageError::UnknownPeer(id))?;

        let mut retired = Vec::new();
        let nickname = match entry.connection.display_name().map(str::to_string) {
            Some(name) => name,
            None => {
                // 名前を決める前のチャットは予約済みのゲスト名で参加させる
                let guest = entry.guest_name.as_str().to_string();
                entry.connection.set_display_name(guest.as_str())?;
                tracing::info!("{} joined as {} by chatting", id, guest);
                retired.extend(announce(self.registry, &join_notice(&guest), Some(id)));
                guest
            }
        };

        tracing::debug!("{} ({}): {}", id, nickname, text.as_str());
        let relay = Command::IncomingChat {
            nickname: nickname.clone(),
            text: text.into_string(),
        };
        retired.extend(announce(self.registry, &relay, None));
        Ok(Handled::new(nickname, retired))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Timestamp, ValueObjectError},
        test_support::{failing_stream, open_connection, recording_stream, sent_lines},
    };

    #[test]
    fn test_send_message_echoes_to_everyone() {
        // テスト項目: A からのチャットは A と B の両方に届く
        // given (前提条件):
        let mut registry = ConnectionRegistry::new(8);
        let (a, a_sink) = recording_stream();
        let (b, b_sink) = recording_stream();
        registry.register(open_connection(1, a), Timestamp::new(0)).unwrap();
        registry.register(open_connection(2, b), Timestamp::new(0)).unwrap();
        registry
            .get_mut(SocketId::new(1))
            .unwrap()
            .connection
            .set_display_name("alice")
            .unwrap();

        // when (操作):
        let result = SendMessageUseCase::new(&mut registry)
            .execute(SocketId::new(1), "hello:world".to_string())
            .unwrap();

        // then (期待する結果):
        assert_eq!(result.outcome, "alice");
        assert!(result.retired.is_empty());
        assert_eq!(sent_lines(&a_sink), vec!["FROM:alice:hello:world"]);
        assert_eq!(sent_lines(&b_sink), vec!["FROM:alice:hello:world"]);
    }

    #[test]
    fn test_send_message_before_naming_joins_as_guest() {
        // テスト項目: 名前を決める前のチャットはゲスト名での参加通知の後に配信される
        // given (前提条件):
        let mut registry = ConnectionRegistry::new(8);
        let (a, a_sink) = recording_stream();
        let (b, b_sink) = recording_stream();
        registry.register(open_connection(1, a), Timestamp::new(0)).unwrap();
        registry.register(open_connection(2, b), Timestamp::new(0)).unwrap();

        // when (操作):
        SendMessageUseCase::new(&mut registry)
            .execute(SocketId::new(2), "hi".to_string())
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            sent_lines(&a_sink),
            vec!["INFO:Guest2 joined the chat.", "FROM:Guest2:hi"]
        );
        assert_eq!(sent_lines(&b_sink), vec!["FROM:Guest2:hi"]);
        assert!(registry.get(SocketId::new(2)).unwrap().is_named());
    }

    #[test]
    fn test_send_message_prunes_failing_peer() {
        // テスト項目: 配信中に書き込みに失敗した接続は取り除かれ、エラーにはならない
        // given (前提条件):
        let mut registry = ConnectionRegistry::new(8);
        let (a, a_sink) = recording_stream();
        registry.register(open_connection(1, a), Timestamp::new(0)).unwrap();
        registry.register(open_connection(2, failing_stream()), Timestamp::new(0)).unwrap();
        registry
            .get_mut(SocketId::new(1))
            .unwrap()
            .connection
            .set_display_name("alice")
            .unwrap();

        // when (操作):
        let result =
            SendMessageUseCase::new(&mut registry).execute(SocketId::new(1), "hi".to_string());

        // then (期待する結果):
        let handled = result.unwrap();
        assert_eq!(handled.retired.len(), 1);
        assert!(!registry.contains(SocketId::new(2)));
        assert_eq!(sent_lines(&a_sink), vec!["FROM:alice:hi"]);
    }

    #[test]
    fn test_send_empty_message_is_rejected() {
        // テスト項目: 空のメッセージは配信されない
        // given (前提条件):
        let mut registry = ConnectionRegistry::new(8);
        let (a, a_sink) = recording_stream();
        registry.register(open_connection(1, a), Timestamp::new(0)).unwrap();

        // when (操作):
        let result =
            SendMessageUseCase::new(&mut registry).execute(SocketId::new(1), String::new());

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(SendMessageError::InvalidMessage(ValueObjectError::MessageTextEmpty))
        ));
        assert!(sent_lines(&a_sink).is_empty());
        assert!(!registry.get(SocketId::new(1)).unwrap().is_named());
    }
}
