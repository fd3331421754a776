//! Transcript rendering.

use linechat_shared::time::format_clock;

use crate::session::SessionEvent;

/// Render an event as one transcript line with a local clock prefix.
pub fn render(event: &SessionEvent, millis: i64) -> String {
    let body = match event {
        SessionEvent::Connecting { target } => format!("* Connecting to {target}..."),
        SessionEvent::Connected => "* Connected.".to_string(),
        SessionEvent::Chat { nickname, text } => format!("{nickname}: {text}"),
        SessionEvent::Info(text) => format!("* {text}"),
        SessionEvent::HeartbeatAcknowledged => "* Server heartbeat acknowledged.".to_string(),
        SessionEvent::Disconnected { reason } => format!("* {reason}"),
    };
    stamp(&body, millis)
}

/// Render a local notice that did not come from the session.
pub fn notice(text: &str, millis: i64) -> String {
    stamp(&format!("* {text}"), millis)
}

fn stamp(body: &str, millis: i64) -> String {
    format!("[{}] {}", format_clock(millis), body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn without_clock(line: &str) -> &str {
        line.split_once("] ").map(|(_, body)| body).unwrap()
    }

    #[test]
    fn test_render_events() {
        // テスト項目: 各イベントが時刻付きの 1 行として表示される
        // given (前提条件):
        let chat = SessionEvent::Chat {
            nickname: "bob".to_string(),
            text: "hi".to_string(),
        };

        // when (操作):
        let line = render(&chat, 0);

        // then (期待する結果):
        assert!(line.starts_with('['));
        assert_eq!(without_clock(&line), "bob: hi");
        assert_eq!(
            without_clock(&render(&SessionEvent::Info("x joined the chat.".to_string()), 0)),
            "* x joined the chat."
        );
        assert_eq!(
            without_clock(&render(&SessionEvent::HeartbeatAcknowledged, 0)),
            "* Server heartbeat acknowledged."
        );
        assert_eq!(
            without_clock(&render(
                &SessionEvent::Disconnected {
                    reason: "Disconnected by user.".to_string()
                },
                0
            )),
            "* Disconnected by user."
        );
    }

    #[test]
    fn test_notice() {
        // テスト項目: ローカル通知も同じ形式で表示される
        // then (期待する結果):
        assert_eq!(without_clock(&notice("Not connected.", 0)), "* Not connected.");
    }
}
