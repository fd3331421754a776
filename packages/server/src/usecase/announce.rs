//! 通知文の組み立てとブロードキャストの連鎖処理
//!
//! ブロードキャスト中に書き込みに失敗した接続はレジストリから外され、
//! 名前を持っていればその退出通知がさらにブロードキャストされる。
//! 退出通知でまた失敗した接続が出る可能性があるため、取り除かれる接続が
//! なくなるまで繰り返す。

use std::io::{Read, Write};

use linechat_shared::{Command, SocketId};

use crate::infrastructure::{ConnectionRegistry, PeerEntry, Retired};

/// 処理結果と、後始末が必要になった接続
#[derive(Debug)]
pub struct Handled<T, S> {
    pub outcome: T,
    /// レジストリから外れた接続（セッションが購読解除とクローズを行う）
    pub retired: Retired<S>,
}

impl<T, S> Handled<T, S> {
    pub fn new(outcome: T, retired: Retired<S>) -> Self {
        Self { outcome, retired }
    }
}

pub fn join_notice(name: &str) -> Command {
    Command::info(format!("{name} joined the chat."))
}

pub fn leave_notice(name: &str) -> Command {
    Command::info(format!("{name} left the chat."))
}

pub fn rename_notice(old: &str, new: &str) -> Command {
    Command::info(format!("{old} is now known as {new}."))
}

/// `command` をブロードキャストし、失敗して外れた接続の退出通知まで処理する
pub fn announce<S: Read + Write>(
    registry: &mut ConnectionRegistry<S>,
    command: &Command,
    except: Option<SocketId>,
) -> Retired<S> {
    let mut pending = registry.broadcast(command, except).pruned;
    let mut retired = Vec::new();

    while !pending.is_empty() {
        let notices: Vec<Command> = pending
            .iter()
            .filter_map(|entry| entry.connection.display_name().map(leave_notice))
            .collect();
        retired.append(&mut pending);
        for notice in &notices {
            pending.extend(registry.broadcast(notice, None).pruned);
        }
    }

    retired
}

/// レジストリから外した接続の退出を残りの接続へ通知する
///
/// 戻り値には `entry` 自身も含まれる
pub fn depart<S: Read + Write>(
    registry: &mut ConnectionRegistry<S>,
    entry: PeerEntry<S>,
) -> Retired<S> {
    let notice = entry.connection.display_name().map(leave_notice);
    let mut retired = vec![entry];
    if let Some(notice) = notice {
        retired.extend(announce(registry, &notice, None));
    }
    retired
}
