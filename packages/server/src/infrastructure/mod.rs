//! Infrastructure layer
//!
//! ソケットを保持する接続レジストリとブロードキャストを実装するレイヤー。

pub mod registry;

pub use registry::{BroadcastReport, ConnectionRegistry, DEFAULT_CAPACITY, PeerEntry, Retired};
