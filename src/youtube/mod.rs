//! YouTube Live Chat 取り込み
//!
//! セッション解決 → ページ取得 → キュー送信 → 待機 のループを構成する。

pub mod client;
pub mod errors;
pub mod poller;
pub mod retry;
pub mod session;
pub mod state;
pub mod timer;
pub mod types;
