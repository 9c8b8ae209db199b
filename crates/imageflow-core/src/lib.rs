//! imageflow core
//!
//! 上流パッケージのリリース一覧から、まだイメージが公開されていない
//! バージョンのビルドリストを算出するエンジンです。
//!
//! 外部とのやり取りはすべて [`provider`] のトレイト越しに行います。
//!
//! - [`ReleaseLookup`]: リリース一覧の取得
//! - [`VersionScheme`]: バージョンの妥当性・順序・安定版判定
//! - [`TagExistence`]: レジストリ上のタグの存在確認

pub mod cache;
pub mod error;
pub mod model;
pub mod provider;
pub mod resolver;
pub mod versioning;

pub use cache::LookupCache;
pub use error::{CoreError, Result};
pub use model::*;
pub use provider::{ReleaseLookup, TagExistence, VersionScheme};
pub use resolver::{BuildListResolver, strip_v_prefix};
