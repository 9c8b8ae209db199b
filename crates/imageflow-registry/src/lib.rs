//! imageflow Registry
//!
//! コンテナレジストリ上にタグが公開済みかを確認します。
//!
//! - Docker Hub: Hub API (`/v2/repositories/{repo}/tags/{tag}`)
//! - その他: Registry v2 API のマニフェスト HEAD（Bearer トークン交換に対応）

pub mod auth;
pub mod checker;
pub mod error;
pub mod reference;

pub use auth::{Credentials, DockerConfigAuth};
pub use checker::{DEFAULT_HUB_API, RegistryTagChecker, TagCheckMode};
pub use error::{RegistryError, Result};
pub use reference::ImageRef;
