//! imageflow のイメージビルド・公開
//!
//! 外部の Docker CLI を呼び出してビルド計画を実行します。
//! 出力はバッファせず、その場でターミナルに流します。

pub mod error;
pub mod executor;
pub mod process;
pub mod tag;
pub mod toolchain;

pub use error::{BuildError, BuildResult};
pub use executor::{BuildExecutor, print_summary};
pub use tag::{LATEST_TAG, image_reference, split_image_tag, validate_tag};
pub use toolchain::{DockerCli, Toolchain};
