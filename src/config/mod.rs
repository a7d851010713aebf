//! 配置管理
//!
//! 依次加载 `config.toml`、`config.<APP_ENV>.toml`、`PORTAL__*` 环境变量，
//! 最后应用少量常用环境变量的显式覆盖。

mod r#impl;
mod structs;

pub use structs::*;
