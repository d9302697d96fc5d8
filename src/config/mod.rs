//! 配置管理
//!
//! 静态配置来自配置文件与环境变量，运行期可修改的配置见 `services::system::DynamicConfig`。

mod r#impl;
mod structs;

pub use structs::*;
