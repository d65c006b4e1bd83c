//! Spontan Server - 饮品下单与活动签到后端
//!
//! # 架构概述
//!
//! 本模块是 Spontan 后端的主入口，提供以下核心功能：
//!
//! - **代币账本** (`tokens`): 每用户代币余额，借记/贷记
//! - **订单账本** (`orders`): 订单状态机、取货码签发与核验
//! - **聊天解析** (`chat`): 关键词提取饮品和选项
//! - **身份模拟** (`auth`): OTP + 会话 (外部身份提供方的本地模拟)
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! spontan-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── auth/          # OTP、会话 (模拟)
//! ├── chat/          # 饮品意图解析
//! ├── events/        # 活动登记 (模拟)
//! ├── orders/        # 订单账本
//! ├── tokens/        # 代币账本
//! ├── store/         # redb 存储层
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod chat;
pub mod core;
pub mod events;
pub mod orders;
pub mod store;
pub mod tokens;
pub mod utils;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use orders::OrderLedger;
pub use store::LedgerStorage;
pub use tokens::TokenLedger;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   _____                  __
  / ___/____  ____  ____ / /_____ _____
  \__ \/ __ \/ __ \/ __ \/ __/ __ `/ __ \
 ___/ / /_/ / /_/ / / / / /_/ /_/ / / / /
/____/ .___/\____/_/ /_/\__/\__,_/_/ /_/
    /_/
    "#
    );
}
