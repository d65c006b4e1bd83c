//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口 (模拟身份提供方)
//! - [`tokens`] - 代币余额和购买接口
//! - [`orders`] - 订单管理接口
//! - [`chat`] - 聊天解析接口
//! - [`checkin`] - 活动签到接口

pub mod auth;
pub mod chat;
pub mod checkin;
pub mod health;
pub mod orders;
pub mod tokens;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
