use std::sync::Arc;

use crate::auth::AuthService;
use crate::core::Config;
use crate::events::EventRegistry;
use crate::orders::OrderLedger;
use crate::store::LedgerStorage;
use crate::tokens::TokenLedger;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 持有所有服务的共享引用，使用 Arc 实现浅拷贝。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | storage | LedgerStorage | 嵌入式数据库 (redb) |
/// | auth | Arc\<AuthService\> | 身份模拟 (OTP / 会话) |
/// | tokens | Arc\<TokenLedger\> | 代币账本 |
/// | orders | Arc\<OrderLedger\> | 订单账本 |
/// | events | Arc\<EventRegistry\> | 活动登记 (模拟) |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库
    pub storage: LedgerStorage,
    /// 身份服务
    pub auth: Arc<AuthService>,
    /// 代币账本
    pub tokens: Arc<TokenLedger>,
    /// 订单账本
    pub orders: Arc<OrderLedger>,
    /// 活动登记
    pub events: Arc<EventRegistry>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构 (确保目录存在)
    /// 2. 数据库 (work_dir/database/spontan.db)
    /// 3. 各服务 (Auth, TokenLedger, OrderLedger, EventRegistry)
    /// 4. 种子数据 (barman 演示账号)
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_dir().join("spontan.db");
        let storage = LedgerStorage::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Database opened");

        Self::with_storage(config.clone(), storage)
    }

    /// 基于已有存储构建状态 (测试注入内存后端)
    pub fn with_storage(config: Config, storage: LedgerStorage) -> anyhow::Result<Self> {
        let auth = Arc::new(AuthService::new(
            storage.clone(),
            (config.otp_ttl_secs * 1000) as i64,
            (config.session_ttl_secs * 1000) as i64,
        ));
        auth.seed_barman()?;

        let tokens = Arc::new(TokenLedger::new(storage.clone()));
        let orders = Arc::new(OrderLedger::new(storage.clone(), tokens.clone()));
        let events = Arc::new(EventRegistry);

        Ok(Self {
            config,
            storage,
            auth,
            tokens,
            orders,
            events,
        })
    }
}
