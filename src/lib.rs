//! # Content Wizard
//!
//! 教育内容平台的两个界面控制器：出题向导与内容探索页
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 路由、提示、会话、播放器、弹窗等界面能力的 trait
//! - `Lifecycle` - 控制器销毁信号，销毁后到达的响应一律丢弃
//!
//! ### ② 客户端与能力层（Clients / Services）
//! - `clients/` - 分类体系、组织、内容搜索服务（`PlatformClient` 走 HTTP）
//! - `services/` - 分页、卡片映射、分面处理、资源名称过滤
//!
//! ### ③ 流程层（Workflow）
//! - `WizardController` - 四阶段出题向导
//! - `ExploreController` - 过滤条件协调、搜索、分页、曝光埋点
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator::App` - 命令行入口使用的组装与运行

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use orchestrator::App;
pub use workflow::{ExploreController, ExploreEvent, WizardController, WizardEvent};
