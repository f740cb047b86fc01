//! 编排层（Orchestration Layer）
//!
//! 组装客户端与控制器，驱动一次完整的运行：
//!
//! ```text
//! App
//!  ├─ ExploreController (组织解析 → 分面 → 搜索 → 卡片)
//!  └─ WizardController  (项目详情 → 知识点)
//!       ↓
//! clients (平台 HTTP API) / infrastructure (路由、提示、会话)
//! ```

pub mod app;

pub use app::App;
