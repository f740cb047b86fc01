//! 基础设施层
//!
//! 界面侧能力（路由、提示、会话、播放器、弹窗）只以 trait 暴露，
//! 外加控制器共用的生命周期信号

pub mod lifecycle;
pub mod memory;

pub use lifecycle::{Lifecycle, LifecycleToken};
pub use memory::{
    FixedSession, LogToaster, MemoryRouter, Navigation, RecordingPlayer, RecordingToaster,
    StubModal,
};

use crate::models::{CardEvent, QueryParams, RouteSnapshot};

/// 路由服务
pub trait Router: Send + Sync {
    /// 当前 URL
    fn url(&self) -> String;
    /// 当前路由快照
    fn snapshot(&self) -> RouteSnapshot;
    /// 携带 query 参数跳转，`commands` 为路径片段
    fn navigate(&self, commands: &[String], query_params: Option<&QueryParams>);
}

/// 提示服务
pub trait Toaster: Send + Sync {
    fn error(&self, message: &str);
}

/// 会话服务
pub trait UserSession: Send + Sync {
    fn logged_in(&self) -> bool;
}

/// 内容播放器
pub trait ContentPlayer: Send + Sync {
    fn play_content(&self, event: &CardEvent);
}

/// 弹窗
pub trait Modal: Send {
    fn is_open(&self) -> bool;
    /// 以"拒绝"方式关闭
    fn deny(&mut self);
}
