//! 内存实现：命令行运行和测试共用

use crate::infrastructure::{ContentPlayer, Modal, Router, Toaster, UserSession};
use crate::models::{CardEvent, QueryParams, RouteSnapshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 一次路由跳转
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub commands: Vec<String>,
    pub query_params: Option<QueryParams>,
}

/// 内存路由：保存当前快照并记录每次跳转
#[derive(Debug, Default)]
pub struct MemoryRouter {
    url: Mutex<String>,
    snapshot: Mutex<RouteSnapshot>,
    navigations: Mutex<Vec<Navigation>>,
}

impl MemoryRouter {
    pub fn new(url: impl Into<String>, snapshot: RouteSnapshot) -> Self {
        Self {
            url: Mutex::new(url.into()),
            snapshot: Mutex::new(snapshot),
            navigations: Mutex::new(Vec::new()),
        }
    }

    /// 模拟路由变化
    pub fn set_route(&self, url: impl Into<String>, snapshot: RouteSnapshot) {
        *lock(&self.url) = url.into();
        *lock(&self.snapshot) = snapshot;
    }

    pub fn navigations(&self) -> Vec<Navigation> {
        lock(&self.navigations).clone()
    }
}

impl Router for MemoryRouter {
    fn url(&self) -> String {
        lock(&self.url).clone()
    }

    fn snapshot(&self) -> RouteSnapshot {
        lock(&self.snapshot).clone()
    }

    fn navigate(&self, commands: &[String], query_params: Option<&QueryParams>) {
        info!("🧭 路由跳转: {:?}", commands);
        lock(&self.navigations).push(Navigation {
            commands: commands.to_vec(),
            query_params: query_params.cloned(),
        });
    }
}

/// 记录所有提示，供测试断言
#[derive(Debug, Default)]
pub struct RecordingToaster {
    messages: Mutex<Vec<String>>,
}

impl RecordingToaster {
    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }
}

impl Toaster for RecordingToaster {
    fn error(&self, message: &str) {
        lock(&self.messages).push(message.to_string());
    }
}

/// 把提示写进日志
#[derive(Debug, Default)]
pub struct LogToaster;

impl Toaster for LogToaster {
    fn error(&self, message: &str) {
        error!("❌ {}", message);
    }
}

/// 固定登录状态的会话
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSession {
    pub logged_in: bool,
}

impl UserSession for FixedSession {
    fn logged_in(&self) -> bool {
        self.logged_in
    }
}

/// 记录被播放的内容
#[derive(Debug, Default)]
pub struct RecordingPlayer {
    played: Mutex<Vec<CardEvent>>,
}

impl RecordingPlayer {
    pub fn played(&self) -> Vec<CardEvent> {
        lock(&self.played).clone()
    }
}

impl ContentPlayer for RecordingPlayer {
    fn play_content(&self, event: &CardEvent) {
        info!("▶️ 播放内容: {:?}", event.data.identifier());
        lock(&self.played).push(event.clone());
    }
}

/// 简单弹窗，关闭状态通过共享标记对外可见
#[derive(Debug, Clone)]
pub struct StubModal {
    open: bool,
    denied: Arc<AtomicBool>,
}

impl StubModal {
    pub fn open() -> Self {
        Self {
            open: true,
            denied: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn denied_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.denied)
    }
}

impl Modal for StubModal {
    fn is_open(&self) -> bool {
        self.open
    }

    fn deny(&mut self) {
        self.open = false;
        self.denied.store(true, Ordering::SeqCst);
    }
}
