//! 外部服务客户端
//!
//! 控制器只依赖这里的 trait，真实实现走平台 HTTP API

pub mod platform_client;

pub use platform_client::PlatformClient;

use crate::error::AppResult;
use crate::models::{FrameworkResponse, SearchRequest, SearchResponse};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// 组织详情
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgDetails {
    pub hash_tag_id: String,
    pub slug: Option<String>,
    pub org_name: Option<String>,
}

/// 分类体系服务
#[async_trait]
pub trait TaxonomyClient: Send + Sync {
    /// 读取 framework，只关心第一条推送
    async fn read_framework(&self, framework: &str) -> AppResult<FrameworkResponse>;
}

/// 组织详情服务
#[async_trait]
pub trait OrgDetailsClient: Send + Sync {
    async fn get_org_details(&self, slug: &str) -> AppResult<OrgDetails>;
}

/// 内容搜索服务
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn content_search(&self, request: &SearchRequest) -> AppResult<SearchResponse>;
}
