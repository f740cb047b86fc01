//! 内容搜索的请求、响应与展示数据

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// 路由 query 参数，值可能是字符串、数组或数字
pub type QueryParams = BTreeMap<String, Value>;

/// 过滤条件：过滤键 → 单值或列表
pub type FilterSet = BTreeMap<String, Value>;

/// 处理后的分面展示数据：分面名 → 取值
pub type DisplayFacets = BTreeMap<String, Vec<FacetValue>>;

/// 发往搜索服务的请求
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub filters: FilterSet,
    pub limit: u32,
    pub page_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub soft_constraints: BTreeMap<String, u32>,
    pub facets: Vec<String>,
    pub params: BTreeMap<String, String>,
    #[serde(rename = "sort_by", skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<BTreeMap<String, String>>,
}

impl SearchRequest {
    /// 请求携带的排序方式（`sort_by` 中唯一一项的值）
    pub fn sort_type(&self) -> Option<&str> {
        self.sort_by.as_ref()?.values().next().map(String::as_str)
    }
}

/// 搜索服务响应
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    pub result: SearchResult,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub count: u64,
    pub content: Option<Vec<Value>>,
    pub facets: Option<Vec<Facet>>,
}

impl SearchResult {
    /// 有数量且有内容才算命中
    pub fn has_content(&self) -> bool {
        self.count > 0 && self.content.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// 服务端返回的分面
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Facet {
    pub name: String,
    pub values: Vec<FacetValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetValue {
    pub name: String,
    pub count: u64,
}

/// 过滤器组件上报的分面配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterFacet {
    pub code: String,
    pub range: Vec<RangeOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeOption {
    pub name: Option<String>,
    pub index: Option<i64>,
}

/// 内容卡片
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentCard {
    pub name: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub rating: String,
    pub content_type: Option<String>,
    pub meta_data: Map<String, Value>,
    /// 常量字段与动态字段
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentCard {
    /// `metaData.identifier`
    pub fn identifier(&self) -> Option<&str> {
        self.meta_data.get("identifier").and_then(Value::as_str)
    }

    /// `metaData.contentType`
    pub fn meta_content_type(&self) -> Option<&str> {
        self.meta_data.get("contentType").and_then(Value::as_str)
    }
}

/// 无结果提示
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoResultMessage {
    pub message: Option<String>,
    pub message_text: String,
}
