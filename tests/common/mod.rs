//! 测试用的内存客户端
#![allow(dead_code)]

use async_trait::async_trait;
use content_wizard::clients::{OrgDetails, OrgDetailsClient, SearchClient, TaxonomyClient};
use content_wizard::error::{AppError, AppResult};
use content_wizard::models::{
    Facet, FacetValue, FrameworkResponse, SearchRequest, SearchResponse, SearchResult,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// 可选的放行闸门：设置后请求会一直挂起，直到 `notify_one`
#[derive(Default, Clone)]
pub struct Gate(Option<Arc<Notify>>);

impl Gate {
    pub fn closed() -> (Self, Arc<Notify>) {
        let notify = Arc::new(Notify::new());
        (Self(Some(notify.clone())), notify)
    }

    async fn pass(&self) {
        if let Some(notify) = &self.0 {
            notify.notified().await;
        }
    }
}

pub enum Reply<T> {
    Ok(T),
    Fail,
}

fn failure(endpoint: &str) -> AppError {
    AppError::bad_response(endpoint, 500, Some("boom".to_string()))
}

// ========== 分类体系 ==========

pub struct FakeTaxonomy {
    reply: Mutex<Option<Reply<FrameworkResponse>>>,
    gate: Gate,
    pub calls: Mutex<Vec<String>>,
}

impl FakeTaxonomy {
    pub fn new(reply: Reply<FrameworkResponse>) -> Self {
        Self::gated(reply, Gate::default())
    }

    pub fn gated(reply: Reply<FrameworkResponse>, gate: Gate) -> Self {
        Self {
            reply: Mutex::new(Some(reply)),
            gate,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TaxonomyClient for FakeTaxonomy {
    async fn read_framework(&self, framework: &str) -> AppResult<FrameworkResponse> {
        self.calls.lock().unwrap().push(framework.to_string());
        self.gate.pass().await;
        match self.reply.lock().unwrap().take() {
            Some(Reply::Ok(response)) => Ok(response),
            Some(Reply::Fail) | None => Err(failure("framework")),
        }
    }
}

pub fn framework_with_topics(framework: &str, topics: &[&str]) -> FrameworkResponse {
    let terms: Vec<Value> = topics.iter().map(|t| json!({ "name": t })).collect();
    let mut frameworkdata = serde_json::Map::new();
    frameworkdata.insert(
        framework.to_string(),
        json!({ "categories": [
            { "code": "subject", "terms": [{ "name": "Math" }] },
            { "code": "topic", "terms": terms }
        ]}),
    );
    serde_json::from_value(json!({ "frameworkdata": frameworkdata })).unwrap()
}

// ========== 组织 ==========

pub struct FakeOrg {
    pub hash_tag_id: Option<String>,
}

#[async_trait]
impl OrgDetailsClient for FakeOrg {
    async fn get_org_details(&self, slug: &str) -> AppResult<OrgDetails> {
        match &self.hash_tag_id {
            Some(id) => Ok(OrgDetails {
                hash_tag_id: id.clone(),
                slug: Some(slug.to_string()),
                org_name: None,
            }),
            None => Err(failure("org")),
        }
    }
}

// ========== 搜索 ==========

#[derive(Default)]
pub struct FakeSearch {
    replies: Mutex<VecDeque<Reply<SearchResponse>>>,
    requests: Mutex<Vec<SearchRequest>>,
    gate: Gate,
}

impl FakeSearch {
    pub fn with_replies(replies: Vec<Reply<SearchResponse>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    pub fn gated(replies: Vec<Reply<SearchResponse>>, gate: Gate) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            gate,
        }
    }

    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchClient for FakeSearch {
    async fn content_search(&self, request: &SearchRequest) -> AppResult<SearchResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.gate.pass().await;
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Ok(response)) => Ok(response),
            Some(Reply::Fail) => Err(failure("search")),
            None => Ok(SearchResponse::default()),
        }
    }
}

/// 构造一页搜索结果
pub fn search_page(count: u64, ids: &[&str]) -> SearchResponse {
    let content = ids
        .iter()
        .map(|id| {
            json!({
                "identifier": id,
                "name": format!("Content {}", id),
                "contentType": "Resource",
                "mimeType": "application/pdf"
            })
        })
        .collect();
    SearchResponse {
        result: SearchResult {
            count,
            content: Some(content),
            facets: Some(vec![Facet {
                name: "board".to_string(),
                values: vec![FacetValue {
                    name: "CBSE".to_string(),
                    count,
                }],
            }]),
        },
    }
}
