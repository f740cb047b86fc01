/// 平台 API 客户端
///
/// 封装 framework / 组织 / 内容搜索三个接口
use crate::clients::{OrgDetails, OrgDetailsClient, SearchClient, TaxonomyClient};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{FrameworkData, FrameworkResponse, SearchRequest, SearchResponse};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::{json, Value};
use tracing::{debug, warn};

const FRAMEWORK_READ_PATH: &str = "/api/framework/v1/read";
const ORG_SEARCH_PATH: &str = "/api/org/v1/search";
const CONTENT_SEARCH_PATH: &str = "/api/content/v1/search";

/// 平台 API 客户端
#[derive(Clone)]
pub struct PlatformClient {
    http: Client,
    base_url: String,
    token: String,
}

impl PlatformClient {
    /// 创建新的平台客户端
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        if self.token.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.token)
        }
    }

    /// 发送请求，连接层错误带上接口地址
    async fn send(endpoint: &str, builder: RequestBuilder) -> AppResult<Response> {
        builder
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))
    }

    /// 非 2xx 状态转为 `BadResponse`
    async fn check_status(endpoint: &str, response: Response) -> AppResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            warn!("接口 {} 返回状态 {}", endpoint, status);
            return Err(AppError::bad_response(endpoint, status.as_u16(), body));
        }
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl TaxonomyClient for PlatformClient {
    async fn read_framework(&self, framework: &str) -> AppResult<FrameworkResponse> {
        let endpoint = self.url(&format!("{}/{}", FRAMEWORK_READ_PATH, framework));
        debug!("读取 framework: {}", endpoint);

        let response = Self::send(&endpoint, self.authorize(self.http.get(&endpoint))).await?;

        // framework 服务把失败放进 err 字段而不是报错
        match Self::check_status(&endpoint, response).await {
            Ok(body) => framework_response_from_api(framework, &body),
            Err(AppError::Api(e)) => Ok(FrameworkResponse {
                err: Some(Value::String(e.to_string())),
                ..Default::default()
            }),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl OrgDetailsClient for PlatformClient {
    async fn get_org_details(&self, slug: &str) -> AppResult<OrgDetails> {
        let endpoint = self.url(ORG_SEARCH_PATH);
        let body = json!({
            "request": {
                "filters": { "slug": slug, "isRootOrg": true }
            }
        });
        debug!("查询组织: {}", slug);

        let request = self.authorize(self.http.post(&endpoint)).json(&body);
        let response = Self::send(&endpoint, request).await?;
        let body = Self::check_status(&endpoint, response).await?;
        org_details_from_api(&endpoint, &body)
    }
}

#[async_trait]
impl SearchClient for PlatformClient {
    async fn content_search(&self, request: &SearchRequest) -> AppResult<SearchResponse> {
        let endpoint = self.url(CONTENT_SEARCH_PATH);
        let body = search_body(request);
        debug!("内容搜索 Payload: {}", body);

        let builder = self
            .authorize(self.http.post(&endpoint))
            .query(&request.params)
            .json(&body);
        let response = Self::send(&endpoint, builder).await?;
        let body = Self::check_status(&endpoint, response).await?;
        Ok(serde_json::from_value(body)?)
    }
}

/// 把控制器的请求转换为接口格式，页码换算为 offset
fn search_body(request: &SearchRequest) -> Value {
    let offset = request.page_number.saturating_sub(1) * request.limit;
    let mut inner = json!({
        "filters": request.filters,
        "limit": request.limit,
        "offset": offset,
        "softConstraints": request.soft_constraints,
        "facets": request.facets,
    });
    if let Some(query) = &request.query {
        inner["query"] = json!(query);
    }
    if let Some(sort_by) = &request.sort_by {
        inner["sort_by"] = json!(sort_by);
    }
    json!({ "request": inner })
}

fn framework_response_from_api(framework: &str, body: &Value) -> AppResult<FrameworkResponse> {
    let categories = body
        .pointer("/result/framework/categories")
        .cloned()
        .unwrap_or_else(|| json!([]));
    let data: FrameworkData = serde_json::from_value(json!({ "categories": categories }))?;

    let mut response = FrameworkResponse::default();
    response.frameworkdata.insert(framework.to_string(), data);
    Ok(response)
}

fn org_details_from_api(endpoint: &str, body: &Value) -> AppResult<OrgDetails> {
    let first = body
        .pointer("/result/response/content/0")
        .cloned()
        .ok_or_else(|| AppError::empty_response(endpoint))?;
    Ok(serde_json::from_value(first)?)
}
