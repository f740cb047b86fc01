//! 内容探索页 - 流程层
//!
//! 路由参数 + query 参数 → 过滤条件 → 内容搜索 → 卡片 / 无结果提示。
//! 另外维护分页、曝光埋点和未登录时的课程播放拦截。

use crate::clients::{OrgDetailsClient, SearchClient};
use crate::config::Config;
use crate::infrastructure::{ContentPlayer, Lifecycle, Router, Toaster, UserSession};
use crate::models::{
    CardEvent, ContentCard, DisplayFacets, FilterFacet, FilterSet, ImpressionContext,
    ImpressionEdata, ImpressionEvent, InteractEdata, InviewEntry, InviewEvent, NoResultMessage,
    QueryParams, RouteParams, SearchRequest,
};
use crate::services::{
    facet_codes, get_data_for_card, get_pager, process_filter_data, sort_range_by_index, Pager,
};
use crate::config::SortOption;
use crate::utils::{js_string, truthy};
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// 不作为过滤条件的 query 参数
const RESERVED_QUERY_KEYS: [&str; 3] = ["key", "sort_by", "sortType"];
/// 比较前后两次 query 参数时忽略的键
const IGNORED_COMPARE_KEY: &str = "language";
/// 未登录时需要拦截的内容类型
const LOGIN_REQUIRED_CONTENT_TYPE: &str = "Course";
const DEFAULT_ROUTING_URL: &str = "explore";

/// 探索页依赖的外部能力
#[derive(Clone)]
pub struct ExploreDeps {
    pub search: Arc<dyn SearchClient>,
    pub org_details: Arc<dyn OrgDetailsClient>,
    pub router: Arc<dyn Router>,
    pub toaster: Arc<dyn Toaster>,
    pub session: Arc<dyn UserSession>,
    pub player: Arc<dyn ContentPlayer>,
}

/// 探索页接收的事件
#[derive(Debug, Clone, PartialEq)]
pub enum ExploreEvent {
    RouteChanged {
        params: RouteParams,
        query_params: QueryParams,
    },
    FacetsLoaded(Vec<FilterFacet>),
    PageRequested(u32),
    Inview(InviewEvent),
    Play(CardEvent),
    CloseLoginModal,
    Destroy,
}

/// 探索页的可见状态
#[derive(Debug, Clone, PartialEq)]
pub struct ExploreState {
    pub slug: String,
    pub hash_tag_id: Option<String>,
    pub explore_routing_url: String,
    pub filters: FilterSet,
    pub query_params: Option<QueryParams>,
    pub facet_array: Vec<String>,
    pub facets: DisplayFacets,
    pub sorting_options: Vec<SortOption>,
    /// 由分面数据推出的默认 board
    pub data_driven_board: Option<String>,
    pub search_list: Vec<ContentCard>,
    pub total_count: u64,
    pub page_number: u32,
    pub page_limit: u32,
    pub pager: Option<Pager>,
    pub no_result: bool,
    pub no_result_message: Option<NoResultMessage>,
    pub show_loader: bool,
    pub show_login_modal: bool,
    pub base_url: Option<String>,
    pub inview_logs: Vec<InviewEntry>,
    pub telemetry_impression: Option<ImpressionEvent>,
    pub card_interact_edata: Option<InteractEdata>,
}

impl Default for ExploreState {
    fn default() -> Self {
        Self {
            slug: String::new(),
            hash_tag_id: None,
            explore_routing_url: DEFAULT_ROUTING_URL.to_string(),
            filters: FilterSet::new(),
            query_params: None,
            facet_array: Vec::new(),
            facets: DisplayFacets::new(),
            sorting_options: Vec::new(),
            data_driven_board: None,
            search_list: Vec::new(),
            total_count: 0,
            page_number: 1,
            page_limit: 0,
            pager: None,
            no_result: false,
            no_result_message: None,
            show_loader: true,
            show_login_modal: false,
            base_url: None,
            inview_logs: Vec::new(),
            telemetry_impression: None,
            card_interact_edata: None,
        }
    }
}

/// 内容探索控制器
pub struct ExploreController {
    config: Arc<Config>,
    deps: ExploreDeps,
    lifecycle: Arc<Lifecycle>,
    state: ExploreState,
    /// 上一次收到的路由参数
    last_params: Option<RouteParams>,
    /// 上一次收到的原始 query 参数，用于判断是否需要重新搜索
    last_raw_query: Option<QueryParams>,
    /// 上一次触发搜索时的页码
    searched_page: Option<u32>,
}

impl ExploreController {
    pub fn new(config: Arc<Config>, deps: ExploreDeps) -> Self {
        let state = ExploreState {
            sorting_options: config.sorting_options.clone(),
            ..Default::default()
        };
        Self {
            config,
            deps,
            lifecycle: Arc::new(Lifecycle::new()),
            state,
            last_params: None,
            last_raw_query: None,
            searched_page: None,
        }
    }

    pub fn state(&self) -> &ExploreState {
        &self.state
    }

    /// 生命周期句柄，可在其他任务里触发销毁
    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        Arc::clone(&self.lifecycle)
    }

    /// 初始化：推导分页路由前缀，解析组织，生成埋点数据
    pub async fn initialize(&mut self) {
        let url = self.deps.router.url();
        self.state.explore_routing_url = explore_routing_url(&url);
        self.state.filters = FilterSet::new();
        self.state.data_driven_board = None;

        let snapshot = self.deps.router.snapshot();
        self.state.slug = snapshot.params.get("slug").cloned().unwrap_or_default();
        info!(
            "🔎 探索页初始化: url={}, slug={}, 分页前缀={}",
            url, self.state.slug, self.state.explore_routing_url
        );

        let slug = self.state.slug.clone();
        self.resolve_channel(&slug).await;
        self.set_telemetry_data();
    }

    /// 根据 slug 查询组织的 channel id，失败时跳回根路由
    pub async fn resolve_channel(&mut self, slug: &str) {
        let mut token = self.lifecycle.token();
        let response = tokio::select! {
            _ = token.destroyed() => return,
            response = self.deps.org_details.get_org_details(slug) => response,
        };
        if self.lifecycle.is_destroyed() {
            return;
        }

        match response {
            Ok(org) => {
                debug!("组织 {} 的 channel: {}", slug, org.hash_tag_id);
                self.state.hash_tag_id = Some(org.hash_tag_id);
            }
            Err(e) => {
                error!("查询组织 {} 失败: {}，返回首页", slug, e);
                self.deps.router.navigate(&[String::new()], None);
            }
        }
    }

    /// 根据路由快照生成曝光与点击埋点
    pub fn set_telemetry_data(&mut self) {
        let snapshot = self.deps.router.snapshot();
        let descriptor = snapshot.data.telemetry.unwrap_or_default();
        self.state.telemetry_impression = Some(ImpressionEvent {
            context: ImpressionContext {
                env: descriptor.env.clone(),
            },
            edata: ImpressionEdata {
                kind: descriptor.kind.clone(),
                pageid: descriptor.pageid.clone(),
                uri: self.deps.router.url(),
                subtype: descriptor.subtype.clone(),
                visits: Vec::new(),
            },
        });
        self.state.card_interact_edata = Some(InteractEdata {
            id: "content-card".to_string(),
            kind: "click".to_string(),
            pageid: descriptor.pageid,
        });
    }

    /// 路由或 query 参数变化时重建过滤条件
    ///
    /// 只有页码变化或 query 参数（忽略 language）变化时才重新搜索
    pub async fn reconcile_filters(&mut self, params: &RouteParams, query_params: &QueryParams) {
        let unchanged = self
            .last_raw_query
            .as_ref()
            .is_some_and(|prev| without_ignored_key(prev) == without_ignored_key(query_params));
        self.last_raw_query = Some(query_params.clone());
        self.last_params = Some(params.clone());

        if let Some(raw) = params.get("pageNumber") {
            match raw.parse::<u32>() {
                Ok(page) if page >= 1 => self.state.page_number = page,
                _ => warn!("忽略非法页码: {}", raw),
            }
        }

        let mut query = query_params.clone();
        let mut filters = self.default_filters();
        for (key, value) in &query {
            if !RESERVED_QUERY_KEYS.contains(&key.as_str()) {
                filters.insert(key.clone(), value.clone());
            }
        }
        self.state.filters = filters;

        if query.get("sort_by").is_some_and(truthy) {
            if let Some(sort_type) = query.get_mut("sortType").filter(|v| truthy(v)) {
                *sort_type = Value::String(js_string(sort_type));
            }
        }
        self.state.query_params = Some(query);

        if self.searched_page != Some(self.state.page_number) || !unchanged {
            self.searched_page = Some(self.state.page_number);
            self.search().await;
        } else {
            debug!("过滤条件未变化，跳过搜索");
        }
    }

    fn default_filters(&self) -> FilterSet {
        let content_types = self
            .config
            .default_content_types
            .iter()
            .cloned()
            .map(Value::String)
            .collect();
        BTreeMap::from([("contentType".to_string(), Value::Array(content_types))])
    }

    /// 组装搜索请求
    pub fn build_search_request(&self) -> SearchRequest {
        let state = &self.state;
        let mut filters: FilterSet = state
            .filters
            .iter()
            .filter(|(_, v)| has_length(v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        if let Some(channel) = &state.hash_tag_id {
            filters.insert("channel".to_string(), Value::String(channel.clone()));
        }
        if !state.filters.get("board").is_some_and(truthy) {
            if let Some(board) = state.data_driven_board.as_ref().filter(|b| !b.is_empty()) {
                filters.insert("board".to_string(), Value::String(board.clone()));
            }
        }

        let query_params = state.query_params.as_ref();
        let query = query_params
            .and_then(|q| q.get("key"))
            .filter(|v| truthy(v))
            .map(js_string);
        let sort_by = query_params.and_then(|q| {
            let field = q.get("sort_by").filter(|v| truthy(v))?;
            let sort_type = q.get("sortType").filter(|v| truthy(v))?;
            Some(BTreeMap::from([(
                js_string(field),
                js_string(sort_type),
            )]))
        });

        SearchRequest {
            filters,
            limit: self.config.page_size,
            page_number: state.page_number,
            query,
            soft_constraints: self.config.soft_rank_weights.clone(),
            facets: state.facet_array.clone(),
            params: self.config.content_api_query_params.clone(),
            sort_by,
        }
    }

    /// 执行内容搜索并更新展示状态
    pub async fn search(&mut self) {
        self.state.show_loader = true;
        self.state.page_limit = self.config.page_size;
        let request = self.build_search_request();
        info!(
            "🔍 内容搜索: 第 {} 页, 关键字 {:?}",
            request.page_number, request.query
        );

        let mut token = self.lifecycle.token();
        let response = tokio::select! {
            _ = token.destroyed() => {
                debug!("探索页已销毁，丢弃搜索请求");
                return;
            }
            response = self.deps.search.content_search(&request) => response,
        };
        if self.lifecycle.is_destroyed() {
            return;
        }

        let messages = &self.config.messages;
        match response {
            Ok(response) => {
                let result = response.result;
                self.state.facets = process_filter_data(result.facets.as_deref());
                self.state.show_loader = false;

                if result.has_content() {
                    let content = result.content.unwrap_or_default();
                    let fields = &self.config.card_fields;
                    self.state.no_result = false;
                    self.state.total_count = result.count;
                    self.state.pager = Some(get_pager(
                        result.count,
                        self.state.page_number,
                        self.state.page_limit,
                    ));
                    self.state.search_list = get_data_for_card(
                        &content,
                        &fields.constant_data,
                        &fields.dynamic_fields,
                        &fields.meta_fields,
                    );
                    info!(
                        "✓ 搜索完成: 共 {} 条, 本页 {} 条",
                        result.count,
                        self.state.search_list.len()
                    );
                } else {
                    // 上一次的结果列表保留不动
                    info!("搜索无结果");
                    self.state.no_result = true;
                    self.state.no_result_message = Some(NoResultMessage {
                        message: Some(messages.no_result_message.clone()),
                        message_text: messages.no_result_text.clone(),
                    });
                }
            }
            Err(e) => {
                error!("❌ 内容搜索失败: {}", e);
                self.state.facets = DisplayFacets::new();
                self.state.show_loader = false;
                self.state.no_result = true;
                self.state.no_result_message = Some(NoResultMessage {
                    message: None,
                    message_text: messages.search_failed_text.clone(),
                });
                self.deps.toaster.error(&messages.search_failed_toast);
            }
        }
    }

    /// 过滤器组件上报分面后，记录分面 code 与默认 board，再重建过滤条件
    pub async fn apply_facet_selection(&mut self, mut facets: Vec<FilterFacet>) {
        self.state.facet_array = facet_codes(&facets);
        for facet in facets.iter_mut().filter(|f| f.code == "board") {
            sort_range_by_index(&mut facet.range);
            self.state.data_driven_board = facet
                .range
                .first()
                .and_then(|option| option.name.clone())
                .filter(|name| !name.is_empty());
            debug!("默认 board: {:?}", self.state.data_driven_board);
        }

        // 优先用最近一次路由事件的参数，还没收到过时读路由快照
        let (params, query_params) = match (&self.last_params, &self.last_raw_query) {
            (Some(params), Some(query)) => (params.clone(), query.clone()),
            _ => {
                let snapshot = self.deps.router.snapshot();
                (snapshot.params, snapshot.query_params)
            }
        };
        self.reconcile_filters(&params, &query_params).await;
    }

    /// 跳转到指定页，越界时什么都不做
    pub fn go_to_page(&mut self, page: u32) {
        let Some(total_pages) = self.state.pager.as_ref().map(|p| p.total_pages) else {
            debug!("尚无分页信息，忽略跳页 {}", page);
            return;
        };
        if page < 1 || page > total_pages {
            debug!("页码 {} 超出范围 [1, {}]", page, total_pages);
            return;
        }
        self.state.page_number = page;
        let commands = [self.state.explore_routing_url.clone(), page.to_string()];
        self.deps
            .router
            .navigate(&commands, self.state.query_params.as_ref());
    }

    /// 记录进入视口的卡片，按内容 id 去重，并更新曝光埋点
    pub fn record_impression(&mut self, event: &InviewEvent) {
        for item in &event.inview {
            let Some(identifier) = item.data.identifier() else {
                continue;
            };
            if self.state.inview_logs.iter().any(|e| e.objid == identifier) {
                continue;
            }
            self.state.inview_logs.push(InviewEntry {
                objid: identifier.to_string(),
                objtype: item
                    .data
                    .meta_content_type()
                    .filter(|t| !t.is_empty())
                    .unwrap_or("content")
                    .to_string(),
                index: item.id,
            });
        }

        match self.state.telemetry_impression.as_mut() {
            Some(impression) => {
                impression.edata.visits = self.state.inview_logs.clone();
                impression.edata.subtype = Some("pageexit".to_string());
            }
            None => debug!("埋点尚未初始化，仅记录曝光日志"),
        }
    }

    /// 播放内容；未登录时课程类内容改为弹出登录框
    pub fn play_content(&mut self, event: &CardEvent) {
        let is_course = event.data.content_type.as_deref() == Some(LOGIN_REQUIRED_CONTENT_TYPE);
        if !self.deps.session.logged_in() && is_course {
            let identifier = event.data.identifier().unwrap_or_default();
            self.state.show_login_modal = true;
            self.state.base_url = Some(format!("/learn/course/{}", identifier));
            info!("未登录，拦截课程 {} 的播放", identifier);
        } else {
            self.deps.player.play_content(event);
        }
    }

    pub fn close_login_modal(&mut self) {
        self.state.show_login_modal = false;
    }

    /// 分发事件
    pub async fn handle(&mut self, event: ExploreEvent) {
        if self.lifecycle.is_destroyed() {
            return;
        }
        match event {
            ExploreEvent::RouteChanged {
                params,
                query_params,
            } => {
                // 埋点只随路径参数重建，query 变化保留已有曝光记录
                if self.last_params.as_ref() != Some(&params) {
                    self.set_telemetry_data();
                }
                self.reconcile_filters(&params, &query_params).await;
            }
            ExploreEvent::FacetsLoaded(facets) => self.apply_facet_selection(facets).await,
            ExploreEvent::PageRequested(page) => self.go_to_page(page),
            ExploreEvent::Inview(event) => self.record_impression(&event),
            ExploreEvent::Play(event) => self.play_content(&event),
            ExploreEvent::CloseLoginModal => self.close_login_modal(),
            ExploreEvent::Destroy => self.destroy(),
        }
    }

    /// 持续处理事件，直到通道关闭或控制器被销毁
    ///
    /// 处理某个事件期间继续读取通道：`Destroy` 立即生效，
    /// 其他事件排队等当前事件处理完
    pub async fn run(&mut self, mut events: mpsc::Receiver<ExploreEvent>) {
        let lifecycle = self.lifecycle();
        let mut token = lifecycle.token();
        let mut backlog = VecDeque::new();
        let mut open = true;

        loop {
            let event = match backlog.pop_front() {
                Some(event) => event,
                None if !open => break,
                None => tokio::select! {
                    _ = token.destroyed() => break,
                    event = events.recv() => match event {
                        Some(event) => event,
                        None => break,
                    },
                },
            };

            let handling = self.handle(event);
            tokio::pin!(handling);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut handling => break,
                    next = events.recv(), if open => match next {
                        Some(ExploreEvent::Destroy) => {
                            info!("探索页销毁（处理中）");
                            lifecycle.destroy();
                        }
                        Some(next) => backlog.push_back(next),
                        None => open = false,
                    },
                }
            }

            if lifecycle.is_destroyed() {
                break;
            }
        }
        debug!("探索页事件循环结束");
    }

    /// 销毁：通知所有订阅停止
    pub fn destroy(&mut self) {
        info!("探索页销毁");
        self.lifecycle.destroy();
    }
}

/// 根据当前 URL 推导分页跳转的路由前缀
fn explore_routing_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    if !path.contains("/explore") {
        return DEFAULT_ROUTING_URL.to_string();
    }
    let segments: Vec<&str> = path.split('/').collect();
    match segments.iter().position(|s| *s == "explore") {
        Some(2) => format!("{}/{}", segments[1], segments[2]),
        _ => segments.get(1).copied().unwrap_or(DEFAULT_ROUTING_URL).to_string(),
    }
}

fn without_ignored_key(query: &QueryParams) -> QueryParams {
    let mut query = query.clone();
    query.remove(IGNORED_COMPARE_KEY);
    query
}

/// 非空字符串 / 非空数组才算有值
fn has_length(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}
