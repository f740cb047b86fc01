use crate::clients::PlatformClient;
use crate::config::Config;
use crate::infrastructure::{FixedSession, LogToaster, MemoryRouter, RecordingPlayer};
use crate::models::{
    load_program_details, load_user_profile, FilterFacet, QueryParams, RouteData, RouteParams,
    RouteSnapshot, TelemetryDescriptor,
};
use crate::utils::logging::{
    init_log_file, log_search_summary, log_startup, print_final_stats, truncate_text,
};
use crate::workflow::{ExploreController, ExploreDeps, WizardController};
use anyhow::Result;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// 探索页请求的分面
const EXPLORE_FACETS: [&str; 4] = ["board", "medium", "gradeLevel", "subject"];

/// 应用主结构
pub struct App {
    config: Arc<Config>,
    client: Arc<PlatformClient>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config);

        let client = Arc::new(PlatformClient::new(&config));
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// 运行应用主逻辑：探索页与出题向导并行
    pub async fn run(&self) -> Result<()> {
        let (cards, topics) =
            futures::future::join(self.run_explore(), self.run_wizard()).await;
        let cards = cards?;
        let topics = topics?;

        print_final_stats(cards, topics, &self.config.output_log_file);
        Ok(())
    }

    /// 探索页：解析组织、上报分面触发首次搜索
    async fn run_explore(&self) -> Result<usize> {
        let router = Arc::new(MemoryRouter::new(
            "/explore/1",
            explore_snapshot(&self.config),
        ));
        let deps = ExploreDeps {
            search: self.client.clone(),
            org_details: self.client.clone(),
            router: router.clone(),
            toaster: Arc::new(LogToaster),
            session: Arc::new(FixedSession { logged_in: false }),
            player: Arc::new(RecordingPlayer::default()),
        };

        let mut explore = ExploreController::new(self.config.clone(), deps);
        explore.initialize().await;

        let facets = EXPLORE_FACETS
            .iter()
            .map(|code| FilterFacet {
                code: code.to_string(),
                range: Vec::new(),
            })
            .collect();
        explore.apply_facet_selection(facets).await;

        let state = explore.state();
        for (i, card) in state.search_list.iter().enumerate() {
            info!(
                "  {}. {} [{}]",
                i + 1,
                truncate_text(card.name.as_deref().unwrap_or("-"), 60),
                card.identifier().unwrap_or("-")
            );
        }
        if state.no_result {
            if let Some(message) = &state.no_result_message {
                warn!("⚠️ {}", message.message_text);
            }
        }
        log_search_summary(state.total_count, state.pager.as_ref());

        let cards = state.search_list.len();
        explore.destroy();
        Ok(cards)
    }

    /// 出题向导：加载项目详情并拉取知识点
    async fn run_wizard(&self) -> Result<Option<usize>> {
        let Some(path) = self.config.program_details_path.as_deref() else {
            info!("未配置项目详情文件，跳过出题向导");
            return Ok(None);
        };

        let details = load_program_details(Path::new(path)).await?;
        let profile = load_user_profile(None).await?;

        let mut wizard =
            WizardController::new(self.config.clone(), self.client.clone(), Arc::new(LogToaster))?;
        wizard.initialize(details, profile);
        wizard.fetch_taxonomy().await;

        let topics = wizard
            .state()
            .selected_attributes
            .topic_list
            .as_ref()
            .map(Vec::len);
        wizard.destroy();
        Ok(topics)
    }
}

/// 命令行运行时的路由快照
fn explore_snapshot(config: &Config) -> RouteSnapshot {
    let params: RouteParams = [
        ("slug".to_string(), config.explore_slug.clone()),
        ("pageNumber".to_string(), "1".to_string()),
    ]
    .into_iter()
    .collect();

    let mut query_params = QueryParams::new();
    if let Some(key) = &config.explore_query {
        query_params.insert("key".to_string(), Value::String(key.clone()));
    }

    RouteSnapshot {
        params,
        query_params,
        data: RouteData {
            telemetry: Some(TelemetryDescriptor {
                env: "public".to_string(),
                kind: "view".to_string(),
                pageid: "explore".to_string(),
                subtype: Some("paginate".to_string()),
            }),
        },
    }
}
