use crate::error::{AppResult, ConfigError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// 程序配置
///
/// 两个控制器只读取配置，不修改配置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 每页内容数量
    pub page_size: u32,
    /// 排序选项
    pub sorting_options: Vec<SortOption>,
    /// 默认的 contentType 过滤值
    pub default_content_types: Vec<String>,
    /// 资源名称允许的 Unicode 区段（闭区间）
    pub allowed_char_ranges: Vec<(char, char)>,
    /// 资源名称中禁止出现的字符
    pub disallowed_chars: String,
    /// 搜索软约束权重
    pub soft_rank_weights: BTreeMap<String, u32>,
    /// 本地化提示语
    pub messages: Messages,
    /// 内容卡片映射字段
    pub card_fields: CardFieldConfig,
    /// 搜索接口附加的 query 参数
    pub content_api_query_params: BTreeMap<String, String>,
    // --- 平台 API 配置 ---
    pub api_base_url: String,
    pub api_token: String,
    // --- 命令行运行参数 ---
    /// 探索页对应的组织 slug
    pub explore_slug: String,
    /// 探索页的搜索关键字
    pub explore_query: Option<String>,
    /// 出题向导使用的项目详情 JSON 文件
    pub program_details_path: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

/// 排序选项
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOption {
    pub field: String,
    pub name: String,
}

/// 本地化提示语
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// 无结果时的主提示（stmsg.m0007）
    pub no_result_message: String,
    /// 无结果时的说明（stmsg.m0006）
    pub no_result_text: String,
    /// 搜索失败时的说明（fmsg.m0077）
    pub search_failed_text: String,
    /// 搜索失败时的 toast（fmsg.m0051）
    pub search_failed_toast: String,
    /// 特殊字符提示模板，`{char}` 会被替换为具体字符
    pub special_char_template: String,
}

/// 内容卡片映射配置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CardFieldConfig {
    /// 原样拷贝到每张卡片上的字段
    pub constant_data: Map<String, Value>,
    /// 卡片字段名 → 内容里的点分路径
    pub dynamic_fields: BTreeMap<String, String>,
    /// 拷贝到卡片 metaData 的内容字段
    pub meta_fields: Vec<String>,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            no_result_message: "Please search for something else.".to_string(),
            no_result_text: "No content found".to_string(),
            search_failed_text: "Fetching search results failed".to_string(),
            search_failed_toast: "Something went wrong, try again later".to_string(),
            special_char_template: "Special character {char} is not allowed".to_string(),
        }
    }
}

impl Default for CardFieldConfig {
    fn default() -> Self {
        let constant_data = json!({
            "action": { "onImage": { "eventName": "onImage" } }
        });
        Self {
            constant_data: constant_data.as_object().cloned().unwrap_or_default(),
            dynamic_fields: BTreeMap::new(),
            meta_fields: ["identifier", "mimeType", "framework", "contentType"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// 默认允许的文字区段：阿拉伯文及表现形式、孟加拉文、天城文、马拉雅拉姆文、
/// 古吉拉特文、卡纳达文、奥里亚文、古木基文、泰米尔文、泰卢固文
pub const DEFAULT_ALLOWED_RANGES: [(char, char); 12] = [
    ('\u{0600}', '\u{06FF}'),
    ('\u{FB50}', '\u{FDFF}'),
    ('\u{FE70}', '\u{FEFF}'),
    ('\u{FB50}', '\u{FDFF}'),
    ('\u{0980}', '\u{09FF}'),
    ('\u{0900}', '\u{097F}'),
    ('\u{0D00}', '\u{0D7F}'),
    ('\u{0A80}', '\u{0AFF}'),
    ('\u{0C80}', '\u{0CFF}'),
    ('\u{0B00}', '\u{0B7F}'),
    ('\u{0A00}', '\u{0A7F}'),
    ('\u{0B80}', '\u{0BFF}'),
];

pub const DEFAULT_DISALLOWED_CHARS: &str = "!`~@#$^*+=[]\\'{}|\"<>%";

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: 20,
            sorting_options: vec![
                SortOption {
                    field: "lastUpdatedOn".to_string(),
                    name: "Modified On".to_string(),
                },
                SortOption {
                    field: "createdOn".to_string(),
                    name: "Created On".to_string(),
                },
            ],
            default_content_types: [
                "Collection",
                "TextBook",
                "LessonPlan",
                "Resource",
                "Story",
                "Worksheet",
                "Game",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            allowed_char_ranges: DEFAULT_ALLOWED_RANGES.to_vec(),
            disallowed_chars: DEFAULT_DISALLOWED_CHARS.to_string(),
            soft_rank_weights: [("badgeAssertions", 98), ("board", 99), ("channel", 100)]
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
            messages: Messages::default(),
            card_fields: CardFieldConfig::default(),
            content_api_query_params: [("orgdetails", "orgName,email")]
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            api_base_url: "https://diksha.gov.in".to_string(),
            api_token: String::new(),
            explore_slug: "ntp".to_string(),
            explore_query: None,
            program_details_path: None,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    /// 默认配置叠加环境变量
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，缺失字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env_overrides(self) -> AppResult<Self> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// 用任意键值来源覆盖配置；数值或布尔值无法解析时报错
    pub fn with_overrides_from(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let default = self;
        Ok(Self {
            page_size: parse_var(&lookup, "PAGE_SIZE", "u32")?.unwrap_or(default.page_size),
            api_base_url: lookup("API_BASE_URL").unwrap_or(default.api_base_url),
            api_token: lookup("API_TOKEN").unwrap_or(default.api_token),
            explore_slug: lookup("EXPLORE_SLUG").unwrap_or(default.explore_slug),
            explore_query: lookup("EXPLORE_QUERY").or(default.explore_query),
            program_details_path: lookup("PROGRAM_DETAILS_PATH").or(default.program_details_path),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", "bool")?
                .unwrap_or(default.verbose_logging),
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            ..default
        })
    }

    /// 校验字符区段
    pub fn validate(&self) -> AppResult<()> {
        if let Some((start, end)) = self
            .allowed_char_ranges
            .iter()
            .find(|(start, end)| start > end)
        {
            return Err(ConfigError::InvalidCharRange {
                start: *start,
                end: *end,
            }
            .into());
        }
        Ok(())
    }

    /// 渲染特殊字符提示
    pub fn special_char_message(&self, c: char) -> String {
        self.messages
            .special_char_template
            .replace("{char}", &c.to_string())
    }
}

/// 读取并解析一个变量，未设置时返回 `None`
fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    expected_type: &str,
) -> AppResult<Option<T>> {
    let Some(value) = lookup(name) else {
        return Ok(None);
    };
    value.trim().parse().map(Some).map_err(|_| {
        ConfigError::EnvVarParseFailed {
            var_name: name.to_string(),
            value,
            expected_type: expected_type.to_string(),
        }
        .into()
    })
}
