//! 资源名称过滤
//!
//! 先逐个报告禁止字符，再删掉所有不在白名单内的字符

use crate::config::Config;
use crate::error::AppResult;
use regex::Regex;
use std::fmt::Write;
use tracing::debug;

/// 白名单之外额外允许的 ASCII 标点
const EXTRA_ALLOWED: &str = r":&_\-.(),/";

/// 过滤结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub text: String,
    /// 按出现顺序记录的禁止字符（每出现一次记一次）
    pub rejected: Vec<char>,
}

/// 资源名称过滤器
#[derive(Debug, Clone)]
pub struct ResourceNameSanitizer {
    disallowed: Vec<char>,
    strip: Regex,
}

impl ResourceNameSanitizer {
    /// 根据配置的白名单区段和禁止字符构建过滤器
    pub fn new(config: &Config) -> AppResult<Self> {
        config.validate()?;

        let mut class = String::from("[^");
        for (start, end) in &config.allowed_char_ranges {
            write!(class, "\\x{{{:04X}}}-\\x{{{:04X}}}", *start as u32, *end as u32)
                .map_err(|e| crate::error::AppError::Sanitizer(e.to_string()))?;
        }
        // \w 只取 ASCII 单词字符，\s 保持 Unicode 空白
        class.push_str("A-Za-z0-9_");
        class.push_str(EXTRA_ALLOWED);
        class.push_str(r"\s]");

        debug!("资源名称白名单: {}", class);

        Ok(Self {
            disallowed: config.disallowed_chars.chars().collect(),
            strip: Regex::new(&class)?,
        })
    }

    /// 过滤资源名称；输入为空时返回 `None`，不做任何处理
    pub fn sanitize(&self, text: Option<&str>) -> Option<Sanitized> {
        let text = text.filter(|t| !t.is_empty())?;

        let rejected: Vec<char> = text
            .chars()
            .filter(|c| self.disallowed.contains(c))
            .collect();
        let cleaned = self.strip.replace_all(text, "").into_owned();

        Some(Sanitized {
            text: cleaned,
            rejected,
        })
    }
}
