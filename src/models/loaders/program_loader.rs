use crate::models::program::{ProgramDetails, UserProfile};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs;

/// 从 JSON 文件加载项目详情
pub async fn load_program_details(path: &Path) -> Result<ProgramDetails> {
    load_json(path).await
}

/// 从 JSON 文件加载用户信息，文件不存在时返回空用户
pub async fn load_user_profile(path: Option<&Path>) -> Result<UserProfile> {
    match path {
        Some(path) if path.exists() => load_json(path).await,
        Some(path) => {
            tracing::warn!("用户信息文件不存在: {}，使用空用户", path.display());
            Ok(UserProfile::default())
        }
        None => Ok(UserProfile::default()),
    }
}

async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取JSON文件: {}", path.display()))?;

    let value = serde_json::from_str(&content)
        .with_context(|| format!("无法解析JSON文件: {}", path.display()))?;

    tracing::info!("成功加载: {}", path.display());
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_program_details_from_file() {
        let path = std::env::temp_dir().join(format!("program-{}.json", std::process::id()));
        tokio::fs::write(
            &path,
            r#"{ "programId": "p-9", "config": { "scope": { "board": ["II"] } } }"#,
        )
        .await
        .unwrap();

        let details = load_program_details(&path).await.unwrap();
        assert_eq!(details.program_id(), Some("p-9"));
        assert_eq!(details.board(), Some("II"));

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_missing_user_profile_is_empty() {
        let profile = load_user_profile(Some(Path::new("/definitely/not/here.json")))
            .await
            .unwrap();
        assert!(profile.user_id.is_none());
    }
}
