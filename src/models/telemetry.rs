//! 埋点数据

use crate::models::search::ContentCard;
use serde::{Deserialize, Serialize};

/// 路由上配置的埋点描述
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryDescriptor {
    pub env: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub pageid: String,
    pub subtype: Option<String>,
}

/// 页面曝光事件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpressionEvent {
    pub context: ImpressionContext,
    pub edata: ImpressionEdata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpressionContext {
    pub env: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpressionEdata {
    #[serde(rename = "type")]
    pub kind: String,
    pub pageid: String,
    pub uri: String,
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visits: Vec<InviewEntry>,
}

/// 曝光日志中的一条
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviewEntry {
    pub objid: String,
    pub objtype: String,
    pub index: usize,
}

/// 卡片点击的交互数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractEdata {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub pageid: String,
}

/// 视口可见性变化
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InviewEvent {
    pub inview: Vec<InviewItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InviewItem {
    /// 卡片在列表中的位置
    pub id: usize,
    pub data: ContentCard,
}

/// 卡片点击（播放）事件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardEvent {
    pub data: ContentCard,
}
