use crate::models::taxonomy::Term;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 最近打开的单元
///
/// 从知识点列表往回退时重置为 `Zero`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LastOpenedUnit {
    #[default]
    Zero,
    Unit(String),
}

/// 出题向导逐步累积的选择
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedAttributes {
    pub text_book_unit_identifier: Option<String>,
    pub last_opened_unit: Option<LastOpenedUnit>,
    pub framework: Option<String>,
    pub channel: Option<String>,
    pub board: Option<String>,
    pub medium: Option<String>,
    pub grade_level: Option<String>,
    pub subject: Option<String>,
    pub textbook: Option<String>,
    pub topic: Option<String>,
    pub question_type: Option<String>,
    pub program_id: Option<String>,
    pub program: Option<String>,
    pub current_role: Option<String>,
    pub blooms_level: Option<Vec<Value>>,
    pub topic_list: Option<Vec<Term>>,
    pub on_board_school: Option<String>,
    pub selected_school_for_review: Option<String>,
    pub resource_identifier: Option<String>,
    pub hierarchy_obj: Option<Value>,
}

/// 当前角色
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub current_role: Option<String>,
}

/// 选择知识点和题型的事件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionTopicSelection {
    pub topic: String,
    pub question_type: String,
    pub text_book_unit_identifier: String,
    pub resource_identifier: Option<String>,
    pub resource_name: Option<String>,
}
