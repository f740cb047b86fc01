//! 项目（program）详情
//!
//! 上游传入的是一棵层级很深、几乎每一层都可能缺失的 JSON。
//! 这里为每条需要的路径提供具名访问器，缺失时返回 `None`，不会报错。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramDetails {
    pub program_id: Option<String>,
    pub name: Option<String>,
    pub config: Option<ProgramConfig>,
    pub user_details: Option<UserDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramConfig {
    pub scope: Option<ProgramScope>,
    pub on_board_form: Option<OnBoardForm>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramScope {
    pub framework: Option<String>,
    pub channel: Option<String>,
    pub board: Option<Vec<String>>,
    pub medium: Option<Vec<String>>,
    pub blooms_level: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OnBoardForm {
    pub fields: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDetails {
    pub roles: Option<Vec<String>>,
    pub on_boarding_data: Option<OnBoardingData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OnBoardingData {
    pub school: Option<String>,
}

/// 当前登录用户信息，只做透传
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProgramDetails {
    fn scope(&self) -> Option<&ProgramScope> {
        self.config.as_ref()?.scope.as_ref()
    }

    /// `userDetails.roles[0]`
    pub fn current_role(&self) -> Option<&str> {
        self.user_details.as_ref()?.roles.as_ref()?.first().map(String::as_str)
    }

    /// `config.scope.framework`
    pub fn framework(&self) -> Option<&str> {
        self.scope()?.framework.as_deref()
    }

    /// `config.scope.channel`
    pub fn channel(&self) -> Option<&str> {
        self.scope()?.channel.as_deref()
    }

    /// `config.scope.board[0]`
    pub fn board(&self) -> Option<&str> {
        self.scope()?.board.as_ref()?.first().map(String::as_str)
    }

    /// `config.scope.medium[0]`
    pub fn medium(&self) -> Option<&str> {
        self.scope()?.medium.as_ref()?.first().map(String::as_str)
    }

    /// `config.scope.bloomsLevel`
    pub fn blooms_level(&self) -> Option<&[Value]> {
        self.scope()?.blooms_level.as_deref()
    }

    pub fn program_id(&self) -> Option<&str> {
        self.program_id.as_deref()
    }

    pub fn program_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// `userDetails.onBoardingData.school`
    pub fn on_board_school(&self) -> Option<&str> {
        self.user_details
            .as_ref()?
            .on_boarding_data
            .as_ref()?
            .school
            .as_deref()
    }

    /// `config.onBoardForm.fields`
    pub fn form_fields(&self) -> Option<&[Value]> {
        self.config.as_ref()?.on_board_form.as_ref()?.fields.as_deref()
    }
}
