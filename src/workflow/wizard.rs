//! 出题向导 - 流程层
//!
//! 四个阶段线性推进：选年级学科 → 选教材 → 选知识点 → 出题。
//! 每个阶段的选择事件把数据并入 `SelectedAttributes` 并前进一步。

use crate::clients::TaxonomyClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{Lifecycle, Modal, Toaster};
use crate::models::{
    LastOpenedUnit, ProgramDetails, QuestionTopicSelection, QuestionType, Role,
    SelectedAttributes, Term, UserProfile,
};
use crate::services::ResourceNameSanitizer;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// 向导阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    ChooseClass,
    ChooseTextbook,
    TopicList,
    CreateQuestion,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::ChooseClass,
        Stage::ChooseTextbook,
        Stage::TopicList,
        Stage::CreateQuestion,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::ChooseClass => "chooseClass",
            Stage::ChooseTextbook => "chooseTextbook",
            Stage::TopicList => "topicList",
            Stage::CreateQuestion => "createQuestion",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }
}

/// 导航方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// 向导接收的界面事件
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    ClassSubjectSelected { grade_level: String, subject: String },
    TextbookSelected(String),
    QuestionTopicSelected(QuestionTopicSelection),
    Navigate(Direction),
    ResourceNameChanged(String),
    SendResourceName,
    PublishStatusChanged(bool),
    RoleChanged(String),
    Destroy,
}

/// 向导的可见状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardState {
    pub selected_attributes: SelectedAttributes,
    pub stage: Stage,
    pub role: Role,
    pub form_field_options: Option<Vec<Value>>,
    pub resource_name: Option<String>,
    pub resource_name_input: Option<String>,
    pub show_loader: bool,
    pub publish_in_progress: bool,
}

/// 出题向导控制器
pub struct WizardController {
    config: Arc<Config>,
    taxonomy: Arc<dyn TaxonomyClient>,
    toaster: Arc<dyn Toaster>,
    sanitizer: ResourceNameSanitizer,
    lifecycle: Arc<Lifecycle>,
    modal: Option<Box<dyn Modal>>,
    program_details: ProgramDetails,
    user_profile: UserProfile,
    state: WizardState,
}

impl WizardController {
    /// 创建向导控制器
    pub fn new(
        config: Arc<Config>,
        taxonomy: Arc<dyn TaxonomyClient>,
        toaster: Arc<dyn Toaster>,
    ) -> AppResult<Self> {
        let sanitizer = ResourceNameSanitizer::new(&config)?;
        Ok(Self {
            config,
            taxonomy,
            toaster,
            sanitizer,
            lifecycle: Arc::new(Lifecycle::new()),
            modal: None,
            program_details: ProgramDetails::default(),
            user_profile: UserProfile::default(),
            state: WizardState::default(),
        })
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn program_details(&self) -> &ProgramDetails {
        &self.program_details
    }

    pub fn user_profile(&self) -> &UserProfile {
        &self.user_profile
    }

    /// 生命周期句柄，可在其他任务里触发销毁
    pub fn lifecycle(&self) -> Arc<Lifecycle> {
        Arc::clone(&self.lifecycle)
    }

    /// 挂上当前打开的弹窗
    pub fn attach_modal(&mut self, modal: Box<dyn Modal>) {
        self.modal = Some(modal);
    }

    /// 从项目详情初始化已选属性
    ///
    /// 知识点由 `fetch_taxonomy` 或 `run` 另行拉取，初始化本身不等待网络
    pub fn initialize(&mut self, program_details: ProgramDetails, user_profile: UserProfile) {
        if self.lifecycle.is_destroyed() {
            return;
        }
        let details = &program_details;
        let owned = |v: Option<&str>| v.map(str::to_string);

        self.state.selected_attributes = SelectedAttributes {
            current_role: owned(details.current_role()),
            framework: owned(details.framework()),
            channel: owned(details.channel()),
            board: owned(details.board()),
            medium: owned(details.medium()),
            blooms_level: details.blooms_level().map(<[Value]>::to_vec),
            program_id: owned(details.program_id()),
            program: owned(details.program_name()),
            on_board_school: owned(details.on_board_school()),
            last_opened_unit: Some(LastOpenedUnit::Zero),
            ..Default::default()
        };
        self.state.role = Role {
            current_role: self.state.selected_attributes.current_role.clone(),
        };
        self.state.form_field_options = details.form_fields().map(<[Value]>::to_vec);

        info!(
            "📝 向导初始化: 项目 {:?}, framework {:?}, 角色 {:?}",
            self.state.selected_attributes.program_id,
            self.state.selected_attributes.framework,
            self.state.role.current_role
        );

        self.program_details = program_details;
        self.user_profile = user_profile;
    }

    /// 拉取当前 framework 的知识点列表并写入已选属性
    ///
    /// 失败时静默，知识点列表保持未设置
    pub async fn fetch_taxonomy(&mut self) {
        let topics = self.topic_fetch().await;
        self.apply_topics(topics);
    }

    /// 构造知识点请求，不持有控制器的借用，可与事件处理并行
    fn topic_fetch(&self) -> impl Future<Output = Option<Vec<Term>>> + Send + 'static {
        let taxonomy = Arc::clone(&self.taxonomy);
        let framework = self.state.selected_attributes.framework.clone();
        let mut token = self.lifecycle.token();

        async move {
            let Some(framework) = framework else {
                warn!("未配置 framework，跳过知识点拉取");
                return None;
            };
            let response = tokio::select! {
                _ = token.destroyed() => {
                    debug!("向导已销毁，放弃 framework {} 的请求", framework);
                    return None;
                }
                response = taxonomy.read_framework(&framework) => response,
            };

            match response.map(|r| r.topic_terms(&framework)) {
                Ok(Ok(terms)) => {
                    debug!(
                        "framework {} 知识点数量: {:?}",
                        framework,
                        terms.as_ref().map(Vec::len)
                    );
                    terms
                }
                Ok(Err(e)) => {
                    warn!("知识点数据不可用: {}", e);
                    None
                }
                Err(e) => {
                    warn!("读取 framework {} 失败: {}", framework, e);
                    None
                }
            }
        }
    }

    fn apply_topics(&mut self, topics: Option<Vec<Term>>) {
        if self.lifecycle.is_destroyed() {
            debug!("向导已销毁，丢弃知识点响应");
            return;
        }
        if let Some(topics) = topics {
            self.state.selected_attributes.topic_list = Some(topics);
        }
    }

    /// 拉取知识点的同时处理界面事件，直到通道关闭或向导被销毁
    pub async fn run(&mut self, mut events: mpsc::Receiver<WizardEvent>) {
        let fetch = self.topic_fetch();
        tokio::pin!(fetch);
        let mut fetched = false;
        let mut token = self.lifecycle.token();

        loop {
            tokio::select! {
                biased;
                _ = token.destroyed() => break,
                topics = &mut fetch, if !fetched => {
                    fetched = true;
                    self.apply_topics(topics);
                }
                event = events.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
            }
        }
        debug!("向导事件循环结束");
    }

    /// 分发界面事件
    pub fn handle(&mut self, event: WizardEvent) {
        if self.lifecycle.is_destroyed() {
            debug!("向导已销毁，忽略事件 {:?}", event);
            return;
        }
        match event {
            WizardEvent::ClassSubjectSelected {
                grade_level,
                subject,
            } => self.on_class_subject_selected(grade_level, subject),
            WizardEvent::TextbookSelected(textbook) => self.on_textbook_selected(textbook),
            WizardEvent::QuestionTopicSelected(selection) => {
                self.on_question_topic_selected(selection)
            }
            WizardEvent::Navigate(direction) => self.navigate(direction),
            WizardEvent::ResourceNameChanged(text) => self.on_resource_name_change(&text),
            WizardEvent::SendResourceName => self.send_resource_name(),
            WizardEvent::PublishStatusChanged(in_progress) => {
                self.on_publish_status_changed(in_progress)
            }
            WizardEvent::RoleChanged(role) => {
                self.state.selected_attributes.current_role = Some(role);
                self.handle_role_change();
            }
            WizardEvent::Destroy => self.destroy(),
        }
    }

    pub fn on_class_subject_selected(&mut self, grade_level: String, subject: String) {
        self.state.selected_attributes.grade_level = Some(grade_level);
        self.state.selected_attributes.subject = Some(subject);
        self.navigate(Direction::Next);
    }

    pub fn on_textbook_selected(&mut self, textbook: String) {
        self.state.selected_attributes.textbook = Some(textbook);
        self.navigate(Direction::Next);
    }

    pub fn on_question_topic_selected(&mut self, selection: QuestionTopicSelection) {
        let resource_name = selection
            .resource_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| {
                QuestionType::default_resource_name(&selection.question_type, &selection.topic)
            });

        let attrs = &mut self.state.selected_attributes;
        attrs.topic = Some(selection.topic);
        attrs.question_type = Some(selection.question_type);
        attrs.last_opened_unit = Some(LastOpenedUnit::Unit(
            selection.text_book_unit_identifier.clone(),
        ));
        attrs.text_book_unit_identifier = Some(selection.text_book_unit_identifier);
        attrs.resource_identifier = selection.resource_identifier;

        debug!("资源名称: {}", resource_name);
        self.state.resource_name = Some(resource_name);
        self.navigate(Direction::Next);
    }

    /// 前进或后退一个阶段
    ///
    /// 越界的导航只记录日志，阶段保持不变
    pub fn navigate(&mut self, direction: Direction) {
        let target = match direction {
            Direction::Next => self.state.stage.next(),
            Direction::Prev => {
                self.reset_last_opened_unit_if_leaving_topic_list();
                self.state.stage.prev()
            }
        };
        match target {
            Some(stage) => {
                info!("➡️ 向导阶段: {} → {}", self.state.stage.name(), stage.name());
                self.state.stage = stage;
            }
            None => warn!(
                "⚠️ 阶段 {} 无法再向 {:?} 导航",
                self.state.stage.name(),
                direction
            ),
        }
    }

    /// 从知识点列表后退时清零最近打开的单元
    fn reset_last_opened_unit_if_leaving_topic_list(&mut self) {
        if self.state.stage == Stage::TopicList {
            self.state.selected_attributes.last_opened_unit = Some(LastOpenedUnit::Zero);
        }
    }

    /// 过滤资源名称：每个禁止字符提示一次，然后删掉白名单外的字符
    pub fn sanitize_resource_name(&self, text: Option<&str>) -> Option<String> {
        let sanitized = self.sanitizer.sanitize(text)?;
        for c in &sanitized.rejected {
            self.toaster.error(&self.config.special_char_message(*c));
        }
        Some(sanitized.text)
    }

    pub fn on_resource_name_change(&mut self, text: &str) {
        self.state.resource_name = self.sanitize_resource_name(Some(text));
    }

    pub fn send_resource_name(&mut self) {
        self.state.show_loader = true;
        self.state.resource_name_input = self.state.resource_name.clone();
    }

    pub fn on_publish_status_changed(&mut self, in_progress: bool) {
        self.state.publish_in_progress = in_progress;
    }

    pub fn handle_role_change(&mut self) {
        self.state.role = Role {
            current_role: self.state.selected_attributes.current_role.clone(),
        };
    }

    /// 销毁：关闭打开的弹窗，并让未完成的请求失效
    pub fn destroy(&mut self) {
        if let Some(modal) = self.modal.as_mut() {
            if modal.is_open() {
                modal.deny();
            }
        }
        self.lifecycle.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::RecordingToaster;
    use crate::models::FrameworkResponse;
    use async_trait::async_trait;

    struct NoTaxonomy;

    #[async_trait]
    impl TaxonomyClient for NoTaxonomy {
        async fn read_framework(&self, _framework: &str) -> AppResult<FrameworkResponse> {
            Ok(FrameworkResponse::default())
        }
    }

    fn controller() -> (WizardController, Arc<RecordingToaster>) {
        let toaster = Arc::new(RecordingToaster::default());
        let wizard = WizardController::new(
            Arc::new(Config::default()),
            Arc::new(NoTaxonomy),
            toaster.clone(),
        )
        .unwrap();
        (wizard, toaster)
    }

    #[test]
    fn test_stage_index_round_trip() {
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
            assert_eq!(Stage::from_index(i), Some(*stage));
        }
        assert_eq!(Stage::from_index(4), None);
    }

    #[test]
    fn test_next_then_prev_for_every_stage() {
        for s in 0..=2 {
            let (mut wizard, _) = controller();
            wizard.state.stage = Stage::from_index(s).unwrap();
            wizard.state.selected_attributes.last_opened_unit =
                Some(LastOpenedUnit::Unit("unit-7".to_string()));

            wizard.navigate(Direction::Next);
            assert_eq!(wizard.state().stage.index(), s + 1);

            wizard.navigate(Direction::Prev);
            assert_eq!(wizard.state().stage.index(), s);

            let expected = if s + 1 == 2 {
                LastOpenedUnit::Zero
            } else {
                LastOpenedUnit::Unit("unit-7".to_string())
            };
            assert_eq!(
                wizard.state().selected_attributes.last_opened_unit,
                Some(expected)
            );
        }
    }

    #[test]
    fn test_navigation_is_clamped() {
        let (mut wizard, _) = controller();
        wizard.navigate(Direction::Prev);
        assert_eq!(wizard.state().stage, Stage::ChooseClass);

        wizard.state.stage = Stage::CreateQuestion;
        wizard.navigate(Direction::Next);
        assert_eq!(wizard.state().stage, Stage::CreateQuestion);
    }

    #[test]
    fn test_question_topic_selection_defaults_resource_name() {
        let (mut wizard, _) = controller();
        wizard.state.stage = Stage::TopicList;
        wizard.on_question_topic_selected(QuestionTopicSelection {
            topic: "Fractions".to_string(),
            question_type: "vsa".to_string(),
            text_book_unit_identifier: "do_unit_1".to_string(),
            resource_identifier: Some("do_res_1".to_string()),
            resource_name: None,
        });

        let state = wizard.state();
        assert_eq!(state.stage, Stage::CreateQuestion);
        assert_eq!(
            state.resource_name.as_deref(),
            Some("Very Short Answer - Fractions")
        );
        assert_eq!(
            state.selected_attributes.last_opened_unit,
            Some(LastOpenedUnit::Unit("do_unit_1".to_string()))
        );
        assert_eq!(
            state.selected_attributes.resource_identifier.as_deref(),
            Some("do_res_1")
        );
    }

    #[test]
    fn test_explicit_resource_name_wins() {
        let (mut wizard, _) = controller();
        wizard.on_question_topic_selected(QuestionTopicSelection {
            topic: "Fractions".to_string(),
            question_type: "mcq".to_string(),
            text_book_unit_identifier: "u".to_string(),
            resource_identifier: None,
            resource_name: Some("My Quiz".to_string()),
        });
        assert_eq!(wizard.state().resource_name.as_deref(), Some("My Quiz"));
    }

    #[test]
    fn test_resource_name_change_reports_each_character() {
        let (mut wizard, toaster) = controller();
        wizard.handle(WizardEvent::ResourceNameChanged("Test @ #1".to_string()));

        assert_eq!(wizard.state().resource_name.as_deref(), Some("Test  1"));
        assert_eq!(
            toaster.messages(),
            vec![
                "Special character @ is not allowed".to_string(),
                "Special character # is not allowed".to_string(),
            ]
        );

        wizard.handle(WizardEvent::SendResourceName);
        assert!(wizard.state().show_loader);
        assert_eq!(wizard.state().resource_name_input.as_deref(), Some("Test  1"));
    }

    #[test]
    fn test_role_change_and_publish_status() {
        let (mut wizard, _) = controller();
        wizard.handle(WizardEvent::RoleChanged("REVIEWER".to_string()));
        assert_eq!(wizard.state().role.current_role.as_deref(), Some("REVIEWER"));

        wizard.handle(WizardEvent::PublishStatusChanged(true));
        assert!(wizard.state().publish_in_progress);
    }
}
