use phf::phf_map;

/// 题型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// 极短答题
    Vsa,
    /// 短答题
    Sa,
    /// 长答题
    La,
    /// 选择题
    Mcq,
    /// 探究题
    Curiosity,
}

static QUESTION_TYPE_CODES: phf::Map<&'static str, QuestionType> = phf_map! {
    "vsa" => QuestionType::Vsa,
    "sa" => QuestionType::Sa,
    "la" => QuestionType::La,
    "mcq" => QuestionType::Mcq,
    "curiosity" => QuestionType::Curiosity,
};

impl QuestionType {
    /// 获取短代码
    pub fn code(self) -> &'static str {
        match self {
            QuestionType::Vsa => "vsa",
            QuestionType::Sa => "sa",
            QuestionType::La => "la",
            QuestionType::Mcq => "mcq",
            QuestionType::Curiosity => "curiosity",
        }
    }

    /// 获取展示名称
    pub fn display_name(self) -> &'static str {
        match self {
            QuestionType::Vsa => "Very Short Answer",
            QuestionType::Sa => "Short Answer",
            QuestionType::La => "Long Answer",
            QuestionType::Mcq => "Multiple Choice Question",
            QuestionType::Curiosity => "Curiosity Question",
        }
    }

    /// 从短代码解析题型（精确匹配）
    pub fn from_code(code: &str) -> Option<Self> {
        QUESTION_TYPE_CODES.get(code).copied()
    }

    /// 生成默认资源名称：`<题型展示名> - <知识点>`
    ///
    /// 未知题型直接使用原始代码
    pub fn default_resource_name(code: &str, topic: &str) -> String {
        let label = Self::from_code(code)
            .map(Self::display_name)
            .unwrap_or(code);
        format!("{} - {}", label, topic)
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
