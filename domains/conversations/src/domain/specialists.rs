//! Specialist personas
//!
//! A closed set of consultation personas. Every wire string maps to exactly
//! one variant: unknown values resolve to [`SpecialistType::General`], both
//! when reading stored rows and when a caller creates a conversation.

use serde::Serialize;

use soudan_common::{Error, Result};

/// Consultation persona attached to a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialistType {
    Psychologist,
    Career,
    Health,
    Legal,
    Finance,
    /// Default persona for unrecognized wire strings. Never offered.
    General,
}

/// Personas offered in the catalogue, in display order
pub const CATALOGUE: [SpecialistType; 5] = [
    SpecialistType::Psychologist,
    SpecialistType::Career,
    SpecialistType::Health,
    SpecialistType::Legal,
    SpecialistType::Finance,
];

const PSYCHOLOGIST_PROMPT: &str = "\
あなたは経験豊富で共感的な心理カウンセラーです。相談者の心に寄り添い、温かく受容的な態度で対応してください。

以下の原則に従ってください：
- 相談者の感情を受け止め、共感を示す
- 判断や批判をしない
- 具体的で実践的なアドバイスを提供する
- 必要に応じて専門機関への相談を勧める
- 守秘義務を重視し、安心できる環境を作る

相談者が安心して話せるよう、温かい言葉遣いで対応してください。
";

const CAREER_PROMPT: &str = "\
あなたは経験豊富なキャリアアドバイザーです。相談者のキャリア形成を支援し、実践的なアドバイスを提供してください。

以下の点に重点を置いてください：
- 相談者の強みや興味を引き出す
- 現実的で具体的なキャリアプランを提案する
- 転職、昇進、スキルアップに関するアドバイス
- 業界動向や市場価値に基づいた情報提供
- 面接対策や履歴書作成のサポート

相談者の将来に向けて建設的なアドバイスを心がけてください。
";

const HEALTH_PROMPT: &str = "\
あなたは健康アドバイザーです。相談者の健康管理をサポートし、科学的根拠に基づいたアドバイスを提供してください。

以下の原則に従ってください：
- 生活習慣の改善に関する具体的なアドバイス
- 運動、栄養、睡眠の重要性を説明
- 予防医学の観点からのサポート
- 医療機関での受診が必要な場合は適切に案内
- 科学的根拠のない情報は提供しない

注意：診断や治療行為は行わず、必要に応じて医療専門家への相談を促してください。
";

const LEGAL_PROMPT: &str = "\
あなたは法律アドバイザーです。法的な相談に対して、分かりやすく丁寧に回答してください。

以下の点に注意してください：
- 法律の基本的な知識を分かりやすく説明
- 具体的な手続きや必要な書類について案内
- 複雑なケースでは弁護士への相談を勧める
- 最新の法改正については注意を促す
- 個別の法的判断は避け、一般的な情報提供に留める

法的リスクを避けるため、具体的な法的判断が必要な場合は専門家への相談を強く推奨してください。
";

const FINANCE_PROMPT: &str = "\
あなたは金融アドバイザーです。相談者の資産形成や家計管理をサポートし、実践的なアドバイスを提供してください。

以下の分野で支援してください：
- 家計の見直しと節約方法
- 投資の基本知識と資産運用
- 保険の選び方と見直し
- 住宅ローンや教育資金の計画
- 老後資金の準備方法

注意：具体的な金融商品の推奨は避け、一般的な知識と判断基準を提供してください。
重要な金融決定については、必要に応じて専門家への相談を勧めてください。
";

impl SpecialistType {
    /// Strict lookup of a known id. Legacy aliases are accepted.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim() {
            "psychologist" => Ok(SpecialistType::Psychologist),
            "career" | "career_consultant" => Ok(SpecialistType::Career),
            "health" => Ok(SpecialistType::Health),
            "legal" | "lawyer" => Ok(SpecialistType::Legal),
            "finance" => Ok(SpecialistType::Finance),
            "general" => Ok(SpecialistType::General),
            other => Err(Error::Validation(format!(
                "Invalid specialist type: {}",
                other
            ))),
        }
    }

    /// Total mapping: unknown strings become `General`
    pub fn from_wire(raw: &str) -> Self {
        Self::parse(raw).unwrap_or(SpecialistType::General)
    }

    /// Resolve caller input when creating a conversation.
    ///
    /// Only a blank value is rejected; anything unrecognized gets the
    /// default persona.
    pub fn resolve(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(Error::Validation("Specialist type is required".to_string()));
        }
        let specialist = Self::from_wire(raw);
        if specialist == SpecialistType::General && raw.trim() != "general" {
            tracing::info!(requested = %raw.trim(), "Unknown specialist type, using default persona");
        }
        Ok(specialist)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialistType::Psychologist => "psychologist",
            SpecialistType::Career => "career",
            SpecialistType::Health => "health",
            SpecialistType::Legal => "legal",
            SpecialistType::Finance => "finance",
            SpecialistType::General => "general",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SpecialistType::Psychologist => "心理カウンセラー",
            SpecialistType::Career => "キャリアアドバイザー",
            SpecialistType::Health => "健康アドバイザー",
            SpecialistType::Legal => "法律アドバイザー",
            SpecialistType::Finance => "金融アドバイザー",
            SpecialistType::General => "専門アドバイザー",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SpecialistType::Psychologist => {
                "メンタルヘルス、人間関係、ストレス管理などの心理的な悩みについて相談できます。"
            }
            SpecialistType::Career => {
                "転職、昇進、スキルアップ、キャリアプランニングについて相談できます。"
            }
            SpecialistType::Health => {
                "生活習慣、運動、栄養、睡眠など健康管理について相談できます。"
            }
            SpecialistType::Legal => {
                "法的な問題や手続き、権利関係について一般的な情報を提供します。"
            }
            SpecialistType::Finance => "家計管理、投資、保険、資産運用について相談できます。",
            SpecialistType::General => "さまざまなご相談にお応えします。",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SpecialistType::Psychologist => "🧠",
            SpecialistType::Career => "💼",
            SpecialistType::Health => "⚕️",
            SpecialistType::Legal => "⚖️",
            SpecialistType::Finance => "💰",
            SpecialistType::General => "💬",
        }
    }

    /// Persona instruction sent ahead of the conversation history
    pub fn system_prompt(&self) -> &'static str {
        match self {
            SpecialistType::Psychologist | SpecialistType::General => PSYCHOLOGIST_PROMPT,
            SpecialistType::Career => CAREER_PROMPT,
            SpecialistType::Health => HEALTH_PROMPT,
            SpecialistType::Legal => LEGAL_PROMPT,
            SpecialistType::Finance => FINANCE_PROMPT,
        }
    }

    /// Reply used when the provider cannot produce one
    pub fn fallback_message(&self) -> &'static str {
        match self {
            SpecialistType::Psychologist => {
                "お話を聞かせていただき、ありがとうございます。今少し整理する時間をいただけますでしょうか。"
            }
            SpecialistType::Career => {
                "キャリアに関するご相談をいただき、ありがとうございます。詳しくお聞かせください。"
            }
            SpecialistType::Health => {
                "健康に関するご質問をいただき、ありがとうございます。もう少し詳しく教えていただけますか。"
            }
            SpecialistType::Legal => {
                "法的なご相談をいただき、ありがとうございます。状況を詳しく教えていただけますでしょうか。"
            }
            SpecialistType::Finance => {
                "金融に関するご質問をいただき、ありがとうございます。現在の状況を教えていただけますか。"
            }
            SpecialistType::General => "ご相談いただき、ありがとうございます。詳しくお聞かせください。",
        }
    }

    /// Acknowledgment placed after the persona instruction
    pub fn acknowledgment(&self) -> String {
        format!(
            "承知いたしました。{}として、丁寧にサポートいたします。",
            self.display_name()
        )
    }
}

impl From<String> for SpecialistType {
    fn from(raw: String) -> Self {
        SpecialistType::from_wire(&raw)
    }
}

impl std::fmt::Display for SpecialistType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
