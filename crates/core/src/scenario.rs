//! Scenario Catalog
//!
//! The fixed set of roleplay situations a user can practise. The catalog is
//! compiled into the binary and never changes at runtime.

use serde::Serialize;

/// A single roleplay definition.
///
/// `system_prompt` is the hidden instruction handed to the model to play the
/// counterpart. It is deliberately skipped during serialization so it can
/// never leak to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub partner_role: &'static str,
    pub icon: &'static str,
    #[serde(skip)]
    pub system_prompt: &'static str,
}

impl Scenario {
    /// The counterpart's opening line when a session starts.
    pub fn greeting(&self) -> String {
        format!("こんにちは。{}を始めましょう。準備はいいですか？", self.title)
    }
}

static SCENARIOS: [Scenario; 4] = [
    Scenario {
        id: "interview",
        title: "採用面接",
        description: "希望する企業の採用面接シーン。自己PRや志望動機を話してみましょう。",
        partner_role: "面接官",
        icon: "💼",
        system_prompt: "あなたは厳格だが公平な採用面接官です。ユーザーの回答に対して深掘りする質問を投げかけてください。",
    },
    Scenario {
        id: "customer_complaint",
        title: "クレーム対応",
        description: "怒っている顧客への対応。共感を示しつつ、適切に解決へ導けるか試されます。",
        partner_role: "不満を持つ顧客",
        icon: "😠",
        system_prompt: "あなたは購入した製品が壊れていて非常に怒っている顧客です。最初は感情的ですが、誠実な対応には少しずつ心を開きます。",
    },
    Scenario {
        id: "networking",
        title: "交流会・ネットワーキング",
        description: "初対面の人との雑談。自然な会話から共通点を見つけ、良い印象を与えましょう。",
        partner_role: "交流会の参加者",
        icon: "🤝",
        system_prompt: "あなたはIT企業のエンジニアで、技術交流会に参加しています。明るく社交的ですが、少し専門的な話題も好みます。",
    },
    Scenario {
        id: "performance_review",
        title: "上司への昇給交渉",
        description: "自身の成果をアピールし、上司に昇給や条件の改善を提案するシーンです。",
        partner_role: "部門マネージャー",
        icon: "📈",
        system_prompt: "あなたは合理的で成果を重視するマネージャーです。納得感のある根拠がない限り、首を縦に振りません。",
    },
];

/// Returns every scenario in display order.
pub fn all() -> &'static [Scenario] {
    &SCENARIOS
}

/// Looks up a scenario by its identifier.
pub fn find(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|scenario| scenario.id == id)
}
