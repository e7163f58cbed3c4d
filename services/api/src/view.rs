//! Presentation Layer
//!
//! Renders a session as an HTML fragment. Exactly one template is chosen
//! per session state, and rendering never changes the session.

use crate::radar::RadarChart;
use commai_core::{
    scenario,
    session::{Session, SessionState},
};
use minijinja::{Environment, context};

/// Compiles the view templates into an environment.
///
/// Templates are embedded in the binary; autoescaping is on for all of them.
pub fn templates() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("idle.html", include_str!("../templates/idle.html"))?;
    env.add_template("chatting.html", include_str!("../templates/chatting.html"))?;
    env.add_template("assessing.html", include_str!("../templates/assessing.html"))?;
    env.add_template("result.html", include_str!("../templates/result.html"))?;
    Ok(env)
}

/// Renders the view for the session's current state.
pub fn render(env: &Environment<'_>, session: &Session) -> Result<String, minijinja::Error> {
    match session.state() {
        SessionState::Idle => env.get_template("idle.html")?.render(context! {
            scenarios => scenario::all(),
        }),
        SessionState::Chatting => env.get_template("chatting.html")?.render(context! {
            scenario => session.scenario(),
            messages => session.transcript(),
            awaiting_reply => session.is_awaiting_reply(),
        }),
        SessionState::Assessing => env.get_template("assessing.html")?.render(context! {
            scenario => session.scenario(),
        }),
        SessionState::Result => {
            let assessment = session.assessment();
            let chart = assessment.map(|a| RadarChart::from_scores(&a.scores));
            env.get_template("result.html")?.render(context! {
                scenario => session.scenario(),
                assessment => assessment,
                chart => chart,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commai_core::{
        assessment::{AssessmentResult, Scores},
        session::{Completion, EndOutcome},
    };

    fn env() -> Environment<'static> {
        templates().expect("templates should compile")
    }

    fn sample_assessment() -> AssessmentResult {
        AssessmentResult {
            scores: Scores {
                empathy: 72.0,
                logic: 65.5,
                clarity: 81.0,
                confidence: 57.25,
                persuasion: 69.0,
            },
            overall_feedback: "相手の立場に立った受け答えでした。".to_string(),
            strengths: vec!["傾聴できている".to_string(), "言葉遣いが丁寧".to_string()],
            improvements: vec!["提案が抽象的".to_string(), "結論が遅い".to_string()],
            advice: "最初の一文で結論を述べましょう。".to_string(),
        }
    }

    #[test]
    fn test_idle_lists_every_scenario_without_hidden_prompts() {
        let html = render(&env(), &Session::new()).unwrap();
        for scenario in scenario::all() {
            assert!(html.contains(scenario.title));
            assert!(html.contains(scenario.description));
            assert!(html.contains(&format!("data-scenario-id=\"{}\"", scenario.id)));
            assert!(!html.contains(scenario.system_prompt));
        }
    }

    #[test]
    fn test_chatting_shows_transcript_and_typing_indicator() {
        let mut session = Session::new();
        session.select_scenario("customer_complaint").unwrap();
        let html = render(&env(), &session).unwrap();
        assert!(html.contains("こんにちは。クレーム対応を始めましょう。"));
        assert!(html.contains("相手: 不満を持つ顧客"));
        assert!(!html.contains("typing-indicator"));

        session.begin_reply("<b>申し訳ございません</b>").unwrap();
        let html = render(&env(), &session).unwrap();
        assert!(html.contains("typing-indicator"));
        assert!(html.contains("&lt;b&gt;申し訳ございません&lt;"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("disabled"));
    }

    #[test]
    fn test_assessing_shows_progress() {
        let mut session = Session::new();
        session.select_scenario("interview").unwrap();
        session.request_end(true).unwrap();
        let html = render(&env(), &session).unwrap();
        assert!(html.contains("評価を生成中"));
    }

    #[test]
    fn test_result_renders_every_field() {
        let mut session = Session::new();
        session.select_scenario("interview").unwrap();
        let EndOutcome::Assess(request) = session.request_end(true).unwrap() else {
            panic!("expected assessment to start");
        };
        let assessment = sample_assessment();
        let completion = session
            .complete_assessment(request.ticket, Ok(assessment.clone()))
            .unwrap();
        assert_eq!(completion, Completion::Applied);

        let html = render(&env(), &session).unwrap();
        assert!(html.contains(&assessment.overall_feedback));
        assert!(html.contains(&assessment.advice));
        for line in assessment.strengths.iter().chain(&assessment.improvements) {
            assert!(html.contains(line.as_str()), "missing {line}");
        }
        for label in ["共感力 72", "論理性 65.5", "明瞭さ 81", "自信 57.25", "説得力 69"] {
            assert!(html.contains(label), "missing {label}");
        }
        assert!(html.contains("<polygon"));
        assert!(html.contains("data-action=\"reset\""));
    }
}
