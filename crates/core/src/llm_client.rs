use crate::{
    assessment::AssessmentResult,
    conversation::{ConversationService, FALLBACK_REPLY},
    error::ConversationError,
    message::{Message, Role},
    scenario::Scenario,
    transcript,
};
use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse, ResponseFormat,
        ResponseFormatJsonSchema,
    },
};
use async_trait::async_trait;
use tracing::{info, instrument, warn};

const REPLY_INSTRUCTION: &str = include_str!("../prompts/reply_instruction.md");
const ASSESSMENT_RUBRIC: &str = include_str!("../prompts/assessment_rubric.md");

const REPLY_TEMPERATURE: f32 = 0.8;

/// An implementation of `ConversationService` for any OpenAI-compatible API.
///
/// Replies and assessments may use different models; assessment benefits
/// from a stronger one.
pub struct LlmConversationService {
    client: Client<OpenAIConfig>,
    chat_model: String,
    assessment_model: String,
}

impl LlmConversationService {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - API key and base URL of the service.
    /// * `chat_model` - Model used for counterpart replies.
    /// * `assessment_model` - Model used for the end-of-session assessment.
    pub fn new(config: OpenAIConfig, chat_model: String, assessment_model: String) -> Self {
        Self {
            client: Client::with_config(config),
            chat_model,
            assessment_model,
        }
    }
}

/// System instruction for the counterpart: the scenario's hidden prompt
/// plus the language and length constraints.
pub fn reply_instruction(scenario: &Scenario) -> String {
    REPLY_INSTRUCTION
        .trim()
        .replace("{system_prompt}", scenario.system_prompt)
}

/// The rubric prompt with the scenario title and the transcript log filled in.
pub fn assessment_prompt(scenario: &Scenario, history: &[Message]) -> String {
    ASSESSMENT_RUBRIC
        .trim()
        .replace("{title}", scenario.title)
        .replace("{transcript}", &transcript::to_log(history))
}

/// Builds the chat request history: system instruction first, then every
/// transcript message in order.
pub fn build_reply_messages(
    scenario: &Scenario,
    history: &[Message],
) -> Result<Vec<ChatCompletionRequestMessage>, OpenAIError> {
    let mut messages: Vec<ChatCompletionRequestMessage> = vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(reply_instruction(scenario))
            .build()?
            .into(),
    ];
    for msg in history {
        match msg.role {
            Role::User => messages.push(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(msg.text.clone())
                    .build()?
                    .into(),
            ),
            Role::Counterpart => messages.push(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .content(msg.text.clone())
                    .build()?
                    .into(),
            ),
        };
    }
    Ok(messages)
}

fn first_text(response: &CreateChatCompletionResponse) -> Option<&str> {
    response
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_deref())
}

/// The counterpart's reply text, or [`FALLBACK_REPLY`] when the model
/// returned no text at all.
pub fn reply_text(response: &CreateChatCompletionResponse) -> String {
    match first_text(response) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => {
            warn!("Model returned an empty reply; substituting fallback text.");
            FALLBACK_REPLY.to_string()
        }
    }
}

/// The raw JSON payload of an assessment response.
pub fn assessment_payload(
    response: &CreateChatCompletionResponse,
) -> Result<&str, ConversationError> {
    first_text(response).ok_or_else(|| {
        ConversationError::MalformedAssessment("response contained no content".to_string())
    })
}

#[async_trait]
impl ConversationService for LlmConversationService {
    #[instrument(skip_all, fields(scenario = scenario.id, turns = history.len()))]
    async fn request_reply(
        &self,
        scenario: &Scenario,
        history: &[Message],
    ) -> Result<String, ConversationError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.chat_model)
            .messages(build_reply_messages(scenario, history)?)
            .temperature(REPLY_TEMPERATURE)
            .build()?;

        let response = self.client.chat().create(request).await?;
        Ok(reply_text(&response))
    }

    #[instrument(skip_all, fields(scenario = scenario.id, turns = history.len()))]
    async fn request_assessment(
        &self,
        scenario: &Scenario,
        history: &[Message],
    ) -> Result<AssessmentResult, ConversationError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.assessment_model)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(assessment_prompt(scenario, history))
                    .build()?
                    .into(),
            ])
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: Some("Communication skill assessment".to_string()),
                    name: "assessment_result".to_string(),
                    schema: Some(AssessmentResult::response_schema()),
                    strict: Some(true),
                },
            })
            .build()?;

        let response = self.client.chat().create(request).await?;
        let result = AssessmentResult::from_json(assessment_payload(&response)?)?;
        info!("Assessment parsed successfully.");
        Ok(result)
    }
}
