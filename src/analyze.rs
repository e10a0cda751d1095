use crate::config::{LlmConfig, LlmProvider};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{EmailAnalysis, EmailPatch, EmailRecord};
use futures::future::try_join_all;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// The slice of a message handed to the LLM.
#[derive(Debug, Clone)]
pub struct EmailContent {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub date: String,
}

impl EmailContent {
    /// Build analyzable content from a stored record. Bodies are not
    /// mirrored locally, so the body slot stays empty here; callers with
    /// the raw message can fill it in themselves.
    pub fn from_record(record: &EmailRecord) -> Self {
        Self {
            subject: record.subject.clone().unwrap_or_default(),
            body: String::new(),
            from: record.from_address.clone(),
            date: record.received_at.to_rfc3339(),
        }
    }
}

/// Validated analyzer output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub sentiment: String,
    pub summary: String,
    #[serde(rename = "actionRequired")]
    pub action_required: bool,
    pub importance: i64,
    pub category: String,
}

impl AnalysisResponse {
    pub fn to_email_analysis(&self) -> EmailAnalysis {
        EmailAnalysis {
            kind: self.kind.clone(),
            sentiment: self.sentiment.clone(),
            summary: self.summary.clone(),
            action_required: self.action_required,
        }
    }
}

pub struct Analyzer {
    client: reqwest::Client,
    provider: LlmProvider,
    api_key: String,
    base_url: Option<String>,
    model: String,
}

impl Analyzer {
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .resolved_api_key()
            .ok_or_else(|| Error::Provider("no API key configured for LLM provider".to_string()))?;
        Ok(Self {
            client: reqwest::Client::new(),
            provider: config.provider,
            api_key,
            base_url: config.base_url.clone(),
            model: config.resolved_model(),
        })
    }

    pub async fn analyze(&self, content: &EmailContent) -> Result<AnalysisResponse> {
        let prompt = build_prompt(content);
        debug!(from = %content.from, "requesting analysis");
        let raw = match self.provider {
            LlmProvider::OpenAi => self.complete_openai(&prompt).await?,
            LlmProvider::Custom => self.complete_custom(&prompt).await?,
        };
        parse_analysis(&raw)
    }

    pub async fn analyze_batch(&self, contents: &[EmailContent]) -> Result<Vec<AnalysisResponse>> {
        try_join_all(contents.iter().map(|content| self.analyze(content))).await
    }

    async fn complete_openai(&self, prompt: &str) -> Result<String> {
        let base = self.base_url.as_deref().unwrap_or(OPENAI_API_BASE);
        let url = format!("{}/chat/completions", base.trim_end_matches('/'));
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": 0.3,
            "response_format": {"type": "json_object"},
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(Error::provider)?
            .error_for_status()
            .map_err(Error::provider)?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(format!("completion payload: {e}")))?;
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                Error::MalformedResponse("completion payload carried no message content".to_string())
            })
    }

    async fn complete_custom(&self, prompt: &str) -> Result<String> {
        let url = self
            .base_url
            .clone()
            .ok_or_else(|| Error::Provider("base URL required for custom LLM provider".to_string()))?;
        let body = json!({"model": self.model, "prompt": prompt});

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(Error::provider)?
            .error_for_status()
            .map_err(Error::provider)?;

        response.text().await.map_err(Error::provider)
    }
}

/// Persist an analyzer verdict onto the stored record.
pub async fn apply_analysis(
    db: &Database,
    message_id: &str,
    analysis: &AnalysisResponse,
) -> Result<EmailRecord> {
    let mut patch = EmailPatch::new(message_id);
    patch.category = Some(analysis.category.clone());
    patch.importance = Some(analysis.importance);
    patch.ai_analysis = Some(analysis.to_email_analysis());
    db.upsert_email(patch).await
}

fn build_prompt(content: &EmailContent) -> String {
    format!(
        "Analyze this email and provide structured information:\n\
         Subject: {}\n\
         From: {}\n\
         Date: {}\n\
         Body: {}\n\n\
         Provide a response in this exact JSON format:\n\
         {{\n\
         \x20 \"type\": \"Type of email (promotional, personal, business, newsletter, etc.)\",\n\
         \x20 \"sentiment\": \"Overall sentiment (positive, negative, neutral)\",\n\
         \x20 \"summary\": \"Brief summary of the content\",\n\
         \x20 \"actionRequired\": true/false,\n\
         \x20 \"importance\": \"Number 1-5, where 5 is highest priority\",\n\
         \x20 \"category\": \"Specific category for organization\"\n\
         }}",
        content.subject, content.from, content.date, content.body
    )
}

/// Validate the analyzer's JSON payload field by field. Models sometimes
/// return `importance` as a quoted number, so both forms are accepted.
fn parse_analysis(raw: &str) -> Result<AnalysisResponse> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| Error::MalformedResponse(format!("analysis payload is not JSON: {e}")))?;

    let field = |name: &str| -> Result<String> {
        value
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                Error::MalformedResponse(format!("analysis payload missing field `{name}`"))
            })
    };

    let action_required = value
        .get("actionRequired")
        .and_then(Value::as_bool)
        .ok_or_else(|| {
            Error::MalformedResponse("analysis payload missing field `actionRequired`".to_string())
        })?;

    let importance = match value.get("importance") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| {
        Error::MalformedResponse("analysis payload missing field `importance`".to_string())
    })?;

    Ok(AnalysisResponse {
        kind: field("type")?,
        sentiment: field("sentiment")?,
        summary: field("summary")?,
        action_required,
        importance: importance.clamp(0, 5),
        category: field("category")?,
    })
}
