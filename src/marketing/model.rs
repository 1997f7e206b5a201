//! Request, result, and vocabulary types for the marketing endpoints.
//!
//! All of these are request-scoped: built when a request arrives, dropped when
//! the response is written.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ── Vocabularies ────────────────────────────────────────────────────────

/// A closed vocabulary addressed by string keys on the wire.
pub trait Keyed: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn key(self) -> &'static str;

    /// Look up a variant by its wire key.
    fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL.iter().copied().find(|v| v.key() == key)
    }
}

/// Marketing agent personas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentKind {
    #[default]
    MarketIntelligence,
    ContentGeneration,
    LeadGeneration,
    SocialAutomation,
    AnalyticsOptimization,
}

impl Keyed for AgentKind {
    const ALL: &'static [Self] = &[
        Self::MarketIntelligence,
        Self::ContentGeneration,
        Self::LeadGeneration,
        Self::SocialAutomation,
        Self::AnalyticsOptimization,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::MarketIntelligence => "market-intelligence",
            Self::ContentGeneration => "content-generation",
            Self::LeadGeneration => "lead-generation",
            Self::SocialAutomation => "social-automation",
            Self::AnalyticsOptimization => "analytics-optimization",
        }
    }
}

/// What an agent is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentAction {
    #[default]
    Analyze,
    Generate,
    Optimize,
    Predict,
    Report,
}

impl Keyed for AgentAction {
    const ALL: &'static [Self] = &[
        Self::Analyze,
        Self::Generate,
        Self::Optimize,
        Self::Predict,
        Self::Report,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::Generate => "generate",
            Self::Optimize => "optimize",
            Self::Predict => "predict",
            Self::Report => "report",
        }
    }
}

/// Publishing platform for a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Instagram,
    LinkedIn,
    Twitter,
    Facebook,
    Email,
    Blog,
}

impl Keyed for Platform {
    const ALL: &'static [Self] = &[
        Self::Instagram,
        Self::LinkedIn,
        Self::Twitter,
        Self::Facebook,
        Self::Email,
        Self::Blog,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::LinkedIn => "linkedin",
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::Email => "email",
            Self::Blog => "blog",
        }
    }
}

/// Voice of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Witty,
    Inspirational,
    Educational,
}

impl Keyed for Tone {
    const ALL: &'static [Self] = &[
        Self::Professional,
        Self::Casual,
        Self::Witty,
        Self::Inspirational,
        Self::Educational,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Witty => "witty",
            Self::Inspirational => "inspirational",
            Self::Educational => "educational",
        }
    }
}

/// Idea categories. The wire value `all` means "no constraint" and has no variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdeaCategory {
    Content,
    Social,
    Email,
    Paid,
    Seo,
    Partnership,
}

impl Keyed for IdeaCategory {
    const ALL: &'static [Self] = &[
        Self::Content,
        Self::Social,
        Self::Email,
        Self::Paid,
        Self::Seo,
        Self::Partnership,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Social => "social",
            Self::Email => "email",
            Self::Paid => "paid",
            Self::Seo => "seo",
            Self::Partnership => "partnership",
        }
    }
}

/// Business types collected by the onboarding wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessType {
    Startup,
    Ecommerce,
    Agency,
    Saas,
    Local,
    Creator,
}

impl BusinessType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Startup => "Tech Startup",
            Self::Ecommerce => "E-Commerce Business",
            Self::Agency => "Marketing Agency",
            Self::Saas => "SaaS Company",
            Self::Local => "Local Business",
            Self::Creator => "Content Creator",
        }
    }
}

impl Keyed for BusinessType {
    const ALL: &'static [Self] = &[
        Self::Startup,
        Self::Ecommerce,
        Self::Agency,
        Self::Saas,
        Self::Local,
        Self::Creator,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Ecommerce => "ecommerce",
            Self::Agency => "agency",
            Self::Saas => "saas",
            Self::Local => "local",
            Self::Creator => "creator",
        }
    }
}

/// Implementation effort of an idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Keyed for Difficulty {
    const ALL: &'static [Self] = &[Self::Easy, Self::Medium, Self::Hard];

    fn key(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

// ── Requests ────────────────────────────────────────────────────────────

/// Body of `agent-workflow`. Unknown agent types and actions fall back to
/// their defaults when prompts are built; the raw strings are echoed back.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentWorkflowRequest {
    #[serde(default)]
    pub agent_type: String,
    #[serde(default)]
    pub action: String,
    /// Free-form caller context. Any JSON value is accepted.
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

impl AgentWorkflowRequest {
    pub fn agent_kind(&self) -> AgentKind {
        AgentKind::from_key(&self.agent_type).unwrap_or_default()
    }

    pub fn agent_action(&self) -> AgentAction {
        AgentAction::from_key(&self.action).unwrap_or_default()
    }
}

/// Body of `create-post`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[serde(default)]
    pub idea_title: String,
    #[serde(default)]
    pub idea_content: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub tone: String,
}

impl CreatePostRequest {
    /// Title, content and platform must all be present.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.idea_title.trim().is_empty()
            || self.idea_content.trim().is_empty()
            || self.platform.trim().is_empty()
        {
            return Err(ApiError::Validation("missing required fields".to_string()));
        }
        Ok(())
    }

    pub fn platform_kind(&self) -> Platform {
        Platform::from_key(&self.platform).unwrap_or_default()
    }

    pub fn tone_kind(&self) -> Tone {
        Tone::from_key(&self.tone).unwrap_or_default()
    }
}

/// Business profile gathered by onboarding.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingData {
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub timeline: String,
}

impl OnboardingData {
    /// Human-readable business label, or the raw value when unknown.
    pub fn business_label(&self) -> &str {
        match BusinessType::from_key(&self.business_type) {
            Some(kind) => kind.label(),
            None => &self.business_type,
        }
    }
}

/// Body of `generate-ideas`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateIdeasRequest {
    #[serde(default)]
    pub onboarding_data: Option<OnboardingData>,
    #[serde(default)]
    pub category: Option<String>,
}

impl GenerateIdeasRequest {
    /// The onboarding profile with a business type is required.
    pub fn validate(&self) -> Result<&OnboardingData, ApiError> {
        match &self.onboarding_data {
            Some(data) if !data.business_type.trim().is_empty() => Ok(data),
            _ => Err(ApiError::Validation(
                "missing onboarding data".to_string(),
            )),
        }
    }

    /// Category constraint, if any. `all`, blank and unknown values mean none.
    pub fn category_filter(&self) -> Option<IdeaCategory> {
        self.category.as_deref().and_then(IdeaCategory::from_key)
    }
}

/// Any of the three generation requests, borrowed for prompt building.
#[derive(Debug, Clone, Copy)]
pub enum GenerationRequest<'a> {
    AgentWorkflow(&'a AgentWorkflowRequest),
    CreatePost(&'a CreatePostRequest),
    GenerateIdeas(&'a GenerateIdeasRequest),
}

// ── Results ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResult {
    pub summary: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResult {
    pub headline: String,
    pub content: String,
    pub hashtags: Vec<String>,
    pub call_to_action: String,
    pub tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Idea {
    pub id: String,
    pub title: String,
    pub content: String,
    pub hook: String,
    pub category: String,
    pub engagement: String,
    pub difficulty: String,
    pub timeframe: String,
}

// ── Response envelopes ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentWorkflowResponse {
    pub success: bool,
    pub agent_type: String,
    pub action: String,
    pub result: AgentResult,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostResponse {
    pub success: bool,
    pub platform: String,
    pub post: PostResult,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateIdeasResponse {
    pub ideas: Vec<Idea>,
}

/// Current UTC time as RFC 3339 with millisecond precision.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
