//! Prompt construction for the three marketing endpoints.
//!
//! Everything here is pure: a request maps to exactly one [`PromptPair`].

use super::model::{
    AgentAction, AgentKind, AgentWorkflowRequest, CreatePostRequest, GenerateIdeasRequest,
    GenerationRequest, IdeaCategory, Keyed, Platform, Tone,
};

/// Number of ideas the model is asked for (and that a response must contain).
pub const IDEA_COUNT: usize = 6;

/// System and user prompt for one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system_prompt: String,
    pub user_prompt: String,
}

/// Build the prompts for any generation request.
pub fn build(request: GenerationRequest<'_>) -> PromptPair {
    match request {
        GenerationRequest::AgentWorkflow(req) => agent_prompts(req),
        GenerationRequest::CreatePost(req) => post_prompts(req),
        GenerationRequest::GenerateIdeas(req) => idea_prompts(req),
    }
}

// ── agent-workflow ──────────────────────────────────────────────────────

fn agent_system_prompt(kind: AgentKind) -> &'static str {
    match kind {
        AgentKind::MarketIntelligence => {
            "You are a Market Intelligence Agent. Analyze market trends, identify competitor \
             insights, and discover opportunities. Provide data-driven insights with actionable \
             recommendations."
        }
        AgentKind::ContentGeneration => {
            "You are a Content Generation Agent. Create compelling marketing content tailored to \
             the target audience. Focus on engagement, brand voice consistency, and conversion \
             optimization."
        }
        AgentKind::LeadGeneration => {
            "You are a Lead Generation Agent. Identify potential leads, create outreach \
             strategies, and develop lead scoring criteria. Focus on quality over quantity."
        }
        AgentKind::SocialAutomation => {
            "You are a Social Media Automation Agent. Plan content calendars, suggest optimal \
             posting times, and create engagement strategies across platforms."
        }
        AgentKind::AnalyticsOptimization => {
            "You are an Analytics & Optimization Agent. Analyze performance metrics, identify \
             trends, and provide data-driven recommendations for improvement."
        }
    }
}

fn action_instruction(action: AgentAction) -> &'static str {
    match action {
        AgentAction::Analyze => "Perform a comprehensive analysis and provide detailed insights.",
        AgentAction::Generate => "Generate content or strategies based on the provided context.",
        AgentAction::Optimize => {
            "Suggest optimizations and improvements based on current performance."
        }
        AgentAction::Predict => "Provide predictions and forecasts based on available data.",
        AgentAction::Report => "Create a summary report with key metrics and recommendations.",
    }
}

/// Prompts for an agent run. The caller's context is embedded as pretty JSON.
fn agent_prompts(request: &AgentWorkflowRequest) -> PromptPair {
    let context = match &request.context {
        None | Some(serde_json::Value::Null) => "{}".to_string(),
        Some(value) => serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string()),
    };

    let user_prompt = format!(
        "{instruction}\n\n\
         Context:\n\
         {context}\n\n\
         Provide a structured response with:\n\
         1. Summary (2-3 sentences)\n\
         2. Key Insights (3-5 bullet points)\n\
         3. Recommendations (3 actionable items)\n\
         4. Next Steps (what to do immediately)\n\n\
         Format your response as JSON with keys: summary, insights (array), \
         recommendations (array), nextSteps (array).",
        instruction = action_instruction(request.agent_action()),
    );

    PromptPair {
        system_prompt: agent_system_prompt(request.agent_kind()).to_string(),
        user_prompt,
    }
}

// ── create-post ─────────────────────────────────────────────────────────

fn platform_guide(platform: Platform) -> &'static str {
    match platform {
        Platform::Instagram => {
            "Instagram post with engaging caption, relevant hashtags (5-10), and emoji usage. \
             Keep caption under 2200 characters."
        }
        Platform::LinkedIn => {
            "LinkedIn post that is professional yet engaging. Use line breaks for readability. \
             Include a call-to-action."
        }
        Platform::Twitter => {
            "Twitter/X post under 280 characters. Punchy, memorable, with 1-2 relevant hashtags."
        }
        Platform::Facebook => {
            "Facebook post that encourages engagement and sharing. Can be longer form with \
             storytelling."
        }
        Platform::Email => {
            "Email marketing copy with a compelling subject line, preview text, body content, \
             and clear CTA."
        }
        Platform::Blog => {
            "Blog post outline with headline, subheadings, key points, and SEO considerations."
        }
    }
}

fn tone_guide(tone: Tone) -> &'static str {
    match tone {
        Tone::Professional => {
            "Maintain a professional, authoritative tone. Use industry terminology appropriately."
        }
        Tone::Casual => {
            "Keep it friendly and conversational. Use contractions and relatable language."
        }
        Tone::Witty => {
            "Add humor and cleverness. Use wordplay and pop culture references where appropriate."
        }
        Tone::Inspirational => "Be motivational and uplifting. Use powerful, emotive language.",
        Tone::Educational => "Focus on teaching and informing. Be clear and structured.",
    }
}

/// Prompts for turning an idea into a platform-ready post.
fn post_prompts(request: &CreatePostRequest) -> PromptPair {
    let system_prompt = format!(
        "You are an expert social media and content marketing specialist. Create compelling, \
         platform-optimized content that drives engagement.\n\n\
         Platform guidelines: {platform}\n\
         Tone: {tone}\n\n\
         Return your response as JSON with:\n\
         - headline: The main headline or hook (if applicable)\n\
         - content: The full post content\n\
         - hashtags: Array of relevant hashtags (without #)\n\
         - callToAction: A suggested call-to-action\n\
         - tips: Array of 2-3 tips for maximizing engagement with this post\n\
         - imagePrompt: A detailed prompt for generating an image that would accompany this \
         post (describe the visual style, colors, elements)",
        platform = platform_guide(request.platform_kind()),
        tone = tone_guide(request.tone_kind()),
    );

    let platform = request.platform.trim();
    let user_prompt = format!(
        "Create a {platform} post based on this marketing idea:\n\n\
         Title: {title}\n\
         Concept: {concept}\n\n\
         Generate engaging, ready-to-publish content optimized for {platform}. Also provide an \
         image prompt that would create a visually stunning image to accompany this post.",
        title = request.idea_title.trim(),
        concept = request.idea_content.trim(),
    );

    PromptPair {
        system_prompt,
        user_prompt,
    }
}

/// Image prompt used when the model did not supply one.
pub fn fallback_image_prompt(idea_title: &str, platform: &str) -> String {
    format!(
        "Professional marketing visual for: {idea_title}. Modern, clean design with vibrant \
         colors, suitable for {platform}."
    )
}

// ── generate-ideas ──────────────────────────────────────────────────────

fn idea_system_prompt() -> String {
    let categories = IdeaCategory::ALL
        .iter()
        .map(|c| format!("\"{}\"", c.key()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are TACTIX, an elite AI marketing strategist. Generate creative, actionable \
         marketing ideas tailored to the user's business profile. Each idea should be specific, \
         implementable, and include engagement predictions.\n\n\
         Return your response as a JSON array with exactly {IDEA_COUNT} marketing ideas. Each \
         idea must have:\n\
         - id: unique string identifier\n\
         - title: catchy, action-oriented title (max 8 words)\n\
         - content: detailed explanation of the strategy (2-3 sentences)\n\
         - hook: a compelling opening line or hook to grab attention\n\
         - category: one of {categories}\n\
         - engagement: predicted engagement level as percentage string (e.g., \"+45%\")\n\
         - difficulty: one of \"Easy\", \"Medium\", \"Hard\"\n\
         - timeframe: estimated time to implement (e.g., \"2-3 days\", \"1 week\")\n\n\
         Be creative, specific to their business type, and focus on modern marketing trends."
    )
}

/// Prompts for the idea list, built from the onboarding profile.
fn idea_prompts(request: &GenerateIdeasRequest) -> PromptPair {
    let data = request.onboarding_data.clone().unwrap_or_default();

    let category_filter = match request.category_filter() {
        Some(category) => format!("Focus specifically on {} strategies.", category.key()),
        None => String::new(),
    };

    let user_prompt = format!(
        "Generate marketing ideas for:\n\
         - Business Type: {business}\n\
         - Goals: {goals}\n\
         - Preferred Channels: {channels}\n\
         - Budget: {budget}\n\
         - Timeline: {timeline}\n\n\
         {category_filter}\n\n\
         Generate {IDEA_COUNT} unique, creative marketing ideas that align with their goals and \
         budget.",
        business = data.business_label(),
        goals = data.goals.join(", "),
        channels = data.channels.join(", "),
        budget = data.budget,
        timeline = data.timeline,
    );

    PromptPair {
        system_prompt: idea_system_prompt(),
        user_prompt,
    }
}
