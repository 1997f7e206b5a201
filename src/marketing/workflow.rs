//! Request orchestration: validate, prompt, complete, extract, and (for
//! posts) attach an image.
//!
//! Validation failures return before any LLM call. The only awaits are the
//! completion and, for posts, the image request that follows it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::extract::{self, truncate_chars};
use super::model::{
    AgentResult, AgentWorkflowRequest, AgentWorkflowResponse, CreatePostRequest,
    CreatePostResponse, GenerateIdeasRequest, GenerateIdeasResponse, GenerationRequest, PostResult,
    timestamp_now,
};
use super::prompts::{self, PromptPair};
use crate::error::{ApiError, LlmError};
use crate::llm::{
    ChatMessage, CompletionRequest, ImageProvider, ImageRequest, LlmProvider, Sampling,
};

pub const AGENT_SAMPLING: Sampling = Sampling::new(0.7, 1500);
pub const POST_SAMPLING: Sampling = Sampling::new(0.8, 1500);
pub const IDEAS_SAMPLING: Sampling = Sampling::new(0.8, 2000);

/// Longest slice of raw model output written to the debug log.
const LOG_PREVIEW_CHARS: usize = 500;

/// Runs the three marketing workflows against injected providers.
pub struct MarketingService {
    llm: Arc<dyn LlmProvider>,
    images: Option<Arc<dyn ImageProvider>>,
}

impl MarketingService {
    /// `images` is `None` when image generation is disabled.
    pub fn new(llm: Arc<dyn LlmProvider>, images: Option<Arc<dyn ImageProvider>>) -> Self {
        Self { llm, images }
    }

    /// Run one agent persona against the caller's context.
    pub async fn run_agent_workflow(
        &self,
        request: AgentWorkflowRequest,
    ) -> Result<AgentWorkflowResponse, ApiError> {
        info!(
            agent_type = %request.agent_type,
            action = %request.action,
            "Agent workflow request"
        );

        let prompts = prompts::build(GenerationRequest::AgentWorkflow(&request));
        let raw = self.complete(prompts, AGENT_SAMPLING).await?;
        let result = AgentResult::from_completion(&raw);

        Ok(AgentWorkflowResponse {
            success: true,
            agent_type: request.agent_type,
            action: request.action,
            result,
            timestamp: timestamp_now(),
        })
    }

    /// Turn an idea into a post, then try to illustrate it.
    pub async fn create_post(
        &self,
        request: CreatePostRequest,
    ) -> Result<CreatePostResponse, ApiError> {
        request.validate()?;

        info!(
            idea_title = %request.idea_title,
            platform = %request.platform,
            tone = %request.tone,
            "Creating post"
        );

        let prompts = prompts::build(GenerationRequest::CreatePost(&request));
        let raw = self.complete(prompts, POST_SAMPLING).await?;
        let mut post = PostResult::from_completion(&raw, request.idea_title.trim());

        self.attach_image(&mut post, &request).await;

        Ok(CreatePostResponse {
            success: true,
            platform: request.platform,
            post,
            timestamp: timestamp_now(),
        })
    }

    /// Generate exactly six ideas for an onboarding profile.
    pub async fn generate_ideas(
        &self,
        request: GenerateIdeasRequest,
    ) -> Result<GenerateIdeasResponse, ApiError> {
        let data = request.validate()?;

        info!(
            business_type = %data.business_type,
            goals = data.goals.len(),
            channels = data.channels.len(),
            category = ?request.category,
            "Generating ideas"
        );

        let prompts = prompts::build(GenerationRequest::GenerateIdeas(&request));
        let raw = self.complete(prompts, IDEAS_SAMPLING).await?;
        let ideas = extract::parse_ideas(&raw, request.category_filter()).inspect_err(|e| {
            warn!(error = %e, raw = %truncate_chars(&raw, LOG_PREVIEW_CHARS), "Idea list rejected");
        })?;

        info!(count = ideas.len(), "Generated ideas");
        Ok(GenerateIdeasResponse { ideas })
    }

    async fn complete(&self, prompts: PromptPair, sampling: Sampling) -> Result<String, LlmError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(prompts.system_prompt),
            ChatMessage::user(prompts.user_prompt),
        ])
        .with_temperature(sampling.temperature)
        .with_max_tokens(sampling.max_tokens);

        let response = self.llm.complete(request).await?;
        debug!(
            model = self.llm.model_name(),
            raw = %truncate_chars(&response.content, LOG_PREVIEW_CHARS),
            "Raw completion"
        );
        Ok(response.content)
    }

    /// Best-effort: any failure is logged and leaves `image_url` empty.
    async fn attach_image(&self, post: &mut PostResult, request: &CreatePostRequest) {
        let Some(images) = &self.images else {
            return;
        };

        let prompt = post.image_prompt.clone().unwrap_or_else(|| {
            prompts::fallback_image_prompt(request.idea_title.trim(), request.platform.trim())
        });
        debug!(prompt = %prompt, "Generating image");

        match images.generate_image(ImageRequest::new(prompt)).await {
            Ok(image) => {
                info!("Image generated successfully");
                post.image_url = Some(image.url);
            }
            Err(e) => {
                warn!(error = %e, idea_title = %request.idea_title, "Image generation failed, returning post without image");
            }
        }
    }
}
