//! Marketing workflows: agent runs, post creation, and idea generation.
//!
//! A request flows through prompt building, one completion, extraction of a
//! structured result, and (posts only) a best-effort image request. Nothing is
//! kept between requests.

pub mod extract;
pub mod model;
pub mod prompts;
pub mod routes;
pub mod workflow;

pub use model::{
    AgentResult, AgentWorkflowRequest, AgentWorkflowResponse, CreatePostRequest,
    CreatePostResponse, GenerateIdeasRequest, GenerateIdeasResponse, GenerationRequest, Idea,
    OnboardingData, PostResult,
};
pub use prompts::PromptPair;
pub use routes::{MarketingRouteState, app, marketing_routes};
pub use workflow::MarketingService;
