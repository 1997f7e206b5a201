//! Recover structured results from free-form model output.
//!
//! Model text is first parsed into an untyped [`serde_json::Value`], then
//! projected field by field into the typed result. Anything missing or of the
//! wrong type gets a fixed fallback, so agent and post results always come out
//! complete. Idea lists are the exception: a list we cannot trust is an error.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

use super::model::{AgentResult, Difficulty, Idea, IdeaCategory, Keyed, PostResult};
use super::prompts::IDEA_COUNT;
use crate::error::ParseError;

/// Characters of raw text kept as the summary of an unparseable agent reply.
pub const SUMMARY_FALLBACK_CHARS: usize = 200;

/// Characters of raw text kept as the content of an unparseable post reply.
pub const CONTENT_FALLBACK_CHARS: usize = 2200;

pub const FALLBACK_INSIGHT: &str = "Analysis completed successfully";
pub const FALLBACK_RECOMMENDATION: &str = "Review the detailed response";
pub const FALLBACK_NEXT_STEP: &str = "Implement suggested changes";
pub const FALLBACK_HASHTAG: &str = "marketing";
pub const FALLBACK_CALL_TO_ACTION: &str = "Learn more";
pub const FALLBACK_TIP: &str = "Engage with comments";
pub const FALLBACK_ENGAGEMENT: &str = "+0%";
pub const FALLBACK_TIMEFRAME: &str = "1 week";

// Greedy: first opening bracket to the last closing one.
static OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("object pattern is valid"));
static ARRAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("array pattern is valid"));

/// Find and parse the outermost JSON object in `raw`.
pub fn extract_json_object(raw: &str) -> Result<Map<String, Value>, ParseError> {
    let found = OBJECT_RE
        .find(raw)
        .ok_or(ParseError::NoJson { expected: "object" })?;
    match serde_json::from_str::<Value>(found.as_str())? {
        Value::Object(map) => Ok(map),
        _ => Err(ParseError::NoJson { expected: "object" }),
    }
}

/// Find and parse the outermost JSON array in `raw`.
pub fn extract_json_array(raw: &str) -> Result<Vec<Value>, ParseError> {
    let found = ARRAY_RE
        .find(raw)
        .ok_or(ParseError::NoJson { expected: "array" })?;
    match serde_json::from_str::<Value>(found.as_str())? {
        Value::Array(items) => Ok(items),
        _ => Err(ParseError::NoJson { expected: "array" }),
    }
}

/// First `max` characters of `text` (not bytes).
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

// ── Field projection ────────────────────────────────────────────────────

/// First non-blank string under any of `keys`.
fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// First array under any of `keys`, keeping only its string entries.
fn string_list(obj: &Map<String, Value>, keys: &[&str]) -> Option<Vec<String>> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find_map(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
}

fn placeholder(text: &str) -> Vec<String> {
    vec![text.to_string()]
}

// ── Agent results ───────────────────────────────────────────────────────

impl AgentResult {
    /// Project model output into an agent result. Never fails.
    pub fn from_completion(raw: &str) -> Self {
        match extract_json_object(raw) {
            Ok(obj) => Self::from_object(&obj, raw),
            Err(e) => {
                warn!(error = %e, "Agent response was not JSON, using text fallback");
                Self::fallback(raw)
            }
        }
    }

    fn from_object(obj: &Map<String, Value>, raw: &str) -> Self {
        Self {
            summary: string_field(obj, &["summary"])
                .unwrap_or_else(|| truncate_chars(raw, SUMMARY_FALLBACK_CHARS)),
            insights: string_list(obj, &["insights", "keyInsights"])
                .unwrap_or_else(|| placeholder(FALLBACK_INSIGHT)),
            recommendations: string_list(obj, &["recommendations"])
                .unwrap_or_else(|| placeholder(FALLBACK_RECOMMENDATION)),
            next_steps: string_list(obj, &["nextSteps", "next_steps"])
                .unwrap_or_else(|| placeholder(FALLBACK_NEXT_STEP)),
        }
    }

    /// Result built from raw text alone.
    pub fn fallback(raw: &str) -> Self {
        Self {
            summary: truncate_chars(raw, SUMMARY_FALLBACK_CHARS),
            insights: placeholder(FALLBACK_INSIGHT),
            recommendations: placeholder(FALLBACK_RECOMMENDATION),
            next_steps: placeholder(FALLBACK_NEXT_STEP),
        }
    }
}

// ── Post results ────────────────────────────────────────────────────────

fn fallback_post_image_prompt(idea_title: &str) -> String {
    format!("Marketing visual for {idea_title}: modern, professional, engaging design")
}

impl PostResult {
    /// Project model output into a post. Never fails; `image_url` is left empty.
    pub fn from_completion(raw: &str, idea_title: &str) -> Self {
        match extract_json_object(raw) {
            Ok(obj) => Self::from_object(&obj, raw, idea_title),
            Err(e) => {
                warn!(error = %e, idea_title = idea_title, "Post response was not JSON, using text fallback");
                Self::fallback(raw, idea_title)
            }
        }
    }

    fn from_object(obj: &Map<String, Value>, raw: &str, idea_title: &str) -> Self {
        let hashtags = string_list(obj, &["hashtags"]).map(|tags| {
            tags.into_iter()
                .map(|t| t.trim_start_matches('#').to_string())
                .filter(|t| !t.is_empty())
                .collect()
        });

        Self {
            headline: string_field(obj, &["headline", "title"])
                .unwrap_or_else(|| idea_title.to_string()),
            content: string_field(obj, &["content", "body"])
                .unwrap_or_else(|| truncate_chars(raw, CONTENT_FALLBACK_CHARS)),
            hashtags: hashtags.unwrap_or_else(|| placeholder(FALLBACK_HASHTAG)),
            call_to_action: string_field(obj, &["callToAction", "call_to_action", "cta"])
                .unwrap_or_else(|| FALLBACK_CALL_TO_ACTION.to_string()),
            tips: string_list(obj, &["tips"]).unwrap_or_else(|| placeholder(FALLBACK_TIP)),
            image_prompt: string_field(obj, &["imagePrompt", "image_prompt"]),
            image_url: None,
        }
    }

    /// Post built from raw text alone.
    pub fn fallback(raw: &str, idea_title: &str) -> Self {
        Self {
            headline: idea_title.to_string(),
            content: truncate_chars(raw, CONTENT_FALLBACK_CHARS),
            hashtags: placeholder(FALLBACK_HASHTAG),
            call_to_action: FALLBACK_CALL_TO_ACTION.to_string(),
            tips: placeholder(FALLBACK_TIP),
            image_prompt: Some(fallback_post_image_prompt(idea_title)),
            image_url: None,
        }
    }
}

// ── Idea lists ──────────────────────────────────────────────────────────

/// Parse exactly [`IDEA_COUNT`] ideas out of model output.
///
/// Unlike the single-object results this never fabricates content: no array,
/// malformed JSON, or too few usable ideas is a [`ParseError`].
pub fn parse_ideas(raw: &str, requested: Option<IdeaCategory>) -> Result<Vec<Idea>, ParseError> {
    let items = extract_json_array(raw)?;

    let ideas: Vec<Idea> = items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|obj| project_idea(obj, requested))
        .take(IDEA_COUNT)
        .collect();

    if ideas.len() < IDEA_COUNT {
        return Err(ParseError::TooFewIdeas {
            expected: IDEA_COUNT,
            found: ideas.len(),
        });
    }
    Ok(ideas)
}

/// An idea needs a title and content; every other field has a fallback.
fn project_idea(obj: &Map<String, Value>, requested: Option<IdeaCategory>) -> Option<Idea> {
    let title = string_field(obj, &["title"])?;
    let content = string_field(obj, &["content", "description"])?;

    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => Uuid::new_v4().to_string(),
    };

    let category = string_field(obj, &["category"])
        .and_then(|c| IdeaCategory::from_key(&c.to_ascii_lowercase()))
        .or(requested)
        .unwrap_or(IdeaCategory::Content);

    let difficulty = string_field(obj, &["difficulty"])
        .and_then(|d| {
            Difficulty::ALL
                .iter()
                .copied()
                .find(|v| v.key().eq_ignore_ascii_case(&d))
        })
        .unwrap_or_default();

    Some(Idea {
        id,
        hook: string_field(obj, &["hook"]).unwrap_or_else(|| title.clone()),
        title,
        content,
        category: category.key().to_string(),
        engagement: string_field(obj, &["engagement"])
            .unwrap_or_else(|| FALLBACK_ENGAGEMENT.to_string()),
        difficulty: difficulty.key().to_string(),
        timeframe: string_field(obj, &["timeframe"])
            .unwrap_or_else(|| FALLBACK_TIMEFRAME.to_string()),
    })
}
