//! Reaction scoring: how a recruiter, investor, date or networking contact
//! might react to a headshot.
//!
//! The LLM reply is free text. A score is pulled out of it with a regular
//! expression and traits are matched against a fixed adjective list; when no
//! score is present a random one in `[7, 10)` stands in.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lower bound (inclusive) of the substitute score.
pub const FALLBACK_SCORE_MIN: f32 = 7.0;

/// Upper bound (exclusive) of the substitute score.
pub const FALLBACK_SCORE_MAX: f32 = 10.0;

/// Adjectives recognised as traits in a reaction.
pub const TRAIT_KEYWORDS: [&str; 8] = [
    "professional",
    "confident",
    "approachable",
    "trustworthy",
    "friendly",
    "competent",
    "charismatic",
    "authentic",
];

static SCORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:/|out\s+of)\s*10\b").expect("valid regex")
});

// ---------------------------------------------------------------------------
// Reaction types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Recruiter,
    Investor,
    Dating,
    Networking,
}

impl ReactionType {
    pub const ALL: [ReactionType; 4] = [
        ReactionType::Recruiter,
        ReactionType::Investor,
        ReactionType::Dating,
        ReactionType::Networking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReactionType::Recruiter => "recruiter",
            ReactionType::Investor => "investor",
            ReactionType::Dating => "dating",
            ReactionType::Networking => "networking",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "recruiter" => Ok(ReactionType::Recruiter),
            "investor" => Ok(ReactionType::Investor),
            "dating" => Ok(ReactionType::Dating),
            "networking" => Ok(ReactionType::Networking),
            other => Err(CoreError::Validation(format!(
                "Unknown reaction type '{other}'"
            ))),
        }
    }

    /// Who is reacting, as shown to the user.
    pub fn persona(self) -> &'static str {
        match self {
            ReactionType::Recruiter => "a senior tech recruiter",
            ReactionType::Investor => "a venture capital investor",
            ReactionType::Dating => "a potential match on a dating app",
            ReactionType::Networking => "a professional at a networking event",
        }
    }

    /// Canned line used when the completion call fails.
    pub fn canned_reaction(self) -> &'static str {
        match self {
            ReactionType::Recruiter => {
                "This headshot reads as polished and professional. I'd be comfortable \
                 putting this candidate in front of a hiring manager."
            }
            ReactionType::Investor => {
                "A confident, trustworthy first impression. This founder looks ready \
                 for the pitch meeting."
            }
            ReactionType::Dating => {
                "Warm smile, approachable vibe. This profile would definitely get a \
                 second look."
            }
            ReactionType::Networking => {
                "Friendly and competent. I'd happily start a conversation and swap \
                 contact details."
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Prompt building
// ---------------------------------------------------------------------------

/// Optional facts about the user that sharpen the prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub name: Option<String>,
    pub profession: Option<String>,
    pub industry: Option<String>,
    pub goals: Option<String>,
}

/// Everything a prompt is built from.
#[derive(Debug, Clone)]
pub struct ReactionContext {
    pub headshot_url: String,
    pub theme: Option<String>,
    pub profile: UserProfile,
}

/// Build the fixed prompt for one reaction type.
pub fn build_prompt(kind: ReactionType, ctx: &ReactionContext) -> String {
    let mut about = Vec::new();
    if let Some(name) = non_empty(&ctx.profile.name) {
        about.push(format!("Their name is {name}."));
    }
    if let Some(profession) = non_empty(&ctx.profile.profession) {
        about.push(format!("They work as {profession}."));
    }
    if let Some(industry) = non_empty(&ctx.profile.industry) {
        about.push(format!("Their industry is {industry}."));
    }
    if let Some(goals) = non_empty(&ctx.profile.goals) {
        about.push(format!("Their goal is: {goals}."));
    }
    let about = if about.is_empty() {
        String::new()
    } else {
        format!(" {}", about.join(" "))
    };
    let theme = non_empty(&ctx.theme)
        .map(|t| format!(" The headshot was shot in a {t} style."))
        .unwrap_or_default();

    let focus = match kind {
        ReactionType::Recruiter => {
            "Would you call this candidate in for an interview based on the photo? \
             Comment on professionalism and presence."
        }
        ReactionType::Investor => {
            "Does this person look like a founder you would trust with your money? \
             Comment on credibility and leadership."
        }
        ReactionType::Dating => {
            "Would you swipe right? Comment on warmth, approachability and attraction."
        }
        ReactionType::Networking => {
            "Would you want to connect with this person? Comment on friendliness and \
             memorability."
        }
    };

    format!(
        "You are {persona}. Look at this headshot: {url}.{theme}{about} {focus} \
         Reply in two or three sentences, in first person, and finish with a rating \
         in the form \"X/10\".",
        persona = kind.persona(),
        url = ctx.headshot_url,
    )
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Pull the first `<n>/10` or `<n> out of 10` rating (0..=10) out of `text`.
pub fn parse_score(text: &str) -> Option<f32> {
    SCORE_PATTERN
        .captures_iter(text)
        .filter_map(|c| c.get(1)?.as_str().parse::<f32>().ok())
        .find(|score| (0.0..=10.0).contains(score))
}

/// Trait keywords present in `text`, in [`TRAIT_KEYWORDS`] order.
pub fn extract_traits(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TRAIT_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(*kw))
        .map(|kw| (*kw).to_string())
        .collect()
}

/// Uniformly random score in `[7, 10)`, truncated to one decimal place.
pub fn fallback_score<R: Rng>(rng: &mut R) -> f32 {
    let raw: f32 = rng.random_range(FALLBACK_SCORE_MIN..FALLBACK_SCORE_MAX);
    (raw * 10.0).floor() / 10.0
}
