//! Reactions to a headshot from several imagined viewers.

use futures::future::join_all;
use headshots_core::reaction::{
    build_prompt, extract_traits, fallback_score, parse_score, ReactionContext, ReactionType,
};
use headshots_core::sourced::Sourced;
use serde::Serialize;

use crate::client::ChatClient;

const SYSTEM_PROMPT: &str = "You give short, honest first impressions of profile photos. \
     Stay in character and always end with a rating out of 10.";

const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    #[serde(rename = "type")]
    pub kind: ReactionType,
    pub persona: String,
    pub reaction: String,
    pub score: f32,
    pub traits: Vec<String>,
}

pub struct ReactionGenerator {
    client: ChatClient,
}

impl ReactionGenerator {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }

    /// One reaction per requested type, in request order.
    ///
    /// An empty `kinds` list means every type. Completions run concurrently;
    /// a failed one is replaced by the type's canned line.
    pub async fn generate(
        &self,
        ctx: &ReactionContext,
        kinds: &[ReactionType],
    ) -> Vec<Sourced<Reaction>> {
        let kinds: &[ReactionType] = if kinds.is_empty() {
            &ReactionType::ALL
        } else {
            kinds
        };
        join_all(kinds.iter().map(|kind| self.react(*kind, ctx))).await
    }

    async fn react(&self, kind: ReactionType, ctx: &ReactionContext) -> Sourced<Reaction> {
        let prompt = build_prompt(kind, ctx);
        match self
            .client
            .complete(SYSTEM_PROMPT, &prompt, MAX_TOKENS, TEMPERATURE)
            .await
        {
            Ok(text) => {
                let score = match parse_score(&text) {
                    Some(score) => score,
                    None => {
                        tracing::debug!(kind = kind.as_str(), "No score in completion, substituting");
                        fallback_score(&mut rand::rng())
                    }
                };
                Sourced::Real(Reaction {
                    kind,
                    persona: kind.persona().to_string(),
                    traits: extract_traits(&text),
                    reaction: text,
                    score,
                })
            }
            Err(e) => {
                tracing::warn!(kind = kind.as_str(), error = %e, "Reaction completion failed, using canned reaction");
                let text = kind.canned_reaction();
                Sourced::Simulated(Reaction {
                    kind,
                    persona: kind.persona().to_string(),
                    reaction: text.to_string(),
                    score: fallback_score(&mut rand::rng()),
                    traits: extract_traits(text),
                })
            }
        }
    }
}
