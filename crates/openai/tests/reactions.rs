//! Reaction generation against a stubbed chat completions endpoint.

use assert_matches::assert_matches;
use headshots_core::reaction::{ReactionContext, ReactionType, UserProfile};
use headshots_core::sourced::Sourced;
use headshots_openai::{ChatClient, ChatError, OpenAiConfig, ReactionGenerator};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ctx() -> ReactionContext {
    ReactionContext {
        headshot_url: "https://cdn.example.com/h1.png".into(),
        theme: Some("professional".into()),
        profile: UserProfile::default(),
    }
}

fn completion(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": text } }]
    }))
}

fn generator_for(server: &MockServer) -> ReactionGenerator {
    ReactionGenerator::new(ChatClient::new(OpenAiConfig::with_url("sk-test", server.uri())))
}

#[tokio::test]
async fn complete_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_string_contains("gpt-4o-mini"))
        .respond_with(completion("  Looks sharp. 8/10  "))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(OpenAiConfig::with_url("sk-test", server.uri()));
    let text = client.complete("system", "user", 50, 0.2).await.unwrap();
    assert_eq!(text, "Looks sharp. 8/10");
}

#[tokio::test]
async fn complete_maps_error_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let client = ChatClient::new(OpenAiConfig::with_url("sk-test", server.uri()));
    assert_matches!(
        client.complete("s", "u", 10, 0.0).await,
        Err(ChatError::RateLimited)
    );
    assert_matches!(
        client.complete("s", "u", 10, 0.0).await,
        Err(ChatError::Api { status: 401, body }) if body == "bad key"
    );
}

#[tokio::test]
async fn reactions_parse_score_and_traits() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("venture capital investor"))
        .respond_with(completion("Confident and trustworthy. I'd take the meeting. 9 out of 10."))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("senior tech recruiter"))
        .respond_with(completion("Very professional. 8.5/10"))
        .mount(&server)
        .await;

    let reactions = generator_for(&server)
        .generate(&ctx(), &[ReactionType::Recruiter, ReactionType::Investor])
        .await;

    assert_eq!(reactions.len(), 2);
    assert_matches!(&reactions[0], Sourced::Real(r) => {
        assert_eq!(r.kind, ReactionType::Recruiter);
        assert_eq!(r.score, 8.5);
        assert_eq!(r.traits, vec!["professional"]);
    });
    assert_matches!(&reactions[1], Sourced::Real(r) => {
        assert_eq!(r.score, 9.0);
        assert_eq!(r.traits, vec!["confident", "trustworthy"]);
    });
}

#[tokio::test]
async fn missing_score_is_substituted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion("Friendly smile, I'd say hello."))
        .mount(&server)
        .await;

    let reactions = generator_for(&server)
        .generate(&ctx(), &[ReactionType::Networking])
        .await;

    assert_matches!(&reactions[0], Sourced::Real(r) => {
        assert!((7.0..10.0).contains(&r.score));
        assert_eq!(r.traits, vec!["friendly"]);
    });
}

#[tokio::test]
async fn failed_completion_uses_canned_reaction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let reactions = generator_for(&server).generate(&ctx(), &[]).await;

    assert_eq!(reactions.len(), ReactionType::ALL.len());
    for (reaction, kind) in reactions.iter().zip(ReactionType::ALL) {
        assert!(reaction.is_simulated());
        let r = reaction.as_ref().into_inner();
        assert_eq!(r.kind, kind);
        assert_eq!(r.reaction, kind.canned_reaction());
        assert!((7.0..10.0).contains(&r.score));
    }
}

#[test]
fn reaction_serializes_type_field() {
    let reaction = headshots_openai::Reaction {
        kind: ReactionType::Dating,
        persona: "p".into(),
        reaction: "r".into(),
        score: 7.5,
        traits: vec![],
    };
    let json = serde_json::to_value(&reaction).unwrap();
    assert_eq!(json["type"], "dating");
    assert_eq!(json["score"], 7.5);
}
