use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use partneros_core::{ObjectiveType, SignalType};
use partneros_llm::{LlmError, OfflineTextService};
use uuid::Uuid;

use super::*;

enum Behavior {
    Respond(f64, &'static str),
    Fail,
    Hang,
}

struct FakeGenerator {
    behavior: Behavior,
    calls: AtomicUsize,
    last_request: Mutex<Option<SynthesisRequest>>,
}

impl FakeGenerator {
    fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }
}

#[async_trait]
impl InsightGenerator for FakeGenerator {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesisResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match self.behavior {
            Behavior::Respond(score, draft) => Ok(SynthesisResponse {
                why: "Generated why.".to_owned(),
                score,
                recommendation: "Generated recommendation.".to_owned(),
                actions: vec![SuggestedAction {
                    label: "Email the marketplace team".to_owned(),
                    owner_hint: "Alliances Lead".to_owned(),
                    due_in_days: 3,
                }],
                outreach_draft: draft.to_owned(),
            }),
            Behavior::Fail => Err(LlmError::MalformedResponse("missing why".to_owned())),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(600)).await;
                Err(LlmError::EmptyResponse)
            }
        }
    }
}

fn signal(now: DateTime<Utc>) -> Signal {
    Signal {
        id: Uuid::new_v4(),
        partner_id: Uuid::new_v4(),
        signal_type: SignalType::Marketplace,
        title: "Acme lists on AWS Marketplace".to_owned(),
        source_url: "https://acme.example/aws".to_owned(),
        summary: "- Acme is now on AWS Marketplace".to_owned(),
        facets: None,
        published_at: Some(now),
        dedupe_hash: "hash".to_owned(),
        created_at: now,
    }
}

fn objective(objective_type: ObjectiveType, priority: i16) -> Objective {
    Objective {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        objective_type,
        detail: None,
        priority,
    }
}

fn synthesizer(generator: Arc<dyn InsightGenerator>) -> InsightSynthesizer {
    InsightSynthesizer::new(generator, ScoringConfig::default(), Duration::from_secs(5))
}

#[tokio::test]
async fn empty_objectives_yield_none_without_calling_generator() {
    let generator = FakeGenerator::new(Behavior::Respond(50.0, "Hi"));
    let result = synthesizer(generator.clone())
        .synthesize(&signal(Utc::now()), &[], None, Utc::now())
        .await;
    assert!(result.is_none());
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn llm_score_moves_base_score_within_bound() {
    let now = Utc::now();
    let objectives = [objective(ObjectiveType::Marketplace, 1)];

    let up = synthesizer(FakeGenerator::new(Behavior::Respond(95.0, "Hi")))
        .synthesize(&signal(now), &objectives, None, now)
        .await
        .unwrap();
    assert_eq!(up.score, 95);
    assert!((up.breakdown.llm_adjustment() - 10.0).abs() < 1e-9);

    let down = synthesizer(FakeGenerator::new(Behavior::Respond(0.0, "Hi")))
        .synthesize(&signal(now), &objectives, None, now)
        .await
        .unwrap();
    assert_eq!(down.score, 65);
    assert!((down.breakdown.llm_adjustment() + 20.0).abs() < 1e-9);
}

#[tokio::test]
async fn configured_bound_is_honoured() {
    let now = Utc::now();
    let synth = InsightSynthesizer::new(
        FakeGenerator::new(Behavior::Respond(0.0, "Hi")),
        ScoringConfig {
            llm_adjustment_bound: 5.0,
        },
        Duration::from_secs(5),
    );
    let draft = synth
        .synthesize(&signal(now), &[objective(ObjectiveType::Marketplace, 1)], None, now)
        .await
        .unwrap();
    assert_eq!(draft.score, 80);
}

#[tokio::test]
async fn generated_fields_are_used_and_draft_is_reflowed() {
    let now = Utc::now();
    let draft = synthesizer(FakeGenerator::new(Behavior::Respond(
        85.0,
        "Hi team,\n\nI saw\nAcme Lists On AWS Marketplace\nand thought of us.\n\n\n\nBest,",
    )))
    .synthesize(&signal(now), &[objective(ObjectiveType::Marketplace, 1)], None, now)
    .await
    .unwrap();

    assert_eq!(draft.why, "Generated why.");
    assert_eq!(draft.actions[0].owner_hint, "Alliances Lead");
    assert_eq!(
        draft.outreach_draft,
        "Hi team,\n\nI saw \"Acme Lists On AWS Marketplace\" and thought of us.\n\nBest,"
    );
}

#[tokio::test]
async fn failure_produces_deterministic_fallback() {
    let now = Utc::now();
    let primary = objective(ObjectiveType::Marketplace, 1);
    let draft = synthesizer(FakeGenerator::new(Behavior::Fail))
        .synthesize(&signal(now), &[primary.clone()], None, now)
        .await
        .unwrap();

    assert_eq!(draft.objective_id, Some(primary.id));
    assert_eq!(draft.score, 85);
    assert!(draft.breakdown.llm_adjustment().abs() < f64::EPSILON);
    assert_eq!(
        draft.why,
        "This marketplace signal aligns with your Marketplace objective."
    );
    assert_eq!(draft.recommendation, FALLBACK_RECOMMENDATION);
    assert_eq!(draft.actions, vec![SuggestedAction::reach_out()]);
    assert!(draft
        .outreach_draft
        .contains("I noticed \"Acme lists on AWS Marketplace\""));
}

#[tokio::test]
async fn offline_service_always_falls_back() {
    let now = Utc::now();
    let draft = synthesizer(Arc::new(OfflineTextService))
        .synthesize(&signal(now), &[objective(ObjectiveType::CoMarket, 2)], None, now)
        .await
        .unwrap();
    assert_eq!(
        draft.why,
        "This marketplace signal aligns with your Co-Marketing objective."
    );
    assert_eq!(draft.score, 40);
}

#[tokio::test(start_paused = true)]
async fn hanging_generator_times_out_to_fallback() {
    let now = Utc::now();
    let draft = synthesizer(FakeGenerator::new(Behavior::Hang))
        .synthesize(&signal(now), &[objective(ObjectiveType::Marketplace, 1)], None, now)
        .await
        .unwrap();
    assert_eq!(draft.score, 85);
    assert_eq!(draft.recommendation, FALLBACK_RECOMMENDATION);
}

#[tokio::test]
async fn primary_objective_is_lowest_priority_number() {
    let now = Utc::now();
    let low = objective(ObjectiveType::Geography, 3);
    let high = objective(ObjectiveType::Marketplace, 1);
    let tied = objective(ObjectiveType::Vertical, 1);
    let generator = FakeGenerator::new(Behavior::Fail);

    let draft = synthesizer(generator.clone())
        .synthesize(
            &signal(now),
            &[low, high.clone(), tied],
            None,
            now,
        )
        .await
        .unwrap();

    assert_eq!(draft.objective_id, Some(high.id));
    let request = generator.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request.objectives.len(), 3);
}
