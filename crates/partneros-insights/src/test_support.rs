//! Fixtures shared by the crate's unit tests.

use chrono::Utc;
use partneros_core::{
    compute_dedupe_key, InsightDraft, NewSignal, Objective, ObjectiveType, ScoreBreakdown,
    SignalType, SuggestedAction,
};
use uuid::Uuid;

use crate::memory::MemoryStore;
use crate::store::{InsightStore, SignalStore};

#[allow(dead_code)]
pub(crate) struct Seeded {
    pub user_id: Uuid,
    pub partner_id: Uuid,
    pub signal_id: Uuid,
    pub objective_id: Option<Uuid>,
    pub insight_id: Uuid,
}

pub(crate) fn new_signal(partner_id: Uuid, url: &str, title: &str) -> NewSignal {
    NewSignal {
        partner_id,
        signal_type: SignalType::Blog,
        title: title.to_owned(),
        source_url: url.to_owned(),
        summary: "summary".to_owned(),
        facets: None,
        published_at: Some(Utc::now()),
        dedupe_hash: compute_dedupe_key(url, title),
    }
}

pub(crate) fn draft(objective_id: Option<Uuid>, score: u8) -> InsightDraft {
    InsightDraft {
        objective_id,
        score,
        breakdown: ScoreBreakdown::new(15.0, 1.0, 1.0, 0.0, 15.0, 0.0),
        why: "why".to_owned(),
        recommendation: "recommendation".to_owned(),
        actions: vec![SuggestedAction::reach_out()],
        outreach_draft: "Hi there".to_owned(),
    }
}

/// Partner, optional objective, signal, and one insight for a fresh user.
pub(crate) async fn seed_insight(
    store: &MemoryStore,
    signal_type: SignalType,
    objective_type: Option<ObjectiveType>,
) -> Seeded {
    seed_insight_for(store, Uuid::new_v4(), signal_type, objective_type, 50, "Post").await
}

pub(crate) async fn seed_insight_for(
    store: &MemoryStore,
    user_id: Uuid,
    signal_type: SignalType,
    objective_type: Option<ObjectiveType>,
    score: u8,
    title: &str,
) -> Seeded {
    let partner = store.add_partner(user_id, "Acme", "https://acme.example/feed");

    let objective_id = objective_type.map(|objective_type| {
        let objective = Objective {
            id: Uuid::new_v4(),
            user_id,
            objective_type,
            detail: None,
            priority: 1,
        };
        let id = objective.id;
        store.add_objective(objective);
        id
    });

    let url = format!("https://acme.example/{}", Uuid::new_v4());
    let mut new = new_signal(partner.id, &url, title);
    new.signal_type = signal_type;
    let signal = store
        .insert_signal(&new)
        .await
        .unwrap()
        .inserted()
        .unwrap();

    let insight = store
        .insert_insight(signal.id, &draft(objective_id, score))
        .await
        .unwrap()
        .inserted()
        .unwrap();

    Seeded {
        user_id,
        partner_id: partner.id,
        signal_id: signal.id,
        objective_id,
        insight_id: insight.id,
    }
}
