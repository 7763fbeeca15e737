use std::sync::Arc;

use shuttle_axum::axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::history::{History, HistoryEntry};
use crate::interview::{self, AnswerOutcome, PreferenceDelta, Question, QuestionContext};
use crate::pipeline::{self, RecommendRequest};
use crate::profile::WebsiteProfile;
use crate::recommendation::RecommendationSet;
use crate::sources::Collaborators;
use crate::taste::{derive_taste, TasteProfile};

#[derive(Clone)]
pub struct AppState {
    clients: Collaborators,
    history: Arc<History>,
}

impl AppState {
    pub fn new(clients: Collaborators) -> Self {
        Self {
            clients,
            history: Arc::new(History::with_capacity(2000)),
        }
    }
}

/// Debug/metrics routes are opt-in; they expose internals not meant for the
/// public surface.
pub fn debug_routes_enabled() -> bool {
    std::env::var("DEBUG_ROUTES").map(|v| v == "1").unwrap_or(false)
}

pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/recommend", post(recommend))
        .route("/taste-profile", post(taste_profile))
        .route("/interview/next", post(interview_next))
        .route("/interview/answer", post(interview_answer))
        .route("/interview/delta", post(interview_delta));

    if debug_routes_enabled() {
        router = router
            .route("/debug/catalog", get(debug_catalog))
            .route("/debug/history", get(debug_history))
            .route("/debug/last-recommendation", get(debug_last_recommendation));
    }

    router.layer(CorsLayer::very_permissive()).with_state(state)
}

async fn recommend(
    State(state): State<AppState>,
    Json(body): Json<RecommendRequest>,
) -> Json<RecommendationSet> {
    let set = pipeline::recommend(&body, &state.clients).await;
    state.history.push(&set);
    Json(set)
}

async fn taste_profile(Json(profile): Json<WebsiteProfile>) -> Json<TasteProfile> {
    Json(derive_taste(&profile))
}

#[derive(serde::Deserialize)]
struct NextQuestionReq {
    #[serde(default)]
    context: QuestionContext,
    number: u8,
}

#[derive(serde::Serialize)]
struct NextQuestionResp {
    question: Option<Question>,
    complete: bool,
}

async fn interview_next(Json(body): Json<NextQuestionReq>) -> Json<NextQuestionResp> {
    Json(NextQuestionResp {
        question: interview::next_question(&body.context, body.number),
        complete: interview::is_complete(&body.context),
    })
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerReq {
    #[serde(default)]
    context: QuestionContext,
    question_id: String,
    answer: String,
}

async fn interview_answer(Json(body): Json<AnswerReq>) -> Json<AnswerOutcome> {
    Json(interview::apply_answer(
        &body.context,
        &body.question_id,
        &body.answer,
    ))
}

#[derive(serde::Deserialize)]
struct DeltaReq {
    current: Vec<interview::Answer>,
    #[serde(default)]
    baseline: Vec<interview::Answer>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct DeltaResp {
    delta: PreferenceDelta,
    full_regeneration: bool,
}

async fn interview_delta(Json(body): Json<DeltaReq>) -> Json<DeltaResp> {
    let delta = interview::calculate_delta(&body.current, &body.baseline);
    let full_regeneration = interview::should_full_regeneration(&delta);
    Json(DeltaResp {
        delta,
        full_regeneration,
    })
}

async fn debug_catalog() -> Json<Vec<&'static crate::catalog::Destination>> {
    Json(crate::catalog::Catalog::global().iter().collect())
}

async fn debug_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.snapshot_last_n(10))
}

async fn debug_last_recommendation(State(state): State<AppState>) -> Json<Option<HistoryEntry>> {
    Json(state.history.snapshot_last_n(1).pop())
}
