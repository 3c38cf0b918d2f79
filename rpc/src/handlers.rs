//! RPC request handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use waymark_store::submission::Submission;
use waymark_store::ContributorProfile;
use waymark_types::{ContributorId, GeoPoint, SubmissionId, SubmissionKind, Timestamp};
use waymark_verification::VerificationEngine;

use crate::error::RpcError;
use crate::server::AppState;

// ── Contributors ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterContributorRequest {
    pub id: String,
    #[serde(default)]
    pub reputation: u8,
}

#[derive(Debug, Serialize)]
pub struct ContributorResponse {
    pub id: String,
    pub role: String,
    pub reputation: u8,
    pub verified_landmarks: u32,
    pub verified_routes: u32,
    pub contributions_verified: u32,
    pub votes_cast: u32,
    pub votes_correct: u32,
}

impl ContributorResponse {
    fn from_profile(profile: &ContributorProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            role: format!("{:?}", profile.role).to_lowercase(),
            reputation: profile.reputation(),
            verified_landmarks: profile.verified_landmarks,
            verified_routes: profile.verified_routes,
            contributions_verified: profile.contributions_verified,
            votes_cast: profile.votes_cast,
            votes_correct: profile.votes_correct,
        }
    }
}

pub async fn register_contributor(
    State(state): State<AppState>,
    Json(req): Json<RegisterContributorRequest>,
) -> Result<Json<ContributorResponse>, RpcError> {
    let id = parse_contributor_id(&req.id)?;
    let mut profile = ContributorProfile::new(id, Timestamp::now());
    profile.set_reputation(req.reputation);
    state.contributors.insert_profile(&profile)?;
    debug!(contributor = %profile.id, "contributor registered");
    Ok(Json(ContributorResponse::from_profile(&profile)))
}

pub async fn get_contributor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContributorResponse>, RpcError> {
    let id = parse_contributor_id(&id)?;
    let profile = state
        .contributors
        .get_profile(&id)
        .map_err(|_| RpcError::ContributorNotFound(id.to_string()))?;
    Ok(Json(ContributorResponse::from_profile(&profile)))
}

// ── Submissions ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PointDto {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize)]
pub struct CreateSubmissionRequest {
    pub id: String,
    pub kind: SubmissionKind,
    pub creator: String,
    pub points: Vec<PointDto>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: String,
    pub kind: SubmissionKind,
    pub creator: String,
    pub status: String,
    pub verified: bool,
    pub vote_count: usize,
    pub total_weight: f64,
    pub yes_weight: f64,
    pub no_weight: f64,
    pub confidence: f64,
}

pub async fn create_submission(
    State(state): State<AppState>,
    Json(req): Json<CreateSubmissionRequest>,
) -> Result<Json<SubmissionResponse>, RpcError> {
    let id = parse_submission_id(&req.id)?;
    let creator = parse_contributor_id(&req.creator)?;
    if !state.contributors.exists(&creator)? {
        return Err(RpcError::ContributorNotFound(creator.to_string()));
    }

    let now = Timestamp::now();
    let points: Vec<GeoPoint> = req.points.iter().map(|p| GeoPoint::new(p.lat, p.lon)).collect();
    let submission = match req.kind {
        SubmissionKind::Landmark => {
            let [point] = points.as_slice() else {
                return Err(RpcError::InvalidRequest(
                    "a landmark needs exactly one point".to_string(),
                ));
            };
            Submission::landmark(id, creator, *point, now)
        }
        SubmissionKind::Route => Submission::route(id, creator, points, now),
    }
    .map_err(|e| RpcError::InvalidRequest(e.to_string()))?;

    state.submissions.insert_submission(&submission)?;
    debug!(submission = %submission.id, kind = ?submission.kind, "submission created");
    Ok(Json(submission_response(&state.engine, &submission, now)))
}

pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SubmissionResponse>, RpcError> {
    let id = parse_submission_id(&id)?;
    let submission = state
        .submissions
        .get_submission(&id)
        .map_err(|_| RpcError::SubmissionNotFound(id.to_string()))?;
    // Read path shows the decayed tally without touching the vote history.
    Ok(Json(submission_response(
        &state.engine,
        &submission,
        Timestamp::now(),
    )))
}

fn submission_response(
    engine: &VerificationEngine,
    submission: &Submission,
    now: Timestamp,
) -> SubmissionResponse {
    let outcome = engine.recompute_tally(submission, now);
    SubmissionResponse {
        id: submission.id.to_string(),
        kind: submission.kind,
        creator: submission.creator.to_string(),
        status: submission.status().to_string(),
        verified: submission.is_verified(),
        vote_count: submission.votes.len(),
        total_weight: outcome.total_weight,
        yes_weight: outcome.yes_weight,
        no_weight: outcome.no_weight,
        confidence: outcome.confidence,
    }
}

// ── Votes ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CastVoteRequest {
    pub contributor: String,
    pub choice: String,
}

#[derive(Debug, Serialize)]
pub struct CastVoteResponse {
    pub status: String,
    pub verified: bool,
    pub total_weight: f64,
    pub yes_weight: f64,
    pub no_weight: f64,
    pub confidence: f64,
    pub applied_weight: f64,
}

pub async fn cast_vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CastVoteRequest>,
) -> Result<Json<CastVoteResponse>, RpcError> {
    let submission_id = parse_submission_id(&id)?;
    let contributor_id = parse_contributor_id(&req.contributor)?;
    let choice = VerificationEngine::parse_choice(&req.choice)?;

    let receipt =
        state
            .engine
            .cast_vote(&submission_id, &contributor_id, choice, Timestamp::now())?;

    Ok(Json(CastVoteResponse {
        status: receipt.status.to_string(),
        verified: receipt.verified,
        total_weight: receipt.total_weight,
        yes_weight: receipt.yes_weight,
        no_weight: receipt.no_weight,
        confidence: receipt.confidence,
        applied_weight: receipt.applied_weight,
    }))
}

// ── Id parsing ───────────────────────────────────────────────────────────

fn parse_contributor_id(raw: &str) -> Result<ContributorId, RpcError> {
    if !raw.starts_with(ContributorId::PREFIX) || raw.len() <= ContributorId::PREFIX.len() {
        return Err(RpcError::InvalidRequest(format!(
            "malformed contributor id: {raw}"
        )));
    }
    Ok(ContributorId::new(raw))
}

fn parse_submission_id(raw: &str) -> Result<SubmissionId, RpcError> {
    if !raw.starts_with(SubmissionId::PREFIX) || raw.len() <= SubmissionId::PREFIX.len() {
        return Err(RpcError::InvalidRequest(format!(
            "malformed submission id: {raw}"
        )));
    }
    Ok(SubmissionId::new(raw))
}
