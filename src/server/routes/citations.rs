use axum::Json;

use crate::citation::{claim_depths, root_claims, segment_text};
use crate::server::types::{SegmentRequest, SegmentResponse};

/// POST /api/citations/segment
pub async fn segment(Json(request): Json<SegmentRequest>) -> Json<SegmentResponse> {
    Json(SegmentResponse {
        segments: segment_text(&request.text, &request.claims),
        root_claims: root_claims(&request.claims),
        depths: claim_depths(&request.claims),
    })
}
