use chrono::Utc;
use hyper::StatusCode;
use serde_json::json;

use super::{json_response, HttpResponse};
use crate::{components::presenter::render_chart, models::state::AppState};

pub async fn handle_get_price(state: &AppState) -> HttpResponse {
    let board = state.price.read().await;
    let history: Vec<_> = board.history.iter().copied().collect();
    let chart = render_chart(&history, Utc::now());

    json_response(
        StatusCode::OK,
        &json!({
            "snapshot": board.snapshot,
            "history": history,
            "chart": chart,
            "status": board.status,
        }),
    )
}

pub async fn handle_get_network(state: &AppState) -> HttpResponse {
    let board = state.network.read().await;

    json_response(
        StatusCode::OK,
        &json!({
            "stats": board.stats,
            "isMock": board.is_mock,
            "tpsHistory": board.tps_history,
            "status": board.status,
        }),
    )
}

pub async fn handle_get_status(state: &AppState) -> HttpResponse {
    json_response(StatusCode::OK, &state.status().await)
}
