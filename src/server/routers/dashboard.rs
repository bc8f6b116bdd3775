use hyper::StatusCode;
use serde_json::json;

use super::{json_response, HttpResponse};
use crate::{
    components::presenter::{render, render_table},
    models::{state::AppState, token::TokenFilter},
};

pub async fn handle_get_dashboard(state: &AppState, filter: TokenFilter) -> HttpResponse {
    let snapshot = state.snapshot().await;

    json_response(StatusCode::OK, &render(&snapshot, filter))
}

pub async fn handle_get_tokens(state: &AppState, filter: TokenFilter) -> HttpResponse {
    let board = state.tokens.read().await;
    let records = board.records.clone();
    let loaded = board.loaded;
    let error = board.last_error.clone();
    drop(board);

    let filtered: Vec<_> = records.iter().filter(|r| filter.matches(r)).collect();
    let table = render_table(&records, filter, loaded, error.as_deref());

    json_response(
        StatusCode::OK,
        &json!({
            "filter": table.filter,
            "count": filtered.len(),
            "records": filtered,
            "rows": table.rows,
            "message": table.message,
        }),
    )
}
