use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;
use tracing::debug;

use crate::error::AppResult;
use crate::models::{parse_rows, Overview, RawBreakdownRow, RawOverview};
use crate::services::concentration::{
    concentration as summarize_concentration, CategoryTotal, ConcentrationSummary,
};
use crate::services::flows::{cash_flow_sankey, Sankey};
use crate::services::report::{self, Drilldown, DrilldownTarget, YearlyAnalysis};
use crate::services::yoy::{join_deltas, DeltaRecord};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct YearlyRequest {
    pub current: RawOverview,
    #[serde(default)]
    pub previous: Option<RawOverview>,
    pub top_n: Option<usize>,
    pub heatmap_rows: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DrilldownRequest {
    pub overview: RawOverview,
    pub target: DrilldownTarget,
}

#[derive(Debug, Deserialize)]
pub struct DeltasRequest {
    #[serde(default)]
    pub current: Vec<RawBreakdownRow>,
    #[serde(default)]
    pub previous: Vec<RawBreakdownRow>,
}

#[derive(Debug, Deserialize)]
pub struct ConcentrationRequest {
    #[serde(default)]
    pub rows: Vec<CategoryTotal>,
    pub top_n: Option<usize>,
}

pub async fn yearly(
    State(state): State<AppState>,
    payload: Result<Json<YearlyRequest>, JsonRejection>,
) -> AppResult<Json<YearlyAnalysis>> {
    let Json(request) = payload?;

    let current = Overview::try_from(request.current)?;
    let previous = request.previous.map(Overview::try_from).transpose()?;
    let options = state.analysis_options(request.top_n, request.heatmap_rows);

    let analysis = report::analyze_year(&current, previous.as_ref(), &options)?;
    debug!(
        year = analysis.year,
        previous_year = ?analysis.previous_year,
        spikes = analysis.volatility.as_ref().map_or(0, |v| v.spikes.len()),
        "Computed yearly analysis"
    );

    Ok(Json(analysis))
}

pub async fn drilldown(
    payload: Result<Json<DrilldownRequest>, JsonRejection>,
) -> AppResult<Json<Drilldown>> {
    let Json(request) = payload?;

    let overview = Overview::try_from(request.overview)?;
    let result = report::drilldown(&overview, &request.target)?;
    debug!(
        year = result.year,
        label = %result.label,
        notable = result.notable_months.len(),
        "Computed drill-down"
    );

    Ok(Json(result))
}

pub async fn deltas(
    payload: Result<Json<DeltasRequest>, JsonRejection>,
) -> AppResult<Json<Vec<DeltaRecord>>> {
    let Json(request) = payload?;

    let current = parse_rows("current", request.current)?;
    let previous = parse_rows("previous", request.previous)?;

    Ok(Json(join_deltas(&current, &previous)))
}

pub async fn concentration(
    State(state): State<AppState>,
    payload: Result<Json<ConcentrationRequest>, JsonRejection>,
) -> AppResult<Json<Option<ConcentrationSummary>>> {
    let Json(request) = payload?;

    let options = state.analysis_options(request.top_n, None);
    Ok(Json(summarize_concentration(&request.rows, options.top_n)))
}

pub async fn sankey(payload: Result<Json<RawOverview>, JsonRejection>) -> AppResult<Json<Sankey>> {
    let Json(raw) = payload?;

    let overview = Overview::try_from(raw)?;
    Ok(Json(cash_flow_sankey(&overview)))
}
