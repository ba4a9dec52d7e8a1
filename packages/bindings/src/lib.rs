use napi::Result as NapiResult;
use napi_derive::napi;

use viability_core::study::{ProjectInput, Study};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_study(study_json: &str) -> NapiResult<Study> {
    serde_json::from_str(study_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Market
// ---------------------------------------------------------------------------

#[napi]
pub fn suggest_study(input_json: String) -> NapiResult<String> {
    let input: ProjectInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let study = viability_core::market::suggest_study(&input).map_err(to_napi_error)?;
    serde_json::to_string(&study).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate(study_json: String) -> NapiResult<String> {
    let study = parse_study(&study_json)?;
    let output = viability_core::projection::simulate(&study).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn cash_flow(study_json: String) -> NapiResult<String> {
    let study = parse_study(&study_json)?;
    let output = viability_core::projection::simulate(&study).map_err(to_napi_error)?;
    let rows = viability_core::projection::cash_flow_rows(&study, &output.result);
    serde_json::to_string(&rows).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[napi]
pub fn diagnose(study_json: String) -> NapiResult<String> {
    let study = parse_study(&study_json)?;
    let output = viability_core::projection::simulate(&study).map_err(to_napi_error)?;
    let findings = viability_core::diagnostics::diagnose(&study, &output.result);
    serde_json::to_string(&findings).map_err(to_napi_error)
}

#[napi]
pub fn appraise(study_json: String) -> NapiResult<String> {
    let study = parse_study(&study_json)?;
    let output = viability_core::appraise(&study).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
