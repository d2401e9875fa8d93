//! Operator endpoints.
//!
//! The optional `operator_id` filter is validated here and forwarded to the
//! operator handler; results are relayed unchanged.

use super::{
    cached, unimplemented_endpoint, AppState, CHECK_OPERATORS_REACHABILITY,
    FETCH_NON_SIGNERS, FETCH_OPERATORS_NODE_INFO, FETCH_OPERATORS_STAKE,
    MAX_OPERATORS_STAKE_AGE, MAX_OPERATOR_PORT_CHECK_AGE,
};
use crate::domain::error::{ApiError, ApiResult};
use crate::domain::keys::OperatorId;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Response;

/// Raw query pairs. Repeated keys are kept so the first one can win.
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// Query string of the stake and reachability endpoints.
#[derive(Debug, Default)]
pub struct OperatorQuery {
    pub operator_id: Option<String>,
}

impl OperatorQuery {
    /// Take the first `operator_id` value; later repeats are ignored.
    fn from_pairs(pairs: QueryPairs) -> ApiResult<Self> {
        let Query(pairs) = pairs.map_err(|rejection| {
            ApiError::invalid_argument(format!("invalid query: {}", rejection.body_text()))
        })?;
        let operator_id = pairs
            .into_iter()
            .find(|(key, _)| key == "operator_id")
            .map(|(_, value)| value);
        Ok(Self { operator_id })
    }

    /// Parsed filter. An empty value means "all operators".
    fn operator_id(&self) -> ApiResult<Option<OperatorId>> {
        match self.operator_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|e| ApiError::invalid_argument(format!("invalid operator id: {}", e))),
        }
    }
}

/// `GET /operators/non-signers`
pub async fn fetch_non_signers(State(state): State<AppState>) -> ApiResult<Response> {
    unimplemented_endpoint(&state, FETCH_NON_SIGNERS)
}

/// `GET /operators/stake?operator_id=`
pub async fn fetch_operators_stake(
    State(state): State<AppState>,
    query: QueryPairs,
) -> ApiResult<Response> {
    let tracker = state.metrics.track(FETCH_OPERATORS_STAKE);

    let result = async {
        let operator_id = OperatorQuery::from_pairs(query)?.operator_id()?;
        let stake = state
            .operators
            .get_operators_stake(operator_id.as_ref())
            .await
            .map_err(|e| ApiError::internal(format!("failed to get operator stake - {}", e)))?;
        Ok::<_, ApiError>(cached(MAX_OPERATORS_STAKE_AGE, stake))
    }
    .await;

    tracker.finish(result)
}

/// `GET /operators/nodeinfo`
pub async fn fetch_operators_node_info(State(state): State<AppState>) -> ApiResult<Response> {
    let tracker = state.metrics.track(FETCH_OPERATORS_NODE_INFO);

    let result = state
        .operators
        .scan_operators_host_info()
        .await
        .map(|report| cached(MAX_OPERATOR_PORT_CHECK_AGE, report))
        .map_err(|e| ApiError::internal(e.to_string()));

    tracker.finish(result)
}

/// `GET /operators/reachability?operator_id=`
pub async fn check_operators_reachability(
    State(state): State<AppState>,
    query: QueryPairs,
) -> ApiResult<Response> {
    let tracker = state.metrics.track(CHECK_OPERATORS_REACHABILITY);

    let result = async {
        let operator_id = OperatorQuery::from_pairs(query)?.operator_id()?;
        let report = state
            .operators
            .probe_operator_hosts(operator_id.as_ref())
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    ApiError::not_found(e.to_string())
                } else {
                    ApiError::internal(e.to_string())
                }
            })?;
        Ok::<_, ApiError>(cached(MAX_OPERATOR_PORT_CHECK_AGE, report))
    }
    .await;

    tracker.finish(result)
}
