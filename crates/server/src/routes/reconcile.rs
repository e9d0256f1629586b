use crate::error::{ServerError, ServerResult};
use crate::protocol::{self, QueryResult};
use crate::state::ServerState;
use axum::extract::{FromRequest, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::response::Response;
use axum::Form;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Parameters of `/reconcile`, from the query string or a form body.
#[derive(Debug, Default, Deserialize)]
pub struct ReconcileParams {
    #[serde(default)]
    pub queries: Option<String>,

    #[serde(default)]
    pub callback: Option<String>,
}

impl ReconcileParams {
    /// Form fields win over query-string fields.
    fn merge(self, form: ReconcileParams) -> ReconcileParams {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        ReconcileParams {
            queries: present(form.queries).or_else(|| present(self.queries)),
            callback: present(self.callback).or_else(|| present(form.callback)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default)]
    pub callback: Option<String>,
}

#[derive(Debug, Serialize)]
struct SuggestResponse {
    result: Vec<protocol::TypeRef>,
}

/// `GET|POST /reconcile`
///
/// Without `queries` the service manifest is returned. With `queries` every
/// item is reconciled and the response is keyed like the input. A `callback`
/// turns the response into JSONP.
pub async fn reconcile(
    State(state): State<Arc<ServerState>>,
    Query(query_params): Query<ReconcileParams>,
    request: Request,
) -> ServerResult<Response> {
    let form = read_form(request).await?;
    let params = query_params.merge(form);

    match params.queries.as_deref() {
        None => protocol::respond(state.manifest.as_ref(), params.callback.as_deref()),
        Some(raw) => {
            let results = reconcile_queries(&state, raw).await?;
            protocol::respond(&results, params.callback.as_deref())
        }
    }
}

/// `GET /suggest/properties`
pub async fn suggest_properties(
    Query(params): Query<SuggestParams>,
) -> ServerResult<Response> {
    let result = protocol::suggest_properties(params.prefix.as_deref().unwrap_or_default());
    protocol::respond(&SuggestResponse { result }, params.callback.as_deref())
}

async fn reconcile_queries(
    state: &ServerState,
    raw: &str,
) -> ServerResult<BTreeMap<String, QueryResult>> {
    let items = protocol::parse_queries(raw)?;

    let mut results = BTreeMap::new();
    let mut batch = Vec::with_capacity(items.len());
    for (key, item) in items {
        match item {
            Some(item) => {
                let (query, limit) = item.into_query();
                batch.push((key, query, limit));
            }
            None => {
                results.insert(key, QueryResult::default());
            }
        }
    }

    tracing::debug!(queries = batch.len(), malformed = results.len(), "reconciling batch");
    for (key, ranked) in state.reconciler.reconcile_batch_top(batch).await {
        results.insert(key, QueryResult::from(&ranked));
    }
    Ok(results)
}

/// Form body of a POST, or nothing when the request carries none.
async fn read_form(request: Request) -> ServerResult<ReconcileParams> {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if request.method() == Method::GET || !is_form {
        return Ok(ReconcileParams::default());
    }

    let Form(params) = Form::<ReconcileParams>::from_request(request, &())
        .await
        .map_err(|rejection| ServerError::BadRequest(rejection.body_text()))?;
    Ok(params)
}
