//! OpenRefine reconciliation wire format.
//!
//! Parsing of the `queries` batch, rendering of ranked candidates, the service
//! manifest and the JSONP wrapper. Nothing here talks to the catalog.

use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use filmrecon::{Query, RankedResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ServerError, ServerResult};

pub const SERVICE_NAME: &str = "TMDB Movie Reconciliation";
pub const IDENTIFIER_SPACE: &str = "https://www.themoviedb.org/movie/";
pub const SCHEMA_SPACE: &str = "https://www.themoviedb.org/documentation/api";
pub const VIEW_URL: &str = "https://www.themoviedb.org/movie/{{id}}";
pub const SUGGEST_PROPERTIES_PATH: &str = "/suggest/properties";

/// The one entity type this service reconciles against.
pub const MOVIE_TYPE: TypeRef = TypeRef {
    id: "movie",
    name: "Movie",
};

/// Properties a query may carry to sharpen matching.
pub const PROPERTIES: [TypeRef; 3] = [
    TypeRef {
        id: "year",
        name: "Year",
    },
    TypeRef {
        id: "director",
        name: "Director",
    },
    TypeRef {
        id: "country",
        name: "Country",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeRef {
    pub id: &'static str,
    pub name: &'static str,
}

/// Service descriptor returned by `/reconcile` without parameters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceManifest {
    pub name: &'static str,
    pub identifier_space: &'static str,
    pub schema_space: &'static str,
    pub default_types: Vec<TypeRef>,
    pub view: ViewTemplate,
    pub suggest: SuggestServices,
    pub properties: Vec<TypeRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewTemplate {
    pub url: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestServices {
    pub property: ServiceRef,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceRef {
    pub service_url: String,
    pub service_path: &'static str,
}

impl ServiceManifest {
    /// `base_url` is where OpenRefine reaches this service.
    pub fn new(base_url: &str) -> Self {
        Self {
            name: SERVICE_NAME,
            identifier_space: IDENTIFIER_SPACE,
            schema_space: SCHEMA_SPACE,
            default_types: vec![MOVIE_TYPE],
            view: ViewTemplate { url: VIEW_URL },
            suggest: SuggestServices {
                property: ServiceRef {
                    service_url: base_url.trim_end_matches('/').to_string(),
                    service_path: SUGGEST_PROPERTIES_PATH,
                },
            },
            properties: PROPERTIES.to_vec(),
        }
    }
}

/// One entry of the `queries` object.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryItem {
    pub query: String,

    #[serde(default)]
    pub limit: Option<usize>,

    #[serde(default)]
    pub properties: Vec<PropertyValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyValue {
    pub pid: String,
    pub v: Value,
}

impl QueryItem {
    /// Build the engine query and per-query limit. Unknown properties and
    /// values that cannot be read are dropped.
    pub fn into_query(self) -> (Query, Option<usize>) {
        let mut query = Query::new(self.query);
        for property in self.properties {
            match property.pid.trim().to_ascii_lowercase().as_str() {
                "year" => {
                    if let Some(year) = year_value(&property.v) {
                        query = query.with_year(year);
                    }
                }
                "director" => {
                    if let Some(director) = text_value(&property.v) {
                        query = query.with_director(director);
                    }
                }
                "country" => {
                    if let Some(country) = text_value(&property.v) {
                        query = query.with_country(country);
                    }
                }
                other => tracing::debug!(pid = other, "ignoring unknown property"),
            }
        }
        (query, self.limit.filter(|limit| *limit > 0))
    }
}

/// Parse the `queries` parameter. Items that do not fit the query shape map
/// to `None` and later render as an empty result.
pub fn parse_queries(raw: &str) -> ServerResult<Vec<(String, Option<QueryItem>)>> {
    let parsed: Map<String, Value> = serde_json::from_str(raw)
        .map_err(|err| ServerError::BadRequest(format!("queries must be a JSON object: {err}")))?;

    Ok(parsed
        .into_iter()
        .map(|(key, value)| {
            let item = match serde_json::from_value::<QueryItem>(value) {
                Ok(item) => Some(item),
                Err(err) => {
                    tracing::debug!(key = %key, error = %err, "malformed query item");
                    None
                }
            };
            (key, item)
        })
        .collect())
}

/// A candidate as OpenRefine expects it.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub score: f64,
    #[serde(rename = "match")]
    pub matched: bool,
    #[serde(rename = "type")]
    pub types: Vec<TypeRef>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryResult {
    pub result: Vec<Candidate>,
}

impl From<&RankedResult> for QueryResult {
    fn from(ranked: &RankedResult) -> Self {
        Self {
            result: ranked
                .iter()
                .map(|scored| Candidate {
                    id: scored.candidate.catalog_id().to_string(),
                    name: scored.candidate.summary.display_name(),
                    score: scored.protocol_score(),
                    matched: scored.matched,
                    types: vec![MOVIE_TYPE],
                })
                .collect(),
        }
    }
}

/// Properties whose name contains `prefix`, case-insensitively.
pub fn suggest_properties(prefix: &str) -> Vec<TypeRef> {
    let needle = prefix.trim().to_lowercase();
    PROPERTIES
        .iter()
        .filter(|property| property.name.to_lowercase().contains(&needle))
        .copied()
        .collect()
}

/// JSON, or JSONP when a callback is named.
pub fn respond<T: Serialize>(body: &T, callback: Option<&str>) -> ServerResult<Response> {
    let Some(callback) = callback.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(Json(body).into_response());
    };
    if !is_valid_callback(callback) {
        return Err(ServerError::BadRequest(format!(
            "invalid JSONP callback '{callback}'"
        )));
    }
    let payload = serde_json::to_string(body)?;
    let mut response = format!("{callback}({payload})").into_response();
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/javascript"),
    );
    Ok(response)
}

/// Identifiers with optional dotted or indexed access, e.g.
/// `jQuery123_456` or `callbacks[2]`.
fn is_valid_callback(callback: &str) -> bool {
    callback.len() <= 128
        && callback
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && callback
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '[' | ']'))
}

fn year_value(value: &Value) -> Option<i32> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|year| i32::try_from(year).ok()),
        Value::String(text) => year_in_text(text),
        Value::Array(values) => values.iter().find_map(year_value),
        Value::Object(object) => object.get("name").and_then(year_value),
        _ => None,
    }
}

/// First run of exactly four digits, so `"1922-02-16"` and `"c. 1922"` both
/// give 1922.
fn year_in_text(text: &str) -> Option<i32> {
    text.split(|c: char| !c.is_ascii_digit())
        .find(|run| run.len() == 4)
        .and_then(|run| run.parse().ok())
}

fn text_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(values) => values
            .iter()
            .filter_map(text_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(object) => return object.get("name").and_then(text_value),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
