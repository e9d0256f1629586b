//! Field matchers.
//!
//! Each matcher compares one query field against one candidate field and
//! returns a similarity in `[0.0, 1.0]`. Inputs are raw strings; every matcher
//! normalizes through [`canonical`] before comparing. When either side has no
//! data the matcher returns `config.neutral_score`.
//!
//! | Field    | Algorithm                                                      |
//! |----------|----------------------------------------------------------------|
//! | Title    | max(sorted-token Levenshtein ratio, token Jaccard), best title  |
//! | Year     | linear decay to 0.0 at `year_decay_span`                        |
//! | Director | relaxed token coverage, symmetrized, best director pair         |
//! | Country  | Jaccard over alias-canonicalized country sets                   |

use std::collections::BTreeSet;

use canonical::{is_initial, normalize_tokens};

use crate::config::MatchConfig;
use crate::types::CandidateSummary;

/// Title similarity against the primary and original titles, keeping the best.
///
/// Exact normalized equality is 1.0. Anything below `config.title_floor` is
/// reported as 0.0. An empty title on either side scores 0.0; title is the one
/// field that is never neutral.
pub fn title_similarity(config: &MatchConfig, query_title: &str, candidate: &CandidateSummary) -> f64 {
    let query_tokens = normalize_tokens(query_title);
    if query_tokens.is_empty() {
        return 0.0;
    }

    let best = std::iter::once(candidate.title.as_str())
        .chain(candidate.original_title.as_deref())
        .map(|title| token_similarity(&query_tokens, &normalize_tokens(title)))
        .fold(0.0_f64, f64::max);

    if best < config.title_floor {
        0.0
    } else {
        best.min(1.0)
    }
}

fn token_similarity(left: &[String], right: &[String]) -> f64 {
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    if left == right {
        return 1.0;
    }

    let mut left_sorted = left.to_vec();
    left_sorted.sort_unstable();
    let mut right_sorted = right.to_vec();
    right_sorted.sort_unstable();
    let sort_ratio = strsim::normalized_levenshtein(&left_sorted.join(" "), &right_sorted.join(" "));

    let left_set: BTreeSet<&str> = left.iter().map(String::as_str).collect();
    let right_set: BTreeSet<&str> = right.iter().map(String::as_str).collect();

    sort_ratio.max(jaccard(&left_set, &right_set))
}

/// Year proximity: 1.0 on the same year, decaying linearly to 0.0 at
/// `config.year_decay_span` years apart.
pub fn year_similarity(config: &MatchConfig, query_year: Option<i32>, candidate_year: Option<i32>) -> f64 {
    match (query_year, candidate_year) {
        (Some(query), Some(candidate)) => {
            let distance = f64::from(query.abs_diff(candidate));
            let span = f64::from(config.year_decay_span.max(1));
            (1.0 - distance / span).max(0.0)
        }
        _ => config.neutral_score,
    }
}

/// Name-aware director similarity.
///
/// Names are compared as token sets where an initial ("f" from "F.") matches
/// any token starting with that letter. The score for one name pair is the
/// average of query-covered-by-candidate and candidate-covered-by-query, which
/// makes it symmetric. The query may list several directors separated by
/// commas, `&` or "and"; the best pair over all candidate directors wins.
/// The whole query is also read as a single name, so "Kubrick, Stanley"
/// matches "Stanley Kubrick".
pub fn director_similarity(config: &MatchConfig, query_director: &str, candidate_directors: &[String]) -> f64 {
    let mut query_names = split_names(query_director);
    let whole = normalize_tokens(query_director);
    if query_names.len() > 1 && !whole.is_empty() {
        query_names.push(whole);
    }
    let candidate_names: Vec<Vec<String>> = candidate_directors
        .iter()
        .map(|name| normalize_tokens(name))
        .filter(|tokens| !tokens.is_empty())
        .collect();

    if query_names.is_empty() || candidate_names.is_empty() {
        return config.neutral_score;
    }

    query_names
        .iter()
        .flat_map(|query| candidate_names.iter().map(move |candidate| name_similarity(query, candidate)))
        .fold(0.0_f64, f64::max)
}

fn split_names(raw: &str) -> Vec<Vec<String>> {
    let mut names = Vec::new();
    for piece in raw.split([',', ';', '&', '/']) {
        let mut current = Vec::new();
        for token in normalize_tokens(piece) {
            if token == "and" {
                if !current.is_empty() {
                    names.push(std::mem::take(&mut current));
                }
            } else {
                current.push(token);
            }
        }
        if !current.is_empty() {
            names.push(current);
        }
    }
    names
}

fn name_similarity(left: &[String], right: &[String]) -> f64 {
    (coverage(left, right) + coverage(right, left)) / 2.0
}

fn coverage(tokens: &[String], against: &[String]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let satisfied = tokens
        .iter()
        .filter(|token| against.iter().any(|other| tokens_match(token, other)))
        .count();
    satisfied as f64 / tokens.len() as f64
}

fn tokens_match(left: &str, right: &str) -> bool {
    left == right
        || (is_initial(left) && right.starts_with(left))
        || (is_initial(right) && left.starts_with(right))
}

/// Co-production overlap: Jaccard of the two country sets.
///
/// The query side is a comma-separated list (`;` and `/` also split). Common
/// short forms are folded onto the catalog's long names first, so "USA" and
/// "United States of America" count as the same country.
pub fn country_similarity(config: &MatchConfig, query_country: &str, candidate_countries: &[String]) -> f64 {
    let query_set: BTreeSet<String> = query_country
        .split([',', ';', '/'])
        .filter_map(canonical_country)
        .collect();
    let candidate_set: BTreeSet<String> = candidate_countries
        .iter()
        .filter_map(|country| canonical_country(country))
        .collect();

    if query_set.is_empty() || candidate_set.is_empty() {
        return config.neutral_score;
    }

    jaccard(&query_set, &candidate_set)
}

fn canonical_country(raw: &str) -> Option<String> {
    let normalized = canonical::normalize(raw);
    if normalized.is_empty() {
        return None;
    }
    let alias = match normalized.as_str() {
        "usa" | "us" | "u s a" | "u s" | "united states" | "america" => "united states of america",
        "uk" | "u k" | "great britain" | "britain" | "england" => "united kingdom",
        "ussr" | "u s s r" => "soviet union",
        "holland" | "the netherlands" => "netherlands",
        "czechia" => "czech republic",
        "republic of korea" | "korea south" => "south korea",
        _ => return Some(normalized),
    };
    Some(alias.to_string())
}

fn jaccard<T: Ord>(left: &BTreeSet<T>, right: &BTreeSet<T>) -> f64 {
    let union = left.union(right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(right).count() as f64 / union as f64
}
