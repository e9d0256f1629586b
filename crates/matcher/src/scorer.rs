use tracing::debug;

use crate::config::MatchConfig;
use crate::fields::{country_similarity, director_similarity, title_similarity, year_similarity};
use crate::types::{Candidate, Query, ScoredCandidate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Year,
    Director,
    Country,
}

/// One field's contribution to the composite.
#[derive(Debug, Clone, Copy)]
struct FieldScore {
    field: Field,
    value: f64,
    weight: f64,
}

/// Score one candidate for one query.
///
/// Title always participates. Year, director and country participate only
/// when the query supplied the field *and* the candidate carries data for it;
/// otherwise the field is left out of the weighted average. A missing detail
/// lookup therefore scores exactly like a query that never asked for the field.
///
/// `matched` requires the composite to reach `match_threshold` and, when the
/// query has a year, the candidate's year to be known and within `year_window`.
pub fn score(config: &MatchConfig, query: &Query, candidate: &Candidate) -> ScoredCandidate {
    let fields = field_scores(config, query, candidate);

    let total_weight: f64 = fields.iter().map(|f| f.weight).sum();
    let composite = if total_weight > 0.0 {
        let weighted: f64 = fields.iter().map(|f| f.value * f.weight).sum();
        (weighted / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let year_ok = match query.year {
        None => true,
        Some(year) => candidate
            .summary
            .release_year
            .is_some_and(|release| year.abs_diff(release) <= config.year_window),
    };
    let matched = composite >= config.match_threshold && year_ok;

    debug!(
        catalog_id = %candidate.catalog_id(),
        score = composite,
        matched,
        year_ok,
        fields = ?fields.iter().map(|f| (f.field, f.value)).collect::<Vec<_>>(),
        "scored candidate"
    );

    ScoredCandidate {
        candidate: candidate.clone(),
        score: composite,
        matched,
    }
}

fn field_scores(config: &MatchConfig, query: &Query, candidate: &Candidate) -> Vec<FieldScore> {
    let weights = &config.weights;
    let mut fields = Vec::with_capacity(4);

    fields.push(FieldScore {
        field: Field::Title,
        value: title_similarity(config, &query.title, &candidate.summary),
        weight: weights.title,
    });

    if let (Some(year), Some(release)) = (query.year, candidate.summary.release_year) {
        fields.push(FieldScore {
            field: Field::Year,
            value: year_similarity(config, Some(year), Some(release)),
            weight: weights.year,
        });
    }

    if let Some(director) = query.director.as_deref().filter(|_| query.supplies_director()) {
        if has_content(candidate.directors()) {
            fields.push(FieldScore {
                field: Field::Director,
                value: director_similarity(config, director, candidate.directors()),
                weight: weights.director,
            });
        }
    }

    if let Some(country) = query.country.as_deref().filter(|_| query.supplies_country()) {
        if has_content(candidate.countries()) {
            fields.push(FieldScore {
                field: Field::Country,
                value: country_similarity(config, country, candidate.countries()),
                weight: weights.country,
            });
        }
    }

    fields
}

fn has_content(values: &[String]) -> bool {
    values.iter().any(|v| !canonical::normalize(v).is_empty())
}
