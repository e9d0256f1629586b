use super::*;
use crate::types::{CandidateDetail, ScoredCandidate};

fn film(id: &str, title: &str, year: Option<i32>) -> CandidateSummary {
    let summary = CandidateSummary::new(id, title);
    match year {
        Some(year) => summary.with_release_year(year),
        None => summary,
    }
}

fn detailed(summary: CandidateSummary, directors: &[&str], countries: &[&str]) -> Candidate {
    Candidate::detailed(
        summary,
        CandidateDetail {
            directors: directors.iter().map(|d| d.to_string()).collect(),
            countries: countries.iter().map(|c| c.to_string()).collect(),
        },
    )
}

fn matched_ids(result: &RankedResult) -> Vec<&str> {
    result
        .iter()
        .filter(|c| c.matched)
        .map(|c| c.candidate.catalog_id())
        .collect()
}

fn nosferatu_catalog() -> Vec<Candidate> {
    vec![
        detailed(
            film("653", "Nosferatu, eine Symphonie des Grauens", Some(1922))
                .with_original_title("Nosferatu"),
            &["Friedrich Wilhelm Murnau"],
            &["Germany"],
        ),
        detailed(
            film("6404", "Nosferatu the Vampyre", Some(1979))
                .with_original_title("Nosferatu: Phantom der Nacht"),
            &["Werner Herzog"],
            &["West Germany", "France"],
        ),
        detailed(
            film("426063", "Nosferatu", Some(2024)),
            &["Robert Eggers"],
            &["United States of America"],
        ),
    ]
}

fn mirror_catalog() -> Vec<Candidate> {
    vec![
        Candidate::from_summary(film("1396", "Mirror", Some(1975)).with_original_title("Зеркало")),
        Candidate::from_summary(film("21049", "Mirror", Some(2005))),
        Candidate::from_summary(film("11886", "Mirrors", Some(2008))),
        Candidate::from_summary(film("47003", "The Mirror", Some(1997)).with_original_title("Ayneh")),
    ]
}

#[test]
fn nosferatu_end_to_end_auto_matches() {
    let matcher = Matcher::default();
    let query = Query::new("Nosferatu")
        .with_year(1922)
        .with_director("F.W. Murnau")
        .with_country("Germany");

    let result = matcher.evaluate(&query, &nosferatu_catalog());

    assert_eq!(matched_ids(&result), vec!["653"]);
    let top = &result.candidates[0];
    assert_eq!(top.candidate.catalog_id(), "653");
    assert!(top.score >= 0.99, "score = {}", top.score);
}

#[test]
fn mirror_without_disambiguation_is_ambiguous() {
    let matcher = Matcher::default();
    let result = matcher.evaluate(&Query::new("Mirror"), &mirror_catalog());

    assert!(result.auto_match().is_none());
    assert!(result.len() >= 2);
    let top_two: Vec<f64> = result.iter().take(2).map(|c| c.score).collect();
    assert!((top_two[0] - top_two[1]).abs() < 0.1);
}

#[test]
fn mirror_with_year_resolves() {
    let matcher = Matcher::default();
    let result = matcher.evaluate(&Query::new("Mirror").with_year(1975), &mirror_catalog());

    assert_eq!(matched_ids(&result), vec!["1396"]);
}

#[test]
fn title_only_query_depends_only_on_title() {
    let matcher = Matcher::default();
    let mut catalog = nosferatu_catalog();
    let baseline = matcher.evaluate(&Query::new("Nosferatu"), &catalog);

    // Detail and year data cannot move a title-only query.
    for candidate in &mut catalog {
        candidate.detail = None;
        candidate.summary.release_year = None;
    }
    let stripped = matcher.evaluate(&Query::new("Nosferatu"), &catalog);

    let scores = |r: &RankedResult| r.iter().map(|c| (c.candidate.catalog_id().to_string(), c.score)).collect::<Vec<_>>();
    assert_eq!(scores(&baseline), scores(&stripped));
    assert!(baseline.iter().any(|c| c.score == 1.0));
}

#[test]
fn identical_fields_score_one_and_match() {
    let matcher = Matcher::default();
    let candidate = detailed(
        film("1", "Stalker", Some(1979)),
        &["Andrei Tarkovsky"],
        &["Soviet Union"],
    );
    let query = Query::new("Stalker")
        .with_year(1979)
        .with_director("Andrei Tarkovsky")
        .with_country("Soviet Union");

    let result = matcher.evaluate(&query, &[candidate]);
    assert_eq!(result.candidates[0].score, 1.0);
    assert!(result.candidates[0].matched);
}

#[test]
fn year_gate_holds_regardless_of_title() {
    let matcher = Matcher::default();
    for distance in 3..6 {
        let candidate = detailed(
            film("1", "Solaris", Some(1972 + distance)),
            &["Andrei Tarkovsky"],
            &["Soviet Union"],
        );
        let query = Query::new("Solaris")
            .with_year(1972)
            .with_director("Andrei Tarkovsky")
            .with_country("USSR");
        let result = matcher.evaluate(&query, &[candidate]);
        assert!(result.auto_match().is_none(), "distance {distance}");
    }
}

#[test]
fn year_inside_window_can_still_match() {
    let matcher = Matcher::default();
    let candidate = detailed(
        film("1", "Solaris", Some(1973)),
        &["Andrei Tarkovsky"],
        &["Soviet Union"],
    );
    let query = Query::new("Solaris")
        .with_year(1972)
        .with_director("Andrei Tarkovsky")
        .with_country("USSR");
    let result = matcher.evaluate(&query, &[candidate]);
    assert!(result.auto_match().is_some());
}

#[test]
fn exclusivity_keeps_only_the_best() {
    let config = MatchConfig {
        min_match_gap: 0.0,
        ..Default::default()
    };
    let matcher = Matcher::new(config).expect("valid config");
    let candidates = vec![
        Candidate::from_summary(film("a", "Solaris", Some(1971))),
        Candidate::from_summary(film("b", "Solaris", Some(1972))),
        Candidate::from_summary(film("c", "Solaris", Some(1973))),
    ];
    let result = matcher.evaluate(&Query::new("Solaris").with_year(1972), &candidates);

    assert_eq!(matched_ids(&result), vec!["b"]);
    assert_eq!(result.len(), 3);
    let best = result
        .iter()
        .map(|c| c.score)
        .fold(f64::MIN, f64::max);
    assert_eq!(result.auto_match().map(|c| c.score), Some(best));
}

#[test]
fn failed_detail_never_scores_below_omitted_field() {
    let matcher = Matcher::default();
    let summary_only: Vec<Candidate> = nosferatu_catalog()
        .into_iter()
        .map(|c| Candidate::from_summary(c.summary))
        .collect();

    let with_fields = Query::new("Nosferatu")
        .with_year(1922)
        .with_director("F.W. Murnau")
        .with_country("Germany");
    let omitted = Query::new("Nosferatu").with_year(1922);

    let a = matcher.evaluate(&with_fields, &summary_only);
    let b = matcher.evaluate(&omitted, &summary_only);
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.candidate.catalog_id(), y.candidate.catalog_id());
        assert!(x.score >= y.score);
    }
}

#[test]
fn co_production_query_prefers_overlap() {
    let matcher = Matcher::default();
    let candidates = vec![
        detailed(film("1", "The Leopard", Some(1963)), &["Luchino Visconti"], &["Italy", "France"]),
        detailed(film("2", "The Leopard", Some(1963)), &["Luchino Visconti"], &["Spain"]),
    ];
    let result = matcher.evaluate(&Query::new("The Leopard").with_country("France, Italy"), &candidates);

    assert_eq!(result.candidates[0].candidate.catalog_id(), "1");
    assert_eq!(matched_ids(&result), vec!["1"]);
}

#[test]
fn blank_title_yields_empty_result() {
    let matcher = Matcher::default();
    let result = matcher.evaluate(&Query::new(" - ").with_year(1922), &nosferatu_catalog());
    assert!(result.is_empty());
}

#[test]
fn per_query_limit_is_capped_by_config() {
    let matcher = Matcher::default();
    let many: Vec<Candidate> = (0..12)
        .map(|i| Candidate::from_summary(film(&i.to_string(), "Mirror", Some(1960 + i))))
        .collect();

    assert_eq!(matcher.evaluate_top(&Query::new("Mirror"), &many, 3).len(), 3);
    assert_eq!(matcher.evaluate_top(&Query::new("Mirror"), &many, 50).len(), 5);
}

#[test]
fn evaluation_is_deterministic() {
    let matcher = Matcher::default();
    let query = Query::new("Nosferatu").with_director("Murnau");
    let first: Vec<ScoredCandidate> = matcher.evaluate(&query, &nosferatu_catalog()).candidates;
    for _ in 0..5 {
        assert_eq!(matcher.evaluate(&query, &nosferatu_catalog()).candidates, first);
    }
}

#[test]
fn invalid_config_is_rejected() {
    let config = MatchConfig {
        max_results: 0,
        ..Default::default()
    };
    assert!(matches!(Matcher::new(config), Err(MatchError::InvalidConfig(_))));
}
