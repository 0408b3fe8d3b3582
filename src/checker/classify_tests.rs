use super::*;

fn counts(pairs: &[(&str, u64)]) -> IndexMap<String, u64> {
    pairs.iter().map(|(s, c)| ((*s).to_string(), *c)).collect()
}

fn policy(good: &[&str], neutral: &[&str]) -> Policy {
    Policy {
        good_statuses: good.iter().map(ToString::to_string).collect(),
        neutral_statuses: neutral.iter().map(ToString::to_string).collect(),
        ..Policy::default()
    }
}

#[test]
fn splits_good_bad_and_neutral() {
    let c = classify(
        &counts(&[
            ("success", 900),
            ("up_to_date", 50),
            ("network_error", 30),
            ("sync_error", 20),
            ("pref_disabled", 400),
        ]),
        &Policy::default(),
    );
    assert_eq!(c.good, 950);
    assert_eq!(c.bad, 50);
    assert_eq!(c.neutral, 400);
    assert_eq!(c.total(), 1000);
}

#[test]
fn unknown_statuses_are_bad() {
    let c = classify(&counts(&[("custom_2xx_error", 3)]), &Policy::default());
    assert_eq!(c.bad, 3);
    assert_eq!(c.statuses[0].class, StatusClass::Bad);
}

#[test]
fn good_wins_when_also_neutral() {
    let p = policy(&["success"], &["success"]);
    assert_eq!(classify_status("success", &p), StatusClass::Good);

    let c = classify(&counts(&[("success", 10)]), &p);
    assert_eq!(c.good, 10);
    assert_eq!(c.bad, 0);
    assert_eq!(c.neutral, 0);
}

#[test]
fn only_neutral_counts_have_no_samples() {
    let c = classify(&counts(&[("pref_disabled", 500)]), &Policy::default());
    assert_eq!(c.total(), 0);
    assert_eq!(c.bad_percent(), None);
}

#[test]
fn bad_percent_bounds() {
    let all_bad = classify(&counts(&[("network_error", 7)]), &Policy::default());
    assert_eq!(all_bad.bad_percent(), Some(100.0));

    let all_good = classify(&counts(&[("success", 7)]), &Policy::default());
    assert_eq!(all_good.bad_percent(), Some(0.0));
}

#[test]
fn bad_percent_of_scenario_row() {
    let c = classify(
        &counts(&[("success", 9000), ("network_error", 1000)]),
        &policy(&["success"], &[]),
    );
    assert_eq!(c.bad_percent(), Some(10.0));
}

#[test]
fn bad_percent_stays_in_range_for_many_rows() {
    let p = Policy::default();
    for good in [0_u64, 1, 13, 999, 1_000_000] {
        for bad in [0_u64, 1, 7, 5000, u64::MAX / 4] {
            let c = classify(&counts(&[("success", good), ("x_error", bad)]), &p);
            if let Some(pct) = c.bad_percent() {
                assert!((0.0..=100.0).contains(&pct), "{good}/{bad} -> {pct}");
            } else {
                assert_eq!(good + bad, 0);
            }
        }
    }
}

#[test]
fn sums_saturate_instead_of_overflowing() {
    let c = classify(
        &counts(&[("success", u64::MAX), ("up_to_date", 5)]),
        &Policy::default(),
    );
    assert_eq!(c.good, u64::MAX);
}

#[test]
fn bad_statuses_sorted_descending_with_stable_ties() {
    let c = classify(
        &counts(&[
            ("success", 100),
            ("sync_error", 5),
            ("network_error", 50),
            ("parse_error", 5),
            ("backoff", 0),
            ("pref_disabled", 99),
        ]),
        &Policy::default(),
    );
    assert_eq!(
        c.bad_statuses(),
        vec![
            ("network_error".to_string(), 50),
            ("sync_error".to_string(), 5),
            ("parse_error".to_string(), 5),
            ("backoff".to_string(), 0),
        ]
    );
}

#[test]
fn statuses_keep_report_order_and_class() {
    let c = classify(
        &counts(&[("pref_disabled", 1), ("success", 2), ("oops", 3)]),
        &Policy::default(),
    );
    let classes: Vec<_> = c.statuses.iter().map(|s| (s.status.as_str(), s.class)).collect();
    assert_eq!(
        classes,
        vec![
            ("pref_disabled", StatusClass::Neutral),
            ("success", StatusClass::Good),
            ("oops", StatusClass::Bad),
        ]
    );
}

#[test]
fn classification_is_deterministic() {
    let row = counts(&[("success", 10), ("network_error", 3), ("sync_error", 3)]);
    let p = Policy::default();
    assert_eq!(classify(&row, &p), classify(&row, &p));
}

#[test]
fn status_class_names() {
    assert_eq!(StatusClass::Good.as_str(), "good");
    assert_eq!(StatusClass::Bad.as_str(), "bad");
    assert_eq!(StatusClass::Neutral.as_str(), "neutral");
}
