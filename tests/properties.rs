use hierarchiconf::config::grammar::{join_valid, normalize_selector, split_segments, Selector};
use hierarchiconf::config::RESERVED_KEYS;
use hierarchiconf::{Conf, Value};
use proptest::prelude::*;

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,5}"
        .prop_filter("reserved keys are computed", |s| !RESERVED_KEYS.contains(&s.as_str()))
}

fn path() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(identifier(), 1..5)
}

/// Selectors built from identifiers, simple patterns and wildcards, never
/// ending in a wildcard.
fn selector() -> impl Strategy<Value = String> {
    let token = prop_oneof![
        3 => identifier(),
        1 => Just("x.*".to_string()),
        1 => Just("//".to_string()),
    ];
    (prop::collection::vec(token, 0..4), identifier()).prop_map(|(mut tokens, last)| {
        tokens.push(last);
        join_valid(&tokens)
    })
}

fn lookup(conf: &Conf, path: &str) -> Result<Value, String> {
    conf.get(path).map_err(|e| e.to_string())
}

proptest! {
    #[test]
    fn set_then_get_round_trips(p in path(), v in any::<i64>()) {
        let conf = Conf::default();
        let p = p.join("/");
        conf.set(p.as_str(), v).unwrap();
        prop_assert_eq!(conf.get(p.as_str()).unwrap(), Value::from(v));
    }

    #[test]
    fn more_exact_matches_win_regardless_of_order(
        p in prop::collection::vec(identifier(), 2..5),
        exact_first in any::<bool>(),
    ) {
        let full = p.join("/");
        let wildcard = format!("//{}", p[p.len() - 1]);

        let conf = Conf::default();
        if exact_first {
            conf.set(full.as_str(), "exact").unwrap();
            conf.set(wildcard.as_str(), "wildcard").unwrap();
        } else {
            conf.set(wildcard.as_str(), "wildcard").unwrap();
            conf.set(full.as_str(), "exact").unwrap();
        }
        prop_assert_eq!(conf.get(full.as_str()).unwrap(), Value::from("exact"));
    }

    #[test]
    fn views_agree_with_root(
        selectors in prop::collection::vec(selector(), 0..6),
        p in path(),
        split in 0usize..4,
    ) {
        let root = Conf::default();
        for (i, s) in selectors.iter().enumerate() {
            root.set(s.as_str(), i as i64).unwrap();
        }

        let split = split.min(p.len() - 1);
        let (location, rest) = p.split_at(split);
        let view = if location.is_empty() {
            root.clone()
        } else {
            root.subconf(location.join("/")).unwrap()
        };

        prop_assert_eq!(lookup(&view, &rest.join("/")), lookup(&root, &p.join("/")));
    }

    #[test]
    fn resplitting_is_idempotent(s in selector()) {
        let normalized = normalize_selector(&s).unwrap();
        prop_assert_eq!(join_valid(&split_segments(&[s.as_str()])), normalized.clone());
        let parsed = Selector::parse(&[normalized.as_str()]).unwrap();
        prop_assert_eq!(parsed.as_str(), normalized.as_str());
    }

    #[test]
    fn wildcard_reaches_any_depth(
        prefix in prop::collection::vec(identifier(), 0..4),
        leaf in identifier(),
    ) {
        let conf = Conf::default();
        conf.set(format!("//{leaf}"), 1).unwrap();
        let mut p = prefix;
        p.push(leaf);
        prop_assert_eq!(conf.get(p.join("/")).unwrap(), Value::from(1));
    }
}
