use std::sync::Arc;
use std::thread;

use supports_prefixer::{Error, PrefixConfig, Supports, SupportsRule};

const FIXTURE: &str = r#"{
    "browsers": {
        "firefox": { "prefix": "moz" },
        "chrome": { "prefix": "-webkit-" }
    },
    "selected": ["firefox 22", "firefox 21", "chrome 20"],
    "supports": ["firefox 22", "chrome 28"],
    "prefixes": {
        "a": { "browsers": ["firefox 22", "chrome 20"] },
        "b": { "browsers": ["firefox 22"], "props": "c" },
        "mask": { "browsers": ["chrome 20"] },
        "box": { "browsers": ["chrome 20"], "props": ["display"] }
    }
}"#;

fn supports() -> Supports {
    Supports::from_config(PrefixConfig::from_json(FIXTURE).unwrap()).unwrap()
}

fn process(supports: &Supports, params: &str) -> String {
    let mut rule = SupportsRule::new(params);
    supports.process(&mut rule);
    rule.params
}

#[test]
fn ignores_browsers_without_supports_rule() {
    let supports = supports();
    assert_eq!(supports.prefixer().browsers().selected(), ["firefox 22"]);

    // chrome 20 needs -webkit-mask but cannot evaluate @supports.
    assert_eq!(process(&supports, "(mask: none)"), "(mask: none)");
    assert_eq!(process(&supports, "(a: 1)"), "((-moz-a: 1) or (a: 1))");
}

#[test]
fn rewrites_nested_conditions() {
    let supports = supports();
    assert_eq!(
        process(&supports, "((a: 1) and (c: b)) or (d: 1)"),
        "(((-moz-a: 1) or (a: 1)) and ((c: -moz-b) or (c: b))) or (d: 1)"
    );
}

#[test]
fn replaces_stale_prefixed_alternatives() {
    let supports = supports();
    assert_eq!(
        process(&supports, "(-moz-a: 1) or (a: 1)"),
        "((-moz-a: 1) or (a: 1))"
    );
    assert_eq!(
        process(&supports, "(-moz-a: 1) or (b: 2)"),
        "(-moz-a: 1) or (b: 2)"
    );
}

#[test]
fn keeps_prefixed_values_without_a_matching_twin() {
    let supports = supports();
    assert_eq!(
        process(&supports, "(display: -webkit-box) or (display: flex)"),
        "(display: -webkit-box) or (display: flex)"
    );
    assert_eq!(
        process(&supports, "(display: -webkit-box) or (display: box)"),
        "(display: box)"
    );
}

#[test]
fn leaves_unparseable_conditions_alone() {
    let supports = supports();
    for params in ["", "   ", "selector(a > b)", "(color black)", "a: 1)"] {
        assert_eq!(process(&supports, params), params);
    }
}

#[test]
fn shares_engine_between_threads() {
    let supports = Arc::new(supports());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let supports = Arc::clone(&supports);
            thread::spawn(move || process(&supports, "(c: b(1))"))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), "((c: -moz-b(1)) or (c: b(1)))");
    }
}

#[test]
fn rejects_unknown_browsers() {
    let err = PrefixConfig::from_json(r#"{"selected": ["opera 12"]}"#)
        .and_then(Supports::from_config)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownBrowser { .. }));
}
