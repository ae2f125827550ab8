use std::collections::BTreeMap;

use serde::Deserialize;

use crate::browsers::{BrowserInfo, Browsers};
use crate::error::Result;
use crate::prefixes::{PrefixEntry, Prefixes};

/// Switches that keep whole feature families out of `@supports` rewriting.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Options {
    pub grid: bool,
    pub flexbox: bool,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            grid: false,
            flexbox: true,
        }
    }
}

/// Prefix data as loaded from JSON.
///
/// ```json
/// {
///   "browsers": { "firefox": { "prefix": "moz" } },
///   "selected": ["firefox 22", "firefox 21"],
///   "supports": ["firefox 22"],
///   "prefixes": {
///     "a": { "browsers": ["firefox 22"] },
///     "b": { "browsers": ["firefox 22"], "props": "c" }
///   }
/// }
/// ```
///
/// `supports` lists the browsers able to evaluate `@supports` at all.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PrefixConfig {
    #[serde(default)]
    pub browsers: BTreeMap<String, BrowserInfo>,
    #[serde(default)]
    pub selected: Vec<String>,
    #[serde(default)]
    pub supports: Vec<String>,
    #[serde(default)]
    pub prefixes: BTreeMap<String, PrefixEntry>,
    #[serde(default)]
    pub options: Options,
}

impl PrefixConfig {
    pub fn from_json(source: &str) -> Result<PrefixConfig> {
        Ok(serde_json::from_str(source)?)
    }

    /// Validates the browser table and builds the unfiltered lookup.
    pub fn build(self) -> Result<(Prefixes, Vec<String>, Options)> {
        let browsers = Browsers::new(self.browsers, self.selected)?;
        for browser in &self.supports {
            browsers.check_known(browser)?;
        }
        Ok((
            Prefixes::new(self.prefixes, browsers),
            self.supports,
            self.options,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn loads_minimal_document() {
        let config = PrefixConfig::from_json(
            r#"{
                "browsers": {"firefox": {"prefix": "moz"}},
                "selected": ["firefox 22"],
                "supports": ["firefox 22"],
                "prefixes": {"a": {"browsers": ["firefox 22"]}}
            }"#,
        )
        .unwrap();
        assert_eq!(config.options, Options::default());

        let (prefixes, supports, _) = config.build().unwrap();
        assert_eq!(prefixes.property_prefixes("a"), ["-moz-"]);
        assert_eq!(supports, ["firefox 22"]);
    }

    #[test]
    fn reads_options() {
        let config =
            PrefixConfig::from_json(r#"{"options": {"grid": true, "flexbox": false}}"#).unwrap();
        assert!(config.options.grid);
        assert!(!config.options.flexbox);
    }

    #[test]
    fn reports_malformed_json() {
        let err = PrefixConfig::from_json("{\"selected\": 3}").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("invalid prefix configuration"));
    }

    #[test]
    fn rejects_unknown_supports_browser() {
        let config = PrefixConfig::from_json(
            r#"{"browsers": {"firefox": {"prefix": "moz"}}, "supports": ["safari 9"]}"#,
        )
        .unwrap();
        assert!(matches!(
            config.build(),
            Err(Error::UnknownBrowser { browser }) if browser == "safari 9"
        ));
    }
}
