use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct BrowserInfo {
    pub prefix: String,
}

/// Browser families with their vendor prefix, plus the selected
/// `family version` identifiers.
#[derive(Clone, Debug, Default)]
pub struct Browsers {
    data: BTreeMap<String, BrowserInfo>,
    selected: Vec<String>,
}

impl Browsers {
    pub fn new(data: BTreeMap<String, BrowserInfo>, selected: Vec<String>) -> Result<Browsers> {
        let mut normalized = BTreeMap::new();
        for (family, info) in data {
            let prefix = normalize_prefix(&info.prefix);
            if prefix.is_empty() {
                return Err(Error::EmptyPrefix { family });
            }
            normalized.insert(family, BrowserInfo { prefix });
        }

        let browsers = Browsers {
            data: normalized,
            selected: Vec::new(),
        };
        for browser in &selected {
            browsers.check_known(browser)?;
        }

        Ok(Browsers {
            selected: dedup(selected),
            ..browsers
        })
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, browser: &str) -> bool {
        self.selected.iter().any(|selected| selected == browser)
    }

    /// Vendor prefix for a `family version` identifier, e.g. `-moz-` for
    /// `firefox 22`.
    pub fn prefix(&self, browser: &str) -> Option<&str> {
        self.data
            .get(family(browser))
            .map(|info| info.prefix.as_str())
    }

    pub fn check_known(&self, browser: &str) -> Result<()> {
        if self.data.contains_key(family(browser)) {
            return Ok(());
        }
        Err(Error::UnknownBrowser {
            browser: browser.to_owned(),
        })
    }

    /// Same browser table restricted to the selected browsers that also appear
    /// in `allowed`.
    pub fn filtered(&self, allowed: &[String]) -> Browsers {
        Browsers {
            data: self.data.clone(),
            selected: self
                .selected
                .iter()
                .filter(|browser| allowed.contains(browser))
                .cloned()
                .collect(),
        }
    }
}

fn family(browser: &str) -> &str {
    let browser = browser.trim();
    browser
        .split_once(char::is_whitespace)
        .map_or(browser, |(family, _)| family)
}

fn normalize_prefix(prefix: &str) -> String {
    let core = prefix.trim().trim_matches('-');
    if core.is_empty() {
        return String::new();
    }
    format!("-{core}-")
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}
