use std::collections::BTreeMap;

use serde::Deserialize;

use crate::browsers::Browsers;

/// One row of the prefix table: which browsers need a vendor prefix for a
/// name. Rows with `props` describe value or function names that are only
/// prefixed inside those properties (`*` matches every property).
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct PrefixEntry {
    #[serde(default)]
    pub browsers: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub props: Vec<String>,
}

impl PrefixEntry {
    pub fn is_value(&self) -> bool {
        !self.props.is_empty()
    }

    fn applies_to(&self, prop: &str) -> bool {
        self.props.iter().any(|candidate| candidate == prop || candidate == "*")
    }
}

#[derive(Clone, Debug, Default)]
pub struct Prefixes {
    data: BTreeMap<String, PrefixEntry>,
    browsers: Browsers,
    add: BTreeMap<String, Vec<String>>,
}

impl Prefixes {
    pub fn new(data: BTreeMap<String, PrefixEntry>, browsers: Browsers) -> Prefixes {
        let add = select(&data, &browsers);
        Prefixes {
            data,
            browsers,
            add,
        }
    }

    /// Rebuilds the lookup for a different browser selection over the same
    /// table.
    pub fn with_browsers(&self, browsers: Browsers) -> Prefixes {
        Prefixes::new(self.data.clone(), browsers)
    }

    pub fn browsers(&self) -> &Browsers {
        &self.browsers
    }

    /// Prefixes a name needs for the selected browsers, in table order.
    pub fn prefixes_for(&self, name: &str) -> &[String] {
        self.add.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn property_prefixes(&self, prop: &str) -> &[String] {
        match self.data.get(prop) {
            Some(entry) if !entry.is_value() => self.prefixes_for(prop),
            _ => &[],
        }
    }

    /// Every value or function name the table lists for `prop`, whether or
    /// not the current selection needs it prefixed.
    pub fn value_names(&self, prop: &str) -> Vec<&str> {
        self.data
            .iter()
            .filter(|(_, entry)| entry.applies_to(prop))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Value and function names that need a prefix inside `prop`, each with
    /// its required prefixes.
    pub fn values(&self, prop: &str) -> Vec<(&str, &[String])> {
        self.data
            .iter()
            .filter(|(_, entry)| entry.applies_to(prop))
            .map(|(name, _)| (name.as_str(), self.prefixes_for(name)))
            .filter(|(_, prefixes)| !prefixes.is_empty())
            .collect()
    }
}

fn select(
    data: &BTreeMap<String, PrefixEntry>,
    browsers: &Browsers,
) -> BTreeMap<String, Vec<String>> {
    let mut add = BTreeMap::new();
    for (name, entry) in data {
        let mut prefixes: Vec<String> = Vec::new();
        for browser in entry.browsers.iter().filter(|b| browsers.is_selected(b)) {
            let Some(prefix) = browsers.prefix(browser) else {
                continue;
            };
            if !prefixes.iter().any(|known| known == prefix) {
                prefixes.push(prefix.to_owned());
            }
        }
        if !prefixes.is_empty() {
            add.insert(name.clone(), prefixes);
        }
    }
    add
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

/// Splits a leading vendor prefix (`-moz-`) off a name. Custom properties and
/// names with nothing after the prefix are not considered prefixed.
pub fn split_vendor(name: &str) -> Option<(&str, &str)> {
    let rest = name.strip_prefix('-')?;
    let end = rest.find('-')?;
    let vendor = &rest[..end];
    let unprefixed = &rest[end + 1..];
    if vendor.is_empty()
        || !vendor.chars().all(|ch| ch.is_ascii_alphabetic())
        || unprefixed.is_empty()
    {
        return None;
    }
    Some((&name[..end + 2], unprefixed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browsers::BrowserInfo;

    fn prefixes(selected: &[&str]) -> Prefixes {
        let browsers = Browsers::new(
            BTreeMap::from([
                (
                    "firefox".to_owned(),
                    BrowserInfo {
                        prefix: "moz".to_owned(),
                    },
                ),
                (
                    "chrome".to_owned(),
                    BrowserInfo {
                        prefix: "webkit".to_owned(),
                    },
                ),
            ]),
            selected.iter().map(|s| s.to_string()).collect(),
        )
        .unwrap();
        let data = BTreeMap::from([
            (
                "a".to_owned(),
                PrefixEntry {
                    browsers: vec![
                        "firefox 22".to_owned(),
                        "chrome 30".to_owned(),
                        "firefox 21".to_owned(),
                    ],
                    props: Vec::new(),
                },
            ),
            (
                "b".to_owned(),
                PrefixEntry {
                    browsers: vec!["firefox 22".to_owned()],
                    props: vec!["c".to_owned()],
                },
            ),
        ]);
        Prefixes::new(data, browsers)
    }

    #[test]
    fn collects_prefixes_in_table_order() {
        let all = prefixes(&["firefox 22", "firefox 21", "chrome 30"]);
        assert_eq!(all.property_prefixes("a"), ["-moz-", "-webkit-"]);
        assert!(all.property_prefixes("b").is_empty());

        let only_chrome = all.with_browsers(all.browsers().filtered(&["chrome 30".to_owned()]));
        assert_eq!(only_chrome.property_prefixes("a"), ["-webkit-"]);
    }

    #[test]
    fn values_are_scoped_to_their_properties() {
        let all = prefixes(&["firefox 22"]);
        assert_eq!(all.values("c"), vec![("b", &["-moz-".to_owned()][..])]);
        assert!(all.values("d").is_empty());

        let none_selected = prefixes(&[]);
        assert!(none_selected.values("c").is_empty());
        assert_eq!(none_selected.value_names("c"), ["b"]);
        assert!(none_selected.value_names("a").is_empty());
    }

    #[test]
    fn props_accepts_a_single_string() {
        let entry: PrefixEntry =
            serde_json::from_str(r#"{"browsers": ["firefox 22"], "props": "c"}"#).unwrap();
        assert_eq!(entry.props, ["c"]);
        assert!(entry.is_value());
    }

    #[test]
    fn splits_vendor_prefixes() {
        assert_eq!(split_vendor("-moz-a"), Some(("-moz-", "a")));
        assert_eq!(split_vendor("-webkit-box-shadow"), Some(("-webkit-", "box-shadow")));
        assert_eq!(split_vendor("-b-"), None);
        assert_eq!(split_vendor("--custom"), None);
        assert_eq!(split_vendor("color"), None);
    }
}
