use tracing::{debug, debug_span, trace};

use crate::brackets::{self, Node};
use crate::config::{Options, PrefixConfig};
use crate::css::{Declaration, Rule, SupportsRule};
use crate::error::Result;
use crate::prefixes::{Prefixes, split_vendor};

const FLEXBOX_PROPERTIES: [&str; 4] = ["order", "justify-content", "align-items", "align-content"];

/// Rewrites `@supports` conditions so that declarations also match browsers
/// that only know their vendor-prefixed form.
#[derive(Clone, Debug)]
pub struct Supports {
    prefixer: Prefixes,
    options: Options,
}

impl Supports {
    /// `supported` lists the browsers that can evaluate `@supports` at all;
    /// every other selected browser is ignored.
    pub fn new(all: &Prefixes, supported: &[String], options: Options) -> Supports {
        let browsers = all.browsers().filtered(supported);
        Supports {
            prefixer: all.with_browsers(browsers),
            options,
        }
    }

    pub fn from_config(config: PrefixConfig) -> Result<Supports> {
        let (all, supported, options) = config.build()?;
        Ok(Supports::new(&all, &supported, options))
    }

    pub fn prefixer(&self) -> &Prefixes {
        &self.prefixer
    }

    pub fn parse<'a>(&self, fragment: &'a str) -> (&'a str, &'a str) {
        parse_declaration(fragment)
    }

    pub fn virtual_rule(&self, fragment: &str) -> Rule {
        let (name, value) = parse_declaration(fragment);
        let mut rule = Rule::new("a");
        rule.append(Declaration {
            name: name.to_owned(),
            value: value.to_owned(),
        });
        rule
    }

    /// Prefixed variants of a declaration fragment followed by the fragment
    /// itself. Returns just the fragment when nothing needs a prefix.
    pub fn prefixed(&self, fragment: &str) -> Vec<String> {
        let rule = self.virtual_rule(fragment);
        let mut variants = match rule.first() {
            Some(decl) if decl.name.is_empty() || decl.value.is_empty() => Vec::new(),
            Some(decl) if self.disabled(decl) => Vec::new(),
            Some(decl) => self.variants(decl),
            None => Vec::new(),
        };
        if !variants.is_empty() {
            trace!(fragment, ?variants, "generated prefixed declarations");
        }
        variants.push(fragment.to_owned());
        variants
    }

    /// Drops prefixed declarations whose unprefixed twin is an `or`
    /// alternative at the same level. `original` is the condition text the
    /// tree was parsed from.
    pub fn remove(&self, nodes: Vec<Node>, original: &str) -> Vec<Node> {
        let _span = debug_span!("remove", condition = original).entered();
        self.remove_redundant(nodes)
    }

    pub fn process(&self, rule: &mut SupportsRule) {
        let ast = normalize(brackets::parse(&rule.params));
        let ast = self.remove(ast, &rule.params);
        let ast = self.add(ast);
        let ast = clean_brackets(ast);

        let params = brackets::stringify(&ast);
        if params != rule.params {
            debug!(from = %rule.params, to = %params, "prefixed @supports condition");
        }
        rule.params = params;
    }

    fn add(&self, nodes: Vec<Node>) -> Vec<Node> {
        nodes
            .into_iter()
            .map(|node| match node {
                Node::Group(children) => {
                    let variants = match children.as_slice() {
                        [Node::Text(text)] => Some(self.prefixed(text)),
                        _ => None,
                    };
                    match variants {
                        Some(variants) if variants.len() > 1 => Node::Group(alternatives(variants)),
                        Some(_) => Node::Group(children),
                        None => Node::Group(self.add(children)),
                    }
                }
                text => text,
            })
            .collect()
    }

    fn remove_redundant(&self, mut nodes: Vec<Node>) -> Vec<Node> {
        let mut idx = 0;
        while idx < nodes.len() {
            if self.is_redundant(&nodes, idx) {
                if let Some(text) = declaration(&nodes[idx]) {
                    debug!(declaration = text, "dropping redundant prefixed alternative");
                }
                if joins(nodes.get(idx + 1)) {
                    nodes.drain(idx..idx + 2);
                    continue;
                }
                if idx >= 1 {
                    nodes.drain(idx - 1..=idx);
                    idx -= 1;
                    continue;
                }
            }

            if let Node::Group(children) = &mut nodes[idx] {
                *children = self.remove_redundant(std::mem::take(children));
            }
            idx += 1;
        }
        nodes
    }

    fn is_redundant(&self, nodes: &[Node], idx: usize) -> bool {
        let Some(text) = declaration(&nodes[idx]) else {
            return false;
        };
        if idx > 0 && has_keyword(&nodes[idx - 1], "not") {
            return false;
        }

        let siblings = or_run(nodes, idx);
        if siblings.is_empty() {
            return false;
        }

        let (name, value) = parse_declaration(text);
        if let Some((_, bare)) = split_vendor(name) {
            return siblings
                .iter()
                .any(|sibling| parse_declaration(sibling) == (bare, value));
        }

        // Only value names the table knows for this property count as
        // prefixed, and the twin must carry the same value once unprefixed.
        let names = self.prefixer.value_names(name);
        let (canonical, prefixed) = canonical_value(value, &names);
        if !prefixed {
            return false;
        }
        siblings.iter().any(|sibling| {
            let (sibling_name, sibling_value) = parse_declaration(sibling);
            let (sibling_canonical, sibling_prefixed) = canonical_value(sibling_value, &names);
            sibling_name == name && !sibling_prefixed && sibling_canonical == canonical
        })
    }

    fn variants(&self, decl: &Declaration) -> Vec<String> {
        let property = self.prefixer.property_prefixes(&decl.name);
        if !property.is_empty() {
            return property
                .iter()
                .map(|prefix| format!("{prefix}{}: {}", decl.name, decl.value))
                .collect();
        }

        let values = self.prefixer.values(&decl.name);
        let mut order: Vec<&str> = Vec::new();
        for prefix in values.iter().flat_map(|(_, prefixes)| prefixes.iter()) {
            if !order.contains(&prefix.as_str()) {
                order.push(prefix);
            }
        }

        order
            .into_iter()
            .filter_map(|prefix| {
                let mut value = decl.value.clone();
                for (name, prefixes) in &values {
                    if prefixes.iter().any(|candidate| candidate == prefix) {
                        value = prefix_value(&value, name, prefix);
                    }
                }
                (value != decl.value).then(|| format!("{}: {}", decl.name, value))
            })
            .collect()
    }

    fn disabled(&self, decl: &Declaration) -> bool {
        let name = decl.name.as_str();
        if !self.options.grid {
            if name == "display" && decl.value.contains("grid") {
                return true;
            }
            if name.contains("grid") {
                return true;
            }
        }
        if !self.options.flexbox {
            if name == "display" && decl.value.contains("flex") {
                return true;
            }
            if name.contains("flex") || FLEXBOX_PROPERTIES.contains(&name) {
                return true;
            }
        }
        false
    }
}

/// Splits `property: value` at the first colon. Without a colon the whole
/// fragment is the property and the value is empty.
pub fn parse_declaration(fragment: &str) -> (&str, &str) {
    match fragment.split_once(':') {
        Some((name, value)) => (name.trim(), value.trim()),
        None => (fragment.trim(), ""),
    }
}

/// Drops empty leaves and folds groups that start with a declaration (or a
/// `selector(...)` test) back into a single leaf, undoing the split the
/// bracket parser makes at function arguments.
pub fn normalize(nodes: Vec<Node>) -> Vec<Node> {
    let nodes: Vec<Node> = nodes.into_iter().filter(|node| !node.is_empty_text()).collect();

    if let Some(Node::Text(first)) = nodes.first() {
        let first = first.trim();
        if first.contains(':')
            || first.eq_ignore_ascii_case("selector")
            || first.eq_ignore_ascii_case("not selector")
        {
            return vec![Node::Text(brackets::stringify(&nodes))];
        }
    }

    nodes
        .into_iter()
        .map(|node| match node {
            Node::Group(children) => Node::Group(normalize(children)),
            text => text,
        })
        .collect()
}

/// Unwraps groups whose only child is another group, at every depth.
pub fn clean_brackets(nodes: Vec<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .map(|node| match node {
            Node::Group(mut children) => {
                while matches!(children.as_slice(), [Node::Group(_)]) {
                    let Some(Node::Group(inner)) = children.pop() else {
                        break;
                    };
                    children = inner;
                }
                Node::Group(clean_brackets(children))
            }
            text => text,
        })
        .collect()
}

fn alternatives(variants: Vec<String>) -> Vec<Node> {
    let mut out = vec![Node::text("")];
    for variant in variants {
        out.push(Node::Group(vec![Node::Text(variant)]));
        out.push(Node::text(" or "));
    }
    if let Some(last) = out.last_mut() {
        *last = Node::text("");
    }
    out
}

/// Declarations joined to `nodes[idx]` by `or`, excluding `nodes[idx]`.
fn or_run(nodes: &[Node], idx: usize) -> Vec<&str> {
    let mut start = idx;
    while start >= 2 && joins(nodes.get(start - 1)) && declaration(&nodes[start - 2]).is_some() {
        start -= 2;
    }
    let mut end = idx;
    while joins(nodes.get(end + 1)) && nodes.get(end + 2).and_then(declaration).is_some() {
        end += 2;
    }

    (start..=end)
        .step_by(2)
        .filter(|&pos| pos != idx)
        .filter_map(|pos| declaration(&nodes[pos]))
        .collect()
}

fn declaration(node: &Node) -> Option<&str> {
    match node {
        Node::Group(children) => match children.as_slice() {
            [Node::Text(text)] => Some(text),
            _ => None,
        },
        Node::Text(_) => None,
    }
}

fn joins(node: Option<&Node>) -> bool {
    node.is_some_and(|node| has_keyword(node, "or") && !has_keyword(node, "not"))
}

fn has_keyword(node: &Node, keyword: &str) -> bool {
    node.as_text().is_some_and(|text| {
        text.split(|ch: char| ch.is_whitespace())
            .any(|word| word.eq_ignore_ascii_case(keyword))
    })
}

/// Value with every known name unprefixed (`-moz-b` and `-b-` both become
/// `b`), and whether a vendor-prefixed known name was found.
fn canonical_value(value: &str, names: &[&str]) -> (String, bool) {
    let mut prefixed = false;
    let canonical = map_words(value, |word| {
        let vendor = split_vendor(word).map(|(_, rest)| rest);
        let bare = vendor.or_else(|| word.strip_prefix('-')?.strip_suffix('-'))?;
        if !names.iter().any(|name| name.eq_ignore_ascii_case(bare)) {
            return None;
        }
        prefixed |= vendor.is_some();
        Some(bare.to_owned())
    });
    (canonical, prefixed)
}

/// Prefixes every whole-word occurrence of `name` in `value`.
fn prefix_value(value: &str, name: &str, prefix: &str) -> String {
    map_words(value, |word| {
        word.eq_ignore_ascii_case(name)
            .then(|| format!("{prefix}{word}"))
    })
}

/// Rebuilds `value`, letting `rewrite` replace individual words. Words are
/// separated by whitespace, commas and parentheses.
fn map_words(value: &str, mut rewrite: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    let mut start = 0;
    for (idx, ch) in value.char_indices() {
        if ch.is_whitespace() || matches!(ch, ',' | '(' | ')') {
            push_word(&mut out, &value[start..idx], &mut rewrite);
            out.push(ch);
            start = idx + ch.len_utf8();
        }
    }
    push_word(&mut out, &value[start..], &mut rewrite);
    out
}

fn push_word(out: &mut String, word: &str, rewrite: &mut impl FnMut(&str) -> Option<String>) {
    if word.is_empty() {
        return;
    }
    match rewrite(word) {
        Some(replaced) => out.push_str(&replaced),
        None => out.push_str(word),
    }
}
