use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Rule,
    Declaration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
}

impl Declaration {
    pub fn kind(&self) -> NodeKind {
        NodeKind::Declaration
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            return f.write_str(&self.name);
        }
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// A style rule holding raw declarations. Used to carry a single `@supports`
/// declaration through the prefixer without a stylesheet around it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
}

impl Rule {
    pub fn new(selector: impl Into<String>) -> Rule {
        Rule {
            selector: selector.into(),
            declarations: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::Rule
    }

    pub fn first(&self) -> Option<&Declaration> {
        self.declarations.first()
    }

    pub fn append(&mut self, declaration: Declaration) {
        self.declarations.push(declaration);
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.selector)?;
        for (idx, declaration) in self.declarations.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{declaration}")?;
        }
        f.write_str("}")
    }
}

/// The rule object whose condition text `process` rewrites in place: the
/// params of an `@supports` at-rule, without the keyword.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SupportsRule {
    pub params: String,
}

impl SupportsRule {
    pub fn new(params: impl Into<String>) -> SupportsRule {
        SupportsRule {
            params: params.into(),
        }
    }
}
