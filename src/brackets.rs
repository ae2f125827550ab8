#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Group(Vec<Node>),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Node {
        Node::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            Node::Group(_) => None,
        }
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, Node::Text(text) if text.is_empty())
    }
}

pub fn parse(input: &str) -> Vec<Node> {
    // Each open group is a stack entry; the last child of the innermost group
    // is always the text leaf currently being appended to.
    let mut stack: Vec<Vec<Node>> = vec![vec![Node::text("")]];

    for ch in input.chars() {
        match ch {
            '(' => stack.push(vec![Node::text("")]),
            ')' if stack.len() > 1 => {
                let closed = stack.pop().unwrap_or_default();
                let parent = current(&mut stack);
                parent.push(Node::Group(closed));
                parent.push(Node::text(""));
            }
            _ => push_char(current(&mut stack), ch),
        }
    }

    while stack.len() > 1 {
        let closed = stack.pop().unwrap_or_default();
        let parent = current(&mut stack);
        parent.push(Node::Group(closed));
        parent.push(Node::text(""));
    }

    stack.pop().unwrap_or_default()
}

pub fn stringify(nodes: &[Node]) -> String {
    let mut out = String::new();
    write_nodes(&mut out, nodes);
    out
}

fn write_nodes(out: &mut String, nodes: &[Node]) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Group(children) => {
                out.push('(');
                write_nodes(out, children);
                out.push(')');
            }
        }
    }
}

fn current(stack: &mut Vec<Vec<Node>>) -> &mut Vec<Node> {
    if stack.is_empty() {
        stack.push(Vec::new());
    }
    let last = stack.len() - 1;
    &mut stack[last]
}

fn push_char(group: &mut Vec<Node>, ch: char) {
    match group.last_mut() {
        Some(Node::Text(text)) => text.push(ch),
        _ => group.push(Node::Text(ch.to_string())),
    }
}
