//! Minimal UI element tree produced by the field adapters.
//!
//! Nodes are plain data so tests can inspect them; `to_html` serialises a
//! tree for server-side rendering.

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Fragment(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

const VOID_TAGS: &[&str] = &["input", "img", "br", "hr"];

impl Node {
    pub fn element(tag: &str) -> Self {
        Node::Element(Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn empty() -> Self {
        Node::Fragment(Vec::new())
    }

    /// Adds an attribute. No-op on text and fragment nodes.
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        if let Node::Element(el) = &mut self {
            el.attrs.push((name.to_string(), value.into()));
        }
        self
    }

    /// Adds a boolean attribute when `on` is set.
    pub fn flag(self, name: &str, on: bool) -> Self {
        if on { self.attr(name, name) } else { self }
    }

    pub fn child(mut self, child: Node) -> Self {
        match &mut self {
            Node::Element(el) => el.children.push(child),
            Node::Fragment(nodes) => nodes.push(child),
            Node::Text(_) => {}
        }
        self
    }

    pub fn children(self, children: impl IntoIterator<Item = Node>) -> Self {
        children.into_iter().fold(self, Node::child)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        match self {
            Node::Element(el) => el.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Element(el) => Some(&el.tag),
            _ => None,
        }
    }

    /// Depth-first search for the first node carrying `attr=value`.
    pub fn find_by_attr(&self, attr: &str, value: &str) -> Option<&Node> {
        if self.get_attr(attr) == Some(value) {
            return Some(self);
        }
        let nested = match self {
            Node::Element(el) => &el.children,
            Node::Fragment(nodes) => nodes,
            Node::Text(_) => return None,
        };
        nested.iter().find_map(|n| n.find_by_attr(attr, value))
    }

    /// Concatenated text content of the subtree.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(t) => t.clone(),
            Node::Element(Element { children, .. }) | Node::Fragment(children) => {
                children.iter().map(Node::text_content).collect()
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&escape(t)),
            Node::Fragment(nodes) => nodes.iter().for_each(|n| n.write_html(out)),
            Node::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (k, v) in &el.attrs {
                    out.push_str(&format!(r#" {}="{}""#, k, escape(v)));
                }
                out.push('>');
                if VOID_TAGS.contains(&el.tag.as_str()) {
                    return;
                }
                el.children.iter().for_each(|n| n.write_html(out));
                out.push_str(&format!("</{}>", el.tag));
            }
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
