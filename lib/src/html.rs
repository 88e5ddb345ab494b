//! A mutable HTML document tree and the handful of DOM operations the
//! rewriter needs.
//!
//! Nodes are [`markup5ever_rcdom`] handles. Traversals return snapshots: a
//! `Vec` of handles collected before any mutation, so callers can rename,
//! replace, or re-parent nodes while iterating.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::TendrilSink;
use html5ever::{ns, parse_document, Attribute, LocalName, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};

use crate::error::{Chainable, Error, Result};

/// A parsed HTML document.
pub struct Document {
    dom: RcDom,
}

impl Document {
    /// Parses `html` as a complete document. Parsing never fails: malformed
    /// markup is repaired the way a browser would.
    pub fn parse(html: &str) -> Document {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);
        Document { dom }
    }

    /// The document node.
    pub fn root(&self) -> &Handle {
        &self.dom.document
    }

    /// Every element in document order.
    pub fn elements(&self) -> Vec<Handle> {
        descendants(self.root())
            .into_iter()
            .filter(|node| element_name(node).is_some())
            .collect()
    }

    /// Every element named `tag`, in document order.
    pub fn elements_named(&self, tag: &str) -> Vec<Handle> {
        descendants(self.root())
            .into_iter()
            .filter(|node| is_element(node, tag))
            .collect()
    }

    /// Serializes the document. Empty `<h2></h2>` elements are dropped.
    pub fn to_html(&self) -> Result<String> {
        let mut bytes = vec![];
        let handle = SerializableHandle::from(self.root().clone());
        serialize(&mut bytes, &handle, SerializeOpts::default())
            .chain_with(|| error!("failed to serialize document"))?;

        let html = String::from_utf8(bytes).map_err(Error::from_std)?;
        Ok(html.replace("<h2></h2>", ""))
    }
}

/// Collects `node` and all of its descendants, preorder, without recursing.
pub fn descendants(node: &Handle) -> Vec<Handle> {
    let mut nodes = vec![];
    let mut stack = vec![node.clone()];
    while let Some(node) = stack.pop() {
        stack.extend(node.children.borrow().iter().rev().cloned());
        nodes.push(node);
    }

    nodes
}

/// The local name of `node` if it is an element.
pub fn element_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

pub fn is_element(node: &Handle, tag: &str) -> bool {
    element_name(node) == Some(tag)
}

/// The parent of `node`, if it has one.
pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(Weak::upgrade);
    node.parent.set(weak);
    parent
}

/// Whether any ancestor of `node` is an element named `tag`.
pub fn has_ancestor(node: &Handle, tag: &str) -> bool {
    let mut current = parent(node);
    while let Some(node) = current {
        if is_element(&node, tag) {
            return true;
        }

        current = parent(&node);
    }

    false
}

pub fn attr(node: &Handle, name: &str) -> Option<String> {
    let NodeData::Element { attrs, .. } = &node.data else { return None };
    let attrs = attrs.borrow();
    attrs.iter()
        .find(|attr| &*attr.name.local == name)
        .map(|attr| attr.value.to_string())
}

/// Sets attribute `name` to `value`, adding it if it doesn't exist.
pub fn set_attr(node: &Handle, name: &str, value: &str) {
    let NodeData::Element { attrs, .. } = &node.data else { return };
    let mut attrs = attrs.borrow_mut();
    match attrs.iter_mut().find(|attr| &*attr.name.local == name) {
        Some(attr) => attr.value = value.into(),
        None => attrs.push(attribute(name, value)),
    }
}

/// Removes attribute `name`, returning its value if it was present.
pub fn remove_attr(node: &Handle, name: &str) -> Option<String> {
    let NodeData::Element { attrs, .. } = &node.data else { return None };
    let mut attrs = attrs.borrow_mut();
    let i = attrs.iter().position(|attr| &*attr.name.local == name)?;
    Some(attrs.remove(i).value.to_string())
}

/// The tokens of the `class` attribute.
pub fn classes(node: &Handle) -> Vec<String> {
    attr(node, "class")
        .map(|list| list.split_whitespace().map(String::from).collect())
        .unwrap_or_default()
}

pub fn has_class(node: &Handle, class: &str) -> bool {
    classes(node).iter().any(|c| c == class)
}

/// Adds each of `new` to the class list unless it is already there.
pub fn add_classes(node: &Handle, new: &[&str]) {
    let mut list = classes(node);
    let len = list.len();
    for class in new {
        if !list.iter().any(|c| c == class) {
            list.push(class.to_string());
        }
    }

    if list.len() != len {
        set_attr(node, "class", &list.join(" "));
    }
}

/// Removes every occurrence of `class`. An emptied `class` attribute is
/// removed entirely.
pub fn remove_class(node: &Handle, class: &str) {
    let mut list = classes(node);
    let len = list.len();
    list.retain(|c| c != class);
    if list.len() == len {
        return;
    }

    match list.is_empty() {
        true => { remove_attr(node, "class"); },
        false => set_attr(node, "class", &list.join(" ")),
    }
}

/// The concatenated text of every text node under `node`.
pub fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    for node in descendants(node) {
        if let NodeData::Text { contents } = &node.data {
            text.push_str(&contents.borrow());
        }
    }

    text
}

/// Appends `child` as the last child of `parent`.
pub fn append(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Replaces the children of `node` with `children`.
pub fn set_children(node: &Handle, children: Vec<Handle>) {
    for old in node.children.take() {
        old.parent.set(None);
    }

    for child in children {
        append(node, child);
    }
}

/// Replaces the element `node` with a new element named `tag` carrying the
/// same attributes and children. Returns the new element.
pub fn rename(node: &Handle, tag: &str) -> Handle {
    let attrs = match &node.data {
        NodeData::Element { attrs, .. } => attrs.borrow().clone(),
        _ => vec![],
    };

    let renamed = new_element(tag, attrs);
    set_children(&renamed, node.children.take());

    if let Some(parent) = parent(node) {
        let mut siblings = parent.children.borrow_mut();
        if let Some(slot) = siblings.iter_mut().find(|n| Rc::ptr_eq(n, node)) {
            renamed.parent.set(Some(Rc::downgrade(&parent)));
            *slot = renamed.clone();
        }
    }

    node.parent.set(None);
    renamed
}

/// A new, parentless element named `tag` with the given attributes.
pub fn element(tag: &str, attrs: &[(&str, &str)]) -> Handle {
    let attrs = attrs.iter().map(|(name, value)| attribute(name, value)).collect();
    new_element(tag, attrs)
}

/// A new, parentless text node.
pub fn text(contents: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(vec![]),
        data: NodeData::Text { contents: RefCell::new(contents.into()) },
    })
}

fn new_element(tag: &str, attrs: Vec<Attribute>) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(vec![]),
        data: NodeData::Element {
            name: QualName::new(None, ns!(html), LocalName::from(tag)),
            attrs: RefCell::new(attrs),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

fn attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, ns!(), LocalName::from(name)),
        value: value.into(),
    }
}
