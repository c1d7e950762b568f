use std::collections::BTreeMap;

use crate::{
    animation::{
        path::MotionPath,
        style::{Prop, Style},
    },
    foundation::core::{NodeId, Rect},
    text::metric::CounterFormat,
};

/// Content of a document node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Element with tag, id, classes and attributes.
    Element(ElementData),
    /// Text run.
    Text(String),
}

/// Element identity and attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementData {
    /// Tag name (`section`, `h2`, `span`, ...).
    pub tag: String,
    /// Optional unique id.
    pub id: Option<String>,
    /// Class list in declaration order.
    pub classes: Vec<String>,
    /// Remaining attributes.
    pub attrs: BTreeMap<String, String>,
}

#[derive(Clone, Debug)]
struct Slot {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: Rect,
    style: Style,
    counter: Option<CounterFormat>,
    motion: Option<MotionPath>,
}

/// Builder for an element inserted with [`Document::append`].
#[derive(Clone, Debug)]
pub struct Element {
    data: ElementData,
    rect: Rect,
    style: Style,
    text: Option<String>,
}

impl Element {
    /// New element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            data: ElementData {
                tag: tag.into(),
                ..ElementData::default()
            },
            rect: Rect::ZERO,
            style: Style::new(),
            text: None,
        }
    }

    /// Set the element id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.data.id = Some(id.into());
        self
    }

    /// Add a class.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.data.classes.push(class.into());
        self
    }

    /// Set an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.attrs.insert(name.into(), value.into());
        self
    }

    /// Layout box in document coordinates.
    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Initial style.
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Single text child.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

#[derive(Clone, Debug)]
struct Entry {
    generation: u32,
    slot: Option<Slot>,
}

/// Retained element tree the motion engine reads layout from and writes styles into.
///
/// Every accessor taking a [`NodeId`] returns `None`/`false` for removed nodes; callers treat
/// that as "element not mounted" and skip their work.
#[derive(Clone, Debug)]
pub struct Document {
    slots: Vec<Entry>,
    free: Vec<u32>,
    root: NodeId,
    stashed: BTreeMap<NodeId, Vec<NodeId>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document with a `body` root.
    pub fn new() -> Self {
        let root = Slot {
            kind: NodeKind::Element(ElementData {
                tag: "body".to_string(),
                ..ElementData::default()
            }),
            parent: None,
            children: Vec::new(),
            rect: Rect::ZERO,
            style: Style::new(),
            counter: None,
            motion: None,
        };
        Self {
            slots: vec![Entry {
                generation: 0,
                slot: Some(root),
            }],
            free: Vec::new(),
            root: NodeId::new(0),
            stashed: BTreeMap::new(),
        }
    }

    /// Root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn slot(&self, id: NodeId) -> Option<&Slot> {
        self.slots
            .get(id.index() as usize)
            .filter(|e| e.generation == id.generation())
            .and_then(|e| e.slot.as_ref())
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|e| e.generation == id.generation())
            .and_then(|e| e.slot.as_mut())
    }

    fn insert(&mut self, parent: NodeId, kind: NodeKind, rect: Rect, style: Style) -> NodeId {
        let slot = Slot {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            rect,
            style,
            counter: None,
            motion: None,
        };
        if let Some(index) = self.free.pop() {
            if let Some(entry) = self.slots.get_mut(index as usize) {
                entry.slot = Some(slot);
                return NodeId::with_generation(index, entry.generation);
            }
        }
        let index = self.slots.len() as u32;
        self.slots.push(Entry {
            generation: 0,
            slot: Some(slot),
        });
        NodeId::new(index)
    }

    /// Append `element` under `parent`. Returns `None` when `parent` does not exist.
    pub fn append(&mut self, parent: NodeId, element: Element) -> Option<NodeId> {
        self.slot(parent)?;
        let Element {
            data,
            rect,
            style,
            text,
        } = element;
        let id = self.insert(parent, NodeKind::Element(data), rect, style);
        self.slot_mut(parent)?.children.push(id);
        if let Some(text) = text {
            self.append_text(id, text);
        }
        Some(id)
    }

    /// Append a text run under `parent`. The run inherits the parent's layout box.
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> Option<NodeId> {
        let rect = self.slot(parent)?.rect;
        let id = self.insert(parent, NodeKind::Text(text.into()), rect, Style::new());
        self.slot_mut(parent)?.children.push(id);
        Some(id)
    }

    /// Remove `id` and its subtree. Returns `false` if it was already gone.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || self.slot(id).is_none() {
            return false;
        }
        if let Some(parent) = self.slot(id).and_then(|s| s.parent) {
            if let Some(p) = self.slot_mut(parent) {
                p.children.retain(|c| *c != id);
            }
            if let Some(list) = self.stashed.get_mut(&parent) {
                list.retain(|c| *c != id);
            }
        }
        self.free_subtree(id);
        true
    }

    fn free_subtree(&mut self, id: NodeId) {
        let Some(entry) = self
            .slots
            .get_mut(id.index() as usize)
            .filter(|e| e.generation == id.generation())
        else {
            return;
        };
        let Some(slot) = entry.slot.take() else {
            return;
        };
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.index());
        for child in slot.children {
            self.free_subtree(child);
        }
        if let Some(stash) = self.stashed.remove(&id) {
            for child in stash {
                self.free_subtree(child);
            }
        }
    }

    /// Return `true` when `id` exists and is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cur = id;
        loop {
            if cur == self.root {
                return true;
            }
            let Some(slot) = self.slot(cur) else {
                return false;
            };
            let Some(parent) = slot.parent else {
                return false;
            };
            match self.slot(parent) {
                Some(p) if p.children.contains(&cur) => cur = parent,
                _ => return false,
            }
        }
    }

    /// Number of live nodes, including stashed ones.
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|e| e.slot.is_some()).count()
    }

    /// Arena slots allocated so far, live or free. Freed slots are recycled, so this only
    /// grows with the peak number of live nodes.
    pub fn slot_capacity(&self) -> usize {
        self.slots.len()
    }

    /// Node kind.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.slot(id).map(|s| &s.kind)
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.slot(id)?.kind {
            NodeKind::Element(e) => Some(e),
            NodeKind::Text(_) => None,
        }
    }

    /// Element tag name.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    /// Element id attribute.
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.element(id)?.id.as_deref()
    }

    /// Return `true` when `id` is an element carrying `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    /// Attribute value.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attrs.get(name).map(String::as_str)
    }

    /// Set an attribute on an element.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> bool {
        match self.slot_mut(id).map(|s| &mut s.kind) {
            Some(NodeKind::Element(e)) => {
                e.attrs.insert(name.to_string(), value.into());
                true
            }
            _ => false,
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        match self.slot_mut(id).map(|s| &mut s.kind) {
            Some(NodeKind::Element(e)) => e.attrs.remove(name),
            _ => None,
        }
    }

    /// Parent node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id)?.parent
    }

    /// Current children.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map(|s| s.children.as_slice()).unwrap_or(&[])
    }

    /// Attached descendants of `id` in document order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(cur) = stack.pop() {
            out.push(cur);
            stack.extend(self.children(cur).iter().rev().copied());
        }
        out
    }

    /// Nearest ancestor-or-self element carrying `class`.
    pub fn closest_with_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if self.has_class(n, class) {
                return Some(n);
            }
            cur = self.parent(n);
        }
        None
    }

    /// Layout box.
    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.slot(id).map(|s| s.rect)
    }

    /// Replace the layout box.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) -> bool {
        match self.slot_mut(id) {
            Some(s) => {
                s.rect = rect;
                true
            }
            None => false,
        }
    }

    /// Current style.
    pub fn style(&self, id: NodeId) -> Option<&Style> {
        self.slot(id).map(|s| &s.style)
    }

    /// Current value of `prop`, falling back to its neutral value.
    pub fn prop(&self, id: NodeId, prop: Prop) -> Option<f64> {
        self.slot(id).map(|s| s.style.value(prop))
    }

    /// Write one property. Counter and motion-path bindings react to their properties.
    pub fn set_prop(&mut self, id: NodeId, prop: Prop, value: f64) -> bool {
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        slot.style.set(prop, value);
        match prop {
            Prop::Value => {
                if let Some(text) = slot.counter.as_ref().map(|c| c.render(value)) {
                    self.set_text(id, text);
                }
            }
            Prop::PathProgress => {
                if let Some(p) = slot.motion.as_ref().and_then(|m| m.point_at(value)) {
                    slot.style.set(Prop::X, p.x);
                    slot.style.set(Prop::Y, p.y);
                }
            }
            _ => {}
        }
        true
    }

    /// Write every property of `style`.
    pub fn apply_style(&mut self, id: NodeId, style: &Style) -> bool {
        if self.slot(id).is_none() {
            return false;
        }
        for (prop, value) in style.iter() {
            self.set_prop(id, prop, value);
        }
        true
    }

    /// Render `Prop::Value` writes as counter text.
    pub fn bind_counter(&mut self, id: NodeId, format: CounterFormat) -> bool {
        match self.slot_mut(id) {
            Some(s) => {
                s.counter = Some(format);
                true
            }
            None => false,
        }
    }

    /// Drop a counter binding.
    pub fn unbind_counter(&mut self, id: NodeId) {
        if let Some(s) = self.slot_mut(id) {
            s.counter = None;
        }
    }

    /// Return `true` when `Prop::Value` writes render as counter text.
    pub fn has_counter(&self, id: NodeId) -> bool {
        self.slot(id).is_some_and(|s| s.counter.is_some())
    }

    /// Position the element along `path` on `Prop::PathProgress` writes.
    pub fn bind_motion_path(&mut self, id: NodeId, path: MotionPath) -> bool {
        match self.slot_mut(id) {
            Some(s) => {
                s.motion = Some(path);
                true
            }
            None => false,
        }
    }

    /// Drop a motion path binding; later `Prop::PathProgress` writes only record the value.
    pub fn unbind_motion_path(&mut self, id: NodeId) {
        if let Some(s) = self.slot_mut(id) {
            s.motion = None;
        }
    }

    /// Return `true` when `Prop::PathProgress` writes move the element.
    pub fn has_motion_path(&self, id: NodeId) -> bool {
        self.slot(id).is_some_and(|s| s.motion.is_some())
    }

    /// Concatenated text of all attached descendant text runs.
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        let slot = self.slot(id)?;
        if let NodeKind::Text(t) = &slot.kind {
            return Some(t.clone());
        }
        let mut out = String::new();
        for d in self.descendants(id) {
            if let Some(NodeKind::Text(t)) = self.kind(d) {
                out.push_str(t);
            }
        }
        Some(out)
    }

    /// Replace all children of `id` with one text run.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> bool {
        let text = text.into();
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        if let NodeKind::Text(t) = &mut slot.kind {
            *t = text;
            return true;
        }
        if let [only] = slot.children[..] {
            if let Some(NodeKind::Text(t)) = self.slot_mut(only).map(|s| &mut s.kind) {
                *t = text;
                return true;
            }
        }
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        let children = std::mem::take(&mut slot.children);
        for child in children {
            self.free_subtree(child);
        }
        self.append_text(id, text).is_some()
    }

    /// Serialized inner markup of `id`.
    pub fn inner_html(&self, id: NodeId) -> Option<String> {
        let slot = self.slot(id)?;
        let mut out = String::new();
        match &slot.kind {
            NodeKind::Text(t) => escape_into(&mut out, t),
            NodeKind::Element(_) => {
                for &child in &slot.children {
                    self.outer_html_into(child, &mut out);
                }
            }
        }
        Some(out)
    }

    fn outer_html_into(&self, id: NodeId, out: &mut String) {
        let Some(slot) = self.slot(id) else {
            return;
        };
        match &slot.kind {
            NodeKind::Text(t) => escape_into(out, t),
            NodeKind::Element(e) => {
                out.push('<');
                out.push_str(&e.tag);
                if let Some(id) = &e.id {
                    out.push_str(&format!(" id=\"{id}\""));
                }
                if !e.classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", e.classes.join(" ")));
                }
                for (k, v) in &e.attrs {
                    out.push_str(&format!(" {k}=\"{v}\""));
                }
                out.push('>');
                for &child in &slot.children {
                    self.outer_html_into(child, out);
                }
                out.push_str(&format!("</{}>", e.tag));
            }
        }
    }

    /// Detach the current children of `id` so a decoration can replace them.
    ///
    /// Only the first call stores children; the pristine content is what
    /// [`Document::restore_children`] brings back, however many decorations were stacked.
    pub fn stash_children(&mut self, id: NodeId) -> bool {
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        let children = std::mem::take(&mut slot.children);
        if self.stashed.contains_key(&id) {
            for child in children {
                self.free_subtree(child);
            }
        } else {
            self.stashed.insert(id, children);
        }
        true
    }

    /// Drop decoration children of `id` and reattach the stashed pristine ones.
    pub fn restore_children(&mut self, id: NodeId) -> bool {
        let Some(stash) = self.stashed.remove(&id) else {
            return false;
        };
        let Some(slot) = self.slot_mut(id) else {
            return false;
        };
        let decoration = std::mem::replace(&mut slot.children, stash);
        for child in decoration {
            self.free_subtree(child);
        }
        true
    }

    /// Return `true` when `id` has stashed pristine children.
    pub fn is_decorated(&self, id: NodeId) -> bool {
        self.stashed.contains_key(&id)
    }
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dom/document.rs"]
mod tests;
