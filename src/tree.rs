//! Arena-based retained document: the node tree toasts are built from.
//!
//! The Document plays the part of the host's rendering surface. It stores nodes with
//! class markers, inline style, content and listeners, answers the layout queries the
//! toast lifecycle relies on, and interpolates property transitions against the
//! surface clock.
//!
//! ## Key Features
//!
//! - **Generational Indices**: NodeId contains index + generation, so a stale id held by a
//!   timer or a listener can never reach a node that reused the slot.
//!
//! - **Ownership**: Removing a node frees its whole subtree, dropping listeners with it.
//!   Detaching only unlinks it from its parent.
//!
//! - **Layout Queries**: `offset_width`, `offset_height` and `scroll_height` follow a small
//!   block/row model. Sizes reflect transitions in flight, like a browser's layout does.
//!
//! - **Transitions**: setting an animatable property on a node that declares a transition
//!   for it starts an interpolation from the current computed value.

use std::borrow::Cow;
use std::collections::HashMap;
use std::rc::Rc;

use bitflags::bitflags;

use crate::animation::Transition;
use crate::event::{Event, EventKind};
use crate::style::{Display, Position, Property, PropertyMask, PropertyValue, Style};
use crate::text_measurer::{strip_markup, TextMeasurer};
use crate::transform::Transform;

/// Unique identifier for a node in the document.
///
/// Uses a generational index design:
/// - `index`: Position in the slot array (reusable after removal)
/// - `generation`: Version counter that increments when a slot is freed
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

bitflags! {
    /// Class markers carried by a node.
    ///
    /// Structural markers identify a node's role; state markers are toggled by the toast
    /// lifecycle and the gesture controller and are what a stylesheet would key off.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Classes: u32 {
        const VIEWPORT = 1 << 0;
        const WRAPPER = 1 << 1;
        const TOAST = 1 << 2;
        const BACKGROUND = 1 << 3;
        const CONTENT = 1 << 4;
        const HEADER = 1 << 5;
        const ICON = 1 << 6;
        const TITLE = 1 << 7;
        const BODY_WRAP = 1 << 8;
        const BODY_CONTENT = 1 << 9;
        const DESCRIPTION = 1 << 10;
        const RICH_CONTENT = 1 << 11;
        const ACTION = 1 << 12;

        const SHOW = 1 << 16;
        const EXIT = 1 << 17;
        const EXPANDED = 1 << 18;
        const COLLAPSING = 1 << 19;
        const SWIPE_ENABLED = 1 << 20;
        const SWIPING = 1 << 21;
        const SNAP_BACK = 1 << 22;
        const POP = 1 << 23;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Div,
    Span,
    Paragraph,
    Button,
}

/// Leaf content of a node. Setting content replaces the node's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Plain text, rendered as-is
    Text(String),
    /// A markup fragment handed to the host verbatim
    Markup(String),
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text(text.into())
    }

    pub fn markup(markup: impl Into<String>) -> Self {
        Content::Markup(markup.into())
    }

    /// Text that ends up on screen, used for measurement
    pub fn visible_text(&self) -> Cow<'_, str> {
        match self {
            Content::Text(text) => Cow::Borrowed(text.as_str()),
            Content::Markup(markup) => Cow::Owned(strip_markup(markup)),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Content::Text(s) | Content::Markup(s) => s.trim().is_empty(),
        }
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

/// Event listener callback
pub type Callback = Rc<dyn Fn(&Event)>;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ListenerId(u64);

struct Listener {
    id: ListenerId,
    kind: EventKind,
    once: bool,
    callback: Callback,
}

struct ActiveTransition {
    property: Property,
    from: PropertyValue,
    to: PropertyValue,
    started_at: u64,
    transition: Transition,
}

impl ActiveTransition {
    fn ends_at(&self) -> u64 {
        self.started_at + self.transition.total_ms()
    }
}

struct Node {
    tag: Tag,
    classes: Classes,
    style: Style,
    content: Option<Content>,
    attributes: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    listeners: Vec<Listener>,
    transitions: Vec<ActiveTransition>,
    animation_epoch: u32,
}

impl Node {
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            classes: Classes::empty(),
            style: Style::default(),
            content: None,
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
            listeners: Vec::new(),
            transitions: Vec::new(),
            animation_epoch: 0,
        }
    }
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Counters describing document churn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    /// Nodes created, including measurement probes
    pub created: u64,
    /// Subtrees removed through [`Document::remove`]
    pub removed: u64,
}

pub struct Document {
    slots: Vec<Slot>,
    free_indices: Vec<u32>,
    body: NodeId,
    now: u64,
    viewport_width: f32,
    measurer: Box<dyn TextMeasurer>,
    next_listener_id: u64,
    pointer_captures: HashMap<u32, NodeId>,
    stats: DocumentStats,
}

impl Document {
    /// Create a document whose body is `viewport_width` wide.
    pub fn new(viewport_width: f32, measurer: Box<dyn TextMeasurer>) -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free_indices: Vec::new(),
            body: NodeId::new(0, 0),
            now: 0,
            viewport_width,
            measurer,
            next_listener_id: 1,
            pointer_captures: HashMap::new(),
            stats: DocumentStats::default(),
        };
        doc.body = doc.create_element(Tag::Div);
        doc
    }

    /// The root node. Always attached.
    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    pub(crate) fn set_now(&mut self, now: u64) {
        self.now = now;
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn stats(&self) -> DocumentStats {
        self.stats
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        self.stats.created += 1;
        if let Some(index) = self.free_indices.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(Node::new(tag));
            return NodeId::new(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(Node::new(tag)),
        });
        NodeId::new(index, 0)
    }

    /// Whether `id` still refers to a live node (attached or not).
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Append `child` as the last child of `parent`, moving it if it already has a parent.
    /// Returns false if either node is gone or the move would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) || parent == child {
            return false;
        }
        let mut cursor = self.parent(parent);
        while let Some(ancestor) = cursor {
            if ancestor == child {
                return false;
            }
            cursor = self.parent(ancestor);
        }

        self.detach(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        true
    }

    /// Unlink `id` from its parent without freeing it.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
        true
    }

    /// Detach `id` and free its whole subtree. Listeners are dropped with their nodes.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if !self.contains(id) || id == self.body {
            return false;
        }
        self.detach(id);
        self.free_subtree(id);
        self.stats.removed += 1;
        true
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.index as usize)
                .filter(|slot| slot.generation == current.generation)
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free_indices.push(current.index);
            }
        }
        let slots = &self.slots;
        self.pointer_captures.retain(|_, node| {
            slots
                .get(node.index as usize)
                .is_some_and(|slot| slot.generation == node.generation && slot.node.is_some())
        });
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Whether `id` is reachable from the body.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if !self.contains(current) {
                return false;
            }
            if current == self.body {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Deep copy of `id` and its descendants: tag, classes, inline style, content and
    /// attributes. Listeners and running transitions are not copied. The copy is detached.
    pub fn clone_subtree(&mut self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id)?;
        let (tag, classes, style, content, attributes, children) = (
            node.tag,
            node.classes,
            node.style.clone(),
            node.content.clone(),
            node.attributes.clone(),
            node.children.clone(),
        );

        let copy = self.create_element(tag);
        if let Some(n) = self.node_mut(copy) {
            n.classes = classes;
            n.style = style;
            n.content = content;
            n.attributes = attributes;
        }
        for child in children {
            if let Some(child_copy) = self.clone_subtree(child) {
                self.append_child(copy, child_copy);
            }
        }
        Some(copy)
    }

    // ------------------------------------------------------------------
    // Markers, attributes and content
    // ------------------------------------------------------------------

    pub fn tag(&self, id: NodeId) -> Option<Tag> {
        self.node(id).map(|n| n.tag)
    }

    pub fn classes(&self, id: NodeId) -> Classes {
        self.node(id).map(|n| n.classes).unwrap_or_default()
    }

    pub fn has_class(&self, id: NodeId, class: Classes) -> bool {
        self.classes(id).contains(class)
    }

    pub fn add_class(&mut self, id: NodeId, class: Classes) {
        if let Some(node) = self.node_mut(id) {
            node.classes.insert(class);
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: Classes) {
        if let Some(node) = self.node_mut(id) {
            node.classes.remove(class);
        }
    }

    /// Nearest inclusive ancestor matching `pred`
    pub fn closest(&self, id: NodeId, pred: impl Fn(Tag, Classes) -> bool) -> Option<NodeId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current)?;
            if pred(node.tag, node.classes) {
                return Some(current);
            }
            cursor = node.parent;
        }
        None
    }

    pub fn set_attribute(&mut self, id: NodeId, key: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(node) = self.node_mut(id) {
            match node.attributes.iter_mut().find(|(k, _)| k == key) {
                Some((_, v)) => *v = value,
                None => node.attributes.push((key.to_string(), value)),
            }
        }
    }

    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&str> {
        self.node(id)?
            .attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the node's children with `content` (or clear it with `None`).
    pub fn set_content(&mut self, id: NodeId, content: Option<Content>) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let children = std::mem::take(&mut node.children);
        node.content = content;
        for child in children {
            if let Some(n) = self.node_mut(child) {
                n.parent = None;
            }
            self.free_subtree(child);
        }
    }

    pub fn content(&self, id: NodeId) -> Option<&Content> {
        self.node(id).and_then(|n| n.content.as_ref())
    }

    /// Restart CSS-style keyframe animations on the node (the classic forced-reflow trick).
    pub fn restart_animation(&mut self, id: NodeId) {
        if let Some(node) = self.node_mut(id) {
            node.animation_epoch = node.animation_epoch.wrapping_add(1);
        }
    }

    pub fn animation_epoch(&self, id: NodeId) -> u32 {
        self.node(id).map(|n| n.animation_epoch).unwrap_or(0)
    }

    // ------------------------------------------------------------------
    // Style and transitions
    // ------------------------------------------------------------------

    pub fn style(&self, id: NodeId) -> Option<&Style> {
        self.node(id).map(|n| &n.style)
    }

    /// Mutate non-animated style fields. Use [`Document::set_property`] for properties that
    /// may transition.
    pub fn update_style(&mut self, id: NodeId, f: impl FnOnce(&mut Style)) {
        if let Some(node) = self.node_mut(id) {
            f(&mut node.style);
        }
    }

    /// Declare the transitions of a node. Transitions already running keep going.
    pub fn set_transitions(&mut self, id: NodeId, transitions: Vec<(PropertyMask, Transition)>) {
        if let Some(node) = self.node_mut(id) {
            node.style.transitions = transitions;
        }
    }

    /// Set an animatable property. If the node declares a transition for it and both the
    /// current and the new value can be interpolated, the change animates from the current
    /// computed value; otherwise it applies at once and stops any running transition.
    pub fn set_property(&mut self, id: NodeId, property: Property, value: PropertyValue) {
        let now = self.now;
        let current = self.computed(id, property);
        let Some(node) = self.node_mut(id) else {
            return;
        };

        node.transitions.retain(|t| t.property != property);
        node.style.set(property, value);
        let target = node.style.get(property);

        let Some(transition) = node.style.transition_for(property).cloned() else {
            return;
        };
        if current != target
            && transition.total_ms() > 0
            && PropertyValue::interpolate(&current, &target, 0.0).is_some()
        {
            node.transitions.push(ActiveTransition {
                property,
                from: current,
                to: target,
                started_at: now,
                transition,
            });
        }
    }

    pub fn set_width(&mut self, id: NodeId, width: Option<f32>) {
        self.set_property(id, Property::Width, PropertyValue::from_length(width));
    }

    pub fn set_height(&mut self, id: NodeId, height: Option<f32>) {
        self.set_property(id, Property::Height, PropertyValue::from_length(height));
    }

    pub fn set_max_height(&mut self, id: NodeId, max_height: Option<f32>) {
        self.set_property(
            id,
            Property::MaxHeight,
            PropertyValue::from_length(max_height),
        );
    }

    pub fn set_border_radius(&mut self, id: NodeId, radius: f32) {
        self.set_property(id, Property::BorderRadius, PropertyValue::Scalar(radius));
    }

    pub fn set_opacity(&mut self, id: NodeId, opacity: f32) {
        self.set_property(id, Property::Opacity, PropertyValue::Scalar(opacity));
    }

    pub fn set_transform(&mut self, id: NodeId, transform: Transform) {
        self.set_property(id, Property::Transform, PropertyValue::Transform(transform));
    }

    /// Current value of a property, mid-transition if one is running.
    pub fn computed(&self, id: NodeId, property: Property) -> PropertyValue {
        let Some(node) = self.node(id) else {
            return PropertyValue::Auto;
        };
        if let Some(active) = node.transitions.iter().find(|t| t.property == property) {
            let t = active
                .transition
                .progress_at(self.now.saturating_sub(active.started_at));
            if let Some(value) = PropertyValue::interpolate(&active.from, &active.to, t) {
                return value;
            }
        }
        node.style.get(property)
    }

    pub fn computed_opacity(&self, id: NodeId) -> f32 {
        self.computed(id, Property::Opacity).as_length().unwrap_or(1.0)
    }

    pub fn computed_transform(&self, id: NodeId) -> Transform {
        self.computed(id, Property::Transform).as_transform()
    }

    pub fn computed_border_radius(&self, id: NodeId) -> f32 {
        self.computed(id, Property::BorderRadius)
            .as_length()
            .unwrap_or(0.0)
    }

    pub fn is_transitioning(&self, id: NodeId, property: Property) -> bool {
        self.node(id)
            .is_some_and(|n| n.transitions.iter().any(|t| t.property == property))
    }

    /// Earliest time a running transition completes
    pub fn next_transition_end(&self) -> Option<u64> {
        self.slots
            .iter()
            .filter_map(|slot| slot.node.as_ref())
            .flat_map(|node| node.transitions.iter().map(ActiveTransition::ends_at))
            .min()
    }

    /// Drop transitions that completed by now and report them for `transitionend` delivery.
    pub fn take_finished_transitions(&mut self) -> Vec<(NodeId, Property)> {
        let now = self.now;
        let mut finished = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let generation = slot.generation;
            let Some(node) = slot.node.as_mut() else {
                continue;
            };
            node.transitions.retain(|t| {
                if t.ends_at() <= now {
                    finished.push((NodeId::new(index as u32, generation), t.property));
                    false
                } else {
                    true
                }
            });
        }
        finished
    }

    // ------------------------------------------------------------------
    // Listeners and pointer routing
    // ------------------------------------------------------------------

    pub fn add_listener(
        &mut self,
        id: NodeId,
        kind: EventKind,
        once: bool,
        callback: Callback,
    ) -> Option<ListenerId> {
        let listener_id = ListenerId(self.next_listener_id);
        let node = self.node_mut(id)?;
        node.listeners.push(Listener {
            id: listener_id,
            kind,
            once,
            callback,
        });
        self.next_listener_id += 1;
        Some(listener_id)
    }

    pub fn remove_listener(&mut self, id: NodeId, listener: ListenerId) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let before = node.listeners.len();
        node.listeners.retain(|l| l.id != listener);
        node.listeners.len() != before
    }

    pub fn has_listener(&self, id: NodeId, listener: ListenerId) -> bool {
        self.node(id)
            .is_some_and(|n| n.listeners.iter().any(|l| l.id == listener))
    }

    pub fn listener_count(&self, id: NodeId) -> usize {
        self.node(id).map(|n| n.listeners.len()).unwrap_or(0)
    }

    /// Listeners of `kind` on `id`, in registration order.
    pub(crate) fn listeners_for(
        &self,
        id: NodeId,
        kind: EventKind,
    ) -> Vec<(ListenerId, bool, Callback)> {
        self.node(id)
            .map(|n| {
                n.listeners
                    .iter()
                    .filter(|l| l.kind == kind)
                    .map(|l| (l.id, l.once, l.callback.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn set_pointer_capture(&mut self, pointer_id: u32, id: NodeId) {
        if self.contains(id) {
            self.pointer_captures.insert(pointer_id, id);
        }
    }

    pub fn release_pointer_capture(&mut self, pointer_id: u32) {
        self.pointer_captures.remove(&pointer_id);
    }

    pub fn pointer_capture(&self, pointer_id: u32) -> Option<NodeId> {
        self.pointer_captures.get(&pointer_id).copied()
    }

    /// Nearest inclusive ancestor that takes pointer input; `None` if the node is gone.
    ///
    /// A node with `pointer_events` off lets the pointer fall through to whatever is
    /// behind it, which in a tree is its parent.
    pub fn pointer_target(&self, id: NodeId) -> Option<NodeId> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current)?;
            chain.push((current, node.style.pointer_events));
            cursor = node.parent;
        }
        // Inherited: a disabled ancestor disables the whole subtree beneath it
        let mut target = None;
        for (node, enabled) in chain.into_iter().rev() {
            if !enabled {
                break;
            }
            target = Some(node);
        }
        target
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    fn is_row(&self, id: NodeId) -> bool {
        self.node(id)
            .is_some_and(|n| matches!(n.style.display, Display::Row | Display::InlineRow))
    }

    fn computed_length(&self, id: NodeId, property: Property) -> Option<f32> {
        self.computed(id, property).as_length()
    }

    /// Rendered width of a node
    pub fn offset_width(&self, id: NodeId) -> f32 {
        let Some(node) = self.node(id) else {
            return 0.0;
        };
        let available = match node.parent {
            Some(parent) if self.is_row(parent) => f32::INFINITY,
            Some(parent) => self.inner_width(parent),
            None if id == self.body => self.viewport_width,
            None => f32::INFINITY,
        };
        self.layout_width(id, available)
    }

    /// Rendered height of a node, honouring explicit height and max-height
    pub fn offset_height(&self, id: NodeId) -> f32 {
        if !self.contains(id) {
            return 0.0;
        }
        self.outer_height(id, self.offset_width(id))
    }

    /// Height of the node's content, ignoring its own height constraints
    pub fn scroll_height(&self, id: NodeId) -> f32 {
        if !self.contains(id) {
            return 0.0;
        }
        let width = self.offset_width(id);
        self.content_height(id, width)
            .max(self.outer_height(id, width))
    }

    fn inner_width(&self, id: NodeId) -> f32 {
        let padding = self.node(id).map(|n| n.style.padding).unwrap_or_default();
        (self.offset_width(id) - padding.horizontal()).max(0.0)
    }

    fn layout_width(&self, id: NodeId, available: f32) -> f32 {
        let Some(node) = self.node(id) else {
            return 0.0;
        };
        if let Some(width) = self.computed_length(id, Property::Width) {
            return width;
        }
        let natural = self.natural_width(id);
        match (node.style.display, node.style.position) {
            (Display::InlineRow, _) | (_, Position::Absolute) => natural.min(available),
            _ if available.is_finite() => available,
            _ => natural,
        }
    }

    /// Shrink-to-fit width
    fn natural_width(&self, id: NodeId) -> f32 {
        let Some(node) = self.node(id) else {
            return 0.0;
        };
        if let Some(width) = self.computed_length(id, Property::Width) {
            return width;
        }
        let padding = node.style.padding.horizontal();
        if let Some(content) = &node.content {
            let text = content.visible_text();
            return self.measurer.measure(&text, node.style.font_size, None).width + padding;
        }

        let flow: Vec<NodeId> = self.flow_children(id);
        let widths = flow.iter().map(|c| self.natural_width(*c));
        let inner = match node.style.display {
            Display::Row | Display::InlineRow => {
                widths.sum::<f32>() + node.style.gap * flow.len().saturating_sub(1) as f32
            }
            Display::Block => widths.fold(0.0, f32::max),
        };
        inner + padding
    }

    fn flow_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| {
                self.node(*c)
                    .is_some_and(|n| n.style.position != Position::Absolute)
            })
            .collect()
    }

    fn outer_height(&self, id: NodeId, width: f32) -> f32 {
        let height = self
            .computed_length(id, Property::Height)
            .unwrap_or_else(|| self.content_height(id, width));
        match self.computed_length(id, Property::MaxHeight) {
            Some(max) => height.min(max),
            None => height,
        }
    }

    fn content_height(&self, id: NodeId, width: f32) -> f32 {
        let Some(node) = self.node(id) else {
            return 0.0;
        };
        let style = &node.style;
        let inner_width = (width - style.padding.horizontal()).max(0.0);

        if let Some(content) = &node.content {
            let text = content.visible_text();
            let size = self
                .measurer
                .measure(&text, style.font_size, Some(inner_width));
            return size.height + style.padding.vertical();
        }

        let flow = self.flow_children(id);
        let inner = match style.display {
            Display::Block => {
                let sum: f32 = flow
                    .iter()
                    .map(|c| self.outer_height(*c, self.layout_width(*c, inner_width)))
                    .sum();
                sum + style.gap * flow.len().saturating_sub(1) as f32
            }
            Display::Row | Display::InlineRow => flow
                .iter()
                .map(|c| self.outer_height(*c, self.layout_width(*c, f32::INFINITY)))
                .fold(0.0, f32::max),
        };
        inner + style.padding.vertical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::TimingFunction;
    use crate::style::Padding;
    use crate::text_measurer::FixedAdvanceMeasurer;

    fn doc() -> Document {
        Document::new(800.0, Box::new(FixedAdvanceMeasurer::new(0.5)))
    }

    #[test]
    fn test_remove_frees_subtree_and_invalidates_ids() {
        let mut doc = doc();
        let parent = doc.create_element(Tag::Div);
        let child = doc.create_element(Tag::Span);
        doc.append_child(doc.body(), parent);
        doc.append_child(parent, child);
        assert!(doc.is_attached(child));

        assert!(doc.remove(parent));
        assert!(!doc.contains(parent));
        assert!(!doc.contains(child));
        assert!(!doc.remove(parent));
        assert_eq!(doc.stats().removed, 1);

        // Slot reuse must not resurrect the old id
        let fresh = doc.create_element(Tag::Div);
        assert_ne!(fresh, parent);
        assert_ne!(fresh, child);
        assert!(!doc.contains(child));
    }

    #[test]
    fn test_detach_keeps_node_alive() {
        let mut doc = doc();
        let node = doc.create_element(Tag::Div);
        doc.append_child(doc.body(), node);
        assert!(doc.detach(node));
        assert!(doc.contains(node));
        assert!(!doc.is_attached(node));
    }

    #[test]
    fn test_append_rejects_cycles() {
        let mut doc = doc();
        let a = doc.create_element(Tag::Div);
        let b = doc.create_element(Tag::Div);
        assert!(doc.append_child(a, b));
        assert!(!doc.append_child(b, a));
        assert!(!doc.append_child(a, a));
    }

    #[test]
    fn test_set_content_replaces_children() {
        let mut doc = doc();
        let parent = doc.create_element(Tag::Div);
        let child = doc.create_element(Tag::Div);
        doc.append_child(parent, child);
        doc.set_content(parent, Some(Content::markup("<b>x</b>")));
        assert!(doc.children(parent).is_empty());
        assert!(!doc.contains(child));
    }

    #[test]
    fn test_block_layout_stacks_children() {
        let mut doc = doc();
        let block = doc.create_element(Tag::Div);
        doc.update_style(block, |s| {
            s.width = Some(100.0);
            s.padding = Padding::all(10.0);
            s.gap = 5.0;
        });
        for _ in 0..2 {
            let line = doc.create_element(Tag::Paragraph);
            doc.update_style(line, |s| s.font_size = 10.0);
            doc.set_content(line, Some(Content::text("abc")));
            doc.append_child(block, line);
        }
        doc.append_child(doc.body(), block);
        // 2 lines of 12px + 5px gap + 20px padding
        assert_eq!(doc.offset_height(block), 49.0);
        doc.set_height(block, Some(0.0));
        assert_eq!(doc.offset_height(block), 0.0);
        assert_eq!(doc.scroll_height(block), 49.0);
    }

    #[test]
    fn test_inline_row_shrinks_to_fit() {
        let mut doc = doc();
        let row = doc.create_element(Tag::Div);
        doc.update_style(row, |s| {
            s.display = Display::InlineRow;
            s.gap = 4.0;
            s.padding = Padding::symmetric(6.0, 0.0);
        });
        let icon = doc.create_element(Tag::Div);
        doc.update_style(icon, |s| {
            s.width = Some(20.0);
            s.height = Some(20.0);
        });
        let label = doc.create_element(Tag::Span);
        doc.update_style(label, |s| s.font_size = 10.0);
        doc.set_content(label, Some(Content::text("hello")));
        doc.append_child(row, icon);
        doc.append_child(row, label);
        doc.append_child(doc.body(), row);

        assert_eq!(doc.offset_width(row), 12.0 + 20.0 + 4.0 + 25.0);
        assert_eq!(doc.offset_width(label), 25.0);
    }

    #[test]
    fn test_transition_interpolates_and_finishes() {
        let mut doc = doc();
        let node = doc.create_element(Tag::Div);
        doc.set_transitions(
            node,
            vec![(
                PropertyMask::HEIGHT,
                Transition::new(100, TimingFunction::Linear),
            )],
        );
        doc.set_height(node, Some(0.0));
        assert!(!doc.is_transitioning(node, Property::Height));

        doc.set_height(node, Some(100.0));
        assert!(doc.is_transitioning(node, Property::Height));
        doc.set_now(50);
        assert_eq!(doc.computed(node, Property::Height), PropertyValue::Scalar(50.0));
        assert_eq!(doc.next_transition_end(), Some(100));

        doc.set_now(100);
        assert_eq!(doc.take_finished_transitions(), vec![(node, Property::Height)]);
        assert_eq!(doc.computed(node, Property::Height), PropertyValue::Scalar(100.0));
    }

    #[test]
    fn test_auto_height_applies_instantly() {
        let mut doc = doc();
        let node = doc.create_element(Tag::Div);
        doc.set_transitions(node, vec![(PropertyMask::HEIGHT, Transition::expo_out(500))]);
        doc.set_height(node, Some(40.0));
        doc.set_height(node, None);
        assert!(!doc.is_transitioning(node, Property::Height));
    }

    #[test]
    fn test_pointer_target_falls_through_disabled_nodes() {
        let mut doc = doc();
        let outer = doc.create_element(Tag::Div);
        let button = doc.create_element(Tag::Button);
        doc.append_child(doc.body(), outer);
        doc.append_child(outer, button);
        assert_eq!(doc.pointer_target(button), Some(button));

        doc.update_style(button, |s| s.pointer_events = false);
        assert_eq!(doc.pointer_target(button), Some(outer));

        doc.update_style(outer, |s| s.pointer_events = false);
        assert_eq!(doc.pointer_target(button), Some(doc.body()));
    }

    #[test]
    fn test_clone_subtree_skips_listeners() {
        let mut doc = doc();
        let node = doc.create_element(Tag::Div);
        let child = doc.create_element(Tag::Span);
        doc.append_child(node, child);
        doc.add_class(node, Classes::BODY_WRAP);
        doc.add_listener(node, EventKind::Click, false, Rc::new(|_: &Event| {}));

        let copy = doc.clone_subtree(node).unwrap();
        assert!(doc.has_class(copy, Classes::BODY_WRAP));
        assert_eq!(doc.listener_count(copy), 0);
        assert_eq!(doc.children(copy).len(), 1);
        assert!(doc.parent(copy).is_none());
    }
}
