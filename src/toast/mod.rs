//! Toast creation and the handle used to drive a toast afterwards.
//!
//! A toast is a small tree of nodes:
//!
//! ```text
//! wrapper                      (collapses on dismissal)
//! └── toast                    [data-theme]
//!     ├── background           (absolute; morphs between pill and card)
//!     └── content
//!         ├── header           (inline row, 48px: icon + title)
//!         └── body wrap        (height 0 until expanded)
//!             └── body content (description, rich content, action)
//! ```
//!
//! The pill is the background sized to the header; the card is the background sized to the
//! full content. [`ToastHandle`] exposes the mutators and the lifecycle operations.

mod gesture;
mod lifecycle;
mod options;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::animation::Transition;
use crate::assets;
use crate::constants::{
    BODY_FONT_SIZE, BODY_GAP, BODY_PADDING, BODY_TRANSITION_MS, BUTTON_HEIGHT, HEADER_GAP,
    HEADER_HEIGHT, HEADER_PADDING_X, ICON_SIZE, MORPH_TRANSITION_MS, PILL_RADIUS,
    TITLE_FONT_SIZE, TOAST_WIDTH,
};
use crate::event::{Event, EventKind};
use crate::scheduler::{TaskId, TimerGroup};
use crate::style::{Color, Display, Overflow, Padding, Position, PropertyMask};
use crate::surface::Surface;
use crate::tree::{Classes, Content, Document, NodeId, Tag};
use crate::viewport::ViewportManager;

pub use gesture::{resisted_offset, should_commit, SwipeFeedback, SwipeOutcome, SwipeTracker};
pub use lifecycle::ToastState;
pub use options::{ActionCallback, Category, Theme, ToastAction, ToastOptions};

use gesture::SwipeBinding;
use lifecycle::{DismissReason, Lifecycle};

static NEXT_TOAST_ID: AtomicU64 = AtomicU64::new(1);

/// Node ids of one toast's structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastNodes {
    pub wrapper: NodeId,
    pub toast: NodeId,
    pub background: NodeId,
    pub content: NodeId,
    pub header: NodeId,
    pub icon: NodeId,
    pub title: NodeId,
    pub body_wrap: NodeId,
    pub body_content: NodeId,
}

struct ToastInner {
    id: u64,
    surface: Weak<Surface>,
    nodes: ToastNodes,
    button: Cell<Option<NodeId>>,
    category: Category,
    theme: Theme,
    lifecycle: Cell<Lifecycle>,
    has_body: Cell<bool>,
    expand_delay_ms: u64,
    auto_dismiss_after_ms: u64,
    collapse_transition_ms: u64,
    timers: TimerGroup,
    /// Pending expand/collapse continuations, cancelled when the direction changes
    morph_tasks: RefCell<Vec<TaskId>>,
    swipe: RefCell<Option<SwipeBinding>>,
}

impl ToastInner {
    /// Run `f` against the document. Returns `None` once the surface is gone.
    fn with_doc<R>(&self, f: impl FnOnce(&mut Document) -> R) -> Option<R> {
        let surface = self.surface.upgrade()?;
        let result = surface.with_document_mut(f);
        Some(result)
    }

    fn now(&self) -> u64 {
        self.timers.now()
    }

    fn is_dead(&self) -> bool {
        self.lifecycle.get().is_dead()
    }

    /// Resize the pill to the header on the next frame
    fn schedule_pill_resync(self: &Rc<Self>) {
        let inner = self.clone();
        self.timers.request_frame(move || {
            let nodes = inner.nodes;
            inner.with_doc(|doc| {
                let width = doc.offset_width(nodes.header);
                doc.set_width(nodes.background, Some(width));
            });
        });
    }
}

/// Creates toasts on a surface.
///
/// Toasters sharing a [`ViewportManager`] stack their toasts into the same container.
pub struct Toaster {
    surface: Rc<Surface>,
    viewport: Rc<ViewportManager>,
}

impl Toaster {
    pub fn new(surface: Rc<Surface>) -> Self {
        Self::with_viewport(surface, Rc::new(ViewportManager::new()))
    }

    pub fn with_viewport(surface: Rc<Surface>, viewport: Rc<ViewportManager>) -> Self {
        Self { surface, viewport }
    }

    pub fn surface(&self) -> &Rc<Surface> {
        &self.surface
    }

    pub fn viewport(&self) -> &Rc<ViewportManager> {
        &self.viewport
    }

    /// Build a toast, append it to the viewport and start its entrance.
    pub fn create(&self, options: ToastOptions) -> ToastHandle {
        let viewport = self.viewport.get(&self.surface);
        let has_body = options.has_body();

        let (nodes, button) = self
            .surface
            .with_document_mut(|doc| build_nodes(doc, viewport, &options));

        let inner = Rc::new(ToastInner {
            id: NEXT_TOAST_ID.fetch_add(1, Ordering::Relaxed),
            surface: Rc::downgrade(&self.surface),
            nodes,
            button: Cell::new(button),
            category: options.category,
            theme: options.theme,
            lifecycle: Cell::new(Lifecycle::new()),
            has_body: Cell::new(has_body),
            expand_delay_ms: options.expand_delay_ms,
            auto_dismiss_after_ms: options.auto_dismiss_after_ms,
            collapse_transition_ms: options.collapse_transition_ms,
            timers: TimerGroup::new(self.surface.scheduler()),
            morph_tasks: RefCell::new(Vec::new()),
            swipe: RefCell::new(None),
        });
        let handle = ToastHandle {
            inner: inner.clone(),
        };

        self.surface.with_document_mut(|doc| {
            if let (Some(button), Some(on_click)) = (
                button,
                options.action.as_ref().and_then(|a| a.on_click.clone()),
            ) {
                let target = handle.clone();
                doc.add_listener(
                    button,
                    EventKind::Click,
                    false,
                    Rc::new(move |_: &Event| on_click(&target)),
                );
            }
            if options.swipe_dismiss {
                inner.attach_swipe(doc);
            }
        });

        log::debug!(
            "Created {} toast {} ({}, body: {})",
            options.category,
            inner.id,
            options.theme,
            has_body
        );

        let show = inner.clone();
        let id = inner.id;
        inner.timers.two_phase(
            move || log::trace!("Toast {} initial layout committed", id),
            move || show.show(),
        );

        handle
    }
}

fn build_nodes(
    doc: &mut Document,
    viewport: NodeId,
    options: &ToastOptions,
) -> (ToastNodes, Option<NodeId>) {
    let element = |doc: &mut Document, tag: Tag, class: Classes, parent: NodeId| {
        let node = doc.create_element(tag);
        doc.add_class(node, class);
        doc.append_child(parent, node);
        node
    };
    let accent = assets::title_color(options.theme, options.category);

    let wrapper = doc.create_element(Tag::Div);
    doc.add_class(wrapper, Classes::WRAPPER);

    let toast = element(doc, Tag::Div, Classes::TOAST, wrapper);
    doc.set_attribute(toast, "data-theme", options.theme.as_str());
    doc.update_style(toast, |s| {
        s.width = Some(TOAST_WIDTH);
        s.overflow = Overflow::Visible;
    });

    let background = element(doc, Tag::Div, Classes::BACKGROUND, toast);
    doc.update_style(background, |s| {
        s.position = Position::Absolute;
        s.height = Some(HEADER_HEIGHT);
        s.border_radius = PILL_RADIUS;
        s.background = Some(match options.theme {
            Theme::Light => Color::WHITE,
            Theme::Dark => Color::from_hex(0x1C1C1E),
        });
        s.transitions = vec![(
            PropertyMask::WIDTH | PropertyMask::HEIGHT | PropertyMask::BORDER_RADIUS,
            Transition::expo_out(MORPH_TRANSITION_MS),
        )];
    });

    let content = element(doc, Tag::Div, Classes::CONTENT, toast);

    let header = element(doc, Tag::Div, Classes::HEADER, content);
    doc.update_style(header, |s| {
        s.display = Display::InlineRow;
        s.height = Some(HEADER_HEIGHT);
        s.padding = Padding::symmetric(HEADER_PADDING_X, 0.0);
        s.gap = HEADER_GAP;
    });

    let icon = element(doc, Tag::Div, Classes::ICON, header);
    doc.update_style(icon, |s| {
        s.width = Some(ICON_SIZE);
        s.height = Some(ICON_SIZE);
    });
    doc.set_content(icon, Some(assets::icon(options.category)));

    let title = element(doc, Tag::Span, Classes::TITLE, header);
    doc.update_style(title, |s| {
        s.font_size = TITLE_FONT_SIZE;
        s.color = Some(accent);
    });
    doc.set_content(title, Some(Content::text(options.title.as_str())));

    let body_wrap = element(doc, Tag::Div, Classes::BODY_WRAP, content);
    doc.update_style(body_wrap, |s| {
        s.height = Some(0.0);
        s.overflow = Overflow::Clip;
        s.transitions = vec![(
            PropertyMask::HEIGHT,
            Transition::expo_out(BODY_TRANSITION_MS),
        )];
    });

    let body_content = element(doc, Tag::Div, Classes::BODY_CONTENT, body_wrap);
    doc.update_style(body_content, |s| {
        s.padding = Padding::all(BODY_PADDING);
        s.gap = BODY_GAP;
        s.font_size = BODY_FONT_SIZE;
    });

    if let Some(description) = &options.description {
        let paragraph = element(doc, Tag::Paragraph, Classes::DESCRIPTION, body_content);
        doc.update_style(paragraph, |s| s.font_size = BODY_FONT_SIZE);
        doc.set_content(paragraph, Some(Content::text(description.as_str())));
    }
    if let Some(markup) = &options.rich_content {
        let rich = element(doc, Tag::Div, Classes::RICH_CONTENT, body_content);
        doc.update_style(rich, |s| s.font_size = BODY_FONT_SIZE);
        doc.set_content(rich, Some(Content::markup(markup.as_str())));
    }
    let button = options
        .action
        .as_ref()
        .filter(|action| !action.label.is_empty())
        .map(|action| {
            let button = element(doc, Tag::Button, Classes::ACTION, body_content);
            let variant = match options.theme {
                Theme::Dark => "dark",
                Theme::Light => options.category.as_str(),
            };
            doc.set_attribute(button, "data-style", variant);
            doc.update_style(button, |s| {
                s.height = Some(BUTTON_HEIGHT);
                s.padding = Padding::symmetric(BODY_PADDING, 0.0);
                s.font_size = BODY_FONT_SIZE;
                s.background = Some(accent);
                s.color = Some(Color::WHITE);
            });
            doc.set_content(button, Some(Content::text(action.label.as_str())));
            button
        });

    doc.append_child(viewport, wrapper);

    // The pill starts out hugging the header
    let header_width = doc.offset_width(header);
    doc.set_width(background, Some(header_width));

    let nodes = ToastNodes {
        wrapper,
        toast,
        background,
        content,
        header,
        icon,
        title,
        body_wrap,
        body_content,
    };
    (nodes, button)
}

/// Handle to a live (or dismissed) toast.
///
/// Cloning the handle is cheap; all clones drive the same toast. Every mutator is a no-op
/// once the toast has been dismissed.
#[derive(Clone)]
pub struct ToastHandle {
    inner: Rc<ToastInner>,
}

impl ToastHandle {
    /// Process-unique id, as used in log output
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn category(&self) -> Category {
        self.inner.category
    }

    pub fn theme(&self) -> Theme {
        self.inner.theme
    }

    pub fn state(&self) -> ToastState {
        self.inner.lifecycle.get().state()
    }

    pub fn is_dead(&self) -> bool {
        self.inner.is_dead()
    }

    /// Whether the toast is expanding or expanded
    pub fn is_expanded(&self) -> bool {
        self.inner.lifecycle.get().is_expanded()
    }

    pub fn has_body(&self) -> bool {
        self.inner.has_body.get()
    }

    pub fn nodes(&self) -> ToastNodes {
        self.inner.nodes
    }

    /// The action button, if the toast has one
    pub fn button(&self) -> Option<NodeId> {
        self.inner.button.get()
    }

    fn ignore_if_dead(&self, operation: &str) -> bool {
        if self.inner.is_dead() {
            log::debug!("Ignoring {} on dismissed toast {}", operation, self.inner.id);
            return true;
        }
        false
    }

    /// Replace the title, optionally recoloring it.
    pub fn set_title(&self, title: impl Into<String>, color: Option<Color>) {
        if self.ignore_if_dead("set_title") {
            return;
        }
        let node = self.inner.nodes.title;
        let title = title.into();
        self.inner.with_doc(|doc| {
            doc.set_content(node, Some(Content::Text(title)));
            if let Some(color) = color {
                doc.update_style(node, |s| s.color = Some(color));
            }
        });
        if !self.is_expanded() {
            self.inner.schedule_pill_resync();
        }
    }

    /// Replace the icon. With `animate`, the icon replays its pop animation.
    pub fn set_icon(&self, icon: impl Into<Content>, animate: bool) {
        if self.ignore_if_dead("set_icon") {
            return;
        }
        let node = self.inner.nodes.icon;
        let icon = icon.into();
        self.inner.with_doc(|doc| {
            doc.set_content(node, Some(icon));
            if animate {
                doc.remove_class(node, Classes::POP);
                doc.restart_animation(node);
                doc.add_class(node, Classes::POP);
            }
        });
        if !self.is_expanded() {
            self.inner.schedule_pill_resync();
        }
    }

    /// Replace the whole body with a markup fragment. An empty fragment leaves the toast
    /// without a body.
    pub fn set_body(&self, markup: impl Into<String>) {
        if self.ignore_if_dead("set_body") {
            return;
        }
        let node = self.inner.nodes.body_content;
        let content = Content::Markup(markup.into());
        let has_body = !content.is_empty();
        self.inner.with_doc(|doc| doc.set_content(node, Some(content)));
        // The button went away with the old content
        self.inner.button.set(None);
        self.inner.has_body.set(has_body);
    }

    /// Relabel the action button and stop it from taking further input.
    pub fn replace_action(
        &self,
        label: impl Into<String>,
        background: Option<Color>,
        color: Option<Color>,
    ) {
        if self.ignore_if_dead("replace_action") {
            return;
        }
        let Some(button) = self.inner.button.get() else {
            return;
        };
        let label = label.into();
        self.inner.with_doc(|doc| {
            doc.set_content(button, Some(Content::Text(label)));
            doc.update_style(button, |s| {
                if let Some(background) = background {
                    s.background = Some(background);
                }
                if let Some(color) = color {
                    s.color = Some(color);
                }
                s.pointer_events = false;
            });
        });
    }

    /// Morph into the card. Does nothing without a body.
    pub fn expand(&self) {
        self.inner.expand();
    }

    /// Morph back into the pill.
    pub fn collapse(&self) {
        self.inner.collapse();
    }

    /// Animate the toast out and remove it. Safe to call any number of times.
    pub fn dismiss(&self) {
        self.inner.dismiss(DismissReason::Requested);
    }
}

impl PartialEq for ToastHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ToastHandle {}

impl fmt::Debug for ToastHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastHandle")
            .field("id", &self.inner.id)
            .field("category", &self.inner.category)
            .field("state", &self.state())
            .finish()
    }
}
