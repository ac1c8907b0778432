//! The shared container every toast is appended to.

use std::cell::Cell;

use crate::surface::Surface;
use crate::tree::{Classes, NodeId, Tag};

/// Owns the single viewport node of a surface.
///
/// The viewport is created lazily on first use and recreated whenever the previous one is no
/// longer attached to the document (for example because the embedder cleared the body).
/// Toasters that should stack into the same column share one manager.
#[derive(Debug, Default)]
pub struct ViewportManager {
    current: Cell<Option<NodeId>>,
}

impl ViewportManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a live, attached viewport, creating one if needed.
    pub fn get(&self, surface: &Surface) -> NodeId {
        surface.with_document_mut(|doc| {
            if let Some(node) = self.current.get().filter(|node| doc.is_attached(*node)) {
                return node;
            }

            if self.current.get().is_some() {
                log::debug!("Viewport was detached, recreating it");
            }
            let node = doc.create_element(Tag::Div);
            doc.add_class(node, Classes::VIEWPORT);
            doc.set_attribute(node, "id", "toast-viewport");
            let body = doc.body();
            doc.append_child(body, node);
            self.current.set(Some(node));
            node
        })
    }

    /// Last viewport handed out, attached or not
    pub fn current(&self) -> Option<NodeId> {
        self.current.get()
    }
}
