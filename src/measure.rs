//! Off-screen measurement of natural content height.

use crate::constants::OFFSCREEN_COORDINATE;
use crate::style::Position;
use crate::tree::{Document, NodeId};

/// A detached, invisible deep copy of a node attached to the body for measurement.
///
/// The copy is removed from the document when the probe is dropped.
pub struct Probe<'a> {
    doc: &'a mut Document,
    node: NodeId,
}

impl<'a> Probe<'a> {
    /// Clone `source` and lay the copy out at `width` with height and max-height cleared.
    /// Returns `None` if `source` is gone.
    pub fn new(doc: &'a mut Document, source: NodeId, width: f32) -> Option<Self> {
        let node = doc.clone_subtree(source)?;
        doc.update_style(node, |s| {
            s.width = Some(width);
            s.height = None;
            s.max_height = None;
            s.position = Position::Offscreen;
            s.visible = false;
            s.pointer_events = false;
        });
        doc.set_attribute(node, "left", OFFSCREEN_COORDINATE.to_string());
        doc.set_attribute(node, "top", OFFSCREEN_COORDINATE.to_string());
        let body = doc.body();
        doc.append_child(body, node);
        Some(Self { doc, node })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn scroll_height(&self) -> f32 {
        self.doc.scroll_height(self.node)
    }
}

impl Drop for Probe<'_> {
    fn drop(&mut self) {
        self.doc.remove(self.node);
    }
}

/// Natural height of `node`'s content when laid out at `width`.
pub fn natural_height(doc: &mut Document, node: NodeId, width: f32) -> f32 {
    match Probe::new(doc, node, width) {
        Some(probe) => probe.scroll_height(),
        None => {
            log::warn!("Measured a node that is no longer in the document: {:?}", node);
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Padding;
    use crate::text_measurer::FixedAdvanceMeasurer;
    use crate::tree::{Content, Tag};

    fn doc() -> Document {
        Document::new(800.0, Box::new(FixedAdvanceMeasurer::new(0.5)))
    }

    #[test]
    fn test_measures_collapsed_node_at_width() {
        let mut doc = doc();
        let wrap = doc.create_element(Tag::Div);
        doc.update_style(wrap, |s| s.height = Some(0.0));
        let text = doc.create_element(Tag::Paragraph);
        doc.update_style(text, |s| {
            s.font_size = 10.0;
            s.padding = Padding::all(5.0);
        });
        // 20 chars, 5px each: two lines at 60px (50px inner)
        doc.set_content(text, Some(Content::text("aaaaaaaaa bbbbbbbbbb")));
        doc.append_child(wrap, text);
        doc.append_child(doc.body(), wrap);

        assert_eq!(doc.offset_height(wrap), 0.0);
        assert_eq!(natural_height(&mut doc, wrap, 60.0), 34.0);
    }

    #[test]
    fn test_probe_is_removed_on_drop() {
        let mut doc = doc();
        let node = doc.create_element(Tag::Div);
        doc.append_child(doc.body(), node);
        let before = doc.children(doc.body()).len();

        let probe_node = {
            let probe = Probe::new(&mut doc, node, 100.0).unwrap();
            probe.node()
        };
        assert!(!doc.contains(probe_node));
        assert_eq!(doc.children(doc.body()).len(), before);
    }

    #[test]
    fn test_missing_node_measures_zero() {
        let mut doc = doc();
        let node = doc.create_element(Tag::Div);
        doc.remove(node);
        assert_eq!(natural_height(&mut doc, node, 100.0), 0.0);
    }
}
