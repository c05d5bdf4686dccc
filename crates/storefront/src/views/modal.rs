//! Modal container.

use std::cell::Cell;
use std::rc::Rc;

use askama::Template;

use super::{Component, Node, RenderedNode, ViewError};
use crate::events::{EventBus, Payload, topics};

#[derive(Template)]
#[template(path = "modal.html")]
struct ModalTemplate<'a> {
    content: &'a RenderedNode,
    active: bool,
}

/// The single modal. Opening replaces its content.
#[derive(Debug, Clone)]
pub struct ModalView {
    bus: EventBus,
    node: Node,
    active: Rc<Cell<bool>>,
}

impl ModalView {
    #[must_use]
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            node: Node::default(),
            active: Rc::default(),
        }
    }

    /// Show `content` and emit `modal-opened`.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Template` if the template fails to render.
    pub fn open(&self, content: RenderedNode) -> Result<RenderedNode, ViewError> {
        let node = self.render(&content)?;
        self.active.set(true);
        self.bus.emit(topics::MODAL_OPENED, Payload::None);
        Ok(node)
    }

    /// Hide the modal and emit `modal-closed`. Returns `false` if it was
    /// not open.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Template` if the template fails to render.
    pub fn close(&self) -> Result<bool, ViewError> {
        if !self.active.get() {
            return Ok(false);
        }
        self.active.set(false);
        self.render(&RenderedNode::default())?;
        self.bus.emit(topics::MODAL_CLOSED, Payload::None);
        Ok(true)
    }

    /// Close button.
    pub fn request_close(&self) {
        self.bus.emit(topics::MODAL_CLOSE_REQUESTED, Payload::None);
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.active.get()
    }
}

impl Component for ModalView {
    type Data = RenderedNode;

    fn render(&self, content: &RenderedNode) -> Result<RenderedNode, ViewError> {
        let html = ModalTemplate {
            content,
            active: !content.is_empty(),
        }
        .render()?;
        Ok(self.node.set(html))
    }

    fn node(&self) -> RenderedNode {
        self.node.get()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn record(bus: &EventBus) -> Rc<RefCell<Vec<String>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.on_all(move |event| {
            sink.borrow_mut().push(event.name.clone());
            Ok(())
        });
        seen
    }

    #[test]
    fn test_open_and_close() {
        let bus = EventBus::new();
        let seen = record(&bus);
        let modal = ModalView::new(bus);

        let html = modal
            .open(RenderedNode::from("<p>preview</p>".to_string()))
            .unwrap();
        assert!(html.contains("modal_active"));
        assert!(html.contains(r#"<div class="modal__content"><p>preview</p></div>"#));
        assert!(modal.is_open());

        assert!(modal.close().unwrap());
        assert!(!modal.node().contains("modal_active"));
        assert!(!modal.close().unwrap());

        assert_eq!(*seen.borrow(), vec!["modal-opened", "modal-closed"]);
    }

    #[test]
    fn test_close_button_only_requests() {
        let bus = EventBus::new();
        let seen = record(&bus);
        let modal = ModalView::new(bus);
        modal
            .open(RenderedNode::from("<p>x</p>".to_string()))
            .unwrap();

        modal.request_close();

        assert!(modal.is_open());
        assert_eq!(
            *seen.borrow(),
            vec!["modal-opened", "modal-close-requested"]
        );
    }
}
