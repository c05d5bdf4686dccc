//! Order confirmation.

use askama::Template;

use super::{Component, Node, RenderedNode, ViewError};
use crate::api::OrderResult;
use crate::events::{EventBus, Payload, topics};

#[derive(Template)]
#[template(path = "success.html")]
struct SuccessTemplate<'a> {
    id: &'a str,
    total: String,
}

/// Shown after an order is placed.
#[derive(Debug, Clone)]
pub struct SuccessView {
    bus: EventBus,
    node: Node,
}

impl SuccessView {
    #[must_use]
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            node: Node::default(),
        }
    }

    /// "Back to shopping" button.
    pub fn close(&self) {
        self.bus.emit(topics::MODAL_CLOSE_REQUESTED, Payload::None);
    }
}

impl Component for SuccessView {
    type Data = OrderResult;

    fn render(&self, result: &OrderResult) -> Result<RenderedNode, ViewError> {
        let html = SuccessTemplate {
            id: result.id.as_str(),
            total: result.total.display(),
        }
        .render()?;
        Ok(self.node.set(html))
    }

    fn node(&self) -> RenderedNode {
        self.node.get()
    }
}
