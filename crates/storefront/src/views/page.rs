//! Page shell: header basket counter and the catalog gallery.

use askama::Template;

use super::{Component, Node, RenderedNode, ViewError};
use crate::events::{EventBus, Payload, topics};

/// What the page shows.
#[derive(Debug, Clone, Default)]
pub struct PageData {
    /// Items in the basket.
    pub counter: usize,
    /// Rendered catalog cards, in catalog order.
    pub gallery: Vec<RenderedNode>,
    /// Scroll lock while a modal is open.
    pub locked: bool,
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    counter: usize,
    gallery: &'a [RenderedNode],
    locked: bool,
}

#[derive(Template)]
#[template(path = "document.html")]
struct DocumentTemplate<'a> {
    page: &'a RenderedNode,
    modal: &'a RenderedNode,
}

/// Wrap the page and the modal in a full HTML document.
///
/// # Errors
///
/// Returns `ViewError::Template` if the template fails to render.
pub fn document(page: &RenderedNode, modal: &RenderedNode) -> Result<RenderedNode, ViewError> {
    Ok(DocumentTemplate { page, modal }.render()?.into())
}

/// The storefront page.
#[derive(Debug, Clone)]
pub struct PageView {
    bus: EventBus,
    node: Node,
}

impl PageView {
    #[must_use]
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            node: Node::default(),
        }
    }

    /// Header basket button.
    pub fn open_basket(&self) {
        self.bus.emit(topics::BASKET_OPENED, Payload::None);
    }
}

impl Component for PageView {
    type Data = PageData;

    fn render(&self, data: &PageData) -> Result<RenderedNode, ViewError> {
        let html = PageTemplate {
            counter: data.counter,
            gallery: &data.gallery,
            locked: data.locked,
        }
        .render()?;
        Ok(self.node.set(html))
    }

    fn node(&self) -> RenderedNode {
        self.node.get()
    }
}
