//! Basket list and its rows.

use askama::Template;
use web_larek_core::Price;

use super::{Component, Node, RenderedNode, ViewError, format_price};
use crate::events::{Event, EventBus, Payload, topics};

/// One basket row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketItemData {
    /// 1-based position in the basket.
    pub index: usize,
    pub title: String,
    pub price: Option<Price>,
}

#[derive(Template)]
#[template(path = "basket_item.html")]
struct BasketItemTemplate<'a> {
    index: usize,
    title: &'a str,
    price: String,
}

/// A basket row with a delete button that dispatches the configured event.
#[derive(Debug, Clone)]
pub struct BasketItemView {
    bus: EventBus,
    action: Event,
    node: Node,
}

impl BasketItemView {
    #[must_use]
    pub fn new(bus: EventBus, action: Event) -> Self {
        Self {
            bus,
            action,
            node: Node::default(),
        }
    }

    pub fn remove(&self) {
        self.bus.dispatch(&self.action);
    }
}

impl Component for BasketItemView {
    type Data = BasketItemData;

    fn render(&self, data: &BasketItemData) -> Result<RenderedNode, ViewError> {
        let html = BasketItemTemplate {
            index: data.index,
            title: &data.title,
            price: format_price(data.price),
        }
        .render()?;
        Ok(self.node.set(html))
    }

    fn node(&self) -> RenderedNode {
        self.node.get()
    }
}

/// Basket modal contents.
#[derive(Debug, Clone, Default)]
pub struct BasketData {
    pub items: Vec<RenderedNode>,
    pub total: Price,
    /// Whether the checkout button is enabled.
    pub can_order: bool,
}

#[derive(Template)]
#[template(path = "basket.html")]
struct BasketTemplate<'a> {
    items: &'a [RenderedNode],
    total: String,
    can_order: bool,
}

/// The basket: rows, total, and the checkout button.
#[derive(Debug, Clone)]
pub struct BasketView {
    bus: EventBus,
    node: Node,
}

impl BasketView {
    #[must_use]
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            node: Node::default(),
        }
    }

    /// Checkout button.
    pub fn start_order(&self) {
        self.bus.emit(topics::ORDER_STARTED, Payload::None);
    }
}

impl Component for BasketView {
    type Data = BasketData;

    fn render(&self, data: &BasketData) -> Result<RenderedNode, ViewError> {
        let html = BasketTemplate {
            items: &data.items,
            total: data.total.display(),
            can_order: data.can_order,
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
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_basket_item_slots() {
        let view = BasketItemView::new(EventBus::new(), Event::new("noop", Payload::None));
        let html = view
            .render(&BasketItemData {
                index: 2,
                title: "Бэкенд-антистресс".to_string(),
                price: Some(Price::new(1000)),
            })
            .unwrap();

        assert!(html.contains(r#"<span class="basket__item-index">2</span>"#));
        assert!(html.contains("Бэкенд-антистресс"));
        assert!(html.contains("1000 synapses"));
    }

    #[test]
    fn test_basket_total_and_button() {
        let view = BasketView::new(EventBus::new());
        let row = RenderedNode::from("<li>row</li>".to_string());

        let html = view
            .render(&BasketData {
                items: vec![row],
                total: Price::new(2200),
                can_order: true,
            })
            .unwrap();
        assert!(html.contains("<li>row</li>"));
        assert!(html.contains(r#"<span class="basket__price">2200 synapses</span>"#));
        assert!(html.contains(r#"<button class="button basket__button" type="button">"#));

        let html = view.render(&BasketData::default()).unwrap();
        assert!(html.contains("Basket is empty"));
        assert!(html.contains("0 synapses"));
        assert!(html.contains(" disabled>Checkout"));
    }

    #[test]
    fn test_intents_emit() {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        for name in [topics::ORDER_STARTED, topics::PRODUCT_REMOVED] {
            let hits = Rc::clone(&hits);
            bus.subscribe(name, move |_| {
                hits.set(hits.get() + 1);
                Ok(())
            });
        }

        BasketView::new(bus.clone()).start_order();
        BasketItemView::new(bus, Event::new(topics::PRODUCT_REMOVED, Payload::None)).remove();
        assert_eq!(hits.get(), 2);
    }
}
