//! Product cards: catalog tile and modal preview.

use std::cell::Cell;
use std::rc::Rc;

use askama::Template;
use web_larek_core::{Category, Price, Product, ProductId};

use super::{Component, Node, RenderedNode, ViewError, format_price};
use crate::events::{Event, EventBus};

/// Catalog card contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardData {
    pub id: ProductId,
    pub title: String,
    /// Absolute image URL.
    pub image: String,
    pub category: Category,
    pub price: Option<Price>,
}

impl CardData {
    /// Card data for `product`, with its image resolved to `image`.
    #[must_use]
    pub fn from_product(product: &Product, image: String) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            image,
            category: product.category,
            price: product.price,
        }
    }
}

#[derive(Template)]
#[template(path = "card.html")]
struct CardTemplate<'a> {
    id: &'a str,
    title: &'a str,
    image: &'a str,
    category: Category,
    price: String,
}

/// A catalog tile. Clicking it dispatches the configured event.
#[derive(Debug, Clone)]
pub struct CardView {
    bus: EventBus,
    action: Event,
    node: Node,
}

impl CardView {
    #[must_use]
    pub fn new(bus: EventBus, action: Event) -> Self {
        Self {
            bus,
            action,
            node: Node::default(),
        }
    }

    pub fn click(&self) {
        self.bus.dispatch(&self.action);
    }
}

impl Component for CardView {
    type Data = CardData;

    fn render(&self, data: &CardData) -> Result<RenderedNode, ViewError> {
        let html = CardTemplate {
            id: data.id.as_str(),
            title: &data.title,
            image: &data.image,
            category: data.category,
            price: format_price(data.price),
        }
        .render()?;
        Ok(self.node.set(html))
    }

    fn node(&self) -> RenderedNode {
        self.node.get()
    }
}

/// Modal product preview contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewData {
    pub card: CardData,
    pub description: String,
    pub in_basket: bool,
}

#[derive(Template)]
#[template(path = "preview.html")]
struct PreviewTemplate<'a> {
    id: &'a str,
    title: &'a str,
    image: &'a str,
    category: Category,
    description: &'a str,
    price: String,
    button: &'static str,
    disabled: bool,
}

/// Full product card shown in the modal, with an add-to-basket button.
#[derive(Debug, Clone)]
pub struct PreviewView {
    bus: EventBus,
    action: Event,
    node: Node,
    disabled: Rc<Cell<bool>>,
}

impl PreviewView {
    #[must_use]
    pub fn new(bus: EventBus, action: Event) -> Self {
        Self {
            bus,
            action,
            node: Node::default(),
            disabled: Rc::default(),
        }
    }

    /// The card button. Returns `false` (and emits nothing) while the
    /// button is disabled.
    pub fn click(&self) -> bool {
        if self.disabled.get() {
            return false;
        }
        self.bus.dispatch(&self.action);
        true
    }

    /// Button label and whether it is disabled.
    #[must_use]
    pub const fn button_state(data: &PreviewData) -> (&'static str, bool) {
        if data.card.price.is_none() {
            ("Unavailable", true)
        } else if data.in_basket {
            ("Already in basket", true)
        } else {
            ("Add to basket", false)
        }
    }
}

impl Component for PreviewView {
    type Data = PreviewData;

    fn render(&self, data: &PreviewData) -> Result<RenderedNode, ViewError> {
        let (button, disabled) = Self::button_state(data);
        self.disabled.set(disabled);
        let html = PreviewTemplate {
            id: data.card.id.as_str(),
            title: &data.card.title,
            image: &data.card.image,
            category: data.card.category,
            description: &data.description,
            price: format_price(data.card.price),
            button,
            disabled,
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
    use crate::events::{Payload, topics};

    fn card(price: Option<u64>) -> CardData {
        CardData {
            id: ProductId::new("854cef69"),
            title: "+1 час в сутках".to_string(),
            image: "https://larek.example.com/content/weblarek/Asterisk_2.svg".to_string(),
            category: Category::SoftSkill,
            price: price.map(Price::new),
        }
    }

    #[test]
    fn test_card_slots() {
        let view = CardView::new(EventBus::new(), Event::new("noop", Payload::None));
        let html = view.render(&card(Some(750))).unwrap();

        assert!(html.contains(r#"<h2 class="card__title">+1 час в сутках</h2>"#));
        assert!(html.contains("card__category card__category_soft"));
        assert!(html.contains("софт-скил"));
        assert!(html.contains("Asterisk_2.svg\""));
        assert!(html.contains(r#"<span class="card__price">750 synapses</span>"#));
    }

    #[test]
    fn test_card_escapes_title() {
        let view = CardView::new(EventBus::new(), Event::new("noop", Payload::None));
        let html = view
            .render(&CardData {
                title: "<script>".to_string(),
                ..card(None)
            })
            .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("Priceless"));
    }

    #[test]
    fn test_card_click_dispatches_action() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(topics::PRODUCT_OPENED, move |event| {
            sink.borrow_mut().push(event.clone());
            Ok(())
        });

        let action = Event::new(topics::PRODUCT_OPENED, Payload::Message("854cef69".into()));
        CardView::new(bus, action.clone()).click();
        assert_eq!(*seen.borrow(), vec![action]);
    }

    #[test]
    fn test_preview_button_states() {
        let view = PreviewView::new(EventBus::new(), Event::new("noop", Payload::None));
        let data = PreviewData {
            card: card(Some(750)),
            description: "Если планируете решать задачи в тренажёре".to_string(),
            in_basket: false,
        };

        let html = view.render(&data).unwrap();
        assert!(html.contains("card__text"));
        assert!(html.contains(">Add to basket</button>"));
        assert!(!html.contains("disabled"));

        let html = view
            .render(&PreviewData {
                in_basket: true,
                ..data.clone()
            })
            .unwrap();
        assert!(html.contains(" disabled>Already in basket</button>"));

        let html = view
            .render(&PreviewData {
                card: card(None),
                ..data
            })
            .unwrap();
        assert!(html.contains(" disabled>Unavailable</button>"));
    }

    #[test]
    fn test_disabled_preview_button_does_nothing() {
        let bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&hits);
        bus.subscribe(topics::PRODUCT_ADDED, move |_| {
            *sink.borrow_mut() += 1;
            Ok(())
        });
        let view = PreviewView::new(bus, Event::new(topics::PRODUCT_ADDED, Payload::None));
        let data = PreviewData {
            card: card(Some(750)),
            description: String::new(),
            in_basket: true,
        };

        view.render(&data).unwrap();
        assert!(!view.click());

        view.render(&PreviewData {
            in_basket: false,
            ..data
        })
        .unwrap();
        assert!(view.click());
        assert_eq!(*hits.borrow(), 1);
    }
}
