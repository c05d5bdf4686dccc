//! View components.
//!
//! A view renders an askama template from a plain data snapshot and keeps
//! the result as its node. It never holds business state and never reads
//! the model; user intents (clicks, typing) are methods that emit events on
//! the bus the view was built with.
//!
//! # Templates
//!
//! | View             | Template             |
//! |------------------|----------------------|
//! | `PageView`       | `page.html`          |
//! | `CardView`       | `card.html`          |
//! | `PreviewView`    | `preview.html`       |
//! | `BasketItemView` | `basket_item.html`   |
//! | `BasketView`     | `basket.html`        |
//! | `ModalView`      | `modal.html`         |
//! | `FormView`       | `order_form.html`, `contacts_form.html` |
//! | `SuccessView`    | `success.html`       |
//! | [`document`]     | `document.html`      |

mod basket;
mod card;
mod form;
mod modal;
mod page;
mod success;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use web_larek_core::Price;

pub use basket::{BasketData, BasketItemData, BasketItemView, BasketView};
pub use card::{CardData, CardView, PreviewData, PreviewView};
pub use form::{FormData, FormView};
pub use modal::ModalView;
pub use page::{PageData, PageView, document};
pub use success::SuccessView;

/// Label shown in place of a price for priceless products.
pub const PRICELESS_LABEL: &str = "Priceless";

/// Errors raised while building or rendering views.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// A form was configured with a field it does not have.
    #[error("form {form} has no field {field}")]
    UnknownField { form: String, field: String },

    /// A form name other than `order` or `contacts`.
    #[error("unknown form: {0}")]
    UnknownForm(String),
}

/// Rendered HTML for one component.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedNode(String);

impl RenderedNode {
    /// Returns the markup as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether nothing has been rendered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the markup contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.0.contains(needle)
    }
}

impl fmt::Display for RenderedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RenderedNode {
    fn from(html: String) -> Self {
        Self(html)
    }
}

/// A renderable view.
pub trait Component {
    /// Snapshot the view renders from.
    type Data;

    /// Render `data`, remember the result as this view's node, and return it.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Template` if the template fails to render.
    fn render(&self, data: &Self::Data) -> Result<RenderedNode, ViewError>;

    /// The last rendered node (empty before the first render).
    fn node(&self) -> RenderedNode;
}

/// Shared slot holding a view's last rendered node.
#[derive(Debug, Clone, Default)]
pub(crate) struct Node(Rc<RefCell<RenderedNode>>);

impl Node {
    fn set(&self, html: String) -> RenderedNode {
        let node = RenderedNode(html);
        self.0.replace(node.clone());
        node
    }

    fn get(&self) -> RenderedNode {
        self.0.borrow().clone()
    }
}

/// Price text for cards and the basket.
#[must_use]
pub fn format_price(price: Option<Price>) -> String {
    price.map_or_else(|| PRICELESS_LABEL.to_string(), Price::display)
}
