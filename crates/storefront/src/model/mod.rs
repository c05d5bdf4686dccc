//! Application state: catalog, basket and order draft.
//!
//! `AppData` is the single authority over storefront state. Every mutation
//! finishes updating state before it emits its change event, so handlers
//! reacting to the event can read `AppData` freely.
//!
//! # Events
//!
//! | Mutation              | Event                                   |
//! |-----------------------|-----------------------------------------|
//! | `set_products`        | `products-changed` (+ `basket-changed` if pruned) |
//! | `add_to_basket`       | `basket-changed` (only if added)        |
//! | `remove_from_basket`  | `basket-changed` (only if removed)      |
//! | `clear_basket`        | `basket-changed`                        |
//! | `set_order_field`     | `validation-changed`                    |
//! | `clear_order`         | `order-cleared`, `validation-changed`   |

pub mod order;

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};
use web_larek_core::{Email, PaymentError, PaymentMethod, Phone, Price, Product, ProductId};

use crate::api::OrderRequest;
use crate::events::{EventBus, Payload, topics};

pub use order::{OrderDraft, OrderField, ValidationErrors};

/// Errors raised by state mutations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The field name is not part of the order draft.
    #[error("unknown order field: {0}")]
    UnknownField(String),

    /// The payment value is not a known method.
    #[error(transparent)]
    InvalidPayment(#[from] PaymentError),

    /// The product is not in the loaded catalog.
    #[error("product {0} is not in the catalog")]
    NotInCatalog(ProductId),

    /// Checkout needs at least one item.
    #[error("basket is empty")]
    EmptyBasket,

    /// Checkout is blocked by a priceless item.
    #[error("\"{0}\" has no price and cannot be ordered")]
    PricelessItem(String),

    /// Every basket item is priceless, so there is nothing to submit.
    #[error("nothing in the basket has a price")]
    NothingToOrder,

    /// The draft still has validation errors.
    #[error("order is incomplete: {}", .0.join(", "))]
    IncompleteOrder(Vec<String>),

    /// Unrecognised priceless policy name.
    #[error("unknown priceless policy: {0} (expected exclude or block)")]
    InvalidPolicy(String),
}

/// How priceless products in the basket affect checkout.
///
/// Either way they contribute nothing to the total and are left out of the
/// submitted item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricelessPolicy {
    /// Ignore priceless items and allow checkout.
    #[default]
    Exclude,
    /// Refuse checkout while a priceless item is in the basket.
    Block,
}

impl fmt::Display for PricelessPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exclude => f.write_str("exclude"),
            Self::Block => f.write_str("block"),
        }
    }
}

impl std::str::FromStr for PricelessPolicy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exclude" => Ok(Self::Exclude),
            "block" => Ok(Self::Block),
            _ => Err(ModelError::InvalidPolicy(s.to_owned())),
        }
    }
}

/// Basket contents and total at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BasketSnapshot {
    pub items: Vec<Product>,
    pub total: Price,
}

#[derive(Debug, Default)]
struct State {
    catalog: Vec<Product>,
    basket: Vec<Product>,
    order: OrderDraft,
    errors: ValidationErrors,
}

impl State {
    fn total(&self) -> Price {
        self.basket.iter().filter_map(|p| p.price).sum()
    }

    fn snapshot(&self) -> BasketSnapshot {
        BasketSnapshot {
            items: self.basket.clone(),
            total: self.total(),
        }
    }
}

/// The storefront's state model.
#[derive(Debug)]
pub struct AppData {
    bus: EventBus,
    policy: PricelessPolicy,
    state: RefCell<State>,
}

impl AppData {
    /// Create an empty model publishing on `bus`.
    #[must_use]
    pub fn new(bus: EventBus, policy: PricelessPolicy) -> Self {
        let state = State {
            errors: ValidationErrors::check(&OrderDraft::default()),
            ..State::default()
        };
        Self {
            bus,
            policy,
            state: RefCell::new(state),
        }
    }

    /// The configured priceless policy.
    #[must_use]
    pub const fn policy(&self) -> PricelessPolicy {
        self.policy
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Replace the catalog.
    ///
    /// Duplicate ids keep their first occurrence. Basket entries missing
    /// from the new catalog are dropped.
    pub fn set_products(&self, products: Vec<Product>) {
        let (catalog, pruned) = {
            let mut state = self.state.borrow_mut();

            let mut seen = HashSet::new();
            let mut catalog = Vec::with_capacity(products.len());
            for product in products {
                if seen.insert(product.id.clone()) {
                    catalog.push(product);
                } else {
                    warn!(product_id = %product.id, "Duplicate product in catalog, skipping");
                }
            }

            let before = state.basket.len();
            state.basket.retain(|item| seen.contains(&item.id));
            let pruned = state.basket.len() != before;

            state.catalog.clone_from(&catalog);
            (catalog, pruned)
        };

        debug!(count = catalog.len(), "Catalog replaced");
        self.bus
            .emit(topics::PRODUCTS_CHANGED, Payload::Products(catalog));
        if pruned {
            self.emit_basket();
        }
    }

    /// All catalog products, in load order.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.state.borrow().catalog.clone()
    }

    /// Look up a catalog product.
    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<Product> {
        self.state
            .borrow()
            .catalog
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }

    // =========================================================================
    // Basket
    // =========================================================================

    /// Add a catalog product to the basket.
    ///
    /// Returns `Ok(false)` without emitting if the product is already there.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::NotInCatalog` if `id` is not a catalog product.
    pub fn add_to_basket(&self, id: &ProductId) -> Result<bool, ModelError> {
        {
            let mut state = self.state.borrow_mut();
            if state.basket.iter().any(|p| &p.id == id) {
                return Ok(false);
            }
            let product = state
                .catalog
                .iter()
                .find(|p| &p.id == id)
                .cloned()
                .ok_or_else(|| ModelError::NotInCatalog(id.clone()))?;
            state.basket.push(product);
        }

        self.emit_basket();
        Ok(true)
    }

    /// Remove a product from the basket. Returns `false` if it was not there.
    pub fn remove_from_basket(&self, id: &ProductId) -> bool {
        let removed = {
            let mut state = self.state.borrow_mut();
            let before = state.basket.len();
            state.basket.retain(|p| &p.id != id);
            state.basket.len() != before
        };

        if removed {
            self.emit_basket();
        }
        removed
    }

    /// Empty the basket.
    pub fn clear_basket(&self) {
        self.state.borrow_mut().basket.clear();
        self.emit_basket();
    }

    /// Basket contents and total.
    #[must_use]
    pub fn basket(&self) -> BasketSnapshot {
        self.state.borrow().snapshot()
    }

    /// Number of items in the basket.
    #[must_use]
    pub fn basket_len(&self) -> usize {
        self.state.borrow().basket.len()
    }

    /// Whether `id` is in the basket.
    #[must_use]
    pub fn in_basket(&self, id: &ProductId) -> bool {
        self.state.borrow().basket.iter().any(|p| &p.id == id)
    }

    /// Sum of the prices of basket items; priceless items count as zero.
    #[must_use]
    pub fn basket_total(&self) -> Price {
        self.state.borrow().total()
    }

    /// Whether the basket can proceed to checkout.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::EmptyBasket` for an empty basket,
    /// `ModelError::PricelessItem` when the policy is `Block` and a priceless
    /// item is present, or `ModelError::NothingToOrder` when no basket item
    /// has a price.
    pub fn checkout_ready(&self) -> Result<(), ModelError> {
        let state = self.state.borrow();
        if state.basket.is_empty() {
            return Err(ModelError::EmptyBasket);
        }
        if self.policy == PricelessPolicy::Block
            && let Some(item) = state.basket.iter().find(|p| p.is_priceless())
        {
            return Err(ModelError::PricelessItem(item.title.clone()));
        }
        if state.basket.iter().all(Product::is_priceless) {
            return Err(ModelError::NothingToOrder);
        }
        Ok(())
    }

    fn emit_basket(&self) {
        let snapshot = self.basket();
        self.bus
            .emit(topics::BASKET_CHANGED, Payload::Basket(snapshot));
    }

    // =========================================================================
    // Order draft
    // =========================================================================

    /// Set one field of the order draft and revalidate.
    ///
    /// An empty `payment` value clears the payment method.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownField` for a name outside the draft, or
    /// `ModelError::InvalidPayment` for an unknown payment method.
    pub fn set_order_field(&self, field: &str, value: &str) -> Result<(), ModelError> {
        let field = field.parse::<OrderField>()?;
        let errors = {
            let mut state = self.state.borrow_mut();
            match field {
                OrderField::Payment => {
                    state.order.payment = if value.is_empty() {
                        None
                    } else {
                        Some(value.parse::<PaymentMethod>()?)
                    };
                }
                OrderField::Address => value.clone_into(&mut state.order.address),
                OrderField::Email => value.clone_into(&mut state.order.email),
                OrderField::Phone => value.clone_into(&mut state.order.phone),
            }
            state.errors = ValidationErrors::check(&state.order);
            state.errors.clone()
        };

        debug!(%field, "Order field updated");
        self.bus
            .emit(topics::VALIDATION_CHANGED, Payload::Validation(errors));
        Ok(())
    }

    /// Choose the payment method.
    pub fn set_payment(&self, method: PaymentMethod) {
        let errors = {
            let mut state = self.state.borrow_mut();
            state.order.payment = Some(method);
            state.errors = ValidationErrors::check(&state.order);
            state.errors.clone()
        };
        self.bus
            .emit(topics::VALIDATION_CHANGED, Payload::Validation(errors));
    }

    /// Reset the order draft.
    pub fn clear_order(&self) {
        let errors = {
            let mut state = self.state.borrow_mut();
            state.order = OrderDraft::default();
            state.errors = ValidationErrors::check(&state.order);
            state.errors.clone()
        };
        self.bus.emit(topics::ORDER_CLEARED, Payload::None);
        self.bus
            .emit(topics::VALIDATION_CHANGED, Payload::Validation(errors));
    }

    /// The order draft as typed so far.
    #[must_use]
    pub fn order(&self) -> OrderDraft {
        self.state.borrow().order.clone()
    }

    /// Current validation errors.
    #[must_use]
    pub fn validation(&self) -> ValidationErrors {
        self.state.borrow().errors.clone()
    }

    /// Whether payment and address are valid.
    #[must_use]
    pub fn delivery_complete(&self) -> bool {
        self.state.borrow().errors.all_valid(&OrderField::DELIVERY)
    }

    /// Whether email and phone are valid.
    #[must_use]
    pub fn contacts_complete(&self) -> bool {
        self.state.borrow().errors.all_valid(&OrderField::CONTACTS)
    }

    /// Build the order to submit from the draft and the basket.
    ///
    /// Only priced basket items are listed; the total is their sum.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::IncompleteOrder` while the draft has validation
    /// errors, or a checkout blocker from [`Self::checkout_ready`].
    pub fn order_request(&self) -> Result<OrderRequest, ModelError> {
        self.checkout_ready()?;

        let state = self.state.borrow();
        if !state.errors.is_empty() {
            return Err(ModelError::IncompleteOrder(state.errors.messages()));
        }
        let incomplete = || ModelError::IncompleteOrder(state.errors.messages());

        let payment = state.order.payment.ok_or_else(incomplete)?;
        let email = Email::parse(&state.order.email).map_err(|_| incomplete())?;
        let phone = Phone::parse(&state.order.phone).map_err(|_| incomplete())?;

        let items = state
            .basket
            .iter()
            .filter(|p| !p.is_priceless())
            .map(|p| p.id.clone())
            .collect();

        Ok(OrderRequest {
            payment,
            email,
            phone,
            address: state.order.address.trim().to_owned(),
            total: state.total(),
            items,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::rc::Rc;

    use web_larek_core::Category;

    use super::*;
    use crate::events::Event;

    fn product(id: &str, price: Option<u64>) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            description: String::new(),
            image: format!("/{id}.svg"),
            category: Category::Other,
            price: price.map(Price::new),
        }
    }

    fn model(policy: PricelessPolicy) -> (EventBus, AppData) {
        let bus = EventBus::new();
        let data = AppData::new(bus.clone(), policy);
        data.set_products(vec![product("a", Some(100)), product("b", None)]);
        (bus, data)
    }

    fn record(bus: &EventBus, name: &str) -> Rc<RefCell<Vec<Event>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(name, move |event: &Event| {
            sink.borrow_mut().push(event.clone());
            Ok(())
        });
        seen
    }

    fn fill_order(data: &AppData) {
        data.set_order_field("payment", "online").unwrap();
        data.set_order_field("address", "Moscow").unwrap();
        data.set_order_field("email", "buyer@example.com").unwrap();
        data.set_order_field("phone", "+7 999 123 45 67").unwrap();
    }

    #[test]
    fn test_set_products_emits_catalog() {
        let bus = EventBus::new();
        let seen = record(&bus, topics::PRODUCTS_CHANGED);
        let data = AppData::new(bus, PricelessPolicy::Exclude);

        data.set_products(vec![product("a", Some(1)), product("a", Some(2))]);

        assert_eq!(data.products().len(), 1);
        let events = seen.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].products().unwrap()[0].price, Some(Price::new(1)));
    }

    #[test]
    fn test_add_same_product_twice_is_idempotent() {
        let (bus, data) = model(PricelessPolicy::Exclude);
        let seen = record(&bus, topics::BASKET_CHANGED);
        let id = ProductId::new("a");

        assert!(data.add_to_basket(&id).unwrap());
        assert!(!data.add_to_basket(&id).unwrap());

        assert_eq!(data.basket_len(), 1);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_add_unknown_product_fails() {
        let (_bus, data) = model(PricelessPolicy::Exclude);
        let err = data.add_to_basket(&ProductId::new("zzz")).unwrap_err();
        assert!(matches!(err, ModelError::NotInCatalog(id) if id.as_str() == "zzz"));
        assert_eq!(data.basket_len(), 0);
    }

    #[test]
    fn test_remove_missing_product_is_noop() {
        let (bus, data) = model(PricelessPolicy::Exclude);
        let seen = record(&bus, topics::BASKET_CHANGED);

        assert!(!data.remove_from_basket(&ProductId::new("a")));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_remove_keeps_insertion_order() {
        let bus = EventBus::new();
        let data = AppData::new(bus, PricelessPolicy::Exclude);
        data.set_products(vec![
            product("x", Some(1)),
            product("y", Some(2)),
            product("z", Some(3)),
        ]);
        for id in ["z", "x", "y"] {
            data.add_to_basket(&ProductId::new(id)).unwrap();
        }
        assert!(data.remove_from_basket(&ProductId::new("x")));

        let ids: Vec<_> = data
            .basket()
            .items
            .iter()
            .map(|p| p.id.to_string())
            .collect();
        assert_eq!(ids, vec!["z", "y"]);
        assert_eq!(data.basket_total(), Price::new(5));
    }

    #[test]
    fn test_total_excludes_priceless_under_exclude_policy() {
        let (_bus, data) = model(PricelessPolicy::Exclude);
        data.add_to_basket(&ProductId::new("a")).unwrap();
        data.add_to_basket(&ProductId::new("b")).unwrap();

        assert_eq!(data.basket_total(), Price::new(100));
        assert!(data.checkout_ready().is_ok());
    }

    #[test]
    fn test_priceless_blocks_checkout_under_block_policy() {
        let (_bus, data) = model(PricelessPolicy::Block);
        data.add_to_basket(&ProductId::new("a")).unwrap();
        data.add_to_basket(&ProductId::new("b")).unwrap();

        assert_eq!(data.basket_total(), Price::new(100));
        assert!(matches!(
            data.checkout_ready(),
            Err(ModelError::PricelessItem(title)) if title == "Product b"
        ));

        data.remove_from_basket(&ProductId::new("b"));
        assert!(data.checkout_ready().is_ok());
    }

    #[test]
    fn test_priceless_only_basket_is_not_ready() {
        let (_bus, data) = model(PricelessPolicy::Exclude);
        data.add_to_basket(&ProductId::new("b")).unwrap();

        assert!(matches!(
            data.checkout_ready(),
            Err(ModelError::NothingToOrder)
        ));
        fill_order(&data);
        assert!(matches!(
            data.order_request(),
            Err(ModelError::NothingToOrder)
        ));

        data.add_to_basket(&ProductId::new("a")).unwrap();
        assert!(data.checkout_ready().is_ok());
    }

    #[test]
    fn test_empty_basket_is_not_ready() {
        let (_bus, data) = model(PricelessPolicy::Exclude);
        assert!(matches!(data.checkout_ready(), Err(ModelError::EmptyBasket)));
    }

    #[test]
    fn test_reload_prunes_basket() {
        let (bus, data) = model(PricelessPolicy::Exclude);
        data.add_to_basket(&ProductId::new("a")).unwrap();
        let seen = record(&bus, topics::BASKET_CHANGED);

        data.set_products(vec![product("b", None)]);

        assert_eq!(data.basket_len(), 0);
        assert!(seen.borrow()[0].basket().unwrap().items.is_empty());
    }

    #[test]
    fn test_field_validity_toggles() {
        let (bus, data) = model(PricelessPolicy::Exclude);
        let seen = record(&bus, topics::VALIDATION_CHANGED);

        data.set_order_field("address", "Moscow").unwrap();
        assert!(!data.validation().contains(OrderField::Address));

        data.set_order_field("address", "").unwrap();
        assert!(data.validation().contains(OrderField::Address));

        let events = seen.borrow();
        assert_eq!(events.len(), 2);
        assert!(!events[0].validation().unwrap().contains(OrderField::Address));
        assert!(events[1].validation().unwrap().contains(OrderField::Address));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let (bus, data) = model(PricelessPolicy::Exclude);
        let seen = record(&bus, topics::VALIDATION_CHANGED);

        let err = data.set_order_field("total", "5").unwrap_err();
        assert!(matches!(err, ModelError::UnknownField(_)));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_invalid_payment_is_rejected() {
        let (_bus, data) = model(PricelessPolicy::Exclude);
        let err = data.set_order_field("payment", "barter").unwrap_err();
        assert!(matches!(err, ModelError::InvalidPayment(_)));
        assert_eq!(data.order().payment, None);
    }

    #[test]
    fn test_order_request_lists_priced_items() {
        let (_bus, data) = model(PricelessPolicy::Exclude);
        data.add_to_basket(&ProductId::new("b")).unwrap();
        data.add_to_basket(&ProductId::new("a")).unwrap();
        fill_order(&data);

        let request = data.order_request().unwrap();
        assert_eq!(request.payment, PaymentMethod::Online);
        assert_eq!(request.total, Price::new(100));
        assert_eq!(request.items, vec![ProductId::new("a")]);
        assert_eq!(request.email.as_str(), "buyer@example.com");
    }

    #[test]
    fn test_order_request_requires_complete_draft() {
        let (_bus, data) = model(PricelessPolicy::Exclude);
        data.add_to_basket(&ProductId::new("a")).unwrap();
        data.set_order_field("payment", "cash").unwrap();

        assert!(matches!(
            data.order_request(),
            Err(ModelError::IncompleteOrder(messages)) if messages.len() == 3
        ));
    }

    #[test]
    fn test_clear_order_resets_draft() {
        let (bus, data) = model(PricelessPolicy::Exclude);
        let cleared = record(&bus, topics::ORDER_CLEARED);
        fill_order(&data);
        assert!(data.delivery_complete());
        assert!(data.contacts_complete());

        data.clear_order();

        assert_eq!(data.order(), OrderDraft::default());
        assert!(!data.delivery_complete());
        assert_eq!(cleared.borrow().len(), 1);
    }

    #[test]
    fn test_handlers_can_read_model_during_emit() {
        let bus = EventBus::new();
        let data = Rc::new(AppData::new(bus.clone(), PricelessPolicy::Exclude));
        let observed = Rc::new(RefCell::new(None));

        let reader = Rc::clone(&data);
        let sink = Rc::clone(&observed);
        bus.subscribe(topics::BASKET_CHANGED, move |_: &Event| {
            *sink.borrow_mut() = Some(reader.basket_len());
            Ok(())
        });

        data.set_products(vec![product("a", Some(1))]);
        data.add_to_basket(&ProductId::new("a")).unwrap();
        assert_eq!(*observed.borrow(), Some(1));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            " Block ".parse::<PricelessPolicy>().unwrap(),
            PricelessPolicy::Block
        );
        assert!("strict".parse::<PricelessPolicy>().is_err());
    }
}
