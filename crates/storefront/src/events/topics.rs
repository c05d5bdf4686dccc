//! Event names shared by the model, views and presenter.
//!
//! Field changes and form submissions are addressed by pattern rather than
//! by a fixed name: `<form>.<field>:change` and `<form>:submit`, where
//! `<form>` is `order` or `contacts`.

pub const PRODUCTS_CHANGED: &str = "products-changed";
pub const PRODUCT_OPENED: &str = "product-opened";
pub const PRODUCT_ADDED: &str = "product-added";
pub const PRODUCT_REMOVED: &str = "product-removed";
pub const BASKET_OPENED: &str = "basket-opened";
pub const BASKET_CHANGED: &str = "basket-changed";
pub const MODAL_OPENED: &str = "modal-opened";
pub const MODAL_CLOSED: &str = "modal-closed";
/// The customer asked to dismiss the modal; it may be refused mid-submission.
pub const MODAL_CLOSE_REQUESTED: &str = "modal-close-requested";
pub const ORDER_STARTED: &str = "order-started";
pub const PAYMENT_SELECTED: &str = "payment-selected";
pub const VALIDATION_CHANGED: &str = "validation-changed";
pub const ORDER_CLEARED: &str = "order-cleared";
pub const ORDER_COMPLETED: &str = "order-completed";
pub const ORDER_FAILED: &str = "order-failed";

/// Form name of the delivery step.
pub const ORDER_FORM: &str = "order";
/// Form name of the contacts step.
pub const CONTACTS_FORM: &str = "contacts";

/// Matches every form field change event.
pub const FIELD_CHANGE_PATTERN: &str = r"^(order|contacts)\..*:change";
/// Matches every form submit event.
pub const FORM_SUBMIT_PATTERN: &str = r"^(order|contacts):submit";

/// Name of the change event for `field` on `form` (e.g., `order.address:change`).
#[must_use]
pub fn field_change(form: &str, field: &str) -> String {
    format!("{form}.{field}:change")
}

/// Split a change event name into its form and field.
///
/// Returns `None` for names that are not `<form>.<field>:change`.
#[must_use]
pub fn parse_field_change(name: &str) -> Option<(&str, &str)> {
    let (form, field) = name.strip_suffix(":change")?.split_once('.')?;
    (!form.is_empty() && !field.is_empty()).then_some((form, field))
}

/// Name of the submit event for `form` (e.g., `contacts:submit`).
#[must_use]
pub fn form_submit(form: &str) -> String {
    format!("{form}:submit")
}
