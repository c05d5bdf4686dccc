//! Checkout forms: delivery (`order`) and contacts (`contacts`).

use askama::Template;
use web_larek_core::PaymentMethod;

use super::{Component, Node, RenderedNode, ViewError};
use crate::events::{EventBus, Payload, topics};
use crate::model::{OrderDraft, OrderField};

/// Form contents.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    pub draft: OrderDraft,
    /// Enables the submit button.
    pub valid: bool,
    /// Validation messages shown under the form.
    pub errors: String,
    /// An order is being sent; the submit button is locked.
    pub submitting: bool,
}

struct PaymentButton {
    name: &'static str,
    label: &'static str,
    active: bool,
}

#[derive(Template)]
#[template(path = "order_form.html")]
struct OrderFormTemplate<'a> {
    payment_buttons: Vec<PaymentButton>,
    address: &'a str,
    valid: bool,
    errors: &'a str,
}

#[derive(Template)]
#[template(path = "contacts_form.html")]
struct ContactsFormTemplate<'a> {
    email: &'a str,
    phone: &'a str,
    valid: bool,
    errors: &'a str,
    submitting: bool,
}

/// One of the two checkout forms.
#[derive(Debug, Clone)]
pub struct FormView {
    bus: EventBus,
    form: &'static str,
    fields: Vec<OrderField>,
    node: Node,
}

impl FormView {
    /// Build the form called `form` with inputs for `fields`.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::UnknownForm` for a form other than `order` or
    /// `contacts`, and `ViewError::UnknownField` for a field that does not
    /// belong to it.
    pub fn new(bus: EventBus, form: &str, fields: &[&str]) -> Result<Self, ViewError> {
        let form = match form {
            topics::ORDER_FORM => topics::ORDER_FORM,
            topics::CONTACTS_FORM => topics::CONTACTS_FORM,
            other => return Err(ViewError::UnknownForm(other.to_owned())),
        };

        let fields = fields
            .iter()
            .map(|name| {
                name.parse::<OrderField>()
                    .ok()
                    .filter(|field| field.form() == form)
                    .ok_or_else(|| ViewError::UnknownField {
                        form: form.to_owned(),
                        field: (*name).to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            bus,
            form,
            fields,
            node: Node::default(),
        })
    }

    /// The delivery form (payment and address).
    ///
    /// # Errors
    ///
    /// Never in practice; see [`Self::new`].
    pub fn order(bus: EventBus) -> Result<Self, ViewError> {
        Self::new(bus, topics::ORDER_FORM, &["payment", "address"])
    }

    /// The contacts form (email and phone).
    ///
    /// # Errors
    ///
    /// Never in practice; see [`Self::new`].
    pub fn contacts(bus: EventBus) -> Result<Self, ViewError> {
        Self::new(bus, topics::CONTACTS_FORM, &["email", "phone"])
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.form
    }

    fn field(&self, name: &str) -> Result<OrderField, ViewError> {
        name.parse::<OrderField>()
            .ok()
            .filter(|field| self.fields.contains(field))
            .ok_or_else(|| ViewError::UnknownField {
                form: self.form.to_owned(),
                field: name.to_owned(),
            })
    }

    /// Typing into an input. Emits `<form>.<field>:change`.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::UnknownField` if the form has no such input.
    pub fn input(&self, field: &str, value: &str) -> Result<(), ViewError> {
        let field = self.field(field)?;
        self.bus.emit(
            topics::field_change(self.form, field.as_str()),
            Payload::Field {
                field: field.as_str().to_owned(),
                value: value.to_owned(),
            },
        );
        Ok(())
    }

    /// A payment method button. Emits `payment-selected`.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::UnknownField` on a form without payment buttons.
    pub fn select_payment(&self, method: PaymentMethod) -> Result<(), ViewError> {
        self.field(OrderField::Payment.as_str())?;
        self.bus
            .emit(topics::PAYMENT_SELECTED, Payload::Payment(method));
        Ok(())
    }

    /// Submit button. Emits `<form>:submit`.
    pub fn submit(&self) {
        self.bus.emit(topics::form_submit(self.form), Payload::None);
    }
}

impl Component for FormView {
    type Data = FormData;

    fn render(&self, data: &FormData) -> Result<RenderedNode, ViewError> {
        let html = if self.form == topics::ORDER_FORM {
            OrderFormTemplate {
                payment_buttons: [
                    (PaymentMethod::Online, "Online"),
                    (PaymentMethod::Cash, "Cash on delivery"),
                ]
                .into_iter()
                .map(|(method, label)| PaymentButton {
                    name: method.as_str(),
                    label,
                    active: data.draft.payment == Some(method),
                })
                .collect(),
                address: &data.draft.address,
                valid: data.valid,
                errors: &data.errors,
            }
            .render()?
        } else {
            ContactsFormTemplate {
                email: &data.draft.email,
                phone: &data.draft.phone,
                valid: data.valid,
                errors: &data.errors,
                submitting: data.submitting,
            }
            .render()?
        };
        Ok(self.node.set(html))
    }

    fn node(&self) -> RenderedNode {
        self.node.get()
    }
}
