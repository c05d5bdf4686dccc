//! Storefront presenter.
//!
//! [`Storefront`] owns the bus, the model, the views and the checkout state,
//! and wires them together with bus subscriptions:
//!
//! | Event                     | Reaction                                       |
//! |---------------------------|------------------------------------------------|
//! | `products-changed`        | rebuild gallery cards, re-render page          |
//! | `basket-changed`          | re-render page counter (and basket if shown)   |
//! | `product-opened`          | show preview                                   |
//! | `product-added`           | add to basket, close modal                     |
//! | `product-removed`         | remove from basket                             |
//! | `basket-opened`           | show basket                                    |
//! | `order-started`           | show delivery or contacts form                 |
//! | `payment-selected`        | set payment method                             |
//! | `<form>.<field>:change`   | set order field                                |
//! | `validation-changed`      | refresh the visible form                       |
//! | `<form>:submit`           | advance checkout, send the order               |
//! | `modal-close-requested`   | close unless an order is in flight             |
//! | `modal-opened` / `-closed`| lock / unlock page scroll                      |
//!
//! Order submission is the only asynchronous step. It runs on the current
//! `LocalSet` via `spawn_local`, so a `Storefront` must be driven from
//! inside one; [`Storefront::settle`] waits for it.

use std::cell::RefCell;
use std::rc::Rc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;
use web_larek_core::{Product, ProductId};

use crate::api::{LarekApi, OrderResult};
use crate::checkout::{CheckoutAction, CheckoutError, CheckoutState, Readiness};
use crate::error::{self, AppError, Result};
use crate::events::{Event, EventBus, Pattern, Payload, topics};
use crate::model::{AppData, ModelError, OrderField, PricelessPolicy};
use crate::views::{
    BasketData, BasketItemData, BasketItemView, BasketView, CardData, CardView, Component,
    FormData, FormView, ModalView, PageData, PageView, PreviewData, PreviewView, RenderedNode,
    SuccessView, ViewError, document,
};

/// Resolve a product image path against the CDN base.
#[must_use]
pub fn image_url(cdn: &Url, path: &str) -> String {
    cdn.join(path.trim_start_matches('/'))
        .map_or_else(|_| format!("{cdn}{path}"), |url| url.to_string())
}

/// Every view the storefront renders.
///
/// Per-item views (gallery cards, the open preview, basket rows) are rebuilt
/// on each render; the accessors hand out clones so callers can trigger
/// their intents without holding a borrow.
#[derive(Debug)]
pub struct Views {
    pub page: PageView,
    pub modal: ModalView,
    pub basket: BasketView,
    pub order_form: FormView,
    pub contacts_form: FormView,
    pub success: SuccessView,
    cards: RefCell<Vec<(ProductId, CardView)>>,
    preview: RefCell<Option<PreviewView>>,
    basket_items: RefCell<Vec<BasketItemView>>,
}

impl Views {
    fn new(bus: &EventBus) -> std::result::Result<Self, ViewError> {
        Ok(Self {
            page: PageView::new(bus.clone()),
            modal: ModalView::new(bus.clone()),
            basket: BasketView::new(bus.clone()),
            order_form: FormView::order(bus.clone())?,
            contacts_form: FormView::contacts(bus.clone())?,
            success: SuccessView::new(bus.clone()),
            cards: RefCell::default(),
            preview: RefCell::default(),
            basket_items: RefCell::default(),
        })
    }

    /// The gallery card for `id`.
    #[must_use]
    pub fn card(&self, id: &ProductId) -> Option<CardView> {
        self.cards
            .borrow()
            .iter()
            .find(|(card_id, _)| card_id == id)
            .map(|(_, card)| card.clone())
    }

    /// The preview currently (or last) shown in the modal.
    #[must_use]
    pub fn preview(&self) -> Option<PreviewView> {
        self.preview.borrow().clone()
    }

    /// Basket row at `index` (0-based).
    #[must_use]
    pub fn basket_item(&self, index: usize) -> Option<BasketItemView> {
        self.basket_items.borrow().get(index).cloned()
    }
}

struct Inner<A> {
    bus: EventBus,
    data: AppData,
    api: Rc<A>,
    cdn: Url,
    state: RefCell<CheckoutState>,
    views: Views,
    pending: RefCell<Option<JoinHandle<()>>>,
}

/// The storefront application.
pub struct Storefront<A: LarekApi + 'static> {
    inner: Rc<Inner<A>>,
}

impl<A: LarekApi + 'static> Storefront<A> {
    /// Build the storefront and subscribe its handlers.
    ///
    /// # Errors
    ///
    /// Returns an error if a view or an event pattern cannot be set up, or
    /// the empty page fails to render.
    pub fn new(api: A, cdn: Url, policy: PricelessPolicy) -> Result<Self> {
        let bus = EventBus::new();
        let inner = Rc::new(Inner {
            data: AppData::new(bus.clone(), policy),
            views: Views::new(&bus)?,
            bus,
            api: Rc::new(api),
            cdn,
            state: RefCell::default(),
            pending: RefCell::default(),
        });

        Inner::wire(&inner)?;
        inner.render_page()?;
        info!(%policy, "Storefront ready");

        Ok(Self { inner })
    }

    /// Fetch the catalog and load it into the model. Returns the number of
    /// products loaded.
    ///
    /// A failed fetch is logged and reported, and leaves an empty catalog.
    pub async fn load_catalog(&self) -> usize {
        match self.inner.api.get_products().await {
            Ok(products) => {
                let count = products.len();
                self.inner.data.set_products(products);
                count
            }
            Err(err) => {
                error::report("Failed to load catalog", &AppError::Api(err));
                self.inner.data.set_products(Vec::new());
                0
            }
        }
    }

    /// Wait for an in-flight order submission, if any.
    pub async fn settle(&self) {
        let pending = self.inner.pending.borrow_mut().take();
        if let Some(handle) = pending
            && let Err(err) = handle.await
        {
            tracing::error!(error = %err, "Order submission task failed");
        }
    }

    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    #[must_use]
    pub fn data(&self) -> &AppData {
        &self.inner.data
    }

    #[must_use]
    pub fn views(&self) -> &Views {
        &self.inner.views
    }

    /// Current checkout state.
    #[must_use]
    pub fn state(&self) -> CheckoutState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn page_html(&self) -> RenderedNode {
        self.inner.views.page.node()
    }

    #[must_use]
    pub fn modal_html(&self) -> RenderedNode {
        self.inner.views.modal.node()
    }

    /// The whole page, modal included, as an HTML document.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Template` if the document template fails.
    pub fn document(&self) -> std::result::Result<RenderedNode, ViewError> {
        document(&self.page_html(), &self.modal_html())
    }
}

impl<A: LarekApi + 'static> Inner<A> {
    /// Subscribe `handler` with a weak reference back to the presenter.
    fn on<F>(this: &Rc<Self>, pattern: impl Into<Pattern>, handler: F)
    where
        F: Fn(&Rc<Self>, &Event) -> Result<()> + 'static,
    {
        let weak = Rc::downgrade(this);
        this.bus.subscribe(pattern, move |event| {
            weak.upgrade()
                .map_or(Ok(()), |inner| handler(&inner, event))
        });
    }

    fn wire(this: &Rc<Self>) -> Result<()> {
        Self::on(this, topics::PRODUCTS_CHANGED, |inner, event| {
            inner.rebuild_gallery(event.products()?)?;
            inner.render_page()
        });

        Self::on(this, topics::BASKET_CHANGED, |inner, _| {
            inner.render_page()?;
            let showing_basket = matches!(*inner.state.borrow(), CheckoutState::Basket);
            if showing_basket {
                let node = inner.render_basket()?;
                inner.views.modal.render(&node)?;
            }
            Ok(())
        });

        Self::on(this, topics::PRODUCT_OPENED, |inner, event| {
            inner.show_preview(event.product()?)
        });

        Self::on(this, topics::PRODUCT_ADDED, |inner, event| {
            let product = event.product()?;
            if inner.data.add_to_basket(&product.id)? {
                info!(product_id = %product.id, "Added to basket");
            }
            inner.transition(CheckoutAction::Close)?;
            inner.views.modal.close()?;
            Ok(())
        });

        Self::on(this, topics::PRODUCT_REMOVED, |inner, event| {
            let product = event.product()?;
            inner.data.remove_from_basket(&product.id);
            Ok(())
        });

        Self::on(this, topics::BASKET_OPENED, |inner, _| {
            let next = inner.transition(CheckoutAction::OpenBasket)?;
            inner.show_state(&next)
        });

        Self::on(this, topics::ORDER_STARTED, |inner, _| {
            let next = inner.transition(CheckoutAction::StartOrder)?;
            inner.show_state(&next)
        });

        Self::on(this, topics::PAYMENT_SELECTED, |inner, event| {
            inner.data.set_payment(event.payment()?);
            Ok(())
        });

        Self::on(
            this,
            Pattern::regex(topics::FIELD_CHANGE_PATTERN)?,
            |inner, event| {
                let (field, value) = event.field()?;
                let named = topics::parse_field_change(&event.name).map(|(_, named)| named);
                if named != Some(field) {
                    return Err(AppError::UnexpectedPayload {
                        event: event.name.clone(),
                        expected: "the field named by the event",
                    });
                }
                inner.data.set_order_field(field, value)?;
                Ok(())
            },
        );

        Self::on(this, topics::VALIDATION_CHANGED, |inner, _| {
            inner.refresh_form()
        });

        Self::on(
            this,
            Pattern::regex(topics::FORM_SUBMIT_PATTERN)?,
            Self::handle_submit,
        );

        Self::on(this, topics::MODAL_CLOSE_REQUESTED, |inner, _| {
            inner.transition(CheckoutAction::Close)?;
            inner.views.modal.close()?;
            Ok(())
        });

        Self::on(this, topics::MODAL_OPENED, |inner, _| inner.render_page());
        Self::on(this, topics::MODAL_CLOSED, |inner, _| inner.render_page());

        debug!(subscriptions = this.bus.len(), "Storefront wired");
        Ok(())
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    fn readiness(&self) -> Readiness {
        let blocker = match self.data.checkout_ready() {
            Err(err @ (ModelError::PricelessItem(_) | ModelError::NothingToOrder)) => {
                Some(err.to_string())
            }
            _ => None,
        };
        Readiness {
            basket_len: self.data.basket_len(),
            blocker,
            delivery_complete: self.data.delivery_complete(),
            contacts_complete: self.data.contacts_complete(),
        }
    }

    fn transition(
        &self,
        action: CheckoutAction,
    ) -> std::result::Result<CheckoutState, CheckoutError> {
        let ready = self.readiness();
        let current = self.state.borrow().clone();
        let next = current.apply(action, &ready).inspect_err(|err| {
            warn!(state = current.name(), error = %err, "Checkout transition refused");
        })?;
        debug!(from = current.name(), to = next.name(), "Checkout transition");
        self.state.replace(next.clone());
        Ok(next)
    }

    fn handle_submit(this: &Rc<Self>, event: &Event) -> Result<()> {
        if event.name == topics::form_submit(topics::ORDER_FORM) {
            let next = this.transition(CheckoutAction::SubmitDelivery)?;
            return this.show_state(&next);
        }
        if event.name != topics::form_submit(topics::CONTACTS_FORM) {
            warn!(event = %event.name, "Ignoring unknown submit event");
            return Ok(());
        }

        match this.transition(CheckoutAction::SubmitContacts) {
            Ok(_) => Self::submit_order(this),
            Err(CheckoutError::DeliveryIncomplete | CheckoutError::ContactsIncomplete) => {
                debug!("Order details incomplete, restarting checkout");
                this.bus.emit(topics::ORDER_STARTED, Payload::None);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn submit_order(this: &Rc<Self>) -> Result<()> {
        this.refresh_form()?;

        let request = match this.data.order_request() {
            Ok(request) => request,
            Err(err) => {
                let message = err.to_string();
                this.fail_submission(message)?;
                return Err(err.into());
            }
        };

        info!(
            items = request.items.len(),
            total = %request.total,
            "Submitting order"
        );
        error::add_breadcrumb("checkout", "Order submitted", None);

        let weak = Rc::downgrade(this);
        let api = Rc::clone(&this.api);
        let handle = tokio::task::spawn_local(async move {
            let outcome = api.create_order(&request).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let shown = match outcome {
                Ok(order) => inner.complete_submission(order),
                Err(err) => {
                    let message = err.to_string();
                    error::report("Order submission failed", &AppError::Api(err));
                    inner.fail_submission(message)
                }
            };
            if let Err(err) = shown {
                error::report("Failed to show order outcome", &err);
            }
        });
        *this.pending.borrow_mut() = Some(handle);
        Ok(())
    }

    fn complete_submission(&self, order: OrderResult) -> Result<()> {
        self.transition(CheckoutAction::SubmissionSucceeded(order.clone()))?;
        self.data.clear_basket();
        self.data.clear_order();

        let node = self.views.success.render(&order)?;
        self.views.modal.open(node)?;
        info!(order_id = %order.id, total = %order.total, "Order completed");
        self.bus.emit(topics::ORDER_COMPLETED, Payload::Order(order));
        Ok(())
    }

    fn fail_submission(&self, message: String) -> Result<()> {
        self.transition(CheckoutAction::SubmissionFailed(message.clone()))?;
        self.refresh_form()?;
        self.bus.emit(topics::ORDER_FAILED, Payload::Message(message));
        Ok(())
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    fn rebuild_gallery(&self, products: &[Product]) -> Result<()> {
        let cards = products
            .iter()
            .map(|product| {
                let card = CardView::new(
                    self.bus.clone(),
                    Event::new(topics::PRODUCT_OPENED, Payload::Product(product.clone())),
                );
                card.render(&CardData::from_product(
                    product,
                    image_url(&self.cdn, &product.image),
                ))?;
                Ok((product.id.clone(), card))
            })
            .collect::<Result<Vec<_>>>()?;
        self.views.cards.replace(cards);
        Ok(())
    }

    fn render_page(&self) -> Result<()> {
        let gallery = self
            .views
            .cards
            .borrow()
            .iter()
            .map(|(_, card)| card.node())
            .collect();
        self.views.page.render(&PageData {
            counter: self.data.basket_len(),
            gallery,
            locked: self.views.modal.is_open(),
        })?;
        Ok(())
    }

    fn show_preview(&self, product: &Product) -> Result<()> {
        self.transition(CheckoutAction::OpenProduct(product.id.clone()))?;

        let preview = PreviewView::new(
            self.bus.clone(),
            Event::new(topics::PRODUCT_ADDED, Payload::Product(product.clone())),
        );
        let node = preview.render(&PreviewData {
            card: CardData::from_product(product, image_url(&self.cdn, &product.image)),
            description: product.description.clone(),
            in_basket: self.data.in_basket(&product.id),
        })?;
        self.views.preview.replace(Some(preview));
        self.views.modal.open(node)?;
        Ok(())
    }

    fn render_basket(&self) -> Result<RenderedNode> {
        let basket = self.data.basket();
        let mut rows = Vec::with_capacity(basket.items.len());
        let mut views = Vec::with_capacity(basket.items.len());
        for (index, item) in basket.items.iter().enumerate() {
            let view = BasketItemView::new(
                self.bus.clone(),
                Event::new(topics::PRODUCT_REMOVED, Payload::Product(item.clone())),
            );
            rows.push(view.render(&BasketItemData {
                index: index + 1,
                title: item.title.clone(),
                price: item.price,
            })?);
            views.push(view);
        }
        self.views.basket_items.replace(views);

        let ready = self.readiness();
        let node = self.views.basket.render(&BasketData {
            items: rows,
            total: basket.total,
            can_order: ready.basket_len > 0 && ready.blocker.is_none(),
        })?;
        Ok(node)
    }

    /// Form view and data for `state`, if it shows a form.
    fn form_for(&self, state: &CheckoutState) -> Option<(&FormView, FormData)> {
        let draft = self.data.order();
        let errors = self.data.validation();
        match state {
            CheckoutState::DeliveryForm => Some((
                &self.views.order_form,
                FormData {
                    draft,
                    valid: errors.all_valid(&OrderField::DELIVERY),
                    errors: errors.summary(&OrderField::DELIVERY),
                    submitting: false,
                },
            )),
            CheckoutState::ContactForm { error } => {
                let summary = errors.summary(&OrderField::CONTACTS);
                Some((
                    &self.views.contacts_form,
                    FormData {
                        draft,
                        valid: errors.all_valid(&OrderField::CONTACTS),
                        errors: if summary.is_empty() {
                            error.clone().unwrap_or_default()
                        } else {
                            summary
                        },
                        submitting: false,
                    },
                ))
            }
            CheckoutState::Submitting => Some((
                &self.views.contacts_form,
                FormData {
                    draft,
                    valid: true,
                    errors: String::new(),
                    submitting: true,
                },
            )),
            _ => None,
        }
    }

    /// Re-render the visible form in place.
    fn refresh_form(&self) -> Result<()> {
        let state = self.state.borrow().clone();
        if let Some((form, data)) = self.form_for(&state) {
            let node = form.render(&data)?;
            self.views.modal.render(&node)?;
        }
        Ok(())
    }

    /// Open the modal on the content for `state`, or close it.
    fn show_state(&self, state: &CheckoutState) -> Result<()> {
        let node = match state {
            CheckoutState::Basket => Some(self.render_basket()?),
            CheckoutState::Success(order) => Some(self.views.success.render(order)?),
            _ => match self.form_for(state) {
                Some((form, data)) => Some(form.render(&data)?),
                None => None,
            },
        };
        match node {
            Some(node) => {
                self.views.modal.open(node)?;
            }
            None => {
                self.views.modal.close()?;
            }
        }
        Ok(())
    }
}
