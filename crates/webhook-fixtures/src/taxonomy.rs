//! Event names and the payload families they belong to.

use rand::Rng;
use rand::distr::{Distribution, StandardUniform};
use rand::seq::IndexedRandom;

/// Event families, one per `data.object` payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventFamily {
    /// `payment_intent.*` events.
    PaymentIntent,
    /// `charge.*` events.
    Charge,
    /// `invoice.*` events.
    Invoice,
    /// `customer.*` events other than subscriptions.
    Customer,
    /// `subscription.*` and `customer.subscription.*` events.
    Subscription,
    /// `checkout.*` events.
    Checkout,
    /// Any other event name; carries only the base object keys.
    Other,
}

const BASE_KEYS: &[&str] = &["id", "object", "created"];

const PAYMENT_INTENT_KEYS: &[&str] = &[
    "id",
    "object",
    "created",
    "amount",
    "amount_received",
    "currency",
    "customer",
    "description",
    "status",
    "payment_method",
    "metadata",
];

const CHARGE_KEYS: &[&str] = &[
    "id",
    "object",
    "created",
    "amount",
    "currency",
    "customer",
    "description",
    "status",
    "paid",
    "refunded",
    "payment_method",
    "receipt_url",
];

const INVOICE_KEYS: &[&str] = &[
    "id",
    "object",
    "created",
    "amount_due",
    "amount_paid",
    "currency",
    "customer",
    "status",
    "number",
    "hosted_invoice_url",
    "invoice_pdf",
];

const CUSTOMER_KEYS: &[&str] = &[
    "id",
    "object",
    "created",
    "email",
    "name",
    "phone",
    "address",
    "description",
    "metadata",
];

const SUBSCRIPTION_KEYS: &[&str] = &[
    "id",
    "object",
    "created",
    "customer",
    "status",
    "current_period_start",
    "current_period_end",
    "plan",
    "items",
];

const CHECKOUT_KEYS: &[&str] = &[
    "id",
    "object",
    "created",
    "amount_total",
    "currency",
    "customer",
    "customer_email",
    "payment_status",
    "status",
    "success_url",
    "url",
];

impl EventFamily {
    /// Every family, fallback last.
    pub const ALL: [Self; 7] = [
        Self::PaymentIntent,
        Self::Charge,
        Self::Invoice,
        Self::Customer,
        Self::Subscription,
        Self::Checkout,
        Self::Other,
    ];

    /// Classify an event name.
    ///
    /// Subscription events are recognised anywhere in the name so the
    /// `customer.subscription.*` spelling is not mistaken for a customer
    /// event. Unknown names fall back to [`EventFamily::Other`].
    ///
    /// # Example
    ///
    /// ```
    /// use webhook_fixtures::EventFamily;
    ///
    /// assert_eq!(
    ///     EventFamily::classify("customer.subscription.created"),
    ///     EventFamily::Subscription
    /// );
    /// assert_eq!(EventFamily::classify("customer.created"), EventFamily::Customer);
    /// assert_eq!(EventFamily::classify("product.created"), EventFamily::Other);
    /// ```
    #[must_use]
    pub fn classify(event_type: &str) -> Self {
        if event_type.starts_with("subscription") || event_type.contains(".subscription") {
            return Self::Subscription;
        }

        let prefix = event_type.split('.').next().unwrap_or_default();
        match prefix {
            "payment_intent" => Self::PaymentIntent,
            "charge" => Self::Charge,
            "invoice" => Self::Invoice,
            "customer" => Self::Customer,
            "checkout" => Self::Checkout,
            _ => Self::Other,
        }
    }

    /// The closed key set of `data.object` for this family.
    #[must_use]
    pub const fn object_keys(self) -> &'static [&'static str] {
        match self {
            Self::PaymentIntent => PAYMENT_INTENT_KEYS,
            Self::Charge => CHARGE_KEYS,
            Self::Invoice => INVOICE_KEYS,
            Self::Customer => CUSTOMER_KEYS,
            Self::Subscription => SUBSCRIPTION_KEYS,
            Self::Checkout => CHECKOUT_KEYS,
            Self::Other => BASE_KEYS,
        }
    }
}

/// Event names the generator draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    /// `payment_intent.succeeded`
    PaymentIntentSucceeded,
    /// `payment_intent.created`
    PaymentIntentCreated,
    /// `payment_intent.payment_failed`
    PaymentIntentPaymentFailed,
    /// `charge.succeeded`
    ChargeSucceeded,
    /// `charge.failed`
    ChargeFailed,
    /// `charge.refunded`
    ChargeRefunded,
    /// `invoice.created`
    InvoiceCreated,
    /// `invoice.paid`
    InvoicePaid,
    /// `invoice.payment_failed`
    InvoicePaymentFailed,
    /// `invoice.finalized`
    InvoiceFinalized,
    /// `customer.created`
    CustomerCreated,
    /// `customer.updated`
    CustomerUpdated,
    /// `customer.deleted`
    CustomerDeleted,
    /// `customer.subscription.created`
    CustomerSubscriptionCreated,
    /// `customer.subscription.updated`
    CustomerSubscriptionUpdated,
    /// `customer.subscription.deleted`
    CustomerSubscriptionDeleted,
    /// `subscription.created`
    SubscriptionCreated,
    /// `subscription.updated`
    SubscriptionUpdated,
    /// `subscription.deleted`
    SubscriptionDeleted,
    /// `checkout.session.completed`
    CheckoutSessionCompleted,
}

impl EventType {
    /// Every known event type.
    pub const ALL: [Self; 20] = [
        Self::PaymentIntentSucceeded,
        Self::PaymentIntentCreated,
        Self::PaymentIntentPaymentFailed,
        Self::ChargeSucceeded,
        Self::ChargeFailed,
        Self::ChargeRefunded,
        Self::InvoiceCreated,
        Self::InvoicePaid,
        Self::InvoicePaymentFailed,
        Self::InvoiceFinalized,
        Self::CustomerCreated,
        Self::CustomerUpdated,
        Self::CustomerDeleted,
        Self::CustomerSubscriptionCreated,
        Self::CustomerSubscriptionUpdated,
        Self::CustomerSubscriptionDeleted,
        Self::SubscriptionCreated,
        Self::SubscriptionUpdated,
        Self::SubscriptionDeleted,
        Self::CheckoutSessionCompleted,
    ];

    /// Wire name of the event.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PaymentIntentSucceeded => "payment_intent.succeeded",
            Self::PaymentIntentCreated => "payment_intent.created",
            Self::PaymentIntentPaymentFailed => "payment_intent.payment_failed",
            Self::ChargeSucceeded => "charge.succeeded",
            Self::ChargeFailed => "charge.failed",
            Self::ChargeRefunded => "charge.refunded",
            Self::InvoiceCreated => "invoice.created",
            Self::InvoicePaid => "invoice.paid",
            Self::InvoicePaymentFailed => "invoice.payment_failed",
            Self::InvoiceFinalized => "invoice.finalized",
            Self::CustomerCreated => "customer.created",
            Self::CustomerUpdated => "customer.updated",
            Self::CustomerDeleted => "customer.deleted",
            Self::CustomerSubscriptionCreated => "customer.subscription.created",
            Self::CustomerSubscriptionUpdated => "customer.subscription.updated",
            Self::CustomerSubscriptionDeleted => "customer.subscription.deleted",
            Self::SubscriptionCreated => "subscription.created",
            Self::SubscriptionUpdated => "subscription.updated",
            Self::SubscriptionDeleted => "subscription.deleted",
            Self::CheckoutSessionCompleted => "checkout.session.completed",
        }
    }

    /// Payload family of the event.
    #[must_use]
    pub fn family(self) -> EventFamily {
        EventFamily::classify(self.as_str())
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Distribution<EventType> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> EventType {
        EventType::ALL
            .choose(rng)
            .copied()
            .unwrap_or(EventType::PaymentIntentSucceeded)
    }
}
