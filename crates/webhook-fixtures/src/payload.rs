//! Typed `data.object` payloads, one struct per event family.
//!
//! Every payload serialises to exactly the key set returned by
//! [`EventFamily::object_keys`]. Values are randomised; status fields are
//! conditioned on the event name so, for example, a `charge.refunded` event
//! always carries `refunded: true`.

use chrono::{DateTime, Utc};
use fake::Fake;
use fake::faker::address::raw::{BuildingNumber, CityName, CountryCode, StateAbbr, StreetName, ZipCode};
use fake::faker::company::raw::CatchPhrase;
use fake::faker::internet::raw::SafeEmail;
use fake::faker::lorem::raw::Sentence;
use fake::faker::name::raw::Name;
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::EN;
use rand::Rng;
use rand::distr::{Distribution, StandardUniform};
use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::random::{alphanumeric, domain_name, prefixed_id, short_prefixed_id, uuid_v4};
use crate::taxonomy::EventFamily;

/// Seconds in the 365-day billing period assigned to subscriptions.
const SUBSCRIPTION_PERIOD_SECS: i64 = 365 * 24 * 60 * 60;

const PRODUCTS: [&str; 8] = [
    "Starter plan",
    "Team plan",
    "Business plan",
    "Analytics add-on",
    "Priority support",
    "Storage pack",
    "API credits",
    "Enterprise seat",
];

/// Settlement currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// US dollar.
    Usd,
    /// Euro.
    Eur,
    /// Pound sterling.
    Gbp,
    /// Brazilian real.
    Brl,
}

impl Distribution<Currency> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Currency {
        match rng.random_range(0..4_u8) {
            0 => Currency::Usd,
            1 => Currency::Eur,
            2 => Currency::Gbp,
            _ => Currency::Brl,
        }
    }
}

/// Fields shared by every `data.object`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectBase {
    /// Provider object identifier.
    pub id: String,
    /// Provider object kind, e.g. `charge`.
    pub object: String,
    /// Unix seconds of the delivery timestamp.
    pub created: i64,
}

/// Status of a payment intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    /// Funds captured.
    Succeeded,
    /// Payment attempt failed.
    Failed,
    /// Still in flight.
    Processing,
}

/// Metadata attached to payment intents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentIntentMetadata {
    /// Merchant order reference.
    pub order_id: String,
    /// Buyer display name.
    pub customer_name: String,
}

/// `payment_intent` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentIntentObject {
    /// Shared keys.
    #[serde(flatten)]
    pub base: ObjectBase,
    /// Requested amount in minor units.
    pub amount: u32,
    /// Captured amount in minor units.
    pub amount_received: u32,
    /// Settlement currency.
    pub currency: Currency,
    /// Customer identifier.
    pub customer: String,
    /// Free-text description.
    pub description: String,
    /// Intent status.
    pub status: PaymentIntentStatus,
    /// Payment method identifier.
    pub payment_method: String,
    /// Merchant metadata.
    pub metadata: PaymentIntentMetadata,
}

/// Status of a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    /// Charge settled.
    Succeeded,
    /// Charge declined or reversed.
    Failed,
}

/// `charge` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChargeObject {
    /// Shared keys.
    #[serde(flatten)]
    pub base: ObjectBase,
    /// Amount in minor units.
    pub amount: u32,
    /// Settlement currency.
    pub currency: Currency,
    /// Customer identifier.
    pub customer: String,
    /// Free-text description.
    pub description: String,
    /// Charge status.
    pub status: ChargeStatus,
    /// Whether the charge was paid.
    pub paid: bool,
    /// Whether the charge was refunded.
    pub refunded: bool,
    /// Payment method identifier.
    pub payment_method: String,
    /// Hosted receipt link.
    pub receipt_url: String,
}

/// Status of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Settled.
    Paid,
    /// Finalised but unpaid.
    Open,
    /// Not yet finalised.
    Draft,
}

/// `invoice` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceObject {
    /// Shared keys.
    #[serde(flatten)]
    pub base: ObjectBase,
    /// Amount due in minor units.
    pub amount_due: u32,
    /// Amount paid in minor units; zero unless the event reports payment.
    pub amount_paid: u32,
    /// Settlement currency.
    pub currency: Currency,
    /// Customer identifier.
    pub customer: String,
    /// Invoice status.
    pub status: InvoiceStatus,
    /// Human-readable invoice number, `INV-####`.
    pub number: String,
    /// Hosted invoice page.
    pub hosted_invoice_url: String,
    /// Invoice PDF download link.
    pub invoice_pdf: String,
}

/// Postal address of a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    /// Street line.
    pub line1: String,
    /// City.
    pub city: String,
    /// State or region code.
    pub state: String,
    /// Postal code.
    pub postal_code: String,
    /// ISO country code.
    pub country: String,
}

/// Metadata attached to customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerMetadata {
    /// Merchant-side user identifier.
    pub user_id: String,
}

/// `customer` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerObject {
    /// Shared keys.
    #[serde(flatten)]
    pub base: ObjectBase,
    /// Contact email.
    pub email: String,
    /// Full name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Billing address.
    pub address: Address,
    /// Free-text description.
    pub description: String,
    /// Merchant metadata.
    pub metadata: CustomerMetadata,
}

/// Status of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Billing normally.
    Active,
    /// Cancelled by the customer or merchant.
    Canceled,
    /// Latest payment failed.
    PastDue,
    /// In a free trial.
    Trialing,
}

impl Distribution<SubscriptionStatus> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SubscriptionStatus {
        match rng.random_range(0..4_u8) {
            0 => SubscriptionStatus::Active,
            1 => SubscriptionStatus::Canceled,
            2 => SubscriptionStatus::PastDue,
            _ => SubscriptionStatus::Trialing,
        }
    }
}

/// Billing interval of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanInterval {
    /// Monthly billing.
    Month,
    /// Yearly billing.
    Year,
}

impl Distribution<PlanInterval> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PlanInterval {
        if rng.random() {
            PlanInterval::Month
        } else {
            PlanInterval::Year
        }
    }
}

/// Subscription plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    /// Plan identifier.
    pub id: String,
    /// Price per interval in minor units.
    pub amount: u32,
    /// Billing currency.
    pub currency: Currency,
    /// Billing interval.
    pub interval: PlanInterval,
    /// Product name.
    pub product: String,
}

/// Price attached to a subscription item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Price {
    /// Price identifier.
    pub id: String,
    /// Product name.
    pub product: String,
    /// Unit price in minor units.
    pub unit_amount: u32,
}

/// One line of a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionItem {
    /// Item identifier.
    pub id: String,
    /// Item price.
    pub price: Price,
}

/// List wrapper for subscription items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionItems {
    /// Items in the subscription.
    pub data: Vec<SubscriptionItem>,
}

/// `subscription` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionObject {
    /// Shared keys.
    #[serde(flatten)]
    pub base: ObjectBase,
    /// Customer identifier.
    pub customer: String,
    /// Subscription status.
    pub status: SubscriptionStatus,
    /// Unix seconds at which the current period began.
    pub current_period_start: i64,
    /// Unix seconds at which the current period ends.
    pub current_period_end: i64,
    /// Subscribed plan.
    pub plan: Plan,
    /// Subscription items.
    pub items: SubscriptionItems,
}

/// `checkout.session` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSessionObject {
    /// Shared keys.
    #[serde(flatten)]
    pub base: ObjectBase,
    /// Total charged in minor units.
    pub amount_total: u32,
    /// Settlement currency.
    pub currency: Currency,
    /// Customer identifier.
    pub customer: String,
    /// Buyer email.
    pub customer_email: String,
    /// Always `paid` for completed sessions.
    pub payment_status: &'static str,
    /// Always `complete` for completed sessions.
    pub status: &'static str,
    /// Redirect target after payment.
    pub success_url: String,
    /// Hosted checkout page.
    pub url: String,
}

/// The `data.object` of an event, closed over the known families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EventObject {
    /// `payment_intent.*`
    PaymentIntent(PaymentIntentObject),
    /// `charge.*`
    Charge(ChargeObject),
    /// `invoice.*`
    Invoice(InvoiceObject),
    /// `customer.*`
    Customer(CustomerObject),
    /// `subscription.*` and `customer.subscription.*`
    Subscription(SubscriptionObject),
    /// `checkout.*`
    Checkout(CheckoutSessionObject),
    /// Unrecognised event names.
    Other(ObjectBase),
}

impl EventObject {
    /// Family of the payload.
    #[must_use]
    pub const fn family(&self) -> EventFamily {
        match self {
            Self::PaymentIntent(_) => EventFamily::PaymentIntent,
            Self::Charge(_) => EventFamily::Charge,
            Self::Invoice(_) => EventFamily::Invoice,
            Self::Customer(_) => EventFamily::Customer,
            Self::Subscription(_) => EventFamily::Subscription,
            Self::Checkout(_) => EventFamily::Checkout,
            Self::Other(_) => EventFamily::Other,
        }
    }

    /// Shared keys of the payload.
    #[must_use]
    pub const fn base(&self) -> &ObjectBase {
        match self {
            Self::PaymentIntent(object) => &object.base,
            Self::Charge(object) => &object.base,
            Self::Invoice(object) => &object.base,
            Self::Customer(object) => &object.base,
            Self::Subscription(object) => &object.base,
            Self::Checkout(object) => &object.base,
            Self::Other(object) => object,
        }
    }
}

/// Build a `data.object` for `event_type` delivered at `created_at`.
///
/// The family is chosen with [`EventFamily::classify`]; unknown names yield
/// [`EventObject::Other`] whose `object` is the first segment of the name.
pub fn build_event_object<R: Rng + ?Sized>(
    rng: &mut R,
    event_type: &str,
    created_at: DateTime<Utc>,
) -> EventObject {
    let created = created_at.timestamp();
    match EventFamily::classify(event_type) {
        EventFamily::PaymentIntent => {
            EventObject::PaymentIntent(payment_intent(rng, event_type, created))
        }
        EventFamily::Charge => EventObject::Charge(charge(rng, event_type, created)),
        EventFamily::Invoice => EventObject::Invoice(invoice(rng, event_type, created)),
        EventFamily::Customer => EventObject::Customer(customer(rng, created)),
        EventFamily::Subscription => EventObject::Subscription(subscription(rng, created)),
        EventFamily::Checkout => EventObject::Checkout(checkout_session(rng, created)),
        EventFamily::Other => {
            let kind = event_type.split('.').next().unwrap_or_default();
            EventObject::Other(ObjectBase {
                id: prefixed_id(rng, "obj_"),
                object: kind.to_owned(),
                created,
            })
        }
    }
}

fn base<R: Rng + ?Sized>(rng: &mut R, prefix: &str, object: &str, created: i64) -> ObjectBase {
    ObjectBase {
        id: prefixed_id(rng, prefix),
        object: object.to_owned(),
        created,
    }
}

fn description<R: Rng + ?Sized>(rng: &mut R) -> String {
    Sentence(EN, 3..8).fake_with_rng(rng)
}

fn product<R: Rng + ?Sized>(rng: &mut R) -> String {
    PRODUCTS.choose(rng).copied().unwrap_or("Starter plan").to_owned()
}

fn payment_intent<R: Rng + ?Sized>(
    rng: &mut R,
    event_type: &str,
    created: i64,
) -> PaymentIntentObject {
    let amount = rng.random_range(1_000..=100_000);
    let status = if event_type.contains("succeeded") {
        PaymentIntentStatus::Succeeded
    } else if event_type.contains("failed") {
        PaymentIntentStatus::Failed
    } else {
        PaymentIntentStatus::Processing
    };

    PaymentIntentObject {
        base: base(rng, "pi_", "payment_intent", created),
        amount,
        amount_received: rng.random_range(1_000..=100_000),
        currency: rng.random(),
        customer: short_prefixed_id(rng, "cus_"),
        description: description(rng),
        status,
        payment_method: prefixed_id(rng, "pm_"),
        metadata: PaymentIntentMetadata {
            order_id: uuid_v4(rng).to_string(),
            customer_name: Name(EN).fake_with_rng(rng),
        },
    }
}

fn charge<R: Rng + ?Sized>(rng: &mut R, event_type: &str, created: i64) -> ChargeObject {
    let succeeded = event_type.contains("succeeded");
    ChargeObject {
        base: base(rng, "ch_", "charge", created),
        amount: rng.random_range(1_000..=100_000),
        currency: rng.random(),
        customer: short_prefixed_id(rng, "cus_"),
        description: description(rng),
        status: if succeeded {
            ChargeStatus::Succeeded
        } else {
            ChargeStatus::Failed
        },
        paid: succeeded,
        refunded: event_type.contains("refunded"),
        payment_method: prefixed_id(rng, "pm_"),
        receipt_url: format!(
            "https://pay.stripe.com/receipts/{}",
            alphanumeric(rng, 32)
        ),
    }
}

fn invoice<R: Rng + ?Sized>(rng: &mut R, event_type: &str, created: i64) -> InvoiceObject {
    let paid = event_type.contains("paid");
    let amount_due = rng.random_range(1_000..=50_000);
    let amount_paid = if paid {
        rng.random_range(1_000..=50_000)
    } else {
        0
    };
    let status = if paid {
        InvoiceStatus::Paid
    } else if event_type.contains("failed") {
        InvoiceStatus::Open
    } else {
        InvoiceStatus::Draft
    };
    let token = alphanumeric(rng, 32);

    InvoiceObject {
        base: base(rng, "in_", "invoice", created),
        amount_due,
        amount_paid,
        currency: rng.random(),
        customer: short_prefixed_id(rng, "cus_"),
        status,
        number: format!("INV-{}", rng.random_range(1_000_u16..=9_999)),
        hosted_invoice_url: format!("https://invoice.stripe.com/i/{token}"),
        invoice_pdf: format!("https://pay.stripe.com/invoice/{token}/pdf"),
    }
}

fn customer<R: Rng + ?Sized>(rng: &mut R, created: i64) -> CustomerObject {
    let building: String = BuildingNumber(EN).fake_with_rng(rng);
    let street: String = StreetName(EN).fake_with_rng(rng);

    CustomerObject {
        base: base(rng, "cus_", "customer", created),
        email: SafeEmail(EN).fake_with_rng(rng),
        name: Name(EN).fake_with_rng(rng),
        phone: PhoneNumber(EN).fake_with_rng(rng),
        address: Address {
            line1: format!("{building} {street}"),
            city: CityName(EN).fake_with_rng(rng),
            state: StateAbbr(EN).fake_with_rng(rng),
            postal_code: ZipCode(EN).fake_with_rng(rng),
            country: CountryCode(EN).fake_with_rng(rng),
        },
        description: CatchPhrase(EN).fake_with_rng(rng),
        metadata: CustomerMetadata {
            user_id: uuid_v4(rng).to_string(),
        },
    }
}

fn subscription<R: Rng + ?Sized>(rng: &mut R, created: i64) -> SubscriptionObject {
    let item_product = product(rng);

    SubscriptionObject {
        base: base(rng, "sub_", "subscription", created),
        customer: short_prefixed_id(rng, "cus_"),
        status: rng.random(),
        current_period_start: created,
        current_period_end: created.saturating_add(SUBSCRIPTION_PERIOD_SECS),
        plan: Plan {
            id: short_prefixed_id(rng, "plan_"),
            amount: rng.random_range(999..=9_999),
            currency: rng.random(),
            interval: rng.random(),
            product: short_prefixed_id(rng, "prod_"),
        },
        items: SubscriptionItems {
            data: vec![SubscriptionItem {
                id: short_prefixed_id(rng, "si_"),
                price: Price {
                    id: short_prefixed_id(rng, "price_"),
                    product: item_product,
                    unit_amount: rng.random_range(999..=9_999),
                },
            }],
        },
    }
}

fn checkout_session<R: Rng + ?Sized>(rng: &mut R, created: i64) -> CheckoutSessionObject {
    let session = base(rng, "cs_", "checkout.session", created);
    let url = format!("https://checkout.stripe.com/c/pay/{}", session.id);
    let shop = domain_name(rng);

    CheckoutSessionObject {
        base: session,
        amount_total: rng.random_range(1_000..=100_000),
        currency: rng.random(),
        customer: short_prefixed_id(rng, "cus_"),
        customer_email: SafeEmail(EN).fake_with_rng(rng),
        payment_status: "paid",
        status: "complete",
        success_url: format!("https://{shop}/checkout/success"),
        url,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::random::SHORT_ID_SUFFIX_LEN;

    #[fixture]
    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(99)
    }

    #[rstest]
    #[case("payment_intent.succeeded", PaymentIntentStatus::Succeeded)]
    #[case("payment_intent.payment_failed", PaymentIntentStatus::Failed)]
    #[case("payment_intent.created", PaymentIntentStatus::Processing)]
    fn payment_intent_status_follows_event(
        mut rng: ChaCha8Rng,
        created_at: DateTime<Utc>,
        #[case] event_type: &str,
        #[case] expected: PaymentIntentStatus,
    ) {
        let EventObject::PaymentIntent(object) = build_event_object(&mut rng, event_type, created_at)
        else {
            panic!("expected payment intent payload");
        };

        assert_eq!(object.status, expected);
        assert!((1_000..=100_000).contains(&object.amount));
        assert!((1_000..=100_000).contains(&object.amount_received));
    }

    #[rstest]
    #[case("charge.succeeded", ChargeStatus::Succeeded, true, false)]
    #[case("charge.failed", ChargeStatus::Failed, false, false)]
    #[case("charge.refunded", ChargeStatus::Failed, false, true)]
    fn charge_flags_follow_event(
        mut rng: ChaCha8Rng,
        created_at: DateTime<Utc>,
        #[case] event_type: &str,
        #[case] status: ChargeStatus,
        #[case] paid: bool,
        #[case] refunded: bool,
    ) {
        let EventObject::Charge(object) = build_event_object(&mut rng, event_type, created_at)
        else {
            panic!("expected charge payload");
        };

        assert_eq!(object.status, status);
        assert_eq!(object.paid, paid);
        assert_eq!(object.refunded, refunded);
    }

    #[rstest]
    #[case("invoice.paid", InvoiceStatus::Paid)]
    #[case("invoice.payment_failed", InvoiceStatus::Open)]
    #[case("invoice.created", InvoiceStatus::Draft)]
    #[case("invoice.finalized", InvoiceStatus::Draft)]
    fn invoice_status_follows_event(
        mut rng: ChaCha8Rng,
        created_at: DateTime<Utc>,
        #[case] event_type: &str,
        #[case] expected: InvoiceStatus,
    ) {
        let EventObject::Invoice(object) = build_event_object(&mut rng, event_type, created_at)
        else {
            panic!("expected invoice payload");
        };

        assert_eq!(object.status, expected);
        if expected == InvoiceStatus::Paid {
            assert!((1_000..=50_000).contains(&object.amount_paid));
        } else {
            assert_eq!(object.amount_paid, 0);
        }
        let suffix: u32 = object
            .number
            .strip_prefix("INV-")
            .and_then(|digits| digits.parse().ok())
            .expect("numbered invoice");
        assert!((1_000..=9_999).contains(&suffix));
    }

    #[rstest]
    fn subscription_period_spans_a_year(mut rng: ChaCha8Rng, created_at: DateTime<Utc>) {
        let EventObject::Subscription(object) =
            build_event_object(&mut rng, "customer.subscription.created", created_at)
        else {
            panic!("expected subscription payload");
        };

        assert_eq!(object.current_period_start, created_at.timestamp());
        assert_eq!(
            object.current_period_end - object.current_period_start,
            SUBSCRIPTION_PERIOD_SECS
        );
        assert_eq!(object.items.data.len(), 1);
        assert!((999..=9_999).contains(&object.plan.amount));

        let item = object.items.data.first().expect("one item");
        for (id, prefix) in [
            (&object.customer, "cus_"),
            (&object.plan.id, "plan_"),
            (&object.plan.product, "prod_"),
            (&item.id, "si_"),
            (&item.price.id, "price_"),
        ] {
            assert!(id.starts_with(prefix), "{id}");
            assert_eq!(id.len(), prefix.len() + SHORT_ID_SUFFIX_LEN, "{id}");
        }
        assert!(PRODUCTS.contains(&item.price.product.as_str()));
    }

    #[rstest]
    fn checkout_session_is_complete(mut rng: ChaCha8Rng, created_at: DateTime<Utc>) {
        let EventObject::Checkout(object) =
            build_event_object(&mut rng, "checkout.session.completed", created_at)
        else {
            panic!("expected checkout payload");
        };

        assert_eq!(object.base.object, "checkout.session");
        assert_eq!(object.payment_status, "paid");
        assert_eq!(object.status, "complete");
        assert!(object.url.ends_with(&object.base.id));
    }

    #[rstest]
    fn unknown_events_use_their_first_segment(mut rng: ChaCha8Rng, created_at: DateTime<Utc>) {
        let object = build_event_object(&mut rng, "payout.paid", created_at);

        assert_eq!(object.family(), EventFamily::Other);
        assert_eq!(object.base().object, "payout");
        assert_eq!(object.base().created, created_at.timestamp());
    }

    #[test]
    fn currencies_serialise_lowercase() {
        let json = serde_json::to_string(&[Currency::Usd, Currency::Brl]).expect("serialises");
        assert_eq!(json, r#"["usd","brl"]"#);
    }
}
