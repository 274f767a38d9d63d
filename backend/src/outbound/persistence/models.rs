//! Internal Diesel row structs for the `webhooks` table.
//!
//! Rows never leave the persistence layer; conversions to and from the
//! domain types live here.

use std::collections::BTreeMap;

use chrono::{DateTime, SubsecRound, Utc};
use diesel::prelude::*;
use serde_json::{Map, Value};

use crate::domain::{NewWebhook, Webhook, WebhookId};

use super::schema::webhooks;

/// Row read from the `webhooks` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = webhooks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WebhookRow {
    pub id: i64,
    pub method: String,
    pub pathname: String,
    pub ip: String,
    pub status_code: i32,
    pub content_type: Option<String>,
    pub content_length: Option<i64>,
    pub query_params: Option<Value>,
    pub headers: Option<Value>,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable row; `id` is assigned by the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = webhooks)]
pub(crate) struct NewWebhookRow<'a> {
    pub method: &'a str,
    pub pathname: &'a str,
    pub ip: &'a str,
    pub status_code: i32,
    pub content_type: Option<&'a str>,
    pub content_length: Option<i64>,
    pub query_params: Option<Value>,
    pub headers: Option<Value>,
    pub body: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewWebhookRow<'a> {
    /// Borrow a domain record as an insertable row. `created_at` is cut to
    /// whole milliseconds so stored rows compare exactly with cursors.
    pub(crate) fn try_from_domain(webhook: &'a NewWebhook) -> Result<Self, String> {
        let content_length = webhook
            .content_length
            .map(i64::try_from)
            .transpose()
            .map_err(|_| "content length exceeds the column range".to_owned())?;

        Ok(Self {
            method: &webhook.method,
            pathname: &webhook.pathname,
            ip: &webhook.ip,
            status_code: i32::from(webhook.status_code),
            content_type: webhook.content_type.as_deref(),
            content_length,
            query_params: webhook.query_params.as_ref().map(to_json_object),
            headers: webhook.headers.as_ref().map(to_json_object),
            body: webhook.body.as_deref(),
            created_at: webhook.created_at.trunc_subsecs(3),
        })
    }
}

impl TryFrom<WebhookRow> for Webhook {
    type Error = String;

    fn try_from(row: WebhookRow) -> Result<Self, Self::Error> {
        let WebhookRow {
            id,
            method,
            pathname,
            ip,
            status_code,
            content_type,
            content_length,
            query_params,
            headers,
            body,
            created_at,
        } = row;

        Ok(Self {
            id: WebhookId::new(id).map_err(|err| err.to_string())?,
            method,
            pathname,
            ip,
            status_code: u16::try_from(status_code)
                .map_err(|_| format!("webhook {id} has status code {status_code}"))?,
            content_type,
            content_length: content_length
                .map(u64::try_from)
                .transpose()
                .map_err(|_| format!("webhook {id} has a negative content length"))?,
            query_params: query_params
                .map(from_json_object)
                .transpose()
                .map_err(|err| format!("webhook {id} query params: {err}"))?,
            headers: headers
                .map(from_json_object)
                .transpose()
                .map_err(|err| format!("webhook {id} headers: {err}"))?,
            body,
            created_at,
        })
    }
}

fn to_json_object(map: &BTreeMap<String, String>) -> Value {
    Value::Object(
        map.iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect::<Map<String, Value>>(),
    )
}

fn from_json_object(value: Value) -> Result<BTreeMap<String, String>, serde_json::Error> {
    serde_json::from_value(value)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;

    #[fixture]
    fn row() -> WebhookRow {
        WebhookRow {
            id: 5,
            method: "POST".to_owned(),
            pathname: "/hook".to_owned(),
            ip: "10.1.1.1".to_owned(),
            status_code: 200,
            content_type: None,
            content_length: Some(4),
            query_params: Some(json!({ "a": "1" })),
            headers: Some(json!({ "x-test": "yes" })),
            body: Some("ping".to_owned()),
            created_at: Utc
                .timestamp_millis_opt(1_000)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[rstest]
    fn row_converts_to_domain(row: WebhookRow) {
        let webhook = Webhook::try_from(row).expect("valid row");

        assert_eq!(webhook.id.get(), 5);
        assert_eq!(webhook.content_length, Some(4));
        assert_eq!(
            webhook
                .query_params
                .as_ref()
                .and_then(|params| params.get("a"))
                .map(String::as_str),
            Some("1")
        );
    }

    #[rstest]
    fn non_string_json_values_are_rejected(mut row: WebhookRow) {
        row.headers = Some(json!({ "x-test": 1 }));
        let err = Webhook::try_from(row).expect_err("invalid headers");
        assert!(err.contains("headers"));
    }

    #[rstest]
    fn negative_lengths_are_rejected(mut row: WebhookRow) {
        row.content_length = Some(-1);
        assert!(Webhook::try_from(row).is_err());
    }

    #[rstest]
    fn domain_record_borrows_into_row(row: WebhookRow) {
        let webhook = Webhook::try_from(row).expect("valid row");
        let new = NewWebhook {
            method: webhook.method,
            pathname: webhook.pathname,
            ip: webhook.ip,
            status_code: webhook.status_code,
            content_type: webhook.content_type,
            content_length: webhook.content_length,
            query_params: webhook.query_params,
            headers: webhook.headers,
            body: webhook.body,
            created_at: webhook.created_at,
        };

        let insertable = NewWebhookRow::try_from_domain(&new).expect("fits");

        assert_eq!(insertable.status_code, 200);
        assert_eq!(insertable.headers, Some(json!({ "x-test": "yes" })));
        assert_eq!(insertable.body, Some("ping"));
    }

    #[rstest]
    fn insertable_timestamp_is_cut_to_milliseconds(row: WebhookRow) {
        let mut webhook = Webhook::try_from(row).expect("valid row");
        webhook.created_at = Utc
            .timestamp_opt(1_700_000_000, 123_456_789)
            .single()
            .expect("valid timestamp");
        let new = NewWebhook {
            method: webhook.method,
            pathname: webhook.pathname,
            ip: webhook.ip,
            status_code: webhook.status_code,
            content_type: webhook.content_type,
            content_length: webhook.content_length,
            query_params: webhook.query_params,
            headers: webhook.headers,
            body: webhook.body,
            created_at: webhook.created_at,
        };

        let insertable = NewWebhookRow::try_from_domain(&new).expect("fits");

        assert_eq!(insertable.created_at.timestamp_subsec_nanos(), 123_000_000);
        assert_eq!(insertable.created_at.timestamp(), 1_700_000_000);
    }
}
