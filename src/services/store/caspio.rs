use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{normalize_phone, RecordStore};
use crate::config::AppConfig;
use crate::models::fields::{parse_date, string_value};
use crate::models::{CustomerRecord, LeadRecord, LeadSource, LeadUpdate, Memo, NewMemo};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Record store backed by the Caspio REST API. Authenticates with OAuth2
/// client credentials; the access token is cached and refreshed five
/// minutes before it actually expires.
pub struct CaspioStore {
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    customers_table: String,
    memos_table: String,
    leads_table: String,
    client: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl CaspioStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            base_url: config.caspio_base_url.trim_end_matches('/').to_string(),
            token_url: config.caspio_token_url.clone(),
            client_id: config.caspio_client_id.clone(),
            client_secret: config.caspio_client_secret.clone(),
            customers_table: config.customers_table.clone(),
            memos_table: config.memos_table.clone(),
            leads_table: config.leads_table.clone(),
            client: reqwest::Client::new(),
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> anyhow::Result<String> {
        if let Some(cached) = self.token.lock().unwrap().as_ref() {
            if Utc::now() < cached.expires_at {
                return Ok(cached.access_token.clone());
            }
        }

        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .context("failed to reach the table API token endpoint")?
            .error_for_status()
            .context("table API rejected the token request")?;

        let body: Value = response
            .json()
            .await
            .context("malformed token response")?;
        let access_token = body["access_token"]
            .as_str()
            .context("token response missing access_token")?
            .to_string();
        let expires_in = body["expires_in"].as_i64().unwrap_or(3600);

        let expires_at = Utc::now() + chrono::Duration::seconds((expires_in - 300).max(60));
        *self.token.lock().unwrap() = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at,
        });

        Ok(access_token)
    }

    fn records_url(&self, table: &str) -> String {
        format!("{}/rest/v2/tables/{table}/records", self.base_url)
    }

    async fn query(&self, table: &str, where_clause: &str) -> anyhow::Result<Vec<Value>> {
        let token = self.access_token().await?;

        let response = self
            .client
            .get(self.records_url(table))
            .bearer_auth(&token)
            .query(&[("q.where", where_clause)])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("failed to query {table}"))?
            .error_for_status()
            .with_context(|| format!("query against {table} rejected"))?;

        let body: Value = response
            .json()
            .await
            .with_context(|| format!("malformed response from {table}"))?;

        Ok(body["Result"].as_array().cloned().unwrap_or_default())
    }

    async fn insert(&self, table: &str, record: &Value) -> anyhow::Result<Value> {
        let token = self.access_token().await?;

        let response = self
            .client
            .post(self.records_url(table))
            .bearer_auth(&token)
            .json(record)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("failed to insert into {table}"))?
            .error_for_status()
            .with_context(|| format!("insert into {table} rejected"))?;

        response
            .json()
            .await
            .with_context(|| format!("malformed insert response from {table}"))
    }

    async fn update(&self, table: &str, where_clause: &str, record: &Value) -> anyhow::Result<()> {
        let token = self.access_token().await?;

        self.client
            .put(self.records_url(table))
            .bearer_auth(&token)
            .query(&[("q.where", where_clause)])
            .json(record)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .with_context(|| format!("failed to update {table}"))?
            .error_for_status()
            .with_context(|| format!("update against {table} rejected"))?;

        Ok(())
    }

    async fn first_customer(&self, where_clause: &str) -> anyhow::Result<Option<CustomerRecord>> {
        let rows = self.query(&self.customers_table, where_clause).await?;
        Ok(rows.first().map(CustomerRecord::from_row))
    }
}

/// Values interpolated into `q.where` filters; single quotes double up.
fn quoted(value: &str) -> String {
    value.replace('\'', "''")
}

fn memo_from_row(row: &Value) -> Memo {
    Memo {
        id: string_value(row.get("id").or_else(|| row.get("PK_ID"))),
        memo_type: string_value(row.get("memo_type")),
        details: string_value(row.get("details")),
        customer_id: string_value(row.get("vac_id")),
        phone_number: string_value(row.get("phone_number")),
        created_date: parse_date(&string_value(row.get("created_date")))
            .unwrap_or_else(|| Utc::now().date_naive()),
        created_by: string_value(row.get("created_by")),
    }
}

fn lead_source_name(source: LeadSource) -> &'static str {
    match source {
        LeadSource::GoogleAds => "google_ads",
        LeadSource::LandingPage => "landing_page",
    }
}

#[async_trait]
impl RecordStore for CaspioStore {
    async fn find_by_phone(&self, digits: &str) -> anyhow::Result<Option<CustomerRecord>> {
        let digits = quoted(&normalize_phone(digits));
        let where_clause = format!("phn1='{digits}' OR phn2='{digits}'");
        self.first_customer(&where_clause).await
    }

    async fn find_by_certificate(&self, code: &str) -> anyhow::Result<Option<CustomerRecord>> {
        let code = quoted(&code.trim().to_uppercase());
        let where_clause = format!("pkg_code2='{code}'");
        self.first_customer(&where_clause).await
    }

    async fn create_memo(&self, memo: &NewMemo) -> anyhow::Result<String> {
        let record = serde_json::json!({
            "memo_type": memo.memo_type,
            "details": memo.details,
            "vac_id": memo.customer_id,
            "phone_number": memo.phone_number.clone().unwrap_or_default(),
            "created_date": Utc::now().date_naive().to_string(),
            "created_by": "AI Agent",
        });

        let result = self.insert(&self.memos_table, &record).await?;
        let id = string_value(result.get("id"));
        if id.is_empty() {
            Ok(uuid::Uuid::new_v4().to_string())
        } else {
            Ok(id)
        }
    }

    async fn memos_for_customer(&self, customer_id: &str) -> anyhow::Result<Vec<Memo>> {
        let where_clause = format!("vac_id='{}'", quoted(customer_id));
        let rows = self.query(&self.memos_table, &where_clause).await?;
        Ok(rows.iter().map(memo_from_row).collect())
    }

    async fn create_lead(&self, lead: &LeadRecord) -> anyhow::Result<()> {
        let record = serde_json::json!({
            "LeadID": lead.lead_id,
            "CustomerName": lead.customer_name,
            "Phone": lead.phone,
            "Email": lead.email,
            "Destination": lead.destination,
            "TravelDates": lead.travel_dates,
            "TravelersCount": lead.travelers_count,
            "BudgetRange": lead.budget_range,
            "LeadSource": lead_source_name(lead.source),
            "LeadStatus": lead.status,
            "Notes": lead.notes,
            "ConsentGiven": lead.consent_given,
            "ConsentTimestamp": lead.consent_timestamp.to_rfc3339(),
            "CreatedDate": Utc::now().to_rfc3339(),
        });

        self.insert(&self.leads_table, &record).await?;
        Ok(())
    }

    async fn update_lead(&self, lead_id: &str, update: &LeadUpdate) -> anyhow::Result<()> {
        let mut record = serde_json::Map::new();
        if let Some(status) = &update.status {
            record.insert("LeadStatus".to_string(), Value::String(status.clone()));
        }
        if let Some(status) = &update.payment_link_status {
            record.insert(
                "PaymentLinkStatus".to_string(),
                Value::String(status.clone()),
            );
            record.insert(
                "PaymentLinkSentDate".to_string(),
                Value::String(Utc::now().to_rfc3339()),
            );
        }
        if let Some(url) = &update.payment_link_url {
            record.insert("PaymentLinkURL".to_string(), Value::String(url.clone()));
        }
        if let Some(sid) = &update.sms_message_sid {
            record.insert("SMSMessageSID".to_string(), Value::String(sid.clone()));
        }

        let where_clause = format!("LeadID='{}'", quoted(lead_id));
        self.update(&self.leads_table, &where_clause, &Value::Object(record))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_doubles_single_quotes() {
        assert_eq!(quoted("O'Brien"), "O''Brien");
        assert_eq!(quoted("plain"), "plain");
    }

    #[test]
    fn test_memo_from_row_reads_store_fields() {
        let row = serde_json::json!({
            "id": "42",
            "memo_type": "needs tr assignment",
            "details": "Travel date: 2025-06-15, Days remaining: 30",
            "vac_id": "123456",
            "created_date": "2025-05-16",
            "created_by": "AI Agent",
        });

        let memo = memo_from_row(&row);
        assert_eq!(memo.id, "42");
        assert_eq!(memo.customer_id, "123456");
        assert_eq!(memo.memo_type, "needs tr assignment");
    }
}
