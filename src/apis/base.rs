use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::common::error::{MergerError, Result};
use crate::common::types::SupplierSource;
use crate::domain::{RawHotelRecord, SupplierSchema};

/// Supplier backed by a JSON-array HTTP endpoint
pub struct HttpSupplier {
    client: reqwest::Client,
    name: String,
    schema: SupplierSchema,
    endpoint: String,
}

impl HttpSupplier {
    pub fn new(name: &str, schema: SupplierSchema, endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hotel_merger/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            name: name.to_string(),
            schema,
            endpoint: endpoint.to_string(),
        })
    }
}

/// Split a response body into one raw record per array element. Anything
/// but a top-level JSON array is a malformed envelope.
pub fn decode_envelope(supplier: &str, schema: SupplierSchema, body: &[u8]) -> Result<Vec<RawHotelRecord>> {
    let value: Value = serde_json::from_slice(body).map_err(|e| MergerError::MalformedEnvelope {
        supplier: supplier.to_string(),
        message: format!("body is not valid JSON: {e}"),
    })?;

    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .map(|payload| RawHotelRecord::new(supplier, schema, payload))
            .collect()),
        other => Err(MergerError::MalformedEnvelope {
            supplier: supplier.to_string(),
            message: format!("expected a JSON array, got {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait::async_trait]
impl SupplierSource for HttpSupplier {
    fn supplier_name(&self) -> &str {
        &self.name
    }

    fn schema(&self) -> SupplierSchema {
        self.schema
    }

    #[instrument(skip(self), fields(supplier = %self.name, endpoint = %self.endpoint))]
    async fn fetch(&self) -> Result<Vec<RawHotelRecord>> {
        debug!("Requesting supplier endpoint");
        let response = self.client.get(&self.endpoint).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MergerError::supplier(&self.name, format!("HTTP status {}", status.as_u16())));
        }

        let body = response.bytes().await?;
        let records = decode_envelope(&self.name, self.schema, &body)?;
        info!("Fetched {} record(s) from {}", records.len(), self.name);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_envelope_array() {
        let body = br#"[{"id": "iJhz", "destination": 5432}, "not an object"]"#;
        let records = decode_envelope("patagonia", SupplierSchema::Patagonia, body).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.supplier == "patagonia" && r.schema == SupplierSchema::Patagonia));
    }

    #[test]
    fn test_decode_envelope_rejects_non_array() {
        for body in [&br#"{"hotels": []}"#[..], b"null", b"<html>"] {
            let err = decode_envelope("acme", SupplierSchema::Acme, body).unwrap_err();
            assert!(matches!(err, MergerError::MalformedEnvelope { .. }));
        }
    }

    #[test]
    fn test_decode_empty_array() {
        assert!(decode_envelope("acme", SupplierSchema::Acme, b"[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_unreachable_endpoint_errors() {
        // Port 9 on localhost: nothing listens there in test environments
        let supplier = HttpSupplier::new(
            "acme",
            SupplierSchema::Acme,
            "http://127.0.0.1:9/suppliers/acme",
            Duration::from_secs(2),
        )
        .unwrap();
        let err = supplier.fetch().await.unwrap_err();
        assert!(matches!(err, MergerError::Http(_)));
    }
}
