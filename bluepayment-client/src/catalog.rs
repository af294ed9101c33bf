//! Lookup of gateway names from a locally stored catalog.
//!
//! The catalog is filled from `gatewayList` responses and read without any
//! network access. Lookups match on the `(service id, gateway id)` pair and
//! return the first record in catalog order.
//!
//! # Examples
//!
//! ```
//! use bluepayment_client::catalog::{GatewayRecord, MemoryCatalog, find_gateway_name};
//!
//! let catalog = MemoryCatalog::from_records(vec![
//!     GatewayRecord::new("100", 1500, "BLIK"),
//!     GatewayRecord::new("100", 1500, "BLIK (duplicate)"),
//! ]);
//!
//! assert_eq!(find_gateway_name(&catalog, "100", Some(1500)).as_deref(), Some("BLIK"));
//! assert_eq!(find_gateway_name(&catalog, "100", Some(0)), None);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    client::ResponseFields,
    config::{ConfigProvider, ConfigSource},
    error::{GatewayError, Result},
};

/// Key of the channel array in a `gatewayList` response.
pub const GATEWAY_LIST_FIELD: &str = "gatewayList";

/// One payment channel of a merchant service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayRecord {
    /// Service id the channel belongs to.
    pub gateway_service_id: String,
    /// Gateway id within the service.
    pub gateway_id: i64,
    /// Display name.
    pub gateway_name: String,
    /// Bank operating the channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    /// Channel group (`PBL`, `BLIK`, `CARD`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_type: Option<String>,
    /// Logo URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Availability reported by the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl GatewayRecord {
    /// Creates a record with only the identifying fields and name.
    #[must_use]
    pub fn new(service_id: impl Into<String>, gateway_id: i64, gateway_name: impl Into<String>) -> Self {
        Self {
            gateway_service_id: service_id.into(),
            gateway_id,
            gateway_name: gateway_name.into(),
            bank_name: None,
            group_type: None,
            icon_url: None,
            state: None,
        }
    }
}

/// Read access to stored gateway records.
pub trait GatewayCatalog {
    /// All records in catalog order.
    fn records(&self) -> &[GatewayRecord];
}

/// Catalog held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryCatalog {
    records: Vec<GatewayRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GatewayListEntry {
    #[serde(rename = "gatewayID")]
    gateway_id: i64,
    #[serde(rename = "gatewayName", alias = "name")]
    gateway_name: String,
    #[serde(default)]
    bank_name: Option<String>,
    #[serde(default)]
    group_type: Option<String>,
    #[serde(default, rename = "iconURL")]
    icon_url: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

impl MemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Creates a catalog from records, keeping their order.
    #[must_use]
    pub const fn from_records(records: Vec<GatewayRecord>) -> Self {
        Self { records }
    }

    /// Appends a record.
    pub fn push(&mut self, record: GatewayRecord) {
        self.records.push(record);
    }

    /// Replaces the records of `service_id` with the channels of a
    /// `gatewayList` response and returns how many were stored.
    ///
    /// Records of other services are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MalformedResponse`] if the response has no
    /// `gatewayList` array or an entry lacks `gatewayID` or a name. The
    /// catalog is unchanged in that case.
    pub fn ingest_gateway_list(&mut self, service_id: &str, response: &ResponseFields) -> Result<usize> {
        let list = response.get(GATEWAY_LIST_FIELD).ok_or_else(|| {
            GatewayError::MalformedResponse(format!("response has no {GATEWAY_LIST_FIELD}"))
        })?;
        let entries: Vec<GatewayListEntry> = serde_json::from_value(list.clone())
            .map_err(|e| GatewayError::MalformedResponse(format!("invalid {GATEWAY_LIST_FIELD}: {e}")))?;

        self.records.retain(|record| record.gateway_service_id != service_id);
        let count = entries.len();
        self.records.extend(entries.into_iter().map(|entry| GatewayRecord {
            gateway_service_id: service_id.to_owned(),
            gateway_id: entry.gateway_id,
            gateway_name: entry.gateway_name,
            bank_name: entry.bank_name,
            group_type: entry.group_type,
            icon_url: entry.icon_url,
            state: entry.state,
        }));

        debug!(service_id, count, "Stored gateway list");
        Ok(count)
    }
}

impl GatewayCatalog for MemoryCatalog {
    fn records(&self) -> &[GatewayRecord] {
        &self.records
    }
}

/// Returns the name of the first record matching both ids.
///
/// A missing or zero `gateway_id` yields `None` without reading the catalog.
#[must_use]
pub fn find_gateway_name<C>(catalog: &C, service_id: &str, gateway_id: Option<i64>) -> Option<String>
where
    C: GatewayCatalog + ?Sized,
{
    let gateway_id = gateway_id.filter(|id| *id != 0)?;
    catalog
        .records()
        .iter()
        .find(|record| record.gateway_service_id == service_id && record.gateway_id == gateway_id)
        .map(|record| record.gateway_name.clone())
}

/// Resolves the gateway name of a payment made in `currency`.
///
/// The service id comes from the currency-scoped configuration.
///
/// # Errors
///
/// Returns [`GatewayError::Configuration`] if a gateway id is given but no
/// service id is configured for `currency`.
pub fn gateway_name_for_payment<S, C>(
    config: &ConfigProvider<S>,
    catalog: &C,
    currency: &str,
    gateway_id: Option<i64>,
) -> Result<Option<String>>
where
    S: ConfigSource,
    C: GatewayCatalog + ?Sized,
{
    if gateway_id.is_none_or(|id| id == 0) {
        return Ok(None);
    }
    let service_id = config.service_id(currency)?;
    Ok(find_gateway_name(catalog, &service_id, gateway_id))
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::config::MemoryConfig;

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::from_records(vec![
            GatewayRecord::new("1", 10, "A"),
            GatewayRecord::new("1", 10, "B"),
            GatewayRecord::new("2", 10, "C"),
            GatewayRecord::new("1", 20, "D"),
        ])
    }

    struct UntouchableCatalog;

    impl GatewayCatalog for UntouchableCatalog {
        fn records(&self) -> &[GatewayRecord] {
            panic!("catalog must not be read");
        }
    }

    fn response(value: Value) -> ResponseFields {
        let Value::Object(map) = value else { panic!("fixture must be an object") };
        map
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(find_gateway_name(&catalog(), "1", Some(10)).as_deref(), Some("A"));
    }

    #[test]
    fn test_both_ids_must_match() {
        let catalog = catalog();
        assert_eq!(find_gateway_name(&catalog, "2", Some(10)).as_deref(), Some("C"));
        assert_eq!(find_gateway_name(&catalog, "1", Some(20)).as_deref(), Some("D"));
        assert_eq!(find_gateway_name(&catalog, "2", Some(20)), None);
        assert_eq!(find_gateway_name(&catalog, "3", Some(10)), None);
    }

    #[test]
    fn test_falsy_gateway_id_skips_catalog() {
        assert_eq!(find_gateway_name(&UntouchableCatalog, "1", None), None);
        assert_eq!(find_gateway_name(&UntouchableCatalog, "1", Some(0)), None);
    }

    #[test]
    fn test_gateway_name_for_payment() {
        let config = ConfigProvider::new(MemoryConfig::new().with("payment/bluepayment/pln/service_id", "2"));

        assert_eq!(gateway_name_for_payment(&config, &catalog(), "PLN", Some(10)).unwrap().as_deref(), Some("C"));
        assert_eq!(gateway_name_for_payment(&config, &UntouchableCatalog, "PLN", Some(0)).unwrap(), None);
        assert!(matches!(
            gateway_name_for_payment(&config, &catalog(), "EUR", Some(10)),
            Err(GatewayError::Configuration(_))
        ));
    }

    #[test]
    fn test_ingest_gateway_list() {
        let mut catalog = MemoryCatalog::from_records(vec![
            GatewayRecord::new("100", 1, "Old"),
            GatewayRecord::new("200", 1, "Other service"),
        ]);
        let response = response(json!({
            "result": "OK",
            "gatewayList": [
                {
                    "gatewayID": 509,
                    "name": "BLIK",
                    "groupType": "BLIK",
                    "bankName": "NONE",
                    "iconURL": "https://example.com/blik.png",
                    "state": "OK"
                },
                { "gatewayID": 1500, "name": "PBC płatność testowa" }
            ]
        }));

        assert_eq!(catalog.ingest_gateway_list("100", &response).unwrap(), 2);

        assert_eq!(find_gateway_name(&catalog, "100", Some(1)), None);
        assert_eq!(find_gateway_name(&catalog, "200", Some(1)).as_deref(), Some("Other service"));
        assert_eq!(find_gateway_name(&catalog, "100", Some(1500)).as_deref(), Some("PBC płatność testowa"));

        let blik = catalog.records().iter().find(|r| r.gateway_id == 509).unwrap();
        assert_eq!(blik.group_type.as_deref(), Some("BLIK"));
        assert_eq!(blik.icon_url.as_deref(), Some("https://example.com/blik.png"));
        assert_eq!(blik.state.as_deref(), Some("OK"));
    }

    #[test]
    fn test_ingest_rejects_malformed_list() {
        let mut catalog = catalog();
        let before = catalog.clone();

        let missing = response(json!({ "result": "OK" }));
        assert!(matches!(catalog.ingest_gateway_list("1", &missing), Err(GatewayError::MalformedResponse(_))));

        let bad_entry = response(json!({ "gatewayList": [{ "name": "no id" }] }));
        assert!(catalog.ingest_gateway_list("1", &bad_entry).is_err());

        assert_eq!(catalog, before);
    }

    #[test]
    fn test_catalog_json_shape() {
        let json = json!([{ "gateway_service_id": "1", "gateway_id": 10, "gateway_name": "A" }]);
        let catalog: MemoryCatalog = serde_json::from_value(json).unwrap();
        assert_eq!(catalog.records(), &[GatewayRecord::new("1", 10, "A")]);
    }
}
