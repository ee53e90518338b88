//! Storage drivers and their configuration templates.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    api::{decode, Response},
    client::{Client, RequestOptions},
};

/// A configuration field of a driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverItem {
    /// Key in the storage's `addition`.
    pub name: String,
    /// `string`, `number`, `bool`, `select` or `text`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Default value, as a string.
    pub default: String,
    /// Comma separated choices, for `select`.
    pub options: String,
    /// Whether the field must be set.
    pub required: bool,
    /// Help text.
    pub help: String,
}

/// Configuration template of a driver.
///
/// The server's schema has changed over time, so every field defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverInfo {
    /// Fields shared by all drivers.
    #[serde(deserialize_with = "crate::serde::null_as_default")]
    pub common: Vec<DriverItem>,
    /// Driver specific fields.
    #[serde(deserialize_with = "crate::serde::null_as_default")]
    pub additional: Vec<DriverItem>,
    /// Driver capabilities.
    pub config: Value,
}

/// Driver endpoints.
#[derive(Debug, Clone, Copy)]
pub struct DriverApi<'a> {
    client: &'a Client,
}

impl<'a> DriverApi<'a> {
    /// Borrow a client.
    #[must_use]
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Every driver, by name.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn list(&self) -> crate::Result<Response<BTreeMap<String, DriverInfo>>> {
        decode(
            self.client
                .get("/api/admin/driver/list", RequestOptions::new())
                .await?,
        )
    }

    /// Names of every driver.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    pub async fn names(&self) -> crate::Result<Vec<String>> {
        let res: Response<Option<Vec<String>>> = decode(
            self.client
                .get("/api/admin/driver/names", RequestOptions::new())
                .await?,
        )?;

        Ok(res.data.unwrap_or_default())
    }

    /// Template of a single driver.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not an admin
    /// - no such driver
    pub async fn info(&self, driver: &str) -> crate::Result<Response<DriverInfo>> {
        decode(
            self.client
                .get(
                    "/api/admin/driver/info",
                    RequestOptions::new().query("driver", driver),
                )
                .await?,
        )
    }
}
