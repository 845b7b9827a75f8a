//! Body marshalling for the client template

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClientResult;

/// JSON marshaller, the only representation the API speaks
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMarshaller;

impl JsonMarshaller {
    /// Mime type sent as `Content-Type` and `Accept`
    pub fn mime(&self) -> &'static str {
        "application/json"
    }

    pub fn encode<T: Serialize>(&self, resource: &T) -> ClientResult<Vec<u8>> {
        Ok(serde_json::to_vec(resource)?)
    }

    pub fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> ClientResult<T> {
        Ok(serde_json::from_slice(body)?)
    }
}
