//! Messages exchanged between the relay and the converter service.
//!
//! Each message is one bare JSON object; there is no length prefix or
//! delimiter on the wire.

use serde::{Deserialize, Serialize};

/// Body of `POST /convert` and of the request sent downstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConversionRequest {
    pub text: String,
}

/// Borrowed form of [`ConversionRequest`] used when encoding.
#[derive(Debug, Serialize)]
pub(crate) struct OutboundRequest<'a> {
    pub text: &'a str,
}

/// Successful reply produced by the converter service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConversionResponse {
    pub phonetic: String,
}

/// Error body shared by the HTTP front end and the converter service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbound_encoding_matches_inbound_shape() {
        let encoded = serde_json::to_vec(&OutboundRequest { text: "hat \"trick\"" }).unwrap();
        assert_eq!(encoded, br#"{"text":"hat \"trick\""}"#);

        let decoded: ConversionRequest = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(decoded.text, "hat \"trick\"");
    }

    #[test]
    fn text_must_be_a_string() {
        assert!(serde_json::from_str::<ConversionRequest>(r#"{"text": 5}"#).is_err());
        assert!(serde_json::from_str::<ConversionRequest>(r#"{"txt": "a"}"#).is_err());
    }
}
