use serde::Deserialize;

use crate::app::{AppError, Result};
use crate::domain::{CharterNumber, Website};

/// Body of `GetCreditUnionDetails/{charter}`. Only the fields we read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditUnionDetails {
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub credit_union_website: Option<String>,
}

pub fn decode_details(charter: CharterNumber, body: &[u8]) -> Result<Website> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::EmptyResponse(charter.get()));
    }

    let details: CreditUnionDetails = serde_json::from_slice(body)
        .map_err(|e| AppError::MalformedResponse(e.to_string()))?;

    if details.is_error {
        let message = details
            .error_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "unknown API error".to_string());
        return Err(AppError::Api(message));
    }

    Ok(Website::from_raw(details.credit_union_website.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charter() -> CharterNumber {
        CharterNumber::new(5536).unwrap()
    }

    #[test]
    fn test_decode_website() {
        let body = br#"{"isError":false,"creditUnionWebsite":"HTTP://Example.ORG"}"#;
        let website = decode_details(charter(), body).unwrap();
        assert_eq!(website, Website::Known("http://example.org".into()));
    }

    #[test]
    fn test_decode_null_website_is_unknown() {
        let body = br#"{"isError":false,"creditUnionWebsite":null}"#;
        assert_eq!(decode_details(charter(), body).unwrap(), Website::Unknown);
    }

    #[test]
    fn test_decode_absent_website_is_unknown() {
        let body = br#"{"isError":false,"creditUnionName":"Some CU"}"#;
        assert_eq!(decode_details(charter(), body).unwrap(), Website::Unknown);
    }

    #[test]
    fn test_decode_api_error_surfaces_message() {
        let body = br#"{"isError":true,"errorMessage":"Charter not found"}"#;
        match decode_details(charter(), body) {
            Err(AppError::Api(msg)) => assert_eq!(msg, "Charter not found"),
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_api_error_without_message() {
        let body = br#"{"isError":true}"#;
        match decode_details(charter(), body) {
            Err(AppError::Api(msg)) => assert_eq!(msg, "unknown API error"),
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_empty_body() {
        assert!(matches!(
            decode_details(charter(), b""),
            Err(AppError::EmptyResponse(5536))
        ));
        assert!(matches!(
            decode_details(charter(), b" \n"),
            Err(AppError::EmptyResponse(_))
        ));
    }

    #[test]
    fn test_decode_malformed_body() {
        assert!(matches!(
            decode_details(charter(), b"<html>oops</html>"),
            Err(AppError::MalformedResponse(_))
        ));
    }
}
