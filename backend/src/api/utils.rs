//! API utility functions
//!
//! Success envelope and input validation shared by the handlers.

use crate::error::AppError;
use axum::response::Json;
use chrono::Utc;
use serde::Serialize;

/// Maximum industry name length in characters
pub const MAX_INDUSTRY_LENGTH: usize = 200;

/// Maximum number of firms in one crawl request
pub const MAX_FIRMS: usize = 25;

/// Success envelope: `{success: true, data, timestamp}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always `true`; failures go through [`AppError`]
    pub success: bool,
    /// Response payload
    pub data: T,
    /// When the response was produced (RFC 3339)
    pub timestamp: String,
}

/// Wrap `data` in the success envelope
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Validate an industry name
///
/// # Arguments
/// * `industry` - Industry as sent by the client
///
/// # Returns
/// * `Ok(String)` - Trimmed industry name
/// * `Err(AppError)` - Industry is missing, empty or too long
pub fn validate_industry(industry: Option<&str>) -> Result<String, AppError> {
    let trimmed = industry.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(
            "Industry is required for workflow".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_INDUSTRY_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Industry exceeds maximum length of {} characters",
            MAX_INDUSTRY_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate a firm list for a crawl request
///
/// # Arguments
/// * `firms` - Firm names as sent by the client
///
/// # Returns
/// * `Ok(Vec<String>)` - Trimmed, non-empty firm names
/// * `Err(AppError)` - List is missing, empty or too long
pub fn validate_firms(firms: Option<Vec<String>>) -> Result<Vec<String>, AppError> {
    let firms: Vec<String> = firms
        .unwrap_or_default()
        .into_iter()
        .map(|firm| firm.trim().to_string())
        .filter(|firm| !firm.is_empty())
        .collect();
    if firms.is_empty() {
        return Err(AppError::BadRequest(
            "firmNames array is required".to_string(),
        ));
    }
    if firms.len() > MAX_FIRMS {
        return Err(AppError::BadRequest(format!(
            "At most {} firms can be crawled at once",
            MAX_FIRMS
        )));
    }
    Ok(firms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_industry() {
        assert_eq!(validate_industry(Some("  FinTech ")).unwrap(), "FinTech");
        assert!(validate_industry(None).is_err());
        assert!(validate_industry(Some("   ")).is_err());
        assert!(validate_industry(Some(&"x".repeat(MAX_INDUSTRY_LENGTH + 1))).is_err());
    }

    #[test]
    fn test_validate_firms() {
        let firms = validate_firms(Some(vec![" Bain & Company ".to_string(), "".to_string()])).unwrap();
        assert_eq!(firms, vec!["Bain & Company".to_string()]);
        assert!(validate_firms(None).is_err());
        assert!(validate_firms(Some(vec![])).is_err());
        assert!(validate_firms(Some(vec!["x".to_string(); MAX_FIRMS + 1])).is_err());
    }

    #[test]
    fn test_success_envelope() {
        let Json(response) = ok(serde_json::json!({"isInitialized": false}));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["isInitialized"], false);
        assert!(json["timestamp"].is_string());
    }
}
