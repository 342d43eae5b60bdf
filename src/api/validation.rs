use super::ApiError;
use crate::domain;

pub fn validate_id(id: i32, what: &str) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            what, id
        )));
    }
    Ok(id)
}

/// Falls back to `default` when absent; rejects 0 and values above `max`.
pub fn validate_limit(limit: Option<u64>, default: u64, max: u64) -> Result<u64, ApiError> {
    let limit = limit.unwrap_or(default);

    if !(1..=max).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {}. Limit must be between 1 and {}",
            limit, max
        )));
    }
    Ok(limit)
}

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    domain::validate_username(username).map_err(ApiError::validation)?;
    Ok(username)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    domain::validate_email(email).map_err(ApiError::validation)?;
    Ok(email)
}

pub fn validate_required<'a>(value: &'a str, field: &str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{} is required", field)));
    }
    Ok(trimmed)
}
