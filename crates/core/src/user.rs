//! Account and profile field rules.

use validator::ValidateEmail;

use crate::error::CoreError;

pub const USER_NAME_MIN_LEN: usize = 3;
pub const COUNTRY_MIN_LEN: usize = 2;
pub const CITY_MIN_LEN: usize = 1;

/// Stored when a user has not written anything about themselves.
pub const DEFAULT_ABOUT: &str = "about is empty";

/// Trim, lowercase, and syntax-check an email address.
pub fn normalize_email(email: &str) -> Result<String, CoreError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(CoreError::Validation(
            "email must be a valid email address".into(),
        ));
    }
    Ok(email)
}

fn min_len(field: &str, value: &str, min: usize) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.chars().count() < min {
        let unit = if min == 1 { "character" } else { "characters" };
        return Err(CoreError::Validation(format!(
            "{field} must be at least {min} {unit}"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn validate_name(name: &str) -> Result<String, CoreError> {
    min_len("name", name, USER_NAME_MIN_LEN)
}

pub fn validate_country(country: &str) -> Result<String, CoreError> {
    min_len("country", country, COUNTRY_MIN_LEN)
}

pub fn validate_city(city: &str) -> Result<String, CoreError> {
    min_len("city", city, CITY_MIN_LEN)
}

/// Trimmed `about`, or [`DEFAULT_ABOUT`] when missing or blank.
pub fn normalize_about(about: Option<&str>) -> String {
    match about.map(str::trim) {
        Some(a) if !a.is_empty() => a.to_string(),
        _ => DEFAULT_ABOUT.to_string(),
    }
}

/// Validated profile edits. `None` leaves a field untouched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub about: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.country.is_none() && self.city.is_none() && self.about.is_none()
    }
}

/// Validate a partial profile update. Rejects an update that changes nothing.
pub fn validate_profile_changes(
    name: Option<&str>,
    country: Option<&str>,
    city: Option<&str>,
    about: Option<&str>,
) -> Result<ProfileChanges, CoreError> {
    let changes = ProfileChanges {
        name: name.map(validate_name).transpose()?,
        country: country.map(validate_country).transpose()?,
        city: city.map(validate_city).transpose()?,
        about: about.map(|a| a.trim().to_string()),
    };
    if changes.is_empty() {
        return Err(CoreError::Validation("No update fields provided".into()));
    }
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_normalization() {
        assert_eq!(normalize_email("  Foo@Bar.COM ").unwrap(), "foo@bar.com");
        assert!(normalize_email("foo@").is_err());
        assert!(normalize_email("").is_err());
    }

    #[test]
    fn field_minimums() {
        assert_eq!(validate_name(" Ada ").unwrap(), "Ada");
        assert!(validate_name("Al").is_err());
        assert!(validate_country("I").is_err());
        assert_eq!(validate_city("X").unwrap(), "X");
        assert!(validate_city("  ").is_err());
    }

    #[test]
    fn about_default() {
        assert_eq!(normalize_about(None), DEFAULT_ABOUT);
        assert_eq!(normalize_about(Some("  ")), DEFAULT_ABOUT);
        assert_eq!(normalize_about(Some("hi")), "hi");
    }

    #[test]
    fn profile_changes() {
        let c = validate_profile_changes(Some("Grace"), None, Some("Paris"), None).unwrap();
        assert_eq!(c.name.as_deref(), Some("Grace"));
        assert_eq!(c.city.as_deref(), Some("Paris"));
        assert!(c.country.is_none());

        assert!(matches!(
            validate_profile_changes(None, None, None, None),
            Err(CoreError::Validation(_))
        ));
        assert!(validate_profile_changes(Some("Al"), None, None, None).is_err());
    }
}
