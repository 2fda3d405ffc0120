/// Declarative form validation
///
/// Each form has a rule set producing per-field inline errors; a non-empty
/// result blocks submission. Failures are cosmetic only and never propagate
/// further than the screen that produced them.

/// One inline error, attached to a named field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Syntactic email check: one '@', non-empty local part, dotted domain
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !host.starts_with('.') && tld.len() >= 2,
        None => false,
    }
}

pub fn validate_sign_in(email: &str, password: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Please enter a valid email address"));
    }
    if password.len() < 6 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }
    errors
}

pub fn validate_sign_up(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if name.trim().chars().count() < 2 {
        errors.push(FieldError::new("name", "Name must be at least 2 characters"));
    }
    if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Please enter a valid email address"));
    }
    if password.len() < 6 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    } else {
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            errors.push(FieldError::new(
                "password",
                "Password must contain at least one uppercase letter",
            ));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push(FieldError::new(
                "password",
                "Password must contain at least one number",
            ));
        }
    }
    if password != confirm_password {
        errors.push(FieldError::new("confirmPassword", "Passwords don't match"));
    }
    errors
}

pub fn validate_forgot_password(email: &str) -> Vec<FieldError> {
    if is_valid_email(email) {
        Vec::new()
    } else {
        vec![FieldError::new("email", "Please enter a valid email address")]
    }
}

pub fn validate_reset_password(password: &str, confirm_password: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if password.len() < 6 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }
    if password != confirm_password {
        errors.push(FieldError::new("confirmPassword", "Passwords don't match"));
    }
    errors
}

/// First error for one field, for inline display next to it
pub fn first_for<'a>(errors: &'a [FieldError], field: &str) -> Option<&'a FieldError> {
    errors.iter().find(|e| e.field == field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("alex.taylor@example.com"));
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("a@.com"));
    }

    #[test]
    fn sign_in_rules() {
        assert!(validate_sign_in("alex@example.com", "secret1").is_empty());
        let errors = validate_sign_in("nope", "short");
        assert_eq!(errors.len(), 2);
        assert!(first_for(&errors, "email").is_some());
        assert!(first_for(&errors, "password").is_some());
    }

    #[test]
    fn sign_up_requires_uppercase_and_digit() {
        let errors = validate_sign_up("Alex", "alex@example.com", "alllower", "alllower");
        let messages: Vec<_> = errors.iter().map(|e| e.message).collect();
        assert!(messages.contains(&"Password must contain at least one uppercase letter"));
        assert!(messages.contains(&"Password must contain at least one number"));

        assert!(validate_sign_up("Alex", "alex@example.com", "Secret1", "Secret1").is_empty());
    }

    #[test]
    fn sign_up_mismatched_confirmation() {
        let errors = validate_sign_up("Alex", "alex@example.com", "Secret1", "Secret2");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "confirmPassword");
        assert_eq!(errors[0].message, "Passwords don't match");
    }

    #[test]
    fn reset_rules() {
        assert!(validate_reset_password("Secret1", "Secret1").is_empty());
        assert_eq!(validate_reset_password("abc", "abc").len(), 1);
        assert_eq!(validate_reset_password("abcdef", "abcdeg").len(), 1);
    }
}
