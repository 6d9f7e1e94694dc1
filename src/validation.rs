//! Input validation for user-entered values.

/// Maximum characters accepted for a message body.
const MAX_MESSAGE_LEN: usize = 2000;

/// Validates a service base URL.
pub fn validate_base_url(url: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err("Base URL cannot be empty".to_string());
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err("Base URL must start with http:// or https://".to_string());
    }

    let rest = url
        .trim_start_matches("http://")
        .trim_start_matches("https://");
    if rest.is_empty() || rest.starts_with('/') {
        return Err("Base URL is missing a host".to_string());
    }

    if url.contains(|c: char| c.is_whitespace()) {
        return Err("Base URL contains whitespace".to_string());
    }

    Ok(())
}

/// Validates a channel id argument (a positive integer).
pub fn validate_channel_id(raw: &str) -> Result<i64, String> {
    if raw.is_empty() {
        return Err("Channel id cannot be empty".to_string());
    }

    let id = raw
        .parse::<i64>()
        .map_err(|_| format!("Invalid channel id: {}", raw))?;

    if id <= 0 {
        return Err("Channel id must be greater than 0".to_string());
    }

    Ok(id)
}

/// Validates a message body before sending.
pub fn validate_message(msg: &str) -> Result<(), String> {
    if msg.trim().is_empty() {
        return Err("Message cannot be empty".to_string());
    }

    if msg.chars().count() > MAX_MESSAGE_LEN {
        return Err(format!(
            "Message too long (max {} characters)",
            MAX_MESSAGE_LEN
        ));
    }

    Ok(())
}

/// Sanitizes a message by trimming and clamping its length.
pub fn sanitize_message(msg: &str) -> String {
    msg.trim()
        .chars()
        .filter(|&c| c != '\0')
        .take(MAX_MESSAGE_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url("http://localhost:5000").is_ok());
        assert!(validate_base_url("https://hub.example.org").is_ok());

        assert!(validate_base_url("").is_err());
        assert!(validate_base_url("hub.example.org").is_err()); // Missing scheme
        assert!(validate_base_url("http://").is_err()); // Missing host
        assert!(validate_base_url("http:///path").is_err());
        assert!(validate_base_url("http://hub example.org").is_err()); // Space
    }

    #[test]
    fn test_validate_channel_id() {
        assert_eq!(validate_channel_id("3").unwrap(), 3);
        assert_eq!(validate_channel_id("120").unwrap(), 120);

        assert!(validate_channel_id("").is_err());
        assert!(validate_channel_id("abc").is_err());
        assert!(validate_channel_id("0").is_err());
        assert!(validate_channel_id("-4").is_err());
    }

    #[test]
    fn test_validate_message() {
        assert!(validate_message("Hello, world!").is_ok());
        assert!(validate_message("Test message with 日本語").is_ok());

        assert!(validate_message("").is_err());
        assert!(validate_message("   ").is_err());
        assert!(validate_message(&"x".repeat(MAX_MESSAGE_LEN + 1)).is_err());
    }

    #[test]
    fn test_sanitize_message() {
        assert_eq!(sanitize_message("  Hello  "), "Hello");
        assert_eq!(sanitize_message("nul\0byte"), "nulbyte");
        assert_eq!(
            sanitize_message(&"x".repeat(MAX_MESSAGE_LEN + 100)).chars().count(),
            MAX_MESSAGE_LEN
        );
    }
}
