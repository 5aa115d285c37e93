/// Extracts the token from an `Authorization` header value of the form
/// `Bearer <token>`. Anything else, including an empty token, yields `None`.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_header() {
        assert_eq!(parse_bearer("Bearer abc-123"), Some("abc-123"));
    }

    #[test]
    fn rejects_malformed_headers() {
        assert_eq!(parse_bearer("abc-123"), None);
        assert_eq!(parse_bearer("bearer abc"), None);
        assert_eq!(parse_bearer("Basic dXNlcg=="), None);
        assert_eq!(parse_bearer("Bearer "), None);
        assert_eq!(parse_bearer("Bearer a b"), None);
    }
}
