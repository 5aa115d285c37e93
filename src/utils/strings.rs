use pluralizer::pluralize;

/// Converts a camelCase or PascalCase string to snake_case.
///
/// An underscore is inserted wherever a lowercase letter is followed by an
/// uppercase one, and every character is lowercased.
///
/// # Examples
///
/// ```
/// use crate::utils::strings::camel_to_snake_case;
///
/// assert_eq!(camel_to_snake_case("AdminUser"), "admin_user");
/// assert_eq!(camel_to_snake_case("Resource"), "resource");
/// ```
pub fn camel_to_snake_case(camel: &str) -> String {
    let mut snake = String::with_capacity(camel.len() + 4);
    let mut chars = camel.chars().peekable();

    while let Some(current) = chars.next() {
        match chars.peek() {
            Some(&next) if current.is_ascii_lowercase() && next.is_ascii_uppercase() => {
                snake.push(current);
                snake.push('_');
            }
            _ => snake.push(current.to_ascii_lowercase()),
        }
    }

    snake
}

/// Derives the table name for a model type name: `AdminUser` becomes `admin_users`.
pub fn table_name(type_name: &str) -> String {
    pluralize(camel_to_snake_case(type_name).as_str(), 2, false)
}

/// Escapes `%`, `_` and `\` so a user supplied term matches literally inside
/// an `ILIKE` pattern.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_to_snake_case() {
        assert_eq!(camel_to_snake_case("camelCase"), "camel_case");
        assert_eq!(camel_to_snake_case("AdminUser"), "admin_user");
        assert_eq!(camel_to_snake_case("simple"), "simple");
        assert_eq!(camel_to_snake_case(""), "");
    }

    #[test]
    fn test_table_name() {
        assert_eq!(table_name("Resource"), "resources");
        assert_eq!(table_name("Session"), "sessions");
        assert_eq!(table_name("User"), "users");
        assert_eq!(table_name("AdminUser"), "admin_users");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("city library"), "city library");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }
}
