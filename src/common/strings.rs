// Normalização de strings aplicada nos caminhos de escrita.
// E-mail SEMPRE passa por normalize_email antes de qualquer comparação
// ou gravação; o resto é cosmético (nomes, endereços, telefone).

/// "  JOHN@EMAIL.COM  " -> "john@email.com"
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// "jOHN" -> "John"
pub fn capitalize_first(value: &str) -> String {
    let value = value.trim();
    let mut chars = value.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
        }
    }
}

/// "jOHN dOE" -> "John Doe"
pub fn capitalize_words(value: &str) -> String {
    value
        .split_whitespace()
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// "(555) 123-4567" -> "5551234567"; sem nenhum dígito vira None.
pub fn normalize_phone(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() { None } else { Some(digits) }
}

/// "  123 main STREET  " -> "123 Main Street"
pub fn normalize_address(address: &str) -> String {
    capitalize_words(address)
}

/// "new york" -> "New York"
pub fn normalize_city(city: &str) -> String {
    capitalize_words(city)
}

/// "fl" -> "FL"
pub fn normalize_state(state: &str) -> String {
    state.trim().to_uppercase()
}

/// " 32063-1234 " -> "32063-1234" (só dígitos e hífen)
pub fn normalize_zip_code(zip: &str) -> String {
    zip.trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_lowercases_and_trims() {
        assert_eq!(normalize_email("  JOHN@Email.COM  "), "john@email.com");
        assert_eq!(normalize_email("jane@example.com"), "jane@example.com");
    }

    #[test]
    fn capitalize_first_handles_mixed_case() {
        assert_eq!(capitalize_first("jOHN"), "John");
        assert_eq!(capitalize_first("a"), "A");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn capitalize_words_normalizes_each_word() {
        assert_eq!(capitalize_words("jOHN dOE"), "John Doe");
        assert_eq!(capitalize_words("  123 main STREET  "), "123 Main Street");
    }

    #[test]
    fn normalize_phone_keeps_only_digits() {
        assert_eq!(normalize_phone("(555) 123-4567"), Some("5551234567".into()));
        assert_eq!(normalize_phone("abc"), None);
    }

    #[test]
    fn normalize_state_uppercases() {
        assert_eq!(normalize_state(" fl "), "FL");
    }

    #[test]
    fn normalize_zip_keeps_digits_and_hyphen() {
        assert_eq!(normalize_zip_code(" 32063-1234 "), "32063-1234");
        assert_eq!(normalize_zip_code("ab32063"), "32063");
    }
}
