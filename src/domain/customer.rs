use serde::Serialize;

/// Used as first name when the customer typed a single word.
pub const PLACEHOLDER_FIRST_NAME: &str = "Anh/chị";

/// Phone numbers are complete at exactly this many digits.
pub const PHONE_DIGITS: usize = 10;

/// Identity attached to the active order. The backend requires an email
/// address, which is synthesised from the phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub phone_number: String,
}

impl CustomerInput {
    pub fn from_contact(full_name: &str, phone: &str, email_domain: &str) -> Self {
        let (first_name, last_name) = split_full_name(full_name);
        let phone_number = normalize_phone(phone);
        CustomerInput {
            first_name,
            last_name,
            email_address: format!("{phone_number}@{email_domain}"),
            phone_number,
        }
    }
}

/// Strips every non-digit character.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

pub fn is_complete_phone(phone: &str) -> bool {
    normalize_phone(phone).len() == PHONE_DIGITS
}

/// Single word: placeholder first name, the word as last name.
/// Several words: first word, then the rest joined by single spaces.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();
    if rest.is_empty() {
        (PLACEHOLDER_FIRST_NAME.to_string(), first.to_string())
    } else {
        (first.to_string(), rest.join(" "))
    }
}
