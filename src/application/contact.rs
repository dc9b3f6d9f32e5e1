use crate::domain::address::Contact;
use crate::domain::customer::{is_complete_phone, normalize_phone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    FullName,
    PhoneNumber,
    Company,
}

/// Customer fields of the checkout form, and the decision of when they are
/// complete enough to attach to the order.
#[derive(Debug, Default)]
pub struct ContactForm {
    contact: Contact,
    last_sent: Option<(String, String)>,
}

impl ContactForm {
    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    /// Records one keystroke. Returns the `(full name, phone)` pair to attach
    /// when the edit completes the identity: the phone reaches exactly ten
    /// digits while a name is present, or the name changes while the phone
    /// is already complete. A pair identical to the last one sent is not
    /// returned again.
    pub fn update(&mut self, field: ContactField, value: &str) -> Option<(String, String)> {
        match field {
            ContactField::FullName => self.contact.full_name = value.to_string(),
            ContactField::PhoneNumber => self.contact.phone_number = value.to_string(),
            ContactField::Company => {
                self.contact.company = value.to_string();
                return None;
            }
        }

        if self.contact.full_name.trim().is_empty() || !is_complete_phone(&self.contact.phone_number)
        {
            return None;
        }

        let pair = (
            self.contact.full_name.trim().to_string(),
            normalize_phone(&self.contact.phone_number),
        );
        if self.last_sent.as_ref() == Some(&pair) {
            return None;
        }
        Some(pair)
    }

    /// Remembers a pair the backend accepted.
    pub fn mark_sent(&mut self, pair: (String, String)) {
        self.last_sent = Some(pair);
    }

    /// Takes the non-empty fields of a resolved address's contact; the
    /// form keeps its own value only where the address has none.
    pub fn merge_from(&mut self, other: &Contact) {
        let fields = [
            (&mut self.contact.full_name, &other.full_name),
            (&mut self.contact.phone_number, &other.phone_number),
            (&mut self.contact.company, &other.company),
        ];
        for (mine, theirs) in fields {
            if !theirs.is_empty() {
                mine.clone_from(theirs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_phone(form: &mut ContactForm, phone: &str) -> Vec<(String, String)> {
        let mut fired = Vec::new();
        for end in 1..=phone.len() {
            if let Some(pair) = form.update(ContactField::PhoneNumber, &phone[..end]) {
                form.mark_sent(pair.clone());
                fired.push(pair);
            }
        }
        fired
    }

    #[test]
    fn nine_digits_never_fire() {
        let mut form = ContactForm::default();
        form.update(ContactField::FullName, "Nguyen Lan");
        assert!(type_phone(&mut form, "090123456").is_empty());
    }

    #[test]
    fn tenth_digit_fires_exactly_once() {
        let mut form = ContactForm::default();
        form.update(ContactField::FullName, "Nguyen Lan");
        let fired = type_phone(&mut form, "0901234567");
        assert_eq!(
            fired,
            vec![("Nguyen Lan".to_string(), "0901234567".to_string())]
        );
    }

    #[test]
    fn phone_without_name_waits_for_name() {
        let mut form = ContactForm::default();
        assert!(type_phone(&mut form, "0901234567").is_empty());
        let pair = form.update(ContactField::FullName, "Lan");
        assert_eq!(pair, Some(("Lan".to_string(), "0901234567".to_string())));
    }

    #[test]
    fn name_edit_refires_with_complete_phone() {
        let mut form = ContactForm::default();
        form.update(ContactField::FullName, "Lan");
        type_phone(&mut form, "0901234567");
        let pair = form.update(ContactField::FullName, "Lan Anh");
        assert_eq!(pair, Some(("Lan Anh".to_string(), "0901234567".to_string())));
    }

    #[test]
    fn separators_do_not_count_as_digits() {
        let mut form = ContactForm::default();
        form.update(ContactField::FullName, "Lan");
        assert!(form.update(ContactField::PhoneNumber, "090-123-456").is_none());
        assert!(form.update(ContactField::PhoneNumber, "090-123-4567").is_some());
    }

    #[test]
    fn address_contact_wins_over_form() {
        let mut form = ContactForm::default();
        form.update(ContactField::FullName, "Lan");
        form.update(ContactField::PhoneNumber, "0901234567");
        form.update(ContactField::Company, "Gate 3");

        form.merge_from(&Contact {
            full_name: "Nguyen Lan".to_string(),
            phone_number: String::new(),
            company: "Gate 5".to_string(),
        });

        assert_eq!(form.contact().full_name, "Nguyen Lan");
        assert_eq!(form.contact().phone_number, "0901234567");
        assert_eq!(form.contact().company, "Gate 5");
    }

    #[test]
    fn company_never_fires() {
        let mut form = ContactForm::default();
        form.update(ContactField::FullName, "Lan");
        form.update(ContactField::PhoneNumber, "0901234567");
        assert!(form.update(ContactField::Company, "Gate 3").is_none());
        assert_eq!(form.contact().company, "Gate 3");
    }
}
