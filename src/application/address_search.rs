use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::domain::address::{parse_label, Contact, StructuredAddress};
use crate::domain::errors::CommerceError;
use crate::domain::ports::{AddressSuggester, AddressSuggestion};

/// Quiet period after the last keystroke before suggestions are requested.
pub const DEBOUNCE: Duration = Duration::from_millis(300);
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Default)]
struct SearchState {
    suggestions: Vec<AddressSuggestion>,
    selected: Option<StructuredAddress>,
    contact: Contact,
    error: Option<String>,
}

/// Address autocomplete for the checkout form.
pub struct AddressSearch<S> {
    suggester: Arc<S>,
    generation: AtomicU64,
    state: Mutex<SearchState>,
}

impl<S: AddressSuggester> AddressSearch<S> {
    pub fn new(suggester: Arc<S>) -> Self {
        Self {
            suggester,
            generation: AtomicU64::new(0),
            state: Mutex::new(SearchState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn suggestions(&self) -> Vec<AddressSuggestion> {
        self.lock().suggestions.clone()
    }

    pub fn selected(&self) -> Option<StructuredAddress> {
        self.lock().selected.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Called on every keystroke. Waits out the debounce window and returns
    /// `None` when a later keystroke superseded this one, either during the
    /// wait or while the request was in flight.
    pub async fn search(&self, input: &str) -> Option<Vec<AddressSuggestion>> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(DEBOUNCE).await;
        if !self.is_current(generation) {
            return None;
        }

        let query = input.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            self.lock().suggestions.clear();
            return Some(Vec::new());
        }

        log::debug!("Searching addresses for {:?}", query);
        let result = self.suggester.suggest(query).await;
        if !self.is_current(generation) {
            log::debug!("Dropping superseded suggestions for {:?}", query);
            return None;
        }

        let mut state = self.lock();
        match result {
            Ok(items) => {
                let items = dedup_by_label(items);
                state.suggestions = items.clone();
                state.error = None;
                Some(items)
            }
            Err(err) => {
                log::warn!("Address search failed: {}", err);
                state.suggestions.clear();
                state.error = Some(err.to_string());
                Some(Vec::new())
            }
        }
    }

    /// Resolves a suggestion into the structured address handed to checkout.
    pub fn select(&self, suggestion: &AddressSuggestion) -> StructuredAddress {
        // A search still in flight must not reopen the list.
        self.generation.fetch_add(1, Ordering::SeqCst);
        let parsed = parse_label(&suggestion.label).with_components(&suggestion.components);
        let mut state = self.lock();
        let address = StructuredAddress {
            label: suggestion.label.clone(),
            parsed,
            contact: state.contact.clone(),
        };
        state.suggestions.clear();
        state.selected = Some(address.clone());
        address
    }

    /// Updates the customer fields. With an address already selected, returns
    /// it again carrying the new fields; the label is not parsed again.
    pub fn update_contact(&self, contact: Contact) -> Option<StructuredAddress> {
        let mut state = self.lock();
        state.contact = contact.clone();
        let selected = state.selected.as_mut()?;
        selected.contact = contact;
        Some(selected.clone())
    }

    /// Validates and resolves free text typed without picking a suggestion.
    pub async fn resolve(&self, input: &str) -> Result<StructuredAddress, CommerceError> {
        let query = input.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Err(CommerceError::Validation("address is too short".to_string()));
        }
        let first = self
            .suggester
            .suggest(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CommerceError::Validation(format!("no address found for '{query}'")))?;
        Ok(self.select(&first))
    }
}

fn dedup_by_label(items: Vec<AddressSuggestion>) -> Vec<AddressSuggestion> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|s| seen.insert(s.label.clone()))
        .collect()
}
