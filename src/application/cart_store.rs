use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::domain::errors::CommerceError;
use crate::domain::order::{Order, OrderState};
use crate::domain::ports::CommerceApi;

/// Quantity controls on product cards hide after this long without activity.
pub const QUANTITY_CONTROLS_AUTO_HIDE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Loading,
}

/// What happens to an optimistic quantity when the adjust mutation fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptimisticPolicy {
    /// Leave the tentative quantity on screen next to the error.
    #[default]
    KeepTentative,
    /// Restore the last snapshot the server confirmed.
    Revert,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    pub snapshot: Option<Order>,
    pub status: Status,
    pub error: Option<String>,
}

impl CartState {
    pub fn total_quantity(&self) -> u32 {
        self.snapshot.as_ref().map_or(0, Order::total_quantity)
    }
}

#[derive(Default)]
struct Inner {
    state: CartState,
    /// Sequence number handed to the most recent operation.
    issued: u64,
    /// Sequence number of the state currently shown.
    applied: u64,
    loading: usize,
    confirmed: Option<Order>,
    controls: HashMap<String, Instant>,
}

impl Inner {
    fn begin(&mut self, loading: bool) -> u64 {
        self.issued += 1;
        if loading {
            self.loading += 1;
            self.state.status = Status::Loading;
            self.state.error = None;
        }
        self.issued
    }

    fn end_loading(&mut self) {
        self.loading = self.loading.saturating_sub(1);
        if self.loading == 0 {
            self.state.status = Status::Idle;
        }
    }

    /// Installs a server snapshot unless something newer is already shown.
    fn apply(&mut self, seq: u64, order: Option<Order>) -> bool {
        if seq < self.applied {
            log::debug!("Discarding cart response #{} (showing #{})", seq, self.applied);
            return false;
        }
        self.applied = seq;
        self.confirmed = order.clone();
        self.state.snapshot = order;
        true
    }
}

/// Local view of the active order, kept in step with the backend.
///
/// Every operation records its failure as a readable message in the state and
/// also returns it. Nothing is retried.
pub struct CartStore<A> {
    api: Arc<A>,
    policy: OptimisticPolicy,
    inner: Mutex<Inner>,
}

impl<A: CommerceApi> CartStore<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self::with_policy(api, OptimisticPolicy::default())
    }

    pub fn with_policy(api: Arc<A>, policy: OptimisticPolicy) -> Self {
        Self {
            api,
            policy,
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> CartState {
        self.lock().state.clone()
    }

    pub fn snapshot(&self) -> Option<Order> {
        self.lock().state.snapshot.clone()
    }

    pub fn total_quantity(&self) -> u32 {
        self.lock().state.total_quantity()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().state.error.clone()
    }

    fn fail(&self, err: CommerceError) -> CommerceError {
        self.lock().state.error = Some(err.to_string());
        err
    }

    /// Moves the order to `ArrangingPayment`, then replaces the snapshot with
    /// the active order.
    pub async fn load(&self) -> Result<(), CommerceError> {
        let seq = self.lock().begin(true);
        let result = self.fetch().await;
        let mut inner = self.lock();
        inner.end_loading();
        match result {
            Ok(order) => {
                inner.apply(seq, order);
                Ok(())
            }
            Err(err) => {
                log::warn!("Loading cart failed: {}", err);
                inner.state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    async fn fetch(&self) -> Result<Option<Order>, CommerceError> {
        // The backend refuses the transition until the order has a customer
        // and a shipping method; the order then simply stays where it is.
        match self
            .api
            .transition_to_state(OrderState::ArrangingPayment)
            .await
        {
            Ok(()) => {}
            Err(err @ (CommerceError::Domain { .. } | CommerceError::Decode(_))) => {
                log::debug!("Order not moved to ArrangingPayment: {}", err);
            }
            Err(err) => return Err(err),
        }
        self.api.active_order().await
    }

    pub async fn add_line(&self, variant_id: &str, quantity: u32) -> Result<(), CommerceError> {
        if quantity < 1 {
            return Err(self.fail(CommerceError::Validation(
                "quantity must be at least 1".to_string(),
            )));
        }
        let seq = self.lock().begin(true);
        let result = self.api.add_item(variant_id, quantity).await;
        self.settle(seq, true, result).await
    }

    /// Shows `quantity` at once, then confirms with the backend. Zero is sent
    /// as a line removal.
    pub async fn update_line_quantity(
        &self,
        line_id: &str,
        quantity: u32,
    ) -> Result<(), CommerceError> {
        if quantity == 0 {
            return self.remove_line(line_id).await;
        }

        let seq = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            let seq = inner.begin(false);
            if let Some(line) = inner
                .state
                .snapshot
                .as_mut()
                .and_then(|o| o.lines.iter_mut().find(|l| l.id == line_id))
            {
                line.quantity = quantity;
                inner.applied = seq;
            }
            seq
        };

        let result = self.api.adjust_line(line_id, quantity).await;
        if result.is_err() && self.policy == OptimisticPolicy::Revert {
            let mut guard = self.lock();
            let inner = &mut *guard;
            if inner.applied == seq {
                inner.state.snapshot = inner.confirmed.clone();
            }
        }
        self.settle(seq, false, result).await
    }

    pub async fn remove_line(&self, line_id: &str) -> Result<(), CommerceError> {
        let seq = self.lock().begin(true);
        let result = self.api.remove_line(line_id).await;
        self.settle(seq, true, result).await
    }

    /// Forgets the local snapshot. The server order is left alone.
    pub fn clear(&self) {
        let mut guard = self.lock();
        let inner = &mut *guard;
        inner.issued += 1;
        inner.applied = inner.issued;
        inner.state.snapshot = None;
        inner.confirmed = None;
        inner.state.error = None;
    }

    async fn settle(
        &self,
        seq: u64,
        loading: bool,
        result: Result<Order, CommerceError>,
    ) -> Result<(), CommerceError> {
        {
            let mut inner = self.lock();
            if loading {
                inner.end_loading();
            }
            if let Ok(order) = &result {
                inner.apply(seq, Some(order.clone()));
                inner.state.error = None;
                return Ok(());
            }
        }

        let Err(err) = result else {
            return Ok(());
        };
        log::warn!("Cart mutation failed: {}", err);
        if err.is_stale_line() {
            log::info!("Order line vanished on the server, reloading cart");
            if let Err(reload) = self.load().await {
                log::warn!("Resynchronising cart failed: {}", reload);
            }
        }
        Err(self.fail(err))
    }

    /// Shows the quantity controls for `variant_id` and restarts their
    /// auto-hide timer.
    pub fn show_quantity_controls(&self, variant_id: &str) {
        self.lock().controls.insert(
            variant_id.to_string(),
            Instant::now() + QUANTITY_CONTROLS_AUTO_HIDE,
        );
    }

    pub fn hide_quantity_controls(&self, variant_id: &str) {
        self.lock().controls.remove(variant_id);
    }

    pub fn quantity_controls_visible(&self, variant_id: &str) -> bool {
        let mut inner = self.lock();
        match inner.controls.get(variant_id) {
            Some(deadline) if Instant::now() < *deadline => true,
            Some(_) => {
                inner.controls.remove(variant_id);
                false
            }
            None => false,
        }
    }
}
