use crate::aggregate::{trend_series, MonthSummary, MonthWindow, TrendPoint};
use crate::error::Error;
use crate::exchange;
use crate::models::{
    Budget, CategoryChartType, Settings, Tab, Transaction, TrendChartType, YearMonth,
};
use crate::store::{BudgetDraft, EntityStore, StateGateway, TransactionDraft};

pub struct Session<G: StateGateway> {
    store: EntityStore,
    gateway: G,
    persist_error: Option<Error>,
}

impl<G: StateGateway> Session<G> {
    pub fn open(gateway: G, active_month: YearMonth) -> Self {
        let (store, persist_error) = match gateway.load() {
            Ok(Some(state)) => (EntityStore::from_state(state, active_month), None),
            Ok(None) => {
                tracing::debug!("no saved state, starting empty");
                (EntityStore::new(Settings::new(active_month)), None)
            }
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "failed to load saved state");
                (
                    EntityStore::new(Settings::new(active_month)),
                    Some(Error::Persistence(format!("{e:#}"))),
                )
            }
        };

        Self {
            store,
            gateway,
            persist_error,
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn take_persist_error(&mut self) -> Option<Error> {
        self.persist_error.take()
    }

    // ── Records ───────────────────────────────────────────────

    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<Transaction, Error> {
        let txn = self.store.add_transaction(draft)?.clone();
        self.persist();
        Ok(txn)
    }

    pub fn update_transaction(&mut self, id: &str, draft: TransactionDraft) -> Result<Transaction, Error> {
        let txn = self.store.update_transaction(id, draft)?.clone();
        self.persist();
        Ok(txn)
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<Transaction, Error> {
        let txn = self.store.delete_transaction(id)?;
        self.persist();
        Ok(txn)
    }

    pub fn add_budget(&mut self, draft: BudgetDraft) -> Result<Budget, Error> {
        let budget = self.store.add_budget(draft)?.clone();
        self.persist();
        Ok(budget)
    }

    pub fn update_budget(&mut self, id: &str, draft: BudgetDraft) -> Result<Budget, Error> {
        let budget = self.store.update_budget(id, draft)?.clone();
        self.persist();
        Ok(budget)
    }

    pub fn delete_budget(&mut self, id: &str) -> Result<Budget, Error> {
        let budget = self.store.delete_budget(id)?;
        self.persist();
        Ok(budget)
    }

    pub fn import_json(&mut self, text: &str) -> Result<(usize, usize), Error> {
        let payload = exchange::parse_import(text)
            .inspect_err(|e| tracing::warn!(error = %e, "rejected import"))?;
        let counts = (payload.transactions.len(), payload.budgets.len());
        self.store
            .replace_all(payload.transactions, payload.budgets)
            .inspect_err(|e| tracing::warn!(error = %e, "rejected import"))?;
        tracing::info!(transactions = counts.0, budgets = counts.1, "imported data");
        self.persist();
        Ok(counts)
    }

    pub fn reset(&mut self) {
        self.store.reset();
        self.persist();
    }

    // ── Preferences ───────────────────────────────────────────

    pub fn set_theme(&mut self, theme: &str) {
        self.store.settings_mut().theme = theme.to_string();
        self.persist();
    }

    /// Flip dark mode; a no-op under a custom theme. Returns the resulting mode.
    pub fn toggle_dark_mode(&mut self) -> bool {
        let before = self.store.settings().dark_mode;
        let after = self.store.settings_mut().toggle_dark_mode();
        if before != after {
            self.persist();
        }
        after
    }

    pub fn set_chart_type(&mut self, chart: CategoryChartType) {
        self.store.settings_mut().chart_type = chart;
        self.persist();
    }

    pub fn set_trend_chart_type(&mut self, chart: TrendChartType) {
        self.store.settings_mut().trend_chart_type = chart;
        self.persist();
    }

    // ── Navigation (not persisted) ────────────────────────────

    pub fn active_month(&self) -> YearMonth {
        self.store.settings().active_month
    }

    pub fn set_active_month(&mut self, month: YearMonth) {
        self.store.settings_mut().active_month = month;
    }

    pub fn next_month(&mut self) -> YearMonth {
        self.store.settings_mut().next_month()
    }

    pub fn prev_month(&mut self) -> YearMonth {
        self.store.settings_mut().prev_month()
    }

    pub fn set_active_tab(&mut self, tab: Tab) {
        tracing::debug!(tab = tab.as_str(), "switched tab");
        self.store.settings_mut().active_tab = tab;
    }

    // ── Derived views ─────────────────────────────────────────

    pub fn summary(&self, now: YearMonth) -> MonthSummary {
        MonthSummary::compute(
            self.active_month(),
            self.store.transactions(),
            self.store.budgets(),
            now,
        )
    }

    pub fn trend(&self, back: usize, ahead: usize, now: YearMonth) -> Vec<TrendPoint> {
        let window = MonthWindow::centered_on(self.active_month(), back, ahead);
        trend_series(self.store.transactions(), window, now)
    }

    fn persist(&mut self) {
        let state = self.store.to_state();
        if let Err(e) = self.gateway.save(&state) {
            tracing::error!(error = %format!("{e:#}"), "failed to save data");
            self.persist_error = Some(Error::Persistence(format!("{e:#}")));
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
