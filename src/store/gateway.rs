use anyhow::Result;

use crate::models::{Budget, CategoryChartType, Transaction, TrendChartType, DEFAULT_THEME};

/// Version tag written with every saved state.
pub const STATE_VERSION: u32 = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct SerializedState {
    pub version: u32,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub dark_mode: bool,
    pub chart_type: CategoryChartType,
    pub trend_chart_type: TrendChartType,
    pub theme: String,
}

impl Default for SerializedState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            transactions: Vec::new(),
            budgets: Vec::new(),
            dark_mode: false,
            chart_type: CategoryChartType::default(),
            trend_chart_type: TrendChartType::default(),
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

pub trait StateGateway {
    /// The last saved state, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<SerializedState>>;

    fn save(&mut self, state: &SerializedState) -> Result<()>;
}
