use super::YearMonth;

pub const DEFAULT_THEME: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryChartType {
    #[default]
    Pie,
    Doughnut,
}

impl CategoryChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pie => "pie",
            Self::Doughnut => "doughnut",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pie" => Some(Self::Pie),
            "doughnut" | "donut" => Some(Self::Doughnut),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendChartType {
    #[default]
    Line,
    Bar,
}

impl TrendChartType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "line" => Some(Self::Line),
            "bar" => Some(Self::Bar),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Transactions,
    Budgets,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Transactions => "transactions",
            Self::Budgets => "budgets",
        }
    }
}

/// Scalar preferences and navigation state.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub theme: String,
    pub dark_mode: bool,
    pub chart_type: CategoryChartType,
    pub trend_chart_type: TrendChartType,
    pub active_month: YearMonth,
    pub active_tab: Tab,
}

impl Settings {
    pub fn new(active_month: YearMonth) -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            dark_mode: false,
            chart_type: CategoryChartType::default(),
            trend_chart_type: TrendChartType::default(),
            active_month,
            active_tab: Tab::default(),
        }
    }

    pub fn uses_default_theme(&self) -> bool {
        self.theme == DEFAULT_THEME
    }

    /// Flip dark mode. Custom themes pin their own palette, so the toggle is
    /// ignored unless the default theme is active. Returns the resulting mode.
    pub fn toggle_dark_mode(&mut self) -> bool {
        if self.uses_default_theme() {
            self.dark_mode = !self.dark_mode;
        }
        self.dark_mode
    }

    pub fn next_month(&mut self) -> YearMonth {
        if let Some(next) = self.active_month.succ() {
            self.active_month = next;
        }
        self.active_month
    }

    pub fn prev_month(&mut self) -> YearMonth {
        if let Some(prev) = self.active_month.pred() {
            self.active_month = prev;
        }
        self.active_month
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(YearMonth::current())
    }
}
