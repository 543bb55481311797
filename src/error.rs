#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount is required")]
    MissingAmount,

    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("transaction type is required (income or expense)")]
    MissingType,

    #[error("category is required")]
    MissingCategory,

    #[error("date is required")]
    MissingDate,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("a budget for \"{0}\" already exists")]
    DuplicateBudgetCategory(String),

    #[error("no transaction with ID \"{0}\"")]
    TransactionNotFound(String),

    #[error("no budget with ID \"{0}\"")]
    BudgetNotFound(String),

    /// Saving or loading failed. The in-memory state is still authoritative
    /// for the current session.
    #[error("could not persist data: {0}")]
    Persistence(String),

    #[error("invalid import file: {0}")]
    ImportFormat(String),
}
