//! Database ID type definitions.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The ID of a [Transaction](crate::transaction::Transaction).
///
/// IDs are assigned by the database in increasing order, so a larger ID
/// means the transaction was inserted later.
pub type TransactionId = DatabaseId;
