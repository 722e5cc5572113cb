// ABOUTME: RAII transaction guard for request-scoped conversation store writes
// ABOUTME: Rolls back automatically on drop unless explicitly committed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Chat Gateway Contributors

//! Transaction management with an RAII guard
//!
//! ```text
//! let tx = pool.begin().await.map_err(StoreError::unavailable)?;
//! let mut guard = TransactionGuard::new(tx);
//!
//! sqlx::query("INSERT INTO conversations ...").execute(guard.executor()?).await?;
//!
//! // If this line isn't reached, the transaction rolls back
//! guard.commit().await?;
//! ```

use chat_gateway_core::errors::StoreError;
use sqlx::{Database, Transaction};
use tracing::{debug, warn};

/// RAII guard for database transactions ensuring automatic rollback on drop
///
/// Every early return between `new` and `commit` drops the guard, which drops
/// the inner `SQLx` transaction and rolls it back.
pub struct TransactionGuard<'c, DB: Database> {
    transaction: Option<Transaction<'c, DB>>,
    committed: bool,
}

impl<'c, DB: Database> TransactionGuard<'c, DB> {
    /// Create a new transaction guard from an existing `SQLx` transaction
    #[must_use]
    pub fn new(transaction: Transaction<'c, DB>) -> Self {
        debug!("TransactionGuard created - transaction will auto-rollback if not committed");
        Self {
            transaction: Some(transaction),
            committed: false,
        }
    }

    /// Commit the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the commit fails
    pub async fn commit(mut self) -> Result<(), StoreError> {
        let tx = self.transaction.take().ok_or_else(|| {
            StoreError::unavailable("transaction already consumed - cannot commit")
        })?;

        tx.commit()
            .await
            .map_err(|e| StoreError::unavailable(format!("transaction commit failed: {e}")))?;
        self.committed = true;
        debug!("TransactionGuard committed successfully");
        Ok(())
    }

    /// Get the underlying connection for executing queries
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was already committed
    pub fn executor(&mut self) -> Result<&mut <DB as Database>::Connection, StoreError> {
        self.transaction.as_deref_mut().ok_or_else(|| {
            StoreError::unavailable("transaction already consumed - guard used after commit")
        })
    }
}

impl<DB: Database> Drop for TransactionGuard<'_, DB> {
    fn drop(&mut self) {
        if self.transaction.is_some() && !self.committed {
            warn!("TransactionGuard dropped without commit - transaction will be rolled back");
        }
    }
}

/// Type alias for `SQLite` transaction guard
pub type SqliteTransactionGuard<'c> = TransactionGuard<'c, sqlx::Sqlite>;
