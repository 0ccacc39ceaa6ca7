use std::{future::Future, pin::Pin};

use sqlx::{Postgres, Transaction};

use crate::{database::get_pool, error::AppError};

#[derive(Debug)]
pub struct DatabaseTransaction;

impl DatabaseTransaction {
    /// Run a closure inside a transaction, committing on `Ok` and rolling back on `Err`
    pub async fn run<T, F>(f: F) -> Result<T, AppError>
    where
        F: for<'a> FnOnce(
            &'a mut Transaction<'static, Postgres>,
        )
            -> Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'a>>,
        T: Send,
    {
        let mut tx = get_pool().begin().await.map_err(AppError::from)?;

        match f(&mut tx).await {
            Ok(value) => {
                tx.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(err) => {
                log::warn!("Transaction failed with error: {}, rolling back", err);
                if let Err(rollback_err) = tx.rollback().await {
                    log::error!(
                        "Rollback failed after error (orig: {}, rollback: {})",
                        err,
                        rollback_err
                    );
                }
                Err(err)
            }
        }
    }
}
