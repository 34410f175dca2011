use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::UserAccount;

/// Read every stored account in registration order.
pub fn fetch_accounts(conn: &Connection) -> Result<Vec<UserAccount>> {
    let mut stmt = conn
        .prepare("SELECT username, password, role FROM accounts ORDER BY position")
        .context("failed to prepare account query")?;

    let accounts = stmt
        .query_map([], |row| {
            Ok(UserAccount {
                username: row.get(0)?,
                password: row.get(1)?,
                role: row.get(2)?,
            })
        })
        .context("failed to load accounts")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect accounts")?;

    Ok(accounts)
}

/// Overwrite the account snapshot in a single transaction.
pub fn replace_accounts(conn: &mut Connection, accounts: &[UserAccount]) -> Result<()> {
    let tx = conn
        .transaction()
        .context("failed to begin account snapshot")?;

    tx.execute("DELETE FROM accounts", [])
        .context("failed to clear account snapshot")?;

    {
        let mut stmt = tx
            .prepare(
                "INSERT INTO accounts (position, username, password, role)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .context("failed to prepare account insert")?;

        for (position, account) in accounts.iter().enumerate() {
            stmt.execute(params![
                position as i64,
                account.username,
                account.password,
                account.role,
            ])
            .with_context(|| format!("failed to write account {}", account.username))?;
        }
    }

    tx.commit().context("failed to commit account snapshot")?;
    Ok(())
}
