//! Login accounts and the single active session.
//!
//! The store is handed explicitly to whatever needs to know who is logged in;
//! there is no process-wide session.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use anyhow::{Context, Result};
use rusqlite::Connection;
use subtle::ConstantTimeEq;
use tracing::{error, info, warn};

use crate::db::{fetch_accounts, open_snapshot, replace_accounts, ACCOUNTS_TABLE};
use crate::error::{StoreError, StoreResult};
use crate::models::{UserAccount, ADMIN_ROLE};
use crate::store::{lock, read, write};

/// Account seeded when the account snapshot is empty.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

const COLLECTION: &str = "accounts";

pub struct CredentialStore {
    path: PathBuf,
    conn: Mutex<Connection>,
    accounts: RwLock<Vec<UserAccount>>,
    session: RwLock<Option<UserAccount>>,
}

impl CredentialStore {
    /// Open the account snapshot at `path`. When it holds no accounts the
    /// default administrator is created and written immediately; failing to
    /// write it is the one error this constructor reports besides not being
    /// able to create the file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut conn = open_snapshot(&path, &ACCOUNTS_TABLE)?;

        let mut accounts = match fetch_accounts(&conn) {
            Ok(accounts) => accounts,
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %format!("{err:#}"),
                    "account snapshot unreadable, starting empty"
                );
                Vec::new()
            }
        };

        if accounts.is_empty() {
            let seed = vec![UserAccount::new(
                DEFAULT_ADMIN_USERNAME,
                DEFAULT_ADMIN_PASSWORD,
                ADMIN_ROLE,
            )];
            replace_accounts(&mut conn, &seed)
                .context("failed to persist bootstrap administrator")?;
            info!(username = DEFAULT_ADMIN_USERNAME, "seeded default administrator");
            accounts = seed;
        }

        Ok(Self {
            path,
            conn: Mutex::new(conn),
            accounts: RwLock::new(accounts),
            session: RwLock::new(None),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start a session for the account matching both fields exactly. A failed
    /// attempt leaves any existing session in place.
    pub fn login(&self, username: &str, password: &str) -> StoreResult<UserAccount> {
        let account = read(&self.accounts)
            .iter()
            .find(|account| {
                account.username == username && passwords_match(&account.password, password)
            })
            .cloned();

        match account {
            Some(account) => {
                info!(username = %account.username, "login succeeded");
                *write(&self.session) = Some(account.clone());
                Ok(account)
            }
            None => {
                warn!(username = %username, "login rejected");
                Err(StoreError::InvalidCredentials)
            }
        }
    }

    pub fn logout(&self) {
        if let Some(account) = write(&self.session).take() {
            info!(username = %account.username, "logged out");
        }
    }

    pub fn is_logged_in(&self) -> bool {
        read(&self.session).is_some()
    }

    pub fn current_user(&self) -> Option<UserAccount> {
        read(&self.session).clone()
    }

    /// Append a new account. Username and password must not be blank and the
    /// username must be unused.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        role: &str,
    ) -> StoreResult<UserAccount> {
        // Stored verbatim; a whitespace-only value counts as blank.
        if username.trim().is_empty() {
            return Err(StoreError::MissingField("Username"));
        }
        if password.trim().is_empty() {
            return Err(StoreError::MissingField("Password"));
        }

        let mut conn = lock(&self.conn);
        let mut next = read(&self.accounts).clone();
        if next.iter().any(|account| account.username == username) {
            return Err(StoreError::DuplicateUsername(username.to_string()));
        }

        let account = UserAccount::new(username, password, role);
        next.push(account.clone());

        if let Err(err) = replace_accounts(&mut conn, &next) {
            error!(
                path = %self.path.display(),
                error = %format!("{err:#}"),
                "account snapshot write failed"
            );
            return Err(StoreError::persistence(COLLECTION, err));
        }

        *write(&self.accounts) = next;
        info!(username = %account.username, role = %account.role, "account registered");
        Ok(account)
    }

    /// Owned copy of every account in registration order.
    pub fn accounts(&self) -> Vec<UserAccount> {
        read(&self.accounts).clone()
    }
}

/// Byte comparison that does not stop at the first mismatch. Both sides are
/// padded to the same length so the loop length does not depend on where the
/// inputs differ.
fn passwords_match(stored: &str, provided: &str) -> bool {
    let stored = stored.as_bytes();
    let provided = provided.as_bytes();

    let max_len = stored.len().max(provided.len());
    let mut padded_stored = vec![0u8; max_len];
    let mut padded_provided = vec![0u8; max_len];
    padded_stored[..stored.len()].copy_from_slice(stored);
    padded_provided[..provided.len()].copy_from_slice(provided);

    let bytes_match: bool = padded_stored.ct_eq(&padded_provided).into();
    bytes_match && stored.len() == provided.len()
}
