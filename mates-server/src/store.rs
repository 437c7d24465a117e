use serde::{Deserialize, Serialize};
use sled::transaction::{ConflictableTransactionError, TransactionError, TransactionalTree};
use sled::{Db, Tree};
use thiserror::Error;

use mates_common::Username;

use crate::error::AppError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage engine error: {0}")]
    Sled(#[from] sled::Error),
    #[error("corrupt user record: {0}")]
    Codec(#[from] serde_json::Error),
}

/// One account's persisted state: profile data plus its side of the friend
/// graph. A pending request from A to B lives only in B's `friend_requests`;
/// a confirmed friendship appears in both records' `friends`. Both lists keep
/// insertion order.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct UserRecord {
    pub username: Username,
    pub name: String,
    pub credential: String,
    #[serde(default)]
    pub friends: Vec<Username>,
    #[serde(default)]
    pub friend_requests: Vec<Username>,
}

impl UserRecord {
    pub fn new(username: Username, name: String, credential: String) -> Self {
        Self {
            username,
            name,
            credential,
            friends: Vec::new(),
            friend_requests: Vec::new(),
        }
    }
}

pub type UserOp<'a> = dyn Fn(&mut UserRecord) -> Result<(), AppError> + 'a;
pub type PairOp<'a> = dyn Fn(&mut UserRecord, &mut UserRecord) -> Result<(), AppError> + 'a;

/// Store of user records keyed by username. The mutating entry points apply
/// their closure as one atomic read-modify-write, so relation changes that
/// touch two records land together or not at all. A closure may run more than
/// once if the underlying transaction retries, so it must not have side
/// effects beyond the records it is handed.
pub trait UserStore: Send + Sync {
    /// Inserts a fresh record. Returns false when the username is taken.
    fn create_user(&self, record: &UserRecord) -> Result<bool, StoreError>;

    fn get_user(&self, username: &Username) -> Result<Option<UserRecord>, StoreError>;

    /// Every known username, in lexicographic key order.
    fn usernames(&self) -> Result<Vec<Username>, StoreError>;

    /// Atomically rewrites one record. `NotFound` when the user is unknown.
    fn update_user(&self, username: &Username, op: &UserOp<'_>) -> Result<(), AppError>;

    /// Atomically rewrites two records. The usernames must differ.
    fn update_pair(&self, a: &Username, b: &Username, op: &PairOp<'_>) -> Result<(), AppError>;
}

/// The on-disk store: a single sled tree mapping username bytes to a JSON
/// record blob.
pub struct SledUserStore {
    tree: Tree,
}

impl SledUserStore {
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        Self::from_db(&db)
    }

    /// Backed by a throwaway database, for tests.
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(&db)
    }

    fn from_db(db: &Db) -> Result<Self, StoreError> {
        Ok(Self {
            tree: db.open_tree("users")?,
        })
    }
}

fn decode(bytes: &[u8]) -> Result<UserRecord, StoreError> {
    Ok(serde_json::from_slice(bytes)?)
}

fn tx_get(
    tx: &TransactionalTree,
    username: &Username,
) -> Result<UserRecord, ConflictableTransactionError<AppError>> {
    let bytes = tx
        .get(username.as_str().as_bytes())?
        .ok_or(ConflictableTransactionError::Abort(AppError::NotFound))?;
    decode(&bytes).map_err(|err| ConflictableTransactionError::Abort(AppError::Store(err)))
}

fn tx_put(
    tx: &TransactionalTree,
    record: &UserRecord,
) -> Result<(), ConflictableTransactionError<AppError>> {
    let bytes = serde_json::to_vec(record)
        .map_err(|err| ConflictableTransactionError::Abort(AppError::Store(err.into())))?;
    tx.insert(record.username.as_str().as_bytes(), bytes)?;
    Ok(())
}

fn run_tx(result: Result<(), TransactionError<AppError>>) -> Result<(), AppError> {
    match result {
        Ok(()) => Ok(()),
        Err(TransactionError::Abort(err)) => Err(err),
        Err(TransactionError::Storage(err)) => Err(AppError::Store(err.into())),
    }
}

impl UserStore for SledUserStore {
    fn create_user(&self, record: &UserRecord) -> Result<bool, StoreError> {
        let bytes = serde_json::to_vec(record)?;
        let swap = self.tree.compare_and_swap(
            record.username.as_str().as_bytes(),
            None as Option<&[u8]>,
            Some(bytes),
        )?;
        Ok(swap.is_ok())
    }

    fn get_user(&self, username: &Username) -> Result<Option<UserRecord>, StoreError> {
        match self.tree.get(username.as_str().as_bytes())? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn usernames(&self) -> Result<Vec<Username>, StoreError> {
        let mut out = Vec::new();
        for entry in self.tree.iter() {
            let (key, _) = entry?;
            out.push(Username::new(String::from_utf8_lossy(&key).into_owned()));
        }
        Ok(out)
    }

    fn update_user(&self, username: &Username, op: &UserOp<'_>) -> Result<(), AppError> {
        run_tx(self.tree.transaction(|tx| {
            let mut record = tx_get(tx, username)?;
            op(&mut record).map_err(ConflictableTransactionError::Abort)?;
            tx_put(tx, &record)?;
            Ok(())
        }))
    }

    fn update_pair(&self, a: &Username, b: &Username, op: &PairOp<'_>) -> Result<(), AppError> {
        run_tx(self.tree.transaction(|tx| {
            let mut record_a = tx_get(tx, a)?;
            let mut record_b = tx_get(tx, b)?;
            op(&mut record_a, &mut record_b).map_err(ConflictableTransactionError::Abort)?;
            tx_put(tx, &record_a)?;
            tx_put(tx, &record_b)?;
            Ok(())
        }))
    }
}

/// In-memory store with the same atomicity contract, for unit tests.
#[cfg(test)]
pub struct MemoryUserStore {
    users: std::sync::Mutex<std::collections::BTreeMap<String, UserRecord>>,
}

#[cfg(test)]
impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: std::sync::Mutex::new(std::collections::BTreeMap::new()),
        }
    }
}

#[cfg(test)]
impl UserStore for MemoryUserStore {
    fn create_user(&self, record: &UserRecord) -> Result<bool, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(record.username.as_str()) {
            return Ok(false);
        }
        users.insert(record.username.as_str().to_string(), record.clone());
        Ok(true)
    }

    fn get_user(&self, username: &Username) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.lock().unwrap().get(username.as_str()).cloned())
    }

    fn usernames(&self) -> Result<Vec<Username>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .keys()
            .map(|key| Username::new(key.clone()))
            .collect())
    }

    fn update_user(&self, username: &Username, op: &UserOp<'_>) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        let mut record = users
            .get(username.as_str())
            .cloned()
            .ok_or(AppError::NotFound)?;
        op(&mut record)?;
        users.insert(username.as_str().to_string(), record);
        Ok(())
    }

    fn update_pair(&self, a: &Username, b: &Username, op: &PairOp<'_>) -> Result<(), AppError> {
        let mut users = self.users.lock().unwrap();
        let mut record_a = users.get(a.as_str()).cloned().ok_or(AppError::NotFound)?;
        let mut record_b = users.get(b.as_str()).cloned().ok_or(AppError::NotFound)?;
        op(&mut record_a, &mut record_b)?;
        users.insert(a.as_str().to_string(), record_a);
        users.insert(b.as_str().to_string(), record_b);
        Ok(())
    }
}
