/// Session persistence: the signed-in user stored in sled under one key
use crate::error::{ChatError, Result};
use crate::types::User;
use std::path::Path;

const USER_KEY: &[u8] = b"user";

pub struct SessionStore {
    db: sled::Db,
}

impl SessionStore {
    /// Open (or create) the session store under `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        let db = sled::open(data_dir.join("session.db"))
            .map_err(|e| ChatError::Storage(format!("session DB: {}", e)))?;
        Ok(Self { db })
    }

    /// Persist the user; called on successful sign-in
    pub fn save(&self, user: &User) -> Result<()> {
        let val = serde_json::to_vec(user).map_err(ChatError::Serialization)?;
        self.db
            .insert(USER_KEY, val)
            .map_err(|e| ChatError::Storage(format!("save session: {}", e)))?;
        Ok(())
    }

    /// Load the persisted user, if any; called once at startup
    pub fn load(&self) -> Result<Option<User>> {
        match self
            .db
            .get(USER_KEY)
            .map_err(|e| ChatError::Storage(format!("load session: {}", e)))?
        {
            Some(val) => {
                let user = serde_json::from_slice::<User>(&val).map_err(ChatError::Serialization)?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    /// Remove the persisted user; called on sign-out
    pub fn clear(&self) -> Result<bool> {
        let removed = self
            .db
            .remove(USER_KEY)
            .map_err(|e| ChatError::Storage(format!("clear session: {}", e)))?;
        Ok(removed.is_some())
    }
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self { db: self.db.clone() }
    }
}
