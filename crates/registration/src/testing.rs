//! In-memory collaborators that record what the workflow asked of them.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use net::{EquipmentCode, Notifier, NotifyError};
use storage::{DbErr, PlayerRepository, StorageError};

#[derive(Default)]
struct PlayersInner {
    rows: BTreeMap<i32, String>,
    lookups: usize,
    writes: usize,
    schema_calls: usize,
    fail: bool,
}

#[derive(Default)]
pub struct FakePlayers {
    inner: Mutex<PlayersInner>,
}

impl FakePlayers {
    pub fn seed(&self, id: i32, codename: &str) {
        self.inner.lock().unwrap().rows.insert(id, codename.to_owned());
    }

    pub fn fail(&self, fail: bool) {
        self.inner.lock().unwrap().fail = fail;
    }

    pub fn rows(&self) -> Vec<(i32, String)> {
        let inner = self.inner.lock().unwrap();
        inner.rows.iter().map(|(id, c)| (*id, c.clone())).collect()
    }

    pub fn lookups(&self) -> usize {
        self.inner.lock().unwrap().lookups
    }

    pub fn writes(&self) -> usize {
        self.inner.lock().unwrap().writes
    }

    pub fn schema_calls(&self) -> usize {
        self.inner.lock().unwrap().schema_calls
    }

    fn check(inner: &PlayersInner) -> Result<(), StorageError> {
        if inner.fail {
            return Err(StorageError::Connect(DbErr::Custom("connection refused".into())));
        }
        Ok(())
    }
}

#[async_trait]
impl PlayerRepository for FakePlayers {
    async fn ensure_schema(&self) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner)?;
        inner.schema_calls += 1;
        Ok(())
    }

    async fn find_codename(&self, id: i32) -> Result<Option<String>, StorageError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner)?;
        inner.lookups += 1;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn insert(&self, id: i32, codename: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner)?;
        if inner.rows.contains_key(&id) {
            return Err(StorageError::Query(DbErr::Custom("duplicate key".into())));
        }
        inner.writes += 1;
        inner.rows.insert(id, codename.to_owned());
        Ok(())
    }

    async fn update_codename(&self, id: i32, codename: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner)?;
        let Some(row) = inner.rows.get_mut(&id) else {
            return Err(StorageError::NotFound(id));
        };
        *row = codename.to_owned();
        inner.writes += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    sent: Mutex<Vec<(String, EquipmentCode)>>,
    fail: Mutex<bool>,
}

impl FakeNotifier {
    pub fn fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn sent(&self) -> Vec<(String, EquipmentCode)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, target_ip: &str, code: EquipmentCode) -> Result<(), NotifyError> {
        if *self.fail.lock().unwrap() {
            return Err(NotifyError::Send {
                target: target_ip.to_owned(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "network unreachable"),
            });
        }
        self.sent.lock().unwrap().push((target_ip.to_owned(), code));
        Ok(())
    }
}
