//! Generic JSON-backed record collection
//!
//! Every entity type is stored the same way: one JSON file holding the next
//! identifier to hand out and the list of records. The in-memory map is the
//! source of truth between loads, and every mutation rewrites the file before
//! returning. A failed write rolls the in-memory change back, so callers see
//! either the whole mutation or none of it.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::audit::EntityType;
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::RecordId;

use super::file_io::{read_json, stage_json, StagedFile};

/// A persisted entity with a store-assigned identifier
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: RecordId;

    /// Which entity this is, for audit entries and error messages
    const ENTITY: EntityType;

    fn id(&self) -> Self::Id;

    fn set_id(&mut self, id: Self::Id);

    /// Something a person recognizes the record by
    fn label(&self) -> String;
}

/// On-disk layout of a collection file
#[derive(Debug, Deserialize)]
struct CollectionFile<T> {
    #[serde(default)]
    next_id: u64,
    #[serde(default = "Vec::new")]
    records: Vec<T>,
}

impl<T> Default for CollectionFile<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: Vec::new(),
        }
    }
}

/// Borrowed form of `CollectionFile` used for writing
#[derive(Serialize)]
struct CollectionFileRef<'a, T> {
    next_id: u64,
    records: Vec<&'a T>,
}

struct State<T: Record> {
    next_id: u64,
    records: HashMap<T::Id, T>,
}

impl<T: Record> State<T> {
    fn empty() -> Self {
        Self {
            next_id: 1,
            records: HashMap::new(),
        }
    }

    /// Build state from raw records, numbering any that have no id yet
    fn from_records(records: Vec<T>, next_id_hint: u64) -> BackofficeResult<Self> {
        let mut seen = HashSet::new();
        for record in records.iter().filter(|r| !r.id().is_unassigned()) {
            if !seen.insert(record.id()) {
                return Err(BackofficeError::Validation(format!(
                    "Duplicate {} id: {}",
                    T::ENTITY.name().to_lowercase(),
                    record.id()
                )));
            }
        }

        let highest = seen.iter().map(|id| id.raw()).max().unwrap_or(0);
        let mut next_id = next_id_hint.max(highest + 1).max(1);

        let mut map = HashMap::with_capacity(records.len());
        for mut record in records {
            if record.id().is_unassigned() {
                record.set_id(T::Id::from_raw(next_id));
                next_id += 1;
            }
            map.insert(record.id(), record);
        }

        Ok(Self {
            next_id,
            records: map,
        })
    }

    fn to_file(&self) -> CollectionFileRef<'_, T> {
        let mut records: Vec<&T> = self.records.values().collect();
        records.sort_by_key(|r| r.id());
        CollectionFileRef {
            next_id: self.next_id,
            records,
        }
    }
}

/// A replacement collection written to a temp file, not yet live
#[must_use = "a staged replacement does nothing until committed"]
pub struct StagedCollection<T: Record> {
    file: StagedFile,
    state: State<T>,
}

impl<T: Record> StagedCollection<T> {
    /// Number of records that will be live after commit
    pub fn len(&self) -> usize {
        self.state.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.records.is_empty()
    }

    pub fn discard(self) {
        self.file.discard();
    }

    /// The staged file alone, for committing together with other collections
    ///
    /// The in-memory state is dropped; reload the collection after commit.
    pub fn into_file(self) -> StagedFile {
        self.file
    }
}

/// Repository for one entity type
pub struct JsonCollection<T: Record> {
    path: PathBuf,
    state: RwLock<State<T>>,
}

impl<T: Record> JsonCollection<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: RwLock::new(State::empty()),
        }
    }

    fn read(&self) -> BackofficeResult<RwLockReadGuard<'_, State<T>>> {
        self.state
            .read()
            .map_err(|e| BackofficeError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> BackofficeResult<RwLockWriteGuard<'_, State<T>>> {
        self.state
            .write()
            .map_err(|e| BackofficeError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn persist(&self, state: &State<T>) -> BackofficeResult<()> {
        stage_json(&self.path, &state.to_file())?.commit()
    }

    fn not_found(id: T::Id) -> BackofficeError {
        BackofficeError::NotFound {
            entity_type: T::ENTITY.name(),
            identifier: id.to_string(),
        }
    }

    /// Load the collection from disk, replacing what is in memory
    pub fn load(&self) -> BackofficeResult<()> {
        let file: CollectionFile<T> = read_json(&self.path)?;
        let loaded = State::from_records(file.records, file.next_id).map_err(|e| {
            BackofficeError::Storage(format!("{} in {}", e, self.path.display()))
        })?;

        *self.write()? = loaded;
        Ok(())
    }

    /// Get a record by id
    pub fn get(&self, id: T::Id) -> BackofficeResult<Option<T>> {
        Ok(self.read()?.records.get(&id).cloned())
    }

    /// All records, ordered by id
    pub fn get_all(&self) -> BackofficeResult<Vec<T>> {
        let state = self.read()?;
        let mut records: Vec<T> = state.records.values().cloned().collect();
        records.sort_by_key(|r| r.id());
        Ok(records)
    }

    /// Records matching a predicate, ordered by id
    pub fn filter<P>(&self, predicate: P) -> BackofficeResult<Vec<T>>
    where
        P: Fn(&T) -> bool,
    {
        let state = self.read()?;
        let mut records: Vec<T> = state
            .records
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.id());
        Ok(records)
    }

    /// Number of records matching a predicate
    pub fn count_where<P>(&self, predicate: P) -> BackofficeResult<usize>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self.read()?.records.values().filter(|r| predicate(r)).count())
    }

    pub fn count(&self) -> BackofficeResult<usize> {
        Ok(self.read()?.records.len())
    }

    /// Insert a new record under the next free id
    ///
    /// `build` receives the assigned id. The file is rewritten before this
    /// returns.
    pub fn insert_with<F>(&self, build: F) -> BackofficeResult<T>
    where
        F: FnOnce(T::Id) -> T,
    {
        let mut state = self.write()?;
        let id = T::Id::from_raw(state.next_id);

        let mut record = build(id);
        record.set_id(id);

        state.records.insert(id, record.clone());
        state.next_id += 1;

        if let Err(e) = self.persist(&state) {
            state.records.remove(&id);
            state.next_id -= 1;
            return Err(e);
        }

        Ok(record)
    }

    /// Overwrite an existing record, returning the previous version
    pub fn replace(&self, record: T) -> BackofficeResult<T> {
        let id = record.id();
        let mut state = self.write()?;

        let slot = state.records.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        let previous = std::mem::replace(slot, record);

        if let Err(e) = self.persist(&state) {
            state.records.insert(id, previous);
            return Err(e);
        }

        Ok(previous)
    }

    /// Remove a record, returning it
    pub fn remove(&self, id: T::Id) -> BackofficeResult<T> {
        let mut state = self.write()?;
        let removed = state.records.remove(&id).ok_or_else(|| Self::not_found(id))?;

        if let Err(e) = self.persist(&state) {
            state.records.insert(id, removed);
            return Err(e);
        }

        Ok(removed)
    }

    /// Validate and write a full replacement to a temp file
    ///
    /// Ids already present are kept; records without one are numbered after
    /// the highest id in the set. Live data is untouched until
    /// [`commit_replace`](Self::commit_replace).
    pub fn stage_replace(&self, records: Vec<T>) -> BackofficeResult<StagedCollection<T>> {
        let state = State::from_records(records, 1)?;
        let file = stage_json(&self.path, &state.to_file())?;
        Ok(StagedCollection { file, state })
    }

    /// Make a staged replacement live
    pub fn commit_replace(&self, staged: StagedCollection<T>) -> BackofficeResult<()> {
        let StagedCollection { file, state } = staged;
        file.commit()?;
        *self.write()? = state;
        Ok(())
    }
}
