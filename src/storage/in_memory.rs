//! Thread-safe in-memory store for one SCIM resource type.
//!
//! [`ResourceStore`] keeps records in a `HashMap` keyed by id, a secondary
//! index from the schema's unique lookup value (userName for users) to id, and
//! a sequence map that preserves insertion order for listing. All three live
//! behind one tokio `RwLock`, so every operation observes and produces a
//! consistent snapshot.
//!
//! # Performance Characteristics
//!
//! * CREATE/GET/DELETE/UPDATE: O(1) average case, plus O(log n) for the order map
//! * FIND by lookup attribute: O(1) through the unique index
//! * FIND without a filter: O(n)
//!
//! # Example Usage
//!
//! ```rust
//! use scim_resource_store::filter::FilterExpression;
//! use scim_resource_store::resource::User;
//! use scim_resource_store::storage::{PageRequest, ResourceStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let users = ResourceStore::<User>::new();
//! users.create(User::new("jcoder1")).await?;
//! users.create(User::new("jcoder2")).await?;
//!
//! let found = users
//!     .find(
//!         Some(&FilterExpression::eq("userName", "jcoder2")),
//!         &PageRequest::default(),
//!     )
//!     .await?;
//! assert_eq!(found.total_results, 1);
//! # Ok(())
//! # }
//! ```

use super::{FilterResponse, PageRequest, Update, UpdateRequest};
use crate::error::{ScimError, ScimResult};
use crate::filter::{FilterEvaluator, FilterExpression, LookupSource};
use crate::patch::PatchApplier;
use crate::resource::{Record, VersionConflict, Versioned};
use log::{debug, info, trace, warn};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory store for records of type `T`.
///
/// Cloning the store yields another handle to the same data.
#[derive(Clone)]
pub struct ResourceStore<T> {
    state: Arc<RwLock<State<T>>>,
}

struct Entry<T> {
    // Position in insertion order; kept when the id changes
    seq: u64,
    versioned: Versioned<T>,
}

struct State<T> {
    entries: HashMap<String, Entry<T>>,
    order: BTreeMap<u64, String>,
    // lookup value -> id
    unique_index: HashMap<String, String>,
    next_seq: u64,
}

impl<T> Default for State<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            order: BTreeMap::new(),
            unique_index: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T: Record> State<T> {
    /// Fail if `record`'s lookup value is held by a record other than `owner`.
    fn check_unique(&self, record: &T, owner: Option<&str>) -> ScimResult<()> {
        let Some(value) = record.lookup_key() else {
            return Ok(());
        };
        match self.unique_index.get(value) {
            Some(holder) if Some(holder.as_str()) != owner => {
                let attribute = T::schema()
                    .unique_attribute()
                    .map(|attr| attr.name.clone())
                    .unwrap_or_default();
                warn!(
                    "Rejecting {} with duplicate {} '{}' (held by {})",
                    T::RESOURCE_TYPE,
                    attribute,
                    value,
                    holder
                );
                Err(ScimError::DuplicateAttribute {
                    resource_type: T::RESOURCE_TYPE.to_string(),
                    attribute,
                    value: value.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    fn insert(&mut self, id: String, seq: u64, versioned: Versioned<T>) {
        if let Some(value) = versioned.record().lookup_key() {
            self.unique_index.insert(value.to_string(), id.clone());
        }
        self.order.insert(seq, id.clone());
        self.entries.insert(id, Entry { seq, versioned });
    }

    fn remove(&mut self, id: &str) -> Option<Entry<T>> {
        let entry = self.entries.remove(id)?;
        self.order.remove(&entry.seq);
        if let Some(value) = entry.versioned.record().lookup_key() {
            if self.unique_index.get(value).is_some_and(|holder| holder == id) {
                self.unique_index.remove(value);
            }
        }
        Some(entry)
    }

    fn ordered_records(&self) -> Vec<T> {
        self.order
            .values()
            .filter_map(|id| self.entries.get(id))
            .map(|entry| entry.versioned.record().clone())
            .collect()
    }
}

impl<T: Record> LookupSource<T> for State<T> {
    fn find_by_lookup_key(&self, value: &str) -> Option<T> {
        self.unique_index
            .get(value)
            .and_then(|id| self.entries.get(id))
            .map(|entry| entry.versioned.record().clone())
    }
}

impl<T: Record> ResourceStore<T> {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
        }
    }

    /// Store a new record, assigning a UUID v4 id when the record has none.
    ///
    /// Returns the stored record including its id.
    ///
    /// # Errors
    ///
    /// * [`ScimError::Conflict`] - a record with the same id already exists
    /// * [`ScimError::DuplicateAttribute`] - the unique lookup value is taken
    pub async fn create(&self, mut record: T) -> ScimResult<T> {
        let id = match record.id() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let id = Uuid::new_v4().to_string();
                record.set_id(id.clone());
                id
            }
        };

        let mut guard = self.state.write().await;
        let state = &mut *guard;

        if state.entries.contains_key(&id) {
            warn!("Rejecting create of {} '{}': id exists", T::RESOURCE_TYPE, id);
            return Err(ScimError::conflict(T::RESOURCE_TYPE, id));
        }
        state.check_unique(&record, None)?;

        let versioned = Versioned::new(record.clone())?;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.insert(id.clone(), seq, versioned);

        info!("Created {} '{}'", T::RESOURCE_TYPE, id);
        trace!(
            "{} '{}' = {}",
            T::RESOURCE_TYPE,
            id,
            serde_json::to_string(&record).unwrap_or_default()
        );
        Ok(record)
    }

    /// Copy of the record stored under `id`, or `None`.
    pub async fn get(&self, id: &str) -> Option<T> {
        self.get_versioned(id).await.map(Versioned::into_record)
    }

    /// Copy of the record stored under `id` together with its metadata.
    pub async fn get_versioned(&self, id: &str) -> Option<Versioned<T>> {
        let state = self.state.read().await;
        let found = state.entries.get(id).map(|entry| entry.versioned.clone());
        debug!(
            "Get {} '{}': {}",
            T::RESOURCE_TYPE,
            id,
            if found.is_some() { "found" } else { "not found" }
        );
        found
    }

    /// Remove the record stored under `id`. Returns whether one was removed.
    pub async fn delete(&self, id: &str) -> bool {
        let mut state = self.state.write().await;
        match state.remove(id) {
            Some(_) => {
                info!("Deleted {} '{}'", T::RESOURCE_TYPE, id);
                true
            }
            None => {
                debug!("Delete of absent {} '{}' ignored", T::RESOURCE_TYPE, id);
                false
            }
        }
    }

    /// Replace or patch the record stored under `request.id`.
    ///
    /// If the resulting record carries no id it takes `request.id`. If it
    /// carries a different id, the record moves to that key and keeps its
    /// position in the listing order.
    ///
    /// # Errors
    ///
    /// * [`ScimError::NotFound`] - nothing is stored under `request.id`
    /// * [`ScimError::PreconditionFailed`] - `expected_version` is stale
    /// * [`ScimError::Conflict`] - the new id is held by another record
    /// * [`ScimError::DuplicateAttribute`] - the unique lookup value is taken
    /// * any error of [`PatchApplier::apply`]
    pub async fn update(&self, request: UpdateRequest<T>) -> ScimResult<T> {
        let UpdateRequest {
            id,
            update,
            expected_version,
        } = request;

        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let Some(entry) = state.entries.get(&id) else {
            warn!("Rejecting update of absent {} '{}'", T::RESOURCE_TYPE, id);
            return Err(ScimError::not_found(T::RESOURCE_TYPE, id));
        };

        if let Some(expected) = expected_version {
            let current = entry.versioned.version();
            if expected != *current {
                warn!(
                    "Rejecting update of {} '{}': version {} is stale",
                    T::RESOURCE_TYPE,
                    id,
                    expected
                );
                return Err(VersionConflict::standard_message(expected, current.clone()).into());
            }
        }

        let mut record = match update {
            Update::Replace(record) => record,
            Update::Patch {
                original,
                operations,
            } => PatchApplier::for_record::<T>().apply(&original, &operations)?,
        };

        let new_id = match record.id() {
            Some(new_id) if !new_id.is_empty() => new_id.to_string(),
            _ => {
                record.set_id(id.clone());
                id.clone()
            }
        };
        if new_id != id && state.entries.contains_key(&new_id) {
            warn!(
                "Rejecting rename of {} '{}' to '{}': id exists",
                T::RESOURCE_TYPE,
                id,
                new_id
            );
            return Err(ScimError::conflict(T::RESOURCE_TYPE, new_id));
        }
        state.check_unique(&record, Some(&id))?;

        let versioned = entry.versioned.replace(record.clone())?;
        let seq = entry.seq;
        state.remove(&id);
        state.insert(new_id.clone(), seq, versioned);

        if new_id == id {
            info!("Updated {} '{}'", T::RESOURCE_TYPE, id);
        } else {
            info!("Updated {} '{}' (now '{}')", T::RESOURCE_TYPE, id, new_id);
        }
        Ok(record)
    }

    /// List records, optionally restricted by a filter, one page at a time.
    ///
    /// Without a filter every record is returned in insertion order and
    /// `total_results` is the store size. With a filter `total_results` is the
    /// number of matches. The page is cut after the total is computed.
    ///
    /// # Errors
    ///
    /// * [`ScimError::UnsupportedFilter`] - the filter shape is not supported
    pub async fn find(
        &self,
        filter: Option<&FilterExpression>,
        page: &PageRequest,
    ) -> ScimResult<FilterResponse<T>> {
        let state = self.state.read().await;
        let matches = match filter {
            None => state.ordered_records(),
            Some(expression) => FilterEvaluator::for_schema(T::schema()).evaluate(&*state, expression)?,
        };
        drop(state);

        let total = matches.len();
        let resources = page.slice(matches);
        debug!(
            "Find {}: {} of {} result(s) (startIndex {})",
            T::RESOURCE_TYPE,
            resources.len(),
            total,
            page.start_index
        );
        Ok(FilterResponse::new(resources, total, *page))
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remove all records (useful for testing).
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        *state = State::default();
        info!("Cleared {} store", T::RESOURCE_TYPE);
    }
}

impl<T: Record> Default for ResourceStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
