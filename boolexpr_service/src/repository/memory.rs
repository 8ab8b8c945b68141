use super::{ExpressionRepository, RepositoryError};
use crate::model::{Expression, ExpressionSnapshot};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default, Clone)]
struct State {
    expressions: BTreeMap<i64, String>,
    next_id: i64,
}

/// Thread-safe store, optionally mirrored to a JSON file after every change
#[derive(Debug)]
pub struct InMemoryRepository {
    state: RwLock<State>,
    store_path: Option<PathBuf>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::from_expressions(Vec::new())
    }

    pub fn from_expressions(expressions: Vec<Expression>) -> Self {
        let next_id = expressions.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let expressions = expressions
            .into_iter()
            .map(|e| (e.id, e.definition))
            .collect();
        Self {
            state: RwLock::new(State {
                expressions,
                next_id,
            }),
            store_path: None,
        }
    }

    /// Load `path` if it exists and write every change back to it
    pub fn open(path: &Path) -> Result<Self, RepositoryError> {
        let expressions = if path.exists() {
            let seed_error = |message: String| RepositoryError::Seed {
                path: path.display().to_string(),
                message,
            };
            let content = fs::read_to_string(path).map_err(|e| seed_error(e.to_string()))?;
            let snapshot: ExpressionSnapshot =
                serde_json::from_str(&content).map_err(|e| seed_error(e.to_string()))?;
            snapshot.expressions
        } else {
            Vec::new()
        };

        log::debug!("Loaded {} expressions from {}", expressions.len(), path.display());

        let mut repository = Self::from_expressions(expressions);
        repository.store_path = Some(path.to_path_buf());
        Ok(repository)
    }

    pub fn store_path(&self) -> Option<&Path> {
        self.store_path.as_deref()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, RepositoryError> {
        self.state
            .read()
            .map_err(|_| RepositoryError::storage("repository lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, RepositoryError> {
        self.state
            .write()
            .map_err(|_| RepositoryError::storage("repository lock poisoned"))
    }

    /// Apply `change` to a copy of the state; the copy replaces the live
    /// state only once it has been persisted.
    fn update<T>(
        &self,
        change: impl FnOnce(&mut State) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let mut state = self.write()?;
        let mut staged = state.clone();
        let value = change(&mut staged)?;
        self.persist(&staged)?;
        *state = staged;
        Ok(value)
    }

    fn persist(&self, state: &State) -> Result<(), RepositoryError> {
        let Some(path) = &self.store_path else {
            return Ok(());
        };
        let snapshot = ExpressionSnapshot::now(snapshot_of(state));
        let json = serde_json::to_string_pretty(&snapshot).map_err(RepositoryError::storage)?;
        fs::write(path, json).map_err(|e| {
            RepositoryError::storage(format!("writing {}: {}", path.display(), e))
        })
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn snapshot_of(state: &State) -> Vec<Expression> {
    state
        .expressions
        .iter()
        .map(|(id, definition)| Expression::new(*id, definition))
        .collect()
}

impl ExpressionRepository for InMemoryRepository {
    fn get_all_expressions(&self) -> Result<Vec<Expression>, RepositoryError> {
        Ok(snapshot_of(&*self.read()?))
    }

    fn get_expression_by_id(&self, id: i64) -> Result<Expression, RepositoryError> {
        self.read()?
            .expressions
            .get(&id)
            .map(|definition| Expression::new(id, definition))
            .ok_or(RepositoryError::NotFound { id })
    }

    fn create_expression(&self, definition: &str) -> Result<Expression, RepositoryError> {
        self.update(|state| {
            let id = state.next_id;
            state.expressions.insert(id, definition.to_string());
            state.next_id += 1;
            Ok(Expression::new(id, definition))
        })
    }

    fn save_expression(&self, id: i64, definition: &str) -> Result<Expression, RepositoryError> {
        self.update(|state| match state.expressions.get_mut(&id) {
            Some(existing) => {
                *existing = definition.to_string();
                Ok(Expression::new(id, definition))
            }
            None => Err(RepositoryError::NotFound { id }),
        })
    }

    fn delete_expression(&self, id: i64) -> Result<(), RepositoryError> {
        self.update(|state| match state.expressions.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound { id }),
        })
    }
}
