//! # Environment
//!
//! The shared, thread-safe store of named lists and the single entry point for
//! commands. Every public method takes the same lock for its whole duration, so a
//! command runs atomically with respect to commands from other connections.
//!
//! Evaluation recurses into lookups and assignments while the lock is held. Rather
//! than a reentrant lock, the public methods lock once and hand the guarded
//! [`Bindings`] to `*_locked` helpers, which never lock again.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::ast::{AddressSet, Expression};
use crate::error::{Error, InternalResult};
use crate::eval::{Bindings, Evaluator};
use crate::parser::parse_statements;
use crate::persistence::ListStore;

pub const SAVE_COMMAND: &str = "!save";
pub const LOAD_COMMAND: &str = "!load";

pub const FILE_UNWRITABLE: &str = "File could not be created or written to";
pub const FILE_UNREADABLE: &str = "File doesn't exist, or couldn't be opened or read";
pub const FILE_UNPARSEABLE: &str = "File couldn't be parsed";

#[derive(Debug, Default)]
pub struct Environment {
    bindings: Mutex<Bindings>,
    store: ListStore,
}

impl Environment {
    /// An empty environment saving to and loading from the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: ListStore) -> Self {
        Self {
            bindings: Mutex::new(Bindings::new()),
            store,
        }
    }

    pub fn store(&self) -> &ListStore {
        &self.store
    }

    // `assign` commits with a single insert, so the table is consistent even if a
    // holder panicked.
    fn lock(&self) -> MutexGuard<'_, Bindings> {
        self.bindings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn assign(&self, name: &str, value: Expression) -> InternalResult<()> {
        let mut bindings = self.lock();
        Ok(bindings.assign(name, value)?)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains(name)
    }

    pub fn get(&self, name: &str) -> Option<Expression> {
        self.lock().get(name).cloned()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn names(&self) -> Vec<String> {
        self.lock().names()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Runs one line of input and returns the text to send back.
    ///
    /// `!save<file>` and `!load<file>` answer with an empty string on success or a
    /// fixed message on failure. Anything else is parsed and evaluated; the result
    /// is the evaluated set without its grouping parentheses.
    ///
    /// ```
    /// let env = norn::environment::Environment::new();
    /// assert_eq!(env.execute("a = a@a.com; a, c@c.com").unwrap(), "a@a.com, c@c.com");
    /// assert!(env.execute("a@a@a.com").is_err());
    /// ```
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn execute(&self, command: &str) -> InternalResult<String> {
        let mut bindings = self.lock();
        self.execute_locked(&mut bindings, command)
    }

    /// Writes every binding to `file`, then clears the environment.
    pub fn save(&self, file: &str) -> InternalResult<()> {
        let mut bindings = self.lock();
        self.save_locked(&mut bindings, file)
    }

    /// Runs the contents of `file` as one command, merging its definitions into the
    /// current bindings.
    pub fn load(&self, file: &str) -> InternalResult<()> {
        let mut bindings = self.lock();
        self.load_locked(&mut bindings, file)
    }

    fn execute_locked(&self, bindings: &mut Bindings, command: &str) -> InternalResult<String> {
        let trimmed = command.trim();
        if let Some(file) = trimmed.strip_prefix(SAVE_COMMAND) {
            return Ok(match self.save_locked(bindings, file) {
                Ok(()) => String::new(),
                Err(e) => {
                    warn!("save to {} failed: {}", file.trim(), e);
                    FILE_UNWRITABLE.to_string()
                }
            });
        }
        if let Some(file) = trimmed.strip_prefix(LOAD_COMMAND) {
            return Ok(match self.load_locked(bindings, file) {
                Ok(()) => String::new(),
                Err(Error::Persistence(e)) => {
                    warn!("load from {} failed: {}", file.trim(), e);
                    FILE_UNREADABLE.to_string()
                }
                Err(e) => {
                    warn!("load from {} failed: {}", file.trim(), e);
                    FILE_UNPARSEABLE.to_string()
                }
            });
        }

        let result = self.run_locked(bindings, command)?;
        let rendered = result
            .to_string()
            .replace(['(', ')'], "")
            .replace(";;", ";");
        debug!("{} => {}", command, rendered);
        Ok(rendered)
    }

    /// Parses all of `text` up front, then evaluates its statements in order and
    /// returns the value of the last one.
    fn run_locked(&self, bindings: &mut Bindings, text: &str) -> InternalResult<AddressSet> {
        let statements = parse_statements(text)?;
        let mut evaluator = Evaluator::new();
        let mut result = AddressSet::new();
        for statement in &statements {
            result = evaluator.evaluate(statement, bindings)?;
        }
        Ok(result)
    }

    fn save_locked(&self, bindings: &mut Bindings, file: &str) -> InternalResult<()> {
        self.store.write(file, bindings)?;
        info!("saved {} lists to {}", bindings.len(), file.trim());
        bindings.clear();
        Ok(())
    }

    fn load_locked(&self, bindings: &mut Bindings, file: &str) -> InternalResult<()> {
        let command = self.store.read(file)?;
        self.run_locked(bindings, &command)?;
        info!("loaded {}, {} lists bound", file.trim(), bindings.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_execute_renders_without_parens() {
        let env = Environment::new();
        assert_eq!(env.execute("b@x, a@x").unwrap(), "a@x, b@x");
        assert_eq!(env.execute("").unwrap(), "");
        assert_eq!(env.execute("nobody").unwrap(), "");
    }

    #[test]
    fn test_execute_propagates_errors() {
        let env = Environment::new();
        assert!(env.execute("(a").unwrap_err().is_parse());

        env.execute("x = y").unwrap();
        assert!(env.execute("y = x").unwrap_err().is_cycle());
        assert!(!env.contains("y"));
    }

    #[test]
    fn test_save_clears_and_load_restores() {
        let dir = tempdir().unwrap();
        let env = Environment::with_store(ListStore::new(dir.path()));

        env.execute("list1 = a@a.com").unwrap();
        env.execute("list2 = b@b.com").unwrap();
        assert_eq!(env.execute("!save lists").unwrap(), "");
        assert!(env.is_empty());

        assert_eq!(env.execute("!load lists").unwrap(), "");
        assert_eq!(env.names(), vec!["list1".to_string(), "list2".to_string()]);
        assert_eq!(env.execute("list1").unwrap(), "a@a.com");
    }

    #[test]
    fn test_persistence_failures_are_messages() {
        let dir = tempdir().unwrap();
        let env = Environment::with_store(ListStore::new(dir.path()));

        assert_eq!(env.execute("!loadmissing").unwrap(), FILE_UNREADABLE);

        std::fs::write(dir.path().join("bad"), "x = (a@x\n").unwrap();
        assert_eq!(env.execute("!load bad").unwrap(), FILE_UNPARSEABLE);

        env.execute("keep = a@x").unwrap();
        assert_eq!(env.execute("!save no/such/dir").unwrap(), FILE_UNWRITABLE);
        assert!(env.contains("keep"));
    }
}
