use std::any::Any;
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// Typed handle for a named blackboard entry.
///
/// The name is the storage key; the type parameter pins what may be stored under it. Two keys with
/// the same name but different types alias the same slot, and reading through the wrong one panics.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BbKey<T: 'static> {
    name: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> BbKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub fn name(self) -> &'static str {
        self.name
    }
}

/// Per-bot key/value store shared by every node of one behavior evaluation.
///
/// A missing entry means "unknown": `get` returns `None` and callers must not substitute a zero
/// value for it.
#[derive(Default)]
pub struct Blackboard {
    values: BTreeMap<&'static str, Box<dyn Any>>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains<T: 'static>(&self, key: BbKey<T>) -> bool {
        self.values.contains_key(key.name)
    }

    pub fn set<T: 'static>(&mut self, key: BbKey<T>, value: T) {
        self.values.insert(key.name, Box::new(value));
    }

    pub fn get<T: 'static>(&self, key: BbKey<T>) -> Option<&T> {
        let value = self.values.get(key.name)?;
        value
            .downcast_ref::<T>()
            .or_else(|| type_mismatch(key.name))
    }

    pub fn get_mut<T: 'static>(&mut self, key: BbKey<T>) -> Option<&mut T> {
        let value = self.values.get_mut(key.name)?;
        value
            .downcast_mut::<T>()
            .or_else(|| type_mismatch(key.name))
    }

    /// Return the entry under `key`, inserting `make()` first when it is missing.
    pub fn get_or_insert_with<T: 'static>(
        &mut self,
        key: BbKey<T>,
        make: impl FnOnce() -> T,
    ) -> &mut T {
        let value = self
            .values
            .entry(key.name)
            .or_insert_with(|| Box::new(make()));
        match value.downcast_mut::<T>() {
            Some(value) => value,
            None => panic!(
                "blackboard type mismatch for key `{}` (stored type differs from requested)",
                key.name
            ),
        }
    }

    pub fn remove<T: 'static>(&mut self, key: BbKey<T>) -> Option<T> {
        let value = self.values.remove(key.name)?;
        value
            .downcast::<T>()
            .map(|b| *b)
            .ok()
            .or_else(|| type_mismatch(key.name))
    }
}

fn type_mismatch<R>(name: &str) -> Option<R> {
    panic!("blackboard type mismatch for key `{name}` (stored type differs from requested)")
}
