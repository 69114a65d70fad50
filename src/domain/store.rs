// Fixed-capacity generational slot storage for entities.
//
// Slot indices double as wire ids, so `insert` always reuses the lowest free
// slot. Each slot carries a generation that bumps on removal; a `Handle` taken
// before the removal no longer resolves.

use std::fmt;
use std::marker::PhantomData;

pub struct Handle<T> {
    index: u16,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

// Manual impls: derives would add `T: Clone` etc. bounds.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> std::hash::Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

pub struct EntityStore<T> {
    slots: Vec<Slot<T>>,
    len: usize,
}

impl<T> EntityStore<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(u16::MAX as usize);
        let slots = (0..capacity)
            .map(|_| Slot {
                generation: 0,
                value: None,
            })
            .collect();
        Self { slots, len: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores `value` in the lowest free slot. Returns `None` when full.
    pub fn insert(&mut self, value: T) -> Option<Handle<T>> {
        let index = self.slots.iter().position(|s| s.value.is_none())?;
        let slot = &mut self.slots[index];
        slot.value = Some(value);
        self.len += 1;
        Some(Handle {
            index: index as u16,
            generation: slot.generation,
            _marker: PhantomData,
        })
    }

    /// Frees the slot behind `handle`, invalidating every copy of it.
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        let slot = self.slots.get(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_some()
    }

    /// Handle for the live value at `index`, if any.
    pub fn handle_at(&self, index: usize) -> Option<Handle<T>> {
        let slot = self.slots.get(index)?;
        slot.value.as_ref().map(|_| Handle {
            index: index as u16,
            generation: slot.generation,
            _marker: PhantomData,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.value.as_ref().map(|v| {
                (
                    Handle {
                        index: i as u16,
                        generation: s.generation,
                        _marker: PhantomData,
                    },
                    v,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle<T>, &mut T)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(i, s)| {
            let generation = s.generation;
            s.value.as_mut().map(|v| {
                (
                    Handle {
                        index: i as u16,
                        generation,
                        _marker: PhantomData,
                    },
                    v,
                )
            })
        })
    }

    /// Snapshot of live handles, for loops that need `get_mut` on other entries.
    pub fn handles(&self) -> Vec<Handle<T>> {
        self.iter().map(|(h, _)| h).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_lowest_free_slot() {
        let mut store = EntityStore::with_capacity(4);
        let a = store.insert("a").unwrap();
        let b = store.insert("b").unwrap();
        assert_eq!((a.index(), b.index()), (0, 1));

        store.remove(a);
        let c = store.insert("c").unwrap();
        assert_eq!(c.index(), 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn stale_handles_do_not_resolve() {
        let mut store = EntityStore::with_capacity(2);
        let a = store.insert(1).unwrap();
        store.remove(a);
        let b = store.insert(2).unwrap();

        assert_eq!(a.index(), b.index());
        assert!(store.get(a).is_none());
        assert_eq!(store.get(b), Some(&2));
        assert!(store.remove(a).is_none());
    }

    #[test]
    fn full_store_rejects_insert() {
        let mut store = EntityStore::with_capacity(1);
        assert!(store.insert(()).is_some());
        assert!(store.insert(()).is_none());
    }
}
