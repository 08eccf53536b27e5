use std::cmp::min;

use crate::types::StateId;

#[derive(Clone)]
struct Entry<T> {
    value: Option<T>,
    generation: u32,
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self {
            value: None,
            generation: 0,
        }
    }
}

/// Slot arena addressed by generation-checked [`StateId`] handles.
pub struct Storage<T> {
    data: Vec<Entry<T>>,
    /// Index of the first *possibly* free (non-occupied) cell.
    min_free: usize,
    /// Number of occupied cells.
    real_size: usize,
}

impl<T> Default for Storage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Storage<T> {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            min_free: 0,
            real_size: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }
    pub fn len(&self) -> usize {
        self.real_size
    }
    pub fn is_empty(&self) -> bool {
        self.real_size == 0
    }

    fn slot(&self, id: StateId) -> Option<&Entry<T>> {
        self.data
            .get(id.index())
            .filter(|entry| entry.generation == id.generation() && entry.value.is_some())
    }

    pub fn contains(&self, id: StateId) -> bool {
        self.slot(id).is_some()
    }

    pub fn get(&self, id: StateId) -> Option<&T> {
        self.slot(id).and_then(|entry| entry.value.as_ref())
    }

    pub fn get_mut(&mut self, id: StateId) -> Option<&mut T> {
        match self.data.get_mut(id.index()) {
            Some(entry) if entry.generation == id.generation() => entry.value.as_mut(),
            _ => None,
        }
    }

    fn alloc(&mut self) -> usize {
        let index = (self.min_free..self.data.len())
            .find(|&i| self.data[i].value.is_none())
            .unwrap_or_else(|| {
                self.data.push(Entry::default());
                self.data.len() - 1
            });

        self.min_free = index + 1;
        self.real_size += 1;

        index
    }

    pub fn add(&mut self, value: T) -> StateId {
        let index = self.alloc();

        let entry = &mut self.data[index];
        entry.value = Some(value);

        StateId::new(index, entry.generation)
    }

    pub fn remove(&mut self, id: StateId) -> Option<T> {
        let entry = self.data.get_mut(id.index())?;
        if entry.generation != id.generation() {
            return None;
        }
        let value = entry.value.take()?;

        // Invalidate outstanding handles to this slot.
        entry.generation = entry.generation.wrapping_add(1);
        self.min_free = min(self.min_free, id.index());
        self.real_size -= 1;

        Some(value)
    }

    pub fn clear(&mut self) {
        for entry in self.data.iter_mut() {
            if entry.value.take().is_some() {
                entry.generation = entry.generation.wrapping_add(1);
            }
        }
        self.min_free = 0;
        self.real_size = 0;
    }

    /// Iterate over occupied cells in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &T)> + '_ {
        self.data.iter().enumerate().filter_map(|(i, entry)| {
            entry
                .value
                .as_ref()
                .map(|value| (StateId::new(i, entry.generation), value))
        })
    }
}
