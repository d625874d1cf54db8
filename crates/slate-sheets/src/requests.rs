//! Request generations for asynchronous field updates
//!
//! Every request issued for a field gets a ticket carrying the field's new
//! generation number. When the response arrives it is applied only if no
//! newer request was issued (and the field was not cancelled) in between.

use std::collections::HashMap;
use std::hash::Hash;

/// Proof that a request was issued for a field at a given generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket<K> {
    field: K,
    generation: u64,
}

impl<K> RequestTicket<K> {
    /// The field the request was issued for
    pub fn field(&self) -> &K {
        &self.field
    }

    /// The generation the request was issued at
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of delivering a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// The response was the latest for its field and was applied
    Accepted,
    /// A newer request superseded this one; the response was dropped
    Stale,
}

/// Latest generation per field
#[derive(Debug, Clone)]
pub struct RequestGenerations<K> {
    generations: HashMap<K, u64>,
}

impl<K> Default for RequestGenerations<K> {
    fn default() -> Self {
        Self {
            generations: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> RequestGenerations<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a request for `field`, superseding any outstanding one
    pub fn issue(&mut self, field: K) -> RequestTicket<K> {
        let generation = self.bump(&field);
        RequestTicket { field, generation }
    }

    /// Invalidate every outstanding request for `field`
    pub fn cancel(&mut self, field: &K) {
        if self.generations.contains_key(field) {
            self.bump(field);
        }
    }

    /// Invalidate every outstanding request for every field
    pub fn cancel_all(&mut self) {
        for generation in self.generations.values_mut() {
            *generation += 1;
        }
    }

    /// Whether `ticket` is still the latest request for its field
    pub fn is_current(&self, ticket: &RequestTicket<K>) -> bool {
        self.generations.get(&ticket.field) == Some(&ticket.generation)
    }

    /// Apply a response only if its ticket is still current
    ///
    /// An accepted ticket is retired, so the same response is never applied twice.
    pub fn accept<T, F>(&mut self, ticket: &RequestTicket<K>, value: T, apply: F) -> Acceptance
    where
        F: FnOnce(T),
    {
        if self.is_current(ticket) {
            self.bump(&ticket.field);
            apply(value);
            Acceptance::Accepted
        } else {
            tracing::warn!(
                "dropping stale response (generation {} superseded)",
                ticket.generation
            );
            Acceptance::Stale
        }
    }

    fn bump(&mut self, field: &K) -> u64 {
        let generation = self.generations.entry(field.clone()).or_insert(0);
        *generation += 1;
        *generation
    }
}
