use std::collections::HashSet;
use thiserror::Error;

use crate::environment::{EnvId, Environment};
use crate::value::Value;

/// Arena owning every environment frame.
///
/// Frames refer to their parents and functions refer to the frame they
/// captured by [`EnvId`], so reference cycles between a closure and its own
/// scope are plain index cycles. Cycles are only reclaimed by an explicit
/// [`Store::collect`]. Frames allocated inside an allocation scope are
/// released when the scope closes, unless something older still reaches them.
#[derive(Debug, Default)]
pub struct Store {
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
    scopes: Vec<AllocationScope>,
}

/// Frames allocated and frames written since a scope was opened.
#[derive(Debug, Default)]
struct AllocationScope {
    allocated: Vec<EnvId>,
    written: Vec<EnvId>,
}

#[derive(Debug)]
enum Slot {
    Occupied { generation: u32, env: Environment },
    Vacant { generation: u32 },
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    pub fn alloc(&mut self, env: Environment) -> EnvId {
        self.live += 1;

        let id = match self.free.pop() {
            Some(index) => {
                let generation = match &self.slots[index] {
                    Slot::Vacant { generation } => generation.wrapping_add(1),
                    Slot::Occupied { generation, .. } => generation.wrapping_add(1),
                };

                self.slots[index] = Slot::Occupied { generation, env };
                log::trace!("reused slot {} for env generation {}", index, generation);

                EnvId { index, generation }
            }
            None => {
                let index = self.slots.len();
                self.slots.push(Slot::Occupied { generation: 0, env });
                log::trace!("allocated env slot {}", index);

                EnvId {
                    index,
                    generation: 0,
                }
            }
        };

        if let Some(scope) = self.scopes.last_mut() {
            scope.allocated.push(id);
        }

        id
    }

    /// Allocates an empty frame whose parent is `parent`.
    pub fn child(&mut self, parent: EnvId) -> Result<EnvId, StoreError> {
        self.get(parent)?;

        Ok(self.alloc(Environment::with_parent(parent)))
    }

    pub fn get(&self, id: EnvId) -> Result<&Environment, StoreError> {
        match self.slots.get(id.index) {
            Some(Slot::Occupied { generation, env }) if *generation == id.generation => Ok(env),
            _ => Err(StoreError::Dangling(id)),
        }
    }

    pub fn get_mut(&mut self, id: EnvId) -> Result<&mut Environment, StoreError> {
        if let Some(scope) = self.scopes.last_mut() {
            scope.written.push(id);
        }

        match self.slots.get_mut(id.index) {
            Some(Slot::Occupied { generation, env }) if *generation == id.generation => Ok(env),
            _ => Err(StoreError::Dangling(id)),
        }
    }

    pub fn is_live(&self, id: EnvId) -> bool {
        self.get(id).is_ok()
    }

    /// Binds `name` in the frame `id` itself, replacing a previous binding
    /// there. Bindings of the same name in ancestors are shadowed, not touched.
    pub fn define(
        &mut self,
        id: EnvId,
        name: impl Into<String>,
        value: Value,
    ) -> Result<(), StoreError> {
        self.get_mut(id)?.set(name.into(), value);

        Ok(())
    }

    /// Nearest binding of `name`, searching `id` and then its ancestors.
    pub fn lookup(&self, id: EnvId, name: &str) -> Result<Value, StoreError> {
        let owner = self.resolve(id, name)?;
        let env = self.get(owner)?;

        env.get(name)
            .cloned()
            .ok_or_else(|| StoreError::UnboundName(name.to_string()))
    }

    /// The frame that holds the binding `lookup` would return.
    pub fn resolve(&self, id: EnvId, name: &str) -> Result<EnvId, StoreError> {
        let mut current = Some(id);

        while let Some(id) = current {
            let env = self.get(id)?;

            if env.has(name) {
                return Ok(id);
            }

            current = env.parent();
        }

        Err(StoreError::UnboundName(name.to_string()))
    }

    pub fn has_local(&self, id: EnvId, name: &str) -> Result<bool, StoreError> {
        Ok(self.get(id)?.has(name))
    }

    pub fn parent(&self, id: EnvId) -> Result<Option<EnvId>, StoreError> {
        Ok(self.get(id)?.parent())
    }

    /// Number of frames in the chain starting at `id`, `id` included.
    pub fn depth(&self, id: EnvId) -> Result<usize, StoreError> {
        let mut depth = 0;
        let mut current = Some(id);

        while let Some(id) = current {
            depth += 1;
            current = self.get(id)?.parent();
        }

        Ok(depth)
    }

    /// Number of live frames.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Starts recording the frames allocated and written from now on.
    pub fn open_scope(&mut self) {
        self.scopes.push(AllocationScope::default());
    }

    /// Closes the innermost scope and frees the frames it allocated that
    /// neither `kept` nor a frame written while it was open can reach.
    /// Survivors are handed to the enclosing scope. Returns how many frames
    /// were freed.
    pub fn close_scope(&mut self, kept: &Value) -> usize {
        let Some(scope) = self.scopes.pop() else {
            return 0;
        };

        let candidates: HashSet<EnvId> = scope
            .allocated
            .into_iter()
            .filter(|id| self.is_live(*id))
            .collect();

        let written: HashSet<EnvId> = scope
            .written
            .into_iter()
            .filter(|id| self.is_live(*id) && !candidates.contains(id))
            .collect();

        let mut pending = vec![];
        kept.trace(&mut pending);

        for id in &written {
            if let Ok(env) = self.get(*id) {
                env.values().for_each(|value| value.trace(&mut pending));
            }
        }

        let mut reached = HashSet::new();

        while let Some(id) = pending.pop() {
            if !candidates.contains(&id) || !reached.insert(id) {
                continue;
            }

            if let Ok(env) = self.get(id) {
                pending.extend(env.parent());
                env.values().for_each(|value| value.trace(&mut pending));
            }
        }

        let mut freed = 0;

        for id in &candidates {
            if !reached.contains(id) {
                self.release(*id);
                freed += 1;
            }
        }

        if let Some(enclosing) = self.scopes.last_mut() {
            enclosing.allocated.extend(reached);
            enclosing.written.extend(written);
        }

        freed
    }

    fn release(&mut self, id: EnvId) {
        self.slots[id.index] = Slot::Vacant {
            generation: id.generation,
        };
        self.free.push(id.index);
        self.live -= 1;
    }

    /// Frees every frame not reachable from `roots` or from a function held
    /// by `values`, returning how many were freed.
    pub fn collect<'a>(
        &mut self,
        roots: impl IntoIterator<Item = EnvId>,
        values: impl IntoIterator<Item = &'a Value>,
    ) -> usize {
        let mut marked = vec![false; self.slots.len()];
        let mut pending: Vec<EnvId> = roots.into_iter().collect();

        for value in values {
            value.trace(&mut pending);
        }

        while let Some(id) = pending.pop() {
            let Ok(env) = self.get(id) else {
                continue;
            };

            if marked[id.index] {
                continue;
            }

            marked[id.index] = true;

            if let Some(parent) = env.parent() {
                pending.push(parent);
            }

            for value in env.values() {
                value.trace(&mut pending);
            }
        }

        let mut freed = 0;

        for (index, slot) in self.slots.iter_mut().enumerate() {
            if let Slot::Occupied { generation, .. } = slot {
                if !marked[index] {
                    *slot = Slot::Vacant {
                        generation: *generation,
                    };
                    self.free.push(index);
                    freed += 1;
                }
            }
        }

        self.live -= freed;

        freed
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("'{0}' is not defined")]
    UnboundName(String),

    #[error("environment {0} has been reclaimed")]
    Dangling(EnvId),
}
