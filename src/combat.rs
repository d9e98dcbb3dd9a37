//! Combat capability and a simple health roster.

use hashbrown::{HashMap, HashSet};
use log::{debug, info};

use crate::entity::EntityId;

/// Damage sink and liveness oracle consulted by the pursuit agent.
pub trait Combat {
    /// Applies `amount` damage to `target`.
    fn take_damage(&mut self, target: EntityId, amount: f32);
    /// Whether `id` still has hit points.
    fn is_alive(&self, id: EntityId) -> bool;
    /// Whether `id` currently takes part in the simulation.
    fn is_active(&self, id: EntityId) -> bool;
}

/// Hit points of one unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    /// Full health of `max` hit points.
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Remaining hit points as a fraction of the maximum.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            (self.current / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Whether any hit points remain.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Subtracts `amount` and reports whether this blow was fatal.
    ///
    /// # Examples
    /// ```
    /// use warden::combat::Health;
    /// let mut health = Health::new(10.0);
    /// assert!(!health.apply_damage(4.0));
    /// assert!(health.apply_damage(6.0));
    /// assert!(!health.apply_damage(1.0));
    /// ```
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.current = (self.current - amount.max(0.0)).max(0.0);
        !self.is_alive()
    }
}

/// Health table implementing [`Combat`].
///
/// Deaths are queued so the caller can reap the fallen after a tick.
#[derive(Debug, Default)]
pub struct CombatRoster {
    health: HashMap<EntityId, Health>,
    inactive: HashSet<EntityId>,
    fallen: Vec<EntityId>,
}

impl CombatRoster {
    /// Adds or replaces a combatant.
    pub fn insert(&mut self, id: EntityId, health: Health) {
        self.health.insert(id, health);
        self.inactive.remove(&id);
    }

    /// Removes a combatant.
    pub fn remove(&mut self, id: EntityId) -> Option<Health> {
        self.inactive.remove(&id);
        self.health.remove(&id)
    }

    /// Marks a combatant as taking part or not.
    pub fn set_active(&mut self, id: EntityId, active: bool) {
        if active {
            self.inactive.remove(&id);
        } else {
            self.inactive.insert(id);
        }
    }

    /// Health of `id`.
    #[must_use]
    pub fn health(&self, id: EntityId) -> Option<Health> {
        self.health.get(&id).copied()
    }

    /// Number of combatants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.health.len()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.health.is_empty()
    }

    /// Combatants that died since the last drain.
    pub fn drain_fallen(&mut self) -> std::vec::Drain<'_, EntityId> {
        self.fallen.drain(..)
    }
}

impl Combat for CombatRoster {
    fn take_damage(&mut self, target: EntityId, amount: f32) {
        let Some(health) = self.health.get_mut(&target) else {
            debug!("damage for unknown combatant {target} ignored");
            return;
        };
        if health.apply_damage(amount) {
            info!("{target} has fallen");
            self.fallen.push(target);
        }
    }

    fn is_alive(&self, id: EntityId) -> bool {
        self.health.get(&id).is_some_and(Health::is_alive)
    }

    fn is_active(&self, id: EntityId) -> bool {
        self.health.contains_key(&id) && !self.inactive.contains(&id)
    }
}
