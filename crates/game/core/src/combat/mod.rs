//! Combat resolution.
//!
//! Pure arithmetic (accuracy, jam chance, damage) plus the one shared state
//! mutation every damage source funnels through: [`apply_damage`], which owns
//! the death and cleanup policy. The attack action and damage cards both call
//! into this module; only the attack action rolls jam and accuracy.

pub mod damage;
pub mod hit;
pub mod result;

pub use damage::{DamageApplied, apply_damage, calculate_damage};
pub use hit::{check_hit, effective_accuracy, jam_probability};
pub use result::AttackOutcome;
