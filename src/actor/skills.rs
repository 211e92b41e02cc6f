//! Skill levels and practice
//!
//! Exercise accumulates per skill; each level needs `(level + 1)^2 * 100`
//! exercise to advance. Practice stops counting once the level reaches the
//! cap supplied by the activity.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::SkillId;

/// Level and accumulated exercise of one skill
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLevel {
    pub level: i32,
    pub exercise: i32,
}

impl SkillLevel {
    pub fn new(level: i32) -> Self {
        Self { level, exercise: 0 }
    }

    fn exercise_needed(&self) -> i32 {
        (self.level + 1) * (self.level + 1) * 100
    }
}

/// All skills of one character
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSet {
    skills: AHashMap<SkillId, SkillLevel>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, skill: impl Into<SkillId>, level: i32) -> Self {
        self.set_level(skill.into(), level);
        self
    }

    pub fn level(&self, skill: &SkillId) -> i32 {
        self.skills.get(skill).map(|s| s.level).unwrap_or(0)
    }

    /// Level of an optional skill; recipes without a skill count as level 0
    pub fn level_of(&self, skill: Option<&SkillId>) -> i32 {
        skill.map(|s| self.level(s)).unwrap_or(0)
    }

    pub fn set_level(&mut self, skill: SkillId, level: i32) {
        self.skills.entry(skill).or_default().level = level;
    }

    pub fn get(&self, skill: &SkillId) -> Option<&SkillLevel> {
        self.skills.get(skill)
    }

    /// Add exercise; returns true when a level was gained
    pub fn practice(&mut self, skill: &SkillId, amount: i32, cap: i32) -> bool {
        if amount <= 0 {
            return false;
        }
        let entry = self.skills.entry(skill.clone()).or_default();
        if entry.level >= cap {
            return false;
        }
        entry.exercise += amount;
        let mut gained = false;
        while entry.level < cap && entry.exercise >= entry.exercise_needed() {
            let needed = entry.exercise_needed();
            entry.exercise -= needed;
            entry.level += 1;
            gained = true;
        }
        if gained {
            tracing::debug!(skill = %skill, level = entry.level, "skill level gained");
        }
        gained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_skill_is_zero() {
        let skills = SkillSet::new();
        assert_eq!(skills.level(&SkillId::from("tailor")), 0);
        assert_eq!(skills.level_of(None), 0);
    }

    #[test]
    fn test_practice_levels_up() {
        let mut skills = SkillSet::new();
        let tailor = SkillId::from("tailor");
        assert!(!skills.practice(&tailor, 50, 5));
        assert!(skills.practice(&tailor, 50, 5));
        assert_eq!(skills.level(&tailor), 1);
        assert_eq!(skills.get(&tailor).map(|s| s.exercise), Some(0));
    }

    #[test]
    fn test_practice_respects_cap() {
        let mut skills = SkillSet::new().with("tailor", 3);
        let tailor = SkillId::from("tailor");
        assert!(!skills.practice(&tailor, 10_000, 3));
        assert_eq!(skills.level(&tailor), 3);
        assert_eq!(skills.get(&tailor).map(|s| s.exercise), Some(0));
    }
}
