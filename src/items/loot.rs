//! Loot generation system
//!
//! Handles drop gating, level scaling and weighted item selection against
//! the static item catalog.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::item::{ItemCatalog, ItemDefinition};

/// Lowest weight any eligible item can end up with
pub const MIN_ITEM_WEIGHT: f32 = 0.001;

/// Sampled response curve over [0, 1], linearly interpolated between points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<(f32, f32)>", into = "Vec<(f32, f32)>")]
pub struct LevelCurve {
    points: Vec<(f32, f32)>,
}

impl LevelCurve {
    /// Create a curve from control points; they are sorted by x
    pub fn new(mut points: Vec<(f32, f32)>) -> Self {
        points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        Self { points }
    }

    /// Full weight at an exact level match, fading to nothing at the range edge
    pub fn linear_falloff() -> Self {
        Self::new(vec![(0.0, 1.0), (1.0, 0.0)])
    }

    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }

    /// Sample at `t` (clamped to [0, 1]); output is clamped to [0, 1].
    /// An empty curve is neutral and samples as 1.0.
    pub fn sample(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return 1.0,
        };

        let value = if t <= first.0 {
            first.1
        } else if t >= last.0 {
            last.1
        } else {
            self.points
                .windows(2)
                .find(|pair| t >= pair[0].0 && t <= pair[1].0)
                .map(|pair| {
                    let (x0, y0) = pair[0];
                    let (x1, y1) = pair[1];
                    let span = x1 - x0;
                    if span <= f32::EPSILON {
                        y1
                    } else {
                        y0 + (y1 - y0) * (t - x0) / span
                    }
                })
                .unwrap_or(last.1)
        };

        value.clamp(0.0, 1.0)
    }
}

impl From<Vec<(f32, f32)>> for LevelCurve {
    fn from(points: Vec<(f32, f32)>) -> Self {
        Self::new(points)
    }
}

impl From<LevelCurve> for Vec<(f32, f32)> {
    fn from(curve: LevelCurve) -> Self {
        curve.points
    }
}

/// How a loot source picks its drops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootProfile {
    pub name: String,
    /// Maximum distance between an item's level and the effective level
    pub level_range: i32,
    pub level_offset: i32,
    pub item_level_multiplier: f32,
    pub item_level_bonus: i32,
    pub min_drops: u32,
    pub max_drops: u32,
    /// Chance (0-1) that the source drops anything at all
    pub drop_chance: f32,
    pub allow_higher_level: bool,
    pub allow_lower_level: bool,
    /// Item must carry at least one of these (ignored when empty)
    pub required_tags: BTreeSet<String>,
    /// Item must carry none of these
    pub excluded_tags: BTreeSet<String>,
    /// Weight multiplier per tag
    pub bonus_tags: BTreeMap<String, f32>,
    pub prefer_exact_level: bool,
    pub weight_falloff_rate: f32,
    pub level_curve: Option<LevelCurve>,
}

impl Default for LootProfile {
    fn default() -> Self {
        Self {
            name: String::from("default"),
            level_range: 5,
            level_offset: 0,
            item_level_multiplier: 1.0,
            item_level_bonus: 0,
            min_drops: 1,
            max_drops: 1,
            drop_chance: 1.0,
            allow_higher_level: true,
            allow_lower_level: true,
            required_tags: BTreeSet::new(),
            excluded_tags: BTreeSet::new(),
            bonus_tags: BTreeMap::new(),
            prefer_exact_level: false,
            weight_falloff_rate: 0.3,
            level_curve: None,
        }
    }
}

impl LootProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Level a roll actually targets after multiplier, bonus and offset
    pub fn effective_level(&self, target_level: i32) -> i32 {
        // Float to int casts saturate; keep the sums saturating too
        ((target_level as f32 * self.item_level_multiplier).floor() as i32)
            .saturating_add(self.item_level_bonus)
            .saturating_add(self.level_offset)
    }

    /// Level window that can contain eligible items for `effective_level`
    pub fn level_window(&self, effective_level: i32) -> (i32, i32) {
        let range = self.level_range.max(0);
        let lo = if self.allow_lower_level { effective_level.saturating_sub(range) } else { effective_level };
        let hi = if self.allow_higher_level { effective_level.saturating_add(range) } else { effective_level };
        (lo, hi)
    }

    /// Exact eligibility check for one item
    pub fn is_eligible(&self, item: &ItemDefinition, effective_level: i32) -> bool {
        let diff = level_diff(item, effective_level);

        if diff > 0 && !self.allow_higher_level {
            return false;
        }
        if diff < 0 && !self.allow_lower_level {
            return false;
        }
        if diff.abs() > i64::from(self.level_range) {
            return false;
        }
        if !self.required_tags.is_empty() && !self.required_tags.iter().any(|t| item.has_tag(t)) {
            return false;
        }
        !self.excluded_tags.iter().any(|t| item.has_tag(t))
    }

    /// Selection weight for an eligible item, finite and never below `MIN_ITEM_WEIGHT`
    pub fn item_weight(&self, item: &ItemDefinition, effective_level: i32) -> f32 {
        let distance = level_diff(item, effective_level).abs() as f32;
        let mut weight = item.base_weight;

        if self.prefer_exact_level {
            weight *= (-self.weight_falloff_rate * distance).exp();
        }

        if let Some(curve) = &self.level_curve {
            let t = if self.level_range > 0 {
                (distance / self.level_range as f32).clamp(0.0, 1.0)
            } else {
                0.0
            };
            weight *= curve.sample(t);
        }

        for tag in &item.tags {
            if let Some(multiplier) = self.bonus_tags.get(tag) {
                weight *= multiplier;
            }
        }

        if weight.is_nan() {
            return MIN_ITEM_WEIGHT;
        }
        weight.clamp(MIN_ITEM_WEIGHT, f32::MAX)
    }
}

/// Signed distance from the roll level to an item, wide enough to never overflow
fn level_diff(item: &ItemDefinition, effective_level: i32) -> i64 {
    i64::from(item.base_item_level) - i64::from(effective_level)
}

/// Named set of loot profiles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LootProfiles {
    pub profiles: Vec<LootProfile>,
}

impl LootProfiles {
    /// Find a profile by name
    pub fn find(&self, name: &str) -> Option<&LootProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }
}

/// One dropped item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropResult<'a> {
    pub item: &'a ItemDefinition,
    /// Effective level of the roll that produced this drop
    pub item_level: i32,
}

/// Outcome of a full loot roll
#[derive(Debug, Clone, Default)]
pub struct LootRoll<'a> {
    /// Number of single-item rolls attempted after the drop-chance gate
    pub attempts: u32,
    pub drops: Vec<DropResult<'a>>,
}

/// An eligible item and the weight it would be rolled with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LootPreview<'a> {
    pub item: &'a ItemDefinition,
    pub weight: f32,
}

/// Rolls drops from a catalog
#[derive(Debug, Clone, Copy)]
pub struct LootRoller<'a> {
    catalog: &'a ItemCatalog,
}

impl<'a> LootRoller<'a> {
    pub fn new(catalog: &'a ItemCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a ItemCatalog {
        self.catalog
    }

    /// Roll loot for a source of `target_level`
    pub fn generate_loot(&self, target_level: i32, profile: &LootProfile, rng: &mut impl Rng) -> Vec<DropResult<'a>> {
        self.roll(target_level, profile, rng).drops
    }

    /// Roll loot and report how many single-item rolls were attempted
    pub fn roll(&self, target_level: i32, profile: &LootProfile, rng: &mut impl Rng) -> LootRoll<'a> {
        // One gate for the whole roll
        let gate: f32 = rng.gen();
        if gate >= profile.drop_chance {
            return LootRoll::default();
        }

        let attempts = if profile.max_drops > profile.min_drops {
            rng.gen_range(profile.min_drops..=profile.max_drops)
        } else {
            profile.min_drops
        };

        let effective_level = profile.effective_level(target_level);
        let drops: Vec<DropResult<'a>> = (0..attempts)
            .filter_map(|_| self.roll_single_item(effective_level, profile, &mut *rng))
            .collect();

        log::debug!(
            "Loot roll '{}' at level {} (effective {}): {}/{} slots filled",
            profile.name,
            target_level,
            effective_level,
            drops.len(),
            attempts
        );

        LootRoll { attempts, drops }
    }

    /// Pick one item for an already-scaled level; `None` if nothing is eligible
    pub fn roll_single_item(&self, effective_level: i32, profile: &LootProfile, rng: &mut impl Rng) -> Option<DropResult<'a>> {
        let pool = self.eligible(effective_level, profile);

        let item = match pool.as_slice() {
            [] => return None,
            [only] => *only,
            _ => {
                let weighted: Vec<(&'a ItemDefinition, f32)> = pool
                    .iter()
                    .map(|item| (*item, profile.item_weight(item, effective_level)))
                    .collect();
                pick_weighted(&weighted, rng)?
            }
        };

        Some(DropResult { item, item_level: effective_level })
    }

    /// Every item a roll at `target_level` could produce, heaviest first
    pub fn preview_loot_pool(&self, target_level: i32, profile: &LootProfile, max_results: usize) -> Vec<LootPreview<'a>> {
        let effective_level = profile.effective_level(target_level);
        let mut preview: Vec<LootPreview<'a>> = self
            .eligible(effective_level, profile)
            .into_iter()
            .map(|item| LootPreview { item, weight: profile.item_weight(item, effective_level) })
            .collect();

        preview.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.item.id.cmp(&b.item.id))
        });
        preview.truncate(max_results);
        preview
    }

    fn eligible(&self, effective_level: i32, profile: &LootProfile) -> Vec<&'a ItemDefinition> {
        let (lo, hi) = profile.level_window(effective_level);
        self.catalog
            .candidates(lo, hi)
            .filter(|item| profile.is_eligible(item, effective_level))
            .collect()
    }
}

/// Cumulative-sum roulette over `(item, weight)` pairs
fn pick_weighted<'a>(weighted: &[(&'a ItemDefinition, f32)], rng: &mut impl Rng) -> Option<&'a ItemDefinition> {
    // Summed in f64 so a pool of f32::MAX weights stays finite
    let total: f64 = weighted.iter().map(|(_, w)| f64::from(*w)).sum();
    if !total.is_finite() || total <= 0.0 {
        return weighted.last().map(|(item, _)| *item);
    }

    let roll = rng.gen_range(0.0..total);
    let mut cumulative = 0.0f64;
    for (item, weight) in weighted {
        cumulative += f64::from(*weight);
        if cumulative >= roll {
            return Some(*item);
        }
    }

    // Float rounding at the top end
    weighted.last().map(|(item, _)| *item)
}
