//! Emblem set optimizer
//!
//! A player equips ten boost emblems, each from a different Pokémon. This module
//! searches for the set that best raises a chosen list of stats while stacking the
//! chosen colours, using a small genetic algorithm over the gold emblems of a
//! [`Catalog`]:
//!
//! - an emblem's score averages its normalized target stats, the share of target
//!   colours it carries, and the colour bonus tier those colours reach across the set
//! - a set's fitness is the sum of its emblems' scores
//! - each generation breeds the above-average sets pairwise (crossover) and mutates
//!   each of them once, drops invalid and duplicate sets, and keeps the best 100

use crate::emblem::{Catalog, Color, Emblem, Grade, Stats};
use crate::error::{Result, ScrapeError};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Number of emblems in a set
pub const SET_SIZE: usize = 10;

/// Sets kept after each generation
pub const POPULATION_CAP: usize = 100;

pub const DEFAULT_GENERATIONS: usize = 50;

/// A stat an emblem set can be optimized for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Statistic {
    Hp,
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    CritChance,
    MoveSpeed,
    CdReduction,
}

impl Statistic {
    pub const ALL: [Statistic; 8] = [
        Statistic::Hp,
        Statistic::Attack,
        Statistic::Defense,
        Statistic::SpAttack,
        Statistic::SpDefense,
        Statistic::CritChance,
        Statistic::MoveSpeed,
        Statistic::CdReduction,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Statistic::Hp => "hp",
            Statistic::Attack => "atk",
            Statistic::Defense => "def",
            Statistic::SpAttack => "sp_atk",
            Statistic::SpDefense => "sp_def",
            Statistic::CritChance => "crit_chance",
            Statistic::MoveSpeed => "mv_speed",
            Statistic::CdReduction => "cd_reduction",
        }
    }

    /// Value of this stat in `stats`
    pub fn of(self, stats: &Stats) -> f64 {
        match self {
            Statistic::Hp => stats.hp,
            Statistic::Attack => stats.attack,
            Statistic::Defense => stats.defense,
            Statistic::SpAttack => stats.sp_attack,
            Statistic::SpDefense => stats.sp_defense,
            Statistic::CritChance => stats.crit,
            Statistic::MoveSpeed => stats.speed,
            Statistic::CdReduction => stats.cdr,
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Statistic {
    type Err = String;

    /// Accepts the short keys (`sp_atk`) as well as the page's field names (`sp_attack`)
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let stat = match s.trim().to_ascii_lowercase().as_str() {
            "hp" => Statistic::Hp,
            "atk" | "attack" => Statistic::Attack,
            "def" | "defense" => Statistic::Defense,
            "sp_atk" | "sp_attack" => Statistic::SpAttack,
            "sp_def" | "sp_defense" => Statistic::SpDefense,
            "crit_chance" | "crit" => Statistic::CritChance,
            "mv_speed" | "speed" => Statistic::MoveSpeed,
            "cd_reduction" | "cdr" => Statistic::CdReduction,
            other => return Err(format!("unknown stat '{}'", other)),
        };
        Ok(stat)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let color = match s.trim().to_ascii_lowercase().as_str() {
            "black" => Color::Black,
            "blue" => Color::Blue,
            "brown" => Color::Brown,
            "gray" | "grey" => Color::Gray,
            "green" => Color::Green,
            "navy" => Color::Navy,
            "pink" => Color::Pink,
            "purple" => Color::Purple,
            "red" => Color::Red,
            "white" => Color::White,
            "yellow" => Color::Yellow,
            other => return Err(format!("unknown color '{}'", other)),
        };
        Ok(color)
    }
}

/// Bonus tier (0 to 3) reached by `count` emblems of `color` in one set
pub fn bonus_tier(color: Color, count: usize) -> u32 {
    let thresholds = match color {
        Color::Green | Color::Blue | Color::White | Color::Brown | Color::Purple => [2, 4, 6],
        Color::Red | Color::Yellow | Color::Pink | Color::Navy | Color::Black | Color::Gray => [3, 5, 7],
    };

    thresholds.iter().filter(|&&threshold| count >= threshold).count() as u32
}

/// What the optimizer maximizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Targets {
    pub stats: Vec<Statistic>,
    pub colors: Vec<Color>,
}

impl Default for Targets {
    fn default() -> Self {
        Self { stats: vec![Statistic::Hp, Statistic::MoveSpeed], colors: vec![Color::White, Color::Yellow] }
    }
}

/// Lowest and highest value of one stat across the pool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatRange {
    pub min: f64,
    pub max: f64,
}

impl StatRange {
    /// Position of `value` in the range, 0 when every emblem has the same value
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span > 0.0 { (value - self.min) / span } else { 0.0 }
    }
}

/// Gold emblems a set is built from, with per-stat ranges
#[derive(Debug, Clone)]
pub struct Pool {
    emblems: Vec<Emblem>,
    ranges: BTreeMap<Statistic, StatRange>,
}

impl Pool {
    /// Gold emblems of the catalog
    pub fn gold(catalog: &Catalog) -> Self {
        Self::new(catalog.by_grade(Grade::Gold).cloned().collect())
    }

    pub fn new(emblems: Vec<Emblem>) -> Self {
        let ranges = Statistic::ALL
            .iter()
            .map(|&stat| {
                let values = emblems.iter().map(|e| stat.of(&e.stats()));
                let range = values.fold(None, |range: Option<StatRange>, v| match range {
                    None => Some(StatRange { min: v, max: v }),
                    Some(r) => Some(StatRange { min: r.min.min(v), max: r.max.max(v) }),
                });
                (stat, range.unwrap_or(StatRange { min: 0.0, max: 0.0 }))
            })
            .collect();

        Self { emblems, ranges }
    }

    pub fn emblems(&self) -> &[Emblem] {
        &self.emblems
    }

    pub fn len(&self) -> usize {
        self.emblems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emblems.is_empty()
    }

    pub fn range(&self, stat: Statistic) -> StatRange {
        self.ranges[&stat]
    }

    /// Emblem indices grouped by Pokémon
    fn by_pokemon(&self) -> BTreeMap<&str, Vec<usize>> {
        let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (i, emblem) in self.emblems.iter().enumerate() {
            groups.entry(emblem.label()).or_default().push(i);
        }
        groups
    }
}

/// Ten emblems, stored as sorted indices into a [`Pool`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmblemSet([usize; SET_SIZE]);

impl EmblemSet {
    pub fn new(mut indices: [usize; SET_SIZE]) -> Self {
        indices.sort_unstable();
        Self(indices)
    }

    pub fn indices(&self) -> &[usize; SET_SIZE] {
        &self.0
    }
}

/// Best set found by a run
#[derive(Debug, Clone)]
pub struct Distribution {
    pub emblems: Vec<Emblem>,
    pub fitness: f64,
    pub targets: Targets,
    pub generations: usize,
}

impl Distribution {
    /// Summed stats of the set
    pub fn totals(&self) -> Stats {
        let mut totals = Stats::default();
        for emblem in &self.emblems {
            totals += &emblem.stats();
        }
        totals
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items.iter().map(T::to_string).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Best fitness: {:.4} after {} generations", self.fitness, self.generations)?;
        writeln!(f, "Colors to improve: {}", join(&self.targets.colors))?;
        writeln!(f, "Statistics to improve: {}", join(&self.targets.stats))?;
        writeln!(f, "Emblems:")?;
        for emblem in &self.emblems {
            let colors: Vec<Color> = emblem.colors().collect();
            writeln!(f, "  {} ({}) ({})", emblem.label(), emblem.grade(), join(&colors))?;
        }
        write!(f, "Statistics:")?;
        let totals = self.totals();
        for stat in Statistic::ALL {
            write!(f, "\n  {}: {}", stat, stat.of(&totals))?;
        }
        Ok(())
    }
}

/// Genetic search for the best emblem set
#[derive(Debug, Clone)]
pub struct Optimizer {
    pool: Pool,
    targets: Targets,
    generations: usize,
}

impl Optimizer {
    pub fn new(pool: Pool, targets: Targets) -> Self {
        Self { pool, targets, generations: DEFAULT_GENERATIONS }
    }

    pub fn generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    fn emblems<'a>(&'a self, set: &'a EmblemSet) -> impl Iterator<Item = &'a Emblem> + 'a {
        set.indices().iter().map(|&i| &self.pool.emblems[i])
    }

    /// A set is valid when its ten emblems come from ten different Pokémon
    pub fn is_valid(&self, set: &EmblemSet) -> bool {
        let pokemon: HashSet<&str> = self.emblems(set).map(Emblem::label).collect();
        pokemon.len() == SET_SIZE
    }

    /// Score of one emblem within `set`, between 0 and 1 when the targets are non-empty
    pub fn score(&self, set: &EmblemSet, emblem: &Emblem) -> f64 {
        let stats = emblem.stats();
        let stat_weight: f64 = self
            .targets
            .stats
            .iter()
            .map(|&stat| self.pool.range(stat).normalize(stat.of(&stats)))
            .sum();

        let own_colors: Vec<Color> = emblem.colors().collect();
        let targeted: Vec<Color> = self.targets.colors.iter().copied().filter(|c| own_colors.contains(c)).collect();

        let color_weight = if self.targets.colors.is_empty() {
            0.0
        } else {
            targeted.len() as f64 / self.targets.colors.len() as f64
        };

        let bonus_weight = if own_colors.is_empty() {
            0.0
        } else {
            let mut counts: BTreeMap<Color, usize> = BTreeMap::new();
            for color in self.emblems(set).flat_map(|e| e.colors()) {
                *counts.entry(color).or_default() += 1;
            }
            let tiers: u32 = targeted
                .iter()
                .map(|&color| bonus_tier(color, counts.get(&color).copied().unwrap_or(0)))
                .sum();
            tiers as f64 / (own_colors.len() as f64 * 3.0)
        };

        (stat_weight + color_weight + bonus_weight) / 3.0
    }

    pub fn fitness(&self, set: &EmblemSet) -> f64 {
        self.emblems(set).map(|emblem| self.score(set, emblem)).sum()
    }

    /// Ten emblems drawn from the twenty of both parents
    pub fn crossover<R: Rng + ?Sized>(&self, a: &EmblemSet, b: &EmblemSet, rng: &mut R) -> EmblemSet {
        let mut genes: Vec<usize> = a.indices().iter().chain(b.indices()).copied().collect();
        genes.shuffle(rng);

        let mut child = [0; SET_SIZE];
        child.copy_from_slice(&genes[..SET_SIZE]);
        EmblemSet::new(child)
    }

    /// Replace one emblem of the set with a random emblem from the pool
    pub fn mutate<R: Rng + ?Sized>(&self, set: &EmblemSet, rng: &mut R) -> EmblemSet {
        let mut indices = *set.indices();
        indices[rng.gen_range(0..SET_SIZE)] = rng.gen_range(0..self.pool.len());
        EmblemSet::new(indices)
    }

    /// A random valid set: ten random Pokémon, one random emblem each
    pub fn random_set<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<EmblemSet> {
        let groups: Vec<Vec<usize>> = self.pool.by_pokemon().into_values().collect();
        if groups.len() < SET_SIZE {
            return Err(ScrapeError::NotEnoughEmblems { required: SET_SIZE, available: groups.len() });
        }

        let mut indices = [0; SET_SIZE];
        for (slot, group) in indices.iter_mut().zip(groups.choose_multiple(rng, SET_SIZE)) {
            *slot = group[rng.gen_range(0..group.len())];
        }
        Ok(EmblemSet::new(indices))
    }

    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Distribution> {
        let first = self.random_set(rng)?;
        let first_fitness = self.fitness(&first);
        let mut population = vec![(first, first_fitness)];

        for generation in 1..=self.generations {
            let mean = population.iter().map(|(_, f)| f).sum::<f64>() / population.len() as f64;
            let mut parents: Vec<EmblemSet> =
                population.iter().filter(|(_, f)| *f >= mean).map(|(set, _)| set.clone()).collect();
            if parents.is_empty() {
                parents.push(population[0].0.clone());
            }

            let mut offspring: Vec<EmblemSet> =
                parents.windows(2).map(|pair| self.crossover(&pair[0], &pair[1], rng)).collect();
            offspring.extend(parents.iter().map(|set| self.mutate(set, rng)));

            let mut seen: HashSet<EmblemSet> = population.iter().map(|(set, _)| set.clone()).collect();
            for child in offspring {
                if self.is_valid(&child) && seen.insert(child.clone()) {
                    let fitness = self.fitness(&child);
                    population.push((child, fitness));
                }
            }

            population.sort_by(|a, b| b.1.total_cmp(&a.1));
            population.truncate(POPULATION_CAP);

            log::debug!("Generation {}: best fitness {:.4}", generation, population[0].1);
        }

        let (best, fitness) = population.swap_remove(0);
        Ok(Distribution {
            emblems: self.emblems(&best).cloned().collect(),
            fitness,
            targets: self.targets.clone(),
            generations: self.generations,
        })
    }
}
