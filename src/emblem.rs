//! Typed view of the boost emblem catalogue
//!
//! The written file is never validated against this model. It is only used to
//! summarise a run and to optimize an emblem set when the document has the shape
//! the emblem page serves: an array of emblem objects. Missing or null values fall
//! back to their defaults.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Emblem grade as encoded on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "C")]
    Bronze,
    #[serde(rename = "B")]
    Silver,
    #[serde(rename = "A")]
    Gold,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Grade::Bronze => "Bronze",
            Grade::Silver => "Silver",
            Grade::Gold => "Gold",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    Blue,
    Brown,
    Gray,
    Green,
    Navy,
    Pink,
    Purple,
    Red,
    White,
    Yellow,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Treats an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Stat bonuses granted by an emblem; missing or null stats are zero
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    #[serde(deserialize_with = "null_as_default")]
    pub hp: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub attack: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub defense: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub sp_attack: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub sp_defense: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub crit: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub speed: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub cdr: f64,
}

impl std::ops::AddAssign<&Stats> for Stats {
    fn add_assign(&mut self, other: &Stats) {
        self.hp += other.hp;
        self.attack += other.attack;
        self.defense += other.defense;
        self.sp_attack += other.sp_attack;
        self.sp_defense += other.sp_defense;
        self.crit += other.crit;
        self.speed += other.speed;
        self.cdr += other.cdr;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Emblem {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub grade: Option<Grade>,
    pub color1: Option<Color>,
    pub color2: Option<Color>,
    /// The page wraps the stats in a one element array; see [`Emblem::stats`]
    #[serde(deserialize_with = "null_as_default")]
    pub stats: Vec<Stats>,
}

impl Emblem {
    /// Display name, falling back to the internal name
    pub fn label(&self) -> &str {
        self.display_name.as_deref().or(self.name.as_deref()).unwrap_or("")
    }

    /// Grade, bronze when the page omits it
    pub fn grade(&self) -> Grade {
        self.grade.unwrap_or(Grade::Bronze)
    }

    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.color1.iter().chain(self.color2.iter()).copied()
    }

    /// The emblem's stats, all zero when the page lists none
    pub fn stats(&self) -> Stats {
        self.stats.first().cloned().unwrap_or_default()
    }
}

/// All emblems read from one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub emblems: Vec<Emblem>,
}

/// Counts reported after a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub by_grade: BTreeMap<Grade, usize>,
    pub by_color: BTreeMap<Color, usize>,
}

impl Catalog {
    /// Read the document as an emblem list. Returns `None` when it has another shape.
    pub fn from_document(document: &Value) -> Option<Self> {
        if !document.is_array() {
            return None;
        }

        match Vec::<Emblem>::deserialize(document) {
            Ok(emblems) => Some(Self { emblems }),
            Err(e) => {
                log::debug!("Document is not an emblem list: {}", e);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.emblems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emblems.is_empty()
    }

    pub fn by_grade(&self, grade: Grade) -> impl Iterator<Item = &Emblem> {
        self.emblems.iter().filter(move |e| e.grade() == grade)
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary { total: self.emblems.len(), ..Default::default() };

        for emblem in &self.emblems {
            *summary.by_grade.entry(emblem.grade()).or_default() += 1;
            for color in emblem.colors() {
                *summary.by_color.entry(color).or_default() += 1;
            }
        }

        summary
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Emblems: {}", self.total)?;
        for (grade, count) in &self.by_grade {
            writeln!(f, "  {}: {}", grade, count)?;
        }
        write!(f, "Colors:")?;
        for (color, count) in &self.by_color {
            write!(f, " {}={}", color, count)?;
        }
        Ok(())
    }
}
