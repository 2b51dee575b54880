//! Static content consumed by rounds: categorized clues, diagnoses and the pool they are drawn from.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{CLUES_PER_DIAGNOSIS, GROUP_COUNT};

/// Classification applied to a clue.
///
/// Categories only drive presentation theming; grouping is decided by the
/// owning diagnosis alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Gene implicated in the diagnosis.
    Gene,
    /// Molecular or physiological mechanism.
    Mechanism,
    /// Mode of inheritance.
    Inheritance,
    /// Clinical presentation.
    Symptom,
}

impl Category {
    /// Every category in presentation order.
    pub const ALL: [Category; 4] = [
        Category::Gene,
        Category::Mechanism,
        Category::Inheritance,
        Category::Symptom,
    ];

    /// Lowercase label matching the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gene => "gene",
            Self::Mechanism => "mechanism",
            Self::Inheritance => "inheritance",
            Self::Symptom => "symptom",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Single categorized fact belonging to a diagnosis.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clue {
    text: String,
    category: Category,
}

impl Clue {
    /// Creates a clue from its display text and category.
    #[must_use]
    pub fn new(text: impl Into<String>, category: Category) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }

    /// Text shown on the tile.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Category used to theme the tile.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }
}

/// Named target concept the player reconstructs from exactly four clues.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DiagnosisRecord")]
pub struct Diagnosis {
    name: String,
    clues: [Clue; CLUES_PER_DIAGNOSIS],
}

impl Diagnosis {
    /// Creates a diagnosis from its name and four clues.
    #[must_use]
    pub fn new(name: impl Into<String>, clues: [Clue; CLUES_PER_DIAGNOSIS]) -> Self {
        Self {
            name: name.into(),
            clues,
        }
    }

    /// Creates a diagnosis from an arbitrary clue list, rejecting lists that do not hold four clues.
    pub fn from_clues(name: impl Into<String>, clues: Vec<Clue>) -> Result<Self, ConfigurationError> {
        let name = name.into();
        let found = clues.len();
        let clues: [Clue; CLUES_PER_DIAGNOSIS] = clues
            .try_into()
            .map_err(|_| ConfigurationError::ClueCount {
                name: name.clone(),
                found,
            })?;
        Ok(Self { name, clues })
    }

    /// Name revealed once the group is decoded.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clues contributed to the board, in record order.
    #[must_use]
    pub fn clues(&self) -> &[Clue; CLUES_PER_DIAGNOSIS] {
        &self.clues
    }
}

#[derive(Deserialize)]
struct DiagnosisRecord {
    name: String,
    clues: Vec<Clue>,
}

impl TryFrom<DiagnosisRecord> for Diagnosis {
    type Error = ConfigurationError;

    fn try_from(record: DiagnosisRecord) -> Result<Self, Self::Error> {
        Diagnosis::from_clues(record.name, record.clues)
    }
}

/// Validated collection of diagnoses that rounds are dealt from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentPool {
    diagnoses: Vec<Diagnosis>,
}

impl ContentPool {
    /// Validates the provided diagnoses and wraps them in a pool.
    ///
    /// A pool must hold at least [`GROUP_COUNT`] diagnoses with unique names.
    pub fn new(diagnoses: Vec<Diagnosis>) -> Result<Self, ConfigurationError> {
        if diagnoses.len() < GROUP_COUNT {
            return Err(ConfigurationError::PoolTooSmall {
                found: diagnoses.len(),
            });
        }

        let mut seen = HashSet::with_capacity(diagnoses.len());
        for diagnosis in &diagnoses {
            if diagnosis.name().trim().is_empty() {
                return Err(ConfigurationError::UnnamedDiagnosis);
            }
            if !seen.insert(diagnosis.name()) {
                return Err(ConfigurationError::DuplicateName(diagnosis.name().to_owned()));
            }
        }

        Ok(Self { diagnoses })
    }

    /// Parses and validates a pool from its JSON representation.
    pub fn from_json(contents: &str) -> Result<Self, ConfigurationError> {
        let diagnoses: Vec<Diagnosis> = serde_json::from_str(contents)?;
        Self::new(diagnoses)
    }

    /// Number of diagnoses available for dealing.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnoses.len()
    }

    /// Always `false` for a validated pool.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnoses.is_empty()
    }

    /// Retrieves the diagnosis stored at the provided index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Diagnosis> {
        self.diagnoses.get(index)
    }

    /// Diagnoses in pool order.
    #[must_use]
    pub fn diagnoses(&self) -> &[Diagnosis] {
        &self.diagnoses
    }
}

/// Problems detected while loading content, reported to the operator before any round starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// The pool cannot supply four distinct diagnoses.
    #[error("content pool holds {found} diagnoses; at least four are required")]
    PoolTooSmall {
        /// Number of diagnoses present in the pool.
        found: usize,
    },
    /// A diagnosis does not carry exactly four clues.
    #[error("diagnosis `{name}` has {found} clues; exactly four are required")]
    ClueCount {
        /// Name of the offending diagnosis.
        name: String,
        /// Number of clues present in the record.
        found: usize,
    },
    /// Two diagnoses share a name.
    #[error("diagnosis `{0}` appears more than once in the content pool")]
    DuplicateName(String),
    /// A diagnosis has an empty name.
    #[error("content pool contains a diagnosis without a name")]
    UnnamedDiagnosis,
    /// The pool could not be parsed into diagnosis records.
    #[error("content pool could not be parsed: {0}")]
    Malformed(#[from] serde_json::Error),
}
