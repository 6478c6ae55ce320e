//! Curriculum definition model.
//!
//! # Responsibility
//! - Define circles and the projects authored inside them.
//! - Validate authored tables once, at load time.
//! - Resolve campus slugs (primary, alternate, numbered submodule) to projects.
//!
//! # Invariants
//! - `Curriculum::circles` is sorted by circle number and numbers are unique.
//! - `CurriculumProject::circle` equals the number of the circle holding it.
//! - Project ids are unique across the whole curriculum.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Highest difficulty rating accepted in authored tables.
pub const MAX_DIFFICULTY: u8 = 5;

/// One project of the curriculum, as authored in the static table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumProject {
    /// Stable internal key, also used to look up roadmaps.
    pub id: String,
    pub name: String,
    /// Primary campus API slug.
    pub slug: String,
    /// Aliases the campus API may use for the same project, tried in order.
    #[serde(default)]
    pub alt_slugs: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Rating in `1..=5`.
    pub difficulty: u8,
    #[serde(default)]
    pub skills: Vec<String>,
    pub circle: u32,
    #[serde(default)]
    pub is_exam: bool,
    /// Number of numbered submodules for multi-part projects.
    #[serde(default)]
    pub module_count: Option<u32>,
}

impl CurriculumProject {
    /// Returns the slug prefix shared by all numbered submodules.
    ///
    /// `python-module-00` and `python-module` both yield `python-module`.
    pub fn module_base_slug(&self) -> &str {
        module_base_slug(&self.slug)
    }

    /// Returns whether `slug` names this project through any accepted form.
    pub fn matches_slug(&self, slug: &str) -> bool {
        if self.slug == slug || self.alt_slugs.iter().any(|alt| alt == slug) {
            return true;
        }
        match self.module_count {
            Some(count) => module_index(self.module_base_slug(), slug)
                .is_some_and(|index| index < count),
            None => false,
        }
    }
}

/// Ordered stage of the curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub number: u32,
    pub name: String,
    pub projects: Vec<CurriculumProject>,
}

/// Validated, ordered set of circles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Curriculum {
    circles: Vec<Circle>,
}

impl Curriculum {
    /// Validates authored circles and orders them by number.
    ///
    /// Declaration order of projects inside each circle is preserved.
    pub fn new(mut circles: Vec<Circle>) -> Result<Self, CurriculumValidationError> {
        circles.sort_by_key(|circle| circle.number);

        let mut seen_circles = HashSet::new();
        let mut seen_ids = HashSet::new();
        for circle in &circles {
            if !seen_circles.insert(circle.number) {
                return Err(CurriculumValidationError::DuplicateCircle(circle.number));
            }
            for project in &circle.projects {
                validate_project(project, circle.number)?;
                if !seen_ids.insert(project.id.as_str()) {
                    return Err(CurriculumValidationError::DuplicateProjectId(
                        project.id.clone(),
                    ));
                }
            }
        }

        Ok(Self { circles })
    }

    /// Circles in ascending number order.
    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    /// All projects in circle order, then declaration order.
    pub fn projects(&self) -> impl Iterator<Item = &CurriculumProject> {
        self.circles.iter().flat_map(|circle| circle.projects.iter())
    }

    /// Total number of projects across all circles.
    pub fn project_count(&self) -> usize {
        self.circles.iter().map(|circle| circle.projects.len()).sum()
    }

    pub fn circle(&self, number: u32) -> Option<&Circle> {
        self.circles.iter().find(|circle| circle.number == number)
    }

    pub fn project_by_id(&self, id: &str) -> Option<&CurriculumProject> {
        self.projects().find(|project| project.id == id)
    }

    /// Resolves a campus slug to the first project accepting it.
    pub fn project_by_slug(&self, slug: &str) -> Option<&CurriculumProject> {
        self.projects().find(|project| project.matches_slug(slug))
    }
}

/// Authored-table validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurriculumValidationError {
    DuplicateCircle(u32),
    DuplicateProjectId(String),
    EmptyId,
    EmptySlug(String),
    CircleMismatch {
        project_id: String,
        declared: u32,
        container: u32,
    },
    InvalidDifficulty {
        project_id: String,
        difficulty: u8,
    },
}

impl Display for CurriculumValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateCircle(number) => write!(f, "circle {number} is declared twice"),
            Self::DuplicateProjectId(id) => write!(f, "project id `{id}` is declared twice"),
            Self::EmptyId => write!(f, "project id must not be blank"),
            Self::EmptySlug(id) => write!(f, "project `{id}` has a blank slug"),
            Self::CircleMismatch {
                project_id,
                declared,
                container,
            } => write!(
                f,
                "project `{project_id}` declares circle {declared} but is listed in circle {container}"
            ),
            Self::InvalidDifficulty {
                project_id,
                difficulty,
            } => write!(
                f,
                "project `{project_id}` has difficulty {difficulty}; expected 1..={MAX_DIFFICULTY}"
            ),
        }
    }
}

impl Error for CurriculumValidationError {}

fn validate_project(
    project: &CurriculumProject,
    container: u32,
) -> Result<(), CurriculumValidationError> {
    if project.id.trim().is_empty() {
        return Err(CurriculumValidationError::EmptyId);
    }
    if project.slug.trim().is_empty() {
        return Err(CurriculumValidationError::EmptySlug(project.id.clone()));
    }
    if project.circle != container {
        return Err(CurriculumValidationError::CircleMismatch {
            project_id: project.id.clone(),
            declared: project.circle,
            container,
        });
    }
    if project.difficulty == 0 || project.difficulty > MAX_DIFFICULTY {
        return Err(CurriculumValidationError::InvalidDifficulty {
            project_id: project.id.clone(),
            difficulty: project.difficulty,
        });
    }
    Ok(())
}

/// Strips a trailing `-<digits>` submodule suffix from `slug`.
pub fn module_base_slug(slug: &str) -> &str {
    match slug.rsplit_once('-') {
        Some((base, suffix))
            if !base.is_empty()
                && !suffix.is_empty()
                && suffix.chars().all(|c| c.is_ascii_digit()) =>
        {
            base
        }
        _ => slug,
    }
}

/// Formats the campus slug of submodule `index` (`<base>-NN`).
pub fn module_slug(base_slug: &str, index: u32) -> String {
    format!("{base_slug}-{index:02}")
}

/// Parses the submodule index out of `slug` when it is `<base>-NN`.
pub fn module_index(base_slug: &str, slug: &str) -> Option<u32> {
    let suffix = slug.strip_prefix(base_slug)?.strip_prefix('-')?;
    if suffix.len() < 2 || !suffix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}
