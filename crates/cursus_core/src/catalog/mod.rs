//! Static curriculum and roadmap catalog.
//!
//! # Responsibility
//! - Embed the authored curriculum table and per-project roadmaps.
//! - Load replacement tables from JSON files.
//! - Resolve roadmaps by project id, including generated Python module
//!   roadmaps.
//!
//! # Invariants
//! - Embedded tables are validated on first use.
//! - Roadmap ids are unique and iterate in sorted order.
//!
//! # See also
//! - `crate::diagram` for parsing roadmap diagrams.

use crate::diagram::{parse_diagram, Diagram};
use crate::model::curriculum::{Circle, Curriculum, CurriculumValidationError};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

const EMBEDDED_CURRICULUM: &str = include_str!("curriculum.json");
const EMBEDDED_ROADMAPS: &str = include_str!("roadmaps.json");

static DEFAULT_CURRICULUM: Lazy<Curriculum> = Lazy::new(|| {
    Curriculum::from_json_str(EMBEDDED_CURRICULUM).expect("embedded curriculum table is valid")
});
static DEFAULT_ROADMAPS: Lazy<RoadmapCatalog> = Lazy::new(|| {
    RoadmapCatalog::from_json_str(EMBEDDED_ROADMAPS).expect("embedded roadmap table is valid")
});
static PYTHON_MODULE_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^python-module-(\d+)$").expect("valid python module regex"));

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while loading catalog tables.
#[derive(Debug)]
pub enum CatalogError {
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    Curriculum(CurriculumValidationError),
    DuplicateRoadmap(String),
    EmptyRoadmapId,
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read catalog file `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "invalid catalog json: {err}"),
            Self::Curriculum(err) => write!(f, "invalid curriculum: {err}"),
            Self::DuplicateRoadmap(id) => write!(f, "duplicate roadmap id `{id}`"),
            Self::EmptyRoadmapId => write!(f, "roadmap id must not be empty"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::Curriculum(err) => Some(err),
            Self::DuplicateRoadmap(_) | Self::EmptyRoadmapId => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<CurriculumValidationError> for CatalogError {
    fn from(value: CurriculumValidationError) -> Self {
        Self::Curriculum(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapResource {
    pub label: String,
    pub url: String,
}

/// Explanation attached to one diagram node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapNode {
    pub title: String,
    pub explanation: String,
    #[serde(default)]
    pub resources: Vec<RoadmapResource>,
}

/// Learning roadmap for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRoadmap {
    pub project_id: String,
    pub project_title: String,
    pub overview: String,
    /// Flowchart source; empty for generated roadmaps.
    #[serde(default)]
    pub diagram: String,
    /// Node explanations keyed by diagram node id.
    #[serde(default)]
    pub nodes: BTreeMap<String, RoadmapNode>,
}

impl ProjectRoadmap {
    pub fn has_diagram(&self) -> bool {
        !self.diagram.trim().is_empty()
    }

    pub fn parsed_diagram(&self) -> Diagram {
        parse_diagram(&self.diagram)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PythonModuleInfo {
    pub number: u32,
    pub name: String,
    pub overview: String,
}

#[derive(Debug, Deserialize)]
struct RoadmapTable {
    #[serde(default)]
    python_modules: Vec<PythonModuleInfo>,
    roadmaps: Vec<ProjectRoadmap>,
}

#[derive(Debug, Deserialize)]
struct CurriculumTable {
    circles: Vec<Circle>,
}

/// Indexed roadmap table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoadmapCatalog {
    roadmaps: BTreeMap<String, ProjectRoadmap>,
    python_modules: BTreeMap<u32, PythonModuleInfo>,
}

impl RoadmapCatalog {
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        let table: RoadmapTable = serde_json::from_str(json)?;

        let mut roadmaps = BTreeMap::new();
        for roadmap in table.roadmaps {
            if roadmap.project_id.trim().is_empty() {
                return Err(CatalogError::EmptyRoadmapId);
            }
            if roadmaps.contains_key(&roadmap.project_id) {
                return Err(CatalogError::DuplicateRoadmap(roadmap.project_id));
            }
            roadmaps.insert(roadmap.project_id.clone(), roadmap);
        }
        let python_modules = table
            .python_modules
            .into_iter()
            .map(|info| (info.number, info))
            .collect();

        Ok(Self {
            roadmaps,
            python_modules,
        })
    }

    /// Looks up a roadmap by project id.
    ///
    /// `python-module-N` ids resolve to a generated roadmap without a diagram
    /// when module `N` is known.
    pub fn roadmap(&self, project_id: &str) -> Option<Cow<'_, ProjectRoadmap>> {
        if let Some(generated) = self.python_module_roadmap(project_id) {
            return Some(Cow::Owned(generated));
        }
        self.roadmaps.get(project_id).map(Cow::Borrowed)
    }

    /// Catalog ids in sorted order; generated ids are not listed.
    pub fn ids(&self) -> Vec<&str> {
        self.roadmaps.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.roadmaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roadmaps.is_empty()
    }

    fn python_module_roadmap(&self, project_id: &str) -> Option<ProjectRoadmap> {
        let captures = PYTHON_MODULE_ID_RE.captures(project_id)?;
        let number = captures.get(1)?.as_str().parse::<u32>().ok()?;
        let info = self.python_modules.get(&number)?;
        Some(ProjectRoadmap {
            project_id: format!("python-module-{number}"),
            project_title: format!("Python {}", info.name),
            overview: info.overview.clone(),
            diagram: String::new(),
            nodes: BTreeMap::new(),
        })
    }
}

impl Curriculum {
    /// Parses and validates a `{ "circles": [...] }` curriculum document.
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        let table: CurriculumTable = serde_json::from_str(json)?;
        Ok(Self::new(table.circles)?)
    }
}

pub fn load_curriculum_file(path: impl AsRef<Path>) -> CatalogResult<Curriculum> {
    let path = path.as_ref();
    let curriculum = Curriculum::from_json_str(&read_catalog_file(path)?)?;
    debug!(
        "event=catalog_load module=catalog status=ok kind=curriculum path={} projects={}",
        path.display(),
        curriculum.project_count()
    );
    Ok(curriculum)
}

pub fn load_roadmap_file(path: impl AsRef<Path>) -> CatalogResult<RoadmapCatalog> {
    let path = path.as_ref();
    let catalog = RoadmapCatalog::from_json_str(&read_catalog_file(path)?)?;
    debug!(
        "event=catalog_load module=catalog status=ok kind=roadmaps path={} roadmaps={}",
        path.display(),
        catalog.len()
    );
    Ok(catalog)
}

fn read_catalog_file(path: &Path) -> CatalogResult<String> {
    fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Embedded common-core curriculum.
pub fn default_curriculum() -> &'static Curriculum {
    &DEFAULT_CURRICULUM
}

/// Embedded roadmap table.
pub fn default_roadmaps() -> &'static RoadmapCatalog {
    &DEFAULT_ROADMAPS
}

/// Looks up a roadmap in the embedded table.
pub fn roadmap_by_project_id(project_id: &str) -> Option<ProjectRoadmap> {
    default_roadmaps()
        .roadmap(project_id)
        .map(Cow::into_owned)
}

/// Sorted ids of the embedded roadmaps.
pub fn available_roadmap_ids() -> Vec<&'static str> {
    default_roadmaps().ids()
}

/// Explanation for a diagram node, if the roadmap documents it.
pub fn node_details<'a>(roadmap: &'a ProjectRoadmap, node_id: &str) -> Option<&'a RoadmapNode> {
    roadmap.nodes.get(node_id)
}
