//! Skill knowledge base: canonical skills, their synonyms and categories
//!
//! The catalog is built once at startup and is read-only afterwards. It is
//! passed by `Arc` into the extractor rather than living in a global.

use crate::error::{Result, SkillMatcherError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Domain bucket a canonical skill belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Languages,
    Frontend,
    Backend,
    Databases,
    Devops,
    Tools,
    Ml,
    SoftSkills,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Languages => "languages",
            Category::Frontend => "frontend",
            Category::Backend => "backend",
            Category::Databases => "databases",
            Category::Devops => "devops",
            Category::Tools => "tools",
            Category::Ml => "ml",
            Category::SoftSkills => "soft_skills",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type SkillEntry = (&'static str, &'static [&'static str]);

/// Canonical skill → surface forms (English, Russian, abbreviations).
/// The canonical name is added as a synonym of itself during construction.
const SKILL_SYNONYMS: &[SkillEntry] = &[
    // Languages
    ("python", &["python3", "питон", "пайтон"]),
    ("java", &["java se", "джава"]),
    ("javascript", &["js", "ecmascript", "es6", "джаваскрипт"]),
    ("typescript", &["ts"]),
    ("golang", &["go lang"]),
    ("rust", &["rustlang"]),
    ("csharp", &["c#", "c sharp", "си шарп"]),
    ("cpp", &["c++", "си плюс плюс"]),
    ("php", &[]),
    ("kotlin", &["котлин"]),
    ("swift", &[]),
    ("ruby", &[]),
    ("scala", &[]),
    ("sql", &["t-sql", "pl/sql"]),
    // Frontend
    ("react", &["reactjs", "react.js", "реакт"]),
    ("vue", &["vuejs", "vue.js"]),
    ("angular", &["angularjs"]),
    ("html", &["html5"]),
    ("css", &["css3", "scss", "sass"]),
    ("nextjs", &["next.js"]),
    // Backend
    ("django", &["джанго"]),
    ("fastapi", &["fast api"]),
    ("flask", &["фласк"]),
    ("spring", &["spring boot"]),
    ("nodejs", &["node.js", "node"]),
    ("express", &["expressjs"]),
    ("dotnet", &[".net", "asp.net"]),
    ("rest api", &["restful", "rest apis"]),
    ("graphql", &[]),
    ("microservices", &["микросервисы"]),
    // Databases
    ("postgresql", &["postgres", "постгрес"]),
    ("mysql", &[]),
    ("mongodb", &["mongo"]),
    ("redis", &[]),
    ("elasticsearch", &["elastic search"]),
    ("sqlite", &[]),
    ("clickhouse", &[]),
    // DevOps
    ("docker", &["докер"]),
    ("kubernetes", &["k8s", "кубернетес"]),
    ("ci/cd", &["cicd", "continuous integration"]),
    ("jenkins", &[]),
    ("terraform", &[]),
    ("ansible", &[]),
    ("aws", &["amazon web services"]),
    ("azure", &[]),
    ("gcp", &["google cloud"]),
    ("linux", &["линукс"]),
    ("nginx", &[]),
    // Tools (category left to the default)
    ("git", &["гит"]),
    ("github", &[]),
    ("gitlab", &[]),
    ("jira", &[]),
    ("postman", &[]),
    ("figma", &[]),
    ("agile", &["scrum", "kanban"]),
    // ML
    ("machine learning", &["ml", "машинное обучение"]),
    ("deep learning", &["глубокое обучение"]),
    ("data science", &["наука о данных"]),
    ("tensorflow", &[]),
    ("pytorch", &[]),
    ("pandas", &[]),
    ("numpy", &[]),
    ("scikit-learn", &["sklearn"]),
    ("nlp", &["natural language processing"]),
    ("computer vision", &["компьютерное зрение"]),
    // Soft skills
    ("communication", &["communication skills", "коммуникабельность"]),
    ("teamwork", &["team player", "работа в команде", "командная работа"]),
    ("leadership", &["лидерство"]),
    ("problem solving", &["решение проблем"]),
    ("time management", &["тайм-менеджмент"]),
];

/// Explicit category assignments; anything absent falls back to `Tools`
const SKILL_CATEGORIES: &[(Category, &[&str])] = &[
    (
        Category::Languages,
        &[
            "python", "java", "javascript", "typescript", "golang", "rust", "csharp", "cpp",
            "php", "kotlin", "swift", "ruby", "scala", "sql",
        ],
    ),
    (
        Category::Frontend,
        &["react", "vue", "angular", "html", "css", "nextjs"],
    ),
    (
        Category::Backend,
        &[
            "django", "fastapi", "flask", "spring", "nodejs", "express", "dotnet", "rest api",
            "graphql", "microservices",
        ],
    ),
    (
        Category::Databases,
        &[
            "postgresql", "mysql", "mongodb", "redis", "elasticsearch", "sqlite", "clickhouse",
        ],
    ),
    (
        Category::Devops,
        &[
            "docker", "kubernetes", "ci/cd", "jenkins", "terraform", "ansible", "aws", "azure",
            "gcp", "linux", "nginx",
        ],
    ),
    (
        Category::Ml,
        &[
            "machine learning", "deep learning", "data science", "tensorflow", "pytorch",
            "pandas", "numpy", "scikit-learn", "nlp", "computer vision",
        ],
    ),
    (
        Category::SoftSkills,
        &[
            "communication", "teamwork", "leadership", "problem solving", "time management",
        ],
    ),
];

/// Immutable skill catalog with a reverse synonym index
#[derive(Debug, Clone)]
pub struct SkillKnowledgeBase {
    synonym_index: HashMap<String, String>,
    /// Ordered by synonym, so every consumer iterates deterministically
    synonyms: Vec<(String, String)>,
    categories: HashMap<String, Category>,
    canonical_count: usize,
}

impl SkillKnowledgeBase {
    /// Build the catalog shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_tables(SKILL_SYNONYMS, SKILL_CATEGORIES)
    }

    /// Build from arbitrary tables. A synonym claimed by two canonical skills,
    /// a repeated canonical entry, or a category for an unknown skill is a
    /// construction error.
    pub fn from_tables(entries: &[SkillEntry], categories: &[(Category, &[&str])]) -> Result<Self> {
        let mut canonical_names: HashSet<String> = HashSet::new();
        let mut synonym_index: HashMap<String, String> = HashMap::new();

        for (canonical, surface_forms) in entries {
            let canonical = normalize(canonical);
            if canonical.is_empty() {
                return Err(SkillMatcherError::KnowledgeBase(
                    "empty canonical skill name".to_string(),
                ));
            }
            if !canonical_names.insert(canonical.clone()) {
                return Err(SkillMatcherError::KnowledgeBase(format!(
                    "canonical skill '{}' is listed more than once",
                    canonical
                )));
            }

            let forms = std::iter::once(canonical.clone())
                .chain(surface_forms.iter().map(|s| normalize(s)))
                .filter(|s| !s.is_empty());

            for synonym in forms {
                match synonym_index.get(&synonym) {
                    Some(existing) if existing != &canonical => {
                        return Err(SkillMatcherError::KnowledgeBase(format!(
                            "synonym '{}' maps to both '{}' and '{}'",
                            synonym, existing, canonical
                        )));
                    }
                    Some(_) => {}
                    None => {
                        synonym_index.insert(synonym, canonical.clone());
                    }
                }
            }
        }

        let mut category_map = HashMap::new();
        for (category, skills) in categories {
            for skill in skills.iter() {
                let skill = normalize(skill);
                if !canonical_names.contains(&skill) {
                    return Err(SkillMatcherError::KnowledgeBase(format!(
                        "category '{}' references unknown skill '{}'",
                        category, skill
                    )));
                }
                if let Some(previous) = category_map.insert(skill.clone(), *category) {
                    if previous != *category {
                        return Err(SkillMatcherError::KnowledgeBase(format!(
                            "skill '{}' assigned to both '{}' and '{}'",
                            skill, previous, category
                        )));
                    }
                }
            }
        }

        let mut synonyms: Vec<(String, String)> = synonym_index
            .iter()
            .map(|(synonym, canonical)| (synonym.clone(), canonical.clone()))
            .collect();
        synonyms.sort();

        log::debug!(
            "Skill knowledge base built: {} canonical skills, {} synonyms",
            canonical_names.len(),
            synonyms.len()
        );

        Ok(Self {
            synonym_index,
            synonyms,
            categories: category_map,
            canonical_count: canonical_names.len(),
        })
    }

    /// Map a surface form to its canonical skill
    pub fn canonicalize(&self, surface: &str) -> Option<&str> {
        self.synonym_index.get(&normalize(surface)).map(|s| s.as_str())
    }

    pub fn category_of(&self, skill: &str) -> Category {
        self.categories
            .get(&normalize(skill))
            .copied()
            .unwrap_or(Category::Tools)
    }

    /// All `(synonym, canonical)` pairs, sorted by synonym
    pub fn all_synonyms(&self) -> &[(String, String)] {
        &self.synonyms
    }

    pub fn skill_count(&self) -> usize {
        self.canonical_count
    }

    pub fn synonym_count(&self) -> usize {
        self.synonyms.len()
    }
}

/// Lowercase and trim a skill string
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
