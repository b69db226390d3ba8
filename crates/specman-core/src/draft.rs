use crate::component::Component;
use crate::constitution::Constitution;
use crate::decision::Decision;
use crate::error::{Result, SpecError};
use crate::id::SpecId;
use crate::milestone::Milestone;
use crate::paths;
use crate::plan::Plan;
use crate::requirement::Requirement;
use crate::spec::AnySpec;
use crate::store;
use crate::types::SpecType;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Question tree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Question {
    pub key: &'static str,
    pub prompt: &'static str,
    pub required: bool,
    /// Multi-line answer; each non-empty line becomes one element.
    pub list: bool,
}

const fn q(key: &'static str, prompt: &'static str, required: bool, list: bool) -> Question {
    Question {
        key,
        prompt,
        required,
        list,
    }
}

const REQUIREMENT_QUESTIONS: &[Question] = &[
    q("name", "Short name for the requirement", true, false),
    q("description", "What is needed and why?", true, false),
    q("kind", "Is this a business or technical requirement?", true, false),
    q("priority", "Priority (critical/required/ideal/optional)", false, false),
    q("criteria", "Acceptance criteria, one per line", true, true),
    q("depends_on", "IDs of requirements this depends on, one per line", false, true),
];

const PLAN_QUESTIONS: &[Question] = &[
    q("name", "Short name for the plan", true, false),
    q("description", "What does this plan deliver?", true, false),
    q(
        "criteria_refs",
        "Criteria this plan covers (req-NNN-slug/crt-NNN), one per line",
        false,
        true,
    ),
    q("tasks", "Implementation tasks, one per line", true, true),
    q("test_cases", "Test cases, one per line", false, true),
    q("depends_on", "IDs of plans this depends on, one per line", false, true),
];

const DECISION_QUESTIONS: &[Question] = &[
    q("name", "Short name for the decision", true, false),
    q("description", "One-line summary", false, false),
    q("decision", "What was decided?", true, false),
    q("context", "What forces led to this decision?", true, false),
    q("consequences", "Consequences, one per line", false, true),
    q("alternatives", "Alternatives considered, one per line", false, true),
    q("affects", "Spec IDs this decision constrains, one per line", false, true),
];

const COMPONENT_QUESTIONS: &[Question] = &[
    q("name", "Short name for the component", true, false),
    q("description", "What does this component do?", true, false),
    q("component_kind", "Kind (app/service/library)", false, false),
    q("folder", "Repo-relative folder", true, false),
    q("tech_stack", "Tech stack entries, one per line", false, true),
    q("depends_on", "Component IDs this depends on, one per line", false, true),
    q(
        "external_dependencies",
        "External dependencies, one per line",
        false,
        true,
    ),
];

const CONSTITUTION_QUESTIONS: &[Question] = &[
    q("name", "Short name for the constitution", true, false),
    q("description", "What does it govern?", true, false),
    q(
        "articles",
        "Articles as 'Title: principle', one per line",
        true,
        true,
    ),
];

const MILESTONE_QUESTIONS: &[Question] = &[
    q("name", "Short name for the milestone", true, false),
    q("description", "What does reaching it mean?", true, false),
    q("target_date", "Target date (YYYY-MM-DD)", false, false),
    q("requirements", "Requirement IDs in scope, one per line", false, true),
    q("plans", "Plan IDs in scope, one per line", false, true),
];

pub fn questions_for(spec_type: SpecType) -> &'static [Question] {
    match spec_type {
        SpecType::Requirement => REQUIREMENT_QUESTIONS,
        SpecType::Plan => PLAN_QUESTIONS,
        SpecType::Decision => DECISION_QUESTIONS,
        SpecType::Component => COMPONENT_QUESTIONS,
        SpecType::Constitution => CONSTITUTION_QUESTIONS,
        SpecType::Milestone => MILESTONE_QUESTIONS,
    }
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// In-progress entity being built one question at a time. Persisted under
/// `.specs/drafts/` so a session can resume; finalize turns it into a real
/// spec and removes the draft file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    pub id: String,
    pub spec_type: SpecType,
    pub slug: String,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    #[serde(default)]
    pub cursor: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Draft {
    // ---------------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------------

    pub fn start(root: &Path, spec_type: SpecType, slug: &str) -> Result<Self> {
        if !paths::is_initialized(root) {
            return Err(SpecError::NotInitialized);
        }
        paths::validate_slug(slug)?;

        let now = Utc::now();
        let draft = Self {
            id: format!("draft-{:03}", next_draft_number(root)?),
            spec_type,
            slug: slug.to_string(),
            answers: BTreeMap::new(),
            cursor: 0,
            created_at: now,
            updated_at: now,
        };
        draft.save(root)?;
        Ok(draft)
    }

    pub fn load(root: &Path, draft_id: &str) -> Result<Self> {
        let file = paths::draft_file(root, draft_id);
        if !file.exists() {
            return Err(SpecError::DraftNotFound(draft_id.to_string()));
        }
        let data = std::fs::read_to_string(&file)?;
        let draft: Draft = serde_yaml::from_str(&data)?;
        Ok(draft)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let file = paths::draft_file(root, &self.id);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&file, data.as_bytes())
    }

    pub fn abandon(root: &Path, draft_id: &str) -> Result<()> {
        let file = paths::draft_file(root, draft_id);
        if !file.exists() {
            return Err(SpecError::DraftNotFound(draft_id.to_string()));
        }
        std::fs::remove_file(&file)?;
        Ok(())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = paths::drafts_dir(root);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut drafts = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(stem) = name.strip_suffix(".yaml") else {
                continue;
            };
            if stem.starts_with("draft-") {
                drafts.push(Self::load(root, stem)?);
            }
        }
        drafts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(drafts)
    }

    // ---------------------------------------------------------------------------
    // Question flow
    // ---------------------------------------------------------------------------

    pub fn questions(&self) -> &'static [Question] {
        questions_for(self.spec_type)
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.questions().len()
    }

    /// The question the cursor sits on, or `None` once all are answered.
    pub fn current_question(&self) -> Option<&'static Question> {
        self.questions().get(self.cursor)
    }

    /// Record an answer for the current question and advance.
    ///
    /// An empty answer skips an optional question; for a required one it is
    /// rejected and the cursor stays put.
    pub fn answer(&mut self, text: &str) -> Result<()> {
        let question = self
            .current_question()
            .ok_or_else(|| SpecError::DraftComplete(self.id.clone()))?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            if question.required {
                return Err(SpecError::AnswerRequired(question.key.to_string()));
            }
        } else {
            self.answers
                .insert(question.key.to_string(), trimmed.to_string());
        }
        self.cursor += 1;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn missing_required(&self) -> Vec<&'static str> {
        self.questions()
            .iter()
            .filter(|question| question.required && !self.answers.contains_key(question.key))
            .map(|question| question.key)
            .collect()
    }

    // ---------------------------------------------------------------------------
    // Finalize
    // ---------------------------------------------------------------------------

    /// Build the entity from the answers, persist it with the next number for
    /// its type, and remove the draft file. Returns the new spec ID.
    pub fn finalize(&self, root: &Path) -> Result<SpecId> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(SpecError::DraftIncomplete {
                id: self.id.clone(),
                missing: missing.join(", "),
            });
        }

        let number = store::next_number(root, self.spec_type)?;
        let spec = self.build(number)?;
        store::create(root, &spec)?;
        Self::abandon(root, &self.id)?;
        Ok(spec.id())
    }

    fn build(&self, number: u32) -> Result<AnySpec> {
        let name = self.text("name");
        let description = self.text("description");

        let spec = match self.spec_type {
            SpecType::Requirement => {
                let kind = FromStr::from_str(&self.text("kind"))?;
                let mut req = Requirement::new(number, &self.slug, name, kind);
                req.description = description;
                if let Some(p) = self.answers.get("priority") {
                    req.priority = FromStr::from_str(p)?;
                }
                for line in self.lines("criteria") {
                    req.add_criterion(line);
                }
                req.depends_on = self.lines("depends_on");
                AnySpec::Requirement(req)
            }
            SpecType::Plan => {
                let mut plan = Plan::new(number, &self.slug, name);
                plan.description = description;
                plan.criteria_refs = self.lines("criteria_refs");
                for line in self.lines("tasks") {
                    plan.add_task(line);
                }
                for line in self.lines("test_cases") {
                    crate::item::push_item(&mut plan.test_cases, crate::plan::TestCase::new(line));
                }
                plan.depends_on = self.lines("depends_on");
                AnySpec::Plan(plan)
            }
            SpecType::Decision => {
                let mut dec = Decision::new(number, &self.slug, name);
                dec.description = description;
                dec.decision = self.text("decision");
                dec.context = self.text("context");
                dec.consequences = self.lines("consequences");
                dec.alternatives = self.lines("alternatives");
                dec.affects = self.lines("affects");
                AnySpec::Decision(dec)
            }
            SpecType::Component => {
                let mut cmp = Component::new(number, &self.slug, name);
                cmp.description = description;
                if let Some(k) = self.answers.get("component_kind") {
                    cmp.component_kind = FromStr::from_str(k)?;
                }
                cmp.folder = self.text("folder");
                cmp.tech_stack = self.lines("tech_stack");
                cmp.depends_on = self.lines("depends_on");
                cmp.external_dependencies = self.lines("external_dependencies");
                AnySpec::Component(cmp)
            }
            SpecType::Constitution => {
                let mut con = Constitution::new(number, &self.slug, name);
                con.description = description;
                for line in self.lines("articles") {
                    let (title, principle) = line.split_once(':').ok_or_else(|| {
                        SpecError::InvalidField {
                            field: "articles".to_string(),
                            reason: format!("expected 'Title: principle', got '{line}'"),
                        }
                    })?;
                    con.add_article(title.trim(), principle.trim());
                }
                AnySpec::Constitution(con)
            }
            SpecType::Milestone => {
                let mut mil = Milestone::new(number, &self.slug, name);
                mil.description = description;
                if let Some(d) = self.answers.get("target_date") {
                    let date = NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|_| {
                        SpecError::InvalidField {
                            field: "target_date".to_string(),
                            reason: format!("'{d}' is not YYYY-MM-DD"),
                        }
                    })?;
                    mil.target_date = Some(date);
                }
                mil.requirements = self.lines("requirements");
                mil.plans = self.lines("plans");
                AnySpec::Milestone(mil)
            }
        };
        Ok(spec)
    }

    fn text(&self, key: &str) -> String {
        self.answers.get(key).cloned().unwrap_or_default()
    }

    fn lines(&self, key: &str) -> Vec<String> {
        self.answers
            .get(key)
            .map(|a| {
                a.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn next_draft_number(root: &Path) -> Result<u32> {
    let dir = paths::drafts_dir(root);
    if !dir.exists() {
        return Ok(1);
    }
    let mut max = 0;
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(n) = name
            .strip_prefix("draft-")
            .and_then(|rest| rest.strip_suffix(".yaml"))
            .and_then(|n| n.parse::<u32>().ok())
        {
            max = max.max(n);
        }
    }
    Ok(max + 1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init(dir: &TempDir) {
        crate::io::ensure_dir(&paths::specs_dir(dir.path())).unwrap();
    }

    fn answer_requirement(draft: &mut Draft) {
        draft.answer("User auth").unwrap();
        draft.answer("Users can sign in").unwrap();
        draft.answer("business").unwrap();
        draft.answer("critical").unwrap();
        draft.answer("login works\nlogout works").unwrap();
        draft.answer("").unwrap(); // depends_on skipped
    }

    #[test]
    fn draft_walks_all_questions() {
        let dir = TempDir::new().unwrap();
        init(&dir);

        let mut draft = Draft::start(dir.path(), SpecType::Requirement, "user-auth").unwrap();
        assert_eq!(draft.id, "draft-001");
        assert_eq!(draft.current_question().unwrap().key, "name");

        answer_requirement(&mut draft);
        assert!(draft.is_complete());
        assert!(draft.current_question().is_none());
        assert!(matches!(
            draft.answer("late"),
            Err(SpecError::DraftComplete(_))
        ));
    }

    #[test]
    fn required_question_rejects_empty() {
        let dir = TempDir::new().unwrap();
        init(&dir);

        let mut draft = Draft::start(dir.path(), SpecType::Requirement, "user-auth").unwrap();
        let err = draft.answer("  ").unwrap_err();
        assert!(matches!(err, SpecError::AnswerRequired(_)));
        // Cursor did not advance.
        assert_eq!(draft.current_question().unwrap().key, "name");
    }

    #[test]
    fn finalize_builds_requirement() {
        let dir = TempDir::new().unwrap();
        init(&dir);

        let mut draft = Draft::start(dir.path(), SpecType::Requirement, "user-auth").unwrap();
        answer_requirement(&mut draft);
        let id = draft.finalize(dir.path()).unwrap();
        assert_eq!(id.to_string(), "req-001-user-auth");

        let spec = store::load(dir.path(), &id).unwrap();
        let AnySpec::Requirement(req) = spec else {
            panic!("expected requirement")
        };
        assert_eq!(req.priority, crate::types::Priority::Critical);
        assert_eq!(req.criteria.len(), 2);
        assert_eq!(req.criteria[1].id, "crt-002");

        // Draft file is gone.
        assert!(matches!(
            Draft::load(dir.path(), "draft-001"),
            Err(SpecError::DraftNotFound(_))
        ));
    }

    #[test]
    fn finalize_incomplete_draft_fails() {
        let dir = TempDir::new().unwrap();
        init(&dir);

        let mut draft = Draft::start(dir.path(), SpecType::Requirement, "user-auth").unwrap();
        draft.answer("User auth").unwrap();
        let err = draft.finalize(dir.path()).unwrap_err();
        let SpecError::DraftIncomplete { missing, .. } = err else {
            panic!("expected DraftIncomplete")
        };
        assert!(missing.contains("criteria"));
    }

    #[test]
    fn finalize_constitution_parses_articles() {
        let dir = TempDir::new().unwrap();
        init(&dir);

        let mut draft = Draft::start(dir.path(), SpecType::Constitution, "eng").unwrap();
        draft.answer("Engineering principles").unwrap();
        draft.answer("How we build").unwrap();
        draft
            .answer("Simplicity: prefer boring tech\nSafety: no force pushes")
            .unwrap();

        let id = draft.finalize(dir.path()).unwrap();
        let spec = store::load(dir.path(), &id).unwrap();
        let AnySpec::Constitution(con) = spec else {
            panic!("expected constitution")
        };
        assert_eq!(con.articles.len(), 2);
        assert_eq!(con.articles[0].title, "Simplicity");
        assert_eq!(con.articles[1].principle, "no force pushes");
    }

    #[test]
    fn finalize_rejects_bad_article_line() {
        let dir = TempDir::new().unwrap();
        init(&dir);

        let mut draft = Draft::start(dir.path(), SpecType::Constitution, "eng").unwrap();
        draft.answer("Eng").unwrap();
        draft.answer("d").unwrap();
        draft.answer("no separator here").unwrap();

        assert!(matches!(
            draft.finalize(dir.path()),
            Err(SpecError::InvalidField { .. })
        ));
    }

    #[test]
    fn finalize_milestone_parses_date() {
        let dir = TempDir::new().unwrap();
        init(&dir);

        let mut draft = Draft::start(dir.path(), SpecType::Milestone, "beta").unwrap();
        draft.answer("Beta").unwrap();
        draft.answer("feature complete").unwrap();
        draft.answer("2026-09-30").unwrap();
        draft.answer("").unwrap();
        draft.answer("").unwrap();

        let id = draft.finalize(dir.path()).unwrap();
        let AnySpec::Milestone(mil) = store::load(dir.path(), &id).unwrap() else {
            panic!("expected milestone")
        };
        assert_eq!(
            mil.target_date,
            NaiveDate::from_ymd_opt(2026, 9, 30)
        );
    }

    #[test]
    fn draft_ids_increment_and_list() {
        let dir = TempDir::new().unwrap();
        init(&dir);

        Draft::start(dir.path(), SpecType::Plan, "one").unwrap();
        let d2 = Draft::start(dir.path(), SpecType::Decision, "two").unwrap();
        assert_eq!(d2.id, "draft-002");

        let drafts = Draft::list(dir.path()).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].id, "draft-001");

        Draft::abandon(dir.path(), "draft-001").unwrap();
        assert_eq!(Draft::list(dir.path()).unwrap().len(), 1);
        // Numbers are not reused.
        let d3 = Draft::start(dir.path(), SpecType::Plan, "three").unwrap();
        assert_eq!(d3.id, "draft-003");
    }

    #[test]
    fn draft_resumes_from_disk() {
        let dir = TempDir::new().unwrap();
        init(&dir);

        let mut draft = Draft::start(dir.path(), SpecType::Decision, "db").unwrap();
        draft.answer("Use Postgres").unwrap();
        draft.save(dir.path()).unwrap();

        let loaded = Draft::load(dir.path(), &draft.id).unwrap();
        assert_eq!(loaded.cursor, 1);
        assert_eq!(loaded.answers.get("name").unwrap(), "Use Postgres");
        assert_eq!(loaded.current_question().unwrap().key, "description");
    }
}
