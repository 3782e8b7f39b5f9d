//! Prompt session: ordered questions, answer collection, and the
//! confirm-or-revise loop that precedes any disk mutation

use crate::templates::{ConflictChoice, FileConflict};
use anyhow::Result;
use semver::Version;
use std::collections::BTreeMap;

/// Question keys, in display order
pub mod keys {
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const VERSION: &str = "version";
    pub const AUTHOR: &str = "author";
    pub const REPOSITORY: &str = "repository";
    pub const NAME_SLUG: &str = "nameSlug";
}

/// A single configuration question
#[derive(Debug, Clone)]
pub struct Question {
    pub key: &'static str,
    pub prompt: &'static str,
    pub default: Option<String>,
}

/// Terminal contract: everything the pipeline needs from the prompt
/// rendering engine. The interactive implementation lives in `tui`;
/// tests drive the session with a scripted implementation.
pub trait Prompter {
    /// Ask a free-form question. An empty string means "no answer".
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<String>;

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &str, initial: bool) -> Result<bool>;

    /// Show a multi-line note (e.g., the manifest summary).
    fn note(&mut self, title: &str, body: &str) -> Result<()>;

    fn info(&mut self, message: &str) -> Result<()>;
    fn success(&mut self, message: &str) -> Result<()>;
    fn warning(&mut self, message: &str) -> Result<()>;

    /// Decide what to do with a materialization target that already
    /// exists with different content.
    fn resolve_conflict(&mut self, conflict: &FileConflict) -> Result<ConflictChoice>;
}

/// Confirmed answers for one scaffolding run, immutable once built.
/// Declining the review produces a fresh set seeded from this one.
#[derive(Debug, Clone)]
pub struct AnswerSet {
    values: BTreeMap<String, String>,
    name_slug: String,
}

impl AnswerSet {
    /// Build from collected values. Returns None when the mandatory
    /// `name` answer is missing - scaffolding cannot proceed without it.
    pub fn from_values(values: BTreeMap<String, String>) -> Option<Self> {
        let name = values.get(keys::NAME)?;
        if name.is_empty() {
            return None;
        }
        let name_slug = slugify(name);
        Some(Self { values, name_slug })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn name_slug(&self) -> &str {
        &self.name_slug
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Substitution variables for template rendering: every answer plus
    /// the derived slug.
    pub fn vars(&self) -> BTreeMap<String, String> {
        let mut vars = self.values.clone();
        vars.insert(keys::NAME_SLUG.to_string(), self.name_slug.clone());
        vars
    }
}

/// Derive a package-safe slug: lowercase, runs of non-alphanumeric
/// characters collapsed to a single `-`, no leading/trailing separator.
/// Alphanumeric is Unicode-aware, so accented letters survive.
/// Idempotent: slugifying a slug is a no-op.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// The fixed question sequence, seeded from stored defaults where
/// available. `dir_basename` is the fallback project name.
pub fn config_questions(defaults: &BTreeMap<String, String>, dir_basename: &str) -> Vec<Question> {
    let default_for = |key: &str, fallback: Option<&str>| {
        defaults
            .get(key)
            .cloned()
            .or_else(|| fallback.map(str::to_string))
    };

    vec![
        Question {
            key: keys::NAME,
            prompt: "Project name:",
            default: default_for(keys::NAME, Some(dir_basename)),
        },
        Question {
            key: keys::DESCRIPTION,
            prompt: "Description:",
            default: default_for(keys::DESCRIPTION, None),
        },
        Question {
            key: keys::VERSION,
            prompt: "Version:",
            default: default_for(keys::VERSION, Some("0.0.0")),
        },
        Question {
            key: keys::AUTHOR,
            prompt: "Author:",
            default: default_for(keys::AUTHOR, None),
        },
        Question {
            key: keys::REPOSITORY,
            prompt: "Git repository:",
            default: default_for(keys::REPOSITORY, None),
        },
    ]
}

/// Terminal outcome of the prompt session
#[derive(Debug)]
pub enum SessionOutcome {
    Confirmed(AnswerSet),
    Aborted,
}

/// Revise-loop states. Prompting re-enters with the declined round's
/// answers as the new defaults, so nothing the user typed is lost.
enum SessionState {
    Prompting(BTreeMap<String, String>),
    Reviewing(AnswerSet),
    Confirmed(AnswerSet),
    Aborted,
}

/// Drive the prompt -> review -> confirm-or-revise loop to completion.
/// `summarize` renders the would-be manifest for the review step.
pub fn run_session<P, F>(
    prompter: &mut P,
    defaults: &BTreeMap<String, String>,
    dir_basename: &str,
    summarize: F,
) -> Result<SessionOutcome>
where
    P: Prompter + ?Sized,
    F: Fn(&AnswerSet) -> String,
{
    let mut state = SessionState::Prompting(defaults.clone());
    loop {
        state = match state {
            SessionState::Prompting(defaults) => {
                let questions = config_questions(&defaults, dir_basename);
                let values = collect_answers(prompter, &questions)?;
                match AnswerSet::from_values(values) {
                    Some(answers) => SessionState::Reviewing(answers),
                    None => SessionState::Aborted,
                }
            }
            SessionState::Reviewing(answers) => {
                prompter.note("package.json", &summarize(&answers))?;
                if prompter.confirm("Is this OK?", true)? {
                    SessionState::Confirmed(answers)
                } else {
                    SessionState::Prompting(answers.values().clone())
                }
            }
            SessionState::Confirmed(answers) => return Ok(SessionOutcome::Confirmed(answers)),
            SessionState::Aborted => return Ok(SessionOutcome::Aborted),
        };
    }
}

/// Ask every question in order. Empty answers are dropped rather than
/// stored as empty strings, so absent fields stay absent downstream.
fn collect_answers<P: Prompter + ?Sized>(
    prompter: &mut P,
    questions: &[Question],
) -> Result<BTreeMap<String, String>> {
    let mut values = BTreeMap::new();
    for question in questions {
        loop {
            let raw = prompter.input(question.prompt, question.default.as_deref())?;
            let answer = raw.trim();

            if question.key == keys::VERSION
                && !answer.is_empty()
                && Version::parse(answer).is_err()
            {
                prompter.warning(&format!("\"{}\" is not a valid semver version", answer))?;
                // The offered default itself is unusable and came straight
                // back (non-interactive mode, or the user just accepted
                // it). Re-asking would never terminate; drop the answer
                // instead of looping.
                if Some(answer) == question.default.as_deref().map(str::trim) {
                    break;
                }
                continue;
            }

            if !answer.is_empty() {
                values.insert(question.key.to_string(), answer.to_string());
            }
            break;
        }
    }
    Ok(values)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted prompter: pops canned answers, falls back to the
    /// question's default, records everything it was shown. Conflicts
    /// play back `conflict_choices` first, then `conflict_choice`.
    pub struct ScriptedPrompter {
        pub inputs: VecDeque<Option<String>>,
        pub confirms: VecDeque<bool>,
        pub conflict_choice: ConflictChoice,
        pub conflict_choices: VecDeque<ConflictChoice>,
        pub seen_defaults: Vec<Option<String>>,
        pub notes: Vec<String>,
        pub log: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn new(inputs: Vec<Option<&str>>, confirms: Vec<bool>) -> Self {
            Self {
                inputs: inputs
                    .into_iter()
                    .map(|o| o.map(str::to_string))
                    .collect(),
                confirms: confirms.into_iter().collect(),
                conflict_choice: ConflictChoice::Skip,
                conflict_choices: VecDeque::new(),
                seen_defaults: Vec::new(),
                notes: Vec::new(),
                log: Vec::new(),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn input(&mut self, _prompt: &str, default: Option<&str>) -> Result<String> {
            self.seen_defaults.push(default.map(str::to_string));
            let scripted = self.inputs.pop_front().flatten();
            Ok(scripted
                .or_else(|| default.map(str::to_string))
                .unwrap_or_default())
        }

        fn confirm(&mut self, _prompt: &str, initial: bool) -> Result<bool> {
            Ok(self.confirms.pop_front().unwrap_or(initial))
        }

        fn note(&mut self, _title: &str, body: &str) -> Result<()> {
            self.notes.push(body.to_string());
            Ok(())
        }

        fn info(&mut self, message: &str) -> Result<()> {
            self.log.push(message.to_string());
            Ok(())
        }

        fn success(&mut self, message: &str) -> Result<()> {
            self.log.push(message.to_string());
            Ok(())
        }

        fn warning(&mut self, message: &str) -> Result<()> {
            self.log.push(message.to_string());
            Ok(())
        }

        fn resolve_conflict(&mut self, _conflict: &FileConflict) -> Result<ConflictChoice> {
            Ok(self
                .conflict_choices
                .pop_front()
                .unwrap_or(self.conflict_choice))
        }
    }
}
