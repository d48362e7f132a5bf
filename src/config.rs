//! Loading policy knobs and the optional content bank (courses, subjects,
//! questions, curriculum materials) from TOML.
//!
//! See `BankConfig` for the expected schema. Invalid bank entries are
//! skipped with an error log; a missing or unparsable file falls back to
//! built-in defaults and is never fatal.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::{Difficulty, QuestionKind};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct BankConfig {
  #[serde(default)]
  pub policy: Policy,
  #[serde(default)]
  pub courses: Vec<CourseCfg>,
  #[serde(default)]
  pub subjects: Vec<SubjectCfg>,
  #[serde(default)]
  pub questions: Vec<QuestionCfg>,
  #[serde(default)]
  pub materials: Vec<MaterialCfg>,
}

/// Tunable policy. `max_score` is a closed scale (creation refuses other
/// values); `min_questions = 0` keeps the historical allow-empty behavior.
#[derive(Clone, Debug, Deserialize)]
pub struct Policy {
  #[serde(default = "default_max_score")]
  pub max_score: f32,
  #[serde(default)]
  pub min_questions: usize,
}

impl Default for Policy {
  fn default() -> Self {
    Self { max_score: default_max_score(), min_questions: 0 }
  }
}

fn default_max_score() -> f32 {
  7.0
}

#[derive(Clone, Debug, Deserialize)]
pub struct CourseCfg {
  #[serde(default)] pub id: Option<String>,
  pub name: String,
  #[serde(default)] pub grade: String,
}

/// Course reference as it historically arrives: sometimes a bare id,
/// sometimes an expanded object. Normalized to the id at this boundary so
/// core logic never branches on shape.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum CourseRef {
  Id(String),
  Expanded { id: String },
}

impl CourseRef {
  pub fn into_id(self) -> String {
    match self {
      CourseRef::Id(id) => id,
      CourseRef::Expanded { id } => id,
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SubjectCfg {
  #[serde(default)] pub id: Option<String>,
  pub name: String,
  pub course: CourseRef,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionTypeCfg {
  MultipleChoice,
  TrueFalse,
  Open,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OptionCfg {
  pub text: String,
  #[serde(default)] pub is_correct: bool,
}

/// Question entry. Options carry the historical `{text, is_correct}` shape;
/// `to_kind` turns them into the structural variant and refuses entries
/// where the single-answer convention does not hold.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  #[serde(default)] pub id: Option<String>,
  pub text: String,
  pub subject: String,
  pub difficulty: Difficulty,
  #[serde(default)] pub grade: String,
  #[serde(default)] pub tags: Vec<String>,
  #[serde(rename = "type")] pub kind: QuestionTypeCfg,
  #[serde(default)] pub options: Vec<OptionCfg>,
  #[serde(default)] pub answer: Option<bool>,
}

impl QuestionCfg {
  pub fn to_kind(&self) -> Result<QuestionKind, String> {
    match self.kind {
      QuestionTypeCfg::MultipleChoice => {
        if self.options.is_empty() {
          return Err("multiple_choice requires a non-empty options list".into());
        }
        let correct: Vec<usize> = self
          .options
          .iter()
          .enumerate()
          .filter(|(_, o)| o.is_correct)
          .map(|(i, _)| i)
          .collect();
        match correct.as_slice() {
          [one] => Ok(QuestionKind::MultipleChoice {
            choices: self.options.iter().map(|o| o.text.clone()).collect(),
            correct: *one,
          }),
          [] => Err("multiple_choice requires exactly one correct option, found none".into()),
          many => Err(format!(
            "multiple_choice requires exactly one correct option, found {}",
            many.len()
          )),
        }
      }
      QuestionTypeCfg::TrueFalse => match self.answer {
        Some(answer) => Ok(QuestionKind::TrueFalse { answer }),
        None => Err("true_false requires an answer".into()),
      },
      QuestionTypeCfg::Open => Ok(QuestionKind::Open),
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MaterialCfg {
  pub course: CourseRef,
  #[serde(default)] pub subject: Option<String>,
  pub title: String,
  #[serde(default)] pub objectives: Vec<String>,
}

/// Attempt to load `BankConfig` from BANK_CONFIG_PATH. On any parsing/IO
/// error, returns None.
pub fn load_bank_config_from_env() -> Option<BankConfig> {
  let path = std::env::var("BANK_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<BankConfig>(&s) {
      Ok(cfg) => {
        info!(target: "aula_backend", %path, "Loaded bank config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "aula_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "aula_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn course_reference_accepts_both_shapes() {
    let bare: SubjectCfg = toml::from_str(r#"name = "Matemática"
course = "c1""#)
      .expect("bare id");
    assert_eq!(bare.course.into_id(), "c1");

    let expanded: SubjectCfg = toml::from_str(r#"name = "Matemática"
course = { id = "c1" }"#)
      .expect("expanded object");
    assert_eq!(expanded.course.into_id(), "c1");
  }

  #[test]
  fn single_answer_convention_is_enforced_structurally() {
    let mut q = QuestionCfg {
      id: None,
      text: "2 + 2 = ?".into(),
      subject: "s1".into(),
      difficulty: Difficulty::Easy,
      grade: String::new(),
      tags: vec![],
      kind: QuestionTypeCfg::MultipleChoice,
      options: vec![
        OptionCfg { text: "3".into(), is_correct: false },
        OptionCfg { text: "4".into(), is_correct: true },
      ],
      answer: None,
    };
    match q.to_kind().expect("one correct option") {
      QuestionKind::MultipleChoice { correct, choices } => {
        assert_eq!(correct, 1);
        assert_eq!(choices.len(), 2);
      }
      other => panic!("unexpected kind: {other:?}"),
    }

    q.options[0].is_correct = true;
    assert!(q.to_kind().is_err(), "two correct options must be refused");

    q.options[0].is_correct = false;
    q.options[1].is_correct = false;
    assert!(q.to_kind().is_err(), "zero correct options must be refused");
  }

  #[test]
  fn policy_defaults_match_current_school_rules() {
    let p = Policy::default();
    assert_eq!(p.max_score, 7.0);
    assert_eq!(p.min_questions, 0);
  }
}
