//! Difficulty scoring for the composition wizard.
//!
//! A pure function of the current selection: weighted scalar score, a
//! three-way band, and per-bucket percentages for the distribution bars.
//! Recomputed on every toggle, never persisted.

use serde::Serialize;

use crate::domain::Difficulty;

/// Band shown next to the score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyBand {
  Basica,
  Intermedia,
  Avanzada,
}

/// Live feedback DTO for the wizard.
#[derive(Clone, Debug, Serialize)]
pub struct DifficultyReport {
  pub score: f32,
  pub band: DifficultyBand,
  pub easy: usize,
  pub medium: usize,
  pub hard: usize,
  #[serde(rename = "easyPct")]
  pub easy_pct: f32,
  #[serde(rename = "mediumPct")]
  pub medium_pct: f32,
  #[serde(rename = "hardPct")]
  pub hard_pct: f32,
}

/// Weighted difficulty of a selection: easy=1, medium=2, hard=3, averaged.
/// An empty selection divides by one instead of zero and lands on the
/// Básica baseline with all bars at 0%.
pub fn difficulty_report<'a, I>(selected: I) -> DifficultyReport
where
  I: IntoIterator<Item = &'a Difficulty>,
{
  let (mut easy, mut medium, mut hard) = (0usize, 0usize, 0usize);
  for d in selected {
    match d {
      Difficulty::Easy => easy += 1,
      Difficulty::Medium => medium += 1,
      Difficulty::Hard => hard += 1,
    }
  }
  let total = (easy + medium + hard).max(1);

  let score = (easy + medium * 2 + hard * 3) as f32 / total as f32;
  DifficultyReport {
    score,
    band: band_for(score),
    easy,
    medium,
    hard,
    easy_pct: easy as f32 * 100.0 / total as f32,
    medium_pct: medium as f32 * 100.0 / total as f32,
    hard_pct: hard as f32 * 100.0 / total as f32,
  }
}

fn band_for(score: f32) -> DifficultyBand {
  if score < 1.6 {
    DifficultyBand::Basica
  } else if score < 2.4 {
    DifficultyBand::Intermedia
  } else {
    DifficultyBand::Avanzada
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_selection_is_the_basica_baseline() {
    let none: [Difficulty; 0] = [];
    let r = difficulty_report(none.iter());
    assert_eq!(r.score, 0.0);
    assert_eq!(r.band, DifficultyBand::Basica);
    assert_eq!((r.easy_pct, r.medium_pct, r.hard_pct), (0.0, 0.0, 0.0));
  }

  #[test]
  fn two_easy_one_hard_is_intermedia() {
    let sel = [Difficulty::Easy, Difficulty::Easy, Difficulty::Hard];
    let r = difficulty_report(sel.iter());
    assert!((r.score - 5.0 / 3.0).abs() < 1e-6, "score={}", r.score);
    assert_eq!(r.band, DifficultyBand::Intermedia);
    assert_eq!((r.easy, r.medium, r.hard), (2, 0, 1));
  }

  #[test]
  fn band_edges() {
    let all_easy = [Difficulty::Easy, Difficulty::Easy];
    assert_eq!(difficulty_report(all_easy.iter()).band, DifficultyBand::Basica);

    // 1 easy + 4 medium = 9/5 = 1.8
    let mixed = [
      Difficulty::Easy,
      Difficulty::Medium,
      Difficulty::Medium,
      Difficulty::Medium,
      Difficulty::Medium,
    ];
    assert_eq!(difficulty_report(mixed.iter()).band, DifficultyBand::Intermedia);

    let all_hard = [Difficulty::Hard, Difficulty::Hard];
    assert_eq!(difficulty_report(all_hard.iter()).band, DifficultyBand::Avanzada);

    // exactly 2.4: 3 medium + 2 hard = 12/5
    let edge = [
      Difficulty::Medium,
      Difficulty::Medium,
      Difficulty::Medium,
      Difficulty::Hard,
      Difficulty::Hard,
    ];
    assert_eq!(difficulty_report(edge.iter()).band, DifficultyBand::Avanzada);
  }

  #[test]
  fn deterministic_for_the_same_selection() {
    let sel = [Difficulty::Medium, Difficulty::Hard, Difficulty::Easy];
    let a = difficulty_report(sel.iter());
    let b = difficulty_report(sel.iter());
    assert_eq!(a.score, b.score);
    assert_eq!(a.band, b.band);
  }

  #[test]
  fn percentages_sum_to_one_hundred_for_nonempty_selections() {
    let sel = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard, Difficulty::Hard];
    let r = difficulty_report(sel.iter());
    assert!((r.easy_pct + r.medium_pct + r.hard_pct - 100.0).abs() < 1e-4);
  }
}
