//! Quiz flow controller: intro → subject/level selection → countdown → loading → questions → results.
//!
//! The whole session lives in one `Phase` value and only `QuizController::handle` changes it, so a
//! session can never be "finished and loading" at once. The driver (terminal client, tests) feeds
//! events: user actions, the provider's answer, and one `Tick` per second for the current question.
//! Ticks carry the question index they were armed for; ticks for any other question are dropped.

use tracing::{debug, info};

use crate::domain::{canonical, Question, LEVELS, SUBJECTS};
use crate::error::QuizError;

/// Seconds a player gets per question.
pub const TIME_LIMIT_SECS: u32 = 15;
/// Lead-in shown before the first question.
pub const COUNTDOWN_SECS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
  pub subject: String,
  pub level: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
  pub correct: u32,
  pub wrong: u32,
  pub seconds_used: u32,
}

/// Outcome of the question currently on screen, once it has been answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
  pub selected: usize,
  pub correct: bool,
  pub correct_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveQuiz {
  pub selection: Selection,
  pub questions: Vec<Question>,
  pub index: usize,
  pub elapsed: u32,
  pub selected: Option<usize>,
  pub tally: Tally,
}

impl ActiveQuiz {
  pub fn current(&self) -> &Question {
    &self.questions[self.index]
  }

  pub fn remaining_secs(&self) -> u32 {
    TIME_LIMIT_SECS.saturating_sub(self.elapsed)
  }

  pub fn feedback(&self) -> Option<Feedback> {
    let selected = self.selected?;
    let q = self.current();
    Some(Feedback {
      selected,
      correct: q.options[selected] == q.correct_answer,
      correct_index: q.correct_index(),
    })
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
  pub selection: Selection,
  pub tally: Tally,
  pub total: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
  Intro,
  SubjectSelect { subject: Option<String>, level: Option<String> },
  Countdown(Selection),
  Loading(Selection),
  Error { message: String },
  Active(ActiveQuiz),
  Finished(Summary),
}

impl Phase {
  pub fn name(&self) -> &'static str {
    match self {
      Phase::Intro => "intro",
      Phase::SubjectSelect { .. } => "subject-select",
      Phase::Countdown(_) => "countdown",
      Phase::Loading(_) => "quiz-loading",
      Phase::Error { .. } => "quiz-error",
      Phase::Active(_) => "quiz-active",
      Phase::Finished(_) => "quiz-finished",
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
  Start,
  PickSubject(String),
  PickLevel(String),
  Continue,
  Go,
  Loaded(Vec<Question>),
  LoadFailed(String),
  Tick { question: usize },
  Select(usize),
  Next,
  Restart,
}

impl Event {
  pub fn name(&self) -> &'static str {
    match self {
      Event::Start => "start",
      Event::PickSubject(_) => "pick-subject",
      Event::PickLevel(_) => "pick-level",
      Event::Continue => "continue",
      Event::Go => "go",
      Event::Loaded(_) => "loaded",
      Event::LoadFailed(_) => "load-failed",
      Event::Tick { .. } => "tick",
      Event::Select(_) => "select",
      Event::Next => "next",
      Event::Restart => "restart",
    }
  }
}

#[derive(Debug, Clone)]
pub struct QuizController {
  phase: Phase,
}

impl Default for QuizController {
  fn default() -> Self {
    Self::new()
  }
}

impl QuizController {
  pub fn new() -> Self {
    Self { phase: Phase::Intro }
  }

  pub fn phase(&self) -> &Phase {
    &self.phase
  }

  /// Apply one event. Rejected events leave the phase untouched.
  pub fn handle(&mut self, event: Event) -> Result<(), QuizError> {
    let from = self.phase.name();
    let ev = event.name();
    let next = transition(&self.phase, event)?;
    if let Some(next) = next {
      if next.name() != from {
        info!(target: "quiz", from, to = next.name(), event = ev, "Phase change");
      }
      self.phase = next;
    }
    Ok(())
  }
}

fn invalid(phase: &Phase, event: &Event) -> QuizError {
  QuizError::InvalidTransition { phase: phase.name(), event: event.name() }
}

/// Pure transition function. `Ok(None)` means the event was accepted but changes nothing
/// (e.g. a stale tick).
fn transition(phase: &Phase, event: Event) -> Result<Option<Phase>, QuizError> {
  if event == Event::Restart {
    return Ok(Some(Phase::Intro));
  }

  match (phase, event) {
    (Phase::Intro, Event::Start) => Ok(Some(Phase::SubjectSelect { subject: None, level: None })),

    (Phase::SubjectSelect { level, .. }, Event::PickSubject(s)) => {
      let subject = canonical(SUBJECTS, &s).ok_or(QuizError::UnknownSubject(s))?;
      Ok(Some(Phase::SubjectSelect { subject: Some(subject.to_string()), level: level.clone() }))
    }
    (Phase::SubjectSelect { subject, .. }, Event::PickLevel(l)) => {
      let level = canonical(LEVELS, &l).ok_or(QuizError::UnknownLevel(l))?;
      Ok(Some(Phase::SubjectSelect { subject: subject.clone(), level: Some(level.to_string()) }))
    }
    (Phase::SubjectSelect { subject, level }, Event::Continue) => match (subject, level) {
      (Some(subject), Some(level)) => Ok(Some(Phase::Countdown(Selection {
        subject: subject.clone(),
        level: level.clone(),
      }))),
      _ => Err(QuizError::IncompleteSelection),
    },

    (Phase::Countdown(sel), Event::Go) => Ok(Some(Phase::Loading(sel.clone()))),

    (Phase::Loading(sel), Event::Loaded(questions)) => {
      if questions.is_empty() {
        return Ok(Some(Phase::Error { message: "No questions were returned.".into() }));
      }
      Ok(Some(Phase::Active(ActiveQuiz {
        selection: sel.clone(),
        questions,
        index: 0,
        elapsed: 0,
        selected: None,
        tally: Tally::default(),
      })))
    }
    (Phase::Loading(_), Event::LoadFailed(message)) => Ok(Some(Phase::Error { message })),

    (Phase::Active(quiz), Event::Tick { question }) => {
      if question != quiz.index || quiz.selected.is_some() {
        debug!(target: "quiz", tick_for = question, current = quiz.index, "Ignoring stale tick");
        return Ok(None);
      }
      let mut quiz = quiz.clone();
      quiz.elapsed = (quiz.elapsed + 1).min(TIME_LIMIT_SECS);
      if quiz.elapsed < TIME_LIMIT_SECS {
        return Ok(Some(Phase::Active(quiz)));
      }
      quiz.tally.wrong += 1;
      quiz.tally.seconds_used += TIME_LIMIT_SECS;
      info!(target: "quiz", question = quiz.index, "Time is up; scored wrong");
      Ok(Some(advance(quiz)))
    }

    (Phase::Active(quiz), event @ Event::Select(i)) => {
      if quiz.selected.is_some() {
        return Err(invalid(phase, &event));
      }
      let q = quiz.current();
      if i >= q.options.len() {
        return Err(QuizError::OptionOutOfRange(i));
      }
      let mut quiz = quiz.clone();
      let correct = quiz.current().options[i] == quiz.current().correct_answer;
      quiz.selected = Some(i);
      quiz.tally.seconds_used += quiz.elapsed;
      if correct {
        quiz.tally.correct += 1;
      } else {
        quiz.tally.wrong += 1;
      }
      debug!(target: "quiz", question = quiz.index, selected = i, correct, elapsed = quiz.elapsed, "Answer recorded");
      Ok(Some(Phase::Active(quiz)))
    }

    (Phase::Active(quiz), event @ Event::Next) => {
      if quiz.selected.is_none() {
        return Err(invalid(phase, &event));
      }
      Ok(Some(advance(quiz.clone())))
    }

    (phase, event) => Err(invalid(phase, &event)),
  }
}

/// Move to the next question with a fresh timer, or to the results after the last one.
fn advance(mut quiz: ActiveQuiz) -> Phase {
  if quiz.index + 1 >= quiz.questions.len() {
    return Phase::Finished(Summary {
      selection: quiz.selection,
      tally: quiz.tally,
      total: quiz.questions.len(),
    });
  }
  quiz.index += 1;
  quiz.elapsed = 0;
  quiz.selected = None;
  Phase::Active(quiz)
}
