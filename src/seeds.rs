//! Canned questions that guarantee a playable quiz even when every generation service is down.

use std::collections::HashMap;

use tracing::error;

use crate::config::FallbackQuestionCfg;
use crate::domain::{Question, DEFAULT_SUBJECT};

/// Subject-keyed table of canned questions. Keys are stored lowercase.
#[derive(Clone, Debug)]
pub struct FallbackBank {
  by_subject: HashMap<String, Vec<Question>>,
}

impl FallbackBank {
  /// Built-in tables plus any well-formed entries from configuration.
  pub fn new(extra: &[FallbackQuestionCfg]) -> Self {
    let mut by_subject: HashMap<String, Vec<Question>> = HashMap::new();
    for (subject, questions) in seed_questions() {
      by_subject.insert(subject.to_lowercase(), questions);
    }

    for cfg in extra {
      let q = Question {
        question: cfg.question.clone(),
        options: cfg.options.clone(),
        correct_answer: cfg.correct_answer.clone(),
      };
      if !q.is_well_formed() {
        error!(target: "questions", subject = %cfg.subject, question = %cfg.question, "Skipping configured fallback question: malformed.");
        continue;
      }
      by_subject.entry(cfg.subject.trim().to_lowercase()).or_default().push(q);
    }

    Self { by_subject }
  }

  /// Up to `count` questions for `subject`, or from the general set when the subject has none.
  pub fn questions_for(&self, subject: &str, count: usize) -> Vec<Question> {
    let key = subject.trim().to_lowercase();
    let pool = self
      .by_subject
      .get(&key)
      .filter(|qs| !qs.is_empty())
      .or_else(|| self.by_subject.get(&DEFAULT_SUBJECT.to_lowercase()))
      .map(Vec::as_slice)
      .unwrap_or_default();
    pool.iter().take(count).cloned().collect()
  }

  /// (subject, count) pairs, handy for the startup inventory log.
  pub fn inventory(&self) -> Vec<(String, usize)> {
    let mut inv: Vec<(String, usize)> = self.by_subject.iter().map(|(k, v)| (k.clone(), v.len())).collect();
    inv.sort();
    inv
  }
}

impl Default for FallbackBank {
  fn default() -> Self {
    Self::new(&[])
  }
}

fn seed_questions() -> Vec<(&'static str, Vec<Question>)> {
  vec![
    (
      DEFAULT_SUBJECT,
      vec![
        Question::new("What is the capital of France?", ["London", "Berlin", "Paris", "Madrid"], "Paris"),
        Question::new("Which planet is known as the Red Planet?", ["Venus", "Mars", "Jupiter", "Saturn"], "Mars"),
        Question::new("What is the largest ocean on Earth?", ["Atlantic", "Indian", "Arctic", "Pacific"], "Pacific"),
        Question::new("How many continents are there?", ["5", "6", "7", "8"], "7"),
        Question::new("Who painted the Mona Lisa?", ["Van Gogh", "Leonardo da Vinci", "Picasso", "Rembrandt"], "Leonardo da Vinci"),
        Question::new("What is the chemical symbol for water?", ["H2O", "CO2", "O2", "NaCl"], "H2O"),
        Question::new("How many days are in a leap year?", ["364", "365", "366", "367"], "366"),
        Question::new("What is the tallest mountain in the world?", ["K2", "Kangchenjunga", "Mount Everest", "Lhotse"], "Mount Everest"),
        Question::new("Which language has the most native speakers?", ["English", "Spanish", "Hindi", "Mandarin Chinese"], "Mandarin Chinese"),
        Question::new("What is the hardest natural substance?", ["Gold", "Iron", "Diamond", "Quartz"], "Diamond"),
      ],
    ),
    (
      "Mathematics",
      vec![
        Question::new("What is 7 × 8?", ["54", "56", "58", "64"], "56"),
        Question::new("What is the square root of 144?", ["10", "11", "12", "14"], "12"),
        Question::new("What is the value of π rounded to two decimals?", ["3.12", "3.14", "3.16", "3.41"], "3.14"),
        Question::new("How many degrees are in a right angle?", ["45", "90", "180", "360"], "90"),
        Question::new("What is 15% of 200?", ["15", "20", "30", "35"], "30"),
        Question::new("Which of these is a prime number?", ["21", "27", "29", "33"], "29"),
      ],
    ),
    (
      "Science",
      vec![
        Question::new("What gas do plants absorb from the air?", ["Oxygen", "Nitrogen", "Carbon dioxide", "Helium"], "Carbon dioxide"),
        Question::new("What is the center of an atom called?", ["Electron", "Nucleus", "Proton", "Shell"], "Nucleus"),
        Question::new("At what temperature does water boil at sea level?", ["90°C", "100°C", "110°C", "120°C"], "100°C"),
        Question::new("Which organ pumps blood through the body?", ["Lungs", "Liver", "Heart", "Kidneys"], "Heart"),
        Question::new("What force keeps us on the ground?", ["Magnetism", "Friction", "Gravity", "Inertia"], "Gravity"),
        Question::new("What is the closest star to Earth?", ["Sirius", "Proxima Centauri", "The Sun", "Polaris"], "The Sun"),
      ],
    ),
    (
      "History",
      vec![
        Question::new("In which year did World War II end?", ["1943", "1944", "1945", "1946"], "1945"),
        Question::new("Who was the first President of the United States?", ["Thomas Jefferson", "John Adams", "George Washington", "Abraham Lincoln"], "George Washington"),
        Question::new("Which ancient civilization built the pyramids of Giza?", ["Romans", "Greeks", "Egyptians", "Persians"], "Egyptians"),
        Question::new("In which year did the Berlin Wall fall?", ["1987", "1989", "1991", "1993"], "1989"),
        Question::new("Who was the first person to walk on the Moon?", ["Buzz Aldrin", "Yuri Gagarin", "Neil Armstrong", "John Glenn"], "Neil Armstrong"),
        Question::new("Which empire was ruled by Julius Caesar?", ["Ottoman", "Roman", "Mongol", "Byzantine"], "Roman"),
      ],
    ),
    (
      "Geography",
      vec![
        Question::new("What is the longest river in the world?", ["Amazon", "Nile", "Yangtze", "Mississippi"], "Nile"),
        Question::new("Which country has the largest area?", ["Canada", "China", "United States", "Russia"], "Russia"),
        Question::new("What is the capital of Japan?", ["Osaka", "Kyoto", "Tokyo", "Nagoya"], "Tokyo"),
        Question::new("Which desert is the largest hot desert?", ["Gobi", "Kalahari", "Sahara", "Atacama"], "Sahara"),
        Question::new("On which continent is Argentina?", ["Africa", "South America", "Europe", "Asia"], "South America"),
      ],
    ),
    (
      "Literature",
      vec![
        Question::new("Who wrote \"1984\"?", ["Aldous Huxley", "George Orwell", "Ray Bradbury", "H. G. Wells"], "George Orwell"),
        Question::new("Who is the author of \"Don Quixote\"?", ["Miguel de Cervantes", "Lope de Vega", "Dante Alighieri", "Victor Hugo"], "Miguel de Cervantes"),
        Question::new("What is the name of the whale in \"Moby-Dick\"?", ["Leviathan", "Moby Dick", "Queequeg", "Pequod"], "Moby Dick"),
        Question::new("In which city is \"Romeo and Juliet\" set?", ["Venice", "Florence", "Verona", "Rome"], "Verona"),
        Question::new("Which epic poem follows Odysseus on his journey home?", ["The Iliad", "The Aeneid", "Beowulf", "The Odyssey"], "The Odyssey"),
      ],
    ),
  ]
}
