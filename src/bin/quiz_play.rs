//! Terminal quiz client: drives `QuizController` against a running quiz backend.
//!
//! One ticker per question, created when the question is shown and dropped when it is left.

use std::io::Write;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::{interval_at, sleep, Instant};
use tracing::{info, warn};

use quiz_backend::domain::{Question, LEVELS, SUBJECTS};
use quiz_backend::protocol::{ErrorOut, QuestionsIn, QuestionsOut};
use quiz_backend::quiz::{Event, Phase, QuizController, Selection, COUNTDOWN_SECS, TIME_LIMIT_SECS};
use quiz_backend::telemetry;

#[derive(Parser)]
#[command(author, version, about = "Play a timed multiple-choice quiz in the terminal", long_about = None)]
struct Cli {
    /// Base URL of the quiz backend
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Questions per session
    #[arg(short, long, default_value_t = 10)]
    count: u32,
}

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    telemetry::init_tracing_with_default("warn");
    let cli = Cli::parse();

    let http = reqwest::Client::builder().timeout(Duration::from_secs(60)).build()?;
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut controller = QuizController::new();

    loop {
        match controller.phase().clone() {
            Phase::Intro => {
                println!("\n=== Quiz ===\n{TIME_LIMIT_SECS} seconds per question. Press Enter to start, or q to quit.");
                match prompt(&mut input).await? {
                    Some(line) if line.eq_ignore_ascii_case("q") => return Ok(()),
                    Some(_) => controller.handle(Event::Start)?,
                    None => return Ok(()),
                }
            }

            Phase::SubjectSelect { subject, level } => {
                let event = if subject.is_none() {
                    println!("\nPick a subject:");
                    let Some(choice) = pick(&mut input, SUBJECTS).await? else { return Ok(()) };
                    Event::PickSubject(choice)
                } else if level.is_none() {
                    println!("\nPick a level:");
                    let Some(choice) = pick(&mut input, LEVELS).await? else { return Ok(()) };
                    Event::PickLevel(choice)
                } else {
                    Event::Continue
                };
                if let Err(e) = controller.handle(event) {
                    println!("{e}");
                }
            }

            Phase::Countdown(sel) => {
                println!("\n{} · {}. Press Enter when ready.", sel.subject, sel.level);
                if prompt(&mut input).await?.is_none() {
                    return Ok(());
                }
                for n in (1..=COUNTDOWN_SECS).rev() {
                    println!("{n}...");
                    sleep(Duration::from_secs(1)).await;
                }
                controller.handle(Event::Go)?;
            }

            Phase::Loading(sel) => {
                println!("Loading questions...");
                let event = match fetch_questions(&http, &cli.server, &sel, cli.count).await {
                    Ok(questions) => Event::Loaded(questions),
                    Err(message) => {
                        warn!(target: "quiz", %message, "Could not load questions");
                        Event::LoadFailed(message)
                    }
                };
                controller.handle(event)?;
            }

            Phase::Error { message } => {
                println!("\nCould not load the quiz: {message}\nPress Enter to try again, or q to quit.");
                match prompt(&mut input).await? {
                    Some(line) if !line.eq_ignore_ascii_case("q") => controller.handle(Event::Restart)?,
                    _ => return Ok(()),
                }
            }

            Phase::Active(quiz) => {
                if !play_question(&mut controller, &mut input, quiz.index, quiz.questions.len(), quiz.current()).await? {
                    return Ok(());
                }
            }

            Phase::Finished(summary) => {
                let t = summary.tally;
                println!("\n=== Results: {} · {} ===", summary.selection.subject, summary.selection.level);
                println!("Correct: {} / {}", t.correct, summary.total);
                println!("Wrong:   {}", t.wrong);
                println!("Time:    {}s", t.seconds_used);
                info!(target: "quiz", correct = t.correct, wrong = t.wrong, seconds = t.seconds_used, "Session finished");
                println!("\nPress Enter to play again, or q to quit.");
                match prompt(&mut input).await? {
                    Some(line) if !line.eq_ignore_ascii_case("q") => controller.handle(Event::Restart)?,
                    _ => return Ok(()),
                }
            }
        }
    }
}

/// Show one question and run its timer until it is answered or times out.
/// Returns false when stdin is closed.
async fn play_question(
    controller: &mut QuizController,
    input: &mut Input,
    index: usize,
    total: usize,
    question: &Question,
) -> Result<bool, Box<dyn std::error::Error>> {
    println!("\nQuestion {}/{}: {}", index + 1, total, question.question);
    for (i, opt) in question.options.iter().enumerate() {
        println!("  {}) {}", i + 1, opt);
    }
    print!("Your answer (1-{}): ", question.options.len());
    std::io::stdout().flush()?;

    let period = Duration::from_secs(1);
    let mut ticker = interval_at(Instant::now() + period, period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                controller.handle(Event::Tick { question: index })?;
                match controller.phase() {
                    Phase::Active(q) if q.index == index => {
                        if q.remaining_secs() == 5 {
                            print!("[5s left] ");
                            std::io::stdout().flush()?;
                        }
                    }
                    _ => {
                        println!("\nTime's up!");
                        return Ok(true);
                    }
                }
            }
            line = input.next_line() => {
                let Some(line) = line? else { return Ok(false) };
                let choice = line.trim().parse::<usize>().ok().and_then(|n| n.checked_sub(1));
                match choice.map(|i| controller.handle(Event::Select(i))) {
                    Some(Ok(())) => break,
                    Some(Err(e)) => print!("{e}. Try again: "),
                    None => print!("Type a number between 1 and {}: ", question.options.len()),
                }
                std::io::stdout().flush()?;
            }
        }
    }
    drop(ticker);

    if let Phase::Active(q) = controller.phase() {
        if let Some(fb) = q.feedback() {
            if fb.correct {
                println!("Correct!");
            } else {
                let right = fb.correct_index.map(|i| q.current().options[i].as_str()).unwrap_or("?");
                println!("Wrong. The answer was: {right}");
            }
        }
    }
    println!("Press Enter for the next question.");
    if prompt(input).await?.is_none() {
        return Ok(false);
    }
    controller.handle(Event::Next)?;
    Ok(true)
}

async fn prompt(input: &mut Input) -> std::io::Result<Option<String>> {
    Ok(input.next_line().await?.map(|l| l.trim().to_string()))
}

/// Ask for one entry of `choices` by number or name.
async fn pick(input: &mut Input, choices: &[&str]) -> std::io::Result<Option<String>> {
    for (i, c) in choices.iter().enumerate() {
        println!("  {}) {}", i + 1, c);
    }
    let Some(line) = prompt(input).await? else { return Ok(None) };
    let by_number = line.parse::<usize>().ok().and_then(|n| n.checked_sub(1)).and_then(|i| choices.get(i));
    Ok(Some(by_number.map(|c| c.to_string()).unwrap_or(line)))
}

async fn fetch_questions(
    http: &reqwest::Client,
    server: &str,
    sel: &Selection,
    count: u32,
) -> Result<Vec<Question>, String> {
    let url = format!("{}/api/v1/questions", server.trim_end_matches('/'));
    let body = QuestionsIn {
        subject: Some(sel.subject.clone()),
        difficulty: Some(sel.level.clone()),
        number_of_questions: Some(i64::from(count)),
    };
    let res = http.post(&url).json(&body).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
        let status = res.status();
        let msg = res.json::<ErrorOut>().await.map(|e| e.error).unwrap_or_default();
        return Err(format!("HTTP {status}: {msg}"));
    }

    let out: QuestionsOut = res.json().await.map_err(|e| format!("Malformed response: {e}"))?;
    info!(target: "quiz", served = out.questions.len(), source = ?out.source, "Questions loaded");
    Ok(out.questions)
}
