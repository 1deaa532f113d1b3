use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use review_scheduler::{
    Algorithm, Grade, MemoryState, Scheduler, SchedulerConfig, retrievability, select_due,
    summarize,
};

fn setup_logger() -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .level_for("review_scheduler", log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .apply()
}

fn print_previews(scheduler: &Scheduler, state: &MemoryState, now: DateTime<Utc>) {
    let previews = scheduler.preview(state, now);
    println!(
        "  again {:>6} | hard {:>6} | good {:>6} | easy {:>6}",
        previews.again, previews.hard, previews.good, previews.easy
    );
}

const SESSION: [Grade; 5] = [
    Grade::Good,
    Grade::Good,
    Grade::Again,
    Grade::Good,
    Grade::Easy,
];

/// Walks one new item through a short study session with each algorithm.
fn schedule_new_item(now: DateTime<Utc>) -> Result<(), Box<dyn std::error::Error>> {
    for info in Algorithm::catalog() {
        println!("\n{} ({})", info.name, info.id);
        let scheduler = Scheduler::from_algorithm_id(info.id);

        let mut state = MemoryState::new("bonjour", now);
        let mut clock = now;
        for grade in SESSION {
            print_previews(&scheduler, &state, clock);
            state = scheduler.next_state(&state, grade, clock);
            println!(
                "  answered {grade:<5} -> {} for {:.4} days, due {}",
                state.phase,
                state.interval,
                state
                    .next_review_instant
                    .map(|instant| instant.to_rfc3339())
                    .unwrap_or_else(|| state.next_review_date.to_string())
            );
            clock += Duration::minutes((state.interval * 24.0 * 60.0).round() as i64);
        }
        if let Some(r) = retrievability(&state, clock) {
            println!("  recall probability when due: {r:.3}");
        }
    }
    Ok(())
}

/// Picks the next items to review from a small collection.
fn review_queue(now: DateTime<Utc>) -> Result<(), Box<dyn std::error::Error>> {
    let scheduler = Scheduler::new(SchedulerConfig {
        algorithm: Algorithm::Adaptive,
        target_retention: 0.85,
    })?;

    let words = ["chat", "chien", "maison", "voiture", "arbre"].map(String::from);
    let mut states = HashMap::new();
    for (days_ago, word) in [(12, &words[0]), (5, &words[1]), (30, &words[2])] {
        let seen = now - Duration::days(days_ago);
        let state = scheduler.record_answer(None, word, days_ago != 5, seen);
        let state = scheduler.record_answer(Some(&state), word, true, seen + Duration::days(1));
        states.insert(word.clone(), state);
    }

    println!("\nDue now:");
    for word in select_due(&words, &states, now) {
        let state = &states[word];
        println!(
            "  {word:<8} due {} ({} right, {} wrong)",
            state.next_review_date, state.correct_count, state.incorrect_count
        );
    }
    println!("{:?}", summarize(&words, &states, now));
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger()?;
    let now = Utc::now();

    println!("Scheduling a new item:");
    schedule_new_item(now)?;

    review_queue(now)?;

    Ok(())
}
