use charger_core::LifecycleEvent;
use charger_store::Paths;

pub fn run(paths: &Paths, limit: usize) -> anyhow::Result<()> {
    let events: Vec<LifecycleEvent> = charger_store::tail_jsonl(&paths.journal_file(), limit)?;

    if events.is_empty() {
        println!("No lifecycle events recorded");
        return Ok(());
    }

    for event in &events {
        println!("{}", event);
    }

    let failures = events.iter().filter(|e| e.is_failure()).count();
    if failures > 0 {
        println!("\n{} failed transition(s) shown", failures);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use charger_core::{LifecycleOp, LifecycleState};

    #[test]
    fn test_journal_empty() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(run(&Paths::with_root(temp.path()), 10).is_ok());
    }

    #[test]
    fn test_journal_with_events() {
        let temp = tempfile::TempDir::new().unwrap();
        let paths = Paths::with_root(temp.path());
        let event = LifecycleEvent::new(
            "demo",
            LifecycleOp::Startup,
            LifecycleState::Discovered,
            LifecycleState::Failed,
        )
        .with_error("boom");
        charger_store::append_jsonl(&paths.journal_file(), &event).unwrap();

        assert!(run(&paths, 10).is_ok());
    }
}
