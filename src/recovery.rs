use console::style;

use crate::{
    context::{Context, RunMode},
    ui,
};

// ── Decisions ─────────────────────────────────────────────────────────────────

/// What the operator chose to do about a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDecision {
    /// Treat the failed step as done and move on.
    Continue,
    /// Re-run the step body from scratch.
    Retry,
    /// Drop into a shell for manual repair, then retry.
    Shell,
    /// Terminate the whole run with a non-zero exit.
    Abort,
}

// ── Recovery menus ────────────────────────────────────────────────────────────

/// Full recovery menu: continue / retry / shell / exit. Anything the
/// operator types that is not one of those maps to `Abort` — a failure must
/// never be waved through by a typo.
///
/// This function never fails itself; a broken prompt also maps to `Abort`.
pub fn handle(ctx: &mut Context, message: &str) -> ErrorDecision {
    diagnose(ctx, message);

    let answer = ctx
        .prompter
        .input("Recovery action [continue/retry/shell/exit]")
        .unwrap_or_default();

    let decision = match answer.trim().to_ascii_lowercase().as_str() {
        "continue" | "c" => ErrorDecision::Continue,
        "retry" | "r" => ErrorDecision::Retry,
        "shell" | "s" => ErrorDecision::Shell,
        _ => ErrorDecision::Abort,
    };

    ctx.journal.record(&format!("Recovery decision: {:?}", decision));
    decision
}

/// Degraded binary menu for failures where retrying makes no sense: the
/// operator can only continue without the capability or abort the run.
pub fn handle_binary(ctx: &mut Context, message: &str) -> ErrorDecision {
    diagnose(ctx, message);

    let answer = ctx
        .prompter
        .input("Recovery action [continue/exit]")
        .unwrap_or_default();

    let decision = match answer.trim().to_ascii_lowercase().as_str() {
        "continue" | "c" => ErrorDecision::Continue,
        _ => ErrorDecision::Abort,
    };

    ctx.journal.record(&format!("Recovery decision: {:?}", decision));
    decision
}

// ── Shared diagnosis ──────────────────────────────────────────────────────────

/// Logs the failure, shows the recent log tail, and escalates the run to
/// manual mode. Escalation is permanent for the rest of the run.
fn diagnose(ctx: &mut Context, message: &str) {
    ctx.journal.record(&format!("ERROR: {}", message));

    println!();
    ui::print_error(message);

    let tail = ctx.journal.tail(5);
    if !tail.is_empty() {
        println!();
        ui::print_info("Last log lines:");
        for line in &tail {
            println!("     {}", style(line).dim());
        }
        println!();
    }

    if ctx.mode == RunMode::Auto {
        ctx.mode = RunMode::Manual;
        ctx.journal.record("Escalated to manual mode after failure");
        ui::print_warning("Manual mode enabled for the remaining steps.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_context;

    #[test]
    fn recognized_inputs_map_deterministically() {
        let cases = [
            ("continue", ErrorDecision::Continue),
            ("c", ErrorDecision::Continue),
            ("retry", ErrorDecision::Retry),
            ("r", ErrorDecision::Retry),
            ("shell", ErrorDecision::Shell),
            ("s", ErrorDecision::Shell),
            ("exit", ErrorDecision::Abort),
            ("  RETRY  ", ErrorDecision::Retry),
        ];

        for (input, expected) in cases {
            let dir = tempfile::tempdir().unwrap();
            let (mut ctx, _world) = test_context(&[input], dir.path());
            assert_eq!(handle(&mut ctx, "boom"), expected, "input {:?}", input);
        }
    }

    #[test]
    fn unrecognized_input_maps_to_abort() {
        for input in ["", "yes", "banana", "continu", "retry now"] {
            let dir = tempfile::tempdir().unwrap();
            let (mut ctx, _world) = test_context(&[input], dir.path());
            assert_eq!(handle(&mut ctx, "boom"), ErrorDecision::Abort, "input {:?}", input);
        }
    }

    #[test]
    fn first_failure_escalates_to_manual_permanently() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, _world) = test_context(&["continue", "continue"], dir.path());
        assert_eq!(ctx.mode, RunMode::Auto);

        handle(&mut ctx, "first");
        assert_eq!(ctx.mode, RunMode::Manual);

        handle(&mut ctx, "second");
        assert_eq!(ctx.mode, RunMode::Manual);
    }

    #[test]
    fn failure_is_logged_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ctx, _world) = test_context(&["continue"], dir.path());

        handle(&mut ctx, "mkfs.ext4 blew up");

        let tail = ctx.journal.tail(5);
        assert!(tail.iter().any(|l| l.contains("ERROR: mkfs.ext4 blew up")));
        assert!(tail.iter().any(|l| l.contains("Recovery decision: Continue")));
    }

    #[test]
    fn binary_menu_only_knows_continue_and_abort() {
        for (input, expected) in [
            ("continue", ErrorDecision::Continue),
            ("c", ErrorDecision::Continue),
            ("retry", ErrorDecision::Abort),
            ("shell", ErrorDecision::Abort),
            ("exit", ErrorDecision::Abort),
            ("", ErrorDecision::Abort),
        ] {
            let dir = tempfile::tempdir().unwrap();
            let (mut ctx, _world) = test_context(&[input], dir.path());
            assert_eq!(handle_binary(&mut ctx, "boom"), expected, "input {:?}", input);
        }
    }
}
