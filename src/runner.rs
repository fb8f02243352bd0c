use crate::{
    context::{Context, RunMode},
    error::InstallerError,
    recovery::{self, ErrorDecision},
    ui,
};

// ── Steps ─────────────────────────────────────────────────────────────────────

/// One named unit of the installation pipeline.
pub struct Step {
    pub title: &'static str,
    body: Box<dyn Fn(&mut Context) -> Result<(), InstallerError>>,
}

impl Step {
    pub fn new(
        title: &'static str,
        body: impl Fn(&mut Context) -> Result<(), InstallerError> + 'static,
    ) -> Self {
        Self {
            title,
            body: Box::new(body),
        }
    }
}

// ── Runner ────────────────────────────────────────────────────────────────────

/// Runs every step in order. A failure never aborts the run by itself: it is
/// turned into an operator decision by the recovery menu, and only an
/// explicit abort (or an unrecognized answer) stops the pipeline.
///
/// In manual mode the operator is asked before each step; declining skips
/// the step body and counts as success.
pub fn run(ctx: &mut Context, steps: &[Step]) -> Result<(), InstallerError> {
    let total = steps.len();

    for (i, step) in steps.iter().enumerate() {
        let number = i + 1;
        ctx.journal
            .record(&format!("Starting step {}/{}: {}", number, total, step.title));
        ui::print_step(number, total, step.title);

        if ctx.mode == RunMode::Manual {
            let proceed = ctx
                .prompter
                .confirm(&format!("Run step \"{}\"?", step.title), true)?;
            ctx.journal.record(&format!(
                "Confirmation for step {}: {}",
                number,
                if proceed { "accepted" } else { "declined" }
            ));
            if !proceed {
                ctx.journal.record(&format!("Step {} skipped", number));
                ui::print_warning("Step skipped.");
                continue;
            }
        }

        loop {
            match (step.body)(ctx) {
                Ok(()) => {
                    ctx.journal
                        .record(&format!("Step {} completed: {}", number, step.title));
                    break;
                }
                // An abort chosen at an in-step recovery menu already is an
                // operator decision; it passes through untouched.
                Err(InstallerError::Aborted) => {
                    ctx.journal.record("Run aborted by operator");
                    return Err(InstallerError::Aborted);
                }
                // A declined in-step confirmation is benign, not a failure.
                Err(InstallerError::Cancelled) => {
                    ctx.journal
                        .record(&format!("Step {} cancelled by operator", number));
                    ui::print_warning("Step cancelled — moving on.");
                    break;
                }
                Err(err) => {
                    let message = format!("Step \"{}\" failed: {}", step.title, err);
                    match recovery::handle(ctx, &message) {
                        ErrorDecision::Continue => {
                            ctx.journal.record(&format!(
                                "Step {} marked as done despite failure",
                                number
                            ));
                            break;
                        }
                        ErrorDecision::Retry => {
                            ctx.journal.record(&format!("Retrying step {}", number));
                        }
                        ErrorDecision::Shell => {
                            ctx.journal.record("Dropping to recovery shell");
                            if let Err(shell_err) = ctx.prompter.shell() {
                                ctx.journal
                                    .record(&format!("Recovery shell failed: {}", shell_err));
                            }
                            ctx.journal
                                .record(&format!("Retrying step {} after shell", number));
                        }
                        ErrorDecision::Abort => {
                            ctx.journal.record("Run aborted by operator");
                            return Err(InstallerError::Aborted);
                        }
                    }
                }
            }
        }
    }

    ctx.journal.record("All steps completed");
    Ok(())
}
