//! Scripted stand-ins for the external world and the operator, shared by the
//! unit tests. Nothing here is compiled into release builds.

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet, VecDeque},
    path::Path,
    rc::Rc,
};

use crate::{
    cmd::CommandRunner,
    context::{Context, RunMode},
    error::InstallerError,
    journal::Journal,
    prompt::Prompter,
};

// ── Fake external world ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeWorld {
    /// Every invocation, as `"program arg1 arg2"` strings, in order.
    pub calls: Vec<String>,
    /// Programs that always fail.
    pub fail_programs: HashSet<String>,
    /// Program → remaining number of invocations that fail before succeeding.
    pub fail_counts: HashMap<String, usize>,
    /// (program, arg substring) pairs that fail whenever they match.
    pub fail_matching: Vec<(String, String)>,
    /// Programs reported as absent from PATH.
    pub missing_binaries: HashSet<String>,
    /// Paths reported as existing.
    pub existing_paths: HashSet<String>,
    /// Program → canned stdout for `capture`.
    pub captures: HashMap<String, String>,
    /// Files written through the runner, as (path, contents).
    pub written_files: Vec<(String, String)>,
}

/// `CommandRunner` fake. Clones share the same underlying world, so a test
/// can keep a handle for assertions after the context takes ownership.
#[derive(Clone, Default)]
pub struct FakeCommands(Rc<RefCell<FakeWorld>>);

impl FakeCommands {
    pub fn world(&self) -> std::cell::RefMut<'_, FakeWorld> {
        self.0.borrow_mut()
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.borrow().calls.clone()
    }

    pub fn calls_of(&self, program: &str) -> Vec<String> {
        self.0
            .borrow()
            .calls
            .iter()
            .filter(|c| c.split_whitespace().next() == Some(program))
            .cloned()
            .collect()
    }

    fn invoke(&self, program: &str, args: &[&str]) -> Result<(), InstallerError> {
        let mut world = self.0.borrow_mut();
        world.calls.push(format!("{} {}", program, args.join(" ")));

        if world.missing_binaries.contains(program) {
            return Err(InstallerError::CommandNotFound(program.to_string()));
        }
        if world.fail_programs.contains(program) {
            return Err(InstallerError::CommandFailed(program.to_string(), 1));
        }
        if let Some(remaining) = world.fail_counts.get_mut(program) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(InstallerError::CommandFailed(program.to_string(), 1));
            }
        }
        let matched = world
            .fail_matching
            .iter()
            .any(|(p, needle)| p == program && args.iter().any(|a| a.contains(needle)));
        if matched {
            return Err(InstallerError::CommandFailed(program.to_string(), 1));
        }
        Ok(())
    }
}

impl CommandRunner for FakeCommands {
    fn interactive(&self, program: &str, args: &[&str]) -> Result<(), InstallerError> {
        self.invoke(program, args)
    }

    fn with_spinner(
        &self,
        program: &str,
        args: &[&str],
        _spin_msg: &str,
        _done_msg: &str,
    ) -> Result<(), InstallerError> {
        self.invoke(program, args)
    }

    fn capture(&self, program: &str, args: &[&str]) -> Result<String, InstallerError> {
        self.invoke(program, args)?;
        Ok(self
            .0
            .borrow()
            .captures
            .get(program)
            .cloned()
            .unwrap_or_default())
    }

    fn append_to_file(
        &self,
        program: &str,
        args: &[&str],
        file_path: &str,
    ) -> Result<(), InstallerError> {
        let mut full = args.to_vec();
        full.push(">>");
        full.push(file_path);
        self.invoke(program, &full)
    }

    fn best_effort(&self, program: &str, args: &[&str]) {
        let _ = self.invoke(program, args);
    }

    fn write_file(&self, path: &str, contents: &str) -> Result<(), InstallerError> {
        self.0
            .borrow_mut()
            .written_files
            .push((path.to_string(), contents.to_string()));
        Ok(())
    }

    fn create_dir(&self, _path: &str) -> Result<(), InstallerError> {
        Ok(())
    }

    fn binary_exists(&self, program: &str) -> bool {
        !self.0.borrow().missing_binaries.contains(program)
    }

    fn path_exists(&self, path: &str) -> bool {
        self.0.borrow().existing_paths.contains(path)
    }
}

// ── Scripted operator ─────────────────────────────────────────────────────────

/// Answers prompts from a fixed script. `confirm` understands `"y"`/`"n"`
/// and falls back to the prompt's default when the script runs dry; every
/// other prompt pops the next answer verbatim.
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    shells: Rc<Cell<usize>>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            shells: Rc::new(Cell::new(0)),
        }
    }

    pub fn shell_counter(&self) -> Rc<Cell<usize>> {
        self.shells.clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, _prompt: &str, default: bool) -> Result<bool, InstallerError> {
        Ok(match self.answers.pop_front().as_deref() {
            Some("y") => true,
            Some("n") => false,
            _ => default,
        })
    }

    fn input(&mut self, _prompt: &str) -> Result<String, InstallerError> {
        Ok(self.answers.pop_front().unwrap_or_default())
    }

    fn input_default(&mut self, _prompt: &str, default: &str) -> Result<String, InstallerError> {
        Ok(match self.answers.pop_front() {
            Some(a) if !a.is_empty() => a,
            _ => default.to_string(),
        })
    }

    fn select(&mut self, _prompt: &str, _items: &[&str]) -> Result<usize, InstallerError> {
        Ok(self
            .answers
            .pop_front()
            .and_then(|a| a.parse().ok())
            .unwrap_or(0))
    }

    fn shell(&mut self) -> Result<(), InstallerError> {
        self.shells.set(self.shells.get() + 1);
        Ok(())
    }
}

// ── Context builders ──────────────────────────────────────────────────────────

/// An auto-mode context wired to a fresh fake world and the given operator
/// script. The journal lands in `dir/install.log`.
pub fn test_context(answers: &[&str], dir: &Path) -> (Context, FakeCommands) {
    let world = FakeCommands::default();
    let journal = Journal::create(dir.join("install.log"), false).unwrap();
    let ctx = Context {
        mode: RunMode::Auto,
        journal,
        cmd: Box::new(world.clone()),
        prompter: Box::new(ScriptedPrompter::new(answers)),
        target: None,
    };
    (ctx, world)
}

/// Like `test_context`, but also hands back the scripted prompter's shell
/// visit counter.
pub fn test_context_with_shell_counter(
    answers: &[&str],
    dir: &Path,
) -> (Context, FakeCommands, Rc<Cell<usize>>) {
    let world = FakeCommands::default();
    let prompter = ScriptedPrompter::new(answers);
    let shells = prompter.shell_counter();
    let journal = Journal::create(dir.join("install.log"), false).unwrap();
    let ctx = Context {
        mode: RunMode::Auto,
        journal,
        cmd: Box::new(world.clone()),
        prompter: Box::new(prompter),
        target: None,
    };
    (ctx, world, shells)
}
