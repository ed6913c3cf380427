// UI layer: the text menu and the list operations behind each command.
// All prompting goes through `Prompter`, all disk access through
// `ListStore`, and all list state lives in `ListSession`.

use crate::config::Config;
use crate::input::{InputClosed, Prompter};
use crate::list::{ListSession, Moved};
use crate::store::{ListStore, EXTENSION};
use anyhow::{Context, Result};
use crossterm::tty::IsTty;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// One menu entry per command, in display order.
const MENU: [(Command, &str); 9] = [
    (Command::Add, "Add an item to the list"),
    (Command::Delete, "Delete an item from the list"),
    (Command::Insert, "Insert an item into the list"),
    (Command::View, "View the list"),
    (Command::Move, "Move an item in the list"),
    (Command::Open, "Open a list file from disk"),
    (Command::Save, "Save the current list file to disk"),
    (Command::Clear, "Clear the current list"),
    (Command::Quit, "Quit the program"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Delete,
    Insert,
    View,
    Move,
    Open,
    Save,
    Clear,
    Quit,
}

impl Command {
    /// Pattern the menu prompt validates against.
    pub const PATTERN: &'static str = "[AaDdIiVvMmOoSsCcQq]";

    /// Parse a menu code, ignoring case and surrounding whitespace.
    pub fn from_code(code: &str) -> Option<Self> {
        let command = match code.trim().to_ascii_uppercase().as_str() {
            "A" => Command::Add,
            "D" => Command::Delete,
            "I" => Command::Insert,
            "V" => Command::View,
            "M" => Command::Move,
            "O" => Command::Open,
            "S" => Command::Save,
            "C" => Command::Clear,
            "Q" => Command::Quit,
            _ => return None,
        };
        Some(command)
    }

    pub fn code(self) -> char {
        match self {
            Command::Add => 'A',
            Command::Delete => 'D',
            Command::Insert => 'I',
            Command::View => 'V',
            Command::Move => 'M',
            Command::Open => 'O',
            Command::Save => 'S',
            Command::Clear => 'C',
            Command::Quit => 'Q',
        }
    }
}

/// What a save request ended up doing. I/O failures are errors instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// The list was empty, so no file was written.
    NothingToSave,
    /// The target existed and the user refused to overwrite it.
    Declined,
}

/// Owns the prompter, the session and the store for one interactive run.
pub struct ListManager<R, W> {
    input: Prompter<R, W>,
    session: ListSession,
    store: ListStore,
}

/// Run the menu on stdin/stdout until the user quits or stdin closes.
pub fn main_menu(config: &Config) -> Result<()> {
    let stdout = io::stdout();
    let color = stdout.is_tty();
    let input = Prompter::new(io::stdin().lock(), stdout).with_color(color);
    let mut manager = ListManager::new(input, ListStore::new(&config.data_dir));
    manager.run()
}

impl<R: BufRead, W: Write> ListManager<R, W> {
    pub fn new(input: Prompter<R, W>, store: ListStore) -> Self {
        ListManager {
            input,
            session: ListSession::new(),
            store,
        }
    }

    pub fn session(&self) -> &ListSession {
        &self.session
    }

    pub fn into_parts(self) -> (ListSession, W) {
        (self.session, self.input.into_writer())
    }

    /// Main loop. Failed operations are reported and the menu comes back;
    /// the loop ends on a confirmed quit or when input runs out.
    pub fn run(&mut self) -> Result<()> {
        self.input.print_header("Welcome to File List Maker!")?;

        loop {
            self.print_menu()?;
            let keep_going = match self.step() {
                Ok(keep_going) => keep_going,
                Err(err) if err.downcast_ref::<InputClosed>().is_some() => {
                    debug!("input closed, leaving menu");
                    false
                }
                Err(err) => {
                    warn!(error = %format!("{err:#}"), "operation failed");
                    self.input.print_error(&format!("Error: {err:#}"))?;
                    true
                }
            };
            if !keep_going {
                break;
            }
        }

        self.say("Goodbye!")
    }

    /// Read one menu choice and run it. Returns false once quit is confirmed.
    fn step(&mut self) -> Result<bool> {
        let choice = self
            .input
            .regex_string("Enter your choice", Command::PATTERN)?;
        match Command::from_code(&choice) {
            Some(command) => self.dispatch(command),
            None => {
                self.say(format!("Unknown command: {choice}"))?;
                Ok(true)
            }
        }
    }

    /// Run a single command. Returns false when the session should end.
    pub fn dispatch(&mut self, command: Command) -> Result<bool> {
        debug!(command = %command.code(), "dispatch");
        match command {
            Command::Add => self.add()?,
            Command::Delete => self.delete()?,
            Command::Insert => self.insert()?,
            Command::View => self.view()?,
            Command::Move => self.move_item()?,
            Command::Open => {
                if self.confirm_leave_unsaved()? {
                    self.open()?;
                }
            }
            Command::Save => {
                self.save()?;
            }
            Command::Clear => self.clear()?,
            Command::Quit => return Ok(!self.confirm_quit()?),
        }
        Ok(true)
    }

    fn print_menu(&mut self) -> Result<()> {
        self.say(format!("\nCurrent List: {}", self.session.label()))?;
        self.say("Menu Options:")?;
        for (command, description) in MENU {
            self.say(format!("{} - {}", command.code(), description))?;
        }
        Ok(())
    }

    fn print_numbered(&mut self) -> Result<()> {
        if self.session.is_empty() {
            return self.say("The list is currently empty");
        }
        for line in self.session.numbered() {
            self.say(line)?;
        }
        Ok(())
    }

    pub fn view(&mut self) -> Result<()> {
        self.say("\nCurrent List:")?;
        self.print_numbered()
    }

    pub fn add(&mut self) -> Result<()> {
        let item = self.input.non_empty_string("Enter the item to add")?;
        self.session.add(item.clone());
        debug!(len = self.session.len(), "item added");
        self.say(format!("Item added: {item}"))
    }

    pub fn delete(&mut self) -> Result<()> {
        if self.session.is_empty() {
            return self.say("The list is empty - nothing to delete");
        }
        self.print_numbered()?;
        let position = self.ask_position("Enter the item number to delete", self.session.len())?;
        let item = self.session.remove(position)?;
        debug!(position, len = self.session.len(), "item removed");
        self.say(format!("Item removed: {item}"))
    }

    pub fn insert(&mut self) -> Result<()> {
        if self.session.is_empty() {
            self.say("The list is empty - adding as first item")?;
            return self.add();
        }
        self.print_numbered()?;
        let position =
            self.ask_position("Enter the position number to insert at", self.session.len() + 1)?;
        let item = self.input.non_empty_string("Enter the item to insert")?;
        self.session.insert(position, item.clone())?;
        debug!(position, len = self.session.len(), "item inserted");
        self.say(format!("Item inserted: {item}"))
    }

    pub fn move_item(&mut self) -> Result<()> {
        if self.session.is_empty() {
            return self.say("The list is empty - nothing to move");
        }
        self.print_numbered()?;
        let len = self.session.len();
        let from = self.ask_position("Enter the item number to move", len)?;
        let to = self.ask_position("Enter the new position", len)?;

        match self.session.move_item(from, to)? {
            Moved::Unchanged => self.say(format!("Item is already at position {to}")),
            Moved::Item(item) => {
                debug!(from, to, "item moved");
                self.say(format!(
                    "Moved item '{item}' from position {from} to position {to}"
                ))
            }
        }
    }

    /// Replace the list with the contents of a file the user names.
    pub fn open(&mut self) -> Result<()> {
        let name = self.input.non_empty_string(&format!(
            "Enter the filename to open (without .{EXTENSION} extension)"
        ))?;
        let path = self.store.path_for(&name);
        if !self.store.exists(&name) {
            return self.say(format!("File does not exist: {}", path.display()));
        }
        if !self
            .input
            .yes_no("This will replace the current list. Continue?")?
        {
            return Ok(());
        }

        let items = self.store.load(&name)?;
        info!(file = %name, items = items.len(), "list opened");
        self.session.replace(items, &name);
        self.say(format!("List loaded from {}", path.display()))
    }

    /// Save under the current filename, asking for one if the list has
    /// never been saved.
    pub fn save(&mut self) -> Result<SaveOutcome> {
        if self.session.is_empty() {
            self.say("The list is empty - nothing to save")?;
            return Ok(SaveOutcome::NothingToSave);
        }

        let name = match self.session.filename() {
            Some(name) => name.to_string(),
            None => self.input.non_empty_string(&format!(
                "Enter filename to save (without .{EXTENSION} extension)"
            ))?,
        };
        if self.store.exists(&name) && !self.input.yes_no("File exists. Overwrite?")? {
            debug!(file = %name, "overwrite declined");
            return Ok(SaveOutcome::Declined);
        }

        let path = self
            .store
            .save(&name, self.session.items())
            .with_context(|| format!("Could not save list `{name}`"))?;
        self.session.mark_saved(&name);
        self.say(format!("List saved to {}", path.display()))?;
        Ok(SaveOutcome::Saved(path))
    }

    pub fn clear(&mut self) -> Result<()> {
        if self.session.is_empty() {
            return Ok(());
        }
        if self.input.yes_no("This will clear all items. Continue?")? {
            self.session.clear();
            debug!("list cleared");
            self.say("List cleared")?;
        }
        Ok(())
    }

    /// Offer to save unsaved changes before opening another file. Returns
    /// whether the open should go ahead.
    fn confirm_leave_unsaved(&mut self) -> Result<bool> {
        if !self.session.needs_save() {
            return Ok(true);
        }
        if self
            .input
            .yes_no("You have unsaved changes. Save before continuing?")?
        {
            self.save()?;
            return Ok(true);
        }
        self.input.yes_no("Continue without saving?")
    }

    /// Returns true when the user confirmed quitting. A declined overwrite
    /// during the save offer cancels the quit; a failed save errors out of
    /// here, which also keeps the session running.
    fn confirm_quit(&mut self) -> Result<bool> {
        if self.session.needs_save()
            && self
                .input
                .yes_no("You have unsaved changes. Save before quitting?")?
            && self.save()? == SaveOutcome::Declined
        {
            return Ok(false);
        }
        self.input.yes_no("Are you sure you want to quit?")
    }

    fn ask_position(&mut self, prompt: &str, high: usize) -> Result<usize> {
        let high = i64::try_from(high).context("list too long to address")?;
        let position = self.input.ranged_int(prompt, 1, high)?;
        usize::try_from(position).context("position out of range")
    }

    fn say(&mut self, message: impl Display) -> Result<()> {
        writeln!(self.input.writer(), "{message}").context("write output")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;

    type Manager = ListManager<Cursor<Vec<u8>>, Vec<u8>>;

    fn manager(dir: &Path, script: &str) -> Manager {
        let input = Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        ListManager::new(input, ListStore::new(dir))
    }

    /// Run a full session and return the final state plus everything printed.
    fn run_script(dir: &Path, script: &str) -> (ListSession, String) {
        let mut m = manager(dir, script);
        m.run().expect("run");
        let (session, out) = m.into_parts();
        (session, String::from_utf8(out).expect("utf8 output"))
    }

    #[test]
    fn command_codes_parse_case_insensitively() {
        assert_eq!(Command::from_code("a"), Some(Command::Add));
        assert_eq!(Command::from_code(" Q "), Some(Command::Quit));
        assert_eq!(Command::from_code("x"), None);
        assert_eq!(Command::from_code("AD"), None);
        for (command, _) in MENU {
            assert_eq!(Command::from_code(&command.code().to_string()), Some(command));
        }
    }

    #[test]
    fn menu_shows_label_and_rejects_unknown_choice() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (_, out) = run_script(dir.path(), "x\nq\ny\n");
        assert!(out.contains("Current List: Unsaved list"));
        assert!(out.contains("Q - Quit the program"));
        assert!(out.contains("matches the pattern"));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn add_and_view_number_from_one() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (session, out) = run_script(dir.path(), "A\nmilk\nA\neggs\nV\nQ\nN\nY\n");
        assert_eq!(session.items(), ["milk", "eggs"]);
        assert!(session.needs_save());
        assert!(out.contains("1. milk\n2. eggs\n"));
    }

    #[test]
    fn view_empty_list() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (_, out) = run_script(dir.path(), "V\nQ\nY\n");
        assert!(out.contains("The list is currently empty"));
    }

    #[test]
    fn delete_on_empty_list_is_a_no_op() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (session, out) = run_script(dir.path(), "D\nQ\nY\n");
        assert!(out.contains("nothing to delete"));
        assert!(!session.needs_save());
    }

    #[test]
    fn delete_reprompts_until_in_range() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (session, out) = run_script(dir.path(), "A\na\nA\nb\nD\n3\n1\nQ\nN\nY\n");
        assert_eq!(session.items(), ["b"]);
        assert!(out.contains("Input out of range"));
        assert!(out.contains("Item removed: a"));
    }

    #[test]
    fn insert_on_empty_list_adds() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (session, out) = run_script(dir.path(), "I\nfirst\nQ\nN\nY\n");
        assert_eq!(session.items(), ["first"]);
        assert!(out.contains("adding as first item"));
    }

    #[test]
    fn insert_before_position() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (session, _) = run_script(dir.path(), "A\na\nA\nc\nI\n2\nb\nI\n4\nd\nQ\nN\nY\n");
        assert_eq!(session.items(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn move_uses_positions_after_removal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (session, out) = run_script(dir.path(), "A\na\nA\nb\nA\nc\nM\n1\n3\nQ\nN\nY\n");
        assert_eq!(session.items(), ["b", "c", "a"]);
        assert!(out.contains("Moved item 'a' from position 1 to position 3"));

        let (session, _) = run_script(dir.path(), "A\na\nA\nb\nA\nc\nM\n3\n1\nQ\nN\nY\n");
        assert_eq!(session.items(), ["c", "a", "b"]);
    }

    #[test]
    fn move_to_same_position_reports_and_keeps_clean() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("abc.txt"), "a\nb\nc\n").expect("write");
        let (session, out) = run_script(dir.path(), "O\nabc\nY\nM\n2\n2\nQ\nY\n");
        assert_eq!(session.items(), ["a", "b", "c"]);
        assert!(!session.needs_save());
        assert!(out.contains("Item is already at position 2"));
    }

    #[test]
    fn save_then_open_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = "A\nmilk\nA\neggs\nS\ngroceries\nC\nY\nO\nN\nY\ngroceries\nY\nQ\nY\n";
        let (session, out) = run_script(dir.path(), script);
        assert_eq!(session.items(), ["milk", "eggs"]);
        assert!(!session.needs_save());
        assert_eq!(session.filename(), Some("groceries"));
        assert!(out.contains("List saved to"));
        assert!(out.contains("List loaded from"));
        assert!(out.contains("Current List: groceries"));
    }

    #[test]
    fn save_reuses_current_filename_and_asks_to_overwrite() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (session, out) = run_script(dir.path(), "A\na\nS\nl\nA\nb\nS\nY\nQ\nY\n");
        assert!(!session.needs_save());
        assert_eq!(out.matches("Enter filename to save").count(), 1);
        assert!(out.contains("File exists. Overwrite?"));
        let raw = fs::read_to_string(dir.path().join("l.txt")).expect("read");
        assert_eq!(raw.lines().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn declined_overwrite_leaves_file_and_flag() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("taken.txt"), "keep\n").expect("write");
        let mut m = manager(dir.path(), "new\ntaken\nN\n");
        assert!(m.dispatch(Command::Add).expect("add"));
        assert_eq!(m.save().expect("save"), SaveOutcome::Declined);
        assert!(m.session().needs_save());
        assert_eq!(m.session().filename(), None);
        let raw = fs::read_to_string(dir.path().join("taken.txt")).expect("read");
        assert_eq!(raw, "keep\n");
    }

    #[test]
    fn save_with_empty_list_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut m = manager(dir.path(), "");
        assert_eq!(m.save().expect("save"), SaveOutcome::NothingToSave);
        let (_, out) = m.into_parts();
        let out = String::from_utf8(out).expect("utf8");
        assert!(out.contains("nothing to save"));
        assert!(!out.contains("List saved"));
        assert_eq!(fs::read_dir(dir.path()).expect("read dir").count(), 0);
    }

    #[test]
    fn open_missing_file_keeps_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (session, out) = run_script(dir.path(), "A\nx\nO\nN\nY\nghost\nQ\nN\nY\n");
        assert_eq!(session.items(), ["x"]);
        assert!(session.needs_save());
        assert_eq!(session.filename(), None);
        assert!(out.contains("File does not exist"));
    }

    #[test]
    fn unreadable_file_is_reported_and_keeps_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("bad.txt"), [0xff, 0xfe]).expect("write");
        let (session, out) = run_script(dir.path(), "A\nx\nO\nN\nY\nbad\nY\nQ\nN\nY\n");
        assert!(out.contains("Error: Failed to read"));
        assert_eq!(session.items(), ["x"]);
        assert!(session.needs_save());
        assert_eq!(session.filename(), None);
    }

    #[test]
    fn error_lines_are_plain_on_non_terminal_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (_, out) = run_script(&dir.path().join("missing"), "A\nx\nS\nname\nz\nQ\nN\nY\n");
        assert!(out.contains("Error: Could not save list"));
        assert!(out.contains("matches the pattern"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn open_guard_can_save_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("other.txt"), "o\n").expect("write");
        let (session, _) = run_script(dir.path(), "A\nx\nO\nY\nmine\nother\nY\nQ\nY\n");
        assert_eq!(session.items(), ["o"]);
        assert_eq!(session.filename(), Some("other"));
        let raw = fs::read_to_string(dir.path().join("mine.txt")).expect("read");
        assert_eq!(raw.lines().collect::<Vec<_>>(), ["x"]);
    }

    #[test]
    fn open_guard_declined_skips_open() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (session, out) = run_script(dir.path(), "A\nx\nO\nN\nN\nQ\nN\nY\n");
        assert_eq!(session.items(), ["x"]);
        assert!(!out.contains("Enter the filename to open"));
    }

    #[test]
    fn open_declining_replace_keeps_list() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("f.txt"), "from file\n").expect("write");
        let (session, _) = run_script(dir.path(), "O\nf\nN\nQ\nY\n");
        assert!(session.is_empty());
        assert_eq!(session.filename(), None);
    }

    #[test]
    fn clear_needs_confirmation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (session, _) = run_script(dir.path(), "A\na\nC\nN\nQ\nN\nY\n");
        assert_eq!(session.items(), ["a"]);

        let (session, out) = run_script(dir.path(), "A\na\nC\nY\nQ\nN\nY\n");
        assert!(session.is_empty());
        assert!(session.needs_save());
        assert!(out.contains("List cleared"));
    }

    #[test]
    fn clear_on_empty_list_asks_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (session, out) = run_script(dir.path(), "C\nQ\nY\n");
        assert!(!out.contains("This will clear all items"));
        assert!(!session.needs_save());
    }

    #[test]
    fn declining_quit_keeps_session_running() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (session, out) = run_script(dir.path(), "A\nx\nQ\nN\nN\nV\nQ\nN\nY\n");
        assert_eq!(out.matches("Are you sure you want to quit?").count(), 2);
        assert_eq!(session.items(), ["x"]);
        assert!(session.needs_save());
    }

    #[test]
    fn declined_overwrite_cancels_quit() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("taken.txt"), "keep\n").expect("write");
        let (_, out) = run_script(dir.path(), "A\nx\nQ\nY\ntaken\nN\nQ\nN\nY\n");
        assert_eq!(out.matches("Are you sure you want to quit?").count(), 1);
        assert_eq!(out.matches("Save before quitting?").count(), 2);
    }

    #[test]
    fn save_on_quit_writes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (session, _) = run_script(dir.path(), "A\nx\nQ\nY\nout\nY\n");
        assert!(!session.needs_save());
        assert!(dir.path().join("out.txt").is_file());
    }

    #[test]
    fn failed_save_is_reported_and_loop_continues() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing");
        let (session, out) = run_script(&missing, "A\nx\nS\nname\nQ\nY\nname\nQ\nN\nY\n");
        assert_eq!(out.matches("Error: Could not save list `name`").count(), 2);
        assert_eq!(out.matches("Are you sure you want to quit?").count(), 1);
        assert!(session.needs_save());
    }

    #[test]
    fn closed_input_ends_the_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (session, out) = run_script(dir.path(), "A\nx\n");
        assert_eq!(session.items(), ["x"]);
        assert!(out.ends_with("Goodbye!\n"));
    }
}
