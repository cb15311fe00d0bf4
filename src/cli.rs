//! Numbered text menu over a [TaskManager]. Generic over its input and output so that a whole
//! session can be scripted in tests.

use crate::manager::{ManagerError, TaskManager};
use std::io::{self, BufRead, Write};
use tracing::{debug, info};

const MENU: &str = "\n--- TODO CLI (Phase 1) ---
1. Add Task
2. View Tasks
3. Update Task
4. Toggle Complete
5. Delete Task
6. Exit";

/// A single menu selection
#[derive(Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    View,
    Update,
    Toggle,
    Delete,
    Exit,
}

impl MenuChoice {
    pub fn parse(raw: &str) -> Option<MenuChoice> {
        match raw.trim() {
            "1" => Some(MenuChoice::Add),
            "2" => Some(MenuChoice::View),
            "3" => Some(MenuChoice::Update),
            "4" => Some(MenuChoice::Toggle),
            "5" => Some(MenuChoice::Delete),
            "6" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

/// A whole number typed where a task ID was expected
struct EnteredId {
    /// The number as error messages echo it back, with leading zeros and `+` dropped
    shown: String,
    /// The manager ID it names. [None] for numbers no task can have, such as negatives or
    /// values past [u32::MAX].
    task_id: Option<u32>,
}

impl EnteredId {
    /// Accepts an optionally signed run of digits of any length. Anything else is [None].
    fn parse(raw: &str) -> Option<EnteredId> {
        let trimmed = raw.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }

        let magnitude = digits.trim_start_matches('0');
        if magnitude.is_empty() {
            return Some(EnteredId {
                shown: "0".to_owned(),
                task_id: None,
            });
        }

        Some(EnteredId {
            shown: if negative {
                format!("-{magnitude}")
            } else {
                magnitude.to_owned()
            },
            task_id: if negative {
                None
            } else {
                magnitude.parse().ok()
            },
        })
    }
}

/// Result of reading a task ID from the user
enum IdEntry {
    Id(EnteredId),
    Invalid,
    EndOfInput,
}

struct Console<'io, R, W> {
    input: &'io mut R,
    output: &'io mut W,
}

impl<R: BufRead, W: Write> Console<'_, R, W> {
    /// Prints `prompt` and reads one line without its line ending. [None] means input is exhausted.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }

    fn ask_trimmed(&mut self, prompt: &str) -> io::Result<Option<String>> {
        Ok(self.ask(prompt)?.map(|answer| answer.trim().to_owned()))
    }

    fn ask_id(&mut self, prompt: &str) -> io::Result<IdEntry> {
        let Some(raw) = self.ask(prompt)? else {
            return Ok(IdEntry::EndOfInput);
        };
        match EnteredId::parse(&raw) {
            Some(id) => Ok(IdEntry::Id(id)),
            None => {
                writeln!(
                    self.output,
                    "Error: Invalid ID format. Please enter a number."
                )?;
                Ok(IdEntry::Invalid)
            }
        }
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }
}

fn not_found(id: &EnteredId) -> String {
    format!("Error: Task with ID {} not found.", id.shown)
}

/// Runs the menu loop until the user picks "Exit" or input runs out
pub fn run_menu<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    manager: &mut TaskManager,
) -> io::Result<()> {
    let mut console = Console { input, output };

    loop {
        console.say(MENU)?;
        let Some(raw_choice) = console.ask("Enter choice: ")? else {
            debug!("Input closed, leaving menu");
            return Ok(());
        };

        let Some(choice) = MenuChoice::parse(&raw_choice) else {
            console.say("Invalid choice. Please try again.")?;
            continue;
        };
        debug!(?choice, "Menu selection");

        let keep_going = match choice {
            MenuChoice::Add => add(&mut console, manager)?,
            MenuChoice::View => {
                view(&mut console, manager)?;
                true
            }
            MenuChoice::Update => update(&mut console, manager)?,
            MenuChoice::Toggle => toggle(&mut console, manager)?,
            MenuChoice::Delete => delete(&mut console, manager)?,
            MenuChoice::Exit => {
                console.say("Exiting. Goodbye!")?;
                info!("User exited the menu");
                false
            }
        };
        if !keep_going {
            return Ok(());
        }
    }
}

fn add<R: BufRead, W: Write>(
    console: &mut Console<'_, R, W>,
    manager: &mut TaskManager,
) -> io::Result<bool> {
    let Some(title) = console.ask_trimmed("Enter title: ")? else {
        return Ok(false);
    };
    let Some(description) = console.ask_trimmed("Enter description: ")? else {
        return Ok(false);
    };

    let task_id = manager.add_task(&title, &description).id;
    console.say(&format!("Task added with ID: {task_id}"))?;
    Ok(true)
}

fn view<R: BufRead, W: Write>(
    console: &mut Console<'_, R, W>,
    manager: &TaskManager,
) -> io::Result<()> {
    let tasks = manager.view_tasks();
    if tasks.is_empty() {
        return console.say("No tasks found.");
    }

    console.say("\n--- Tasks ---")?;
    for task in tasks {
        let status = if task.is_completed {
            "Completed"
        } else {
            "Pending"
        };
        console.say(&format!(
            "ID: {} | Title: {} | Status: {}",
            task.id, task.title, status
        ))?;
        console.say(&format!("   Description: {}", task.description))?;
    }
    Ok(())
}

fn update<R: BufRead, W: Write>(
    console: &mut Console<'_, R, W>,
    manager: &mut TaskManager,
) -> io::Result<bool> {
    let id = match console.ask_id("Enter task ID to update: ")? {
        IdEntry::Id(id) => id,
        IdEntry::Invalid => return Ok(true),
        IdEntry::EndOfInput => return Ok(false),
    };
    let Some(title) = console.ask_trimmed("Enter new title (leave blank to keep current): ")?
    else {
        return Ok(false);
    };
    let Some(description) =
        console.ask_trimmed("Enter new description (leave blank to keep current): ")?
    else {
        return Ok(false);
    };

    let outcome = id
        .task_id
        .map(|task_id| manager.update_task(task_id, Some(&title), Some(&description)));
    match outcome {
        Some(Ok(())) => console.say("Task updated successfully.")?,
        Some(Err(ManagerError::TaskNotFound(_))) | None => console.say(&not_found(&id))?,
    }
    Ok(true)
}

fn toggle<R: BufRead, W: Write>(
    console: &mut Console<'_, R, W>,
    manager: &mut TaskManager,
) -> io::Result<bool> {
    let id = match console.ask_id("Enter task ID to toggle: ")? {
        IdEntry::Id(id) => id,
        IdEntry::Invalid => return Ok(true),
        IdEntry::EndOfInput => return Ok(false),
    };

    match id.task_id.map(|task_id| manager.toggle_complete(task_id)) {
        Some(Ok(_)) => console.say("Status toggled successfully.")?,
        Some(Err(ManagerError::TaskNotFound(_))) | None => console.say(&not_found(&id))?,
    }
    Ok(true)
}

fn delete<R: BufRead, W: Write>(
    console: &mut Console<'_, R, W>,
    manager: &mut TaskManager,
) -> io::Result<bool> {
    let id = match console.ask_id("Enter task ID to delete: ")? {
        IdEntry::Id(id) => id,
        IdEntry::Invalid => return Ok(true),
        IdEntry::EndOfInput => return Ok(false),
    };

    match id.task_id.map(|task_id| manager.delete_task(task_id)) {
        Some(Ok(_)) => console.say("Task deleted successfully.")?,
        Some(Err(ManagerError::TaskNotFound(_))) | None => console.say(&not_found(&id))?,
    }
    Ok(true)
}
