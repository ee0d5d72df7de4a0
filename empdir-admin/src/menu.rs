//! Interactive database management menu
//!
//! Screens are drawn as fixed-width panels. Console access goes through the
//! [`Console`] trait so the whole dialogue can be driven from a script in
//! tests; the real terminal is a [`console::Term`].

use crate::ops::{self, Outcome, Tone, EXIT_TITLE, POPULATE_TITLE};
use crate::populate::{self, PopulateRequest};
use crate::AdminResult;
use console::{pad_str, style, Alignment, Term};
use sqlx::SqlitePool;
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::info;

pub const APP_TITLE: &str = "Manage Database";
pub const DISPLAY_WIDTH: usize = 80;
pub const MENU_ERROR: &str = "Enter numeric value between 1 and 5";

/// Line-oriented console
pub trait Console {
    fn clear(&mut self) -> io::Result<()>;

    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Next input line without its terminator; `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

impl Console for Term {
    fn clear(&mut self) -> io::Result<()> {
        if self.is_term() {
            self.clear_screen()?;
        }
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        Term::write_line(self, line)
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        if self.is_term() {
            return Term::read_line(self).map(Some);
        }
        // Piped input: tell end of input apart from an empty line
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Create,
    Drop,
    Populate,
    Reset,
    Exit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 5] = [
        MenuOption::Create,
        MenuOption::Drop,
        MenuOption::Populate,
        MenuOption::Reset,
        MenuOption::Exit,
    ];

    /// Parse a 1-based menu number
    pub fn parse(input: &str) -> Option<Self> {
        let n: usize = input.trim().parse().ok()?;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn title(self) -> &'static str {
        match self {
            MenuOption::Create => ops::CREATE_TITLE,
            MenuOption::Drop => ops::DROP_TITLE,
            MenuOption::Populate => ops::POPULATE_TITLE,
            MenuOption::Reset => ops::RESET_TITLE,
            MenuOption::Exit => ops::EXIT_TITLE,
        }
    }
}

/// Lines of a rounded box `DISPLAY_WIDTH` columns wide with `title` in the top edge
pub fn panel(title: &str, body: &[String]) -> Vec<String> {
    let inner = DISPLAY_WIDTH - 2;
    let heading = format!(" {} ", title);
    let rule = inner.saturating_sub(console::measure_text_width(&heading) + 1);

    let mut lines = Vec::with_capacity(body.len() + 4);
    lines.push(format!("╭─{}{}╮", style(heading).cyan().bold(), "─".repeat(rule)));
    lines.push(format!("│{}│", " ".repeat(inner)));
    for line in body {
        lines.push(format!("│{}│", pad_str(line, inner, Alignment::Center, Some("…"))));
    }
    lines.push(format!("│{}│", " ".repeat(inner)));
    lines.push(format!("╰{}╯", "─".repeat(inner)));
    lines
}

fn header() -> Vec<String> {
    vec![
        format!("┌{}┐", "─".repeat(DISPLAY_WIDTH - 2)),
        format!(
            "│{}│",
            style(pad_str(APP_TITLE, DISPLAY_WIDTH - 2, Alignment::Center, None))
                .white()
                .on_blue()
                .bold()
        ),
        format!("└{}┘", "─".repeat(DISPLAY_WIDTH - 2)),
    ]
}

fn styled(tone: Tone, line: &str) -> String {
    match tone {
        Tone::Success => style(line).green().to_string(),
        Tone::Warning => style(line).yellow().to_string(),
        Tone::Info => style(line).blue().to_string(),
        Tone::Failure => style(line).red().bold().to_string(),
    }
}

/// Menu session over a console and a database pool
pub struct Menu<'a, C: Console> {
    console: C,
    pool: &'a SqlitePool,
}

impl<'a, C: Console> Menu<'a, C> {
    pub fn new(console: C, pool: &'a SqlitePool) -> Self {
        Self { console, pool }
    }

    /// Run until the operator confirms exit or input ends
    pub async fn run(&mut self) -> AdminResult<()> {
        loop {
            let Some(option) = self.choose_option()? else {
                info!("Input closed, leaving menu");
                return Ok(());
            };

            match option {
                MenuOption::Create => {
                    let outcome = ops::create_database(self.pool).await;
                    self.show_outcome(&outcome)?;
                }
                MenuOption::Drop => {
                    let outcome = ops::drop_database(self.pool).await;
                    self.show_outcome(&outcome)?;
                }
                MenuOption::Populate => {
                    if let Some(outcome) = self.populate_dialogue().await? {
                        self.show_outcome(&outcome)?;
                    }
                }
                MenuOption::Reset => {
                    let outcome = ops::reset_database(self.pool).await;
                    self.show_outcome(&outcome)?;
                }
                MenuOption::Exit => {
                    if self.confirm(EXIT_TITLE, "Exit program?")? {
                        self.console.clear()?;
                        self.console
                            .write_line(&style("\nApplication closed ...\n").magenta().to_string())?;
                        return Ok(());
                    }
                }
            }
        }
    }

    pub fn into_console(self) -> C {
        self.console
    }

    fn show(&mut self, body: Vec<String>) -> io::Result<()> {
        self.console.clear()?;
        for line in header().into_iter().chain(body) {
            self.console.write_line(&line)?;
        }
        Ok(())
    }

    /// Draw the menu and read a choice; `None` at end of input
    fn choose_option(&mut self) -> AdminResult<Option<MenuOption>> {
        let items: Vec<String> = MenuOption::ALL
            .iter()
            .enumerate()
            .map(|(i, o)| format!("{:<28}", format!("{}. {}", i + 1, o.title())))
            .map(|s| style(s).green().to_string())
            .collect();
        self.show(panel("Main Menu", &items))?;

        loop {
            self.console
                .write_line(&style("\nEnter menu option number [1/2/3/4/5]").cyan().to_string())?;
            let Some(reply) = self.console.read_line()? else {
                return Ok(None);
            };
            match MenuOption::parse(&reply) {
                Some(option) => return Ok(Some(option)),
                None => self
                    .console
                    .write_line(&style(MENU_ERROR).red().bold().to_string())?,
            }
        }
    }

    /// Ask for one value; an empty answer (or end of input) yields `None`
    fn ask(&mut self, title: &str, prompt: &str) -> AdminResult<Option<String>> {
        self.show(panel(title, &[style(prompt).bold().to_string()]))?;
        self.console.write_line("> ")?;
        let answer = self.console.read_line()?.unwrap_or_default();
        let answer = answer.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }

    /// Yes/no question, yes by default
    fn confirm(&mut self, title: &str, question: &str) -> AdminResult<bool> {
        self.show(panel(title, &[style(format!("{} [Y/n]", question)).bold().to_string()]))?;
        let Some(answer) = self.console.read_line()? else {
            return Ok(true);
        };
        Ok(!matches!(answer.trim().to_lowercase().as_str(), "n" | "no"))
    }

    fn show_outcome(&mut self, outcome: &Outcome) -> AdminResult<()> {
        let body: Vec<String> = outcome.lines.iter().map(|l| styled(outcome.tone, l)).collect();
        self.show(panel(outcome.title, &body))?;
        self.console.write_line("\nPress Enter to continue...")?;
        self.console.read_line()?;
        Ok(())
    }

    /// Prompt for file, table and fields, checking each before the next prompt
    ///
    /// `None` means the operator backed out with an empty answer.
    async fn populate_dialogue(&mut self) -> AdminResult<Option<Outcome>> {
        let Some(csv_file) = self.ask(POPULATE_TITLE, "Enter CSV filename")? else {
            return Ok(None);
        };
        let csv_path = PathBuf::from(csv_file);
        if let Err(e) = populate::check_csv_file(&csv_path) {
            return Ok(Some(Outcome::failure(POPULATE_TITLE, &e)));
        }

        let Some(table) = self.ask(POPULATE_TITLE, "Enter table name")? else {
            return Ok(None);
        };
        let table = match populate::resolve_table(self.pool, &table).await {
            Ok(table) => table,
            Err(e) => return Ok(Some(Outcome::failure(POPULATE_TITLE, &e))),
        };

        let Some(fields) = self.ask(POPULATE_TITLE, "Enter table field names (space-separated)")? else {
            return Ok(None);
        };
        let request = PopulateRequest {
            csv_path,
            table,
            fields: populate::parse_fields(&fields),
        };

        Ok(Some(ops::populate_database(self.pool, &request).await))
    }
}
