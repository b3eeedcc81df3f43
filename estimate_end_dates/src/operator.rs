//! Console prompts and the confirmation gate in front of any API write.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::audit::AuditLog;
use crate::client::{Credentials, ProjectApi};
use crate::orchestrator::{Orchestrator, RunSummary};

#[derive(Debug, Error)]
pub enum OperatorError {
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("no {field} entered")]
    Empty { field: &'static str },
}

/// Where prompts are shown and answers come from.
pub trait Operator {
    fn ask(&mut self, prompt: &str) -> io::Result<String>;

    /// Like [`Operator::ask`] but the answer is not echoed.
    fn ask_secret(&mut self, prompt: &str) -> io::Result<String>;

    fn say(&mut self, message: &str) -> io::Result<()>;
}

/// Interactive terminal: stdout for prompts, stdin for answers.
pub struct Terminal;

impl Operator for Terminal {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed while waiting for input",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn ask_secret(&mut self, prompt: &str) -> io::Result<String> {
        rpassword::prompt_password(prompt)
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        println!("{}", message);
        Ok(())
    }
}

/// Asks for the base domain, API key and username, in that order.
pub fn prompt_credentials<O: Operator>(operator: &mut O) -> Result<Credentials, OperatorError> {
    let base_domain = required(
        operator.ask("Enter the base domain for the API (e.g., pure123.elsevierpure.com): ")?,
        "base domain",
    )?;
    let api_key = operator.ask_secret("Enter the API key: ")?;
    if api_key.is_empty() {
        return Err(OperatorError::Empty { field: "API key" });
    }
    let username = required(operator.ask("Enter your Pure username: ")?, "username")?;

    Ok(Credentials {
        base_domain,
        api_key,
        username,
    })
}

/// Trims `answer` and rejects it if nothing is left.
fn required(answer: String, field: &'static str) -> Result<String, OperatorError> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(OperatorError::Empty { field });
    }
    Ok(answer.to_string())
}

/// True only when the operator answers exactly `yes`, in any case.
pub fn confirm<O: Operator>(operator: &mut O, count: usize) -> io::Result<bool> {
    let answer = operator.ask(&format!(
        "About to modify {} projects. Do you want to proceed? (yes/no): ",
        count
    ))?;
    Ok(answer.eq_ignore_ascii_case("yes"))
}

/// Runs the confirmation gate and, if accepted, the full update pass.
///
/// Returns `None` when the operator declines; nothing is sent to the API
/// and nothing is written to the audit log in that case.
pub async fn execute<O, A, W>(
    operator: &mut O,
    ids: &[String],
    api: &A,
    audit: &mut AuditLog<W>,
    username: &str,
) -> io::Result<Option<RunSummary>>
where
    O: Operator,
    A: ProjectApi,
    W: Write,
{
    if !confirm(operator, ids.len())? {
        operator.say("Operation canceled.")?;
        return Ok(None);
    }

    let summary = Orchestrator::new(api, audit, username).run(ids).await?;
    Ok(Some(summary))
}
