use std::io::{BufRead as _, Write as _};

use anyhow::Context as _;

/// External go-ahead signal from the person steering the browser.
pub trait Confirm {
    /// Shows `message` and blocks until the person confirms.
    fn confirm(&mut self, message: &str) -> anyhow::Result<()>;
}

/// Waits for Enter on stdin.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, message: &str) -> anyhow::Result<()> {
        read_line_blocking(message).map(|_| ())
    }
}

pub fn ask_category() -> anyhow::Result<String> {
    let answer = read_line_blocking("Enter category name (e.g., Surgical Instruments): ")?;
    let category = answer.trim().to_owned();
    if category.is_empty() {
        anyhow::bail!("category name must not be empty");
    }
    Ok(category)
}

fn read_line_blocking(message: &str) -> anyhow::Result<String> {
    let read = || -> anyhow::Result<String> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{message}").context("write prompt")?;
        if !message.ends_with(' ') {
            writeln!(stdout).context("write prompt")?;
        }
        stdout.flush().context("flush prompt")?;

        let mut line = String::new();
        let bytes = std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read stdin")?;
        if bytes == 0 {
            anyhow::bail!("stdin closed while waiting for confirmation");
        }
        Ok(line)
    };

    match tokio::runtime::Handle::try_current() {
        Ok(handle)
            if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread =>
        {
            tokio::task::block_in_place(read)
        }
        _ => read(),
    }
}
