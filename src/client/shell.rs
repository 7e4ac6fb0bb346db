//! Line-oriented front end over a [`Tab`]
//!
//! Each command maps onto one view interaction; the affected view is
//! re-rendered after every command.

use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::{MutationOutcome, Tab};

const HELP: &str = "\
commands:
  ls                list the catalog
  login <passcode>  unlock filing and removal
  find <text>       search Open Library (empty text clears)
  file <n>          file search result n
  rm <n>            remove catalog entry n
  new               show the add view
  help              this text
  quit              leave
";

const POLL_INTERVAL: Duration = Duration::from_millis(25);

pub async fn run<R, W>(tab: &Tab, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    tab.catalog.mount().await;
    output.write_all(tab.catalog.render().as_bytes()).await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        let text = match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => HELP.to_string(),
            "ls" => tab.catalog.render(),
            "new" => tab.add.render(),
            "login" => {
                tab.add.authenticate(arg).await;
                tab.add.render()
            }
            "find" => {
                tab.add.type_query(arg);
                wait_for_search(tab).await;
                tab.add.render()
            }
            "file" => match pick(arg, tab.add.results()) {
                Some(result) => {
                    let outcome = tab.add.file(&result).await;
                    format!("{}{}", describe(outcome), tab.add.render())
                }
                None => "no such result\n".to_string(),
            },
            "rm" => match pick(arg, tab.catalog.catalog().books()) {
                Some(book) => {
                    let outcome = tab.catalog.delete(&book.id).await;
                    format!("{}{}", describe(outcome), tab.catalog.render())
                }
                None => "no such entry\n".to_string(),
            },
            other => format!("unknown command: {} (try help)\n", other),
        };

        output.write_all(text.as_bytes()).await?;
        output.flush().await?;
    }

    Ok(())
}

async fn wait_for_search(tab: &Tab) {
    if tab.add.search().query().trim().is_empty() {
        return;
    }
    tokio::time::sleep(tab.add.search().debounce() + POLL_INTERVAL).await;
    while tab.add.search().is_searching() {
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

fn pick<T>(arg: &str, items: Vec<T>) -> Option<T> {
    let n: usize = arg.parse().ok()?;
    items.into_iter().nth(n.checked_sub(1)?)
}

fn describe(outcome: MutationOutcome) -> &'static str {
    // failures already show up as a notice in the render
    match outcome {
        MutationOutcome::Skipped => "(not available)\n",
        MutationOutcome::Applied | MutationOutcome::Failed => "",
    }
}
