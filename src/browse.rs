use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::{DoctorSearchApi, HttpDoctorSearch};
use crate::config::ListingConfig;
use crate::controller::{FetchOutcome, ListingController, ScrollPosition};
use crate::render::{render_filters, render_listing, render_options};

const HELP: &str = "\
commands:
  search <text>                      set the specialization search text
  location <text>                    set the location text
  toggle <dimension> <value>         toggle a checkbox option (mode, experience, fee, language, facility)
  clear                              reset all filters
  reload                             reload page 0 with the current filters
  more                               signal that the end of the list is visible
  scroll <offset> <viewport> <content>
                                     report a scroll position; loads more when near the end
  show                               print the current listing
  filters                            print the current filters
  options                            print every filter option
  help                               print this help
  quit                               exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Search(String),
    Location(String),
    Toggle { dimension: String, value: String },
    Clear,
    Reload,
    More,
    Scroll(ScrollPosition),
    Show,
    Filters,
    Options,
    Help,
    Quit,
    Empty,
}

pub fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(BrowseCommand::Empty);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "search" => Ok(BrowseCommand::Search(rest.to_string())),
        "location" => Ok(BrowseCommand::Location(rest.to_string())),
        "toggle" => {
            let (dimension, value) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| "usage: toggle <dimension> <value>".to_string())?;
            Ok(BrowseCommand::Toggle {
                dimension: dimension.to_string(),
                value: value.trim().to_string(),
            })
        }
        "clear" => Ok(BrowseCommand::Clear),
        "reload" => Ok(BrowseCommand::Reload),
        "more" => Ok(BrowseCommand::More),
        "scroll" => {
            let nums = rest
                .split_whitespace()
                .map(|n| n.parse::<u64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| format!("scroll expects numbers: {e}"))?;
            match nums.as_slice() {
                [offset, viewport, content] => Ok(BrowseCommand::Scroll(ScrollPosition {
                    offset: *offset,
                    viewport: *viewport,
                    content: *content,
                })),
                _ => Err("usage: scroll <offset> <viewport> <content>".to_string()),
            }
        }
        "show" => Ok(BrowseCommand::Show),
        "filters" => Ok(BrowseCommand::Filters),
        "options" => Ok(BrowseCommand::Options),
        "help" | "?" => Ok(BrowseCommand::Help),
        "quit" | "exit" => Ok(BrowseCommand::Quit),
        other => Err(format!("unknown command: {other} (try `help`)")),
    }
}

pub async fn run(config: ListingConfig) -> anyhow::Result<()> {
    let config = config.validate().context("invalid listing config")?;
    let api = HttpDoctorSearch::new(&config)?;
    let controller = Arc::new(ListingController::new(api, config.page_size()?));

    println!("{HELP}\n");
    spawn_fetch(&controller, BrowseCommand::Reload);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("read stdin")? {
        let cmd = match parse_command(&line) {
            Ok(cmd) => cmd,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };
        match cmd {
            BrowseCommand::Empty => {}
            BrowseCommand::Quit => break,
            BrowseCommand::Help => println!("{HELP}"),
            BrowseCommand::Options => print!("{}", render_options()),
            BrowseCommand::Filters => print!("{}", render_filters(&controller.filters())),
            BrowseCommand::Show => print!("{}", render_listing(&controller.results())),
            fetching => spawn_fetch(&controller, fetching),
        }
    }
    Ok(())
}

/// Runs a fetching command off the input loop and prints the listing when it settles.
fn spawn_fetch<A>(controller: &Arc<ListingController<A>>, cmd: BrowseCommand)
where
    A: DoctorSearchApi + 'static,
{
    let controller = Arc::clone(controller);
    tokio::spawn(async move {
        let outcome = match cmd {
            BrowseCommand::Search(text) => controller.set_filter("search", &text).await,
            BrowseCommand::Location(text) => controller.set_filter("location", &text).await,
            BrowseCommand::Toggle { dimension, value } => {
                controller.set_filter(&dimension, &value).await
            }
            BrowseCommand::Clear => Ok(controller.clear_filters().await),
            BrowseCommand::More => Ok(controller.notify_near_end().await),
            BrowseCommand::Scroll(position) => Ok(controller.on_scroll(position).await),
            BrowseCommand::Reload => Ok(controller.load_initial().await),
            _ => return,
        };

        match outcome {
            Ok(FetchOutcome::Loaded { .. }) | Ok(FetchOutcome::Failed(_)) => {
                print!("{}", render_listing(&controller.results()));
            }
            Ok(FetchOutcome::Deferred) => {
                println!("filters updated; the listing reloads when the current request finishes");
            }
            Ok(FetchOutcome::Skipped) => {
                let results = controller.results();
                if results.is_loading() {
                    println!("still loading...");
                } else if results.exhausted {
                    println!("No more doctors to load.");
                }
            }
            Err(err) => println!("{err}"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toggle_with_spaced_value() {
        assert_eq!(
            parse_command("toggle mode Online Consult").unwrap(),
            BrowseCommand::Toggle {
                dimension: "mode".to_string(),
                value: "Online Consult".to_string()
            }
        );
    }

    #[test]
    fn parses_scroll_position() {
        assert_eq!(
            parse_command("scroll 495 500 1000").unwrap(),
            BrowseCommand::Scroll(ScrollPosition {
                offset: 495,
                viewport: 500,
                content: 1000
            })
        );
        assert!(parse_command("scroll 1 2").is_err());
        assert!(parse_command("scroll a b c").is_err());
    }

    #[test]
    fn text_commands_keep_inner_spaces() {
        assert_eq!(
            parse_command("  location   Washington D.C. ").unwrap(),
            BrowseCommand::Location("Washington D.C.".to_string())
        );
        assert_eq!(
            parse_command("search").unwrap(),
            BrowseCommand::Search(String::new())
        );
    }

    #[test]
    fn rejects_unknown_and_incomplete_commands() {
        assert!(parse_command("book Dr. Rao").is_err());
        assert!(parse_command("toggle fee").is_err());
        assert_eq!(parse_command("   ").unwrap(), BrowseCommand::Empty);
        assert_eq!(parse_command("EXIT").unwrap(), BrowseCommand::Quit);
    }
}
