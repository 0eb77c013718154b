//! Interactive browse session.
//!
//! Reads one command per line from stdin and feeds it to [`BrowseState`]. The effects it
//! returns are carried out here: page fetches go through the API and their outcome is fed
//! back as another message, renders and notices go to the terminal.

use super::render::{print_messages, render_browse, render_saved};
use colored::Colorize;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use stockpix::browse::{BrowseState, Effect, Msg};
use stockpix::error::Result;
use stockpix::init::StockContext;
use stockpix::model::PhotoSource;
use stockpix::save::Insertion;
use stockpix::store::FsVault;

type Api = stockpix::api::StockApi<FsVault>;

#[derive(Debug, PartialEq)]
enum Input {
    Msg(Msg),
    /// 1-based index into the active tab.
    Save(usize),
    Quit,
    Empty,
    Invalid(String),
}

pub async fn run(ctx: &StockContext, query: String) -> Result<bool> {
    let api = &ctx.api;
    let result = api.search(&query, None).await?;
    print_messages(&result.messages);

    let search = match result.search {
        Some(search) if !search.is_empty() => search,
        _ => return Ok(!result.has_errors()),
    };

    let mut state = BrowseState::new(search, api.preferred_provider());
    print!("{}", render_browse(&state));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !state.is_closed() {
        prompt()?;
        let Some(line) = lines.next().transpose()? else {
            state.update(Msg::Close);
            break;
        };

        match parse_input(&line, &state) {
            Input::Msg(msg) => drive(api, &mut state, msg).await,
            Input::Save(index) => save(api, &state, index).await?,
            Input::Quit => {
                state.update(Msg::Close);
            }
            Input::Empty => {}
            Input::Invalid(text) => eprintln!("{}", text.yellow()),
        }
    }
    Ok(true)
}

fn prompt() -> io::Result<()> {
    print!("{} ", "browse>".cyan().bold());
    io::stdout().flush()
}

/// Runs one message and every follow-up it causes.
async fn drive(api: &Api, state: &mut BrowseState, msg: Msg) {
    let mut queue = VecDeque::from([msg]);
    while let Some(msg) = queue.pop_front() {
        for effect in state.update(msg) {
            match effect {
                Effect::Fetch { source, page } => {
                    let reply = match api.fetch_page(source, state.query(), page).await {
                        Ok(loaded) => Msg::Loaded(loaded),
                        Err(e) => Msg::Failed {
                            source,
                            page,
                            error: e.to_string(),
                        },
                    };
                    queue.push_back(reply);
                }
                Effect::Render => print!("{}", render_browse(state)),
                Effect::Notify(text) => eprintln!("{}", text.yellow()),
            }
        }
    }
}

async fn save(api: &Api, state: &BrowseState, index: usize) -> Result<()> {
    let photo = state
        .active_tab()
        .and_then(|tab| index.checked_sub(1).and_then(|i| tab.photos.get(i)));
    let Some(photo) = photo else {
        eprintln!("{}", format!("No photo #{} on this page", index).yellow());
        return Ok(());
    };

    let result = api
        .save_photo(photo, state.query(), &Insertion::None)
        .await?;
    print_messages(&result.messages);
    if let Some(saved) = &result.saved {
        print!("{}", render_saved(saved));
    }
    Ok(())
}

fn parse_input(line: &str, state: &BrowseState) -> Input {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Input::Empty;
    };
    let arg = words.next();
    let active = state.active_tab().map(|t| t.source);

    match (command, arg, active) {
        ("q" | "quit", _, _) => Input::Quit,
        ("n" | "next", None, Some(source)) => Input::Msg(Msg::Next(source)),
        ("p" | "prev", None, Some(source)) => Input::Msg(Msg::Previous(source)),
        ("t" | "tab", Some(name), _) => match name.parse::<PhotoSource>() {
            Ok(source) => Input::Msg(Msg::SelectTab(source)),
            Err(e) => Input::Invalid(e),
        },
        ("t" | "tab", None, Some(source)) => Input::Msg(Msg::SelectTab(next_tab(state, source))),
        ("s" | "save", Some(n), _) => match n.parse::<usize>() {
            Ok(index) if index > 0 => Input::Save(index),
            _ => Input::Invalid(format!("Not a photo number: {}", n)),
        },
        _ => Input::Invalid(format!("Unknown command: {}", line.trim())),
    }
}

/// The tab after `current`, wrapping around.
fn next_tab(state: &BrowseState, current: PhotoSource) -> PhotoSource {
    let tabs = state.tabs();
    tabs.iter()
        .position(|t| t.source == current)
        .and_then(|i| tabs.get((i + 1) % tabs.len()))
        .map_or(current, |t| t.source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockpix::aggregator::AggregateResult;
    use stockpix::model::SearchPage;

    fn state() -> BrowseState {
        let mut result = AggregateResult {
            query: "fog".into(),
            ..Default::default()
        };
        for source in [PhotoSource::Pexels, PhotoSource::Pixabay] {
            let mut page = SearchPage::empty(source);
            page.total_results = 40;
            page.total_pages = 2;
            result.pages.insert(source, page);
        }
        BrowseState::new(result, PhotoSource::Pixabay)
    }

    #[test]
    fn paging_targets_active_tab() {
        let state = state();
        assert_eq!(
            parse_input("n", &state),
            Input::Msg(Msg::Next(PhotoSource::Pixabay))
        );
        assert_eq!(
            parse_input(" prev ", &state),
            Input::Msg(Msg::Previous(PhotoSource::Pixabay))
        );
    }

    #[test]
    fn tab_by_name_or_cycling() {
        let state = state();
        assert_eq!(
            parse_input("t pexels", &state),
            Input::Msg(Msg::SelectTab(PhotoSource::Pexels))
        );
        assert_eq!(
            parse_input("t", &state),
            Input::Msg(Msg::SelectTab(PhotoSource::Pexels))
        );
        assert!(matches!(parse_input("t flickr", &state), Input::Invalid(_)));
    }

    #[test]
    fn save_and_quit() {
        let state = state();
        assert_eq!(parse_input("s 3", &state), Input::Save(3));
        assert!(matches!(parse_input("s 0", &state), Input::Invalid(_)));
        assert!(matches!(parse_input("s x", &state), Input::Invalid(_)));
        assert_eq!(parse_input("q", &state), Input::Quit);
        assert_eq!(parse_input("   ", &state), Input::Empty);
        assert!(matches!(parse_input("zoom", &state), Input::Invalid(_)));
    }
}
