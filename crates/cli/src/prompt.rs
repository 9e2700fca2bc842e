use inquire::*;
use myanime::errors::*;
use myanime::prelude::EpisodeRange;

use crate::args::*;

pub fn prompt_for_args(mut args: ResolveArgs) -> Result<ResolveArgs> {
    args.url = Text::new("listing:")
        .with_help_message("tag page that lists the show's episodes, newest first")
        .with_initial_value(&args.url)
        .prompt()
        .map_err(|err| MyAnimeError::Message(format!("failed to read listing URL: {err}")))?;

    args.show = Text::new("show:")
        .with_help_message("name used for the downloaded files")
        .with_initial_value(&args.show)
        .prompt()
        .map_err(|err| MyAnimeError::Message(format!("failed to read show name: {err}")))?;

    let episode_input = Text::new("episodes:")
        .with_help_message("a number (e.g. 600) or a range (e.g. 551-600)")
        .with_initial_value(&args.episodes.to_string())
        .prompt()
        .map_err(|err| MyAnimeError::Message(format!("failed to read episodes: {err}")))?;

    args.episodes = episode_input.trim().parse::<EpisodeRange>()?;

    Ok(args)
}
