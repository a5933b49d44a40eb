use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use mushaf_storage::Storage;

mod commands;
mod player;

fn build_cli() -> Command {
    Command::new("mushaf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Qur'an reader: chapters, bookmarks, reading progress and recitation")
        .arg(
            Arg::new("data-dir")
                .short('d')
                .long("data-dir")
                .value_name("PATH")
                .help("Directory for persisted state (defaults to the platform data dir)")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress log output below warnings")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("chapters")
                .about("List the 114 chapters")
                .arg(
                    Arg::new("search")
                        .short('s')
                        .long("search")
                        .value_name("QUERY")
                        .help("Filter by number, name, translation or revelation place"),
                ),
        )
        .subcommand(
            Command::new("read")
                .about("Print a chapter and mark the printed verses as read")
                .arg(Arg::new("chapter").required(true).value_name("CHAPTER").help("Chapter number (1-114)"))
                .arg(Arg::new("from").long("from").value_name("VERSE").help("First verse to print"))
                .arg(Arg::new("to").long("to").value_name("VERSE").help("Last verse to print"))
                .arg(
                    Arg::new("language")
                        .short('l')
                        .long("language")
                        .value_name("LANGUAGE")
                        .help("Translation language for this invocation")
                        .value_parser(["english", "bengali", "urdu"]),
                ),
        )
        .subcommand(
            Command::new("tafsir")
                .about("Print commentary for a verse, or for a whole chapter")
                .arg(Arg::new("chapter").required(true).value_name("CHAPTER").help("Chapter number (1-114)"))
                .arg(Arg::new("verse").value_name("VERSE").help("Verse number; omit for the whole chapter")),
        )
        .subcommand(
            Command::new("bookmark")
                .about("Bookmark a verse")
                .arg(Arg::new("chapter").required(true).value_name("CHAPTER").help("Chapter number"))
                .arg(Arg::new("verse").required(true).value_name("VERSE").help("Verse number")),
        )
        .subcommand(Command::new("bookmarks").about("List saved bookmarks"))
        .subcommand(
            Command::new("unbookmark")
                .about("Remove a bookmark")
                .arg(Arg::new("chapter").required(true).value_name("CHAPTER").help("Chapter number"))
                .arg(Arg::new("verse").required(true).value_name("VERSE").help("Verse number")),
        )
        .subcommand(Command::new("stats").about("Show reading statistics"))
        .subcommand(Command::new("reciters").about("List the available recitation voices"))
        .subcommand(Command::new("player").about("Interactive recitation player"))
        .subcommand(
            Command::new("settings")
                .about("Show or change reader preferences")
                .arg(
                    Arg::new("language")
                        .long("language")
                        .value_name("LANGUAGE")
                        .help("Translation language")
                        .value_parser(["english", "bengali", "urdu"]),
                )
                .arg(
                    Arg::new("arabic-font")
                        .long("arabic-font")
                        .value_name("FONT")
                        .help("Arabic typeface")
                        .value_parser(["amiri", "scheherazade", "uthmanic"]),
                )
                .arg(
                    Arg::new("font-size")
                        .long("font-size")
                        .value_name("SIZE")
                        .help("Text size")
                        .value_parser(["small", "medium", "large"]),
                )
                .arg(
                    Arg::new("transliteration")
                        .long("transliteration")
                        .value_name("ON|OFF")
                        .help("Show simplified Arabic alongside the text"),
                )
                .arg(
                    Arg::new("autoplay")
                        .long("autoplay")
                        .value_name("ON|OFF")
                        .help("Continue to the next verse when one finishes"),
                ),
        )
        .subcommand(
            Command::new("theme")
                .about("Show or switch the color theme")
                .arg(
                    Arg::new("mode")
                        .value_name("MODE")
                        .help("New theme, or 'toggle' to flip it")
                        .value_parser(["light", "dark", "toggle"]),
                ),
        )
}

fn open_storage(matches: &clap::ArgMatches) -> Result<Storage> {
    match matches.get_one::<String>("data-dir") {
        Some(dir) => {
            Storage::open_at(dir).with_context(|| format!("Failed to open data directory {dir}"))
        }
        None => Ok(Storage::open_default()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let default_level = if matches.get_flag("quiet") { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let storage = open_storage(&matches)?;

    match matches.subcommand() {
        Some(("chapters", sub_matches)) => commands::list_chapters(sub_matches).await,
        Some(("read", sub_matches)) => commands::read_chapter(&storage, sub_matches).await,
        Some(("tafsir", sub_matches)) => commands::show_commentary(sub_matches).await,
        Some(("bookmark", sub_matches)) => commands::add_bookmark(&storage, sub_matches).await,
        Some(("bookmarks", _)) => commands::list_bookmarks(&storage),
        Some(("unbookmark", sub_matches)) => commands::remove_bookmark(&storage, sub_matches),
        Some(("stats", _)) => commands::show_stats(&storage),
        Some(("reciters", _)) => commands::list_reciters().await,
        Some(("player", _)) => player::run_shell(&storage).await,
        Some(("settings", sub_matches)) => commands::configure_settings(&storage, sub_matches),
        Some(("theme", sub_matches)) => commands::switch_theme(&storage, sub_matches),
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}
