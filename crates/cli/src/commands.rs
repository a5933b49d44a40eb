use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use console::style;
use mushaf_content::{ChapterSummary, ContentClient, TafsirEntry};
use mushaf_core::{Language, NewBookmark, Theme, Timestamp, VerseKey, TOTAL_VERSE_COUNT};
use mushaf_player::RECITERS;
use mushaf_session::Session;
use mushaf_storage::Storage;

/// List the chapters, optionally filtered
pub async fn list_chapters(matches: &ArgMatches) -> Result<()> {
    let client = ContentClient::new().context("Failed to build the content client")?;
    let chapters = client
        .chapters()
        .await
        .context("Failed to fetch the chapter list")?;

    let query = matches.get_one::<String>("search");
    let rows: Vec<(u16, &ChapterSummary)> = chapters
        .iter()
        .enumerate()
        .map(|(i, chapter)| ((i + 1) as u16, chapter))
        .filter(|(number, chapter)| query.map_or(true, |q| matches_query(chapter, *number, q)))
        .collect();

    if rows.is_empty() {
        println!("No chapters matched '{}'", query.map(String::as_str).unwrap_or(""));
        return Ok(());
    }

    match query {
        Some(q) => println!(
            "\n{} Chapters matching '{}'",
            style(rows.len()).bold().cyan(),
            q
        ),
        None => println!("\n{} Chapters", style(rows.len()).bold().cyan()),
    }
    println!("{}", "=".repeat(80));

    // Styled fields would throw the column widths off, so rows stay plain.
    for (number, chapter) in rows {
        println!(
            "{:>4}  {:<24} {:<28} {:<7} {:>3} verses   {}",
            number,
            chapter.name,
            chapter.translated_name,
            chapter.revelation_place.to_string(),
            chapter.verse_count,
            chapter.arabic_name,
        );
    }

    Ok(())
}

/// Print a chapter's verses and mark each printed verse as read
pub async fn read_chapter(storage: &Storage, matches: &ArgMatches) -> Result<()> {
    let number = parse_number(matches, "chapter")?;
    let client = ContentClient::new().context("Failed to build the content client")?;
    let detail = client
        .chapter(number)
        .await
        .with_context(|| format!("Failed to fetch chapter {number}"))?;

    let session = Session::open(storage.clone());
    let settings = session.settings().state();
    let language = match matches.get_one::<String>("language") {
        Some(raw) => raw.parse::<Language>().map_err(anyhow::Error::msg)?,
        None => settings.language,
    };

    let verses = detail.verses();
    let last = verses.len() as u16;
    let from = parse_optional_number(matches, "from")?.unwrap_or(1).max(1);
    let to = parse_optional_number(matches, "to")?.unwrap_or(last).min(last);
    if from > last {
        bail!("Chapter {number} ({}) has only {last} verses", detail.name);
    }
    if from > to {
        bail!("--from {from} is past --to {to}");
    }

    println!(
        "\n{} — {} ({})",
        style(&detail.name).bold().cyan(),
        detail.arabic_name,
        detail.translated_name
    );
    println!("{} · {} verses", detail.revelation_place, detail.verse_count);
    println!("{}", "=".repeat(80));

    let mut printed = 0usize;
    for verse in verses.iter().filter(|v| v.number >= from && v.number <= to) {
        let key = VerseKey::new(number, verse.number);
        if session.bookmarks().is_bookmarked(&key) {
            println!("\n{} {}", style(key).bold(), style("★").yellow());
        } else {
            println!("\n{}", style(key).bold());
        }
        println!("  {}", verse.arabic);
        if settings.show_transliteration && !verse.arabic_simplified.is_empty() {
            println!("  {}", style(&verse.arabic_simplified).dim());
        }
        let translation = verse.translation(language);
        if !translation.is_empty() {
            println!("  {translation}");
        }

        session
            .progress()
            .mark_verse_read(number, verse.number, detail.name.clone());
        printed += 1;
    }

    let in_chapter = session.progress().with(|state| state.read_in_chapter(number));
    println!(
        "\n{} Marked {printed} verses read · {in_chapter}/{} in this chapter",
        style("✓").green().bold(),
        detail.verse_count
    );

    session.flush();
    Ok(())
}

/// Print commentary for one verse, or for every verse of a chapter
pub async fn show_commentary(matches: &ArgMatches) -> Result<()> {
    let number = parse_number(matches, "chapter")?;
    let client = ContentClient::new().context("Failed to build the content client")?;

    match matches.get_one::<String>("verse") {
        Some(raw) => {
            let verse: u16 = raw
                .parse()
                .with_context(|| format!("'{raw}' is not a verse number"))?;
            let commentary = client
                .verse_commentary(number, verse)
                .await
                .with_context(|| format!("Failed to fetch commentary for {number}:{verse}"))?;

            println!(
                "\n{} {}:{}",
                style(&commentary.chapter_name).bold().cyan(),
                commentary.chapter,
                commentary.verse
            );
            println!("{}", "=".repeat(80));
            print_tafsir_entries(&commentary.tafsirs);
        }
        None => {
            let commentary = client
                .chapter_commentary(number)
                .await
                .with_context(|| format!("Failed to fetch commentary for chapter {number}"))?;

            println!(
                "\n{} — commentary",
                style(&commentary.chapter_name).bold().cyan()
            );
            println!("{}", "=".repeat(80));
            for (i, entries) in commentary.tafsirs.iter().enumerate() {
                println!("\n{}", style(format!("Verse {}", i + 1)).bold().cyan());
                print_tafsir_entries(entries);
            }
        }
    }

    Ok(())
}

/// Bookmark a verse, enriching it with chapter name and text when online
pub async fn add_bookmark(storage: &Storage, matches: &ArgMatches) -> Result<()> {
    let (chapter, verse) = parse_verse_ref(matches)?;
    let session = Session::open(storage.clone());
    let key = VerseKey::new(chapter, verse);

    if session.bookmarks().is_bookmarked(&key) {
        println!("{key} is already bookmarked.");
        return Ok(());
    }

    let mut pending = NewBookmark::new(chapter, verse);
    match fetch_verse_context(chapter, verse).await {
        Ok(Some((name, text))) => {
            pending = pending.with_chapter_name(name);
            if let Some(text) = text {
                pending = pending.with_verse_text(text);
            }
        }
        Ok(None) => bail!("Chapter {chapter} has no verse {verse}"),
        Err(e) => log::warn!("Could not fetch chapter {chapter} ({e}); saving a bare bookmark"),
    }

    session.bookmarks().add(pending);
    session.flush();
    println!("{} Bookmarked {key}", style("✓").green().bold());
    Ok(())
}

/// Chapter name and verse snippet for a bookmark. `Ok(None)` means the
/// chapter exists but the verse number does not.
async fn fetch_verse_context(
    chapter: u16,
    verse: u16,
) -> Result<Option<(String, Option<String>)>> {
    let client = ContentClient::new()?;
    let detail = client.chapter(chapter).await?;
    if verse > detail.verse_count {
        return Ok(None);
    }
    let text = detail
        .arabic
        .get(verse as usize - 1)
        .map(|t| snippet(t, 60));
    Ok(Some((detail.name.clone(), text)))
}

/// List saved bookmarks
pub fn list_bookmarks(storage: &Storage) -> Result<()> {
    let session = Session::open(storage.clone());
    let bookmarks = session.bookmarks().bookmarks();

    if bookmarks.is_empty() {
        println!("No bookmarks yet. Use 'bookmark <chapter> <verse>' to save one.");
        return Ok(());
    }

    println!("\n{} Bookmarks", style(bookmarks.len()).bold().cyan());
    println!("{}", "=".repeat(80));

    for bookmark in bookmarks {
        match &bookmark.chapter_name {
            Some(name) => println!("\n{} {}", style(bookmark.key()).bold(), name),
            None => println!("\n{}", style(bookmark.key()).bold()),
        }
        if let Some(text) = &bookmark.verse_text {
            println!("  {text}");
        }
        println!("  Saved: {}", format_timestamp(bookmark.created_at));
    }

    Ok(())
}

/// Remove a bookmark
pub fn remove_bookmark(storage: &Storage, matches: &ArgMatches) -> Result<()> {
    let (chapter, verse) = parse_verse_ref(matches)?;
    let session = Session::open(storage.clone());
    let key = VerseKey::new(chapter, verse);

    if !session.bookmarks().is_bookmarked(&key) {
        println!("{key} is not bookmarked.");
        return Ok(());
    }

    session.bookmarks().remove(&key);
    session.flush();
    println!("{} Removed bookmark {key}", style("✓").green().bold());
    Ok(())
}

/// Show reading statistics
pub fn show_stats(storage: &Storage) -> Result<()> {
    let session = Session::open(storage.clone());
    let progress = session.progress().state();

    println!("\n{}", style("Reading Statistics").bold().cyan());
    println!("{}", "=".repeat(80));
    println!(
        "Verses read: {} / {} ({:.1}%)",
        style(progress.verses_read()).bold(),
        TOTAL_VERSE_COUNT,
        progress.completion_percent()
    );
    println!("Current streak: {}", format_days(progress.streak_days));
    match &progress.last_read {
        Some(last) => println!(
            "Last read: {} {}:{} · {}",
            last.chapter_name,
            last.chapter,
            last.verse,
            format_timestamp(last.timestamp)
        ),
        None => println!("Last read: never"),
    }
    println!("Bookmarks: {}", session.bookmarks().count());

    Ok(())
}

/// List recitation voices, with the content API's catalogue when reachable
pub async fn list_reciters() -> Result<()> {
    println!("\n{}", style("Recitation Voices").bold().cyan());
    println!("{}", "=".repeat(80));
    for reciter in RECITERS {
        println!("{:>3}  {}", reciter.id, reciter.name);
    }

    let api_reciters = match ContentClient::new() {
        Ok(client) => client.reciters().await.ok(),
        Err(_) => None,
    };
    if let Some(api_reciters) = api_reciters {
        let extra: Vec<(&String, &String)> = api_reciters
            .iter()
            .filter(|(id, _)| RECITERS.iter().all(|r| r.id != id.as_str()))
            .collect();
        if !extra.is_empty() {
            println!("\nAlso listed by the content API (played with the default voice):");
            for (id, name) in extra {
                println!("{id:>3}  {name}");
            }
        }
    }

    Ok(())
}

/// Show current preferences, or apply the given changes
pub fn configure_settings(storage: &Storage, matches: &ArgMatches) -> Result<()> {
    let session = Session::open(storage.clone());
    let settings = session.settings();
    let mut changed = false;

    if let Some(raw) = matches.get_one::<String>("language") {
        let language = raw.parse::<Language>().map_err(anyhow::Error::msg)?;
        settings.set_language(language);
        println!("{} Language set to {language}", style("✓").green().bold());
        changed = true;
    }
    if let Some(raw) = matches.get_one::<String>("arabic-font") {
        let font = raw.parse().map_err(anyhow::Error::msg)?;
        settings.set_arabic_font(font);
        println!("{} Arabic font set to {font}", style("✓").green().bold());
        changed = true;
    }
    if let Some(raw) = matches.get_one::<String>("font-size") {
        let size = raw.parse().map_err(anyhow::Error::msg)?;
        settings.set_font_size(size);
        println!("{} Font size set to {size}", style("✓").green().bold());
        changed = true;
    }
    if let Some(raw) = matches.get_one::<String>("transliteration") {
        let on = parse_on_off(raw)?;
        if settings.state().show_transliteration != on {
            settings.toggle_transliteration();
        }
        println!(
            "{} Transliteration {}",
            style("✓").green().bold(),
            on_off(on)
        );
        changed = true;
    }
    if let Some(raw) = matches.get_one::<String>("autoplay") {
        let on = parse_on_off(raw)?;
        settings.set_auto_play_next(on);
        println!("{} Autoplay {}", style("✓").green().bold(), on_off(on));
        changed = true;
    }

    if changed {
        session.flush();
        return Ok(());
    }

    let state = settings.state();
    println!("\n{}", style("Settings").bold().cyan());
    println!("{}", "=".repeat(80));
    println!("Language: {}", state.language);
    println!("Arabic font: {}", state.arabic_font);
    println!("Font size: {}", state.font_size);
    println!("Transliteration: {}", on_off(state.show_transliteration));
    println!("Autoplay next verse: {}", on_off(state.auto_play_next));
    Ok(())
}

/// Show or switch the color theme
pub fn switch_theme(storage: &Storage, matches: &ArgMatches) -> Result<()> {
    let session = Session::open(storage.clone());

    match matches.get_one::<String>("mode").map(String::as_str) {
        Some("light") => session.theme().set_theme(Theme::Light),
        Some("dark") => session.theme().set_theme(Theme::Dark),
        Some("toggle") => session.theme().toggle(),
        _ => {
            println!("Theme: {}", session.theme().theme());
            return Ok(());
        }
    }

    session.flush();
    println!(
        "{} Theme set to {}",
        style("✓").green().bold(),
        session.theme().theme()
    );
    Ok(())
}

fn parse_number(matches: &ArgMatches, name: &str) -> Result<u16> {
    let raw = matches
        .get_one::<String>(name)
        .ok_or_else(|| anyhow::anyhow!("{name} is required"))?;
    let value: u16 = raw
        .parse()
        .with_context(|| format!("'{raw}' is not a {name} number"))?;
    if value == 0 {
        bail!("{name} numbers start at 1");
    }
    Ok(value)
}

fn parse_optional_number(matches: &ArgMatches, name: &str) -> Result<Option<u16>> {
    match matches.get_one::<String>(name) {
        Some(raw) => {
            let value = raw
                .parse()
                .with_context(|| format!("'{raw}' is not a verse number"))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

fn parse_verse_ref(matches: &ArgMatches) -> Result<(u16, u16)> {
    Ok((parse_number(matches, "chapter")?, parse_number(matches, "verse")?))
}

fn print_tafsir_entries(entries: &[TafsirEntry]) {
    if entries.is_empty() {
        println!("  (no commentary)");
        return;
    }
    for entry in entries {
        match &entry.group_verse {
            Some(range) => println!("\n{} (verses {range})", style(&entry.author).bold()),
            None => println!("\n{}", style(&entry.author).bold()),
        }
        println!("{}", entry.content);
    }
}

/// Matches the search page semantics: a chapter matches when the query is
/// its number or a substring of any displayed field.
fn matches_query(chapter: &ChapterSummary, number: u16, query: &str) -> bool {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return true;
    }
    if trimmed.parse::<u16>() == Ok(number) {
        return true;
    }
    let lowered = trimmed.to_lowercase();
    chapter.name.to_lowercase().contains(&lowered)
        || chapter.translated_name.to_lowercase().contains(&lowered)
        || chapter.arabic_name.contains(trimmed)
        || chapter
            .revelation_place
            .to_string()
            .to_lowercase()
            .contains(&lowered)
}

/// First `max_chars` characters, with an ellipsis when text was cut.
fn snippet(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        head + "…"
    } else {
        head
    }
}

fn parse_on_off(raw: &str) -> Result<bool> {
    match raw.to_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => bail!("Expected on or off, got '{other}'"),
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn format_days(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

fn format_timestamp(timestamp: Timestamp) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp.as_millis())
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
