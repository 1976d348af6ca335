//! # chatnorm CLI
//!
//! Command-line interface for the chatnorm library.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use chatnorm::ChatnormError;
use chatnorm::cli::{Args, Command, DEFAULT_NORMALIZED_OUTPUT, StatsBy};
use chatnorm::config::{CleanConfig, NormalizeConfig, TranscriptConfig};
use chatnorm::core::{
    DateRange, StatsTable, TranscriptStats, clean_transcript, normalize_with_report, split_by_day,
    write_daily_files,
};
use chatnorm::format::{OutputFormat, write_to_format};
use chatnorm::parsing::{load_canonical, load_export};

fn main() {
    let args = <Args as ClapParser>::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .init();

    if let Err(e) = run(args.command) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run(command: Command) -> Result<(), ChatnormError> {
    let total_start = Instant::now();

    println!("📦 chatnorm v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match command {
        Command::Normalize {
            input,
            output,
            format,
            me,
            them,
            utc_offset,
        } => {
            let config = NormalizeConfig::new()
                .with_author_me(me)
                .with_author_them(them)
                .with_utc_offset(utc_offset);
            run_normalize(&input, &output, format.into(), &config)?;
        }
        Command::Split { input, output } => run_split(&input, &output)?,
        Command::Stats {
            input,
            start,
            end,
            by,
            output,
            format,
            date_format,
        } => {
            let config = TranscriptConfig::new().with_date_format(date_format);
            let range = DateRange::from_user_input(start.as_deref(), end.as_deref(), &config)?;
            run_stats(&input, &config, &range, by, output.as_deref(), format.into())?;
        }
        Command::Clean {
            input,
            output,
            token,
        } => run_clean(&input, output.as_deref(), &CleanConfig::new().with_token(token))?,
    }

    println!();
    println!(
        "⚡ Total time: {:.2}s",
        total_start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn run_normalize(
    input: &Path,
    output: &Path,
    format: OutputFormat,
    config: &NormalizeConfig,
) -> Result<(), ChatnormError> {
    let output_path = adjust_output_extension(output, format);

    println!("📂 Input:   {}", input.display());
    println!("💾 Output:  {}", output_path.display());
    println!("📄 Format:  {}", format);
    println!("👤 Authors: {} / {}", config.author_me, config.author_them);
    println!("🕐 Offset:  {}", config.utc_offset);
    println!();

    println!("⏳ Loading export...");
    let export = load_export(input)?;
    println!(
        "   Found {} records in chat {}",
        export.len(),
        export.chat_id
    );

    println!("🔀 Normalizing...");
    let (messages, report) = normalize_with_report(&export.messages, config)?;
    if report.sort_fallback {
        println!("   ⚠️  Timestamps could not be sorted, kept export order");
    }

    println!("💾 Writing {}...", format);
    write_to_format(&messages, &output_path, format)?;

    println!();
    println!("✅ Done! Output saved to {}", output_path.display());
    println!();
    println!("📊 Summary:");
    println!("   Records:          {}", report.input);
    if export.skipped > 0 {
        println!("   Unreadable:       {}", export.skipped);
    }
    println!("   No timestamp:     {}", report.skipped_no_timestamp);
    println!("   Empty:            {}", report.dropped_empty);
    println!("   Messages:         {}", report.emitted);
    println!(
        "   Replies:          {} quoted, {} resolved, {} media, {} missing",
        report.replies_quoted,
        report.replies_indexed,
        report.replies_media_placeholder,
        report.replies_missing
    );
    Ok(())
}

fn run_split(input: &Path, output_dir: &Path) -> Result<(), ChatnormError> {
    println!("📂 Input:   {}", input.display());
    println!("📁 Output:  {}", output_dir.display());
    println!();

    let messages = load_canonical(input)?;
    let groups = split_by_day(&messages);
    let paths = write_daily_files(&groups, output_dir)?;

    for (path, (key, day)) in paths.iter().zip(&groups) {
        println!("   {} → {} messages ({})", key, day.len(), path.display());
    }

    println!();
    println!(
        "✅ Done! {} messages split into {} files",
        messages.len(),
        paths.len()
    );
    Ok(())
}

fn run_stats(
    input: &Path,
    config: &TranscriptConfig,
    range: &DateRange,
    by: StatsBy,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<(), ChatnormError> {
    println!("📂 Input:   {}", input.display());
    if let Some(start) = range.start {
        println!("📅 Start:   {}", start);
    }
    if let Some(end) = range.end {
        println!("📅 End:     {}", end);
    }
    println!();

    let stats = TranscriptStats::load(input, config, range)?;

    println!("📊 Summary:");
    println!("   Messages:       {}", stats.total());
    println!("   Authors:        {}", stats.authors().len());
    println!("   Days:           {}", stats.per_day().len());
    println!("   System notices: {}", stats.system_notices());
    println!("   Continuations:  {}", stats.continuations());
    if range.is_bounded() {
        println!("   Out of range:   {}", stats.out_of_range());
    }

    let tables = by.tables();
    for &table in tables {
        println!();
        match output {
            Some(path) => {
                let path = table_output_path(path, table, tables.len() > 1);
                stats.write_table(table, &path, format)?;
                println!("💾 {} table saved to {}", table, path.display());
            }
            None => {
                println!("── {} ──", table);
                print!("{}", stats.table_to_string(table, format)?);
                if format == OutputFormat::Json {
                    println!();
                }
            }
        }
    }
    Ok(())
}

fn run_clean(input: &Path, output: Option<&Path>, config: &CleanConfig) -> Result<(), ChatnormError> {
    let destination = output.unwrap_or(input);
    println!("📂 Input:   {}", input.display());
    println!("💾 Output:  {}", destination.display());
    println!("🧹 Token:   {}", config.token);
    println!();

    let report = clean_transcript(input, output, config)?;

    println!(
        "✅ Done! Removed {} lines, kept {}",
        report.removed, report.kept
    );
    Ok(())
}

/// Adjusts output file extension based on format if using default output.
fn adjust_output_extension(output: &Path, format: OutputFormat) -> PathBuf {
    if output != Path::new(DEFAULT_NORMALIZED_OUTPUT) {
        return output.to_path_buf();
    }
    output.with_extension(format.extension())
}

/// `stats.csv` becomes `stats_author.csv` when several tables are written.
fn table_output_path(output: &Path, table: StatsTable, several: bool) -> PathBuf {
    if !several {
        return output.to_path_buf();
    }
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stats".to_string());
    let name = match output.extension() {
        Some(ext) => format!("{}_{}.{}", stem, table, ext.to_string_lossy()),
        None => format!("{}_{}", stem, table),
    };
    output.with_file_name(name)
}
