mod cli;

use episodist::{
    config::{self, Config},
    reconciler::{ProcessOptions, Reconciler},
    report::BatchReport,
    scanner, sequencer,
};
use episodist_av::{check_tools, Editors};
use episodist_common::{BatchOutcome, Genre};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ProcessArgs};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = config::load_config_or_default(cli.config.as_deref());

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use the verbose flag or configured level
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "episodist=debug,episodist_av=debug,episodist_common=debug".to_string()
        } else {
            let level = loaded
                .as_ref()
                .map(|c| c.log_level.as_str())
                .unwrap_or("info");
            format!(
                "episodist={level},episodist_av={level},episodist_common={level}"
            )
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("episodist {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Genres => {
            for genre in Genre::ALL {
                println!("{}", genre);
            }
            Ok(())
        }
        command => {
            let config = loaded?;
            match command {
                Commands::Process(args) => process(args, &config),
                Commands::Scan { dir, json } => scan(&dir, &config, json),
                Commands::Inspect { file, json } => inspect(&file, &config, json),
                Commands::CheckTools => check_tools_command(&config),
                Commands::Validate { .. } | Commands::Version | Commands::Genres => Ok(()),
            }
        }
    }
}

fn process(args: ProcessArgs, config: &Config) -> Result<()> {
    let genre: Genre = args.genre.parse().map_err(|e: String| {
        anyhow::anyhow!("{}. Run `episodist genres` for the accepted labels", e)
    })?;
    let policy = config.policy(
        args.title,
        genre,
        args.year,
        args.season,
        args.episode,
        args.padding,
    );

    let mut batch = scanner::collect_batch(&args.paths, &config.scan)?;
    if batch.is_empty() {
        anyhow::bail!("No media files found in {:?}", args.paths);
    }

    if args.dry_run {
        let plan = sequencer::plan(&batch, &policy)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            println!("[DRY RUN] {} files would be processed:", plan.len());
            for row in &plan {
                let from = row.from.file_name().unwrap_or_default().to_string_lossy();
                let to = row.to.file_name().unwrap_or_default().to_string_lossy();
                let label =
                    sequencer::episode_label(row.season, row.episode, policy.episode_padding);
                if row.changes_name && !args.no_rename {
                    println!("  {}  {} -> {}", label, from, to);
                } else {
                    println!("  {}  {}", label, from);
                }
            }
        }
        return Ok(());
    }

    let tools = config.tools.discover();
    let reconciler = Reconciler::new(Editors::system(&tools)).with_progress_callback(Box::new(
        |done: usize, total: usize, outcome: &BatchOutcome| {
            tracing::debug!("[{}/{}] {:?}", done, total, outcome.final_path);
        },
    ));

    let options = ProcessOptions {
        rename: !args.no_rename,
        metadata: !args.no_metadata,
    };
    let outcomes = reconciler
        .process(&mut batch, &policy, options)
        .context("Batch not started")?;

    let report = BatchReport::new(outcomes).with_episode_padding(policy.episode_padding);
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render());
    }

    if report.has_failures() {
        anyhow::bail!(
            "{} of {} files failed",
            report.summary.failed,
            report.summary.total
        );
    }

    Ok(())
}

fn scan(dir: &Path, config: &Config, json: bool) -> Result<()> {
    let files = scanner::scan_directory(dir, &config.scan)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    println!("Found {} media files in {}", files.len(), dir.display());
    for (i, file) in files.iter().enumerate() {
        let detected = file
            .detected
            .map(|p| format!("S{:02}E{:02}", p.season, p.episode))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  [{}] {:<8} {:<6} {}",
            i + 1,
            file.container.to_string(),
            detected,
            file.path.display()
        );
    }

    Ok(())
}

fn inspect(file: &Path, config: &Config, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let editors = Editors::system(&config.tools.discover());
    let tags = editors.read(file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tags)?);
        return Ok(());
    }

    fn show<T: std::fmt::Display>(value: &Option<T>) -> String {
        value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    println!("File: {}", file.display());
    println!("Title: {}", show(&tags.title));
    println!("Show: {}", show(&tags.show));
    println!("Genre: {}", show(&tags.genre));
    println!("Year: {}", show(&tags.year));
    println!("Season: {}", show(&tags.season));
    println!("Episode: {}", show(&tags.episode));

    Ok(())
}

fn check_tools_command(config: &Config) -> Result<()> {
    println!("Checking external tools...\n");

    let tools = check_tools(
        config.tools.mkvpropedit_path.as_deref(),
        config.tools.mkvextract_path.as_deref(),
    );
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. MKV files cannot be tagged until MKVToolNix is installed.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, checking default locations");
            config::load_config_or_default(None)?
        }
    };

    println!("✓ Configuration is valid");
    println!("  Log level: {}", config.log_level);
    println!(
        "  Defaults: year {}, season {}, episode {}, padding {}",
        config.naming.default_year,
        config.naming.default_season,
        config.naming.default_episode,
        config.naming.episode_padding
    );
    println!("  Extensions: {}", config.scan.extensions.join(", "));
    if let Some(ref path) = config.tools.mkvpropedit_path {
        println!("  mkvpropedit: {}", path.display());
    }
    if let Some(ref path) = config.tools.mkvextract_path {
        println!("  mkvextract: {}", path.display());
    }

    Ok(())
}
