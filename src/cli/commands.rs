use crate::catalog::Catalog;
use crate::config::Settings;
use crate::core::scan_text;
use crate::error::{OctoError, OctoResult};
use crate::grammar::tm_grammar;
use crate::types::{Finding, VariableSpec};
use crate::varinfo::VarinfoImporter;
use crate::version::{auto_detect, SystemProbe};
use colored::Colorize;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

/// Version and data directory as given on the command line
#[derive(Debug, Clone, Default)]
pub struct CatalogArgs {
    pub version: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl CatalogArgs {
    /// Version and data directory, filling gaps from `.octopus-tools.yaml` found above `start`
    pub fn resolve(&self, start: &Path) -> OctoResult<(String, Option<PathBuf>)> {
        let settings = Settings::discover(start)?.unwrap_or_default();
        let version = self.version.clone().unwrap_or(settings.version);
        let data_dir = self.data_dir.clone().or(settings.data_dir);
        Ok((version, data_dir))
    }

    /// Load the selected catalog
    pub fn load(&self, start: &Path) -> OctoResult<Catalog> {
        let (version, data_dir) = self.resolve(start)?;
        Catalog::load(&version, data_dir.as_deref())
    }

    /// Versions loadable with the resolved data directory
    pub fn available_versions(&self, start: &Path) -> OctoResult<Vec<String>> {
        let (_, data_dir) = self.resolve(start)?;
        Ok(Catalog::available_versions(data_dir.as_deref()))
    }
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Directory to start the settings search from for `file`
fn settings_root(file: &Path) -> PathBuf {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => current_dir(),
    }
}

fn print_finding(file: &Path, finding: &Finding) {
    println!(
        "   {}:{} {}",
        file.display().to_string().bright_blue(),
        format!("{}:{}", finding.line + 1, finding.start_col + 1).bright_blue(),
        finding.message.red()
    );
}

/// Scan one file, returning its findings
pub fn check_file(file: &Path, catalog: &Catalog) -> OctoResult<Vec<Finding>> {
    let content = fs::read_to_string(file)?;
    Ok(scan_text(&content, catalog))
}

/// Execute the check command
pub fn check(files: Vec<PathBuf>, args: CatalogArgs) -> OctoResult<()> {
    let first = files
        .first()
        .ok_or_else(|| OctoError::Validation("No input files given".to_string()))?;
    let catalog = args.load(&settings_root(first))?;

    println!("{}", "✅ Checking Octopus input".bold().green());
    println!(
        "   Version: Octopus {} ({} variables)\n",
        catalog.version(),
        catalog.len()
    );

    let mut total = 0;
    let mut failed_files = 0;

    for file in &files {
        let findings = match check_file(file, &catalog) {
            Ok(findings) => findings,
            Err(e) => {
                println!(
                    "{}",
                    format!("❌ Cannot read {}: {}", file.display(), e).bold().red()
                );
                return Err(e);
            }
        };

        if findings.is_empty() {
            println!("   {} {}", "✓".green(), file.display());
            continue;
        }

        failed_files += 1;
        total += findings.len();
        println!("   {} {}", "✗".red(), file.display());
        for finding in &findings {
            print_finding(file, finding);
        }
    }

    println!();
    if total == 0 {
        println!("{}", "✅ All values are valid!".bold().green());
        Ok(())
    } else {
        println!(
            "{}",
            format!("❌ Found {} invalid values in {} file(s)", total, failed_files)
                .bold()
                .red()
        );
        println!(
            "{}",
            "💡 Run 'octo info <Variable>' to see what a variable accepts"
                .bold()
                .yellow()
        );
        Err(OctoError::Validation(format!(
            "{} invalid values in {} file(s)",
            total, failed_files
        )))
    }
}

/// Execute the watch command
pub fn watch(file: PathBuf, args: CatalogArgs, verbose: bool) -> OctoResult<()> {
    println!("{}", "👁️  Octopus - Watch Mode".bold().green());
    println!("   Watching: {}", file.display());
    println!("   Press {} to stop\n", "Ctrl+C".bold().yellow());

    if !file.exists() {
        return Err(OctoError::Validation(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let catalog = args.load(&settings_root(&file))?;
    if verbose {
        println!(
            "   {} Octopus {}",
            "Using version:".cyan(),
            catalog.version()
        );
    }

    let canonical_path = file.canonicalize()?;
    let parent_dir = canonical_path
        .parent()
        .ok_or_else(|| OctoError::Validation("Cannot determine parent directory".to_string()))?;

    let (tx, rx) = channel();

    // Debounce so one editor save triggers one run
    let mut debouncer = new_debouncer(Duration::from_millis(200), tx)
        .map_err(|e| OctoError::Validation(format!("Failed to create file watcher: {}", e)))?;

    debouncer
        .watcher()
        .watch(parent_dir, RecursiveMode::NonRecursive)
        .map_err(|e| OctoError::Validation(format!("Failed to watch directory: {}", e)))?;

    println!("{}", "🔄 Initial run...".cyan());
    run_watch_check(&file, &catalog);
    println!();

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|event| {
                    event.kind == DebouncedEventKind::Any
                        && (event.path.canonicalize().ok().as_ref() == Some(&canonical_path)
                            || event.path.file_name() == canonical_path.file_name())
                });

                if relevant {
                    if verbose {
                        print!("\x1B[2J\x1B[1;1H");
                    }
                    println!(
                        "\n{} {}",
                        "🔄 Change detected at".cyan(),
                        chrono::Local::now().format("%H:%M:%S").to_string().cyan()
                    );
                    run_watch_check(&file, &catalog);
                    println!();
                }
            }
            Ok(Err(error)) => {
                eprintln!("{} Watch error: {}", "❌".red(), error);
            }
            Err(e) => {
                eprintln!("{} Channel error: {}", "❌".red(), e);
                break;
            }
        }
    }

    Ok(())
}

fn run_watch_check(file: &Path, catalog: &Catalog) {
    match check_file(file, catalog) {
        Ok(findings) if findings.is_empty() => {
            println!("{}", "✅ All values are valid".bold().green())
        }
        Ok(findings) => {
            println!(
                "{}",
                format!("❌ {} invalid values", findings.len()).bold().red()
            );
            for finding in &findings {
                print_finding(file, finding);
            }
        }
        Err(e) => println!("{} {}", "❌ Check failed:".bold().red(), e),
    }
}

/// Variables whose name or section contains `filter` (case-insensitive)
pub fn filter_variables<'a>(catalog: &'a Catalog, filter: Option<&str>) -> Vec<&'a VariableSpec> {
    let needle = filter.map(str::to_lowercase);
    catalog
        .iter()
        .filter(|spec| match &needle {
            Some(n) => {
                spec.name.to_lowercase().contains(n) || spec.section.to_lowercase().contains(n)
            }
            None => true,
        })
        .collect()
}

/// Execute the vars command
pub fn vars(filter: Option<String>, args: CatalogArgs) -> OctoResult<()> {
    let catalog = args.load(&current_dir())?;
    let matches = filter_variables(&catalog, filter.as_deref());

    println!(
        "{}",
        format!("📚 Octopus {} variables", catalog.version())
            .bold()
            .green()
    );
    if let Some(f) = &filter {
        println!("   Filter: {}", f.bright_blue());
    }
    println!();

    if matches.is_empty() {
        println!("{}", "⚠️  No variables match".yellow());
        return Ok(());
    }

    let width = matches.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for spec in &matches {
        println!(
            "   {}  {:<8}  {}",
            format!("{:<width$}", spec.name, width = width)
                .bright_blue()
                .bold(),
            spec.var_type.to_string(),
            spec.section.dimmed()
        );
    }
    println!("\n   {} variables", matches.len());
    Ok(())
}

/// Execute the info command
pub fn info(name: String, args: CatalogArgs) -> OctoResult<()> {
    let catalog = args.load(&current_dir())?;
    let Some(spec) = catalog.get(&name) else {
        println!(
            "{}",
            format!("❌ Unknown variable '{}' in Octopus {}", name, catalog.version())
                .bold()
                .red()
        );
        return Err(OctoError::Validation(format!("Unknown variable: {}", name)));
    };

    println!("{}", spec.name.bold().green());
    println!("   {} {}", "Version:".cyan(), catalog.version());
    println!("   {} {}", "Type:".cyan(), spec.var_type);
    if !spec.section.is_empty() {
        println!("   {} {}", "Section:".cyan(), spec.section);
    }
    if !spec.default.is_empty() {
        println!("   {} {}", "Default:".cyan(), spec.default.join(", "));
    }
    if let Some(url) = catalog.doc_url_for(spec) {
        println!("   {} {}", "Docs:".cyan(), url.underline());
    }
    if !spec.description.is_empty() {
        println!("\n   {}", spec.description_text());
    }
    if spec.has_options() {
        println!("\n   {}", "Valid values:".cyan());
        for opt in &spec.options {
            println!("      {} ({})", opt.name.bright_blue(), opt.value);
        }
    }
    Ok(())
}

/// Execute the detect-version command
pub fn detect_version(
    file: Option<PathBuf>,
    roots: Vec<PathBuf>,
    args: CatalogArgs,
) -> OctoResult<Option<String>> {
    println!("{}", "🔍 Detecting Octopus version".bold().green());

    let content = match &file {
        Some(path) => Some(fs::read_to_string(path)?),
        None => None,
    };
    let roots = if roots.is_empty() {
        vec![current_dir()]
    } else {
        roots
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let probe = SystemProbe::default();
    let detected = runtime.block_on(auto_detect(&probe, content.as_deref(), roots.as_slice()));

    match &detected {
        Some(version) => {
            println!("{}", format!("✅ Detected Octopus {}", version).bold().green());
            let start = file.as_deref().map(settings_root).unwrap_or_else(current_dir);
            if !args.available_versions(&start)?.contains(version) {
                println!(
                    "{}",
                    format!("⚠️  No variable information available for {}", version).yellow()
                );
            }
        }
        None => println!("{}", "⚠️  Could not detect Octopus version".yellow()),
    }
    Ok(detected)
}

/// Execute the grammar command
pub fn grammar(output: Option<PathBuf>, args: CatalogArgs) -> OctoResult<()> {
    let catalog = args.load(&current_dir())?;
    let json = serde_json::to_string_pretty(&tm_grammar(&catalog))?;

    match output {
        Some(path) => {
            fs::write(&path, json)?;
            println!(
                "{}",
                format!("✅ Wrote grammar to {}", path.display()).bold().green()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Execute the import-varinfo command, returning the written path
pub fn import_varinfo(
    input: PathBuf,
    version: String,
    output: Option<PathBuf>,
    args: CatalogArgs,
    verbose: bool,
) -> OctoResult<PathBuf> {
    println!("{}", "📥 Octopus varinfo import".bold().green());
    println!("   Input:   {}", input.display());
    println!("   Version: {}
", version);

    let importer = VarinfoImporter::new(&input, version.as_str());
    let imported = importer.import()?;

    if verbose {
        let mut sections: Vec<&str> = imported
            .catalog
            .iter()
            .map(|spec| spec.section.as_str())
            .filter(|s| !s.is_empty())
            .collect();
        sections.sort_unstable();
        sections.dedup();
        println!("   Found {} variables", imported.catalog.len());
        println!("   Found {} sections\n", sections.len());
    }

    let (_, data_dir) = args.resolve(&current_dir())?;
    let target = importer.target_path(output.as_deref(), data_dir.as_deref());
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, &imported.json)?;

    println!(
        "{}",
        format!(
            "✅ Imported {} variables for Octopus {}",
            imported.catalog.len(),
            version
        )
        .bold()
        .green()
    );
    println!("   Data file: {}", target.display());
    if output.is_some() && data_dir.is_none() {
        println!(
            "{}",
            "💡 Use --data-dir with the file's directory to load it".yellow()
        );
    }
    Ok(target)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
