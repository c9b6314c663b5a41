use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::Value;

use selectui::{
    DocumentFormat, DropdownConfig, DropdownField, FormUI, OutputDestination, OutputOptions,
    StaticCatalog, parse_document_str,
};

#[derive(Debug, Parser)]
#[command(
    name = "selectui",
    version,
    about = "Render option catalogs as interactive dropdown forms"
)]
struct Cli {
    /// Catalog spec: file path, inline payload, or "-" for stdin
    #[arg(short = 'c', long = "catalog", value_name = "SPEC")]
    catalog: String,

    /// Declare a field as NAME=KEY (KEY is the catalog lookup key). Repeatable.
    #[arg(long = "field", value_name = "NAME=KEY", action = ArgAction::Append, required = true)]
    fields: Vec<String>,

    /// Mark a declared field as required. Repeatable.
    #[arg(short = 'r', long = "required", value_name = "NAME", action = ArgAction::Append)]
    required: Vec<String>,

    /// Override a field's placeholder as NAME=TEXT. Repeatable.
    #[arg(long = "placeholder", value_name = "NAME=TEXT", action = ArgAction::Append)]
    placeholders: Vec<String>,

    /// Title shown at the top of the UI
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Output destinations ("-" writes to stdout). Repeatable.
    #[arg(short = 'o', long = "output", value_name = "DEST", action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact JSON rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

#[derive(Debug, Clone)]
struct FieldDecl {
    name: String,
    key: String,
    required: bool,
    placeholder: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut diagnostics = DiagnosticCollector::default();

    let mut decls = Vec::new();
    for raw in &cli.fields {
        match parse_field_spec(raw) {
            Ok((name, key)) => decls.push(FieldDecl {
                name,
                key,
                required: false,
                placeholder: None,
            }),
            Err(message) => diagnostics.push_input("field", message),
        }
    }

    for name in &cli.required {
        match decls.iter_mut().find(|decl| &decl.name == name) {
            Some(decl) => decl.required = true,
            None => diagnostics.push_input(
                "required",
                format!("--required names undeclared field '{name}'"),
            ),
        }
    }

    for raw in &cli.placeholders {
        match raw.split_once('=') {
            Some((name, text)) if !name.is_empty() && !text.is_empty() => {
                match decls.iter_mut().find(|decl| decl.name == name) {
                    Some(decl) => decl.placeholder = Some(text.to_string()),
                    None => diagnostics.push_input(
                        "placeholder",
                        format!("--placeholder names undeclared field '{name}'"),
                    ),
                }
            }
            _ => diagnostics.push_input("placeholder", format!("expected NAME=TEXT, got '{raw}'")),
        }
    }

    let catalog_format = match probe_format_from_extension(Path::new(&cli.catalog)) {
        ExtensionFormat::Known(format) => format,
        ExtensionFormat::UnsupportedFeature {
            format_name,
            feature_flag,
        } => {
            diagnostics.push_input(
                "catalog",
                format!(
                    "catalog '{}' requires {format_name} support, but this build lacks the '{feature_flag}' feature",
                    cli.catalog
                ),
            );
            DocumentFormat::default()
        }
        ExtensionFormat::Unknown => DocumentFormat::default(),
    };

    let catalog = match load_value(&cli.catalog, catalog_format, "catalog")
        .and_then(|value| StaticCatalog::from_value(&value).map_err(Report::msg))
    {
        Ok(catalog) => Some(catalog),
        Err(err) => {
            diagnostics.push_input("catalog", err.to_string());
            None
        }
    };

    if let Some(catalog) = catalog.as_ref() {
        for decl in &decls {
            if !catalog.keys().any(|key| key == decl.key) {
                eprintln!(
                    "catalog has no entry for '{}'; field '{}' will render empty",
                    decl.key, decl.name
                );
            }
        }
    }

    let (output_settings, output_paths) = build_output_options(&cli);
    ensure_output_paths_available(&output_paths, cli.force, &mut diagnostics);

    diagnostics.into_result()?;

    let catalog = Arc::new(catalog.expect("catalog diagnostics already reported"));

    let mut ui = FormUI::new();
    if let Some(title) = cli.title.as_ref() {
        ui = ui.with_title(title.clone());
    }
    for decl in decls {
        let mut config = DropdownConfig::new()
            .with_lookup_key(decl.key)
            .with_required(decl.required);
        if let Some(placeholder) = decl.placeholder {
            config = config.with_placeholder(placeholder);
        }
        let label = display_label(&decl.name);
        ui = ui.add_field(decl.name, label, DropdownField::new(config, catalog.clone()));
    }

    let emit_after = output_settings.is_none();
    if let Some(options) = output_settings {
        ui = ui.with_output(options);
    }

    let selections = ui.run().map_err(|err| eyre!("{err:#}"))?;
    if emit_after {
        print_selections(&selections, !cli.no_pretty)?;
    }

    Ok(())
}

fn parse_field_spec(raw: &str) -> std::result::Result<(String, String), String> {
    let Some((name, key)) = raw.split_once('=') else {
        return Err(format!("expected NAME=KEY, got '{raw}'"));
    };
    if name.is_empty() || key.is_empty() {
        return Err(format!("field name and lookup key must be non-empty in '{raw}'"));
    }
    Ok((name.to_string(), key.to_string()))
}

/// Human label from a machine name: separators become spaces, first letter
/// uppercased.
fn display_label(name: &str) -> String {
    let spaced = name.replace(['-', '_'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
}

fn load_value(spec: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    if spec == "-" {
        let contents = read_from_source(&InputSource::Stdin)?;
        return parse_contents(&contents, format, label);
    }

    let path = PathBuf::from(spec);
    match read_from_source(&InputSource::File(path.clone())) {
        Ok(contents) => parse_contents(&contents, format, label),
        Err(err) => {
            if is_not_found(&err) {
                let inline_label = format!("inline {label}");
                return parse_contents(spec, format, &inline_label);
            }
            Err(err.wrap_err(format!("failed to load {label} from {}", path.display())))
        }
    }
}

fn read_from_source(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("failed to read from stdin")?;
            Ok(buffer)
        }
        InputSource::File(path) => fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read file {}", path.display())),
    }
}

fn is_not_found(err: &Report) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}

fn parse_contents(contents: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    match parse_document_str(contents, format) {
        Ok(value) => Ok(value),
        Err(primary) => {
            for candidate in DocumentFormat::available_formats() {
                if candidate == format {
                    continue;
                }
                if let Ok(value) = parse_document_str(contents, candidate) {
                    return Ok(value);
                }
            }
            Err(Report::msg(format!(
                "failed to parse {label}: tried {} (first error: {primary})",
                format_list()
            )))
        }
    }
}

fn format_list() -> String {
    let items: Vec<String> = DocumentFormat::available_formats()
        .into_iter()
        .map(|fmt| fmt.to_string())
        .collect();
    items.join(", ")
}

fn build_output_options(cli: &Cli) -> (Option<OutputOptions>, Vec<PathBuf>) {
    if cli.outputs.is_empty() {
        return (None, Vec::new());
    }

    let mut destinations = Vec::new();
    for raw in &cli.outputs {
        if raw == "-" {
            destinations.push(OutputDestination::Stdout);
        } else {
            destinations.push(OutputDestination::file(raw));
        }
    }

    let file_paths: Vec<PathBuf> = destinations
        .iter()
        .filter_map(|dest| match dest {
            OutputDestination::File(path) => Some(path.clone()),
            OutputDestination::Stdout => None,
        })
        .collect();

    let options = OutputOptions::new(DocumentFormat::default())
        .with_pretty(!cli.no_pretty)
        .with_destinations(destinations);
    (Some(options), file_paths)
}

fn ensure_output_paths_available(
    paths: &[PathBuf],
    force: bool,
    diagnostics: &mut DiagnosticCollector,
) {
    if force {
        return;
    }
    for path in paths {
        if path.exists() {
            diagnostics.push_output(format!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
    }
}

fn print_selections(selections: &Value, pretty: bool) -> Result<()> {
    let payload = if pretty {
        serde_json::to_string_pretty(selections)
    } else {
        serde_json::to_string(selections)
    }
    .wrap_err("failed to serialize selections")?;
    println!("{payload}");
    Ok(())
}

fn probe_format_from_extension(path: &Path) -> ExtensionFormat {
    let Some(ext) = path.extension() else {
        return ExtensionFormat::Unknown;
    };
    let normalized = ext.to_string_lossy().to_ascii_lowercase();
    match normalized.as_str() {
        "json" => ExtensionFormat::Known(DocumentFormat::Json),
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => ExtensionFormat::Known(DocumentFormat::Yaml),
        #[cfg(not(feature = "yaml"))]
        "yaml" | "yml" => ExtensionFormat::UnsupportedFeature {
            format_name: "yaml",
            feature_flag: "yaml",
        },
        #[cfg(feature = "toml")]
        "toml" => ExtensionFormat::Known(DocumentFormat::Toml),
        #[cfg(not(feature = "toml"))]
        "toml" => ExtensionFormat::UnsupportedFeature {
            format_name: "toml",
            feature_flag: "toml",
        },
        _ => ExtensionFormat::Unknown,
    }
}

#[derive(Debug)]
enum ExtensionFormat {
    Known(DocumentFormat),
    #[allow(dead_code)]
    UnsupportedFeature {
        format_name: &'static str,
        feature_flag: &'static str,
    },
    Unknown,
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_input(&mut self, label: &str, message: impl Into<String>) {
        self.messages
            .push(format!("input ({label}): {}", message.into()));
    }

    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered input/output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}
