use clap::{Parser, Subcommand};
use modgen::imaging::{Background, CanvasMode, OutputFormat};
use modgen::template::Mapping;
use modgen::{archive, config, imaging, output, template, tree};
use std::path::PathBuf;

/// Parse a single `KEY=VALUE` pair.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{s}`"))?;
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[derive(Parser)]
#[command(name = "modgen")]
#[command(about = "Storefront module generator helpers")]
#[command(long_about = "\
Storefront module generator helpers

Typical run:

  modgen copy skeleton/ build/mymodule
  modgen substitute build/mymodule/*.php build/mymodule/config.xml \\
      --var '{{module_name}}=mymodule' --var '{{ModuleClass}}=MyModule'
  modgen fit logo.jpg build/mymodule/logo.png
  modgen zip build/mymodule mymodule.zip

Thumbnails are fitted by height and never enlarged: a source smaller than the
box on both axes is centered at its original size. Icon (.ico) sources are
rejected.

Run 'modgen gen-config' to generate a documented modgen.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing modgen.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit an image into a target box and write it as a thumbnail
    Fit {
        source: PathBuf,
        destination: PathBuf,
        /// Target width in pixels (0 = keep source width)
        #[arg(long)]
        width: Option<u32>,
        /// Target height in pixels (0 = keep source height)
        #[arg(long)]
        height: Option<u32>,
        /// Output format: png, jpeg, gif, webp
        #[arg(long)]
        format: Option<OutputFormat>,
        /// Canvas sizing: fixed or scaled
        #[arg(long)]
        canvas: Option<CanvasMode>,
        /// Canvas fill: transparent or #rrggbb
        #[arg(long)]
        background: Option<Background>,
        /// Print the computed layout as JSON
        #[arg(long)]
        json: bool,
    },
    /// Copy a file or directory tree
    Copy {
        source: PathBuf,
        destination: PathBuf,
    },
    /// Delete a file or directory tree
    Delete { path: PathBuf },
    /// Replace placeholders in files, in place
    Substitute {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Placeholder and its replacement (repeatable)
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        vars: Vec<(String, String)>,
        /// JSON object of placeholder → replacement pairs
        #[arg(long)]
        vars_json: Option<PathBuf>,
    },
    /// Zip a directory, with entries under the directory's own name
    Zip {
        source: PathBuf,
        destination: PathBuf,
    },
    /// Print the body of a cached display-hook method
    Hook {
        module: String,
        /// Path prefix of the hook template
        #[arg(long, default_value = "")]
        prefix: String,
        /// Suffix appended to the template name
        #[arg(long, default_value = "")]
        suffix: String,
    },
    /// Print a stock modgen.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Fit {
            source,
            destination,
            width,
            height,
            format,
            canvas,
            background,
            json,
        } => {
            let cfg = config::load_config(&cli.config)?;
            let mut request = cfg.fit_request();
            if let Some(w) = width {
                request.width = w;
            }
            if let Some(h) = height {
                request.height = h;
            }
            if let Some(f) = format {
                request.format = f;
            }
            if let Some(c) = canvas {
                request.canvas = c;
            }
            if let Some(b) = background {
                request.background = b;
            }

            let result = imaging::fit(&source, &destination, &request)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                output::print_fit(&source, &destination, &request, &result);
            }
        }
        Command::Copy {
            source,
            destination,
        } => {
            let stats = tree::copy_tree(&source, &destination)?;
            output::print_copy(&source, &destination, &stats);
        }
        Command::Delete { path } => {
            tree::delete_tree(&path)?;
            output::print_delete(&path);
        }
        Command::Substitute {
            files,
            vars,
            vars_json,
        } => {
            let cfg = config::load_config(&cli.config)?;
            let mut mapping = cfg.placeholders;
            if let Some(path) = vars_json {
                let content = std::fs::read_to_string(&path)?;
                let from_file: Mapping = serde_json::from_str(&content)?;
                mapping.extend(from_file);
            }
            mapping.extend(vars);

            let mut results = Vec::with_capacity(files.len());
            for file in files {
                let count = template::substitute(&file, &mapping)?;
                results.push((file, count));
            }
            output::print_substitution(&results);
        }
        Command::Zip {
            source,
            destination,
        } => {
            let summary = archive::zip_directory(&source, &destination)?;
            output::print_archive(&source, &destination, &summary);
        }
        Command::Hook {
            module,
            prefix,
            suffix,
        } => {
            println!("{}", template::render_hook_body(&module, &prefix, &suffix));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn key_val_splits_on_first_equals() {
        assert_eq!(
            parse_key_val("{{a}}=b=c").unwrap(),
            ("{{a}}".to_string(), "b=c".to_string())
        );
        assert_eq!(parse_key_val("k=").unwrap(), ("k".to_string(), String::new()));
    }

    #[test]
    fn key_val_rejects_missing_equals_and_empty_key() {
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=value").is_err());
    }

    #[test]
    fn fit_flags_parse_into_domain_types() {
        let cli = Cli::try_parse_from([
            "modgen",
            "fit",
            "in.png",
            "out.jpg",
            "--format",
            "jpg",
            "--canvas",
            "scaled",
            "--background",
            "#ff0000",
        ])
        .unwrap();
        match cli.command {
            Command::Fit {
                format,
                canvas,
                background,
                ..
            } => {
                assert_eq!(format, Some(OutputFormat::Jpeg));
                assert_eq!(canvas, Some(CanvasMode::Scaled));
                assert_eq!(background, Some(Background::Solid([255, 0, 0])));
            }
            _ => panic!("expected fit command"),
        }
    }

    #[test]
    fn substitute_requires_a_file() {
        assert!(Cli::try_parse_from(["modgen", "substitute"]).is_err());
    }
}
