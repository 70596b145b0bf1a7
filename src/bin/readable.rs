//! Command-line front end.
//!
//! Reads HTML from a file (or stdin when the source is `-` or absent)
//! and prints the extracted article. `--metadata` prints the metadata
//! record as JSON, `--text` prints the plain text, the default prints
//! the content HTML. Errors go to stderr with a non-zero exit code.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MetadataOutput {
    title: Option<String>,
    byline: Option<String>,
    excerpt: Option<String>,
    language: Option<String>,
    site_name: Option<String>,
    image: Option<String>,
    favicon: Option<String>,
    published_time: Option<String>,
    modified_time: Option<String>,
    length: usize,
}

struct CliArgs {
    source: Option<String>,
    base_url: Option<String>,
    metadata_only: bool,
    text_only: bool,
}

const USAGE: &str = "usage: readable [-m|--metadata] [-t|--text] [-u|--base-url URL] [source]

Extracts the readable article from an HTML page.
The source is a file path, or '-' (or absent) for stdin.

  -m, --metadata       only print the page's metadata, as JSON
  -t, --text           only print the article's plain text
  -u, --base-url URL   base URL for resolving relative links";

fn parse_args() -> Result<CliArgs, String> {
    let mut args = CliArgs {
        source: None,
        base_url: None,
        metadata_only: false,
        text_only: false,
    };

    let mut iter = env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-m" | "--metadata" => args.metadata_only = true,
            "-t" | "--text" => args.text_only = true,
            "-u" | "--base-url" => {
                args.base_url = Some(iter.next().ok_or("missing value for --base-url")?);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            other if other.starts_with('-') && other != "-" => {
                return Err(format!("unknown flag: {other}\n\n{USAGE}"));
            }
            other => {
                if args.source.is_some() {
                    return Err(format!("multiple sources given\n\n{USAGE}"));
                }
                args.source = Some(other.to_string());
            }
        }
    }

    Ok(args)
}

fn read_source(source: Option<&str>) -> io::Result<String> {
    match source {
        None | Some("-") => {
            let mut html = String::new();
            io::stdin().read_to_string(&mut html)?;
            Ok(html)
        }
        Some(path) => fs::read_to_string(path),
    }
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let html = match read_source(args.source.as_deref()) {
        Ok(html) => html,
        Err(err) => {
            eprintln!("failed to read source: {err}");
            return ExitCode::FAILURE;
        }
    };

    let article = match rs_readability::parse(&html, args.base_url.as_deref()) {
        Ok(article) => article,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    if args.metadata_only {
        let output = MetadataOutput {
            title: article.title,
            byline: article.byline,
            excerpt: article.excerpt,
            language: article.language,
            site_name: article.site_name,
            image: article.image,
            favicon: article.favicon,
            published_time: article.published_time.map(|t| t.to_rfc3339()),
            modified_time: article.modified_time.map(|t| t.to_rfc3339()),
            length: article.length,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("failed to encode metadata: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else if args.text_only {
        println!("{}", article.text_content.unwrap_or_default());
    } else {
        println!("{}", article.content.unwrap_or_default());
    }

    ExitCode::SUCCESS
}
