//! Subcommand implementations.
//!
//! Each command reads one already-fetched document and writes text output.
//! None of them touch the network.

use crate::config::Settings;
use dynalist_core::{
    check_bad_internal_links, find_all_links, parse_url, render, Document, NodeOrder,
    ROOT_NODE_ID,
};
use log::info;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::process::ExitCode;

pub type CommandResult = Result<ExitCode, Box<dyn Error>>;

/// Loads the document from `--infile` or stdin.
pub fn read_document(settings: &Settings) -> Result<Document, Box<dyn Error>> {
    let doc = match &settings.infile {
        Some(path) => {
            info!(
                "event=load_document module=cli status=start source={}",
                path.display()
            );
            let file = File::open(path)
                .map_err(|err| format!("failed to open `{}`: {err}", path.display()))?;
            Document::from_reader(BufReader::new(file))?
        }
        None => {
            info!("event=load_document module=cli status=start source=stdin");
            Document::from_reader(io::stdin().lock())?
        }
    };
    Ok(doc)
}

fn open_output(settings: &Settings) -> Result<Box<dyn Write>, Box<dyn Error>> {
    match &settings.outfile {
        Some(path) => {
            let file = File::create(path)
                .map_err(|err| format!("failed to create `{}`: {err}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Start node: `--node`, else the URL's zoom target, else the root.
fn start_node(settings: &Settings, node: Option<&str>) -> Result<String, Box<dyn Error>> {
    if let Some(node) = node {
        return Ok(node.to_string());
    }
    match &settings.url {
        Some(url) => Ok(parse_url(url)?.start_node().to_string()),
        None => Ok(ROOT_NODE_ID.to_string()),
    }
}

pub fn markdown(settings: &Settings, node: Option<&str>) -> CommandResult {
    let start = start_node(settings, node)?;
    let doc = read_document(settings)?;
    let text = render(&doc, &start)?;

    let mut out = open_output(settings)?;
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

pub fn lint(settings: &Settings) -> CommandResult {
    let doc = read_document(settings)?;
    let messages = check_bad_internal_links(&doc)?;
    if messages.is_empty() {
        eprintln!("No warnings or errors.");
        return Ok(ExitCode::SUCCESS);
    }
    for message in &messages {
        eprintln!("{message}");
    }
    Ok(ExitCode::FAILURE)
}

pub fn nodes(settings: &Settings, order: &str) -> CommandResult {
    let order = order.parse::<NodeOrder>()?;
    let doc = read_document(settings)?;

    let mut out = open_output(settings)?;
    for node in doc.all_nodes(order)? {
        writeln!(out, "{}\t{}", node.id, node.content())?;
    }
    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

pub fn links(settings: &Settings) -> CommandResult {
    let doc = read_document(settings)?;

    let mut out = open_output(settings)?;
    for node in doc.all_nodes(NodeOrder::Tree)? {
        let mut found = find_all_links(node.content());
        if let Some(note) = &node.note {
            found.extend(find_all_links(note));
        }
        for link in found {
            writeln!(out, "{}\t{}\t{}", node.id, link.title, link.url)?;
        }
    }
    out.flush()?;
    Ok(ExitCode::SUCCESS)
}
